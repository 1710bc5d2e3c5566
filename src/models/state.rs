use std::collections::BTreeMap;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use super::course::{Course, CourseId};

/// Today's date as `YYYY-MM-DD` in the local timezone.
pub fn today_str() -> String {
    date_str(Local::now().date_naive())
}

pub fn date_str(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// The whole persisted tree: every course, the current selection and the
/// date marks are recorded against.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AgendaState {
    #[serde(default)]
    pub courses: BTreeMap<CourseId, Course>,
    #[serde(default)]
    pub selected_course_id: Option<CourseId>,
    #[serde(default = "today_str")]
    pub selected_date: String,
}

impl Default for AgendaState {
    fn default() -> Self {
        Self {
            courses: BTreeMap::new(),
            selected_course_id: None,
            selected_date: today_str(),
        }
    }
}

impl AgendaState {
    pub fn selected_course(&self) -> Option<&Course> {
        self.selected_course_id
            .as_ref()
            .and_then(|id| self.courses.get(id))
    }

    pub fn selected_course_mut(&mut self) -> Option<&mut Course> {
        match self.selected_course_id.as_ref() {
            Some(id) => self.courses.get_mut(id),
            None => None,
        }
    }

    /// Courses ordered by name, for listings.
    pub fn courses_by_name(&self) -> Vec<&Course> {
        let mut courses: Vec<&Course> = self.courses.values().collect();
        courses.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        courses
    }
}
