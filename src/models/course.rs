use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::student::{Student, StudentId};

/// Opaque identifier of a course.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseId(pub String);

impl CourseId {
    pub fn generate() -> Self {
        Self(format!("curso_{}", Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CourseId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A course and the students enrolled in it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Course {
    pub id: CourseId,
    pub name: String,
    #[serde(default)]
    pub students: BTreeMap<StudentId, Student>,
}

impl Course {
    pub fn new(id: CourseId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            students: BTreeMap::new(),
        }
    }

    /// The roster in review order: case-insensitive by name, ties broken by id.
    pub fn roster(&self) -> Vec<&Student> {
        let mut students: Vec<&Student> = self.students.values().collect();
        students.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.id.cmp(&b.id))
        });
        students
    }

    /// Ids of [`Course::roster`], in order. Two rosters are the same pass
    /// exactly when these sequences are equal.
    pub fn roster_ids(&self) -> Vec<StudentId> {
        self.roster().into_iter().map(|s| s.id.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_sorts_case_insensitively() {
        let mut course = Course::new(CourseId::from("c1"), "3B");
        for (id, name) in [("s1", "zoe"), ("s2", "Ana"), ("s3", "bruno")] {
            course
                .students
                .insert(StudentId::from(id), Student::new(StudentId::from(id), name));
        }

        let names: Vec<&str> = course.roster().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Ana", "bruno", "zoe"]);
    }

    #[test]
    fn test_roster_breaks_name_ties_by_id() {
        let mut course = Course::new(CourseId::from("c1"), "3B");
        for id in ["s2", "s1"] {
            course
                .students
                .insert(StudentId::from(id), Student::new(StudentId::from(id), "Ana"));
        }

        let ids = course.roster_ids();
        assert_eq!(ids, vec![StudentId::from("s1"), StudentId::from("s2")]);
    }

    #[test]
    fn test_generated_ids_are_prefixed_and_distinct() {
        let a = CourseId::generate();
        let b = CourseId::generate();
        assert!(a.as_str().starts_with("curso_"));
        assert_ne!(a, b);
    }
}
