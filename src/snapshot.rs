//! JSON snapshot import/export.
//!
//! The snapshot is the whole [`AgendaState`] with camelCase top-level keys:
//!
//! ```json
//! {
//!   "courses": { "<id>": { "id": "...", "name": "...", "students": { ... } } },
//!   "selectedCourseId": "<id>",
//!   "selectedDate": "2025-08-02"
//! }
//! ```
//!
//! Import is forgiving about shape and strict only about syntax: anything that
//! parses as JSON yields a usable state.

use std::collections::BTreeMap;

use serde_json::Value;
use thiserror::Error;

use crate::models::{
    today_str, AgendaState, AttendanceEvent, Course, CourseId, Stats, Student, StudentId,
};

/// File name suggested for exported backups.
pub const DEFAULT_BACKUP_FILE: &str = "agenda_backup.json";

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("invalid snapshot: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("failed to serialize snapshot: {0}")]
    Serialize(serde_json::Error),
}

/// Serialize the state as pretty-printed JSON.
pub fn export(state: &AgendaState) -> Result<String, SnapshotError> {
    serde_json::to_string_pretty(state).map_err(SnapshotError::Serialize)
}

/// Parse a snapshot.
///
/// Only malformed JSON is an error. Map keys are the ids: a course or student
/// takes the key it is stored under, whatever its inner `id` says. Entries are
/// read one at a time, so a bad history entry or student is skipped on its
/// own and never takes the rest of its course with it. A missing or
/// non-object `courses` yields no courses, and a missing selection or date
/// falls back to none and today.
pub fn import(text: &str) -> Result<AgendaState, SnapshotError> {
    let parsed: Value = serde_json::from_str(text)?;

    let courses = match parsed.get("courses") {
        Some(Value::Object(map)) => map
            .iter()
            .filter_map(|(key, value)| import_course(key, value))
            .map(|course| (course.id.clone(), course))
            .collect(),
        _ => BTreeMap::new(),
    };

    let selected_course_id = parsed
        .get("selectedCourseId")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(CourseId::from);

    let selected_date = parsed
        .get("selectedDate")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(today_str);

    Ok(AgendaState {
        courses,
        selected_course_id,
        selected_date,
    })
}

fn import_course(key: &str, value: &Value) -> Option<Course> {
    let Some(name) = value.get("name").and_then(Value::as_str) else {
        tracing::warn!("Dropping course {} without a name", key);
        return None;
    };

    let mut course = Course::new(CourseId::from(key), name);
    if let Some(Value::Object(students)) = value.get("students") {
        for (student_key, student) in students {
            if let Some(student) = import_student(key, student_key, student) {
                course.students.insert(student.id.clone(), student);
            }
        }
    }
    Some(course)
}

fn import_student(course_key: &str, key: &str, value: &Value) -> Option<Student> {
    let Some(name) = value.get("name").and_then(Value::as_str) else {
        tracing::warn!("Dropping student {} of course {} without a name", key, course_key);
        return None;
    };

    let mut student = Student::new(StudentId::from(key), name);
    student.stats = value
        .get("stats")
        .and_then(|stats| serde_json::from_value::<Stats>(stats.clone()).ok())
        .unwrap_or_default();

    let entries = match value.get("history") {
        Some(Value::Array(entries)) => entries.as_slice(),
        _ => &[],
    };
    let mut skipped = 0;
    for entry in entries {
        match serde_json::from_value::<AttendanceEvent>(entry.clone()) {
            Ok(event) => student.history.push(event),
            Err(e) => {
                tracing::warn!("Skipping history entry of student {}: {}", key, e);
                skipped += 1;
            }
        }
    }
    // Tallies counted the skipped entries too.
    if skipped > 0 {
        student.stats = Stats::from_history(&student.history);
    }

    Some(student)
}
