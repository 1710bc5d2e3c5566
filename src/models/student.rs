use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::attendance::{lenient_stats, AttendanceEvent, Stats};

/// Opaque identifier of a student, stable for the student's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentId(pub String);

impl StudentId {
    pub fn generate() -> Self {
        Self(format!("alumno_{}", Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StudentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A student on a course roster, with their attendance record.
///
/// `history` is append-only from the point of view of marking: entries are
/// only ever pushed at the end or removed by a reversal, never reordered.
/// `stats` caches the per-status counts of `history`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    #[serde(default, deserialize_with = "lenient_stats")]
    pub stats: Stats,
    #[serde(default)]
    pub history: Vec<AttendanceEvent>,
}

impl Student {
    /// A new student with an empty record.
    pub fn new(id: StudentId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            stats: Stats::default(),
            history: Vec::new(),
        }
    }
}
