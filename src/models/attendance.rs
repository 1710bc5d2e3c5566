use serde::{Deserialize, Serialize};

/// The decision recorded for a student during a roll-call pass.
///
/// - `Present`: attended on the given date
/// - `Absent`: did not attend on the given date
/// - `Later`: decision postponed; the student is moved to the end of the pass
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Present,
    Absent,
    Later,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Present, Status::Absent, Status::Later];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Absent => "absent",
            Self::Later => "later",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "present" => Some(Self::Present),
            "absent" => Some(Self::Absent),
            "later" => Some(Self::Later),
            _ => None,
        }
    }
}

/// One entry of a student's append-only attendance history.
///
/// `date` is a calendar date string (`YYYY-MM-DD`). It is kept as the raw
/// string so that snapshots round-trip byte for byte.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttendanceEvent {
    pub date: String,
    pub status: Status,
}

/// Cumulative tallies for a student.
///
/// This is a cache of [`AttendanceEvent`] counts; every counter must equal the
/// number of history entries with the matching status.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Stats {
    pub present: u32,
    pub absent: u32,
    pub later: u32,
}

impl Stats {
    pub fn counter_mut(&mut self, status: Status) -> &mut u32 {
        match status {
            Status::Present => &mut self.present,
            Status::Absent => &mut self.absent,
            Status::Later => &mut self.later,
        }
    }

    /// Recompute tallies from a history.
    pub fn from_history(history: &[AttendanceEvent]) -> Self {
        let mut stats = Self::default();
        for event in history {
            *stats.counter_mut(event.status) += 1;
        }
        stats
    }
}

/// Deserialize stats leniently: anything that isn't a stats object becomes zeros.
pub(crate) fn lenient_stats<'de, D>(deserializer: D) -> Result<Stats, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}
