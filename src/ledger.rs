//! The attendance ledger: the reversible record of marks per student.
//!
//! Every mutation touches `history` and `stats` together, so that
//! `stats.X == count(history, X)` holds for every status after each call.
//! None of these operations fail; a reversal with nothing to reverse is a
//! no-op.

use crate::models::{today_str, AttendanceEvent, Stats, Status, Student};

pub struct Ledger;

impl Ledger {
    /// Append `{date, status}` to the student's history and bump the matching
    /// counter. An absent or empty `date` means today.
    pub fn record_event(student: &mut Student, status: Status, date: Option<&str>) {
        let date = match date {
            Some(d) if !d.is_empty() => d.to_string(),
            _ => today_str(),
        };

        student.history.push(AttendanceEvent { date, status });
        *student.stats.counter_mut(status) += 1;
    }

    /// Remove the most recent history entry matching `status` (and `date`, if
    /// given) and decrement its counter, floored at zero.
    ///
    /// Returns whether an entry was removed.
    pub fn reverse_event(student: &mut Student, status: Status, date: Option<&str>) -> bool {
        let date = date.filter(|d| !d.is_empty());
        let found = student
            .history
            .iter()
            .rposition(|h| h.status == status && date.map_or(true, |d| h.date == d));

        let Some(index) = found else {
            return false;
        };

        student.history.remove(index);
        let counter = student.stats.counter_mut(status);
        *counter = counter.saturating_sub(1);
        true
    }

    /// Share of decided marks that were `present`, as a whole percentage.
    ///
    /// `later` is not a decision and never enters the denominator. Halves round
    /// up, so 1 of 8 is 13%.
    pub fn pct(stats: &Stats) -> u32 {
        let decided = u64::from(stats.present) + u64::from(stats.absent);
        if decided == 0 {
            return 0;
        }
        let present = u64::from(stats.present);
        ((present * 200 + decided) / (decided * 2)) as u32
    }
}
