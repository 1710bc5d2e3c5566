//! Plain-text rendering for the CLI.

use crate::ledger::Ledger;
use crate::models::{Course, Status, Student};
use crate::sequencer::Position;

const PRESENT: char = '✓';
const ABSENT: char = '✗';
const LATER: char = '…';

/// Get the symbol for a recorded status.
pub fn status_symbol(status: Status) -> char {
    match status {
        Status::Present => PRESENT,
        Status::Absent => ABSENT,
        Status::Later => LATER,
    }
}

/// Render a course roster as a table, in roster order.
///
/// Example output:
/// ```text
/// 3°B - Matemática
///   Name          P    A    L     %
///   Ana García    3    2    1   60%
///   Bruno Díaz    0    0    0    0%
/// ```
pub fn render_roster(course: &Course) -> String {
    let roster = course.roster();
    let width = roster
        .iter()
        .map(|s| s.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Name".len());

    let mut output = String::new();
    output.push_str(&course.name);
    output.push('\n');

    if roster.is_empty() {
        output.push_str("  (no students)\n");
        return output;
    }

    output.push_str(&format!(
        "  {:<width$}  {:>3}  {:>3}  {:>3}  {:>4}\n",
        "Name",
        "P",
        "A",
        "L",
        "%",
        width = width
    ));
    for student in roster {
        output.push_str(&render_row(student, width));
    }
    output
}

fn render_row(student: &Student, width: usize) -> String {
    format!(
        "  {:<width$}  {:>3}  {:>3}  {:>3}  {:>3}%\n",
        student.name,
        student.stats.present,
        student.stats.absent,
        student.stats.later,
        Ledger::pct(&student.stats),
        width = width
    )
}

/// Render the roll-call card for the current student.
pub fn render_card(student: Option<&Student>, position: Position, date: &str) -> String {
    match student {
        Some(student) => format!(
            "[{}/{}] {}  ({}% present)  {}\n",
            position.ordinal(),
            position.total,
            student.name,
            Ledger::pct(&student.stats),
            date
        ),
        None if position.total == 0 => "No students in this course.\n".to_string(),
        None => format!("Roll call complete: {} students.\n", position.total),
    }
}

/// Render the last few history entries, newest last.
pub fn render_history(student: &Student, limit: usize) -> String {
    let skip = student.history.len().saturating_sub(limit);
    student
        .history
        .iter()
        .skip(skip)
        .map(|h| format!("{} {}", status_symbol(h.status), h.date))
        .collect::<Vec<_>>()
        .join("  ")
}
