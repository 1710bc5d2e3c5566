//! Roll-call sequencing: one review pass over a roster.
//!
//! A [`Sequencer`] owns the traversal order, the cursor and an undo stack for
//! a single pass. It never owns students; every operation that touches the
//! ledger takes the [`StudentStore`] holding them.
//!
//! # Lifecycle
//!
//! - **Initial**: `order` is the roster as given, cursor 0, nothing to undo.
//! - **Active**: `cursor < order.len()`; `order[cursor]` is the current student.
//! - **Completed**: `cursor == order.len()`; still undoable until reset.
//!
//! Out-of-range calls (marking with no current student, undoing with an empty
//! stack) are silent no-ops.

use crate::ledger::Ledger;
use crate::models::{Course, Status, Student, StudentId};

/// Where students live while a pass runs over them.
pub trait StudentStore {
    fn student(&self, id: &StudentId) -> Option<&Student>;
    fn student_mut(&mut self, id: &StudentId) -> Option<&mut Student>;
}

impl StudentStore for Course {
    fn student(&self, id: &StudentId) -> Option<&Student> {
        self.students.get(id)
    }

    fn student_mut(&mut self, id: &StudentId) -> Option<&mut Student> {
        self.students.get_mut(id)
    }
}

/// Everything needed to invert exactly one mark.
///
/// For `present`/`absent`, `from_index == to_index` and only the cursor moved.
/// For `later`, the student went from `from_index` to `to_index` (the end).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoRecord {
    pub id: StudentId,
    pub status: Status,
    pub date: String,
    pub from_index: usize,
    pub to_index: usize,
}

/// Progress through a pass. `index` counts students already resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub index: usize,
    pub total: usize,
}

impl Position {
    /// One-based position of the current card, capped at the total.
    pub fn ordinal(&self) -> usize {
        (self.index + 1).min(self.total)
    }
}

#[derive(Debug, Clone)]
pub struct Sequencer {
    roster: Vec<StudentId>,
    order: Vec<StudentId>,
    cursor: usize,
    undo_stack: Vec<UndoRecord>,
}

impl Sequencer {
    /// Start a pass over `roster`, in the order given.
    pub fn new(roster: Vec<StudentId>) -> Self {
        Self {
            order: roster.clone(),
            roster,
            cursor: 0,
            undo_stack: Vec::new(),
        }
    }

    /// Go back to Initial over `roster`, dropping order, cursor and undo history.
    pub fn reset(&mut self, roster: Vec<StudentId>) {
        *self = Self::new(roster);
    }

    /// Whether `roster` is a different id sequence than the one this pass started from.
    pub fn is_stale(&self, roster: &[StudentId]) -> bool {
        self.roster.as_slice() != roster
    }

    pub fn current_id(&self) -> Option<&StudentId> {
        self.order.get(self.cursor)
    }

    pub fn current_student<'a, S: StudentStore>(&self, store: &'a S) -> Option<&'a Student> {
        self.current_id().and_then(|id| store.student(id))
    }

    pub fn position(&self) -> Position {
        Position {
            index: self.cursor,
            total: self.order.len(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.cursor >= self.order.len()
    }

    pub fn order(&self) -> &[StudentId] {
        &self.order
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Record `status` for the current student on `date` and move on.
    ///
    /// `later` sends the student to the end of the pass without advancing the
    /// cursor; `present` and `absent` advance it. Returns the marked student's
    /// id, or `None` when there was nobody to mark.
    pub fn mark<S: StudentStore>(
        &mut self,
        store: &mut S,
        status: Status,
        date: &str,
    ) -> Option<StudentId> {
        let id = self.current_id()?.clone();
        let student = store.student_mut(&id)?;

        Ledger::record_event(student, status, Some(date));
        // Keep the record in terms of the date actually written.
        let date = student
            .history
            .last()
            .map(|h| h.date.clone())
            .unwrap_or_default();

        let from = self.cursor;
        let to = if status == Status::Later {
            let moved = self.order.remove(from);
            self.order.push(moved);
            self.order.len() - 1
        } else {
            self.cursor = (self.cursor + 1).min(self.order.len());
            from
        };

        self.undo_stack.push(UndoRecord {
            id: id.clone(),
            status,
            date,
            from_index: from,
            to_index: to,
        });

        Some(id)
    }

    /// Invert the most recent mark: reverse its ledger entry and restore the
    /// order and cursor it started from. Returns the popped record.
    pub fn undo<S: StudentStore>(&mut self, store: &mut S) -> Option<UndoRecord> {
        let record = self.undo_stack.pop()?;

        if let Some(student) = store.student_mut(&record.id) {
            Ledger::reverse_event(student, record.status, Some(&record.date));
        }

        if record.status == Status::Later {
            if record.to_index < self.order.len() && record.from_index < self.order.len() {
                let moved = self.order.remove(record.to_index);
                self.order.insert(record.from_index, moved);
            }
            self.cursor = record.from_index.min(self.order.len());
        } else {
            self.cursor = self.cursor.saturating_sub(1);
        }

        Some(record)
    }
}
