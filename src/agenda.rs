//! The application root: owns the state tree, the pass over the selected
//! course, and the persistence hook.
//!
//! Every mutating operation runs to completion, then saves. A failed save is
//! logged and otherwise ignored; marking and undoing never fail.

use crate::models::*;
use crate::sequencer::{Position, Sequencer, UndoRecord};
use crate::store::Persist;

pub struct Agenda {
    state: AgendaState,
    sequencer: Sequencer,
    /// Date for this session's marks only; never saved.
    pass_date: Option<String>,
    store: Option<Box<dyn Persist>>,
}

impl Agenda {
    pub fn new(state: AgendaState) -> Self {
        let sequencer = Sequencer::new(selected_roster(&state));
        Self {
            state,
            sequencer,
            pass_date: None,
            store: None,
        }
    }

    /// Attach the hook called with the full tree after each mutation.
    pub fn with_store(mut self, store: impl Persist + 'static) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    pub fn state(&self) -> &AgendaState {
        &self.state
    }

    pub fn selected_course(&self) -> Option<&Course> {
        self.state.selected_course()
    }

    pub fn selected_date(&self) -> &str {
        &self.state.selected_date
    }

    /// The date marks are recorded against: the session override if one is
    /// set, otherwise the selected date.
    pub fn pass_date(&self) -> &str {
        self.pass_date
            .as_deref()
            .unwrap_or(&self.state.selected_date)
    }

    /// Record marks against `date` for the rest of this session without
    /// touching the saved selected date. Empty clears the override.
    pub fn set_pass_date(&mut self, date: &str) {
        let date = date.trim();
        self.pass_date = (!date.is_empty()).then(|| date.to_string());
    }

    /// Persist the current tree through the attached store, if any.
    pub fn save(&self) {
        let Some(store) = &self.store else {
            return;
        };
        if let Err(e) = store.persist(&self.state) {
            tracing::warn!("Failed to save state: {:#}", e);
        }
    }

    /// Start a new pass over the selected course.
    pub fn reset_sequencer(&mut self) {
        let roster = selected_roster(&self.state);
        tracing::debug!(students = roster.len(), "Starting new roll-call pass");
        self.sequencer.reset(roster);
    }

    /// Reset the pass only if the selected roster's id sequence changed.
    fn sync_sequencer(&mut self) {
        let roster = selected_roster(&self.state);
        if self.sequencer.is_stale(&roster) {
            tracing::debug!(students = roster.len(), "Roster changed, restarting pass");
            self.sequencer.reset(roster);
        }
    }

    /// Replace the whole tree, as when importing a snapshot.
    pub fn replace_state(&mut self, state: AgendaState) {
        self.state = state;
        self.reset_sequencer();
        self.save();
    }

    // ============================================================
    // Selection
    // ============================================================

    pub fn select_course(&mut self, id: &CourseId) -> bool {
        if !self.state.courses.contains_key(id) {
            return false;
        }
        self.state.selected_course_id = Some(id.clone());
        self.sync_sequencer();
        self.save();
        true
    }

    /// Set the date marks are recorded against. Empty means today.
    pub fn set_date(&mut self, date: &str) {
        let date = date.trim();
        self.state.selected_date = if date.is_empty() {
            today_str()
        } else {
            date.to_string()
        };
        self.save();
    }

    // ============================================================
    // Course operations
    // ============================================================

    /// Create a course and select it. Blank names create nothing.
    pub fn create_course(&mut self, name: &str) -> Option<CourseId> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let id = CourseId::generate();
        self.state
            .courses
            .insert(id.clone(), Course::new(id.clone(), name));
        self.state.selected_course_id = Some(id.clone());
        self.sync_sequencer();
        self.save();
        Some(id)
    }

    pub fn rename_course(&mut self, id: &CourseId, name: &str) -> bool {
        let name = name.trim();
        let Some(course) = self.state.courses.get_mut(id) else {
            return false;
        };
        if !name.is_empty() {
            course.name = name.to_string();
        }
        self.save();
        true
    }

    pub fn delete_course(&mut self, id: &CourseId) -> bool {
        if self.state.courses.remove(id).is_none() {
            return false;
        }
        if self.state.selected_course_id.as_ref() == Some(id) {
            self.state.selected_course_id = None;
        }
        self.sync_sequencer();
        self.save();
        true
    }

    // ============================================================
    // Student operations (on the selected course)
    // ============================================================

    pub fn add_student(&mut self, name: &str) -> Option<StudentId> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let course = self.state.selected_course_mut()?;

        let id = StudentId::generate();
        course
            .students
            .insert(id.clone(), Student::new(id.clone(), name));
        self.sync_sequencer();
        self.save();
        Some(id)
    }

    /// Rename a student. Renaming may reorder the roster, which restarts the pass.
    pub fn rename_student(&mut self, id: &StudentId, name: &str) -> bool {
        let name = name.trim();
        let Some(student) = self
            .state
            .selected_course_mut()
            .and_then(|c| c.students.get_mut(id))
        else {
            return false;
        };
        if !name.is_empty() {
            student.name = name.to_string();
        }
        self.sync_sequencer();
        self.save();
        true
    }

    pub fn delete_student(&mut self, id: &StudentId) -> bool {
        let removed = self
            .state
            .selected_course_mut()
            .and_then(|c| c.students.remove(id))
            .is_some();
        if removed {
            self.sync_sequencer();
            self.save();
        }
        removed
    }

    // ============================================================
    // Roll call
    // ============================================================

    pub fn current_student(&self) -> Option<&Student> {
        let course = self.state.selected_course()?;
        self.sequencer.current_student(course)
    }

    pub fn position(&self) -> Position {
        self.sequencer.position()
    }

    pub fn is_complete(&self) -> bool {
        self.sequencer.is_complete()
    }

    /// Mark the current student on the pass date. No-op without one.
    pub fn mark(&mut self, status: Status) -> Option<StudentId> {
        let date = self.pass_date().to_string();
        let course = self.state.selected_course_mut()?;
        let id = self.sequencer.mark(course, status, &date)?;

        tracing::debug!(student = %id, status = status.as_str(), date = %date, "Marked");
        self.save();
        Some(id)
    }

    /// Undo the last mark of this pass. No-op when there is nothing to undo.
    pub fn undo(&mut self) -> Option<UndoRecord> {
        let course = self.state.selected_course_mut()?;
        let record = self.sequencer.undo(course)?;

        tracing::debug!(student = %record.id, status = record.status.as_str(), "Undid mark");
        self.save();
        Some(record)
    }
}

fn selected_roster(state: &AgendaState) -> Vec<StudentId> {
    state
        .selected_course()
        .map(Course::roster_ids)
        .unwrap_or_default()
}
