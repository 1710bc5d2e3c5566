//! Domain models for roll call.
//!
//! # Core Concepts
//!
//! ## Persisted Entities
//!
//! - [`Course`]: A named roster of students.
//! - [`Student`]: A roster member with cumulative [`Stats`] and an append-only
//!   history of [`AttendanceEvent`]s.
//! - [`AgendaState`]: The whole tree, plus the selected course and date.
//!
//! ## Ephemeral State
//!
//! Traversal state for a pass (order, cursor, undo stack) lives in
//! [`crate::sequencer::Sequencer`] and is never persisted.

mod attendance;
mod course;
mod state;
mod student;

pub use attendance::*;
pub use course::*;
pub use state::*;
pub use student::*;
