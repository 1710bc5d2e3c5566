//! Roll-call attendance tracking.
//!
//! The core is the [`ledger`] (reversible per-student attendance records) and
//! the [`sequencer`] (one review pass over a roster with full undo). The
//! [`agenda::Agenda`] owns the state tree and wires both to a
//! [`store::Persist`] hook; [`db`] and [`snapshot`] provide the stores.

pub mod agenda;
pub mod config;
pub mod db;
pub mod ledger;
pub mod models;
pub mod render;
pub mod sequencer;
pub mod snapshot;
pub mod store;
