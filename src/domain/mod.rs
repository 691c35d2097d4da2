//! Shared data model for the record and replay sides.
pub mod action;

pub use action::{ActionKind, ActionRecord, EventLog};
