//! Data models
//!
//! This module contains the data structures for the agenda dataset as
//! produced by the external extraction process. Field names on the wire are
//! the data source's own; everything else in the crate works with the
//! idiomatic Rust names.

mod agenda;

pub use agenda::{AgendaItem, Attachment, HistoryEntry, Vote, AFFIRMATIVE_VOTE};
