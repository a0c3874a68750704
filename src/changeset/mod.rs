//! Change-set documents.
//!
//! A change set is the serialized form of the changes produced by a diff
//! between local declarations and the gateway. This module loads such
//! documents into typed [`Change`](crate::change::Change) values.

mod parser;
mod set;

pub use parser::ChangeSetParser;
pub use set::{ChangeSet, SkippedChange};
