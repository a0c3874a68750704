//! Change records.
//!
//! This module defines the structured description of a single difference
//! between local and remote state, its textual rendering, and its
//! application through a gateway client.

mod apply;
mod describe;
mod record;

pub use describe::{to_indented_json, unified_diff};
pub use record::{Change, Operation, OperationKind};
