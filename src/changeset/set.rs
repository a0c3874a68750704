//! Decoded change sets.

use serde::Serialize;

use crate::change::{Change, OperationKind};
use crate::resource::ResourceKind;

/// An ordered list of changes decoded from a change-set document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeSet {
    /// Changes with a known resource kind, in document order.
    pub changes: Vec<Change>,
    /// Entries whose resource kind is not managed by this client.
    pub skipped: Vec<SkippedChange>,
}

/// An entry left out of a change set because of its resource kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedChange {
    /// Position of the entry in the document.
    pub index: usize,
    /// The unrecognized resource type.
    pub resource_type: String,
}

impl ChangeSet {
    /// Returns the number of applicable changes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Returns true if there is nothing to apply.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Counts changes of one operation kind.
    #[must_use]
    pub fn count(&self, operation: OperationKind) -> usize {
        self.changes
            .iter()
            .filter(|c| c.operation_kind() == operation)
            .count()
    }

    /// Returns the changes targeting one resource kind.
    pub fn of_kind(&self, kind: ResourceKind) -> impl Iterator<Item = &Change> {
        self.changes.iter().filter(move |c| c.resource_kind() == kind)
    }
}

impl std::fmt::Display for ChangeSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} to create, {} to update, {} to delete",
            self.count(OperationKind::Create),
            self.count(OperationKind::Update),
            self.count(OperationKind::Delete)
        )?;
        if !self.skipped.is_empty() {
            write!(f, " ({} skipped)", self.skipped.len())?;
        }
        Ok(())
    }
}
