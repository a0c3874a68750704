//! Change record types.
//!
//! A [`Change`] describes one detected difference between the local
//! declaration and the remote gateway. The operation decides which resource
//! values exist, and the variant pins them to one concrete resource type.

use serde::{Deserialize, Serialize};

use crate::apisix::{Route, Service};
use crate::resource::{Resource, ResourceKind};

/// Kind of operation a change performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    /// The resource exists locally but not remotely.
    Create,
    /// The resource exists remotely but not locally.
    Delete,
    /// The resource exists on both sides with different content.
    Update,
}

/// An operation on one resource type.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation<T: Resource> {
    /// Create `new` on the gateway.
    Create {
        /// Desired representation.
        new: T,
    },
    /// Delete `old` from the gateway.
    Delete {
        /// Current remote representation.
        old: T,
    },
    /// Replace `old` with `new`.
    Update {
        /// Current remote representation.
        old: T,
        /// Desired representation.
        new: T,
    },
}

/// A single difference to describe or apply.
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    /// A change to a service.
    Service(Operation<Service>),
    /// A change to a route.
    Route(Operation<Route>),
}

impl<T: Resource> Operation<T> {
    /// Returns the operation kind.
    #[must_use]
    pub const fn kind(&self) -> OperationKind {
        match self {
            Self::Create { .. } => OperationKind::Create,
            Self::Delete { .. } => OperationKind::Delete,
            Self::Update { .. } => OperationKind::Update,
        }
    }

    /// Returns the name of the affected resource.
    ///
    /// Deletes report the remote name; creates and updates the local one.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Create { new } | Self::Update { new, .. } => new.name(),
            Self::Delete { old } => old.name(),
        }
    }
}

impl Change {
    /// Creates a change that adds `value` to the gateway.
    #[must_use]
    pub fn create<T: Resource>(value: T) -> Self
    where
        Self: From<Operation<T>>,
    {
        Operation::Create { new: value }.into()
    }

    /// Creates a change that removes `value` from the gateway.
    #[must_use]
    pub fn delete<T: Resource>(value: T) -> Self
    where
        Self: From<Operation<T>>,
    {
        Operation::Delete { old: value }.into()
    }

    /// Creates a change that replaces `old` with `new`.
    #[must_use]
    pub fn update<T: Resource>(old: T, new: T) -> Self
    where
        Self: From<Operation<T>>,
    {
        Operation::Update { old, new }.into()
    }

    /// Returns the kind of resource this change targets.
    #[must_use]
    pub const fn resource_kind(&self) -> ResourceKind {
        match self {
            Self::Service(_) => ResourceKind::Service,
            Self::Route(_) => ResourceKind::Route,
        }
    }

    /// Returns the operation kind.
    #[must_use]
    pub const fn operation_kind(&self) -> OperationKind {
        match self {
            Self::Service(op) => op.kind(),
            Self::Route(op) => op.kind(),
        }
    }

    /// Returns the name of the affected resource.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Service(op) => op.name(),
            Self::Route(op) => op.name(),
        }
    }
}

impl From<Operation<Service>> for Change {
    fn from(op: Operation<Service>) -> Self {
        Self::Service(op)
    }
}

impl From<Operation<Route>> for Change {
    fn from(op: Operation<Route>) -> Self {
        Self::Route(op)
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Create => "create",
            Self::Delete => "delete",
            Self::Update => "update",
        };
        write!(f, "{s}")
    }
}

impl std::fmt::Display for Change {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} \"{}\"",
            self.operation_kind(),
            self.resource_kind(),
            self.name()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_pick_variant() {
        let change = Change::create(Service::new("svc-a"));
        assert_eq!(change.resource_kind(), ResourceKind::Service);
        assert_eq!(change.operation_kind(), OperationKind::Create);

        let change = Change::delete(Route::new("r1"));
        assert_eq!(change.resource_kind(), ResourceKind::Route);
        assert_eq!(change.operation_kind(), OperationKind::Delete);
    }

    #[test]
    fn test_name_source_per_operation() {
        assert_eq!(Change::create(Route::new("local")).name(), "local");
        assert_eq!(Change::delete(Route::new("remote")).name(), "remote");
        assert_eq!(
            Change::update(Route::new("remote"), Route::new("local")).name(),
            "local"
        );
    }

    #[test]
    fn test_display_summary() {
        let change = Change::update(Service::new("svc-a"), Service::new("svc-a"));
        assert_eq!(change.to_string(), "update service \"svc-a\"");
    }
}
