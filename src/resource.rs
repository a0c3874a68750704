//! Resource kinds and the shared named-resource capability.
//!
//! Every gateway entity that can appear in a change implements [`Resource`],
//! which ties a concrete type to its [`ResourceKind`] and exposes the name
//! used for display and delete-by-name operations.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::str::FromStr;

/// The closed set of resource kinds managed by the gateway client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// An upstream service shared by routes.
    Service,
    /// A route matching requests to a service or upstream.
    Route,
}

impl ResourceKind {
    /// All kinds, in the order dependents should be created.
    pub const ALL: [Self; 2] = [Self::Service, Self::Route];

    /// Returns the lowercase name used in descriptions and change sets.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Service => "service",
            Self::Route => "route",
        }
    }

    /// Returns the admin API collection segment for this kind.
    #[must_use]
    pub const fn admin_path(self) -> &'static str {
        match self {
            Self::Service => "services",
            Self::Route => "routes",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown resource kind: {s}"))
    }
}

/// Returns true if `name` can address a resource as a single admin API path
/// segment.
///
/// Any other character is percent-encoded when the name is placed in a URL,
/// but empty, `.` and `..` segments would resolve to a different path.
#[must_use]
pub fn is_addressable_name(name: &str) -> bool {
    !matches!(name, "" | "." | "..")
}

/// A gateway entity that can be created, updated and deleted by name.
pub trait Resource:
    Serialize + DeserializeOwned + Clone + Debug + PartialEq + Send + Sync + 'static
{
    /// Kind tag of this resource type.
    const KIND: ResourceKind;

    /// Returns the identifying name of this resource.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_display_and_parse() {
        for kind in ResourceKind::ALL {
            assert_eq!(kind.as_str().parse::<ResourceKind>(), Ok(kind));
            assert_eq!(kind.to_string(), kind.as_str());
        }
        assert!("upstream".parse::<ResourceKind>().is_err());
    }

    #[test]
    fn test_admin_path() {
        assert_eq!(ResourceKind::Service.admin_path(), "services");
        assert_eq!(ResourceKind::Route.admin_path(), "routes");
    }

    #[test]
    fn test_addressable_names() {
        assert!(is_addressable_name("r1"));
        assert!(is_addressable_name("../services/svc-a"));
        assert!(is_addressable_name("..."));
        assert!(!is_addressable_name(""));
        assert!(!is_addressable_name("."));
        assert!(!is_addressable_name(".."));
    }

    #[test]
    fn test_kind_serde_name() {
        let json = serde_json::to_string(&ResourceKind::Route).expect("serialize kind");
        assert_eq!(json, "\"route\"");
    }
}
