//! APISIX resource types.
//!
//! These types mirror the admin API representation of services and routes.
//! Field order is declaration order, so serialized output is stable.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::resource::{Resource, ResourceKind};

/// Default load-balancing policy.
const DEFAULT_LB_TYPE: &str = "roundrobin";

/// A gateway service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Service {
    /// Admin API identifier (the name is used when absent).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Service name.
    pub name: String,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Labels attached to the service.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    /// Hosts this service answers for.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hosts: Vec<String>,
    /// Upstream the service proxies to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upstream: Option<Upstream>,
    /// Plugin configuration keyed by plugin name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub plugins: BTreeMap<String, serde_json::Value>,
}

/// An upstream: a load-balanced set of backend nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Upstream {
    /// Load-balancing policy.
    #[serde(rename = "type", default = "default_lb_type")]
    pub lb_type: String,
    /// Backend nodes.
    #[serde(default)]
    pub nodes: Vec<UpstreamNode>,
    /// Per-phase timeouts in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<UpstreamTimeout>,
    /// Number of retries on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retries: Option<u32>,
    /// Scheme used to talk to the nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
}

/// A single backend node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamNode {
    /// Host name or address.
    pub host: String,
    /// Port.
    pub port: u16,
    /// Relative weight.
    #[serde(default = "default_weight")]
    pub weight: u32,
}

/// Upstream timeouts, in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpstreamTimeout {
    /// Connect timeout.
    pub connect: f64,
    /// Send timeout.
    pub send: f64,
    /// Read timeout.
    pub read: f64,
}

/// A gateway route.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Admin API identifier (the name is used when absent).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Route name.
    pub name: String,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Labels attached to the route.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    /// HTTP methods matched by the route.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<String>,
    /// Request paths matched by the route.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub uris: Vec<String>,
    /// Hosts matched by the route.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hosts: Vec<String>,
    /// Match priority.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
    /// Service the route forwards to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    /// Upstream the route forwards to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upstream_id: Option<String>,
    /// Plugin configuration keyed by plugin name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub plugins: BTreeMap<String, serde_json::Value>,
}

fn default_lb_type() -> String {
    String::from(DEFAULT_LB_TYPE)
}

const fn default_weight() -> u32 {
    1
}

impl Resource for Service {
    const KIND: ResourceKind = ResourceKind::Service;

    fn name(&self) -> &str {
        &self.name
    }
}

impl Resource for Route {
    const KIND: ResourceKind = ResourceKind::Route;

    fn name(&self) -> &str {
        &self.name
    }
}

impl Service {
    /// Creates a service with only a name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the upstream.
    #[must_use]
    pub fn with_upstream(mut self, upstream: Upstream) -> Self {
        self.upstream = Some(upstream);
        self
    }

    /// Adds a host.
    #[must_use]
    pub fn with_host(mut self, host: &str) -> Self {
        self.hosts.push(host.to_string());
        self
    }
}

impl Route {
    /// Creates a route with only a name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Adds a matched path.
    #[must_use]
    pub fn with_uri(mut self, uri: &str) -> Self {
        self.uris.push(uri.to_string());
        self
    }

    /// Sets the service the route forwards to.
    #[must_use]
    pub fn with_service_id(mut self, service_id: &str) -> Self {
        self.service_id = Some(service_id.to_string());
        self
    }

    /// Sets the upstream the route forwards to.
    #[must_use]
    pub fn with_upstream_id(mut self, upstream_id: &str) -> Self {
        self.upstream_id = Some(upstream_id.to_string());
        self
    }
}

impl Upstream {
    /// Creates a round-robin upstream over the given nodes.
    #[must_use]
    pub fn round_robin(nodes: Vec<UpstreamNode>) -> Self {
        Self {
            lb_type: default_lb_type(),
            nodes,
            timeout: None,
            retries: None,
            scheme: None,
        }
    }
}

impl Default for Upstream {
    fn default() -> Self {
        Self::round_robin(Vec::new())
    }
}

impl UpstreamNode {
    /// Creates a node with weight 1.
    #[must_use]
    pub fn new(host: &str, port: u16) -> Self {
        Self {
            host: host.to_string(),
            port,
            weight: default_weight(),
        }
    }
}
