//! Remote gateway client interface.
//!
//! A [`Cluster`] hands out one [`ResourceClient`] per resource kind. Changes
//! are applied through these traits, so any gateway backend (or a test double)
//! can sit behind them.

use async_trait::async_trait;

use crate::apisix::{Route, Service};
use crate::error::ClusterError;
use crate::resource::Resource;

/// Sub-client scoped to operations on one resource type.
#[async_trait]
pub trait ResourceClient<T: Resource>: Send + Sync {
    /// Creates a resource, returning the gateway's stored representation.
    async fn create(&self, value: &T) -> Result<T, ClusterError>;

    /// Deletes the resource with the given name.
    async fn delete(&self, name: &str) -> Result<(), ClusterError>;

    /// Updates a resource, returning the gateway's stored representation.
    async fn update(&self, value: &T) -> Result<T, ClusterError>;
}

/// Handle to a remote gateway.
pub trait Cluster: Send + Sync {
    /// Returns the service sub-client.
    fn services(&self) -> &dyn ResourceClient<Service>;

    /// Returns the route sub-client.
    fn routes(&self) -> &dyn ResourceClient<Route>;
}
