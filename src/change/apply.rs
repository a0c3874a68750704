//! Applying changes to a remote gateway.
//!
//! Each change maps to exactly one sub-client call. Failures are wrapped with
//! the resource kind and returned; nothing is retried or rolled back.

use tracing::debug;

use crate::client::{Cluster, ResourceClient};
use crate::error::{AdcError, Result};
use crate::resource::Resource;

use super::record::{Change, Operation};

impl<T: Resource> Operation<T> {
    /// Applies this operation through the sub-client for `T`.
    ///
    /// # Errors
    ///
    /// Returns [`AdcError::Apply`] wrapping the sub-client error.
    pub async fn apply(&self, client: &dyn ResourceClient<T>) -> Result<()> {
        debug!("Applying {} {} \"{}\"", self.kind(), T::KIND, self.name());

        let result = match self {
            Self::Create { new } => client.create(new).await.map(|_| ()),
            Self::Delete { old } => client.delete(old.name()).await,
            Self::Update { new, .. } => client.update(new).await.map(|_| ()),
        };

        result.map_err(|source| AdcError::apply(T::KIND, source))
    }
}

impl Change {
    /// Applies this change to the gateway behind `cluster`.
    ///
    /// # Errors
    ///
    /// Returns [`AdcError::Apply`] if the remote call fails.
    pub async fn apply(&self, cluster: &dyn Cluster) -> Result<()> {
        match self {
            Self::Service(op) => op.apply(cluster.services()).await,
            Self::Route(op) => op.apply(cluster.routes()).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apisix::{Route, Service};
    use crate::client::mock::MockCluster;
    use crate::error::ClusterError;
    use crate::resource::ResourceKind;
    use std::error::Error as _;

    #[tokio::test]
    async fn test_create_calls_service_create_once() {
        let mut cluster = MockCluster::new();
        cluster
            .services
            .expect_create()
            .withf(|value: &Service| value.name == "svc-a")
            .times(1)
            .returning(|value| Ok(value.clone()));

        Change::create(Service::new("svc-a"))
            .apply(&cluster)
            .await
            .expect("apply should succeed");
    }

    #[tokio::test]
    async fn test_delete_uses_old_name() {
        let mut cluster = MockCluster::new();
        cluster
            .routes
            .expect_delete()
            .withf(|name: &str| name == "r-old")
            .times(1)
            .returning(|_| Ok(()));

        Change::delete(Route::new("r-old"))
            .apply(&cluster)
            .await
            .expect("apply should succeed");
    }

    #[tokio::test]
    async fn test_update_sends_new_value() {
        let mut cluster = MockCluster::new();
        cluster
            .routes
            .expect_update()
            .withf(|value: &Route| value.upstream_id.as_deref() == Some("2"))
            .times(1)
            .returning(|value| Ok(value.clone()));

        let old = Route::new("r1").with_upstream_id("1");
        let new = Route::new("r1").with_upstream_id("2");
        Change::update(old, new)
            .apply(&cluster)
            .await
            .expect("apply should succeed");
    }

    #[tokio::test]
    async fn test_failure_is_wrapped_with_kind() {
        let mut cluster = MockCluster::new();
        cluster
            .routes
            .expect_create()
            .times(1)
            .returning(|_| Err(ClusterError::api_error(400, "bad route")));

        let err = Change::create(Route::new("r1"))
            .apply(&cluster)
            .await
            .expect_err("apply should fail");

        assert!(matches!(
            err,
            AdcError::Apply {
                kind: ResourceKind::Route,
                source: ClusterError::Api { status: 400, .. }
            }
        ));
        assert_eq!(err.to_string(), "failed to apply route");
        assert!(err.source().is_some());
    }

    #[tokio::test]
    async fn test_update_failure_is_wrapped() {
        let mut cluster = MockCluster::new();
        cluster
            .services
            .expect_update()
            .times(1)
            .returning(|_| Err(ClusterError::Unauthorized));

        let err = Change::update(Service::new("svc-a"), Service::new("svc-a"))
            .apply(&cluster)
            .await
            .expect_err("apply should fail");

        assert_eq!(err.to_string(), "failed to apply service");
    }
}
