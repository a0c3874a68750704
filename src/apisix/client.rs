//! APISIX admin API client implementation.
//!
//! Every resource is addressed by its name: create and update both `PUT`
//! the full representation to `/apisix/admin/<collection>/<name>`, delete
//! removes the same path. The name is always one percent-encoded segment.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;
use std::marker::PhantomData;
use std::time::Duration;
use tracing::{debug, trace};

use crate::client::{Cluster, ResourceClient};
use crate::config::ClusterConfig;
use crate::error::{ClusterError, ConfigError, Result};
use crate::resource::{Resource, ResourceKind, is_addressable_name};

use super::types::{Route, Service};

/// Admin API path segments.
const ADMIN_PREFIX: [&str; 2] = ["apisix", "admin"];

/// Header carrying the admin key.
const API_KEY_HEADER: &str = "X-API-KEY";

/// Admin API client for one gateway.
#[derive(Debug, Clone)]
pub struct ApisixClient {
    /// Shared HTTP transport.
    transport: Transport,
    /// Service sub-client.
    services: ResourceEndpoint<Service>,
    /// Route sub-client.
    routes: ResourceEndpoint<Route>,
}

/// Sub-client for one resource collection.
#[derive(Debug, Clone)]
pub struct ResourceEndpoint<T> {
    transport: Transport,
    _resource: PhantomData<fn() -> T>,
}

/// HTTP client plus the address and credentials it talks to.
#[derive(Debug, Clone)]
struct Transport {
    client: Client,
    base_url: Url,
    api_key: String,
}

/// Envelope of a single-object admin response.
#[derive(Debug, Deserialize)]
struct AdminResponse<T> {
    #[serde(default)]
    key: Option<String>,
    value: T,
}

/// Admin API error body.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error_msg: String,
}

impl ApisixClient {
    /// Creates a client for the configured gateway.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: &ClusterConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ClusterError::network(format!("Failed to create HTTP client: {e}")))?;

        let base_url = Url::parse(&config.server)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| ConfigError::InvalidServer {
                server: config.server.clone(),
            })?;

        let transport = Transport {
            client,
            base_url,
            api_key: config.token.clone(),
        };

        Ok(Self {
            services: ResourceEndpoint::new(transport.clone()),
            routes: ResourceEndpoint::new(transport.clone()),
            transport,
        })
    }

    /// Checks that the admin API is reachable and accepts the admin key.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or is rejected.
    pub async fn ping(&self) -> Result<()> {
        let url = self
            .transport
            .admin_url(&[ResourceKind::Route.admin_path()])?;
        debug!("Pinging gateway at {url}");

        let response = self.transport.send(self.transport.client.get(url)).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(api_error(response).await.into());
        }

        Ok(())
    }
}

impl Cluster for ApisixClient {
    fn services(&self) -> &dyn ResourceClient<Service> {
        &self.services
    }

    fn routes(&self) -> &dyn ResourceClient<Route> {
        &self.routes
    }
}

impl<T: Resource> ResourceEndpoint<T> {
    const fn new(transport: Transport) -> Self {
        Self {
            transport,
            _resource: PhantomData,
        }
    }

    /// Stores the full representation of `value` under its name.
    async fn put(&self, value: &T) -> std::result::Result<T, ClusterError> {
        let name = value.name();
        let url = self.transport.resource_url(T::KIND, name)?;
        debug!("PUT {url}");

        let response = self
            .transport
            .send(self.transport.client.put(url).json(value))
            .await?;

        if !response.status().is_success() {
            return Err(error_for(response, T::KIND, name).await);
        }

        let body: AdminResponse<T> = response.json().await.map_err(|e| {
            ClusterError::invalid_response(format!("Failed to parse response: {e}"))
        })?;

        trace!("Stored {} at {:?}", T::KIND, body.key);
        Ok(body.value)
    }
}

#[async_trait]
impl<T: Resource> ResourceClient<T> for ResourceEndpoint<T> {
    async fn create(&self, value: &T) -> std::result::Result<T, ClusterError> {
        self.put(value).await
    }

    async fn delete(&self, name: &str) -> std::result::Result<(), ClusterError> {
        let url = self.transport.resource_url(T::KIND, name)?;
        debug!("DELETE {url}");

        let response = self.transport.send(self.transport.client.delete(url)).await?;
        if !response.status().is_success() {
            return Err(error_for(response, T::KIND, name).await);
        }

        Ok(())
    }

    async fn update(&self, value: &T) -> std::result::Result<T, ClusterError> {
        self.put(value).await
    }
}

impl Transport {
    /// Builds the URL of one named resource.
    fn resource_url(&self, kind: ResourceKind, name: &str) -> std::result::Result<Url, ClusterError> {
        if !is_addressable_name(name) {
            return Err(ClusterError::invalid_request(format!(
                "{kind} name \"{name}\" cannot address a resource"
            )));
        }

        self.admin_url(&[kind.admin_path(), name])
    }

    /// Appends `segments` below the admin prefix, each percent-encoded as a
    /// single path segment.
    fn admin_url(&self, segments: &[&str]) -> std::result::Result<Url, ClusterError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                ClusterError::invalid_request(format!(
                    "gateway address {} cannot carry a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(ADMIN_PREFIX)
            .extend(segments);

        Ok(url)
    }

    /// Sends an authenticated request, rejecting auth failures.
    async fn send(&self, request: RequestBuilder) -> std::result::Result<Response, ClusterError> {
        let response = request
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| ClusterError::network(format!("Request failed: {e}")))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ClusterError::Unauthorized);
        }

        Ok(response)
    }
}

/// Maps a failed response for a named resource.
async fn error_for(response: Response, kind: ResourceKind, name: &str) -> ClusterError {
    if response.status() == StatusCode::NOT_FOUND {
        return ClusterError::NotFound {
            kind,
            name: name.to_string(),
        };
    }

    api_error(response).await
}

async fn api_error(response: Response) -> ClusterError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body).map_or(body, |e| e.error_msg);

    ClusterError::api_error(status, message)
}
