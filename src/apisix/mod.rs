//! APISIX admin API integration module.
//!
//! This module provides the resource types managed on an APISIX gateway and
//! the admin API client that creates, updates and deletes them.

mod client;
mod types;

pub use client::{ApisixClient, ResourceEndpoint};
pub use types::{Route, Service, Upstream, UpstreamNode, UpstreamTimeout};
