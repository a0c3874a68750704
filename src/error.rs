//! Error types for the change pipeline.
//!
//! This module provides the error hierarchy for every stage a change goes
//! through: decoding a change set, describing a change, talking to the
//! gateway admin API, and applying a change.

use std::error::Error as StdError;
use std::path::PathBuf;
use thiserror::Error;

use crate::resource::ResourceKind;

/// The main error type for the crate.
#[derive(Debug, Error)]
pub enum AdcError {
    /// A resource value could not be serialized for diffing.
    #[error("failed to serialize resource: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A change could not be applied to the remote gateway.
    #[error("failed to apply {kind}")]
    Apply {
        /// Kind of the resource the change targeted.
        kind: ResourceKind,
        /// Underlying client failure.
        #[source]
        source: ClusterError,
    },

    /// Change-set decoding errors.
    #[error("Change set error: {0}")]
    ChangeSet(#[from] ChangeSetError),

    /// Client configuration errors.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Gateway errors outside of a change application.
    #[error("Gateway error: {0}")]
    Cluster(#[from] ClusterError),

    /// IO errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors returned by a gateway sub-client.
#[derive(Debug, Error)]
pub enum ClusterError {
    /// The request never produced a response.
    #[error("network error communicating with gateway: {message}")]
    Network {
        /// Description of the network error.
        message: String,
    },

    /// The admin key was rejected.
    #[error("gateway rejected the admin key")]
    Unauthorized,

    /// The addressed resource does not exist.
    #[error("{kind} not found: {name}")]
    NotFound {
        /// Kind of the missing resource.
        kind: ResourceKind,
        /// Name of the missing resource.
        name: String,
    },

    /// The gateway answered with a non-success status.
    #[error("gateway request failed: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the gateway.
        message: String,
    },

    /// The response body could not be decoded.
    #[error("invalid response from gateway: {message}")]
    InvalidResponse {
        /// Description of the response issue.
        message: String,
    },

    /// The request could not be addressed; nothing was sent.
    #[error("invalid gateway request: {message}")]
    InvalidRequest {
        /// Description of the request issue.
        message: String,
    },
}

/// Change-set decoding errors.
#[derive(Debug, Error)]
pub enum ChangeSetError {
    /// The change-set file was not found.
    #[error("Change set file not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// The change-set document could not be parsed.
    #[error("Failed to parse change set: {message}")]
    Parse {
        /// Description of the parse error.
        message: String,
        /// Optional source location.
        location: Option<String>,
    },

    /// An entry lacks a value its operation requires.
    #[error("Change #{index} is missing `{field}`")]
    MissingValue {
        /// Position of the entry in the change set.
        index: usize,
        /// Name of the missing field.
        field: &'static str,
    },

    /// An entry's value does not match its resource type.
    #[error("Change #{index} has an invalid value: {message}")]
    InvalidValue {
        /// Position of the entry in the change set.
        index: usize,
        /// Description of the decode error.
        message: String,
    },
}

/// Client configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The server address is not an HTTP(S) URL.
    #[error("Invalid gateway address: {server}")]
    InvalidServer {
        /// The rejected address.
        server: String,
    },

    /// No admin key was configured.
    #[error("Missing admin key (set --token or ADC_TOKEN)")]
    MissingToken,
}

/// Result type alias for crate operations.
pub type Result<T> = std::result::Result<T, AdcError>;

impl AdcError {
    /// Wraps a client failure with the kind of resource being applied.
    #[must_use]
    pub const fn apply(kind: ResourceKind, source: ClusterError) -> Self {
        Self::Apply { kind, source }
    }

    /// Renders this error followed by its chain of causes, `: `-separated.
    #[must_use]
    pub fn report(&self) -> String {
        let mut message = self.to_string();
        let mut source = StdError::source(self);
        while let Some(cause) = source {
            let text = cause.to_string();
            if !message.ends_with(&text) {
                message.push_str(": ");
                message.push_str(&text);
            }
            source = cause.source();
        }
        message
    }

    /// Returns the underlying client error for a failed application, if any.
    #[must_use]
    pub const fn cluster_error(&self) -> Option<&ClusterError> {
        match self {
            Self::Apply { source, .. } | Self::Cluster(source) => Some(source),
            _ => None,
        }
    }
}

impl ClusterError {
    /// Creates an API error.
    #[must_use]
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Creates a network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates an invalid-request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Creates an invalid-response error.
    #[must_use]
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }
}
