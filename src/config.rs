//! Gateway connection settings.
//!
//! Values usually come from CLI flags or the `ADC_*` environment variables
//! (optionally loaded from a `.env` file).

use tracing::debug;

use crate::error::{ConfigError, Result};

/// Default admin API address.
pub const DEFAULT_SERVER: &str = "http://127.0.0.1:9180";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for a gateway admin API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterConfig {
    /// Admin API base address, without trailing slash.
    pub server: String,
    /// Admin key.
    pub token: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl ClusterConfig {
    /// Creates a validated configuration with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is not an HTTP(S) URL or the token is empty.
    pub fn new(server: &str, token: &str) -> Result<Self> {
        let server = server.trim().trim_end_matches('/');
        if !(server.starts_with("http://") || server.starts_with("https://")) {
            return Err(ConfigError::InvalidServer {
                server: server.to_string(),
            }
            .into());
        }

        if token.trim().is_empty() {
            return Err(ConfigError::MissingToken.into());
        }

        debug!("Using gateway admin API at {server}");
        Ok(Self {
            server: server.to_string(),
            token: token.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        })
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}
