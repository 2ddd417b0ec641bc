//! # Shared environment state
//!
//! [`StarlistEnv`] holds the persistent HTTP client used by the remote
//! lookup adapter. It is cheaply cloneable and meant to be reused across
//! lookups so sessions are not rebuilt per query.
use std::time::Duration;

use ureq::Agent;

use crate::starlist_errors::StarlistError;

/// Shared environment passed to functions needing external data access.
#[derive(Debug, Clone)]
pub struct StarlistEnv {
    pub http_client: Agent,
}

impl Default for StarlistEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl StarlistEnv {
    /// Create an environment with an HTTP client using a 10 s global timeout.
    pub fn new() -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(10)))
            .build();

        StarlistEnv {
            http_client: config.into(),
        }
    }

    /// GET `url` and return the response body as text.
    pub(crate) fn get_from_url(&self, url: &str) -> Result<String, StarlistError> {
        let body = self
            .http_client
            .get(url)
            .call()?
            .body_mut()
            .read_to_string()?;
        Ok(body)
    }
}
