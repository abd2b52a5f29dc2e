//! Remote asset retrieval
//!
//! The exporter needs three remote resources per packaged export: the
//! catalog template and the two bootstrap blobs. The trait keeps the
//! transport swappable; tests feed canned bytes through it.

use log::debug;
use std::io::Read;

use crate::exceptions::{GarbError, Result};

/// Source of collaborator-served resources
pub trait RemoteAssets {
    /// Fetch a text resource at an endpoint path
    fn fetch_text(&self, endpoint: &str) -> Result<String>;

    /// Fetch a binary resource at an endpoint path
    fn fetch_blob(&self, endpoint: &str) -> Result<Vec<u8>>;
}

/// Blocking HTTP transport
///
/// One GET per resource, no retries, no timeout: an export either
/// completes or fails with the transport error.
pub struct HttpRemote {
    agent: ureq::Agent,
    base_url: String,
}

impl std::fmt::Debug for HttpRemote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRemote")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl HttpRemote {
    /// Create a transport rooted at an asset base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        HttpRemote {
            agent: ureq::agent(),
            base_url,
        }
    }

    fn url_for(&self, endpoint: &str) -> String {
        format!("{}{endpoint}", self.base_url)
    }
}

impl RemoteAssets for HttpRemote {
    fn fetch_text(&self, endpoint: &str) -> Result<String> {
        let url = self.url_for(endpoint);
        debug!("🌐 GET {url}");
        let response = self
            .agent
            .get(&url)
            .call()
            .map_err(|e| GarbError::Fetch(format!("GET {url} failed: {e}")))?;
        response
            .into_string()
            .map_err(|e| GarbError::Fetch(format!("Failed to read body of {url}: {e}")))
    }

    fn fetch_blob(&self, endpoint: &str) -> Result<Vec<u8>> {
        let url = self.url_for(endpoint);
        debug!("🌐 GET {url}");
        let response = self
            .agent
            .get(&url)
            .call()
            .map_err(|e| GarbError::Fetch(format!("GET {url} failed: {e}")))?;

        let mut bytes = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut bytes)
            .map_err(|e| GarbError::Fetch(format!("Failed to read body of {url}: {e}")))?;
        Ok(bytes)
    }
}
