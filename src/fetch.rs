//! Network fetch capability
//!
//! The engine treats transport as an external collaborator: anything that
//! can turn a URL into bytes or fail with a status. [`HttpFetcher`] is the
//! production implementation; tests substitute an in-memory fetcher.
//!
//! There is no retry here. A non-success status is a fatal fetch error for
//! that call, and retry policy belongs to the caller.

use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;

const USER_AGENT: &str = concat!("soundbank/", env!("CARGO_PKG_VERSION"));
const FETCH_TIMEOUT_SECS: u64 = 30;

/// Request/response fetch capability.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch the body at `url`, failing on any non-success status.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// HTTP fetcher backed by a shared reqwest client.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        tracing::debug!(url = %url, "fetching catalog asset");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Fetch {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(body.to_vec())
    }
}

/// Fetch a URL and parse the body as JSON.
pub(crate) async fn fetch_json<T: DeserializeOwned>(fetcher: &dyn Fetcher, url: &str) -> Result<T> {
    let body = fetcher.fetch(url).await?;
    Ok(serde_json::from_slice(&body)?)
}
