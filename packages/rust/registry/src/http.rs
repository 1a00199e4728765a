//! HTTP plumbing shared by the lookup and detail stages.

use std::time::Duration;

use cinfinder_shared::{CinFinderError, RegistryConfig, Result};
use reqwest::Client;
use tracing::{debug, warn};

/// Build the registry client from its configuration section.
pub(crate) fn build_client(config: &RegistryConfig) -> Result<Client> {
    let mut builder = Client::builder().user_agent(config.user_agent.as_str());
    if let Some(secs) = config.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }

    builder
        .build()
        .map_err(|e| CinFinderError::Network(format!("failed to build HTTP client: {e}")))
}

/// GET a page and return its body, failing on transport errors and non-2xx.
pub(crate) async fn fetch_html(client: &Client, url: &str) -> Result<String> {
    debug!(%url, "fetching page");

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| {
            warn!(%url, error = %e, "request failed");
            CinFinderError::Network(format!("{url}: {e}"))
        })?;

    let status = response.status();
    if !status.is_success() {
        warn!(%url, %status, "unexpected HTTP status");
        return Err(CinFinderError::Network(format!("{url}: HTTP {status}")));
    }

    let body = response.text().await.map_err(|e| {
        warn!(%url, error = %e, "failed to read body");
        CinFinderError::Network(format!("{url}: body read failed: {e}"))
    })?;

    debug!(%url, bytes = body.len(), "fetched page");
    Ok(body)
}
