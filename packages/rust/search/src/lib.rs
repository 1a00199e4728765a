//! Company name search against a session-guarded AJAX endpoint.
//!
//! A search is two requests made with one throwaway cookie jar: a GET of the
//! search UI page, whose only purpose is to receive a session cookie, then a
//! POST of the query to the endpoint the page itself calls. The response is a
//! list of `;`-delimited strings, normalized here into [`SearchRecord`]s.

mod parser;

use std::time::Duration;

use cinfinder_shared::{CinFinderError, NameSearchConfig, Result, SearchRecord};
use reqwest::Client;
use reqwest::header::{
    ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, ORIGIN, REFERER,
    USER_AGENT,
};
use tracing::{debug, info, instrument, warn};

pub use parser::{SearchEnvelope, parse_entries};

use parser::SearchRequest;

/// `accept` header sent with the search POST.
const ACCEPT_JSON: &str = "application/json, text/javascript, */*; q=0.01";

/// `accept-language` header sent with the search POST.
const ACCEPT_LANGUAGE_VALUE: &str = "en-US,en;q=0.8";

/// `content-type` header sent with the search POST.
const CONTENT_TYPE_JSON: &str = "application/json; charset=UTF-8";

/// Marker header the endpoint expects from in-page AJAX calls.
const X_REQUESTED_WITH: &str = "x-requested-with";

// ---------------------------------------------------------------------------
// NameSearch
// ---------------------------------------------------------------------------

/// Name search pipeline. Holds only configuration; no state survives a call.
#[derive(Debug, Clone)]
pub struct NameSearch {
    config: NameSearchConfig,
    headers: HeaderMap,
}

impl NameSearch {
    /// Create a search pipeline, validating the configured URLs and headers.
    pub fn new(config: NameSearchConfig) -> Result<Self> {
        config.validate()?;
        let headers = post_headers(&config)?;
        Ok(Self { config, headers })
    }

    /// Search companies by name.
    ///
    /// Returns records in the order the endpoint lists them; an empty list
    /// when it lists none. Any failure along the way is reported as a single
    /// [`CinFinderError::Search`] and no partial results are returned.
    #[instrument(skip_all, fields(query = %query))]
    pub async fn search(&self, query: &str) -> Result<Vec<SearchRecord>> {
        match self.run(query).await {
            Ok(records) => {
                info!(records = records.len(), "name search completed");
                Ok(records)
            }
            Err(e) => {
                warn!(error = %e, "name search failed");
                Err(CinFinderError::Search(e.to_string()))
            }
        }
    }

    async fn run(&self, query: &str) -> Result<Vec<SearchRecord>> {
        // A fresh client per call keeps the session cookie scoped to this search.
        let client = self.session_client()?;

        self.bootstrap_session(&client).await?;
        let envelope = self.post_query(&client, query).await?;

        Ok(parse_entries(&envelope.into_entries()))
    }

    fn session_client(&self) -> Result<Client> {
        let mut builder = Client::builder()
            .user_agent(self.config.user_agent.as_str())
            .cookie_store(true);
        if let Some(secs) = self.config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        builder
            .build()
            .map_err(|e| CinFinderError::Network(format!("failed to build HTTP client: {e}")))
    }

    /// Visit the search page so the endpoint accepts the follow-up POST.
    async fn bootstrap_session(&self, client: &Client) -> Result<()> {
        let url = &self.config.page_url;
        debug!(%url, "requesting session cookie");

        let response = client
            .get(url)
            .send()
            .await
            .map_err(|e| CinFinderError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CinFinderError::Network(format!("{url}: HTTP {status}")));
        }

        Ok(())
    }

    async fn post_query(&self, client: &Client, query: &str) -> Result<SearchEnvelope> {
        let url = &self.config.endpoint_url;
        debug!(%url, "posting search query");

        // The explicit content-type in `headers` takes precedence over `json`'s.
        let response = client
            .post(url)
            .headers(self.headers.clone())
            .json(&SearchRequest {
                str_search: query,
                mode: &self.config.mode,
            })
            .send()
            .await
            .map_err(|e| CinFinderError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CinFinderError::Network(format!("{url}: HTTP {status}")));
        }

        response
            .json::<SearchEnvelope>()
            .await
            .map_err(|e| CinFinderError::parse(format!("{url}: unexpected response: {e}")))
    }
}

/// Browser-like header set for the search POST.
fn post_headers(config: &NameSearchConfig) -> Result<HeaderMap> {
    let value = |field: &str, raw: &str| {
        HeaderValue::from_str(raw).map_err(|e| {
            CinFinderError::validation(format!("search.{field} is not a valid header value: {e}"))
        })
    };

    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_JSON));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANGUAGE_VALUE));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_JSON));
    headers.insert(ORIGIN, value("origin", &config.origin)?);
    headers.insert(REFERER, value("page_url", &config.page_url)?);
    headers.insert(
        HeaderName::from_static(X_REQUESTED_WITH),
        HeaderValue::from_static("XMLHttpRequest"),
    );
    headers.insert(USER_AGENT, value("user_agent", &config.user_agent)?);
    Ok(headers)
}
