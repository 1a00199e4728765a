//! Lookup stage: registration code → profile URL.

use cinfinder_shared::Result;
use reqwest::Client;
use scraper::Html;
use tracing::{info, instrument};

use crate::http::fetch_html;
use crate::resolvers::{OverviewOnclickResolver, ProfileUrl, ProfileUrlResolver};

/// Fetches the registry search page for a code and resolves the profile URL.
pub struct LookupStage {
    client: Client,
    base: String,
    resolver: Box<dyn ProfileUrlResolver>,
}

impl LookupStage {
    /// Create a lookup stage using the built-in onclick resolver.
    pub(crate) fn new(client: Client, base: String) -> Self {
        Self {
            client,
            base,
            resolver: Box::new(OverviewOnclickResolver::new()),
        }
    }

    pub(crate) fn set_resolver(&mut self, resolver: Box<dyn ProfileUrlResolver>) {
        self.resolver = resolver;
    }

    /// URL of the registry search page for `code`.
    pub fn search_url(&self, code: &str) -> String {
        format!("{}/search/{code}", self.base)
    }

    /// Resolve a registration code to the profile URL of the company it lists.
    ///
    /// `Ok(None)` means the page was fetched but lists no usable company.
    /// The code in the returned URL is the one read from the page, which may
    /// differ from `code`.
    #[instrument(skip_all, fields(code = %code, resolver = self.resolver.name()))]
    pub async fn resolve_url(&self, code: &str) -> Result<Option<ProfileUrl>> {
        let html = fetch_html(&self.client, &self.search_url(code)).await?;
        let resolved = self.resolve_html(&html);

        match &resolved {
            Some(url) => info!(%url, "resolved profile url"),
            None => info!("no company listed for code"),
        }

        Ok(resolved)
    }

    /// Run the resolver over an already-fetched search page.
    pub fn resolve_html(&self, html: &str) -> Option<ProfileUrl> {
        let doc = Html::parse_document(html);
        self.resolver.resolve(&doc, &self.base)
    }
}
