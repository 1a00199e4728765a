//! Resolver for result pages that link companies through an inline
//! `gotoCompanyOverviewPage('NAME','CODE')` click handler.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};
use tracing::debug;

use super::{ProfileUrl, ProfileUrlResolver};

/// Function name the result anchors call.
const OVERVIEW_CALL: &str = "gotoCompanyOverviewPage(";

static OVERVIEW_CALL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"gotoCompanyOverviewPage\('([^']+)'\s*,\s*'([^']+)'\)").expect("valid regex")
});

/// Reads the first overview click handler on the page.
#[derive(Debug, Clone, Copy, Default)]
pub struct OverviewOnclickResolver;

impl OverviewOnclickResolver {
    pub fn new() -> Self {
        Self
    }

    /// Extract `(name, code)` from a handler like `gotoCompanyOverviewPage('Acme Ltd','U123')`.
    pub fn parse_call<'a>(&self, onclick: &'a str) -> Option<(&'a str, &'a str)> {
        let caps = OVERVIEW_CALL_RE.captures(onclick)?;
        Some((caps.get(1)?.as_str(), caps.get(2)?.as_str()))
    }
}

impl ProfileUrlResolver for OverviewOnclickResolver {
    fn resolve(&self, doc: &Html, base: &str) -> Option<ProfileUrl> {
        let anchor_sel = Selector::parse("a[onclick]").unwrap();

        // Only the first overview anchor counts; a malformed one is a miss.
        let onclick = doc
            .select(&anchor_sel)
            .filter_map(|el| el.value().attr("onclick"))
            .find(|handler| handler.contains(OVERVIEW_CALL))?;

        let Some((name, code)) = self.parse_call(onclick) else {
            debug!(%onclick, "overview handler does not carry name and code");
            return None;
        };

        Some(ProfileUrl::compose(base, name, code))
    }

    fn name(&self) -> &str {
        "overview-onclick"
    }
}
