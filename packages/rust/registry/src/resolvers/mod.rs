//! Profile URL resolvers.
//!
//! A resolver reads a registry search results page and names the profile
//! page of the company it lists. The lookup stage only fetches and delegates,
//! so a markup change upstream means swapping the resolver, not the pipeline.

mod onclick;

use std::fmt;

use scraper::Html;

pub use onclick::OverviewOnclickResolver;

// ---------------------------------------------------------------------------
// ProfileUrl
// ---------------------------------------------------------------------------

/// Fully-formed URL of a company profile page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileUrl(String);

impl ProfileUrl {
    /// Compose `{base}/company/{slug}/{code}`, where the slug is the company
    /// name lowercased with spaces replaced by hyphens.
    pub fn compose(base: &str, company_name: &str, company_code: &str) -> Self {
        let slug = company_name.replace(' ', "-").to_lowercase();
        Self(format!(
            "{}/company/{slug}/{company_code}",
            base.trim_end_matches('/')
        ))
    }

    /// Wrap an already-formed profile URL.
    pub fn from_raw(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The registration code carried by the URL: its final `/` segment.
    pub fn cin(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or_default()
    }
}

impl fmt::Display for ProfileUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Strategy for locating a company's profile URL on a search results page.
pub trait ProfileUrlResolver: Send + Sync {
    /// Return the profile URL for the first company listed, if any.
    ///
    /// `base` is the registry root the profile URL is built under.
    fn resolve(&self, doc: &Html, base: &str) -> Option<ProfileUrl>;

    /// Human-readable resolver name for tracing.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compose_slugifies_name() {
        let url = ProfileUrl::compose("https://registry.example", "Acme Ltd", "U123");
        assert_eq!(url.as_str(), "https://registry.example/company/acme-ltd/U123");
    }

    #[test]
    fn compose_keeps_punctuation_and_trims_base_slash() {
        let url = ProfileUrl::compose("https://registry.example/", "A & B  Pvt. Ltd", "L1");
        assert_eq!(
            url.as_str(),
            "https://registry.example/company/a-&-b--pvt.-ltd/L1"
        );
    }

    #[test]
    fn cin_is_last_segment() {
        let url = ProfileUrl::from_raw("https://registry.example/company/acme-ltd/U72900MH2001PTC123456");
        assert_eq!(url.cin(), "U72900MH2001PTC123456");
        assert_eq!(url.to_string(), url.as_str());
    }
}
