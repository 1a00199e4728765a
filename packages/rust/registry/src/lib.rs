//! Company registry resolution: registration code → company profile.
//!
//! This crate provides:
//! - [`resolvers`]: strategies that find a profile URL on a search results page
//! - [`LookupStage`]: fetches the registry search page for a code
//! - [`DetailExtractionStage`]: fetches a profile page and extracts [`CompanyDetails`]
//! - [`CompanyRegistry`]: the two stages chained, short-circuiting on "not found"

mod details;
mod http;
mod lookup;
pub mod resolvers;

use cinfinder_shared::{CompanyDetails, RegistryConfig, Result};
use tracing::{info, instrument};

pub use details::{DetailExtractionStage, parse_company_page};
pub use lookup::LookupStage;
pub use resolvers::{OverviewOnclickResolver, ProfileUrl, ProfileUrlResolver};

/// Outcome of resolving a registration code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The code led to a profile page and its details were extracted.
    Found(CompanyDetails),
    /// The registry lists no company for the code.
    NotFound,
}

/// Code resolution pipeline: lookup, then detail extraction.
pub struct CompanyRegistry {
    lookup: LookupStage,
    details: DetailExtractionStage,
}

impl CompanyRegistry {
    /// Create a registry pipeline from its configuration section.
    pub fn new(config: RegistryConfig) -> Result<Self> {
        let base = config.base()?;
        let client = http::build_client(&config)?;

        Ok(Self {
            lookup: LookupStage::new(client.clone(), base),
            details: DetailExtractionStage::new(client),
        })
    }

    /// Replace the profile URL resolver used by the lookup stage.
    pub fn with_resolver(mut self, resolver: Box<dyn ProfileUrlResolver>) -> Self {
        self.lookup.set_resolver(resolver);
        self
    }

    pub fn lookup(&self) -> &LookupStage {
        &self.lookup
    }

    pub fn details(&self) -> &DetailExtractionStage {
        &self.details
    }

    /// Resolve `code` to a profile URL, then extract that profile.
    ///
    /// Transport failures and a profile page without `Organization` data are
    /// errors; a code the registry does not list is [`Resolution::NotFound`].
    #[instrument(skip_all, fields(code = %code))]
    pub async fn resolve_and_extract(&self, code: &str) -> Result<Resolution> {
        let Some(profile_url) = self.lookup.resolve_url(code).await? else {
            info!("company not found");
            return Ok(Resolution::NotFound);
        };

        let details = self.details.extract_details(&profile_url).await?;
        Ok(Resolution::Found(details))
    }
}
