//! Shared types, error model, and configuration for cinfinder.
//!
//! This crate is the foundation depended on by the pipeline crates and the CLI.
//! It provides:
//! - [`CinFinderError`]: the unified error type
//! - Domain types ([`SearchRecord`], [`CompanyDetails`]) and their sentinel values
//! - Configuration ([`AppConfig`] and its per-pipeline sections, config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, NameSearchConfig, RegistryConfig, ServerConfig, config_dir, config_file_path,
    init_config, load_config, load_config_from,
};
pub use error::{CinFinderError, Result};
pub use types::{CompanyDetails, NOT_AVAILABLE, NOT_FOUND, SearchRecord};
