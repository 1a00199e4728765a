//! Application configuration for cinfinder.
//!
//! User config lives at `~/.cinfinder/cinfinder.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{CinFinderError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "cinfinder.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".cinfinder";

// ---------------------------------------------------------------------------
// Config structs (matching cinfinder.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Name search endpoint settings.
    #[serde(default)]
    pub search: NameSearchConfig,

    /// Company registry settings.
    #[serde(default)]
    pub registry: RegistryConfig,

    /// HTTP front end settings.
    #[serde(default)]
    pub server: ServerConfig,
}

/// `[search]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NameSearchConfig {
    /// Search UI page visited first to obtain a session cookie. Also sent as referer.
    #[serde(default = "default_search_page_url")]
    pub page_url: String,

    /// AJAX endpoint receiving the search POST.
    #[serde(default = "default_search_endpoint_url")]
    pub endpoint_url: String,

    /// Value of the `origin` header on the search POST.
    #[serde(default = "default_search_origin")]
    pub origin: String,

    /// Browser-like user agent for both search requests.
    #[serde(default = "default_search_user_agent")]
    pub user_agent: String,

    /// Search mode sent in the POST body.
    #[serde(default = "default_search_mode")]
    pub mode: String,

    /// Per-request timeout in seconds. Unset means the client never times out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for NameSearchConfig {
    fn default() -> Self {
        Self {
            page_url: default_search_page_url(),
            endpoint_url: default_search_endpoint_url(),
            origin: default_search_origin(),
            user_agent: default_search_user_agent(),
            mode: default_search_mode(),
            timeout_secs: None,
        }
    }
}

fn default_search_page_url() -> String {
    "https://projects.instafinancials.com/cin-finder/cin-finder-by-name.aspx".into()
}
fn default_search_endpoint_url() -> String {
    "https://projects.instafinancials.com/ajax-caller.aspx/GetCompanyNames".into()
}
fn default_search_origin() -> String {
    "https://projects.instafinancials.com".into()
}
fn default_search_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64)".into()
}
fn default_search_mode() -> String {
    "SCBN".into()
}

/// `[registry]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Registry site root; lookup and profile URLs are built under it.
    #[serde(default = "default_registry_base_url")]
    pub base_url: String,

    /// User agent for lookup and profile requests.
    #[serde(default = "default_registry_user_agent")]
    pub user_agent: String,

    /// Per-request timeout in seconds. Unset means the client never times out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            base_url: default_registry_base_url(),
            user_agent: default_registry_user_agent(),
            timeout_secs: None,
        }
    }
}

impl RegistryConfig {
    /// Base URL without a trailing slash, checked to be an absolute URL.
    pub fn base(&self) -> Result<String> {
        let base = self.base_url.trim_end_matches('/');
        parse_http_url(base, "registry.base_url")?;
        Ok(base.to_string())
    }
}

fn default_registry_base_url() -> String {
    "https://www.allindiaitr.com".into()
}
fn default_registry_user_agent() -> String {
    "Mozilla/5.0".into()
}

/// `[server]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory holding `index.html` and static assets.
    #[serde(default = "default_public_dir")]
    pub public_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            public_dir: default_public_dir(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    8000
}
fn default_public_dir() -> String {
    "public".into()
}

/// Parse a configured URL, rejecting anything that is not http(s).
pub(crate) fn parse_http_url(value: &str, field: &str) -> Result<Url> {
    let url = Url::parse(value)
        .map_err(|e| CinFinderError::validation(format!("{field} '{value}' is not a URL: {e}")))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(CinFinderError::validation(format!(
            "{field} '{value}' has unsupported scheme '{other}'"
        ))),
    }
}

impl NameSearchConfig {
    /// Check that the page and endpoint URLs are usable.
    pub fn validate(&self) -> Result<()> {
        parse_http_url(&self.page_url, "search.page_url")?;
        parse_http_url(&self.endpoint_url, "search.endpoint_url")?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.cinfinder/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| CinFinderError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.cinfinder/cinfinder.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| CinFinderError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        CinFinderError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| CinFinderError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| CinFinderError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| CinFinderError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
