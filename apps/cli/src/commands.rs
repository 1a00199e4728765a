//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use cinfinder_registry::{CompanyRegistry, Resolution};
use cinfinder_search::NameSearch;
use cinfinder_shared::{AppConfig, init_config, load_config, load_config_from};
use color_eyre::eyre::{Result, eyre};
use tracing::info;

use crate::server;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// cinfinder: look up companies by name or CIN.
#[derive(Parser)]
#[command(
    name = "cinfinder",
    version,
    about = "Search companies by name and resolve CINs to company profiles.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.cinfinder/cinfinder.toml.
    #[arg(long, global = true, env = "CINFINDER_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Search companies by name.
    Search {
        /// Company name or fragment.
        query: String,
    },

    /// Resolve a CIN to company details.
    Details {
        /// Corporate identification number.
        cin: String,
    },

    /// Start the HTTP API.
    Serve {
        /// Interface to bind (overrides config).
        #[arg(long)]
        host: Option<String>,

        /// Port to bind (overrides config).
        #[arg(short, long)]
        port: Option<u16>,

        /// Directory with index.html and static assets (overrides config).
        #[arg(long)]
        public_dir: Option<String>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "cinfinder=info,tower_http=info",
        1 => "cinfinder=debug,tower_http=debug",
        _ => "cinfinder=trace,tower_http=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    // Logs go to stderr so JSON results on stdout stay pipeable.
    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();

    match cli.command {
        Command::Search { query } => cmd_search(config_path, &query).await,
        Command::Details { cin } => cmd_details(config_path, &cin).await,
        Command::Serve {
            host,
            port,
            public_dir,
        } => cmd_serve(config_path, host, port, public_dir).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show(config_path).await,
        },
    }
}

/// Load config from `--config` if given, else from the default location.
fn resolve_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(p) => load_config_from(p)?,
        None => load_config()?,
    };
    Ok(config)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_search(config_path: Option<&Path>, query: &str) -> Result<()> {
    let config = resolve_config(config_path)?;
    let search = NameSearch::new(config.search)?;

    let records = search.search(query).await?;
    info!(query, records = records.len(), "search finished");

    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}

async fn cmd_details(config_path: Option<&Path>, cin: &str) -> Result<()> {
    let config = resolve_config(config_path)?;
    let registry = CompanyRegistry::new(config.registry)?;

    match registry.resolve_and_extract(cin).await? {
        Resolution::Found(details) => {
            println!("{}", serde_json::to_string_pretty(&details)?);
            Ok(())
        }
        Resolution::NotFound => Err(eyre!("company with CIN {cin} not found")),
    }
}

async fn cmd_serve(
    config_path: Option<&Path>,
    host: Option<String>,
    port: Option<u16>,
    public_dir: Option<String>,
) -> Result<()> {
    let mut config = resolve_config(config_path)?;

    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    if let Some(dir) = public_dir {
        config.server.public_dir = dir;
    }

    server::serve(config).await
}

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show(config_path: Option<&Path>) -> Result<()> {
    let config = resolve_config(config_path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}
