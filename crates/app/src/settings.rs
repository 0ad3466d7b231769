//! Application settings, read from an optional `settings.toml`, then
//! `DAYBOOK__*` environment variables, then command line flags.
use clap::Parser;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "settings";

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

impl Default for Database {
    fn default() -> Self {
        Self::Sqlite("daybook.db".to_string())
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Gateway {
    pub bind: String,
    pub port: u16,
}

impl Default for Gateway {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Currency {
    pub base: String,
    pub target: String,
    pub enabled: bool,
    /// Lookup endpoint; the base code is appended as the last path segment.
    pub endpoint: String,
}

impl Default for Currency {
    fn default() -> Self {
        Self {
            base: "USD".to_string(),
            target: "INR".to_string(),
            enabled: true,
            endpoint: "https://open.er-api.com/v6/latest".to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: App,
    pub database: Database,
    pub gateway: Gateway,
    pub currency: Currency,
}

#[derive(Debug, Parser)]
#[command(name = "daybook", version)]
struct Args {
    /// Optional settings file path (TOML), without extension.
    #[arg(long)]
    config: Option<String>,
    /// Override the log level (e.g. debug).
    #[arg(long)]
    level: Option<String>,
    /// Override the SQLite database path.
    #[arg(long, conflicts_with = "memory")]
    database: Option<String>,
    /// Use a throwaway in-memory database.
    #[arg(long)]
    memory: bool,
    /// Override the gateway bind address.
    #[arg(long)]
    bind: Option<String>,
    /// Override the gateway port.
    #[arg(long)]
    port: Option<u16>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let args = Args::parse();

        let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
        let mut settings: Settings = Config::builder()
            .add_source(File::with_name(config_path).required(false))
            .add_source(Environment::with_prefix("DAYBOOK").separator("__"))
            .build()?
            .try_deserialize()?;

        if let Some(level) = args.level {
            settings.app.level = level;
        }
        if let Some(path) = args.database {
            settings.database = Database::Sqlite(path);
        }
        if args.memory {
            settings.database = Database::Memory;
        }
        if let Some(bind) = args.bind {
            settings.gateway.bind = bind;
        }
        if let Some(port) = args.port {
            settings.gateway.port = port;
        }

        Ok(settings)
    }
}
