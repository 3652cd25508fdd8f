//! Console configuration: an optional RON file overridden by flags and environment.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use log::LevelFilter;
use obd_engine::{ClientSettings, DEFAULT_BASE_URL};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::logging::LogDestination;

const DEFAULT_CONFIG_FILE: &str = "obd_console.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path}: {reason}")]
    Read { path: PathBuf, reason: String },
    #[error("could not parse config file {path}: {reason}")]
    Parse { path: PathBuf, reason: String },
    #[error("invalid base url {url:?}: {reason}")]
    BaseUrl { url: String, reason: String },
    #[error("unknown log level {0:?}")]
    LogLevel(String),
    #[error("request timeout must be at least one second")]
    RequestTimeout,
}

#[derive(Debug, Parser)]
#[command(name = "obd_console", about = "Operator console for OBD campaign preparation")]
pub struct Cli {
    /// RON configuration file; a missing default file is ignored.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
    /// Root URL of the OBD backend.
    #[arg(long, env = "OBD_API_URL")]
    pub base_url: Option<String>,
    /// Directory receiving exported scrubbed bases.
    #[arg(long, env = "OBD_EXPORT_DIR")]
    pub export_dir: Option<PathBuf>,
    #[arg(long, env = "OBD_LOG", value_enum)]
    pub log: Option<LogDestination>,
    /// One of off, error, warn, info, debug, trace.
    #[arg(long)]
    pub log_level: Option<String>,
    #[arg(long)]
    pub request_timeout_secs: Option<u64>,
}

/// Contents of `obd_console.ron`. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub base_url: Option<String>,
    pub export_dir: Option<PathBuf>,
    pub log: Option<LogDestination>,
    pub log_level: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub connect_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    pub client: ClientSettings,
    pub export_dir: PathBuf,
    pub log: LogDestination,
    pub log_level: LevelFilter,
}

impl ConsoleConfig {
    pub fn load(cli: Cli) -> Result<Self, ConfigError> {
        let file = match &cli.config {
            Some(path) => read_config_file(path)?,
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    read_config_file(path)?
                } else {
                    ConfigFile::default()
                }
            }
        };
        Self::resolve(cli, file)
    }

    /// Merges flags over file values over built-in defaults.
    pub fn resolve(cli: Cli, file: ConfigFile) -> Result<Self, ConfigError> {
        let base_url = cli
            .base_url
            .or(file.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let mut client = ClientSettings::new(&base_url).map_err(|err| ConfigError::BaseUrl {
            url: base_url.clone(),
            reason: err.to_string(),
        })?;
        if !matches!(client.base_url.scheme(), "http" | "https") {
            return Err(ConfigError::BaseUrl {
                url: base_url,
                reason: "scheme must be http or https".to_string(),
            });
        }

        match cli.request_timeout_secs.or(file.request_timeout_secs) {
            Some(0) => return Err(ConfigError::RequestTimeout),
            Some(secs) => client.request_timeout = Some(Duration::from_secs(secs)),
            None => {}
        }
        if let Some(secs) = file.connect_timeout_secs {
            client.connect_timeout = Duration::from_secs(secs);
        }

        let log_level = match cli.log_level.or(file.log_level) {
            Some(text) => text
                .parse::<LevelFilter>()
                .map_err(|_| ConfigError::LogLevel(text))?,
            None => LevelFilter::Info,
        };

        Ok(Self {
            client,
            export_dir: cli
                .export_dir
                .or(file.export_dir)
                .unwrap_or_else(|| PathBuf::from("exports")),
            log: cli.log.or(file.log).unwrap_or_default(),
            log_level,
        })
    }
}

fn read_config_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    let content = fs::read_to_string(path).map_err(|err| ConfigError::Read {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })?;
    ron::from_str(&content).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })
}
