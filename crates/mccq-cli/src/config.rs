//! Startup settings: command-line flags layered over an optional JSON file.
//!
//! ```json
//! {
//!   "database_uri": "https://example.org/mc/versions",
//!   "show_versions": ["1.13", "1.14"],
//!   "whitelist": ["1.13", "1.14"],
//!   "loader": "https",
//!   "parser": "v1",
//!   "log": "info"
//! }
//! ```
//!
//! Every key is optional. A flag given on the command line wins over the file,
//! and the file wins over built-in defaults.

use anyhow::{Context, Result};
use mccq_storage::RegistryConfig;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::StartupArgs;

pub const DEFAULT_PARSER: &str = "v1";
pub const DEFAULT_LOG: &str = "warn";

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub database_uri: Option<String>,
    pub show_versions: Option<Vec<String>>,
    pub whitelist: Option<Vec<String>>,
    pub loader: Option<String>,
    pub parser: Option<String>,
    pub log: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub database_uri: String,
    pub show_versions: Vec<String>,
    pub whitelist: Vec<String>,
    pub loader: Option<String>,
    pub parser: String,
    pub log: String,
}

impl Settings {
    pub fn resolve(args: &StartupArgs) -> Result<Self> {
        let file = match &args.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Ok(Self::merge(args, file))
    }

    fn merge(args: &StartupArgs, file: FileConfig) -> Self {
        fn list(flag: &[String], file: Option<Vec<String>>) -> Vec<String> {
            if flag.is_empty() {
                file.unwrap_or_default()
            } else {
                flag.to_vec()
            }
        }

        Self {
            database_uri: args
                .database_uri
                .clone()
                .or(file.database_uri)
                .unwrap_or_else(default_database_uri),
            show_versions: list(&args.show_versions, file.show_versions),
            whitelist: list(&args.whitelist, file.whitelist),
            loader: args.loader.clone().or(file.loader),
            parser: args
                .parser
                .clone()
                .or(file.parser)
                .unwrap_or_else(|| DEFAULT_PARSER.to_string()),
            log: args
                .log
                .clone()
                .or(file.log)
                .unwrap_or_else(|| DEFAULT_LOG.to_string()),
        }
    }

    pub fn registry_config(&self) -> RegistryConfig {
        RegistryConfig {
            uri: self.database_uri.clone(),
            loader: self.loader.clone(),
            parser: self.parser.clone(),
            whitelist: self.whitelist.clone(),
        }
    }
}

/// The game launcher's `versions` directory for this platform.
pub fn default_database_uri() -> String {
    minecraft_dir()
        .map(|dir| dir.join("versions"))
        .unwrap_or_else(|| PathBuf::from("versions"))
        .display()
        .to_string()
}

fn minecraft_dir() -> Option<PathBuf> {
    if cfg!(target_os = "windows") {
        dirs::config_dir().map(|p| p.join(".minecraft"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir().map(|p| p.join("minecraft"))
    } else {
        dirs::home_dir().map(|p| p.join(".minecraft"))
    }
}
