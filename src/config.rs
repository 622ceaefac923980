use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::domain::Principal;

pub const DEFAULT_DATABASE: &str = "clearway.db";
pub const DEFAULT_CONFIG_FILE: &str = "clearway.toml";
pub const DEFAULT_LOG_FILTER: &str = "clearway=info";
pub const VERBOSE_LOG_FILTER: &str = "clearway=debug";

/// Contents of the optional TOML configuration file.
///
/// ```toml
/// database = "/var/lib/clearway/ledger.db"
/// principal = "ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM"
/// log_filter = "clearway=debug,sqlx=warn"
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub database: Option<String>,
    pub principal: Option<String>,
    pub log_filter: Option<String>,
}

impl FileConfig {
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid configuration file")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse(&content)
    }
}

/// Values given on the command line (or through their environment variables).
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub database: Option<String>,
    pub principal: Option<String>,
    pub verbose: bool,
}

/// Effective settings: command line over config file over defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub database: String,
    pub principal: Option<Principal>,
    pub log_filter: String,
}

impl Settings {
    /// Load settings. An explicit `config_path` must exist; otherwise
    /// `clearway.toml` in the working directory is used when present.
    pub fn load(config_path: Option<&str>, overrides: &Overrides) -> Result<Self> {
        let file = match config_path {
            Some(path) => FileConfig::load(Path::new(path))?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                FileConfig::load(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => FileConfig::default(),
        };
        Self::resolve(overrides, file)
    }

    pub fn resolve(overrides: &Overrides, file: FileConfig) -> Result<Self> {
        let principal = overrides
            .principal
            .clone()
            .or(file.principal)
            .map(|p| p.parse::<Principal>())
            .transpose()
            .context("Invalid principal")?;

        let log_filter = if overrides.verbose {
            VERBOSE_LOG_FILTER.to_string()
        } else {
            file.log_filter
                .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string())
        };

        Ok(Self {
            database: overrides
                .database
                .clone()
                .or(file.database)
                .unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
            principal,
            log_filter,
        })
    }

    /// The acting principal, required by every mutating command.
    pub fn require_principal(&self) -> Result<&Principal> {
        self.principal.as_ref().ok_or_else(|| {
            anyhow::anyhow!("No principal given. Use --as <PRINCIPAL> or set CLEARWAY_PRINCIPAL")
        })
    }
}
