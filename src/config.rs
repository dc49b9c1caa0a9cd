use crate::outline::{ChecklistNesting, ParseOptions};
use crate::placeholder::DEFAULT_SYMBOL;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming the config file
pub const CONFIG_ENV: &str = "POPTHINGS_CONFIG";

/// Settings read from a TOML file
///
/// ```toml
/// placeholder_symbol = "$"
/// checklist_nesting = "flatten"
/// open_url = false
/// log_level = "warn"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Character introducing a placeholder
    pub placeholder_symbol: char,
    /// Policy for tasks nested under checklist items
    pub checklist_nesting: ChecklistNesting,
    /// Open the import URL instead of printing it
    pub open_url: bool,
    /// Default log filter when `RUST_LOG` is not set
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            placeholder_symbol: DEFAULT_SYMBOL,
            checklist_nesting: ChecklistNesting::default(),
            open_url: false,
            log_level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Load from `path`; a missing file yields the defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from an explicit path, else from `POPTHINGS_CONFIG`, else defaults
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.placeholder_symbol.is_alphanumeric()
            || self.placeholder_symbol.is_whitespace()
            || self.placeholder_symbol == '@'
        {
            bail!(
                "placeholder_symbol '{}' must be a punctuation character other than '@'",
                self.placeholder_symbol
            );
        }
        Ok(())
    }

    /// Parser settings derived from this config
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            checklist_nesting: self.checklist_nesting,
        }
    }
}
