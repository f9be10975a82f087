//! # Router Configuration Module
//!
//! Configuration consumed during metadata discovery.
//!
//! The only setting is the list of metadata names to ignore: annotations a
//! handler class may carry that have nothing to do with routing (dependency
//! injection markers and the like). The resolver never reads this list; it is
//! handed to the [`Manifest`](crate::manifest::Manifest) source, which would
//! otherwise reject unknown annotation names.
//!
//! ## Sources
//!
//! - A config file, parsed by extension: `.yaml`/`.yml`, `.json` or `.toml`
//! - The `APIROUTER_IGNORE_METADATA` environment variable (comma-separated)
//!
//! ```yaml
//! ignore_metadata:
//!   - deprecated
//!   - internal
//! ```
//!
//! The key may also be spelled `ignoreAnnotation`, and a single string is
//! accepted in place of a list. `persistent` and `inject` are always ignored.

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Metadata names ignored by every configuration.
pub const DEFAULT_IGNORED: [&str; 2] = ["persistent", "inject"];

/// Environment variable holding extra ignored metadata names.
pub const IGNORE_ENV_VAR: &str = "APIROUTER_IGNORE_METADATA";

/// One name or a list of names.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl From<OneOrMany> for Vec<String> {
    fn from(value: OneOrMany) -> Self {
        match value {
            OneOrMany::One(name) => vec![name],
            OneOrMany::Many(names) => names,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default, alias = "ignoreAnnotation")]
    ignore_metadata: Option<OneOrMany>,
}

/// Configuration threaded into metadata discovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouterConfig {
    /// Metadata names skipped during discovery
    pub ignore_metadata: Vec<String>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        RouterConfig {
            ignore_metadata: DEFAULT_IGNORED.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

impl RouterConfig {
    /// Defaults plus the given names.
    #[must_use]
    pub fn with_ignored<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut config = RouterConfig::default();
        config.extend_ignored(names);
        config
    }

    /// Load configuration from environment variables only.
    #[must_use]
    pub fn from_env() -> Self {
        RouterConfig::default().with_env_overrides()
    }

    /// Append names from `APIROUTER_IGNORE_METADATA`.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(val) = env::var(IGNORE_ENV_VAR) {
            self.extend_ignored(parse_list(&val));
        }
        self
    }

    /// Parse configuration from a string in the given format
    /// (`yaml`, `yml`, `json` or `toml`).
    ///
    /// # Errors
    ///
    /// Fails on an unsupported format or malformed content.
    pub fn from_str_as(contents: &str, format: &str) -> anyhow::Result<Self> {
        let file: ConfigFile = match format {
            "yaml" | "yml" => {
                if contents.trim().is_empty() {
                    ConfigFile::default()
                } else {
                    serde_yaml::from_str(contents).context("Invalid YAML router config")?
                }
            }
            "json" => serde_json::from_str(contents).context("Invalid JSON router config")?,
            "toml" => toml::from_str(contents).context("Invalid TOML router config")?,
            other => bail!("Unsupported router config format: {other}"),
        };

        let mut config = RouterConfig::default();
        if let Some(names) = file.ignore_metadata {
            config.extend_ignored(Vec::from(names));
        }
        Ok(config)
    }

    /// Load configuration from a file; the format follows its extension.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or parsed.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let format = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read router config: {}", path.display()))?;
        Self::from_str_as(&contents, &format)
            .with_context(|| format!("Failed to parse router config: {}", path.display()))
    }

    /// Whether metadata called `name` is skipped.
    #[must_use]
    pub fn is_ignored(&self, name: &str) -> bool {
        self.ignore_metadata.iter().any(|ignored| ignored == name)
    }

    fn extend_ignored<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            let name: String = name.into();
            let name = name.trim();
            if !name.is_empty() && !self.is_ignored(name) {
                self.ignore_metadata.push(name.to_string());
            }
        }
    }
}

fn parse_list(val: &str) -> Vec<String> {
    val.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
