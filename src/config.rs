use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const DEFAULT_ENDPOINT: &str = "https://hn.algolia.com/api/v1/search?query=";

/// What to do with a round-trip outcome that resolves after a newer one was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StalePolicy {
    /// Every outcome is applied in the order it arrives, even a superseded one.
    #[default]
    LastResolvedWins,
    /// Only the outcome of the newest round-trip is applied.
    LatestOnly,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub endpoint: String,
    pub storage_key: String,
    pub default_term: String,
    pub stale_policy: StalePolicy,
    /// Unset means round-trips may stay pending indefinitely.
    pub request_timeout_secs: Option<u64>,
    pub user_agent: String,
    pub dark_mode: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            storage_key: "search".to_string(),
            default_term: "React".to_string(),
            stale_policy: StalePolicy::default(),
            request_timeout_secs: None,
            user_agent: concat!("hacker_stories/", env!("CARGO_PKG_VERSION")).to_string(),
            dark_mode: true,
        }
    }
}

impl AppConfig {
    /// Loads `~/.hacker_stories/config.toml`, falling back to defaults on any problem.
    pub fn load() -> Self {
        let path = match Self::config_path() {
            Ok(path) => path,
            Err(e) => {
                warn!("{:#}, using default configuration", e);
                return Self::default();
            }
        };

        match Self::load_from(&path) {
            Ok(Some(config)) => {
                info!(path = %path.display(), "loaded configuration");
                config
            }
            Ok(None) => Self::default(),
            Err(e) => {
                warn!("{:#}, using default configuration", e);
                Self::default()
            }
        }
    }

    /// `Ok(None)` when the file does not exist.
    pub fn load_from(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config = Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(Some(config))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    fn config_path() -> Result<PathBuf> {
        let home_dir = dirs_next::home_dir().ok_or_else(|| anyhow!("Could not find home directory"))?;
        Ok(home_dir.join(".hacker_stories").join("config.toml"))
    }
}
