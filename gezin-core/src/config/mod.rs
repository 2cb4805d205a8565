//! gezin configuration.
//!
//! Read from `~/.config/gezin/config.toml` with `GEZIN_*` environment
//! variables layered on top (`GEZIN_BACKEND=supabase`, `GEZIN_API_URL=...`).

use std::path::{Path, PathBuf};
use std::time::Duration;

use ::config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{GezinError, GezinResult};

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Which remote store the data lives in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Rest,
    Supabase,
}

/// What `load_all` does when some collections fail to load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadPolicy {
    /// Commit nothing unless every collection loaded.
    #[default]
    Atomic,
    /// Commit what loaded and report the rest.
    BestEffort,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GezinConfig {
    #[serde(default)]
    pub backend: Backend,

    #[serde(default = "default_api_url")]
    pub api_url: String,

    pub supabase_url: Option<String>,
    pub supabase_key: Option<String>,

    /// Credentials accepted by `gezin login`.
    pub username: Option<String>,
    pub password: Option<String>,

    #[serde(default)]
    pub load_policy: LoadPolicy,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GezinConfig {
    fn default() -> Self {
        GezinConfig {
            backend: Backend::default(),
            api_url: default_api_url(),
            supabase_url: None,
            supabase_key: None,
            username: None,
            password: None,
            load_policy: LoadPolicy::default(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl GezinConfig {
    pub fn config_path() -> GezinResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| GezinError::Config("Could not determine config directory".into()))?
            .join("gezin");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the user's config, writing a commented default file first if
    /// there is none yet.
    pub fn load() -> GezinResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load from a specific file plus the environment.
    pub fn load_from(path: &Path) -> GezinResult<Self> {
        let path = PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned());

        let config: GezinConfig = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix("GEZIN").try_parsing(true))
            .build()
            .map_err(|e| GezinError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| GezinError::Config(e.to_string()))?;

        tracing::debug!(backend = ?config.backend, policy = ?config.load_policy, "config loaded");
        Ok(config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> GezinResult<()> {
        let contents = format!(
            "\
# gezin configuration

# Remote store: \"rest\" or \"supabase\"
# backend = \"rest\"

# REST backend base URL:
# api_url = \"{DEFAULT_API_URL}\"

# Supabase project (used when backend = \"supabase\"):
# supabase_url = \"https://your-project.supabase.co\"
# supabase_key = \"your-anon-key\"

# Credentials accepted by `gezin login`:
# username = \"admin\"
# password = \"changeme\"

# What to do when some collections fail to load: \"atomic\" or \"best_effort\"
# load_policy = \"atomic\"

# Per-request timeout in seconds:
# timeout_secs = {DEFAULT_TIMEOUT_SECS}
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                GezinError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| GezinError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_file_parses_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gezin").join("config.toml");
        GezinConfig::create_default_config(&path).unwrap();

        let config = GezinConfig::load_from(&path).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.load_policy, LoadPolicy::Atomic);
        assert!(config.username.is_none());
    }

    #[test]
    fn reads_values_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "backend = \"supabase\"\n\
             supabase_url = \"https://abc.supabase.co\"\n\
             supabase_key = \"anon\"\n\
             load_policy = \"best_effort\"\n\
             timeout_secs = 5\n",
        )
        .unwrap();

        let config = GezinConfig::load_from(&path).unwrap();
        assert_eq!(config.backend, Backend::Supabase);
        assert_eq!(config.supabase_url.as_deref(), Some("https://abc.supabase.co"));
        assert_eq!(config.load_policy, LoadPolicy::BestEffort);
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn rejects_unknown_backend() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "backend = \"firebase\"\n").unwrap();

        assert!(matches!(
            GezinConfig::load_from(&path),
            Err(GezinError::Config(_))
        ));
    }
}
