//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/zennav/config.toml)
//! 3. Environment variables (ZENNAV_* prefix)
//!
//! Environment variables take precedence over config file values.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable prefix
const ENV_PREFIX: &str = "ZENNAV";

/// Default GitHub API endpoint used for gist sync
pub const DEFAULT_GIST_API_URL: &str = "https://api.github.com";

/// What sync does when the snapshot lookup itself fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LookupFailurePolicy {
    /// Report the failure; never create a snapshot blindly
    #[default]
    Fail,
    /// Treat the account as having no snapshot and create one
    AssumeAbsent,
}

impl LookupFailurePolicy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "fail" => Some(Self::Fail),
            "assume-absent" => Some(Self::AssumeAbsent),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fail => "fail",
            Self::AssumeAbsent => "assume-absent",
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the local key/value slots
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Base URL of the gist API
    #[serde(default = "default_gist_api_url")]
    pub gist_api_url: String,

    /// Admin password baked into the built-in default document
    #[serde(default)]
    pub admin_password: Option<String>,

    /// Policy for failed snapshot lookups during push and auto-mirror
    #[serde(default)]
    pub lookup_failure: LookupFailurePolicy,

    /// Log file path (logs go to stderr when unset)
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            gist_api_url: default_gist_api_url(),
            admin_password: None,
            lookup_failure: LookupFailurePolicy::default(),
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (ZENNAV_DATA_DIR, ZENNAV_GIST_API_URL, ...)
    /// 2. Config file (~/.config/zennav/config.toml or ZENNAV_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration, preferring an explicit path given on the command line
    pub fn load_with_cli_override(path: Option<&PathBuf>) -> Result<Self> {
        match path {
            Some(p) => Self::load_from_path(p),
            None => Self::load(),
        }
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        config.ensure_data_dir()?;
        Ok(config)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var(format!("{}_DATA_DIR", ENV_PREFIX)) {
            self.data_dir = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var(format!("{}_GIST_API_URL", ENV_PREFIX)) {
            if !val.is_empty() {
                self.gist_api_url = val;
            }
        }

        // Empty string clears the override
        if let Ok(val) = std::env::var(format!("{}_ADMIN_PASSWORD", ENV_PREFIX)) {
            self.admin_password = if val.is_empty() { None } else { Some(val) };
        }

        if let Ok(val) = std::env::var(format!("{}_LOOKUP_POLICY", ENV_PREFIX)) {
            if let Some(policy) = LookupFailurePolicy::parse(&val) {
                self.lookup_failure = policy;
            }
        }
    }

    /// Ensure data directory exists
    fn ensure_data_dir(&self) -> Result<()> {
        if !self.data_dir.exists() {
            std::fs::create_dir_all(&self.data_dir)
                .with_context(|| format!("Failed to create data directory: {:?}", self.data_dir))?;
        }
        Ok(())
    }

    /// Save configuration to the default file
    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::config_file_path())
    }

    /// Save configuration to a specific file
    pub fn save_to_path(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;
        Ok(())
    }

    /// Get the config file path
    ///
    /// Can be overridden with ZENNAV_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("zennav")
            .join("config.toml")
    }
}

/// Get the default data directory
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("zennav")
}

fn default_gist_api_url() -> String {
    DEFAULT_GIST_API_URL.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;
    use tempfile::TempDir;

    // Mutex to serialize tests that touch environment variables
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Guard that locks env access and saves/restores env vars
    struct EnvGuard<'a> {
        _lock: std::sync::MutexGuard<'a, ()>,
        saved: Vec<(String, Option<String>)>,
    }

    impl<'a> EnvGuard<'a> {
        fn new(vars: &[&str]) -> Self {
            let lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
            let saved = vars
                .iter()
                .map(|&name| (name.to_string(), env::var(name).ok()))
                .collect();
            for name in vars {
                env::remove_var(name);
            }
            Self { _lock: lock, saved }
        }
    }

    impl Drop for EnvGuard<'_> {
        fn drop(&mut self) {
            for (name, value) in &self.saved {
                match value {
                    Some(v) => env::set_var(name, v),
                    None => env::remove_var(name),
                }
            }
        }
    }

    const ENV_VARS: &[&str] = &[
        "ZENNAV_DATA_DIR",
        "ZENNAV_GIST_API_URL",
        "ZENNAV_ADMIN_PASSWORD",
        "ZENNAV_LOOKUP_POLICY",
    ];

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.gist_api_url, DEFAULT_GIST_API_URL);
        assert!(config.admin_password.is_none());
        assert_eq!(config.lookup_failure, LookupFailurePolicy::Fail);
        assert!(config.data_dir.ends_with("zennav"));
    }

    #[test]
    fn test_env_override_data_dir() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();
        env::set_var("ZENNAV_DATA_DIR", "/tmp/zennav-test");
        config.apply_env_overrides();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/zennav-test"));
    }

    #[test]
    fn test_env_override_admin_password() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();
        env::set_var("ZENNAV_ADMIN_PASSWORD", "hunter2");
        config.apply_env_overrides();
        assert_eq!(config.admin_password.as_deref(), Some("hunter2"));

        // Empty string clears it
        env::set_var("ZENNAV_ADMIN_PASSWORD", "");
        config.apply_env_overrides();
        assert!(config.admin_password.is_none());
    }

    #[test]
    fn test_env_override_lookup_policy() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();
        env::set_var("ZENNAV_LOOKUP_POLICY", "assume-absent");
        config.apply_env_overrides();
        assert_eq!(config.lookup_failure, LookupFailurePolicy::AssumeAbsent);

        // Unknown values are ignored
        env::set_var("ZENNAV_LOOKUP_POLICY", "sometimes");
        config.apply_env_overrides();
        assert_eq!(config.lookup_failure, LookupFailurePolicy::AssumeAbsent);
    }

    #[test]
    fn test_load_from_str() {
        let _guard = EnvGuard::new(ENV_VARS);

        let toml = r#"
            data_dir = "/custom/data"
            gist_api_url = "http://localhost:9000"
            lookup_failure = "assume-absent"
        "#;

        let config = Config::load_from_str(toml).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/custom/data"));
        assert_eq!(config.gist_api_url, "http://localhost:9000");
        assert_eq!(config.lookup_failure, LookupFailurePolicy::AssumeAbsent);
    }

    #[test]
    fn test_save_and_reload() {
        let _guard = EnvGuard::new(ENV_VARS);
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let config = Config {
            data_dir: temp_dir.path().join("data"),
            admin_password: Some("pw".to_string()),
            ..Config::default()
        };
        config.save_to_path(&path).unwrap();

        let loaded = Config::load_from_path(&path).unwrap();
        assert_eq!(loaded.data_dir, config.data_dir);
        assert_eq!(loaded.admin_password.as_deref(), Some("pw"));
        assert!(loaded.data_dir.exists());
    }

    #[test]
    fn test_load_from_path_missing_file() {
        let _guard = EnvGuard::new(ENV_VARS);
        let temp_dir = TempDir::new().unwrap();
        env::set_var("ZENNAV_DATA_DIR", temp_dir.path().join("data"));

        let config = Config::load_from_path(&temp_dir.path().join("missing.toml")).unwrap();
        assert_eq!(config.gist_api_url, DEFAULT_GIST_API_URL);
        assert_eq!(config.lookup_failure, LookupFailurePolicy::Fail);
    }
}
