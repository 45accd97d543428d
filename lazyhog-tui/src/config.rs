//! Configuration loading for lazyhog.
//!
//! Only `api_key` is required; every other field falls back to a default.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_INSTANCE_URL: &str = "https://app.posthog.com";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TuiConfig {
    #[serde(default = "default_instance_url")]
    pub instance_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub project_id: Option<u64>,
    #[serde(default)]
    pub environment: Option<Environment>,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_poll_pause_ms")]
    pub poll_pause_ms: u64,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_item_limit")]
    pub event_limit: usize,
    #[serde(default = "default_item_limit")]
    pub person_limit: usize,
    #[serde(default = "default_related_limit")]
    pub related_limit: usize,
    #[serde(default = "default_notification_ttl_ms")]
    pub notification_ttl_ms: u64,
    #[serde(default = "default_log_path")]
    pub log_path: PathBuf,
}

/// Deployment the instance belongs to. Production gets extra warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Prod,
    Dev,
}

impl Environment {
    /// Guess the environment from an instance URL. Unknown hosts are dev.
    pub fn detect(instance_url: &str) -> Self {
        let url = instance_url.to_ascii_lowercase();
        if ["app.posthog.com", "us.posthog.com", "eu.posthog.com"]
            .iter()
            .any(|host| url.contains(host))
        {
            Environment::Prod
        } else {
            Environment::Dev
        }
    }

    pub fn is_production(self) -> bool {
        self == Environment::Prod
    }

    pub fn label(self) -> &'static str {
        match self {
            Environment::Prod => "prod",
            Environment::Dev => "dev",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing configuration file path (use --config or LAZYHOG_CONFIG)")]
    MissingConfigPath,
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            instance_url: default_instance_url(),
            api_key: String::new(),
            project_id: None,
            environment: None,
            request_timeout_ms: default_request_timeout_ms(),
            poll_interval_ms: default_poll_interval_ms(),
            poll_pause_ms: default_poll_pause_ms(),
            debounce_ms: default_debounce_ms(),
            event_limit: default_item_limit(),
            person_limit: default_item_limit(),
            related_limit: default_related_limit(),
            notification_ttl_ms: default_notification_ttl_ms(),
            log_path: default_log_path(),
        }
    }
}

impl TuiConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path_from_args()
            .or_else(config_path_from_env)
            .or_else(default_config_path);
        let path = path.ok_or(ConfigError::MissingConfigPath)?;
        let mut config = Self::from_path(&path)?;
        config.apply_api_key_override(std::env::var("LAZYHOG_API_KEY").ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: TuiConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// A non-empty key from the environment replaces the file's key.
    pub fn apply_api_key_override(&mut self, api_key: Option<String>) {
        if let Some(key) = api_key.filter(|key| !key.trim().is_empty()) {
            self.api_key = key;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.instance_url.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "instance_url",
                reason: "must not be empty".to_string(),
            });
        }
        if !self.instance_url.starts_with("http://") && !self.instance_url.starts_with("https://")
        {
            return Err(ConfigError::InvalidValue {
                field: "instance_url",
                reason: "must start with http:// or https://".to_string(),
            });
        }
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "api_key",
                reason: "must not be empty (or set LAZYHOG_API_KEY)".to_string(),
            });
        }
        let durations = [
            ("request_timeout_ms", self.request_timeout_ms),
            ("poll_interval_ms", self.poll_interval_ms),
            ("poll_pause_ms", self.poll_pause_ms),
            ("debounce_ms", self.debounce_ms),
            ("notification_ttl_ms", self.notification_ttl_ms),
        ];
        for (field, value) in durations {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: "must be > 0".to_string(),
                });
            }
        }
        let limits = [
            ("event_limit", self.event_limit),
            ("person_limit", self.person_limit),
            ("related_limit", self.related_limit),
        ];
        for (field, value) in limits {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: "must be > 0".to_string(),
                });
            }
        }
        if self.log_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "log_path",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// The configured environment, or the one implied by the instance URL.
    pub fn environment(&self) -> Environment {
        self.environment
            .unwrap_or_else(|| Environment::detect(&self.instance_url))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn poll_pause(&self) -> Duration {
        Duration::from_millis(self.poll_pause_ms)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn notification_ttl(&self) -> Duration {
        Duration::from_millis(self.notification_ttl_ms)
    }
}

fn default_instance_url() -> String {
    DEFAULT_INSTANCE_URL.to_string()
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_poll_interval_ms() -> u64 {
    2_000
}

fn default_poll_pause_ms() -> u64 {
    30_000
}

fn default_debounce_ms() -> u64 {
    200
}

fn default_item_limit() -> usize {
    50
}

fn default_related_limit() -> usize {
    20
}

fn default_notification_ttl_ms() -> u64 {
    5_000
}

fn default_log_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("lazyhog")
        .join("lazyhog.log")
}

fn config_path_from_env() -> Option<PathBuf> {
    std::env::var("LAZYHOG_CONFIG").ok().map(PathBuf::from)
}

fn config_path_from_args() -> Option<PathBuf> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            return args.next().map(PathBuf::from);
        }
    }
    None
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("lazyhog").join("config.toml"))
}
