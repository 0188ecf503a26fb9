use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ConfigError, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub cache: CacheSettings,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Service credential appended to every upstream request.
    #[serde(default)]
    pub api_key: String,

    /// Per-call timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Entry time-to-live in seconds. One global value for all
    /// endpoints.
    #[serde(default = "default_cache_ttl")]
    pub ttl: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub json_format: bool,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .map_err(|_| ConfigError::NotFound(path.as_ref().display().to_string()))?;

        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.api.base_url)
            .map_err(|_| ConfigError::InvalidUrl(self.api.base_url.clone()))?;

        if self.api.timeout == 0 {
            return Err(ConfigError::Config("Timeout must be greater than 0".to_string()));
        }

        if self.api.page_size == 0 || self.api.page_size > 100 {
            return Err(ConfigError::Config(
                "Default page size must be between 1 and 100".to_string(),
            ));
        }

        if self.cache.ttl == 0 {
            return Err(ConfigError::Config("Cache TTL must be greater than 0".to_string()));
        }

        Ok(())
    }

    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("NEWSDESK_API_KEY") {
            self.api.api_key = key;
        }

        if let Ok(base_url) = std::env::var("NEWSDESK_BASE_URL") {
            self.api.base_url = base_url;
        }

        if let Ok(ttl) = std::env::var("NEWSDESK_CACHE_TTL") {
            if let Ok(val) = ttl.parse() {
                self.cache.ttl = val;
            }
        }

        if let Ok(level) = std::env::var("NEWSDESK_LOG_LEVEL") {
            self.logging.level = level;
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.ttl)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout)
    }

    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("newsdesk"))
            .ok_or_else(|| ConfigError::Config("Could not determine config directory".to_string()))
    }
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            timeout: default_timeout(),
            page_size: default_page_size(),
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl: default_cache_ttl(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json_format: false,
        }
    }
}

fn default_base_url() -> String {
    "https://newsapi.org/v2".to_string()
}
fn default_timeout() -> u64 {
    10
}
fn default_page_size() -> u32 {
    20
}
fn default_cache_ttl() -> u64 {
    900
}
fn default_log_level() -> String {
    "warn".to_string()
}
