//! Application configuration loaded from TOML

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ConfigError;
use crate::logging::LoggingConfig;
use crate::models::WeightConfig;
use crate::weather::WeatherLocation;

/// Default configuration file, overridable with `TLS_RANKING_CONFIG`
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
pub const CONFIG_PATH_ENV: &str = "TLS_RANKING_CONFIG";

pub const APP_NAME: &str = "TLS Cost Input & Ranking System";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

const DATA_DIR_NAME: &str = ".tls_app_data";

/// Keeps `2^attempt` backoff waits bounded
pub const MAX_RETRIES_LIMIT: u32 = 10;

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where local JSON files and the log file live
    pub data_dir: Option<PathBuf>,
    /// Name recorded as author of saved snapshots
    pub operator: String,
    /// Starting weights when no settings were saved
    pub weights: WeightConfig,
    pub logging: LoggingConfig,
    pub cache_ttl: CacheTtlConfig,
    pub api: ApiConfig,
    pub supabase: Option<SupabaseConfig>,
    pub openweather: Option<OpenWeatherConfig>,
    pub weather_locations: Vec<WeatherLocation>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            operator: "system".to_string(),
            weights: WeightConfig::default(),
            logging: LoggingConfig::default(),
            cache_ttl: CacheTtlConfig::default(),
            api: ApiConfig::default(),
            supabase: None,
            openweather: None,
            weather_locations: Vec::new(),
        }
    }
}

/// Cache lifetimes in seconds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheTtlConfig {
    pub weather_current: u64,
    pub weather_forecast: u64,
    pub calculations: u64,
}

impl Default for CacheTtlConfig {
    fn default() -> Self {
        Self {
            weather_current: 600,
            weather_forecast: 1800,
            calculations: 60,
        }
    }
}

impl CacheTtlConfig {
    pub fn calculations(&self) -> Duration {
        Duration::from_secs(self.calculations)
    }

    pub fn weather_current(&self) -> Duration {
        Duration::from_secs(self.weather_current)
    }

    pub fn weather_forecast(&self) -> Duration {
        Duration::from_secs(self.weather_forecast)
    }
}

/// Outbound HTTP behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub timeout_secs: u64,
    pub max_retries: u32,
    /// Calls allowed per rate limit window
    pub rate_limit_calls: usize,
    pub rate_limit_window_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            max_retries: 3,
            rate_limit_calls: 60,
            rate_limit_window_secs: 60,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit_window_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupabaseConfig {
    pub url: String,
    pub key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenWeatherConfig {
    pub api_key: String,
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
}

pub(crate) fn default_weather_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

impl AppConfig {
    /// Loads the file named by `TLS_RANKING_CONFIG` (or the default path),
    /// falling back to defaults when it does not exist
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut config = if Path::new(&path).exists() {
            Self::from_file(Path::new(&path))?
        } else {
            info!(path = %path, "config file not found, using defaults");
            Self::default()
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Credentials from the environment win over the file
    pub fn apply_env_overrides(&mut self) {
        if let (Ok(url), Ok(key)) = (std::env::var("SUPABASE_URL"), std::env::var("SUPABASE_KEY")) {
            self.supabase = Some(SupabaseConfig { url, key });
        }
        if let Ok(api_key) = std::env::var("OPENWEATHER_API_KEY") {
            let base_url = self
                .openweather
                .as_ref()
                .map(|o| o.base_url.clone())
                .unwrap_or_else(default_weather_base_url);
            self.openweather = Some(OpenWeatherConfig { api_key, base_url });
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.weights
            .validate()
            .map_err(|e| ConfigError::InvalidValue {
                field: "weights".to_string(),
                message: e.to_string(),
            })?;
        if self.api.max_retries == 0 || self.api.max_retries > MAX_RETRIES_LIMIT {
            return Err(ConfigError::InvalidValue {
                field: "api.max_retries".to_string(),
                message: format!("must be between 1 and {}", MAX_RETRIES_LIMIT),
            });
        }
        if self.api.rate_limit_calls == 0 {
            return Err(ConfigError::InvalidValue {
                field: "api.rate_limit_calls".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Configured data directory, or `~/.tls_app_data`, or one under the
    /// system temp dir when no home directory is known
    pub fn resolve_data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }
        std::env::var_os("HOME")
            .or_else(|| std::env::var_os("USERPROFILE"))
            .map(|home| PathBuf::from(home).join(DATA_DIR_NAME))
            .unwrap_or_else(|| std::env::temp_dir().join("tls_app_data"))
    }
}
