// OpenWeather REST client with response caching, rate limiting and retries

use std::sync::Mutex;
use std::time::Duration;

use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::rate_limiter::{retry_with_backoff, RateLimiter};
use super::{find_weather_location, WeatherLocation};
use crate::config::{default_weather_base_url, AppConfig};
use crate::error::WeatherError;
use crate::utils::cache::TtlCache;

const BACKOFF_BASE: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MainReading {
    pub temp: f64,
    pub humidity: f64,
    #[serde(default)]
    pub feels_like: Option<f64>,
    #[serde(default)]
    pub pressure: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub main: String,
    pub description: String,
}

/// Response of the `/weather` endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    #[serde(default)]
    pub name: String,
    pub main: MainReading,
    #[serde(default)]
    pub weather: Vec<Condition>,
}

impl CurrentWeather {
    /// First condition description, empty when none was reported
    pub fn description(&self) -> &str {
        self.weather
            .first()
            .map(|c| c.description.as_str())
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    /// Unix timestamp
    pub dt: i64,
    pub main: MainReading,
    #[serde(default)]
    pub weather: Vec<Condition>,
    #[serde(default)]
    pub dt_txt: Option<String>,
}

/// Response of the `/forecast` endpoint (5 days, 3-hour steps)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub list: Vec<ForecastEntry>,
}

/// Blocking OpenWeather client
pub struct WeatherClient {
    api_key: Option<String>,
    base_url: String,
    http: Client,
    max_retries: u32,
    limiter: Mutex<RateLimiter>,
    current_cache: TtlCache<String, CurrentWeather>,
    forecast_cache: TtlCache<String, Forecast>,
}

impl WeatherClient {
    /// Builds a client from the application config. A missing API key is
    /// allowed; every fetch then fails with `MissingApiKey`.
    pub fn from_config(config: &AppConfig) -> Result<Self, WeatherError> {
        let (api_key, base_url) = match &config.openweather {
            Some(ow) => (Some(ow.api_key.clone()), ow.base_url.clone()),
            None => (None, default_weather_base_url()),
        };

        let http = Client::builder().timeout(config.api.timeout()).build()?;
        info!(active = api_key.is_some(), "weather client initialized");

        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
            max_retries: config.api.max_retries,
            limiter: Mutex::new(RateLimiter::new(
                config.api.rate_limit_calls,
                config.api.rate_limit_window(),
            )),
            current_cache: TtlCache::new(config.cache_ttl.weather_current()),
            forecast_cache: TtlCache::new(config.cache_ttl.weather_forecast()),
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Current conditions at a coordinate
    pub fn current_weather(&self, lat: f64, lon: f64) -> Result<CurrentWeather, WeatherError> {
        let key = format!("current_{}_{}", lat, lon);
        if let Some(cached) = self.current_cache.get(&key) {
            debug!(lat, lon, "using cached weather");
            return Ok(cached);
        }
        let weather: CurrentWeather = self.fetch("weather", lat, lon)?;
        self.current_cache.insert(key, weather.clone());
        Ok(weather)
    }

    /// Five-day forecast at a coordinate
    pub fn forecast(&self, lat: f64, lon: f64) -> Result<Forecast, WeatherError> {
        let key = format!("forecast_{}_{}", lat, lon);
        if let Some(cached) = self.forecast_cache.get(&key) {
            debug!(lat, lon, "using cached forecast");
            return Ok(cached);
        }
        let forecast: Forecast = self.fetch("forecast", lat, lon)?;
        self.forecast_cache.insert(key, forecast.clone());
        Ok(forecast)
    }

    /// Current conditions for a cost location, matched by name
    pub fn weather_for_location(
        &self,
        location_name: &str,
        locations: &[WeatherLocation],
    ) -> Result<CurrentWeather, WeatherError> {
        let loc = find_weather_location(location_name, locations)
            .ok_or_else(|| WeatherError::UnknownLocation(location_name.to_string()))?;
        self.current_weather(loc.latitude, loc.longitude)
    }

    fn fetch<T: DeserializeOwned>(&self, endpoint: &str, lat: f64, lon: f64) -> Result<T, WeatherError> {
        let api_key = self.api_key.as_deref().ok_or(WeatherError::MissingApiKey)?;
        let url = request_url(&self.base_url, endpoint, lat, lon, api_key);

        self.limiter
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .acquire();

        retry_with_backoff(self.max_retries, BACKOFF_BASE, |_| {
            let response = self.http.get(&url).send()?;
            let status = response.status();
            if !status.is_success() {
                return Err(WeatherError::Status(status.as_u16()));
            }
            Ok(response.json::<T>()?)
        })
    }
}

/// Full request URL for an OpenWeather endpoint, metric units
pub fn request_url(base_url: &str, endpoint: &str, lat: f64, lon: f64, api_key: &str) -> String {
    format!(
        "{}/{}?lat={}&lon={}&appid={}&units=metric",
        base_url, endpoint, lat, lon, api_key
    )
}
