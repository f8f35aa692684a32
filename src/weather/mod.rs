//! Supplementary weather data for operating locations

pub mod client;
pub mod rate_limiter;

pub use self::client::{Condition, CurrentWeather, Forecast, ForecastEntry, MainReading, WeatherClient};
pub use self::rate_limiter::{retry_with_backoff, RateLimiter};

use serde::{Deserialize, Serialize};

/// A named coordinate weather is fetched for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherLocation {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Finds the weather location whose name contains, or is contained in,
/// `location_name`, ignoring case
pub fn find_weather_location<'a>(
    location_name: &str,
    locations: &'a [WeatherLocation],
) -> Option<&'a WeatherLocation> {
    let wanted = location_name.to_uppercase();
    locations.iter().find(|loc| {
        let name = loc.name.to_uppercase();
        wanted.contains(&name) || name.contains(&wanted)
    })
}

/// Icon for an OpenWeather condition description
pub fn weather_icon(description: &str) -> &'static str {
    let desc = description.to_lowercase();
    if desc.contains("clear") {
        "☀️"
    } else if desc.contains("cloud") {
        "☁️"
    } else if desc.contains("rain") || desc.contains("drizzle") {
        "🌧️"
    } else if desc.contains("thunder") || desc.contains("storm") {
        "⛈️"
    } else if desc.contains("snow") {
        "❄️"
    } else if desc.contains("mist") || desc.contains("fog") {
        "🌫️"
    } else {
        "🌤️"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locations() -> Vec<WeatherLocation> {
        vec![
            WeatherLocation {
                name: "Escalante".to_string(),
                latitude: 10.84,
                longitude: 123.5,
            },
            WeatherLocation {
                name: "San Jose".to_string(),
                latitude: 10.0,
                longitude: 123.0,
            },
        ]
    }

    #[test]
    fn test_find_by_containment() {
        let locs = locations();
        assert_eq!(
            find_weather_location("ESCALANTE CITY", &locs).map(|l| l.name.as_str()),
            Some("Escalante")
        );
        assert_eq!(
            find_weather_location("jose", &locs).map(|l| l.name.as_str()),
            Some("San Jose")
        );
        assert!(find_weather_location("MURCIA", &locs).is_none());
    }

    #[test]
    fn test_weather_icon() {
        assert_eq!(weather_icon("Clear sky"), "☀️");
        assert_eq!(weather_icon("light rain"), "🌧️");
        assert_eq!(weather_icon("thunderstorm"), "⛈️");
        assert_eq!(weather_icon("haze"), "🌤️");
    }
}
