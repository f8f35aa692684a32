//! Error types for every layer of the crate

use thiserror::Error;

/// Ranking engine errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RankingError {
    #[error("Invalid weight config: cost {cost_weight} + output {output_weight} must be within [0, 100] and sum to 100")]
    InvalidWeightConfig { cost_weight: f64, output_weight: f64 },

    #[error("No cost records to rank")]
    EmptyInput,
}

/// Cost input validation errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{0} must be a valid number")]
    NotFinite(String),

    #[error("Unknown cost field: {0}")]
    UnknownField(String),
}

/// Persistence errors, local file or remote database
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Database returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Database not configured")]
    NotConfigured,

    #[error("Rejected cost record: {0}")]
    Validation(#[from] ValidationError),
}

/// Weather provider errors
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Weather API key not configured")]
    MissingApiKey,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Weather API returned {0}")]
    Status(u16),

    #[error("No weather location matches {0}")]
    UnknownLocation(String),
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

/// Chart rendering errors
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("Nothing to plot")]
    NoData,

    #[error("Drawing failed: {0}")]
    Drawing(String),
}
