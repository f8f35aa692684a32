// History snapshot and persisted settings models

use crate::models::{CostMetrics, RankingRow, WeightConfig};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A saved ranking with its cost analysis, keyed by date and crop-year week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySnapshot {
    /// Database row id, absent until the row is stored remotely
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    pub timestamp: DateTime<Utc>,
    pub date: NaiveDate,
    pub week_number: u32,
    pub week_range: String,

    #[serde(rename = "rankings_json", alias = "rankings", default)]
    pub rankings: Vec<RankingRow>,

    #[serde(rename = "analysis_json", alias = "analysis", default)]
    pub analysis: Vec<CostMetrics>,

    #[serde(default = "default_created_by")]
    pub created_by: String,
}

fn default_created_by() -> String {
    "system".to_string()
}

impl HistorySnapshot {
    /// Creates a snapshot stamped with the current time
    pub fn new(
        date: NaiveDate,
        week_number: u32,
        week_range: String,
        rankings: Vec<RankingRow>,
        analysis: Vec<CostMetrics>,
    ) -> Self {
        Self {
            id: None,
            timestamp: Utc::now(),
            date,
            week_number,
            week_range,
            rankings,
            analysis,
            created_by: default_created_by(),
        }
    }

    /// Sets the author of the snapshot
    pub fn with_author<S: Into<String>>(mut self, created_by: S) -> Self {
        self.created_by = created_by.into();
        self
    }

    /// Efficiency recorded for a location, if it was ranked in this snapshot
    pub fn efficiency_of(&self, location: &str) -> Option<f64> {
        self.rankings
            .iter()
            .find(|row| row.location == location)
            .map(|row| row.efficiency)
    }
}

/// Settings kept between runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    pub current_date: NaiveDate,
    pub current_week: u32,
    pub cost_weight: f64,
    pub lkg_weight: f64,
}

impl AppSettings {
    pub fn new(current_date: NaiveDate, current_week: u32, weights: WeightConfig) -> Self {
        Self {
            current_date,
            current_week,
            cost_weight: weights.cost_weight,
            lkg_weight: weights.output_weight,
        }
    }

    /// Stored weights as a weight pair
    pub fn weights(&self) -> WeightConfig {
        WeightConfig::new(self.cost_weight, self.lkg_weight)
    }
}
