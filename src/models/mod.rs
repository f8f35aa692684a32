// Models module - exports all model types

mod cost_record;
mod ranking_row;
mod snapshot;
mod weights;

// Re-export model types
pub use self::cost_record::{CostComponents, CostMetrics, CostRecord, FUEL_COST_DIVISOR};
pub use self::ranking_row::{RankingRow, Tier};
pub use self::snapshot::{AppSettings, HistorySnapshot};
pub use self::weights::{WeightConfig, SLIDER_OPTIONS, WEIGHT_TOTAL};

// Common type aliases for improved code readability
pub type LocationId = String;
pub type Cost = f64;
pub type Score = f64;
