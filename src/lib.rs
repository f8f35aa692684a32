// Public modules
pub mod algorithms;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod storage;
pub mod utils;
pub mod weather;

// Re-exports for convenience
pub use algorithms::cached::CachedRanker;
pub use algorithms::kpi_ranking::{rank, KpiRanker};
pub use algorithms::RankingEngine;
pub use config::AppConfig;
pub use error::{RankingError, StorageError, ValidationError};
pub use models::{CostRecord, HistorySnapshot, RankingRow, Tier, WeightConfig};
pub use storage::{HistoryRepository, HistoryStore, LocalStore, SupabaseClient};
