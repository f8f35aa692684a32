pub mod cached;
pub mod kpi_ranking;

// Common algorithm traits
use crate::error::RankingError;
use crate::models::{CostRecord, RankingRow, WeightConfig};

/// Trait for KPI ranking engines
///
/// Implementations must be pure functions of `(records, weights)` so that
/// results can be memoized by a fingerprint of those inputs.
pub trait RankingEngine {
    /// Rank the given locations, best first
    fn rank(
        &self,
        records: &[CostRecord],
        weights: &WeightConfig,
    ) -> Result<Vec<RankingRow>, RankingError>;
}
