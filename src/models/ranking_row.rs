// Ranking row model produced by the KPI ranking engine

use crate::models::{Cost, LocationId, Score};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse efficiency band used for color-coded display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    Excellent,
    Good,
    Average,
    Poor,
}

impl Tier {
    /// Short human label
    pub fn label(&self) -> &'static str {
        match self {
            Tier::Excellent => "Excellent",
            Tier::Good => "Good",
            Tier::Average => "Average",
            Tier::Poor => "Poor",
        }
    }

    /// Style class name the dashboard uses for this tier
    pub fn css_class(&self) -> &'static str {
        match self {
            Tier::Excellent => "efficiency-excellent",
            Tier::Good => "efficiency-good",
            Tier::Average => "efficiency-average",
            Tier::Poor => "efficiency-poor",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One location's position in a computed ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingRow {
    pub location: LocationId,
    pub region: String,
    pub total_cost: Cost,
    pub lkg: f64,

    /// Total cost per kg of output; None marks undefined efficiency (zero output)
    pub cost_per_unit: Option<f64>,

    /// Normalized cost score in [0, 100], lower cost per unit scores higher
    pub cost_score: Score,

    /// Normalized output score in [0, 100]
    pub output_score: Score,

    /// Weighted KPI score in [0, 100]
    pub efficiency: Score,

    /// 1 is best
    pub rank: usize,

    pub tier: Tier,
}

impl RankingRow {
    /// Whether this row has a defined cost per unit
    pub fn has_defined_efficiency(&self) -> bool {
        self.cost_per_unit.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_labels() {
        assert_eq!(Tier::Excellent.to_string(), "Excellent");
        assert_eq!(Tier::Poor.css_class(), "efficiency-poor");
    }
}
