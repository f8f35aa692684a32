// Weight configuration blending cost and output into the KPI score

use crate::error::RankingError;
use serde::{Deserialize, Serialize};

/// Both weights must add up to this
pub const WEIGHT_TOTAL: f64 = 100.0;

/// Positions offered by the weight sliders
pub const SLIDER_OPTIONS: [f64; 5] = [0.0, 25.0, 50.0, 75.0, 100.0];

const WEIGHT_EPSILON: f64 = 1e-9;

/// Relative importance of cost and output, in percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightConfig {
    pub cost_weight: f64,
    #[serde(alias = "lkg_weight")]
    pub output_weight: f64,
}

impl WeightConfig {
    /// Creates a weight pair without checking it; `validate` or the ranking
    /// engine rejects bad pairs
    pub fn new(cost_weight: f64, output_weight: f64) -> Self {
        Self {
            cost_weight,
            output_weight,
        }
    }

    /// Creates a weight pair and validates it in one step
    pub fn checked(cost_weight: f64, output_weight: f64) -> Result<Self, RankingError> {
        let weights = Self::new(cost_weight, output_weight);
        weights.validate()?;
        Ok(weights)
    }

    /// Weight pair for a cost slider position, output takes the remainder
    pub fn from_cost_weight(cost_weight: f64) -> Result<Self, RankingError> {
        Self::checked(cost_weight, WEIGHT_TOTAL - cost_weight)
    }

    /// Checks that each weight is within [0, 100] and that they sum to 100
    pub fn validate(&self) -> Result<(), RankingError> {
        let in_range = |w: f64| w.is_finite() && (0.0..=WEIGHT_TOTAL).contains(&w);
        let sums_to_total =
            (self.cost_weight + self.output_weight - WEIGHT_TOTAL).abs() <= WEIGHT_EPSILON;

        if in_range(self.cost_weight) && in_range(self.output_weight) && sums_to_total {
            Ok(())
        } else {
            Err(RankingError::InvalidWeightConfig {
                cost_weight: self.cost_weight,
                output_weight: self.output_weight,
            })
        }
    }

    /// One weight pair per slider position
    pub fn slider_presets() -> Vec<WeightConfig> {
        SLIDER_OPTIONS
            .iter()
            .map(|&cost| WeightConfig::new(cost, WEIGHT_TOTAL - cost))
            .collect()
    }
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self::new(50.0, 50.0)
    }
}
