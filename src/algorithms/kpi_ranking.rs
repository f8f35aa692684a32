use std::cmp::Ordering;
use std::collections::BTreeMap;

use rayon::prelude::*;

use crate::algorithms::RankingEngine;
use crate::error::RankingError;
use crate::models::{
    CostMetrics, CostRecord, RankingRow, Score, Tier, WeightConfig, WEIGHT_TOTAL,
};

const MAX_SCORE: Score = 100.0;

/// Weighted cost/output KPI ranking
///
/// Scores every location on two normalized axes, cost per kg (lower is better)
/// and output (higher is better), blends them with the configured weights and
/// orders the result. Locations with zero output have no cost per kg; they are
/// kept in the result but ranked after every location with a defined cost.
#[derive(Debug, Clone, Copy, Default)]
pub struct KpiRanker;

impl KpiRanker {
    pub fn new() -> Self {
        Self
    }

    /// Ranks each region on its own, regions in name order
    pub fn rank_by_region(
        &self,
        records: &[CostRecord],
        weights: &WeightConfig,
    ) -> Result<BTreeMap<String, Vec<RankingRow>>, RankingError> {
        weights.validate()?;
        if records.is_empty() {
            return Err(RankingError::EmptyInput);
        }

        let mut by_region: BTreeMap<String, Vec<CostRecord>> = BTreeMap::new();
        for record in records {
            by_region
                .entry(record.region.clone())
                .or_default()
                .push(record.clone());
        }

        by_region
            .into_iter()
            .map(|(region, group)| rank(&group, weights).map(|rows| (region, rows)))
            .collect()
    }

    /// Ranks the same records under several weight pairs in parallel,
    /// results in the order of `presets`
    pub fn sensitivity(
        &self,
        records: &[CostRecord],
        presets: &[WeightConfig],
    ) -> Result<Vec<(WeightConfig, Vec<RankingRow>)>, RankingError> {
        presets
            .par_iter()
            .map(|weights| rank(records, weights).map(|rows| (*weights, rows)))
            .collect()
    }

    /// Cost-sheet metrics per location, sorted by location
    pub fn analyze(&self, records: &[CostRecord]) -> Vec<CostMetrics> {
        let mut metrics: Vec<CostMetrics> = records.iter().map(CostMetrics::from_record).collect();
        metrics.sort_by(|a, b| a.location.cmp(&b.location));
        metrics
    }
}

impl RankingEngine for KpiRanker {
    fn rank(
        &self,
        records: &[CostRecord],
        weights: &WeightConfig,
    ) -> Result<Vec<RankingRow>, RankingError> {
        rank(records, weights)
    }
}

/// Computes the KPI ranking for `records` under `weights`
pub fn rank(records: &[CostRecord], weights: &WeightConfig) -> Result<Vec<RankingRow>, RankingError> {
    weights.validate()?;
    if records.is_empty() {
        return Err(RankingError::EmptyInput);
    }

    let costs_per_unit: Vec<Option<f64>> = records.iter().map(CostRecord::cost_per_unit).collect();
    let defined_costs: Vec<f64> = costs_per_unit.iter().flatten().copied().collect();
    let outputs: Vec<f64> = records.iter().map(|r| r.lkg).collect();

    let cost_bounds = bounds(&defined_costs);
    let output_bounds = bounds(&outputs);

    let mut rows: Vec<RankingRow> = records
        .iter()
        .zip(&costs_per_unit)
        .map(|(record, cost_per_unit)| {
            // Undefined cost per unit contributes nothing on the cost axis
            let cost_score = match (cost_per_unit, cost_bounds) {
                (Some(cpu), Some(b)) => lower_is_better(*cpu, b),
                _ => 0.0,
            };
            let output_score = output_bounds
                .map(|b| higher_is_better(record.lkg, b))
                .unwrap_or(0.0);
            let efficiency = (cost_score * weights.cost_weight
                + output_score * weights.output_weight)
                / WEIGHT_TOTAL;

            RankingRow {
                location: record.location.clone(),
                region: record.region.clone(),
                total_cost: record.total_cost(),
                lkg: record.lkg,
                cost_per_unit: *cost_per_unit,
                cost_score,
                output_score,
                efficiency,
                rank: 0,
                tier: Tier::Poor,
            }
        })
        .collect();

    rows.sort_by(compare_rows);

    let defined_scores: Vec<Score> = rows
        .iter()
        .filter(|row| row.has_defined_efficiency())
        .map(|row| row.efficiency)
        .collect();
    let quartiles = Quartiles::from_scores(&defined_scores);

    for (i, row) in rows.iter_mut().enumerate() {
        row.rank = i + 1;
        row.tier = match (&quartiles, row.has_defined_efficiency()) {
            (_, false) => Tier::Poor,
            (Some(q), true) => q.tier_of(row.efficiency),
            (None, true) => Tier::Average,
        };
    }

    Ok(rows)
}

/// Defined rows by efficiency (desc) then location; undefined rows last by location
fn compare_rows(a: &RankingRow, b: &RankingRow) -> Ordering {
    match (a.has_defined_efficiency(), b.has_defined_efficiency()) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (true, true) => b
            .efficiency
            .total_cmp(&a.efficiency)
            .then_with(|| a.location.cmp(&b.location)),
        (false, false) => a.location.cmp(&b.location),
    }
}

fn bounds(values: &[f64]) -> Option<(f64, f64)> {
    let min = values.iter().copied().reduce(f64::min)?;
    let max = values.iter().copied().reduce(f64::max)?;
    Some((min, max))
}

fn lower_is_better(value: f64, (min, max): (f64, f64)) -> Score {
    if max == min {
        return MAX_SCORE;
    }
    (max - value) / (max - min) * MAX_SCORE
}

fn higher_is_better(value: f64, (min, max): (f64, f64)) -> Score {
    if max == min {
        return MAX_SCORE;
    }
    (value - min) / (max - min) * MAX_SCORE
}

/// Quartile cut points over a set of scores
#[derive(Debug, Clone, Copy, PartialEq)]
struct Quartiles {
    q25: Score,
    q50: Score,
    q75: Score,
}

impl Quartiles {
    /// None when fewer than two scores are available
    fn from_scores(scores: &[Score]) -> Option<Self> {
        if scores.len() < 2 {
            return None;
        }
        let mut sorted = scores.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        Some(Self {
            q25: percentile(&sorted, 25.0),
            q50: percentile(&sorted, 50.0),
            q75: percentile(&sorted, 75.0),
        })
    }

    fn tier_of(&self, score: Score) -> Tier {
        if score >= self.q75 {
            Tier::Excellent
        } else if score >= self.q50 {
            Tier::Good
        } else if score >= self.q25 {
            Tier::Average
        } else {
            Tier::Poor
        }
    }
}

/// Linear-interpolation percentile over ascending `sorted`
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let position = p / 100.0 * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}
