// Chart rendering for cost comparison, rankings and KPI trends

use std::collections::BTreeMap;
use std::path::Path;

use plotters::prelude::*;

use crate::error::ChartError;
use crate::models::{CostRecord, HistorySnapshot, RankingRow};

const CHART_SIZE: (u32, u32) = (1200, 800);

fn drawing<E: std::fmt::Display>(err: E) -> ChartError {
    ChartError::Drawing(err.to_string())
}

/// Total cost per producing location, in input order
pub fn cost_bars(records: &[CostRecord]) -> Vec<(String, f64)> {
    records
        .iter()
        .filter(|r| r.lkg > 0.0)
        .map(|r| (r.location.clone(), r.total_cost()))
        .collect()
}

/// Efficiency per location over snapshot week numbers, oldest first
pub fn trend_series(snapshots: &[HistorySnapshot]) -> BTreeMap<String, Vec<(u32, f64)>> {
    let mut ordered: Vec<&HistorySnapshot> = snapshots.iter().collect();
    ordered.sort_by_key(|s| (s.date, s.week_number));

    let mut series: BTreeMap<String, Vec<(u32, f64)>> = BTreeMap::new();
    for snapshot in ordered {
        for row in snapshot.rankings.iter().filter(|r| r.has_defined_efficiency()) {
            series
                .entry(row.location.clone())
                .or_default()
                .push((snapshot.week_number, row.efficiency));
        }
    }
    series
}

/// Bar chart of total cost per location
pub fn draw_cost_comparison(output_path: &Path, records: &[CostRecord]) -> Result<(), ChartError> {
    let bars = cost_bars(records);
    draw_bars(output_path, "Cost Comparison", "Total Cost", &bars, &BLUE)
}

/// Bar chart of KPI efficiency in rank order
pub fn draw_ranking(output_path: &Path, rows: &[RankingRow]) -> Result<(), ChartError> {
    let bars: Vec<(String, f64)> = rows
        .iter()
        .map(|r| (format!("#{} {}", r.rank, r.location), r.efficiency))
        .collect();
    draw_bars(output_path, "Efficiency Ranking", "KPI Score", &bars, &GREEN)
}

fn draw_bars(
    output_path: &Path,
    title: &str,
    y_desc: &str,
    bars: &[(String, f64)],
    color: &RGBColor,
) -> Result<(), ChartError> {
    if bars.is_empty() {
        return Err(ChartError::NoData);
    }

    let root = BitMapBackend::new(output_path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(drawing)?;

    let max_value = bars.iter().map(|(_, v)| *v).fold(0.0, f64::max);
    let y_top = if max_value > 0.0 { max_value * 1.1 } else { 1.0 };

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 30).into_font())
        .margin(10)
        .x_label_area_size(80)
        .y_label_area_size(80)
        .build_cartesian_2d(0f64..(bars.len() as f64), 0.0..y_top)
        .map_err(drawing)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(bars.len())
        .x_label_formatter(&|x| {
            let idx = *x as usize;
            bars.get(idx).map(|(name, _)| name.clone()).unwrap_or_default()
        })
        .y_desc(y_desc)
        .axis_desc_style(("sans-serif", 18))
        .label_style(("sans-serif", 13))
        .draw()
        .map_err(drawing)?;

    chart
        .draw_series(bars.iter().enumerate().map(|(i, (_, value))| {
            let x = i as f64;
            Rectangle::new([(x + 0.1, 0.0), (x + 0.9, *value)], color.mix(0.7).filled())
        }))
        .map_err(drawing)?;

    root.present().map_err(drawing)?;
    Ok(())
}

/// Line chart of each location's efficiency across saved snapshots
pub fn draw_kpi_trend(output_path: &Path, snapshots: &[HistorySnapshot]) -> Result<(), ChartError> {
    let series = trend_series(snapshots);
    if series.is_empty() {
        return Err(ChartError::NoData);
    }

    let weeks = series.values().flatten().map(|(w, _)| *w);
    let min_week = weeks.clone().min().unwrap_or(1);
    let max_week = weeks.max().unwrap_or(1).max(min_week + 1);

    let root = BitMapBackend::new(output_path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(drawing)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("KPI Trend", ("sans-serif", 30).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(min_week..max_week, 0.0..105.0)
        .map_err(drawing)?;

    chart
        .configure_mesh()
        .x_desc("Crop Week")
        .y_desc("KPI Score")
        .axis_desc_style(("sans-serif", 18))
        .draw()
        .map_err(drawing)?;

    for (i, (location, points)) in series.iter().enumerate() {
        let color = Palette99::pick(i).to_rgba();
        chart
            .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))
            .map_err(drawing)?
            .label(location.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(drawing)?;

    root.present().map_err(drawing)?;
    Ok(())
}
