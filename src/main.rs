use anyhow::{Context, Result};
use tls_ranking::config::{AppConfig, APP_NAME, APP_VERSION};
use tls_ranking::logging::{init_logging, open_log_file};
use tls_ranking::models::{AppSettings, HistorySnapshot, WeightConfig};
use tls_ranking::storage::{HistoryRepository, HistoryStore, LocalStore, SupabaseClient};
use tls_ranking::utils::chart::{draw_cost_comparison, draw_kpi_trend, draw_ranking};
use tls_ranking::utils::crop_week::{current_week_info, format_date_display};
use tls_ranking::utils::validation::retain_valid;
use tls_ranking::weather::{weather_icon, WeatherClient};
use tls_ranking::{CachedRanker, KpiRanker, RankingEngine};
use tracing::{info, warn, Level};

fn main() -> Result<()> {
    let config = AppConfig::load().context("loading configuration")?;
    let data_dir = config.resolve_data_dir();

    let log_file = if config.logging.log_to_file {
        match open_log_file(&data_dir) {
            Ok(file) => Some(file),
            Err(e) => {
                eprintln!("Cannot open log file in {}: {}", data_dir.display(), e);
                None
            }
        }
    } else {
        None
    };
    init_logging(config.logging.format, Level::INFO, log_file);
    info!(version = APP_VERSION, data_dir = %data_dir.display(), "{} starting", APP_NAME);

    let store = LocalStore::open(&data_dir).context("opening data directory")?;
    let week = current_week_info();
    println!("{} v{}", APP_NAME, APP_VERSION);
    println!("{}", format_date_display(week.date));
    println!("Crop week {}: {}", week.week_number, week.week_range);

    // weights saved by the last run win over the configured ones
    let weights = match store.load_settings().map(|s| s.weights()) {
        Some(saved) if saved.validate().is_ok() => saved,
        _ => config.weights,
    };
    println!(
        "Weights: cost {:.0}% / LKG {:.0}%",
        weights.cost_weight, weights.output_weight
    );

    // current cost sheet
    let mut records = store.fetch_current_costs();
    for (location, e) in retain_valid(&mut records) {
        warn!(location = %location, error = %e, "cost record rejected, not ranked");
    }

    let ranker = CachedRanker::new(KpiRanker::new(), config.cache_ttl.calculations());
    let rankings = ranker.rank(&records, &weights).context("ranking locations")?;

    println!("\nKPI Ranking:");
    println!("-----------------------------------------------------------------------------");
    println!(
        "{:>4}  {:<18} {:>14} {:>10} {:>10} {:>10}  {}",
        "Rank", "Location", "Total Cost", "LKG", "PHP/LKG", "Score", "Tier"
    );
    for row in &rankings {
        let per_unit = row
            .cost_per_unit
            .map(|c| format!("{:.2}", c))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>4}  {:<18} {:>14.2} {:>10.2} {:>10} {:>10.2}  {}",
            row.rank, row.location, row.total_cost, row.lkg, per_unit, row.efficiency, row.tier
        );
    }

    let engine = ranker.inner();
    let by_region = engine.rank_by_region(&records, &weights)?;
    println!("\nRegional leaders:");
    for (region, rows) in &by_region {
        if let Some(top) = rows.first() {
            println!("  {:<8} {} ({:.2})", region, top.location, top.efficiency);
        }
    }

    println!("\nSensitivity (top location per weight preset):");
    for (preset, rows) in engine.sensitivity(&records, &WeightConfig::slider_presets())? {
        if let Some(top) = rows.first() {
            println!(
                "  cost {:>3.0}% / LKG {:>3.0}%: {}",
                preset.cost_weight, preset.output_weight, top.location
            );
        }
    }

    let analysis = engine.analyze(&records);

    // history snapshot, remote first when configured
    let primary: Option<Box<dyn HistoryStore>> = match SupabaseClient::from_config(&config) {
        Ok(client) if client.test_connection() => Some(Box::new(client)),
        _ => None,
    };
    let repository = HistoryRepository::new(primary, Box::new(store.clone()));
    let snapshot = HistorySnapshot::new(
        week.date,
        week.week_number,
        week.week_range.clone(),
        rankings.clone(),
        analysis,
    )
    .with_author(config.operator.clone());
    let stored_in = repository.save(&snapshot).context("saving history snapshot")?;
    let history = repository.load_all().unwrap_or_default();
    println!(
        "\nSnapshot saved ({:?}); {} snapshots on record",
        stored_in,
        history.len()
    );

    // charts
    let charts = [
        ("cost_comparison.png", draw_cost_comparison(&data_dir.join("cost_comparison.png"), &records)),
        ("ranking.png", draw_ranking(&data_dir.join("ranking.png"), &rankings)),
        ("kpi_trend.png", draw_kpi_trend(&data_dir.join("kpi_trend.png"), &history)),
    ];
    for (name, result) in charts {
        match result {
            Ok(()) => println!("Chart written: {}", data_dir.join(name).display()),
            Err(e) => warn!(chart = name, error = %e, "chart skipped"),
        }
    }

    // weather for configured locations
    let weather = WeatherClient::from_config(&config)?;
    if weather.has_api_key() {
        println!("\nWeather:");
        for row in &rankings {
            match weather.weather_for_location(&row.location, &config.weather_locations) {
                Ok(current) => println!(
                    "  {:<18} {} {:.1}°C, {:.0}% humidity",
                    row.location,
                    weather_icon(current.description()),
                    current.main.temp,
                    current.main.humidity
                ),
                Err(e) => info!(location = %row.location, error = %e, "no weather"),
            }
        }
    }

    store
        .save_settings(&AppSettings::new(week.date, week.week_number, weights))
        .context("saving settings")?;
    info!("done");
    Ok(())
}
