//! CLI entry point: clean the scraped season tables and forecast attendance.

use anyhow::{Result, anyhow};
use clap::Parser;
use dotenv::dotenv;
use polars::prelude::*;
use std::env;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use wsl_learning::{
    ForecastConfig, ForecastReport, ForecastResult, ModelInputBuilder, club_dummy_columns,
    fit_linear_model,
};
use wsl_processing::config::{DEFAULT_INPUT_DIR, DEFAULT_OUTPUT_DIR};
use wsl_processing::io::{SeasonFile, concat_tables, load_capacities, load_season_tables, save_csv};
use wsl_processing::mappings::{NATIONALITY_DROP_COLUMNS, WSL_DROP_COLUMNS};
use wsl_processing::normalizer::drop_columns;
use wsl_processing::{ProjectConfig, Season, process_nationality_table, process_season_table};

#[derive(Parser, Debug)]
#[command(
    author = "WSL Analytics",
    version,
    about = "Clean WSL season tables and forecast club attendance",
    long_about = "Cleans per-season Women's Super League tables, fits a linear attendance model \
                  on the seasons before a split year and extrapolates each club forward.\n\n\
                  ENVIRONMENT VARIABLES:\n  \
                  WSL_INPUT_DIR     Default for --input\n  \
                  WSL_OUTPUT_DIR    Default for --output\n\n\
                  EXAMPLES:\n  \
                  # Evaluate on 2022 onwards and forecast three seasons\n  \
                  wsl-forecast -i data/raw --forecast-years 3\n\n  \
                  # Save cleaned tables, forecasts and a JSON report\n  \
                  wsl-forecast -i data/raw --capacities data/capacity.csv --save --output-name wsl"
)]
struct Args {
    /// Directory holding wsl_{start}_{end}.csv and wsl_nationality_{start}_{end}.csv
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output directory for saved tables and reports
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Start year of the first season to load
    #[arg(long, default_value = "2011")]
    from: i32,

    /// Start year of the last season to load
    #[arg(long, default_value = "2024")]
    to: i32,

    /// First season start year of the test partition
    #[arg(long, default_value = "2022")]
    split_year: i32,

    /// Number of seasons to extrapolate past the last loaded one
    #[arg(long, default_value = "0")]
    forecast_years: u32,

    /// Comma-separated feature columns
    ///
    /// Defaults to Points, years_since_euro and every Club_ indicator.
    #[arg(long, value_delimiter = ',')]
    features: Vec<String>,

    /// CSV with Club and Capacity columns
    #[arg(long)]
    capacities: Option<PathBuf>,

    /// Season start year that years_since_euro counts from
    #[arg(long, default_value = "2022")]
    reference_year: i32,

    /// Write cleaned tables, forecasts and the report to the output directory
    #[arg(long)]
    save: bool,

    /// File-name prefix for saved outputs (required with --save)
    #[arg(long)]
    output_name: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show warnings and the final summary)
    #[arg(short, long)]
    quiet: bool,

    /// Output the JSON report to stdout instead of the human-readable summary
    ///
    /// Disables all logging so stdout only carries JSON.
    #[arg(long)]
    json: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Command-line value, then environment variable, then built-in default.
fn resolve_dir(cli: Option<PathBuf>, var: &str, default: &str) -> PathBuf {
    cli.or_else(|| env::var(var).ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(default))
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    // Load environment variables from .env file
    dotenv().ok();

    let mut builder = ProjectConfig::builder()
        .input_dir(resolve_dir(args.input.clone(), "WSL_INPUT_DIR", DEFAULT_INPUT_DIR))
        .output_dir(resolve_dir(args.output.clone(), "WSL_OUTPUT_DIR", DEFAULT_OUTPUT_DIR))
        .seasons(args.from, args.to)
        .save_outputs(args.save);
    if let Some(ref name) = args.output_name {
        builder = builder.output_name(name);
    }
    let project = builder.build()?;

    if !project.input_dir.is_dir() {
        return Err(anyhow!(
            "Input directory not found: {}",
            project.input_dir.display()
        ));
    }

    let seasons = project.seasons();
    let league = clean_league_tables(&project.input_dir, &seasons)?;
    if league.height() == 0 {
        return Err(anyhow!(
            "No league tables found in {} for seasons {}..={}",
            project.input_dir.display(),
            args.from,
            args.to
        ));
    }
    let nationality = clean_nationality_tables(&project.input_dir, &seasons)?;

    let mut input = ModelInputBuilder::new().reference_year(args.reference_year);
    if let Some(ref path) = args.capacities {
        input = input.capacities(load_capacities(path)?);
    }
    let model_df = input.build(&league)?;

    let features = if args.features.is_empty() {
        default_features(&model_df)
    } else {
        args.features.clone()
    };
    let forecast_config = ForecastConfig::builder()
        .feature_columns(features)
        .split_year(args.split_year)
        .forecast_years(args.forecast_years)
        .build()?;

    let result = fit_linear_model(&model_df, &forecast_config)?;

    let report = ForecastReport::new(
        &result,
        (args.from, args.to),
        league.height(),
        nationality.height(),
        &forecast_config.target_column,
        forecast_config.split_year,
    )?;

    if project.save_outputs {
        let name = project.output_name.as_deref().unwrap_or("wsl");
        save_outputs(&project.output_dir, name, league, nationality, &result)?;
        report.write(&project.output_dir, name)?;
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&result, &report);
    }

    Ok(())
}

/// Clean every available league table and stack them.
fn clean_league_tables(dir: &Path, seasons: &[Season]) -> Result<DataFrame> {
    let mut cleaned = Vec::new();
    for (season, raw) in load_season_tables(dir, SeasonFile::League, seasons)? {
        if let Some(df) = process_season_table(raw, season)? {
            cleaned.push(df);
        }
    }
    info!("Cleaned {} league tables", cleaned.len());
    Ok(drop_columns(concat_tables(cleaned)?, WSL_DROP_COLUMNS))
}

/// Clean every available nationality table and stack them.
fn clean_nationality_tables(dir: &Path, seasons: &[Season]) -> Result<DataFrame> {
    let mut cleaned = Vec::new();
    for (season, raw) in load_season_tables(dir, SeasonFile::Nationality, seasons)? {
        if let Some(df) = process_nationality_table(raw, season)? {
            cleaned.push(df);
        }
    }
    if cleaned.is_empty() {
        warn!("No nationality tables found");
    }
    Ok(drop_columns(concat_tables(cleaned)?, NATIONALITY_DROP_COLUMNS))
}

/// `Points`, `years_since_euro` and every club indicator present in `model_df`.
fn default_features(model_df: &DataFrame) -> Vec<String> {
    let mut features = vec!["Points".to_string(), "years_since_euro".to_string()];
    features.extend(club_dummy_columns(model_df));
    features
}

fn save_outputs(
    dir: &Path,
    name: &str,
    mut league: DataFrame,
    mut nationality: DataFrame,
    result: &ForecastResult,
) -> Result<()> {
    save_csv(&mut league, dir, Some(&format!("{name}_league")))?;
    if nationality.height() > 0 {
        save_csv(&mut nationality, dir, Some(&format!("{name}_nationality")))?;
    }

    save_csv(&mut result.train_df.clone(), dir, Some(&format!("{name}_train")))?;
    save_csv(&mut result.test_df.clone(), dir, Some(&format!("{name}_test")))?;
    if let Some(future) = &result.future_df {
        save_csv(&mut future.clone(), dir, Some(&format!("{name}_future")))?;
    }
    save_csv(
        &mut result.combined_metrics_df.clone(),
        dir,
        Some(&format!("{name}_metrics")),
    )?;

    info!("Outputs saved to {}", dir.display());
    Ok(())
}

/// Human-readable result summary.
///
/// Uses `println!` so the summary is shown regardless of log level.
fn print_summary(result: &ForecastResult, report: &ForecastReport) {
    println!("\n{}", "=".repeat(80));
    println!(
        "WSL ATTENDANCE MODEL ({}..={}, split at {})",
        report.first_season, report.last_season, report.split_year
    );
    println!("{}\n", "=".repeat(80));

    println!("  League rows:      {}", report.league_rows);
    println!("  Nationality rows: {}", report.nationality_rows);
    println!("  Train rows:       {}", result.train_df.height());
    println!("  Test rows:        {}", result.test_df.height());
    println!("  Intercept:        {:.2}", result.model.intercept());
    println!();

    println!("COEFFICIENTS");
    println!("{}", "-".repeat(40));
    for (feature, coefficient) in result.model.coefficients() {
        println!("  {feature:<30} {coefficient:>12.2}");
    }
    println!();

    println!("METRICS");
    println!("{}", "-".repeat(40));
    println!("{}", result.combined_metrics_df);

    if !report.forecasts.is_empty() {
        println!("\nFORECASTS");
        println!("{}", "-".repeat(40));
        for club in &report.forecasts {
            let seasons: Vec<String> = club
                .seasons
                .iter()
                .map(|(season, value)| match value {
                    Some(v) => format!("{}: {:.0}", Season::starting(*season), v),
                    None => format!("{}: n/a", Season::starting(*season)),
                })
                .collect();
            println!("  {:<20} {}", club.club, seasons.join(", "));
        }
    }
}
