use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use std::fs;
use std::path::PathBuf;
use tabled::{Table, Tabled};

use runbeat::analysis::ActivityAnalyzer;
use runbeat::config::AppConfig;
use runbeat::logging::{init_logging, LogConfig};
use runbeat::models::{
    ActivityData, ActivitySummary, PlanKind, PlanRequest, PlanTarget, RunAnalysis, Segment,
    StreamSet,
    TrainingPlanOption,
};
use runbeat::plan::PlanSynthesizer;
use runbeat::playlist::{clip_requests, format_pace};

/// runbeat - Running Music Segmentation CLI
///
/// Splits a recorded run (or a synthetic training plan) into segments and
/// recommends a music genre and tempo for each one.
#[derive(Parser)]
#[command(name = "runbeat")]
#[command(version = "0.1.0")]
#[command(about = "Run segmentation and music style mapping", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a recorded activity and derive music-annotated segments
    Analyze {
        /// Activity JSON file (summary plus optional streams or splits)
        #[arg(short, long)]
        file: PathBuf,

        /// Output format (table, json)
        #[arg(short = 'F', long, default_value = "table")]
        format: String,
    },

    /// Generate synthetic training plan segments
    Plan {
        /// Target distance in kilometers
        #[arg(short, long)]
        distance: Option<f64>,

        /// Target duration in minutes
        #[arg(short = 'D', long)]
        duration: Option<f64>,

        /// Only show one plan shape (progressive, fartlek, hills)
        #[arg(short, long)]
        kind: Option<String>,

        /// Output format (table, json)
        #[arg(short = 'F', long, default_value = "table")]
        format: String,
    },

    /// Configure data source credentials
    Config {
        /// List all configuration keys
        #[arg(short, long)]
        list: bool,

        /// Set a configuration value (key=value)
        #[arg(short, long)]
        set: Option<String>,

        /// Get a configuration value
        #[arg(short, long)]
        get: Option<String>,
    },
}

#[derive(Tabled)]
struct SegmentRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Start km")]
    start_km: String,
    #[tabled(rename = "End km")]
    end_km: String,
    #[tabled(rename = "Pace")]
    pace: String,
    #[tabled(rename = "Elev Δm")]
    elevation: String,
    #[tabled(rename = "Genre")]
    genre: String,
    #[tabled(rename = "BPM")]
    tempo: u16,
}

impl SegmentRow {
    fn from_segment(segment: &Segment) -> Self {
        Self {
            index: segment.segment_index,
            start_km: segment.start_km.round_dp(2).to_string(),
            end_km: segment.end_km.round_dp(2).to_string(),
            pace: format_pace(segment.pace_seconds_per_km),
            elevation: segment.elevation_delta_meters.round_dp(1).to_string(),
            genre: segment.genre.to_string(),
            tempo: segment.tempo_bpm,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&LogConfig::from_verbosity(cli.verbose))?;

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => AppConfig::default_path()?,
    };

    match cli.command {
        Commands::Analyze { file, format } => run_analyze(&file, &format),
        Commands::Plan {
            distance,
            duration,
            kind,
            format,
        } => run_plan(distance, duration, kind.as_deref(), &format),
        Commands::Config { list, set, get } => run_config(&config_path, list, set, get),
    }
}

fn run_analyze(file: &PathBuf, format: &str) -> Result<()> {
    let contents = fs::read_to_string(file)
        .with_context(|| format!("failed to read activity file: {}", file.display()))?;
    let data: ActivityData = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse activity file: {}", file.display()))?;

    tracing::info!(
        activity = ?data.activity.name,
        streams = data.streams.as_ref().map(|s| s.len()).unwrap_or(0),
        splits = data.splits.as_ref().map(|s| s.len()).unwrap_or(0),
        "Analyzing activity"
    );

    let streams = data.streams.map(StreamSet::new);
    let analysis =
        ActivityAnalyzer::analyze(&data.activity, streams.as_ref(), data.splits.as_deref())?;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&analysis)?),
        "table" => print_analysis(&data.activity, &analysis),
        other => bail!("unknown output format: {}", other),
    }
    Ok(())
}

fn print_analysis(activity: &ActivitySummary, analysis: &RunAnalysis) {
    let title = activity.name.as_deref().unwrap_or("Activity");
    println!("{}", title.green().bold());

    let stats = &analysis.overall;
    let distance_km = stats.distance_meters / Decimal::from(1000);
    println!(
        "  {} km in {} min, {} m elevation gain, avg pace {}/km",
        distance_km.round_dp(2),
        (Decimal::from(stats.duration_seconds) / Decimal::from(60)).round_dp(1),
        stats.total_elevation_gain_meters.round_dp(0),
        format_pace(stats.average_pace_seconds_per_km),
    );
    println!();

    let rows: Vec<SegmentRow> = analysis
        .segments
        .iter()
        .map(SegmentRow::from_segment)
        .collect();
    println!("{}", Table::new(rows));

    let clips = clip_requests(&analysis.segments);
    println!(
        "{}",
        format!(
            "✓ {} segments, {} unique music clips to generate",
            analysis.segments.len(),
            clips.len()
        )
        .green()
    );
}

fn run_plan(
    distance: Option<f64>,
    duration: Option<f64>,
    kind: Option<&str>,
    format: &str,
) -> Result<()> {
    let request = match (distance, duration) {
        (Some(km), None) => PlanRequest {
            target: PlanTarget::Distance,
            value: Decimal::from_f64(km).context("invalid distance value")?,
        },
        (None, Some(minutes)) => PlanRequest {
            target: PlanTarget::Duration,
            value: Decimal::from_f64(minutes).context("invalid duration value")?,
        },
        _ => bail!("specify exactly one of --distance or --duration"),
    };

    let wanted = kind.map(PlanKind::from_str).transpose()?;
    let mut options = PlanSynthesizer::plan_options(&request)?;
    if let Some(kind) = wanted {
        options.retain(|option| option.id == kind);
    }

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&options)?),
        "table" => {
            for option in &options {
                print_plan_option(option);
            }
        }
        other => bail!("unknown output format: {}", other),
    }
    Ok(())
}

fn print_plan_option(option: &TrainingPlanOption) {
    println!("{}", option.name.cyan().bold());
    println!("  {}", option.description);
    let rows: Vec<SegmentRow> = option
        .segments
        .iter()
        .map(SegmentRow::from_segment)
        .collect();
    println!("{}", Table::new(rows));
    println!();
}

fn run_config(path: &PathBuf, list: bool, set: Option<String>, get: Option<String>) -> Result<()> {
    let mut config = AppConfig::load_or_default(path)?;

    if list {
        println!("{}", "Configuration keys:".white().bold());
        for (key, is_set) in config.list_keys() {
            let marker = if is_set { "set".green() } else { "unset".dimmed() };
            println!("  {} ({})", key, marker);
        }
    } else if let Some(key_value) = set {
        let (key, value) = key_value
            .split_once('=')
            .context("expected key=value for --set")?;
        config.set_value(key, value)?;
        config.save(path)?;
        println!("{}", format!("✓ {} updated", key).green());
    } else if let Some(key) = get {
        match config.get_value(&key)? {
            Some(value) => println!("{}", value),
            None => println!("{}", "(unset)".dimmed()),
        }
    } else {
        println!("Config file: {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_analyze_table_renders_after_stream_extraction() {
        let samples = 120u32;
        let distance: Vec<f64> = (0..samples).map(|i| f64::from(i) * 50.0).collect();
        let altitude: Vec<f64> = (0..samples).map(|i| f64::from(i) * 0.5).collect();
        let payload = serde_json::json!({
            "activity": {
                "name": "Morning Run",
                "moving_duration_seconds": 2160,
                "distance_meters": 5950.0,
            },
            "streams": [
                {"type": "distance", "data": distance},
                {"type": "altitude", "data": altitude},
            ],
        });

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", payload).unwrap();

        // The table path renders the activity header after the streams have
        // been consumed by the analyzer.
        run_analyze(&file.path().to_path_buf(), "table").unwrap();
        run_analyze(&file.path().to_path_buf(), "json").unwrap();
    }
}
