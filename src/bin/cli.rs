//! gps-to-kml - Annotated KML path from an NMEA position log
//!
//! Usage:
//!   gps-to-kml <input> <output.kml> [--config <json>] [--summary <json>] [-v]
//!
//! Reads `$GPRMC`/`$GNRMC` sentences, cleans the trajectory, detects stops
//! and left turns, and writes the path plus landmarks as KML.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;
use trace_landmarks::{
    load_track, write_kml_file, AnalysisConfig, KmlOptions, Result, TraceAnalysis,
};

#[derive(Parser)]
#[command(name = "gps-to-kml")]
#[command(about = "Convert an NMEA log into a KML path with stop and left-turn markers", long_about = None)]
struct Cli {
    /// NMEA log file
    input: PathBuf,

    /// KML file to write
    output: PathBuf,

    /// JSON file overriding analysis thresholds
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Also write a JSON summary to this path
    #[arg(short, long)]
    summary: Option<PathBuf>,

    /// Document name inside the KML
    #[arg(long, default_value = "GPS Route")]
    name: String,

    /// Altitude in meters for every coordinate
    #[arg(long, default_value_t = 3.0)]
    altitude: f64,

    /// Enable verbose debug output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    logger.format(|buf, record| writeln!(buf, "[{:5}] {}", record.level(), record.args()));
    if cli.verbose {
        logger.filter_level(LevelFilter::Debug);
    }
    logger.init();

    match run(&cli) {
        Ok(analysis) => {
            print_report(&cli.output, &analysis);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<TraceAnalysis> {
    let config = match &cli.config {
        Some(path) => AnalysisConfig::from_json_file(path)?,
        None => AnalysisConfig::default(),
    };

    let points = load_track(&cli.input)?;
    let analysis = TraceAnalysis::from_points(&points, &config);

    let options = KmlOptions {
        name: cli.name.clone(),
        altitude: cli.altitude,
    };
    write_kml_file(&cli.output, &analysis, &options)?;

    if let Some(summary_path) = &cli.summary {
        analysis.write_summary_json(summary_path)?;
    }

    Ok(analysis)
}

fn print_report(output: &Path, analysis: &TraceAnalysis) {
    println!("KML created: {}", output.display());
    println!(
        "  Points:          {} raw, {} cleaned",
        analysis.raw_point_count,
        analysis.cleaned.len()
    );
    println!("  Stops:           {}", analysis.landmarks.stops.len());
    println!("  Left turns:      {}", analysis.landmarks.turns.len());
    println!("  Distance:        {:.2} km", analysis.distance_m / 1000.0);
    println!("  Total duration:  {}", analysis.durations.total);
    println!("  Moving duration: {}", analysis.durations.moving);
}
