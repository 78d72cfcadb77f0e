// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use fsplan_core::coord::format_position;
use fsplan_core::plan::{AIRPORT_ELEVATION, DEFAULT_TITLE};
use fsplan_core::{
    make_flight_plan, FeatureSource, GeoPoint, LogFeedback, PlanOptions, SourceOptions, Strip,
    StripIndex,
};
use log::debug;
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};
use std::path::{Path, PathBuf};

/// Build Microsoft Flight Simulator flight plans from a point layer of waypoints.
///
/// Departure and destination airports are the nearest strips to the first and
/// last waypoint, unless custom ICAO ids are given.
#[derive(Parser)]
#[command(name = "fsplan", author, version)]
struct Cli {
    /// Airport strips CSV (icao,nameshort,lat,lon) replacing the bundled dataset
    #[arg(long, global = true, env = "FSPLAN_STRIPS")]
    strips: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a .PLN flight plan from a CSV or GeoJSON waypoints file
    Build(BuildArgs),
    /// Show the airport strip with the given ICAO id
    Airport { icao: String },
    /// Show the airport strip nearest to a position
    Nearest {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
    },
}

#[derive(Args)]
struct BuildArgs {
    /// Flight waypoints file (.csv, .geojson or .json)
    input: PathBuf,

    /// Output flight plan file (.PLN)
    #[arg(short, long)]
    output: PathBuf,

    /// Flight plan description
    #[arg(short, long, default_value = DEFAULT_TITLE)]
    title: String,

    /// Waypoints name field
    #[arg(long)]
    name_field: Option<String>,

    /// Waypoints elevation field (feet)
    #[arg(long)]
    elevation_field: Option<String>,

    /// Waypoints ordering, e.g. "seq" or "leg DESC, seq"
    #[arg(long)]
    order_by: Option<String>,

    /// Custom departure airport ICAO ID
    #[arg(long)]
    departure: Option<String>,

    /// Custom destination airport ICAO ID
    #[arg(long)]
    destination: Option<String>,

    /// Longitude column for CSV input
    #[arg(long, default_value = "lon")]
    lon_field: String,

    /// Latitude column for CSV input
    #[arg(long, default_value = "lat")]
    lat_field: String,
}

impl BuildArgs {
    fn plan_options(&self) -> PlanOptions {
        PlanOptions {
            title: self.title.clone(),
            name_field: self.name_field.clone(),
            elevation_field: self.elevation_field.clone(),
            order_by: self.order_by.clone(),
            departure: self.departure.clone(),
            destination: self.destination.clone(),
        }
    }

    fn source_options(&self) -> SourceOptions {
        SourceOptions {
            lon_field: self.lon_field.clone(),
            lat_field: self.lat_field.clone(),
        }
    }
}

fn log_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn init_logging(level: LevelFilter) {
    let config = ConfigBuilder::new()
        .set_time_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Debug)
        .build();
    if let Err(e) = TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto) {
        debug!("Keeping the installed logger — {}", e);
    }
}

fn load_strips(path: Option<&Path>) -> Result<StripIndex> {
    let index = match path {
        Some(path) => StripIndex::load_csv(path)
            .with_context(|| format!("Failed to load strips dataset {}", path.display()))?,
        None => StripIndex::bundled().context("Failed to load bundled strips dataset")?,
    };
    debug!("Strips dataset ready — strips={}", index.len());
    Ok(index)
}

fn describe(strip: &Strip) -> String {
    format!(
        "{}  {}  {}",
        strip.icao,
        strip.name_short,
        format_position(strip.position(), AIRPORT_ELEVATION)
    )
}

fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        Commands::Build(args) => {
            let source = FeatureSource::open(&args.input, &args.source_options())
                .with_context(|| format!("Failed to read waypoints {}", args.input.display()))?;
            let strips = load_strips(cli.strips.as_deref())?;

            let mut feedback = LogFeedback::new();
            let plan = make_flight_plan(
                &source,
                &strips,
                &args.plan_options(),
                &args.output,
                &mut feedback,
            )
            .context("Failed to build flight plan")?;

            println!(
                "Wrote {} ({} -> {}, {} waypoints)",
                args.output.display(),
                plan.departure.icao,
                plan.destination.icao,
                plan.waypoints.len()
            );
        }
        Commands::Airport { icao } => {
            let strips = load_strips(cli.strips.as_deref())?;
            match strips.find_icao(icao) {
                Some(strip) => println!("{}", describe(strip)),
                None => anyhow::bail!("No airport found with ICAO ID '{}'", icao),
            }
        }
        Commands::Nearest { lat, lon } => {
            anyhow::ensure!(
                lat.is_finite() && lon.is_finite(),
                "Position must be finite, got lat={} lon={}",
                lat,
                lon
            );
            let strips = load_strips(cli.strips.as_deref())?;
            let strip = strips
                .nearest(GeoPoint::new(*lon, *lat))
                .ok_or_else(|| anyhow::anyhow!("Strips dataset contains no airports"))?;
            println!("{}", describe(strip));
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(log_level(cli.verbose, cli.quiet));
    run(cli)
}
