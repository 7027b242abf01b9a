mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use folio_core::analytics::Intensity;
use folio_core::config::{PathOverrides, Settings, SETTINGS_FILE};
use folio_core::domain::AppStatus;
use tracing_subscriber::EnvFilter;

use commands::Context;

/// Folio: maps a portfolio's image tree onto its app catalog
#[derive(Parser)]
#[command(name = "folio", version, about)]
struct Cli {
    /// Path to the settings file
    #[arg(long, global = true, default_value = SETTINGS_FILE)]
    config: PathBuf,

    /// Asset root directory (default: public)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// App catalog: .json, .txt or .db (default: data/apps.json)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Where to write the asset mapping
    #[arg(long, global = true)]
    mapping: Option<PathBuf>,

    /// Where to write the missing-assets report
    #[arg(long, global = true)]
    report: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve assets, write the mapping and report, archive unclaimed images
    Map {
        /// Print what would happen without writing or moving anything
        #[arg(long)]
        dry_run: bool,
    },
    /// Show the missing-assets report from the last run
    Report,
    /// List catalog apps with their resolved assets
    Apps {
        /// Match against name, description or tags
        #[arg(long, short)]
        query: Option<String>,
        /// Live, Finalizing or "In Development"
        #[arg(long)]
        status: Option<AppStatus>,
        /// Exact category name
        #[arg(long)]
        category: Option<String>,
    },
    /// Parse a numbered text app list into the SQLite catalog
    Seed {
        /// Text file to parse
        input: PathBuf,
        /// Catalog database to write
        #[arg(long, default_value = "data/apps.db")]
        db: PathBuf,
    },
    /// Show generated analytics for one app, or a portfolio summary
    Analytics {
        /// App name (omit for the whole catalog)
        app: Option<String>,
        /// Scale applied to page views
        #[arg(long, default_value_t = 1.0)]
        multiplier: f64,
        /// Days of traffic history
        #[arg(long, default_value_t = 7)]
        days: u32,
        /// Apply one live update tick: low, medium or high
        #[arg(long)]
        intensity: Option<Intensity>,
        /// Seed for the live update tick
        #[arg(long, default_value_t = 1_000_000_000_000)]
        timestamp: u64,
    },
}

fn init_tracing(verbose: u8) {
    let env_filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ctx = Context {
        settings: Settings::load_or_default(&cli.config)?,
        overrides: PathOverrides {
            asset_root: cli.root,
            mapping: cli.mapping,
            report: cli.report,
            catalog: cli.catalog,
        },
    };

    match cli.command {
        None => commands::map::run(&ctx, false)?,
        Some(Commands::Map { dry_run }) => commands::map::run(&ctx, dry_run)?,
        Some(Commands::Report) => commands::report::run(&ctx)?,
        Some(Commands::Apps {
            query,
            status,
            category,
        }) => commands::apps::run(&ctx, query, status, category)?,
        Some(Commands::Seed { input, db }) => commands::seed::run(&input, &db)?,
        Some(Commands::Analytics {
            app,
            multiplier,
            days,
            intensity,
            timestamp,
        }) => match app {
            Some(name) => commands::analytics::app(&name, multiplier, days, intensity, timestamp)?,
            None => commands::analytics::portfolio(&ctx)?,
        },
    }

    Ok(())
}
