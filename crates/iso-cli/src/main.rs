//! Command-line driver for the Isoscape adventure engine.

mod commands;
mod demo_world;
mod headless;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "isoscape",
    about = "Isoscape: an isometric adventure engine",
    version,
    propagate_version = true
)]
struct Cli {
    /// Log engine internals to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play the two-room demo headlessly from an input script
    Demo {
        /// Maximum number of ticks to run
        #[arg(short, long, default_value = "40")]
        ticks: u64,

        /// Input script, e.g. "wait*15,down*45,pick_up"
        #[arg(short, long)]
        script: Option<String>,

        /// World seconds per wall-clock second
        #[arg(long)]
        speed: Option<u32>,

        /// Engine configuration file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Pace ticks against the real clock instead of a simulated one
        #[arg(long)]
        realtime: bool,
    },

    /// Print the default engine configuration as JSON
    Config {
        /// File to write to (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Advance a calendar date and classify the step
    Calendar {
        /// Year
        year: i64,
        /// Month (1-12)
        month: i64,
        /// Day of the month
        day: i64,
        /// Hour
        #[arg(default_value = "0")]
        hours: i64,
        /// Minute
        #[arg(default_value = "0")]
        minutes: i64,
        /// Second
        #[arg(default_value = "0")]
        seconds: i64,

        /// Seconds to advance by
        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        advance: i64,
    },
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Demo {
            ticks,
            script,
            speed,
            config,
            realtime,
        } => commands::demo::run(&commands::demo::DemoOptions {
            ticks,
            script: script.as_deref(),
            speed,
            config: config.as_deref(),
            realtime,
        }),
        Commands::Config { output } => commands::config::run(output.as_deref()),
        Commands::Calendar {
            year,
            month,
            day,
            hours,
            minutes,
            seconds,
            advance,
        } => commands::calendar::run(
            iso_core::calendar::DateTime::new(year, month, day, hours, minutes, seconds),
            advance,
        ),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
