//! BidGuard CLI.
//!
//! This tool provides commands for:
//! - Validating settings files, including the activity rules they compile to
//! - Dry-running a bid request through the activity gate and the bidder
//!   request chain for each bidder

use clap::{Parser, Subcommand};
use log::LevelFilter;
use std::path::PathBuf;

mod config;
mod error;
mod evaluate;

use error::CliError;

#[derive(Parser)]
#[command(name = "bgcli")]
#[command(about = "BidGuard CLI for settings validation and bidder request dry runs")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Settings management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Run a bid request through the activity gate and the bidder chain
    Evaluate {
        /// Path to the TOML settings file
        #[arg(long, short, env = "BIDGUARD_SETTINGS")]
        settings: PathBuf,

        /// Path to the OpenRTB bid request JSON
        #[arg(long, short)]
        request: PathBuf,

        /// Path to decoded GPP sections as JSON
        #[arg(long, short)]
        gpp: Option<PathBuf>,

        /// Bidders to evaluate (defaults to every configured bidder)
        #[arg(long, short, value_delimiter = ',')]
        bidders: Vec<String>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Validate settings and compile the activity rules
    Validate {
        /// Path to the TOML settings file
        #[arg(long, short)]
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    if let Err(e) = bidguard_common::logging::init_logger(level) {
        eprintln!("Error: {e:?}");
        std::process::exit(1);
    }

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Config { action } => match action {
            ConfigAction::Validate { file } => config::validate(&file, cli.verbose > 0),
        },
        Commands::Evaluate {
            settings,
            request,
            gpp,
            bidders,
        } => evaluate::run(&settings, &request, gpp.as_deref(), &bidders),
    }
}
