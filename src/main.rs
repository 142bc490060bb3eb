use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use steerstat::config::SchemeParams;
use tracing::{error, Level};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Exported trial table (CSV).
    #[arg(global = true, short, long, default_value = "game_trials_export.csv")]
    input: PathBuf,

    #[command(flatten)]
    scheme: SchemeParams,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Within-participant permutation test of correctness and validity.
    Permute(cmd::permute::PermuteArgs),
    /// Descriptives, t-tests, correlations, danger alignment and regression.
    Analyze(cmd::analyze::AnalyzeArgs),
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.debug { Level::DEBUG } else { Level::INFO })
        .init();

    let scheme = cli.scheme.resolve().unwrap_or_else(|e| {
        error!("{}", e);
        process::exit(1);
    });

    let result = match cli.command {
        Commands::Permute(args) => cmd::permute::run(&cli.input, args, &scheme),
        Commands::Analyze(args) => cmd::analyze::run(&cli.input, args, &scheme),
    };

    if let Err(e) = result {
        error!("❌ {}", e);
        process::exit(1);
    }
}
