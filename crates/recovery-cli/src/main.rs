use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "recovery-cli", version, about = "Short recovery routines for work breaks")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Accept (or revoke) the usage notice
    Consent {
        /// Withdraw consent
        #[arg(long)]
        revoke: bool,
    },
    /// Pro flag
    Pro {
        #[command(subcommand)]
        action: commands::account::ProAction,
    },
    /// Onboarding profile
    Profile {
        #[command(subcommand)]
        action: commands::account::ProfileAction,
    },
    /// Current check-in
    Checkin {
        #[command(subcommand)]
        action: commands::checkin::CheckinAction,
    },
    /// Recommend routines for the last check-in
    Recommend {
        /// List every eligible routine, not just the top picks
        #[arg(long)]
        all: bool,
    },
    /// Routine catalog
    Catalog {
        #[command(subcommand)]
        action: commands::catalog::CatalogAction,
    },
    /// Run a routine and rate it
    Play(commands::play::PlayArgs),
    /// Summary of the last days
    Report {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Recorded sessions, newest first
    History {
        /// Maximum number of sessions to print
        #[arg(long, default_value = "20")]
        limit: usize,
    },
    /// Export all stored data as JSON
    Export {
        /// Write to this file instead of stdout
        #[arg(long)]
        out: Option<std::path::PathBuf>,
    },
    /// Delete all stored data
    Reset,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Consent { revoke } => commands::account::consent(revoke),
        Commands::Pro { action } => commands::account::run_pro(action),
        Commands::Profile { action } => commands::account::run_profile(action),
        Commands::Checkin { action } => commands::checkin::run(action),
        Commands::Recommend { all } => commands::recommend::run(all),
        Commands::Catalog { action } => commands::catalog::run(action),
        Commands::Play(args) => commands::play::run(args),
        Commands::Report { json } => commands::report::report(json),
        Commands::History { limit } => commands::report::history(limit),
        Commands::Export { out } => commands::data::export(out),
        Commands::Reset => commands::data::reset(),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
