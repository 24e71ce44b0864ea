use clap::{Parser, Subcommand};

mod commands;
mod snapshot;

#[derive(Parser)]
#[command(name = "studyflow-cli", version, about = "Studyflow CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan generation and redistribution
    Plan {
        #[command(subcommand)]
        action: commands::plan::PlanAction,
    },
    /// Day locking
    Lock {
        #[command(subcommand)]
        action: commands::lock::LockAction,
    },
    /// Session maintenance
    Sessions {
        #[command(subcommand)]
        action: commands::sessions::SessionsAction,
    },
    /// Feasibility checks
    Check {
        #[command(subcommand)]
        action: commands::check::CheckAction,
    },
    /// Snapshot management
    Snapshot {
        #[command(subcommand)]
        action: commands::init::SnapshotAction,
    },
}

fn main() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Plan { action } => commands::plan::run(action),
        Commands::Lock { action } => commands::lock::run(action),
        Commands::Sessions { action } => commands::sessions::run(action),
        Commands::Check { action } => commands::check::run(action),
        Commands::Snapshot { action } => commands::init::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
