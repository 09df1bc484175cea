mod cmd;
mod output;

use clap::{Parser, Subcommand};
use cmd::{task::TaskSubcommand, timeline::TimelineSubcommand};
use std::path::PathBuf;

use shift_core::clock::SystemClock;
use shift_core::store::FileStore;

#[derive(Parser)]
#[command(
    name = "shift",
    about = "Ship daily, build streaks, share the journey",
    version,
    propagate_version = true
)]
struct Cli {
    /// Data directory for persisted state
    #[arg(long, global = true, env = "SHIFT_DATA_DIR", default_value = ".shift")]
    data_dir: PathBuf,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Port to listen on
        #[arg(long, default_value = "3141")]
        port: u16,

        /// API key for the generative-language provider
        #[arg(long, env = "GEMINI_API_KEY")]
        api_key: Option<String>,
    },

    /// Manage today's tasks
    Task {
        #[command(subcommand)]
        subcommand: TaskSubcommand,
    },

    /// Show the streak, identity tier, and 7-day consistency
    Streak,

    /// Print the activity context handed to the content generator
    Context,

    /// Manage planner timelines
    Timeline {
        #[command(subcommand)]
        subcommand: TimelineSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let store = FileStore::new(&cli.data_dir);
    let clock = SystemClock;

    let result = match cli.command {
        Commands::Serve { port, api_key } => {
            cmd::serve::run(store, clock, port, api_key.as_deref())
        }
        Commands::Task { subcommand } => cmd::task::run(&store, &clock, subcommand, cli.json),
        Commands::Streak => cmd::streak::run(&store, &clock, cli.json),
        Commands::Context => cmd::context::run(&store, &clock),
        Commands::Timeline { subcommand } => {
            cmd::timeline::run(&store, &clock, subcommand, cli.json)
        }
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
