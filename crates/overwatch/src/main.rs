//! Overwatch - a tool-using chat operative

use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{
    clear_command, engage_command, history_command, init_command, status_command, tools_command,
};

/// Overwatch - plan, act, review, answer
#[derive(Parser)]
#[command(name = "overwatch")]
#[command(about = "◆ A tool-using chat operative with a second-opinion reviewer")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config and workspace
    Init,
    /// Chat with the operative
    Engage {
        /// Message to send; omit for interactive mode
        #[arg(short, long)]
        message: Option<String>,
    },
    /// Print the conversation transcript
    History,
    /// Erase the conversation transcript
    Clear,
    /// List tools offered by the tool host
    Tools,
    /// Show system status
    Status,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let (label, result) = match cli.command {
        Commands::Init => ("Init", init_command().await),
        Commands::Engage { message } => ("Engage", engage_command(message).await),
        Commands::History => ("History", history_command().await),
        Commands::Clear => ("Clear", clear_command().await),
        Commands::Tools => ("Tools", tools_command().await),
        Commands::Status => ("Status", status_command().await),
    };

    if let Err(e) = result {
        error!("{} failed: {:#}", label, e);
        eprintln!("✗ {:#}", e);
        std::process::exit(1);
    }
}
