use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use fxfeed::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for fxfeed::AppCommand {
    fn from(cmd: Commands) -> fxfeed::AppCommand {
        match cmd {
            Commands::Run => fxfeed::AppCommand::Run,
            Commands::Rates => fxfeed::AppCommand::Rates,
            Commands::Convert { amount, from, to } => fxfeed::AppCommand::Convert {
                amount,
                from: from.to_uppercase(),
                to: to.to_uppercase(),
            },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Keep the rate table fresh until interrupted
    Run,
    /// Refresh once and display the rate table
    Rates,
    /// Refresh once and convert an amount between two currencies
    Convert {
        amount: f64,
        from: String,
        to: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => match cli.config_path.as_deref() {
            Some(path) => fxfeed::cli::setup::setup_at_path(path),
            None => fxfeed::cli::setup::setup(),
        },
        Some(cmd) => fxfeed::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
