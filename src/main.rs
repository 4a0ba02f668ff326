use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use fxpair::cli::convert::ConvertRequest;
use fxpair::core::log::init_logging;

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

impl From<Commands> for fxpair::AppCommand {
    fn from(cmd: Commands) -> fxpair::AppCommand {
        match cmd {
            Commands::Currencies => fxpair::AppCommand::Currencies,
            Commands::Convert {
                amount,
                from,
                to,
                reverse,
            } => fxpair::AppCommand::Convert(ConvertRequest {
                amount,
                from,
                to,
                reverse,
            }),
            Commands::Interactive => fxpair::AppCommand::Interactive,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// List supported currencies
    Currencies,
    /// Convert an amount between the pair
    Convert {
        /// Amount to convert
        amount: String,
        /// Currency code for the 'from' side
        #[arg(short, long)]
        from: Option<String>,
        /// Currency code for the 'to' side
        #[arg(short, long)]
        to: Option<String>,
        /// Treat the amount as the 'to' side
        #[arg(short, long)]
        reverse: bool,
    },
    /// Edit both sides of the pair from the terminal
    Interactive,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => fxpair::cli::setup::setup(),
        Some(cmd) => fxpair::run_command(cmd.into(), cli.config_path.as_deref()).await,
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
