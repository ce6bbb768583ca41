use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use kurzy::cli::convert::ConvertOptions;
use kurzy::core::log::init_logging;

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

impl From<Commands> for kurzy::AppCommand {
    fn from(cmd: Commands) -> kurzy::AppCommand {
        match cmd {
            Commands::Rates => kurzy::AppCommand::Rates,
            Commands::Convert {
                amount,
                currency,
                foreign,
                interactive,
            } => kurzy::AppCommand::Convert(ConvertOptions {
                amount,
                currency,
                from_foreign: foreign,
                interactive,
            }),
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display the daily exchange rate fixing
    Rates,
    /// Convert between CZK and a foreign currency
    Convert {
        /// Amount to convert (CZK unless --foreign is given)
        #[arg(default_value = "100")]
        amount: String,

        /// Foreign currency code, e.g. EUR or USD
        #[arg(short = 'C', long)]
        currency: Option<String>,

        /// Treat the amount as foreign currency and convert to CZK
        #[arg(short, long)]
        foreign: bool,

        /// Keep the session open and accept further edits
        #[arg(short, long)]
        interactive: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => kurzy::cli::setup::setup(),
        Some(cmd) => kurzy::run_command(cmd.into(), cli.config_path.as_deref()).await,
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
