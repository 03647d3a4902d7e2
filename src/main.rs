use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pocketbook::cli::{handle_history_command, handle_report_command, HistoryArgs, ReportArgs};
use pocketbook::config::{PocketbookPaths, Settings};
use pocketbook::export::save_records;

/// Environment variable holding the tracing filter directives
const LOG_ENV: &str = "POCKETBOOK_LOG";

#[derive(Parser)]
#[command(
    name = "pocketbook",
    version,
    about = "Household transaction history and spending reports",
    long_about = "Pocketbook reads a household's income and expense records and \
                  shows them as bucketed history with running balances, or as \
                  ranked spending reports compared with the previous period."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show transactions grouped by day, week, month or year
    #[command(alias = "hist")]
    History(HistoryArgs),

    /// Rank categories and days for a period and compare with the one before
    Report(ReportArgs),

    /// Create the data directory, settings and an empty transactions file
    Init,

    /// Show current configuration and paths
    Config,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let paths = PocketbookPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    match cli.command {
        Some(Commands::History(args)) => handle_history_command(&paths, &settings, args)?,
        Some(Commands::Report(args)) => handle_report_command(&paths, &settings, args)?,
        Some(Commands::Init) => {
            println!("Initializing Pocketbook at: {}", paths.base_dir().display());
            paths.ensure_directories()?;
            if !paths.is_initialized() {
                settings.save(&paths)?;
            }
            let transactions = paths.transactions_file();
            if !transactions.exists() {
                save_records(&transactions, &[])?;
            }
            println!("Settings:     {}", paths.settings_file().display());
            println!("Transactions: {}", transactions.display());
            println!();
            println!("Add records to the transactions file, then run 'pocketbook history'.");
        }
        Some(Commands::Config) => {
            println!("Pocketbook Configuration");
            println!("========================");
            println!("Base directory:    {}", paths.base_dir().display());
            println!("Settings file:     {}", paths.settings_file().display());
            println!("Transactions file: {}", paths.transactions_file().display());
            println!();
            println!("Settings:");
            println!("  Default granularity: {}", settings.default_granularity);
            println!("  Top N:               {}", settings.top_n);
            println!("  Include deleted:     {}", settings.include_deleted);
            println!("  Currency symbol:     {}", settings.currency_symbol);
        }
        None => {
            println!("Pocketbook - household transaction analytics");
            println!();
            println!("Run 'pocketbook --help' for usage information.");
        }
    }

    Ok(())
}
