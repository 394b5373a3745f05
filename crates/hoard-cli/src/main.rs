//! Hoard CLI
//!
//! Operator commands for a Hoard database: apply migrations, inspect
//! what is stored, list accounts.

use clap::{Parser, Subcommand};
use hoard_core::logging_facility::{self, Profile};
use hoard_store::{LogFormat, StoreConfig};
use std::path::PathBuf;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "hoard")]
#[command(about = "Hoard - household records store administration", long_about = None)]
struct Cli {
    /// TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Database file, overrides config and HOARD_DB_PATH
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Open the database and apply pending migrations
    Migrate,
    /// Show schema version and record counts per key family
    Status,
    /// List user accounts
    Users(commands::users::UsersArgs),
}

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = StoreConfig::load(cli.config.as_deref())?;
    if let Some(db) = cli.db {
        config.db_path = db;
    }

    let profile = match config.log_format {
        LogFormat::Text => Profile::Development,
        LogFormat::Json => Profile::Production,
    };
    logging_facility::init(profile, &config.log_level);
    tracing::debug!(db_path = %config.db_path.display(), "configuration loaded");

    match cli.command {
        Commands::Migrate => commands::migrate::execute(&config),
        Commands::Status => commands::status::execute(&config),
        Commands::Users(args) => commands::users::execute(args, &config),
    }
}
