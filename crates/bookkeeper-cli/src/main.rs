//! Bookkeeper CLI
//!
//! Command-line interface over the SQLite repositories

use bookkeeper_core::logging_facility::{init, Profile};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "bookkeeper")]
#[command(about = "Bookkeeper - Personal expense tracking", long_about = None)]
struct Cli {
    /// Path to the SQLite database file
    #[arg(long, global = true, default_value = "bookkeeper.db")]
    db: PathBuf,

    /// Emit JSON logs on stderr
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Category operations
    Category(commands::category::CategoryArgs),
    /// Expense operations
    Expense(commands::expense::ExpenseArgs),
}

fn main() {
    let cli = Cli::parse();

    init(if cli.log_json {
        Profile::Production
    } else {
        Profile::Development
    });
    tracing::debug!(db = %cli.db.display(), "bookkeeper starting");

    let result = match cli.command {
        Commands::Category(args) => commands::category::execute(&cli.db, args),
        Commands::Expense(args) => commands::expense::execute(&cli.db, args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
