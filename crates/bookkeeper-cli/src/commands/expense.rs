//! Expense commands
//!
//! Usage: bookkeeper expense add <AMOUNT> --category PK [--comment TEXT]
//!        bookkeeper expense list [--category PK] [--json]
//!        bookkeeper expense delete <PK>
//!        bookkeeper expense clear

use bookkeeper_core::model::{Category, Expense, Pk};
use bookkeeper_core::repository::Filter;
use bookkeeper_store::SqliteRepository;
use clap::{Args, Subcommand};
use std::path::Path;

use super::print_list;

#[derive(Debug, Args)]
pub struct ExpenseArgs {
    #[command(subcommand)]
    pub command: ExpenseCommand,
}

#[derive(Debug, Subcommand)]
pub enum ExpenseCommand {
    /// Record an expense dated now
    Add(AddArgs),
    /// List expenses
    List(ListArgs),
    /// Delete one expense
    Delete(DeleteArgs),
    /// Delete every expense
    Clear,
}

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Amount in minor currency units
    pub amount: i64,

    /// Category pk
    #[arg(long)]
    pub category: Pk,

    /// Free-form comment
    #[arg(long, default_value = "")]
    pub comment: String,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Only list expenses in this category
    #[arg(long)]
    pub category: Option<Pk>,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Expense pk
    pub pk: Pk,
}

/// Execute expense command
pub fn execute(db: &Path, args: ExpenseArgs) -> Result<(), Box<dyn std::error::Error>> {
    let repo = SqliteRepository::<Expense>::open(db)?;

    match args.command {
        ExpenseCommand::Add(add) => {
            let categories = SqliteRepository::<Category>::open(db)?;
            if categories.get(add.category)?.is_none() {
                return Err(format!("no category with pk {}", add.category).into());
            }

            let mut expense = Expense::new(add.amount, add.category).with_comment(add.comment);
            let pk = repo.add(&mut expense)?;
            println!("Added expense {} ({} in category {})", pk, expense.amount, expense.category);
        }
        ExpenseCommand::List(list) => {
            let filter = list
                .category
                .map(|category| Filter::new().eq("category", category));
            let mut expenses = repo.get_all(filter.as_ref())?;
            expenses.sort_by_key(|e| e.pk);

            print_list(&expenses, list.json, |e| {
                format!(
                    "{}\t{}\t{}\t{}\t{}",
                    e.pk.unwrap_or_default(),
                    e.expense_date.format("%Y-%m-%d %H:%M"),
                    e.amount,
                    e.category,
                    e.comment
                )
            })?;
        }
        ExpenseCommand::Delete(delete) => {
            repo.delete(delete.pk)?;
            println!("Deleted expense {}", delete.pk);
        }
        ExpenseCommand::Clear => {
            repo.delete_all()?;
            println!("Deleted all expenses");
        }
    }

    Ok(())
}
