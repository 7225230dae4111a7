//! Category commands
//!
//! Usage: bookkeeper category add <NAME> [--parent PK]
//!        bookkeeper category list [--parent PK] [--json]

use bookkeeper_core::model::{Category, Pk};
use bookkeeper_core::repository::Filter;
use bookkeeper_store::SqliteRepository;
use clap::{Args, Subcommand};
use std::path::Path;

use super::print_list;

#[derive(Debug, Args)]
pub struct CategoryArgs {
    #[command(subcommand)]
    pub command: CategoryCommand,
}

#[derive(Debug, Subcommand)]
pub enum CategoryCommand {
    /// Add a category
    Add(AddArgs),
    /// List categories
    List(ListArgs),
}

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Category name
    pub name: String,

    /// Parent category pk
    #[arg(long)]
    pub parent: Option<Pk>,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Only list children of this category
    #[arg(long)]
    pub parent: Option<Pk>,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute category command
pub fn execute(db: &Path, args: CategoryArgs) -> Result<(), Box<dyn std::error::Error>> {
    let repo = SqliteRepository::<Category>::open(db)?;

    match args.command {
        CategoryCommand::Add(add) => {
            if let Some(parent) = add.parent {
                if repo.get(parent)?.is_none() {
                    return Err(format!("no category with pk {}", parent).into());
                }
            }

            let mut category = Category::new(add.name, add.parent);
            let pk = repo.add(&mut category)?;
            println!("Added category {} ({})", pk, category.name);
        }
        CategoryCommand::List(list) => {
            let filter = list.parent.map(|parent| Filter::new().eq("parent", parent));
            let mut categories = repo.get_all(filter.as_ref())?;
            categories.sort_by_key(|c| c.pk);

            print_list(&categories, list.json, |c| {
                let pk = c.pk.unwrap_or_default();
                match c.parent {
                    Some(parent) => format!("{}\t{}\t(parent {})", pk, c.name, parent),
                    None => format!("{}\t{}", pk, c.name),
                }
            })?;
        }
    }

    Ok(())
}
