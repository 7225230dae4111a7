//! CLI command implementations

pub mod category;
pub mod expense;

use serde::Serialize;

/// Print a list either as JSON or one line per item
fn print_list<T: Serialize>(
    items: &[T],
    json: bool,
    line: impl Fn(&T) -> String,
) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(items)?);
    } else {
        for item in items {
            println!("{}", line(item));
        }
    }
    Ok(())
}
