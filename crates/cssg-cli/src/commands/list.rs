//! List command implementation.

use crate::cli::Template;
use crate::error::Result;

/// Print the built-in templates, one per line.
pub async fn execute() -> Result<()> {
    println!("Available templates:\n");
    for template in Template::ALL {
        println!("  {:<10} {}", template.name(), template.description());
    }
    println!("\nUse one with: cssg create <name> --template <template>");
    Ok(())
}
