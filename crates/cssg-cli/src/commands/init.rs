//! Init command implementation.
//!
//! Scaffolds a project into an existing directory without touching files
//! that are already there.

use crate::cli::{InitArgs, Template};
use crate::commands::templates;
use crate::error::{CliError, Result, ResultExt};
use crate::ui;
use std::fs;

/// Execute the init command.
///
/// # Errors
///
/// Returns errors if the directory cannot be created or a file cannot be
/// written.
pub async fn execute(args: InitArgs) -> Result<()> {
    fs::create_dir_all(&args.root).with_path(&args.root)?;
    let root = args.root.canonicalize().with_path(&args.root)?;

    let name = root
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| CliError::InvalidArgument("Invalid directory name".to_string()))?
        .to_string();

    ui::info(&format!("Initializing cssg project in {}", root.display()));
    let report = templates::scaffold(&root, Template::Basic, &name, false)?;

    if report.created == 0 {
        ui::warning("Nothing to do, every file already exists");
    } else {
        ui::success("Project initialized!");
    }

    eprintln!("\nNext steps:");
    eprintln!("  cssg dev      start the development server");
    eprintln!("  cssg build    build for production");

    Ok(())
}
