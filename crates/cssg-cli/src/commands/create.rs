//! Create command implementation.
//!
//! Creates a new project directory from one of the built-in templates.

use crate::cli::CreateArgs;
use crate::commands::templates;
use crate::error::{CliError, Result, ResultExt};
use crate::ui;
use std::fs;
use std::path::Path;

/// Names that would collide with files inside a project.
const RESERVED_NAMES: &[&str] = &["src", "dist", "public", "node_modules", "cssg.toml"];

/// Execute the create command.
///
/// # Errors
///
/// Returns errors for:
/// - Invalid project names
/// - A non-empty target directory without `--force`
/// - File write failures
pub async fn execute(args: CreateArgs) -> Result<()> {
    validate_project_name(&args.name)?;

    let project_dir = Path::new(&args.name);
    if !is_empty_dir(project_dir)? {
        if !args.force {
            return Err(CliError::InvalidArgument(format!(
                "Directory '{}' already exists and is not empty. Use --force to write into it",
                args.name
            )));
        }
        ui::warning("Writing into an existing directory...");
    }

    ui::info(&format!(
        "Creating project {} from the '{}' template",
        args.name, args.template
    ));

    fs::create_dir_all(project_dir).with_path(project_dir)?;
    templates::scaffold(project_dir, args.template, &args.name, args.force)?;

    ui::success("Project created successfully!");
    eprintln!("\nNext steps:");
    eprintln!("  cd {}", args.name);
    eprintln!("  cssg dev");

    Ok(())
}

/// Missing directories count as empty.
fn is_empty_dir(dir: &Path) -> Result<bool> {
    if !dir.exists() {
        return Ok(true);
    }
    if !dir.is_dir() {
        return Ok(false);
    }
    Ok(fs::read_dir(dir).with_path(dir)?.next().is_none())
}

/// Validate a project name: it doubles as a directory name.
fn validate_project_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(CliError::InvalidArgument(
            "Project name cannot be empty".to_string(),
        ));
    }

    if RESERVED_NAMES.contains(&name) {
        return Err(CliError::InvalidArgument(format!(
            "Project name '{name}' is reserved and cannot be used"
        )));
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
    {
        return Err(CliError::InvalidArgument(
            "Project name can only contain letters, numbers, dots, hyphens, and underscores"
                .to_string(),
        ));
    }

    if name.starts_with('.') {
        return Err(CliError::InvalidArgument(
            "Project name cannot start with a dot".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_project_name() {
        assert!(validate_project_name("my-site").is_ok());
        assert!(validate_project_name("blog_2024").is_ok());
        assert!(validate_project_name("site.io").is_ok());

        assert!(validate_project_name("").is_err());
        assert!(validate_project_name("src").is_err());
        assert!(validate_project_name(".hidden").is_err());
        assert!(validate_project_name("../escape").is_err());
        assert!(validate_project_name("a/b").is_err());
    }

    #[test]
    fn test_is_empty_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(is_empty_dir(&dir.path().join("missing")).unwrap());
        assert!(is_empty_dir(dir.path()).unwrap());

        std::fs::write(dir.path().join("file"), "x").unwrap();
        assert!(!is_empty_dir(dir.path()).unwrap());
        assert!(!is_empty_dir(&dir.path().join("file")).unwrap());
    }
}
