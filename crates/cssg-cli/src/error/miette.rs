//! Miette diagnostic conversion for CLI errors.

use crate::error::CliError;
use cssg_build::BuildError;
use cssg_config::ConfigError;
use miette::Report;

/// Convert a [`CliError`] into a miette report with a help line where one helps.
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Config(e) => config_error_to_miette(e),
        CliError::Build(e) => build_error_to_miette(e),
        CliError::Server(msg) => miette::miette!(
            help = "is another process listening on that address? Pick one with --port or [dev] port in cssg.toml",
            "Server error: {}",
            msg
        ),
        CliError::Watch(e) => miette::miette!(
            help = "on Linux, raising fs.inotify.max_user_watches usually fixes this",
            "File watcher error: {}",
            e
        ),
        _ => miette::miette!("{}", err),
    }
}

fn config_error_to_miette(err: ConfigError) -> Report {
    match err {
        ConfigError::Parse { path, message } => miette::miette!(
            help = "check the TOML syntax and value types in this file",
            "Failed to parse {}:\n{}",
            path.display(),
            message
        ),
        ConfigError::InvalidValue { field, hint } => {
            miette::miette!(help = hint, "Invalid value for '{}' in cssg.toml", field)
        }
        ConfigError::RootNotFound(root) => miette::miette!(
            help = "pass an existing project directory with --root",
            "Project root not found: {}",
            root.display()
        ),
        other => miette::miette!("Configuration error: {}", other),
    }
}

fn build_error_to_miette(err: BuildError) -> Report {
    match err {
        BuildError::Pages { failures } => {
            let list = failures
                .iter()
                .map(|f| format!("  - {f}"))
                .collect::<Vec<_>>()
                .join("\n");
            miette::miette!("{} page(s) failed to render:\n{}", failures.len(), list)
        }
        BuildError::PagesDirMissing(dir) => miette::miette!(
            help = "run `cssg init` to scaffold a project, or set pages_dir in cssg.toml",
            "Pages directory not found: {}",
            dir.display()
        ),
        other => miette::miette!("Build error: {}", other),
    }
}
