//! Build command implementation.
//!
//! Implements `cssg build`: a clean, minified production build of the site.

use crate::cli::BuildArgs;
use crate::error::{CliError, Result};
use crate::ui;
use cssg_build::BuildMode;
use cssg_config::ConfigDiscovery;

/// Execute the build command.
///
/// # Build Process
///
/// 1. Load configuration (env > `cssg.toml` > defaults)
/// 2. Run the production pipeline on the blocking pool
/// 3. Display build summary
///
/// # Errors
///
/// Returns errors for an invalid configuration or a failed build. When only
/// some pages failed, the pages that rendered are still on disk.
pub async fn execute(args: BuildArgs) -> Result<()> {
    ui::info("Loading configuration...");
    let config = ConfigDiscovery::new(&args.root).load()?;
    let out_dir = config.out_dir.clone();

    let spinner = ui::Spinner::new("Building site...");
    let result = tokio::task::spawn_blocking(move || {
        cssg_build::build(&config, BuildMode::Production)
    })
    .await
    .map_err(|e| CliError::Custom(format!("build task failed: {e}")))?;

    match result {
        Ok(report) => {
            spinner.finish(&format!(
                "Build completed in {}",
                ui::format_duration(report.duration)
            ));
            ui::print_build_summary(&report, &out_dir);
            Ok(())
        }
        Err(err) => {
            spinner.fail("Build failed");
            Err(err.into())
        }
    }
}
