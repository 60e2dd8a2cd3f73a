//! Development server command implementation.
//!
//! Orchestrates the dev loop:
//! - Initial build (a failure is reported, the server still starts)
//! - HTTP server with WebSocket live reload
//! - File watching, filtering and debounced rebuilds
//! - Shutdown on Ctrl+C

use crate::cli::DevArgs;
use crate::dev::server::{self, ServerState};
use crate::dev::{
    BuildExecutor, BuildTrigger, ChangeFilter, ClientRegistry, DevConfig, FileWatcher,
    PipelineBuilder, RunStatus,
};
use crate::error::{CliError, Result};
use crate::ui;
use cssg_config::{ConfigDiscovery, ConfigHandle};
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::signal;

/// Execute the dev command.
///
/// # Process Flow
///
/// 1. Load configuration and apply CLI overrides
/// 2. Perform initial build
/// 3. Bind and start the HTTP server
/// 4. Start the file watcher
/// 5. Feed every change through the filter into the build trigger until
///    Ctrl+C
///
/// # Errors
///
/// Returns errors for an invalid configuration, a port that cannot be bound,
/// or a watcher that cannot be started.
pub async fn execute(args: DevArgs) -> Result<()> {
    ui::info("Starting development server...");

    let discovery = ConfigDiscovery::new(&args.root);
    match discovery.find() {
        Some(path) => ui::info(&format!("Using config: {}", path.display())),
        None => ui::info("No cssg.toml found, using defaults"),
    }
    let config = discovery.load()?;
    let dev = DevConfig::from_args(&args, &config)?;
    let config = ConfigHandle::new(config);
    let clients = ClientRegistry::new();
    let executor = Arc::new(BuildExecutor::new(
        config.clone(),
        Arc::new(PipelineBuilder),
    ));

    ui::info("Performing initial build...");
    match executor.run(BTreeSet::new()).await {
        RunStatus::Completed(outcome) => ui::success(&format!(
            "Initial build completed in {}",
            ui::format_duration(outcome.duration)
        )),
        RunStatus::Failed { error } => {
            ui::error(&format!("Initial build failed: {error}"));
            ui::warning("Serving whatever is in the output directory until the next successful build");
        }
        RunStatus::Skipped => {}
    }

    let listener = server::bind(dev.addr).await?;
    let app = server::router(ServerState::new(config.clone(), clients.clone()));
    let mut server_task = tokio::spawn(server::serve(listener, app));
    ui::success(&format!("Development server running at {}", dev.server_url()));

    let (watcher, mut changes) = FileWatcher::new(dev.watch_root.clone())?;
    let trigger = BuildTrigger::new(Arc::clone(&executor), clients, dev.debounce);
    ui::info(&format!(
        "Watching for changes in: {} (rebuild after {} of quiet)",
        watcher.root().display(),
        ui::format_duration(trigger.quiet_period())
    ));

    if dev.open {
        open_browser(&dev.server_url());
    }

    ui::info("Press Ctrl+C to stop");

    loop {
        tokio::select! {
            Some(event) = changes.recv() => {
                let current = config.current();
                trigger.notify(ChangeFilter::new(&current).filter(&event));
            }

            _ = signal::ctrl_c() => {
                ui::info("Shutting down development server...");
                break;
            }

            finished = &mut server_task => {
                return match finished {
                    Ok(Ok(())) => Err(CliError::Server("server stopped unexpectedly".into())),
                    Ok(Err(err)) => Err(err),
                    Err(err) => Err(CliError::Server(format!("server task failed: {err}"))),
                };
            }
        }
    }

    drop(watcher);
    let discarded = trigger.shutdown();
    if discarded > 0 {
        ui::info(&format!("Discarded {discarded} pending change(s)"));
    }
    report_last_build(&trigger);
    server_task.abort();

    ui::success("Development server stopped");
    Ok(())
}

fn report_last_build(trigger: &BuildTrigger) {
    let status = trigger.executor().status();
    if status.is_in_progress() {
        ui::warning("Stopping while a rebuild is still running; output may be incomplete");
    } else if let Some(error) = status.error() {
        ui::warning(&format!("Last build failed: {error}"));
    }
}

/// Open the server URL in the default browser.
///
/// Uses platform-specific commands:
/// - macOS: `open`
/// - Windows: `start`
/// - Linux: `xdg-open`
fn open_browser(url: &str) {
    use std::process::Command;

    let result = if cfg!(target_os = "macos") {
        Command::new("open").arg(url).spawn()
    } else if cfg!(target_os = "windows") {
        Command::new("cmd").args(["/C", "start", url]).spawn()
    } else {
        Command::new("xdg-open").arg(url).spawn()
    };

    match result {
        Ok(_) => ui::info(&format!("Opened browser at {url}")),
        Err(e) => ui::warning(&format!("Failed to open browser: {e}")),
    }
}
