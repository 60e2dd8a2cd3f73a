//! Terminal UI helpers: status lines, spinners and the build summary.
//!
//! ```no_run
//! use cssg_cli::ui;
//!
//! let spinner = ui::Spinner::new("Building site...");
//! spinner.finish("Built 4 pages");
//! ui::success("Done");
//! ```

mod format;
mod messages;
mod spinner;

pub use format::{format_duration, format_size, print_build_summary};
pub use messages::{error, info, success, warning};
pub use spinner::Spinner;

use std::sync::atomic::{AtomicBool, Ordering};

/// Check if running in a CI environment.
pub fn is_ci() -> bool {
    ["CI", "GITHUB_ACTIONS", "GITLAB_CI", "CIRCLECI", "TRAVIS"]
        .iter()
        .any(|var| std::env::var_os(var).is_some())
}

/// Whether spinners should animate: stderr must be a terminal outside CI.
pub fn is_interactive() -> bool {
    console::user_attended_stderr() && !is_ci()
}

static COLORS: AtomicBool = AtomicBool::new(true);

/// Record the color choice for status lines and spinners.
///
/// `--no-color` and `NO_COLOR` switch colors off, `FORCE_COLOR` switches them
/// on, otherwise the terminal decides.
pub fn init_colors(no_color: bool) {
    let enabled = !no_color && crate::logger::should_use_colors();
    COLORS.store(enabled, Ordering::Relaxed);
    console::set_colors_enabled_stderr(enabled);
}

pub(crate) fn colors_enabled() -> bool {
    COLORS.load(Ordering::Relaxed)
}
