//! Spinner for the production build.

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use std::time::Duration;

/// Spinner for work without a known length.
///
/// Hidden when stderr is not a terminal or when running in CI, so logs stay
/// clean.
pub struct Spinner {
    pb: ProgressBar,
}

impl Spinner {
    /// Create and start a new spinner.
    pub fn new(message: &str) -> Self {
        let pb = if super::is_interactive() {
            ProgressBar::new_spinner()
        } else {
            ProgressBar::hidden()
        };
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style.tick_strings(&["◐", "◓", "◑", "◒", "●"]));
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));

        Self { pb }
    }

    /// Finish with a green checkmark.
    pub fn finish(&self, message: &str) {
        let mark = if super::colors_enabled() { "✓".green().to_string() } else { "✓".into() };
        self.pb.finish_with_message(format!("{} {}", mark, message));
    }

    /// Finish with a red cross.
    pub fn fail(&self, message: &str) {
        let mark = if super::colors_enabled() { "✗".red().to_string() } else { "✗".into() };
        self.pb.finish_with_message(format!("{} {}", mark, message));
    }
}
