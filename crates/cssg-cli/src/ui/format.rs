//! Formatting utilities for sizes, durations, and the build summary.

use cssg_build::BuildReport;
use owo_colors::OwoColorize;
use std::path::Path;
use std::time::Duration;
use walkdir::WalkDir;

use super::colors_enabled;

/// Format a byte count with the largest fitting unit.
///
/// ```
/// use cssg_cli::ui::format_size;
///
/// assert_eq!(format_size(0), "0 B");
/// assert_eq!(format_size(1024), "1.00 KB");
/// ```
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];

    let mut size = bytes as f64;
    let mut unit_idx = 0;
    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    if unit_idx == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.2} {}", size, UNITS[unit_idx])
    }
}

/// Format a duration as `ms`, seconds, or `Xm Ys`.
///
/// ```
/// use std::time::Duration;
/// use cssg_cli::ui::format_duration;
///
/// assert_eq!(format_duration(Duration::from_millis(50)), "50ms");
/// assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let total_ms = duration.as_millis();

    if total_ms < 1000 {
        format!("{}ms", total_ms)
    } else if total_ms < 60_000 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        let secs = duration.as_secs();
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

/// Print what a production build produced, with the total output size.
pub fn print_build_summary(report: &BuildReport, out_dir: &Path) {
    let total: u64 = WalkDir::new(out_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.metadata().ok())
        .map(|m| m.len())
        .sum();

    let rows = [
        ("pages", report.pages),
        ("assets", report.assets),
        ("public files", report.public_files),
        ("data files", report.data_keys.len()),
    ];

    if colors_enabled() {
        eprintln!("\n{}", "Build Summary".bold().underline());
        for (label, count) in rows {
            eprintln!("  {} {} {}", "▸".blue(), count.bright_white().bold(), label.dimmed());
        }
        eprintln!(
            "  {} {} in {} → {}",
            "Total:".bold(),
            format_size(total).green(),
            format_duration(report.duration).green(),
            out_dir.display()
        );
    } else {
        eprintln!("\nBuild Summary");
        for (label, count) in rows {
            eprintln!("  ▸ {} {}", count, label);
        }
        eprintln!(
            "  Total: {} in {} → {}",
            format_size(total),
            format_duration(report.duration),
            out_dir.display()
        );
    }
}
