//! Logging setup for the cssg CLI.
//!
//! Builds a `tracing` subscriber from the global `--verbose`/`--quiet`/
//! `--no-color` flags. `RUST_LOG` is honoured when neither flag is given.
//!
//! ```rust,no_run
//! use cssg_cli::logger::init_logger;
//!
//! init_logger(false, false, false);
//! tracing::info!("starting build");
//! ```

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const VERBOSE_FILTER: &str = "cssg=debug,cssg_cli=debug,cssg_build=debug,cssg_config=debug";
const QUIET_FILTER: &str = "cssg=error,cssg_cli=error,cssg_build=error,cssg_config=error";
const DEFAULT_FILTER: &str = "cssg=info,cssg_cli=info,cssg_build=info,cssg_config=info";

/// Pick the filter directive for the given flags.
///
/// Priority: `--verbose`, then `--quiet`, then `RUST_LOG`, then the default.
pub fn filter_for(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Initialize the global tracing subscriber. Call once, before logging.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color && should_use_colors())
        .compact();

    // A second init (e.g. from tests) is not an error worth surfacing.
    let _ = tracing_subscriber::registry()
        .with(filter_for(verbose, quiet))
        .with(fmt_layer)
        .try_init();
}

/// Whether ANSI colors should be emitted on stdout.
///
/// `NO_COLOR` disables colors, `FORCE_COLOR` forces them, otherwise the
/// terminal is asked.
pub fn should_use_colors() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }
    console::Term::stdout().features().colors_supported()
}
