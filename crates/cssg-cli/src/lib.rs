//! cssg CLI - a small static site generator with a live-reload dev server.
//!
//! This crate provides the `cssg` binary on top of `cssg-config` and
//! `cssg-build`.
//!
//! # Architecture
//!
//! - [`cli`] - Argument parsing with clap
//! - [`commands`] - Individual CLI command implementations
//! - [`dev`] - The development loop: watcher, change filter, debounced
//!   rebuilds, live-reload broadcast and the HTTP front end
//! - [`error`] - Error types with actionable messages
//! - [`logger`] - Structured logging with tracing
//! - [`ui`] - Terminal output helpers
//!
//! # Example
//!
//! ```rust
//! use cssg_cli::{error::Result, logger};
//!
//! fn main() -> Result<()> {
//!     logger::init_logger(false, false, false);
//!     // CLI command implementations...
//!     Ok(())
//! }
//! ```

// Public modules
pub mod cli;
pub mod commands;
pub mod dev;
pub mod error;
pub mod logger;
pub mod ui;

// Re-export commonly used types
pub use error::{CliError, Result, ResultExt};
