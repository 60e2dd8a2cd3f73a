//! Command implementations for the cssg CLI.
//!
//! - [`build`] - Production build
//! - [`dev`] - Development server with live reload
//! - [`init`] - Scaffold into an existing directory
//! - [`create`] - Scaffold a new project directory
//! - [`list`] - List built-in templates
//!
//! Each command provides an `execute` function that takes the parsed command
//! arguments and returns a Result.

pub mod build;
pub mod create;
pub mod dev;
pub mod init;
pub mod list;
mod templates;

// Re-export execute functions for convenience
pub use build::execute as build_execute;
pub use create::execute as create_execute;
pub use dev::execute as dev_execute;
pub use init::execute as init_execute;
pub use list::execute as list_execute;
