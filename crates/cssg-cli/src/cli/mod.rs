//! Command-line interface definition.
//!
//! - `cssg build` - production build
//! - `cssg dev` - development server with live reload
//! - `cssg init` - scaffold into the current (or given) directory
//! - `cssg create` - scaffold a new project directory
//! - `cssg list` - list the built-in templates

mod commands;
pub mod enums;

use clap::Parser;

pub use commands::{BuildArgs, Command, CreateArgs, DevArgs, InitArgs};
pub use enums::Template;

/// cssg - a small static site generator
#[derive(Parser, Debug)]
#[command(
    name = "cssg",
    version,
    about = "A small static site generator with a live-reload dev server",
    long_about = "cssg renders Jinja pages with YAML front matter and JSON data into\n\
                  static HTML, bundles stylesheets with lightningcss, and serves the\n\
                  result with live reload while you edit."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}
