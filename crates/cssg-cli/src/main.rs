//! cssg - a small static site generator.
//!
//! Entry point: parses arguments, sets up logging and colors, and dispatches
//! to the command implementations.

use clap::Parser;
use cssg_cli::{cli, commands, error, logger, ui};
use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);
    ui::init_colors(args.no_color);

    let result = match args.command {
        cli::Command::Build(build_args) => commands::build_execute(build_args).await,
        cli::Command::Dev(dev_args) => commands::dev_execute(dev_args).await,
        cli::Command::Init(init_args) => commands::init_execute(init_args).await,
        cli::Command::Create(create_args) => commands::create_execute(create_args).await,
        cli::Command::List => commands::list_execute().await,
    };

    // Convert CLI errors to miette diagnostics for error reporting
    result.map_err(error::cli_error_to_miette)
}
