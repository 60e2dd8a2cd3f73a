use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::cli::enums::Template;

/// Available cssg subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the site for production
    ///
    /// Empties the output directory, minifies stylesheets and renders every
    /// page.
    Build(BuildArgs),

    /// Start the development server
    ///
    /// Builds once, serves the output directory, and rebuilds on every change
    /// under the project root. Open pages reload themselves; stylesheet-only
    /// edits are swapped in without a full reload.
    Dev(DevArgs),

    /// Scaffold a project into an existing directory
    ///
    /// Files that already exist are left untouched.
    Init(InitArgs),

    /// Create a new project directory from a template
    Create(CreateArgs),

    /// List the built-in templates
    List,
}

/// Arguments for the build command
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Project root containing cssg.toml
    #[arg(short, long, default_value = ".", value_name = "DIR")]
    pub root: PathBuf,
}

/// Arguments for the dev command
#[derive(Args, Debug)]
pub struct DevArgs {
    /// Project root containing cssg.toml
    #[arg(short, long, default_value = ".", value_name = "DIR")]
    pub root: PathBuf,

    /// Port to listen on (overrides [dev] port)
    #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..))]
    pub port: Option<u16>,

    /// Host to bind (overrides [dev] host)
    #[arg(long)]
    pub host: Option<String>,

    /// Open the site in the default browser once the server is up
    #[arg(long)]
    pub open: bool,
}

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to scaffold into
    #[arg(short, long, default_value = ".", value_name = "DIR")]
    pub root: PathBuf,
}

/// Arguments for the create command
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Name of the new project (also its directory name)
    pub name: String,

    /// Template to start from
    #[arg(short, long, value_enum, default_value_t = Template::Basic)]
    pub template: Template,

    /// Write into the directory even if it is not empty
    #[arg(short, long)]
    pub force: bool,
}
