//! Configuration loading for cssg.
//!
//! A project is described by an optional `cssg.toml` at its root. Loading
//! merges built-in defaults, the file and `CSSG_*` environment variables, then
//! resolves every directory against the project root so that the rest of the
//! toolchain only ever sees absolute paths.

pub mod config;
pub mod discovery;
pub mod error;
pub mod handle;

pub use config::*;
pub use discovery::{ConfigDiscovery, CONFIG_FILE_NAME};
pub use error::*;
pub use handle::ConfigHandle;
