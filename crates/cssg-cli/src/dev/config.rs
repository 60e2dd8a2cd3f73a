//! Development server configuration.
//!
//! The project's `[dev]` table with command-line overrides applied.

use crate::cli::DevArgs;
use crate::error::{CliError, Result};
use cssg_config::ResolvedConfig;
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::PathBuf;
use std::time::Duration;

/// Development server configuration.
#[derive(Debug, Clone)]
pub struct DevConfig {
    /// Server socket address (IP + port)
    pub addr: SocketAddr,

    /// Open browser automatically on start
    pub open: bool,

    /// Directory watched recursively for changes
    pub watch_root: PathBuf,

    /// Quiet period before a burst of changes triggers a rebuild
    pub debounce: Duration,
}

impl DevConfig {
    /// Merge CLI arguments over the `[dev]` settings of `config`.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::InvalidArgument`] if the host cannot be resolved.
    pub fn from_args(args: &DevArgs, config: &ResolvedConfig) -> Result<Self> {
        let host = args.host.as_deref().unwrap_or(&config.dev.host);
        let port = args.port.unwrap_or(config.dev.port);

        Ok(Self {
            addr: resolve_addr(host, port)?,
            open: args.open,
            watch_root: config.root.clone(),
            debounce: Duration::from_millis(config.dev.debounce_ms),
        })
    }

    /// Get the server URL as a string.
    pub fn server_url(&self) -> String {
        if self.addr.ip().is_unspecified() {
            format!("http://localhost:{}", self.addr.port())
        } else {
            format!("http://{}", self.addr)
        }
    }
}

fn resolve_addr(host: &str, port: u16) -> Result<SocketAddr> {
    (host, port)
        .to_socket_addrs()
        .ok()
        .and_then(|mut addrs| addrs.next())
        .ok_or_else(|| CliError::InvalidArgument(format!("cannot resolve host '{host}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(port: Option<u16>, host: Option<&str>) -> DevArgs {
        DevArgs {
            root: PathBuf::from("."),
            port,
            host: host.map(str::to_string),
            open: false,
        }
    }

    #[test]
    fn test_defaults_come_from_config() {
        let config = ResolvedConfig::default_for("/site");
        let dev = DevConfig::from_args(&args(None, None), &config).unwrap();

        assert_eq!(dev.addr.port(), config.dev.port);
        assert_eq!(dev.watch_root, PathBuf::from("/site"));
        assert_eq!(dev.debounce, Duration::from_millis(config.dev.debounce_ms));
    }

    #[test]
    fn test_cli_overrides_config() {
        let config = ResolvedConfig::default_for("/site");
        let dev = DevConfig::from_args(&args(Some(4000), Some("0.0.0.0")), &config).unwrap();

        assert_eq!(dev.addr, "0.0.0.0:4000".parse::<SocketAddr>().unwrap());
        assert_eq!(dev.server_url(), "http://localhost:4000");
    }

    #[test]
    fn test_server_url_http() {
        let config = ResolvedConfig::default_for("/site");
        let dev = DevConfig::from_args(&args(Some(3000), Some("127.0.0.1")), &config).unwrap();
        assert_eq!(dev.server_url(), "http://127.0.0.1:3000");
    }
}
