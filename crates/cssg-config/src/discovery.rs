//! File-based config discovery.
//!
//! Finds `cssg.toml` in a project root and layers it over the defaults.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use std::path::{Path, PathBuf};

use crate::config::{ResolvedConfig, UserConfig};
use crate::error::{ConfigError, Result};

/// Name of the project configuration file.
pub const CONFIG_FILE_NAME: &str = "cssg.toml";

/// Environment variable prefix; `CSSG_OUT_DIR`, `CSSG_DEV__PORT`, ...
const ENV_PREFIX: &str = "CSSG_";

/// Environment variable holding the URL prefix for generated links.
const BASE_PATH_VAR: &str = "BASE_PATH";

/// Configuration discovery rooted at a project directory.
///
/// # Example
///
/// ```no_run
/// use cssg_config::ConfigDiscovery;
///
/// let config = ConfigDiscovery::new(".").load().unwrap();
/// println!("building into {}", config.out_dir.display());
/// ```
pub struct ConfigDiscovery {
    root: PathBuf,
}

impl ConfigDiscovery {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Path of the config file if it exists.
    pub fn find(&self) -> Option<PathBuf> {
        let path = self.root.join(CONFIG_FILE_NAME);
        path.is_file().then_some(path)
    }

    /// Load and resolve the configuration.
    ///
    /// Priority: environment > `cssg.toml` > defaults. A missing config file
    /// is not an error.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::RootNotFound`] if the root is not a directory
    /// - [`ConfigError::Parse`] if the file is malformed or a value has the wrong type
    /// - [`ConfigError::InvalidValue`] if the resolved layout is unusable
    pub fn load(&self) -> Result<ResolvedConfig> {
        let root = self.canonical_root()?;
        let config_path = root.join(CONFIG_FILE_NAME);
        let user = self.figment(&config_path).extract::<UserConfig>().map_err(|e| {
            ConfigError::Parse {
                path: config_path.clone(),
                message: e.to_string(),
            }
        })?;

        let base_path = std::env::var(BASE_PATH_VAR).ok();
        let resolved = ResolvedConfig::resolve(&root, user, base_path.as_deref())?;

        tracing::debug!(
            root = %resolved.root.display(),
            out_dir = %resolved.out_dir.display(),
            config_file_present = config_path.is_file(),
            "configuration resolved"
        );

        Ok(resolved)
    }

    fn figment(&self, config_path: &Path) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(UserConfig::default()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Absolute, symlink-free project root. Watchers report resolved paths,
    /// so every derived directory must be resolved too.
    fn canonical_root(&self) -> Result<PathBuf> {
        let root = if self.root.is_absolute() {
            self.root.clone()
        } else {
            std::env::current_dir()?.join(&self.root)
        };

        match root.canonicalize() {
            Ok(resolved) if resolved.is_dir() => Ok(resolved),
            Ok(_) => Err(ConfigError::RootNotFound(root)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ConfigError::RootNotFound(root))
            }
            Err(e) => Err(e.into()),
        }
    }
}
