//! User-facing and resolved configuration types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

use crate::discovery::CONFIG_FILE_NAME;
use crate::error::{ConfigError, Result};

/// Configuration as written in `cssg.toml`.
///
/// Every field is optional in the file; missing values fall back to
/// [`UserConfig::default`]. Directory values may be relative to the project
/// root or absolute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    pub pages_dir: PathBuf,
    pub layouts_dir: PathBuf,
    pub data_dir: PathBuf,
    pub assets_dir: PathBuf,
    pub public_dir: PathBuf,
    pub out_dir: PathBuf,

    /// Free-form site metadata exposed to templates as `site`.
    pub site: Map<String, Value>,

    pub dev: DevSettings,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            pages_dir: PathBuf::from("src/pages"),
            layouts_dir: PathBuf::from("src/layouts"),
            data_dir: PathBuf::from("src/data"),
            assets_dir: PathBuf::from("src/assets"),
            public_dir: PathBuf::from("public"),
            out_dir: PathBuf::from("dist"),
            site: Map::new(),
            dev: DevSettings::default(),
        }
    }
}

impl UserConfig {
    /// Render a starter `cssg.toml` for a freshly scaffolded project.
    pub fn starter_toml(title: &str, description: &str) -> String {
        let mut site = Map::new();
        site.insert("title".into(), Value::String(title.into()));
        site.insert("description".into(), Value::String(description.into()));

        let starter = StarterFile { site };
        toml::to_string_pretty(&starter).unwrap_or_else(|_| String::from("[site]\n"))
    }
}

#[derive(Serialize)]
struct StarterFile {
    site: Map<String, Value>,
}

/// `[dev]` table: development server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DevSettings {
    pub host: String,
    pub port: u16,

    /// Quiet period before a burst of file changes turns into one rebuild.
    pub debounce_ms: u64,

    /// Extra watch-ignore patterns (`name` matches a path component,
    /// `*.ext` matches a suffix).
    pub ignore: Vec<String>,
}

impl Default for DevSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 3000,
            debounce_ms: 150,
            ignore: Vec::new(),
        }
    }
}

/// Fully resolved configuration: every path is absolute.
///
/// Treated as an immutable snapshot. When `cssg.toml` changes during
/// development a new value is loaded and swapped in through
/// [`ConfigHandle`](crate::ConfigHandle); an existing value is never edited.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub root: PathBuf,
    /// Location of `cssg.toml`, whether or not the file exists.
    pub config_file: PathBuf,
    pub pages_dir: PathBuf,
    pub layouts_dir: PathBuf,
    pub data_dir: PathBuf,
    pub assets_dir: PathBuf,
    pub public_dir: PathBuf,
    pub out_dir: PathBuf,
    pub site: Map<String, Value>,
    /// URL prefix for generated links, taken from `BASE_PATH`. Never ends in `/`.
    pub base_path: String,
    pub dev: DevSettings,
}

impl ResolvedConfig {
    /// Resolve a [`UserConfig`] against an absolute project root.
    pub fn resolve(root: &Path, user: UserConfig, base_path: Option<&str>) -> Result<Self> {
        let config = Self {
            root: root.to_path_buf(),
            config_file: root.join(CONFIG_FILE_NAME),
            pages_dir: root.join(&user.pages_dir),
            layouts_dir: root.join(&user.layouts_dir),
            data_dir: root.join(&user.data_dir),
            assets_dir: root.join(&user.assets_dir),
            public_dir: root.join(&user.public_dir),
            out_dir: root.join(&user.out_dir),
            site: user.site,
            base_path: normalize_base_path(base_path.unwrap_or_default()),
            dev: user.dev,
        };
        config.validate()?;
        Ok(config)
    }

    /// Default layout for `root` without reading anything from disk.
    pub fn default_for(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        let user = UserConfig::default();
        Self {
            root: root.to_path_buf(),
            config_file: root.join(CONFIG_FILE_NAME),
            pages_dir: root.join(&user.pages_dir),
            layouts_dir: root.join(&user.layouts_dir),
            data_dir: root.join(&user.data_dir),
            assets_dir: root.join(&user.assets_dir),
            public_dir: root.join(&user.public_dir),
            out_dir: root.join(&user.out_dir),
            site: user.site,
            base_path: String::new(),
            dev: user.dev,
        }
    }

    /// Whether `path` lies inside the output directory.
    pub fn is_output(&self, path: &Path) -> bool {
        path.starts_with(&self.out_dir)
    }

    /// Reject layouts that would let a production build wipe sources.
    fn validate(&self) -> Result<()> {
        if self.out_dir == self.root || self.root.starts_with(&self.out_dir) {
            return Err(ConfigError::InvalidValue {
                field: "out_dir".into(),
                hint: format!(
                    "{} would contain the project root; pick a dedicated directory such as \"dist\"",
                    self.out_dir.display()
                ),
            });
        }

        for (field, dir) in [("pages_dir", &self.pages_dir), ("layouts_dir", &self.layouts_dir)] {
            if self.is_output(dir) {
                return Err(ConfigError::InvalidValue {
                    field: field.into(),
                    hint: format!("{} is inside out_dir", dir.display()),
                });
            }
        }

        if self.dev.debounce_ms > 10_000 {
            return Err(ConfigError::InvalidValue {
                field: "dev.debounce_ms".into(),
                hint: "use a quiet period of at most 10000 ms".into(),
            });
        }

        Ok(())
    }
}

fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() || trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}
