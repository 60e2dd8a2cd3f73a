//! Runs one development rebuild and decides how clients should be told.

use async_trait::async_trait;
use cssg_build::{BuildMode, BuildReport};
use cssg_config::{ConfigDiscovery, ConfigHandle, ResolvedConfig};
use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::dev::state::{BuildGate, BuildPermit, BuildStatus, StatusCell};
use crate::dev::Notification;
use crate::error::{CliError, Result};

/// Renders the whole site for one configuration snapshot.
#[async_trait]
pub trait SiteBuilder: Send + Sync {
    async fn build(&self, config: Arc<ResolvedConfig>) -> Result<BuildReport>;
}

/// The real pipeline in development mode, on the blocking pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineBuilder;

#[async_trait]
impl SiteBuilder for PipelineBuilder {
    async fn build(&self, config: Arc<ResolvedConfig>) -> Result<BuildReport> {
        tokio::task::spawn_blocking(move || cssg_build::build(&config, BuildMode::Development))
            .await
            .map_err(|e| CliError::Custom(format!("build task failed: {e}")))?
            .map_err(CliError::from)
    }
}

/// How a successful rebuild should reach the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeKind {
    FullReload,
    /// Served URL paths of the changed stylesheets.
    StyleUpdate(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutcome {
    pub kind: OutcomeKind,
    pub duration: Duration,
}

impl BuildOutcome {
    pub fn notifications(&self) -> Vec<Notification> {
        match &self.kind {
            OutcomeKind::FullReload => vec![Notification::FullReload],
            OutcomeKind::StyleUpdate(paths) => paths
                .iter()
                .map(|path| Notification::StyleUpdate { path: path.clone() })
                .collect(),
        }
    }
}

/// Result of asking the executor to build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    Completed(BuildOutcome),
    Failed { error: String },
    /// Another build held the gate; nothing ran.
    Skipped,
}

/// Owns the rebuild sequence: config reload, classification, build, timing.
pub struct BuildExecutor {
    config: ConfigHandle,
    builder: Arc<dyn SiteBuilder>,
    gate: BuildGate,
    status: StatusCell,
}

impl BuildExecutor {
    pub fn new(config: ConfigHandle, builder: Arc<dyn SiteBuilder>) -> Self {
        Self {
            config,
            builder,
            gate: BuildGate::new(),
            status: StatusCell::default(),
        }
    }

    pub fn gate(&self) -> &BuildGate {
        &self.gate
    }

    pub fn status(&self) -> BuildStatus {
        self.status.get()
    }

    pub fn config(&self) -> &ConfigHandle {
        &self.config
    }

    /// Build unless another build is running, in which case log and skip.
    pub async fn run(&self, changed: BTreeSet<PathBuf>) -> RunStatus {
        match self.gate.try_acquire() {
            Some(permit) => self.execute(permit, changed).await,
            None => {
                tracing::info!(
                    changed = changed.len(),
                    "build already in progress, skipping"
                );
                RunStatus::Skipped
            }
        }
    }

    /// Build while holding `permit`. The gate reopens when this returns.
    pub async fn execute(&self, permit: BuildPermit, changed: BTreeSet<PathBuf>) -> RunStatus {
        let _permit = permit;

        let current = self.config.current();
        if changed.contains(&current.config_file) {
            self.reload_config(&current);
        }

        let config = self.config.current();
        let kind = classify(&config, &changed);
        let files = display_paths(&config, &changed);

        if changed.is_empty() {
            tracing::info!("building site");
        } else {
            tracing::info!(files = %files, "rebuilding");
        }
        let started_at = Instant::now();
        self.status.set(BuildStatus::InProgress { started_at });

        match self.builder.build(Arc::clone(&config)).await {
            Ok(report) => {
                let duration = started_at.elapsed();
                self.status.set(BuildStatus::Success { duration });
                tracing::info!(?duration, pages = report.pages, "rebuild finished");
                RunStatus::Completed(BuildOutcome { kind, duration })
            }
            Err(err) => {
                let error = err.to_string();
                tracing::error!(
                    files = %files,
                    error = %error,
                    "rebuild failed, still serving the previous output"
                );
                self.status.set(BuildStatus::Failed {
                    error: error.clone(),
                });
                RunStatus::Failed { error }
            }
        }
    }

    fn reload_config(&self, current: &ResolvedConfig) {
        match ConfigDiscovery::new(&current.root).load() {
            Ok(fresh) => {
                self.config.replace(fresh);
                tracing::info!(file = %current.config_file.display(), "configuration reloaded");
            }
            Err(err) => {
                tracing::error!(
                    error = %err,
                    "configuration reload failed, keeping the previous configuration"
                );
            }
        }
    }
}

/// Style-only when every changed path is a stylesheet; full reload otherwise.
///
/// Purely extension based: a stylesheet edit that also changes page markup
/// is still reported as style-only.
pub fn classify(config: &ResolvedConfig, changed: &BTreeSet<PathBuf>) -> OutcomeKind {
    if changed.is_empty() || !changed.iter().all(|p| is_stylesheet(p)) {
        return OutcomeKind::FullReload;
    }
    OutcomeKind::StyleUpdate(changed.iter().map(|p| stylesheet_url(config, p)).collect())
}

pub fn is_stylesheet(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("css")
}

/// URL path a stylesheet is served under.
///
/// Assets land under `/assets/`, public files at the site root. Anything else
/// maps to its location relative to the project root, which the client treats
/// as "no matching link" and answers with a full reload.
pub fn stylesheet_url(config: &ResolvedConfig, path: &Path) -> String {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        config.root.join(path)
    };

    let served = if let Ok(rel) = absolute.strip_prefix(&config.assets_dir) {
        format!("/assets/{}", url_segments(rel))
    } else if let Ok(rel) = absolute.strip_prefix(&config.public_dir) {
        format!("/{}", url_segments(rel))
    } else if let Ok(rel) = absolute.strip_prefix(&config.root) {
        format!("/{}", url_segments(rel))
    } else {
        format!("/{}", url_segments(path))
    };

    format!("{}{}", config.base_path, served)
}

fn url_segments(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn display_paths(config: &ResolvedConfig, changed: &BTreeSet<PathBuf>) -> String {
    changed
        .iter()
        .map(|p| p.strip_prefix(&config.root).unwrap_or(p).display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ResolvedConfig {
        ResolvedConfig::default_for("/site")
    }

    fn set(paths: &[&str]) -> BTreeSet<PathBuf> {
        paths.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn stylesheet_only_change_is_style_update() {
        let kind = classify(&config(), &set(&["/site/src/assets/css/style.css"]));
        assert_eq!(
            kind,
            OutcomeKind::StyleUpdate(vec!["/assets/css/style.css".into()])
        );
    }

    #[test]
    fn any_other_file_forces_full_reload() {
        let kind = classify(
            &config(),
            &set(&["/site/src/assets/css/style.css", "/site/src/pages/index.jinja"]),
        );
        assert_eq!(kind, OutcomeKind::FullReload);
    }

    #[test]
    fn empty_change_set_is_full_reload() {
        assert_eq!(classify(&config(), &BTreeSet::new()), OutcomeKind::FullReload);
    }

    #[test]
    fn several_stylesheets_each_get_an_update() {
        let kind = classify(
            &config(),
            &set(&["/site/public/print.css", "/site/src/assets/css/style.css"]),
        );
        assert_eq!(
            kind,
            OutcomeKind::StyleUpdate(vec!["/print.css".into(), "/assets/css/style.css".into()])
        );
    }

    #[test]
    fn relative_paths_resolve_against_root() {
        assert_eq!(
            stylesheet_url(&config(), Path::new("styles/app.css")),
            "/styles/app.css"
        );
    }

    #[test]
    fn base_path_prefixes_urls() {
        let mut config = config();
        config.base_path = "/blog".into();
        assert_eq!(
            stylesheet_url(&config, Path::new("/site/src/assets/css/style.css")),
            "/blog/assets/css/style.css"
        );
    }

    #[test]
    fn uppercase_extension_is_not_a_stylesheet() {
        assert!(!is_stylesheet(Path::new("STYLE.CSS")));
        assert!(is_stylesheet(Path::new("a.css")));
    }

    #[test]
    fn outcome_notifications() {
        let outcome = BuildOutcome {
            kind: OutcomeKind::StyleUpdate(vec!["/a.css".into(), "/b.css".into()]),
            duration: Duration::from_millis(3),
        };
        assert_eq!(outcome.notifications().len(), 2);

        let outcome = BuildOutcome {
            kind: OutcomeKind::FullReload,
            duration: Duration::ZERO,
        };
        assert_eq!(outcome.notifications(), vec![Notification::FullReload]);
    }
}
