//! Page rendering with minijinja.

use cssg_config::ResolvedConfig;
use minijinja::{path_loader, Environment, Value};
use serde_json::Map;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{io_at, BuildError, PageFailure, Result};
use crate::page::Page;

/// Page template extension.
pub(crate) const PAGE_EXTENSION: &str = "jinja";

/// Layout used when a page does not name one.
pub(crate) const DEFAULT_LAYOUT: &str = "main.jinja";

#[derive(Debug, Default)]
pub(crate) struct RenderOutcome {
    pub rendered: usize,
    pub failures: Vec<PageFailure>,
}

/// Render every page under the pages directory into the output directory.
///
/// A page that fails is logged and recorded; the rest are still rendered.
pub(crate) fn render_pages(
    config: &ResolvedConfig,
    data: &Map<String, serde_json::Value>,
) -> Result<RenderOutcome> {
    if !config.pages_dir.is_dir() {
        return Err(BuildError::PagesDirMissing(config.pages_dir.clone()));
    }

    let mut env = Environment::new();
    env.set_loader(path_loader(&config.layouts_dir));

    let mut pages: Vec<PathBuf> = WalkDir::new(&config.pages_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some(PAGE_EXTENSION))
        .collect();
    pages.sort();

    let mut outcome = RenderOutcome::default();
    for page in pages {
        match render_page(&env, config, data, &page) {
            Ok(()) => outcome.rendered += 1,
            Err(message) => {
                tracing::error!(page = %page.display(), error = %message, "failed to render page");
                outcome.failures.push(PageFailure { page, message });
            }
        }
    }

    Ok(outcome)
}

fn render_page(
    env: &Environment<'_>,
    config: &ResolvedConfig,
    data: &Map<String, serde_json::Value>,
    source_path: &Path,
) -> std::result::Result<(), String> {
    let source = std::fs::read_to_string(source_path).map_err(|e| e.to_string())?;
    let page = Page::parse(&source).map_err(|e| format!("invalid front matter: {e}"))?;

    let ctx = page_context(config, data, page.attrs);

    let body = env
        .render_str(&page.body, Value::from_serialize(&ctx))
        .map_err(|e| format!("{e:#}"))?;

    let scripts = ctx
        .get("script")
        .and_then(|v| v.as_str())
        .map(|script| script_tag(&config.base_path, script))
        .unwrap_or_default();

    let layout_name = layout_file(ctx.get("layout").and_then(|v| v.as_str()));
    let layout = env
        .get_template(&layout_name)
        .map_err(|e| format!("layout {layout_name}: {e:#}"))?;

    let mut layout_ctx: BTreeMap<String, Value> = ctx
        .into_iter()
        .map(|(k, v)| (k, Value::from_serialize(&v)))
        .collect();
    layout_ctx.insert("body".into(), Value::from_safe_string(body));
    layout_ctx.insert("scripts".into(), Value::from_safe_string(scripts));

    let html = layout
        .render(Value::from_iter(layout_ctx))
        .map_err(|e| format!("{e:#}"))?;

    let out_path = output_path(config, source_path);
    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(io_at(parent))
            .map_err(|e| e.to_string())?;
    }
    std::fs::write(&out_path, html).map_err(|e| format!("{}: {e}", out_path.display()))?;

    tracing::debug!(page = %source_path.display(), out = %out_path.display(), "page rendered");
    Ok(())
}

/// Later sources win: `site`, then data files, then front matter, then `basePath`.
fn page_context(
    config: &ResolvedConfig,
    data: &Map<String, serde_json::Value>,
    attrs: Map<String, serde_json::Value>,
) -> Map<String, serde_json::Value> {
    let mut ctx = Map::new();
    ctx.insert("site".into(), serde_json::Value::Object(config.site.clone()));
    ctx.extend(data.iter().map(|(k, v)| (k.clone(), v.clone())));
    ctx.extend(attrs);
    ctx.insert(
        "basePath".into(),
        serde_json::Value::String(config.base_path.clone()),
    );
    ctx
}

/// `layout: post` and `layout: post.jinja` name the same file.
fn layout_file(name: Option<&str>) -> String {
    match name {
        None => DEFAULT_LAYOUT.to_string(),
        Some(name) if Path::new(name).extension().is_some() => name.to_string(),
        Some(name) => format!("{name}.{PAGE_EXTENSION}"),
    }
}

fn script_tag(base_path: &str, script: &str) -> String {
    format!(r#"<script src="{base_path}/assets/js/{script}" type="module"></script>"#)
}

fn output_path(config: &ResolvedConfig, source: &Path) -> PathBuf {
    let rel = source.strip_prefix(&config.pages_dir).unwrap_or(source);
    config.out_dir.join(rel).with_extension("html")
}
