//! Built-in project templates for `cssg init` and `cssg create`.

use crate::cli::Template;
use crate::error::{Result, ResultExt};
use crate::ui;
use cssg_config::UserConfig;
use std::fs;
use std::path::Path;

/// Directories every scaffolded project gets, even when empty.
pub const PROJECT_DIRS: &[&str] = &["src/pages", "src/layouts", "src/data", "src/assets"];

/// One file of a template: path relative to the project root, and contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFile {
    pub path: &'static str,
    pub contents: String,
}

impl TemplateFile {
    fn new(path: &'static str, contents: impl Into<String>) -> Self {
        Self {
            path,
            contents: contents.into(),
        }
    }
}

/// Files for `template`, with the project name substituted.
pub fn files(template: Template, project_name: &str) -> Vec<TemplateFile> {
    let config = UserConfig::starter_toml(project_name, "A new site generated with cssg");

    match template {
        Template::Basic => vec![
            TemplateFile::new("cssg.toml", config),
            TemplateFile::new(".gitignore", GITIGNORE),
            TemplateFile::new("README.md", readme(project_name)),
            TemplateFile::new("src/layouts/main.jinja", BASIC_LAYOUT),
            TemplateFile::new("src/pages/index.jinja", BASIC_INDEX),
            TemplateFile::new("src/pages/about.jinja", BASIC_ABOUT),
            TemplateFile::new("src/assets/css/style.css", BASIC_STYLE),
            TemplateFile::new("src/data/links.json", BASIC_LINKS),
        ],
        Template::Minimal => vec![
            TemplateFile::new("cssg.toml", config),
            TemplateFile::new(".gitignore", GITIGNORE),
            TemplateFile::new("src/layouts/main.jinja", MINIMAL_LAYOUT),
            TemplateFile::new("src/pages/index.jinja", MINIMAL_INDEX),
        ],
    }
}

/// What [`scaffold`] did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScaffoldReport {
    pub created: usize,
    pub skipped: usize,
}

/// Write `template` into `root`, creating directories as needed.
///
/// Existing files are left alone unless `overwrite` is set.
pub fn scaffold(
    root: &Path,
    template: Template,
    project_name: &str,
    overwrite: bool,
) -> Result<ScaffoldReport> {
    for dir in PROJECT_DIRS {
        let path = root.join(dir);
        fs::create_dir_all(&path).with_path(&path)?;
    }

    let mut report = ScaffoldReport::default();
    for file in files(template, project_name) {
        let target = root.join(file.path);
        if target.exists() && !overwrite {
            ui::warning(&format!("  Skipped {} (already exists)", file.path));
            report.skipped += 1;
            continue;
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).with_path(parent)?;
        }
        fs::write(&target, &file.contents).with_path(&target)?;
        ui::success(&format!("  Created {}", file.path));
        report.created += 1;
    }
    Ok(report)
}

fn readme(project_name: &str) -> String {
    format!(
        r#"# {project_name}

A static site built with cssg.

## Getting Started

```bash
# Start the development server with live reload
cssg dev

# Build for production into dist/
cssg build
```

## Project Structure

```
{project_name}/
├── cssg.toml           # Configuration
├── public/             # Copied as-is into the output
└── src/
    ├── layouts/        # Layout templates
    ├── pages/          # Pages (Jinja with YAML front matter)
    ├── assets/         # Stylesheets and scripts
    └── data/           # JSON data files
```
"#
    )
}

const GITIGNORE: &str = "# cssg
dist

# IDE
.vscode/
*.swp
*.swo

# OS
.DS_Store
Thumbs.db
";

const BASIC_LAYOUT: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{{ title }} | {{ site.title }}</title>
  <meta name="description" content="{{ site.description }}">
  <link rel="stylesheet" href="{{ basePath }}/assets/css/style.css">
</head>
<body>
  <header>
    <div class="container">
      <h1>{{ site.title }}</h1>
      <nav>
        <a href="{{ basePath }}/index.html">Home</a>
        <a href="{{ basePath }}/about.html">About</a>
      </nav>
    </div>
  </header>
  <main>
    <div class="container">
      {{ body }}
    </div>
  </main>
  <footer>
    <div class="container">
      <p>Powered by cssg</p>
    </div>
  </footer>
  {{ scripts }}
</body>
</html>
"##;

const BASIC_INDEX: &str = r##"---
title: "Home"
layout: "main"
---
<h2>Welcome to your new site!</h2>

<p>Edit this page in <code>src/pages/index.jinja</code>.</p>

<h3>What's next?</h3>
<ul>
  <li>Change the site title in <code>cssg.toml</code></li>
  <li>Modify the layout in <code>src/layouts/main.jinja</code></li>
  <li>Add pages under <code>src/pages/</code></li>
  <li>Style everything in <code>src/assets/css/style.css</code></li>
</ul>

<h3>Links</h3>
<ul>
{% for link in links %}
  <li><a href="{{ link.url }}">{{ link.label }}</a></li>
{% endfor %}
</ul>
"##;

const BASIC_ABOUT: &str = r##"---
title: "About"
layout: "main"
---
<h2>About this site</h2>

<p>This is a sample page. Edit it in <code>src/pages/about.jinja</code>.</p>
"##;

const BASIC_STYLE: &str = r##"* {
  margin: 0;
  padding: 0;
  box-sizing: border-box;
}

body {
  font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif;
  line-height: 1.6;
}

.container {
  max-width: 800px;
  margin: 0 auto;
  padding: 0 20px;
}

header {
  background: #f8f9fa;
  padding: 1rem 0;
  border-bottom: 1px solid #e9ecef;
}

nav a {
  margin-right: 1rem;
  text-decoration: none;
  color: #495057;
}

nav a:hover {
  color: #007bff;
}

main {
  padding: 2rem 0;
}

footer {
  background: #f8f9fa;
  padding: 1rem 0;
  margin-top: 2rem;
  text-align: center;
  color: #6c757d;
}
"##;

const BASIC_LINKS: &str = r##"[
  { "label": "minijinja syntax", "url": "https://docs.rs/minijinja/latest/minijinja/syntax/" },
  { "label": "lightningcss", "url": "https://lightningcss.dev/" }
]
"##;

const MINIMAL_LAYOUT: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <title>{{ site.title }}</title>
</head>
<body>
  {{ body }}
  {{ scripts }}
</body>
</html>
"##;

const MINIMAL_INDEX: &str = r##"---
title: "Home"
---
<h1>{{ site.title }}</h1>
<p>Edit <code>src/pages/index.jinja</code> to get started.</p>
"##;
