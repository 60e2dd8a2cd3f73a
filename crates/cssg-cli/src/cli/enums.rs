//! Value enums used by CLI arguments.

use clap::ValueEnum;

/// Built-in project templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Template {
    /// Header, navigation, stylesheet, two pages and a data file
    Basic,
    /// One layout and one page
    Minimal,
}

impl Template {
    /// All templates, in listing order.
    pub const ALL: [Template; 2] = [Template::Basic, Template::Minimal];

    pub fn name(self) -> &'static str {
        match self {
            Template::Basic => "basic",
            Template::Minimal => "minimal",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Template::Basic => "Styled starter with home and about pages, a stylesheet and sample data",
            Template::Minimal => "Bare layout and a single page",
        }
    }
}

impl std::fmt::Display for Template {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
