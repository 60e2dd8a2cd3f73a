//! Live-reload notifications and their wire encoding.

use serde::Serialize;

/// Wire token telling a page to reload itself.
pub const RELOAD_TOKEN: &str = "reload";

/// What connected pages should do after a successful rebuild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// Reload the whole page.
    FullReload,
    /// Re-fetch one stylesheet in place. `path` is the served URL path.
    StyleUpdate { path: String },
}

#[derive(Serialize)]
struct CssUpdate<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    path: &'a str,
}

impl Notification {
    /// Encode as a text frame: `reload`, or `{"type":"css-update","path":...}`.
    pub fn to_wire(&self) -> String {
        match self {
            Notification::FullReload => RELOAD_TOKEN.to_string(),
            Notification::StyleUpdate { path } => serde_json::to_string(&CssUpdate {
                kind: "css-update",
                path,
            })
            .unwrap_or_else(|_| RELOAD_TOKEN.to_string()),
        }
    }
}
