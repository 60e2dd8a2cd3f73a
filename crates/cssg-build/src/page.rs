//! Page sources: optional YAML front matter followed by a template body.

use serde_json::{Map, Value};

const FENCE: &str = "---";

/// A parsed page source.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// Front-matter attributes. Empty when the page has none, or when the
    /// front matter is not a mapping.
    pub attrs: Map<String, Value>,
    pub body: String,
}

impl Page {
    /// Parse a page source.
    ///
    /// # Errors
    ///
    /// Returns the YAML error if the front matter block is malformed.
    pub fn parse(source: &str) -> Result<Self, serde_yaml::Error> {
        let (front, body) = split_front_matter(source);
        let attrs = match front {
            Some(yaml) if !yaml.trim().is_empty() => {
                match serde_yaml::from_str::<Value>(yaml)? {
                    Value::Object(map) => map,
                    _ => Map::new(),
                }
            }
            _ => Map::new(),
        };
        Ok(Self {
            attrs,
            body: body.to_string(),
        })
    }
}

/// Split `source` into its front-matter block and body.
///
/// Front matter must start on the first line with `---` and end with a line
/// containing only `---`. Without both fences the whole source is body.
pub fn split_front_matter(source: &str) -> (Option<&str>, &str) {
    let Some(rest) = source
        .strip_prefix(FENCE)
        .and_then(|r| r.strip_prefix("\r\n").or_else(|| r.strip_prefix('\n')))
    else {
        return (None, source);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == FENCE {
            let front = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return (Some(front), body);
        }
        offset += line.len();
    }

    (None, source)
}
