//! Image template referenced by an automation.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// The template image an automation searches for.
///
/// Serialised as a plain string; [`ImageSource::NONE`] marks an automation
/// that is configured but has nothing to look for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ImageSource {
    #[default]
    None,
    Path(String),
}

impl ImageSource {
    /// Sentinel string for "no image".
    pub const NONE: &'static str = "-none-";

    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Resolve the template path, expanding environment variables
    /// (`$VAR`, `${VAR}`, `%VAR%`). Unset variables are left verbatim.
    #[must_use]
    pub fn resolve(&self) -> Option<PathBuf> {
        self.resolve_with(|name| std::env::var(name).ok())
    }

    /// Like [`resolve`](Self::resolve) with a custom variable lookup.
    pub fn resolve_with(&self, lookup: impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
        match self {
            Self::None => None,
            Self::Path(raw) => Some(PathBuf::from(expand_variables(raw, &lookup))),
        }
    }
}

fn expand_variables(raw: &str, lookup: &impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(pos) = rest.find(['$', '%']) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        let (name, consumed) = if let Some(braced) = tail.strip_prefix("${") {
            match braced.find('}') {
                Some(end) => (&braced[..end], end + 3),
                None => ("", 0),
            }
        } else if let Some(plain) = tail.strip_prefix('$') {
            let end = plain
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(plain.len());
            (&plain[..end], end + 1)
        } else {
            let inner = &tail[1..];
            match inner.find('%') {
                Some(end) if end > 0 => (&inner[..end], end + 2),
                _ => ("", 0),
            }
        };

        match (consumed, lookup(name)) {
            (0, _) => {
                out.push_str(&tail[..1]);
                rest = &tail[1..];
            }
            (_, Some(value)) if !name.is_empty() => {
                out.push_str(&value);
                rest = &tail[consumed..];
            }
            _ => {
                out.push_str(&tail[..consumed.max(1)]);
                rest = &tail[consumed.max(1)..];
            }
        }
    }
    out.push_str(rest);
    out
}

impl From<String> for ImageSource {
    fn from(value: String) -> Self {
        if value.trim().is_empty() || value == Self::NONE {
            Self::None
        } else {
            Self::Path(value)
        }
    }
}

impl From<&str> for ImageSource {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<ImageSource> for String {
    fn from(image: ImageSource) -> Self {
        match image {
            ImageSource::None => ImageSource::NONE.to_string(),
            ImageSource::Path(path) => path,
        }
    }
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str(Self::NONE),
            Self::Path(path) => f.write_str(path),
        }
    }
}
