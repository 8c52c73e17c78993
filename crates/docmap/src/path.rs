//! Dotted paths into a value tree (`"orders.0.id"`).

use std::fmt;
use std::str::FromStr;

use crate::error::PathError;

/// A sequence of keys. Array elements are addressed by decimal index.
///
/// The empty path is the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path {
    parts: Vec<String>,
}

impl Path {
    pub fn root() -> Self {
        Path::default()
    }

    /// Parse a dotted path. The empty string is the root.
    ///
    /// # Errors
    ///
    /// Returns [`PathError`] when a segment is empty (`"a..b"`, `".a"`, `"a."`).
    pub fn parse(text: &str) -> Result<Self, PathError> {
        if text.is_empty() {
            return Ok(Path::root());
        }
        let parts: Vec<String> = text.split('.').map(str::to_string).collect();
        if parts.iter().any(String::is_empty) {
            return Err(PathError {
                path: text.to_string(),
                reason: "empty segment",
            });
        }
        Ok(Path { parts })
    }

    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    pub fn is_root(&self) -> bool {
        self.parts.is_empty()
    }

    /// Last segment, or `None` at the root.
    pub fn name(&self) -> Option<&str> {
        self.parts.last().map(String::as_str)
    }

    pub fn parent(&self) -> Option<Path> {
        let (_, init) = self.parts.split_last()?;
        Some(Path {
            parts: init.to_vec(),
        })
    }

    pub fn sub_path(&self, name: impl Into<String>) -> Path {
        let mut parts = self.parts.clone();
        parts.push(name.into());
        Path { parts }
    }

    pub fn concat(&self, other: &Path) -> Path {
        Path {
            parts: self.parts.iter().chain(&other.parts).cloned().collect(),
        }
    }
}

impl FromStr for Path {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Path::parse(s)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.parts.join("."))
    }
}
