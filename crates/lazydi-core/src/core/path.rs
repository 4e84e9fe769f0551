use crate::core::error::{DiError, DiResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator used by the dotted textual form of a key path.
pub const SEPARATOR: char = '.';

/// Ordered, non-empty sequence of keys into a configuration tree.
///
/// A `KeyPath` is immutable: [`KeyPath::child`] returns a new path one
/// segment longer. Segments are arbitrary strings, so a key containing the
/// separator is representable through [`KeyPath::new`] even though
/// [`KeyPath::parse`] cannot produce it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct KeyPath {
    segments: Vec<String>,
}

impl KeyPath {
    /// Build a path from explicit segments.
    pub fn new<I, S>(segments: I) -> DiResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(DiError::InvalidArgument(
                "Key path must have at least one segment".to_string(),
            ));
        }
        Ok(Self { segments })
    }

    /// Single-segment path.
    pub fn root(key: impl Into<String>) -> Self {
        Self {
            segments: vec![key.into()],
        }
    }

    /// Parse the dotted form, e.g. `"database.pool.size"`.
    pub fn parse(dotted: &str) -> DiResult<Self> {
        let segments: Vec<&str> = dotted.split(SEPARATOR).collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(DiError::InvalidArgument(format!(
                "Invalid key path '{}': empty segment",
                dotted
            )));
        }
        Self::new(segments)
    }

    /// New path extended by `key`.
    pub fn child(&self, key: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(key.into());
        Self { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Never true: a path has at least one segment.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Final segment, the key that gets assigned on writes.
    pub fn last(&self) -> &str {
        // Construction guarantees at least one segment.
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    /// All segments except the last.
    pub fn parents(&self) -> &[String] {
        &self.segments[..self.segments.len().saturating_sub(1)]
    }

    /// Dotted rendering of the first `len` segments, used in error messages.
    pub fn prefix(&self, len: usize) -> String {
        self.segments[..len.min(self.segments.len())].join(".")
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

impl TryFrom<Vec<String>> for KeyPath {
    type Error = DiError;

    fn try_from(segments: Vec<String>) -> DiResult<Self> {
        Self::new(segments)
    }
}

impl From<KeyPath> for Vec<String> {
    fn from(path: KeyPath) -> Self {
        path.segments
    }
}

impl std::str::FromStr for KeyPath {
    type Err = DiError;

    fn from_str(s: &str) -> DiResult<Self> {
        Self::parse(s)
    }
}
