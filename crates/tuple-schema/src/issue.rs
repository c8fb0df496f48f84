//! Structured validation failures
//!
//! A failed parse reports every problem it found, not just the first. Each
//! [`Issue`] pairs a human-readable message with a [`Path`] locating the
//! offending value relative to the tuple root, so a failure three levels deep
//! inside a nested object still names the exact field.

use serde::Serialize;
use std::fmt;

/// One step into a nested value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Segment {
    /// Positional index, either a tuple position or an array element.
    Index(usize),
    /// Object field name.
    Key(String),
}

/// Location of a value relative to the tuple root.
///
/// Renders in the familiar `$[2].user.name` form: `$` is the tuple itself,
/// bracketed indices step into positions and array elements, dotted names
/// step into object fields.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Path(Vec<Segment>);

impl Path {
    /// The tuple root itself.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Child path for a positional index.
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(Segment::Index(index));
        Self(segments)
    }

    /// Child path for an object field.
    pub fn key(&self, key: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(Segment::Key(key.to_string()));
        Self(segments)
    }

    /// Segments from the root down.
    pub fn segments(&self) -> &[Segment] {
        &self.0
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$")?;
        for segment in &self.0 {
            match segment {
                Segment::Index(index) => write!(f, "[{}]", index)?,
                Segment::Key(key) => write!(f, ".{}", key)?,
            }
        }
        Ok(())
    }
}

/// A single validation failure at one location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    /// Where the failure occurred.
    pub path: Path,
    /// What went wrong.
    pub message: String,
}

impl Issue {
    /// Create an issue at the given path.
    pub fn new(path: Path, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Every issue collected during one parse, in discovery order.
///
/// Produced only by failed parses, so it is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issues(Vec<Issue>);

impl Issues {
    /// Wrap a list of collected issues.
    pub fn new(issues: Vec<Issue>) -> Self {
        Self(issues)
    }

    /// Number of collected issues.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no issues were collected.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate the issues in discovery order.
    pub fn iter(&self) -> std::slice::Iter<'_, Issue> {
        self.0.iter()
    }
}

impl fmt::Display for Issues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for issue in &self.0 {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}", issue)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for Issues {}

impl IntoIterator for Issues {
    type Item = Issue;
    type IntoIter = std::vec::IntoIter<Issue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Issues {
    type Item = &'a Issue;
    type IntoIter = std::slice::Iter<'a, Issue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
