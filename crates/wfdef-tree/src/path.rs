//! Load paths
//!
//! A [`LoadPath`] addresses a node of an exception tree from its root record,
//! one segment per tree key (`nodes.3.bounds`).

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Chain of tree keys from a root record to a tree node
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, serde::Serialize)]
#[serde(transparent)]
pub struct LoadPath(Vec<String>);

impl LoadPath {
    /// Path of the root record itself
    #[inline]
    #[must_use]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Path from already rendered segments
    #[inline]
    #[must_use]
    pub fn new(segments: Vec<String>) -> Self {
        Self(segments)
    }

    /// Segments from root to leaf
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Number of segments
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for the root path
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Path with `key` appended
    #[must_use]
    pub fn child(&self, key: &impl Display) -> Self {
        let mut next = self.clone();
        next.0.push(key.to_string());
        next
    }

    /// Parent path, `None` for the root
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.0
            .split_last()
            .map(|(_, init)| Self(init.to_vec()))
    }

    /// Last segment, `None` for the root
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// True if `self` is `other` or one of its ancestors
    #[must_use]
    pub fn is_prefix_of(&self, other: &Self) -> bool {
        self.0.len() <= other.0.len() && self.0 == other.0[..self.0.len()]
    }

    pub(crate) fn push(&mut self, segment: String) {
        self.0.push(segment);
    }

    pub(crate) fn pop(&mut self) {
        self.0.pop();
    }
}

impl Display for LoadPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<root>");
        }
        f.write_str(&self.0.join("."))
    }
}

impl FromStr for LoadPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s == "<root>" {
            return Ok(Self::root());
        }
        let segments = s
            .split('.')
            .map(|seg| {
                if seg.is_empty() {
                    Err(PathError::EmptySegment(s.to_string()))
                } else {
                    Ok(seg.to_string())
                }
            })
            .collect::<Result<_, _>>()?;
        Ok(Self(segments))
    }
}

/// Errors parsing a load path
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// Empty segment, e.g. `nodes..bounds`
    #[error("load path '{0}' contains an empty segment")]
    EmptySegment(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_and_parent() {
        let path = LoadPath::root().child(&"nodes").child(&3).child(&"bounds");
        assert_eq!(path.segments(), &["nodes", "3", "bounds"]);
        assert_eq!(path.last(), Some("bounds"));
        assert_eq!(path.parent().unwrap().to_string(), "nodes.3");
        assert!(LoadPath::root().parent().is_none());
    }

    #[test]
    fn display_root() {
        assert_eq!(LoadPath::root().to_string(), "<root>");
    }

    #[test]
    fn parse_round_trips_display() {
        let path: LoadPath = "connections.0.bendpoints.1".parse().unwrap();
        assert_eq!(path.len(), 4);
        assert_eq!(path.to_string(), "connections.0.bendpoints.1");
        assert!("".parse::<LoadPath>().unwrap().is_empty());
    }

    #[test]
    fn parse_rejects_empty_segment() {
        assert!(matches!("a..b".parse::<LoadPath>(), Err(PathError::EmptySegment(_))));
    }

    #[test]
    fn prefix() {
        let a: LoadPath = "nodes.3".parse().unwrap();
        let b: LoadPath = "nodes.3.bounds".parse().unwrap();
        assert!(a.is_prefix_of(&b));
        assert!(!b.is_prefix_of(&a));
        assert!(LoadPath::root().is_prefix_of(&a));
    }
}
