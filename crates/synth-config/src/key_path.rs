//! Dotted key paths into a settings tree

use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};

use crate::{Error, Result};

/// A dotted path such as `mongodb.port` or `tasks.0`.
///
/// Segments are non-empty and made of ASCII alphanumerics, `_` or `-`. A
/// purely numeric segment indexes into a sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyPath {
    segments: Vec<String>,
}

impl KeyPath {
    /// Parse a dotted key path.
    pub fn parse(path: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidKeyPath {
            path: path.to_string(),
            reason: reason.to_string(),
        };

        if path.is_empty() {
            return Err(invalid("empty path"));
        }

        let mut segments = Vec::new();
        for segment in path.split('.') {
            if segment.is_empty() {
                return Err(invalid("empty segment"));
            }
            if !segment
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
            {
                return Err(invalid("segments may only contain letters, digits, '_' and '-'"));
            }
            segments.push(segment.to_string());
        }

        Ok(Self { segments })
    }

    /// The empty path, addressing the root of the tree.
    pub fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// First segment, i.e. the top-level section this path lives in.
    pub fn head(&self) -> Option<&str> {
        self.segments.first().map(String::as_str)
    }

    /// The path without its last segment, `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        let (_, parents) = self.segments.split_last()?;
        Some(Self {
            segments: parents.to_vec(),
        })
    }

    /// A new path with `segment` appended.
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }

    /// Look the path up in `tree`.
    pub fn lookup<'a>(&self, tree: &'a Value) -> Option<&'a Value> {
        self.segments
            .iter()
            .try_fold(tree, |node, segment| step(node, segment))
    }

    /// Mutable counterpart of [`KeyPath::lookup`].
    pub fn lookup_mut<'a>(&self, tree: &'a mut Value) -> Option<&'a mut Value> {
        let mut node = tree;
        for segment in &self.segments {
            node = match node {
                Value::Object(map) => map.get_mut(segment)?,
                Value::Array(items) => items.get_mut(segment_index(segment)?)?,
                _ => return None,
            };
        }
        Some(node)
    }

    /// Store `value` at this path, creating intermediate mappings as needed.
    ///
    /// An existing non-mapping value on the way is replaced by a mapping,
    /// except that sequences are indexed when the segment is numeric and in
    /// range.
    pub fn set(&self, tree: &mut Value, value: Value) {
        let Some((last, parents)) = self.segments.split_last() else {
            *tree = value;
            return;
        };

        let mut node = tree;
        for segment in parents {
            node = child_mut(node, segment);
        }

        if let Value::Array(items) = node {
            if let Some(slot) = segment_index(last).and_then(|i| items.get_mut(i)) {
                *slot = value;
                return;
            }
        }
        ensure_object(node).insert(last.clone(), value);
    }

    /// Remove the value at this path, returning it if it existed.
    pub fn remove(&self, tree: &mut Value) -> Option<Value> {
        let (last, parents) = self.segments.split_last()?;

        let mut node = tree;
        for segment in parents {
            node = match node {
                Value::Object(map) => map.get_mut(segment)?,
                Value::Array(items) => items.get_mut(segment_index(segment)?)?,
                _ => return None,
            };
        }

        match node {
            Value::Object(map) => map.shift_remove(last),
            Value::Array(items) => {
                let index = segment_index(last).filter(|i| *i < items.len())?;
                Some(items.remove(index))
            }
            _ => None,
        }
    }
}

fn segment_index(segment: &str) -> Option<usize> {
    if segment.chars().all(|c| c.is_ascii_digit()) {
        segment.parse().ok()
    } else {
        None
    }
}

fn step<'a>(node: &'a Value, segment: &str) -> Option<&'a Value> {
    match node {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => items.get(segment_index(segment)?),
        _ => None,
    }
}

fn child_mut<'a>(node: &'a mut Value, segment: &str) -> &'a mut Value {
    let index = match &*node {
        Value::Array(items) => segment_index(segment).filter(|i| *i < items.len()),
        _ => None,
    };
    match (node, index) {
        (Value::Array(items), Some(index)) => &mut items[index],
        (node, _) => ensure_object(node)
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new())),
    }
}

fn ensure_object(node: &mut Value) -> &mut Map<String, Value> {
    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    match node {
        Value::Object(map) => map,
        _ => unreachable!("node was just replaced by an object"),
    }
}

impl FromStr for KeyPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}
