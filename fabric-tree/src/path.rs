//! Paths into a [`Node`] tree and the classifier that walks them.
//!
//! A [`Path`] is the only way callers talk about locations in a tree. The
//! classifier never hands out references: it reports, for every segment, whether
//! the segment was found and whether the value there holds data. A segment that
//! hangs below a missing segment is reported as not found, because nothing can
//! be known about it.

use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

use thiserror::Error;

use crate::node::{Node, NodeKind};

/// One step of a [`Path`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Segment {
    Key(String),
    Index(usize),
}

impl Display for Segment {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(key) => f.write_str(key),
            Segment::Index(idx) => write!(f, "[{idx}]"),
        }
    }
}

/// An ordered list of map keys, optionally addressing list items by index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    /// Build a path from plain map keys.
    pub fn from_keys<S: AsRef<str>>(keys: &[S]) -> Self {
        Self {
            segments: keys
                .iter()
                .map(|key| Segment::Key(key.as_ref().to_string()))
                .collect(),
        }
    }

    /// Parse a dotted path such as `vxlan.topology.switches[2].interfaces`.
    pub fn parse(dotted: &str) -> Self {
        let mut segments = Vec::new();
        for part in dotted.split('.').filter(|p| !p.is_empty()) {
            let (key, mut rest) = match part.find('[') {
                Some(pos) => (&part[..pos], &part[pos..]),
                None => (part, ""),
            };
            if !key.is_empty() {
                segments.push(Segment::Key(key.to_string()));
            }
            while let Some(stripped) = rest.strip_prefix('[') {
                let Some(end) = stripped.find(']') else {
                    break;
                };
                match stripped[..end].parse::<usize>() {
                    Ok(idx) => segments.push(Segment::Index(idx)),
                    Err(_) => segments.push(Segment::Key(stripped[..end].to_string())),
                }
                rest = &stripped[end + 1..];
            }
        }
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn last(&self) -> Option<&Segment> {
        self.segments.last()
    }

    /// Return a new path with `key` appended.
    pub fn key(&self, key: impl Into<String>) -> Self {
        let mut out = self.clone();
        out.segments.push(Segment::Key(key.into()));
        out
    }

    /// Return a new path with a list index appended.
    pub fn index(&self, idx: usize) -> Self {
        let mut out = self.clone();
        out.segments.push(Segment::Index(idx));
        out
    }

    /// Return a new path with every segment of `tail` appended.
    pub fn join(&self, tail: &Path) -> Self {
        let mut out = self.clone();
        out.segments.extend(tail.segments.iter().cloned());
        out
    }

    /// The path without its last segment.
    pub fn parent(&self) -> Option<Path> {
        if self.segments.is_empty() {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }
}

impl Display for Path {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (idx, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Key(key) if idx == 0 => write!(f, "{key}")?,
                Segment::Key(key) => write!(f, ".{key}")?,
                Segment::Index(i) => write!(f, "[{i}]")?,
            }
        }
        Ok(())
    }
}

impl From<&str> for Path {
    fn from(value: &str) -> Self {
        Path::parse(value)
    }
}

/// What the classifier learned about a single path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    /// The segment is absent, or sits below an absent segment.
    NotFound,
    /// The segment exists and its value holds data.
    WithData,
    /// The segment exists but its value is empty, `null`, zero or `false`.
    WithoutData,
}

/// Result of [`classify`]: each segment lands in `found` or `not_found`, and
/// every found segment also lands in `with_data` or `without_data`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Classification {
    pub found: Vec<Segment>,
    pub not_found: Vec<Segment>,
    pub with_data: Vec<Segment>,
    pub without_data: Vec<Segment>,
    states: Vec<KeyState>,
}

impl Classification {
    /// State of the last segment of the classified path.
    pub fn terminal(&self) -> Option<KeyState> {
        self.states.last().copied()
    }

    /// Per-segment states, in path order.
    pub fn states(&self) -> &[KeyState] {
        &self.states
    }

    /// Whether the terminal segment must be (re)filled with a default value.
    pub fn needs_default(&self) -> bool {
        matches!(
            self.terminal(),
            Some(KeyState::NotFound | KeyState::WithoutData)
        )
    }
}

/// Classify every segment of `path` against `tree`.
///
/// A missing `tree` classifies every segment as not found. Pure; never mutates.
pub fn classify(tree: Option<&Node>, path: &Path) -> Classification {
    let mut out = Classification::default();
    let mut current = tree;

    for (pos, segment) in path.segments.iter().enumerate() {
        let next = current.and_then(|node| child(node, segment));
        match next {
            Some(value) => {
                out.found.push(segment.clone());
                if value.is_truthy() {
                    out.with_data.push(segment.clone());
                    out.states.push(KeyState::WithData);
                } else {
                    out.without_data.push(segment.clone());
                    out.states.push(KeyState::WithoutData);
                }
                current = Some(value);
            }
            None => {
                for rest in &path.segments[pos..] {
                    out.not_found.push(rest.clone());
                    out.states.push(KeyState::NotFound);
                }
                break;
            }
        }
    }

    out
}

/// Errors raised while mutating a tree through a [`Path`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    /// An intermediate segment holds a value that cannot contain children.
    #[error("cannot descend into '{path}': found {found}, expected {expected}")]
    NotAContainer {
        path: String,
        found: NodeKind,
        expected: NodeKind,
    },
    /// A list index points past the end of the list.
    #[error("index out of range at '{path}'")]
    IndexOutOfRange { path: String },
    #[error("empty path")]
    Empty,
}

impl Node {
    /// Return the node addressed by `path`, if every segment exists.
    pub fn get_path(&self, path: &Path) -> Option<&Node> {
        let mut current = self;
        for segment in &path.segments {
            current = child(current, segment)?;
        }
        Some(current)
    }

    pub fn get_path_mut(&mut self, path: &Path) -> Option<&mut Node> {
        let mut current = self;
        for segment in &path.segments {
            current = child_mut(current, segment)?;
        }
        Some(current)
    }

    /// Write `value` at `path`, creating intermediate maps for missing or
    /// `null` key segments. List indices must already exist.
    pub fn set_path(&mut self, path: &Path, value: Node) -> Result<(), PathError> {
        let Some((last, parents)) = path.segments.split_last() else {
            return Err(PathError::Empty);
        };

        let mut current = self;
        let mut walked = Path::default();
        for segment in parents {
            walked.segments.push(segment.clone());
            current = descend_or_create(current, segment, &walked)?;
        }
        walked.segments.push(last.clone());

        match last {
            Segment::Key(key) => {
                if matches!(current, Node::Null) {
                    *current = Node::map();
                }
                let found = current.kind();
                let entries = current.as_map_mut().ok_or(PathError::NotAContainer {
                    path: walked.to_string(),
                    found,
                    expected: NodeKind::Map,
                })?;
                entries.insert(key.clone(), value);
            }
            Segment::Index(idx) => {
                let found = current.kind();
                let items = current.as_list_mut().ok_or(PathError::NotAContainer {
                    path: walked.to_string(),
                    found,
                    expected: NodeKind::List,
                })?;
                let slot = items.get_mut(*idx).ok_or(PathError::IndexOutOfRange {
                    path: walked.to_string(),
                })?;
                *slot = value;
            }
        }
        Ok(())
    }

    /// Remove and return the value addressed by `path`. List items are removed
    /// from their list, shifting later items down.
    pub fn remove_path(&mut self, path: &Path) -> Option<Node> {
        let (last, parents) = path.segments.split_last()?;
        let mut current = self;
        for segment in parents {
            current = child_mut(current, segment)?;
        }
        match (current, last) {
            (Node::Map(entries), Segment::Key(key)) => entries.remove(key),
            (Node::List(items), Segment::Index(idx)) if *idx < items.len() => {
                Some(items.remove(*idx))
            }
            _ => None,
        }
    }
}

fn child<'a>(node: &'a Node, segment: &Segment) -> Option<&'a Node> {
    match (node, segment) {
        (Node::Map(entries), Segment::Key(key)) => entries.get(key),
        (Node::List(items), Segment::Index(idx)) => items.get(*idx),
        _ => None,
    }
}

fn child_mut<'a>(node: &'a mut Node, segment: &Segment) -> Option<&'a mut Node> {
    match (node, segment) {
        (Node::Map(entries), Segment::Key(key)) => entries.get_mut(key),
        (Node::List(items), Segment::Index(idx)) => items.get_mut(*idx),
        _ => None,
    }
}

fn descend_or_create<'a>(
    node: &'a mut Node,
    segment: &Segment,
    walked: &Path,
) -> Result<&'a mut Node, PathError> {
    match segment {
        Segment::Key(key) => {
            if matches!(node, Node::Null) {
                *node = Node::map();
            }
            let found = node.kind();
            let entries: &mut BTreeMap<String, Node> =
                node.as_map_mut().ok_or(PathError::NotAContainer {
                    path: walked.to_string(),
                    found,
                    expected: NodeKind::Map,
                })?;
            let slot = entries.entry(key.clone()).or_insert(Node::Null);
            if matches!(slot, Node::Null) {
                *slot = Node::map();
            }
            Ok(slot)
        }
        Segment::Index(idx) => {
            let found = node.kind();
            let items = node.as_list_mut().ok_or(PathError::NotAContainer {
                path: walked.to_string(),
                found,
                expected: NodeKind::List,
            })?;
            items.get_mut(*idx).ok_or(PathError::IndexOutOfRange {
                path: walked.to_string(),
            })
        }
    }
}
