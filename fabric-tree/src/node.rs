use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

use serde::Serialize;

/// A generic document tree node.
///
/// Every configuration document is held as one of these trees. Maps are keyed
/// by string and kept in sorted order so that output is stable across runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Node {
    /// Explicit `null` (or a key written with no value).
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<Node>),
    Map(BTreeMap<String, Node>),
}

/// Coarse structural kind of a [`Node`], used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Null,
    Scalar,
    List,
    Map,
}

impl Display for NodeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Null => "null",
            NodeKind::Scalar => "scalar",
            NodeKind::List => "list",
            NodeKind::Map => "map",
        };
        f.write_str(name)
    }
}

impl Node {
    /// Create an empty map node.
    pub fn map() -> Self {
        Node::Map(BTreeMap::new())
    }

    /// Create an empty list node.
    pub fn list() -> Self {
        Node::List(Vec::new())
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Null => NodeKind::Null,
            Node::Bool(_) | Node::Integer(_) | Node::Float(_) | Node::String(_) => {
                NodeKind::Scalar
            }
            Node::List(_) => NodeKind::List,
            Node::Map(_) => NodeKind::Map,
        }
    }

    /// Whether the node holds data.
    ///
    /// `null`, `false`, zero, the empty string and empty containers all count
    /// as "present but empty".
    pub fn is_truthy(&self) -> bool {
        match self {
            Node::Null => false,
            Node::Bool(value) => *value,
            Node::Integer(value) => *value != 0,
            Node::Float(value) => *value != 0.0,
            Node::String(value) => !value.is_empty(),
            Node::List(items) => !items.is_empty(),
            Node::Map(entries) => !entries.is_empty(),
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Node>> {
        match self {
            Node::Map(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut BTreeMap<String, Node>> {
        match self {
            Node::Map(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Node]> {
        match self {
            Node::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::String(value) => Some(value),
            _ => None,
        }
    }

    /// Render a scalar as text. Containers and `null` yield `None`.
    pub fn scalar_text(&self) -> Option<String> {
        match self {
            Node::String(value) => Some(value.clone()),
            Node::Integer(value) => Some(value.to_string()),
            Node::Float(value) => Some(value.to_string()),
            Node::Bool(value) => Some(value.to_string()),
            Node::Null | Node::List(_) | Node::Map(_) => None,
        }
    }

    /// Return the child stored under `key` when this node is a map.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.as_map().and_then(|entries| entries.get(key))
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Node> {
        self.as_map_mut().and_then(|entries| entries.get_mut(key))
    }

    /// Walk a chain of map keys and return the terminal node if found.
    pub fn get_in(&self, keys: &[&str]) -> Option<&Node> {
        let mut current = self;
        for key in keys {
            current = current.get(key)?;
        }
        Some(current)
    }

    /// Walk a chain of map keys and return the terminal scalar as text.
    pub fn text_in(&self, keys: &[&str]) -> Option<String> {
        self.get_in(keys).and_then(Node::scalar_text)
    }

    /// Iterate the items of the list found at `keys`. Missing or non-list
    /// values iterate as empty.
    pub fn list_in<'a>(&'a self, keys: &[&str]) -> impl Iterator<Item = &'a Node> + 'a {
        self.get_in(keys)
            .and_then(Node::as_list)
            .unwrap_or_default()
            .iter()
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::String(value.to_string())
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::String(value)
    }
}

impl From<i64> for Node {
    fn from(value: i64) -> Self {
        Node::Integer(value)
    }
}

impl From<bool> for Node {
    fn from(value: bool) -> Self {
        Node::Bool(value)
    }
}

impl From<Vec<Node>> for Node {
    fn from(value: Vec<Node>) -> Self {
        Node::List(value)
    }
}

impl From<BTreeMap<String, Node>> for Node {
    fn from(value: BTreeMap<String, Node>) -> Self {
        Node::Map(value)
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(text) => f.write_str(&text),
            Err(_) => write!(f, "<{}>", self.kind()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::Node;

    #[test]
    fn truthiness_treats_zero_and_empty_as_without_data() {
        assert!(!Node::Null.is_truthy());
        assert!(!Node::Integer(0).is_truthy());
        assert!(!Node::String(String::new()).is_truthy());
        assert!(!Node::list().is_truthy());
        assert!(!Node::map().is_truthy());
        assert!(Node::Integer(65001).is_truthy());
        assert!(Node::List(vec![Node::Null]).is_truthy());
    }

    #[test]
    fn get_in_walks_nested_maps() {
        let mut fabric = BTreeMap::new();
        fabric.insert("name".to_string(), Node::from("dc1"));
        let mut root = BTreeMap::new();
        root.insert("fabric".to_string(), Node::Map(fabric));
        let root = Node::Map(root);

        assert_eq!(root.text_in(&["fabric", "name"]), Some("dc1".to_string()));
        assert!(root.get_in(&["fabric", "type"]).is_none());
    }

    #[test]
    fn display_renders_compact_json() {
        assert_eq!(Node::List(vec![Node::from(1), Node::from("a")]).to_string(), r#"[1,"a"]"#);
    }
}
