use crate::Node;

/// One difference between two trees, keyed by its dotted path.
///
/// List items paired by key show up as `list[key]`, items paired by position
/// as `list[n]` (one-based).
#[derive(Debug, Clone, PartialEq)]
pub enum DiffEntry {
    /// Both sides hold a scalar of the same kind with different values.
    Modified { path: String, left: Node, right: Node },
    OnlyLeft { path: String, node: Node },
    OnlyRight { path: String, node: Node },
    /// The two sides hold different kinds of node, e.g. a list and a map.
    Structural { path: String, description: String },
}
