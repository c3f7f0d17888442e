use std::collections::{BTreeSet, HashSet};

use crate::diff::result::DiffEntry;
use crate::Node;

/// Map key used to pair list items across the two sides.
const KEY_FIELD: &str = "name";

/// Every difference between `left` and `right`, in path order.
///
/// Map keys are visited in sorted order. List items that carry a `name` pair
/// by that name; keyless items pair by position with keyless peers.
pub fn diff(left: &Node, right: &Node) -> Vec<DiffEntry> {
    let mut out = Vec::new();
    diff_node(left, right, "", &mut out);
    out
}

fn diff_node(left: &Node, right: &Node, path: &str, out: &mut Vec<DiffEntry>) {
    match (left, right) {
        (Node::Map(l), Node::Map(r)) => {
            let keys: BTreeSet<&String> = l.keys().chain(r.keys()).collect();
            for key in keys {
                let child = join(path, key);
                match (l.get(key), r.get(key)) {
                    (Some(lv), Some(rv)) => diff_node(lv, rv, &child, out),
                    (Some(lv), None) => out.push(only_left(child, lv)),
                    (None, Some(rv)) => out.push(only_right(child, rv)),
                    (None, None) => {}
                }
            }
        }
        (Node::List(l), Node::List(r)) => diff_lists(l, r, path, out),
        _ if left.kind() != right.kind() => out.push(DiffEntry::Structural {
            path: path.to_string(),
            description: format!("kind mismatch: left={} right={}", left.kind(), right.kind()),
        }),
        _ if left != right => out.push(DiffEntry::Modified {
            path: path.to_string(),
            left: left.clone(),
            right: right.clone(),
        }),
        _ => {}
    }
}

fn diff_lists(left: &[Node], right: &[Node], path: &str, out: &mut Vec<DiffEntry>) {
    let right_keys: Vec<Option<String>> = right.iter().map(|n| n.text_in(&[KEY_FIELD])).collect();
    let mut paired = HashSet::new();

    for (idx, item) in left.iter().enumerate() {
        let key = item.text_in(&[KEY_FIELD]);
        let partner = match &key {
            Some(key) => (0..right.len())
                .find(|&r| !paired.contains(&r) && right_keys[r].as_ref() == Some(key)),
            None => Some(idx).filter(|&r| {
                r < right.len() && right_keys[r].is_none() && !paired.contains(&r)
            }),
        };
        let child = item_path(path, key.as_deref(), idx);
        match partner {
            Some(r) => {
                paired.insert(r);
                diff_node(item, &right[r], &child, out);
            }
            None => out.push(only_left(child, item)),
        }
    }

    for (idx, item) in right.iter().enumerate() {
        if !paired.contains(&idx) {
            out.push(only_right(item_path(path, right_keys[idx].as_deref(), idx), item));
        }
    }
}

fn only_left(path: String, node: &Node) -> DiffEntry {
    DiffEntry::OnlyLeft {
        path,
        node: node.clone(),
    }
}

fn only_right(path: String, node: &Node) -> DiffEntry {
    DiffEntry::OnlyRight {
        path,
        node: node.clone(),
    }
}

/// `list[key]` for keyed items, one-based `list[n]` otherwise.
fn item_path(parent: &str, key: Option<&str>, idx: usize) -> String {
    match key {
        Some(key) => format!("{parent}[{key}]"),
        None => format!("{parent}[{}]", idx + 1),
    }
}

fn join(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}
