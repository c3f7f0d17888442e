use std::path::PathBuf;

use fabric_tree::{diff, format_summary, format_text, parse, parse_file, DiffEntry, Node};
use pretty_assertions::assert_eq;

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path)
}

#[test]
fn diff_pairs_named_list_items_regardless_of_order() {
    let left = parse_file(&fixture("fixtures/tree_a.yaml")).expect("left parse");
    let right = parse_file(&fixture("fixtures/tree_b.yaml")).expect("right parse");

    let entries = diff(&left, &right);

    assert!(entries.contains(&DiffEntry::Modified {
        path: "vxlan.topology.switches[leaf1].role".to_string(),
        left: Node::from("leaf"),
        right: Node::from("border"),
    }));
    assert!(entries.iter().any(|e| matches!(
        e,
        DiffEntry::OnlyRight { path, .. } if path == "vxlan.topology.switches[spine1].interfaces"
    )));
    assert!(entries.iter().any(|e| matches!(
        e,
        DiffEntry::OnlyRight { path, .. } if path == "vxlan.global"
    )));

    let text = format_text(&entries);
    let summary = format_summary(&entries);

    assert!(text.contains("~ vxlan.topology.switches[leaf1].role: \"leaf\" -> \"border\""));
    assert!(summary.contains("added=2"));
}

#[test]
fn keyless_items_pair_by_position() {
    let left = parse("routes:\n  - prefix: 10.0.0.0/8\n  - prefix: 10.1.0.0/16\n").expect("left");
    let right = parse("routes:\n  - prefix: 10.0.0.0/8\n  - prefix: 10.2.0.0/16\n  - prefix: 10.3.0.0/16\n")
        .expect("right");

    let entries = diff(&left, &right);

    assert_eq!(
        entries,
        vec![
            DiffEntry::Modified {
                path: "routes[2].prefix".to_string(),
                left: Node::from("10.1.0.0/16"),
                right: Node::from("10.2.0.0/16"),
            },
            DiffEntry::OnlyRight {
                path: "routes[3]".to_string(),
                node: right.get_in(&["routes"]).and_then(Node::as_list).expect("routes")[2].clone(),
            },
        ]
    );
}

#[test]
fn identical_trees_produce_no_entries() {
    let left = parse_file(&fixture("fixtures/tree_a.yaml")).expect("parse");
    assert!(diff(&left, &left.clone()).is_empty());
}
