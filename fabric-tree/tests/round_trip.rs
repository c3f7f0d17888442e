use fabric_tree::{parse, parse_file, write, write_file, DocumentFormat, Node, Path};
use pretty_assertions::assert_eq;
use tempfile::tempdir;

#[test]
fn yaml_round_trip_preserves_tree() {
    let original = parse(
        "vxlan:\n  fabric:\n    name: dc1\n  topology:\n    switches:\n      - name: leaf1\n        interfaces: []\n",
    )
    .expect("parse");
    let text = write(&original, DocumentFormat::Yaml).expect("write");
    let reparsed = parse(&text).expect("reparse");
    assert_eq!(original, reparsed);
}

#[test]
fn json_file_round_trip_uses_extension() {
    let dir = tempdir().expect("tempdir");
    let out = dir.path().join("model.json");
    let mut tree = parse("vxlan: {}\n").expect("parse");
    tree.set_path(&Path::parse("vxlan.overlay.vrfs"), Node::list())
        .expect("set");

    write_file(&tree, &out).expect("write file");
    let raw = std::fs::read_to_string(&out).expect("read");
    assert!(raw.trim_start().starts_with('{'));
    assert_eq!(parse_file(&out).expect("parse file"), tree);
}
