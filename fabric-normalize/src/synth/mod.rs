//! Policy synthesis from declarative intents.
//!
//! The provisioning layer only understands flat policy objects, attached to
//! policy groups, attached to switches. Every (intent, switch) pair is expanded
//! into exactly one of each, keyed by a deterministic name, so re-running
//! synthesis on its own output changes nothing.
//!
//! Generated objects live under `vxlan.policy`:
//!
//! - `policies[]`: `{name, template_name, description, template_vars: {conf}}`
//! - `groups[]`: `{name, policies: [{name}]}`
//! - `switches[]`: `{name, groups: [...]}`

pub mod interfaces;
pub mod ports;

use std::collections::BTreeMap;

use fabric_tree::{Node, NodeKind, Path, PathError};

use crate::fabric_type::ROOT_KEY;

/// Template name the provisioning layer uses for raw configuration blobs.
pub const FREEFORM_TEMPLATE: &str = "switch_freeform";

/// One rendered policy ready to be merged into the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPolicy {
    pub name: String,
    pub switch: String,
    pub description: String,
    pub conf: String,
}

/// Deterministic policy name for an (intent, switch) pair.
pub fn policy_name(kind: &str, intent: &str, switch: &str) -> String {
    format!("{kind}_{intent}_{switch}")
}

/// Merge intent-level settings into a switch entry.
///
/// Keys the switch already defines always win; nested maps merge recursively.
/// Keys listed in `skip` are never copied down.
pub fn merge_defaults(intent: &Node, switch: &Node, skip: &[&str]) -> Node {
    let mut merged = switch.clone();
    let Some(defaults) = intent.as_map() else {
        return merged;
    };
    if let Some(target) = merged.as_map_mut() {
        for (key, value) in defaults {
            if !skip.contains(&key.as_str()) {
                merge_entry(target, key, value);
            }
        }
    }
    merged
}

fn merge_entry(target: &mut BTreeMap<String, Node>, key: &str, value: &Node) {
    if matches!(target.get(key), None | Some(Node::Null)) {
        target.insert(key.to_string(), value.clone());
        return;
    }
    if let (Some(Node::Map(existing)), Node::Map(defaults)) = (target.get_mut(key), value) {
        for (child_key, child_value) in defaults {
            merge_entry(existing, child_key, child_value);
        }
    }
}

/// Merge `policy` into `tree`. Safe to repeat: the policy object is replaced
/// by name, and group/switch membership is only appended when absent.
pub fn install_policy(tree: &mut Node, policy: &GeneratedPolicy) -> Result<(), PathError> {
    let policy_root = Path::from_keys(&[ROOT_KEY, "policy"]);

    let policies = ensure_list(tree, &policy_root.key("policies"))?;
    let object = policy_object(policy);
    match position_by_name(policies, &policy.name) {
        Some(idx) => policies[idx] = object,
        None => policies.push(object),
    }

    let groups = ensure_list(tree, &policy_root.key("groups"))?;
    if position_by_name(groups, &policy.name).is_none() {
        groups.push(group_object(&policy.name));
    }

    let switches_path = policy_root.key("switches");
    let switches = ensure_list(tree, &switches_path)?;
    let idx = match position_by_name(switches, &policy.switch) {
        Some(idx) => idx,
        None => {
            let mut entry = BTreeMap::new();
            entry.insert("name".to_string(), Node::from(policy.switch.as_str()));
            switches.push(Node::Map(entry));
            switches.len() - 1
        }
    };
    let memberships = ensure_list(tree, &switches_path.index(idx).key("groups"))?;
    let already_member = memberships
        .iter()
        .any(|g| g.as_str() == Some(policy.name.as_str()));
    if !already_member {
        memberships.push(Node::from(policy.name.as_str()));
    }
    Ok(())
}

fn policy_object(policy: &GeneratedPolicy) -> Node {
    let mut vars = BTreeMap::new();
    vars.insert("conf".to_string(), Node::from(policy.conf.as_str()));

    let mut entry = BTreeMap::new();
    entry.insert("name".to_string(), Node::from(policy.name.as_str()));
    entry.insert("template_name".to_string(), Node::from(FREEFORM_TEMPLATE));
    entry.insert(
        "description".to_string(),
        Node::from(policy.description.as_str()),
    );
    entry.insert("template_vars".to_string(), Node::Map(vars));
    Node::Map(entry)
}

fn group_object(name: &str) -> Node {
    let mut member = BTreeMap::new();
    member.insert("name".to_string(), Node::from(name));

    let mut entry = BTreeMap::new();
    entry.insert("name".to_string(), Node::from(name));
    entry.insert("policies".to_string(), Node::List(vec![Node::Map(member)]));
    Node::Map(entry)
}

fn position_by_name(items: &[Node], name: &str) -> Option<usize> {
    items
        .iter()
        .position(|item| item.text_in(&["name"]).as_deref() == Some(name))
}

/// Return the list at `path`, creating it when the path is absent or holds an
/// empty value. A non-empty non-list value is an error.
pub fn ensure_list<'a>(tree: &'a mut Node, path: &Path) -> Result<&'a mut Vec<Node>, PathError> {
    let needs_default = match tree.get_path(path) {
        None => true,
        Some(Node::List(_)) => false,
        Some(other) => !other.is_truthy(),
    };
    if needs_default {
        tree.set_path(path, Node::list())?;
    }
    let path_text = path.to_string();
    let node = tree.get_path_mut(path).ok_or(PathError::IndexOutOfRange {
        path: path_text.clone(),
    })?;
    let found = node.kind();
    node.as_list_mut().ok_or(PathError::NotAContainer {
        path: path_text,
        found,
        expected: NodeKind::List,
    })
}

#[cfg(test)]
mod tests {
    use fabric_tree::{parse, Node, Path};
    use pretty_assertions::assert_eq;

    use super::{install_policy, merge_defaults, policy_name, GeneratedPolicy};

    fn policy() -> GeneratedPolicy {
        GeneratedPolicy {
            name: policy_name("vrf_lite", "ext1", "leaf1"),
            switch: "leaf1".to_string(),
            description: "test".to_string(),
            conf: "vrf context blue".to_string(),
        }
    }

    fn count(tree: &Node, path: &str) -> usize {
        tree.get_path(&Path::parse(path))
            .and_then(Node::as_list)
            .map_or(0, <[Node]>::len)
    }

    #[test]
    fn switch_settings_win_over_intent_defaults() {
        let intent = parse("name: ext1\nbgp:\n  holdtime: 90\n  keepalive: 30\nospf:\n  process: 1\nswitches: []\n")
            .expect("parse");
        let switch = parse("name: leaf1\nbgp:\n  holdtime: 180\n").expect("parse");
        let merged = merge_defaults(&intent, &switch, &["name", "switches"]);

        assert_eq!(merged.text_in(&["name"]), Some("leaf1".to_string()));
        assert_eq!(merged.text_in(&["bgp", "holdtime"]), Some("180".to_string()));
        assert_eq!(merged.text_in(&["bgp", "keepalive"]), Some("30".to_string()));
        assert_eq!(merged.text_in(&["ospf", "process"]), Some("1".to_string()));
        assert!(merged.get("switches").is_none());
    }

    #[test]
    fn install_twice_creates_one_of_each_object() {
        let mut tree = parse("vxlan:\n  fabric:\n    name: dc1\n").expect("parse");
        install_policy(&mut tree, &policy()).expect("first");
        install_policy(&mut tree, &policy()).expect("second");

        assert_eq!(count(&tree, "vxlan.policy.policies"), 1);
        assert_eq!(count(&tree, "vxlan.policy.groups"), 1);
        assert_eq!(count(&tree, "vxlan.policy.switches"), 1);
        assert_eq!(count(&tree, "vxlan.policy.switches[0].groups"), 1);
    }

    #[test]
    fn install_appends_to_existing_switch_entry() {
        let mut tree = parse(
            "vxlan:\n  policy:\n    switches:\n      - name: leaf1\n        groups: [manual]\n",
        )
        .expect("parse");
        install_policy(&mut tree, &policy()).expect("install");

        let groups = tree
            .get_path(&Path::parse("vxlan.policy.switches[0].groups"))
            .and_then(Node::as_list)
            .expect("groups");
        assert_eq!(
            groups.to_vec(),
            vec![Node::from("manual"), Node::from("vrf_lite_ext1_leaf1")]
        );
    }
}
