//! Parameters whose validity depends on a mode selector.

use crate::fabric_type::FabricType;
use crate::model::CanonicalModel;
use crate::rules::{has_data, text, Rule, Severity};

inventory::submit! {
    Rule {
        id: "global-exclusive-parameters",
        description: "Mode-dependent global parameters are set only for the mode that uses them",
        severity: Severity::Error,
        fabric_types: &[FabricType::VxlanEvpn, FabricType::External],
        check,
    }
}

struct ModeBlock {
    /// Key path of the mode selector.
    selector: &'static [&'static str],
    /// Key path of the block holding the dependent parameters.
    block: &'static [&'static str],
    modes: &'static [Mode],
}

struct Mode {
    value: &'static str,
    required: &'static [&'static str],
    forbidden: &'static [&'static str],
}

const BLOCKS: &[ModeBlock] = &[
    ModeBlock {
        selector: &["global", "spanning_tree", "root_bridge_protocol"],
        block: &["global", "spanning_tree"],
        modes: &[
            Mode {
                value: "rpvst+",
                required: &["vlan_range"],
                forbidden: &["mst_instance_range"],
            },
            Mode {
                value: "mst",
                required: &["mst_instance_range"],
                forbidden: &["vlan_range"],
            },
            Mode {
                value: "unmanaged",
                required: &[],
                forbidden: &["vlan_range", "mst_instance_range"],
            },
        ],
    },
    ModeBlock {
        selector: &["underlay", "general", "replication_mode"],
        block: &["underlay", "multicast"],
        modes: &[
            Mode {
                value: "ingress",
                required: &[],
                forbidden: &["group_subnet", "rendezvous_points"],
            },
            Mode {
                value: "multicast",
                required: &[],
                forbidden: &[],
            },
        ],
    },
];

fn check(model: &CanonicalModel) -> Vec<String> {
    let Some(root) = model.get(&[]) else {
        return Vec::new();
    };
    let mut out = Vec::new();
    for block in BLOCKS {
        let Some(selected) = text(root, block.selector) else {
            continue;
        };
        let Some(mode) = block
            .modes
            .iter()
            .find(|mode| mode.value.eq_ignore_ascii_case(selected.trim()))
        else {
            continue;
        };
        let params = root.get_in(block.block);
        let is_set = |key: &str| params.is_some_and(|p| has_data(p, &[key]));
        let selector = dotted(block.selector);
        let block_path = dotted(block.block);

        for &key in mode.required {
            if !is_set(key) {
                out.push(format!(
                    "{selector} is '{}' which requires {block_path}.{key}",
                    mode.value
                ));
            }
        }
        for &key in mode.forbidden {
            if is_set(key) {
                out.push(format!(
                    "{block_path}.{key} cannot be set when {selector} is '{}'",
                    mode.value
                ));
            }
        }
    }
    out
}

fn dotted(keys: &[&str]) -> String {
    format!("vxlan.{}", keys.join("."))
}
