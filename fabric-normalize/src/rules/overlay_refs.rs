//! Overlay objects must reference things that exist.

use std::collections::BTreeSet;

use fabric_tree::Node;

use crate::fabric_type::FabricType;
use crate::model::CanonicalModel;
use crate::rules::{has_data, text, Rule, Severity};

inventory::submit! {
    Rule {
        id: "overlay-cross-reference",
        description: "Networks, VRFs and attach groups reference defined VRFs, groups and switches",
        severity: Severity::Error,
        fabric_types: &[FabricType::VxlanEvpn],
        check,
    }
}

fn names(model: &CanonicalModel, keys: &[&str]) -> BTreeSet<String> {
    model
        .list(keys)
        .filter_map(|item| text(item, &["name"]))
        .collect()
}

fn check(model: &CanonicalModel) -> Vec<String> {
    let vrfs = names(model, &["overlay", "vrfs"]);
    let vrf_groups = names(model, &["overlay", "vrf_attach_groups"]);
    let network_groups = names(model, &["overlay", "network_attach_groups"]);
    let mut out = Vec::new();

    for vrf in model.list(&["overlay", "vrfs"]) {
        let name = text(vrf, &["name"]).unwrap_or_default();
        if let Some(group) = text(vrf, &["vrf_attach_group"]) {
            if !vrf_groups.contains(&group) {
                out.push(format!(
                    "vrf '{name}' references undefined vrf_attach_group '{group}'"
                ));
            }
        }
    }

    for network in model.list(&["overlay", "networks"]) {
        let name = text(network, &["name"]).unwrap_or_default();
        if !has_data(network, &["is_l2_only"]) {
            match text(network, &["vrf_name"]) {
                Some(vrf) if !vrfs.contains(&vrf) => out.push(format!(
                    "network '{name}' references undefined vrf '{vrf}'"
                )),
                Some(_) => {}
                None => out.push(format!(
                    "network '{name}' needs a vrf_name unless is_l2_only is set"
                )),
            }
        }
        if let Some(group) = text(network, &["network_attach_group"]) {
            if !network_groups.contains(&group) {
                out.push(format!(
                    "network '{name}' references undefined network_attach_group '{group}'"
                ));
            }
        }
    }

    for (kind, keys) in [
        ("vrf_attach_group", ["overlay", "vrf_attach_groups"]),
        ("network_attach_group", ["overlay", "network_attach_groups"]),
    ] {
        for group in model.list(&keys) {
            let name = text(group, &["name"]).unwrap_or_default();
            for switch in group.list_in(&["switches"]) {
                unknown_host(model, kind, &name, switch, &mut out);
                for tor in switch.list_in(&["tors"]) {
                    unknown_host(model, kind, &name, tor, &mut out);
                }
            }
        }
    }
    out
}

fn unknown_host(model: &CanonicalModel, kind: &str, group: &str, entry: &Node, out: &mut Vec<String>) {
    let Some(host) = text(entry, &["hostname"]) else {
        return;
    };
    if !model.switch_index.contains(&host) {
        out.push(format!(
            "{kind} '{group}' references switch '{host}' which is not defined in vxlan.topology.switches"
        ));
    }
}
