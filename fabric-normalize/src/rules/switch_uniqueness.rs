//! Topology switch identity must be unique.

use std::collections::BTreeMap;

use crate::fabric_type::FabricType;
use crate::model::CanonicalModel;
use crate::rules::{text, Rule, Severity};

inventory::submit! {
    Rule {
        id: "topology-switch-uniqueness",
        description: "Topology switch names, serial numbers and management addresses are unique",
        severity: Severity::Error,
        fabric_types: &[FabricType::VxlanEvpn, FabricType::Isn, FabricType::External],
        check,
    }
}

const IDENTITY_FIELDS: &[(&str, &[&str])] = &[
    ("name", &["name"]),
    ("serial_number", &["serial_number"]),
    ("management_ipv4_address", &["management", "management_ipv4_address"]),
    ("management_ipv6_address", &["management", "management_ipv6_address"]),
];

fn check(model: &CanonicalModel) -> Vec<String> {
    let mut out = Vec::new();
    for (label, keys) in IDENTITY_FIELDS {
        let mut seen: BTreeMap<String, usize> = BTreeMap::new();
        for switch in model.list(&["topology", "switches"]) {
            if let Some(value) = text(switch, keys) {
                *seen.entry(value).or_default() += 1;
            }
        }
        for (value, count) in seen.into_iter().filter(|(_, count)| *count > 1) {
            out.push(format!(
                "{label} '{value}' is used by {count} topology switches"
            ));
        }
    }
    out
}
