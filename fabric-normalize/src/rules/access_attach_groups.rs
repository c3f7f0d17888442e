//! Access interfaces and network attach groups.
//!
//! An access interface with a fixed `access_vlan` must not be listed in any
//! network attach group. One without a fixed VLAN may be listed in at most one
//! group. A group that holds any access port may back only one network.

use std::collections::{BTreeMap, BTreeSet};

use fabric_tree::Node;

use crate::fabric_type::FabricType;
use crate::model::CanonicalModel;
use crate::rules::{has_data, text, Rule, Severity};
use crate::synth::interfaces::canonical_interface_name;

inventory::submit! {
    Rule {
        id: "access-interface-attach-groups",
        description: "Access interfaces appear in network attach groups at most once, and never when the VLAN is fixed",
        severity: Severity::Error,
        fabric_types: &[FabricType::VxlanEvpn],
        check,
    }
}

/// `(leaf, device behind the leaf or empty, interface)`.
type PortKey = (String, String, String);

fn check(model: &CanonicalModel) -> Vec<String> {
    let access = access_interfaces(model);
    let references = attach_group_references(model);
    let mut out = Vec::new();

    let mut groups_with_access = BTreeSet::new();
    for ((leaf, tor, intf), groups) in &references {
        let device = if tor.is_empty() { leaf } else { tor };
        let Some(fixed) = access.get(&(device.clone(), intf.clone())) else {
            continue;
        };
        groups_with_access.extend(groups.iter().cloned());
        let label = port_label(leaf, tor, intf);

        if *fixed {
            for group in groups {
                out.push(format!(
                    "{label} is an access interface with a fixed access_vlan and must not be listed in network attach group '{group}'"
                ));
            }
        } else if groups.len() > 1 {
            let listed: Vec<&str> = groups.iter().map(String::as_str).collect();
            out.push(format!(
                "{label} is an access interface and may be listed in only one network attach group, found in: {}",
                listed.join(", ")
            ));
        }
    }

    for group in &groups_with_access {
        let networks: Vec<String> = model
            .list(&["overlay", "networks"])
            .filter(|net| text(net, &["network_attach_group"]).as_deref() == Some(group.as_str()))
            .filter_map(|net| text(net, &["name"]))
            .collect();
        if networks.len() > 1 {
            out.push(format!(
                "network attach group '{group}' contains access interfaces and may back only one network, used by: {}",
                networks.join(", ")
            ));
        }
    }
    out
}

/// `(switch, interface)` → whether the access VLAN is fixed.
fn access_interfaces(model: &CanonicalModel) -> BTreeMap<(String, String), bool> {
    let mut out = BTreeMap::new();
    for switch in model.list(&["topology", "switches"]) {
        let Some(switch_name) = text(switch, &["name"]) else {
            continue;
        };
        for intf in switch.list_in(&["interfaces"]) {
            let is_access = text(intf, &["mode"]).is_some_and(|mode| mode.eq_ignore_ascii_case("access"));
            let Some(name) = text(intf, &["name"]).filter(|_| is_access) else {
                continue;
            };
            out.insert(
                (switch_name.clone(), canonical_interface_name(&name)),
                has_data(intf, &["access_vlan"]),
            );
        }
    }
    out
}

/// Every port listed by a network attach group, with the distinct groups that
/// list it.
fn attach_group_references(model: &CanonicalModel) -> BTreeMap<PortKey, BTreeSet<String>> {
    let mut out: BTreeMap<PortKey, BTreeSet<String>> = BTreeMap::new();
    for group in model.list(&["overlay", "network_attach_groups"]) {
        let Some(group_name) = text(group, &["name"]) else {
            continue;
        };
        for switch in group.list_in(&["switches"]) {
            let Some(leaf) = text(switch, &["hostname"]) else {
                continue;
            };
            for port in ports(switch) {
                out.entry((leaf.clone(), String::new(), port))
                    .or_default()
                    .insert(group_name.clone());
            }
            for tor in switch.list_in(&["tors"]) {
                let Some(tor_name) = text(tor, &["hostname"]) else {
                    continue;
                };
                for port in ports(tor) {
                    out.entry((leaf.clone(), tor_name.clone(), port))
                        .or_default()
                        .insert(group_name.clone());
                }
            }
        }
    }
    out
}

fn ports(entry: &Node) -> impl Iterator<Item = String> + '_ {
    entry
        .list_in(&["ports"])
        .filter_map(Node::scalar_text)
        .map(|port| canonical_interface_name(&port))
}

fn port_label(leaf: &str, tor: &str, intf: &str) -> String {
    if tor.is_empty() {
        format!("{leaf} {intf}")
    } else {
        format!("{leaf}/{tor} {intf}")
    }
}

#[cfg(test)]
mod tests {
    use super::check;
    use crate::rules::testing::model;

    fn doc(access_vlan: &str, groups: &str, networks: &str) -> String {
        format!(
            "\
vxlan:
  fabric:
    name: dc1
    type: VXLAN_EVPN
  topology:
    switches:
      - name: leaf1
        role: leaf
        interfaces:
          - name: Ethernet1/5
            mode: access
{access_vlan}          - name: Ethernet1/6
            mode: trunk
  overlay:
    network_attach_groups:
{groups}    networks:
{networks}"
        )
    }

    fn group(name: &str, port: &str) -> String {
        format!("      - name: {name}\n        switches:\n          - hostname: leaf1\n            ports: [{port}]\n")
    }

    #[test]
    fn fixed_vlan_port_listed_once_is_one_violation() {
        let m = model(&doc("            access_vlan: 10\n", &group("g1", "eth1/5"), "      []\n"));
        let found = check(&m);
        assert_eq!(found.len(), 1, "{found:?}");
        assert!(found[0].contains("leaf1 Ethernet1/5"));
    }

    #[test]
    fn floating_port_in_two_groups_is_one_violation() {
        let groups = format!("{}{}", group("g1", "Ethernet1/5"), group("g2", "e1/5"));
        let found = check(&model(&doc("", &groups, "      []\n")));
        assert_eq!(found.len(), 1, "{found:?}");
        assert!(found[0].contains("g1, g2"));
    }

    #[test]
    fn floating_port_in_one_group_is_fine() {
        let found = check(&model(&doc("", &group("g1", "Ethernet1/5"), "      []\n")));
        assert!(found.is_empty(), "{found:?}");
    }

    #[test]
    fn trunk_ports_are_ignored() {
        let groups = format!("{}{}", group("g1", "Ethernet1/6"), group("g2", "Ethernet1/6"));
        assert!(check(&model(&doc("", &groups, "      []\n"))).is_empty());
    }

    #[test]
    fn access_group_backing_two_networks_is_flagged() {
        let networks = "      - name: web\n        vrf_name: blue\n        network_attach_group: g1\n      - name: db\n        vrf_name: blue\n        network_attach_group: g1\n";
        let found = check(&model(&doc("", &group("g1", "Ethernet1/5"), networks)));
        assert_eq!(found.len(), 1, "{found:?}");
        assert!(found[0].contains("web, db"));
    }

    fn tor_doc(access_vlan: &str, groups: &str) -> String {
        format!(
            "\
vxlan:
  fabric:
    name: dc1
    type: VXLAN_EVPN
  topology:
    switches:
      - name: leaf1
        role: leaf
      - name: tor1
        role: tor
        interfaces:
          - name: Ethernet1/1
            mode: access
{access_vlan}  overlay:
    network_attach_groups:
{groups}    networks: []
"
        )
    }

    fn tor_group(name: &str, port: &str) -> String {
        format!(
            "      - name: {name}\n        switches:\n          - hostname: leaf1\n            tors:\n              - hostname: tor1\n                ports: [{port}]\n"
        )
    }

    #[test]
    fn fixed_vlan_port_behind_a_leaf_is_flagged() {
        let found = check(&model(&tor_doc("            access_vlan: 20\n", &tor_group("g1", "eth1/1"))));
        assert_eq!(found.len(), 1, "{found:?}");
        assert!(
            found[0].starts_with("leaf1/tor1 Ethernet1/1 is an access interface with a fixed access_vlan"),
            "{found:?}"
        );
    }

    #[test]
    fn floating_port_behind_a_leaf_in_two_groups_is_one_violation() {
        let groups = format!("{}{}", tor_group("g1", "Ethernet1/1"), tor_group("g2", "e1/1"));
        let found = check(&model(&tor_doc("", &groups)));
        assert_eq!(found.len(), 1, "{found:?}");
        assert!(found[0].contains("leaf1/tor1 Ethernet1/1"), "{found:?}");
        assert!(found[0].contains("g1, g2"), "{found:?}");
    }

    #[test]
    fn same_port_name_on_the_leaf_itself_is_a_different_key() {
        let groups = format!("{}{}", tor_group("g1", "Ethernet1/1"), group("g2", "Ethernet1/1"));
        assert!(check(&model(&tor_doc("", &groups))).is_empty());
    }
}
