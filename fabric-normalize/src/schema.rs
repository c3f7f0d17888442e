//! Required-path tables, one per configuration type.
//!
//! Each table names every container the canonical model must hold once
//! normalization has run. The generic default-filling stage writes an empty
//! container for each missing `Object`/`List` entry, and the completeness stage
//! checks every entry afterwards.

use fabric_tree::{Node, Path};
use serde::Serialize;

use crate::fabric_type::FabricType;

/// Structural kind of a required path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SchemaKind {
    /// A map; defaults to `{}`.
    Object,
    /// A list; defaults to `[]`.
    List,
    /// A list reached through every item of an enclosing list. The first
    /// `enclosing_depth` keys of the path address the enclosing list.
    ListOfObjects { enclosing_depth: usize },
}

impl SchemaKind {
    /// Empty value written when the path is absent or empty.
    pub fn default_value(self) -> Node {
        match self {
            SchemaKind::Object => Node::map(),
            SchemaKind::List | SchemaKind::ListOfObjects { .. } => Node::list(),
        }
    }
}

/// One required path of a schema table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SchemaEntry {
    /// Logical name used in diagnostics.
    pub name: &'static str,
    pub keys: &'static [&'static str],
    pub kind: SchemaKind,
}

impl SchemaEntry {
    const fn object(name: &'static str, keys: &'static [&'static str]) -> Self {
        Self {
            name,
            keys,
            kind: SchemaKind::Object,
        }
    }

    const fn list(name: &'static str, keys: &'static [&'static str]) -> Self {
        Self {
            name,
            keys,
            kind: SchemaKind::List,
        }
    }

    const fn nested_list(
        name: &'static str,
        keys: &'static [&'static str],
        enclosing_depth: usize,
    ) -> Self {
        Self {
            name,
            keys,
            kind: SchemaKind::ListOfObjects { enclosing_depth },
        }
    }

    pub fn path(&self) -> Path {
        Path::from_keys(self.keys)
    }

    /// For nested lists, the enclosing list path and the per-item tail.
    pub fn split_enclosing(&self) -> Option<(Path, Path)> {
        match self.kind {
            SchemaKind::ListOfObjects { enclosing_depth } if enclosing_depth < self.keys.len() => {
                Some((
                    Path::from_keys(&self.keys[..enclosing_depth]),
                    Path::from_keys(&self.keys[enclosing_depth..]),
                ))
            }
            _ => None,
        }
    }
}

const VXLAN_EVPN: &[SchemaEntry] = &[
    SchemaEntry::object("fabric", &["vxlan", "fabric"]),
    SchemaEntry::object("global", &["vxlan", "global"]),
    SchemaEntry::list("global_dns_servers", &["vxlan", "global", "dns_servers"]),
    SchemaEntry::list("global_ntp_servers", &["vxlan", "global", "ntp_servers"]),
    SchemaEntry::list("global_syslog_servers", &["vxlan", "global", "syslog_servers"]),
    SchemaEntry::object("global_spanning_tree", &["vxlan", "global", "spanning_tree"]),
    SchemaEntry::object("underlay", &["vxlan", "underlay"]),
    SchemaEntry::object("underlay_general", &["vxlan", "underlay", "general"]),
    SchemaEntry::object("topology", &["vxlan", "topology"]),
    SchemaEntry::list("topology_switches", &["vxlan", "topology", "switches"]),
    SchemaEntry::nested_list(
        "topology_switch_interfaces",
        &["vxlan", "topology", "switches", "interfaces"],
        3,
    ),
    SchemaEntry::list("topology_fabric_links", &["vxlan", "topology", "fabric_links"]),
    SchemaEntry::list("topology_edge_connections", &["vxlan", "topology", "edge_connections"]),
    SchemaEntry::list("topology_vpc_peers", &["vxlan", "topology", "vpc_peers"]),
    SchemaEntry::object("overlay", &["vxlan", "overlay"]),
    SchemaEntry::list("overlay_vrfs", &["vxlan", "overlay", "vrfs"]),
    SchemaEntry::list("overlay_vrf_attach_groups", &["vxlan", "overlay", "vrf_attach_groups"]),
    SchemaEntry::list("overlay_networks", &["vxlan", "overlay", "networks"]),
    SchemaEntry::list(
        "overlay_network_attach_groups",
        &["vxlan", "overlay", "network_attach_groups"],
    ),
    SchemaEntry::object("overlay_extensions", &["vxlan", "overlay_extensions"]),
    SchemaEntry::list("vrf_lites", &["vxlan", "overlay_extensions", "vrf_lites"]),
    SchemaEntry::object("route_control", &["vxlan", "overlay_extensions", "route_control"]),
    SchemaEntry::list(
        "route_control_route_maps",
        &["vxlan", "overlay_extensions", "route_control", "route_maps"],
    ),
    SchemaEntry::list(
        "route_control_ip_access_lists",
        &["vxlan", "overlay_extensions", "route_control", "ip_access_lists"],
    ),
    SchemaEntry::list(
        "route_control_ipv6_access_lists",
        &["vxlan", "overlay_extensions", "route_control", "ipv6_access_lists"],
    ),
    SchemaEntry::list(
        "route_control_ip_prefix_lists",
        &["vxlan", "overlay_extensions", "route_control", "ip_prefix_lists"],
    ),
    SchemaEntry::list(
        "route_control_groups",
        &["vxlan", "overlay_extensions", "route_control", "groups"],
    ),
    SchemaEntry::list(
        "route_control_switches",
        &["vxlan", "overlay_extensions", "route_control", "switches"],
    ),
    SchemaEntry::object("policy", &["vxlan", "policy"]),
    SchemaEntry::list("policy_policies", &["vxlan", "policy", "policies"]),
    SchemaEntry::list("policy_groups", &["vxlan", "policy", "groups"]),
    SchemaEntry::list("policy_switches", &["vxlan", "policy", "switches"]),
];

const ISN: &[SchemaEntry] = &[
    SchemaEntry::object("fabric", &["vxlan", "fabric"]),
    SchemaEntry::object("global", &["vxlan", "global"]),
    SchemaEntry::list("global_dns_servers", &["vxlan", "global", "dns_servers"]),
    SchemaEntry::list("global_ntp_servers", &["vxlan", "global", "ntp_servers"]),
    SchemaEntry::list("global_syslog_servers", &["vxlan", "global", "syslog_servers"]),
    SchemaEntry::object("topology", &["vxlan", "topology"]),
    SchemaEntry::list("topology_switches", &["vxlan", "topology", "switches"]),
    SchemaEntry::nested_list(
        "topology_switch_interfaces",
        &["vxlan", "topology", "switches", "interfaces"],
        3,
    ),
    SchemaEntry::list("topology_edge_connections", &["vxlan", "topology", "edge_connections"]),
    SchemaEntry::object("policy", &["vxlan", "policy"]),
    SchemaEntry::list("policy_policies", &["vxlan", "policy", "policies"]),
    SchemaEntry::list("policy_groups", &["vxlan", "policy", "groups"]),
    SchemaEntry::list("policy_switches", &["vxlan", "policy", "switches"]),
];

const EXTERNAL: &[SchemaEntry] = &[
    SchemaEntry::object("fabric", &["vxlan", "fabric"]),
    SchemaEntry::object("global", &["vxlan", "global"]),
    SchemaEntry::object("topology", &["vxlan", "topology"]),
    SchemaEntry::list("topology_switches", &["vxlan", "topology", "switches"]),
    SchemaEntry::nested_list(
        "topology_switch_interfaces",
        &["vxlan", "topology", "switches", "interfaces"],
        3,
    ),
    SchemaEntry::object("overlay_extensions", &["vxlan", "overlay_extensions"]),
    SchemaEntry::object("route_control", &["vxlan", "overlay_extensions", "route_control"]),
    SchemaEntry::list(
        "route_control_route_maps",
        &["vxlan", "overlay_extensions", "route_control", "route_maps"],
    ),
    SchemaEntry::list(
        "route_control_ip_access_lists",
        &["vxlan", "overlay_extensions", "route_control", "ip_access_lists"],
    ),
    SchemaEntry::list(
        "route_control_ipv6_access_lists",
        &["vxlan", "overlay_extensions", "route_control", "ipv6_access_lists"],
    ),
    SchemaEntry::list(
        "route_control_ip_prefix_lists",
        &["vxlan", "overlay_extensions", "route_control", "ip_prefix_lists"],
    ),
    SchemaEntry::list(
        "route_control_groups",
        &["vxlan", "overlay_extensions", "route_control", "groups"],
    ),
    SchemaEntry::list(
        "route_control_switches",
        &["vxlan", "overlay_extensions", "route_control", "switches"],
    ),
    SchemaEntry::object("policy", &["vxlan", "policy"]),
    SchemaEntry::list("policy_policies", &["vxlan", "policy", "policies"]),
    SchemaEntry::list("policy_groups", &["vxlan", "policy", "groups"]),
    SchemaEntry::list("policy_switches", &["vxlan", "policy", "switches"]),
];

/// Return the required-path table for a configuration type.
///
/// `MSD` and `MCFG` documents only group child fabrics and have no required
/// paths of their own.
pub fn schema_table(fabric_type: FabricType) -> &'static [SchemaEntry] {
    match fabric_type {
        FabricType::VxlanEvpn => VXLAN_EVPN,
        FabricType::Isn => ISN,
        FabricType::External => EXTERNAL,
        FabricType::Msd | FabricType::Mcfg => &[],
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::{schema_table, SchemaKind};
    use crate::fabric_type::{FabricType, ROOT_KEY};

    #[test]
    fn tables_share_one_root_and_unique_names() {
        for ty in FabricType::ALL {
            let table = schema_table(ty);
            let names: BTreeSet<_> = table.iter().map(|e| e.name).collect();
            assert_eq!(names.len(), table.len(), "duplicate names for {ty}");
            assert!(table.iter().all(|e| e.keys.first() == Some(&ROOT_KEY)));
        }
    }

    #[test]
    fn grouping_types_have_empty_tables() {
        assert!(schema_table(FabricType::Msd).is_empty());
        assert!(schema_table(FabricType::Mcfg).is_empty());
        assert!(!schema_table(FabricType::VxlanEvpn).is_empty());
    }

    #[test]
    fn nested_lists_split_at_enclosing_list() {
        let entry = schema_table(FabricType::VxlanEvpn)
            .iter()
            .find(|e| matches!(e.kind, SchemaKind::ListOfObjects { .. }))
            .expect("nested entry");
        let (outer, tail) = entry.split_enclosing().expect("split");
        assert_eq!(outer.to_string(), "vxlan.topology.switches");
        assert_eq!(tail.to_string(), "interfaces");
    }
}
