//! Cross-reference and consistency checks for VRF-lite extensions.

use std::collections::BTreeMap;

use fabric_tree::Node;

use crate::fabric_type::FabricType;
use crate::model::CanonicalModel;
use crate::rules::{has_data, text, Rule, Severity};
use crate::synth::interfaces::{canonical_interface_name, is_loopback};

inventory::submit! {
    Rule {
        id: "vrf-lite-references",
        description: "VRF-lite extensions reference known switches and use consistent routing settings",
        severity: Severity::Error,
        fabric_types: &[FabricType::VxlanEvpn],
        check,
    }
}

const BACKBONE_AREAS: [&str; 2] = ["0", "0.0.0.0"];

fn check(model: &CanonicalModel) -> Vec<String> {
    let fabric_asn = model.get(&["global", "bgp_asn"]).and_then(Node::scalar_text);
    let mut out = Vec::new();
    let mut routes: BTreeMap<(String, String), Vec<(String, Vec<Route>)>> = BTreeMap::new();

    for intent in model.list(&["overlay_extensions", "vrf_lites"]) {
        let name = text(intent, &["name"]).unwrap_or_default();
        let vrf = text(intent, &["vrf"]).unwrap_or_else(|| name.clone());
        let scope = format!("VRF-lite '{name}'");

        exclusive_protocols(intent, &scope, &mut out);
        bgp_peers(intent, fabric_asn.as_deref(), &scope, &mut out);
        ospf_areas(intent, &scope, &mut out);

        for switch in intent.list_in(&["switches"]) {
            let Some(switch_name) = text(switch, &["name"]) else {
                continue;
            };
            if !model.switch_index.contains(&switch_name) {
                out.push(format!(
                    "{scope}: switch '{switch_name}' is not defined in vxlan.topology.switches"
                ));
            }
            let scope = format!("{scope} switch '{switch_name}'");
            exclusive_protocols(switch, &scope, &mut out);
            bgp_peers(switch, fabric_asn.as_deref(), &scope, &mut out);
            ospf_areas(switch, &scope, &mut out);
            for intf in switch.list_in(&["interfaces"]) {
                interface_ospf(intf, &scope, &mut out);
            }

            routes
                .entry((vrf.clone(), switch_name))
                .or_default()
                .push((name.clone(), static_routes(switch)));
        }
    }

    for ((vrf, switch), entries) in &routes {
        let Some((first_name, first)) = entries.first() else {
            continue;
        };
        for (other_name, other) in &entries[1..] {
            if other != first {
                out.push(format!(
                    "static routes for VRF '{vrf}' on switch '{switch}' differ between VRF-lite '{first_name}' and '{other_name}'"
                ));
            }
        }
    }
    out
}

fn defines(node: &Node, key: &str) -> bool {
    node.get(key).is_some_and(|value| !matches!(value, Node::Null))
}

fn exclusive_protocols(scope_node: &Node, scope: &str, out: &mut Vec<String>) {
    let ospf = defines(scope_node, "ospf") || defines(scope_node, "ospfv3");
    if defines(scope_node, "bgp") && ospf {
        out.push(format!("{scope}: bgp and ospf cannot be combined in one entry"));
    }
}

/// AS numbers compare as text, so `65001` and `"65001"` match. Asdot values
/// such as `1.100` must be quoted: unquoted they parse as the float `1.1`.
fn bgp_peers(scope_node: &Node, fabric_asn: Option<&str>, scope: &str, out: &mut Vec<String>) {
    for peer in scope_node.list_in(&["bgp", "peers"]) {
        if !has_data(peer, &["route_reflector_client"]) {
            continue;
        }
        let remote = peer.text_in(&["remote_as"]);
        if remote.is_none() || remote.as_deref() != fabric_asn {
            let address = text(peer, &["address"]).unwrap_or_default();
            out.push(format!(
                "{scope}: peer {address} is a route-reflector client but remote_as {} is not the fabric AS {}",
                remote.as_deref().unwrap_or("(unset)"),
                fabric_asn.unwrap_or("(unset)")
            ));
        }
    }
}

fn ospf_areas(scope_node: &Node, scope: &str, out: &mut Vec<String>) {
    for protocol in ["ospf", "ospfv3"] {
        for area in scope_node.list_in(&[protocol, "areas"]) {
            let id = text(area, &["id"]).unwrap_or_default();
            if BACKBONE_AREAS.contains(&id.as_str()) {
                if let Some(area_type) = text(area, &["area_type"]) {
                    if area_type != "standard" {
                        out.push(format!(
                            "{scope}: backbone area {id} must be of type standard, found {area_type}"
                        ));
                    }
                }
            }

            let never = has_data(area, &["nssa", "translate", "never"]);
            let always = has_data(area, &["nssa", "translate", "always"]);
            let suppress_fa = has_data(area, &["nssa", "translate", "suppress_fa"]);
            if never && (always || suppress_fa) {
                out.push(format!(
                    "{scope}: nssa area {id} cannot combine translate never with always or suppress_fa"
                ));
            }
            if has_data(area, &["nssa", "route_map"])
                && !has_data(area, &["nssa", "default_information_originate"])
            {
                out.push(format!(
                    "{scope}: nssa area {id} route_map requires default_information_originate"
                ));
            }
        }
    }
}

fn interface_ospf(intf: &Node, scope: &str, out: &mut Vec<String>) {
    let name = canonical_interface_name(&text(intf, &["name"]).unwrap_or_default());
    if has_data(intf, &["ospf", "auth_type"]) && !has_data(intf, &["ospf", "auth_key"]) {
        out.push(format!(
            "{scope} interface {name}: ospf auth_type requires auth_key"
        ));
    }
    // Fires when the interface is a loopback and the flag is set.
    for flag in ["advertise_subnet", "passive_interface"] {
        if is_loopback(&name) && has_data(intf, &["ospf", flag]) {
            out.push(format!(
                "{scope} interface {name}: ospf {flag} is only supported on Loopback interfaces"
            ));
        }
    }
}

/// A static route with its next-hops in sorted order.
type Route = (String, Vec<String>);

fn static_routes(switch: &Node) -> Vec<Route> {
    let mut routes: Vec<Route> = switch
        .list_in(&["static_routes"])
        .filter_map(|route| {
            let prefix = text(route, &["prefix"])?.to_ascii_lowercase();
            let mut hops: Vec<String> = route
                .list_in(&["next_hops"])
                .filter_map(|hop| hop.scalar_text().or_else(|| hop.text_in(&["ip"])))
                .collect();
            hops.sort();
            hops.dedup();
            Some((prefix, hops))
        })
        .collect();
    routes.sort();
    routes.dedup();
    routes
}
