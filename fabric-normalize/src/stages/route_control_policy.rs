//! Expand route-control groups into one policy per (group, switch).
//!
//! A switch lists the groups it uses; a group lists route-maps and access or
//! prefix lists by name. Each reference is resolved against the objects defined
//! under `route_control` and handed to the template with ports and message types
//! in their symbolic form.

use std::collections::BTreeMap;

use fabric_tree::Node;

use crate::error::NormalizeError;
use crate::fabric_type::ROOT_KEY;
use crate::pipeline::{Stage, StageContext};
use crate::stages::vrf_lite_defaults::ROUTE_CONTROL_MEMBERS;
use crate::stages::{render_and_install, PolicyRequest};
use crate::synth::policy_name;
use crate::synth::ports::{canonical_port, PortProtocol};
use crate::template::ROUTE_CONTROL_TEMPLATE;

pub const STAGE: &str = "route_control_policy";

const ROUTE_CONTROL: [&str; 3] = [ROOT_KEY, "overlay_extensions", "route_control"];

pub struct RouteControlPolicyStage;

impl Stage for RouteControlPolicyStage {
    fn order(&self) -> u16 {
        90
    }

    fn id(&self) -> &'static str {
        STAGE
    }

    fn apply(&self, ctx: &mut StageContext<'_>) -> Result<(), NormalizeError> {
        let requests = match ctx.tree.get_in(&ROUTE_CONTROL) {
            Some(route_control) => requests(route_control)?,
            None => Vec::new(),
        };
        render_and_install(ctx, STAGE, ROUTE_CONTROL_TEMPLATE, requests)
    }
}

fn requests(route_control: &Node) -> Result<Vec<PolicyRequest>, NormalizeError> {
    let mut out = Vec::new();
    for (s, switch) in route_control.list_in(&["switches"]).enumerate() {
        let switch_name = switch
            .text_in(&["name"])
            .filter(|name| !name.is_empty())
            .ok_or_else(|| missing(format!("switches[{s}].name"), "switch entries need a name"))?;

        for (g, group_ref) in switch.list_in(&["groups"]).enumerate() {
            let group_name = member_name(group_ref).ok_or_else(|| {
                missing(
                    format!("switches[{s}].groups[{g}]"),
                    &format!("group reference on switch '{switch_name}' has no name"),
                )
            })?;
            let group = find_by_name(route_control, "groups", &group_name).ok_or_else(|| {
                missing(
                    "groups".to_string(),
                    &format!("group '{group_name}' used by switch '{switch_name}' is not defined"),
                )
            })?;

            let mut bindings = BTreeMap::new();
            bindings.insert("switch".to_string(), Node::from(switch_name.as_str()));
            bindings.insert("group".to_string(), Node::from(group_name.as_str()));
            for kind in ROUTE_CONTROL_MEMBERS {
                let mut resolved = Vec::new();
                for (m, member) in group.list_in(&[kind]).enumerate() {
                    let name = member_name(member).ok_or_else(|| {
                        missing(
                            format!("groups[{group_name}].{kind}[{m}]"),
                            &format!("member of group '{group_name}' has no name"),
                        )
                    })?;
                    let object = find_by_name(route_control, kind, &name).ok_or_else(|| {
                        missing(
                            kind.to_string(),
                            &format!("'{name}' used by group '{group_name}' is not defined"),
                        )
                    })?;
                    resolved.push(canonical_object(kind, object));
                }
                bindings.insert(kind.to_string(), Node::List(resolved));
            }

            out.push(PolicyRequest {
                name: policy_name("route_control", &group_name, &switch_name),
                description: format!("Route control {group_name} on {switch_name}"),
                intent: group_name,
                switch: switch_name.clone(),
                bindings: Node::Map(bindings),
            });
        }
    }
    Ok(out)
}

fn missing(location: String, detail: &str) -> NormalizeError {
    NormalizeError::MissingRequiredData {
        stage: STAGE,
        path: format!("{}.{location}", ROUTE_CONTROL.join(".")),
        detail: detail.to_string(),
    }
}

/// Members may be plain scalars or `{name: ...}` maps.
fn member_name(member: &Node) -> Option<String> {
    member
        .scalar_text()
        .or_else(|| member.text_in(&["name"]))
        .filter(|name| !name.is_empty())
}

fn find_by_name<'a>(route_control: &'a Node, kind: &str, name: &str) -> Option<&'a Node> {
    route_control
        .list_in(&[kind])
        .find(|item| item.text_in(&["name"]).as_deref() == Some(name))
}

fn canonical_object(kind: &str, object: &Node) -> Node {
    let ipv6 = match kind {
        "ip_access_lists" => false,
        "ipv6_access_lists" => true,
        _ => return object.clone(),
    };
    let mut object = object.clone();
    if let Some(entries) = object.get_mut("entries").and_then(Node::as_list_mut) {
        for entry in entries.iter_mut() {
            canonical_acl_entry(entry, ipv6);
        }
    }
    object
}

/// Fill omitted fields and rewrite numeric ports and ICMP types by name.
fn canonical_acl_entry(entry: &mut Node, ipv6: bool) {
    let protocol_text = entry.text_in(&["protocol"]);
    let protocol = protocol_text.as_deref().and_then(PortProtocol::from_name).map(|p| match p {
        PortProtocol::Icmp if ipv6 => PortProtocol::Icmpv6,
        other => other,
    });
    let Some(fields) = entry.as_map_mut() else {
        return;
    };
    if fields.contains_key("remark") {
        return;
    }

    let default_protocol = if ipv6 { "ipv6" } else { "ip" };
    fields
        .entry("protocol".to_string())
        .or_insert_with(|| Node::from(default_protocol));
    fields
        .entry("operation".to_string())
        .or_insert_with(|| Node::from("permit"));

    for side in ["source", "destination"] {
        let endpoint = fields.entry(side.to_string()).or_insert_with(Node::map);
        if matches!(endpoint, Node::Null) {
            *endpoint = Node::map();
        }
        let Some(endpoint) = endpoint.as_map_mut() else {
            continue;
        };
        endpoint
            .entry("ip".to_string())
            .or_insert_with(|| Node::from("any"));
        let Some(protocol) = protocol else {
            continue;
        };
        if let Some(port) = endpoint.get_mut("port") {
            *port = canonical_port(protocol, port);
        }
        if let Some(range) = endpoint.get_mut("port_range").and_then(Node::as_map_mut) {
            for bound in ["start", "end"] {
                if let Some(value) = range.get_mut(bound) {
                    *value = canonical_port(protocol, value);
                }
            }
        }
    }

    if let (Some(protocol @ (PortProtocol::Icmp | PortProtocol::Icmpv6)), Some(icmp_type)) =
        (protocol, fields.get_mut("icmp_type"))
    {
        *icmp_type = canonical_port(protocol, icmp_type);
    }
}
