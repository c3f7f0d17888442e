//! Expand VRF-lite intents into one policy per (intent, switch).

use std::collections::BTreeMap;

use fabric_tree::Node;

use crate::error::NormalizeError;
use crate::fabric_type::ROOT_KEY;
use crate::pipeline::{Stage, StageContext};
use crate::stages::{render_and_install, PolicyRequest};
use crate::synth::interfaces::{canonical_interface_name, is_loopback};
use crate::synth::{merge_defaults, policy_name};
use crate::template::VRF_LITE_TEMPLATE;

pub const STAGE: &str = "vrf_lite_policy";

/// Intent keys that describe the intent itself rather than switch settings.
const INTENT_ONLY: &[&str] = &["name", "vrf", "description", "switches"];

pub struct VrfLitePolicyStage;

impl Stage for VrfLitePolicyStage {
    fn order(&self) -> u16 {
        80
    }

    fn id(&self) -> &'static str {
        STAGE
    }

    fn apply(&self, ctx: &mut StageContext<'_>) -> Result<(), NormalizeError> {
        let requests = requests(&ctx.tree)?;
        render_and_install(ctx, STAGE, VRF_LITE_TEMPLATE, requests)
    }
}

fn requests(tree: &Node) -> Result<Vec<PolicyRequest>, NormalizeError> {
    let fabric_asn = tree
        .get_in(&[ROOT_KEY, "global", "bgp_asn"])
        .cloned()
        .unwrap_or(Node::Null);

    let mut out = Vec::new();
    for (i, intent) in tree
        .list_in(&[ROOT_KEY, "overlay_extensions", "vrf_lites"])
        .enumerate()
    {
        let intent_name = required(intent, &format!("vrf_lites[{i}]"))?;
        let vrf = intent
            .text_in(&["vrf"])
            .unwrap_or_else(|| intent_name.clone());

        for (s, switch) in intent.list_in(&["switches"]).enumerate() {
            let switch_name = required(switch, &format!("vrf_lites[{i}].switches[{s}]"))?;
            let merged = canonicalize(merge_defaults(intent, switch, INTENT_ONLY));

            let mut bindings = BTreeMap::new();
            bindings.insert("vrf".to_string(), Node::from(vrf.as_str()));
            bindings.insert("intent".to_string(), Node::from(intent_name.as_str()));
            bindings.insert("fabric_asn".to_string(), fabric_asn.clone());
            bindings.insert("switch".to_string(), merged);

            out.push(PolicyRequest {
                name: policy_name("vrf_lite", &intent_name, &switch_name),
                description: intent
                    .text_in(&["description"])
                    .unwrap_or_else(|| format!("VRF-lite {intent_name} on {switch_name}")),
                intent: intent_name.clone(),
                switch: switch_name,
                bindings: Node::Map(bindings),
            });
        }
    }
    Ok(out)
}

fn required(entry: &Node, location: &str) -> Result<String, NormalizeError> {
    entry
        .text_in(&["name"])
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| NormalizeError::MissingRequiredData {
            stage: STAGE,
            path: format!("{ROOT_KEY}.overlay_extensions.{location}.name"),
            detail: "VRF-lite entries need a name".to_string(),
        })
}

/// Expand interface names and flatten next-hops to plain addresses.
fn canonicalize(mut switch: Node) -> Node {
    if let Some(interfaces) = switch.get_mut("interfaces").and_then(Node::as_list_mut) {
        for intf in interfaces.iter_mut() {
            let Some(raw) = intf.text_in(&["name"]) else {
                continue;
            };
            if let Some(fields) = intf.as_map_mut() {
                fields.insert("name".to_string(), Node::from(canonical_interface_name(&raw)));
                fields.insert("loopback".to_string(), Node::Bool(is_loopback(&raw)));
            }
        }
    }
    if let Some(routes) = switch.get_mut("static_routes").and_then(Node::as_list_mut) {
        for route in routes.iter_mut() {
            if let Some(hops) = route.get_mut("next_hops").and_then(Node::as_list_mut) {
                for hop in hops.iter_mut() {
                    if let Some(ip) = hop.text_in(&["ip"]) {
                        *hop = Node::from(ip);
                    }
                }
            }
        }
    }
    switch
}
