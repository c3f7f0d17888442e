//! Fill the nested lists of VRF-lite intents and route-control groups.

use fabric_tree::Path;

use crate::error::NormalizeError;
use crate::fabric_type::ROOT_KEY;
use crate::pipeline::{Stage, StageContext};
use crate::stages::{ensure_item_lists, list_len, path_failure};

pub const STAGE: &str = "vrf_lite_defaults";

/// Per-group member lists of a route-control group.
pub(crate) const ROUTE_CONTROL_MEMBERS: [&str; 4] = [
    "route_maps",
    "ip_access_lists",
    "ipv6_access_lists",
    "ip_prefix_lists",
];

pub struct VrfLiteDefaultsStage;

impl Stage for VrfLiteDefaultsStage {
    fn order(&self) -> u16 {
        60
    }

    fn id(&self) -> &'static str {
        STAGE
    }

    fn apply(&self, ctx: &mut StageContext<'_>) -> Result<(), NormalizeError> {
        let to_failure = path_failure(STAGE);
        let extensions = Path::from_keys(&[ROOT_KEY, "overlay_extensions"]);

        let intents = extensions.key("vrf_lites");
        ensure_item_lists(&mut ctx.tree, &intents, &["switches"]).map_err(&to_failure)?;
        for i in 0..list_len(&ctx.tree, &intents) {
            let switches = intents.index(i).key("switches");
            ensure_item_lists(&mut ctx.tree, &switches, &["interfaces", "static_routes"])
                .map_err(&to_failure)?;
            for s in 0..list_len(&ctx.tree, &switches) {
                let routes = switches.index(s).key("static_routes");
                ensure_item_lists(&mut ctx.tree, &routes, &["next_hops"]).map_err(&to_failure)?;
            }
        }

        let route_control = extensions.key("route_control");
        ensure_item_lists(&mut ctx.tree, &route_control.key("groups"), &ROUTE_CONTROL_MEMBERS)
            .map_err(&to_failure)?;
        ensure_item_lists(&mut ctx.tree, &route_control.key("switches"), &["groups"])
            .map_err(&to_failure)?;
        Ok(())
    }
}
