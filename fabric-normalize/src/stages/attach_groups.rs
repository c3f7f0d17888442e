//! Fill the nested lists of VRF and network attach groups.
//!
//! `network_attach_groups[].switches[]` each get `ports` and `tors`, and every
//! `tors[]` entry gets its own `ports`.

use fabric_tree::Path;

use crate::error::NormalizeError;
use crate::fabric_type::ROOT_KEY;
use crate::pipeline::{Stage, StageContext};
use crate::stages::{ensure_item_lists, list_len, path_failure};

pub const STAGE: &str = "attach_groups";

pub struct AttachGroupsStage;

impl Stage for AttachGroupsStage {
    fn order(&self) -> u16 {
        50
    }

    fn id(&self) -> &'static str {
        STAGE
    }

    fn apply(&self, ctx: &mut StageContext<'_>) -> Result<(), NormalizeError> {
        let to_failure = path_failure(STAGE);
        let overlay = Path::from_keys(&[ROOT_KEY, "overlay"]);

        let vrf_groups = overlay.key("vrf_attach_groups");
        ensure_item_lists(&mut ctx.tree, &vrf_groups, &["switches"]).map_err(&to_failure)?;

        let groups = overlay.key("network_attach_groups");
        ensure_item_lists(&mut ctx.tree, &groups, &["switches"]).map_err(&to_failure)?;
        for g in 0..list_len(&ctx.tree, &groups) {
            let switches = groups.index(g).key("switches");
            ensure_item_lists(&mut ctx.tree, &switches, &["ports", "tors"]).map_err(&to_failure)?;
            for s in 0..list_len(&ctx.tree, &switches) {
                let tors = switches.index(s).key("tors");
                ensure_item_lists(&mut ctx.tree, &tors, &["ports"]).map_err(&to_failure)?;
            }
        }
        Ok(())
    }
}
