//! Give every topology switch an `interfaces` list.

use fabric_tree::Path;

use crate::error::NormalizeError;
use crate::fabric_type::ROOT_KEY;
use crate::pipeline::{Stage, StageContext};
use crate::stages::{ensure_item_lists, path_failure};

pub const STAGE: &str = "topology_switches";

pub struct TopologySwitchesStage;

impl Stage for TopologySwitchesStage {
    fn order(&self) -> u16 {
        40
    }

    fn id(&self) -> &'static str {
        STAGE
    }

    fn apply(&self, ctx: &mut StageContext<'_>) -> Result<(), NormalizeError> {
        let switches = Path::from_keys(&[ROOT_KEY, "topology", "switches"]);
        ensure_item_lists(&mut ctx.tree, &switches, &["interfaces"]).map_err(path_failure(STAGE))
    }
}
