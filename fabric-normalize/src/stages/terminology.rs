//! Move renamed sub-trees to their current names.

use fabric_tree::{classify, KeyState, Path};
use tracing::warn;

use crate::error::{NormalizeError, Notice};
use crate::pipeline::{Stage, StageContext};
use crate::stages::path_failure;

pub const STAGE: &str = "terminology";

/// `(old, new)` key paths.
const RENAMES: &[(&[&str], &[&str])] = &[
    (&["vxlan", "overlay_services"], &["vxlan", "overlay"]),
    (
        &["vxlan", "overlay_extensions", "vrf_lite"],
        &["vxlan", "overlay_extensions", "vrf_lites"],
    ),
];

pub struct TerminologyStage;

impl Stage for TerminologyStage {
    fn order(&self) -> u16 {
        20
    }

    fn id(&self) -> &'static str {
        STAGE
    }

    fn apply(&self, ctx: &mut StageContext<'_>) -> Result<(), NormalizeError> {
        for &(old, new) in RENAMES {
            let old = Path::from_keys(old);
            let new = Path::from_keys(new);
            let Some(value) = ctx.tree.remove_path(&old) else {
                continue;
            };
            let deprecated = old.to_string();
            let current = new.to_string();

            if classify(Some(&ctx.tree), &new).terminal() == Some(KeyState::WithData) {
                warn!(%deprecated, %current, "deprecated key ignored");
                ctx.notices.push(Notice::DeprecatedPathIgnored {
                    stage: STAGE,
                    deprecated,
                    current,
                });
                continue;
            }

            ctx.tree.set_path(&new, value).map_err(path_failure(STAGE))?;
            warn!(%deprecated, %current, "deprecated key moved");
            ctx.notices.push(Notice::DeprecatedPathUsed {
                stage: STAGE,
                deprecated,
                current,
            });
        }
        Ok(())
    }
}
