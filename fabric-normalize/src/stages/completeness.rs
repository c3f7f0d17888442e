//! Final check that every schema path exists.
//!
//! Never mutates. A path that is present but empty passes; only a path whose
//! terminal key is not found fails. The error cannot tell a gap in the source
//! document from a defective earlier stage, so it names both.

use fabric_tree::{classify, KeyState, Node, Path};

use crate::error::NormalizeError;
use crate::pipeline::{Stage, StageContext};
use crate::schema::{schema_table, SchemaEntry, SchemaKind};
use crate::stages::list_len;

pub const COMPLETENESS_STAGE: &str = "completeness";

pub struct CompletenessStage;

impl Stage for CompletenessStage {
    fn order(&self) -> u16 {
        999
    }

    fn id(&self) -> &'static str {
        COMPLETENESS_STAGE
    }

    fn apply(&self, ctx: &mut StageContext<'_>) -> Result<(), NormalizeError> {
        let fabric_type = ctx.require_fabric_type(COMPLETENESS_STAGE)?;
        for entry in schema_table(fabric_type) {
            verify(&ctx.tree, entry)?;
        }
        Ok(())
    }
}

/// Check one schema entry against `tree`.
pub fn verify(tree: &Node, entry: &SchemaEntry) -> Result<(), NormalizeError> {
    match (entry.kind, entry.split_enclosing()) {
        (SchemaKind::ListOfObjects { .. }, Some((outer, tail))) => {
            for idx in 0..list_len(tree, &outer) {
                present(tree, entry.name, &outer.index(idx).join(&tail))?;
            }
            Ok(())
        }
        _ => present(tree, entry.name, &entry.path()),
    }
}

fn present(tree: &Node, name: &'static str, path: &Path) -> Result<(), NormalizeError> {
    if classify(Some(tree), path).terminal() == Some(KeyState::NotFound) {
        return Err(NormalizeError::CompletenessFailure {
            name,
            path: path.to_string(),
        });
    }
    Ok(())
}
