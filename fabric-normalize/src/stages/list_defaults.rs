//! Fill every missing or empty `Object`/`List` path of the schema table.

use fabric_tree::classify;

use crate::error::NormalizeError;
use crate::pipeline::{Stage, StageContext};
use crate::schema::{schema_table, SchemaKind};
use crate::stages::path_failure;

pub const STAGE: &str = "list_defaults";

pub struct ListDefaultsStage;

impl Stage for ListDefaultsStage {
    fn order(&self) -> u16 {
        30
    }

    fn id(&self) -> &'static str {
        STAGE
    }

    fn apply(&self, ctx: &mut StageContext<'_>) -> Result<(), NormalizeError> {
        let fabric_type = ctx.require_fabric_type(STAGE)?;
        // Table order puts parents before children.
        for entry in schema_table(fabric_type) {
            if matches!(entry.kind, SchemaKind::ListOfObjects { .. }) {
                continue;
            }
            let path = entry.path();
            if classify(Some(&ctx.tree), &path).needs_default() {
                ctx.tree
                    .set_path(&path, entry.kind.default_value())
                    .map_err(path_failure(STAGE))?;
            }
        }
        Ok(())
    }
}
