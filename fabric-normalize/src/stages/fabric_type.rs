//! Resolve the fabric name and configuration type.
//!
//! Both values are read from their current location first, then from two
//! deprecated locations in turn. Whatever is found is written back to the
//! current location so later stages only ever read one place.

use fabric_tree::{Node, Path};
use tracing::warn;

use crate::error::{NormalizeError, Notice};
use crate::fabric_type::{FabricType, UnknownFabricType};
use crate::pipeline::{Stage, StageContext};
use crate::stages::path_failure;

pub const STAGE: &str = "fabric_type";

/// Current location first, then deprecated fallbacks in priority order.
const NAME_PATHS: [&[&str]; 3] = [
    &["vxlan", "fabric", "name"],
    &["vxlan", "global", "name"],
    &["vxlan", "name"],
];

const TYPE_PATHS: [&[&str]; 3] = [
    &["vxlan", "fabric", "type"],
    &["vxlan", "global", "fabric_type"],
    &["vxlan", "fabric_type"],
];

pub struct FabricTypeStage;

impl Stage for FabricTypeStage {
    fn order(&self) -> u16 {
        10
    }

    fn id(&self) -> &'static str {
        STAGE
    }

    fn apply(&self, ctx: &mut StageContext<'_>) -> Result<(), NormalizeError> {
        let name = resolve(ctx, &NAME_PATHS).ok_or_else(|| missing(&NAME_PATHS, "fabric name"))?;
        let raw_type =
            resolve(ctx, &TYPE_PATHS).ok_or_else(|| missing(&TYPE_PATHS, "fabric type"))?;
        let fabric_type: FabricType = raw_type
            .parse()
            .map_err(|err: UnknownFabricType| NormalizeError::stage(STAGE, err.to_string()))?;

        let to_failure = path_failure(STAGE);
        ctx.tree
            .set_path(&Path::from_keys(NAME_PATHS[0]), Node::from(name.as_str()))
            .map_err(&to_failure)?;
        ctx.tree
            .set_path(
                &Path::from_keys(TYPE_PATHS[0]),
                Node::from(fabric_type.as_str()),
            )
            .map_err(&to_failure)?;

        ctx.fabric_name = Some(name);
        ctx.fabric_type = Some(fabric_type);
        Ok(())
    }
}

/// First non-empty scalar among `candidates`. Records a notice when the
/// value came from a deprecated location.
fn resolve(ctx: &mut StageContext<'_>, candidates: &[&[&str]]) -> Option<String> {
    let current = candidates.first()?.join(".");
    for (level, keys) in candidates.iter().enumerate() {
        let Some(value) = ctx
            .tree
            .get_in(keys)
            .and_then(Node::scalar_text)
            .filter(|value| !value.trim().is_empty())
        else {
            continue;
        };
        if level > 0 {
            let deprecated = keys.join(".");
            warn!(%deprecated, %current, "deprecated key used");
            ctx.notices.push(Notice::DeprecatedPathUsed {
                stage: STAGE,
                deprecated,
                current: current.clone(),
            });
        }
        return Some(value.trim().to_string());
    }
    None
}

fn missing(candidates: &[&[&str]], what: &str) -> NormalizeError {
    let tried: Vec<String> = candidates.iter().map(|keys| keys.join(".")).collect();
    NormalizeError::MissingRequiredData {
        stage: STAGE,
        path: tried.first().cloned().unwrap_or_default(),
        detail: format!("no {what} found (looked at {})", tried.join(", ")),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::FabricTypeStage;
    use crate::error::{NormalizeError, Notice};
    use crate::fabric_type::FabricType;
    use crate::pipeline::{Stage, StageContext};
    use crate::stages::testing::context;

    fn run(doc: &str) -> (Result<(), NormalizeError>, StageContext<'static>) {
        let mut ctx = context(doc);
        let result = FabricTypeStage.apply(&mut ctx);
        (result, ctx)
    }

    #[test]
    fn current_fields_resolve_without_notices() {
        let (result, ctx) = run("vxlan:\n  fabric:\n    name: dc1\n    type: vxlan_evpn\n");
        result.expect("resolve");
        assert_eq!(ctx.fabric_type, Some(FabricType::VxlanEvpn));
        assert_eq!(ctx.fabric_name.as_deref(), Some("dc1"));
        assert!(ctx.notices.is_empty());
        assert_eq!(
            ctx.tree.text_in(&["vxlan", "fabric", "type"]),
            Some("VXLAN_EVPN".to_string())
        );
    }

    #[test]
    fn deprecated_fields_resolve_identically_with_one_notice_each() {
        let (result, ctx) = run("vxlan:\n  global:\n    name: dc1\n  fabric_type: VXLAN_EVPN\n");
        result.expect("resolve");
        assert_eq!(ctx.fabric_type, Some(FabricType::VxlanEvpn));
        assert_eq!(ctx.fabric_name.as_deref(), Some("dc1"));
        assert_eq!(
            ctx.notices,
            vec![
                Notice::DeprecatedPathUsed {
                    stage: "fabric_type",
                    deprecated: "vxlan.global.name".to_string(),
                    current: "vxlan.fabric.name".to_string(),
                },
                Notice::DeprecatedPathUsed {
                    stage: "fabric_type",
                    deprecated: "vxlan.fabric_type".to_string(),
                    current: "vxlan.fabric.type".to_string(),
                },
            ]
        );
        assert_eq!(
            ctx.tree.text_in(&["vxlan", "fabric", "name"]),
            Some("dc1".to_string())
        );
    }

    #[test]
    fn empty_current_field_falls_back() {
        let (result, ctx) =
            run("vxlan:\n  fabric:\n    name: ''\n    type: ISN\n  name: legacy\n");
        result.expect("resolve");
        assert_eq!(ctx.fabric_name.as_deref(), Some("legacy"));
        assert_eq!(ctx.notices.len(), 1);
    }

    #[test]
    fn missing_type_is_fatal() {
        let (result, _) = run("vxlan:\n  fabric:\n    name: dc1\n");
        assert!(matches!(
            result,
            Err(NormalizeError::MissingRequiredData { path, .. }) if path == "vxlan.fabric.type"
        ));
    }

    #[test]
    fn unknown_type_is_a_stage_failure() {
        let (result, _) = run("vxlan:\n  fabric:\n    name: dc1\n    type: campus\n");
        assert!(matches!(result, Err(NormalizeError::StageFailure { .. })));
    }
}
