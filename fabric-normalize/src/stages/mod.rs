//! The standard normalization stages.
//!
//! | order | id |
//! |---|---|
//! | 10 | `fabric_type` |
//! | 20 | `terminology` |
//! | 30 | `list_defaults` |
//! | 40 | `topology_switches` |
//! | 50 | `attach_groups` |
//! | 60 | `vrf_lite_defaults` |
//! | 70 | `switch_index` |
//! | 80 | `vrf_lite_policy` |
//! | 90 | `route_control_policy` |
//! | 999 | `completeness` |

pub mod attach_groups;
pub mod completeness;
pub mod fabric_type;
pub mod list_defaults;
pub mod route_control_policy;
pub mod switch_index;
pub mod terminology;
pub mod topology_switches;
pub mod vrf_lite_defaults;
pub mod vrf_lite_policy;

use std::collections::BTreeMap;

use fabric_tree::{classify, Node, Path, PathError};
use tracing::info;

use crate::error::NormalizeError;
use crate::pipeline::{Stage, StageContext};
use crate::synth::{install_policy, GeneratedPolicy};

/// Every standard stage, already in execution order.
pub fn standard_stages() -> Vec<Box<dyn Stage>> {
    vec![
        Box::new(fabric_type::FabricTypeStage),
        Box::new(terminology::TerminologyStage),
        Box::new(list_defaults::ListDefaultsStage),
        Box::new(topology_switches::TopologySwitchesStage),
        Box::new(attach_groups::AttachGroupsStage),
        Box::new(vrf_lite_defaults::VrfLiteDefaultsStage),
        Box::new(switch_index::SwitchIndexStage),
        Box::new(vrf_lite_policy::VrfLitePolicyStage),
        Box::new(route_control_policy::RouteControlPolicyStage),
        Box::new(completeness::CompletenessStage),
    ]
}

/// Number of items in the list at `path`; anything else counts as zero.
pub(crate) fn list_len(tree: &Node, path: &Path) -> usize {
    tree.get_path(path)
        .and_then(Node::as_list)
        .map_or(0, <[Node]>::len)
}

/// For every item of the list at `outer`, make sure each of `fields` holds a
/// list. Items are visited and written back by position.
pub(crate) fn ensure_item_lists(
    tree: &mut Node,
    outer: &Path,
    fields: &[&str],
) -> Result<(), PathError> {
    for idx in 0..list_len(tree, outer) {
        let item = outer.index(idx);
        for field in fields {
            let path = item.key(*field);
            if classify(Some(tree), &path).needs_default() {
                tree.set_path(&path, Node::list())?;
            }
        }
    }
    Ok(())
}

/// Wrap a tree mutation error as a failure of `stage`.
pub(crate) fn path_failure(stage: &'static str) -> impl Fn(PathError) -> NormalizeError {
    move |err| NormalizeError::stage(stage, err.to_string())
}

/// One (intent, switch) pair waiting to be rendered.
pub(crate) struct PolicyRequest {
    pub name: String,
    pub intent: String,
    pub switch: String,
    pub description: String,
    pub bindings: Node,
}

/// Render every request with `template` and merge the results into the model.
/// Two different pairs mapping to one policy name, or the first render
/// failure, abort the stage before anything is installed for the clash.
pub(crate) fn render_and_install(
    ctx: &mut StageContext<'_>,
    stage: &'static str,
    template: &str,
    requests: Vec<PolicyRequest>,
) -> Result<(), NormalizeError> {
    reject_name_clashes(stage, &requests)?;
    let templates = ctx.templates;
    for request in requests {
        let conf = templates
            .render(template, &request.bindings)
            .map_err(|source| NormalizeError::Template {
                stage,
                policy: request.name.clone(),
                source,
            })?;
        let policy = GeneratedPolicy {
            name: request.name,
            switch: request.switch,
            description: request.description,
            conf,
        };
        install_policy(&mut ctx.tree, &policy).map_err(path_failure(stage))?;
        info!(stage, policy = %policy.name, switch = %policy.switch, "policy synthesized");
    }
    Ok(())
}

fn reject_name_clashes(stage: &'static str, requests: &[PolicyRequest]) -> Result<(), NormalizeError> {
    let mut owners: BTreeMap<&str, (&str, &str)> = BTreeMap::new();
    for request in requests {
        let pair = (request.intent.as_str(), request.switch.as_str());
        match owners.insert(request.name.as_str(), pair) {
            Some(previous) if previous != pair => {
                return Err(NormalizeError::stage(
                    stage,
                    format!(
                        "policy name '{}' is produced by both '{}' on switch '{}' and '{}' on switch '{}'",
                        request.name, previous.0, previous.1, pair.0, pair.1
                    ),
                ));
            }
            _ => {}
        }
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::OnceLock;

    use fabric_tree::parse;

    use crate::pipeline::StageContext;
    use crate::template::EmbeddedTemplates;

    /// A fresh context over `doc` using the built-in templates.
    pub(crate) fn context(doc: &str) -> StageContext<'static> {
        static TEMPLATES: OnceLock<EmbeddedTemplates> = OnceLock::new();
        let templates = TEMPLATES.get_or_init(EmbeddedTemplates::default);
        StageContext::new(parse(doc).expect("parse"), templates)
    }
}
