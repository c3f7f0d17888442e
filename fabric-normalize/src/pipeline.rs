//! Normalization pipeline.
//!
//! A run deep-copies the raw document once, then hands the copy through every
//! stage in ascending `order`. The first stage that fails ends the run and its
//! partially transformed tree is dropped. Only a run whose final completeness
//! stage succeeds yields a [`CanonicalModel`].
//!
//! ## Run states
//!
//! `NotStarted → Running → Failed | Complete`

use std::collections::BTreeSet;

use fabric_tree::Node;
use serde::Serialize;
use tracing::debug;

use crate::error::{NormalizeError, Notice};
use crate::fabric_type::FabricType;
use crate::model::{CanonicalModel, NormalizeOutcome, SwitchIndex};
use crate::stages::{self, completeness::COMPLETENESS_STAGE};
use crate::template::TemplateRenderer;

/// Mutable state shared by the stages of one run.
pub struct StageContext<'r> {
    /// The model being normalized.
    pub tree: Node,
    /// Set by the type-resolution stage.
    pub fabric_type: Option<FabricType>,
    pub fabric_name: Option<String>,
    /// Set by the switch-index stage.
    pub switch_index: Option<SwitchIndex>,
    pub notices: Vec<Notice>,
    pub templates: &'r dyn TemplateRenderer,
}

impl<'r> StageContext<'r> {
    pub fn new(tree: Node, templates: &'r dyn TemplateRenderer) -> Self {
        Self {
            tree,
            fabric_type: None,
            fabric_name: None,
            switch_index: None,
            notices: Vec::new(),
            templates,
        }
    }

    /// The resolved configuration type, or a `MissingRequiredData` error
    /// naming `stage` when type resolution has not run.
    pub fn require_fabric_type(&self, stage: &'static str) -> Result<FabricType, NormalizeError> {
        self.fabric_type
            .ok_or_else(|| NormalizeError::MissingRequiredData {
                stage,
                path: "vxlan.fabric.type".to_string(),
                detail: "configuration type has not been resolved".to_string(),
            })
    }
}

/// One ordered transformation of the model.
///
/// A stage may rely only on stages with a lower `order` having run, and must
/// re-check derived data rather than assume it exists.
pub trait Stage: Send + Sync {
    /// Position in the run. Unique within a pipeline.
    fn order(&self) -> u16;
    /// Stable identifier used in logs and errors. Unique within a pipeline.
    fn id(&self) -> &'static str;
    fn apply(&self, ctx: &mut StageContext<'_>) -> Result<(), NormalizeError>;
}

/// Progress of a [`PipelineRun`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PipelineState {
    NotStarted,
    Running { stage: &'static str },
    Failed { stage: &'static str },
    Complete,
}

/// An ordered, validated list of stages.
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    /// The standard stage list.
    pub fn standard() -> Self {
        Self {
            stages: stages::standard_stages(),
        }
    }

    /// Build a pipeline from an arbitrary stage list.
    ///
    /// Stages are sorted by `order`. Duplicate orders or ids are rejected, and
    /// the completeness stage must come last.
    pub fn new(mut stages: Vec<Box<dyn Stage>>) -> Result<Self, NormalizeError> {
        stages.sort_by_key(|stage| stage.order());

        let mut orders = BTreeSet::new();
        let mut ids = BTreeSet::new();
        for stage in &stages {
            if !orders.insert(stage.order()) {
                return Err(NormalizeError::InvalidPipeline(format!(
                    "stage order {} is used more than once",
                    stage.order()
                )));
            }
            if !ids.insert(stage.id()) {
                return Err(NormalizeError::InvalidPipeline(format!(
                    "stage id '{}' is used more than once",
                    stage.id()
                )));
            }
        }
        if stages.last().map(|stage| stage.id()) != Some(COMPLETENESS_STAGE) {
            return Err(NormalizeError::InvalidPipeline(format!(
                "the '{COMPLETENESS_STAGE}' stage must run last"
            )));
        }

        Ok(Self { stages })
    }

    /// Stage ids in execution order.
    pub fn stage_ids(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.id()).collect()
    }

    /// Begin a run over a private copy of `raw`.
    pub fn start<'p, 'r>(
        &'p self,
        raw: &Node,
        templates: &'r dyn TemplateRenderer,
    ) -> PipelineRun<'p, 'r> {
        PipelineRun {
            pipeline: self,
            ctx: Some(StageContext::new(raw.clone(), templates)),
            state: PipelineState::NotStarted,
            next: 0,
        }
    }

    /// Run every stage and return the canonical model or the first failure.
    pub fn run(
        &self,
        raw: &Node,
        templates: &dyn TemplateRenderer,
    ) -> Result<NormalizeOutcome, NormalizeError> {
        self.start(raw, templates).finish()
    }
}

/// A single in-progress run. Dropping it discards the model.
pub struct PipelineRun<'p, 'r> {
    pipeline: &'p Pipeline,
    ctx: Option<StageContext<'r>>,
    state: PipelineState,
    next: usize,
}

impl PipelineRun<'_, '_> {
    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    /// Execute the next stage. Returns `Ok(true)` while stages remain.
    pub fn step(&mut self) -> Result<bool, NormalizeError> {
        if let PipelineState::Failed { stage } = self.state {
            return Err(NormalizeError::stage(stage, "run already failed"));
        }
        let Some(stage) = self.pipeline.stages.get(self.next) else {
            return Ok(false);
        };
        let Some(ctx) = self.ctx.as_mut() else {
            return Err(NormalizeError::stage(stage.id(), "run has no model"));
        };

        self.state = PipelineState::Running { stage: stage.id() };
        debug!(stage = stage.id(), order = stage.order(), "stage start");
        if let Err(err) = stage.apply(ctx) {
            debug!(stage = stage.id(), error = %err, "stage failed");
            self.state = PipelineState::Failed { stage: stage.id() };
            self.ctx = None;
            return Err(err);
        }
        debug!(stage = stage.id(), "stage done");

        self.next += 1;
        if self.next == self.pipeline.stages.len() {
            self.state = PipelineState::Complete;
            return Ok(false);
        }
        Ok(true)
    }

    /// Run the remaining stages and return the outcome.
    pub fn finish(mut self) -> Result<NormalizeOutcome, NormalizeError> {
        while self.step()? {}
        if self.state != PipelineState::Complete {
            return Err(NormalizeError::InvalidPipeline(
                "pipeline has no stages".to_string(),
            ));
        }
        let ctx = self
            .ctx
            .take()
            .ok_or_else(|| NormalizeError::InvalidPipeline("run has no model".to_string()))?;
        let fabric_type = ctx.require_fabric_type(COMPLETENESS_STAGE)?;
        let fabric_name = ctx
            .fabric_name
            .ok_or_else(|| NormalizeError::MissingRequiredData {
                stage: COMPLETENESS_STAGE,
                path: "vxlan.fabric.name".to_string(),
                detail: "fabric name has not been resolved".to_string(),
            })?;
        let model = CanonicalModel::new(
            fabric_type,
            fabric_name,
            ctx.switch_index.unwrap_or_default(),
            ctx.tree,
        );
        Ok(NormalizeOutcome {
            model,
            notices: ctx.notices,
        })
    }
}

#[cfg(test)]
mod tests {
    use fabric_tree::parse;

    use super::{Pipeline, PipelineState, Stage, StageContext};
    use crate::error::NormalizeError;
    use crate::stages::{completeness::CompletenessStage, fabric_type::FabricTypeStage};
    use crate::template::EmbeddedTemplates;

    struct Failing;

    impl Stage for Failing {
        fn order(&self) -> u16 {
            50
        }
        fn id(&self) -> &'static str {
            "failing"
        }
        fn apply(&self, _ctx: &mut StageContext<'_>) -> Result<(), NormalizeError> {
            Err(NormalizeError::stage("failing", "boom"))
        }
    }

    #[test]
    fn duplicate_orders_are_rejected() {
        let result = Pipeline::new(vec![
            Box::new(FabricTypeStage),
            Box::new(FabricTypeStage),
            Box::new(CompletenessStage),
        ]);
        assert!(matches!(result, Err(NormalizeError::InvalidPipeline(_))));
    }

    #[test]
    fn completeness_must_run_last() {
        let result = Pipeline::new(vec![Box::new(FabricTypeStage)]);
        assert!(matches!(result, Err(NormalizeError::InvalidPipeline(_))));
    }

    #[test]
    fn first_failure_stops_the_run() {
        let pipeline = Pipeline::new(vec![
            Box::new(CompletenessStage),
            Box::new(Failing),
            Box::new(FabricTypeStage),
        ])
        .expect("pipeline");
        assert_eq!(pipeline.stage_ids(), vec!["fabric_type", "failing", "completeness"]);

        let raw = parse("vxlan:\n  fabric:\n    name: dc1\n    type: MSD\n").expect("parse");
        let templates = EmbeddedTemplates::default();
        let mut run = pipeline.start(&raw, &templates);
        assert_eq!(run.state(), &PipelineState::NotStarted);

        assert!(run.step().expect("type stage"));
        assert!(run.step().is_err());
        assert_eq!(run.state(), &PipelineState::Failed { stage: "failing" });
        assert!(run.step().is_err(), "a failed run never resumes");
    }

    #[test]
    fn standard_pipeline_ends_with_completeness() {
        let pipeline = Pipeline::standard();
        assert_eq!(pipeline.stage_ids().last(), Some(&"completeness"));
        assert!(Pipeline::new(crate::stages::standard_stages()).is_ok());
    }
}
