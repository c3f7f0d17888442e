//! Failure and notice types produced by a normalization run.

use std::fmt::{self, Display, Formatter};

use serde::Serialize;
use thiserror::Error;

use crate::template::RenderError;

/// Fatal errors. The first one raised ends the run.
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// A foundational field is absent and has no fallback.
    #[error("[{stage}] missing required data at '{path}': {detail}")]
    MissingRequiredData {
        stage: &'static str,
        path: String,
        detail: String,
    },
    /// A stage could not complete its transformation.
    #[error("[{stage}] stage failed: {message}")]
    StageFailure {
        stage: &'static str,
        message: String,
    },
    /// A policy template could not be loaded or rendered.
    #[error("[{stage}] failed to render policy '{policy}': {source}")]
    Template {
        stage: &'static str,
        policy: String,
        #[source]
        source: RenderError,
    },
    /// A required path is still missing after every stage ran.
    #[error(
        "[completeness] required data '{name}' is missing at '{path}'; either the source \
         document lacks it or an earlier stage failed to create it"
    )]
    CompletenessFailure { name: &'static str, path: String },
    /// The stage list handed to the pipeline cannot be ordered.
    #[error("invalid pipeline: {0}")]
    InvalidPipeline(String),
}

/// Coarse error taxonomy used in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    MissingRequiredData,
    StageFailure,
    CompletenessFailure,
}

impl NormalizeError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            NormalizeError::MissingRequiredData { .. } => ErrorCategory::MissingRequiredData,
            NormalizeError::StageFailure { .. }
            | NormalizeError::Template { .. }
            | NormalizeError::InvalidPipeline(_) => ErrorCategory::StageFailure,
            NormalizeError::CompletenessFailure { .. } => ErrorCategory::CompletenessFailure,
        }
    }

    pub(crate) fn stage(stage: &'static str, message: impl Into<String>) -> Self {
        NormalizeError::StageFailure {
            stage,
            message: message.into(),
        }
    }
}

/// Non-fatal observations collected during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    /// Data was read from a deprecated location.
    DeprecatedPathUsed {
        stage: &'static str,
        deprecated: String,
        current: String,
    },
    /// A deprecated sub-tree was dropped because the current one is also set.
    DeprecatedPathIgnored {
        stage: &'static str,
        deprecated: String,
        current: String,
    },
}

impl Display for Notice {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Notice::DeprecatedPathUsed {
                deprecated,
                current,
                ..
            } => write!(
                f,
                "'{deprecated}' is deprecated; move this data to '{current}'"
            ),
            Notice::DeprecatedPathIgnored {
                deprecated,
                current,
                ..
            } => write!(
                f,
                "'{deprecated}' is deprecated and was ignored because '{current}' is also defined"
            ),
        }
    }
}
