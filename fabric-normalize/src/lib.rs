//! Normalization and validation of data-center fabric configuration documents.
//!
//! A fabric document is one nested map rooted at `vxlan`. Operators write it in
//! whichever shape they learned first: deprecated key names, absent lists,
//! short interface names, numeric ports. This library turns such a document
//! into one canonical model that downstream consumers can read without
//! defensive checks, and then evaluates semantic rules over that model.
//!
//! # Architecture
//!
//! ## Normalization
//!
//! - [`fabric_type`]: The five configuration types
//! - [`schema`]: Per-type table of paths that must exist after normalization
//! - [`pipeline`]: Ordered stage execution over a private copy of the input
//! - [`stages`]: The standard stage list, from type resolution to completeness
//! - [`synth`]: Per-switch policy synthesis from high-level intents
//! - [`template`]: Policy template rendering (embedded or on-disk)
//!
//! ## Validation
//!
//! - [`rules`]: Rule registry and engine; rules never stop at the first hit
//!
//! ## Reporting and configuration
//!
//! - [`report`]: Terminal and JSON output
//! - [`config`]: Optional TOML run configuration
//! - [`error`]: Fatal errors and non-fatal notices
//!
//! # Workflow
//!
//! 1. **Parse** the document with `fabric_tree::parse_file`
//! 2. **Normalize** it with [`Pipeline::standard`]
//! 3. **Validate** the resulting [`CanonicalModel`] with [`RuleEngine`]
//!
//! # Examples
//!
//! ```ignore
//! use fabric_normalize::{EmbeddedTemplates, Pipeline, RuleEngine};
//! use fabric_tree::parse_file;
//!
//! let raw = parse_file("fabric.yaml".as_ref())?;
//! let outcome = Pipeline::standard().run(&raw, &EmbeddedTemplates::default())?;
//! let report = RuleEngine::registered().evaluate(&outcome.model);
//! println!("errors={}", report.violations.len());
//! ```
//!
//! # Built on fabric-tree
//!
//! Parsing, path classification, tree mutation and diffing live in
//! `fabric-tree`. Everything fabric-specific is in this crate.

pub mod config;
pub mod error;
pub mod fabric_type;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod rules;
pub mod schema;
pub mod stages;
pub mod synth;
pub mod template;

pub use error::{ErrorCategory, NormalizeError, Notice};
pub use fabric_type::FabricType;
pub use model::{CanonicalModel, NormalizeOutcome, SwitchIndex};
pub use pipeline::{Pipeline, PipelineState, Stage, StageContext};
pub use rules::{RuleEngine, RuleReport, Severity, Violation};
pub use template::{DirectoryTemplates, EmbeddedTemplates, RenderError, TemplateRenderer};
