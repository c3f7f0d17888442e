//! Semantic rules evaluated over a canonical model.
//!
//! A rule is a plain function from the model to a list of messages. Rules are
//! registered with [`inventory::submit!`] next to their implementation and
//! collected here; the engine sorts them by id so output is deterministic.
//! Rules never see each other's results, and evaluation never stops at the
//! first violation.

mod access_attach_groups;
mod global_exclusive;
mod overlay_refs;
mod switch_uniqueness;
mod vrf_lite;

use std::fmt::{self, Display, Formatter};

use serde::Serialize;
use tracing::debug;

use crate::fabric_type::FabricType;
use crate::model::CanonicalModel;

/// Static severity of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

/// Signature every rule implements.
pub type RuleCheck = fn(&CanonicalModel) -> Vec<String>;

/// One registered rule.
#[derive(Debug)]
pub struct Rule {
    pub id: &'static str,
    pub description: &'static str,
    pub severity: Severity,
    /// Configuration types this rule applies to.
    pub fabric_types: &'static [FabricType],
    pub check: RuleCheck,
}

impl Rule {
    pub fn applies_to(&self, fabric_type: FabricType) -> bool {
        self.fabric_types.contains(&fabric_type)
    }

    /// Run the rule and tag each message with its id and severity.
    pub fn matches(&self, model: &CanonicalModel) -> Vec<Violation> {
        (self.check)(model)
            .into_iter()
            .map(|message| Violation {
                rule_id: self.id,
                severity: self.severity,
                message,
            })
            .collect()
    }
}

inventory::collect!(Rule);

/// A single problem reported by a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub rule_id: &'static str,
    pub severity: Severity,
    pub message: String,
}

/// Every violation raised for one model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleReport {
    pub fabric: String,
    pub fabric_type: FabricType,
    pub rules_run: Vec<&'static str>,
    pub violations: Vec<Violation>,
}

impl RuleReport {
    pub fn count(&self, severity: Severity) -> usize {
        self.violations
            .iter()
            .filter(|v| v.severity == severity)
            .count()
    }

    /// Whether the model passes. Strict mode also fails on warnings.
    pub fn passes(&self, strict: bool) -> bool {
        let failing = if strict {
            self.violations.len()
        } else {
            self.count(Severity::Error)
        };
        failing == 0
    }
}

/// An ordered set of rules ready to evaluate.
#[derive(Debug, Clone)]
pub struct RuleEngine {
    rules: Vec<&'static Rule>,
}

impl RuleEngine {
    /// Every rule linked into the binary, sorted by id.
    pub fn registered() -> Self {
        Self::new(inventory::iter::<Rule>.into_iter().collect())
    }

    pub fn new(mut rules: Vec<&'static Rule>) -> Self {
        rules.sort_by_key(|rule| rule.id);
        rules.dedup_by_key(|rule| rule.id);
        Self { rules }
    }

    /// Keep only rules that apply to `fabric_type`.
    pub fn for_fabric(mut self, fabric_type: FabricType) -> Self {
        self.rules.retain(|rule| rule.applies_to(fabric_type));
        self
    }

    /// Drop rules by id. Unknown ids are returned so callers can report them.
    pub fn without<S: AsRef<str>>(mut self, disabled: &[S]) -> (Self, Vec<String>) {
        let unknown: Vec<String> = disabled
            .iter()
            .map(|id| id.as_ref())
            .filter(|id| !self.rules.iter().any(|rule| rule.id == *id))
            .map(str::to_string)
            .collect();
        self.rules
            .retain(|rule| !disabled.iter().any(|id| id.as_ref() == rule.id));
        (self, unknown)
    }

    pub fn rules(&self) -> &[&'static Rule] {
        &self.rules
    }

    /// Run every applicable rule and concatenate the results.
    pub fn evaluate(&self, model: &CanonicalModel) -> RuleReport {
        let mut rules_run = Vec::new();
        let mut violations = Vec::new();
        for rule in self
            .rules
            .iter()
            .filter(|rule| rule.applies_to(model.fabric_type))
        {
            let found = rule.matches(model);
            debug!(rule = rule.id, violations = found.len(), "rule evaluated");
            rules_run.push(rule.id);
            violations.extend(found);
        }
        RuleReport {
            fabric: model.fabric_name.clone(),
            fabric_type: model.fabric_type,
            rules_run,
            violations,
        }
    }
}

/// Text of `keys` under `node`, ignoring empty strings.
pub(crate) fn text(node: &fabric_tree::Node, keys: &[&str]) -> Option<String> {
    node.text_in(keys).filter(|value| !value.trim().is_empty())
}

/// Whether `keys` under `node` holds data.
pub(crate) fn has_data(node: &fabric_tree::Node, keys: &[&str]) -> bool {
    node.get_in(keys).is_some_and(fabric_tree::Node::is_truthy)
}
