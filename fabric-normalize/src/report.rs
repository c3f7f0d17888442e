use colored::Colorize;
use fabric_tree::{format_summary, format_text, DiffEntry};
use serde::Serialize;

use crate::error::{ErrorCategory, NormalizeError, Notice};
use crate::fabric_type::FabricType;
use crate::rules::{Rule, RuleReport, Severity};

/// Render a diff between the raw and canonical trees.
pub fn render_changes(entries: &[DiffEntry]) -> String {
    let raw = format_text(entries);
    let mut out = Vec::new();

    for line in raw.lines() {
        let colored = if line.starts_with('+') {
            line.green().to_string()
        } else if line.starts_with('-') {
            line.red().to_string()
        } else if line.starts_with('~') {
            line.yellow().to_string()
        } else if line.starts_with('!') {
            line.magenta().to_string()
        } else {
            line.to_string()
        };
        out.push(colored);
    }
    out.push(format_summary(entries).cyan().to_string());
    out.join("\n")
}

/// One line per notice.
pub fn render_notices(notices: &[Notice]) -> String {
    notices
        .iter()
        .map(|notice| format!("{} {notice}", "DEPRECATED".yellow()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Violations grouped by rule, followed by a result line.
pub fn render_rule_report(report: &RuleReport, strict: bool) -> String {
    let mut out = vec![format!(
        "fabric={} type={} rules={}",
        report.fabric,
        report.fabric_type,
        report.rules_run.len()
    )];
    for violation in &report.violations {
        let tag = match violation.severity {
            Severity::Error => "ERROR".red().to_string(),
            Severity::Warning => "WARNING".yellow().to_string(),
        };
        out.push(format!("{tag} [{}] {}", violation.rule_id, violation.message));
    }

    let verdict = if report.passes(strict) {
        "pass".green()
    } else {
        "fail".red()
    };
    out.push(format!(
        "result errors={} warnings={} status={verdict}",
        report.count(Severity::Error),
        report.count(Severity::Warning)
    ));
    out.join("\n")
}

/// A failed normalization run.
pub fn render_failure(err: &NormalizeError) -> String {
    format!("{} {err}", "FAILED".red())
}

/// Registered rules, one per line.
pub fn render_rule_list(rules: &[&'static Rule]) -> String {
    let mut out = Vec::new();
    for rule in rules {
        let types: Vec<&str> = rule.fabric_types.iter().map(|t| t.as_str()).collect();
        out.push(format!(
            "{} severity={} types={}",
            rule.id.bold(),
            rule.severity,
            types.join(",")
        ));
        out.push(format!("  {}", rule.description));
    }
    out.join("\n")
}

/// Machine-readable result of `validate`.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ValidateReport<'a> {
    Checked {
        passed: bool,
        notices: &'a [Notice],
        #[serde(flatten)]
        report: &'a RuleReport,
    },
    Failed {
        category: ErrorCategory,
        message: String,
    },
}

impl<'a> ValidateReport<'a> {
    pub fn checked(report: &'a RuleReport, notices: &'a [Notice], strict: bool) -> Self {
        ValidateReport::Checked {
            passed: report.passes(strict),
            notices,
            report,
        }
    }

    pub fn failed(err: &NormalizeError) -> Self {
        ValidateReport::Failed {
            category: err.category(),
            message: err.to_string(),
        }
    }
}

/// Machine-readable rule listing.
#[derive(Debug, Serialize)]
pub struct RuleListing {
    pub id: &'static str,
    pub description: &'static str,
    pub severity: Severity,
    pub fabric_types: &'static [FabricType],
}

impl From<&Rule> for RuleListing {
    fn from(rule: &Rule) -> Self {
        Self {
            id: rule.id,
            description: rule.description,
            severity: rule.severity,
            fabric_types: rule.fabric_types,
        }
    }
}
