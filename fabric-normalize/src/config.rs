//! Optional TOML run configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::template::{DirectoryTemplates, EmbeddedTemplates, TemplateRenderer};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Read policy templates from this directory instead of the built-in set.
    #[serde(default)]
    pub template_dir: Option<PathBuf>,
    /// Treat warning-severity violations as failures.
    #[serde(default)]
    pub strict: bool,
    #[serde(default)]
    pub rules: RulesConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RulesConfig {
    /// Rule ids that are never evaluated.
    #[serde(default)]
    pub disabled: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read run config {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse run config {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

/// Load a run configuration. A relative `template_dir` is resolved against
/// the directory holding the config file.
pub fn load_config(path: &Path) -> Result<RunConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let mut config = parse_config(&raw, path.display().to_string())?;
    if let Some(dir) = config.template_dir.as_mut() {
        if dir.is_relative() {
            if let Some(base) = path.parent() {
                *dir = base.join(&*dir);
            }
        }
    }
    Ok(config)
}

fn parse_config(raw: &str, path: String) -> Result<RunConfig, ConfigError> {
    toml::from_str(raw).map_err(|source| ConfigError::Parse { path, source })
}

impl RunConfig {
    /// The template renderer this configuration selects.
    pub fn templates(&self) -> Box<dyn TemplateRenderer> {
        match &self.template_dir {
            Some(dir) => Box::new(DirectoryTemplates::new(dir.clone())),
            None => Box::new(EmbeddedTemplates::default()),
        }
    }
}
