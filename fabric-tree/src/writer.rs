use std::fs;
use std::path::Path as FsPath;

use thiserror::Error;

use crate::format::DocumentFormat;
use crate::node::Node;

/// Errors that can occur while serializing a [`Node`] tree.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to write YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("failed to write JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Failed to write output file.
    #[error("failed to write document file: {0}")]
    Io(#[from] std::io::Error),
}

/// Serialize a tree in the requested syntax.
pub fn write(node: &Node, format: DocumentFormat) -> Result<String, WriteError> {
    match format {
        DocumentFormat::Yaml => Ok(serde_yaml::to_string(node)?),
        DocumentFormat::Json => {
            let mut text = serde_json::to_string_pretty(node)?;
            text.push('\n');
            Ok(text)
        }
    }
}

/// Serialize a tree and write it to `path`, choosing the syntax from the
/// file extension.
pub fn write_file(node: &Node, path: &FsPath) -> Result<(), WriteError> {
    let text = write(node, DocumentFormat::from_path(path))?;
    fs::write(path, text)?;
    Ok(())
}
