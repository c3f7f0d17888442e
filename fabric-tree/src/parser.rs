use std::collections::BTreeMap;
use std::fs;
use std::path::Path as FsPath;

use thiserror::Error;

use crate::format::DocumentFormat;
use crate::node::Node;

/// Errors that can occur while parsing a document into a [`Node`] tree.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Input could not be tokenized as YAML.
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// Input could not be tokenized as JSON.
    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Failed to read input file.
    #[error("failed to read document file: {0}")]
    Io(#[from] std::io::Error),
    /// Structural issue the tree model cannot represent.
    #[error("malformed document: {0}")]
    Malformed(String),
}

/// Parse YAML text into a [`Node`] tree.
///
/// An empty document parses as `null`.
pub fn parse(input: &str) -> Result<Node, ParseError> {
    let value: serde_yaml::Value = serde_yaml::from_str(input)?;
    from_yaml(value)
}

/// Parse JSON text into a [`Node`] tree.
pub fn parse_json(input: &str) -> Result<Node, ParseError> {
    let value: serde_json::Value = serde_json::from_str(input)?;
    Ok(from_json(value))
}

/// Parse a file, choosing the syntax from its extension.
pub fn parse_file(path: &FsPath) -> Result<Node, ParseError> {
    let raw = fs::read_to_string(path)?;
    match DocumentFormat::from_path(path) {
        DocumentFormat::Json => parse_json(&raw),
        DocumentFormat::Yaml => parse(&raw),
    }
}

fn from_yaml(value: serde_yaml::Value) -> Result<Node, ParseError> {
    use serde_yaml::Value;

    Ok(match value {
        Value::Null => Node::Null,
        Value::Bool(b) => Node::Bool(b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Node::Integer(i)
            } else if let Some(f) = n.as_f64() {
                Node::Float(f)
            } else {
                return Err(ParseError::Malformed(format!("unsupported number {n}")));
            }
        }
        Value::String(s) => Node::String(s),
        Value::Sequence(items) => Node::List(
            items
                .into_iter()
                .map(from_yaml)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        Value::Mapping(mapping) => {
            let mut entries = BTreeMap::new();
            for (key, value) in mapping {
                entries.insert(yaml_key(key)?, from_yaml(value)?);
            }
            Node::Map(entries)
        }
        Value::Tagged(tagged) => {
            let tagged = *tagged;
            from_yaml(tagged.value)?
        }
    })
}

fn yaml_key(key: serde_yaml::Value) -> Result<String, ParseError> {
    use serde_yaml::Value;

    match key {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok("null".to_string()),
        other => Err(ParseError::Malformed(format!(
            "mapping keys must be scalars, found {other:?}"
        ))),
    }
}

fn from_json(value: serde_json::Value) -> Node {
    use serde_json::Value;

    match value {
        Value::Null => Node::Null,
        Value::Bool(b) => Node::Bool(b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Node::Integer(i),
            None => Node::Float(n.as_f64().unwrap_or_default()),
        },
        Value::String(s) => Node::String(s),
        Value::Array(items) => Node::List(items.into_iter().map(from_json).collect()),
        Value::Object(entries) => Node::Map(
            entries
                .into_iter()
                .map(|(key, value)| (key, from_json(value)))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::{parse, parse_json};
    use crate::Node;

    #[test]
    fn yaml_and_json_produce_the_same_tree() {
        let yaml = parse("vxlan:\n  fabric:\n    name: dc1\n    asn: 65001\n").expect("yaml");
        let json = parse_json(r#"{"vxlan":{"fabric":{"name":"dc1","asn":65001}}}"#).expect("json");
        assert_eq!(yaml, json);
    }

    #[test]
    fn numeric_mapping_keys_become_strings() {
        let tree = parse("ports:\n  80: www\n").expect("parse");
        assert_eq!(tree.text_in(&["ports", "80"]), Some("www".to_string()));
    }

    #[test]
    fn empty_document_is_null() {
        assert_eq!(parse("").expect("parse"), Node::Null);
    }
}
