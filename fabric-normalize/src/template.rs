//! Policy template rendering.
//!
//! Templates use a small Jinja-flavoured language:
//!
//! - `{{ a.b.c }}`: substitute a scalar found by dotted lookup
//! - `{% for item in a.b %}…{% endfor %}`: repeat for each list item
//! - `{% if a.b %}…{% else %}…{% endif %}`: branch on truthiness (`not` allowed)
//!
//! A `{% … %}` tag written alone on its line is removed together with that
//! line, so block tags do not leave blank lines behind.
//!
//! Substituting an undefined variable is a render error. An undefined loop
//! source iterates as empty and an undefined condition is false.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::OnceLock;

use fabric_tree::Node;
use regex::Regex;
use thiserror::Error;

/// Errors raised while loading or rendering a template.
#[derive(Debug, Error)]
pub enum RenderError {
    /// No template with this name exists.
    #[error("template '{0}' not found")]
    NotFound(String),
    /// The template exists but could not be read.
    #[error("failed to read template '{name}': {source}")]
    Io {
        name: String,
        #[source]
        source: io::Error,
    },
    /// The template is malformed or references data that does not exist.
    #[error("template '{name}': {message}")]
    Render { name: String, message: String },
}

/// Renders a named template with a map of bindings into opaque text.
pub trait TemplateRenderer: Send + Sync {
    fn render(&self, template: &str, bindings: &Node) -> Result<String, RenderError>;
}

/// Templates compiled into the binary.
#[derive(Debug, Clone)]
pub struct EmbeddedTemplates {
    sources: BTreeMap<&'static str, &'static str>,
}

impl Default for EmbeddedTemplates {
    fn default() -> Self {
        let mut sources = BTreeMap::new();
        sources.insert(
            VRF_LITE_TEMPLATE,
            include_str!(concat!(
                env!("CARGO_MANIFEST_DIR"),
                "/templates/vrf_lite.tmpl"
            )),
        );
        sources.insert(
            ROUTE_CONTROL_TEMPLATE,
            include_str!(concat!(
                env!("CARGO_MANIFEST_DIR"),
                "/templates/route_control.tmpl"
            )),
        );
        Self { sources }
    }
}

impl TemplateRenderer for EmbeddedTemplates {
    fn render(&self, template: &str, bindings: &Node) -> Result<String, RenderError> {
        let source = self
            .sources
            .get(template)
            .ok_or_else(|| RenderError::NotFound(template.to_string()))?;
        render_str(template, source, bindings)
    }
}

/// Templates read from a directory on every render. Reads block; there is no
/// timeout.
#[derive(Debug, Clone)]
pub struct DirectoryTemplates {
    root: PathBuf,
}

impl DirectoryTemplates {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl TemplateRenderer for DirectoryTemplates {
    fn render(&self, template: &str, bindings: &Node) -> Result<String, RenderError> {
        let path = self.root.join(template);
        let source = match fs::read_to_string(&path) {
            Ok(source) => source,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(RenderError::NotFound(template.to_string()));
            }
            Err(source) => {
                return Err(RenderError::Io {
                    name: template.to_string(),
                    source,
                });
            }
        };
        render_str(template, &source, bindings)
    }
}

/// Template used for VRF-lite policies.
pub const VRF_LITE_TEMPLATE: &str = "vrf_lite.tmpl";
/// Template used for route-control policies.
pub const ROUTE_CONTROL_TEMPLATE: &str = "route_control.tmpl";

/// Render template `source` (named `name` in errors) against `bindings`.
pub fn render_str(name: &str, source: &str, bindings: &Node) -> Result<String, RenderError> {
    let fail = |message: String| RenderError::Render {
        name: name.to_string(),
        message,
    };
    let tokens = tokenize(source);
    let (body, rest) = parse_block(&tokens, 0).map_err(fail)?;
    if let Some(stray) = rest {
        return Err(fail(format!("unexpected '{{% {stray} %}}'")));
    }

    let mut out = String::new();
    let mut scope = Vec::new();
    emit(&body, bindings, &mut scope, &mut out).map_err(fail)?;
    Ok(out)
}

#[derive(Debug, Clone, PartialEq)]
enum Token<'a> {
    Text(&'a str),
    Var(&'a str),
    Tag(&'a str),
}

#[derive(Debug, Clone, PartialEq)]
enum Block {
    Text(String),
    Var(String),
    For {
        item: String,
        source: String,
        body: Vec<Block>,
    },
    If {
        negate: bool,
        condition: String,
        then: Vec<Block>,
        otherwise: Vec<Block>,
    },
}

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"\{\{\s*(.*?)\s*\}\}|(?m:^)[ \t]*\{%\s*([^%]*?)\s*%\}[ \t]*(?:\n|\z)|\{%\s*([^%]*?)\s*%\}",
        )
        .expect("template tag regex must compile")
    })
}

fn tokenize(source: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut last = 0;
    for caps in tag_re().captures_iter(source) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        if whole.start() > last {
            tokens.push(Token::Text(&source[last..whole.start()]));
        }
        if let Some(var) = caps.get(1) {
            tokens.push(Token::Var(var.as_str()));
        } else if let Some(tag) = caps.get(2).or_else(|| caps.get(3)) {
            tokens.push(Token::Tag(tag.as_str()));
        }
        last = whole.end();
    }
    if last < source.len() {
        tokens.push(Token::Text(&source[last..]));
    }
    tokens
}

type Parsed<'t> = (Vec<Block>, Option<&'t str>);

/// Parse tokens until a closing tag (`endfor`, `endif`, `else`) or the end.
/// Returns the parsed blocks and the closing tag, if any, that stopped it.
fn parse_block<'t>(tokens: &[Token<'t>], start: usize) -> Result<Parsed<'t>, String> {
    let mut pos = start;
    parse_until(tokens, &mut pos)
}

fn parse_until<'t>(tokens: &[Token<'t>], pos: &mut usize) -> Result<Parsed<'t>, String> {
    let mut blocks = Vec::new();
    while let Some(token) = tokens.get(*pos) {
        *pos += 1;
        match token {
            Token::Text(text) => blocks.push(Block::Text((*text).to_string())),
            Token::Var(var) => blocks.push(Block::Var((*var).to_string())),
            Token::Tag(tag) => {
                let words: Vec<&str> = tag.split_whitespace().collect();
                match words.as_slice() {
                    ["for", item, "in", source] => {
                        let (body, closing) = parse_until(tokens, pos)?;
                        if closing != Some("endfor") {
                            return Err(format!("'for {item} in {source}' is not closed"));
                        }
                        blocks.push(Block::For {
                            item: (*item).to_string(),
                            source: (*source).to_string(),
                            body,
                        });
                    }
                    ["if", rest @ ..] => {
                        let (negate, condition) = match rest {
                            ["not", condition] => (true, *condition),
                            [condition] => (false, *condition),
                            _ => return Err(format!("unsupported condition '{tag}'")),
                        };
                        let (then, closing) = parse_until(tokens, pos)?;
                        let otherwise = match closing {
                            Some("endif") => Vec::new(),
                            Some("else") => {
                                let (otherwise, closing) = parse_until(tokens, pos)?;
                                if closing != Some("endif") {
                                    return Err(format!("'{tag}' is not closed"));
                                }
                                otherwise
                            }
                            _ => return Err(format!("'{tag}' is not closed")),
                        };
                        blocks.push(Block::If {
                            negate,
                            condition: condition.to_string(),
                            then,
                            otherwise,
                        });
                    }
                    ["endfor"] | ["endif"] | ["else"] => return Ok((blocks, Some(*tag))),
                    _ => return Err(format!("unsupported tag '{{% {tag} %}}'")),
                }
            }
        }
    }
    Ok((blocks, None))
}

fn emit<'n>(
    blocks: &[Block],
    bindings: &'n Node,
    scope: &mut Vec<(String, &'n Node)>,
    out: &mut String,
) -> Result<(), String> {
    for block in blocks {
        match block {
            Block::Text(text) => out.push_str(text),
            Block::Var(var) => {
                let value = lookup(var, bindings, scope)
                    .ok_or_else(|| format!("undefined variable '{var}'"))?;
                match value.scalar_text() {
                    Some(text) => out.push_str(&text),
                    None if matches!(value, Node::Null) => {
                        return Err(format!("variable '{var}' is null"));
                    }
                    None => out.push_str(&value.to_string()),
                }
            }
            Block::For { item, source, body } => {
                let items = match lookup(source, bindings, scope) {
                    None | Some(Node::Null) => &[][..],
                    Some(Node::List(items)) => items.as_slice(),
                    Some(other) => {
                        return Err(format!("'{source}' is a {}, not a list", other.kind()));
                    }
                };
                for value in items {
                    scope.push((item.clone(), value));
                    let result = emit(body, bindings, scope, out);
                    scope.pop();
                    result?;
                }
            }
            Block::If {
                negate,
                condition,
                then,
                otherwise,
            } => {
                let truthy = lookup(condition, bindings, scope).is_some_and(Node::is_truthy);
                let branch = if truthy != *negate { then } else { otherwise };
                emit(branch, bindings, scope, out)?;
            }
        }
    }
    Ok(())
}

fn lookup<'n>(dotted: &str, bindings: &'n Node, scope: &[(String, &'n Node)]) -> Option<&'n Node> {
    let mut parts = dotted.split('.');
    let head = parts.next()?;
    let mut current = scope
        .iter()
        .rev()
        .find(|(name, _)| name == head)
        .map(|(_, node)| *node)
        .or_else(|| bindings.get(head))?;
    for part in parts {
        current = current.get(part)?;
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use fabric_tree::parse;

    use super::{
        render_str, DirectoryTemplates, EmbeddedTemplates, RenderError, TemplateRenderer,
        ROUTE_CONTROL_TEMPLATE, VRF_LITE_TEMPLATE,
    };

    #[test]
    fn substitutes_loops_and_conditions() {
        let bindings =
            parse("vrf: blue\nintfs:\n  - name: Ethernet1/1\n    ip: 10.0.0.1/30\n  - name: loopback0\n")
                .expect("parse");
        let template = "vrf context {{ vrf }}\n{% for i in intfs %}\ninterface {{ i.name }}\n{% if i.ip %}\n  ip address {{ i.ip }}\n{% else %}\n  no ip address\n{% endif %}\n{% endfor %}\n";
        let out = render_str("t", template, &bindings).expect("render");
        assert_eq!(
            out,
            "vrf context blue\ninterface Ethernet1/1\n  ip address 10.0.0.1/30\ninterface loopback0\n  no ip address\n"
        );
    }

    #[test]
    fn inline_tags_keep_their_line() {
        let bindings = parse("ge: 24\nle: null\n").expect("parse");
        let template = "seq 5 permit 10.0.0.0/8{% if ge %} ge {{ ge }}{% endif %}{% if le %} le {{ le }}{% endif %}\nend\n";
        let out = render_str("t", template, &bindings).expect("render");
        assert_eq!(out, "seq 5 permit 10.0.0.0/8 ge 24\nend\n");
    }

    #[test]
    fn undefined_variable_is_a_render_error() {
        let bindings = parse("vrf: blue\n").expect("parse");
        let err = render_str("t", "router bgp {{ asn }}", &bindings).expect_err("undefined");
        assert!(matches!(err, RenderError::Render { .. }));
        assert!(err.to_string().contains("undefined variable 'asn'"));
    }

    #[test]
    fn unclosed_block_is_a_render_error() {
        let bindings = parse("a: []\n").expect("parse");
        assert!(render_str("t", "{% for x in a %}{{ x }}", &bindings).is_err());
    }

    #[test]
    fn directory_templates_distinguish_missing_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("hello.tmpl"), "hi {{ who }}").expect("write");
        let templates = DirectoryTemplates::new(dir.path());
        let bindings = parse("who: leaf1\n").expect("parse");

        assert_eq!(
            templates.render("hello.tmpl", &bindings).expect("render"),
            "hi leaf1"
        );
        assert!(matches!(
            templates.render("missing.tmpl", &bindings),
            Err(RenderError::NotFound(name)) if name == "missing.tmpl"
        ));
    }

    #[test]
    fn embedded_templates_include_policy_templates() {
        let templates = EmbeddedTemplates::default();
        let empty = parse("{}").expect("parse");
        assert!(matches!(
            templates.render("nope.tmpl", &empty),
            Err(RenderError::NotFound(_))
        ));
        assert!(templates.sources.contains_key(VRF_LITE_TEMPLATE));
        assert!(templates.sources.contains_key(ROUTE_CONTROL_TEMPLATE));
    }
}
