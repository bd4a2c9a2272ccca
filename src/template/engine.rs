//! A small logic-less template engine.
//!
//! Supported syntax:
//!
//! - `{{ name }}` substitutes a value (dotted paths allowed, `this` is the
//!   current item inside `each`)
//! - `{{#each list}}...{{/each}}` repeats its body per array element
//! - `{{#if name}}...{{/if}}` renders its body when the value is truthy
//!
//! A block tag alone on its line removes that whole line from the output.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;

/// Errors raised while parsing or rendering a template.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("unclosed `{{{{#{block}}}}}` opened on line {line}")]
    Unclosed { block: String, line: usize },

    #[error("expected `{{{{/{expected}}}}}` but found `{{{{/{found}}}}}` on line {line}")]
    Mismatched {
        expected: String,
        found: String,
        line: usize,
    },

    #[error("unexpected `{{{{/{found}}}}}` on line {line}")]
    UnexpectedClose { found: String, line: usize },

    #[error("unknown variable `{name}`")]
    UnknownVariable { name: String },

    #[error("variable `{name}` must be {expected}")]
    TypeMismatch { name: String, expected: &'static str },

    #[error("template data could not be serialized: {message}")]
    InvalidData { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockKind {
    Each,
    If,
}

impl BlockKind {
    fn parse(s: &str) -> Self {
        if s == "each" {
            BlockKind::Each
        } else {
            BlockKind::If
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            BlockKind::Each => "each",
            BlockKind::If => "if",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Text(String),
    Var(String),
    Block {
        kind: BlockKind,
        name: String,
        body: Vec<Node>,
    },
}

/// A parsed template.
#[derive(Debug, Clone)]
pub struct Template {
    nodes: Vec<Node>,
}

fn tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"\{\{\s*(?:#(each|if)\s+([A-Za-z_][\w.]*)|/(each|if)|([A-Za-z_][\w.]*))\s*\}\}",
        )
        .unwrap_or_else(|e| panic!("invalid template tag pattern: {e}"))
    })
}

fn line_of(source: &str, offset: usize) -> usize {
    source[..offset].matches('\n').count() + 1
}

/// Byte range to cut for a block tag spanning `start..end`.
///
/// When the tag is the only thing on its line, the range grows to cover the
/// leading indentation and the trailing line break.
fn standalone_range(source: &str, start: usize, end: usize) -> (usize, usize) {
    let line_start = source[..start].rfind('\n').map_or(0, |i| i + 1);
    if !source[line_start..start].chars().all(|c| c == ' ' || c == '\t') {
        return (start, end);
    }

    let rest = &source[end..];
    let line_end = rest.find('\n');
    let tail = &rest[..line_end.unwrap_or(rest.len())];
    let tail = tail.strip_suffix('\r').unwrap_or(tail);
    if !tail.chars().all(|c| c == ' ' || c == '\t') {
        return (start, end);
    }

    match line_end {
        Some(i) => (line_start, end + i + 1),
        None => (line_start, source.len()),
    }
}

struct OpenBlock {
    kind: BlockKind,
    name: String,
    line: usize,
    nodes: Vec<Node>,
}

impl Template {
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut stack: Vec<OpenBlock> = Vec::new();
        let mut nodes: Vec<Node> = Vec::new();
        let mut cursor = 0;

        for caps in tag_regex().captures_iter(source) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            let is_block = caps.get(1).is_some() || caps.get(3).is_some();
            let (cut_start, cut_end) = if is_block {
                standalone_range(source, whole.start(), whole.end())
            } else {
                (whole.start(), whole.end())
            };
            let cut_start = cut_start.max(cursor);

            if cut_start > cursor {
                current_nodes(&mut stack, &mut nodes)
                    .push(Node::Text(source[cursor..cut_start].to_string()));
            }
            cursor = cut_end;

            let line = line_of(source, whole.start());
            if let (Some(kind), Some(name)) = (caps.get(1), caps.get(2)) {
                stack.push(OpenBlock {
                    kind: BlockKind::parse(kind.as_str()),
                    name: name.as_str().to_string(),
                    line,
                    nodes: Vec::new(),
                });
            } else if let Some(kind) = caps.get(3) {
                let found = BlockKind::parse(kind.as_str());
                let Some(open) = stack.pop() else {
                    return Err(TemplateError::UnexpectedClose {
                        found: found.as_str().to_string(),
                        line,
                    });
                };
                if open.kind != found {
                    return Err(TemplateError::Mismatched {
                        expected: open.kind.as_str().to_string(),
                        found: found.as_str().to_string(),
                        line,
                    });
                }
                let block = Node::Block {
                    kind: open.kind,
                    name: open.name,
                    body: open.nodes,
                };
                current_nodes(&mut stack, &mut nodes).push(block);
            } else if let Some(name) = caps.get(4) {
                current_nodes(&mut stack, &mut nodes).push(Node::Var(name.as_str().to_string()));
            }
        }

        if let Some(open) = stack.pop() {
            return Err(TemplateError::Unclosed {
                block: open.kind.as_str().to_string(),
                line: open.line,
            });
        }
        if cursor < source.len() {
            nodes.push(Node::Text(source[cursor..].to_string()));
        }

        Ok(Template { nodes })
    }

    /// Render the template against `data`, which must be an object.
    pub fn render(&self, data: &Value) -> Result<String, TemplateError> {
        let mut out = String::new();
        let mut scopes = vec![data];
        render_nodes(&self.nodes, &mut scopes, &mut out)?;
        Ok(out)
    }

    /// Serialize `data` and render the template against it.
    pub fn render_serialized<T: Serialize>(&self, data: &T) -> Result<String, TemplateError> {
        let value = serde_json::to_value(data).map_err(|e| TemplateError::InvalidData {
            message: e.to_string(),
        })?;
        self.render(&value)
    }
}

fn current_nodes<'a>(stack: &'a mut [OpenBlock], root: &'a mut Vec<Node>) -> &'a mut Vec<Node> {
    match stack.last_mut() {
        Some(block) => &mut block.nodes,
        None => root,
    }
}

fn lookup<'a>(scopes: &[&'a Value], name: &str) -> Option<&'a Value> {
    let mut segments = name.split('.');
    let first = segments.next()?;

    let mut value = if first == "this" {
        scopes.last().copied()?
    } else {
        scopes.iter().rev().find_map(|&scope| scope.get(first))?
    };
    for segment in segments {
        value = value.get(segment)?;
    }
    Some(value)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(_) => true,
    }
}

fn render_nodes<'v>(
    nodes: &[Node],
    scopes: &mut Vec<&'v Value>,
    out: &mut String,
) -> Result<(), TemplateError> {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Var(name) => {
                let value = lookup(scopes, name).ok_or_else(|| TemplateError::UnknownVariable {
                    name: name.clone(),
                })?;
                match value {
                    Value::Null => {}
                    Value::String(s) => out.push_str(s),
                    Value::Bool(b) => out.push_str(&b.to_string()),
                    Value::Number(n) => out.push_str(&n.to_string()),
                    Value::Array(_) | Value::Object(_) => {
                        return Err(TemplateError::TypeMismatch {
                            name: name.clone(),
                            expected: "a string, number or boolean",
                        })
                    }
                }
            }
            Node::Block {
                kind: BlockKind::If,
                name,
                body,
            } => {
                if lookup(scopes, name).is_some_and(is_truthy) {
                    render_nodes(body, scopes, out)?;
                }
            }
            Node::Block {
                kind: BlockKind::Each,
                name,
                body,
            } => {
                let value = lookup(scopes, name).ok_or_else(|| TemplateError::UnknownVariable {
                    name: name.clone(),
                })?;
                let Value::Array(items) = value else {
                    return Err(TemplateError::TypeMismatch {
                        name: name.clone(),
                        expected: "a list",
                    });
                };
                for item in items {
                    scopes.push(item);
                    let result = render_nodes(body, scopes, out);
                    scopes.pop();
                    result?;
                }
            }
        }
    }
    Ok(())
}
