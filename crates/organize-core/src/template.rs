//! Placeholder substitution for action parameters
//!
//! A template is plain text with `{...}` placeholders:
//!
//! - `{key}` / `{key.field}` reads an attribute, with dotted access into
//!   nested values,
//! - `{path}`, `{path.name}`, `{path.stem}`, `{path.suffix}`,
//!   `{path.extension}`, `{path.parent}`, `{basedir}` and `{relative_path}`
//!   describe the current entry,
//! - `{key|upper}` applies a pipe (`upper`, `lower`, `title`, `trim`),
//! - `{key:spec}` formats the value: a width such as `03` pads, anything
//!   else is a strftime pattern applied to an RFC 3339 timestamp.
//!
//! `{{` and `}}` produce literal braces. Templates are parsed once, up front,
//! so malformed templates surface as configuration errors.

use std::fmt::{self, Write as _};
use std::path::Path;

use chrono::DateTime;
use chrono::format::{Item, StrftimeItems};
use serde_json::Value;

use crate::{AttributeMap, Error, Result};

/// Values a template is rendered against.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    pub basedir: &'a Path,
    pub path: &'a Path,
    pub attributes: &'a AttributeMap,
}

impl<'a> Context<'a> {
    pub fn new(basedir: &'a Path, path: &'a Path, attributes: &'a AttributeMap) -> Self {
        Self {
            basedir,
            path,
            attributes,
        }
    }
}

/// A parsed template.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Literal(String),
    Placeholder(Placeholder),
}

#[derive(Debug, Clone, PartialEq)]
struct Placeholder {
    key: Vec<String>,
    pipes: Vec<Pipe>,
    spec: Option<Spec>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pipe {
    Upper,
    Lower,
    Title,
    Trim,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Spec {
    Width { width: usize, zero: bool },
    Strftime(String),
}

/// Widest padding a `{key:width}` placeholder may ask for.
const MAX_WIDTH: usize = 255;

enum Resolved<'a> {
    Text(String),
    Value(&'a Value),
}

impl Template {
    /// Parse a template string.
    pub fn parse(source: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '{' => {
                    let mut expr = String::new();
                    let mut closed = false;
                    for c in chars.by_ref() {
                        match c {
                            '}' => {
                                closed = true;
                                break;
                            }
                            '{' => return Err(Error::template(source, "nested '{'")),
                            c => expr.push(c),
                        }
                    }
                    if !closed {
                        return Err(Error::template(source, "unclosed placeholder"));
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Placeholder(Placeholder::parse(source, &expr)?));
                }
                '}' => return Err(Error::template(source, "unmatched '}'")),
                c => literal.push(c),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    /// The original template text.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Substitute all placeholders.
    ///
    /// Fails with [`Error::MissingAttribute`] when a placeholder references
    /// something the context does not provide.
    pub fn render(&self, ctx: &Context<'_>) -> Result<String> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(ph) => out.push_str(&self.render_placeholder(ph, ctx)?),
            }
        }
        Ok(out)
    }

    fn render_placeholder(&self, ph: &Placeholder, ctx: &Context<'_>) -> Result<String> {
        let resolved = resolve(&ph.key, ctx).ok_or_else(|| Error::MissingAttribute {
            key: ph.key.join("."),
        })?;

        let mut text = match (&ph.spec, resolved) {
            (None, Resolved::Text(text)) => text,
            (None, Resolved::Value(value)) => value_to_string(value),
            (Some(Spec::Width { width, zero }), resolved) => {
                let text = match resolved {
                    Resolved::Text(text) => text,
                    Resolved::Value(value) => value_to_string(value),
                };
                if *zero {
                    format!("{text:0>width$}")
                } else {
                    format!("{text:>width$}")
                }
            }
            (Some(Spec::Strftime(pattern)), resolved) => {
                let text = match resolved {
                    Resolved::Text(text) => text,
                    Resolved::Value(value) => value_to_string(value),
                };
                let timestamp = DateTime::parse_from_rfc3339(&text).map_err(|_| {
                    Error::template(&self.source, format!("'{text}' is not a timestamp"))
                })?;
                let mut formatted = String::new();
                write!(formatted, "{}", timestamp.format(pattern)).map_err(|_| {
                    Error::template(&self.source, format!("invalid date format '{pattern}'"))
                })?;
                formatted
            }
        };

        for pipe in &ph.pipes {
            text = pipe.apply(&text);
        }
        Ok(text)
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl Placeholder {
    fn parse(source: &str, expr: &str) -> Result<Self> {
        let expr = expr.trim();
        let (head, spec) = match expr.split_once(':') {
            Some((head, spec)) => (head, Some(Spec::parse(source, spec)?)),
            None => (expr, None),
        };

        let mut parts = head.split('|');
        let key: Vec<String> = parts
            .next()
            .unwrap_or_default()
            .trim()
            .split('.')
            .map(str::to_string)
            .collect();
        let valid_segment = |s: &String| {
            !s.is_empty() && s.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-')
        };
        if !key.iter().all(valid_segment) {
            return Err(Error::template(
                source,
                format!("invalid placeholder '{{{expr}}}'"),
            ));
        }

        let pipes = parts
            .map(|p| Pipe::parse(source, p.trim()))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { key, pipes, spec })
    }
}

impl Pipe {
    fn parse(source: &str, name: &str) -> Result<Self> {
        match name {
            "upper" => Ok(Self::Upper),
            "lower" => Ok(Self::Lower),
            "title" => Ok(Self::Title),
            "trim" => Ok(Self::Trim),
            other => Err(Error::template(source, format!("unknown pipe '{other}'"))),
        }
    }

    fn apply(self, text: &str) -> String {
        match self {
            Self::Upper => text.to_uppercase(),
            Self::Lower => text.to_lowercase(),
            Self::Trim => text.trim().to_string(),
            Self::Title => {
                let mut out = String::with_capacity(text.len());
                let mut at_word_start = true;
                for c in text.chars() {
                    if c.is_alphanumeric() {
                        if at_word_start {
                            out.extend(c.to_uppercase());
                        } else {
                            out.extend(c.to_lowercase());
                        }
                        at_word_start = false;
                    } else {
                        out.push(c);
                        at_word_start = true;
                    }
                }
                out
            }
        }
    }
}

impl Spec {
    fn parse(source: &str, spec: &str) -> Result<Self> {
        if spec.is_empty() {
            return Err(Error::template(source, "empty format spec"));
        }
        if spec.chars().all(|c| c.is_ascii_digit()) {
            let width = spec
                .parse::<usize>()
                .ok()
                .filter(|w| *w <= MAX_WIDTH)
                .ok_or_else(|| Error::template(source, format!("invalid width '{spec}'")))?;
            return Ok(Self::Width {
                width,
                zero: spec.starts_with('0'),
            });
        }
        if StrftimeItems::new(spec).any(|item| matches!(item, Item::Error)) {
            return Err(Error::template(
                source,
                format!("invalid date format '{spec}'"),
            ));
        }
        Ok(Self::Strftime(spec.to_string()))
    }
}

fn resolve<'a>(key: &[String], ctx: &Context<'a>) -> Option<Resolved<'a>> {
    let lossy = |p: &Path| p.to_string_lossy().into_owned();
    let (first, rest) = key.split_first()?;

    match (first.as_str(), rest) {
        ("path", []) => Some(Resolved::Text(lossy(ctx.path))),
        ("path", [field]) => {
            let text = match field.as_str() {
                "name" => ctx.path.file_name()?.to_string_lossy().into_owned(),
                "stem" => ctx.path.file_stem()?.to_string_lossy().into_owned(),
                "suffix" => ctx
                    .path
                    .extension()
                    .map(|e| format!(".{}", e.to_string_lossy()))
                    .unwrap_or_default(),
                "extension" => ctx
                    .path
                    .extension()
                    .map(|e| e.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                "parent" => lossy(ctx.path.parent()?),
                _ => return None,
            };
            Some(Resolved::Text(text))
        }
        ("basedir", []) => Some(Resolved::Text(lossy(ctx.basedir))),
        ("relative_path", []) => {
            let relative = ctx.path.strip_prefix(ctx.basedir).unwrap_or(ctx.path);
            Some(Resolved::Text(lossy(relative)))
        }
        ("path" | "basedir" | "relative_path", _) => None,
        _ => ctx.attributes.lookup(key).map(Resolved::Value),
    }
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .map(value_to_string)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => value.to_string(),
    }
}
