//! Embedded expressions.
//!
//! Text and attribute values may contain expressions wrapped in `{{` and `}}`:
//!
//! * `{{ name }}` renders the value of `name`
//! * `{{ cond ? other }}` renders the value of `other` if `cond` is truthy
//! * `{{ cond ? "text" }}` renders `text` if `cond` is truthy
//! * `{{ cond ? "text" : "else" }}` renders `text` or `else`
//!
//! Identifiers match `[a-zA-Z][a-zA-Z0-9_]*`. Whitespace is allowed around
//! every identifier, operator and string, and is never part of a name.
//! Strings are wrapped in double or single quotes and have no escapes.
//! A `{{` that starts none of the above is kept as literal text.
use std::fmt::{self, Write};

use indexmap::IndexSet;

pub use self::render::render;
use crate::error::{Error, Result};

mod render;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

// -----------------------------------------------------------------------------
//   - Segment -
// -----------------------------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Variable(String),
    /// Renders the value of `then` when `cond` is truthy.
    Conditional { cond: String, then: String },
    /// Renders `then` when `cond` is truthy.
    ConditionalLiteral { cond: String, then: String },
    /// Renders `then` when `cond` is truthy, otherwise `otherwise`.
    ConditionalLiteralElse {
        cond: String,
        then: String,
        otherwise: String,
    },
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(text) => f.write_str(text),
            Self::Variable(name) => write!(f, "{OPEN}{name}{CLOSE}"),
            Self::Conditional { cond, then } => write!(f, "{OPEN}{cond}?{then}{CLOSE}"),
            Self::ConditionalLiteral { cond, then } => {
                write!(f, "{OPEN}{cond}?{}{CLOSE}", Quoted(then))
            }
            Self::ConditionalLiteralElse {
                cond,
                then,
                otherwise,
            } => write!(
                f,
                "{OPEN}{cond}?{}:{}{CLOSE}",
                Quoted(then),
                Quoted(otherwise)
            ),
        }
    }
}

struct Quoted<'a>(&'a str);

impl fmt::Display for Quoted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let quote = if self.0.contains('"') { '\'' } else { '"' };
        f.write_char(quote)?;
        f.write_str(self.0)?;
        f.write_char(quote)
    }
}

// -----------------------------------------------------------------------------
//   - Expression -
// -----------------------------------------------------------------------------
/// A parsed piece of text: the ordered segments plus every distinct
/// variable name they reference, in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Expression {
    variables: IndexSet<String>,
    segments: Vec<Segment>,
}

impl Expression {
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn variables(&self) -> impl Iterator<Item = &str> + '_ {
        self.variables.iter().map(String::as_str)
    }

    pub fn has_variables(&self) -> bool {
        !self.variables.is_empty()
    }

    fn push(&mut self, segment: Segment) {
        match &segment {
            Segment::Literal(text) if text.is_empty() => return,
            Segment::Literal(text) => {
                // Adjacent literals collapse into one segment
                if let Some(Segment::Literal(last)) = self.segments.last_mut() {
                    last.push_str(text);
                    return;
                }
            }
            Segment::Variable(name)
            | Segment::ConditionalLiteral { cond: name, .. }
            | Segment::ConditionalLiteralElse { cond: name, .. } => {
                self.variables.insert(name.clone());
            }
            Segment::Conditional { cond, then } => {
                self.variables.insert(cond.clone());
                self.variables.insert(then.clone());
            }
        }
        self.segments.push(segment);
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.segments.iter().try_for_each(|s| write!(f, "{s}"))
    }
}

// -----------------------------------------------------------------------------
//   - Parser -
// -----------------------------------------------------------------------------
pub fn parse(text: &str) -> Result<Expression> {
    let mut expression = Expression::default();
    let mut pos = 0;

    while pos < text.len() {
        let start = pos;

        match text[pos..].find(OPEN) {
            None => {
                expression.push(Segment::Literal(text[pos..].to_string()));
                pos = text.len();
            }
            Some(offset) => {
                expression.push(Segment::Literal(text[pos..pos + offset].to_string()));
                pos += offset;

                match delimited(&text[pos..]) {
                    Some((segment, consumed)) => {
                        expression.push(segment);
                        pos += consumed;
                    }
                    // Only the first brace is literal, so a `{{` starting
                    // at the second brace is still tried
                    None => {
                        expression.push(Segment::Literal("{".to_string()));
                        pos += 1;
                    }
                }
            }
        }

        // Guards against a branch that stops consuming input
        if pos == start {
            return Err(Error::MalformedExpression {
                text: text.to_string(),
            });
        }
    }

    Ok(expression)
}

/// Match one delimited expression at the start of `src`, trying the
/// alternatives in a fixed order. Returns the segment and the number of
/// bytes consumed.
fn delimited(src: &str) -> Option<(Segment, usize)> {
    let alternatives: [fn(&mut Cursor<'_>) -> Option<Segment>; 4] = [
        variable,
        conditional_literal_else,
        conditional_literal,
        conditional,
    ];

    alternatives.iter().find_map(|alternative| {
        let mut cursor = Cursor::new(src);
        let segment = alternative(&mut cursor)?;
        Some((segment, cursor.pos))
    })
}

fn variable(cursor: &mut Cursor<'_>) -> Option<Segment> {
    cursor.open()?;
    let name = cursor.ident()?;
    cursor.close()?;
    Some(Segment::Variable(name.to_string()))
}

fn conditional_literal_else(cursor: &mut Cursor<'_>) -> Option<Segment> {
    let cond = cursor.condition()?;
    let then = cursor.string()?;
    cursor.token(':')?;
    let otherwise = cursor.string()?;
    cursor.close()?;
    Some(Segment::ConditionalLiteralElse {
        cond: cond.to_string(),
        then: then.to_string(),
        otherwise: otherwise.to_string(),
    })
}

fn conditional_literal(cursor: &mut Cursor<'_>) -> Option<Segment> {
    let cond = cursor.condition()?;
    let then = cursor.string()?;
    cursor.close()?;
    Some(Segment::ConditionalLiteral {
        cond: cond.to_string(),
        then: then.to_string(),
    })
}

fn conditional(cursor: &mut Cursor<'_>) -> Option<Segment> {
    let cond = cursor.condition()?;
    let then = cursor.ident()?;
    cursor.close()?;
    Some(Segment::Conditional {
        cond: cond.to_string(),
        then: then.to_string(),
    })
}

struct Cursor<'src> {
    src: &'src str,
    pos: usize,
}

impl<'src> Cursor<'src> {
    fn new(src: &'src str) -> Self {
        Self { src, pos: 0 }
    }

    fn rest(&self) -> &'src str {
        &self.src[self.pos..]
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn literal(&mut self, expected: &str) -> Option<()> {
        self.skip_whitespace();
        let found = self.rest().starts_with(expected);
        found.then(|| self.pos += expected.len())
    }

    fn token(&mut self, c: char) -> Option<()> {
        let mut buf = [0; 4];
        self.literal(c.encode_utf8(&mut buf))
    }

    fn open(&mut self) -> Option<()> {
        self.literal(OPEN)
    }

    fn close(&mut self) -> Option<()> {
        self.literal(CLOSE)
    }

    /// `{{ cond ?`
    fn condition(&mut self) -> Option<&'src str> {
        self.open()?;
        let cond = self.ident()?;
        self.token('?')?;
        Some(cond)
    }

    fn ident(&mut self) -> Option<&'src str> {
        self.skip_whitespace();
        let rest = self.rest();
        if !rest.starts_with(|c: char| c.is_ascii_alphabetic()) {
            return None;
        }
        let len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(rest.len());
        self.pos += len;
        Some(&rest[..len])
    }

    fn string(&mut self) -> Option<&'src str> {
        self.skip_whitespace();
        let rest = self.rest();
        let quote = rest.chars().next().filter(|c| matches!(c, '"' | '\''))?;
        let len = rest[1..].find(quote)?;
        self.pos += len + 2;
        Some(&rest[1..=len])
    }
}
