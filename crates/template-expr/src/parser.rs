/*
 * parser.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template parser.
//!
//! A template is a sequence of literal runs and `${...}` expression bodies.
//! Each body is parsed by a small recursive-descent grammar:
//!
//! ```text
//! expression := token suffix*
//! suffix     := "(" token ")"      index
//!             | ".random"          random element
//!             | ".size"            element count
//!             | "." token          key lookup
//! token      := any non-empty run of characters except . $ { } ( )
//! ```
//!
//! Literal text outside markers passes through unchanged, including a `$`
//! that is not followed by `{` and a stray `}`.

use crate::error::ParseError;
use crate::part::{IndexSpec, Part};
use std::cell::RefCell;

const OPEN: &str = "${";
const CLOSE: char = '}';
const RESERVED: &[char] = &['.', '$', '{', '}', '(', ')'];

/// A parsed template: the ordered list of parts and the text it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub(crate) parts: Vec<Part>,
    pub(crate) source: String,
}

impl Template {
    /// Parse a template using this thread's parser.
    pub fn parse(source: &str) -> Result<Self, ParseError> {
        let parts = with_parser(|parser| parser.parse(source)).inspect_err(|err| {
            tracing::debug!(offset = err.offset, error = %err.message, "Template parse failed");
        })?;
        Ok(Template {
            parts,
            source: source.to_string(),
        })
    }

    /// The parts of this template, in order.
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// The original template text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether the template contains no expressions.
    pub fn is_static(&self) -> bool {
        self.parts.iter().all(Part::is_static)
    }
}

thread_local! {
    static PARSER: RefCell<Parser> = RefCell::new(Parser::new());
}

/// Run `f` with this thread's parser.
///
/// Each thread gets its own parser, created lazily on the first parse on
/// that thread and dropped when the thread exits, so no parser is ever
/// shared between concurrent compilations. A re-entrant call on the same
/// thread gets a fresh parser instead of the one already in use.
pub fn with_parser<R>(f: impl FnOnce(&mut Parser) -> R) -> R {
    PARSER.with(|cell| match cell.try_borrow_mut() {
        Ok(mut parser) => f(&mut parser),
        Err(_) => f(&mut Parser::new()),
    })
}

/// Reusable template parser.
///
/// The only state is the buffer used to accumulate access paths while an
/// expression is read. It keeps its capacity between parses and is cleared
/// at the start of every expression.
#[derive(Debug, Default)]
pub struct Parser {
    path: String,
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Split `source` into parts. Fails on the first malformed expression;
    /// no partial result is returned.
    pub fn parse(&mut self, source: &str) -> Result<Vec<Part>, ParseError> {
        let mut parts = Vec::new();
        let mut literal_start = 0;

        while let Some(found) = source[literal_start..].find(OPEN) {
            let open = literal_start + found;
            if open > literal_start {
                parts.push(Part::Static(source[literal_start..open].to_string()));
            }

            let body_start = open + OPEN.len();
            let close = source[body_start..]
                .find(CLOSE)
                .map(|i| body_start + i)
                .ok_or_else(|| {
                    parse_error(source, "unterminated expression, expected '}'", open)
                })?;

            let part = Cursor::new(source, body_start, close).expression(&mut self.path)?;
            parts.push(part);
            literal_start = close + CLOSE.len_utf8();
        }

        if parts.is_empty() {
            // No expressions at all: the whole string is one static part,
            // even when empty.
            parts.push(Part::Static(source.to_string()));
        } else if literal_start < source.len() {
            parts.push(Part::Static(source[literal_start..].to_string()));
        }

        Ok(parts)
    }
}

fn parse_error(source: &str, message: impl Into<String>, offset: usize) -> ParseError {
    ParseError {
        template: source.to_string(),
        message: message.into(),
        offset,
    }
}

/// One suffix accessor, as read from the template. Folded into a [`Part`]
/// immediately after it is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AccessToken<'s> {
    Index(&'s str),
    Random,
    Size,
    Key(&'s str),
}

impl AccessToken<'_> {
    /// Append the text this accessor adds to the access path.
    fn extend_path(&self, path: &mut String) {
        match self {
            AccessToken::Index(token) => {
                path.push('(');
                path.push_str(token);
                path.push(')');
            }
            AccessToken::Random => path.push_str(".random"),
            AccessToken::Size => path.push_str(".size"),
            AccessToken::Key(key) => {
                path.push('.');
                path.push_str(key);
            }
        }
    }

    /// Wrap `child`, whose access path is `path`, in the part for this
    /// accessor. The new part reports `path` in its errors.
    fn apply(self, child: Part, path: &str) -> Part {
        let name = path.to_string();
        let child = Box::new(child);
        match self {
            AccessToken::Index(token) => Part::Index {
                child,
                name,
                index: IndexSpec::from_token(token),
            },
            AccessToken::Random => Part::Random { child, name },
            AccessToken::Size => Part::Size { child, name },
            AccessToken::Key(key) => Part::Key {
                child,
                name,
                key: key.to_string(),
            },
        }
    }
}

/// Position within a single expression body, `source[pos..end]`.
struct Cursor<'s> {
    source: &'s str,
    pos: usize,
    end: usize,
}

impl<'s> Cursor<'s> {
    fn new(source: &'s str, start: usize, end: usize) -> Self {
        Self {
            source,
            pos: start,
            end,
        }
    }

    /// Read `token suffix*`, folding each suffix over the part and access
    /// path built so far.
    fn expression(mut self, path: &mut String) -> Result<Part, ParseError> {
        let name = self.token("an object name")?;
        path.clear();
        path.push_str(name);
        let mut part = Part::Attribute(name.to_string());
        while let Some(access) = self.access_token()? {
            part = access.apply(part, path);
            access.extend_path(path);
        }
        Ok(part)
    }

    fn access_token(&mut self) -> Result<Option<AccessToken<'s>>, ParseError> {
        match self.peek() {
            None => Ok(None),
            Some('(') => {
                self.pos += 1;
                let token = self.token("an index")?;
                self.expect(')')?;
                Ok(Some(AccessToken::Index(token)))
            }
            Some('.') => {
                self.pos += 1;
                // Keywords only match a whole token, so `.sizes` is a key.
                let token = self.token("a key, 'size' or 'random'")?;
                Ok(Some(match token {
                    "random" => AccessToken::Random,
                    "size" => AccessToken::Size,
                    key => AccessToken::Key(key),
                }))
            }
            Some(c) => Err(self.error(format!("unexpected character '{}'", c))),
        }
    }

    fn token(&mut self, expected: &str) -> Result<&'s str, ParseError> {
        let rest = &self.source[self.pos..self.end];
        let len = rest.find(RESERVED).unwrap_or(rest.len());
        if len == 0 {
            return Err(self.error(format!("expected {}", expected)));
        }
        self.pos += len;
        Ok(&rest[..len])
    }

    fn expect(&mut self, c: char) -> Result<(), ParseError> {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            Ok(())
        } else {
            Err(self.error(format!("expected '{}'", c)))
        }
    }

    fn peek(&self) -> Option<char> {
        self.source[self.pos..self.end].chars().next()
    }

    fn error(&self, message: String) -> ParseError {
        parse_error(self.source, message, self.pos)
    }
}
