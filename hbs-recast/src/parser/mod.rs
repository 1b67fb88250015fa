//! Template parser
//!
//! Turns template text into a [`Program`] whose every node is
//! [`Origin::Original`], with byte-offset spans the printer can copy from.
//!
//! Span conventions:
//! - a call without `key=value` arguments still gets a [`Hash`](crate::ast::Hash),
//!   with a zero-width span right after its last param (or its callee);
//! - a block's program spans from the end of the open tag to `{{else}}` or the
//!   close tag, its inverse from the end of `{{else}}` to the close tag;
//! - quoted attribute values include their quotes, a valueless attribute gets an
//!   empty zero-width text value;
//! - the root program spans the whole template.
//!
//! # Examples
//!
//! ```rust
//! use hbs_recast::ast::{Spanned, Statement};
//!
//! let program = hbs_recast::parse("Hello {{name}}!").unwrap();
//! assert_eq!(program.body.len(), 3);
//! let Statement::Mustache(mustache) = &program.body[1] else { panic!() };
//! assert_eq!(mustache.span().map(|span| (span.start, span.end)), Some((6, 14)));
//! ```

mod expression;
mod scanner;
mod template;

use tracing::debug;

use crate::ast::{NodeId, Origin, Program, Span};
use crate::error::ParseError;

type Result<T> = std::result::Result<T, ParseError>;

/// Parses a template into a span-annotated tree
pub fn parse(src: &str) -> std::result::Result<Program, ParseError> {
    let mut parser = Parser::new(src);
    let body = parser.parse_content()?;
    if !parser.at_end() {
        return Err(parser.stray());
    }
    let origin = parser.origin(0, src.len());
    debug!(bytes = src.len(), nodes = parser.next_id, "parsed template");
    Ok(Program { origin, body })
}

pub(crate) struct Parser<'s> {
    src: &'s str,
    pos: usize,
    next_id: u32,
}

impl<'s> Parser<'s> {
    fn new(src: &'s str) -> Self {
        Self {
            src,
            pos: 0,
            next_id: 0,
        }
    }

    fn origin(&mut self, start: usize, end: usize) -> Origin {
        let id = NodeId::new(self.next_id);
        self.next_id += 1;
        Origin::Original {
            id,
            span: Span::new(start, end),
        }
    }

    fn rest(&self) -> &'s str {
        &self.src[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn at(&self, token: &str) -> bool {
        self.rest().starts_with(token)
    }

    fn eat(&mut self, token: &str) -> bool {
        if self.at(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &str, what: &str) -> Result<()> {
        if self.eat(token) {
            Ok(())
        } else if self.at_end() {
            Err(ParseError::unclosed(what, self.src, self.pos))
        } else {
            Err(self.error(format!("expected `{token}` to close {what}")))
        }
    }

    fn skip_whitespace(&mut self) {
        self.pos += scanner::whitespace_len(self.rest());
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(message, self.src, self.pos)
    }

    /// Error for a close tag or `{{else}}` that nothing opened
    fn stray(&self) -> ParseError {
        if self.at("</") {
            self.error("unexpected close tag")
        } else if scanner::marker(self.rest()) == scanner::Marker::Else {
            self.error("unexpected {{else}}")
        } else {
            self.error("unexpected close block")
        }
    }
}
