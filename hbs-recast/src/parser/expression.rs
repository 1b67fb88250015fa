//! Mustaches, blocks and the expressions inside them

use super::scanner::{self, Marker};
use super::{Parser, Result};
use crate::ast::{
    BlockStatement, BooleanLiteral, Expression, Hash, HashPair, MustacheCommentStatement,
    MustacheStatement, NumberLiteral, PathExpression, Program, Spanned, StringLiteral,
    SubExpression,
};
use crate::error::ParseError;

/// Callee, positional params and hash of a mustache, block or sub-expression
pub(super) struct Call {
    pub path: Expression,
    pub params: Vec<Expression>,
    pub hash: Hash,
}

impl Parser<'_> {
    /// `{{path ...}}` or `{{{path ...}}}`
    pub(super) fn parse_mustache(&mut self) -> Result<MustacheStatement> {
        let start = self.pos;
        self.eat("{{");
        let trusting = self.eat("{");
        self.eat("~");
        let Call { path, params, hash } = self.parse_call("mustache")?;
        self.skip_whitespace();
        self.eat("~");
        self.expect(if trusting { "}}}" } else { "}}" }, "mustache")?;
        Ok(MustacheStatement {
            origin: self.origin(start, self.pos),
            path,
            params,
            hash,
            trusting,
        })
    }

    /// `{{! value }}` or `{{!-- value --}}`
    pub(super) fn parse_mustache_comment(&mut self) -> Result<MustacheCommentStatement> {
        let start = self.pos;
        self.eat("{{");
        self.eat("~");
        self.eat("!");
        let long = self.eat("--");
        let content_start = self.pos;
        let mut from = self.pos;
        loop {
            let Some(found) = self.src[from..].find("}}") else {
                return Err(ParseError::unclosed("comment", self.src, start));
            };
            let close = from + found;
            let mut content_end = close;
            if self.src[..content_end].ends_with('~') && content_end > content_start {
                content_end -= 1;
            }
            if !long {
                self.pos = close + 2;
                return Ok(MustacheCommentStatement {
                    origin: self.origin(start, self.pos),
                    value: self.src[content_start..content_end].to_string(),
                });
            }
            if content_end >= content_start + 2 && self.src[..content_end].ends_with("--") {
                self.pos = close + 2;
                return Ok(MustacheCommentStatement {
                    origin: self.origin(start, self.pos),
                    value: self.src[content_start..content_end - 2].to_string(),
                });
            }
            from = close + 2;
        }
    }

    /// `{{#path ... as |params|}}program{{else}}inverse{{/path}}`
    pub(super) fn parse_block(&mut self) -> Result<BlockStatement> {
        let start = self.pos;
        self.eat("{{");
        self.eat("~");
        self.eat("#");
        let Call { path, params, hash } = self.parse_call("block")?;
        let Expression::Path(callee) = &path else {
            return Err(self.error("block helpers must be named by a path"));
        };
        let name = callee.original.clone();
        self.skip_whitespace();
        let block_params = if self.at("as") {
            self.parse_block_params()?
        } else {
            Vec::new()
        };
        self.skip_whitespace();
        self.eat("~");
        self.expect("}}", "block")?;

        let program = self.parse_body()?;
        let inverse = if self.at("{{") && scanner::marker(self.rest()) == Marker::Else {
            self.parse_else()?;
            Some(self.parse_body()?)
        } else {
            None
        };
        if self.at("{{") && scanner::marker(self.rest()) == Marker::Else {
            return Err(self.error("a block can only have one {{else}}"));
        }
        self.parse_close_block(&name)?;

        Ok(BlockStatement {
            origin: self.origin(start, self.pos),
            path,
            params,
            hash,
            block_params,
            program,
            inverse,
        })
    }

    /// Statements up to the next `{{else}}` or close block
    fn parse_body(&mut self) -> Result<Program> {
        let start = self.pos;
        let body = self.parse_content()?;
        if self.at_end() {
            return Err(ParseError::unclosed("block", self.src, self.pos));
        }
        Ok(Program {
            origin: self.origin(start, self.pos),
            body,
        })
    }

    fn parse_else(&mut self) -> Result<()> {
        self.eat("{{");
        self.eat("~");
        self.skip_whitespace();
        self.eat("else");
        self.skip_whitespace();
        if !self.at("}}") && !self.at("~}}") {
            return Err(self.error("chained else blocks are not supported"));
        }
        self.eat("~");
        self.expect("}}", "else")
    }

    fn parse_close_block(&mut self, name: &str) -> Result<()> {
        if !(self.at("{{") && scanner::marker(self.rest()) == Marker::Close) {
            return Err(self.error(format!("expected {{{{/{name}}}}} to close block")));
        }
        self.eat("{{");
        self.eat("~");
        self.eat("/");
        self.skip_whitespace();
        let len = scanner::find_end(self.rest());
        let close = &self.rest()[..len];
        if close != name {
            return Err(self.error(format!("close block `{close}` does not match `{name}`")));
        }
        self.pos += len;
        self.skip_whitespace();
        self.eat("~");
        self.expect("}}", "close block")
    }

    /// `as |a b c|`, shared by blocks and elements
    pub(super) fn parse_block_params(&mut self) -> Result<Vec<String>> {
        self.eat("as");
        self.skip_whitespace();
        if !self.eat("|") {
            return Err(self.error("expected `|` after `as`"));
        }
        let mut names = Vec::new();
        loop {
            self.skip_whitespace();
            if self.eat("|") {
                break;
            }
            if self.at_end() {
                return Err(ParseError::unclosed("block params", self.src, self.pos));
            }
            let len = scanner::find_end(self.rest());
            if len == 0 {
                return Err(self.error("expected a block param name"));
            }
            names.push(self.rest()[..len].to_string());
            self.pos += len;
        }
        Ok(names)
    }

    /// Whether the cursor sits on whatever ends a call's arguments
    fn at_call_end(&self) -> bool {
        let rest = self.rest();
        if rest.starts_with(['}', '~', ')']) {
            return true;
        }
        match rest.strip_prefix("as") {
            Some(after) => after.trim_start().starts_with('|'),
            None => false,
        }
    }

    pub(super) fn parse_call(&mut self, what: &str) -> Result<Call> {
        self.skip_whitespace();
        let path = self.parse_expression(what)?;
        let mut last_end = self.pos;
        let mut params = Vec::new();
        let mut pairs: Vec<HashPair> = Vec::new();
        loop {
            self.skip_whitespace();
            if self.at_end() {
                return Err(ParseError::unclosed(what, self.src, self.pos));
            }
            if self.at_call_end() {
                break;
            }
            if let Some(key_len) = scanner::hash_key_len(self.rest()) {
                let start = self.pos;
                let key = self.rest()[..key_len - 1].to_string();
                self.pos += key_len;
                let value = self.parse_expression(what)?;
                pairs.push(HashPair {
                    origin: self.origin(start, self.pos),
                    key,
                    value,
                });
            } else if !pairs.is_empty() {
                return Err(self.error("positional params must come before hash pairs"));
            } else {
                params.push(self.parse_expression(what)?);
                last_end = self.pos;
            }
        }
        let hash_span = match (pairs.first(), pairs.last()) {
            (Some(first), Some(last)) => (
                first.span().map_or(last_end, |span| span.start),
                last.span().map_or(last_end, |span| span.end),
            ),
            _ => (last_end, last_end),
        };
        let hash = Hash {
            origin: self.origin(hash_span.0, hash_span.1),
            pairs,
        };
        Ok(Call { path, params, hash })
    }

    pub(super) fn parse_expression(&mut self, what: &str) -> Result<Expression> {
        let start = self.pos;
        let rest = self.rest();
        if rest.starts_with('(') {
            self.pos += 1;
            let Call { path, params, hash } = self.parse_call("sub-expression")?;
            self.skip_whitespace();
            self.expect(")", "sub-expression")?;
            return Ok(SubExpression {
                origin: self.origin(start, self.pos),
                path,
                params,
                hash,
            }
            .into());
        }
        if rest.starts_with(['"', '\'']) {
            let Some(len) = scanner::find_end_of_string(rest) else {
                return Err(self.error("unterminated string"));
            };
            let quote = rest[..1].chars().next().unwrap_or('"');
            let value = scanner::unescape(&rest[1..len - 1], quote);
            self.pos += len;
            return Ok(StringLiteral {
                origin: self.origin(start, self.pos),
                value,
            }
            .into());
        }
        if let Some(len) = scanner::number_len(rest) {
            let value = rest[..len]
                .parse::<f64>()
                .map_err(|err| self.error(format!("invalid number: {err}")))?;
            self.pos += len;
            return Ok(NumberLiteral {
                origin: self.origin(start, self.pos),
                value,
            }
            .into());
        }
        let len = scanner::find_end(rest);
        if len == 0 {
            return Err(if self.at_end() {
                ParseError::unclosed(what, self.src, self.pos)
            } else {
                self.error(format!("expected an expression in {what}"))
            });
        }
        let token = &rest[..len];
        self.pos += len;
        let origin = self.origin(start, self.pos);
        Ok(match token {
            "true" | "false" => BooleanLiteral {
                origin,
                value: token == "true",
            }
            .into(),
            _ => PathExpression {
                origin,
                ..PathExpression::new(token)
            }
            .into(),
        })
    }
}
