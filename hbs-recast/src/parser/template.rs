//! Text, elements, attributes and comments

use super::scanner::{self, Marker};
use super::{Parser, Result};
use crate::ast::{
    AttrNode, AttrValue, CommentStatement, ConcatPart, ConcatStatement, ElementNode, Origin,
    Statement, TextNode,
};
use crate::error::ParseError;

impl Parser<'_> {
    /// Statements up to the end of input, a close tag, a close block or `{{else}}`
    pub(super) fn parse_content(&mut self) -> Result<Vec<Statement>> {
        let mut body = Vec::new();
        while !self.at_end() {
            let rest = self.rest();
            if rest.starts_with("{{") {
                let statement = match scanner::marker(rest) {
                    Marker::Close | Marker::Else => break,
                    Marker::Comment => self.parse_mustache_comment()?.into(),
                    Marker::Open => self.parse_block()?.into(),
                    Marker::Plain | Marker::Triple => self.parse_mustache()?.into(),
                    Marker::Partial => return Err(self.error("partials are not supported")),
                    Marker::Inverse => return Err(self.error("inverse sections are not supported")),
                    Marker::Raw => return Err(self.error("raw blocks are not supported")),
                };
                body.push(statement);
            } else if rest.starts_with("<!--") {
                body.push(self.parse_comment()?.into());
            } else if rest.starts_with("</") {
                break;
            } else if scanner::starts_tag(rest) {
                body.push(self.parse_element()?.into());
            } else {
                body.push(self.parse_text()?.into());
            }
        }
        Ok(body)
    }

    fn parse_text(&mut self) -> Result<TextNode> {
        let start = self.pos;
        let len = scanner::text_len(self.rest()).max(1);
        self.pos += len;
        Ok(TextNode {
            origin: self.origin(start, self.pos),
            chars: self.src[start..self.pos].to_string(),
        })
    }

    fn parse_comment(&mut self) -> Result<CommentStatement> {
        let start = self.pos;
        self.eat("<!--");
        let Some(len) = self.rest().find("-->") else {
            return Err(ParseError::unclosed("comment", self.src, start));
        };
        let value = self.rest()[..len].to_string();
        self.pos += len + 3;
        Ok(CommentStatement {
            origin: self.origin(start, self.pos),
            value,
        })
    }

    fn parse_element(&mut self) -> Result<ElementNode> {
        let start = self.pos;
        self.eat("<");
        let len = scanner::name_len(self.rest());
        let tag = self.rest()[..len].to_string();
        self.pos += len;

        let mut attributes = Vec::new();
        let mut block_params = Vec::new();
        let self_closing = loop {
            self.skip_whitespace();
            if self.eat("/>") {
                break true;
            }
            if self.eat(">") {
                break false;
            }
            if self.at_end() {
                return Err(ParseError::unclosed("element", self.src, start));
            }
            if self.at("{{") {
                return Err(self.error("element modifiers are not supported"));
            }
            let rest = self.rest();
            if rest.starts_with("as") && rest[2..].trim_start().starts_with('|') {
                block_params = self.parse_block_params()?;
                continue;
            }
            attributes.push(self.parse_attribute()?);
        };

        let mut element = ElementNode {
            origin: Origin::Synthetic,
            tag,
            attributes,
            block_params,
            children: Vec::new(),
            self_closing,
        };
        if element.has_body() {
            element.children = self.parse_content()?;
            self.parse_close_tag(&element.tag, start)?;
        }
        element.origin = self.origin(start, self.pos);
        Ok(element)
    }

    fn parse_close_tag(&mut self, tag: &str, start: usize) -> Result<()> {
        if !self.at("</") {
            return Err(if self.at_end() {
                ParseError::unclosed("element", self.src, start)
            } else {
                self.error(format!("expected </{tag}>"))
            });
        }
        self.eat("</");
        let len = scanner::name_len(self.rest());
        let close = &self.rest()[..len];
        if close != tag {
            return Err(self.error(format!("close tag `</{close}>` does not match `<{tag}>`")));
        }
        self.pos += len;
        self.skip_whitespace();
        self.expect(">", "close tag")
    }

    fn parse_attribute(&mut self) -> Result<AttrNode> {
        let start = self.pos;
        let len = scanner::name_len(self.rest());
        if len == 0 {
            return Err(self.error("expected an attribute name"));
        }
        let name = self.rest()[..len].to_string();
        self.pos += len;

        let value = if self.eat("=") {
            let rest = self.rest();
            if rest.starts_with(['"', '\'']) {
                self.parse_quoted_value()?
            } else if rest.starts_with("{{") {
                AttrValue::Mustache(self.parse_mustache()?)
            } else {
                let value_start = self.pos;
                let len = rest
                    .find(|c: char| c.is_whitespace() || c == '>')
                    .unwrap_or(rest.len());
                let len = if rest[..len].ends_with('/') && rest[len..].starts_with('>') {
                    len - 1
                } else {
                    len
                };
                if len == 0 {
                    return Err(self.error("expected an attribute value"));
                }
                self.pos += len;
                AttrValue::Text(TextNode {
                    origin: self.origin(value_start, self.pos),
                    chars: self.src[value_start..self.pos].to_string(),
                })
            }
        } else {
            AttrValue::Text(TextNode {
                origin: self.origin(self.pos, self.pos),
                chars: String::new(),
            })
        };

        Ok(AttrNode {
            origin: self.origin(start, self.pos),
            name,
            value,
        })
    }

    /// `"text"`, or `"text {{mustache}} text"` as a concatenation
    fn parse_quoted_value(&mut self) -> Result<AttrValue> {
        let start = self.pos;
        let quote = if self.eat("\"") {
            '"'
        } else {
            self.eat("'");
            '\''
        };
        let mut parts = Vec::new();
        loop {
            if self.at_end() {
                return Err(self.error("unterminated attribute value"));
            }
            let rest = self.rest();
            if rest.starts_with(quote) {
                self.pos += 1;
                break;
            }
            if rest.starts_with("{{") {
                parts.push(ConcatPart::Mustache(self.parse_mustache()?));
                continue;
            }
            let text_start = self.pos;
            let mut len = rest.len();
            if let Some(at) = rest.find(quote) {
                len = at;
            }
            if let Some(at) = rest.find("{{") {
                len = len.min(at);
            }
            self.pos += len;
            parts.push(ConcatPart::Text(TextNode {
                origin: self.origin(text_start, self.pos),
                chars: self.src[text_start..self.pos].to_string(),
            }));
        }

        let has_mustache = parts.iter().any(|part| matches!(part, ConcatPart::Mustache(_)));
        if has_mustache {
            return Ok(AttrValue::Concat(ConcatStatement {
                origin: self.origin(start, self.pos),
                parts,
            }));
        }
        let chars = match parts.pop() {
            Some(ConcatPart::Text(text)) => text.chars,
            _ => String::new(),
        };
        Ok(AttrValue::Text(TextNode {
            origin: self.origin(start, self.pos),
            chars,
        }))
    }
}
