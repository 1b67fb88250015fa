//! Factories for synthetic nodes
//!
//! Everything built here has [`Origin::Synthetic`] and is rendered from
//! scratch by the printer, with canonical punctuation. Callee arguments take
//! anything that converts into an [`Expression`], so a plain `&str` works as
//! a path:
//!
//! ```rust
//! use hbs_recast::Builders;
//! use hbs_recast::ast::Spanned;
//!
//! let b = Builders;
//! let mustache = b.mustache("format-date", vec![b.path("this.date").into()], None);
//! assert!(mustache.params[0].is_synthetic());
//! ```

use crate::ast::{
    AttrNode, AttrValue, BlockStatement, BooleanLiteral, CommentStatement, ConcatPart,
    ConcatStatement, ElementNode, Expression, Hash, HashPair, MustacheCommentStatement,
    MustacheStatement, NumberLiteral, Origin, PathExpression, Program, Statement, StringLiteral,
    SubExpression, TextNode,
};

/// Node factories, handed to plugins through [`Env`](crate::Env).
#[derive(Debug, Clone, Copy, Default)]
pub struct Builders;

impl Builders {
    /// `foo`, `foo.bar`, `this.foo` or `@index`
    pub fn path(&self, original: &str) -> PathExpression {
        PathExpression::new(original)
    }

    pub fn string(&self, value: impl Into<String>) -> StringLiteral {
        StringLiteral {
            origin: Origin::Synthetic,
            value: value.into(),
        }
    }

    pub fn number(&self, value: f64) -> NumberLiteral {
        NumberLiteral {
            origin: Origin::Synthetic,
            value,
        }
    }

    pub fn boolean(&self, value: bool) -> BooleanLiteral {
        BooleanLiteral {
            origin: Origin::Synthetic,
            value,
        }
    }

    pub fn sexpr(
        &self,
        path: impl Into<Expression>,
        params: Vec<Expression>,
        hash: Option<Hash>,
    ) -> SubExpression {
        SubExpression {
            origin: Origin::Synthetic,
            path: path.into(),
            params,
            hash: hash.unwrap_or_default(),
        }
    }

    pub fn mustache(
        &self,
        path: impl Into<Expression>,
        params: Vec<Expression>,
        hash: Option<Hash>,
    ) -> MustacheStatement {
        MustacheStatement {
            origin: Origin::Synthetic,
            path: path.into(),
            params,
            hash: hash.unwrap_or_default(),
            trusting: false,
        }
    }

    pub fn block(
        &self,
        path: impl Into<Expression>,
        params: Vec<Expression>,
        hash: Option<Hash>,
        program: Program,
        inverse: Option<Program>,
    ) -> BlockStatement {
        BlockStatement {
            origin: Origin::Synthetic,
            path: path.into(),
            params,
            hash: hash.unwrap_or_default(),
            block_params: Vec::new(),
            program,
            inverse,
        }
    }

    pub fn program(&self, body: Vec<Statement>) -> Program {
        Program {
            origin: Origin::Synthetic,
            body,
        }
    }

    pub fn text(&self, chars: impl Into<String>) -> TextNode {
        TextNode {
            origin: Origin::Synthetic,
            chars: chars.into(),
        }
    }

    pub fn hash(&self, pairs: Vec<HashPair>) -> Hash {
        Hash {
            origin: Origin::Synthetic,
            pairs,
        }
    }

    pub fn pair(&self, key: impl Into<String>, value: impl Into<Expression>) -> HashPair {
        HashPair {
            origin: Origin::Synthetic,
            key: key.into(),
            value: value.into(),
        }
    }

    /// `<tag attributes>children</tag>`
    pub fn element(
        &self,
        tag: impl Into<String>,
        attributes: Vec<AttrNode>,
        children: Vec<Statement>,
    ) -> ElementNode {
        ElementNode {
            origin: Origin::Synthetic,
            tag: tag.into(),
            attributes,
            block_params: Vec::new(),
            children,
            self_closing: false,
        }
    }

    /// `<tag attributes />`
    pub fn self_closing_element(
        &self,
        tag: impl Into<String>,
        attributes: Vec<AttrNode>,
    ) -> ElementNode {
        ElementNode {
            self_closing: true,
            ..self.element(tag, attributes, Vec::new())
        }
    }

    /// `name=value`. An empty text value prints as a bare `name`.
    pub fn attr(&self, name: impl Into<String>, value: impl Into<AttrValue>) -> AttrNode {
        AttrNode {
            origin: Origin::Synthetic,
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn concat(&self, parts: Vec<ConcatPart>) -> ConcatStatement {
        ConcatStatement {
            origin: Origin::Synthetic,
            parts,
        }
    }

    /// `<!--value-->`
    pub fn comment(&self, value: impl Into<String>) -> CommentStatement {
        CommentStatement {
            origin: Origin::Synthetic,
            value: value.into(),
        }
    }

    /// `{{!value}}`
    pub fn mustache_comment(&self, value: impl Into<String>) -> MustacheCommentStatement {
        MustacheCommentStatement {
            origin: Origin::Synthetic,
            value: value.into(),
        }
    }
}
