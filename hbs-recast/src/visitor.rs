//! Depth-first traversal with per-kind handlers
//!
//! A [`Visitor`] maps a [`NodeKind`] to a handler. The walk is pre-order and
//! follows the document: a block visits its path, params, hash, program and
//! inverse in that order, an element its attributes and then its children.
//!
//! A handler may:
//! - decline with `Ok(None)`, and the walk descends into the node's children;
//! - mutate the node in place, keeping its identity;
//! - return `Ok(Some(node))`, which takes the visited node's place. The walk
//!   then descends into the replacement's children, not into the replacement
//!   itself.
//!
//! ```rust
//! use hbs_recast::ast::PathExpression;
//! use hbs_recast::{Env, Visitor, transform};
//!
//! let out = transform("{{name}}", |_| {
//!     Visitor::new().on(|path: &mut PathExpression, env: &Env| {
//!         Ok(Some(env.builders().path(&format!("this.{}", path.original)).into()))
//!     })
//! })
//! .unwrap();
//! assert_eq!(out.code, "{{this.name}}");
//! ```

use std::collections::HashMap;

use tracing::trace;

use crate::ast::{AstNode, Expression, Node, NodeKind, NodeMut, Program, Slot};
use crate::builders::Builders;
use crate::error::{BoxError, Error, Result};

/// What a handler returns: a replacement node, or `None` to keep the visited one.
pub type HandlerResult = std::result::Result<Option<Node>, BoxError>;

type Handler<'a> = Box<dyn FnMut(NodeMut<'_>, &Env<'_>) -> HandlerResult + 'a>;

/// Passed to the plugin factory and to every handler.
#[derive(Debug, Clone, Copy)]
pub struct Env<'s> {
    source: &'s str,
    builders: Builders,
}

impl<'s> Env<'s> {
    pub fn new(source: &'s str) -> Self {
        Self {
            source,
            builders: Builders,
        }
    }

    /// The template being transformed.
    pub fn source(&self) -> &'s str {
        self.source
    }

    pub fn builders(&self) -> &Builders {
        &self.builders
    }
}

/// Handler table, keyed by node kind.
#[derive(Default)]
pub struct Visitor<'a> {
    handlers: HashMap<NodeKind, Handler<'a>>,
}

impl<'a> Visitor<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the handler for `T`, replacing any earlier one.
    pub fn on<T: AstNode>(
        mut self,
        mut handler: impl FnMut(&mut T, &Env<'_>) -> HandlerResult + 'a,
    ) -> Self {
        let handler: Handler<'a> = Box::new(move |node: NodeMut<'_>, env: &Env<'_>| {
            match T::cast_mut(node) {
                Some(node) => handler(node, env),
                None => Ok(None),
            }
        });
        self.handlers.insert(T::KIND, handler);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Walks the whole tree once, starting at the root program.
    pub fn walk(&mut self, root: &mut Program, env: &Env<'_>) -> Result<()> {
        self.visit(root, "root", env)
    }

    fn visit<S: Slot>(&mut self, slot: &mut S, name: &'static str, env: &Env<'_>) -> Result<()> {
        let kind = slot.kind();
        if let Some(handler) = self.handlers.get_mut(&kind) {
            trace!(%kind, slot = name, "invoking handler");
            let replacement =
                handler(slot.node_mut(), env).map_err(|source| Error::Handler { kind, source })?;
            if let Some(node) = replacement {
                trace!(%kind, replacement = %node.kind(), slot = name, "replacing node");
                *slot = S::try_from(node).map_err(|node| Error::SlotMismatch {
                    slot: name,
                    expected: S::EXPECTED,
                    found: node.kind(),
                })?;
            }
        }
        self.walk_children(slot.node_mut(), env)
    }

    fn walk_children(&mut self, node: NodeMut<'_>, env: &Env<'_>) -> Result<()> {
        match node {
            NodeMut::Program(program) => {
                for statement in &mut program.body {
                    self.visit(statement, "body", env)?;
                }
            }
            NodeMut::BlockStatement(block) => {
                self.visit(&mut block.path, "path", env)?;
                if !matches!(block.path, Expression::Path(_)) {
                    return Err(Error::SlotMismatch {
                        slot: "path",
                        expected: "PathExpression",
                        found: block.path.kind(),
                    });
                }
                for param in &mut block.params {
                    self.visit(param, "params", env)?;
                }
                self.visit(&mut block.hash, "hash", env)?;
                self.visit(&mut block.program, "program", env)?;
                if let Some(inverse) = &mut block.inverse {
                    self.visit(inverse, "inverse", env)?;
                }
            }
            NodeMut::MustacheStatement(mustache) => {
                self.visit(&mut mustache.path, "path", env)?;
                for param in &mut mustache.params {
                    self.visit(param, "params", env)?;
                }
                self.visit(&mut mustache.hash, "hash", env)?;
            }
            NodeMut::SubExpression(sexpr) => {
                self.visit(&mut sexpr.path, "path", env)?;
                for param in &mut sexpr.params {
                    self.visit(param, "params", env)?;
                }
                self.visit(&mut sexpr.hash, "hash", env)?;
            }
            NodeMut::Hash(hash) => {
                for pair in &mut hash.pairs {
                    self.visit(pair, "pairs", env)?;
                }
            }
            NodeMut::HashPair(pair) => self.visit(&mut pair.value, "value", env)?,
            NodeMut::ElementNode(element) => {
                for attr in &mut element.attributes {
                    self.visit(attr, "attributes", env)?;
                }
                for child in &mut element.children {
                    self.visit(child, "children", env)?;
                }
            }
            NodeMut::AttrNode(attr) => self.visit(&mut attr.value, "value", env)?,
            NodeMut::ConcatStatement(concat) => {
                for part in &mut concat.parts {
                    self.visit(part, "parts", env)?;
                }
            }
            NodeMut::MustacheCommentStatement(_)
            | NodeMut::PathExpression(_)
            | NodeMut::StringLiteral(_)
            | NodeMut::NumberLiteral(_)
            | NodeMut::BooleanLiteral(_)
            | NodeMut::TextNode(_)
            | NodeMut::CommentStatement(_) => {}
        }
        Ok(())
    }
}
