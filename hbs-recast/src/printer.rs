//! Diff and reprint
//!
//! The printer walks the current tree alongside a snapshot of the tree as it
//! was parsed, looked up by [`NodeId`]. For each node it picks the cheapest
//! faithful output:
//!
//! 1. an original node equal to its snapshot is copied from the source;
//! 2. an original node whose children changed is patched: the text between
//!    its original children is copied and only the children are reprinted;
//! 3. a synthetic node, or an original one whose own fields changed, is
//!    rendered with canonical punctuation, its children again going through
//!    these rules.
//!
//! Whitespace between the members of params, hash pairs and attributes
//! belongs to the member that follows it, so removing a member drops the
//! whitespace in front of it and inserting one adds a single separator.
//!
//! ```rust
//! use hbs_recast::{Options, parse, print};
//! use hbs_recast::ast::Statement;
//!
//! let src = "{{foo a=1  b=2  c=3}}";
//! let original = parse(src).unwrap();
//! let mut current = original.clone();
//! let Statement::Mustache(mustache) = &mut current.body[0] else { panic!() };
//! mustache.hash.pairs.remove(1);
//! let out = print(src, &original, &current, &Options::default()).unwrap();
//! assert_eq!(out, "{{foo a=1  c=3}}");
//! ```

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::ast::{
    AstNode, AttrNode, AttrValue, BlockStatement, CommentStatement, ConcatPart, ConcatStatement,
    ElementNode, Expression, Hash, HashPair, MustacheCommentStatement, MustacheStatement, NodeId,
    NodeKind, NodeRef, PathExpression, Program, Span, Spanned, Statement, SubExpression, TextNode,
};
use crate::error::{Error, Result};

/// Printer settings for rendered output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Inserted between a new param, pair or attribute and its predecessor.
    pub separator: String,
    /// Quote for attribute values that have none to keep.
    pub quote: char,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            separator: " ".to_string(),
            quote: '"',
        }
    }
}

/// Prints `current` against the `original` tree parsed from `source`.
pub fn print(
    source: &str,
    original: &Program,
    current: &Program,
    options: &Options,
) -> Result<String> {
    let printer = Printer::new(source, original, options);
    let mut out = String::with_capacity(source.len());
    printer.program(current, &mut out)?;
    debug!(input = source.len(), output = out.len(), "printed template");
    Ok(out)
}

/// Copy cursor over the source of a node being patched.
struct Patch<'p> {
    source: &'p str,
    pos: usize,
}

impl<'p> Patch<'p> {
    fn new(source: &'p str, start: usize) -> Self {
        Self { source, pos: start }
    }

    fn copy_to(&mut self, end: usize, out: &mut String) {
        if end > self.pos {
            out.push_str(&self.source[self.pos..end]);
            self.pos = end;
        }
    }

    fn skip_to(&mut self, end: usize) {
        self.pos = self.pos.max(end);
    }
}

/// Callee, params and hash, shared by mustaches, blocks and sub-expressions.
#[derive(Clone, Copy)]
struct Call<'n> {
    path: &'n Expression,
    params: &'n [Expression],
    hash: &'n Hash,
}

impl<'n> Call<'n> {
    fn mustache(node: &'n MustacheStatement) -> Self {
        Self {
            path: &node.path,
            params: &node.params,
            hash: &node.hash,
        }
    }

    fn block(node: &'n BlockStatement) -> Self {
        Self {
            path: &node.path,
            params: &node.params,
            hash: &node.hash,
        }
    }

    fn sexpr(node: &'n SubExpression) -> Self {
        Self {
            path: &node.path,
            params: &node.params,
            hash: &node.hash,
        }
    }
}

struct Printer<'p> {
    source: &'p str,
    snapshot: HashMap<NodeId, NodeRef<'p>>,
    /// Original sub-expressions, keyed by the id of their callee.
    callees: HashMap<NodeId, &'p SubExpression>,
    options: &'p Options,
}

impl<'p> Printer<'p> {
    fn new(source: &'p str, original: &'p Program, options: &'p Options) -> Self {
        let nodes = NodeRef::Program(original).descendants();
        let callees = nodes
            .iter()
            .filter_map(|node| match node {
                NodeRef::SubExpression(sexpr) => Some((sexpr.path.origin().id()?, *sexpr)),
                _ => None,
            })
            .collect();
        let snapshot = nodes
            .into_iter()
            .filter_map(|node| Some((node.origin().id()?, node)))
            .collect();
        Self {
            source,
            snapshot,
            callees,
            options,
        }
    }

    /// The snapshot of `node`, with its span, if `node` came from the parser.
    fn original<T: AstNode>(&self, node: &T) -> Option<(&'p T, Span)> {
        let id = node.origin().id()?;
        let original = T::cast_ref(*self.snapshot.get(&id)?)?;
        Some((original, original.span()?))
    }

    fn verbatim(&self, span: Span, out: &mut String) {
        out.push_str(&self.source[span.start..span.end]);
    }

    fn fallback(&self, kind: NodeKind, span: Span) {
        debug!(%kind, start = span.start, end = span.end, "fields changed, rendering from scratch");
    }

    fn child_span(&self, kind: NodeKind, child: &impl Spanned) -> Result<Span> {
        child
            .span()
            .ok_or_else(|| Error::reconcile(kind, "original child has no span"))
    }

    fn owned_separator(&self, spans: &[Span], i: usize) -> &'p str {
        &self.source[spans[i - 1].end..spans[i].start]
    }

    /// Prints `print(current)` where the original child at `span` stood.
    fn replace(
        &self,
        patch: &mut Patch<'p>,
        span: Span,
        out: &mut String,
        print: impl FnOnce(&mut String) -> Result<()>,
    ) -> Result<()> {
        patch.copy_to(span.start, out);
        print(out)?;
        patch.skip_to(span.end);
        Ok(())
    }

    /// Reconciles a list of children against its original.
    ///
    /// `anchor` is where members go when the original list was empty, and
    /// `spaced` lists get the configured separator between new members.
    #[allow(clippy::too_many_arguments)]
    fn splice<T: Spanned>(
        &self,
        patch: &mut Patch<'p>,
        kind: NodeKind,
        original: &[T],
        current: &[T],
        anchor: usize,
        spaced: bool,
        out: &mut String,
        print: impl Fn(&T, &mut String) -> Result<()>,
    ) -> Result<()> {
        let spans = original
            .iter()
            .map(|item| self.child_span(kind, item))
            .collect::<Result<Vec<_>>>()?;
        let positions: HashMap<NodeId, usize> = original
            .iter()
            .enumerate()
            .filter_map(|(i, item)| Some((item.origin().id()?, i)))
            .collect();

        let mut survivors = HashSet::new();
        for item in current {
            let Some(id) = item.origin().id() else {
                continue;
            };
            let Some(&i) = positions.get(&id) else {
                return Err(Error::reconcile(
                    kind,
                    "a node from elsewhere in the template was moved into this list",
                ));
            };
            if !survivors.insert(i) {
                return Err(Error::reconcile(kind, "the same node appears twice in one list"));
            }
        }

        let default = if spaced {
            self.options.separator.as_str()
        } else {
            ""
        };
        patch.copy_to(spans.first().map_or(anchor, |first| first.start), out);
        for (j, item) in current.iter().enumerate() {
            let position = item.origin().id().and_then(|id| positions.get(&id).copied());
            let separator = match position {
                Some(i) if i > 0 => self.owned_separator(&spans, i),
                Some(_) if j > 0 => default,
                Some(_) => "",
                None if j == 0 && !original.is_empty() => "",
                None if j == 0 => default,
                None if j < original.len() && !survivors.contains(&j) => {
                    self.owned_separator(&spans, j)
                }
                None => default,
            };
            out.push_str(separator);
            print(item, out)?;
        }
        if let Some(last) = spans.last() {
            patch.skip_to(last.end);
        }
        Ok(())
    }

    fn program(&self, node: &Program, out: &mut String) -> Result<()> {
        let Some((original, span)) = self.original(node) else {
            for statement in &node.body {
                self.statement(statement, out)?;
            }
            return Ok(());
        };
        if original == node {
            self.verbatim(span, out);
            return Ok(());
        }
        let mut patch = Patch::new(self.source, span.start);
        self.splice(
            &mut patch,
            NodeKind::Program,
            &original.body,
            &node.body,
            span.start,
            false,
            out,
            |statement, out| self.statement(statement, out),
        )?;
        patch.copy_to(span.end, out);
        Ok(())
    }

    fn statement(&self, node: &Statement, out: &mut String) -> Result<()> {
        match node {
            Statement::Mustache(mustache) => self.mustache(mustache, out),
            Statement::Block(block) => self.block(block, out),
            Statement::Text(text) => {
                self.text(text, out);
                Ok(())
            }
            Statement::Element(element) => self.element(element, out),
            Statement::MustacheComment(comment) => {
                self.mustache_comment(comment, out);
                Ok(())
            }
            Statement::Comment(comment) => {
                self.comment(comment, out);
                Ok(())
            }
        }
    }

    fn expression(&self, node: &Expression, out: &mut String) -> Result<()> {
        match node {
            Expression::Path(path) => self.path(path, out),
            Expression::SubExpression(sexpr) => return self.sexpr(sexpr, out),
            Expression::String(string) => match self.original(string) {
                Some((original, span)) if original == string => self.verbatim(span, out),
                original => {
                    let quote = match original {
                        Some((_, span)) if self.source[span.start..].starts_with('\'') => '\'',
                        _ => '"',
                    };
                    out.push(quote);
                    out.push_str(&string.value.replace(quote, &format!("\\{quote}")));
                    out.push(quote);
                }
            },
            Expression::Number(number) => match self.original(number) {
                Some((original, span)) if original == number => self.verbatim(span, out),
                _ => out.push_str(&number.value.to_string()),
            },
            Expression::Boolean(boolean) => match self.original(boolean) {
                Some((original, span)) if original == boolean => self.verbatim(span, out),
                _ => out.push_str(if boolean.value { "true" } else { "false" }),
            },
        }
        Ok(())
    }

    fn path(&self, node: &PathExpression, out: &mut String) {
        match self.original(node) {
            Some((original, span)) if original == node => self.verbatim(span, out),
            _ => out.push_str(&path_text(node)),
        }
    }

    fn text(&self, node: &TextNode, out: &mut String) {
        match self.original(node) {
            Some((original, span)) if original == node => self.verbatim(span, out),
            _ => out.push_str(&node.chars),
        }
    }

    fn comment(&self, node: &CommentStatement, out: &mut String) {
        match self.original(node) {
            Some((original, span)) if original == node => self.verbatim(span, out),
            _ => {
                out.push_str("<!--");
                out.push_str(&node.value);
                out.push_str("-->");
            }
        }
    }

    fn mustache_comment(&self, node: &MustacheCommentStatement, out: &mut String) {
        match self.original(node) {
            Some((original, span)) if original == node => self.verbatim(span, out),
            _ if node.value.contains("}}") => {
                out.push_str("{{!--");
                out.push_str(&node.value);
                out.push_str("--}}");
            }
            _ => {
                out.push_str("{{!");
                out.push_str(&node.value);
                out.push_str("}}");
            }
        }
    }

    /// Patches the callee, params and hash of an original call in place.
    fn patch_call(
        &self,
        patch: &mut Patch<'p>,
        kind: NodeKind,
        original: Call<'p>,
        current: Call<'_>,
        out: &mut String,
    ) -> Result<()> {
        let path_span = self.child_span(kind, original.path)?;
        self.replace(patch, path_span, out, |out| self.expression(current.path, out))?;
        self.splice(
            patch,
            kind,
            original.params,
            current.params,
            path_span.end,
            true,
            out,
            |param, out| self.expression(param, out),
        )?;
        let hash_span = self.child_span(kind, original.hash)?;
        self.replace(patch, hash_span, out, |out| self.hash(current.hash, out))
    }

    /// The original sub-expression a call was assembled from: same callee,
    /// same hash, and no original params from anywhere else.
    fn moved_sexpr(&self, call: Call<'_>) -> Option<(&'p SubExpression, Span)> {
        let sexpr = *self.callees.get(&call.path.origin().id()?)?;
        if call.hash.origin().id()? != sexpr.hash.origin().id()? {
            return None;
        }
        let params: HashSet<NodeId> = sexpr
            .params
            .iter()
            .filter_map(|param| param.origin().id())
            .collect();
        let foreign = call
            .params
            .iter()
            .filter_map(|param| param.origin().id())
            .any(|id| !params.contains(&id));
        if foreign {
            return None;
        }
        Some((sexpr, sexpr.span()?))
    }

    fn render_call(&self, call: Call<'_>, out: &mut String) -> Result<()> {
        if let Some((sexpr, span)) = self.moved_sexpr(call) {
            // everything between the parentheses
            let mut patch = Patch::new(self.source, span.start + 1);
            self.patch_call(&mut patch, NodeKind::SubExpression, Call::sexpr(sexpr), call, out)?;
            patch.copy_to(span.end - 1, out);
            return Ok(());
        }
        self.expression(call.path, out)?;
        for param in call.params {
            out.push_str(&self.options.separator);
            self.expression(param, out)?;
        }
        if !call.hash.pairs.is_empty() {
            out.push_str(&self.options.separator);
            self.hash(call.hash, out)?;
        }
        Ok(())
    }

    fn mustache(&self, node: &MustacheStatement, out: &mut String) -> Result<()> {
        match self.original(node) {
            Some((original, span)) if original == node => {
                self.verbatim(span, out);
                Ok(())
            }
            Some((original, span)) if original.trusting == node.trusting => {
                let mut patch = Patch::new(self.source, span.start);
                self.patch_call(
                    &mut patch,
                    NodeKind::MustacheStatement,
                    Call::mustache(original),
                    Call::mustache(node),
                    out,
                )?;
                patch.copy_to(span.end, out);
                Ok(())
            }
            original => {
                if let Some((_, span)) = original {
                    self.fallback(NodeKind::MustacheStatement, span);
                }
                let (open, close) = if node.trusting {
                    ("{{{", "}}}")
                } else {
                    ("{{", "}}")
                };
                out.push_str(open);
                self.render_call(Call::mustache(node), out)?;
                out.push_str(close);
                Ok(())
            }
        }
    }

    fn sexpr(&self, node: &SubExpression, out: &mut String) -> Result<()> {
        match self.original(node) {
            Some((original, span)) if original == node => {
                self.verbatim(span, out);
                Ok(())
            }
            Some((original, span)) => {
                let mut patch = Patch::new(self.source, span.start);
                self.patch_call(
                    &mut patch,
                    NodeKind::SubExpression,
                    Call::sexpr(original),
                    Call::sexpr(node),
                    out,
                )?;
                patch.copy_to(span.end, out);
                Ok(())
            }
            None => {
                out.push('(');
                self.render_call(Call::sexpr(node), out)?;
                out.push(')');
                Ok(())
            }
        }
    }

    fn block(&self, node: &BlockStatement, out: &mut String) -> Result<()> {
        let name = block_name(&node.path)?;
        let original = match self.original(node) {
            Some((original, span)) if original == node => {
                self.verbatim(span, out);
                return Ok(());
            }
            Some((original, span)) if original.block_params == node.block_params => {
                (original, span)
            }
            original => {
                if let Some((_, span)) = original {
                    self.fallback(NodeKind::BlockStatement, span);
                }
                return self.render_block(node, out);
            }
        };
        let (original, span) = original;
        let kind = NodeKind::BlockStatement;
        let mut patch = Patch::new(self.source, span.start);
        self.patch_call(&mut patch, kind, Call::block(original), Call::block(node), out)?;

        let program_span = self.child_span(kind, &original.program)?;
        self.replace(&mut patch, program_span, out, |out| {
            self.program(&node.program, out)
        })?;
        match (&original.inverse, &node.inverse) {
            (Some(before), Some(after)) => {
                let inverse_span = self.child_span(kind, before)?;
                self.replace(&mut patch, inverse_span, out, |out| self.program(after, out))?;
            }
            (Some(before), None) => {
                let inverse_span = self.child_span(kind, before)?;
                patch.skip_to(inverse_span.end);
            }
            (None, Some(after)) => {
                out.push_str("{{else}}");
                self.program(after, out)?;
            }
            (None, None) => {}
        }

        let tail = &self.source[patch.pos.min(span.end)..span.end];
        if block_name(&original.path)? != name {
            out.push_str(&rename_close_tag(tail, &name));
        } else {
            out.push_str(tail);
        }
        Ok(())
    }

    fn render_block(&self, node: &BlockStatement, out: &mut String) -> Result<()> {
        let name = block_name(&node.path)?;
        out.push_str("{{#");
        self.render_call(Call::block(node), out)?;
        render_block_params(&node.block_params, out);
        out.push_str("}}");
        self.program(&node.program, out)?;
        if let Some(inverse) = &node.inverse {
            out.push_str("{{else}}");
            self.program(inverse, out)?;
        }
        out.push_str("{{/");
        out.push_str(&name);
        out.push_str("}}");
        Ok(())
    }

    fn hash(&self, node: &Hash, out: &mut String) -> Result<()> {
        match self.original(node) {
            Some((original, span)) if original == node => {
                self.verbatim(span, out);
                Ok(())
            }
            Some((original, span)) => {
                let mut patch = Patch::new(self.source, span.start);
                self.splice(
                    &mut patch,
                    NodeKind::Hash,
                    &original.pairs,
                    &node.pairs,
                    span.start,
                    true,
                    out,
                    |pair, out| self.pair(pair, out),
                )?;
                patch.copy_to(span.end, out);
                Ok(())
            }
            None => {
                for (i, pair) in node.pairs.iter().enumerate() {
                    if i > 0 {
                        out.push_str(&self.options.separator);
                    }
                    self.pair(pair, out)?;
                }
                Ok(())
            }
        }
    }

    fn pair(&self, node: &HashPair, out: &mut String) -> Result<()> {
        match self.original(node) {
            Some((original, span)) if original == node => {
                self.verbatim(span, out);
                Ok(())
            }
            Some((original, span)) if original.key == node.key => {
                let mut patch = Patch::new(self.source, span.start);
                let value_span = self.child_span(NodeKind::HashPair, &original.value)?;
                self.replace(&mut patch, value_span, out, |out| {
                    self.expression(&node.value, out)
                })?;
                patch.copy_to(span.end, out);
                Ok(())
            }
            original => {
                if let Some((_, span)) = original {
                    self.fallback(NodeKind::HashPair, span);
                }
                out.push_str(&node.key);
                out.push('=');
                self.expression(&node.value, out)
            }
        }
    }

    fn element(&self, node: &ElementNode, out: &mut String) -> Result<()> {
        let original = match self.original(node) {
            Some((original, span)) if original == node => {
                self.verbatim(span, out);
                return Ok(());
            }
            Some((original, span))
                if original.tag == node.tag
                    && original.block_params == node.block_params
                    && original.self_closing == node.self_closing
                    && (original.has_body() || node.children.is_empty()) =>
            {
                (original, span)
            }
            original => {
                if let Some((_, span)) = original {
                    self.fallback(NodeKind::ElementNode, span);
                }
                return self.render_element(node, out);
            }
        };
        let (original, span) = original;
        let kind = NodeKind::ElementNode;
        let mut patch = Patch::new(self.source, span.start);
        let tag_end = span.start + 1 + original.tag.len();
        self.splice(
            &mut patch,
            kind,
            &original.attributes,
            &node.attributes,
            tag_end,
            true,
            out,
            |attr, out| self.attr(attr, out),
        )?;
        if original.has_body() {
            let scan_from = match original.attributes.last() {
                Some(last) => self.child_span(kind, last)?.end,
                None => tag_end,
            };
            let open_end = self.source[scan_from..span.end]
                .find('>')
                .map(|at| scan_from + at + 1)
                .ok_or_else(|| Error::reconcile(kind, "cannot find the end of the open tag"))?;
            self.splice(
                &mut patch,
                kind,
                &original.children,
                &node.children,
                open_end,
                false,
                out,
                |child, out| self.statement(child, out),
            )?;
        }
        patch.copy_to(span.end, out);
        Ok(())
    }

    fn render_element(&self, node: &ElementNode, out: &mut String) -> Result<()> {
        out.push('<');
        out.push_str(&node.tag);
        for attr in &node.attributes {
            out.push_str(&self.options.separator);
            self.attr(attr, out)?;
        }
        render_block_params(&node.block_params, out);
        if node.children.is_empty() && node.self_closing {
            out.push_str(" />");
        } else if node.children.is_empty() && node.is_void() {
            out.push('>');
        } else {
            out.push('>');
            for child in &node.children {
                self.statement(child, out)?;
            }
            out.push_str("</");
            out.push_str(&node.tag);
            out.push('>');
        }
        Ok(())
    }

    fn attr(&self, node: &AttrNode, out: &mut String) -> Result<()> {
        match self.original(node) {
            Some((original, span)) if original == node => {
                self.verbatim(span, out);
                Ok(())
            }
            Some((original, span)) if original.name == node.name => {
                let value_span = self.child_span(NodeKind::AttrNode, &original.value)?;
                let quote = self.source[value_span.start..]
                    .chars()
                    .next()
                    .filter(|c| *c == '"' || *c == '\'')
                    .filter(|_| !value_span.is_empty());
                let mut value = String::new();
                self.attr_value(&node.value, quote, &mut value)?;

                let mut patch = Patch::new(self.source, span.start);
                if value.is_empty() {
                    patch.copy_to(span.start + original.name.len(), out);
                    patch.skip_to(value_span.end);
                } else if value_span.is_empty() {
                    patch.copy_to(value_span.start, out);
                    out.push('=');
                    out.push_str(&value);
                } else {
                    patch.copy_to(value_span.start, out);
                    out.push_str(&value);
                    patch.skip_to(value_span.end);
                }
                patch.copy_to(span.end, out);
                Ok(())
            }
            original => {
                if let Some((_, span)) = original {
                    self.fallback(NodeKind::AttrNode, span);
                }
                let mut value = String::new();
                self.attr_value(&node.value, None, &mut value)?;
                out.push_str(&node.name);
                if !value.is_empty() {
                    out.push('=');
                    out.push_str(&value);
                }
                Ok(())
            }
        }
    }

    /// Prints an attribute value; text that needs quoting uses `quote` when
    /// given, the configured quote otherwise.
    fn attr_value(&self, node: &AttrValue, quote: Option<char>, out: &mut String) -> Result<()> {
        match node {
            AttrValue::Text(text) => {
                match self.original(text) {
                    Some((original, span)) if original == text => self.verbatim(span, out),
                    _ if text.chars.is_empty() => {}
                    _ => {
                        let quote = pick_quote(&text.chars, quote.unwrap_or(self.options.quote));
                        out.push(quote);
                        out.push_str(&text.chars);
                        out.push(quote);
                    }
                }
                Ok(())
            }
            AttrValue::Mustache(mustache) => self.mustache(mustache, out),
            AttrValue::Concat(concat) => self.concat(concat, out),
        }
    }

    fn concat(&self, node: &ConcatStatement, out: &mut String) -> Result<()> {
        match self.original(node) {
            Some((original, span)) if original == node => {
                self.verbatim(span, out);
                Ok(())
            }
            Some((original, span)) => {
                let mut patch = Patch::new(self.source, span.start);
                self.splice(
                    &mut patch,
                    NodeKind::ConcatStatement,
                    &original.parts,
                    &node.parts,
                    span.start + 1,
                    false,
                    out,
                    |part, out| self.concat_part(part, out),
                )?;
                patch.copy_to(span.end, out);
                Ok(())
            }
            None => {
                let quote = self.options.quote;
                out.push(quote);
                for part in &node.parts {
                    self.concat_part(part, out)?;
                }
                out.push(quote);
                Ok(())
            }
        }
    }

    fn concat_part(&self, node: &ConcatPart, out: &mut String) -> Result<()> {
        match node {
            ConcatPart::Text(text) => {
                self.text(text, out);
                Ok(())
            }
            ConcatPart::Mustache(mustache) => self.mustache(mustache, out),
        }
    }
}

/// The name a block is closed with. Only a path can close a block.
fn block_name(path: &Expression) -> Result<Cow<'_, str>> {
    match path {
        Expression::Path(path) => Ok(path_text(path)),
        other => Err(Error::SlotMismatch {
            slot: "path",
            expected: "PathExpression",
            found: other.kind(),
        }),
    }
}

/// `original`, unless `parts`, `this` or `data` were edited away from what
/// it spells.
fn path_text(node: &PathExpression) -> Cow<'_, str> {
    let spelled = PathExpression::new(node.original.as_str());
    if spelled.parts == node.parts && spelled.this == node.this && spelled.data == node.data {
        return Cow::Borrowed(&node.original);
    }
    let mut text = String::new();
    if node.data {
        text.push('@');
    }
    if node.this {
        text.push_str("this");
        if !node.parts.is_empty() {
            text.push('.');
        }
    }
    text.push_str(&node.parts.join("."));
    Cow::Owned(text)
}

fn render_block_params(names: &[String], out: &mut String) {
    if !names.is_empty() {
        out.push_str(" as |");
        out.push_str(&names.join(" "));
        out.push('|');
    }
}

/// Replaces the helper name in a `{{/name}}` close tag at the end of `tail`.
fn rename_close_tag(tail: &str, name: &str) -> String {
    let Some(open) = tail.rfind("{{") else {
        return tail.to_string();
    };
    let after = &tail[open + 2..];
    let trimmed = after.trim_start_matches(|c: char| c == '~' || c == '/' || c.is_whitespace());
    let start = open + 2 + (after.len() - trimmed.len());
    let end = start
        + trimmed
            .find(|c: char| c.is_whitespace() || c == '~' || c == '}')
            .unwrap_or(trimmed.len());
    format!("{}{}{}", &tail[..start], name, &tail[end..])
}

/// Switches to the other quote when `text` contains the preferred one.
fn pick_quote(text: &str, preferred: char) -> char {
    let other = if preferred == '"' { '\'' } else { '"' };
    if text.contains(preferred) && !text.contains(other) {
        other
    } else {
        preferred
    }
}
