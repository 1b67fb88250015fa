//! Span-annotated syntax tree
//!
//! Every node carries an [`Origin`]: either the slice of the source buffer it
//! was parsed from, or [`Origin::Synthetic`] for nodes built through
//! [`Builders`](crate::Builders). The printer relies on that distinction to
//! decide what can be copied verbatim and what has to be rendered.
//!
//! Child slots are typed. A mustache callee is an [`Expression`], a program
//! body is a list of [`Statement`]s, an attribute value is an [`AttrValue`]
//! and the parts of a quoted attribute are [`ConcatPart`]s. Visitor handlers
//! return a plain [`Node`], which is converted back into the slot type when
//! it is put in place.

use std::borrow::{Borrow, BorrowMut};
use std::fmt;

/// Byte offsets into the original source buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Identity of a parsed node. Only the parser mints these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn new(raw: u32) -> Self {
        Self(raw)
    }
}

/// Where a node came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Origin {
    /// Parsed from `span` of the source buffer.
    Original { id: NodeId, span: Span },
    /// Built by a plugin, rendered from scratch.
    #[default]
    Synthetic,
}

impl Origin {
    pub fn span(&self) -> Option<Span> {
        match self {
            Origin::Original { span, .. } => Some(*span),
            Origin::Synthetic => None,
        }
    }

    pub fn id(&self) -> Option<NodeId> {
        match self {
            Origin::Original { id, .. } => Some(*id),
            Origin::Synthetic => None,
        }
    }

    pub fn is_synthetic(&self) -> bool {
        matches!(self, Origin::Synthetic)
    }
}

/// Anything that carries an [`Origin`].
pub trait Spanned {
    fn origin(&self) -> &Origin;

    fn span(&self) -> Option<Span> {
        self.origin().span()
    }

    fn is_synthetic(&self) -> bool {
        self.origin().is_synthetic()
    }
}

/// Node struct types, one per [`NodeKind`].
pub trait AstNode: Spanned + Sized + 'static {
    const KIND: NodeKind;

    fn cast_mut(node: NodeMut<'_>) -> Option<&mut Self>;

    fn cast_ref(node: NodeRef<'_>) -> Option<&Self>;
}

/// A child position a visitor can write a replacement into.
pub(crate) trait Slot: Sized + TryFrom<Node, Error = Node> {
    /// Kinds accepted by the slot, for error messages.
    const EXPECTED: &'static str;

    fn kind(&self) -> NodeKind;

    fn node_mut(&mut self) -> NodeMut<'_>;
}

macro_rules! node_kinds {
    ($($kind:ident),* $(,)?) => {
        /// The variant tag of a node.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum NodeKind {
            $($kind),*
        }

        impl NodeKind {
            pub fn as_str(self) -> &'static str {
                match self {
                    $(NodeKind::$kind => stringify!($kind)),*
                }
            }
        }

        /// Any node, owned.
        #[derive(Debug, Clone, PartialEq)]
        pub enum Node {
            $($kind($kind)),*
        }

        impl Node {
            pub fn kind(&self) -> NodeKind {
                match self {
                    $(Node::$kind(_) => NodeKind::$kind),*
                }
            }

            pub fn as_node_ref(&self) -> NodeRef<'_> {
                match self {
                    $(Node::$kind(node) => NodeRef::$kind(node)),*
                }
            }
        }

        impl Spanned for Node {
            fn origin(&self) -> &Origin {
                match self {
                    $(Node::$kind(node) => &node.origin),*
                }
            }
        }

        /// Mutable access to a node inside the tree, handed to visitor handlers.
        pub enum NodeMut<'a> {
            $($kind(&'a mut $kind)),*
        }

        impl NodeMut<'_> {
            pub fn kind(&self) -> NodeKind {
                match self {
                    $(NodeMut::$kind(_) => NodeKind::$kind),*
                }
            }
        }

        /// Shared access to a node inside the tree.
        #[derive(Debug, Clone, Copy)]
        pub enum NodeRef<'a> {
            $($kind(&'a $kind)),*
        }

        impl<'a> NodeRef<'a> {
            pub fn kind(self) -> NodeKind {
                match self {
                    $(NodeRef::$kind(_) => NodeKind::$kind),*
                }
            }

            pub fn origin(self) -> &'a Origin {
                match self {
                    $(NodeRef::$kind(node) => &node.origin),*
                }
            }
        }

        $(
            impl Spanned for $kind {
                fn origin(&self) -> &Origin {
                    &self.origin
                }
            }

            impl AstNode for $kind {
                const KIND: NodeKind = NodeKind::$kind;

                #[allow(unreachable_patterns)]
                fn cast_mut(node: NodeMut<'_>) -> Option<&mut Self> {
                    match node {
                        NodeMut::$kind(node) => Some(node),
                        _ => None,
                    }
                }

                #[allow(unreachable_patterns)]
                fn cast_ref(node: NodeRef<'_>) -> Option<&Self> {
                    match node {
                        NodeRef::$kind(node) => Some(node),
                        _ => None,
                    }
                }
            }

            impl From<$kind> for Node {
                fn from(node: $kind) -> Self {
                    Node::$kind(node)
                }
            }

            impl TryFrom<Node> for $kind {
                type Error = Node;

                #[allow(unreachable_patterns)]
                fn try_from(node: Node) -> Result<Self, Node> {
                    match node {
                        Node::$kind(node) => Ok(node),
                        other => Err(other),
                    }
                }
            }

            impl Slot for $kind {
                const EXPECTED: &'static str = stringify!($kind);

                fn kind(&self) -> NodeKind {
                    NodeKind::$kind
                }

                fn node_mut(&mut self) -> NodeMut<'_> {
                    NodeMut::$kind(self)
                }
            }
        )*
    };
}

node_kinds! {
    Program,
    BlockStatement,
    MustacheStatement,
    MustacheCommentStatement,
    SubExpression,
    PathExpression,
    Hash,
    HashPair,
    StringLiteral,
    NumberLiteral,
    BooleanLiteral,
    TextNode,
    ElementNode,
    AttrNode,
    ConcatStatement,
    CommentStatement,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Box<SubExpression>> for Node {
    fn from(node: Box<SubExpression>) -> Self {
        Node::SubExpression(*node)
    }
}

impl From<Box<BlockStatement>> for Node {
    fn from(node: Box<BlockStatement>) -> Self {
        Node::BlockStatement(*node)
    }
}

impl From<Box<ElementNode>> for Node {
    fn from(node: Box<ElementNode>) -> Self {
        Node::ElementNode(*node)
    }
}

macro_rules! slot_enum {
    (
        $(#[$meta:meta])*
        $name:ident($expected:literal) {
            $($variant:ident($ty:ty) => $kind:ident),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub enum $name {
            $($variant($ty)),*
        }

        impl $name {
            pub fn kind(&self) -> NodeKind {
                match self {
                    $($name::$variant(_) => NodeKind::$kind),*
                }
            }

            pub fn as_node_ref(&self) -> NodeRef<'_> {
                match self {
                    $($name::$variant(node) => NodeRef::$kind(Borrow::borrow(node))),*
                }
            }

            pub fn as_node_mut(&mut self) -> NodeMut<'_> {
                match self {
                    $($name::$variant(node) => NodeMut::$kind(BorrowMut::borrow_mut(node))),*
                }
            }
        }

        impl Spanned for $name {
            fn origin(&self) -> &Origin {
                match self {
                    $($name::$variant(node) => &node.origin),*
                }
            }
        }

        $(
            impl From<$kind> for $name {
                fn from(node: $kind) -> Self {
                    $name::$variant(node.into())
                }
            }
        )*

        impl From<$name> for Node {
            fn from(slot: $name) -> Self {
                match slot {
                    $($name::$variant(node) => Node::from(node)),*
                }
            }
        }

        impl TryFrom<Node> for $name {
            type Error = Node;

            fn try_from(node: Node) -> Result<Self, Node> {
                match node {
                    $(Node::$kind(node) => Ok($name::$variant(node.into())),)*
                    other => Err(other),
                }
            }
        }

        impl Slot for $name {
            const EXPECTED: &'static str = $expected;

            fn kind(&self) -> NodeKind {
                $name::kind(self)
            }

            fn node_mut(&mut self) -> NodeMut<'_> {
                self.as_node_mut()
            }
        }
    };
}

slot_enum! {
    /// Callees, positional params and hash values.
    Expression("PathExpression, SubExpression or a literal") {
        Path(PathExpression) => PathExpression,
        SubExpression(Box<SubExpression>) => SubExpression,
        String(StringLiteral) => StringLiteral,
        Number(NumberLiteral) => NumberLiteral,
        Boolean(BooleanLiteral) => BooleanLiteral,
    }
}

slot_enum! {
    /// Members of a program body or of an element's children.
    Statement("a statement, text, element or comment") {
        Mustache(MustacheStatement) => MustacheStatement,
        Block(Box<BlockStatement>) => BlockStatement,
        Text(TextNode) => TextNode,
        Element(Box<ElementNode>) => ElementNode,
        MustacheComment(MustacheCommentStatement) => MustacheCommentStatement,
        Comment(CommentStatement) => CommentStatement,
    }
}

slot_enum! {
    /// The value of an element attribute.
    AttrValue("TextNode, MustacheStatement or ConcatStatement") {
        Text(TextNode) => TextNode,
        Mustache(MustacheStatement) => MustacheStatement,
        Concat(ConcatStatement) => ConcatStatement,
    }
}

slot_enum! {
    /// A piece of a quoted attribute value.
    ConcatPart("TextNode or MustacheStatement") {
        Text(TextNode) => TextNode,
        Mustache(MustacheStatement) => MustacheStatement,
    }
}

impl From<&str> for Expression {
    fn from(original: &str) -> Self {
        Expression::Path(PathExpression::new(original))
    }
}

/// A sequence of statements: the template root, a block body or an `{{else}}` body.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub origin: Origin,
    pub body: Vec<Statement>,
}

/// `{{#path params hash as |block_params|}}program{{else}}inverse{{/path}}`
#[derive(Debug, Clone, PartialEq)]
pub struct BlockStatement {
    pub origin: Origin,
    pub path: Expression,
    pub params: Vec<Expression>,
    pub hash: Hash,
    pub block_params: Vec<String>,
    pub program: Program,
    pub inverse: Option<Program>,
}

/// `{{path params hash}}`, or `{{{...}}}` when `trusting`.
#[derive(Debug, Clone, PartialEq)]
pub struct MustacheStatement {
    pub origin: Origin,
    pub path: Expression,
    pub params: Vec<Expression>,
    pub hash: Hash,
    pub trusting: bool,
}

/// `{{! value }}` or `{{!-- value --}}`
#[derive(Debug, Clone, PartialEq)]
pub struct MustacheCommentStatement {
    pub origin: Origin,
    pub value: String,
}

/// `(path params hash)`
#[derive(Debug, Clone, PartialEq)]
pub struct SubExpression {
    pub origin: Origin,
    pub path: Expression,
    pub params: Vec<Expression>,
    pub hash: Hash,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PathExpression {
    pub origin: Origin,
    /// The path exactly as written, e.g. `this.foo.bar`. Printed as is unless
    /// `parts`, `this` or `data` were edited to disagree with it.
    pub original: String,
    /// Written with a leading `this`.
    pub this: bool,
    /// Written with a leading `@`.
    pub data: bool,
    pub parts: Vec<String>,
}

impl PathExpression {
    /// Splits `original` into its canonical parts.
    pub fn new(original: impl Into<String>) -> Self {
        let original = original.into();
        let (data, rest) = match original.strip_prefix('@') {
            Some(rest) => (true, rest),
            None => (false, original.as_str()),
        };
        let mut parts: Vec<String> = rest
            .split(['.', '/'])
            .filter(|part| !part.is_empty())
            .map(String::from)
            .collect();
        let this = !data && parts.first().is_some_and(|head| head == "this");
        if this {
            parts.remove(0);
        }
        Self {
            origin: Origin::Synthetic,
            original,
            this,
            data,
            parts,
        }
    }
}

/// The `key=value` arguments of a call. Present, possibly empty, on every call.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Hash {
    pub origin: Origin,
    pub pairs: Vec<HashPair>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HashPair {
    pub origin: Origin,
    pub key: String,
    pub value: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StringLiteral {
    pub origin: Origin,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NumberLiteral {
    pub origin: Origin,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BooleanLiteral {
    pub origin: Origin,
    pub value: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextNode {
    pub origin: Origin,
    pub chars: String,
}

/// `<tag attributes as |block_params|>children</tag>` or `<tag attributes />`
#[derive(Debug, Clone, PartialEq)]
pub struct ElementNode {
    pub origin: Origin,
    pub tag: String,
    pub attributes: Vec<AttrNode>,
    pub block_params: Vec<String>,
    pub children: Vec<Statement>,
    pub self_closing: bool,
}

impl ElementNode {
    /// HTML elements that never have a close tag.
    pub fn is_void(&self) -> bool {
        matches!(
            self.tag.as_str(),
            "area"
                | "base"
                | "br"
                | "col"
                | "embed"
                | "hr"
                | "img"
                | "input"
                | "link"
                | "meta"
                | "param"
                | "source"
                | "track"
                | "wbr"
        )
    }

    /// Whether the element has a body and a close tag.
    pub fn has_body(&self) -> bool {
        !self.self_closing && !self.is_void()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttrNode {
    pub origin: Origin,
    pub name: String,
    pub value: AttrValue,
}

/// A quoted attribute value mixing text and mustaches: `class="a {{b}}"`.
#[derive(Debug, Clone, PartialEq)]
pub struct ConcatStatement {
    pub origin: Origin,
    pub parts: Vec<ConcatPart>,
}

/// `<!-- value -->`
#[derive(Debug, Clone, PartialEq)]
pub struct CommentStatement {
    pub origin: Origin,
    pub value: String,
}

impl<'a> NodeRef<'a> {
    /// Direct children in document order.
    pub fn children(self) -> Vec<NodeRef<'a>> {
        let mut children = Vec::new();
        match self {
            NodeRef::Program(node) => {
                children.extend(node.body.iter().map(Statement::as_node_ref));
            }
            NodeRef::BlockStatement(node) => {
                children.push(node.path.as_node_ref());
                children.extend(node.params.iter().map(Expression::as_node_ref));
                children.push(NodeRef::Hash(&node.hash));
                children.push(NodeRef::Program(&node.program));
                if let Some(inverse) = &node.inverse {
                    children.push(NodeRef::Program(inverse));
                }
            }
            NodeRef::MustacheStatement(node) => {
                children.push(node.path.as_node_ref());
                children.extend(node.params.iter().map(Expression::as_node_ref));
                children.push(NodeRef::Hash(&node.hash));
            }
            NodeRef::SubExpression(node) => {
                children.push(node.path.as_node_ref());
                children.extend(node.params.iter().map(Expression::as_node_ref));
                children.push(NodeRef::Hash(&node.hash));
            }
            NodeRef::Hash(node) => {
                children.extend(node.pairs.iter().map(NodeRef::HashPair));
            }
            NodeRef::HashPair(node) => children.push(node.value.as_node_ref()),
            NodeRef::ElementNode(node) => {
                children.extend(node.attributes.iter().map(NodeRef::AttrNode));
                children.extend(node.children.iter().map(Statement::as_node_ref));
            }
            NodeRef::AttrNode(node) => children.push(node.value.as_node_ref()),
            NodeRef::ConcatStatement(node) => {
                children.extend(node.parts.iter().map(ConcatPart::as_node_ref));
            }
            NodeRef::MustacheCommentStatement(_)
            | NodeRef::PathExpression(_)
            | NodeRef::StringLiteral(_)
            | NodeRef::NumberLiteral(_)
            | NodeRef::BooleanLiteral(_)
            | NodeRef::TextNode(_)
            | NodeRef::CommentStatement(_) => {}
        }
        children
    }

    /// This node followed by all of its descendants, in document order.
    pub fn descendants(self) -> Vec<NodeRef<'a>> {
        let mut out = vec![self];
        for child in self.children() {
            out.extend(child.descendants());
        }
        out
    }
}
