//! Lossless transforms for Handlebars templates
//!
//! A template is parsed into a span-annotated tree, handed to a plugin's
//! [`Visitor`], and printed back out. Whatever the plugin left alone comes
//! back byte for byte, formatting and all. Only the nodes it touched are
//! reprinted.
//!
//! ```rust
//! use hbs_recast::ast::Hash;
//! use hbs_recast::{Env, Visitor, transform};
//!
//! let template = "{{#foo-bar\n  prop=\"abc\"\n  anotherProp=123\n}}\n  Hello!\n{{/foo-bar}}";
//! let out = transform(template, |_| {
//!     Visitor::new().on(|hash: &mut Hash, _: &Env| {
//!         hash.pairs.retain(|pair| pair.key != "anotherProp");
//!         Ok(None)
//!     })
//! })
//! .unwrap();
//! assert_eq!(out.code, "{{#foo-bar\n  prop=\"abc\"\n}}\n  Hello!\n{{/foo-bar}}");
//! ```

pub mod ast;
pub mod builders;
pub mod error;
pub mod parser;
pub mod printer;
pub mod visitor;

use tracing::debug;

pub use crate::ast::Program;
pub use crate::builders::Builders;
pub use crate::error::{BoxError, Error, ParseError, Result};
pub use crate::parser::parse;
pub use crate::printer::{Options, print};
pub use crate::visitor::{Env, HandlerResult, Visitor};

/// Output of a transform.
#[derive(Debug, Clone, PartialEq)]
pub struct Transformed {
    /// The reprinted template.
    pub code: String,
    /// The tree after every handler ran.
    pub ast: Program,
}

/// Parses `source`, runs the visitor built by `plugin` over it and reprints it.
pub fn transform<'a>(
    source: &str,
    plugin: impl FnOnce(&Env<'_>) -> Visitor<'a>,
) -> Result<Transformed> {
    transform_with(source, &Options::default(), plugin)
}

/// [`transform`] with explicit printer [`Options`].
pub fn transform_with<'a>(
    source: &str,
    options: &Options,
    plugin: impl FnOnce(&Env<'_>) -> Visitor<'a>,
) -> Result<Transformed> {
    let original = parse(source)?;
    let env = Env::new(source);
    let mut visitor = plugin(&env);
    let mut ast = original.clone();
    if !visitor.is_empty() {
        visitor.walk(&mut ast, &env)?;
    }
    let code = print(source, &original, &ast, options)?;
    debug!(changed = code != source, "transformed template");
    Ok(Transformed { code, ast })
}
