//! Angle bracket codemod: `{{foo-bar baz=qux}}` becomes `<FooBar @baz={{qux}} />`

use hbs_recast::ast::{ElementNode, Expression, MustacheStatement, Program, Statement};
use hbs_recast::{Builders, Env, Visitor};
use tracing::debug;

/// A curly component invocation: a dasherized name and nothing but hash arguments
pub fn is_component(mustache: &MustacheStatement) -> bool {
    match &mustache.path {
        Expression::Path(path) => {
            !mustache.trusting
                && mustache.params.is_empty()
                && !path.this
                && !path.data
                && path.parts.len() == 1
                && path.original.contains('-')
        }
        _ => false,
    }
}

/// `foo-bar` to `FooBar`
pub fn tag_name(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect()
}

fn to_element(mustache: &mut MustacheStatement, b: &Builders) -> Option<ElementNode> {
    let Expression::Path(path) = &mustache.path else {
        return None;
    };
    let tag = tag_name(&path.original);
    let attributes = std::mem::take(&mut mustache.hash.pairs)
        .into_iter()
        .map(|pair| {
            let value = match pair.value {
                Expression::SubExpression(sexpr) => {
                    let sexpr = *sexpr;
                    b.mustache(sexpr.path, sexpr.params, Some(sexpr.hash))
                }
                other => b.mustache(other, vec![], None),
            };
            b.attr(format!("@{}", pair.key), value)
        })
        .collect();
    Some(b.self_closing_element(tag, attributes))
}

/// Rewrites component invocations that sit directly in a statement list.
fn convert(statements: &mut [Statement], b: &Builders) {
    for statement in statements.iter_mut() {
        let Statement::Mustache(mustache) = statement else {
            continue;
        };
        if !is_component(mustache) {
            continue;
        }
        if let Some(element) = to_element(mustache, b) {
            debug!(tag = %element.tag, "converted curly invocation");
            *statement = element.into();
        }
    }
}

pub fn angle_brackets<'a>() -> Visitor<'a> {
    Visitor::new()
        .on(|program: &mut Program, env: &Env| {
            convert(&mut program.body, env.builders());
            Ok(None)
        })
        .on(|element: &mut ElementNode, env: &Env| {
            convert(&mut element.children, env.builders());
            Ok(None)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hbs_recast::transform;

    fn run(template: &str) -> String {
        transform(template, |_| angle_brackets()).unwrap().code
    }

    #[test]
    fn tag_names_are_pascal_cased() {
        assert_eq!(tag_name("foo-bar"), "FooBar");
        assert_eq!(tag_name("x-foo-baz"), "XFooBaz");
    }

    #[test]
    fn simple_mustache() {
        assert_eq!(run("{{foo-bar baz=qux}}"), "<FooBar @baz={{qux}} />");
    }

    #[test]
    fn sub_expression_values_become_mustaches() {
        assert_eq!(
            run("{{todo-item onToggle=(fn this.toggle todo)}}"),
            "<TodoItem @onToggle={{fn this.toggle todo}} />"
        );
    }

    #[test]
    fn nested_invocations_keep_their_surroundings() {
        let template = "<ul>\n  {{#each items as |item|}}\n    <li>\n      {{todo-item todo=item}}\n    </li>\n  {{/each}}\n</ul>\n";
        assert_eq!(
            run(template),
            "<ul>\n  {{#each items as |item|}}\n    <li>\n      <TodoItem @todo={{item}} />\n    </li>\n  {{/each}}\n</ul>\n"
        );
    }

    #[test]
    fn helpers_and_attribute_values_are_left_alone() {
        let template = "{{format-date this.date}}\n<div class={{class-names a=b}}>{{title}}</div>";
        assert_eq!(run(template), template);
    }
}
