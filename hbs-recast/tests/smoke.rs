//! "Real life" transforms, checked against their exact output.

use hbs_recast::ast::{
    BlockStatement, Expression, Hash, MustacheStatement, Node, PathExpression, Spanned, TextNode,
};
use hbs_recast::{Builders, Env, Visitor, transform};

fn drop_pair<'a>(key: &'static str) -> Visitor<'a> {
    Visitor::new().on(move |hash: &mut Hash, _: &Env| {
        hash.pairs.retain(|pair| pair.key != key);
        Ok(None)
    })
}

fn collapse_text<'a>(replacement: &'static str) -> Visitor<'a> {
    Visitor::new().on(move |_: &mut TextNode, env: &Env| {
        Ok(Some(env.builders().text(replacement).into()))
    })
}

#[test]
fn multi_line_removed_hash_pair_removes_its_line() {
    let template = "{{#foo-bar\n  prop=\"abc\"\n  anotherProp=123\n  yetAnotherProp=\"xyz\"\n}}\n  Hello!\n{{/foo-bar}}";
    let out = transform(template, |_| drop_pair("anotherProp")).unwrap();
    assert_eq!(
        out.code,
        "{{#foo-bar\n  prop=\"abc\"\n  yetAnotherProp=\"xyz\"\n}}\n  Hello!\n{{/foo-bar}}"
    );
}

#[test]
fn same_line_removed_hash_pair_keeps_one_gap() {
    let template = "{{#hello-world}}\n  {{#foo-bar prop=\"abc\"  anotherProp=123  yetAnotherProp=\"xyz\"}}\n    Hello!\n  {{/foo-bar}}\n{{/hello-world}}";
    let out = transform(template, |_| drop_pair("anotherProp")).unwrap();
    assert_eq!(
        out.code,
        "{{#hello-world}}\n  {{#foo-bar prop=\"abc\"  yetAnotherProp=\"xyz\"}}\n    Hello!\n  {{/foo-bar}}\n{{/hello-world}}"
    );
}

#[test]
fn removing_the_last_pair_leaves_no_trailing_space() {
    let template = "{{#hello-world}}\n  {{#foo-bar prop=\"abc\" yetAnotherProp=\"xyz\" anotherProp=123}}\n    Hello!\n  {{/foo-bar}}\n{{/hello-world}}";
    let out = transform(template, |_| drop_pair("anotherProp")).unwrap();
    assert_eq!(
        out.code,
        "{{#hello-world}}\n  {{#foo-bar prop=\"abc\" yetAnotherProp=\"xyz\"}}\n    Hello!\n  {{/foo-bar}}\n{{/hello-world}}"
    );
}

#[test]
fn removing_the_last_pair_keeps_spaced_tag_contents() {
    let template = "{{#hello-world}}\n  {{ foo-bar prop=\"abc\" yetAnotherProp=\"xyz\" anotherProp=123 }}\n{{/hello-world}}";
    let out = transform(template, |_| drop_pair("anotherProp")).unwrap();
    assert_eq!(
        out.code,
        "{{#hello-world}}\n  {{ foo-bar prop=\"abc\" yetAnotherProp=\"xyz\" }}\n{{/hello-world}}"
    );
}

#[test]
fn appended_pair_goes_before_block_params() {
    let template = "{{#hello-world foo=\"foo\" bar=\"bar\" as |yieldedProp|}}\n  {{yieldedProp.something-something}}\n{{/hello-world}}";
    let out = transform(template, |_| {
        Visitor::new().on(|block: &mut BlockStatement, env: &Env| {
            let b = env.builders();
            block
                .hash
                .pairs
                .push(b.pair("somethingNew", b.string("Hello world!")));
            Ok(None)
        })
    })
    .unwrap();
    assert_eq!(
        out.code,
        "{{#hello-world foo=\"foo\" bar=\"bar\" somethingNew=\"Hello world!\" as |yieldedProp|}}\n  {{yieldedProp.something-something}}\n{{/hello-world}}"
    );
}

#[test]
fn replacing_a_positional_param_keeps_whitespace() {
    let template = "{{some-helper positional}}\n{{#block positional}}\n  empty\n{{/block}}\n";
    let out = transform(template, |_| {
        Visitor::new().on(|path: &mut PathExpression, env: &Env| {
            if path.original != "positional" {
                return Ok(None);
            }
            let replacement = env.builders().path(&format!("this.{}", path.original));
            Ok(Some(replacement.into()))
        })
    })
    .unwrap();
    assert_eq!(
        out.code,
        "{{some-helper this.positional}}\n{{#block this.positional}}\n  empty\n{{/block}}\n"
    );
}

fn funky_if(b: &Builders, i: usize) -> Node {
    let body = vec![
        b.text("\n").into(),
        b.text("  ").into(),
        b.mustache(b.path(&i.to_string()), vec![], None).into(),
        b.text("\n").into(),
        b.text("\n").into(),
    ];
    b.block(
        "if",
        vec![b.sexpr("a", vec![], None).into()],
        None,
        b.program(body),
        None,
    )
    .into()
}

/// Replaces every parsed mustache with a numbered multi-line block.
fn funky_ifs<'a>() -> Visitor<'a> {
    let mut counter = 0;
    Visitor::new().on(move |mustache: &mut MustacheStatement, env: &Env| {
        if mustache.is_synthetic() {
            return Ok(None);
        }
        let node = funky_if(env.builders(), counter);
        counter += 1;
        Ok(Some(node))
    })
}

#[test]
fn multi_line_replacements() {
    let out = transform("{{bar}}\n\n{{foo}}", |_| funky_ifs()).unwrap();
    assert_eq!(
        out.code,
        "{{#if (a)}}\n  {{0}}\n\n{{/if}}\n\n{{#if (a)}}\n  {{1}}\n\n{{/if}}"
    );
}

#[test]
fn multi_line_replacements_with_interleaving() {
    let template = "<br>\n{{bar}}\n<div></div>\n{{foo}}\n<hr>";
    let out = transform(template, |_| funky_ifs()).unwrap();
    assert_eq!(
        out.code,
        "<br>\n{{#if (a)}}\n  {{0}}\n\n{{/if}}\n<div></div>\n{{#if (a)}}\n  {{1}}\n\n{{/if}}\n<hr>"
    );
}

#[test]
fn collapsing_a_full_line_replacement() {
    let template = "here\nis\nsome\nmultiline\nstring";
    let out = transform(template, |_| collapse_text("here is a single line string")).unwrap();
    assert_eq!(out.code, "here is a single line string");
}

#[test]
fn collapsing_keeps_content_on_the_start_line() {
    let template = "<div\n   data-foo={{baz}}></div>here\nis\nsome\nmultiline\nstring";
    let out = transform(template, |_| collapse_text("here is a single line string")).unwrap();
    assert_eq!(
        out.code,
        "<div\n   data-foo={{baz}}></div>here is a single line string"
    );
}

#[test]
fn collapsing_keeps_content_on_the_end_line() {
    let template = "here\nis\nsome\nmultiline\nstring<div\ndata-foo={{bar}}></div>";
    let out = transform(template, |_| collapse_text("here is a single line string")).unwrap();
    assert_eq!(
        out.code,
        "here is a single line string<div\ndata-foo={{bar}}></div>"
    );
}

#[test]
fn collapsing_keeps_content_on_both_boundary_lines() {
    let template = "{{ foo }}\nhere\nis\nsome\nmultiline\nstring{{ bar }}";
    let out = transform(template, |_| collapse_text("here is a single line string")).unwrap();
    assert_eq!(out.code, "{{ foo }}here is a single line string{{ bar }}");
}

#[test]
fn multi_line_column_expansion() {
    let template = "\n        <div data-foo=\"bar\"></div>here\n        is\n        some\n        multiline\n        string\n        ";
    let out = transform(template, |_| collapse_text("xxxxxxxxx")).unwrap();
    assert_eq!(
        out.code,
        "xxxxxxxxx<div data-foo=\"xxxxxxxxx\"></div>xxxxxxxxx"
    );
}

fn is_component(mustache: &MustacheStatement) -> bool {
    matches!(&mustache.path, Expression::Path(path) if path.original == "foo-bar")
}

fn transform_tag_name(key: &str) -> String {
    key.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect()
}

fn angle_brackets<'a>() -> Visitor<'a> {
    Visitor::new().on(|mustache: &mut MustacheStatement, env: &Env| {
        if !is_component(mustache) {
            return Ok(None);
        }
        let b = env.builders();
        let Expression::Path(path) = &mustache.path else {
            return Ok(None);
        };
        let tag = transform_tag_name(&path.original);
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
        Ok(Some(b.self_closing_element(tag, attributes).into()))
    })
}

#[test]
fn angle_bracket_codemod_for_a_simple_mustache() {
    let out = transform("{{foo-bar baz=qux}}", |_| angle_brackets()).unwrap();
    assert_eq!(out.code, "<FooBar @baz={{qux}} />");
}

#[test]
fn angle_bracket_codemod_keeps_moved_hash_text() {
    let template = "{{foo-bar baz=(something\n  goes=here\n  and=here\n)}}";
    let out = transform(template, |_| angle_brackets()).unwrap();
    assert_eq!(
        out.code,
        "<FooBar @baz={{something\n  goes=here\n  and=here\n}} />"
    );
}

#[test]
fn other_mustaches_are_left_alone_by_the_codemod() {
    let template = "{{foo-bar baz=qux}}\n{{ other thing }}";
    let out = transform(template, |_| angle_brackets()).unwrap();
    assert_eq!(out.code, "<FooBar @baz={{qux}} />\n{{ other thing }}");
}
