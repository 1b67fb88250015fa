//! Round-trip tests: a transform that changes nothing must give back its
//! input byte for byte, and list edits must touch only the edited member.
//!
//! - Fixture-based tests: one test per template in `tests/fixtures/`
//! - Property tests: generated templates and generated hash pair lists

use std::path::PathBuf;

use difference::assert_diff;
use hbs_recast::ast::{
    AttrNode, BlockStatement, ConcatStatement, ElementNode, Hash, HashPair, MustacheStatement,
    PathExpression, Program, SubExpression, TextNode,
};
use hbs_recast::{Env, Visitor, transform};
use proptest::prelude::*;

/// Makes whitespace differences visible in diff output
fn visualize(s: &str) -> String {
    s.replace(' ', "·").replace('\n', "↩\n")
}

fn assert_same(expected: &str, got: &str) {
    if expected != got {
        assert_diff!(&visualize(expected), &visualize(got), "", 0);
    }
}

/// A visitor with a handler for most kinds, all of which decline
fn declining<'a>() -> Visitor<'a> {
    Visitor::new()
        .on(|_: &mut Program, _: &Env| Ok(None))
        .on(|_: &mut BlockStatement, _: &Env| Ok(None))
        .on(|_: &mut MustacheStatement, _: &Env| Ok(None))
        .on(|_: &mut SubExpression, _: &Env| Ok(None))
        .on(|_: &mut PathExpression, _: &Env| Ok(None))
        .on(|_: &mut Hash, _: &Env| Ok(None))
        .on(|_: &mut HashPair, _: &Env| Ok(None))
        .on(|_: &mut TextNode, _: &Env| Ok(None))
        .on(|_: &mut ElementNode, _: &Env| Ok(None))
        .on(|_: &mut AttrNode, _: &Env| Ok(None))
        .on(|_: &mut ConcatStatement, _: &Env| Ok(None))
}

/// Replaces every node a handler sees with a clone of itself
fn cloning<'a>() -> Visitor<'a> {
    Visitor::new()
        .on(|node: &mut MustacheStatement, _: &Env| Ok(Some(node.clone().into())))
        .on(|node: &mut PathExpression, _: &Env| Ok(Some(node.clone().into())))
        .on(|node: &mut TextNode, _: &Env| Ok(Some(node.clone().into())))
        .on(|node: &mut ElementNode, _: &Env| Ok(Some(node.clone().into())))
}

fn assert_roundtrip(template: &str) {
    let out = transform(template, |_| Visitor::new()).unwrap();
    assert_same(template, &out.code);
    let out = transform(template, |_| declining()).unwrap();
    assert_same(template, &out.code);
    let out = transform(template, |_| cloning()).unwrap();
    assert_same(template, &out.code);
}

fn assert_roundtrip_fixture(fixture_name: &str) {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(fixture_name);

    let contents = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", fixture_name, e));

    assert_roundtrip(&contents);
}

#[test]
fn roundtrip_fixture_components() {
    assert_roundtrip_fixture("components.hbs");
}

#[test]
fn roundtrip_fixture_helpers() {
    assert_roundtrip_fixture("helpers.hbs");
}

#[test]
fn roundtrip_fixture_whitespace() {
    assert_roundtrip_fixture("whitespace.hbs");
}

#[test]
fn roundtrip_empty_template() {
    assert_roundtrip("");
}

#[test]
fn roundtrip_non_ascii_text() {
    assert_roundtrip("<p title=\"héllo\">naïve {{café}} ✓</p>\n");
}

fn name() -> impl Strategy<Value = String> {
    "x[a-z]{0,5}"
}

fn spacing() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(" ".to_string()),
        Just("  ".to_string()),
        Just("\n  ".to_string()),
        Just("\t".to_string()),
    ]
}

fn value() -> impl Strategy<Value = String> {
    prop_oneof![
        name(),
        "[0-9]{1,3}",
        "\"[a-z ]{0,6}\"",
        Just("true".to_string()),
        name().prop_map(|inner| format!("({inner} 1)")),
    ]
}

fn pair() -> impl Strategy<Value = (String, String, String)> {
    (spacing(), name(), value())
}

fn render_pairs(pairs: &[(String, String, String)]) -> String {
    pairs
        .iter()
        .map(|(spacing, key, value)| format!("{spacing}{key}={value}"))
        .collect()
}

fn fragment() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z .,!\n]{1,10}",
        (name(), prop::collection::vec(pair(), 0..4), prop_oneof![Just(""), Just(" ")]).prop_map(
            |(callee, pairs, tail)| format!("{{{{{callee}{}{tail}}}}}", render_pairs(&pairs))
        ),
        (name(), prop::collection::vec((spacing(), name(), value()), 0..3), "[a-z ]{0,6}")
            .prop_map(|(tag, attrs, text)| {
                let attrs: String = attrs
                    .iter()
                    .map(|(spacing, key, value)| {
                        if value.starts_with('"') {
                            format!("{spacing}{key}={value}")
                        } else {
                            format!("{spacing}{key}={{{{{value}}}}}")
                        }
                    })
                    .collect();
                format!("<{tag}{attrs}>{text}</{tag}>")
            }),
        (name(), name(), "[a-z \n]{0,6}").prop_map(|(helper, param, body)| {
            format!("{{{{#{helper} {param}}}}}{body}{{{{/{helper}}}}}")
        }),
    ]
}

proptest! {
    #[test]
    fn generated_templates_roundtrip(fragments in prop::collection::vec(fragment(), 0..8)) {
        let template = fragments.concat();
        let out = transform(&template, |_| declining()).unwrap();
        prop_assert_eq!(out.code, template);
    }

    #[test]
    fn removing_a_pair_removes_only_its_text(
        callee in name(),
        pairs in prop::collection::vec(pair(), 1..6),
        index in any::<prop::sample::Index>(),
    ) {
        let index = index.index(pairs.len());
        prop_assume!(pairs.iter().filter(|pair| pair.1 == pairs[index].1).count() == 1);
        let template = format!("{{{{{callee}{}}}}}", render_pairs(&pairs));
        let removed = pairs[index].1.clone();
        let out = transform(&template, |_| {
            Visitor::new().on(move |hash: &mut Hash, _: &Env| {
                if let Some(at) = hash.pairs.iter().position(|pair| pair.key == removed) {
                    hash.pairs.remove(at);
                }
                Ok(None)
            })
        })
        .unwrap();

        // the first member's separator belongs to the mustache, not to the pair
        let mut kept = pairs.clone();
        let (spacing, _, _) = kept.remove(index);
        let mut expected = render_pairs(&kept);
        if index == 0 {
            expected.insert_str(0, &spacing);
        }
        let expected = format!("{{{{{callee}{expected}}}}}");
        prop_assert_eq!(out.code, expected);
    }

    #[test]
    fn appending_a_pair_adds_one_space(
        callee in name(),
        pairs in prop::collection::vec(pair(), 0..4),
        tail in prop_oneof![Just(""), Just(" "), Just("\n")],
    ) {
        let template = format!("{{{{{callee}{}{tail}}}}}", render_pairs(&pairs));
        let out = transform(&template, |_| {
            Visitor::new().on(|mustache: &mut MustacheStatement, env: &Env| {
                let b = env.builders();
                mustache.hash.pairs.push(b.pair("added", b.number(1.0)));
                Ok(None)
            })
        })
        .unwrap();
        let expected = format!("{{{{{callee}{} added=1{tail}}}}}", render_pairs(&pairs));
        prop_assert_eq!(out.code, expected);
    }
}
