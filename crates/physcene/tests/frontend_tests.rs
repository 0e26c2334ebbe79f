//! Frontend and normalizer tests

use physcene::frontends::{SexpFrontend, TextFrontend};
use physcene::*;
use pretty_assertions::assert_eq;

fn text(src: &str) -> Node {
    TextFrontend::new().parse_program(src).expect("text parse failed")
}

fn sexp(src: &str) -> Node {
    SexpFrontend::new().parse_program(src).expect("sexp parse failed")
}

// ═══════════════════════════════════════════════════════════════════════
// Both frontends agree
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_labels_and_edges_agree() {
    assert_eq!(
        text("a: rectangle 0 0 10 10; b: rectangle 50 0 10 10; a -- b;"),
        sexp(
            "(label a (body rectangle 0 0 10 10))
             (label b (body rectangle 50 0 10 10))
             (constraint a (rigid) b)"
        )
    );
}

#[test]
fn test_scopes_agree() {
    assert_eq!(
        text("{ circle 0 0 1 #static } x=5"),
        sexp("(scope (composite (body circle 0 0 1 (flag static))) (attrs (attr x 5)))")
    );
}

#[test]
fn test_functions_agree() {
    assert_eq!(
        text("f: fn(x) { x }; g: |n| n * 2"),
        sexp(
            "(label f (fn (params x) (composite x)))
             (label g (lambda (params n) (call * n 2)))"
        )
    );
}

#[test]
fn test_constraint_attrs_agree() {
    assert_eq!(
        text("a ~~ b stiffness=0.2"),
        sexp("(constraint a spring b (attrs (attr stiffness 0.2)))")
    );
}

// ═══════════════════════════════════════════════════════════════════════
// Normalized shape
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_program_is_a_composite() {
    let node = text("circle 0 0 1; circle 1 0 1");
    match node {
        Node::Composite(stmts) => assert_eq!(stmts.len(), 2),
        other => panic!("expected composite, got {:?}", other),
    }
}

#[test]
fn test_body_splits_args_and_attrs() {
    let node = text("circle 1 2 3 color=red #static");
    let Node::Composite(stmts) = node else {
        panic!("expected composite");
    };
    assert_eq!(
        stmts[0],
        Node::Body {
            shape: "circle".to_string(),
            args: vec![Node::Number(1.0), Node::Number(2.0), Node::Number(3.0)],
            attrs: vec![
                Attr::new("color", Node::symbol("red")),
                Attr::flag("static"),
            ],
        }
    );
}

#[test]
fn test_keyword_symbols_lose_colon() {
    assert_eq!(
        sexp("(label :ball (body \"circle\" 0 0 1))"),
        sexp("(label ball (body circle 0 0 1))")
    );
}

// ═══════════════════════════════════════════════════════════════════════
// Normalizer errors
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_unknown_tag() {
    let raw = RawNode::new("composite", vec![RawNode::new("teleport", vec![])]);
    assert!(matches!(
        normalize(&raw),
        Err(NormalizeError::UnknownTag { tag }) if tag == "teleport"
    ));
}

#[test]
fn test_label_arity() {
    let raw = RawNode::new("label", vec![RawNode::symbol("a")]);
    assert!(matches!(
        normalize(&raw),
        Err(NormalizeError::Arity { got: 1, .. })
    ));
}

#[test]
fn test_bad_edge_kind() {
    let raw = RawNode::new(
        "constraint",
        vec![
            RawNode::symbol("a"),
            RawNode::new("glue", vec![]),
            RawNode::symbol("b"),
        ],
    );
    assert!(matches!(
        normalize(&raw),
        Err(NormalizeError::Unexpected { .. })
    ));
}

#[test]
fn test_invalid_number() {
    let raw = RawNode::number("1.2.3");
    assert!(matches!(
        normalize(&raw),
        Err(NormalizeError::InvalidNumber { .. })
    ));
}

#[test]
fn test_normalize_error_surfaces_as_scene_error() {
    let err = SexpFrontend::new()
        .parse_program("(wobble 1 2)")
        .unwrap_err();
    assert!(matches!(err, SceneError::Normalize(_)));
}

// ═══════════════════════════════════════════════════════════════════════
// Parse errors
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_parse_errors_locate() {
    let err = TextFrontend::new().parse("a: circle 0 0 1;\n  ?").unwrap_err();
    assert_eq!(err.location, Some(SourceLocation::new(2, 3)));

    let err = SexpFrontend::new().parse("(body circle").unwrap_err();
    assert!(err.location.is_some());
    assert!(err.to_string().starts_with("Parse error"));
}

#[test]
fn test_comments_are_skipped() {
    assert_eq!(
        text("// a ball\ncircle 0 0 1 // trailing\n"),
        sexp("; a ball\n(body circle 0 0 1) ; trailing\n")
    );
}
