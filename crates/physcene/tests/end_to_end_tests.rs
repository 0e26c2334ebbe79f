//! Source-to-world tests through `Session`

use physcene::config::SceneConfig;
use physcene::frontends::{SexpFrontend, TextFrontend};
use physcene::hydrate::{EndpointPolicy, SceneWorld, Session};
use physcene::*;
use pretty_assertions::assert_eq;

fn session() -> Session<TextFrontend, SceneWorld> {
    Session::new(TextFrontend::new(), SceneWorld::new(), SceneConfig::default())
}

// ═══════════════════════════════════════════════════════════════════════
// Runs
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_pendulum_chain() {
    let mut session = session();
    let scene = session
        .run(
            "anchor: circle 200 50 5 #static;
             link: fn(i) { circle 200 (80 + i * 30) 8 };
             repeat(4, link);
             anchor .. bob;
             bob: circle 200 200 12 restitution=0.2;",
        )
        .unwrap();

    assert_eq!(scene.body_count(), 6);
    let world = session.engine().unwrap();
    assert_eq!(world.bodies().len(), 6);
    assert_eq!(world.constraints().len(), 1);
    assert_eq!(world.constraints()[0].spec.kind, EdgeKind::Rope);
    assert!(world.body_labelled("anchor").unwrap().spec.is_static);
}

#[test]
fn test_last_write_wins() {
    let mut session = session();
    session.run("circle 0 0 1; circle 5 0 1").unwrap();
    session.run("rectangle 0 0 10 10").unwrap();

    let world = session.engine().unwrap();
    assert_eq!(world.bodies().len(), 1);
    assert_eq!(world.teardown_count(), 1);
}

#[test]
fn test_ids_restart_each_run() {
    let mut session = session();
    let first = session.run("circle 0 0 1").unwrap();
    let second = session.run("circle 0 0 1").unwrap();
    assert_eq!(first.root.bodies[0].id, second.root.bodies[0].id);
}

#[test]
fn test_eval_error_keeps_running_world() {
    let mut session = session();
    session.run("ball: circle 0 0 1").unwrap();

    let err = session.run("circle 0 0").unwrap_err();
    assert!(matches!(err, SceneError::Eval(EvalError::ShapeArity { .. })));

    let world = session.engine().unwrap();
    assert!(world.body_labelled("ball").is_some());
    assert_eq!(world.teardown_count(), 0);
}

#[test]
fn test_parse_error_has_location() {
    let mut session = session();
    let err = session.run("a: circle 0 0 1;\nb: circle 0 0 1 @").unwrap_err();
    match err {
        SceneError::Parse(parse) => {
            let location = parse.location.unwrap();
            assert_eq!(location.line, 2);
        }
        other => panic!("expected parse error, got {:?}", other),
    }
    assert!(session.world().is_none());
}

#[test]
fn test_strict_session_rejects_without_teardown() {
    let config = SceneConfig::from_json_str(r#"{ "hydrate": { "endpoint_policy": "strict" } }"#)
        .unwrap();
    assert_eq!(config.hydrate.endpoint_policy, EndpointPolicy::Strict);

    let mut session = Session::new(TextFrontend::new(), SceneWorld::new(), config);
    session.run("a: circle 0 0 1").unwrap();

    let err = session.run("a: circle 0 0 1; a ~~ ghost").unwrap_err();
    assert!(matches!(
        err,
        SceneError::Hydrate(HydrateError::UnresolvedEndpoint { .. })
    ));
    assert!(session.world().is_some());
    assert_eq!(session.engine().unwrap().teardown_count(), 0);
}

#[test]
fn test_stale_interrupt_is_cleared() {
    let mut session = session();
    session.context().interrupt();
    assert!(session.run("circle 0 0 1").is_ok());
}

#[test]
fn test_config_depth_limit_applies() {
    let config = SceneConfig::from_json_str(r#"{ "eval": { "max_call_depth": 8 } }"#).unwrap();
    let mut session = Session::new(TextFrontend::new(), SceneWorld::new(), config);
    let err = session.run("f: fn() { f() }; f()").unwrap_err();
    assert!(matches!(
        err,
        SceneError::Eval(EvalError::StackOverflow { max: 8, .. })
    ));
}

#[test]
fn test_stop_and_into_engine() {
    let mut session = session();
    session.run("circle 0 0 1").unwrap();
    session.stop();
    assert!(session.world().is_none());
    assert!(session.engine().unwrap().is_empty());

    session.run("circle 0 0 1; circle 1 1 1").unwrap();
    let engine = session.into_engine().unwrap();
    assert!(engine.is_empty());
    assert_eq!(engine.teardown_count(), 2);
}

#[test]
fn test_sexp_session() {
    let mut session = Session::new(SexpFrontend::new(), SceneWorld::new(), SceneConfig::default());
    session
        .run(
            "(label a (body circle 0 0 5))
             (label b (body circle 20 0 5))
             (constraint a (spring) b)",
        )
        .unwrap();
    let world = session.engine().unwrap();
    assert_eq!(world.bodies().len(), 2);
    assert_eq!(world.constraints()[0].spec.kind, EdgeKind::Spring);
}
