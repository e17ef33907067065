//! Integration tests for semantic analysis
//!
//! Tests name resolution, type checking, scenario builder detection and
//! rollback of failed programs.

use taskforge_foundation::{Error, ErrorKind, SemanticErrorKind, Type};
use taskforge_language::{AnalyzedProgram, Environment, analyze, parse_program};
use taskforge_stdlib::standard_environment;

fn check(env: &mut Environment, source: &str) -> Result<AnalyzedProgram, Error> {
    analyze(env, parse_program(source, "test.dsl").unwrap())
}

fn semantic(result: Result<AnalyzedProgram, Error>) -> (SemanticErrorKind, u32, u32) {
    match result.unwrap_err().kind {
        ErrorKind::Semantic(e) => (e.kind, e.location.line, e.location.column),
        other => panic!("expected semantic error, got {other:?}"),
    }
}

#[test]
fn builders_are_functions_over_task_types() {
    let mut env = standard_environment().unwrap();
    let analyzed = check(
        &mut env,
        "fn key_quest(fetch_quest q) { q.item = \"key\"; }
         fn riddle(single_choice_task t, int n) { t.answer = n; }
         fn helper(int n) -> int { return n; }
         fn spawn(entity e) { }",
    )
    .unwrap();
    let builders: Vec<_> = analyzed
        .scenario_builders
        .iter()
        .map(|f| f.name.to_string())
        .collect();
    assert_eq!(builders, vec!["key_quest", "riddle"]);
    assert_eq!(analyzed.functions.len(), 4);
    assert!(env.function("helper").is_some());
}

#[test]
fn undeclared_identifier_in_prototype() {
    let mut env = standard_environment().unwrap();
    let (kind, line, column) = semantic(check(
        &mut env,
        "entity_type goblin {\n    velocity_component { x_velocity: x, y_velocity: 1 }\n}",
    ));
    assert_eq!(kind, SemanticErrorKind::UnresolvedIdentifier("x".into()));
    assert_eq!((line, column), (2, 38));
    assert!(env.lookup_global("goblin").is_none());
}

#[test]
fn type_mismatches() {
    let mut env = standard_environment().unwrap();
    let (kind, ..) = semantic(check(&mut env, "fn f() -> int { return \"a\"; }"));
    assert_eq!(
        kind,
        SemanticErrorKind::TypeMismatch {
            expected: Type::Int,
            actual: Type::String,
        }
    );
    let (kind, ..) = semantic(check(&mut env, "fetch_quest q { count: \"many\" }"));
    assert!(matches!(kind, SemanticErrorKind::TypeMismatch { .. }));
    assert!(check(&mut env, "fn g() -> float { return 1; }").is_ok());
}

#[test]
fn unknown_members_and_types() {
    let mut env = standard_environment().unwrap();
    let (kind, ..) = semantic(check(&mut env, "fetch_quest q { reward: 1 }"));
    assert_eq!(
        kind,
        SemanticErrorKind::UnknownMember {
            type_name: "fetch_quest".into(),
            member: "reward".into(),
        }
    );
    let (kind, ..) = semantic(check(&mut env, "fn f(dragon d) { }"));
    assert_eq!(kind, SemanticErrorKind::UnknownType("dragon".into()));
}

#[test]
fn duplicate_definitions() {
    let mut env = standard_environment().unwrap();
    let (kind, line, _) = semantic(check(&mut env, "fn f() { }\nfn f() { }"));
    assert_eq!(kind, SemanticErrorKind::DuplicateDefinition("f".into()));
    assert_eq!(line, 2);
    let (kind, ..) = semantic(check(&mut env, "fn g(int a) { var a = 1; }"));
    assert_eq!(kind, SemanticErrorKind::DuplicateDefinition("a".into()));
}

#[test]
fn calls_are_checked() {
    let mut env = standard_environment().unwrap();
    let (kind, ..) = semantic(check(&mut env, "fn f() { print(1, 2); }"));
    assert!(matches!(kind, SemanticErrorKind::ArityMismatch { expected: 1, actual: 2, .. }));
    let (kind, ..) = semantic(check(&mut env, "fn f() { var n = 1; n(); }"));
    assert_eq!(kind, SemanticErrorKind::NotCallable("n".into()));
}

#[test]
fn graph_nodes_must_be_tasks() {
    let mut env = standard_environment().unwrap();
    let (kind, ..) = semantic(check(
        &mut env,
        "entity_type goblin { }\ngraph g { goblin; }",
    ));
    assert_eq!(kind, SemanticErrorKind::NotATask("goblin".into()));
    let (kind, ..) = semantic(check(
        &mut env,
        "fetch_quest a { }\nfetch_quest b { }\ngraph g { a -> b [type=sideways]; }",
    ));
    assert!(matches!(kind, SemanticErrorKind::InvalidAttribute { .. }));
}

#[test]
fn read_only_extensions_cannot_be_assigned() {
    let mut env = standard_environment().unwrap();
    let (kind, ..) = semantic(check(&mut env, "fn f(entity e) { e.component_count = 2; }"));
    assert!(matches!(kind, SemanticErrorKind::NotAssignable(_)));
    assert!(check(&mut env, "fn g(entity e) -> int { return e.component_count; }").is_ok());
}

#[test]
fn missing_return_is_an_error() {
    let mut env = standard_environment().unwrap();
    let (kind, ..) = semantic(check(&mut env, "fn f(bool b) -> int { if b { return 1; } }"));
    assert_eq!(kind, SemanticErrorKind::MissingReturn("f".into()));
}

#[test]
fn failed_analysis_leaves_environment_untouched() {
    let mut env = standard_environment().unwrap();
    let before = env.global_symbols().count();
    assert!(check(&mut env, "fn ok() { }\nfn bad() { y = 2; }").is_err());
    assert_eq!(env.global_symbols().count(), before);
    assert!(env.lookup_global("ok").is_none());
}
