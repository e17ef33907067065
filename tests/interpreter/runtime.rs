//! Integration tests for the Runtime session
//!
//! Programs are loaded one at a time against the standard environment.

use taskforge_foundation::{ErrorKind, InterpretationErrorKind, Value};
use taskforge_interpreter::{Runtime, RuntimeConfig};
use taskforge_stdlib::standard_environment;

fn runtime() -> Runtime {
    Runtime::new(standard_environment().unwrap(), RuntimeConfig::seeded(3)).unwrap()
}

fn interpretation(error: &taskforge_foundation::Error) -> &InterpretationErrorKind {
    match &error.kind {
        ErrorKind::Interpretation(e) => &e.kind,
        other => panic!("expected interpretation error, got {other:?}"),
    }
}

#[test]
fn standard_task_types_get_slots() {
    let runtime = runtime();
    let names: Vec<_> = runtime
        .storage()
        .types_with_storage()
        .map(ToString::to_string)
        .collect();
    assert_eq!(names, vec!["single_choice_task", "fetch_quest"]);
}

#[test]
fn functions_run_after_loading() {
    let mut runtime = runtime();
    runtime
        .load(
            "fn fib(int n) -> int {
                 if n < 2 { return n; }
                 return fib(n - 1) + fib(n - 2);
             }
             fn total(int[] xs) -> int {
                 var sum = 0;
                 for int x in xs { sum = sum + x; }
                 return sum;
             }",
            "math.dsl",
        )
        .unwrap();
    assert_eq!(runtime.call("fib", vec![Value::Int(10)]).unwrap(), Value::Int(55));
    assert_eq!(runtime.evaluate("total(range(5))").unwrap(), Value::Int(10));
    assert_eq!(runtime.evaluate("fib(6) * 2").unwrap(), Value::Int(16));
}

#[test]
fn typed_declarations_start_at_defaults() {
    let mut runtime = runtime();
    runtime
        .load(
            "fn defaults() -> string {
                 var n : int;
                 var f : float;
                 var s : string;
                 var b : bool;
                 var xs : int[];
                 var q : fetch_quest;
                 return str(n) + \" \" + str(f) + \" \" + s + str(b) + \" \" + str(len(xs)) + \" \" + str(q.count);
             }",
            "defaults.dsl",
        )
        .unwrap();
    assert_eq!(
        runtime.call("defaults", vec![]).unwrap(),
        Value::from("0 0.0 false 0 1")
    );
}

#[test]
fn runtime_faults_abort_the_program() {
    let mut runtime = runtime();
    let diagnostics = runtime
        .load(
            "fn pick(int[] xs) -> int { return get(xs, 5); }
             fetch_quest q { count: pick([1, 2]) }",
            "faulty.dsl",
        )
        .unwrap_err();
    let errors = diagnostics.into_errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(
        interpretation(&errors[0]),
        &InterpretationErrorKind::IndexOutOfBounds { index: 5, length: 2 }
    );
    let context = errors[0].context.as_ref().unwrap();
    assert_eq!(context.source.as_deref(), Some("faulty.dsl"));
    assert!(context.stack.iter().any(|frame| frame.contains("pick")));
    assert!(runtime.environment().lookup_global("pick").is_none());
}

#[test]
fn runaway_loops_are_stopped() {
    let config = RuntimeConfig::seeded(1).with_max_loop_iterations(100);
    let mut runtime = Runtime::new(standard_environment().unwrap(), config).unwrap();
    runtime
        .load("fn spin() { while true { } }", "spin.dsl")
        .unwrap();
    let error = runtime.call("spin", vec![]).unwrap_err();
    assert_eq!(interpretation(&error), &InterpretationErrorKind::LoopLimitExceeded(100));
}

#[test]
fn print_output_is_captured() {
    let mut runtime = runtime();
    runtime
        .load(
            "fn greet(string name) { print(\"hello \" + name); }
             fetch_quest q { item: \"lamp\" }",
            "greet.dsl",
        )
        .unwrap();
    runtime.call("greet", vec![Value::from("ada")]).unwrap();
    runtime.evaluate("print(q.item)").unwrap();
    assert_eq!(runtime.take_output(), vec!["hello ada", "lamp"]);
    assert!(runtime.output().is_empty());
}

#[test]
fn output_can_be_discarded() {
    let config = RuntimeConfig::seeded(1).with_capture_output(false);
    let mut runtime = Runtime::new(standard_environment().unwrap(), config).unwrap();
    runtime.evaluate("print(1)").unwrap();
    assert!(runtime.output().is_empty());
}

#[test]
fn build_scenario_uses_a_stored_builder() {
    let mut runtime = runtime();
    runtime
        .load(
            "fn double(fetch_quest q) -> fetch_quest { q.count = q.count * 2; return q; }",
            "builders.dsl",
        )
        .unwrap();
    let task = runtime.evaluate("fetch_quest { item: \"herb\", count: 3 }").unwrap();
    let built = runtime.build_scenario(&task).unwrap().unwrap();
    let built = built.as_object().unwrap();
    assert_eq!(built.get("count"), Some(&Value::Int(6)));
    assert_eq!(built.get("item"), Some(&Value::from("herb")));

    let riddle = runtime.evaluate("single_choice_task { question: \"?\" }").unwrap();
    assert_eq!(runtime.build_scenario(&riddle).unwrap(), None);
    assert_eq!(runtime.build_scenario(&Value::Int(1)).unwrap(), None);
}

#[test]
fn collection_members_check_their_elements() {
    let mut runtime = runtime();
    let diagnostics = runtime
        .load(
            "single_choice_task t { choices: push([], 3), answer: 0 }",
            "choices.dsl",
        )
        .unwrap_err();
    let errors = diagnostics.into_errors();
    assert_eq!(errors.len(), 1);
    assert!(matches!(
        interpretation(&errors[0]),
        InterpretationErrorKind::TypeMismatch { expected, .. } if expected == "string[]"
    ));
    assert!(runtime.artifacts().is_empty());
    assert!(runtime.environment().lookup_global("t").is_none());

    runtime
        .load(
            "single_choice_task t { choices: push([], \"left\"), answer: 0 }",
            "choices.dsl",
        )
        .unwrap();
    let task = runtime.artifacts().object("t").unwrap();
    let choices = Value::List([Value::from("left")].into_iter().collect());
    assert_eq!(task.get("choices"), Some(&choices));
}

#[test]
fn returned_values_match_the_signature() {
    let mut runtime = runtime();
    runtime
        .load(
            "fn first() -> int { return get([\"a\"], 0); }
             fn second() -> int { return get([7], 0); }",
            "returns.dsl",
        )
        .unwrap();
    let error = runtime.call("first", vec![]).unwrap_err();
    assert!(matches!(
        interpretation(&error),
        InterpretationErrorKind::TypeMismatch { expected, .. } if expected == "int"
    ));
    assert_eq!(runtime.call("second", vec![]).unwrap(), Value::Int(7));
}

#[test]
fn compiling_leaves_the_session_unchanged() {
    let mut runtime = runtime();
    let source = "fetch_quest q { item: \"lamp\" }
                  fn brighter(fetch_quest t) { t.item = \"torch\"; }";
    let analyzed = runtime.compile(source, "lamp.dsl").unwrap();
    assert_eq!(analyzed.scenario_builders.len(), 1);
    assert!(runtime.environment().lookup_global("q").is_none());
    assert!(runtime.environment().lookup_global("brighter").is_none());

    let diagnostics = runtime
        .load("fetch_quest q2 { item: q.item }", "later.dsl")
        .unwrap_err();
    assert!(matches!(
        diagnostics.iter().next().map(|e| &e.kind),
        Some(ErrorKind::Semantic(_))
    ));

    runtime.load(source, "lamp.dsl").unwrap();
    runtime.load("fetch_quest q2 { item: q.item }", "later.dsl").unwrap();
    let copy = runtime.artifacts().object("q2").unwrap();
    assert_eq!(copy.get("item"), Some(&Value::from("lamp")));
}
