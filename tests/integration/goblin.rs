//! The goblin prototype scenario
//!
//! A prototype with two components, one of them backed by a host class with
//! two exposed members.

use taskforge_foundation::{ErrorKind, InterpretationErrorKind, SemanticErrorKind, Value};
use taskforge_interpreter::{Runtime, RuntimeConfig, SlotState};
use taskforge_stdlib::standard_environment;

fn runtime() -> Runtime {
    Runtime::new(standard_environment().unwrap(), RuntimeConfig::seeded(11)).unwrap()
}

#[test]
fn goblin_has_exactly_its_components() {
    let mut runtime = runtime();
    let artifacts = runtime
        .load(
            "entity_type goblin {
                 velocity_component { x_velocity: 1.5, y_velocity: -2.0 },
                 position_component { x: 4, y: 5 }
             }",
            "goblin.dsl",
        )
        .unwrap();

    let goblin = artifacts.prototype("goblin").unwrap();
    assert_eq!(&*goblin.name, "goblin");
    assert_eq!(goblin.components.len(), 2);

    let velocity = goblin.component("velocity_component").unwrap();
    assert_eq!(velocity.members.len(), 2);
    assert_eq!(velocity.get("x_velocity"), Some(&Value::Float(1.5)));
    assert_eq!(velocity.get("y_velocity"), Some(&Value::Float(-2.0)));

    let position = goblin.component("position_component").unwrap();
    assert_eq!(position.get("x"), Some(&Value::Float(4.0)));
    assert_eq!(position.get("y"), Some(&Value::Float(5.0)));
}

#[test]
fn omitted_defaulted_member_takes_its_default() {
    let mut runtime = runtime();
    let artifacts = runtime
        .load(
            "entity_type goblin {
                 velocity_component { x_velocity: 1, y_velocity: 1 },
                 position_component { x: 4 }
             }",
            "goblin.dsl",
        )
        .unwrap();
    let position = artifacts.prototype("goblin").unwrap().component("position_component").unwrap();
    assert_eq!(position.get("y"), Some(&Value::Float(0.0)));
}

#[test]
fn omitted_required_member_is_a_binding_error() {
    let mut runtime = runtime();
    let diagnostics = runtime
        .load(
            "entity_type goblin {\n    velocity_component { x_velocity: 1.5 },\n    position_component { x: 4, y: 5 }\n}",
            "goblin.dsl",
        )
        .unwrap_err();

    let errors = diagnostics.into_errors();
    assert_eq!(errors.len(), 1);
    match &errors[0].kind {
        ErrorKind::Interpretation(e) => {
            assert_eq!(
                e.kind,
                InterpretationErrorKind::MissingMember {
                    type_name: "velocity_component".into(),
                    member: "y_velocity".into(),
                }
            );
            assert_eq!(e.location.line, 2);
        }
        other => panic!("expected interpretation error, got {other:?}"),
    }
    assert!(runtime.artifacts().prototype("goblin").is_none());
    assert!(runtime.environment().lookup_global("goblin").is_none());
}

#[test]
fn undeclared_identifier_reports_its_location_and_registers_nothing() {
    let mut runtime = runtime();
    let diagnostics = runtime
        .load(
            "fn harder(fetch_quest q) { q.count = 5; }\n\
             entity_type goblin {\n\
             velocity_component { x_velocity: x, y_velocity: 0 }\n\
             }",
            "goblin.dsl",
        )
        .unwrap_err();

    let entries = diagnostics.entries();
    assert_eq!(entries.len(), 1);
    let location = entries[0].0.as_ref().unwrap();
    assert_eq!(location.to_string(), "goblin.dsl:3:34");
    assert!(matches!(
        diagnostics.iter().next().map(|e| &e.kind),
        Some(ErrorKind::Semantic(e)) if e.kind == SemanticErrorKind::UnresolvedIdentifier("x".into())
    ));

    let quest = runtime.environment().registry().lookup("fetch_quest").unwrap().ty();
    assert_eq!(runtime.storage().state(&quest), SlotState::Empty);
    assert!(runtime.environment().lookup_global("harder").is_none());
}
