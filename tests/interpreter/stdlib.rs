//! Integration tests for the standard library as seen from DSL programs

use taskforge_foundation::Value;
use taskforge_interpreter::{Runtime, RuntimeConfig};
use taskforge_stdlib::standard_environment;

fn runtime() -> Runtime {
    Runtime::new(standard_environment().unwrap(), RuntimeConfig::seeded(5)).unwrap()
}

#[test]
fn instantiate_attaches_prototype_components() {
    let mut runtime = runtime();
    runtime
        .load(
            "entity_type goblin {
                 health_component { health: 30 },
                 position_component { x: 2, y: 3 },
             }
             fn spawn() -> entity { return instantiate(goblin); }
             fn spawned_health() -> int {
                 var e = spawn();
                 return e.health_component.health;
             }
             fn count() -> int { return spawn().component_count; }",
            "spawn.dsl",
        )
        .unwrap();

    let entity = runtime.call("spawn", vec![]).unwrap();
    let entity = entity.as_object().unwrap();
    assert_eq!(entity.get("name"), Some(&Value::from("goblin")));
    let position = entity.host("position_component").unwrap().as_object().unwrap();
    assert_eq!(position.get("x"), Some(&Value::Float(2.0)));

    assert_eq!(runtime.call("spawned_health", vec![]).unwrap(), Value::Int(30));
    assert_eq!(runtime.call("count", vec![]).unwrap(), Value::Int(2));
}

#[test]
fn components_can_be_replaced_on_entities() {
    let mut runtime = runtime();
    runtime
        .load(
            "entity_type bat { draw_component { path: \"bat.png\" } }
             fn haste() -> float {
                 var e = instantiate(bat);
                 e.velocity_component = velocity_component { x_velocity: 4, y_velocity: 0 };
                 e.velocity_component.x_velocity = e.velocity_component.x_velocity * 2;
                 return e.velocity_component.x_velocity;
             }",
            "bat.dsl",
        )
        .unwrap();
    assert_eq!(runtime.call("haste", vec![]).unwrap(), Value::Float(8.0));
}

#[test]
fn collection_natives() {
    let mut runtime = runtime();
    runtime
        .load(
            "fn build() -> int[] {
                 var xs : int[];
                 for int i in range(4) { xs = push(xs, i * i); }
                 return xs;
             }",
            "lists.dsl",
        )
        .unwrap();
    let expected = Value::List([0, 1, 4, 9].into_iter().map(Value::Int).collect());
    assert_eq!(runtime.call("build", vec![]).unwrap(), expected);
    assert_eq!(runtime.evaluate("len(\"quest\")").unwrap(), Value::Int(5));
    assert_eq!(runtime.evaluate("get(build(), 2)").unwrap(), Value::Int(4));
    assert!(runtime.evaluate("get(build(), 4)").is_err());
}
