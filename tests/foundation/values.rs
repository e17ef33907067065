//! Integration tests for Value, Object and Type

use taskforge_foundation::{AggregateRef, LtMap, LtSet, LtVec, Object, Type, Value};

fn quest() -> AggregateRef {
    AggregateRef::new(1, "fetch_quest")
}

// =============================================================================
// Value Basics
// =============================================================================

#[test]
fn value_types() {
    assert_eq!(Value::None.value_type(), Type::None);
    assert_eq!(Value::Int(1).value_type(), Type::Int);
    assert_eq!(Value::from("a").value_type(), Type::String);
    assert_eq!(
        Value::Object(Object::new(quest())).value_type(),
        Type::Aggregate(quest())
    );
}

#[test]
fn int_and_float_are_distinct_values() {
    assert_ne!(Value::Int(1), Value::Float(1.0));
    assert!(Value::Int(1) < Value::Float(1.5));
}

#[test]
fn coerce_only_widens_int_to_float() {
    assert_eq!(Value::Int(3).coerce_to(&Type::Float), Value::Float(3.0));
    assert_eq!(Value::Float(3.5).coerce_to(&Type::Int), Value::Float(3.5));
    assert_eq!(Value::from("3").coerce_to(&Type::Int), Value::from("3"));
}

#[test]
fn display_uses_literal_forms() {
    assert_eq!(Value::Float(2.0).to_string(), "2.0");
    assert_eq!(Value::from("hi").to_string(), "hi");
    let list = Value::List([Value::from("a"), Value::Int(1)].into_iter().collect());
    assert_eq!(list.to_string(), "[\"a\", 1]");
}

// =============================================================================
// Persistent Collections
// =============================================================================

#[test]
fn collections_are_persistent() {
    let v: LtVec<i64> = LtVec::new();
    let v2 = v.push_back(1);
    assert!(v.is_empty());
    assert_eq!(v2.len(), 1);

    let s: LtSet<i64> = LtSet::new();
    let s2 = s.insert(1).insert(1);
    assert!(s.is_empty());
    assert_eq!(s2.len(), 1);

    let m: LtMap<&str, i64> = LtMap::new();
    let m2 = m.insert("k", 1);
    assert_eq!(m.get(&"k"), None);
    assert_eq!(m2.get(&"k"), Some(&1));
}

// =============================================================================
// Objects
// =============================================================================

#[test]
fn objects_compare_by_members() {
    let a = Object::new(quest()).with("item", Value::from("key"));
    let b = Object::new(quest()).with("item", Value::from("key"));
    let c = Object::new(quest()).with("item", Value::from("map"));
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(a.type_name(), "fetch_quest");
}

#[test]
fn host_state_is_separate_from_members() {
    let mut entity = Object::new(AggregateRef::new(2, "entity"));
    entity.set_host("health_component", Value::Int(1));
    assert_eq!(entity.get("health_component"), None);
    assert_eq!(entity.host("health_component"), Some(&Value::Int(1)));
    assert_eq!(entity.remove_host("health_component"), Some(Value::Int(1)));
    assert_eq!(entity.host("health_component"), None);
}

// =============================================================================
// Types
// =============================================================================

#[test]
fn float_accepts_int() {
    assert!(Type::Float.accepts(&Type::Int));
    assert!(!Type::Int.accepts(&Type::Float));
    assert!(Type::list(Type::Float).accepts(&Type::list(Type::Int)));
    assert!(Type::Any.accepts(&Type::String));
}

#[test]
fn aggregates_compare_by_identity() {
    let a = Type::Aggregate(quest());
    let b = Type::Aggregate(AggregateRef::new(2, "fetch_quest"));
    assert!(a.accepts(&a));
    assert!(!a.accepts(&b));
}

#[test]
fn zero_values() {
    assert_eq!(Type::Int.zero_value(), Some(Value::Int(0)));
    assert_eq!(Type::String.zero_value(), Some(Value::from("")));
    assert_eq!(Type::set(Type::Int).zero_value(), Some(Value::Set(LtSet::new())));
    assert_eq!(Type::Aggregate(quest()).zero_value(), None);
    assert_eq!(Type::Graph.zero_value(), None);
}

#[test]
fn type_display() {
    assert_eq!(Type::list(Type::Int).to_string(), "int[]");
    assert_eq!(Type::set(Type::String).to_string(), "string<>");
    assert_eq!(Type::map(Type::String, Type::Float).to_string(), "[string -> float]");
    assert_eq!(Type::Prototype.to_string(), "entity_type");
}

// =============================================================================
// Properties
// =============================================================================

mod properties {
    use proptest::prelude::*;
    use taskforge_foundation::{Type, Value};

    proptest! {
        #[test]
        fn int_coerces_to_equal_float(n in -1_000_000_000i64..1_000_000_000) {
            let widened = Value::Int(n).coerce_to(&Type::Float);
            prop_assert_eq!(widened.as_number(), Some(n as f64));
            prop_assert_eq!(widened.value_type(), Type::Float);
        }

        #[test]
        fn strings_display_verbatim(s in "[a-z ]{0,20}") {
            prop_assert_eq!(Value::from(s.as_str()).to_string(), s);
        }
    }
}
