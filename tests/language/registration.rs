//! Integration tests for host type registration

use taskforge_foundation::{LtVec, TypeRegistrationError, Value};
use taskforge_language::{Environment, Symbol};
use taskforge_types::{ExtensionProperty, HostClass, HostKind, MemberDesc, MemberRef, TypeName};

fn goblin_class() -> HostClass {
    HostClass::new("GoblinStats", "goblin_stats")
        .member(MemberDesc::new("attackPower", "int").named("attack"))
        .member(MemberDesc::new("taunts", TypeName::named("string").list_of()).defaulted())
}

fn env() -> Environment {
    let mut env = Environment::new();
    env.register_host_class(goblin_class()).unwrap();
    env.register_host_class(HostClass::new("Entity", "entity").kind(HostKind::Entity))
        .unwrap();
    env
}

#[test]
fn registered_types_are_global_symbols() {
    let env = env();
    assert!(matches!(env.lookup_global("goblin_stats"), Some(Symbol::Type(_))));
    let stats = env.registry().lookup("goblin_stats").unwrap();
    assert_eq!(&*stats.member("attack").unwrap().host_name, "attackPower");
    assert!(stats.member("attackPower").is_none());
    assert_eq!(
        stats.member("taunts").unwrap().default,
        Some(Value::List(LtVec::new()))
    );
}

#[test]
fn same_origin_twice_fails() {
    let mut env = env();
    let again = HostClass::new("GoblinStats", "goblin_stats_again");
    assert_eq!(
        env.register_host_class(again),
        Err(TypeRegistrationError::DuplicateOriginType("GoblinStats".into()))
    );
    assert!(env.lookup_global("goblin_stats_again").is_none());
}

#[test]
fn same_dsl_name_twice_fails() {
    let mut env = env();
    let clash = HostClass::new("OtherStats", "goblin_stats");
    assert_eq!(
        env.register_host_class(clash),
        Err(TypeRegistrationError::DuplicateTypeName("goblin_stats".into()))
    );
    let builtin = HostClass::new("Number", "int");
    assert!(env.register_host_class(builtin).is_err());
}

#[test]
fn duplicate_extension_fails() {
    let mut env = env();
    let property = || ExtensionProperty::host_state("goblin_stats", "Entity", "goblin_stats");
    env.register_extension_property(property()).unwrap();
    assert_eq!(
        env.register_extension_property(property()),
        Err(TypeRegistrationError::DuplicateExtension {
            type_name: "entity".into(),
            property: "goblin_stats".into(),
        })
    );
}

#[test]
fn extension_cannot_shadow_a_member() {
    let mut env = Environment::new();
    env.register_host_class(
        HostClass::new("Entity", "entity").member(MemberDesc::new("name", "string").defaulted()),
    )
    .unwrap();
    let result = env.register_extension_property(ExtensionProperty::new(
        "name",
        "Entity",
        "string",
        |_| Value::from("x"),
    ));
    assert!(matches!(result, Err(TypeRegistrationError::MemberConflict { .. })));
}

#[test]
fn extension_on_unknown_class_fails() {
    let mut env = env();
    let result = env.register_extension_property(ExtensionProperty::host_state(
        "stats",
        "Dragon",
        "goblin_stats",
    ));
    assert_eq!(result, Err(TypeRegistrationError::UnknownType("Dragon".into())));
}

#[test]
fn members_resolve_through_extensions() {
    let mut env = env();
    env.register_extension_property(ExtensionProperty::host_state(
        "stats",
        "Entity",
        "goblin_stats",
    ))
    .unwrap();
    let entity = env.registry().lookup("entity").unwrap();
    assert!(matches!(entity.resolve_member("stats"), Some(MemberRef::Extension(_))));
    assert!(entity.resolve_member("missing").is_none());
}

#[test]
fn invalid_defaults_are_rejected() {
    let mut env = Environment::new();
    let result = env.register_host_class(
        HostClass::new("Bad", "bad").member(MemberDesc::new("n", "int").with_default("text")),
    );
    assert!(matches!(result, Err(TypeRegistrationError::InvalidDefault { .. })));
    let result = env.register_host_class(
        HostClass::new("Worse", "worse").member(MemberDesc::new("n", "dragon")),
    );
    assert_eq!(result, Err(TypeRegistrationError::UnknownType("dragon".into())));
}
