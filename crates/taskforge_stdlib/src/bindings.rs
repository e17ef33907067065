//! Host classes exposed to DSL programs.
//!
//! Component classes become members of an entity through extension
//! properties: `goblin_entity.velocity_component` reads and writes the
//! component stored in the entity's host state, the way a game object's
//! attached components are reached.

use taskforge_foundation::{DungeonConfig, Result, Value};
use taskforge_language::Environment;
use taskforge_types::{ExtensionProperty, HostClass, HostKind, MemberDesc, TypeName};

/// Host name of the entity class that components attach to.
pub const ENTITY_HOST: &str = "Entity";

/// DSL names of the component types, in registration order.
pub const COMPONENTS: [&str; 4] = [
    "velocity_component",
    "position_component",
    "draw_component",
    "health_component",
];

fn components() -> Vec<HostClass> {
    vec![
        HostClass::new("VelocityComponent", "velocity_component")
            .kind(HostKind::Component)
            .member(MemberDesc::new("xVelocity", "float").named("x_velocity"))
            .member(MemberDesc::new("yVelocity", "float").named("y_velocity")),
        HostClass::new("PositionComponent", "position_component")
            .kind(HostKind::Component)
            .member(MemberDesc::new("x", "float").defaulted())
            .member(MemberDesc::new("y", "float").defaulted()),
        HostClass::new("DrawComponent", "draw_component")
            .kind(HostKind::Component)
            .member(MemberDesc::new("path", "string").defaulted())
            .member(MemberDesc::new("layer", "int").defaulted()),
        HostClass::new("HealthComponent", "health_component")
            .kind(HostKind::Component)
            .member(MemberDesc::new("health", "int").with_default(100_i64))
            .member(MemberDesc::new("maxHealth", "int").named("max_health").with_default(100_i64)),
    ]
}

fn tasks() -> Vec<HostClass> {
    vec![
        HostClass::new("SingleChoiceTask", "single_choice_task")
            .kind(HostKind::Task)
            .member(MemberDesc::new("question", "string").defaulted())
            .member(MemberDesc::new("choices", TypeName::named("string").list_of()).defaulted())
            .member(MemberDesc::new("correctChoice", "int").named("answer").defaulted()),
        HostClass::new("FetchQuest", "fetch_quest")
            .kind(HostKind::Task)
            .member(MemberDesc::new("item", "string").defaulted())
            .member(MemberDesc::new("count", "int").with_default(1_i64))
            .member(MemberDesc::new("giver", "string").defaulted()),
    ]
}

/// Registers the standard host classes and the entity's component properties.
///
/// # Errors
///
/// Returns a registration error if any class or property name is taken.
pub fn register_host_classes(env: &mut Environment) -> Result<()> {
    for class in components() {
        env.register_host_class(class)?;
    }
    for class in tasks() {
        env.register_host_class(class)?;
    }

    env.register_host_class(
        HostClass::new(DungeonConfig::HOST_NAME, DungeonConfig::DSL_NAME)
            .member(MemberDesc::new("display_name", "string").named(DungeonConfig::NAME_MEMBER))
            .member(MemberDesc::new(
                DungeonConfig::GRAPH_MEMBER,
                "task_dependency_graph",
            )),
    )?;

    env.register_host_class(
        HostClass::new(ENTITY_HOST, "entity")
            .kind(HostKind::Entity)
            .member(MemberDesc::new("name", "string").defaulted()),
    )?;
    for component in COMPONENTS {
        env.register_extension_property(ExtensionProperty::host_state(
            component,
            ENTITY_HOST,
            component,
        ))?;
    }
    env.register_extension_property(ExtensionProperty::new(
        "component_count",
        ENTITY_HOST,
        "int",
        |entity| Value::Int(i64::try_from(entity.host_state.len()).unwrap_or(i64::MAX)),
    ))?;
    Ok(())
}
