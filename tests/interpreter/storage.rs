//! Integration tests for ScenarioBuilderStorage

use std::collections::HashMap;
use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use taskforge_foundation::{RegistryError, Type};
use taskforge_interpreter::{ScenarioBuilderStorage, SlotState};
use taskforge_language::{Environment, FunctionSymbol, analyze, parse_program};
use taskforge_stdlib::standard_environment;

struct Fixture {
    env: Environment,
    builders: Vec<Arc<FunctionSymbol>>,
}

impl Fixture {
    fn new(source: &str) -> Self {
        let mut env = standard_environment().unwrap();
        let analyzed = analyze(&mut env, parse_program(source, "builders.dsl").unwrap()).unwrap();
        Self {
            builders: analyzed.functions,
            env,
        }
    }

    fn ty(&self, name: &str) -> Type {
        self.env.registry().lookup(name).unwrap().ty()
    }
}

const BUILDERS: &str = "
    fn f1(fetch_quest q) { q.item = \"1\"; }
    fn f2(fetch_quest q) { q.item = \"2\"; }
    fn f3(fetch_quest q) { q.item = \"3\"; }
    fn riddle(single_choice_task t) { }
    fn helper(int n) { }
";

#[test]
fn environment_scan_creates_task_slots() {
    let fixture = Fixture::new(BUILDERS);
    let mut storage = ScenarioBuilderStorage::new();
    assert_eq!(storage.initialize_from_environment(&fixture.env), Ok(2));
    let types: Vec<_> = storage.types_with_storage().map(ToString::to_string).collect();
    assert_eq!(types, vec!["single_choice_task", "fetch_quest"]);
    assert_eq!(storage.state(&fixture.ty("fetch_quest")), SlotState::Empty);
    assert_eq!(storage.state(&fixture.ty("entity")), SlotState::Uninitialized);
}

#[test]
fn initializing_twice_fails() {
    let fixture = Fixture::new(BUILDERS);
    let quest = fixture.ty("fetch_quest");
    let mut storage = ScenarioBuilderStorage::new();
    storage.initialize_storage_for_type(fixture.env.registry(), quest.clone()).unwrap();
    assert_eq!(
        storage.initialize_storage_for_type(fixture.env.registry(), quest),
        Err(RegistryError::DuplicateStorage("fetch_quest".into()))
    );
}

#[test]
fn failed_environment_scan_creates_no_slots() {
    let fixture = Fixture::new(BUILDERS);
    let mut storage = ScenarioBuilderStorage::new();
    // fetch_quest is scanned after single_choice_task
    storage
        .initialize_storage_for_type(fixture.env.registry(), fixture.ty("fetch_quest"))
        .unwrap();

    assert_eq!(
        storage.initialize_from_environment(&fixture.env),
        Err(RegistryError::DuplicateStorage("fetch_quest".into()))
    );
    let types: Vec<_> = storage.types_with_storage().map(ToString::to_string).collect();
    assert_eq!(types, vec!["fetch_quest"]);
    assert_eq!(
        storage.state(&fixture.ty("single_choice_task")),
        SlotState::Uninitialized
    );
}

#[test]
fn only_task_types_have_slots() {
    let fixture = Fixture::new(BUILDERS);
    let registry = fixture.env.registry();
    let mut storage = ScenarioBuilderStorage::new();
    assert_eq!(
        storage.initialize_storage_for_type(registry, Type::Int),
        Err(RegistryError::NotATaskType("int".into()))
    );
    for name in ["entity", "velocity_component", "dungeon_config"] {
        assert_eq!(
            storage.initialize_storage_for_type(registry, fixture.ty(name)),
            Err(RegistryError::NotATaskType(name.into())),
        );
    }
    assert_eq!(storage.types_with_storage().count(), 0);
}

#[test]
fn retrieval_without_builders_is_absent() {
    let fixture = Fixture::new(BUILDERS);
    let quest = fixture.ty("fetch_quest");
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let mut storage = ScenarioBuilderStorage::new();

    assert!(storage.retrieve_random_scenario_builder_for_type(&quest, &mut rng).is_none());
    storage.initialize_storage_for_type(fixture.env.registry(), quest.clone()).unwrap();
    assert!(storage.retrieve_random_scenario_builder_for_type(&quest, &mut rng).is_none());
}

#[test]
fn storing_without_a_slot_is_a_no_op() {
    let fixture = Fixture::new(BUILDERS);
    let quest = fixture.ty("fetch_quest");
    let mut storage = ScenarioBuilderStorage::new();
    storage.initialize_storage_for_type(fixture.env.registry(), quest.clone()).unwrap();

    for builder in &fixture.builders {
        let stored = storage.store_scenario_builder(builder.clone());
        assert_eq!(stored, builder.name.starts_with('f'), "{}", builder.name);
    }
    assert_eq!(storage.types_with_storage().count(), 1);
    assert_eq!(storage.builders_for_type(&quest).len(), 3);
    assert_eq!(storage.state(&fixture.ty("single_choice_task")), SlotState::Uninitialized);
    assert!(storage.builders_for_type(&fixture.ty("single_choice_task")).is_empty());
}

#[test]
fn selection_is_roughly_uniform() {
    let fixture = Fixture::new(BUILDERS);
    let quest = fixture.ty("fetch_quest");
    let mut storage = ScenarioBuilderStorage::new();
    storage.initialize_storage_for_type(fixture.env.registry(), quest.clone()).unwrap();
    for builder in &fixture.builders {
        storage.store_scenario_builder(builder.clone());
    }
    assert_eq!(storage.state(&quest), SlotState::Populated);

    let trials = 3000;
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut counts: HashMap<String, usize> = HashMap::new();
    for _ in 0..trials {
        let builder = storage
            .retrieve_random_scenario_builder_for_type(&quest, &mut rng)
            .unwrap();
        *counts.entry(builder.name.to_string()).or_default() += 1;
    }

    assert_eq!(counts.len(), 3);
    for name in ["f1", "f2", "f3"] {
        let count = counts[name];
        assert!((850..=1150).contains(&count), "{name} picked {count} times");
    }
}

#[test]
fn same_seed_same_sequence() {
    let fixture = Fixture::new(BUILDERS);
    let quest = fixture.ty("fetch_quest");
    let mut storage = ScenarioBuilderStorage::new();
    storage.initialize_storage_for_type(fixture.env.registry(), quest.clone()).unwrap();
    for builder in &fixture.builders {
        storage.store_scenario_builder(builder.clone());
    }

    let sequence = |seed| {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        (0..20)
            .map(|_| {
                storage
                    .retrieve_random_scenario_builder_for_type(&quest, &mut rng)
                    .map(|f| f.name.to_string())
            })
            .collect::<Vec<_>>()
    };
    assert_eq!(sequence(9), sequence(9));
}
