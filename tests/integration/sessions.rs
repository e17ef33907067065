//! Multi-program sessions: later programs build on earlier ones, and a
//! failing program leaves everything loaded before it intact.

use std::collections::HashMap;

use taskforge_foundation::Value;
use taskforge_interpreter::{Runtime, RuntimeConfig};
use taskforge_runtime::parse_args;
use taskforge_stdlib::standard_environment;

fn runtime(seed: u64) -> Runtime {
    Runtime::new(standard_environment().unwrap(), RuntimeConfig::seeded(seed)).unwrap()
}

#[test]
fn programs_share_globals_and_builders() {
    let mut runtime = runtime(1);
    runtime
        .load("fetch_quest base { item: \"herb\", giver: \"witch\" }", "base.dsl")
        .unwrap();
    runtime
        .load(
            "fn rare(fetch_quest q) { q.item = \"rare \" + base.item; }",
            "variants.dsl",
        )
        .unwrap();

    let base = Value::Object(runtime.artifacts().object("base").unwrap().clone());
    let built = runtime.build_scenario(&base).unwrap().unwrap();
    let built = built.as_object().unwrap();
    assert_eq!(built.get("item"), Some(&Value::from("rare herb")));
    assert_eq!(built.get("giver"), Some(&Value::from("witch")));
}

#[test]
fn failed_program_keeps_earlier_content() {
    let mut runtime = runtime(1);
    runtime
        .load(
            "fetch_quest base { item: \"herb\" }\nfn keep(fetch_quest q) { }",
            "base.dsl",
        )
        .unwrap();

    let quest = runtime.environment().registry().lookup("fetch_quest").unwrap().ty();
    let globals_before = runtime.environment().global_symbols().count();
    let failed = runtime.load(
        "fn drop(fetch_quest q) { }\nfetch_quest broken { count: 1 / 0 }",
        "broken.dsl",
    );
    assert!(failed.is_err());

    assert_eq!(runtime.environment().global_symbols().count(), globals_before);
    assert_eq!(runtime.storage().builders_for_type(&quest).len(), 1);
    assert_eq!(runtime.artifacts().len(), 1);
    assert!(runtime.artifacts().object("base").is_some());

    // The names from the failed program are free again.
    runtime
        .load("fetch_quest broken { count: 2 }", "fixed.dsl")
        .unwrap();
    assert_eq!(runtime.artifacts().len(), 2);
}

#[test]
fn builders_are_picked_uniformly() {
    let mut runtime = runtime(2024);
    runtime
        .load(
            "fn f1(fetch_quest q) { q.item = \"f1\"; }
             fn f2(fetch_quest q) { q.item = \"f2\"; }
             fn f3(fetch_quest q) { q.item = \"f3\"; }",
            "builders.dsl",
        )
        .unwrap();
    let task = runtime.evaluate("fetch_quest {}").unwrap();

    let mut counts: HashMap<String, usize> = HashMap::new();
    for _ in 0..1500 {
        let built = runtime.build_scenario(&task).unwrap().unwrap();
        let item = built.as_object().unwrap().get("item").unwrap().to_string();
        *counts.entry(item).or_default() += 1;
    }
    assert_eq!(counts.len(), 3);
    for (item, count) in &counts {
        assert!((400..=600).contains(count), "{item} built {count} times");
    }
}

#[test]
fn cli_arguments_select_the_runtime_config() {
    let args: Vec<String> = ["taskforge", "--seed", "7", "--dump", "crypt.dsl"]
        .into_iter()
        .map(String::from)
        .collect();
    let config = parse_args(&args).unwrap();
    let runtime =
        Runtime::new(standard_environment().unwrap(), config.runtime_config()).unwrap();
    assert_eq!(runtime.config().seed, Some(7));
    assert!(config.dump);
}
