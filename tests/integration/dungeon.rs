//! A dungeon built from tasks, a dependency graph and a config object,
//! exported for the game runtime.

use std::collections::BTreeMap;

use serde::Deserialize;
use taskforge_foundation::{EdgeKind, Value};
use taskforge_interpreter::{Artifacts, Runtime, RuntimeConfig};
use taskforge_runtime::to_bytes;
use taskforge_stdlib::standard_environment;

const DUNGEON: &str = r#"
dungeon_config crypt { name: "The Crypt", dependency_graph: crypt_tasks }

graph crypt_tasks {
    find_torch -> light_brazier -> riddle [type=seq];
    riddle -> open_gate [type=c_c];
    riddle -> find_torch [type=c_f];
    open_gate -> loot [type=st_o];
}

fetch_quest find_torch { item: "torch", giver: "ghost" }
fetch_quest light_brazier { item: find_torch.item }
single_choice_task riddle {
    question: "What walks on four legs in the morning?",
    choices: ["a dog", "a human", "a goblin"],
    answer: 1,
}
fetch_quest open_gate { item: "key" }
fetch_quest loot { item: "gold", count: 50 }
"#;

fn load() -> (Runtime, Artifacts) {
    let mut runtime =
        Runtime::new(standard_environment().unwrap(), RuntimeConfig::seeded(2)).unwrap();
    let artifacts = runtime.load(DUNGEON, "crypt.dsl").unwrap();
    (runtime, artifacts)
}

#[test]
fn graph_edges_carry_their_kinds() {
    let (_, artifacts) = load();
    let graph = artifacts.graph("crypt_tasks").unwrap();
    let names: Vec<_> = graph.nodes.iter().map(|n| n.name.to_string()).collect();
    assert_eq!(
        names,
        vec!["find_torch", "light_brazier", "riddle", "open_gate", "loot"]
    );

    let edges: Vec<_> = graph
        .edges
        .iter()
        .map(|e| (&*graph.nodes[e.from].name, &*graph.nodes[e.to].name, e.kind))
        .collect();
    assert_eq!(
        edges,
        vec![
            ("find_torch", "light_brazier", EdgeKind::Sequence),
            ("light_brazier", "riddle", EdgeKind::Sequence),
            ("riddle", "open_gate", EdgeKind::ConditionalCorrect),
            ("riddle", "find_torch", EdgeKind::ConditionalFalse),
            ("open_gate", "loot", EdgeKind::SubtaskOptional),
        ]
    );
    assert_eq!(graph.topological_order(), None);
}

#[test]
fn nodes_hold_the_evaluated_tasks() {
    let (_, artifacts) = load();
    let graph = artifacts.graph("crypt_tasks").unwrap();
    let brazier = &graph.node("light_brazier").unwrap().task;
    assert_eq!(brazier.get("item"), Some(&Value::from("torch")));
    assert_eq!(brazier.get("count"), Some(&Value::Int(1)));
    assert_eq!(artifacts.object("light_brazier"), Some(brazier));
}

#[test]
fn dungeon_config_bundles_the_graph() {
    let (_, artifacts) = load();
    let crypt = artifacts.dungeon("crypt").unwrap();
    assert_eq!(&*crypt.display_name, "The Crypt");
    assert_eq!(&*crypt.dependency_graph.name, "crypt_tasks");
    assert_eq!(crypt.dependency_graph.nodes.len(), 5);
    assert_eq!(Some(&crypt.dependency_graph), artifacts.graph("crypt_tasks"));
}

#[test]
fn artifacts_export_with_field_names() {
    #[derive(Deserialize)]
    struct Dungeon {
        display_name: String,
    }

    #[derive(Deserialize)]
    struct Export {
        objects: BTreeMap<String, serde::de::IgnoredAny>,
        dungeons: BTreeMap<String, Dungeon>,
    }

    let (runtime, _) = load();
    let bytes = to_bytes(runtime.artifacts()).unwrap();
    let export: Export = rmp_serde::from_slice(&bytes).unwrap();
    assert_eq!(export.objects.len(), 6);
    assert_eq!(export.dungeons["crypt"].display_name, "The Crypt");
}
