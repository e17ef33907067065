//! Integration tests for the parser and pretty printer

use taskforge_language::pretty::pretty_print_program;
use taskforge_language::{NodeKind, Program, parse, parse_expression, parse_program};

const CONTENT: &str = r#"
// Monsters
entity_type goblin {
    velocity_component { x_velocity: 1.5, y_velocity: -2 },
    position_component,
}

fetch_quest find_key { item: "key", count: 1 }
fetch_quest open_door { item: "door" }
single_choice_task riddle { question: "2 + 2?", choices: ["3", "4"], answer: 1 }

graph cellar {
    find_key -> open_door [type=seq];
    open_door -> riddle [type=c_c];
    riddle;
}

dungeon_config cellar_dungeon { name: "Cellar", dependency_graph: cellar }

fn harder(fetch_quest q) -> fetch_quest {
    var extra : int;
    for int i in range(3) {
        if i % 2 == 0 { extra = extra + 1; } else if i > 5 { return q; }
    }
    while extra > 0 and !false { extra = extra - 1; }
    q.count = q.count * 2 + extra;
    return q;
}

fn tags() -> [string -> int<>] {
    var m : [string -> int<>];
    var s = <1, 2>;
    return m;
}
"#;

fn names(program: &Program) -> Vec<String> {
    program
        .definitions
        .iter()
        .map(|d| Program::definition_name(d).to_string())
        .collect()
}

#[test]
fn parses_every_definition_kind() {
    let program = parse_program(CONTENT, "cellar.dsl").unwrap();
    assert_eq!(
        names(&program),
        vec![
            "goblin",
            "find_key",
            "open_door",
            "riddle",
            "cellar",
            "cellar_dungeon",
            "harder",
            "tags",
        ]
    );
    let kinds: Vec<_> = program.definitions.iter().map(|d| d.kind.clone()).collect();
    assert_eq!(kinds[0], NodeKind::PrototypeDefinition);
    assert_eq!(kinds[1], NodeKind::ObjectDefinition);
    assert_eq!(kinds[4], NodeKind::GraphDefinition);
    assert_eq!(kinds[6], NodeKind::FunctionDefinition);
}

#[test]
fn pretty_print_is_a_fixed_point() {
    let program = parse_program(CONTENT, "cellar.dsl").unwrap();
    let printed = pretty_print_program(&program);
    let reparsed = parse_program(&printed, "printed.dsl").unwrap();
    assert!(program.structurally_eq(&reparsed), "{printed}");
    assert_eq!(pretty_print_program(&reparsed), printed);
}

#[test]
fn all_syntax_errors_are_reported() {
    let source = "entity_type { }\nfn ok() {}\ngraph g { a -> ; }\n";
    let (program, errors) = parse(source, "bad.dsl");
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0].location.line, 1);
    assert_eq!(errors[1].location.line, 3);
    assert_eq!(names(&program), vec!["ok"]);

    let diagnostics = parse_program(source, "bad.dsl").unwrap_err();
    let entries = diagnostics.entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].0.as_ref().map(|l| l.to_string()), Some("bad.dsl:1:13".into()));
}

#[test]
fn expressions_parse_standalone() {
    let node = parse_expression("a.b(1, 2) + 3 * 4").unwrap();
    assert!(node.is_well_formed());
    assert!(parse_expression("1 +").is_err());
}
