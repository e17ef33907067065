//! taskforge CLI entry point.

use std::env;
use std::process::ExitCode;

use taskforge_interpreter::{Artifacts, Runtime};
use taskforge_runtime::cli::{CliConfig, parse_args, print_help};
use taskforge_runtime::{init_logging, save_to_file};
use taskforge_stdlib::standard_environment;

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("\x1b[31mError: {e}\x1b[0m");
            ExitCode::FAILURE
        }
    }
}

/// Returns false if any program failed to load.
fn run(args: &[String]) -> Result<bool, Box<dyn std::error::Error>> {
    let config = parse_args(args)?;

    if config.show_help {
        print_help();
        return Ok(true);
    }

    if config.show_version {
        println!("taskforge {}", env!("CARGO_PKG_VERSION"));
        return Ok(true);
    }

    init_logging(config.log_filter())?;
    let succeeded = load_files(&config)?;
    Ok(succeeded)
}

fn load_files(config: &CliConfig) -> Result<bool, Box<dyn std::error::Error>> {
    let mut runtime = Runtime::new(standard_environment()?, config.runtime_config())?;

    let mut succeeded = true;
    for path in &config.files {
        let file = path.display().to_string();
        let source = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read '{file}': {e}"))?;
        match runtime.load(&source, &file) {
            Ok(artifacts) => {
                println!("\x1b[32mloaded\x1b[0m {file} ({} artifacts)", artifacts.len());
            }
            Err(diagnostics) => {
                succeeded = false;
                for (location, message) in diagnostics.entries() {
                    match location {
                        Some(location) => eprintln!("\x1b[31m{location}\x1b[0m: {message}"),
                        None => eprintln!("\x1b[31m{file}\x1b[0m: {message}"),
                    }
                }
            }
        }
        for line in runtime.take_output() {
            println!("{line}");
        }
    }

    if config.dump {
        dump_artifacts(runtime.artifacts());
    }

    if let Some(path) = &config.export {
        save_to_file(runtime.artifacts(), path)?;
        println!("exported artifacts to {}", path.display());
    }

    Ok(succeeded)
}

fn dump_artifacts(artifacts: &Artifacts) {
    println!("\x1b[1;36m=== Artifacts ===\x1b[0m");

    println!("Prototypes: {}", artifacts.prototypes.len());
    for (name, prototype) in &artifacts.prototypes {
        let components = prototype
            .components
            .iter()
            .map(|c| c.type_name().to_string())
            .collect::<Vec<_>>();
        println!("  - {name} [{}]", components.join(", "));
    }

    println!("Graphs: {}", artifacts.graphs.len());
    for (name, graph) in &artifacts.graphs {
        println!("  - {name} ({} tasks)", graph.nodes.len());
        for edge in &graph.edges {
            println!(
                "      {} -> {} ({})",
                graph.nodes[edge.from].name, graph.nodes[edge.to].name, edge.kind
            );
        }
    }

    println!("Objects: {}", artifacts.objects.len());
    for (name, object) in &artifacts.objects {
        println!("  - {name}: {object}");
    }

    println!("Dungeons: {}", artifacts.dungeons.len());
    for (name, dungeon) in &artifacts.dungeons {
        println!(
            "  - {name}: \"{}\" using {}",
            dungeon.display_name, dungeon.dependency_graph.name
        );
    }

    println!();
}
