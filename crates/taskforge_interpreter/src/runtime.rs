//! Load-time session: compile, evaluate and register DSL programs.
//!
//! A [`Runtime`] owns the [`Environment`] the host populated, the values of
//! every program loaded so far, the accumulated [`Artifacts`] and the
//! [`ScenarioBuilderStorage`]. Programs are loaded one at a time; a program
//! that fails to parse, analyze or evaluate leaves the session exactly as it
//! was before the load.

use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use taskforge_foundation::{
    Diagnostics, Error, InterpretationErrorKind, Result, SourceLocation, Type, Value,
};
use taskforge_language::{
    AnalyzedProgram, Environment, FunctionSymbol, analyze, analyze_expression, parse_expression,
    parse_program,
};
use tracing::{debug, info};

use crate::artifacts::Artifacts;
use crate::config::RuntimeConfig;
use crate::interpreter::{Globals, Interpreter};
use crate::storage::ScenarioBuilderStorage;

/// A content-loading session over one environment.
pub struct Runtime {
    env: Environment,
    config: RuntimeConfig,
    storage: ScenarioBuilderStorage,
    artifacts: Artifacts,
    globals: Globals,
    rng: ChaCha8Rng,
    output: Vec<String>,
}

impl Runtime {
    /// Creates a session and a builder slot for every task type in the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns a registry error if a task type is bound twice.
    pub fn new(env: Environment, config: RuntimeConfig) -> Result<Self> {
        let mut storage = ScenarioBuilderStorage::new();
        let slots = storage.initialize_from_environment(&env)?;
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        debug!(slots, seed = ?config.seed, "created runtime");
        Ok(Self {
            env,
            config,
            storage,
            artifacts: Artifacts::new(),
            globals: Globals::new(),
            rng,
            output: Vec::new(),
        })
    }

    /// Parses and analyzes a program without evaluating it.
    ///
    /// Nothing is bound: the environment is left as it was, so a later
    /// [`load`](Self::load) can still define the same names.
    ///
    /// # Errors
    ///
    /// Returns every syntax error, or the first semantic error.
    pub fn compile(
        &mut self,
        source: &str,
        file: &str,
    ) -> std::result::Result<AnalyzedProgram, Diagnostics> {
        let checkpoint = self.env.checkpoint();
        let analyzed = self.bind(source, file);
        self.env.rollback(checkpoint);
        analyzed
    }

    /// Parses and analyzes a program, keeping its definitions bound.
    fn bind(
        &mut self,
        source: &str,
        file: &str,
    ) -> std::result::Result<AnalyzedProgram, Diagnostics> {
        let program = parse_program(source, file)?;
        Ok(analyze(&mut self.env, program)?)
    }

    /// Loads a program: compile, evaluate, then register its scenario builders.
    ///
    /// Returns the artifacts this program produced; they are also merged into
    /// [`artifacts`](Self::artifacts).
    ///
    /// # Errors
    ///
    /// Returns the compilation diagnostics, or the interpretation error that
    /// aborted evaluation. Either way nothing from the program is kept.
    pub fn load(
        &mut self,
        source: &str,
        file: &str,
    ) -> std::result::Result<Artifacts, Diagnostics> {
        let checkpoint = self.env.checkpoint();
        let analyzed = self.bind(source, file)?;

        let mut interpreter =
            Interpreter::new(&self.env, &self.config, &mut self.globals, &mut self.output);
        let artifacts = match interpreter.run_program(&analyzed.program) {
            Ok(artifacts) => artifacts,
            Err(e) => {
                self.globals.discard();
                self.env.rollback(checkpoint);
                return Err(e.with_source(file).into());
            }
        };
        self.globals.commit();
        self.discard_output();

        let mut stored = 0;
        for builder in &analyzed.scenario_builders {
            if self.storage.store_scenario_builder(builder.clone()) {
                stored += 1;
            }
        }
        info!(file, artifacts = artifacts.len(), builders = stored, "loaded program");
        self.artifacts.merge(artifacts.clone());
        Ok(artifacts)
    }

    /// Evaluates a standalone expression against the loaded programs.
    ///
    /// # Errors
    ///
    /// Returns the parse, semantic or interpretation error.
    pub fn evaluate(&mut self, source: &str) -> Result<Value> {
        let expression = parse_expression(source)?;
        analyze_expression(&mut self.env, &expression)?;
        let mut interpreter =
            Interpreter::new(&self.env, &self.config, &mut self.globals, &mut self.output);
        let value = interpreter.evaluate(&expression);
        self.discard_output();
        value
    }

    /// Calls a global function by name.
    ///
    /// # Errors
    ///
    /// Returns an unbound reference error for an unknown name, or the call's error.
    pub fn call(&mut self, name: &str, args: Vec<Value>) -> Result<Value> {
        let Some(function) = self.env.function(name).cloned() else {
            return Err(Error::interpretation(
                SourceLocation::host(),
                InterpretationErrorKind::UnboundReference(name.to_string()),
            ));
        };
        let mut interpreter =
            Interpreter::new(&self.env, &self.config, &mut self.globals, &mut self.output);
        let value = interpreter.call(&function, args, &function.location);
        self.discard_output();
        value
    }

    /// Picks a random builder for the task's type, if any.
    pub fn pick_builder(&mut self, task_type: &Type) -> Option<Arc<FunctionSymbol>> {
        self.storage
            .retrieve_random_scenario_builder_for_type(task_type, &mut self.rng)
    }

    /// Builds a scenario variant of a task object.
    ///
    /// Returns `None` when no builder is stored for the task's type.
    ///
    /// # Errors
    ///
    /// Returns the builder's interpretation error.
    pub fn build_scenario(&mut self, task: &Value) -> Result<Option<Value>> {
        let Some(object) = task.as_object() else {
            return Ok(None);
        };
        let Some(builder) = self.pick_builder(&Type::Aggregate(object.ty.clone())) else {
            debug!(task_type = %object.ty.name, "no scenario builder available");
            return Ok(None);
        };
        debug!(task_type = %object.ty.name, builder = %builder.name, "building scenario");
        let mut interpreter =
            Interpreter::new(&self.env, &self.config, &mut self.globals, &mut self.output);
        let built = interpreter.call_builder(&builder, task.clone());
        self.discard_output();
        built.map(Some)
    }

    /// The environment.
    #[must_use]
    pub fn environment(&self) -> &Environment {
        &self.env
    }

    /// The builder storage.
    #[must_use]
    pub fn storage(&self) -> &ScenarioBuilderStorage {
        &self.storage
    }

    /// Every artifact loaded so far.
    #[must_use]
    pub fn artifacts(&self) -> &Artifacts {
        &self.artifacts
    }

    /// The session configuration.
    #[must_use]
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Captured `print` output.
    #[must_use]
    pub fn output(&self) -> &[String] {
        &self.output
    }

    /// Takes the captured `print` output, leaving it empty.
    pub fn take_output(&mut self) -> Vec<String> {
        std::mem::take(&mut self.output)
    }

    fn discard_output(&mut self) {
        if !self.config.capture_output {
            self.output.clear();
        }
    }
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("config", &self.config)
            .field("artifacts", &self.artifacts.len())
            .field("globals", &self.globals.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskforge_foundation::ErrorKind;
    use taskforge_types::{HostClass, HostKind, MemberDesc};

    fn env() -> Environment {
        let mut env = Environment::new();
        env.register_host_class(
            HostClass::new("FetchQuest", "fetch_quest")
                .kind(HostKind::Task)
                .member(MemberDesc::new("item", "string").defaulted()),
        )
        .unwrap();
        env.register_host_class(
            HostClass::new("Riddle", "riddle")
                .kind(HostKind::Task)
                .member(MemberDesc::new("answer", "string").defaulted()),
        )
        .unwrap();
        env
    }

    fn runtime(seed: u64) -> Runtime {
        Runtime::new(env(), RuntimeConfig::seeded(seed)).unwrap()
    }

    #[test]
    fn slots_exist_for_task_types() {
        let runtime = runtime(1);
        assert_eq!(runtime.storage().types_with_storage().count(), 2);
    }

    #[test]
    fn load_registers_builders() {
        let mut runtime = runtime(1);
        runtime
            .load(
                "fn sword(fetch_quest q) { q.item = \"sword\"; }
                 fn helper(int x) -> int { return x; }",
                "quests.dsl",
            )
            .unwrap();
        let quest = runtime.environment().registry().lookup("fetch_quest").unwrap().ty();
        assert_eq!(runtime.storage().builders_for_type(&quest).len(), 1);
        let task = runtime.evaluate("fetch_quest {}").unwrap();
        let built = runtime.build_scenario(&task).unwrap().unwrap();
        assert_eq!(built.as_object().unwrap().get("item"), Some(&Value::from("sword")));
    }

    #[test]
    fn no_builder_means_none() {
        let mut runtime = runtime(1);
        let riddle = runtime.evaluate("riddle {}").unwrap();
        assert_eq!(runtime.build_scenario(&riddle).unwrap(), None);
    }

    #[test]
    fn failed_load_rolls_back() {
        let mut runtime = runtime(1);
        let error = runtime
            .load(
                "fetch_quest q { item: \"a\" }
                 fn bad(fetch_quest q) -> string { var n = 1 / 0; return q.item; }
                 fetch_quest broken { item: bad(q) }",
                "bad.dsl",
            )
            .unwrap_err();
        assert_eq!(error.len(), 1);
        assert!(runtime.environment().lookup_global("bad").is_none());
        assert!(runtime.environment().lookup_global("q").is_none());
        assert!(runtime.artifacts().is_empty());
        let quest = runtime.environment().registry().lookup("fetch_quest").unwrap().ty();
        assert!(runtime.storage().builders_for_type(&quest).is_empty());

        runtime.load("fetch_quest q { item: \"b\" }", "good.dsl").unwrap();
        assert_eq!(runtime.artifacts().len(), 1);
    }

    #[test]
    fn compile_binds_nothing() {
        let mut runtime = runtime(1);
        let analyzed = runtime
            .compile(
                "fetch_quest q { item: \"a\" }
                 fn sword(fetch_quest t) { t.item = \"sword\"; }",
                "quests.dsl",
            )
            .unwrap();
        assert_eq!(analyzed.scenario_builders.len(), 1);
        assert!(runtime.environment().lookup_global("q").is_none());
        assert!(runtime.environment().lookup_global("sword").is_none());
        let quest = runtime.environment().registry().lookup("fetch_quest").unwrap().ty();
        assert!(runtime.storage().builders_for_type(&quest).is_empty());

        let error = runtime
            .load("fetch_quest q2 { item: q.item }", "later.dsl")
            .unwrap_err();
        assert_eq!(error.len(), 1);
        runtime
            .load("fetch_quest q { item: \"a\" }", "quests.dsl")
            .unwrap();
        assert!(runtime.artifacts().object("q").is_some());
    }

    #[test]
    fn semantic_errors_are_diagnostics() {
        let mut runtime = runtime(1);
        let error = runtime.load("fn f() { x = 1; }", "f.dsl").unwrap_err();
        let entries = error.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].0.as_ref().map(|l| (l.line, l.column)), Some((1, 10)));
        assert!(matches!(
            error.iter().next().map(|e| &e.kind),
            Some(ErrorKind::Semantic(_))
        ));
    }

    #[test]
    fn later_programs_see_earlier_definitions() {
        let mut runtime = runtime(1);
        runtime.load("fetch_quest first { item: \"key\" }", "a.dsl").unwrap();
        runtime
            .load("fetch_quest second { item: first.item }", "b.dsl")
            .unwrap();
        let second = runtime.artifacts().object("second").unwrap();
        assert_eq!(second.get("item"), Some(&Value::from("key")));
    }

    #[test]
    fn seeded_runtimes_pick_the_same_builders() {
        let source = "fn f1(fetch_quest q) { q.item = \"1\"; }
                      fn f2(fetch_quest q) { q.item = \"2\"; }
                      fn f3(fetch_quest q) { q.item = \"3\"; }";
        let picks = |seed| {
            let mut runtime = runtime(seed);
            runtime.load(source, "b.dsl").unwrap();
            let task = runtime.evaluate("fetch_quest {}").unwrap();
            (0..10)
                .map(|_| runtime.build_scenario(&task).unwrap().unwrap())
                .collect::<Vec<_>>()
        };
        assert_eq!(picks(7), picks(7));
    }
}
