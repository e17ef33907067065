//! Tree-walking evaluator for analyzed programs.
//!
//! The interpreter walks the AST directly. Top-level definitions are bound
//! in [`Globals`] and evaluated on first use, so definitions may refer to
//! each other in any order; a definition that depends on itself fails with
//! a cyclic definition error. Function calls push a frame of lexical
//! scopes; blocks push and pop scopes within the current frame.
//!
//! Runtime checks are limited to what analysis cannot rule out: arithmetic
//! faults, values produced by `any`-typed natives, missing members and the
//! configured depth and loop limits. Every failure carries the location of
//! the node being evaluated.

use std::collections::HashMap;
use std::sync::Arc;

use taskforge_foundation::{
    AggregateRef, DungeonConfig, EdgeKind, Error, InterpretationErrorKind, Object, Prototype,
    Result, SourceLocation, TaskDependencyGraph, Type, Value,
};
use taskforge_language::ast::slot;
use taskforge_language::{
    BinaryOp, Environment, FunctionOrigin, FunctionSymbol, NativeContext, Node, NodeKind, Program,
};
use taskforge_types::MemberRef;
use tracing::{debug, trace};

use crate::artifacts::Artifacts;
use crate::config::RuntimeConfig;
use crate::ops;

/// Values of top-level definitions.
///
/// Definitions of the program being run are staged; they become visible to
/// later programs only after [`commit`](Self::commit).
#[derive(Debug, Default)]
pub struct Globals {
    committed: HashMap<Arc<str>, Value>,
    staged: HashMap<Arc<str>, Value>,
    pending: HashMap<Arc<str>, Arc<Node>>,
    evaluating: Vec<Arc<str>>,
}

impl Globals {
    /// Creates an empty set of globals.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value of an evaluated definition.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.staged.get(name).or_else(|| self.committed.get(name))
    }

    /// Queues the value definitions of a program for lazy evaluation.
    pub fn stage(&mut self, program: &Program) {
        for definition in &program.definitions {
            if definition.kind != NodeKind::FunctionDefinition {
                let name = Program::definition_name(definition);
                self.pending.insert(name.into(), definition.clone());
            }
        }
    }

    /// Publishes the staged values.
    pub fn commit(&mut self) {
        self.committed.extend(self.staged.drain());
        self.pending.clear();
        self.evaluating.clear();
    }

    /// Drops everything staged since the last commit.
    pub fn discard(&mut self) {
        self.staged.clear();
        self.pending.clear();
        self.evaluating.clear();
    }

    /// Number of committed values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.committed.len()
    }

    /// Returns true if nothing has been committed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.committed.is_empty()
    }
}

#[derive(Debug)]
struct Local {
    value: Value,
    ty: Type,
}

/// Lexical scopes of one function invocation, innermost last.
#[derive(Debug)]
struct Frame {
    scopes: Vec<HashMap<Arc<str>, Local>>,
    return_type: Type,
}

impl Frame {
    fn new(return_type: Type) -> Self {
        Self {
            scopes: vec![HashMap::new()],
            return_type,
        }
    }

    fn lookup(&self, name: &str) -> Option<&Local> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    fn lookup_mut(&mut self, name: &str) -> Option<&mut Local> {
        self.scopes.iter_mut().rev().find_map(|scope| scope.get_mut(name))
    }

    fn declare(&mut self, name: Arc<str>, local: Local) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name, local);
        }
    }
}

enum Flow {
    Next,
    Return(Value),
}

fn error(node: &Node, kind: InterpretationErrorKind) -> Error {
    Error::interpretation(node.location.clone(), kind)
}

fn mismatch(node: &Node, expected: impl Into<String>, actual: &Value) -> Error {
    error(
        node,
        InterpretationErrorKind::TypeMismatch {
            expected: expected.into(),
            actual: actual.kind_name(),
        },
    )
}

fn identifier(node: &Node) -> Result<&Arc<str>> {
    node.as_identifier()
        .ok_or_else(|| Error::internal(format!("expected identifier, found {}", node.kind.name())))
}

/// Evaluates analyzed programs and expressions against an environment.
pub struct Interpreter<'a> {
    env: &'a Environment,
    config: &'a RuntimeConfig,
    globals: &'a mut Globals,
    output: &'a mut Vec<String>,
    frames: Vec<Frame>,
}

impl<'a> Interpreter<'a> {
    /// Creates an interpreter over shared session state.
    pub fn new(
        env: &'a Environment,
        config: &'a RuntimeConfig,
        globals: &'a mut Globals,
        output: &'a mut Vec<String>,
    ) -> Self {
        Self {
            env,
            config,
            globals,
            output,
            frames: Vec::new(),
        }
    }

    /// Evaluates every value definition of a program.
    ///
    /// The program's definitions are staged in the globals; the caller
    /// commits or discards them depending on the outcome.
    ///
    /// # Errors
    ///
    /// Returns the first interpretation error. No artifacts are produced.
    pub fn run_program(&mut self, program: &Program) -> Result<Artifacts> {
        self.globals.stage(program);
        let mut artifacts = Artifacts::new();
        for definition in &program.definitions {
            if definition.kind == NodeKind::FunctionDefinition {
                continue;
            }
            let name: Arc<str> = Program::definition_name(definition).into();
            let value = self.global(&name, definition)?;
            if let Value::Object(object) = &value {
                if self.is_dungeon_config(&object.ty) {
                    let config = DungeonConfig::from_object(object).ok_or_else(|| {
                        mismatch(definition, "dungeon_config with a graph", &value)
                    })?;
                    artifacts.insert_dungeon(name.clone(), config);
                }
            }
            artifacts.insert(name, &value);
        }
        debug!(file = %program.file, artifacts = artifacts.len(), "evaluated program");
        Ok(artifacts)
    }

    /// Evaluates a standalone expression in the global scope.
    ///
    /// # Errors
    ///
    /// Returns the first interpretation error.
    pub fn evaluate(&mut self, expression: &Node) -> Result<Value> {
        self.expression(expression)
    }

    /// Calls a function with evaluated arguments.
    ///
    /// # Errors
    ///
    /// Returns an error if the arguments do not fit the signature or the body fails.
    pub fn call(
        &mut self,
        function: &FunctionSymbol,
        args: Vec<Value>,
        at: &SourceLocation,
    ) -> Result<Value> {
        let expected = function.function_type.parameters.len();
        if args.len() != expected {
            return Err(Error::interpretation(
                at.clone(),
                InterpretationErrorKind::TypeMismatch {
                    expected: format!("{expected} arguments"),
                    actual: args.len().to_string(),
                },
            ));
        }
        match &function.origin {
            FunctionOrigin::Native(native) => {
                trace!(function = native.name, args = args.len(), "native call");
                let env = self.env;
                let mut context = NativeContext {
                    registry: env.registry(),
                    output: &mut *self.output,
                };
                native
                    .call(&mut context, &args)
                    .map_err(|kind| Error::interpretation(at.clone(), kind))
            }
            FunctionOrigin::Defined { definition } => self
                .invoke(function, definition, args, at)
                .map(|(value, _)| value),
        }
    }

    /// Runs a scenario builder on a task.
    ///
    /// Parameters after the first receive their type's default. Returns the
    /// builder's return value, or the task as the builder left it when the
    /// builder returns nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if a trailing parameter has no default or the body fails.
    pub fn call_builder(&mut self, function: &FunctionSymbol, task: Value) -> Result<Value> {
        let mut args = vec![task];
        for ty in function.function_type.parameters.iter().skip(1) {
            args.push(self.default_value(ty, &function.location)?);
        }
        let Some(definition) = function.definition() else {
            return self.call(function, args, &function.location);
        };
        let (value, frame) = self.invoke(function, definition, args, &function.location)?;
        if !matches!(value, Value::None) {
            return Ok(value);
        }
        let task = definition
            .child(slot::FUNCTION_PARAMETERS)
            .children
            .first()
            .and_then(|param| frame.lookup(param.name_in(slot::PARAMETER_ID)))
            .map_or(Value::None, |local| local.value.clone());
        Ok(task)
    }

    fn invoke(
        &mut self,
        function: &FunctionSymbol,
        definition: &Node,
        args: Vec<Value>,
        at: &SourceLocation,
    ) -> Result<(Value, Frame)> {
        let limit = self.config.max_call_depth;
        if self.frames.len() >= limit {
            return Err(Error::interpretation(
                at.clone(),
                InterpretationErrorKind::CallDepthExceeded(limit),
            ));
        }
        let mut frame = Frame::new(function.function_type.return_type.clone());
        let params = &definition.child(slot::FUNCTION_PARAMETERS).children;
        for ((param, ty), arg) in params
            .iter()
            .zip(&function.function_type.parameters)
            .zip(args)
        {
            if !ops::fits(&arg, ty) {
                return Err(mismatch(param, ty.to_string(), &arg));
            }
            let name = identifier(param.child(slot::PARAMETER_ID))?.clone();
            frame.declare(
                name,
                Local {
                    value: ops::coerce(arg, ty),
                    ty: ty.clone(),
                },
            );
        }

        trace!(function = %function.name, depth = self.frames.len() + 1, "call");
        self.frames.push(frame);
        let result = self.statements(&definition.child(slot::FUNCTION_BODY).children);
        let frame = self
            .frames
            .pop()
            .ok_or_else(|| Error::internal("call frame missing on return"))?;
        let flow = result
            .map_err(|e| e.with_frame(format!("in {} ({})", function.name, function.location)))?;

        let value = match flow {
            Flow::Return(value) => ops::coerce(value, &function.function_type.return_type),
            Flow::Next => Value::None,
        };
        Ok((value, frame))
    }

    // ------------------------------------------------------------------
    // Definitions
    // ------------------------------------------------------------------

    fn global(&mut self, name: &str, at: &Node) -> Result<Value> {
        if let Some(value) = self.globals.get(name) {
            return Ok(value.clone());
        }
        if self.globals.evaluating.iter().any(|n| &**n == name) {
            return Err(error(at, InterpretationErrorKind::CyclicDefinition(name.to_string())));
        }
        let Some(definition) = self.globals.pending.get(name).cloned() else {
            return Err(error(at, InterpretationErrorKind::UnboundReference(name.to_string())));
        };

        let name: Arc<str> = name.into();
        self.globals.evaluating.push(name.clone());
        // Function locals are not visible inside a definition.
        let saved = std::mem::take(&mut self.frames);
        let result = self.definition(&definition);
        self.frames = saved;
        self.globals.evaluating.pop();

        let value = result?;
        debug!(definition = %name, kind = definition.kind.name(), "evaluated definition");
        self.globals.pending.remove(&name);
        self.globals.staged.insert(name, value.clone());
        Ok(value)
    }

    fn definition(&mut self, definition: &Node) -> Result<Value> {
        match definition.kind {
            NodeKind::PrototypeDefinition => self.prototype(definition),
            NodeKind::ObjectDefinition => self
                .construct(
                    definition.child(slot::OBJECT_TYPE),
                    definition.child(slot::OBJECT_PROPERTIES),
                    definition,
                )
                .map(Value::Object),
            NodeKind::GraphDefinition => self.graph(definition),
            _ => Err(Error::internal(format!(
                "{} is not a value definition",
                definition.kind.name()
            ))),
        }
    }

    fn prototype(&mut self, definition: &Node) -> Result<Value> {
        let mut prototype = Prototype::new(definition.name_in(slot::PROTOTYPE_ID));
        for component in &definition.child(slot::PROTOTYPE_COMPONENTS).children {
            let object = self.construct(
                component.child(slot::COMPONENT_TYPE),
                component.child(slot::COMPONENT_PROPERTIES),
                component,
            )?;
            prototype.components.push(object);
        }
        Ok(Value::Prototype(Arc::new(prototype)))
    }

    fn graph(&mut self, definition: &Node) -> Result<Value> {
        let mut graph = TaskDependencyGraph::new(definition.name_in(slot::GRAPH_ID));
        for statement in &definition.child(slot::GRAPH_STATEMENTS).children {
            let kind = statement
                .child(slot::EDGE_ATTRIBUTES)
                .children
                .iter()
                .find(|a| a.name_in(slot::ATTRIBUTE_KEY) == "type")
                .and_then(|a| EdgeKind::from_attribute(a.name_in(slot::ATTRIBUTE_VALUE)))
                .unwrap_or_default();

            let mut previous = None;
            for node in &statement.child(slot::EDGE_CHAIN).children {
                let name = identifier(node)?;
                let task = match self.global(name, node)? {
                    Value::Object(task) => task,
                    other => return Err(mismatch(node, "task", &other)),
                };
                let index = graph.add_node(name.clone(), task);
                if let Some(from) = previous {
                    graph.add_edge(from, index, kind);
                }
                previous = Some(index);
            }
        }
        Ok(Value::Graph(Arc::new(graph)))
    }

    fn is_dungeon_config(&self, aref: &AggregateRef) -> bool {
        self.env
            .registry()
            .aggregate(aref)
            .and_then(|aggregate| aggregate.origin.as_ref())
            .is_some_and(|origin| &*origin.host_name == DungeonConfig::HOST_NAME)
    }

    // ------------------------------------------------------------------
    // Objects
    // ------------------------------------------------------------------

    /// Builds an object from a type name and a property list.
    ///
    /// Provided members are bound by name; omitted members take their declared
    /// default, and an omitted member without one is an error.
    fn construct(&mut self, type_id: &Node, properties: &Node, at: &Node) -> Result<Object> {
        let env = self.env;
        let type_name = identifier(type_id)?;
        let Some(aggregate) = env.registry().lookup(type_name) else {
            return Err(error(
                type_id,
                InterpretationErrorKind::UnboundReference(type_name.to_string()),
            ));
        };

        let mut object = Object::new(aggregate.aref.clone());
        for property in &properties.children {
            let member = property.child(slot::PROPERTY_ID);
            let value = self.expression(property.child(slot::PROPERTY_VALUE))?;
            object = self.with_member(object, identifier(member)?, value, member)?;
        }

        for member in &aggregate.members {
            if object.get(&member.name).is_some() {
                continue;
            }
            match &member.default {
                Some(value) => object.set(member.name.clone(), value.clone()),
                None => {
                    return Err(error(
                        at,
                        InterpretationErrorKind::MissingMember {
                            type_name: type_name.to_string(),
                            member: member.name.to_string(),
                        },
                    ));
                }
            }
        }
        trace!(type_name = %type_name, members = object.members.len(), "constructed object");
        Ok(object)
    }

    fn with_member(&self, mut object: Object, member: &str, value: Value, at: &Node) -> Result<Object> {
        let env = self.env;
        match env.registry().resolve_member(&object.ty, member) {
            Some(MemberRef::Declared(declared)) => {
                if !ops::fits(&value, &declared.ty) {
                    return Err(mismatch(at, declared.ty.to_string(), &value));
                }
                object.set(declared.name.clone(), ops::coerce(value, &declared.ty));
                Ok(object)
            }
            Some(MemberRef::Extension(extension)) => {
                let Some(setter) = &extension.property.setter else {
                    return Err(error(
                        at,
                        InterpretationErrorKind::InvalidMemberAssignment {
                            type_name: object.type_name().to_string(),
                            member: member.to_string(),
                        },
                    ));
                };
                if !ops::fits(&value, &extension.ty) {
                    return Err(mismatch(at, extension.ty.to_string(), &value));
                }
                setter(&mut object, ops::coerce(value, &extension.ty));
                Ok(object)
            }
            None => Err(error(
                at,
                InterpretationErrorKind::InvalidMember {
                    type_name: object.type_name().to_string(),
                    member: member.to_string(),
                },
            )),
        }
    }

    fn member(&self, value: &Value, member: &str, at: &Node) -> Result<Value> {
        let Value::Object(object) = value else {
            return Err(mismatch(at, "object", value));
        };
        let env = self.env;
        match env.registry().resolve_member(&object.ty, member) {
            Some(MemberRef::Declared(declared)) => object.get(&declared.name).cloned().ok_or_else(|| {
                error(
                    at,
                    InterpretationErrorKind::MissingMember {
                        type_name: object.type_name().to_string(),
                        member: member.to_string(),
                    },
                )
            }),
            Some(MemberRef::Extension(extension)) => Ok((extension.property.getter)(object)),
            None => Err(error(
                at,
                InterpretationErrorKind::InvalidMember {
                    type_name: object.type_name().to_string(),
                    member: member.to_string(),
                },
            )),
        }
    }

    fn default_value(&self, ty: &Type, at: &SourceLocation) -> Result<Value> {
        let env = self.env;
        let registry = env.registry();
        match ty {
            Type::Aggregate(aref) => registry.default_object(aref).map(Value::Object).map_err(|member| {
                Error::interpretation(
                    at.clone(),
                    InterpretationErrorKind::MissingMember {
                        type_name: aref.name.to_string(),
                        member: member.to_string(),
                    },
                )
            }),
            other => registry.default_value(other).ok_or_else(|| {
                Error::interpretation(
                    at.clone(),
                    InterpretationErrorKind::TypeMismatch {
                        expected: "a type with a default value".to_string(),
                        actual: other.to_string(),
                    },
                )
            }),
        }
    }

    fn resolve_type(&self, node: &Node) -> Result<Type> {
        let name = node
            .as_type()
            .ok_or_else(|| Error::internal(format!("expected type, found {}", node.kind.name())))?;
        Ok(self.env.registry().resolve(name)?)
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    fn push_scope(&mut self) {
        if let Some(frame) = self.frames.last_mut() {
            frame.scopes.push(HashMap::new());
        }
    }

    fn pop_scope(&mut self) {
        if let Some(frame) = self.frames.last_mut() {
            frame.scopes.pop();
        }
    }

    fn declare_local(&mut self, name: Arc<str>, value: Value, ty: Type) {
        if let Some(frame) = self.frames.last_mut() {
            frame.declare(name, Local { value, ty });
        }
    }

    fn block(&mut self, block: &Node) -> Result<Flow> {
        self.push_scope();
        let result = self.statements(&block.children);
        self.pop_scope();
        result
    }

    fn statements(&mut self, statements: &[Node]) -> Result<Flow> {
        for statement in statements {
            if let Flow::Return(value) = self.statement(statement)? {
                return Ok(Flow::Return(value));
            }
        }
        Ok(Flow::Next)
    }

    fn statement(&mut self, node: &Node) -> Result<Flow> {
        trace!(kind = node.kind.name(), line = node.location.line, "statement");
        match node.kind {
            NodeKind::Block => self.block(node),
            NodeKind::VarDeclaration => {
                self.var_declaration(node)?;
                Ok(Flow::Next)
            }
            NodeKind::If => {
                if self.condition(node.child(slot::CONDITION))? {
                    self.block(node.child(slot::BODY))
                } else {
                    match node.optional(slot::ELSE) {
                        Some(other) if other.kind == NodeKind::If => self.statement(other),
                        Some(other) => self.block(other),
                        None => Ok(Flow::Next),
                    }
                }
            }
            NodeKind::While => {
                let limit = self.config.max_loop_iterations;
                let mut iterations = 0usize;
                while self.condition(node.child(slot::CONDITION))? {
                    iterations += 1;
                    if iterations > limit {
                        return Err(error(node, InterpretationErrorKind::LoopLimitExceeded(limit)));
                    }
                    if let Flow::Return(value) = self.block(node.child(slot::BODY))? {
                        return Ok(Flow::Return(value));
                    }
                }
                Ok(Flow::Next)
            }
            NodeKind::For => self.for_statement(node),
            NodeKind::Return => {
                let value = match node.optional(0) {
                    Some(expression) => self.expression(expression)?,
                    None => Value::None,
                };
                // Natives typed `any` can hand back anything.
                if let Some(frame) = self.frames.last() {
                    if !ops::fits(&value, &frame.return_type) {
                        return Err(mismatch(node, frame.return_type.to_string(), &value));
                    }
                }
                Ok(Flow::Return(value))
            }
            NodeKind::ExpressionStatement => {
                self.expression(node.child(0))?;
                Ok(Flow::Next)
            }
            NodeKind::Assignment => {
                let value = self.expression(node.child(slot::RHS))?;
                self.assign(node.child(slot::LHS), value)?;
                Ok(Flow::Next)
            }
            _ => Err(Error::internal(format!(
                "{} is not a statement",
                node.kind.name()
            ))),
        }
    }

    fn condition(&mut self, node: &Node) -> Result<bool> {
        let value = self.expression(node)?;
        value.as_bool().ok_or_else(|| mismatch(node, "bool", &value))
    }

    fn var_declaration(&mut self, node: &Node) -> Result<()> {
        let name = identifier(node.child(slot::VAR_ID))?.clone();
        let declared = match node.optional(slot::VAR_TYPE) {
            Some(ty) => Some(self.resolve_type(ty)?),
            None => None,
        };
        let value = match (node.optional(slot::VAR_INIT), &declared) {
            (Some(init), _) => self.expression(init)?,
            (None, Some(ty)) => self.default_value(ty, &node.location)?,
            (None, None) => Value::None,
        };
        let ty = declared.unwrap_or_else(|| value.value_type());
        if !ops::fits(&value, &ty) {
            return Err(mismatch(node, ty.to_string(), &value));
        }
        let value = ops::coerce(value, &ty);
        self.declare_local(name, value, ty);
        Ok(())
    }

    fn for_statement(&mut self, node: &Node) -> Result<Flow> {
        let ty = self.resolve_type(node.child(slot::FOR_TYPE))?;
        let name = identifier(node.child(slot::FOR_ID))?.clone();
        let iterable = node.child(slot::FOR_ITERABLE);
        let items: Vec<Value> = match self.expression(iterable)? {
            Value::List(items) => items.iter().cloned().collect(),
            Value::Set(items) => items.iter().cloned().collect(),
            Value::Map(entries) => entries.iter().map(|(key, _)| key.clone()).collect(),
            other => return Err(mismatch(iterable, "collection", &other)),
        };

        for item in items {
            if !ops::fits(&item, &ty) {
                return Err(mismatch(iterable, ty.to_string(), &item));
            }
            self.push_scope();
            self.declare_local(name.clone(), ops::coerce(item, &ty), ty.clone());
            let flow = self.block(node.child(slot::FOR_BODY));
            self.pop_scope();
            if let Flow::Return(value) = flow? {
                return Ok(Flow::Return(value));
            }
        }
        Ok(Flow::Next)
    }

    /// Stores a value into a variable or a member path such as `a.b.c`.
    ///
    /// Objects are values, so assigning `a.b.c` rebuilds `a.b` with the new
    /// `c` and then assigns that to `a.b`, down to the variable.
    fn assign(&mut self, target: &Node, value: Value) -> Result<()> {
        match &target.kind {
            NodeKind::Identifier(name) => {
                let Some(local) = self.frames.last_mut().and_then(|f| f.lookup_mut(name)) else {
                    return Err(error(target, InterpretationErrorKind::UnboundReference(name.to_string())));
                };
                if !ops::fits(&value, &local.ty) {
                    return Err(mismatch(target, local.ty.to_string(), &value));
                }
                local.value = ops::coerce(value, &local.ty);
                Ok(())
            }
            NodeKind::MemberAccess => {
                let path = target.child(slot::MEMBER_OBJECT);
                let member = target.child(slot::MEMBER_ID);
                let current = self.expression(path)?;
                let Value::Object(object) = current else {
                    return Err(mismatch(path, "object", &current));
                };
                let updated = self.with_member(object, identifier(member)?, value, member)?;
                self.assign(path, Value::Object(updated))
            }
            _ => Err(Error::internal(format!(
                "{} is not assignable",
                target.kind.name()
            ))),
        }
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    fn expression(&mut self, node: &Node) -> Result<Value> {
        match &node.kind {
            NodeKind::Int(n) => Ok(Value::Int(*n)),
            NodeKind::Float(f) => Ok(Value::Float(*f)),
            NodeKind::String(s) => Ok(Value::String(s.clone())),
            NodeKind::Bool(b) => Ok(Value::Bool(*b)),
            NodeKind::Identifier(name) => self.lookup(name, node),
            NodeKind::Binary(op) => self.binary(*op, node),
            NodeKind::Unary(op) => {
                let operand = self.expression(node.child(0))?;
                ops::unary(*op, &operand).map_err(|kind| error(node, kind))
            }
            NodeKind::MemberAccess => {
                let object = self.expression(node.child(slot::MEMBER_OBJECT))?;
                let member = node.child(slot::MEMBER_ID);
                self.member(&object, identifier(member)?, member)
            }
            NodeKind::Call => self.call_expression(node),
            NodeKind::AggregateLiteral => self
                .construct(
                    node.child(slot::AGGREGATE_TYPE),
                    node.child(slot::AGGREGATE_PROPERTIES),
                    node,
                )
                .map(Value::Object),
            NodeKind::ListLiteral => Ok(Value::List(self.elements(node)?.into_iter().collect())),
            NodeKind::SetLiteral => Ok(Value::Set(self.elements(node)?.into_iter().collect())),
            _ => Err(Error::internal(format!(
                "{} is not an expression",
                node.kind.name()
            ))),
        }
    }

    fn lookup(&mut self, name: &str, node: &Node) -> Result<Value> {
        if let Some(local) = self.frames.last().and_then(|frame| frame.lookup(name)) {
            return Ok(local.value.clone());
        }
        self.global(name, node)
    }

    fn binary(&mut self, op: BinaryOp, node: &Node) -> Result<Value> {
        let lhs_node = node.child(slot::LHS);
        let rhs_node = node.child(slot::RHS);
        if matches!(op, BinaryOp::And | BinaryOp::Or) {
            let lhs = self.expression(lhs_node)?;
            let Some(left) = lhs.as_bool() else {
                return Err(mismatch(lhs_node, "bool", &lhs));
            };
            if (op == BinaryOp::And) != left {
                return Ok(Value::Bool(left));
            }
            let rhs = self.expression(rhs_node)?;
            return rhs
                .as_bool()
                .map(Value::Bool)
                .ok_or_else(|| mismatch(rhs_node, "bool", &rhs));
        }
        let lhs = self.expression(lhs_node)?;
        let rhs = self.expression(rhs_node)?;
        ops::binary(op, &lhs, &rhs).map_err(|kind| error(node, kind))
    }

    fn call_expression(&mut self, node: &Node) -> Result<Value> {
        let callee = node.child(slot::CALL_CALLEE);
        let name = identifier(callee)?;
        let env = self.env;
        let Some(function) = env.function(name) else {
            return Err(error(callee, InterpretationErrorKind::UnboundReference(name.to_string())));
        };
        let args = node
            .child(slot::CALL_ARGUMENTS)
            .children
            .iter()
            .map(|arg| self.expression(arg))
            .collect::<Result<Vec<_>>>()?;
        self.call(function, args, &node.location)
    }

    /// Evaluates collection elements. A literal mixing `int` and `float`
    /// holds floats only.
    fn elements(&mut self, node: &Node) -> Result<Vec<Value>> {
        let items = node
            .children
            .iter()
            .map(|item| self.expression(item))
            .collect::<Result<Vec<_>>>()?;
        let promote = items.iter().any(|v| matches!(v, Value::Float(_)))
            && items.iter().all(|v| matches!(v, Value::Int(_) | Value::Float(_)));
        if promote {
            return Ok(items.into_iter().map(|v| v.coerce_to(&Type::Float)).collect());
        }
        Ok(items)
    }
}
