//! Semantic analysis.
//!
//! The analyzer runs in two passes over a parsed [`Program`]:
//!
//! 1. Every top-level definition is declared in the global scope, so
//!    definitions may refer to each other regardless of order.
//! 2. Every definition body is checked: identifiers are resolved against the
//!    scope chain, expression types are bound, and member accesses are checked
//!    against the registered aggregate types.
//!
//! Analysis stops at the first error. On failure every global binding the
//! program made is rolled back, leaving the environment as it was.
//!
//! Functions whose first parameter is a task type are reported as scenario
//! builders.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use taskforge_foundation::{
    AggregateRef, EdgeKind, Error, FunctionType, Result, SemanticErrorKind, Type,
    TypeRegistrationError,
};
use tracing::{debug, trace};

use crate::ast::{BinaryOp, Node, NodeId, NodeKind, Program, UnaryOp, slot};
use crate::environment::Environment;
use crate::scope::ScopeId;
use crate::symbol::{FunctionOrigin, FunctionSymbol, Symbol, VariableSymbol};

/// A program that passed semantic analysis.
#[derive(Debug)]
pub struct AnalyzedProgram {
    /// The analyzed tree.
    pub program: Program,
    /// Static type of every expression, declaration and resolved name.
    pub types: HashMap<NodeId, Type>,
    /// Functions the program defines, in source order.
    pub functions: Vec<Arc<FunctionSymbol>>,
    /// The subset of `functions` whose first parameter is a task type.
    pub scenario_builders: Vec<Arc<FunctionSymbol>>,
}

impl AnalyzedProgram {
    /// Returns the static type bound to a node.
    #[must_use]
    pub fn type_of(&self, node: &Node) -> Option<&Type> {
        self.types.get(&node.id)
    }

    /// Finds a function this program defines.
    #[must_use]
    pub fn function(&self, name: &str) -> Option<&Arc<FunctionSymbol>> {
        self.functions.iter().find(|f| &*f.name == name)
    }
}

/// Analyzes a program against an environment.
///
/// # Errors
/// Returns the first semantic error, tagged with the offending node's location.
pub fn analyze(env: &mut Environment, program: Program) -> Result<AnalyzedProgram> {
    SemanticAnalyzer::new(env).analyze(program)
}

/// Type-checks a standalone expression against the global scope.
///
/// # Errors
/// Returns the first semantic error in the expression.
pub fn analyze_expression(env: &mut Environment, expression: &Node) -> Result<Type> {
    SemanticAnalyzer::new(env).expr(expression, ScopeId::GLOBAL)
}

/// Resolves names and binds types for one program.
pub struct SemanticAnalyzer<'env> {
    env: &'env mut Environment,
    types: HashMap<NodeId, Type>,
    functions: Vec<Arc<FunctionSymbol>>,
    declared: HashMap<NodeId, Arc<FunctionSymbol>>,
}

/// The function whose body is being checked.
struct FunctionContext {
    return_type: Type,
}

impl<'env> SemanticAnalyzer<'env> {
    /// Creates an analyzer bound to an environment.
    pub fn new(env: &'env mut Environment) -> Self {
        Self {
            env,
            types: HashMap::new(),
            functions: Vec::new(),
            declared: HashMap::new(),
        }
    }

    /// Analyzes the program.
    ///
    /// # Errors
    /// Returns the first semantic error. The environment is left unchanged.
    pub fn analyze(mut self, program: Program) -> Result<AnalyzedProgram> {
        let checkpoint = self.env.checkpoint();
        if let Err(error) = self.run(&program) {
            debug!(file = %program.file, %error, "semantic analysis failed");
            self.env.rollback(checkpoint);
            return Err(error);
        }

        let Self {
            env,
            types,
            functions,
            ..
        } = self;
        let scenario_builders: Vec<_> = functions
            .iter()
            .filter(|f| {
                f.first_parameter()
                    .is_some_and(|t| env.registry().is_task_type(t))
            })
            .cloned()
            .collect();

        debug!(
            file = %program.file,
            definitions = program.definitions.len(),
            functions = functions.len(),
            builders = scenario_builders.len(),
            "analyzed program"
        );
        Ok(AnalyzedProgram {
            program,
            types,
            functions,
            scenario_builders,
        })
    }

    fn run(&mut self, program: &Program) -> Result<()> {
        for definition in &program.definitions {
            self.declare_definition(definition)?;
        }
        for definition in &program.definitions {
            self.check_definition(definition)?;
        }
        Ok(())
    }

    // =========================================================================
    // Pass 1: declarations
    // =========================================================================

    fn declare_definition(&mut self, definition: &Arc<Node>) -> Result<()> {
        match definition.kind {
            NodeKind::PrototypeDefinition => self.declare_value(
                ScopeId::GLOBAL,
                definition.child(slot::PROTOTYPE_ID),
                Type::Prototype,
                false,
            ),
            NodeKind::GraphDefinition => self.declare_value(
                ScopeId::GLOBAL,
                definition.child(slot::GRAPH_ID),
                Type::Graph,
                false,
            ),
            NodeKind::ObjectDefinition => {
                let aref = self.aggregate_type(definition.child(slot::OBJECT_TYPE), ScopeId::GLOBAL)?;
                let ty = Type::Aggregate(aref);
                self.types.insert(definition.id, ty.clone());
                self.declare_value(ScopeId::GLOBAL, definition.child(slot::OBJECT_ID), ty, false)
            }
            NodeKind::FunctionDefinition => self.declare_function(definition),
            _ => Err(Error::internal(format!(
                "unexpected top-level {}",
                definition.kind.name()
            ))),
        }
    }

    fn declare_function(&mut self, definition: &Arc<Node>) -> Result<()> {
        let id = definition.child(slot::FUNCTION_ID);
        let name = identifier(id)?;

        let parameters = definition
            .child(slot::FUNCTION_PARAMETERS)
            .children
            .iter()
            .map(|p| self.resolve_type(p.child(slot::PARAMETER_TYPE)))
            .collect::<Result<Vec<_>>>()?;
        let return_type = match definition.optional(slot::FUNCTION_RETURN_TYPE) {
            Some(ty) => self.resolve_type(ty)?,
            None => Type::None,
        };

        let symbol = Arc::new(FunctionSymbol {
            name: name.clone(),
            function_type: Arc::new(FunctionType {
                parameters,
                return_type,
            }),
            origin: FunctionOrigin::Defined {
                definition: definition.clone(),
            },
            location: definition.location.clone(),
        });
        self.declare(ScopeId::GLOBAL, id, Symbol::Function(symbol.clone()))?;
        trace!(function = %symbol, "declared function");
        self.declared.insert(definition.id, symbol.clone());
        self.functions.push(symbol);
        Ok(())
    }

    fn declare_value(&mut self, scope: ScopeId, id: &Node, ty: Type, mutable: bool) -> Result<()> {
        let name = identifier(id)?;
        self.types.insert(id.id, ty.clone());
        self.declare(
            scope,
            id,
            Symbol::Variable(VariableSymbol {
                name,
                ty,
                location: id.location.clone(),
                mutable,
            }),
        )
    }

    fn declare(&mut self, scope: ScopeId, id: &Node, symbol: Symbol) -> Result<()> {
        let name = identifier(id)?;
        self.env
            .scopes
            .declare(scope, name.clone(), symbol)
            .map_err(|_| error(id, SemanticErrorKind::DuplicateDefinition(name.to_string())))
    }

    // =========================================================================
    // Pass 2: bodies
    // =========================================================================

    fn check_definition(&mut self, definition: &Arc<Node>) -> Result<()> {
        match definition.kind {
            NodeKind::PrototypeDefinition => self.check_prototype(definition),
            NodeKind::ObjectDefinition => {
                let aref = self.aggregate_type(definition.child(slot::OBJECT_TYPE), ScopeId::GLOBAL)?;
                self.check_properties(
                    &aref,
                    definition.child(slot::OBJECT_PROPERTIES),
                    ScopeId::GLOBAL,
                )
            }
            NodeKind::GraphDefinition => self.check_graph(definition),
            NodeKind::FunctionDefinition => self.check_function(definition),
            _ => Ok(()),
        }
    }

    fn check_prototype(&mut self, definition: &Node) -> Result<()> {
        let mut seen = HashSet::new();
        for component in &definition.child(slot::PROTOTYPE_COMPONENTS).children {
            let type_id = component.child(slot::COMPONENT_TYPE);
            let aref = self.aggregate_type(type_id, ScopeId::GLOBAL)?;
            if !seen.insert(aref.clone()) {
                return Err(error(
                    type_id,
                    SemanticErrorKind::DuplicateDefinition(aref.name.to_string()),
                ));
            }
            self.check_properties(
                &aref,
                component.child(slot::COMPONENT_PROPERTIES),
                ScopeId::GLOBAL,
            )?;
            self.types.insert(component.id, Type::Aggregate(aref));
        }
        Ok(())
    }

    /// Checks `name: value` pairs against the members of an aggregate type.
    fn check_properties(&mut self, aref: &AggregateRef, list: &Node, scope: ScopeId) -> Result<()> {
        let mut seen = HashSet::new();
        for property in &list.children {
            let id = property.child(slot::PROPERTY_ID);
            let name = identifier(id)?;
            if !seen.insert(name.clone()) {
                return Err(error(
                    id,
                    SemanticErrorKind::DuplicateDefinition(name.to_string()),
                ));
            }
            let member_ty = self.member(aref, id, &name, true)?;
            self.types.insert(id.id, member_ty.clone());

            let value = property.child(slot::PROPERTY_VALUE);
            let actual = self.expr(value, scope)?;
            expect_type(&member_ty, &actual, value)?;
        }
        Ok(())
    }

    fn check_graph(&mut self, definition: &Node) -> Result<()> {
        for statement in &definition.child(slot::GRAPH_STATEMENTS).children {
            for id in &statement.child(slot::EDGE_CHAIN).children {
                let name = identifier(id)?;
                let ty = match self.env.scopes.lookup(ScopeId::GLOBAL, &name) {
                    Some(Symbol::Variable(v)) if self.env.registry().is_task_type(&v.ty) => {
                        v.ty.clone()
                    }
                    Some(_) => {
                        return Err(error(id, SemanticErrorKind::NotATask(name.to_string())));
                    }
                    None => {
                        return Err(error(
                            id,
                            SemanticErrorKind::UnresolvedIdentifier(name.to_string()),
                        ));
                    }
                };
                self.types.insert(id.id, ty);
            }

            let mut has_kind = false;
            for attribute in &statement.child(slot::EDGE_ATTRIBUTES).children {
                let key = attribute.name_in(slot::ATTRIBUTE_KEY);
                let value = attribute.name_in(slot::ATTRIBUTE_VALUE);
                if key != "type" || EdgeKind::from_attribute(value).is_none() {
                    return Err(error(
                        attribute,
                        SemanticErrorKind::InvalidAttribute {
                            key: key.to_string(),
                            value: value.to_string(),
                        },
                    ));
                }
                if has_kind {
                    return Err(error(
                        attribute,
                        SemanticErrorKind::DuplicateDefinition(key.to_string()),
                    ));
                }
                has_kind = true;
            }
        }
        Ok(())
    }

    fn check_function(&mut self, definition: &Node) -> Result<()> {
        let Some(symbol) = self.declared.get(&definition.id).cloned() else {
            return Err(Error::internal("function was not declared"));
        };
        let mark = self.env.scopes.len();
        let scope = self.env.scopes.new_scope(ScopeId::GLOBAL);

        let parameters = &definition.child(slot::FUNCTION_PARAMETERS).children;
        for (parameter, ty) in parameters.iter().zip(&symbol.function_type.parameters) {
            self.declare_value(scope, parameter.child(slot::PARAMETER_ID), ty.clone(), true)?;
        }

        let context = FunctionContext {
            return_type: symbol.function_type.return_type.clone(),
        };
        let body = definition.child(slot::FUNCTION_BODY);
        for statement in &body.children {
            self.statement(statement, scope, &context)?;
        }
        // Locals are only needed while the body is checked.
        self.env.scopes.truncate(mark);

        if context.return_type != Type::None && !always_returns(body) {
            return Err(error(
                definition,
                SemanticErrorKind::MissingReturn(symbol.name.to_string()),
            ));
        }
        Ok(())
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn block(&mut self, block: &Node, parent: ScopeId, context: &FunctionContext) -> Result<()> {
        let scope = self.env.scopes.new_scope(parent);
        for statement in &block.children {
            self.statement(statement, scope, context)?;
        }
        Ok(())
    }

    fn statement(&mut self, node: &Node, scope: ScopeId, context: &FunctionContext) -> Result<()> {
        match node.kind {
            NodeKind::Block => self.block(node, scope, context),
            NodeKind::VarDeclaration => self.var_declaration(node, scope),
            NodeKind::If => {
                self.condition(node.child(slot::CONDITION), scope)?;
                self.block(node.child(slot::BODY), scope, context)?;
                match node.optional(slot::ELSE) {
                    Some(branch) if branch.kind == NodeKind::If => {
                        self.statement(branch, scope, context)
                    }
                    Some(branch) => self.block(branch, scope, context),
                    None => Ok(()),
                }
            }
            NodeKind::While => {
                self.condition(node.child(slot::CONDITION), scope)?;
                self.block(node.child(slot::BODY), scope, context)
            }
            NodeKind::For => self.for_statement(node, scope, context),
            NodeKind::Return => self.return_statement(node, scope, context),
            NodeKind::ExpressionStatement => self.expr(node.child(0), scope).map(|_| ()),
            NodeKind::Assignment => {
                let target_ty = self.assignable(node.child(slot::LHS), scope)?;
                let value = node.child(slot::RHS);
                let actual = self.expr(value, scope)?;
                expect_type(&target_ty, &actual, value)
            }
            _ => Err(Error::internal(format!(
                "{} in statement position",
                node.kind.name()
            ))),
        }
    }

    fn var_declaration(&mut self, node: &Node, scope: ScopeId) -> Result<()> {
        let declared = match node.optional(slot::VAR_TYPE) {
            Some(ty) => Some(self.resolve_type(ty)?),
            None => None,
        };
        let init = match node.optional(slot::VAR_INIT) {
            Some(value) => Some((value, self.expr(value, scope)?)),
            None => None,
        };
        let ty = match (declared, init) {
            (Some(declared), Some((value, actual))) => {
                expect_type(&declared, &actual, value)?;
                declared
            }
            (Some(declared), None) => declared,
            (None, Some((_, actual))) => actual,
            (None, None) => return Err(Error::internal("variable without type or initializer")),
        };
        self.types.insert(node.id, ty.clone());
        self.declare_value(scope, node.child(slot::VAR_ID), ty, true)
    }

    fn for_statement(&mut self, node: &Node, scope: ScopeId, context: &FunctionContext) -> Result<()> {
        let declared = self.resolve_type(node.child(slot::FOR_TYPE))?;
        let iterable = node.child(slot::FOR_ITERABLE);
        let iterable_ty = self.expr(iterable, scope)?;
        let Some(element) = element_type(&iterable_ty) else {
            return Err(error(iterable, SemanticErrorKind::NotIterable(iterable_ty)));
        };
        expect_type(&declared, &element, iterable)?;

        let loop_scope = self.env.scopes.new_scope(scope);
        self.declare_value(loop_scope, node.child(slot::FOR_ID), declared, true)?;
        self.block(node.child(slot::FOR_BODY), loop_scope, context)
    }

    fn return_statement(
        &mut self,
        node: &Node,
        scope: ScopeId,
        context: &FunctionContext,
    ) -> Result<()> {
        let expected = &context.return_type;
        match node.optional(0) {
            None if *expected == Type::None => Ok(()),
            None => Err(error(
                node,
                SemanticErrorKind::TypeMismatch {
                    expected: expected.clone(),
                    actual: Type::None,
                },
            )),
            Some(value) => {
                let actual = self.expr(value, scope)?;
                if *expected == Type::None {
                    return Err(error(
                        value,
                        SemanticErrorKind::TypeMismatch {
                            expected: Type::None,
                            actual,
                        },
                    ));
                }
                expect_type(expected, &actual, value)
            }
        }
    }

    fn condition(&mut self, node: &Node, scope: ScopeId) -> Result<()> {
        let ty = self.expr(node, scope)?;
        expect_type(&Type::Bool, &ty, node)
    }

    /// Types an assignment target. The target must be a mutable variable or a
    /// writable member path rooted at one.
    fn assignable(&mut self, target: &Node, scope: ScopeId) -> Result<Type> {
        let ty = match &target.kind {
            NodeKind::Identifier(name) => match self.env.scopes.lookup(scope, name) {
                Some(Symbol::Variable(v)) if v.mutable => v.ty.clone(),
                Some(_) => {
                    return Err(error(target, SemanticErrorKind::NotAssignable(name.to_string())));
                }
                None => {
                    return Err(error(
                        target,
                        SemanticErrorKind::UnresolvedIdentifier(name.to_string()),
                    ));
                }
            },
            NodeKind::MemberAccess => {
                let object_ty = self.assignable(target.child(slot::MEMBER_OBJECT), scope)?;
                self.member_access_type(&object_ty, target, true)?
            }
            other => {
                return Err(error(
                    target,
                    SemanticErrorKind::NotAssignable(other.name().to_string()),
                ));
            }
        };
        self.types.insert(target.id, ty.clone());
        Ok(ty)
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn expr(&mut self, node: &Node, scope: ScopeId) -> Result<Type> {
        let ty = match &node.kind {
            NodeKind::Int(_) => Type::Int,
            NodeKind::Float(_) => Type::Float,
            NodeKind::String(_) => Type::String,
            NodeKind::Bool(_) => Type::Bool,
            NodeKind::Identifier(name) => self.identifier_type(node, name, scope)?,
            NodeKind::Binary(op) => {
                let lhs = self.expr(node.child(slot::LHS), scope)?;
                let rhs = self.expr(node.child(slot::RHS), scope)?;
                binary_type(*op, &lhs, &rhs).ok_or_else(|| {
                    error(
                        node,
                        SemanticErrorKind::InvalidOperands {
                            op: op.symbol().to_string(),
                            lhs,
                            rhs,
                        },
                    )
                })?
            }
            NodeKind::Unary(op) => {
                let operand = node.child(0);
                let ty = self.expr(operand, scope)?;
                match op {
                    UnaryOp::Not => {
                        expect_type(&Type::Bool, &ty, operand)?;
                        Type::Bool
                    }
                    UnaryOp::Neg if ty.is_numeric() || ty.is_any() => ty,
                    UnaryOp::Neg => {
                        return Err(error(
                            operand,
                            SemanticErrorKind::TypeMismatch {
                                expected: Type::Float,
                                actual: ty,
                            },
                        ));
                    }
                }
            }
            NodeKind::MemberAccess => {
                let object_ty = self.expr(node.child(slot::MEMBER_OBJECT), scope)?;
                self.member_access_type(&object_ty, node, false)?
            }
            NodeKind::Call => self.call(node, scope)?,
            NodeKind::AggregateLiteral => {
                let aref = self.aggregate_type(node.child(slot::AGGREGATE_TYPE), scope)?;
                self.check_properties(&aref, node.child(slot::AGGREGATE_PROPERTIES), scope)?;
                Type::Aggregate(aref)
            }
            NodeKind::ListLiteral => Type::list(self.element_types(node, scope)?),
            NodeKind::SetLiteral => Type::set(self.element_types(node, scope)?),
            other => {
                return Err(Error::internal(format!(
                    "{} in expression position",
                    other.name()
                )));
            }
        };
        self.types.insert(node.id, ty.clone());
        Ok(ty)
    }

    fn identifier_type(&self, node: &Node, name: &str, scope: ScopeId) -> Result<Type> {
        match self.env.scopes.lookup(scope, name) {
            Some(Symbol::Variable(v)) => Ok(v.ty.clone()),
            Some(Symbol::Type(_)) => Err(error(node, SemanticErrorKind::TypeAsValue(name.to_string()))),
            Some(Symbol::Function(_)) => {
                Err(error(node, SemanticErrorKind::FunctionAsValue(name.to_string())))
            }
            None => Err(error(
                node,
                SemanticErrorKind::UnresolvedIdentifier(name.to_string()),
            )),
        }
    }

    fn call(&mut self, node: &Node, scope: ScopeId) -> Result<Type> {
        let callee = node.child(slot::CALL_CALLEE);
        let Some(name) = callee.as_identifier() else {
            return Err(error(
                callee,
                SemanticErrorKind::NotCallable(callee.kind.name().to_string()),
            ));
        };
        let function = match self.env.scopes.lookup(scope, name) {
            Some(Symbol::Function(f)) => f.clone(),
            Some(_) => return Err(error(callee, SemanticErrorKind::NotCallable(name.to_string()))),
            None => {
                return Err(error(
                    callee,
                    SemanticErrorKind::UnresolvedIdentifier(name.to_string()),
                ));
            }
        };

        let args = &node.child(slot::CALL_ARGUMENTS).children;
        let parameters = &function.function_type.parameters;
        if args.len() != parameters.len() {
            return Err(error(
                node,
                SemanticErrorKind::ArityMismatch {
                    name: name.to_string(),
                    expected: parameters.len(),
                    actual: args.len(),
                },
            ));
        }
        for (arg, expected) in args.iter().zip(parameters) {
            let actual = self.expr(arg, scope)?;
            expect_type(expected, &actual, arg)?;
        }

        self.types
            .insert(callee.id, Type::Function(function.function_type.clone()));
        Ok(function.function_type.return_type.clone())
    }

    /// Unifies the element types of a list or set literal.
    fn element_types(&mut self, node: &Node, scope: ScopeId) -> Result<Type> {
        let mut element: Option<Type> = None;
        for child in &node.children {
            let ty = self.expr(child, scope)?;
            element = Some(match element {
                None => ty,
                Some(current) if current.accepts(&ty) => current,
                Some(current) if ty.accepts(&current) => ty,
                Some(current) => {
                    return Err(error(
                        child,
                        SemanticErrorKind::TypeMismatch {
                            expected: current,
                            actual: ty,
                        },
                    ));
                }
            });
        }
        Ok(element.unwrap_or(Type::Any))
    }

    fn member_access_type(&mut self, object_ty: &Type, node: &Node, writing: bool) -> Result<Type> {
        let id = node.child(slot::MEMBER_ID);
        let name = identifier(id)?;
        let ty = match object_ty {
            Type::Aggregate(aref) => self.member(aref, id, &name, writing)?,
            Type::Any => Type::Any,
            other => return Err(error(node, SemanticErrorKind::NoMembers(other.clone()))),
        };
        self.types.insert(id.id, ty.clone());
        Ok(ty)
    }

    /// Resolves a member: declared members first, then extension properties.
    fn member(&self, aref: &AggregateRef, id: &Node, name: &str, writing: bool) -> Result<Type> {
        match self.env.registry().resolve_member(aref, name) {
            Some(member) if writing && !member.is_writable() => Err(error(
                id,
                SemanticErrorKind::NotAssignable(format!("{}.{name}", aref.name)),
            )),
            Some(member) => Ok(member.ty().clone()),
            None => Err(error(
                id,
                SemanticErrorKind::UnknownMember {
                    type_name: aref.name.to_string(),
                    member: name.to_string(),
                },
            )),
        }
    }

    // =========================================================================
    // Types
    // =========================================================================

    fn resolve_type(&self, node: &Node) -> Result<Type> {
        let Some(name) = node.as_type() else {
            return Err(Error::internal(format!("expected type, got {}", node.kind.name())));
        };
        self.env.registry().resolve(name).map_err(|e| match e {
            TypeRegistrationError::UnknownType(n) => error(node, SemanticErrorKind::UnknownType(n)),
            other => Error::from(other),
        })
    }

    /// Resolves an identifier naming an aggregate type that can be instantiated.
    fn aggregate_type(&self, id: &Node, scope: ScopeId) -> Result<AggregateRef> {
        let name = identifier(id)?;
        match self.env.scopes.lookup(scope, &name) {
            Some(Symbol::Type(Type::Aggregate(aref))) => Ok(aref.clone()),
            Some(_) => Err(error(id, SemanticErrorKind::NotInstantiable(name.to_string()))),
            None => Err(error(id, SemanticErrorKind::UnknownType(name.to_string()))),
        }
    }
}

fn error(node: &Node, kind: SemanticErrorKind) -> Error {
    Error::semantic(node.location.clone(), kind)
}

fn identifier(node: &Node) -> Result<Arc<str>> {
    node.as_identifier()
        .cloned()
        .ok_or_else(|| Error::internal(format!("expected identifier, got {}", node.kind.name())))
}

fn expect_type(expected: &Type, actual: &Type, node: &Node) -> Result<()> {
    if expected.accepts(actual) {
        Ok(())
    } else {
        Err(error(
            node,
            SemanticErrorKind::TypeMismatch {
                expected: expected.clone(),
                actual: actual.clone(),
            },
        ))
    }
}

fn binary_type(op: BinaryOp, lhs: &Type, rhs: &Type) -> Option<Type> {
    let any = lhs.is_any() || rhs.is_any();
    match op {
        BinaryOp::Or | BinaryOp::And => {
            (Type::Bool.accepts(lhs) && Type::Bool.accepts(rhs)).then_some(Type::Bool)
        }
        BinaryOp::Eq | BinaryOp::NotEq => {
            (lhs.accepts(rhs) || rhs.accepts(lhs)).then_some(Type::Bool)
        }
        _ if op.is_ordering() => {
            let numbers = lhs.is_numeric() && rhs.is_numeric();
            let strings = *lhs == Type::String && *rhs == Type::String;
            (numbers || strings || any).then_some(Type::Bool)
        }
        _ => match (lhs, rhs) {
            (Type::Int, Type::Int) => Some(Type::Int),
            _ if lhs.is_numeric() && rhs.is_numeric() => Some(Type::Float),
            (Type::String, Type::String) if op == BinaryOp::Add => Some(Type::String),
            _ if any => Some(Type::Any),
            _ => None,
        },
    }
}

fn element_type(ty: &Type) -> Option<Type> {
    match ty {
        Type::List(element) | Type::Set(element) => Some((**element).clone()),
        Type::Map(key, _) => Some((**key).clone()),
        Type::Any => Some(Type::Any),
        _ => None,
    }
}

/// Returns true if every path through `node` ends in a `return`.
fn always_returns(node: &Node) -> bool {
    match node.kind {
        NodeKind::Return => true,
        NodeKind::Block => node.children.iter().any(always_returns),
        NodeKind::If => node
            .optional(slot::ELSE)
            .is_some_and(|branch| always_returns(node.child(slot::BODY)) && always_returns(branch)),
        _ => false,
    }
}
