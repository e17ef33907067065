//! Abstract syntax tree for the taskforge DSL.
//!
//! Every node is a [`Node`]: a closed [`NodeKind`] tag, an ordered list of
//! children, and the source location it was parsed from. Each kind has a fixed
//! number of child slots in a fixed order (list kinds excepted), so accessing a
//! child by role is an indexed lookup using the constants in [`slot`]. Absent
//! optional children are filled with a [`NodeKind::None`] placeholder so slot
//! positions never shift.
//!
//! Nodes are built only by the parser and are immutable afterwards.

use std::fmt;
use std::sync::Arc;

use taskforge_foundation::SourceLocation;
use taskforge_types::TypeName;

use crate::span::Span;

/// Parser-assigned node identity, unique within one [`Program`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// Binary operators, lowest precedence first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// `or`
    Or,
    /// `and`
    And,
    /// `==`
    Eq,
    /// `!=`
    NotEq,
    /// `<`
    Less,
    /// `<=`
    LessEq,
    /// `>`
    Greater,
    /// `>=`
    GreaterEq,
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Rem,
}

impl BinaryOp {
    /// Binding strength; higher binds tighter. All binary operators are left-associative.
    #[must_use]
    pub const fn precedence(self) -> u8 {
        match self {
            Self::Or => 1,
            Self::And => 2,
            Self::Eq | Self::NotEq => 3,
            Self::Less | Self::LessEq | Self::Greater | Self::GreaterEq => 4,
            Self::Add | Self::Sub => 5,
            Self::Mul | Self::Div | Self::Rem => 6,
        }
    }

    /// Source spelling.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Or => "or",
            Self::And => "and",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Less => "<",
            Self::LessEq => "<=",
            Self::Greater => ">",
            Self::GreaterEq => ">=",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Rem => "%",
        }
    }

    /// Returns true for `+ - * / %`.
    #[must_use]
    pub const fn is_arithmetic(self) -> bool {
        matches!(self, Self::Add | Self::Sub | Self::Mul | Self::Div | Self::Rem)
    }

    /// Returns true for `< <= > >=`.
    #[must_use]
    pub const fn is_ordering(self) -> bool {
        matches!(
            self,
            Self::Less | Self::LessEq | Self::Greater | Self::GreaterEq
        )
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Unary operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// `!`
    Not,
    /// `-`
    Neg,
}

impl UnaryOp {
    /// Source spelling.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Not => "!",
            Self::Neg => "-",
        }
    }
}

/// Node kinds. The comment on each variant lists its child slots.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    /// Placeholder for an absent optional slot. No children.
    None,
    /// A name. No children.
    Identifier(Arc<str>),
    /// A type expression. No children.
    TypeExpr(TypeName),

    /// `entity_type id { components }`: `[id, component list]`
    PrototypeDefinition,
    /// Component definitions of a prototype.
    ComponentDefinitionList,
    /// `type_id { properties }`: `[type id, property list]`
    ComponentDefinition,
    /// `type_id id { properties }`: `[type id, id, property list]`
    ObjectDefinition,
    /// Properties of an object, component or aggregate literal.
    PropertyList,
    /// `id: value`: `[id, value]`
    Property,
    /// `fn id(params) -> ret block`: `[id, parameter list, return type or none, block]`
    FunctionDefinition,
    /// Parameters of a function.
    ParameterList,
    /// `type id`: `[type, id]`
    Parameter,
    /// `graph id { statements }`: `[id, graph statement list]`
    GraphDefinition,
    /// Statements of a graph.
    GraphStatementList,
    /// `a -> b -> c [attrs];`: `[node chain, attribute list]`
    EdgeStatement,
    /// Task identifiers of an edge statement.
    NodeChain,
    /// Attributes of an edge statement.
    AttributeList,
    /// `key=value`: `[key id, value id]`
    Attribute,

    /// `{ statements }`
    Block,
    /// `var id [: type] [= init];`: `[id, type or none, init or none]`
    VarDeclaration,
    /// `if cond block [else ...]`: `[condition, then block, else branch or none]`
    If,
    /// `while cond block`: `[condition, body]`
    While,
    /// `for type id in iterable block`: `[type, id, iterable, body]`
    For,
    /// `return [value];`: `[value or none]`
    Return,
    /// `expr;`: `[expr]`
    ExpressionStatement,
    /// `target = value;`: `[target, value]`
    Assignment,

    /// Integer literal. No children.
    Int(i64),
    /// Float literal. No children.
    Float(f64),
    /// String literal. No children.
    String(Arc<str>),
    /// `true` or `false`. No children.
    Bool(bool),
    /// `lhs op rhs`: `[lhs, rhs]`
    Binary(BinaryOp),
    /// `op operand`: `[operand]`
    Unary(UnaryOp),
    /// `object.member`: `[object, member id]`
    MemberAccess,
    /// `callee(args)`: `[callee, argument list]`
    Call,
    /// Arguments of a call.
    ArgumentList,
    /// `type_id { properties }`: `[type id, property list]`
    AggregateLiteral,
    /// `[elements]`
    ListLiteral,
    /// `<elements>`
    SetLiteral,
}

impl NodeKind {
    /// The fixed number of child slots, or `None` for list kinds.
    #[must_use]
    pub const fn arity(&self) -> Option<usize> {
        match self {
            Self::None
            | Self::Identifier(_)
            | Self::TypeExpr(_)
            | Self::Int(_)
            | Self::Float(_)
            | Self::String(_)
            | Self::Bool(_) => Some(0),
            Self::Return | Self::ExpressionStatement | Self::Unary(_) => Some(1),
            Self::PrototypeDefinition
            | Self::ComponentDefinition
            | Self::Property
            | Self::Parameter
            | Self::GraphDefinition
            | Self::EdgeStatement
            | Self::Attribute
            | Self::While
            | Self::Assignment
            | Self::Binary(_)
            | Self::MemberAccess
            | Self::Call
            | Self::AggregateLiteral => Some(2),
            Self::ObjectDefinition | Self::VarDeclaration | Self::If => Some(3),
            Self::FunctionDefinition | Self::For => Some(4),
            Self::ComponentDefinitionList
            | Self::PropertyList
            | Self::ParameterList
            | Self::GraphStatementList
            | Self::NodeChain
            | Self::AttributeList
            | Self::Block
            | Self::ArgumentList
            | Self::ListLiteral
            | Self::SetLiteral => None,
        }
    }

    /// Short name for diagnostics and debug output.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Identifier(_) => "identifier",
            Self::TypeExpr(_) => "type",
            Self::PrototypeDefinition => "prototype definition",
            Self::ComponentDefinitionList => "component definition list",
            Self::ComponentDefinition => "component definition",
            Self::ObjectDefinition => "object definition",
            Self::PropertyList => "property list",
            Self::Property => "property",
            Self::FunctionDefinition => "function definition",
            Self::ParameterList => "parameter list",
            Self::Parameter => "parameter",
            Self::GraphDefinition => "graph definition",
            Self::GraphStatementList => "graph statement list",
            Self::EdgeStatement => "edge statement",
            Self::NodeChain => "node chain",
            Self::AttributeList => "attribute list",
            Self::Attribute => "attribute",
            Self::Block => "block",
            Self::VarDeclaration => "variable declaration",
            Self::If => "if statement",
            Self::While => "while statement",
            Self::For => "for statement",
            Self::Return => "return statement",
            Self::ExpressionStatement => "expression statement",
            Self::Assignment => "assignment",
            Self::Int(_) => "integer literal",
            Self::Float(_) => "float literal",
            Self::String(_) => "string literal",
            Self::Bool(_) => "boolean literal",
            Self::Binary(_) => "binary expression",
            Self::Unary(_) => "unary expression",
            Self::MemberAccess => "member access",
            Self::Call => "call",
            Self::ArgumentList => "argument list",
            Self::AggregateLiteral => "aggregate literal",
            Self::ListLiteral => "list literal",
            Self::SetLiteral => "set literal",
        }
    }
}

/// Named child slots per node kind.
pub mod slot {
    /// `PrototypeDefinition`: the prototype name.
    pub const PROTOTYPE_ID: usize = 0;
    /// `PrototypeDefinition`: the component definition list.
    pub const PROTOTYPE_COMPONENTS: usize = 1;

    /// `ComponentDefinition`: the component type name.
    pub const COMPONENT_TYPE: usize = 0;
    /// `ComponentDefinition`: the property list.
    pub const COMPONENT_PROPERTIES: usize = 1;

    /// `ObjectDefinition`: the type name.
    pub const OBJECT_TYPE: usize = 0;
    /// `ObjectDefinition`: the object name.
    pub const OBJECT_ID: usize = 1;
    /// `ObjectDefinition`: the property list.
    pub const OBJECT_PROPERTIES: usize = 2;

    /// `Property`: the member name.
    pub const PROPERTY_ID: usize = 0;
    /// `Property`: the value expression.
    pub const PROPERTY_VALUE: usize = 1;

    /// `FunctionDefinition`: the function name.
    pub const FUNCTION_ID: usize = 0;
    /// `FunctionDefinition`: the parameter list.
    pub const FUNCTION_PARAMETERS: usize = 1;
    /// `FunctionDefinition`: the return type, or `None`.
    pub const FUNCTION_RETURN_TYPE: usize = 2;
    /// `FunctionDefinition`: the body block.
    pub const FUNCTION_BODY: usize = 3;

    /// `Parameter`: the parameter type.
    pub const PARAMETER_TYPE: usize = 0;
    /// `Parameter`: the parameter name.
    pub const PARAMETER_ID: usize = 1;

    /// `GraphDefinition`: the graph name.
    pub const GRAPH_ID: usize = 0;
    /// `GraphDefinition`: the statement list.
    pub const GRAPH_STATEMENTS: usize = 1;

    /// `EdgeStatement`: the chain of task names.
    pub const EDGE_CHAIN: usize = 0;
    /// `EdgeStatement`: the attribute list.
    pub const EDGE_ATTRIBUTES: usize = 1;

    /// `Attribute`: the key.
    pub const ATTRIBUTE_KEY: usize = 0;
    /// `Attribute`: the value.
    pub const ATTRIBUTE_VALUE: usize = 1;

    /// `VarDeclaration`: the variable name.
    pub const VAR_ID: usize = 0;
    /// `VarDeclaration`: the declared type, or `None`.
    pub const VAR_TYPE: usize = 1;
    /// `VarDeclaration`: the initializer, or `None`.
    pub const VAR_INIT: usize = 2;

    /// `If`/`While`: the condition.
    pub const CONDITION: usize = 0;
    /// `If`/`While`: the body block.
    pub const BODY: usize = 1;
    /// `If`: the else branch (block, nested `If`, or `None`).
    pub const ELSE: usize = 2;

    /// `For`: the loop variable type.
    pub const FOR_TYPE: usize = 0;
    /// `For`: the loop variable name.
    pub const FOR_ID: usize = 1;
    /// `For`: the iterated expression.
    pub const FOR_ITERABLE: usize = 2;
    /// `For`: the body block.
    pub const FOR_BODY: usize = 3;

    /// `Binary`: left operand. `Assignment`: target.
    pub const LHS: usize = 0;
    /// `Binary`: right operand. `Assignment`: value.
    pub const RHS: usize = 1;

    /// `MemberAccess`: the object expression.
    pub const MEMBER_OBJECT: usize = 0;
    /// `MemberAccess`: the member name.
    pub const MEMBER_ID: usize = 1;

    /// `Call`: the callee.
    pub const CALL_CALLEE: usize = 0;
    /// `Call`: the argument list.
    pub const CALL_ARGUMENTS: usize = 1;

    /// `AggregateLiteral`: the type name.
    pub const AGGREGATE_TYPE: usize = 0;
    /// `AggregateLiteral`: the property list.
    pub const AGGREGATE_PROPERTIES: usize = 1;
}

/// An AST node.
#[derive(Clone, Debug)]
pub struct Node {
    /// Identity within the program.
    pub id: NodeId,
    /// What this node is.
    pub kind: NodeKind,
    /// Children, in slot order.
    pub children: Vec<Node>,
    /// Where the node starts.
    pub location: SourceLocation,
    /// The source range the node covers.
    pub span: Span,
}

impl Node {
    /// Returns the child in the given slot.
    ///
    /// Slots are fixed per kind, so a parser-built node always has them.
    #[must_use]
    pub fn child(&self, slot: usize) -> &Node {
        &self.children[slot]
    }

    /// Returns the child in the slot, or `None` for an absent optional slot.
    #[must_use]
    pub fn optional(&self, slot: usize) -> Option<&Node> {
        self.children
            .get(slot)
            .filter(|n| !matches!(n.kind, NodeKind::None))
    }

    /// Returns the name if this is an identifier.
    #[must_use]
    pub fn as_identifier(&self) -> Option<&Arc<str>> {
        match &self.kind {
            NodeKind::Identifier(name) => Some(name),
            _ => None,
        }
    }

    /// Returns the name held in an identifier slot. Empty for non-identifiers.
    #[must_use]
    pub fn name_in(&self, slot: usize) -> &str {
        self.child(slot).as_identifier().map_or("", |n| &**n)
    }

    /// Returns the type expression if this is a type node.
    #[must_use]
    pub fn as_type(&self) -> Option<&TypeName> {
        match &self.kind {
            NodeKind::TypeExpr(t) => Some(t),
            _ => None,
        }
    }

    /// Returns true if this is a `None` placeholder.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self.kind, NodeKind::None)
    }

    /// Returns true if the node has the number of children its kind requires.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.kind.arity().is_none_or(|n| n == self.children.len())
            && self.children.iter().all(Node::is_well_formed)
    }

    /// Compares two trees ignoring ids and source positions.
    #[must_use]
    pub fn structurally_eq(&self, other: &Node) -> bool {
        self.kind == other.kind
            && self.children.len() == other.children.len()
            && self
                .children
                .iter()
                .zip(&other.children)
                .all(|(a, b)| a.structurally_eq(b))
    }

    /// Visits this node and all descendants in pre-order.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }
}

/// A parsed source file: its top-level definitions in order.
#[derive(Clone, Debug)]
pub struct Program {
    /// Source file name used in locations.
    pub file: Arc<str>,
    /// Top-level definitions.
    pub definitions: Vec<Arc<Node>>,
}

impl Program {
    /// Compares two programs ignoring ids and source positions.
    #[must_use]
    pub fn structurally_eq(&self, other: &Program) -> bool {
        self.definitions.len() == other.definitions.len()
            && self
                .definitions
                .iter()
                .zip(&other.definitions)
                .all(|(a, b)| a.structurally_eq(b))
    }

    /// Returns the name of a top-level definition.
    #[must_use]
    pub fn definition_name(definition: &Node) -> &str {
        match definition.kind {
            NodeKind::ObjectDefinition => definition.name_in(slot::OBJECT_ID),
            _ => definition.name_in(0),
        }
    }
}
