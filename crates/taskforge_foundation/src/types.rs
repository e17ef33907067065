//! The DSL type lattice.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::collections::{LtMap, LtSet, LtVec};
use crate::value::Value;

/// A DSL type.
///
/// Built-in scalars and collections are structural. Aggregate types are
/// nominal: two aggregates are the same type only if they were produced by the
/// same registration, regardless of their member layout.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    /// The type of the `none` value (statements, functions without a return type).
    None,
    /// Boolean type.
    Bool,
    /// 64-bit signed integer.
    Int,
    /// 64-bit floating point.
    Float,
    /// String type.
    String,
    /// An entity prototype (`entity_type` definitions).
    Prototype,
    /// A task dependency graph (`graph` definitions).
    Graph,
    /// Homogeneous list type (`T[]`).
    List(Box<Type>),
    /// Homogeneous set type (`T<>`).
    Set(Box<Type>),
    /// Map type (`[K -> V]`).
    Map(Box<Type>, Box<Type>),
    /// Function type.
    Function(Arc<FunctionType>),
    /// A registered aggregate type.
    Aggregate(AggregateRef),
    /// Accepts, and is accepted by, every type. Used by natives and by empty
    /// collection literals whose element type is unknown.
    Any,
}

impl Type {
    /// Creates a list type.
    #[must_use]
    pub fn list(element: Type) -> Self {
        Self::List(Box::new(element))
    }

    /// Creates a set type.
    #[must_use]
    pub fn set(element: Type) -> Self {
        Self::Set(Box::new(element))
    }

    /// Creates a map type.
    #[must_use]
    pub fn map(key: Type, value: Type) -> Self {
        Self::Map(Box::new(key), Box::new(value))
    }

    /// Creates a function type.
    #[must_use]
    pub fn function(parameters: Vec<Type>, return_type: Type) -> Self {
        Self::Function(Arc::new(FunctionType {
            parameters,
            return_type,
        }))
    }

    /// Returns true if this is `Any`.
    #[must_use]
    pub const fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }

    /// Returns true for `int` and `float`.
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Int | Self::Float)
    }

    /// Returns the aggregate reference if this is an aggregate type.
    #[must_use]
    pub fn as_aggregate(&self) -> Option<&AggregateRef> {
        match self {
            Self::Aggregate(r) => Some(r),
            _ => None,
        }
    }

    /// Checks whether a value of type `actual` may be used where `self` is expected.
    ///
    /// - `Any` on either side is compatible
    /// - `float` accepts `int`
    /// - collections compare their element types recursively
    /// - function types must match exactly
    /// - aggregates compare by identity
    #[must_use]
    pub fn accepts(&self, actual: &Type) -> bool {
        if self.is_any() || actual.is_any() {
            return true;
        }
        match (self, actual) {
            (Self::None, Self::None)
            | (Self::Bool, Self::Bool)
            | (Self::Int | Self::Float, Self::Int)
            | (Self::Float, Self::Float)
            | (Self::String, Self::String)
            | (Self::Prototype, Self::Prototype)
            | (Self::Graph, Self::Graph) => true,
            (Self::List(e), Self::List(a)) | (Self::Set(e), Self::Set(a)) => e.accepts(a),
            (Self::Map(ek, ev), Self::Map(ak, av)) => ek.accepts(ak) && ev.accepts(av),
            (Self::Function(e), Self::Function(a)) => e == a,
            (Self::Aggregate(e), Self::Aggregate(a)) => e == a,
            _ => false,
        }
    }

    /// The documented default value of this type, if it has one.
    ///
    /// Aggregate types have no zero value here; their defaults depend on
    /// registered member defaults and are built by the type registry.
    #[must_use]
    pub fn zero_value(&self) -> Option<Value> {
        match self {
            Self::None => Some(Value::None),
            Self::Bool => Some(Value::Bool(false)),
            Self::Int => Some(Value::Int(0)),
            Self::Float => Some(Value::Float(0.0)),
            Self::String => Some(Value::String(Arc::from(""))),
            Self::List(_) => Some(Value::List(LtVec::new())),
            Self::Set(_) => Some(Value::Set(LtSet::new())),
            Self::Map(_, _) => Some(Value::Map(LtMap::new())),
            Self::Prototype | Self::Graph | Self::Function(_) | Self::Aggregate(_) | Self::Any => {
                None
            }
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Bool => write!(f, "bool"),
            Self::Int => write!(f, "int"),
            Self::Float => write!(f, "float"),
            Self::String => write!(f, "string"),
            Self::Prototype => write!(f, "entity_type"),
            Self::Graph => write!(f, "task_dependency_graph"),
            Self::List(t) => write!(f, "{t}[]"),
            Self::Set(t) => write!(f, "{t}<>"),
            Self::Map(k, v) => write!(f, "[{k} -> {v}]"),
            Self::Function(ft) => write!(f, "{ft}"),
            Self::Aggregate(r) => write!(f, "{}", r.name),
            Self::Any => write!(f, "any"),
        }
    }
}

/// Parameter and return types of a function.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FunctionType {
    /// Declared parameter types, in order.
    pub parameters: Vec<Type>,
    /// Declared return type (`none` if the function returns nothing).
    pub return_type: Type,
}

impl FunctionType {
    /// Returns the first parameter type, which decides scenario builder eligibility.
    #[must_use]
    pub fn first_parameter(&self) -> Option<&Type> {
        self.parameters.first()
    }
}

impl fmt::Display for FunctionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, p) in self.parameters.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{p}")?;
        }
        write!(f, ") -> {}", self.return_type)
    }
}

/// Identity handle for a registered aggregate type.
///
/// Equality and hashing use only the registry id, so structurally identical
/// aggregates registered separately stay distinct.
#[derive(Clone, Debug)]
pub struct AggregateRef {
    /// Registry-assigned id, unique per registry.
    pub id: u32,
    /// DSL-facing type name.
    pub name: Arc<str>,
}

impl AggregateRef {
    /// Creates a new reference.
    #[must_use]
    pub fn new(id: u32, name: impl Into<Arc<str>>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl PartialEq for AggregateRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for AggregateRef {}

impl Hash for AggregateRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for AggregateRef {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AggregateRef {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.id.cmp(&other.id)
    }
}
