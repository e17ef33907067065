//! Runtime values produced by the interpreter.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::collections::{LtMap, LtSet, LtVec};
use crate::graph::TaskDependencyGraph;
use crate::prototype::Prototype;
use crate::types::{AggregateRef, Type};

/// A DSL runtime value.
///
/// Values are immutable and cheap to clone. Collections and objects use
/// structural sharing, so "mutating" a value produces a new one.
#[derive(Clone)]
pub enum Value {
    /// The absent value.
    None,
    /// Boolean value.
    Bool(bool),
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit floating point.
    Float(f64),
    /// String value.
    String(Arc<str>),
    /// Persistent list.
    List(LtVec<Value>),
    /// Persistent set.
    Set(LtSet<Value>),
    /// Persistent map.
    Map(LtMap<Value, Value>),
    /// Instance of an aggregate type.
    Object(Object),
    /// An evaluated `entity_type` definition.
    Prototype(Arc<Prototype>),
    /// An evaluated `graph` definition.
    Graph(Arc<TaskDependencyGraph>),
}

impl Value {
    /// Returns the runtime type of this value.
    ///
    /// Collection element types are not tracked at runtime and report as `any`.
    #[must_use]
    pub fn value_type(&self) -> Type {
        match self {
            Self::None => Type::None,
            Self::Bool(_) => Type::Bool,
            Self::Int(_) => Type::Int,
            Self::Float(_) => Type::Float,
            Self::String(_) => Type::String,
            Self::List(_) => Type::list(Type::Any),
            Self::Set(_) => Type::set(Type::Any),
            Self::Map(_) => Type::map(Type::Any, Type::Any),
            Self::Object(o) => Type::Aggregate(o.ty.clone()),
            Self::Prototype(_) => Type::Prototype,
            Self::Graph(_) => Type::Graph,
        }
    }

    /// Short name of the value's kind, for error messages.
    #[must_use]
    pub fn kind_name(&self) -> String {
        self.value_type().to_string()
    }

    /// Returns true if this is `none`.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Returns the boolean if this is a bool.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer if this is an int.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the value as `f64` if it is numeric.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Int(n) => Some(*n as f64),
            Self::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the string slice if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the object if this is an aggregate instance.
    #[must_use]
    pub const fn as_object(&self) -> Option<&Object> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Returns the prototype if this is an entity prototype.
    #[must_use]
    pub fn as_prototype(&self) -> Option<&Arc<Prototype>> {
        match self {
            Self::Prototype(p) => Some(p),
            _ => None,
        }
    }

    /// Returns the graph if this is a task dependency graph.
    #[must_use]
    pub fn as_graph(&self) -> Option<&Arc<TaskDependencyGraph>> {
        match self {
            Self::Graph(g) => Some(g),
            _ => None,
        }
    }

    /// Returns the list if this is a list.
    #[must_use]
    pub const fn as_list(&self) -> Option<&LtVec<Value>> {
        match self {
            Self::List(v) => Some(v),
            _ => None,
        }
    }

    /// Converts the value to fit a declared type.
    ///
    /// The only conversion is `int` to `float`; everything else is returned unchanged.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn coerce_to(self, ty: &Type) -> Self {
        match (self, ty) {
            (Self::Int(n), Type::Float) => Self::Float(n as f64),
            (v, _) => v,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::None, Self::None) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::String(a), Self::String(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Set(a), Self::Set(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a == b,
            (Self::Prototype(a), Self::Prototype(b)) => a == b,
            (Self::Graph(a), Self::Graph(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::None => {}
            Self::Bool(b) => b.hash(state),
            Self::Int(n) => n.hash(state),
            Self::Float(n) => n.to_bits().hash(state),
            Self::String(s) => s.hash(state),
            Self::List(v) => v.hash(state),
            Self::Set(s) => s.hash(state),
            Self::Map(m) => m.hash(state),
            Self::Object(o) => o.hash(state),
            Self::Prototype(p) => p.hash(state),
            Self::Graph(g) => g.hash(state),
        }
    }
}

impl PartialOrd for Value {
    #[allow(clippy::cast_precision_loss)]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a.partial_cmp(b),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b),
            (Self::Int(a), Self::Float(b)) => (*a as f64).partial_cmp(b),
            (Self::Float(a), Self::Int(b)) => a.partial_cmp(&(*b as f64)),
            (Self::String(a), Self::String(b)) => a.partial_cmp(b),
            (Self::Bool(a), Self::Bool(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{s:?}"),
            Self::Object(o) => write!(f, "{o:?}"),
            other => write!(f, "{other}"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(n) if n.fract() == 0.0 && n.is_finite() => write!(f, "{n:.1}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s}"),
            Self::List(v) => write_seq(f, "[", v.iter(), "]"),
            Self::Set(s) => write_seq(f, "<", s.iter(), ">"),
            Self::Map(m) => {
                write!(f, "[")?;
                for (i, (k, v)) in m.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k:?} -> {v:?}")?;
                }
                write!(f, "]")
            }
            Self::Object(o) => write!(f, "{o}"),
            Self::Prototype(p) => write!(f, "entity_type {}", p.name),
            Self::Graph(g) => write!(f, "graph {}", g.name),
        }
    }
}

fn write_seq<'a>(
    f: &mut fmt::Formatter<'_>,
    open: &str,
    items: impl Iterator<Item = &'a Value>,
    close: &str,
) -> fmt::Result {
    write!(f, "{open}")?;
    for (i, item) in items.enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item:?}")?;
    }
    write!(f, "{close}")
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(Arc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(Arc::from(s))
    }
}

impl From<Object> for Value {
    fn from(o: Object) -> Self {
        Self::Object(o)
    }
}

/// An instance of an aggregate type.
///
/// `members` holds the declared members by DSL name. `host_state` is opaque
/// storage owned by extension properties (for example the components attached
/// to an entity); DSL code only reaches it through property getters and setters.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Object {
    /// The aggregate type this object instantiates.
    pub ty: AggregateRef,
    /// Declared member values, keyed by DSL member name.
    pub members: im::OrdMap<Arc<str>, Value>,
    /// Extension-property backing storage.
    pub host_state: im::OrdMap<Arc<str>, Value>,
}

impl Object {
    /// Creates an object with no members set.
    #[must_use]
    pub fn new(ty: AggregateRef) -> Self {
        Self {
            ty,
            members: im::OrdMap::new(),
            host_state: im::OrdMap::new(),
        }
    }

    /// Returns the DSL type name.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.ty.name
    }

    /// Gets a declared member.
    #[must_use]
    pub fn get(&self, member: &str) -> Option<&Value> {
        self.members.get(member)
    }

    /// Sets a declared member in place.
    pub fn set(&mut self, member: impl Into<Arc<str>>, value: Value) {
        self.members.insert(member.into(), value);
    }

    /// Returns a copy with the member set.
    #[must_use]
    pub fn with(mut self, member: impl Into<Arc<str>>, value: Value) -> Self {
        self.set(member, value);
        self
    }

    /// Gets an extension-property state slot.
    #[must_use]
    pub fn host(&self, key: &str) -> Option<&Value> {
        self.host_state.get(key)
    }

    /// Replaces an extension-property state slot.
    pub fn set_host(&mut self, key: impl Into<Arc<str>>, value: Value) {
        self.host_state.insert(key.into(), value);
    }

    /// Removes an extension-property state slot.
    pub fn remove_host(&mut self, key: &str) -> Option<Value> {
        self.host_state.remove(key)
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{", self.ty.name)?;
        for (i, (k, v)) in self.members.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, " {k}: {v:?}")?;
        }
        if self.members.is_empty() {
            write!(f, "}}")
        } else {
            write!(f, " }}")
        }
    }
}
