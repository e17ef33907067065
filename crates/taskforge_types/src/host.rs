//! Static descriptions of host classes.
//!
//! These replace runtime reflection: the host builds one [`HostClass`] per
//! DSL-visible class and one [`ExtensionProperty`] per synthetic member, and
//! hands them to the [`TypeRegistry`](crate::TypeRegistry).

use std::fmt;
use std::sync::Arc;

use taskforge_foundation::{Object, Value};

use crate::type_name::TypeName;

/// What role a host class plays in the game.
///
/// Only [`HostKind::Task`] aggregates may key the scenario builder registry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum HostKind {
    /// An ordinary data class (configuration records and the like).
    #[default]
    Plain,
    /// A task class: something a player can be asked to do.
    Task,
    /// An ECS component.
    Component,
    /// The ECS entity class.
    Entity,
}

/// An exposed member of a host class.
#[derive(Clone, Debug, PartialEq)]
pub struct MemberDesc {
    /// Field name on the host side.
    pub host_name: Arc<str>,
    /// Name DSL code uses. Defaults to the host name.
    pub dsl_name: Arc<str>,
    /// Declared type.
    pub ty: TypeName,
    /// How an omitted member is filled in.
    pub default: MemberDefault,
}

/// Default policy for a member omitted from an object definition.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum MemberDefault {
    /// Omitting the member is an error.
    #[default]
    Required,
    /// Use the type's zero value (`0`, `""`, empty collection, ...).
    Zero,
    /// Use this value.
    Value(Value),
}

impl MemberDesc {
    /// Creates a required member whose DSL name equals its host name.
    #[must_use]
    pub fn new(host_name: impl Into<Arc<str>>, ty: impl Into<TypeName>) -> Self {
        let host_name = host_name.into();
        Self {
            dsl_name: host_name.clone(),
            host_name,
            ty: ty.into(),
            default: MemberDefault::Required,
        }
    }

    /// Exposes the member under a different DSL name.
    #[must_use]
    pub fn named(mut self, dsl_name: impl Into<Arc<str>>) -> Self {
        self.dsl_name = dsl_name.into();
        self
    }

    /// Makes the member optional, defaulting to its type's zero value.
    #[must_use]
    pub fn defaulted(mut self) -> Self {
        self.default = MemberDefault::Zero;
        self
    }

    /// Makes the member optional with an explicit default.
    #[must_use]
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = MemberDefault::Value(value.into());
        self
    }
}

/// A DSL-visible host class.
#[derive(Clone, Debug, PartialEq)]
pub struct HostClass {
    /// Identity of the host class; registering the same one twice fails.
    pub host_name: Arc<str>,
    /// Type name DSL code uses.
    pub dsl_name: Arc<str>,
    /// Role of the class.
    pub kind: HostKind,
    /// Exposed members in declaration order.
    pub members: Vec<MemberDesc>,
}

impl HostClass {
    /// Starts describing a plain host class.
    #[must_use]
    pub fn new(host_name: impl Into<Arc<str>>, dsl_name: impl Into<Arc<str>>) -> Self {
        Self {
            host_name: host_name.into(),
            dsl_name: dsl_name.into(),
            kind: HostKind::Plain,
            members: Vec::new(),
        }
    }

    /// Sets the class role.
    #[must_use]
    pub fn kind(mut self, kind: HostKind) -> Self {
        self.kind = kind;
        self
    }

    /// Adds an exposed member.
    #[must_use]
    pub fn member(mut self, member: MemberDesc) -> Self {
        self.members.push(member);
        self
    }
}

/// Reads an extension property from an instance of the extended type.
pub type Getter = Arc<dyn Fn(&Object) -> Value + Send + Sync>;

/// Writes an extension property on an instance of the extended type.
pub type Setter = Arc<dyn Fn(&mut Object, Value) + Send + Sync>;

/// A synthetic member that DSL code reads and writes like a declared one.
#[derive(Clone)]
pub struct ExtensionProperty {
    /// DSL-facing member name.
    pub name: Arc<str>,
    /// Host name of the class being extended.
    pub extended_host: Arc<str>,
    /// Type of the property value.
    pub value_type: TypeName,
    /// Reads the property.
    pub getter: Getter,
    /// Writes the property. Read-only when absent.
    pub setter: Option<Setter>,
}

impl ExtensionProperty {
    /// Creates a read-only property.
    #[must_use]
    pub fn new(
        name: impl Into<Arc<str>>,
        extended_host: impl Into<Arc<str>>,
        value_type: impl Into<TypeName>,
        getter: impl Fn(&Object) -> Value + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            extended_host: extended_host.into(),
            value_type: value_type.into(),
            getter: Arc::new(getter),
            setter: None,
        }
    }

    /// Adds a setter.
    #[must_use]
    pub fn with_setter(mut self, setter: impl Fn(&mut Object, Value) + Send + Sync + 'static) -> Self {
        self.setter = Some(Arc::new(setter));
        self
    }

    /// A property backed by the object's host state under its own name.
    ///
    /// Writing replaces the stored value (remove, then insert), which is how
    /// entity components are swapped.
    #[must_use]
    pub fn host_state(
        name: impl Into<Arc<str>>,
        extended_host: impl Into<Arc<str>>,
        value_type: impl Into<TypeName>,
    ) -> Self {
        let name: Arc<str> = name.into();
        let read_key = name.clone();
        let write_key = name.clone();
        Self::new(name, extended_host, value_type, move |obj| {
            obj.host(&read_key).cloned().unwrap_or(Value::None)
        })
        .with_setter(move |obj, value| {
            obj.remove_host(&write_key);
            obj.set_host(write_key.clone(), value);
        })
    }

    /// Returns true if the property can be written.
    #[must_use]
    pub fn is_writable(&self) -> bool {
        self.setter.is_some()
    }
}

impl fmt::Debug for ExtensionProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtensionProperty")
            .field("name", &self.name)
            .field("extended_host", &self.extended_host)
            .field("value_type", &self.value_type)
            .field("writable", &self.is_writable())
            .finish_non_exhaustive()
    }
}
