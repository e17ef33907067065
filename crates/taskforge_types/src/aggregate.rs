//! Registered aggregate types.

use std::sync::Arc;

use taskforge_foundation::{AggregateRef, Type, Value};

use crate::host::{ExtensionProperty, HostKind};

/// The host class an aggregate type mirrors.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct OriginType {
    /// Host-side class identity.
    pub host_name: Arc<str>,
    /// Role of the class.
    pub kind: HostKind,
}

impl OriginType {
    /// Returns true if the class is a task class.
    #[must_use]
    pub fn is_task_like(&self) -> bool {
        self.kind == HostKind::Task
    }
}

/// A declared member with its type resolved.
#[derive(Clone, Debug, PartialEq)]
pub struct Member {
    /// DSL-facing name.
    pub name: Arc<str>,
    /// Host field name.
    pub host_name: Arc<str>,
    /// Resolved type.
    pub ty: Type,
    /// Value used when an object definition omits the member. `None` means required.
    pub default: Option<Value>,
}

/// An extension property attached to this type, with its value type resolved.
#[derive(Clone, Debug)]
pub struct Extension {
    /// The registered property.
    pub property: ExtensionProperty,
    /// Resolved value type.
    pub ty: Type,
}

/// Result of member lookup on an aggregate type.
#[derive(Clone, Copy, Debug)]
pub enum MemberRef<'a> {
    /// A declared member.
    Declared(&'a Member),
    /// An extension property.
    Extension(&'a Extension),
}

impl MemberRef<'_> {
    /// The member's type.
    #[must_use]
    pub fn ty(&self) -> &Type {
        match self {
            Self::Declared(m) => &m.ty,
            Self::Extension(e) => &e.ty,
        }
    }

    /// Returns true if DSL code may assign to the member.
    #[must_use]
    pub fn is_writable(&self) -> bool {
        match self {
            Self::Declared(_) => true,
            Self::Extension(e) => e.property.is_writable(),
        }
    }
}

/// A DSL type derived from a host class (or declared without one).
#[derive(Clone, Debug)]
pub struct AggregateType {
    /// Identity handle.
    pub aref: AggregateRef,
    /// The mirrored host class, if any.
    pub origin: Option<OriginType>,
    /// Declared members in declaration order.
    pub members: Vec<Member>,
    /// Extension properties in registration order.
    pub extensions: Vec<Extension>,
}

impl AggregateType {
    /// DSL type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.aref.name
    }

    /// This aggregate as a [`Type`].
    #[must_use]
    pub fn ty(&self) -> Type {
        Type::Aggregate(self.aref.clone())
    }

    /// Returns true if the origin is a task class.
    #[must_use]
    pub fn is_task(&self) -> bool {
        self.origin.as_ref().is_some_and(OriginType::is_task_like)
    }

    /// Looks up a declared member by DSL name.
    #[must_use]
    pub fn member(&self, name: &str) -> Option<&Member> {
        self.members.iter().find(|m| &*m.name == name)
    }

    /// Looks up an extension property by name.
    #[must_use]
    pub fn extension(&self, name: &str) -> Option<&Extension> {
        self.extensions.iter().find(|e| &*e.property.name == name)
    }

    /// Resolves a member name: declared members first, then extension properties.
    #[must_use]
    pub fn resolve_member(&self, name: &str) -> Option<MemberRef<'_>> {
        self.member(name)
            .map(MemberRef::Declared)
            .or_else(|| self.extension(name).map(MemberRef::Extension))
    }
}
