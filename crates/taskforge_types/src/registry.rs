//! The type registry: built-in types plus host-registered aggregates.
//!
//! # Thread Safety
//!
//! `TypeRegistry` is `Send + Sync` but requires `&mut self` for registration.
//! Registration happens once at startup; afterwards the registry is shared
//! read-only by the analyzer and interpreter.

use std::collections::HashMap;
use std::sync::Arc;

use taskforge_foundation::{AggregateRef, Object, Type, TypeRegistrationError, Value};
use tracing::debug;

use crate::aggregate::{AggregateType, Extension, Member, MemberRef, OriginType};
use crate::host::{ExtensionProperty, HostClass, MemberDefault, MemberDesc};
use crate::type_name::TypeName;

type Result<T> = std::result::Result<T, TypeRegistrationError>;

const BUILTIN_NAMES: [&str; 6] = [
    "bool",
    "int",
    "float",
    "string",
    "entity_type",
    "task_dependency_graph",
];

/// Catalog of every type a DSL program can name.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    aggregates: Vec<AggregateType>,
    by_name: HashMap<Arc<str>, u32>,
    by_origin: HashMap<Arc<str>, u32>,
}

impl TypeRegistry {
    /// Creates a registry containing only the built-in types.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the built-in type with the given name.
    #[must_use]
    pub fn builtin(name: &str) -> Option<Type> {
        match name {
            "bool" => Some(Type::Bool),
            "int" => Some(Type::Int),
            "float" => Some(Type::Float),
            "string" => Some(Type::String),
            "entity_type" => Some(Type::Prototype),
            "task_dependency_graph" => Some(Type::Graph),
            _ => None,
        }
    }

    /// Names of all built-in types.
    pub fn builtin_names() -> impl Iterator<Item = &'static str> {
        BUILTIN_NAMES.into_iter()
    }

    /// Derives an aggregate type from a host class description.
    ///
    /// # Errors
    ///
    /// - [`TypeRegistrationError::DuplicateOriginType`] if the host class was already registered
    /// - [`TypeRegistrationError::DuplicateTypeName`] if the DSL name is taken
    /// - [`TypeRegistrationError::DuplicateMember`] if two members share a DSL name
    /// - [`TypeRegistrationError::UnknownType`] if a member type does not resolve
    /// - [`TypeRegistrationError::InvalidDefault`] if a default does not fit its member
    pub fn register_host_class(&mut self, class: HostClass) -> Result<Type> {
        if self.by_origin.contains_key(&class.host_name) {
            return Err(TypeRegistrationError::DuplicateOriginType(
                class.host_name.to_string(),
            ));
        }
        let origin = OriginType {
            host_name: class.host_name,
            kind: class.kind,
        };
        self.insert(class.dsl_name, Some(origin), class.members)
    }

    /// Declares an aggregate type that mirrors no host class.
    ///
    /// Such types can be instantiated from the DSL but never key the scenario
    /// builder registry.
    ///
    /// # Errors
    ///
    /// Same as [`register_host_class`](Self::register_host_class), minus the origin check.
    pub fn register_record(
        &mut self,
        dsl_name: impl Into<Arc<str>>,
        members: Vec<MemberDesc>,
    ) -> Result<Type> {
        self.insert(dsl_name.into(), None, members)
    }

    fn insert(
        &mut self,
        dsl_name: Arc<str>,
        origin: Option<OriginType>,
        members: Vec<MemberDesc>,
    ) -> Result<Type> {
        if Self::builtin(&dsl_name).is_some() || self.by_name.contains_key(&dsl_name) {
            return Err(TypeRegistrationError::DuplicateTypeName(dsl_name.to_string()));
        }
        let id = u32::try_from(self.aggregates.len())
            .map_err(|_| TypeRegistrationError::InvalidTypeName(dsl_name.to_string()))?;
        let aref = AggregateRef::new(id, dsl_name.clone());

        let mut resolved: Vec<Member> = Vec::with_capacity(members.len());
        for desc in members {
            if resolved.iter().any(|m| m.name == desc.dsl_name) {
                return Err(TypeRegistrationError::DuplicateMember {
                    type_name: dsl_name.to_string(),
                    member: desc.dsl_name.to_string(),
                });
            }
            let ty = self.resolve_pending(&desc.ty, &aref)?;
            let default = match desc.default {
                MemberDefault::Required => None,
                MemberDefault::Zero => Some(self.default_value(&ty).ok_or_else(|| {
                    TypeRegistrationError::InvalidDefault {
                        type_name: dsl_name.to_string(),
                        member: desc.dsl_name.to_string(),
                        expected: ty.clone(),
                    }
                })?),
                MemberDefault::Value(v) => {
                    if !ty.accepts(&v.value_type()) {
                        return Err(TypeRegistrationError::InvalidDefault {
                            type_name: dsl_name.to_string(),
                            member: desc.dsl_name.to_string(),
                            expected: ty,
                        });
                    }
                    Some(v.coerce_to(&ty))
                }
            };
            resolved.push(Member {
                name: desc.dsl_name,
                host_name: desc.host_name,
                ty,
                default,
            });
        }

        debug!(
            type_name = %dsl_name,
            origin = origin.as_ref().map_or("<none>", |o| &*o.host_name),
            members = resolved.len(),
            "registered aggregate type"
        );

        if let Some(origin) = &origin {
            self.by_origin.insert(origin.host_name.clone(), id);
        }
        self.by_name.insert(dsl_name, id);
        let ty = Type::Aggregate(aref.clone());
        self.aggregates.push(AggregateType {
            aref,
            origin,
            members: resolved,
            extensions: Vec::new(),
        });
        Ok(ty)
    }

    /// Attaches an extension property to the host class it names.
    ///
    /// # Errors
    ///
    /// - [`TypeRegistrationError::UnknownType`] if the extended class or value type is unknown
    /// - [`TypeRegistrationError::MemberConflict`] if the extended type declares a member of that name
    /// - [`TypeRegistrationError::DuplicateExtension`] if the name is already an extension on that type
    pub fn register_extension_property(&mut self, property: ExtensionProperty) -> Result<()> {
        let id = *self
            .by_origin
            .get(&property.extended_host)
            .ok_or_else(|| TypeRegistrationError::UnknownType(property.extended_host.to_string()))?;
        let ty = self.resolve(&property.value_type)?;
        let target = &mut self.aggregates[id as usize];
        if target.member(&property.name).is_some() {
            return Err(TypeRegistrationError::MemberConflict {
                type_name: target.name().to_string(),
                property: property.name.to_string(),
            });
        }
        if target.extension(&property.name).is_some() {
            return Err(TypeRegistrationError::DuplicateExtension {
                type_name: target.name().to_string(),
                property: property.name.to_string(),
            });
        }
        debug!(
            type_name = %target.aref.name,
            property = %property.name,
            "registered extension property"
        );
        target.extensions.push(Extension { property, ty });
        Ok(())
    }

    /// Resolves a type expression.
    ///
    /// # Errors
    ///
    /// Returns [`TypeRegistrationError::UnknownType`] naming the first unknown type.
    pub fn resolve(&self, name: &TypeName) -> Result<Type> {
        match name {
            TypeName::Named(n) => Self::builtin(n)
                .or_else(|| self.lookup(n).map(AggregateType::ty))
                .ok_or_else(|| TypeRegistrationError::UnknownType(n.to_string())),
            TypeName::List(t) => Ok(Type::list(self.resolve(t)?)),
            TypeName::Set(t) => Ok(Type::set(self.resolve(t)?)),
            TypeName::Map(k, v) => Ok(Type::map(self.resolve(k)?, self.resolve(v)?)),
        }
    }

    // Like `resolve`, but also knows the aggregate currently being registered.
    fn resolve_pending(&self, name: &TypeName, pending: &AggregateRef) -> Result<Type> {
        match name {
            TypeName::Named(n) if *n == pending.name => Ok(Type::Aggregate(pending.clone())),
            TypeName::Named(_) => self.resolve(name),
            TypeName::List(t) => Ok(Type::list(self.resolve_pending(t, pending)?)),
            TypeName::Set(t) => Ok(Type::set(self.resolve_pending(t, pending)?)),
            TypeName::Map(k, v) => Ok(Type::map(
                self.resolve_pending(k, pending)?,
                self.resolve_pending(v, pending)?,
            )),
        }
    }

    /// Looks up an aggregate by DSL name.
    #[must_use]
    pub fn lookup(&self, dsl_name: &str) -> Option<&AggregateType> {
        self.by_name
            .get(dsl_name)
            .map(|&id| &self.aggregates[id as usize])
    }

    /// Looks up an aggregate by the host class it mirrors.
    #[must_use]
    pub fn lookup_origin(&self, host_name: &str) -> Option<&AggregateType> {
        self.by_origin
            .get(host_name)
            .map(|&id| &self.aggregates[id as usize])
    }

    /// Returns the aggregate behind a reference.
    #[must_use]
    pub fn aggregate(&self, aref: &AggregateRef) -> Option<&AggregateType> {
        self.aggregates.get(aref.id as usize)
    }

    /// Iterates over all aggregates in registration order.
    pub fn aggregates(&self) -> impl Iterator<Item = &AggregateType> {
        self.aggregates.iter()
    }

    /// Resolves a member of an aggregate: declared members first, then extensions.
    #[must_use]
    pub fn resolve_member<'a>(&'a self, aref: &AggregateRef, name: &str) -> Option<MemberRef<'a>> {
        self.aggregate(aref)?.resolve_member(name)
    }

    /// Returns true if `ty` is an aggregate whose origin is a task class.
    #[must_use]
    pub fn is_task_type(&self, ty: &Type) -> bool {
        ty.as_aggregate()
            .and_then(|r| self.aggregate(r))
            .is_some_and(AggregateType::is_task)
    }

    /// Builds an object with every member at its default.
    ///
    /// # Errors
    ///
    /// Returns the name of the first member without a default.
    pub fn default_object(&self, aref: &AggregateRef) -> std::result::Result<Object, Arc<str>> {
        let Some(agg) = self.aggregate(aref) else {
            return Err(aref.name.clone());
        };
        let mut obj = Object::new(aref.clone());
        for member in &agg.members {
            match &member.default {
                Some(v) => obj.set(member.name.clone(), v.clone()),
                None => return Err(member.name.clone()),
            }
        }
        Ok(obj)
    }

    /// The documented default value of a type.
    ///
    /// Aggregates default to [`default_object`](Self::default_object) when every
    /// member has a default.
    #[must_use]
    pub fn default_value(&self, ty: &Type) -> Option<Value> {
        match ty {
            Type::Aggregate(r) => self.default_object(r).ok().map(Value::Object),
            other => other.zero_value(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::HostKind;

    fn velocity() -> HostClass {
        HostClass::new("VelocityComponent", "velocity_component")
            .kind(HostKind::Component)
            .member(MemberDesc::new("xVelocity", "float").named("x_velocity"))
            .member(MemberDesc::new("yVelocity", "float").named("y_velocity"))
    }

    fn entity() -> HostClass {
        HostClass::new("Entity", "entity").kind(HostKind::Entity)
    }

    #[test]
    fn builtins_resolve() {
        let reg = TypeRegistry::new();
        assert_eq!(reg.resolve(&"int".into()), Ok(Type::Int));
        assert_eq!(
            reg.resolve(&TypeName::parse("string[]").unwrap()),
            Ok(Type::list(Type::String))
        );
        assert_eq!(
            reg.resolve(&"goblin".into()),
            Err(TypeRegistrationError::UnknownType("goblin".into()))
        );
        assert_eq!(TypeRegistry::builtin_names().count(), 6);
    }

    #[test]
    fn register_and_lookup() {
        let mut reg = TypeRegistry::new();
        let ty = reg.register_host_class(velocity()).unwrap();
        let agg = reg.lookup("velocity_component").unwrap();
        assert_eq!(agg.ty(), ty);
        assert_eq!(agg.members.len(), 2);
        assert_eq!(&*agg.members[0].host_name, "xVelocity");
        assert_eq!(agg.member("x_velocity").map(|m| &m.ty), Some(&Type::Float));
        assert!(reg.lookup_origin("VelocityComponent").is_some());
        assert!(!reg.is_task_type(&ty));
    }

    #[test]
    fn duplicate_origin_fails() {
        let mut reg = TypeRegistry::new();
        reg.register_host_class(velocity()).unwrap();
        let again = HostClass::new("VelocityComponent", "other_name");
        assert_eq!(
            reg.register_host_class(again),
            Err(TypeRegistrationError::DuplicateOriginType(
                "VelocityComponent".into()
            ))
        );
        assert_eq!(reg.aggregates().count(), 1);
    }

    #[test]
    fn duplicate_name_fails() {
        let mut reg = TypeRegistry::new();
        reg.register_host_class(velocity()).unwrap();
        let clash = HostClass::new("Other", "velocity_component");
        assert!(matches!(
            reg.register_host_class(clash),
            Err(TypeRegistrationError::DuplicateTypeName(_))
        ));
        assert!(matches!(
            reg.register_record("int", vec![]),
            Err(TypeRegistrationError::DuplicateTypeName(_))
        ));
    }

    #[test]
    fn duplicate_member_fails() {
        let mut reg = TypeRegistry::new();
        let class = HostClass::new("A", "a")
            .member(MemberDesc::new("x", "int"))
            .member(MemberDesc::new("y", "int").named("x"));
        assert!(matches!(
            reg.register_host_class(class),
            Err(TypeRegistrationError::DuplicateMember { .. })
        ));
    }

    #[test]
    fn unknown_member_type_fails_and_leaves_registry_untouched() {
        let mut reg = TypeRegistry::new();
        let class = HostClass::new("A", "a").member(MemberDesc::new("x", "nope"));
        assert_eq!(
            reg.register_host_class(class),
            Err(TypeRegistrationError::UnknownType("nope".into()))
        );
        assert!(reg.lookup("a").is_none());
        assert!(reg.lookup_origin("A").is_none());
    }

    #[test]
    fn self_referencing_member() {
        let mut reg = TypeRegistry::new();
        let ty = reg
            .register_record("node", vec![MemberDesc::new("children", "node[]").defaulted()])
            .unwrap();
        let agg = reg.lookup("node").unwrap();
        assert_eq!(agg.members[0].ty, Type::list(ty));
        assert!(agg.origin.is_none());
    }

    #[test]
    fn defaults() {
        let mut reg = TypeRegistry::new();
        let ty = reg
            .register_record(
                "stats",
                vec![
                    MemberDesc::new("hp", "int").with_default(10i64),
                    MemberDesc::new("speed", "float").with_default(1i64),
                    MemberDesc::new("label", "string").defaulted(),
                ],
            )
            .unwrap();
        let Type::Aggregate(aref) = &ty else {
            panic!("expected aggregate");
        };
        let obj = reg.default_object(aref).unwrap();
        assert_eq!(obj.get("hp"), Some(&Value::Int(10)));
        assert_eq!(obj.get("speed"), Some(&Value::Float(1.0)));
        assert_eq!(obj.get("label"), Some(&Value::from("")));
    }

    #[test]
    fn default_object_reports_required_member() {
        let mut reg = TypeRegistry::new();
        let ty = reg.register_host_class(velocity()).unwrap();
        let aref = ty.as_aggregate().unwrap();
        assert_eq!(reg.default_object(aref).unwrap_err().as_ref(), "x_velocity");
        assert_eq!(reg.default_value(&ty), None);
    }

    #[test]
    fn invalid_default_fails() {
        let mut reg = TypeRegistry::new();
        let bad = HostClass::new("A", "a").member(MemberDesc::new("x", "int").with_default("oops"));
        assert!(matches!(
            reg.register_host_class(bad),
            Err(TypeRegistrationError::InvalidDefault { .. })
        ));
    }

    #[test]
    fn extension_properties() {
        let mut reg = TypeRegistry::new();
        reg.register_host_class(velocity()).unwrap();
        let entity_ty = reg.register_host_class(entity()).unwrap();
        reg.register_extension_property(ExtensionProperty::host_state(
            "velocity_component",
            "Entity",
            "velocity_component",
        ))
        .unwrap();

        let aref = entity_ty.as_aggregate().unwrap();
        let member = reg.resolve_member(aref, "velocity_component").unwrap();
        assert!(matches!(member, MemberRef::Extension(_)));
        assert!(member.is_writable());
        assert_eq!(
            member.ty(),
            &reg.lookup("velocity_component").unwrap().ty()
        );
    }

    #[test]
    fn duplicate_extension_fails() {
        let mut reg = TypeRegistry::new();
        reg.register_host_class(velocity()).unwrap();
        reg.register_host_class(entity()).unwrap();
        let prop = || ExtensionProperty::host_state("velocity_component", "Entity", "velocity_component");
        reg.register_extension_property(prop()).unwrap();
        assert_eq!(
            reg.register_extension_property(prop()).unwrap_err(),
            TypeRegistrationError::DuplicateExtension {
                type_name: "entity".into(),
                property: "velocity_component".into(),
            }
        );
    }

    #[test]
    fn extension_conflicting_with_member_fails() {
        let mut reg = TypeRegistry::new();
        reg.register_host_class(velocity()).unwrap();
        let prop = ExtensionProperty::new("x_velocity", "VelocityComponent", "float", |_| {
            Value::Float(0.0)
        });
        assert!(matches!(
            reg.register_extension_property(prop),
            Err(TypeRegistrationError::MemberConflict { .. })
        ));
    }

    #[test]
    fn extension_on_unknown_class_fails() {
        let mut reg = TypeRegistry::new();
        let prop = ExtensionProperty::new("hp", "Monster", "int", |_| Value::Int(0));
        assert_eq!(
            reg.register_extension_property(prop).unwrap_err(),
            TypeRegistrationError::UnknownType("Monster".into())
        );
    }

    #[test]
    fn task_types() {
        let mut reg = TypeRegistry::new();
        let task = reg
            .register_host_class(HostClass::new("SingleChoice", "single_choice_task").kind(HostKind::Task))
            .unwrap();
        let record = reg.register_record("notes", vec![]).unwrap();
        assert!(reg.is_task_type(&task));
        assert!(!reg.is_task_type(&record));
        assert!(!reg.is_task_type(&Type::Int));
    }
}
