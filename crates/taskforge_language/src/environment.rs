//! The compilation environment shared by every program of a session.
//!
//! An [`Environment`] owns the [`TypeRegistry`] and the scope tree whose
//! global scope the host populates (types, extension properties, native
//! functions) before any DSL program is analyzed. Programs analyzed against
//! the environment add their top-level definitions to the global scope.
//!
//! # Thread Safety
//!
//! Registration and analysis take `&mut self`; compiling several programs
//! against one environment is serialized by construction.

use std::sync::Arc;

use taskforge_foundation::{
    Error, Result, SemanticErrorKind, SourceLocation, Type, TypeRegistrationError,
};
use taskforge_types::{ExtensionProperty, HostClass, MemberDesc, TypeRegistry};
use tracing::debug;

use crate::native::NativeFunction;
use crate::scope::{Checkpoint, ScopeId, ScopeTree};
use crate::symbol::{FunctionOrigin, FunctionSymbol, Symbol};

/// Types, scopes and host functions visible to DSL programs.
#[derive(Debug)]
pub struct Environment {
    registry: TypeRegistry,
    pub(crate) scopes: ScopeTree,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    /// Creates an environment whose global scope holds the built-in types.
    #[must_use]
    pub fn new() -> Self {
        let mut scopes = ScopeTree::new();
        for name in TypeRegistry::builtin_names() {
            if let Some(ty) = TypeRegistry::builtin(name) {
                // Built-in names are distinct, so this cannot collide.
                let _ = scopes.declare(ScopeId::GLOBAL, name, Symbol::Type(ty));
            }
        }
        Self {
            registry: TypeRegistry::new(),
            scopes,
        }
    }

    /// Registers a host class and binds its DSL name in the global scope.
    ///
    /// # Errors
    /// Any [`TypeRegistrationError`] from the registry, or
    /// [`TypeRegistrationError::DuplicateTypeName`] if a global function already uses the name.
    pub fn register_host_class(
        &mut self,
        class: HostClass,
    ) -> std::result::Result<Type, TypeRegistrationError> {
        let name = class.dsl_name.clone();
        self.ensure_free(&name)?;
        let ty = self.registry.register_host_class(class)?;
        self.bind_type(name, ty.clone())?;
        Ok(ty)
    }

    /// Registers an aggregate type with no host class behind it.
    ///
    /// # Errors
    /// Same as [`register_host_class`](Self::register_host_class).
    pub fn register_record(
        &mut self,
        name: impl Into<Arc<str>>,
        members: Vec<MemberDesc>,
    ) -> std::result::Result<Type, TypeRegistrationError> {
        let name = name.into();
        self.ensure_free(&name)?;
        let ty = self.registry.register_record(name.clone(), members)?;
        self.bind_type(name, ty.clone())?;
        Ok(ty)
    }

    /// Attaches an extension property to a registered host class.
    ///
    /// # Errors
    /// Any [`TypeRegistrationError`] from the registry.
    pub fn register_extension_property(
        &mut self,
        property: ExtensionProperty,
    ) -> std::result::Result<(), TypeRegistrationError> {
        self.registry.register_extension_property(property)
    }

    /// Binds a native function in the global scope.
    ///
    /// # Errors
    /// Returns a duplicate definition error if the name is taken.
    pub fn register_native(&mut self, native: NativeFunction) -> Result<Arc<FunctionSymbol>> {
        let name: Arc<str> = native.name.into();
        let symbol = Arc::new(FunctionSymbol {
            name: name.clone(),
            function_type: Arc::new(native.function_type()),
            origin: FunctionOrigin::Native(native),
            location: SourceLocation::host(),
        });
        self.scopes
            .declare(ScopeId::GLOBAL, name.clone(), Symbol::Function(symbol.clone()))
            .map_err(|_| {
                Error::semantic(
                    SourceLocation::host(),
                    SemanticErrorKind::DuplicateDefinition(name.to_string()),
                )
            })?;
        debug!(function = %name, "registered native function");
        Ok(symbol)
    }

    /// The type registry.
    #[must_use]
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// The scope tree.
    #[must_use]
    pub fn scopes(&self) -> &ScopeTree {
        &self.scopes
    }

    /// Resolves a name in the global scope.
    #[must_use]
    pub fn lookup_global(&self, name: &str) -> Option<&Symbol> {
        self.scopes.lookup_local(ScopeId::GLOBAL, name)
    }

    /// Resolves a global function by name.
    #[must_use]
    pub fn function(&self, name: &str) -> Option<&Arc<FunctionSymbol>> {
        match self.lookup_global(name)? {
            Symbol::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Iterates over global bindings in declaration order.
    pub fn global_symbols(&self) -> impl Iterator<Item = (&Arc<str>, &Symbol)> {
        self.scopes.symbols(ScopeId::GLOBAL)
    }

    /// Records the scope state so a failed program can be undone.
    #[must_use]
    pub fn checkpoint(&self) -> Checkpoint {
        self.scopes.checkpoint()
    }

    /// Removes every binding made since `checkpoint`.
    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        self.scopes.rollback(checkpoint);
    }

    fn ensure_free(&self, name: &str) -> std::result::Result<(), TypeRegistrationError> {
        if self.lookup_global(name).is_some() {
            return Err(TypeRegistrationError::DuplicateTypeName(name.to_string()));
        }
        Ok(())
    }

    fn bind_type(
        &mut self,
        name: Arc<str>,
        ty: Type,
    ) -> std::result::Result<(), TypeRegistrationError> {
        self.scopes
            .declare(ScopeId::GLOBAL, name.clone(), Symbol::Type(ty))
            .map_err(|_| TypeRegistrationError::DuplicateTypeName(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskforge_foundation::Value;
    use taskforge_types::HostKind;

    fn quest() -> HostClass {
        HostClass::new("FetchQuest", "fetch_quest")
            .kind(HostKind::Task)
            .member(MemberDesc::new("item", "string").defaulted())
    }

    #[test]
    fn builtins_are_global_types() {
        let env = Environment::new();
        assert!(matches!(env.lookup_global("int"), Some(Symbol::Type(Type::Int))));
        assert!(matches!(
            env.lookup_global("entity_type"),
            Some(Symbol::Type(Type::Prototype))
        ));
    }

    #[test]
    fn host_class_is_bound() {
        let mut env = Environment::new();
        let ty = env.register_host_class(quest()).unwrap();
        assert!(matches!(env.lookup_global("fetch_quest"), Some(Symbol::Type(t)) if *t == ty));
        assert!(env.registry().is_task_type(&ty));
    }

    #[test]
    fn duplicate_origin_fails() {
        let mut env = Environment::new();
        env.register_host_class(quest()).unwrap();
        let err = env
            .register_host_class(HostClass::new("FetchQuest", "other_name"))
            .unwrap_err();
        assert_eq!(
            err,
            TypeRegistrationError::DuplicateOriginType("FetchQuest".into())
        );
        assert!(env.lookup_global("other_name").is_none());
    }

    fn answer(
        _: &mut crate::native::NativeContext<'_>,
        _: &[Value],
    ) -> std::result::Result<Value, taskforge_foundation::InterpretationErrorKind> {
        Ok(Value::Int(42))
    }

    #[test]
    fn natives_and_type_names_share_the_global_scope() {
        let mut env = Environment::new();
        env.register_native(NativeFunction::new("answer", vec![], Type::Int, answer))
            .unwrap();
        assert!(env.function("answer").is_some());
        assert!(env
            .register_native(NativeFunction::new("answer", vec![], Type::Int, answer))
            .is_err());
        assert_eq!(
            env.register_record("answer", vec![]).unwrap_err(),
            TypeRegistrationError::DuplicateTypeName("answer".into())
        );
        assert!(env
            .register_native(NativeFunction::new("int", vec![], Type::Int, answer))
            .is_err());
    }
}
