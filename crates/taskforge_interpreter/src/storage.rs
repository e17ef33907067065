//! Scenario builder storage.
//!
//! Indexes scenario builder functions by the task type they build. Slots are
//! created once per task type at load time; afterwards the game layer only
//! reads, picking a random builder for a task instance.
//!
//! # Thread Safety
//!
//! The storage is `Send + Sync`. Registration takes `&mut self` and retrieval
//! takes `&self`, so a host that retrieves from several threads can wrap it in
//! an `RwLock` once registration is finished.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use rand::Rng;
use taskforge_foundation::{RegistryError, Type};
use taskforge_language::{Environment, FunctionSymbol, Symbol};
use taskforge_types::TypeRegistry;
use tracing::debug;

/// State of the slot for one type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotState {
    /// No slot exists.
    Uninitialized,
    /// A slot exists with no builders.
    Empty,
    /// A slot exists with at least one builder.
    Populated,
}

/// Registry of scenario builders keyed by task type.
#[derive(Debug, Default)]
pub struct ScenarioBuilderStorage {
    slots: HashMap<Type, Vec<Arc<FunctionSymbol>>>,
    order: Vec<Type>,
}

impl ScenarioBuilderStorage {
    /// Creates storage with no slots.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty slot for a task type.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::NotATaskType`] unless `registry` knows the type as a task
    /// - [`RegistryError::DuplicateStorage`] if the type already has a slot
    pub fn initialize_storage_for_type(
        &mut self,
        registry: &TypeRegistry,
        ty: Type,
    ) -> Result<(), RegistryError> {
        if !registry.is_task_type(&ty) {
            return Err(RegistryError::NotATaskType(ty.to_string()));
        }
        if self.slots.contains_key(&ty) {
            return Err(RegistryError::DuplicateStorage(ty.to_string()));
        }
        self.insert_slot(ty);
        Ok(())
    }

    fn insert_slot(&mut self, ty: Type) {
        debug!(task_type = %ty, "initialized scenario builder storage");
        self.order.push(ty.clone());
        self.slots.insert(ty, Vec::new());
    }

    /// Creates a slot for every task type bound in the environment's global scope.
    ///
    /// Returns the number of slots created.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateStorage`] if any of those types already
    /// has a slot. No slot is created in that case.
    pub fn initialize_from_environment(&mut self, env: &Environment) -> Result<usize, RegistryError> {
        let mut seen = HashSet::new();
        let task_types: Vec<Type> = env
            .global_symbols()
            .filter_map(|(_, symbol)| match symbol {
                Symbol::Type(ty) if env.registry().is_task_type(ty) && seen.insert(ty.clone()) => {
                    Some(ty.clone())
                }
                _ => None,
            })
            .collect();
        if let Some(taken) = task_types.iter().find(|ty| self.slots.contains_key(*ty)) {
            return Err(RegistryError::DuplicateStorage(taken.to_string()));
        }
        for ty in &task_types {
            self.insert_slot(ty.clone());
        }
        Ok(task_types.len())
    }

    /// Stores a builder under the type of its first parameter.
    ///
    /// Functions whose first parameter type has no slot are ignored. Returns
    /// true if the function was stored.
    pub fn store_scenario_builder(&mut self, function: Arc<FunctionSymbol>) -> bool {
        let Some(ty) = function.first_parameter() else {
            return false;
        };
        let Some(slot) = self.slots.get_mut(ty) else {
            return false;
        };
        debug!(
            task_type = %ty,
            builder = %function.name,
            builders = slot.len() + 1,
            "stored scenario builder"
        );
        slot.push(function);
        true
    }

    /// Types that have a slot, in initialization order.
    pub fn types_with_storage(&self) -> impl Iterator<Item = &Type> {
        self.order.iter()
    }

    /// The builders stored for a type, in storage order.
    #[must_use]
    pub fn builders_for_type(&self, ty: &Type) -> &[Arc<FunctionSymbol>] {
        self.slots.get(ty).map_or(&[], Vec::as_slice)
    }

    /// The slot state of a type.
    #[must_use]
    pub fn state(&self, ty: &Type) -> SlotState {
        match self.slots.get(ty) {
            None => SlotState::Uninitialized,
            Some(builders) if builders.is_empty() => SlotState::Empty,
            Some(_) => SlotState::Populated,
        }
    }

    /// Picks a builder for a type uniformly at random.
    ///
    /// Returns `None` both when the type has no slot and when its slot is empty.
    pub fn retrieve_random_scenario_builder_for_type<R: Rng + ?Sized>(
        &self,
        ty: &Type,
        rng: &mut R,
    ) -> Option<Arc<FunctionSymbol>> {
        let builders = self.slots.get(ty)?;
        if builders.is_empty() {
            return None;
        }
        builders.get(rng.gen_range(0..builders.len())).cloned()
    }
}
