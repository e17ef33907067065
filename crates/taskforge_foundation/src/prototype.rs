//! Entity prototypes: named bags of component definitions.

use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::value::Object;

/// An evaluated `entity_type` definition.
///
/// The ECS layer instantiates entities from these. Components keep their
/// declaration order.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Prototype {
    /// The prototype's DSL name.
    pub name: Arc<str>,
    /// One object per component definition.
    pub components: Vec<Object>,
}

impl Prototype {
    /// Creates an empty prototype.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            components: Vec::new(),
        }
    }

    /// Returns the component of the given aggregate type name.
    #[must_use]
    pub fn component(&self, type_name: &str) -> Option<&Object> {
        self.components.iter().find(|c| c.type_name() == type_name)
    }
}
