//! Artifacts handed to the game runtime.

use std::collections::BTreeMap;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::Serialize;

use taskforge_foundation::{DungeonConfig, Object, Prototype, TaskDependencyGraph, Value};

/// The evaluated top-level definitions of one or more programs, by name.
///
/// Ownership passes to the caller once evaluation completes; a failed program
/// contributes nothing.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Artifacts {
    /// Entity prototypes from `entity_type` definitions.
    pub prototypes: BTreeMap<Arc<str>, Arc<Prototype>>,
    /// Task dependency graphs from `graph` definitions.
    pub graphs: BTreeMap<Arc<str>, Arc<TaskDependencyGraph>>,
    /// Objects from object definitions, including tasks and configs.
    pub objects: BTreeMap<Arc<str>, Object>,
    /// Dungeon configurations built from `dungeon_config` objects.
    pub dungeons: BTreeMap<Arc<str>, DungeonConfig>,
}

impl Artifacts {
    /// Creates an empty set of artifacts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Files a top-level value under its definition name.
    ///
    /// Values that are not artifacts (scalars, collections) are ignored.
    pub fn insert(&mut self, name: Arc<str>, value: &Value) {
        match value {
            Value::Prototype(p) => {
                self.prototypes.insert(name, p.clone());
            }
            Value::Graph(g) => {
                self.graphs.insert(name, g.clone());
            }
            Value::Object(o) => {
                self.objects.insert(name, o.clone());
            }
            _ => {}
        }
    }

    /// Files a dungeon configuration.
    pub fn insert_dungeon(&mut self, name: Arc<str>, config: DungeonConfig) {
        self.dungeons.insert(name, config);
    }

    /// Moves every artifact of `other` into `self`.
    pub fn merge(&mut self, other: Artifacts) {
        self.prototypes.extend(other.prototypes);
        self.graphs.extend(other.graphs);
        self.objects.extend(other.objects);
        self.dungeons.extend(other.dungeons);
    }

    /// Looks up a prototype.
    #[must_use]
    pub fn prototype(&self, name: &str) -> Option<&Arc<Prototype>> {
        self.prototypes.get(name)
    }

    /// Looks up a graph.
    #[must_use]
    pub fn graph(&self, name: &str) -> Option<&Arc<TaskDependencyGraph>> {
        self.graphs.get(name)
    }

    /// Looks up an object.
    #[must_use]
    pub fn object(&self, name: &str) -> Option<&Object> {
        self.objects.get(name)
    }

    /// Looks up a dungeon configuration.
    #[must_use]
    pub fn dungeon(&self, name: &str) -> Option<&DungeonConfig> {
        self.dungeons.get(name)
    }

    /// Total number of artifacts. Dungeon configs also count as objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.prototypes.len() + self.graphs.len() + self.objects.len()
    }

    /// Returns true if there are no artifacts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
