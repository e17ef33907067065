//! The dungeon configuration record.

use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::graph::TaskDependencyGraph;
use crate::value::{Object, Value};

/// A task dependency graph bundled with the name shown to players.
///
/// Built from objects of the host class [`DungeonConfig::HOST_NAME`]; the
/// display name is exposed to DSL code as the member `name`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct DungeonConfig {
    /// Name shown to players.
    pub display_name: Arc<str>,
    /// The quest structure.
    pub dependency_graph: Arc<TaskDependencyGraph>,
}

impl DungeonConfig {
    /// Host class identity of the configuration record.
    pub const HOST_NAME: &'static str = "DungeonConfig";
    /// DSL type name of the configuration record.
    pub const DSL_NAME: &'static str = "dungeon_config";
    /// DSL member holding the display name.
    pub const NAME_MEMBER: &'static str = "name";
    /// DSL member holding the graph.
    pub const GRAPH_MEMBER: &'static str = "dependency_graph";

    /// Extracts a configuration from an evaluated `dungeon_config` object.
    ///
    /// Returns `None` if either member is missing or has the wrong kind.
    #[must_use]
    pub fn from_object(object: &Object) -> Option<Self> {
        let display_name = match object.get(Self::NAME_MEMBER)? {
            Value::String(s) => s.clone(),
            _ => return None,
        };
        let dependency_graph = match object.get(Self::GRAPH_MEMBER)? {
            Value::Graph(g) => g.clone(),
            _ => return None,
        };
        Some(Self {
            display_name,
            dependency_graph,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AggregateRef;

    #[test]
    fn from_object() {
        let graph = Arc::new(TaskDependencyGraph::new("g"));
        let obj = Object::new(AggregateRef::new(0, DungeonConfig::DSL_NAME))
            .with("name", Value::from("Crypt"))
            .with("dependency_graph", Value::Graph(graph.clone()));
        let config = DungeonConfig::from_object(&obj).unwrap();
        assert_eq!(&*config.display_name, "Crypt");
        assert_eq!(config.dependency_graph, graph);
    }

    #[test]
    fn from_incomplete_object() {
        let obj = Object::new(AggregateRef::new(0, DungeonConfig::DSL_NAME))
            .with("name", Value::Int(3));
        assert!(DungeonConfig::from_object(&obj).is_none());
    }
}
