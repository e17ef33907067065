//! Task dependency graphs handed to the game runtime.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::value::Object;

/// How one task depends on another.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    /// `to` starts after `from` completes.
    #[default]
    Sequence,
    /// `to` is a mandatory subtask of `from`.
    SubtaskMandatory,
    /// `to` is an optional subtask of `from`.
    SubtaskOptional,
    /// `to` follows only if `from` was answered correctly.
    ConditionalCorrect,
    /// `to` follows only if `from` was answered incorrectly.
    ConditionalFalse,
    /// `to` requires `from` and all other `seq_and` predecessors.
    SequenceAnd,
    /// `to` requires `from` or any other `seq_or` predecessor.
    SequenceOr,
}

impl EdgeKind {
    /// All kinds, in attribute order.
    pub const ALL: [EdgeKind; 7] = [
        Self::Sequence,
        Self::SubtaskMandatory,
        Self::SubtaskOptional,
        Self::ConditionalCorrect,
        Self::ConditionalFalse,
        Self::SequenceAnd,
        Self::SequenceOr,
    ];

    /// Parses the value of a `type=` edge attribute.
    #[must_use]
    pub fn from_attribute(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.attribute() == value)
    }

    /// The attribute spelling of this kind.
    #[must_use]
    pub const fn attribute(self) -> &'static str {
        match self {
            Self::Sequence => "seq",
            Self::SubtaskMandatory => "st_m",
            Self::SubtaskOptional => "st_o",
            Self::ConditionalCorrect => "c_c",
            Self::ConditionalFalse => "c_f",
            Self::SequenceAnd => "seq_and",
            Self::SequenceOr => "seq_or",
        }
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.attribute())
    }
}

/// A task in a dependency graph.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct TaskNode {
    /// The DSL name the task was defined under.
    pub name: Arc<str>,
    /// The evaluated task object.
    pub task: Object,
}

/// A directed dependency between two nodes, by index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct TaskEdge {
    /// Index of the source node.
    pub from: usize,
    /// Index of the target node.
    pub to: usize,
    /// Dependency kind.
    pub kind: EdgeKind,
}

/// Tasks and the ordering constraints between them.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct TaskDependencyGraph {
    /// Graph name.
    pub name: Arc<str>,
    /// Nodes in first-mention order.
    pub nodes: Vec<TaskNode>,
    /// Edges in declaration order.
    pub edges: Vec<TaskEdge>,
}

impl TaskDependencyGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Adds a node, or returns the index of the existing node with that name.
    pub fn add_node(&mut self, name: impl Into<Arc<str>>, task: Object) -> usize {
        let name = name.into();
        if let Some(index) = self.node_index(&name) {
            return index;
        }
        self.nodes.push(TaskNode { name, task });
        self.nodes.len() - 1
    }

    /// Adds an edge between two existing nodes. Duplicate edges are ignored.
    ///
    /// Returns false if either index is out of range.
    pub fn add_edge(&mut self, from: usize, to: usize, kind: EdgeKind) -> bool {
        if from >= self.nodes.len() || to >= self.nodes.len() {
            return false;
        }
        let edge = TaskEdge { from, to, kind };
        if !self.edges.contains(&edge) {
            self.edges.push(edge);
        }
        true
    }

    /// Returns the index of the node with the given name.
    #[must_use]
    pub fn node_index(&self, name: &str) -> Option<usize> {
        self.nodes.iter().position(|n| &*n.name == name)
    }

    /// Returns the node with the given name.
    #[must_use]
    pub fn node(&self, name: &str) -> Option<&TaskNode> {
        self.node_index(name).map(|i| &self.nodes[i])
    }

    /// Outgoing edges of a node.
    pub fn successors(&self, index: usize) -> impl Iterator<Item = &TaskEdge> {
        self.edges.iter().filter(move |e| e.from == index)
    }

    /// Incoming edges of a node.
    pub fn predecessors(&self, index: usize) -> impl Iterator<Item = &TaskEdge> {
        self.edges.iter().filter(move |e| e.to == index)
    }

    /// Nodes without predecessors: the tasks a player can start with.
    #[must_use]
    pub fn roots(&self) -> Vec<usize> {
        (0..self.nodes.len())
            .filter(|&i| self.predecessors(i).next().is_none())
            .collect()
    }

    /// Returns node indices in dependency order, or `None` if the graph has a cycle.
    ///
    /// Ties are broken by node index so the order is stable.
    #[must_use]
    pub fn topological_order(&self) -> Option<Vec<usize>> {
        let mut in_degree = vec![0usize; self.nodes.len()];
        for edge in &self.edges {
            in_degree[edge.to] += 1;
        }
        let mut ready: VecDeque<usize> = (0..self.nodes.len())
            .filter(|&i| in_degree[i] == 0)
            .collect();
        let mut order = Vec::with_capacity(self.nodes.len());
        while let Some(i) = ready.pop_front() {
            order.push(i);
            for edge in self.successors(i) {
                in_degree[edge.to] -= 1;
                if in_degree[edge.to] == 0 {
                    ready.push_back(edge.to);
                }
            }
        }
        (order.len() == self.nodes.len()).then_some(order)
    }
}
