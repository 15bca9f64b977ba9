//! Seeder dependency graph construction.

use std::collections::{HashMap, HashSet};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use seedgraph_core::unit::SeedUnit;

use crate::validate::ValidationError;

/// One declared dependency of a node, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dependency<'g> {
    /// The dependency was discovered.
    Present(NodeIndex),
    /// No discovered unit carries this identifier.
    Missing(&'g str),
}

/// Seed units keyed by identifier, with edges from each unit to the units
/// it depends on. Node indices follow discovery order.
pub struct DependencyGraph {
    graph: DiGraph<SeedUnit, ()>,
    index: HashMap<String, NodeIndex>,
    conflicts: Vec<ValidationError>,
}

impl DependencyGraph {
    /// Build the graph for `units`. The first unit seen for an identifier
    /// wins; later ones are dropped. A later one from a different source
    /// with different dependencies is recorded as a conflict.
    pub fn build(units: &[SeedUnit]) -> Self {
        let mut graph = Self {
            graph: DiGraph::new(),
            index: HashMap::new(),
            conflicts: Vec::new(),
        };
        for unit in units {
            graph.add_node(unit);
        }
        let nodes: Vec<NodeIndex> = graph.graph.node_indices().collect();
        for from in nodes {
            let targets: Vec<NodeIndex> = graph
                .dependencies_of(from)
                .into_iter()
                .filter_map(|dep| match dep {
                    Dependency::Present(to) => Some(to),
                    Dependency::Missing(_) => None,
                })
                .collect();
            for to in targets {
                graph.add_edge(from, to);
            }
        }
        tracing::trace!(
            "Built seeder graph: {} node(s), {} edge(s)",
            graph.graph.node_count(),
            graph.graph.edge_count()
        );
        graph
    }

    fn add_node(&mut self, unit: &SeedUnit) -> NodeIndex {
        if let Some(&idx) = self.index.get(unit.identifier()) {
            let existing = &self.graph[idx];
            if existing.depends_on() != unit.depends_on() && existing.source() != unit.source() {
                tracing::debug!(
                    "Conflicting declarations of {} in {} and {}",
                    unit.identifier(),
                    display_source(existing),
                    display_source(unit),
                );
                self.conflicts.push(ValidationError::DuplicateDeclaration {
                    identifier: unit.identifier().to_string(),
                    first: display_source(existing),
                    second: display_source(unit),
                });
            }
            return idx;
        }
        let idx = self.graph.add_node(unit.clone());
        self.index.insert(unit.identifier().to_string(), idx);
        idx
    }

    fn add_edge(&mut self, from: NodeIndex, to: NodeIndex) {
        if !self.graph.edges(from).any(|e| e.target() == to) {
            self.graph.add_edge(from, to, ());
        }
    }

    /// Conflicting redeclarations met while building, in discovery order.
    pub fn conflicts(&self) -> &[ValidationError] {
        &self.conflicts
    }

    /// Look up a node by identifier.
    pub fn find(&self, identifier: &str) -> Option<NodeIndex> {
        self.index.get(identifier).copied()
    }

    /// Get the unit for an index.
    pub fn node(&self, idx: NodeIndex) -> &SeedUnit {
        &self.graph[idx]
    }

    /// Node indices in discovery order.
    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    /// Units in discovery order.
    pub fn units(&self) -> impl Iterator<Item = &SeedUnit> + '_ {
        self.graph.node_indices().map(|idx| &self.graph[idx])
    }

    /// Declared dependencies of a node in declaration order, repeated
    /// identifiers collapsed.
    pub fn dependencies_of(&self, idx: NodeIndex) -> Vec<Dependency<'_>> {
        let mut seen = HashSet::new();
        self.graph[idx]
            .depends_on()
            .iter()
            .filter(|id| seen.insert(id.as_str()))
            .map(|id| match self.find(id) {
                Some(target) => Dependency::Present(target),
                None => Dependency::Missing(id.as_str()),
            })
            .collect()
    }

    /// Units that declare a dependency on this node.
    pub fn dependents_of(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut dependents: Vec<NodeIndex> = self
            .graph
            .edges_directed(idx, Direction::Incoming)
            .map(|e| e.source())
            .collect();
        dependents.sort();
        dependents
    }

    /// Number of distinct units.
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn display_source(unit: &SeedUnit) -> String {
    unit.source()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<registered>".to_string())
}
