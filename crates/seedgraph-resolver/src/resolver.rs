//! Deterministic topological ordering of seed units.
//!
//! Depth-first traversal with three-colour marking. Roots are taken in
//! discovery order and dependencies in declaration order, and a unit is
//! emitted only after all of its dependencies, so ties between
//! unconstrained units keep their discovery order. The traversal keeps its
//! own stack, so long dependency chains cannot overflow the call stack.

use petgraph::graph::NodeIndex;
use seedgraph_core::unit::SeedUnit;
use seedgraph_scan::ScanOptions;

use crate::error::ResolveError;
use crate::graph::{Dependency, DependencyGraph};
use crate::validate::{validate_units, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// How the traversal reacts to a problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Traversal {
    /// Stop at the first problem.
    FailFast,
    /// Record every problem and keep going.
    Collect,
}

pub(crate) struct TraversalResult {
    /// Emission order; complete only when `problems` is empty.
    pub order: Vec<NodeIndex>,
    pub problems: Vec<ValidationError>,
}

struct Frame<'g> {
    node: NodeIndex,
    deps: Vec<Dependency<'g>>,
    next: usize,
}

impl<'g> Frame<'g> {
    fn enter(graph: &'g DependencyGraph, node: NodeIndex) -> Self {
        Self {
            node,
            deps: graph.dependencies_of(node),
            next: 0,
        }
    }
}

pub(crate) fn traverse(graph: &DependencyGraph, mode: Traversal) -> TraversalResult {
    let mut marks = vec![Mark::Unvisited; graph.len()];
    let mut order = Vec::with_capacity(graph.len());
    let mut problems = graph.conflicts().to_vec();
    if mode == Traversal::FailFast && !problems.is_empty() {
        return TraversalResult { order, problems };
    }
    let mut stack: Vec<Frame<'_>> = Vec::new();

    for root in graph.node_indices() {
        if marks[root.index()] != Mark::Unvisited {
            continue;
        }
        marks[root.index()] = Mark::InProgress;
        stack.push(Frame::enter(graph, root));

        while let Some(frame) = stack.last_mut() {
            let Some(dep) = frame.deps.get(frame.next).copied() else {
                let node = frame.node;
                stack.pop();
                marks[node.index()] = Mark::Done;
                tracing::trace!("Emitting {}", graph.node(node).identifier());
                order.push(node);
                continue;
            };
            frame.next += 1;
            let node = frame.node;

            let problem = match dep {
                Dependency::Missing(missing) => Some(ValidationError::MissingDependency {
                    unit: graph.node(node).identifier().to_string(),
                    missing: missing.to_string(),
                }),
                Dependency::Present(child) => match marks[child.index()] {
                    Mark::Done => None,
                    Mark::InProgress => Some(ValidationError::CircularDependency {
                        cycle: cycle_through(graph, &stack, child),
                    }),
                    Mark::Unvisited => {
                        marks[child.index()] = Mark::InProgress;
                        stack.push(Frame::enter(graph, child));
                        None
                    }
                },
            };

            if let Some(problem) = problem {
                problems.push(problem);
                if mode == Traversal::FailFast {
                    return TraversalResult { order, problems };
                }
            }
        }
    }

    TraversalResult { order, problems }
}

/// Identifiers from `repeat` down the current stack and back to `repeat`.
fn cycle_through(graph: &DependencyGraph, stack: &[Frame<'_>], repeat: NodeIndex) -> Vec<String> {
    let start = stack.iter().position(|f| f.node == repeat).unwrap_or(0);
    stack[start..]
        .iter()
        .map(|f| f.node)
        .chain(std::iter::once(repeat))
        .map(|idx| graph.node(idx).identifier().to_string())
        .collect()
}

/// Order `units` so that every unit follows all of its dependencies.
///
/// Repeated identifiers collapse to their first occurrence. Fails on a
/// conflicting redeclaration, or on the first cycle or missing dependency
/// met; no partial order is returned.
pub fn resolve(units: &[SeedUnit]) -> Result<Vec<SeedUnit>, ResolveError> {
    let graph = DependencyGraph::build(units);
    let TraversalResult { order, problems } = traverse(&graph, Traversal::FailFast);
    if let Some(problem) = problems.into_iter().next() {
        return Err(problem.into());
    }
    debug_assert_eq!(order.len(), graph.len());
    Ok(order.into_iter().map(|idx| graph.node(idx).clone()).collect())
}

/// Discovers seed units on disk and orders them.
///
/// Each [`discover`](Self::discover) call rescans from scratch; the units of
/// the last scan are kept so [`validate`](Self::validate) can inspect them.
#[derive(Debug, Default)]
pub struct SeedResolver {
    options: ScanOptions,
    units: Vec<SeedUnit>,
}

impl SeedResolver {
    pub fn new(options: ScanOptions) -> Self {
        Self {
            options,
            units: Vec::new(),
        }
    }

    /// Scan `paths` and return the seeding order.
    pub fn discover<S: AsRef<str>>(&mut self, paths: &[S]) -> Result<Vec<SeedUnit>, ResolveError> {
        self.units = seedgraph_scan::discover_units(paths, &self.options);
        tracing::debug!("Discovered {} seeder(s)", self.units.len());
        resolve(&self.units)
    }

    /// Problems in the graph as last scanned. Empty before the first scan.
    pub fn validate(&self) -> Vec<ValidationError> {
        validate_units(&self.units)
    }

    /// Units found by the last scan, in discovery order.
    pub fn units(&self) -> &[SeedUnit] {
        &self.units
    }
}
