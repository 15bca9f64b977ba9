//! Non-fatal graph validation.

use std::fmt;

use seedgraph_core::unit::SeedUnit;
use serde::Serialize;

use crate::graph::DependencyGraph;
use crate::resolver::{traverse, Traversal};

/// A problem found in the seeder graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationError {
    /// `unit` declares a dependency on `missing`, which was not discovered.
    MissingDependency { unit: String, missing: String },
    /// The identifiers along a cycle; the first is repeated at the end.
    CircularDependency { cycle: Vec<String> },
    /// `identifier` is declared in two places with different dependencies.
    DuplicateDeclaration {
        identifier: String,
        first: String,
        second: String,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingDependency { unit, missing } => {
                write!(f, "{unit}: missing dependency {missing}")
            }
            Self::CircularDependency { cycle } => {
                write!(f, "circular dependency: {}", cycle.join(" -> "))
            }
            Self::DuplicateDeclaration {
                identifier,
                first,
                second,
            } => write!(
                f,
                "{identifier}: declared in {first} and again in {second} with different dependencies"
            ),
        }
    }
}

/// Every problem in `units`: conflicting declarations first, then the rest
/// in traversal order. Never fails and has no side effects.
pub fn validate_units(units: &[SeedUnit]) -> Vec<ValidationError> {
    let graph = DependencyGraph::build(units);
    traverse(&graph, Traversal::Collect).problems
}

/// A printable collection of validation errors.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }
}

impl From<Vec<ValidationError>> for ValidationReport {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self { errors }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() {
            return write!(f, "No problems found.");
        }
        writeln!(f, "Seeder graph problems ({}):", self.errors.len())?;
        for error in &self.errors {
            writeln!(f, "  {error}")?;
        }
        Ok(())
    }
}
