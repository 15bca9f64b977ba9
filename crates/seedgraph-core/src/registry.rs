//! Explicit seeder registration.
//!
//! Rust seed suites cannot be discovered by reading source text, so each
//! seeder type implements [`Seeder`] and is added to a [`Registry`]. The
//! registry produces the same [`SeedUnit`]s the scanner does.

use std::collections::HashSet;

use crate::identifier::qualify;
use crate::unit::SeedUnit;

/// A type that seeds data, optionally after other seeders.
pub trait Seeder {
    /// Fully-qualified identifier of this seeder.
    const IDENTIFIER: &'static str;

    /// Fully-qualified identifiers of the seeders that must run first.
    fn depends_on() -> &'static [&'static str] {
        &[]
    }

    /// Abstract base seeders return `false` and are never registered.
    fn is_concrete() -> bool {
        true
    }
}

/// Ordered collection of registered seed units.
#[derive(Debug, Default)]
pub struct Registry {
    units: Vec<SeedUnit>,
    seen: HashSet<String>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a seeder type. Abstract types and repeated registrations
    /// are ignored.
    pub fn register<S: Seeder>(&mut self) -> &mut Self {
        if !S::is_concrete() {
            tracing::debug!("Not registering abstract seeder {}", S::IDENTIFIER);
            return self;
        }
        let unit = SeedUnit::new(
            qualify("", S::IDENTIFIER),
            S::depends_on().iter().map(|d| qualify("", d)),
        );
        self.register_unit(unit);
        self
    }

    /// Add an already-built unit. Returns `false` if its identifier was
    /// registered before.
    pub fn register_unit(&mut self, unit: SeedUnit) -> bool {
        if !self.seen.insert(unit.identifier().to_string()) {
            return false;
        }
        self.units.push(unit);
        true
    }

    pub fn units(&self) -> &[SeedUnit] {
        &self.units
    }

    pub fn into_units(self) -> Vec<SeedUnit> {
        self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}
