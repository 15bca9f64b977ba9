//! Seed manifests: explicit `*.seed.toml` declarations for seeders that
//! cannot be read from source.
//!
//! ```toml
//! namespace = 'Database\Seeders'
//!
//! [[seeder]]
//! class = 'UserSeeder'
//! depends_on = ['RoleSeeder', '\Other\Seeders\TeamSeeder']
//! ```

use std::path::Path;

use seedgraph_core::identifier::{NameContext, NAMESPACE_SEPARATOR};
use seedgraph_core::unit::SeedUnit;
use serde::Deserialize;

use crate::extractor::{ExtractError, MetadataExtractor};
use crate::MANIFEST_SUFFIX;

/// The parsed representation of a `*.seed.toml` file.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedManifest {
    /// Default namespace for bare class names.
    #[serde(default)]
    pub namespace: Option<String>,

    #[serde(default, rename = "seeder")]
    pub seeders: Vec<ManifestEntry>,
}

/// One `[[seeder]]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct ManifestEntry {
    pub class: String,

    #[serde(default, alias = "depends-on")]
    pub depends_on: Vec<String>,

    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
}

impl SeedManifest {
    /// Parse a manifest from TOML text.
    pub fn parse(content: &str) -> Result<Self, ExtractError> {
        Ok(toml::from_str(content)?)
    }

    /// Concrete entries as seed units with canonical identifiers.
    pub fn units(&self) -> Vec<SeedUnit> {
        let namespace = self.namespace.as_deref().unwrap_or("");
        let context = NameContext::new(namespace);
        self.seeders
            .iter()
            .filter(|entry| {
                if entry.is_abstract {
                    tracing::debug!("Skipping abstract manifest entry {}", entry.class);
                    return false;
                }
                if context.namespace().is_empty() && !entry.class.contains(NAMESPACE_SEPARATOR) {
                    tracing::debug!(
                        "Skipping manifest entry {}: no namespace to qualify it",
                        entry.class
                    );
                    return false;
                }
                true
            })
            .map(|entry| {
                SeedUnit::new(
                    context.resolve_string(&entry.class),
                    entry.depends_on.iter().map(|d| context.resolve_string(d)),
                )
            })
            .collect()
    }
}

/// Extracts seeders from `*.seed.toml` manifests.
#[derive(Debug, Default, Clone, Copy)]
pub struct ManifestExtractor;

impl MetadataExtractor for ManifestExtractor {
    fn name(&self) -> &'static str {
        "seed-manifest"
    }

    fn accepts(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(MANIFEST_SUFFIX))
    }

    fn extract(&self, path: &Path, source: &str) -> Result<Vec<SeedUnit>, ExtractError> {
        let manifest = SeedManifest::parse(source)?;
        Ok(manifest
            .units()
            .into_iter()
            .map(|unit| unit.with_source(path))
            .collect())
    }
}
