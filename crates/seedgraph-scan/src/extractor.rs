//! Metadata extraction: decide which candidate files declare seed units.

use std::path::{Path, PathBuf};

use seedgraph_core::unit::SeedUnit;
use thiserror::Error;

use crate::manifest::ManifestExtractor;
use crate::php::PhpAttributeExtractor;

/// Why a candidate file could not be inspected. Such files are skipped.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("no namespace declared")]
    NoNamespace,

    #[error("unterminated attribute starting at byte {offset}")]
    UnterminatedAttribute { offset: usize },

    #[error("invalid seed manifest: {0}")]
    Manifest(#[from] toml::de::Error),
}

/// Reads seed unit declarations from one kind of source file.
pub trait MetadataExtractor {
    /// Short name used in log records.
    fn name(&self) -> &'static str;

    /// Returns `true` if this extractor understands `path`.
    fn accepts(&self, path: &Path) -> bool;

    /// The concrete, tagged units declared in `source`, with canonical
    /// identifiers. Files without seeders yield an empty list.
    fn extract(&self, path: &Path, source: &str) -> Result<Vec<SeedUnit>, ExtractError>;
}

/// Extractors in priority order; the first that accepts a file handles it.
const EXTRACTORS: &[&dyn MetadataExtractor] = &[&ManifestExtractor, &PhpAttributeExtractor];

/// Pick the extractor responsible for `path`.
pub fn extractor_for(path: &Path) -> Option<&'static dyn MetadataExtractor> {
    EXTRACTORS.iter().copied().find(|e| e.accepts(path))
}

/// Extract seed units from `files`, in file order. Unreadable or
/// unparsable files are skipped.
pub fn extract_units(files: &[PathBuf]) -> Vec<SeedUnit> {
    let mut units = Vec::new();
    for file in files {
        let Some(extractor) = extractor_for(file) else {
            continue;
        };
        let source = match std::fs::read_to_string(file) {
            Ok(source) => source,
            Err(e) => {
                tracing::debug!("Skipping unreadable file {}: {e}", file.display());
                continue;
            }
        };
        match extractor.extract(file, &source) {
            Ok(found) => {
                for unit in &found {
                    tracing::debug!(
                        "Found seeder {} ({} dependencies) via {}",
                        unit.identifier(),
                        unit.depends_on().len(),
                        extractor.name()
                    );
                }
                units.extend(found);
            }
            Err(e) => tracing::debug!("Skipping {}: {e}", file.display()),
        }
    }
    units
}
