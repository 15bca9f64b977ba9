use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use seedgraph_util::errors::SeedError;

/// Project configuration loaded from `Seedgraph.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub scan: ScanConfig,
}

/// Scan settings from `[scan]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Paths or glob patterns to scan, relative to the project root.
    #[serde(default = "default_paths")]
    pub paths: Vec<String>,
    /// Source file extensions that may declare seeders.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    /// Glob patterns for files that are never scanned. Patterns starting
    /// with `**` match anywhere; other relative patterns are taken from the
    /// project root.
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            paths: default_paths(),
            extensions: default_extensions(),
            exclude: Vec::new(),
        }
    }
}

fn default_paths() -> Vec<String> {
    vec!["database/seeders".to_string()]
}

fn default_extensions() -> Vec<String> {
    vec!["php".to_string()]
}

/// A configuration together with the directory it applies to.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: ProjectConfig,
    /// Directory containing `Seedgraph.toml`, or the start directory when
    /// no file was found.
    pub root: PathBuf,
    /// Whether the configuration came from a file.
    pub from_file: bool,
}

impl ProjectConfig {
    /// Load and parse a `Seedgraph.toml` file from the given path.
    pub fn from_path(path: &Path) -> miette::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| SeedError::Config {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> miette::Result<Self> {
        toml::from_str(content).map_err(|e| {
            SeedError::Config {
                message: format!("Failed to parse configuration: {e}"),
            }
            .into()
        })
    }

    /// Find `Seedgraph.toml` in `start` or one of its ancestors and load it,
    /// or return defaults rooted at `start` if there is none.
    pub fn discover(start: &Path) -> miette::Result<LoadedConfig> {
        match seedgraph_util::fs::find_ancestor_with(start, crate::CONFIG_FILE) {
            Some(root) => {
                let config = Self::from_path(&root.join(crate::CONFIG_FILE))?;
                tracing::debug!("Loaded configuration from {}", root.display());
                Ok(LoadedConfig {
                    config,
                    root,
                    from_file: true,
                })
            }
            None => Ok(LoadedConfig {
                config: Self::default(),
                root: start.to_path_buf(),
                from_file: false,
            }),
        }
    }
}

impl ScanConfig {
    /// Scan paths with relative entries joined onto `root`.
    pub fn resolved_paths(&self, root: &Path) -> Vec<String> {
        self.paths
            .iter()
            .map(|p| {
                if Path::new(p).is_absolute() {
                    p.clone()
                } else {
                    root.join(p).to_string_lossy().into_owned()
                }
            })
            .collect()
    }

    /// Exclude patterns anchored at `root`, except absolute ones and those
    /// starting with `**`.
    pub fn resolved_exclude(&self, root: &Path) -> Vec<String> {
        self.exclude
            .iter()
            .map(|p| {
                if p.starts_with("**") || Path::new(p).is_absolute() {
                    p.clone()
                } else {
                    root.join(p).to_string_lossy().into_owned()
                }
            })
            .collect()
    }
}
