//! Enumerate candidate seeder files from paths and glob patterns.
//!
//! Scanning is best-effort discovery: missing paths and unreadable
//! directories contribute nothing instead of failing. Every file is
//! reported once, in first-seen order, however many patterns reach it.

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use globset::{GlobBuilder, GlobMatcher, GlobSet, GlobSetBuilder};
use seedgraph_util::fs::{canonical_or_self, sorted_entries};

use crate::{ScanOptions, MANIFEST_SUFFIX};

const GLOB_META: &[char] = &['*', '?', '[', '{'];

/// Collect all candidate files reachable from `patterns`.
pub fn scan<S: AsRef<str>>(patterns: &[S], options: &ScanOptions) -> Vec<PathBuf> {
    let exclude = build_exclude_set(&options.exclude);
    let mut seen = HashSet::new();
    let mut visited = HashSet::new();
    let mut files = Vec::new();

    for pattern in patterns {
        let pattern = pattern.as_ref();
        for root in expand(pattern) {
            let mut found = Vec::new();
            if root.is_dir() {
                collect_files_recursive(&root, &mut visited, &mut found);
            } else if root.is_file() {
                found.push(root);
            }
            for file in found {
                if !is_candidate(&file, options) || exclude.is_match(without_cur_dir(&file)) {
                    continue;
                }
                if seen.insert(canonical_or_self(&file)) {
                    files.push(file);
                }
            }
        }
    }

    tracing::debug!("Scanned {} pattern(s), {} candidate file(s)", patterns.len(), files.len());
    files
}

/// Whether `path` has a recognized source extension or is a seed manifest.
pub fn is_candidate(path: &Path, options: &ScanOptions) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    if name.ends_with(MANIFEST_SUFFIX) {
        return true;
    }
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| options.extensions.iter().any(|e| e == ext))
}

/// Returns `true` if `pattern` contains glob metacharacters.
pub fn is_glob(pattern: &str) -> bool {
    pattern.contains(GLOB_META)
}

/// Expand one pattern into the existing files and directories it names.
fn expand(pattern: &str) -> Vec<PathBuf> {
    if !is_glob(pattern) {
        let path = Path::new(pattern);
        return if path.exists() {
            vec![without_cur_dir(path)]
        } else {
            Vec::new()
        };
    }

    let pattern = normalize_pattern(pattern);
    let matcher = match GlobBuilder::new(&pattern).literal_separator(true).build() {
        Ok(glob) => glob.compile_matcher(),
        Err(e) => {
            tracing::warn!("Ignoring invalid scan pattern '{pattern}': {e}");
            return Vec::new();
        }
    };

    let base = literal_prefix(&pattern);
    let mut matches = Vec::new();
    let mut visited = HashSet::new();
    if base.as_os_str().is_empty() {
        walk_matching(Path::new("."), &matcher, &mut visited, &mut matches);
    } else if base.is_dir() {
        walk_matching(&base, &matcher, &mut visited, &mut matches);
    }
    matches
}

/// `path` without `.` components, so it lines up with glob text. An
/// all-`.` path becomes `.`.
fn without_cur_dir(path: &Path) -> PathBuf {
    let cleaned: PathBuf = path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    if cleaned.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        cleaned
    }
}

/// Glob text with `.` segments removed.
fn normalize_pattern(pattern: &str) -> String {
    without_cur_dir(Path::new(pattern))
        .to_string_lossy()
        .into_owned()
}

/// Leading components of `pattern` that contain no glob metacharacters.
fn literal_prefix(pattern: &str) -> PathBuf {
    let mut base = PathBuf::new();
    for component in Path::new(pattern).components() {
        if let Component::Normal(part) = component {
            if part.to_string_lossy().contains(GLOB_META) {
                break;
            }
        }
        base.push(component);
    }
    base
}

/// Walk `dir`, pushing entries that match. Matched directories are not
/// descended into; the caller collects their contents.
fn walk_matching(
    dir: &Path,
    matcher: &GlobMatcher,
    visited: &mut HashSet<PathBuf>,
    out: &mut Vec<PathBuf>,
) {
    if !visited.insert(canonical_or_self(dir)) {
        tracing::debug!("Not revisiting {}", dir.display());
        return;
    }
    for path in sorted_entries(dir) {
        let candidate = path.strip_prefix(".").unwrap_or(&path).to_path_buf();
        if matcher.is_match(&candidate) {
            out.push(candidate);
        } else if path.is_dir() {
            walk_matching(&path, matcher, visited, out);
        }
    }
}

/// Every file under `dir`. Directories already walked (through a symlink,
/// say) are skipped, which also stops symlink loops.
fn collect_files_recursive(dir: &Path, visited: &mut HashSet<PathBuf>, out: &mut Vec<PathBuf>) {
    if !visited.insert(canonical_or_self(dir)) {
        tracing::debug!("Not revisiting {}", dir.display());
        return;
    }
    for path in sorted_entries(dir) {
        if path.is_dir() {
            collect_files_recursive(&path, visited, out);
        } else if path.is_file() {
            out.push(path);
        }
    }
}

fn build_exclude_set(patterns: &[String]) -> GlobSet {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let pattern = normalize_pattern(pattern);
        match GlobBuilder::new(&pattern).literal_separator(true).build() {
            Ok(glob) => {
                builder.add(glob);
            }
            Err(e) => tracing::warn!("Ignoring invalid exclude pattern '{pattern}': {e}"),
        }
    }
    builder.build().unwrap_or_else(|e| {
        tracing::warn!("Failed to build exclude set: {e}");
        GlobSet::empty()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_prefix_stops_at_meta() {
        assert_eq!(
            literal_prefix("app/Modules/*/Seeders"),
            PathBuf::from("app/Modules")
        );
        assert_eq!(literal_prefix("/abs/**/x.php"), PathBuf::from("/abs"));
        assert_eq!(literal_prefix("*.php"), PathBuf::new());
    }

    #[test]
    fn cur_dir_segments_are_dropped() {
        assert_eq!(normalize_pattern("/srv/app/./seeders/*.php"), "/srv/app/seeders/*.php");
        assert_eq!(normalize_pattern("./seeders/*"), "seeders/*");
        assert_eq!(without_cur_dir(Path::new(".")), PathBuf::from("."));
        assert_eq!(literal_prefix(&normalize_pattern("./a/./b/*")), PathBuf::from("a/b"));
    }

    #[test]
    fn glob_detection() {
        assert!(is_glob("seeders/*"));
        assert!(is_glob("seeders/{a,b}"));
        assert!(!is_glob("database/seeders"));
    }

    #[test]
    fn candidate_by_extension_or_manifest_suffix() {
        let options = ScanOptions::default();
        assert!(is_candidate(Path::new("a/UserSeeder.php"), &options));
        assert!(is_candidate(Path::new("a/billing.seed.toml"), &options));
        assert!(!is_candidate(Path::new("a/Cargo.toml"), &options));
        assert!(!is_candidate(Path::new("a/README.md"), &options));
    }
}
