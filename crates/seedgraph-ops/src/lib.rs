pub mod ops_check;
pub mod ops_order;

use std::path::Path;

use seedgraph_core::config::ProjectConfig;
use seedgraph_scan::ScanOptions;

/// What to scan and how, after merging `Seedgraph.toml` with command-line
/// paths.
#[derive(Debug, Clone)]
pub struct ScanPlan {
    pub patterns: Vec<String>,
    pub options: ScanOptions,
}

/// Build the scan plan for `project_dir`.
///
/// Explicit `paths` replace the configured ones and are taken relative to
/// `project_dir`; configured paths are relative to the directory holding
/// `Seedgraph.toml`.
pub fn scan_plan(project_dir: &Path, paths: &[String]) -> miette::Result<ScanPlan> {
    let loaded = ProjectConfig::discover(project_dir)?;
    if !loaded.from_file {
        tracing::debug!("No Seedgraph.toml found, using default scan settings");
    }
    let patterns = if paths.is_empty() {
        loaded.config.scan.resolved_paths(&loaded.root)
    } else {
        paths
            .iter()
            .map(|p| {
                if Path::new(p).is_absolute() {
                    p.clone()
                } else {
                    project_dir.join(p).to_string_lossy().into_owned()
                }
            })
            .collect()
    };
    let options = ScanOptions {
        exclude: loaded.config.scan.resolved_exclude(&loaded.root),
        ..ScanOptions::from(&loaded.config.scan)
    };
    Ok(ScanPlan { patterns, options })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_paths_are_relative_to_config_dir() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join("Seedgraph.toml"),
            "[scan]\npaths = [\"seeders\"]\nexclude = [\"**/Legacy/**\"]\n",
        )
        .unwrap();
        let nested = tmp.path().join("app");
        std::fs::create_dir_all(&nested).unwrap();

        let plan = scan_plan(&nested, &[]).unwrap();
        assert_eq!(
            plan.patterns,
            vec![tmp.path().join("seeders").to_string_lossy().into_owned()]
        );
        assert_eq!(plan.options.exclude, vec!["**/Legacy/**".to_string()]);
    }

    #[test]
    fn project_relative_excludes_are_anchored_at_config_dir() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join("Seedgraph.toml"),
            "[scan]\nexclude = [\"database/seeders/Legacy/**\"]\n",
        )
        .unwrap();
        let seeders = tmp.path().join("database/seeders");
        std::fs::create_dir_all(seeders.join("Legacy")).unwrap();
        std::fs::write(
            seeders.join("RoleSeeder.php"),
            "<?php namespace App;\n#[Seeder]\nclass RoleSeeder {}\n",
        )
        .unwrap();
        std::fs::write(
            seeders.join("Legacy/OldSeeder.php"),
            "<?php namespace App;\n#[Seeder]\nclass OldSeeder {}\n",
        )
        .unwrap();

        let plan = scan_plan(tmp.path(), &[]).unwrap();
        let units = seedgraph_scan::discover_units(&plan.patterns, &plan.options);
        let ids: Vec<&str> = units.iter().map(|u| u.identifier()).collect();
        assert_eq!(ids, vec!["App\\RoleSeeder"]);
    }

    #[test]
    fn explicit_paths_replace_configured_ones() {
        let tmp = tempfile::tempdir().unwrap();
        let plan = scan_plan(tmp.path(), &["custom".to_string()]).unwrap();
        assert_eq!(
            plan.patterns,
            vec![tmp.path().join("custom").to_string_lossy().into_owned()]
        );
        assert_eq!(plan.options.extensions, vec!["php".to_string()]);
    }
}
