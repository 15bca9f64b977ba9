use std::collections::HashMap;

use seedgraph_core::registry::{Registry, Seeder};
use seedgraph_core::unit::SeedUnit;
use seedgraph_resolver::{resolve, validate_units, ResolveError, ValidationError};

fn unit(id: &str, deps: &[&str]) -> SeedUnit {
    SeedUnit::new(id, deps.iter().copied())
}

fn ids(units: &[SeedUnit]) -> Vec<&str> {
    units.iter().map(|u| u.identifier()).collect()
}

/// Every dependency of every unit appears strictly earlier.
fn assert_respects_dependencies(order: &[SeedUnit]) {
    let position: HashMap<&str, usize> = order
        .iter()
        .enumerate()
        .map(|(i, u)| (u.identifier(), i))
        .collect();
    for (i, unit) in order.iter().enumerate() {
        for dep in unit.depends_on() {
            let p = position[dep.as_str()];
            assert!(p < i, "{dep} must come before {}", unit.identifier());
        }
    }
}

#[test]
fn linear_chain() {
    let order = resolve(&[unit("A", &[]), unit("B", &["A"]), unit("C", &["B"])]).unwrap();
    assert_eq!(ids(&order), vec!["A", "B", "C"]);
}

#[test]
fn two_node_cycle_mentions_both() {
    let err = resolve(&[unit("X", &["Y"]), unit("Y", &["X"])]).unwrap_err();
    assert!(matches!(err, ResolveError::CircularDependency { .. }));
    let message = err.to_string();
    assert!(message.contains('X') && message.contains('Y'), "got: {message}");
}

#[test]
fn self_reference_is_a_cycle() {
    let err = resolve(&[unit("S", &["S"])]).unwrap_err();
    assert_eq!(
        err,
        ResolveError::CircularDependency {
            cycle: vec!["S".into(), "S".into()]
        }
    );
    assert_eq!(validate_units(&[unit("S", &["S"])]).len(), 1);
}

#[test]
fn missing_dependency_mentions_both() {
    let err = resolve(&[unit("Z", &["Missing"])]).unwrap_err();
    assert_eq!(
        err,
        ResolveError::MissingDependency {
            unit: "Z".into(),
            missing: "Missing".into()
        }
    );
    let message = err.to_string();
    assert!(message.contains("'Z'") && message.contains("'Missing'"));
}

#[test]
fn diamond_emits_shared_dependency_once() {
    let order = resolve(&[
        unit("A", &[]),
        unit("B", &["A"]),
        unit("C", &["A"]),
        unit("D", &["B", "C"]),
    ])
    .unwrap();
    assert_eq!(ids(&order), vec!["A", "B", "C", "D"]);
    assert_eq!(ids(&order).iter().filter(|id| **id == "A").count(), 1);
}

#[test]
fn diamond_discovered_from_the_top() {
    let order = resolve(&[
        unit("D", &["B", "C"]),
        unit("C", &["A"]),
        unit("B", &["A"]),
        unit("A", &[]),
    ])
    .unwrap();
    assert_eq!(ids(&order), vec!["A", "B", "C", "D"]);
}

#[test]
fn duplicated_units_collapse() {
    let order = resolve(&[unit("A", &[]), unit("B", &["A"]), unit("A", &[]), unit("B", &["A"])]).unwrap();
    assert_eq!(ids(&order), vec!["A", "B"]);
}

#[test]
fn result_length_equals_distinct_units() {
    let units: Vec<SeedUnit> = (0..50)
        .map(|i| {
            let deps: Vec<String> = (0..i).filter(|j| i % (j + 2) == 0).map(|j| format!("N{j}")).collect();
            SeedUnit::new(format!("N{i}"), deps)
        })
        .collect();
    let order = resolve(&units).unwrap();
    assert_eq!(order.len(), units.len());
    assert_respects_dependencies(&order);
}

#[test]
fn generated_dags_respect_every_edge() {
    // Deterministic pseudo-random DAGs: edges only point to lower indices,
    // units are shuffled before resolution.
    let mut seed: u64 = 0x5eed;
    let mut next = move || {
        seed ^= seed << 13;
        seed ^= seed >> 7;
        seed ^= seed << 17;
        seed
    };
    for _ in 0..25 {
        let n = (next() % 30 + 1) as usize;
        let mut units: Vec<SeedUnit> = (0..n)
            .map(|i| {
                let deps: Vec<String> = (0..i)
                    .filter(|_| next() % 4 == 0)
                    .map(|j| format!("U{j}"))
                    .collect();
                SeedUnit::new(format!("U{i}"), deps)
            })
            .collect();
        for i in (1..units.len()).rev() {
            let j = (next() % (i as u64 + 1)) as usize;
            units.swap(i, j);
        }
        let order = resolve(&units).unwrap();
        assert_eq!(order.len(), n);
        assert_respects_dependencies(&order);
        assert!(validate_units(&units).is_empty());
    }
}

#[test]
fn adding_independent_unit_preserves_relative_order() {
    let before = vec![unit("C", &["A"]), unit("A", &[]), unit("B", &["A"])];
    let first = resolve(&before).unwrap();

    let mut after = before.clone();
    after.insert(1, unit("N", &[]));
    let second = resolve(&after).unwrap();

    let kept: Vec<&str> = ids(&second).into_iter().filter(|id| *id != "N").collect();
    assert_eq!(kept, ids(&first));
    assert_eq!(second.len(), first.len() + 1);
}

#[test]
fn order_is_stable_across_runs() {
    let units = [unit("B", &["A"]), unit("A", &[]), unit("C", &[]), unit("D", &["C", "B"])];
    let first = resolve(&units).unwrap();
    for _ in 0..5 {
        assert_eq!(resolve(&units).unwrap(), first);
    }
}

#[test]
fn validate_reports_without_failing() {
    let units = [unit("X", &["Y"]), unit("Y", &["X"]), unit("Z", &["Missing"])];
    let errors = validate_units(&units);
    assert_eq!(errors.len(), 2);
    assert!(matches!(errors[0], ValidationError::CircularDependency { .. }));
    assert!(matches!(errors[1], ValidationError::MissingDependency { .. }));
}

struct RoleSeeder;
impl Seeder for RoleSeeder {
    const IDENTIFIER: &'static str = "App\\Seeders\\RoleSeeder";
}

struct UserSeeder;
impl Seeder for UserSeeder {
    const IDENTIFIER: &'static str = "App\\Seeders\\UserSeeder";
    fn depends_on() -> &'static [&'static str] {
        &["App\\Seeders\\RoleSeeder"]
    }
}

#[test]
fn registered_seeders_resolve() {
    let mut registry = Registry::new();
    registry.register::<UserSeeder>().register::<RoleSeeder>();
    let order = resolve(registry.units()).unwrap();
    assert_eq!(
        ids(&order),
        vec!["App\\Seeders\\RoleSeeder", "App\\Seeders\\UserSeeder"]
    );
}
