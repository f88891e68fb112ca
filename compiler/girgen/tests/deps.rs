//! Dependency closure over in-memory repositories.

use std::collections::BTreeSet;

use gir_ir::{NamespaceEntity, RepositoryError};
use girgen::{closure, GenError, MemoryRepository};
use pretty_assertions::assert_eq;

fn namespace(name: &str, deps: &[&str]) -> NamespaceEntity {
    let mut ns = NamespaceEntity::new(name, "1.0");
    ns.dependencies = deps.iter().map(|d| (*d).to_string()).collect();
    ns
}

fn repo(namespaces: Vec<NamespaceEntity>) -> MemoryRepository {
    let mut repo = MemoryRepository::new();
    for ns in namespaces {
        repo.insert(ns);
    }
    repo
}

fn set(ids: &[&str]) -> BTreeSet<String> {
    ids.iter().map(|id| (*id).to_string()).collect()
}

#[test]
fn transitive_chain() {
    let repo = repo(vec![
        namespace("A", &["B-1.0"]),
        namespace("B", &["C-1.0"]),
        namespace("C", &[]),
    ]);
    let deps = closure(&repo, "A-1.0").unwrap_or_else(|e| panic!("closure failed: {e}"));
    assert_eq!(deps, set(&["B-1.0", "C-1.0"]));
}

#[test]
fn cycle_terminates_without_root() {
    let repo = repo(vec![namespace("A", &["B-1.0"]), namespace("B", &["A-1.0"])]);
    let deps = closure(&repo, "A-1.0").unwrap_or_else(|e| panic!("closure failed: {e}"));
    assert_eq!(deps, set(&["B-1.0"]));
}

#[test]
fn duplicate_and_self_edges_collapse() {
    let repo = repo(vec![
        namespace("A", &["A-1.0", "B-1.0", "C-1.0"]),
        namespace("B", &["C-1.0", "B-1.0"]),
        namespace("C", &["B-1.0"]),
    ]);
    let deps = closure(&repo, "A").unwrap_or_else(|e| panic!("closure failed: {e}"));
    assert_eq!(deps, set(&["B-1.0", "C-1.0"]));
}

#[test]
fn missing_dependency_is_fatal() {
    let repo = repo(vec![namespace("A", &["B-1.0"]), namespace("B", &["Z-2.0"])]);
    let err = closure(&repo, "A-1.0")
        .err()
        .unwrap_or_else(|| panic!("missing namespace resolved"));
    assert!(matches!(
        err,
        GenError::Repository(RepositoryError::NotFound { ref namespace }) if namespace == "Z"
    ));
}

#[test]
fn wrong_version_is_fatal() {
    let repo = repo(vec![namespace("A", &["B-2.0"]), namespace("B", &[])]);
    let err = closure(&repo, "A-1.0")
        .err()
        .unwrap_or_else(|| panic!("version mismatch resolved"));
    assert_eq!(
        err.to_string(),
        "namespace `B` version `2.0` requested, `1.0` available"
    );
}
