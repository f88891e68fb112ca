//! Namespace Dependency Resolver

use std::collections::BTreeSet;

use gir_ir::{split_namespace_id, Repository};
use rustc_hash::FxHashSet;
use tracing::trace;

use crate::error::GenError;

/// Every namespace reachable from `root` over immediate-dependency edges, as
/// `Name-Version` identifiers. The root itself is excluded.
///
/// Each versioned dependency is required from the repository before its own
/// edges are followed; a dependency that cannot be loaded is fatal.
/// Namespaces are visited once by name, so cycles and repeated edges terminate.
pub fn closure<R: Repository + ?Sized>(repo: &R, root: &str) -> Result<BTreeSet<String>, GenError> {
    let (root_name, _) = split_namespace_id(root);
    let mut visited: FxHashSet<String> = FxHashSet::default();
    visited.insert(root_name.to_string());

    let mut reachable = BTreeSet::new();
    let mut pending = repo.immediate_dependencies(root_name);
    pending.reverse();

    while let Some(dep) = pending.pop() {
        let (name, version) = split_namespace_id(&dep);
        if !visited.insert(name.to_string()) {
            continue;
        }
        if let Some(version) = version {
            repo.require(name, version)?;
        }
        trace!(root = root_name, dep = %dep, "dependency");

        let mut next = repo.immediate_dependencies(name);
        next.reverse();
        pending.extend(next);
        reachable.insert(dep);
    }
    Ok(reachable)
}
