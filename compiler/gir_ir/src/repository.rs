//! Introspection Repository
//!
//! The generator never parses metadata itself. A [`Repository`] hands out fully
//! materialized namespaces, with directions, ownership and array-length links
//! already resolved.

use thiserror::Error;

use crate::namespace::NamespaceEntity;

/// Failure to load a namespace.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("namespace `{namespace}` not found")]
    NotFound { namespace: String },

    #[error("namespace `{namespace}` version `{requested}` requested, `{available}` available")]
    VersionMismatch {
        namespace: String,
        requested: String,
        available: String,
    },
}

/// Source of namespace metadata.
pub trait Repository {
    /// Load `namespace` at `version`, failing if that exact version is unavailable.
    fn require(&self, namespace: &str, version: &str) -> Result<&NamespaceEntity, RepositoryError>;

    /// Immediate dependencies of a loaded namespace as `Name-Version` identifiers.
    ///
    /// Unknown namespaces have no dependencies.
    fn immediate_dependencies(&self, namespace: &str) -> Vec<String>;

    /// Look up a namespace by bare name.
    fn namespace(&self, name: &str) -> Option<&NamespaceEntity>;
}
