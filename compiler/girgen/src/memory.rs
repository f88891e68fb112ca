//! In-memory introspection repository, loaded from a JSON metadata dump.
//!
//! ```json
//! {"namespaces": [{"name": "Gtk", "version": "3.0", "dependencies": ["Gdk-3.0"], "types": [...]}]}
//! ```

use std::fs;
use std::path::Path;

use gir_ir::{NamespaceEntity, Repository, RepositoryError};
use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::error::GenError;

#[derive(Deserialize)]
struct Dump {
    #[serde(default)]
    namespaces: Vec<NamespaceEntity>,
}

#[derive(Clone, Debug, Default)]
pub struct MemoryRepository {
    namespaces: FxHashMap<String, NamespaceEntity>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let dump: Dump = serde_json::from_str(json)?;
        let mut repo = Self::new();
        for ns in dump.namespaces {
            repo.insert(ns);
        }
        Ok(repo)
    }

    pub fn load(path: &Path) -> Result<Self, GenError> {
        let json = fs::read_to_string(path).map_err(|e| GenError::io(path, e))?;
        Self::from_json(&json).map_err(|e| GenError::json(path, e))
    }

    /// Add (or replace) a namespace, filling in member containers.
    pub fn insert(&mut self, mut ns: NamespaceEntity) {
        ns.attach_containers();
        self.namespaces.insert(ns.name.clone(), ns);
    }
}

impl Repository for MemoryRepository {
    fn require(&self, namespace: &str, version: &str) -> Result<&NamespaceEntity, RepositoryError> {
        let ns = self
            .namespaces
            .get(namespace)
            .ok_or_else(|| RepositoryError::NotFound {
                namespace: namespace.to_string(),
            })?;
        if ns.version != version {
            return Err(RepositoryError::VersionMismatch {
                namespace: namespace.to_string(),
                requested: version.to_string(),
                available: ns.version.clone(),
            });
        }
        Ok(ns)
    }

    fn immediate_dependencies(&self, namespace: &str) -> Vec<String> {
        self.namespaces
            .get(namespace)
            .map(|ns| ns.dependencies.clone())
            .unwrap_or_default()
    }

    fn namespace(&self, name: &str) -> Option<&NamespaceEntity> {
        self.namespaces.get(name)
    }
}
