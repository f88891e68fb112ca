//! Generation State
//!
//! The persisted snapshot of the session counters. Field names match the
//! state files written by earlier generator releases.
//!
//! A missing file starts from zero. This is only safe for a fresh binding
//! tree: if a previously populated invocation cache exists, restarting ids at
//! zero makes new wrappers alias old cache slots, hence the warning.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use gir_codegen::Counters;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::GenError;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenState {
    #[serde(rename = "PrevNamespace")]
    pub prev_namespace: String,
    #[serde(rename = "FuncNextId")]
    pub func_next_id: u32,
    #[serde(rename = "GetTypeNextId")]
    pub get_type_next_id: u32,
}

impl GenState {
    pub fn new(namespace: impl Into<String>, counters: Counters) -> Self {
        Self {
            prev_namespace: namespace.into(),
            func_next_id: counters.next_function_id,
            get_type_next_id: counters.next_type_id,
        }
    }

    /// Load the snapshot at `path`.
    ///
    /// A missing file yields the zero state. An unreadable or malformed file
    /// is an error.
    pub fn load(path: &Path) -> Result<Self, GenError> {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(
                    path = %path.display(),
                    "no generation state; function and type ids restart at 0"
                );
                return Ok(Self::default());
            }
            Err(e) => return Err(GenError::io(path, e)),
        };
        serde_json::from_str(&json).map_err(|e| GenError::json(path, e))
    }

    pub fn save(&self, path: &Path) -> Result<(), GenError> {
        let json = serde_json::to_string(self).map_err(GenError::Encode)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| GenError::io(parent, e))?;
        }
        fs::write(path, json).map_err(|e| GenError::io(path, e))
    }

    /// Counters to resume from. Resumption ignores which namespace ran last.
    pub fn counters(&self) -> Counters {
        Counters {
            next_function_id: self.func_next_id,
            next_type_id: self.get_type_next_id,
        }
    }

    /// Log when the previous run generated a different namespace.
    pub(crate) fn note_namespace(&self, namespace: &str) {
        if !self.prev_namespace.is_empty() && self.prev_namespace != namespace {
            warn!(
                previous = %self.prev_namespace,
                current = namespace,
                next_function_id = self.func_next_id,
                "namespace changed since last run; ids continue from the shared counters"
            );
        }
    }
}
