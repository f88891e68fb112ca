//! Run Configuration
//!
//! ```json
//! {"black": ["Gtk.Widget.path"], "cIncludes": ["gtk/gtk.h"], "symbolNames": {"g_object_ref": "Ref0"}}
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use gir_codegen::Policy;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::GenError;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Qualified identifiers (`Container.name` or bare names) to skip.
    pub black: Vec<String>,
    /// C headers for the generated file's cgo preamble.
    #[serde(rename = "cIncludes")]
    pub c_includes: Vec<String>,
    /// Linkage symbol to display name overrides.
    #[serde(rename = "symbolNames")]
    pub symbol_names: BTreeMap<String, String>,
}

impl Config {
    /// Read a configuration file. A missing file is the empty configuration.
    pub fn load(path: &Path) -> Result<Self, GenError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no configuration file");
                return Ok(Self::default());
            }
            Err(e) => return Err(GenError::io(path, e)),
        };
        serde_json::from_str(&text).map_err(|e| GenError::json(path, e))
    }

    pub fn save(&self, path: &Path) -> Result<(), GenError> {
        let json = serde_json::to_string_pretty(self).map_err(GenError::Encode)?;
        fs::write(path, json).map_err(|e| GenError::io(path, e))
    }

    /// The immutable block list and rename table for a run.
    pub fn policy(&self) -> Policy {
        Policy::new(
            self.black.iter().cloned(),
            self.symbol_names
                .iter()
                .map(|(symbol, name)| (symbol.clone(), name.clone())),
        )
    }
}
