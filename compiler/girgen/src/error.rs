//! Driver errors.
//!
//! Only fatal conditions live here. Unmappable types degrade to placeholders
//! inside `gir_codegen` and blocked functions are ordinary skips, so neither
//! ever reaches this type.

use std::io;
use std::path::PathBuf;

use gir_ir::RepositoryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenError {
    #[error("cannot access `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed JSON in `{}`: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot serialize generation state: {0}")]
    Encode(#[source] serde_json::Error),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl GenError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }
}
