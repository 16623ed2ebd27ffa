//! Run metadata sidecar.
//!
//! Written next to the log at run start so a finished run directory is
//! self-describing. The report derives everything it needs from the log
//! itself; the manifest is descriptive metadata only.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to write manifest {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read manifest {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to encode manifest: {0}")]
    Encode(serde_json::Error),

    #[error("failed to decode manifest {path}: {source}")]
    Decode {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Metadata for one tracking run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunManifest {
    pub symbols: Vec<String>,
    pub interval_secs: u64,
    pub started_at: NaiveDateTime,
    pub log_file: String,
}

impl RunManifest {
    pub fn save(&self, path: &Path) -> Result<(), ManifestError> {
        let json = serde_json::to_string_pretty(self).map_err(ManifestError::Encode)?;
        std::fs::write(path, json).map_err(|e| ManifestError::Write {
            path: path.to_path_buf(),
            source: e,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let content = std::fs::read_to_string(path).map_err(|e| ManifestError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(|e| ManifestError::Decode {
            path: path.to_path_buf(),
            source: e,
        })
    }
}
