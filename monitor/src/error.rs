use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Rejected monitor configuration. Raised at construction, before any epoch runs.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Unknown option: {0}")]
    UnknownOption(String),

    #[error("Invalid value {value:?} for option {name}: {reason}")]
    InvalidValue {
        name: String,
        value: String,
        reason: String,
    },
}

/// Writing a checkpoint failed. Never retried by the monitor.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to create checkpoint directory {}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write checkpoint {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: candle_core::Error,
    },
}

impl PersistenceError {
    pub fn path(&self) -> &Path {
        match self {
            PersistenceError::CreateDir { path, .. } | PersistenceError::Write { path, .. } => path,
        }
    }
}

#[derive(Debug, Error)]
pub enum MonitorError {
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// The model handle could not produce its state snapshot.
    #[error(transparent)]
    Snapshot(#[from] candle_core::Error),
}
