use candle_core::{Result as CandleResult, Tensor};
use candle_nn::VarMap;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::PersistenceError;

pub const CHECKPOINT_STEM: &str = "checkpoint";
pub const CHECKPOINT_EXTENSION: &str = "safetensors";

/// Named tensors making up a model's trainable state.
pub type Snapshot = HashMap<String, Tensor>;

/// A model the monitor can checkpoint.
pub trait Checkpointable {
    /// Prefix for the checkpoint file. Unnamed models share the bare file name.
    fn model_name(&self) -> Option<&str> {
        None
    }

    fn snapshot(&self) -> CandleResult<Snapshot>;
}

impl Checkpointable for VarMap {
    fn snapshot(&self) -> CandleResult<Snapshot> {
        let data = self
            .data()
            .lock()
            .map_err(|e| candle_core::Error::Msg(format!("VarMap lock poisoned: {}", e)))?;

        Ok(data
            .iter()
            .map(|(name, var)| (name.clone(), var.as_tensor().clone()))
            .collect())
    }
}

impl<M: Checkpointable + ?Sized> Checkpointable for &M {
    fn model_name(&self) -> Option<&str> {
        (**self).model_name()
    }

    fn snapshot(&self) -> CandleResult<Snapshot> {
        (**self).snapshot()
    }
}

/// Attaches a name to a model handle that has none of its own.
pub struct Named<M> {
    name: String,
    model: M,
}

impl<M> Named<M> {
    pub fn new(name: impl Into<String>, model: M) -> Self {
        Self {
            name: name.into(),
            model,
        }
    }
}

impl<M: Checkpointable> Checkpointable for Named<M> {
    fn model_name(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn snapshot(&self) -> CandleResult<Snapshot> {
        self.model.snapshot()
    }
}

pub fn file_name(model_name: &str) -> String {
    format!("{}{}.{}", model_name, CHECKPOINT_STEM, CHECKPOINT_EXTENSION)
}

pub fn path<M: Checkpointable + ?Sized>(dir: &Path, model: &M) -> PathBuf {
    dir.join(file_name(model.model_name().unwrap_or("")))
}

/// Durable storage for checkpoints. A save replaces whatever is stored at `path`.
pub trait CheckpointStore {
    fn save(&self, path: &Path, snapshot: &Snapshot) -> Result<(), PersistenceError>;
}

/// Writes checkpoints as safetensors files.
#[derive(Debug, Default, Clone, Copy)]
pub struct SafetensorsStore;

impl CheckpointStore for SafetensorsStore {
    fn save(&self, path: &Path, snapshot: &Snapshot) -> Result<(), PersistenceError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| PersistenceError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        candle_core::safetensors::save(snapshot, path).map_err(|source| PersistenceError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}
