use std::fmt;
use std::path::{Path, PathBuf};

use crate::checkpoint::{self, CheckpointStore, Checkpointable, SafetensorsStore};
use crate::config::MonitorConfig;
use crate::error::{ConfigurationError, MonitorError};

/// What a single `evaluate` call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Inside the warm-up window; nothing was scored.
    Skipped,
    /// New best (or tie). A checkpoint was written.
    Improved,
    /// Worse than the best so far. `counter` is the current run of such epochs.
    NoImprovement { counter: u64 },
}

/// Watches a lower-is-better validation metric, checkpoints the best model
/// and raises a stop flag once `patience` epochs pass without improvement.
///
/// Call `evaluate` once per epoch and poll `should_stop` afterwards.
/// Ties with the best score count as improvement.
#[derive(Debug)]
pub struct ImprovementMonitor<S = SafetensorsStore> {
    patience: u64,
    verbose: bool,
    skip_first_n: u64,
    checkpoint_dir: PathBuf,
    store: S,

    call_count: u64,
    counter: u64,
    best_score: Option<f32>,
    min_observed_loss: f32,
    stopped: bool,
}

impl ImprovementMonitor<SafetensorsStore> {
    pub fn new(config: MonitorConfig) -> Result<Self, ConfigurationError> {
        Self::with_store(config, SafetensorsStore)
    }

    /// Shorthand for `MonitorConfig::from_options` followed by `new`.
    pub fn from_options<I, K, V>(options: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        Self::new(MonitorConfig::from_options(options)?)
    }
}

impl<S: CheckpointStore> ImprovementMonitor<S> {
    pub fn with_store(config: MonitorConfig, store: S) -> Result<Self, ConfigurationError> {
        config.validate()?;

        Ok(Self {
            patience: config.patience,
            verbose: config.verbose,
            skip_first_n: config.skip_first_n,
            checkpoint_dir: config.checkpoint_dir,
            store,
            call_count: 0,
            counter: 0,
            best_score: None,
            min_observed_loss: f32::INFINITY,
            stopped: false,
        })
    }

    /// Records one epoch's metric (lower is better).
    ///
    /// An improving epoch updates the best score and resets the counter before
    /// the checkpoint is written, so a failed save (returned as an error) does
    /// not stall early stopping. Only `min_observed_loss` waits for a
    /// successful write. The caller decides whether the run continues.
    pub fn evaluate<M>(&mut self, metric_value: f32, model: &M) -> Result<Outcome, MonitorError>
    where
        M: Checkpointable + ?Sized,
    {
        if self.call_count < self.skip_first_n {
            self.call_count += 1;
            if self.verbose {
                log::info!(
                    "Skipping the check for early stopping ({}/{})",
                    self.call_count,
                    self.skip_first_n
                );
            }
            return Ok(Outcome::Skipped);
        }

        let score = -metric_value;
        let improved = match self.best_score {
            _ if score.is_nan() => false,
            None => true,
            Some(best) => score >= best,
        };

        if improved {
            self.best_score = Some(score);
            self.counter = 0;
            self.save_checkpoint(metric_value, model)?;
            return Ok(Outcome::Improved);
        }

        self.counter += 1;
        log::info!(
            "EarlyStopping counter: {} out of {}",
            self.counter,
            self.patience
        );
        if self.counter >= self.patience {
            self.stopped = true;
        }

        Ok(Outcome::NoImprovement {
            counter: self.counter,
        })
    }

    fn save_checkpoint<M>(&mut self, metric_value: f32, model: &M) -> Result<(), MonitorError>
    where
        M: Checkpointable + ?Sized,
    {
        let path = self.checkpoint_path(model);
        let snapshot = model.snapshot()?;
        self.store.save(&path, &snapshot)?;

        if self.verbose {
            log::info!(
                "Validation loss decreased ({:.6} --> {:.6}). Saved model to {}",
                self.min_observed_loss,
                metric_value,
                path.display()
            );
        }
        self.min_observed_loss = metric_value;
        Ok(())
    }

    pub fn should_stop(&self) -> bool {
        self.stopped
    }

    pub fn counter(&self) -> u64 {
        self.counter
    }

    /// Best score seen so far, as negated loss.
    pub fn best_score(&self) -> Option<f32> {
        self.best_score
    }

    /// Loss at the last saved checkpoint, `INFINITY` before the first save.
    pub fn min_observed_loss(&self) -> f32 {
        self.min_observed_loss
    }

    pub fn patience(&self) -> u64 {
        self.patience
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn checkpoint_dir(&self) -> &Path {
        &self.checkpoint_dir
    }

    pub fn checkpoint_path<M>(&self, model: &M) -> PathBuf
    where
        M: Checkpointable + ?Sized,
    {
        checkpoint::path(&self.checkpoint_dir, model)
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S> fmt::Display for ImprovementMonitor<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ImprovementMonitor: patience={}, verbose={}",
            self.patience, self.verbose
        )
    }
}
