use candle_core::utils::{cuda_is_available, metal_is_available};
use candle_core::{DType, Device, Result as CandleResult, Tensor};
use candle_nn::loss::mse;
use candle_nn::{AdamW, Module, Optimizer, ParamsAdamW, VarBuilder, VarMap};
use monitor::{ImprovementMonitor, MonitorError, Named};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::error::Error;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::args::Args;
use crate::data::Dataset;
use crate::network::Network;
use crate::training::evaluation::evaluate;
use crate::training::progress::{monitor_status, EpochProgress};

/// How a training run ended.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSummary {
    pub epochs_run: usize,
    pub early_stopped: bool,
    pub best_val_loss: Option<f32>,
    pub checkpoint_path: PathBuf,
}

pub struct Trainer {
    network: Network,
    optimizer: AdamW,
    varmap: VarMap,
    device: Device,
    batch_size: usize,
    epochs: usize,
    model_name: String,
    rng: StdRng,
}

impl Trainer {
    pub fn new(args: &Args) -> Result<Self, Box<dyn Error>> {
        let device = select_device()?;
        log::info!("Using device: {:?}", device);

        let varmap = VarMap::new();
        let vs = VarBuilder::from_varmap(&varmap, DType::F32, &device);
        let network = Network::new(&vs)?;
        let optimizer = AdamW::new(
            varmap.all_vars(),
            ParamsAdamW {
                lr: args.learning_rate,
                ..Default::default()
            },
        )?;

        Ok(Self {
            network,
            optimizer,
            varmap,
            device,
            batch_size: args.batch_size,
            epochs: args.epochs,
            model_name: args.model_name.clone(),
            // Offset so shuffling does not replay the data generator's stream.
            rng: StdRng::seed_from_u64(args.seed.wrapping_add(1)),
        })
    }

    pub fn train(
        &mut self,
        dataset: &Dataset,
        train_idx: &[usize],
        val_idx: &[usize],
        monitor: &mut ImprovementMonitor,
        stop_flag: &AtomicBool,
    ) -> Result<TrainingSummary, Box<dyn Error>> {
        let mut train_idx = train_idx.to_vec();
        let mut epochs_run = 0;

        for epoch in 1..=self.epochs {
            if stop_flag.load(Ordering::Relaxed) {
                log::info!("Interrupted, stopping after {} epochs", epochs_run);
                break;
            }

            train_idx.shuffle(&mut self.rng);
            let num_batches = train_idx.len().div_ceil(self.batch_size.max(1));
            let progress = EpochProgress::new(epoch, num_batches)?;
            let (train_loss, val_loss) =
                self.train_epoch(&progress, dataset, &train_idx, val_idx)?;
            epochs_run = epoch;

            let handle = Named::new(self.model_name.as_str(), &self.varmap);
            let outcome = match monitor.evaluate(val_loss, &handle) {
                Ok(outcome) => Some(outcome),
                Err(MonitorError::Persistence(e)) => {
                    log::warn!(
                        "Checkpoint {} not saved, continuing: {}",
                        e.path().display(),
                        e
                    );
                    None
                }
                Err(e) => return Err(e.into()),
            };
            progress.finish(train_loss, val_loss, &monitor_status(outcome, monitor.patience()));

            if monitor.should_stop() {
                log::info!("Early stopping after {} epochs", epoch);
                break;
            }
        }

        let handle = Named::new(self.model_name.as_str(), &self.varmap);
        Ok(TrainingSummary {
            epochs_run,
            early_stopped: monitor.should_stop(),
            best_val_loss: monitor.best_score().map(|score| -score),
            checkpoint_path: monitor.checkpoint_path(&handle),
        })
    }

    /// Returns `(train_loss, val_loss)`. Without a validation split the train loss stands in.
    fn train_epoch(
        &mut self,
        progress: &EpochProgress,
        dataset: &Dataset,
        train_idx: &[usize],
        val_idx: &[usize],
    ) -> CandleResult<(f32, f32)> {
        let mut batches_processed = 0;
        let mut total_loss = 0.0;
        let mut train_loss = 0.0;

        for batch in dataset.batches(train_idx, self.batch_size, &self.device) {
            let (x, y): (Tensor, Tensor) = batch?;

            let preds = self.network.forward(&x)?;
            let loss = mse(&preds, &y)?;

            self.optimizer.backward_step(&loss)?;

            total_loss += loss.to_vec0::<f32>()?;
            batches_processed += 1;

            train_loss = total_loss / batches_processed as f32;
            progress.batch_done(train_loss);
        }

        let val_loss = if val_idx.is_empty() {
            train_loss
        } else {
            evaluate(&self.network, dataset, val_idx, self.batch_size, &self.device)?
        };

        Ok((train_loss, val_loss))
    }
}

fn select_device() -> CandleResult<Device> {
    if cuda_is_available() {
        Device::new_cuda(0)
    } else if metal_is_available() {
        Device::new_metal(0)
    } else {
        Ok(Device::Cpu)
    }
}
