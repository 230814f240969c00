use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "Regression Trainer")]
#[command(author = "Jørgen Hanssen <jorgen@hanssen.io>")]
#[command(version = "0.1.0")]
pub struct Args {
    /// Number of samples per training batch.
    #[arg(long, default_value_t = 64)]
    pub batch_size: usize,

    /// Learning rate for the optimizer.
    #[arg(long, default_value_t = 0.01)]
    pub learning_rate: f64,

    /// Maximum number of training epochs.
    #[arg(long, default_value_t = 100)]
    pub epochs: usize,

    /// Number of synthetic samples to generate.
    #[arg(long, default_value_t = 4096)]
    pub samples: usize,

    /// Fraction of data for validation set.
    #[arg(long, default_value_t = 0.1)]
    pub val_ratio: f64,

    /// Amplitude of uniform noise added to targets.
    #[arg(long, default_value_t = 0.1)]
    pub noise: f32,

    /// Seed for data generation and shuffling.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Epochs without improvement before early stopping.
    #[arg(long, default_value_t = 7)]
    pub patience: u64,

    /// Epochs to run before early stopping starts tracking.
    #[arg(long, default_value_t = 0)]
    pub skip_first_n: u64,

    /// Log checkpoint and warm-up diagnostics.
    #[arg(long)]
    pub verbose: bool,

    /// Prefix for the checkpoint file name.
    #[arg(long, default_value = "")]
    pub model_name: String,

    /// Directory the best checkpoint is written to.
    #[arg(long, default_value = ".")]
    pub checkpoint_dir: PathBuf,
}
