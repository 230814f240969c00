mod args;
mod data;
mod network;
mod training;

use args::Args;
use clap::Parser;
use data::Dataset;
use log::LevelFilter;
use monitor::{ImprovementMonitor, MonitorConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;
use simplelog::{Config, SimpleLogger};
use std::{
    error::Error,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};
use training::Trainer;

fn main() -> Result<(), Box<dyn Error>> {
    let args = init()?;

    let stop_flag = Arc::new(AtomicBool::new(false));
    let stop_flag_handler = Arc::clone(&stop_flag);

    ctrlc::set_handler(move || {
        log::info!("Received SIGINT, stopping after the current epoch...");
        stop_flag_handler.store(true, Ordering::Relaxed);
    })?;

    let mut rng = StdRng::seed_from_u64(args.seed);
    let dataset = Dataset::synthetic(args.samples, args.noise, &mut rng);
    if dataset.is_empty() {
        return Err("No samples to train on".into());
    }
    let (train_idx, val_idx) = dataset.train_val_indices(args.val_ratio, &mut rng);
    log::info!(
        "Generated {} samples ({} train, {} validation)",
        dataset.len(),
        train_idx.len(),
        val_idx.len()
    );

    let mut monitor = ImprovementMonitor::new(MonitorConfig {
        patience: args.patience,
        verbose: args.verbose,
        skip_first_n: args.skip_first_n,
        checkpoint_dir: args.checkpoint_dir.clone(),
    })?;
    log::info!("{}", monitor);

    let mut trainer = Trainer::new(&args)?;
    let summary = trainer.train(&dataset, &train_idx, &val_idx, &mut monitor, &stop_flag)?;

    match summary.best_val_loss {
        Some(loss) => log::info!(
            "Best validation loss {:.6} saved to {}",
            loss,
            summary.checkpoint_path.display()
        ),
        None => log::warn!("No epoch was scored, no checkpoint written"),
    }
    log::info!(
        "Finished after {} epochs{}",
        summary.epochs_run,
        if summary.early_stopped {
            " (early stopped)"
        } else {
            ""
        }
    );

    Ok(())
}

fn init() -> Result<Args, Box<dyn Error>> {
    let args = Args::parse();

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    SimpleLogger::init(level, Config::default())?;

    Ok(args)
}
