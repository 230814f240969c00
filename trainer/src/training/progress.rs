use indicatif::{ProgressBar, ProgressStyle};
use monitor::Outcome;

/// One bar per epoch. Ends with the validation loss and what the monitor made of it.
pub struct EpochProgress {
    bar: ProgressBar,
}

impl EpochProgress {
    pub fn new(epoch: usize, num_batches: usize) -> Result<Self, Box<dyn std::error::Error>> {
        let bar = ProgressBar::new(num_batches as u64).with_prefix(format!("epoch {:>3}", epoch));
        bar.set_style(
            ProgressStyle::with_template("{prefix:.bold} [{bar:40.green/white}] {pos}/{len} {msg}")?
                .progress_chars("=> "),
        );
        Ok(Self { bar })
    }

    pub fn batch_done(&self, running_loss: f32) {
        self.bar.set_message(format!("train {:.5}", running_loss));
        self.bar.inc(1);
    }

    pub fn finish(&self, train_loss: f32, val_loss: f32, status: &str) {
        self.bar.finish_with_message(format!(
            "train {:.5} | val {:.5} | {}",
            train_loss, val_loss, status
        ));
    }
}

/// Short label for the bar. `None` means the epoch improved but the checkpoint write failed.
pub fn monitor_status(outcome: Option<Outcome>, patience: u64) -> String {
    match outcome {
        Some(Outcome::Skipped) => "warm-up".to_string(),
        Some(Outcome::Improved) => "best, saved".to_string(),
        Some(Outcome::NoImprovement { counter }) => format!("patience {}/{}", counter, patience),
        None => "best, not saved".to_string(),
    }
}
