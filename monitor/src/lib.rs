pub mod checkpoint;
pub mod config;
pub mod error;
pub mod monitor;
mod options;

pub use checkpoint::{CheckpointStore, Checkpointable, Named, SafetensorsStore, Snapshot};
pub use config::MonitorConfig;
pub use error::{ConfigurationError, MonitorError, PersistenceError};
pub use monitor::{ImprovementMonitor, Outcome};
pub use options::OptionType;
