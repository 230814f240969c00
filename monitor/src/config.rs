use std::path::PathBuf;

use crate::error::ConfigurationError;
use crate::options::{parse_option, OptionType};

pub const DEFAULT_PATIENCE: u64 = 7;

macro_rules! define_config {
    ($(($field:ident: $type:ty, $name:literal, $option_type:expr, $default:expr)),* $(,)?) => {
        /// Monitor settings. Fields can be set directly or through named options.
        #[derive(Debug, Clone, PartialEq)]
        pub struct MonitorConfig {
            $(pub $field: $type,)*
        }

        impl Default for MonitorConfig {
            fn default() -> Self {
                Self {
                    $($field: $default,)*
                }
            }
        }

        impl MonitorConfig {
            /// Every option name `set_option` accepts.
            pub const OPTION_NAMES: &'static [&'static str] = &[$($name),*];

            pub fn set_option(&mut self, name: &str, value: &str) -> Result<(), ConfigurationError> {
                match name {
                    $($name => {
                        self.$field = parse_option::<$type>(name, value, $option_type)?;
                        Ok(())
                    })*
                    _ => Err(ConfigurationError::UnknownOption(name.to_string())),
                }
            }
        }
    };
}

define_config!(
    // Consecutive non-improving epochs tolerated before stopping
    (patience: u64, "patience", OptionType::Spin { min: 1, max: i64::MAX }, DEFAULT_PATIENCE),
    // Log skip and checkpoint diagnostics
    (verbose: bool, "verbose", OptionType::Check, false),
    // Leading evaluate calls ignored while the model warms up
    (skip_first_n: u64, "skip_first_n", OptionType::Spin { min: 0, max: i64::MAX }, 0),
    // Empty path resolves to the working directory
    (checkpoint_dir: PathBuf, "checkpoint_dir", OptionType::Path, PathBuf::new()),
);

impl MonitorConfig {
    /// Builds a config from `(name, value)` pairs on top of the defaults.
    /// The first unknown name or bad value aborts construction.
    pub fn from_options<I, K, V>(options: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = Self::default();
        for (name, value) in options {
            config.set_option(name.as_ref(), value.as_ref())?;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.patience == 0 {
            return Err(ConfigurationError::InvalidValue {
                name: "patience".to_string(),
                value: self.patience.to_string(),
                reason: "Patience must be a positive integer".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MonitorConfig::default();
        assert_eq!(config.patience, 7);
        assert!(!config.verbose);
        assert_eq!(config.skip_first_n, 0);
        assert_eq!(config.checkpoint_dir, PathBuf::new());
    }

    #[test]
    fn test_from_options() {
        let config = MonitorConfig::from_options([
            ("patience", "3"),
            ("verbose", "true"),
            ("skip_first_n", "2"),
            ("checkpoint_dir", "runs/best"),
        ])
        .unwrap();

        assert_eq!(config.patience, 3);
        assert!(config.verbose);
        assert_eq!(config.skip_first_n, 2);
        assert_eq!(config.checkpoint_dir, PathBuf::from("runs/best"));
    }

    #[test]
    fn test_unknown_option_rejected() {
        let err = MonitorConfig::from_options([("patience", "3"), ("min_delta", "0.01")])
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::UnknownOption(ref name) if name == "min_delta"));
    }

    #[test]
    fn test_zero_patience_rejected() {
        let err = MonitorConfig::from_options([("patience", "0")]).unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidValue { .. }));

        let config = MonitorConfig {
            patience: 0,
            ..MonitorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_negative_skip_rejected() {
        assert!(MonitorConfig::from_options([("skip_first_n", "-1")]).is_err());
    }

    #[test]
    fn test_option_names() {
        assert_eq!(
            MonitorConfig::OPTION_NAMES,
            &["patience", "verbose", "skip_first_n", "checkpoint_dir"]
        );
    }
}
