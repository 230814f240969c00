use std::fmt::Display;
use std::str::FromStr;

use crate::error::ConfigurationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionType {
    Spin { min: i64, max: i64 },
    Check,
    Path,
}

impl OptionType {
    pub fn validate(&self, value: &str) -> Result<(), String> {
        match self {
            OptionType::Spin { min, max } => {
                let parsed = value
                    .trim()
                    .parse::<i64>()
                    .map_err(|e| format!("Invalid integer: {}", e))?;
                if parsed < *min || parsed > *max {
                    return Err(format!("Value {} out of range [{}, {}]", parsed, min, max));
                }
                Ok(())
            }
            OptionType::Check => match value.trim() {
                "true" | "false" => Ok(()),
                _ => Err("Boolean value must be 'true' or 'false'".to_string()),
            },
            OptionType::Path => Ok(()),
        }
    }
}

/// Validates `value` against `option_type` and parses it into the option's field type.
pub fn parse_option<T>(name: &str, value: &str, option_type: OptionType) -> Result<T, ConfigurationError>
where
    T: FromStr,
    T::Err: Display,
{
    let invalid = |reason: String| ConfigurationError::InvalidValue {
        name: name.to_string(),
        value: value.to_string(),
        reason,
    };

    option_type.validate(value).map_err(invalid)?;

    let raw = match option_type {
        OptionType::Path => value,
        _ => value.trim(),
    };
    raw.parse::<T>()
        .map_err(|e| invalid(format!("Parse error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_spin_range() {
        let spin = OptionType::Spin { min: 1, max: 10 };
        assert!(spin.validate("1").is_ok());
        assert!(spin.validate("10").is_ok());
        assert!(spin.validate("0").is_err());
        assert!(spin.validate("11").is_err());
        assert!(spin.validate("seven").is_err());
    }

    #[test]
    fn test_check_values() {
        assert!(OptionType::Check.validate("true").is_ok());
        assert!(OptionType::Check.validate("false").is_ok());
        assert!(OptionType::Check.validate("yes").is_err());
    }

    #[test]
    fn test_parse_option_reports_name_and_value() {
        let err = parse_option::<u64>("patience", "-3", OptionType::Spin { min: 1, max: 100 })
            .unwrap_err();
        let ConfigurationError::InvalidValue { name, value, .. } = err else {
            panic!("Expected InvalidValue")
        };
        assert_eq!(name, "patience");
        assert_eq!(value, "-3");
    }

    #[test]
    fn test_parse_path_keeps_whitespace() {
        let path: PathBuf = parse_option("checkpoint_dir", " runs/a", OptionType::Path).unwrap();
        assert_eq!(path, PathBuf::from(" runs/a"));
    }
}
