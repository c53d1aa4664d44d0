use std::path::{Path, PathBuf};

use pmf_rs_blockstate::UnmappedPolicy;
use serde::Deserialize;

use crate::error::ConvertError;

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "pmf-convert.toml";

#[derive(Debug, Default, Deserialize)]
pub struct ConverterConfig {
    #[serde(default)]
    pub logging: LoggingSection,
    #[serde(default)]
    pub conversion: ConversionSection,
}

#[derive(Debug, Deserialize)]
pub struct LoggingSection {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ConversionSection {
    /// `"error"` aborts on a legacy pair with no mapping, `"air"` drops it.
    #[serde(default)]
    pub unmapped: UnmappedPolicy,
}

impl ConverterConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConvertError> {
        let path = path.as_ref();
        let config_err = |message: String| ConvertError::Config {
            path: path.to_path_buf(),
            message,
        };
        let contents = std::fs::read_to_string(path).map_err(|e| config_err(e.to_string()))?;
        toml::from_str(&contents).map_err(|e| config_err(e.to_string()))
    }

    /// Load `explicit` if given, else [`DEFAULT_CONFIG_FILE`] if present, else defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConvertError> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    Self::load(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_config() {
        let toml_str = r#"
            [logging]
            level = "debug"

            [conversion]
            unmapped = "air"
        "#;
        let config: ConverterConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.conversion.unmapped, UnmappedPolicy::Air);
    }

    #[test]
    fn defaults_when_empty() {
        let config: ConverterConfig = toml::from_str("").unwrap();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.conversion.unmapped, UnmappedPolicy::Error);
    }

    #[test]
    fn partial_sections() {
        let config: ConverterConfig = toml::from_str("[conversion]\n").unwrap();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.conversion.unmapped, UnmappedPolicy::Error);
    }

    #[test]
    fn unknown_policy_is_rejected() {
        assert!(toml::from_str::<ConverterConfig>("[conversion]\nunmapped = \"skip\"\n").is_err());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let path = std::env::temp_dir().join(format!("pmf_rs_cfg_{}.toml", rand::random::<u64>()));
        assert!(matches!(
            ConverterConfig::discover(Some(&path)),
            Err(ConvertError::Config { .. })
        ));
    }

    #[test]
    fn load_from_file() {
        let path = std::env::temp_dir().join(format!("pmf_rs_cfg_{}.toml", rand::random::<u64>()));
        std::fs::write(&path, "[conversion]\nunmapped = \"air\"\n").unwrap();
        let config = ConverterConfig::load(&path).unwrap();
        assert_eq!(config.conversion.unmapped, UnmappedPolicy::Air);
        std::fs::remove_file(&path).ok();
    }
}
