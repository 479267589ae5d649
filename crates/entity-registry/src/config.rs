//! Configuration loading for the registry.
//!
//! All registry settings are loaded from a TOML configuration file. Every
//! section is optional and falls back to its defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ConfigError, TomlSerializeError};
use crate::probability::MAX_WEIGHT;

/// Complete registry configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Discovery settings
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    /// Weighted index settings
    #[serde(default)]
    pub sampling: SamplingConfig,
    /// Origin labelling settings
    #[serde(default)]
    pub origins: OriginConfig,
    /// Log output settings for the demo binary
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl RegistryConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parses configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Returns this configuration as a TOML string.
    pub fn to_toml(&self) -> Result<String, TomlSerializeError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Checks values that deserialize fine but cannot be used.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let max = self.sampling.max_weight;
        if !max.is_finite() || max < 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "sampling.max_weight",
                reason: format!("must be a finite non-negative number, got {}", max),
            });
        }
        if self.discovery.construction_delay_ticks == 0 {
            return Err(ConfigError::InvalidValue {
                key: "discovery.construction_delay_ticks",
                reason: "registration happens on a later tick, so the delay must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Returns the default configuration as a TOML string.
pub fn default_config_toml() -> String {
    RegistryConfig::default()
        .to_toml()
        .unwrap_or_default()
}

/// Discovery configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Ticks between a construction signal and its registration, at least 1
    pub construction_delay_ticks: u64,
    /// Rescan the host whenever the scene changes
    pub scan_on_scene_transition: bool,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            construction_delay_ticks: 1,
            scan_on_scene_transition: true,
        }
    }
}

/// Weighted index configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Upper clamp applied to captured weights
    pub max_weight: f64,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            max_weight: MAX_WEIGHT,
        }
    }
}

/// Origin labelling configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OriginConfig {
    /// Modules whose behavior types count as base content
    pub base_origins: Vec<String>,
}

impl Default for OriginConfig {
    fn default() -> Self {
        Self {
            base_origins: vec![
                "Assembly-CSharp".to_string(),
                "Assembly-CSharp-firstpass".to_string(),
            ],
        }
    }
}

/// Log output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is not set
    pub default_filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default_filter: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RegistryConfig::default();
        assert_eq!(config.discovery.construction_delay_ticks, 1);
        assert!(config.discovery.scan_on_scene_transition);
        assert_eq!(config.sampling.max_weight, i32::MAX as f64);
        assert_eq!(config.origins.base_origins.len(), 2);
    }

    #[test]
    fn test_partial_config() {
        let toml = r#"
[discovery]
construction_delay_ticks = 3
"#;
        let config = RegistryConfig::from_str(toml).unwrap();
        assert_eq!(config.discovery.construction_delay_ticks, 3);
        assert!(config.discovery.scan_on_scene_transition);
        assert_eq!(config.logging.default_filter, "info");
    }

    #[test]
    fn test_empty_config_is_default() {
        let config = RegistryConfig::from_str("").unwrap();
        assert_eq!(config.discovery.construction_delay_ticks, 1);
    }

    #[test]
    fn test_negative_max_weight_rejected() {
        let toml = r#"
[sampling]
max_weight = -1.0
"#;
        let err = RegistryConfig::from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "sampling.max_weight", .. }));
    }

    #[test]
    fn test_zero_construction_delay_rejected() {
        let toml = r#"
[discovery]
construction_delay_ticks = 0
"#;
        let err = RegistryConfig::from_str(toml).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { key: "discovery.construction_delay_ticks", .. }
        ));
    }

    #[test]
    fn test_malformed_toml() {
        let err = RegistryConfig::from_str("[discovery\n").unwrap_err();
        assert!(matches!(err, ConfigError::TomlError(_)));
    }

    #[test]
    fn test_roundtrip_default_toml() {
        let toml = default_config_toml();
        let parsed = RegistryConfig::from_str(&toml).unwrap();
        assert_eq!(parsed.origins.base_origins, OriginConfig::default().base_origins);
    }

    #[test]
    fn test_from_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[origins]\nbase_origins = [\"Core\"]").unwrap();

        let config = RegistryConfig::from_file(file.path()).unwrap();
        assert_eq!(config.origins.base_origins, vec!["Core".to_string()]);
    }

    #[test]
    fn test_missing_file() {
        let err = RegistryConfig::from_file(Path::new("does/not/exist.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
