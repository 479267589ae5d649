//! Registry error types.
//!
//! Absence (an entity or handle not found) is never an error: it is expressed
//! as `None` or zero weight. Only invalid input and configuration problems are.

use thiserror::Error;

/// Invalid input passed to a sampling helper.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SamplingError {
    /// Weighted choice over an empty list
    #[error("cannot sample from an empty weight list")]
    EmptyWeights,
    /// Blend factor outside `[0, 1]`
    #[error("blend factor must be between 0.0 and 1.0, got {0}")]
    BlendOutOfRange(f64),
    /// Integer range whose upper bound is below its lower bound
    #[error("range upper bound {max} is less than lower bound {min}")]
    InvertedRange { min: i32, max: i32 },
    /// Exclusive upper bound that leaves nothing to pick
    #[error("upper bound must be greater than 0, got {0}")]
    EmptyRange(i32),
}

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error reading config file
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    /// Error parsing TOML config
    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),
    /// A value that parses but cannot be used
    #[error("invalid config value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

/// Error that can occur during TOML serialization.
#[derive(Debug, Error)]
#[error("TOML serialize error: {0}")]
pub struct TomlSerializeError(#[from] pub toml::ser::Error);

/// Errors that can occur in registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Config error: {0}")]
    ConfigSerialize(#[from] TomlSerializeError),
    #[error("Sampling error: {0}")]
    Sampling(#[from] SamplingError),
    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}
