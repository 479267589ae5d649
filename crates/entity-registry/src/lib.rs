//! Entity identity registry with a weighted-sampling index.
//!
//! The registry discovers transient entities produced by a host simulation,
//! gives each a stable identity that survives instance destruction and
//! recreation, announces new identities to subscribers, and keeps a weighted
//! index over identities for random selection.
//!
//! # Architecture
//!
//! ```text
//! host scan / construction ──▶ DiscoveryEngine ──▶ HandlePool ──▶ subscribers
//! host capture ──────────────▶ WeightedIndex ◀── weight_of / sample
//! ```
//!
//! # Modules
//!
//! - [`pool`]: Deduplicating identity handle store and handle resolution
//! - [`discovery`]: Scans, deferred construction signals, replaying subscriptions
//! - [`index`]: Weight snapshot, summed weight lookup, sampling
//! - [`probability`]: Generic weighted choice
//! - [`blended`]: Random generator blending two sources
//! - [`registry`]: The context object tying it all together
//! - [`ecs`]: `bevy_ecs` host adapter

pub mod blended;
pub mod config;
pub mod discovery;
pub mod ecs;
pub mod error;
pub mod host;
pub mod index;
pub mod pool;
pub mod probability;
pub mod registry;

// Re-export the context object
pub use registry::Registry;

// Re-export host contract
pub use host::{EntityHost, EntityTable, SourceWeight};

// Re-export component types
pub use discovery::{DeferredRegistration, DiscoveryEngine, DiscoveryHandler};
pub use index::{IndexListener, WeightEntry, WeightedIndex};
pub use pool::{HandlePool, Registration};

// Re-export sampling helpers
pub use blended::BlendedRng;
pub use probability::{
    choose_weighted, clamp_weight, sample_weighted, sample_weighted_with_max, FloatExt, MAX_WEIGHT,
};

// Re-export config and error types
pub use config::{
    default_config_toml, DiscoveryConfig, LoggingConfig, OriginConfig, RegistryConfig,
    SamplingConfig,
};
pub use error::{ConfigError, RegistryError, SamplingError, TomlSerializeError};

// Re-export ECS adapter
pub use ecs::{registry_schedule, EcsHost, HostSourceList, ItemDefinition};
