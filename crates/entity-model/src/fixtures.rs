//! Sample data fixtures for testing.
//!
//! This module provides ready-made entities for other crates to use.
//! Enable the `test-fixtures` feature to access these helpers.
//!
//! # Example
//!
//! ```ignore
//! // In your Cargo.toml:
//! // [dev-dependencies]
//! // entity-model = { path = "../entity-model", features = ["test-fixtures"] }
//!
//! use entity_model::fixtures;
//!
//! let entities = fixtures::sample_entities();
//! let lamp = fixtures::flashlight();
//! ```

use crate::Entity;

/// Returns sample entities from the fixtures file.
///
/// Contains 6 entities:
/// - 2 tools with base-content behaviors (flashlight, shovel)
/// - 2 scrap props sharing one behavior type (large axle, big bolt without scan label)
/// - 1 modded prop reusing the big bolt's numeric id
/// - 1 entity without any behavior (never gets a handle)
pub fn sample_entities() -> Vec<Entity> {
    let json = include_str!("../tests/fixtures/sample_entities.json");
    serde_json::from_str(json).expect("Failed to parse sample_entities.json")
}

/// Returns a sample entity by its internal name.
pub fn get_entity(name: &str) -> Option<Entity> {
    sample_entities().into_iter().find(|e| e.name == name)
}

fn named(name: &str) -> Entity {
    get_entity(name).unwrap_or_else(|| panic!("Missing fixture entity {}", name))
}

/// Returns the base-content flashlight.
pub fn flashlight() -> Entity {
    named("FlashlightItem")
}

/// Returns the base-content shovel.
pub fn shovel() -> Entity {
    named("Shovel")
}

/// Returns the big bolt scrap prop.
pub fn big_bolt() -> Entity {
    named("BigBolt")
}

/// Returns the modded plushie.
pub fn plushie() -> Entity {
    named("Plushie")
}

/// Returns the entity that has no behavior attached.
pub fn blueprint() -> Entity {
    named("Blueprint")
}
