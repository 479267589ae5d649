//! Shared entity and identity types for the entity registry.
//!
//! This crate contains pure data structures and pure functions with no
//! registry state. It is a dependency for all other crates in the workspace.

pub mod entity;
pub mod fingerprint;
pub mod identity;

#[cfg(any(test, feature = "test-fixtures"))]
pub mod fixtures;

// Re-export entity types
pub use entity::{Behavior, BehaviorType, Entity, EntityId};

// Re-export fingerprint helpers
pub use fingerprint::{fingerprint, label, sanitize, NULL_LABEL};

// Re-export identity types
pub use identity::{loosely_equals, HandleId, IdentityHandle, LooseIdentity};
