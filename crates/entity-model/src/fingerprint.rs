//! Identity Fingerprints
//!
//! Canonical string keys derived from an entity's copyable attributes. The
//! same logical entity produces the same fingerprint after it is destroyed and
//! recreated, because nothing here looks at instance keys.
//!
//! # Example
//!
//! ```
//! use entity_model::{fingerprint, Behavior, Entity};
//!
//! let bolt = Entity::new("BigBolt", "Big bolt", 12)
//!     .with_behavior(Behavior::new("PhysicsProp", "BigBolt(Clone)"));
//!
//! assert_eq!(fingerprint(&bolt), "BigBolt (Big bolt) <Big bolt / BigBolt(Clone)>");
//! ```

use crate::entity::Entity;

/// Label used when an entity has nothing else to show.
pub const NULL_LABEL: &str = "null";

/// Returns the label used in the fingerprint.
///
/// Fallback order: scan label, display name, behavior type name, then
/// [`NULL_LABEL`]. Empty strings count as missing.
pub fn label(entity: &Entity) -> &str {
    let candidates = [
        entity.scan_label.as_deref(),
        Some(entity.display_name.as_str()),
        entity.behavior_type().map(|t| t.type_name.as_str()),
    ];

    candidates
        .into_iter()
        .flatten()
        .find(|text| !text.is_empty())
        .unwrap_or(NULL_LABEL)
}

/// Derives the identity fingerprint of an entity.
pub fn fingerprint(entity: &Entity) -> String {
    let raw = format!(
        "{} ({}) <{} / {}>",
        entity.name,
        label(entity),
        entity.display_name,
        entity.behavior_name()
    );
    sanitize(&raw)
}

/// Replaces characters that break line-based textual config storage.
pub fn sanitize(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\r' | '\n' => ' ',
            '\\' => '/',
            '"' | '\'' => '|',
            '[' => '{',
            ']' => '}',
            other => other,
        })
        .collect()
}
