//! Host Entity Types
//!
//! Plain-data view of the transient objects a host simulation produces.
//!
//! # Example
//!
//! ```
//! use entity_model::{Behavior, Entity};
//!
//! let lamp = Entity::new("FlashlightItem", "Flashlight", 3)
//!     .with_scan_label("Flashlight")
//!     .with_behavior(Behavior::new("FlashlightItem", "Flashlight(Clone)").with_origin("Assembly-CSharp"));
//!
//! assert_eq!(lamp.behavior_type().unwrap().type_name, "FlashlightItem");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Key of one live entity instance inside the host.
///
/// Instance keys are transient: a recreated entity gets a new key even when it
/// is the same logical entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity#{}", self.0)
    }
}

/// Runtime type descriptor of a behavior sub-object.
///
/// Two descriptors are the same type only when both the type name and the
/// module it was loaded from match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BehaviorType {
    pub type_name: String,
    /// Module the type was loaded from, if known.
    #[serde(default)]
    pub origin: Option<String>,
}

impl BehaviorType {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            origin: None,
        }
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// Human-readable label for where this type came from.
    ///
    /// Returns `"Unknown"` without an origin, `"Base"` when the origin is one of
    /// `base_origins`, and `"Mods.<origin>"` otherwise.
    pub fn origin_label(&self, base_origins: &[String]) -> String {
        match self.origin.as_deref() {
            None | Some("") => "Unknown".to_string(),
            Some(origin) if base_origins.iter().any(|base| base == origin) => "Base".to_string(),
            Some(origin) => format!("Mods.{}", origin),
        }
    }

    /// Returns true if the type was loaded from one of `base_origins`.
    pub fn is_base_content(&self, base_origins: &[String]) -> bool {
        self.origin_label(base_origins) == "Base"
    }
}

impl fmt::Display for BehaviorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.origin {
            Some(origin) => write!(f, "{}::{}", origin, self.type_name),
            None => write!(f, "{}", self.type_name),
        }
    }
}

/// Behavior sub-object attached to an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Behavior {
    pub behavior_type: BehaviorType,
    /// Display name of the behavior object itself
    pub name: String,
}

impl Behavior {
    pub fn new(type_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            behavior_type: BehaviorType::new(type_name),
            name: name.into(),
        }
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.behavior_type.origin = Some(origin.into());
        self
    }
}

/// A transient object owned and mutated by the host simulation.
///
/// The registry only ever reads these; it never owns their lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Internal asset name
    pub name: String,
    /// Secondary, player-facing name
    pub display_name: String,
    /// Numeric id assigned by the host
    pub numeric_id: i32,
    /// Text shown when the entity is scanned in the host, if any
    #[serde(default)]
    pub scan_label: Option<String>,
    #[serde(default)]
    pub behavior: Option<Behavior>,
}

impl Entity {
    pub fn new(name: impl Into<String>, display_name: impl Into<String>, numeric_id: i32) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            numeric_id,
            scan_label: None,
            behavior: None,
        }
    }

    pub fn with_scan_label(mut self, label: impl Into<String>) -> Self {
        self.scan_label = Some(label.into());
        self
    }

    pub fn with_behavior(mut self, behavior: Behavior) -> Self {
        self.behavior = Some(behavior);
        self
    }

    pub fn behavior_type(&self) -> Option<&BehaviorType> {
        self.behavior.as_ref().map(|b| &b.behavior_type)
    }

    /// Name of the attached behavior object, or an empty string.
    pub fn behavior_name(&self) -> &str {
        self.behavior.as_ref().map(|b| b.name.as_str()).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Vec<String> {
        vec!["Assembly-CSharp".to_string(), "Assembly-CSharp-firstpass".to_string()]
    }

    #[test]
    fn test_origin_label() {
        assert_eq!(BehaviorType::new("Shovel").origin_label(&base()), "Unknown");
        assert_eq!(
            BehaviorType::new("Shovel").with_origin("Assembly-CSharp").origin_label(&base()),
            "Base"
        );
        assert_eq!(
            BehaviorType::new("Plushie").with_origin("CoolMod").origin_label(&base()),
            "Mods.CoolMod"
        );
    }

    #[test]
    fn test_is_base_content() {
        let vanilla = BehaviorType::new("Shovel").with_origin("Assembly-CSharp-firstpass");
        let modded = BehaviorType::new("Shovel").with_origin("CoolMod");

        assert!(vanilla.is_base_content(&base()));
        assert!(!modded.is_base_content(&base()));
    }

    #[test]
    fn test_behavior_type_identity_includes_origin() {
        let a = BehaviorType::new("Shovel").with_origin("Assembly-CSharp");
        let b = BehaviorType::new("Shovel").with_origin("CoolMod");
        assert_ne!(a, b);
    }

    #[test]
    fn test_entity_serde_defaults() {
        let entity: Entity =
            serde_json::from_str(r#"{"name":"Bolt","display_name":"Big bolt","numeric_id":7}"#)
                .unwrap();

        assert!(entity.scan_label.is_none());
        assert!(entity.behavior.is_none());
        assert_eq!(entity.behavior_name(), "");
    }
}
