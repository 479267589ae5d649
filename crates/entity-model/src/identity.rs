//! Identity Handles and Loose Equality
//!
//! An [`IdentityHandle`] is an immutable snapshot of the attributes that
//! identify an entity. Handles and live entities are compared with
//! [`loosely_equals`], which projects both sides onto
//! `(numeric id, fingerprint, behavior type)` and never looks at references.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

use crate::entity::{BehaviorType, Entity};
use crate::fingerprint::{fingerprint, label};

/// Stable key of an identity handle inside a handle pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandleId(pub usize);

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "handle#{}", self.0)
    }
}

/// The attributes loose equality projects onto.
pub trait LooseIdentity {
    fn numeric_id(&self) -> i32;

    /// Fingerprint of the identity. Computed fresh for live entities.
    fn fingerprint(&self) -> Cow<'_, str>;

    fn behavior_type(&self) -> Option<&BehaviorType>;
}

impl LooseIdentity for Entity {
    fn numeric_id(&self) -> i32 {
        self.numeric_id
    }

    fn fingerprint(&self) -> Cow<'_, str> {
        Cow::Owned(fingerprint(self))
    }

    fn behavior_type(&self) -> Option<&BehaviorType> {
        Entity::behavior_type(self)
    }
}

/// Compares two optional identities of possibly different kinds.
///
/// Same reference is equal, one missing side is unequal, two missing sides are
/// equal. Otherwise numeric id, fingerprint and behavior type must all match,
/// checked in that order.
pub fn loosely_equals<A, B>(a: Option<&A>, b: Option<&B>) -> bool
where
    A: LooseIdentity + ?Sized,
    B: LooseIdentity + ?Sized,
{
    match (a, b) {
        (None, None) => true,
        (None, Some(_)) | (Some(_), None) => false,
        (Some(a), Some(b)) => {
            if std::ptr::eq(a as *const A as *const (), b as *const B as *const ()) {
                return true;
            }
            if a.numeric_id() != b.numeric_id() {
                return false;
            }
            if a.fingerprint() != b.fingerprint() {
                return false;
            }
            a.behavior_type() == b.behavior_type()
        }
    }
}

/// Immutable identity snapshot of an entity.
///
/// Handles are created by a handle pool, which guarantees there is exactly one
/// handle per distinct `(numeric id, fingerprint, behavior type)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityHandle {
    id: HandleId,
    pub name: String,
    pub display_name: String,
    pub numeric_id: i32,
    pub label: String,
    pub fingerprint: String,
    pub behavior_type: Option<BehaviorType>,
    pub behavior_name: String,
}

impl IdentityHandle {
    /// Snapshots the identifying attributes of `entity`.
    pub fn snapshot(id: HandleId, entity: &Entity) -> Self {
        Self {
            id,
            name: entity.name.clone(),
            display_name: entity.display_name.clone(),
            numeric_id: entity.numeric_id,
            label: label(entity).to_string(),
            fingerprint: fingerprint(entity),
            behavior_type: entity.behavior_type().cloned(),
            behavior_name: entity.behavior_name().to_string(),
        }
    }

    pub fn id(&self) -> HandleId {
        self.id
    }
}

impl LooseIdentity for IdentityHandle {
    fn numeric_id(&self) -> i32 {
        self.numeric_id
    }

    fn fingerprint(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.fingerprint)
    }

    fn behavior_type(&self) -> Option<&BehaviorType> {
        self.behavior_type.as_ref()
    }
}

impl fmt::Display for IdentityHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fingerprint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Behavior;
    use crate::fixtures;

    fn check_symmetric<A, B>(a: Option<&A>, b: Option<&B>)
    where
        A: LooseIdentity + ?Sized,
        B: LooseIdentity + ?Sized,
    {
        assert_eq!(loosely_equals(a, b), loosely_equals(b, a));
    }

    #[test]
    fn test_null_rules() {
        let lamp = fixtures::flashlight();

        assert!(loosely_equals::<Entity, Entity>(None, None));
        assert!(!loosely_equals::<Entity, Entity>(Some(&lamp), None));
        assert!(!loosely_equals::<IdentityHandle, Entity>(None, Some(&lamp)));
    }

    #[test]
    fn test_same_reference_is_equal() {
        let lamp = fixtures::flashlight();
        assert!(loosely_equals(Some(&lamp), Some(&lamp)));
    }

    #[test]
    fn test_recreated_entity_matches_handle() {
        let original = fixtures::flashlight();
        let handle = IdentityHandle::snapshot(HandleId(0), &original);
        let recreated = fixtures::flashlight();

        assert!(loosely_equals(Some(&handle), Some(&recreated)));
        assert!(loosely_equals(Some(&recreated), Some(&handle)));
    }

    #[test]
    fn test_numeric_id_mismatch() {
        let a = fixtures::flashlight();
        let mut b = fixtures::flashlight();
        b.numeric_id += 1;

        assert!(!loosely_equals(Some(&a), Some(&b)));
    }

    #[test]
    fn test_behavior_type_mismatch() {
        let a = fixtures::flashlight();
        let mut b = fixtures::flashlight();
        if let Some(behavior) = b.behavior.as_mut() {
            behavior.behavior_type.origin = Some("OtherMod".to_string());
        }

        assert_eq!(a.numeric_id, b.numeric_id);
        assert_eq!(fingerprint(&a), fingerprint(&b));
        assert!(!loosely_equals(Some(&a), Some(&b)));
    }

    #[test]
    fn test_fingerprint_mismatch() {
        let a = fixtures::flashlight();
        let b = fixtures::flashlight().with_scan_label("Pro-flashlight");

        assert!(!loosely_equals(Some(&a), Some(&b)));
    }

    #[test]
    fn test_ignores_attributes_outside_projection() {
        let handle = IdentityHandle::snapshot(HandleId(0), &fixtures::flashlight());
        let mut other = handle.clone();
        other.label = "something else".to_string();

        assert!(loosely_equals(Some(&handle), Some(&other)));
    }

    #[test]
    fn test_symmetry_across_kinds() {
        let entities = fixtures::sample_entities();
        let handles: Vec<IdentityHandle> = entities
            .iter()
            .enumerate()
            .map(|(i, e)| IdentityHandle::snapshot(HandleId(i), e))
            .collect();

        let mut entity_sides: Vec<Option<&Entity>> = entities.iter().map(Some).collect();
        entity_sides.push(None);
        let mut handle_sides: Vec<Option<&IdentityHandle>> = handles.iter().map(Some).collect();
        handle_sides.push(None);

        for &a in &entity_sides {
            for &b in &entity_sides {
                check_symmetric(a, b);
            }
            for &b in &handle_sides {
                check_symmetric(a, b);
            }
        }
        for &a in &handle_sides {
            for &b in &handle_sides {
                check_symmetric(a, b);
            }
        }
    }

    #[test]
    fn test_transitive_through_handle() {
        let a = fixtures::flashlight();
        let handle = IdentityHandle::snapshot(HandleId(3), &a);
        let c = fixtures::flashlight();

        assert!(loosely_equals(Some(&a), Some(&handle)));
        assert!(loosely_equals(Some(&handle), Some(&c)));
        assert!(loosely_equals(Some(&a), Some(&c)));
    }

    #[test]
    fn test_entity_without_behavior() {
        let a = Entity::new("Rock", "Rock", 4);
        let b = Entity::new("Rock", "Rock", 4);
        let c = Entity::new("Rock", "Rock", 4).with_behavior(Behavior::new("Prop", ""));

        assert!(loosely_equals(Some(&a), Some(&b)));
        assert!(!loosely_equals(Some(&a), Some(&c)));
    }

    #[test]
    fn test_snapshot_copies_attributes() {
        let lamp = fixtures::flashlight();
        let handle = IdentityHandle::snapshot(HandleId(2), &lamp);

        assert_eq!(handle.id(), HandleId(2));
        assert_eq!(handle.name, lamp.name);
        assert_eq!(handle.fingerprint, fingerprint(&lamp));
        assert_eq!(handle.behavior_name, lamp.behavior_name());
        assert_eq!(handle.to_string(), handle.fingerprint);
    }
}
