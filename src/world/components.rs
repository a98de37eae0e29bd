//! Components describing interactable world objects and their probe colliders.
use std::fmt;

use bevy::prelude::*;
use serde::Deserialize;

/// Stable identity for anything the avatar can probe, target or hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(u64);

impl ObjectId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OBJ-{:04}", self.0)
    }
}

/// Identity attached to every world object the interaction systems know about.
#[derive(Component, Debug, Clone)]
pub struct WorldObject {
    pub id: ObjectId,
    pub display_name: String,
}

impl WorldObject {
    pub fn new(id: ObjectId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
        }
    }
}

/// Resource that issues monotonically increasing object ids.
#[derive(Resource, Default)]
pub struct ObjectIdGenerator {
    next: u64,
}

impl ObjectIdGenerator {
    pub fn next_id(&mut self) -> ObjectId {
        self.next += 1;
        ObjectId::new(self.next)
    }
}

/// Whether a target reacts to the interact input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetCapability {
    Interactable,
    Inert,
}

impl TargetCapability {
    pub fn is_interactable(self) -> bool {
        matches!(self, Self::Interactable)
    }
}

/// Marks a world object as a probe target with a prompt.
#[derive(Component, Debug, Clone, Copy)]
pub struct Targetable {
    pub capability: TargetCapability,
}

impl Targetable {
    pub const fn interactable() -> Self {
        Self {
            capability: TargetCapability::Interactable,
        }
    }

    pub const fn inert() -> Self {
        Self {
            capability: TargetCapability::Inert,
        }
    }
}

/// What happens when an avatar interacts with the object.
#[derive(Component, Debug, Clone)]
pub enum InteractionEffect {
    /// Equip the object into the interacting avatar's slot.
    PickUp,
    /// Log a short description.
    Inspect { note: String },
}

/// Marker for objects that can sit in an equip slot.
#[derive(Component, Debug, Default)]
pub struct Equippable;

/// Present while an item is held; the item has no world presence of its own.
#[derive(Component, Debug, Default)]
pub struct Held;

/// Collision category used to filter ray probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeCategory {
    WorldStatic,
    WorldDynamic,
    Pawn,
}

impl fmt::Display for ProbeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::WorldStatic => "world static",
            Self::WorldDynamic => "world dynamic",
            Self::Pawn => "pawn",
        };
        write!(f, "{}", label)
    }
}

/// Axis-aligned box around the entity's global translation that blocks probes.
#[derive(Component, Debug, Clone, Copy)]
pub struct ProbeCollider {
    pub half_extents: Vec3,
    pub category: ProbeCategory,
}

impl ProbeCollider {
    pub fn new(half_extents: Vec3, category: ProbeCategory) -> Self {
        Self {
            half_extents: half_extents.abs(),
            category,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_display_padded() {
        let mut generator = ObjectIdGenerator::default();
        let first = generator.next_id();
        let second = generator.next_id();

        assert_ne!(first, second);
        assert_eq!(first.to_string(), "OBJ-0001");
        assert!(TargetCapability::Interactable.is_interactable());
        assert!(!Targetable::inert().capability.is_interactable());
    }
}
