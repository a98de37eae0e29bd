//! Equip controller: the avatar's single equip slot.
use bevy::prelude::*;

use crate::world::components::ObjectId;

use super::{errors::InteractionError, state::AvatarState};

/// Capabilities an item exposes to the slot that holds it.
pub trait ItemPresence {
    /// Turn off the item's own collision and simulation.
    fn disable_world_presence(&mut self, item: ObjectId);
    /// Restore the item's own collision and simulation.
    fn enable_world_presence(&mut self, item: ObjectId);
    /// Snap the item onto the slot: position and rotation follow the slot, scale is kept.
    fn attach(&mut self, item: ObjectId);
    /// Release the item from the slot, keeping its current world transform.
    fn detach(&mut self, item: ObjectId);
}

/// Outcome of a successful equip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EquipChange {
    pub equipped: ObjectId,
    /// The item that was forced out of the slot, if any.
    pub released: Option<ObjectId>,
}

/// Sole owner of the equip slot. Holds at most one item.
#[derive(Component, Debug, Default)]
pub struct EquipController {
    held: Option<ObjectId>,
}

impl EquipController {
    pub fn held(&self) -> Option<ObjectId> {
        self.held
    }

    /// Equips `item`, unequipping whatever is already held first.
    pub fn equip(
        &mut self,
        state: Option<&mut AvatarState>,
        item: ObjectId,
        presence: &mut dyn ItemPresence,
    ) -> Result<EquipChange, InteractionError> {
        let state = state.ok_or(InteractionError::MissingAvatarState)?;

        let released = if state.is_equipped() || self.held.is_some() {
            self.unequip(Some(&mut *state), presence).ok()
        } else {
            None
        };

        presence.disable_world_presence(item);
        presence.attach(item);
        self.held = Some(item);
        state.set_equipped(true);

        Ok(EquipChange {
            equipped: item,
            released,
        })
    }

    /// Releases the held item back into the world.
    ///
    /// With an empty slot this only re-syncs the equip flag and reports
    /// [`InteractionError::NothingEquipped`].
    pub fn unequip(
        &mut self,
        state: Option<&mut AvatarState>,
        presence: &mut dyn ItemPresence,
    ) -> Result<ObjectId, InteractionError> {
        let state = state.ok_or(InteractionError::MissingAvatarState)?;

        let Some(item) = self.held.take() else {
            state.set_equipped(false);
            return Err(InteractionError::NothingEquipped);
        };

        presence.detach(item);
        presence.enable_world_presence(item);
        state.set_equipped(false);
        Ok(item)
    }

    /// Drops the held item during teardown. Unlike [`Self::unequip`] this
    /// still releases the item when the avatar has lost its state.
    pub fn release_held(
        &mut self,
        state: Option<&mut AvatarState>,
        presence: &mut dyn ItemPresence,
    ) -> Option<ObjectId> {
        let item = self.held.take()?;
        presence.detach(item);
        presence.enable_world_presence(item);
        if let Some(state) = state {
            state.set_equipped(false);
        }
        Some(item)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::HashSet;

    use super::*;

    /// Tracks which items are attached and which have world presence.
    #[derive(Debug, Default)]
    pub struct RecordingPresence {
        pub attached: HashSet<ObjectId>,
        pub disabled: HashSet<ObjectId>,
        pub log: Vec<(&'static str, ObjectId)>,
    }

    impl RecordingPresence {
        pub fn has_presence(&self, item: ObjectId) -> bool {
            !self.disabled.contains(&item)
        }
    }

    impl ItemPresence for RecordingPresence {
        fn disable_world_presence(&mut self, item: ObjectId) {
            self.disabled.insert(item);
            self.log.push(("disable", item));
        }

        fn enable_world_presence(&mut self, item: ObjectId) {
            self.disabled.remove(&item);
            self.log.push(("enable", item));
        }

        fn attach(&mut self, item: ObjectId) {
            self.attached.insert(item);
            self.log.push(("attach", item));
        }

        fn detach(&mut self, item: ObjectId) {
            self.attached.remove(&item);
            self.log.push(("detach", item));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::RecordingPresence;
    use super::*;

    const LANTERN: ObjectId = ObjectId::new(20);
    const KEY: ObjectId = ObjectId::new(21);

    #[test]
    fn equip_then_unequip_restores_item() {
        let mut state = AvatarState::default();
        let mut presence = RecordingPresence::default();
        let mut slot = EquipController::default();

        let change = slot.equip(Some(&mut state), LANTERN, &mut presence).unwrap();
        assert_eq!(change.released, None);
        assert!(state.is_equipped());
        assert_eq!(slot.held(), Some(LANTERN));
        assert!(!presence.has_presence(LANTERN));
        assert!(presence.attached.contains(&LANTERN));

        assert_eq!(slot.unequip(Some(&mut state), &mut presence), Ok(LANTERN));
        assert!(!state.is_equipped());
        assert_eq!(slot.held(), None);
        assert!(presence.has_presence(LANTERN));
        assert!(presence.attached.is_empty());
    }

    #[test]
    fn equip_while_equipped_swaps_items() {
        let mut state = AvatarState::default();
        let mut presence = RecordingPresence::default();
        let mut slot = EquipController::default();

        slot.equip(Some(&mut state), LANTERN, &mut presence).unwrap();
        let change = slot.equip(Some(&mut state), KEY, &mut presence).unwrap();

        assert_eq!(change.released, Some(LANTERN));
        assert!(state.is_equipped());
        assert_eq!(slot.held(), Some(KEY));
        assert!(presence.has_presence(LANTERN));
        assert!(!presence.has_presence(KEY));
        assert_eq!(presence.attached.len(), 1);
        assert!(presence.attached.contains(&KEY));
        assert_eq!(
            &presence.log[2..],
            &[
                ("detach", LANTERN),
                ("enable", LANTERN),
                ("disable", KEY),
                ("attach", KEY),
            ]
        );
    }

    #[test]
    fn unequip_with_empty_slot_is_safe() {
        let mut state = AvatarState::default();
        let mut presence = RecordingPresence::default();
        let mut slot = EquipController::default();

        assert_eq!(
            slot.unequip(Some(&mut state), &mut presence),
            Err(InteractionError::NothingEquipped)
        );
        assert!(!state.is_equipped());
        assert!(presence.log.is_empty());
    }

    #[test]
    fn missing_state_leaves_slot_untouched() {
        let mut presence = RecordingPresence::default();
        let mut slot = EquipController::default();

        assert_eq!(
            slot.equip(None, LANTERN, &mut presence),
            Err(InteractionError::MissingAvatarState)
        );
        assert_eq!(slot.held(), None);
        assert!(presence.log.is_empty());
    }

    #[test]
    fn release_held_works_without_state() {
        let mut state = AvatarState::default();
        let mut presence = RecordingPresence::default();
        let mut slot = EquipController::default();
        slot.equip(Some(&mut state), KEY, &mut presence).unwrap();

        assert_eq!(
            slot.unequip(None, &mut presence),
            Err(InteractionError::MissingAvatarState)
        );
        assert_eq!(slot.held(), Some(KEY));

        assert_eq!(slot.release_held(None, &mut presence), Some(KEY));
        assert_eq!(slot.held(), None);
        assert!(presence.has_presence(KEY));
        assert!(presence.attached.is_empty());
        assert_eq!(slot.release_held(None, &mut presence), None);
    }
}
