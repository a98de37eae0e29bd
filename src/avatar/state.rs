//! Per-avatar capability flags and interaction flags.
use bevy::prelude::*;

/// Owned by exactly one avatar entity.
///
/// The `can_*` capabilities are policy and may be flipped by gameplay code.
/// `targeting_active` and `equipped` are only written by the targeting and
/// equip controllers.
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct AvatarState {
    pub can_move: bool,
    pub can_look: bool,
    pub can_target: bool,
    targeting_active: bool,
    equipped: bool,
}

impl AvatarState {
    pub fn new(can_move: bool, can_look: bool, can_target: bool) -> Self {
        Self {
            can_move,
            can_look,
            can_target,
            targeting_active: false,
            equipped: false,
        }
    }

    pub fn is_targeting_active(&self) -> bool {
        self.targeting_active
    }

    pub fn is_equipped(&self) -> bool {
        self.equipped
    }

    pub(super) fn set_targeting_active(&mut self, active: bool) {
        self.targeting_active = active;
    }

    pub(super) fn set_equipped(&mut self, equipped: bool) {
        self.equipped = equipped;
    }
}

impl Default for AvatarState {
    fn default() -> Self {
        Self::new(true, true, true)
    }
}
