//! Messages flowing into and out of the avatar interaction systems.
use bevy::prelude::*;

use crate::world::components::ObjectId;

/// High-level input already decoded from devices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AvatarAction {
    Move(Vec2),
    Look(Vec2),
    Interact,
    StartTargeting,
    StopTargeting,
    Drop,
}

#[derive(Message, Debug, Clone, Copy)]
pub struct AvatarInputEvent {
    pub avatar: Entity,
    pub action: AvatarAction,
}

/// Presentation updates for the interaction prompt.
#[derive(Message, Debug, Clone, PartialEq)]
pub enum PromptEvent {
    Show {
        avatar: Entity,
        name: String,
        interactable: bool,
    },
    Hide {
        avatar: Entity,
    },
}

/// Fired when an avatar interacts with a target; effect systems decide what it does.
#[derive(Message, Debug, Clone, Copy)]
pub struct InteractionRequested {
    pub avatar: Entity,
    pub object: ObjectId,
}

/// Removes an avatar, dropping whatever it holds first.
#[derive(Message, Debug, Clone, Copy)]
pub struct DespawnAvatar {
    pub avatar: Entity,
}
