//! Diagnostics returned by interaction operations. None of them are fatal.
use std::fmt;

use crate::world::components::ObjectId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionError {
    MissingAvatarState,
    TargetingDisabled,
    TargetingInactive,
    NoTarget,
    TargetVanished { object: ObjectId },
    NotInteractable { object: ObjectId },
    NothingEquipped,
    NotEquippable { object: ObjectId },
    UnknownObject { object: ObjectId },
}

impl InteractionError {
    /// Errors the interact input reports at error level.
    pub fn is_missing_target(&self) -> bool {
        matches!(self, Self::NoTarget | Self::TargetingInactive)
    }
}

impl fmt::Display for InteractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingAvatarState => write!(f, "avatar state is missing"),
            Self::TargetingDisabled => write!(f, "targeting is disabled for this avatar"),
            Self::TargetingInactive => write!(f, "targeting is not active"),
            Self::NoTarget => write!(f, "current target is empty"),
            Self::TargetVanished { object } => write!(f, "target {} no longer exists", object),
            Self::NotInteractable { object } => write!(f, "{} is not interactable", object),
            Self::NothingEquipped => write!(f, "nothing is equipped"),
            Self::NotEquippable { object } => write!(f, "{} cannot be equipped", object),
            Self::UnknownObject { object } => write!(f, "{} is not a known world object", object),
        }
    }
}

impl std::error::Error for InteractionError {}
