//! ECS-side avatar components: rig entities and motion accumulation.
use bevy::prelude::*;

use super::dispatcher::AvatarMotion;

const PITCH_LIMIT: f32 = 1.54;

/// Marker for avatar entities driven by local input.
#[derive(Component, Debug, Default)]
pub struct Avatar;

/// Child entities the interaction systems need to reach.
#[derive(Component, Debug, Clone, Copy)]
pub struct AvatarRig {
    /// First-person camera; the probe starts here.
    pub eye: Entity,
    /// Attachment point for the equip slot.
    pub slot_anchor: Entity,
}

/// Marker for the avatar's first-person camera.
#[derive(Component, Debug, Default)]
pub struct AvatarEye;

/// Orientation and tuning for avatar movement.
#[derive(Component, Debug, Clone)]
pub struct AvatarMotor {
    pub yaw: f32,
    pub pitch: f32,
    pub move_speed: f32,
    pub look_sensitivity: f32,
}

impl AvatarMotor {
    pub fn new(move_speed: f32, look_sensitivity: f32) -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            move_speed,
            look_sensitivity,
        }
    }

    pub fn apply_look(&mut self, yaw: f32, pitch: f32) {
        self.yaw -= yaw * self.look_sensitivity;
        self.pitch = (self.pitch - pitch * self.look_sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    pub fn body_rotation(&self) -> Quat {
        Quat::from_axis_angle(Vec3::Y, self.yaw)
    }

    pub fn eye_rotation(&self) -> Quat {
        Quat::from_axis_angle(Vec3::X, self.pitch)
    }
}

/// Raw movement and look contributions gathered during one frame.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq)]
pub struct MotionAccumulator {
    pub forward: f32,
    pub right: f32,
    pub yaw: f32,
    pub pitch: f32,
}

impl MotionAccumulator {
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }
}

impl AvatarMotion for MotionAccumulator {
    fn add_movement(&mut self, forward: f32, right: f32) {
        self.forward += forward;
        self.right += right;
    }

    fn add_look(&mut self, yaw: f32, pitch: f32) {
        self.yaw += yaw;
        self.pitch += pitch;
    }
}
