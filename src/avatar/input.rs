//! Device bindings: keyboard and mouse decoded into [`AvatarInputEvent`]s.
use bevy::{
    ecs::message::{MessageReader, MessageWriter},
    input::{mouse::MouseMotion, ButtonInput},
    prelude::*,
    window::{CursorGrabMode, CursorOptions},
};

use super::{
    components::Avatar,
    events::{AvatarAction, AvatarInputEvent},
    state::AvatarState,
};

const LOOK_BUTTON: MouseButton = MouseButton::Right;

/// Locks the cursor while the look button is held.
pub fn update_cursor_grab(
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mut cursor_options: Single<&mut CursorOptions>,
) {
    if mouse_buttons.just_pressed(LOOK_BUTTON) {
        cursor_options.visible = false;
        cursor_options.grab_mode = CursorGrabMode::Locked;
    } else if mouse_buttons.just_released(LOOK_BUTTON) {
        cursor_options.visible = true;
        cursor_options.grab_mode = CursorGrabMode::None;
    }
}

/// WASD moves, mouse look while the right button is held, E interacts,
/// T toggles targeting and G drops the held item.
pub fn read_avatar_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mut motion_events: MessageReader<MouseMotion>,
    avatars: Query<(Entity, Option<&AvatarState>), With<Avatar>>,
    mut inputs: MessageWriter<AvatarInputEvent>,
) {
    let look: Vec2 = motion_events.read().map(|ev| ev.delta).sum();
    let movement = movement_axes(&keyboard);

    let mut actions = Vec::new();
    if movement != Vec2::ZERO {
        actions.push(AvatarAction::Move(movement));
    }
    if look != Vec2::ZERO && mouse_buttons.pressed(LOOK_BUTTON) {
        actions.push(AvatarAction::Look(look));
    }
    if keyboard.just_pressed(KeyCode::KeyE) {
        actions.push(AvatarAction::Interact);
    }
    if keyboard.just_pressed(KeyCode::KeyG) {
        actions.push(AvatarAction::Drop);
    }
    let toggle = keyboard.just_pressed(KeyCode::KeyT);

    if actions.is_empty() && !toggle {
        return;
    }

    for (avatar, state) in avatars.iter() {
        for action in &actions {
            inputs.write(AvatarInputEvent {
                avatar,
                action: *action,
            });
        }
        if toggle {
            let action = match state {
                Some(state) if state.is_targeting_active() => AvatarAction::StopTargeting,
                _ => AvatarAction::StartTargeting,
            };
            inputs.write(AvatarInputEvent { avatar, action });
        }
    }
}

/// `y` is forward, `x` is right. Opposing keys cancel; diagonals are left unnormalised.
fn movement_axes(keyboard: &ButtonInput<KeyCode>) -> Vec2 {
    let mut axes = Vec2::ZERO;
    if keyboard.pressed(KeyCode::KeyW) {
        axes.y += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyS) {
        axes.y -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyD) {
        axes.x += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyA) {
        axes.x -= 1.0;
    }
    axes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movement_axes_follow_wasd() {
        let mut keyboard = ButtonInput::<KeyCode>::default();
        keyboard.press(KeyCode::KeyW);
        keyboard.press(KeyCode::KeyD);
        assert_eq!(movement_axes(&keyboard), Vec2::new(1.0, 1.0));

        keyboard.press(KeyCode::KeyS);
        keyboard.press(KeyCode::KeyA);
        assert_eq!(movement_axes(&keyboard), Vec2::ZERO);
    }
}
