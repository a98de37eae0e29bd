//! AvatarPlugin wires input decoding, dispatch, probing and motion for local avatars.
use bevy::prelude::*;

use crate::{core::plugin::CoreTimingSet, world::systems::spawn_world_environment};

use super::{
    config::InteractionSettings,
    events::{AvatarInputEvent, DespawnAvatar, InteractionRequested, PromptEvent},
    input::{read_avatar_input, update_cursor_grab},
    systems::{
        apply_avatar_motion, despawn_avatars, dispatch_avatar_input, resolve_interaction_effects,
        run_probe_ticks, spawn_avatar,
    },
};

/// Avatar systems, configured from the settings `main` loaded.
pub struct AvatarPlugin {
    settings: InteractionSettings,
}

impl AvatarPlugin {
    pub fn new(settings: InteractionSettings) -> Self {
        Self { settings }
    }
}

impl Plugin for AvatarPlugin {
    fn build(&self, app: &mut App) {
        let settings = self.settings.clone();
        info!(
            "Avatar probe configured: every {:.2}s, {:.0} units against {}",
            settings.probe.interval.as_secs_f32(),
            settings.probe.max_distance,
            settings.probe.category
        );

        app.insert_resource(settings)
            .add_message::<AvatarInputEvent>()
            .add_message::<PromptEvent>()
            .add_message::<InteractionRequested>()
            .add_message::<DespawnAvatar>()
            .add_systems(Startup, spawn_avatar.after(spawn_world_environment))
            .add_systems(
                Update,
                (
                    update_cursor_grab,
                    read_avatar_input,
                    dispatch_avatar_input,
                    resolve_interaction_effects,
                    run_probe_ticks,
                    despawn_avatars,
                    apply_avatar_motion,
                )
                    .chain()
                    .after(CoreTimingSet),
            );

        #[cfg(feature = "probe_debug")]
        app.add_systems(
            Update,
            super::systems::draw_probe_traces.after(run_probe_ticks),
        );
    }
}
