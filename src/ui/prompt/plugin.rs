// src/ui/prompt/plugin.rs
//
// UiPlugin coordinates the interaction prompt HUD.

use bevy::prelude::*;

use super::components::PromptSettings;
use super::systems::{apply_prompt_events, spawn_prompt_hud};

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        info!("UiPlugin registered");

        app.insert_resource(PromptSettings::default())
            .add_systems(Startup, spawn_prompt_hud)
            .add_systems(Update, apply_prompt_events);
    }
}
