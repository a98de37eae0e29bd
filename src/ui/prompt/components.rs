// src/ui/prompt/components.rs
//
// Components and resources for the interaction prompt HUD.

use bevy::prelude::*;

/// Root node of the prompt. Hidden (`Display::None`) while no avatar has a target.
#[derive(Component, Debug, Default)]
pub struct InteractionPrompt {
    /// Avatar whose target is currently displayed.
    pub owner: Option<Entity>,
}

/// Text entity showing the target name.
#[derive(Component, Debug, Default)]
pub struct PromptLabel;

/// Layout settings for the prompt.
#[derive(Resource, Debug)]
pub struct PromptSettings {
    /// Offset from bottom edge of screen (pixels).
    pub bottom_offset: f32,

    /// Padding inside the panel (pixels).
    pub padding: f32,

    /// Border width (pixels).
    pub border_width: f32,

    /// Font size for the label (points).
    pub font_size: f32,
}

impl Default for PromptSettings {
    fn default() -> Self {
        Self {
            bottom_offset: 120.0,
            padding: 8.0,
            border_width: 2.0,
            font_size: 20.0,
        }
    }
}
