// src/ui/prompt/mod.rs
//
// Prompt module showing the avatar's current target near the bottom of the screen.

pub mod components;
pub mod plugin;
pub mod systems;

pub use plugin::UiPlugin;
