// src/ui/mod.rs
//
// UI module providing screen-space HUD elements.
//
// Current features:
// - Interaction prompt ("[E] <target>") driven by PromptEvent messages

pub mod prompt;

// Re-export the main plugin
pub use prompt::UiPlugin;
