//! First-person avatar: capability flags, targeting probe, equip slot and the
//! dispatcher that routes input between them.
pub mod adapters;
pub mod components;
pub mod config;
pub mod dispatcher;
pub mod equip;
pub mod errors;
pub mod events;
pub mod input;
pub mod plugin;
pub mod state;
pub mod systems;
pub mod targeting;

pub use plugin::AvatarPlugin;
