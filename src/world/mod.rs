//! World module housing environment setup, object identity and the ray probe.
pub mod components;
pub mod plugin;
pub mod probe;
pub mod systems;

pub use plugin::WorldPlugin;
