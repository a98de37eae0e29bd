//! Core timing: scaled simulation clock and the repeating task scheduler.
pub mod plugin;
pub mod scheduler;

pub use plugin::CorePlugin;
