//! WorldPlugin spawns the environment and owns object identity.
use bevy::prelude::*;

use crate::world::{components::ObjectIdGenerator, systems::spawn_world_environment};

pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ObjectIdGenerator>()
            .add_systems(Startup, spawn_world_environment);
    }
}
