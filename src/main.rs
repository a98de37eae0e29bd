use bevy::prelude::*;

mod avatar;
mod core;
mod ui;
mod world;

use crate::{
    avatar::{config::InteractionSettings, AvatarPlugin},
    core::CorePlugin,
    ui::UiPlugin,
    world::WorldPlugin,
};

fn main() {
    let mut app = App::new();
    app.add_plugins(DefaultPlugins);

    // Loaded after DefaultPlugins so config warnings reach the log.
    let settings = InteractionSettings::load_or_default();

    app.add_plugins((
        CorePlugin::with_time_scale(settings.time_scale),
        WorldPlugin,
        AvatarPlugin::new(settings), // After WorldPlugin so object ids are available at spawn
        UiPlugin,
    ))
    .run();
}
