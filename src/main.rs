use std::path::Path;

use bevy::prelude::*;

mod audio;
mod core;
mod dialogue;
mod interaction;
mod player;
mod progression;
mod ui;
mod world;

use crate::{
    audio::AudioServicePlugin, core::CorePlugin, dialogue::DialoguePlugin,
    interaction::InteractionPlugin, player::PlayerPlugin, progression::ProgressionPlugin,
    ui::UiPlugin, world::WorldPlugin,
};

fn main() {
    load_dev_env();

    App::new()
        .add_plugins((
            DefaultPlugins,
            CorePlugin::default(),
            ProgressionPlugin,
            AudioServicePlugin,
            PlayerPlugin,
            InteractionPlugin,
            DialoguePlugin,
            UiPlugin,
            WorldPlugin,
        ))
        .run();
}

/// Loads `dev.env` (e.g. `RUST_LOG=interaction=debug`) before the log plugin
/// reads the environment.
fn load_dev_env() {
    const DEV_ENV_FILE: &str = "dev.env";

    let path = Path::new(DEV_ENV_FILE);
    if !path.exists() {
        return;
    }

    if let Err(err) = dotenvy::from_filename(path) {
        eprintln!("Failed to load {}: {}", DEV_ENV_FILE, err);
    }
}
