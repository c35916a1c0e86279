// src/ui/mod.rs
//
// UI module providing screen-space elements for dialogue and interaction.
//
// Current features:
// - Subtitle surface for dialogue playback
// - Floating interactable labels and the interaction prompt

pub mod labels;
pub mod subtitles;

use bevy::prelude::*;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        info!("UiPlugin registered");
        app.add_plugins((subtitles::SubtitlePlugin, labels::LabelPlugin));
    }
}
