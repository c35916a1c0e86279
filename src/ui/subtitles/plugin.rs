// src/ui/subtitles/plugin.rs
//
// SubtitlePlugin owns the presentation surface used by dialogue sessions.

use bevy::prelude::*;

use super::components::{SubtitleLayout, Subtitles};
use super::systems::{spawn_subtitle_surface, sync_subtitle_surface};

pub struct SubtitlePlugin;

impl Plugin for SubtitlePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Subtitles>()
            .init_resource::<SubtitleLayout>()
            .add_systems(Startup, spawn_subtitle_surface)
            .add_systems(PostUpdate, sync_subtitle_surface);
    }
}
