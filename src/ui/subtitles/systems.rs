// src/ui/subtitles/systems.rs
//
// Systems spawning the subtitle surface and mirroring `Subtitles` into it.

use bevy::prelude::*;

use super::components::{SubtitleLayout, SubtitleRoot, SubtitleText, Subtitles};

const BACKGROUND_COLOR: Color = Color::srgba(0.0, 0.0, 0.0, 0.55);

/// Spawns the (hidden) subtitle surface at the bottom centre of the screen.
pub fn spawn_subtitle_surface(mut commands: Commands, layout: Res<SubtitleLayout>) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                bottom: Val::Px(layout.bottom_offset),
                left: Val::Percent((100.0 - layout.width_percent) / 2.0),
                width: Val::Percent(layout.width_percent),
                padding: UiRect::all(Val::Px(layout.padding)),
                justify_content: JustifyContent::Center,
                display: Display::None,
                ..default()
            },
            BackgroundColor(BACKGROUND_COLOR),
            SubtitleRoot,
            Name::new("Subtitle Surface"),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: layout.font_size,
                    ..default()
                },
                TextColor(Color::WHITE),
                SubtitleText,
            ));
        });
}

/// Applies visibility, text, colour and font whenever `Subtitles` changes.
pub fn sync_subtitle_surface(
    subtitles: Res<Subtitles>,
    asset_server: Res<AssetServer>,
    mut roots: Query<&mut Node, With<SubtitleRoot>>,
    mut texts: Query<(&mut Text, &mut TextColor, &mut TextFont), With<SubtitleText>>,
) {
    if !subtitles.is_changed() {
        return;
    }

    for mut node in roots.iter_mut() {
        node.display = if subtitles.is_visible() {
            Display::Flex
        } else {
            Display::None
        };
    }

    for (mut text, mut color, mut font) in texts.iter_mut() {
        if text.0 != subtitles.text() {
            text.0 = subtitles.text().to_string();
        }
        color.0 = subtitles.color();

        let handle = if subtitles.font().is_empty() {
            Handle::default()
        } else {
            asset_server.load(subtitles.font().to_string())
        };
        if font.font != handle {
            font.font = handle;
        }
    }
}
