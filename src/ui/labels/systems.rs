// src/ui/labels/systems.rs
//
// Systems spawning, positioning and outlining interactable labels, plus the
// centre-screen interaction prompt.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::interaction::components::InteractableLabel;
use crate::player::components::Player;

use super::components::{
    FloatingLabel, InteractionPrompt, LabelSettings, LabelTracker, LabelUiRoot,
};

const BACKGROUND_COLOR: Color = Color::srgba(0.05, 0.05, 0.05, 0.7);
const TEXT_COLOR: Color = Color::srgb(0.95, 0.93, 0.88);
const PADDING_PX: f32 = 5.0;

/// Creates the overlay root and the hidden prompt.
pub fn setup_label_root(mut commands: Commands, settings: Res<LabelSettings>) {
    let root = commands
        .spawn(Node {
            position_type: PositionType::Absolute,
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        })
        .insert(ZIndex(50))
        .insert(BackgroundColor(Color::NONE))
        .id();
    commands.insert_resource(LabelUiRoot(root));

    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            top: Val::Percent(54.0),
            width: Val::Percent(100.0),
            justify_content: JustifyContent::Center,
            display: Display::None,
            ..default()
        },
        Text::new(""),
        TextFont {
            font_size: settings.prompt_font_size,
            ..default()
        },
        TextColor(TEXT_COLOR),
        InteractionPrompt,
        Name::new("Interaction Prompt"),
    ));
}

/// Spawns a floating label node for every new interactable label.
pub fn spawn_floating_labels(
    mut commands: Commands,
    mut tracker: ResMut<LabelTracker>,
    settings: Res<LabelSettings>,
    root: Res<LabelUiRoot>,
    added: Query<(Entity, &InteractableLabel), Added<InteractableLabel>>,
) {
    for (target, label) in added.iter() {
        if label.text.is_empty() || tracker.by_target.contains_key(&target) {
            continue;
        }

        let node = commands
            .spawn((
                Node {
                    position_type: PositionType::Absolute,
                    padding: UiRect::all(Val::Px(PADDING_PX)),
                    display: Display::None,
                    ..default()
                },
                BackgroundColor(BACKGROUND_COLOR),
                Outline::new(Val::Px(0.0), Val::Px(1.0), Color::NONE),
                FloatingLabel::new(target),
                Text::new(label.text.clone()),
                TextFont {
                    font_size: settings.font_size,
                    ..default()
                },
                TextColor(TEXT_COLOR),
            ))
            .id();

        commands.entity(root.0).add_child(node);
        tracker.by_target.insert(target, node);
    }
}

/// Moves labels to their interactable's screen position and applies the
/// visibility and outline state.
pub fn update_floating_labels(
    mut commands: Commands,
    settings: Res<LabelSettings>,
    mut tracker: ResMut<LabelTracker>,
    camera_query: Query<(&Camera, &GlobalTransform), With<Player>>,
    window_query: Query<&Window, With<PrimaryWindow>>,
    targets: Query<(&GlobalTransform, &InteractableLabel)>,
    mut nodes: Query<(Entity, &FloatingLabel, &mut Node, &mut Outline)>,
) {
    let Ok((camera, camera_transform)) = camera_query.single() else {
        return;
    };
    let Ok(window) = window_query.single() else {
        return;
    };
    let window_height = window.resolution.height();

    for (entity, floating, mut node, mut outline) in nodes.iter_mut() {
        let Ok((target_transform, label)) = targets.get(floating.target()) else {
            tracker.by_target.remove(&floating.target());
            commands.entity(entity).despawn();
            continue;
        };

        if !label.visible {
            node.display = Display::None;
            continue;
        }

        let mut world_position = target_transform.translation();
        world_position.y += settings.vertical_offset;
        let Ok(viewport_position) = camera.world_to_viewport(camera_transform, world_position)
        else {
            node.display = Display::None;
            continue;
        };

        node.display = Display::Flex;
        node.left = Val::Px(viewport_position.x);
        node.top = Val::Px(window_height - viewport_position.y);

        if label.is_highlighted() {
            outline.width = Val::Px(label.outline_width * settings.outline_scale);
            outline.color = label.outline_color;
        } else {
            outline.width = Val::Px(0.0);
            outline.color = Color::NONE;
        }
    }
}

/// Text and colour for the prompt, taken from the first highlighted label.
pub fn prompt_for<'a>(
    labels: impl IntoIterator<Item = &'a InteractableLabel>,
) -> Option<(String, Color)> {
    labels
        .into_iter()
        .find(|label| label.visible && label.is_highlighted() && !label.text.is_empty())
        .map(|label| (format!("[E] {}", label.text), label.outline_color))
}

pub fn update_interaction_prompt(
    labels: Query<&InteractableLabel>,
    mut prompt: Query<(&mut Node, &mut Text, &mut TextColor), With<InteractionPrompt>>,
) {
    let Ok((mut node, mut text, mut color)) = prompt.single_mut() else {
        return;
    };

    match prompt_for(labels.iter()) {
        Some((content, outline)) => {
            node.display = Display::Flex;
            if text.0 != content {
                text.0 = content;
            }
            color.0 = if outline == Color::BLACK {
                TEXT_COLOR
            } else {
                outline
            };
        }
        None => node.display = Display::None,
    }
}
