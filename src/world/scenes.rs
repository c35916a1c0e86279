//! Scene door handling: freeze the player, fade, then move them to the
//! destination spawn point.
use std::{path::PathBuf, time::Duration};

use bevy::{ecs::message::MessageReader, prelude::*};

use crate::{
    core::plugin::SimulationClock,
    dialogue::{
        session::ActiveDialogue,
        systems::DialogueEffects,
        transcript::TranscriptEntry,
    },
    interaction::{events::SceneLoadRequested, registry::InteractionRegistry},
    player::{
        components::{FirstPersonCamera, Player, PlayerControl},
        systems::yaw_pitch_from_transform,
    },
    world::components::SpawnPoint,
};

const FADE_DURATION: Duration = Duration::from_millis(600);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingScene {
    pub scene: String,
    pub remaining: Duration,
}

#[derive(Resource, Debug, Clone)]
pub struct SceneTransition {
    pub pending: Option<PendingScene>,
    pub fade: Duration,
    pub snapshot_path: PathBuf,
}

impl Default for SceneTransition {
    fn default() -> Self {
        Self {
            pending: None,
            fade: FADE_DURATION,
            snapshot_path: PathBuf::from("saves/progression.json"),
        }
    }
}

impl SceneTransition {
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Clears any dialogue, disables interaction and movement, and starts the
/// fade. A newer request replaces one still fading.
pub fn handle_scene_load_requests(
    mut requests: MessageReader<SceneLoadRequested>,
    mut transition: ResMut<SceneTransition>,
    mut active: ResMut<ActiveDialogue>,
    mut effects: DialogueEffects,
    mut registry: ResMut<InteractionRegistry>,
    mut control: ResMut<PlayerControl>,
) {
    for SceneLoadRequested { scene, save_on_use } in requests.read() {
        if let Some(story) = active.interrupt(&mut effects) {
            info!(target: "dialogue", "Dialogue {story} interrupted by scene load");
            effects.record(TranscriptEntry::SessionInterrupted { story });
        }
        if registry.is_enabled() {
            registry.set_enabled(false);
        }
        control.disable_movement();

        if *save_on_use {
            match effects.progression().write_snapshot(&transition.snapshot_path) {
                Ok(()) => info!(
                    "Saved progression to {}",
                    transition.snapshot_path.display()
                ),
                Err(err) => warn!(
                    "Failed to save progression to {}: {err}",
                    transition.snapshot_path.display()
                ),
            }
        }

        info!("Loading scene {scene}");
        let fade = transition.fade;
        transition.pending = Some(PendingScene {
            scene: scene.clone(),
            remaining: fade,
        });
    }
}

/// Moves the player once the fade has elapsed and hands control back.
pub fn finish_scene_transition(
    mut transition: ResMut<SceneTransition>,
    clock: Res<SimulationClock>,
    spawn_points: Query<(&SpawnPoint, &Transform), Without<Player>>,
    mut player: Query<(&mut Transform, &mut FirstPersonCamera), With<Player>>,
    mut registry: ResMut<InteractionRegistry>,
    mut control: ResMut<PlayerControl>,
) {
    let Some(pending) = transition.pending.as_mut() else {
        return;
    };
    pending.remaining = pending.remaining.saturating_sub(clock.last_scaled_delta());
    if !pending.remaining.is_zero() {
        return;
    }
    let Some(PendingScene { scene, .. }) = transition.pending.take() else {
        return;
    };

    let destination = spawn_points
        .iter()
        .find(|(point, _)| point.scene == scene)
        .map(|(_, transform)| *transform);

    match (destination, player.single_mut()) {
        (Some(destination), Ok((mut transform, mut camera))) => {
            transform.translation = destination.translation;
            transform.rotation = destination.rotation;
            let (yaw, pitch) = yaw_pitch_from_transform(&transform);
            camera.yaw = yaw;
            camera.pitch = pitch;
            info!("Arrived in {scene}");
        }
        (None, _) => warn!("No spawn point for scene {scene}; staying put"),
        (_, Err(err)) => warn!("No player to move into {scene}: {err}"),
    }

    registry.set_enabled(true);
    control.enable_movement();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        audio::events::AudioCommand,
        core::config::NarrativeSettings,
        dialogue::{
            playback::tests::RecordingHost,
            session::SessionOptions,
            story::{Segment, StoryDocument},
            transcript::DialogueTranscript,
        },
        progression::state::ProgressionState,
        ui::subtitles::Subtitles,
    };

    fn test_app() -> App {
        let mut settings = NarrativeSettings::default();
        settings.transcript.log_path = std::env::temp_dir().join("hollowlight-scenes-test.jsonl");

        let mut app = App::new();
        app.insert_resource(settings)
            .insert_resource(SimulationClock::default())
            .insert_resource(ProgressionState::new_game(false))
            .insert_resource(SceneTransition {
                snapshot_path: std::env::temp_dir()
                    .join("hollowlight-scenes-test")
                    .join("progression.json"),
                ..Default::default()
            })
            .init_resource::<Subtitles>()
            .init_resource::<DialogueTranscript>()
            .init_resource::<ActiveDialogue>()
            .init_resource::<InteractionRegistry>()
            .init_resource::<PlayerControl>()
            .add_message::<AudioCommand>()
            .add_message::<SceneLoadRequested>()
            .add_systems(
                Update,
                (handle_scene_load_requests, finish_scene_transition).chain(),
            );
        app
    }

    fn step(app: &mut App, delta: Duration) {
        app.world_mut()
            .resource_mut::<SimulationClock>()
            .tick(delta);
        app.update();
    }

    fn request(app: &mut App, scene: &str, save_on_use: bool) {
        app.world_mut().write_message(SceneLoadRequested {
            scene: scene.into(),
            save_on_use,
        });
    }

    #[test]
    fn scene_load_freezes_then_teleports_player() {
        let mut app = test_app();
        app.world_mut().spawn((
            SpawnPoint {
                scene: "Greenhouse".into(),
            },
            Transform::from_xyz(30.0, 1.7, 0.0),
        ));
        let player = app
            .world_mut()
            .spawn((Player, FirstPersonCamera::new(0.0, 0.0), Transform::default()))
            .id();

        request(&mut app, "Greenhouse", false);
        step(&mut app, Duration::ZERO);

        assert!(app.world().resource::<SceneTransition>().is_pending());
        assert!(!app.world().resource::<InteractionRegistry>().is_enabled());
        assert!(!app.world().resource::<PlayerControl>().movement_enabled());

        step(&mut app, Duration::from_secs(1));

        assert!(!app.world().resource::<SceneTransition>().is_pending());
        assert!(app.world().resource::<InteractionRegistry>().is_enabled());
        assert!(app.world().resource::<PlayerControl>().movement_enabled());
        let translation = app
            .world()
            .get::<Transform>(player)
            .expect("player transform")
            .translation;
        assert_eq!(translation, Vec3::new(30.0, 1.7, 0.0));
    }

    #[test]
    fn scene_load_interrupts_active_dialogue() {
        let mut app = test_app();
        let settings = NarrativeSettings::default();
        let mut host = RecordingHost::default();
        app.world_mut().resource_mut::<Subtitles>().show();
        app.world_mut()
            .resource_mut::<ActiveDialogue>()
            .init(
                Box::new(StoryDocument::new(vec![Segment::new("Wait.")])),
                SessionOptions {
                    story: "whisper".into(),
                    ..Default::default()
                },
                &settings.dialogue,
                &mut host,
            )
            .expect("session starts");

        request(&mut app, "Porch", false);
        step(&mut app, Duration::ZERO);

        assert!(!app.world().resource::<ActiveDialogue>().is_active());
        assert!(!app.world().resource::<Subtitles>().is_visible());
        let interrupted = app
            .world()
            .resource::<DialogueTranscript>()
            .records()
            .any(|record| matches!(record.entry, TranscriptEntry::SessionInterrupted { .. }));
        assert!(interrupted);
    }

    #[test]
    fn save_on_use_writes_snapshot() {
        let mut app = test_app();
        let path = app.world().resource::<SceneTransition>().snapshot_path.clone();
        let _ = std::fs::remove_file(&path);

        request(&mut app, "Greenhouse", true);
        step(&mut app, Duration::ZERO);

        let saved = std::fs::read_to_string(&path).expect("snapshot written");
        assert!(saved.contains("arbitrary_keys"));
    }

    #[test]
    fn missing_spawn_point_still_restores_control() {
        let mut app = test_app();
        app.world_mut()
            .spawn((Player, FirstPersonCamera::new(0.0, 0.0), Transform::default()));

        request(&mut app, "Nowhere", false);
        step(&mut app, Duration::ZERO);
        step(&mut app, Duration::from_secs(1));

        assert!(app.world().resource::<PlayerControl>().movement_enabled());
        assert!(app.world().resource::<InteractionRegistry>().is_enabled());
    }
}
