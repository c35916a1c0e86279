//! Per-frame targeting: enablement, proximity, aim, and interact routing.
use bevy::{
    ecs::message::{MessageReader, MessageWriter},
    prelude::*,
};

use crate::{
    audio::events::AudioCommand,
    core::config::{InteractionSettings, NarrativeSettings},
    dialogue::{events::DialogueStartRequested, session::ActiveDialogue},
    interaction::{
        components::{
            EnableOutcome, InProximity, InteractOutcome, Interactable, InteractableLabel,
            ProbeTarget, ProximityZone,
        },
        events::{InteractionTriggered, SceneLoadRequested},
        probe::{cast_probe, Capsule},
        registry::{InteractRequest, InteractionRegistry},
    },
    player::{
        components::{Player, PlayerControl},
        events::InteractPressed,
    },
    progression::state::ProgressionState,
};

/// The capsule hangs below the player's eye.
fn player_capsule(eye: Vec3, settings: &InteractionSettings) -> Capsule {
    let height = settings.player_capsule_height;
    Capsule {
        center: eye - Vec3::Y * (height * 0.5),
        radius: settings.player_capsule_radius,
        height,
    }
}

fn enable_interactable(
    entity: Entity,
    interactable: &mut Interactable,
    label: &mut InteractableLabel,
    registry: &mut InteractionRegistry,
    triggered: &mut MessageWriter<InteractionTriggered>,
) {
    if interactable.enable(label) == EnableOutcome::AutoInteract {
        debug!(target: "interaction", "Auto-interact {entity}");
        registry.aim_at(entity);
        triggered.write(InteractionTriggered { entity });
    }
}

/// Runs queued Disable calls and the proximity rescan after re-enabling.
pub fn apply_enablement_changes(
    mut registry: ResMut<InteractionRegistry>,
    settings: Res<NarrativeSettings>,
    player: Query<&Transform, With<Player>>,
    mut interactables: Query<(
        Entity,
        &mut Interactable,
        &mut InteractableLabel,
        &Transform,
        Option<&ProximityZone>,
    )>,
    mut triggered: MessageWriter<InteractionTriggered>,
) {
    for entity in registry.take_pending_disable() {
        if let Ok((_, interactable, mut label, _, _)) = interactables.get_mut(entity) {
            interactable.disable(&mut label);
        }
    }

    if !registry.take_rescan() || !registry.is_enabled() {
        return;
    }
    let Ok(player) = player.single() else {
        return;
    };
    let capsule = player_capsule(player.translation, &settings.interaction);

    for (entity, mut interactable, mut label, transform, zone) in &mut interactables {
        let Some(zone) = zone else {
            continue;
        };
        if !capsule.overlaps_box(transform.translation, zone.half_extents) {
            continue;
        }
        enable_interactable(
            entity,
            &mut interactable,
            &mut label,
            &mut registry,
            &mut triggered,
        );
        let priority = interactable.priority();
        registry.register(entity, priority);
    }
}

pub fn forget_despawned(
    mut removed: RemovedComponents<Interactable>,
    mut registry: ResMut<InteractionRegistry>,
) {
    for entity in removed.read() {
        registry.forget(entity);
    }
}

/// Registers interactables whose zone the player entered and drops the ones
/// the player left.
pub fn track_proximity(
    mut commands: Commands,
    mut registry: ResMut<InteractionRegistry>,
    settings: Res<NarrativeSettings>,
    player: Query<&Transform, With<Player>>,
    mut interactables: Query<(
        Entity,
        &mut Interactable,
        &mut InteractableLabel,
        &Transform,
        &ProximityZone,
        Has<InProximity>,
    )>,
    mut triggered: MessageWriter<InteractionTriggered>,
) {
    let Ok(player) = player.single() else {
        return;
    };
    let capsule = player_capsule(player.translation, &settings.interaction);

    for (entity, mut interactable, mut label, transform, zone, was_inside) in &mut interactables {
        let inside = capsule.overlaps_box(transform.translation, zone.half_extents);
        match (was_inside, inside) {
            (false, true) => {
                commands.entity(entity).insert(InProximity);
                if !registry.is_enabled() {
                    continue;
                }
                let priority = interactable.priority();
                registry.register(entity, priority);
                enable_interactable(
                    entity,
                    &mut interactable,
                    &mut label,
                    &mut registry,
                    &mut triggered,
                );
            }
            (true, false) => {
                commands.entity(entity).remove::<InProximity>();
                registry.deregister(entity);
                interactable.disable(&mut label);
            }
            _ => {}
        }
    }
}

/// Casts the forward probe and moves the highlight with the aim.
pub fn update_aim(
    mut registry: ResMut<InteractionRegistry>,
    dialogue: Res<ActiveDialogue>,
    settings: Res<NarrativeSettings>,
    player: Query<&Transform, With<Player>>,
    targets: Query<(Entity, &Transform, &ProbeTarget), With<Interactable>>,
    mut labels: Query<(&Interactable, &mut InteractableLabel)>,
) {
    let hit = player.single().ok().and_then(|eye| {
        cast_probe(
            eye.translation,
            eye.forward(),
            settings.interaction.probe_max_distance,
            targets
                .iter()
                .map(|(entity, transform, target)| (entity, transform.translation, target.half_extents)),
        )
    });

    let change = registry.update_aim(hit, dialogue.is_active());
    let width = settings.interaction.highlight_outline_width;
    for (entity, highlight) in [(change.unhighlight, false), (change.highlight, true)] {
        let Some(entity) = entity else {
            continue;
        };
        if let Ok((interactable, mut label)) = labels.get_mut(entity) {
            interactable.highlight(&mut label, highlight, width);
        }
    }
}

/// Turns interact presses into a dialogue skip or an interaction.
pub fn route_interact_input(
    mut pressed: MessageReader<InteractPressed>,
    mut registry: ResMut<InteractionRegistry>,
    mut dialogue: ResMut<ActiveDialogue>,
    interactables: Query<&Interactable>,
    mut triggered: MessageWriter<InteractionTriggered>,
) {
    for _ in pressed.read() {
        let request = registry.request_interact(dialogue.is_active(), |entity| {
            interactables.get(entity).ok().map(Interactable::priority)
        });
        match request {
            InteractRequest::SkipDialogue => {
                dialogue.request_skip();
            }
            InteractRequest::Interact(entity) => {
                info!(target: "interaction", "Interacted with {entity}");
                triggered.write(InteractionTriggered { entity });
            }
            InteractRequest::Ignored => {}
        }
    }
}

/// Runs Interact and applies what it asks for.
pub fn resolve_interactions(
    mut triggered: MessageReader<InteractionTriggered>,
    mut interactables: Query<&mut Interactable>,
    progression: Res<ProgressionState>,
    mut registry: ResMut<InteractionRegistry>,
    mut control: ResMut<PlayerControl>,
    mut dialogue_starts: MessageWriter<DialogueStartRequested>,
    mut audio: MessageWriter<AudioCommand>,
    mut scenes: MessageWriter<SceneLoadRequested>,
) {
    for InteractionTriggered { entity } in triggered.read() {
        let Ok(mut interactable) = interactables.get_mut(*entity) else {
            debug!(target: "interaction", "Interact target {entity} is gone");
            continue;
        };

        match interactable.interact(*entity, &progression) {
            InteractOutcome::Nothing => {}
            InteractOutcome::StartDialogue {
                options,
                disable_movement,
            } => {
                registry.set_enabled(false);
                if disable_movement {
                    control.disable_movement();
                }
                dialogue_starts.write(DialogueStartRequested { options });
            }
            InteractOutcome::PlaySound(cue) => {
                audio.write(AudioCommand::PlayCue(cue));
            }
            InteractOutcome::LoadScene { scene, save_on_use } => {
                scenes.write(SceneLoadRequested { scene, save_on_use });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::message::Messages;
    use crate::interaction::components::{DialogueTrigger, InteractableKind, PassiveLabel};

    fn test_app() -> App {
        let mut app = App::new();
        app.insert_resource(NarrativeSettings::default())
            .insert_resource(ProgressionState::new_game(false))
            .init_resource::<InteractionRegistry>()
            .init_resource::<ActiveDialogue>()
            .init_resource::<PlayerControl>()
            .add_message::<InteractPressed>()
            .add_message::<InteractionTriggered>()
            .add_message::<SceneLoadRequested>()
            .add_message::<DialogueStartRequested>()
            .add_message::<AudioCommand>()
            .add_systems(
                Update,
                (
                    apply_enablement_changes,
                    forget_despawned,
                    track_proximity,
                    update_aim,
                    route_interact_input,
                    resolve_interactions,
                )
                    .chain(),
            );
        app
    }

    fn spawn_player(app: &mut App, at: Vec3) -> Entity {
        app.world_mut()
            .spawn((Player, Transform::from_translation(at).looking_to(Vec3::NEG_Z, Vec3::Y)))
            .id()
    }

    fn spawn_trigger(app: &mut App, at: Vec3, trigger: DialogueTrigger) -> Entity {
        app.world_mut()
            .spawn((
                Interactable::new(InteractableKind::DialogueTrigger(trigger)),
                InteractableLabel::new("Read"),
                ProbeTarget {
                    half_extents: Vec3::splat(0.5),
                },
                ProximityZone {
                    half_extents: Vec3::splat(2.0),
                },
                Transform::from_translation(at),
            ))
            .id()
    }

    fn label(app: &App, entity: Entity) -> &InteractableLabel {
        app.world()
            .get::<InteractableLabel>(entity)
            .expect("label present")
    }

    #[test]
    fn entering_zone_registers_and_aiming_highlights() {
        let mut app = test_app();
        spawn_player(&mut app, Vec3::new(0.0, 1.5, 0.0));
        let note = spawn_trigger(&mut app, Vec3::new(0.0, 1.5, -2.0), DialogueTrigger::new("note"));

        app.update();

        let registry = app.world().resource::<InteractionRegistry>();
        assert!(registry.contains(note));
        assert_eq!(registry.aimed_at(), Some(note));
        assert!(label(&app, note).visible);
        assert!(label(&app, note).is_highlighted());
        assert!(app.world().get::<InProximity>(note).is_some());
    }

    #[test]
    fn aimed_but_out_of_range_object_is_not_highlighted() {
        let mut app = test_app();
        spawn_player(&mut app, Vec3::new(0.0, 1.5, 0.0));
        let far = spawn_trigger(&mut app, Vec3::new(0.0, 1.5, -7.0), DialogueTrigger::new("far"));

        app.update();

        let registry = app.world().resource::<InteractionRegistry>();
        assert_eq!(registry.aimed_at(), Some(far));
        assert!(!registry.contains(far));
        assert!(!label(&app, far).is_highlighted());
    }

    #[test]
    fn interact_press_starts_dialogue_and_disables_interaction() {
        let mut app = test_app();
        spawn_player(&mut app, Vec3::new(0.0, 1.5, 0.0));
        let mut trigger = DialogueTrigger::new("note");
        trigger.auto_play = false;
        let note = spawn_trigger(&mut app, Vec3::new(0.0, 1.5, -2.0), trigger);
        app.update();

        app.world_mut().write_message(InteractPressed);
        app.update();

        let registry = app.world().resource::<InteractionRegistry>();
        assert!(!registry.is_enabled());
        assert!(!app.world().resource::<PlayerControl>().movement_enabled());

        let starts = app.world().resource::<Messages<DialogueStartRequested>>();
        let mut cursor = starts.get_cursor();
        let started: Vec<_> = cursor.read(starts).collect();
        assert_eq!(started.len(), 1);
        assert_eq!(started[0].options.story, "note");
        assert_eq!(started[0].options.source, Some(note));

        // Label hides on the next frame once queued Disable runs.
        app.update();
        assert!(!label(&app, note).visible);
    }

    #[test]
    fn auto_interact_trigger_fires_on_enter() {
        let mut app = test_app();
        spawn_player(&mut app, Vec3::new(0.0, 1.5, 0.0));
        let whisper = spawn_trigger(
            &mut app,
            Vec3::new(4.0, 1.5, 0.0),
            DialogueTrigger::new("whisper").auto_interact(),
        );
        app.update();

        // Not yet in range; the aim is elsewhere.
        assert!(!app.world().resource::<InteractionRegistry>().contains(whisper));

        app.world_mut()
            .get_mut::<Transform>(whisper)
            .expect("transform")
            .translation = Vec3::new(1.0, 1.5, 0.0);
        app.update();

        let starts = app.world().resource::<Messages<DialogueStartRequested>>();
        let mut cursor = starts.get_cursor();
        let started: Vec<_> = cursor.read(starts).collect();
        assert_eq!(started.len(), 1);
        assert_eq!(started[0].options.story, "whisper");
    }

    #[test]
    fn leaving_zone_deregisters_and_hides_label() {
        let mut app = test_app();
        let player = spawn_player(&mut app, Vec3::new(0.0, 1.5, 0.0));
        let sign = app
            .world_mut()
            .spawn((
                Interactable::new(InteractableKind::PassiveLabel(PassiveLabel {
                    auto_hide: true,
                    disabled: false,
                })),
                InteractableLabel::new("Greenhouse"),
                ProximityZone {
                    half_extents: Vec3::splat(1.0),
                },
                Transform::from_xyz(1.0, 1.5, 0.0),
            ))
            .id();
        app.update();
        assert!(label(&app, sign).visible);

        app.world_mut()
            .get_mut::<Transform>(player)
            .expect("transform")
            .translation = Vec3::new(10.0, 1.5, 0.0);
        app.update();

        assert!(!app.world().resource::<InteractionRegistry>().contains(sign));
        assert!(!label(&app, sign).visible);
    }

    #[test]
    fn despawned_interactables_are_forgotten() {
        let mut app = test_app();
        spawn_player(&mut app, Vec3::new(0.0, 1.5, 0.0));
        let note = spawn_trigger(&mut app, Vec3::new(0.0, 1.5, -2.0), DialogueTrigger::new("note"));
        app.update();

        app.world_mut().entity_mut(note).despawn();
        app.update();

        let registry = app.world().resource::<InteractionRegistry>();
        assert!(!registry.contains(note));
        assert_eq!(registry.aimed_at(), None);
    }

    #[test]
    fn reenable_then_disable_in_one_frame_stays_quiet() {
        let mut app = test_app();
        spawn_player(&mut app, Vec3::new(0.0, 1.5, 0.0));
        app.world_mut()
            .resource_mut::<InteractionRegistry>()
            .set_enabled(false);
        let whisper = spawn_trigger(
            &mut app,
            Vec3::new(1.0, 1.5, 0.0),
            DialogueTrigger::new("whisper").auto_interact(),
        );
        let sign = app
            .world_mut()
            .spawn((
                Interactable::new(InteractableKind::PassiveLabel(PassiveLabel {
                    auto_hide: true,
                    disabled: false,
                })),
                InteractableLabel::new("Greenhouse"),
                ProximityZone {
                    half_extents: Vec3::splat(1.0),
                },
                Transform::from_xyz(-1.0, 1.5, 0.0),
            ))
            .id();
        app.update();

        // A session ends and a scene load follows within the same frame.
        {
            let mut registry = app.world_mut().resource_mut::<InteractionRegistry>();
            registry.set_enabled(true);
            registry.set_enabled(false);
        }
        app.update();

        assert!(!label(&app, sign).visible);
        assert!(!label(&app, whisper).visible);
        let registry = app.world().resource::<InteractionRegistry>();
        assert!(registry.members().is_empty());

        let starts = app.world().resource::<Messages<DialogueStartRequested>>();
        let mut cursor = starts.get_cursor();
        assert_eq!(cursor.read(starts).count(), 0);
    }

    #[test]
    fn reenabling_rescans_the_capsule() {
        let mut app = test_app();
        spawn_player(&mut app, Vec3::new(0.0, 1.5, 0.0));
        app.world_mut()
            .resource_mut::<InteractionRegistry>()
            .set_enabled(false);
        let note = spawn_trigger(&mut app, Vec3::new(0.0, 1.5, -2.0), DialogueTrigger::new("note"));
        app.update();
        assert!(!app.world().resource::<InteractionRegistry>().contains(note));

        app.world_mut()
            .resource_mut::<InteractionRegistry>()
            .set_enabled(true);
        app.update();

        assert!(app.world().resource::<InteractionRegistry>().contains(note));
        assert!(label(&app, note).visible);
    }
}
