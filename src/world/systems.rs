//! Systems for the world module: the demo grounds and door visuals.
use std::{f32::consts::FRAC_PI_2, time::Duration};

use bevy::{math::primitives::Plane3d, prelude::*};

use crate::{
    dialogue::session::CompletionAction,
    interaction::components::{
        DialogueTrigger, GatedDoor, Interactable, InteractableKind, InteractableLabel,
        PassiveLabel, ProbeTarget, ProximityZone, SceneDoor,
    },
    player::{
        components::{FirstPersonCamera, Player},
        systems::yaw_pitch_from_transform,
    },
    progression::state::SaveKey,
    world::components::{DoorPanel, SpawnPoint},
};

const GROUND_SCALE: f32 = 100.0;
const EYE_HEIGHT: f32 = 1.7;
const PLAYER_START: Vec3 = Vec3::new(0.0, EYE_HEIGHT, 8.0);
const GREENHOUSE_ORIGIN: Vec3 = Vec3::new(40.0, 0.0, 0.0);
const ZONE_MARGIN: Vec3 = Vec3::new(1.5, 1.0, 1.5);

/// Spawns the ground plane, light, and the first-person player camera.
pub fn spawn_world_environment(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        Mesh3d(meshes.add(Mesh::from(Plane3d::default()))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb_u8(62, 74, 58),
            perceptual_roughness: 0.95,
            metallic: 0.0,
            ..default()
        })),
        Transform::from_scale(Vec3::splat(GROUND_SCALE)),
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 4_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(-12.0, 20.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    let mut camera_transform = Transform::from_translation(PLAYER_START);
    camera_transform.look_at(Vec3::new(0.0, EYE_HEIGHT, 0.0), Vec3::Y);
    let (yaw, pitch) = yaw_pitch_from_transform(&camera_transform);

    commands.spawn((
        Camera3d::default(),
        camera_transform,
        FirstPersonCamera::new(yaw, pitch),
        Player,
        Name::new("Player"),
    ));

    commands.spawn((
        SpawnPoint {
            scene: "Porch".into(),
        },
        Transform::from_translation(PLAYER_START),
    ));
    commands.spawn((
        SpawnPoint {
            scene: "Greenhouse".into(),
        },
        Transform::from_translation(GREENHOUSE_ORIGIN + Vec3::new(0.0, EYE_HEIGHT, 6.0)),
    ));
}

/// Bundle shared by every demo interactable: a box mesh the probe can hit and
/// a proximity zone slightly larger than it.
fn interactable_body(
    meshes: &mut Assets<Mesh>,
    material: Handle<StandardMaterial>,
    position: Vec3,
    size: Vec3,
) -> impl Bundle {
    let half_extents = size * 0.5;
    (
        Mesh3d(meshes.add(Cuboid::from_size(size))),
        MeshMaterial3d(material),
        Transform::from_translation(position),
        ProbeTarget { half_extents },
        ProximityZone {
            half_extents: half_extents + ZONE_MARGIN,
        },
    )
}

/// Lays out one interactable of every kind around the porch, and a return
/// door in the greenhouse.
pub fn spawn_demo_interactables(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let wood = materials.add(StandardMaterial {
        base_color: Color::srgb_u8(96, 70, 48),
        perceptual_roughness: 0.8,
        ..default()
    });
    let paper = materials.add(StandardMaterial {
        base_color: Color::srgb_u8(222, 210, 180),
        ..default()
    });
    let glass = materials.add(StandardMaterial {
        base_color: Color::srgba(0.6, 0.8, 0.7, 0.6),
        alpha_mode: AlphaMode::Blend,
        ..default()
    });

    let greenhouse_sign = commands
        .spawn((
            Interactable::new(InteractableKind::PassiveLabel(PassiveLabel {
                auto_hide: true,
                disabled: true,
            })),
            InteractableLabel::new("The greenhouse lies east"),
            ProximityZone {
                half_extents: Vec3::new(2.5, 2.0, 2.5),
            },
            Transform::from_xyz(4.0, 1.2, 2.0),
            Name::new("Greenhouse Sign"),
        ))
        .id();

    let mut note = DialogueTrigger::new("porch_note.json");
    note.auto_play = false;
    note.skippable = true;
    note.disable_on_use = true;
    note.outline_color = Color::srgb(0.95, 0.75, 0.3);
    note.on_complete = vec![CompletionAction::SetLabelActive {
        entity: greenhouse_sign,
        active: true,
    }];
    commands.spawn((
        Interactable::new(InteractableKind::DialogueTrigger(note)),
        InteractableLabel::new("Read the note"),
        interactable_body(
            &mut meshes,
            paper,
            Vec3::new(-2.0, 1.0, 3.0),
            Vec3::new(0.4, 0.05, 0.3),
        ),
        Name::new("Porch Note"),
    ));

    let mut whisper = DialogueTrigger::new("whisper.json").auto_interact();
    whisper.auto_play_delay = Duration::from_secs(2);
    whisper.color = Some(Color::srgb(0.7, 0.8, 1.0));
    commands.spawn((
        Interactable::new(InteractableKind::DialogueTrigger(whisper)),
        InteractableLabel::new(""),
        ProximityZone {
            half_extents: Vec3::new(2.0, 2.0, 2.0),
        },
        Transform::from_xyz(0.0, 1.0, 0.5),
        Name::new("Caretaker Whisper"),
    ));

    commands.spawn((
        Interactable::new(InteractableKind::GatedDoor(GatedDoor {
            required_key: SaveKey::CellarKey,
            blocked_story: "cellar_locked.json".into(),
            open_sound: "event:/SFX/DoorOpen".into(),
            close_sound: "event:/SFX/DoorClose".into(),
            disable_on_use: false,
            disabled: false,
            open: false,
        })),
        InteractableLabel::new("Cellar door"),
        interactable_body(
            &mut meshes,
            wood.clone(),
            Vec3::new(-4.0, 1.1, -2.0),
            Vec3::new(1.2, 2.2, 0.15),
        ),
        DoorPanel,
        Name::new("Cellar Door"),
    ));

    commands.spawn((
        Interactable::new(InteractableKind::SceneDoor(SceneDoor {
            scene: "Greenhouse".into(),
            save_on_use: true,
            disabled: false,
        })),
        InteractableLabel::new("Greenhouse gate"),
        interactable_body(
            &mut meshes,
            glass,
            Vec3::new(6.0, 1.1, -2.0),
            Vec3::new(1.4, 2.2, 0.15),
        ),
        Name::new("Greenhouse Gate"),
    ));

    commands.spawn((
        Interactable::new(InteractableKind::SceneDoor(SceneDoor {
            scene: "Porch".into(),
            save_on_use: false,
            disabled: false,
        })),
        InteractableLabel::new("Back to the porch"),
        interactable_body(
            &mut meshes,
            wood,
            GREENHOUSE_ORIGIN + Vec3::new(0.0, 1.1, 9.0),
            Vec3::new(1.4, 2.2, 0.15),
        ),
        Name::new("Porch Gate"),
    ));
}

/// Swings door panels to match their gated door state.
pub fn sync_door_panels(
    mut doors: Query<(&Interactable, &mut Transform), (With<DoorPanel>, Changed<Interactable>)>,
) {
    for (interactable, mut transform) in doors.iter_mut() {
        if let InteractableKind::GatedDoor(door) = &interactable.kind {
            transform.rotation = if door.open {
                Quat::from_rotation_y(FRAC_PI_2)
            } else {
                Quat::IDENTITY
            };
        }
    }
}
