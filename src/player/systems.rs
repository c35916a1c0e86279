//! Input sampling and first-person camera control.
use bevy::{
    ecs::message::{MessageReader, MessageWriter},
    input::{mouse::MouseMotion, ButtonInput},
    prelude::*,
    window::{CursorGrabMode, CursorOptions},
};

use crate::player::{
    components::{FirstPersonCamera, PlayerControl},
    events::{InteractPressed, MovementPressed},
};

const MOVEMENT_KEYS: [KeyCode; 5] = [
    KeyCode::KeyW,
    KeyCode::KeyA,
    KeyCode::KeyS,
    KeyCode::KeyD,
    KeyCode::Space,
];

/// Turns raw button edges into interact and movement messages.
pub fn read_player_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mut interact: MessageWriter<InteractPressed>,
    mut movement: MessageWriter<MovementPressed>,
) {
    if keyboard.just_pressed(KeyCode::KeyE) || mouse_buttons.just_pressed(MouseButton::Left) {
        interact.write(InteractPressed);
    }
    if keyboard.any_just_pressed(MOVEMENT_KEYS) {
        movement.write(MovementPressed);
    }
}

/// Locks the cursor while the player can look around and frees it otherwise.
pub fn update_cursor_grab(
    control: Res<PlayerControl>,
    mut cursor_options: Single<&mut CursorOptions>,
) {
    if !control.is_changed() {
        return;
    }
    if control.movement_enabled() {
        cursor_options.visible = false;
        cursor_options.grab_mode = CursorGrabMode::Locked;
    } else {
        cursor_options.visible = true;
        cursor_options.grab_mode = CursorGrabMode::None;
    }
}

/// Applies mouse look to the player camera.
pub fn first_person_look(
    mut motion_events: MessageReader<MouseMotion>,
    control: Res<PlayerControl>,
    time: Res<Time>,
    mut query: Query<(&mut FirstPersonCamera, &mut Transform)>,
) {
    let mut cumulative_delta = Vec2::ZERO;
    for ev in motion_events.read() {
        cumulative_delta += ev.delta;
    }

    if !control.movement_enabled() || cumulative_delta == Vec2::ZERO {
        return;
    }

    if let Ok((mut camera, mut transform)) = query.single_mut() {
        camera.yaw -= cumulative_delta.x * camera.look_sensitivity * time.delta_secs();
        camera.pitch -= cumulative_delta.y * camera.look_sensitivity * time.delta_secs();
        camera.pitch = camera.pitch.clamp(-1.54, 1.54);

        let rotation = Quat::from_axis_angle(Vec3::Y, camera.yaw)
            * Quat::from_axis_angle(Vec3::X, camera.pitch);
        transform.rotation = rotation.normalize();
    }
}

/// Walks the player across the ground plane with WASD.
pub fn first_person_move(
    keyboard: Res<ButtonInput<KeyCode>>,
    control: Res<PlayerControl>,
    time: Res<Time>,
    mut query: Query<(&FirstPersonCamera, &mut Transform)>,
) {
    if !control.movement_enabled() {
        return;
    }
    let Ok((camera, mut transform)) = query.single_mut() else {
        return;
    };

    let flatten = |v: Vec3| Vec3::new(v.x, 0.0, v.z).normalize_or_zero();
    let forward = flatten(transform.forward().as_vec3());
    let right = flatten(transform.right().as_vec3());

    let mut direction = Vec3::ZERO;
    if keyboard.pressed(KeyCode::KeyW) {
        direction += forward;
    }
    if keyboard.pressed(KeyCode::KeyS) {
        direction -= forward;
    }
    if keyboard.pressed(KeyCode::KeyA) {
        direction -= right;
    }
    if keyboard.pressed(KeyCode::KeyD) {
        direction += right;
    }

    if direction.length_squared() > 0.0 {
        let modifier = if keyboard.pressed(KeyCode::ShiftLeft) {
            1.8
        } else {
            1.0
        };
        transform.translation +=
            direction.normalize() * camera.move_speed * modifier * time.delta_secs();
    }
}

pub fn yaw_pitch_from_transform(transform: &Transform) -> (f32, f32) {
    let forward = -transform.forward().as_vec3();
    let yaw = forward.x.atan2(forward.z);
    let pitch = forward.y.asin();
    (yaw, pitch)
}
