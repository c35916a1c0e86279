//! Player plugin wiring input and camera systems.
use bevy::prelude::*;

use crate::player::{
    components::PlayerControl,
    events::{InteractPressed, MovementPressed},
    systems::{
        first_person_look, first_person_move, read_player_input, update_cursor_grab,
    },
};

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlayerControl>()
            .add_message::<InteractPressed>()
            .add_message::<MovementPressed>()
            .add_systems(
                Update,
                (
                    read_player_input,
                    update_cursor_grab,
                    first_person_look.after(update_cursor_grab),
                    first_person_move,
                ),
            );
    }
}
