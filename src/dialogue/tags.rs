//! Decoding of story tag tokens into side-effect commands.
use bevy::prelude::*;

use crate::progression::state::SaveKey;

const KEY: &str = "key";
const ARBITRARY_KEY: &str = "akey";
const PLAY_MUSIC: &str = "play_music";
const STOP_MUSIC: &str = "stop_music";
const CHANGE_MUSIC: &str = "change_music";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagCommand {
    DefineKey(SaveKey),
    DefineArbitraryKey(String),
    PlayMusic,
    StopMusic,
    ChangeMusic(String),
}

/// Decodes a segment's tag list left to right.
///
/// Argument-taking commands consume the following token, which is never
/// itself matched as a command. Unknown tokens are skipped. A command whose
/// argument is missing, or a `key` naming no known key, is dropped with a
/// warning; everything decoded before it is kept.
pub fn decode_tags(tags: &[String]) -> Vec<TagCommand> {
    let mut commands = Vec::new();
    let mut index = 0;

    while index < tags.len() {
        let token = tags[index].as_str();
        let argument = tags.get(index + 1).map(String::as_str);

        let (command, consumed) = match token {
            PLAY_MUSIC => (Some(TagCommand::PlayMusic), 1),
            STOP_MUSIC => (Some(TagCommand::StopMusic), 1),
            KEY | ARBITRARY_KEY | CHANGE_MUSIC => match argument {
                Some(argument) => (decode_with_argument(token, argument), 2),
                None => {
                    warn!(target: "tags", "Dropping '{token}': missing argument");
                    (None, 1)
                }
            },
            _ => (None, 1),
        };

        if let Some(command) = command {
            commands.push(command);
        }
        index += consumed;
    }

    commands
}

fn decode_with_argument(token: &str, argument: &str) -> Option<TagCommand> {
    match token {
        KEY => match argument.parse::<SaveKey>() {
            Ok(key) => Some(TagCommand::DefineKey(key)),
            Err(err) => {
                warn!(target: "tags", "Dropping '{token} {argument}': {err}");
                None
            }
        },
        ARBITRARY_KEY => Some(TagCommand::DefineArbitraryKey(argument.to_string())),
        CHANGE_MUSIC => Some(TagCommand::ChangeMusic(argument.to_string())),
        _ => None,
    }
}
