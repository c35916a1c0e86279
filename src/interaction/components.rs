//! Interactable components and the per-kind behaviour behind them.
use std::time::Duration;

use bevy::prelude::*;

use crate::{
    dialogue::session::{CompletionAction, SessionOptions},
    progression::state::{ProgressionState, SaveKey},
};

/// Priority reported by objects that must not be registered or kept.
pub const INELIGIBLE_PRIORITY: i32 = -1;

const DEFAULT_PRIORITY: i32 = 0;
const LABEL_PRIORITY: i32 = 100;

/// A world object the player can aim at and act on.
#[derive(Component, Debug, Clone)]
pub struct Interactable {
    pub kind: InteractableKind,
}

#[derive(Debug, Clone)]
pub enum InteractableKind {
    DialogueTrigger(DialogueTrigger),
    SceneDoor(SceneDoor),
    GatedDoor(GatedDoor),
    PassiveLabel(PassiveLabel),
}

/// Plays a story when used.
#[derive(Debug, Clone)]
pub struct DialogueTrigger {
    pub story: String,
    pub skippable: bool,
    pub auto_play: bool,
    pub auto_play_delay: Duration,
    pub sound: Option<String>,
    pub font: Option<String>,
    pub color: Option<Color>,
    pub outline_color: Color,
    /// Fires on the first Enable instead of showing the label.
    pub auto_interact: bool,
    pub disable_on_use: bool,
    pub destroy_on_use: bool,
    pub disabled: bool,
    /// Extra effects run after the story completes.
    pub on_complete: Vec<CompletionAction>,
}

impl DialogueTrigger {
    pub fn new(story: impl Into<String>) -> Self {
        Self {
            story: story.into(),
            skippable: false,
            auto_play: true,
            auto_play_delay: Duration::ZERO,
            sound: None,
            font: None,
            color: None,
            outline_color: Color::WHITE,
            auto_interact: false,
            disable_on_use: false,
            destroy_on_use: false,
            disabled: false,
            on_complete: Vec::new(),
        }
    }

    /// Auto-interact triggers always destroy themselves after use.
    pub fn auto_interact(mut self) -> Self {
        self.auto_interact = true;
        self.destroy_on_use = true;
        self
    }
}

/// Requests a scene change when used.
#[derive(Debug, Clone)]
pub struct SceneDoor {
    pub scene: String,
    pub save_on_use: bool,
    pub disabled: bool,
}

/// A door that opens only once a progression key is held.
#[derive(Debug, Clone)]
pub struct GatedDoor {
    pub required_key: SaveKey,
    pub blocked_story: String,
    pub open_sound: String,
    pub close_sound: String,
    pub disable_on_use: bool,
    pub disabled: bool,
    pub open: bool,
}

/// Informational text that shows while the player is nearby.
#[derive(Debug, Clone)]
pub struct PassiveLabel {
    pub auto_hide: bool,
    pub disabled: bool,
}

/// Floating label shown next to an interactable.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct InteractableLabel {
    pub text: String,
    pub visible: bool,
    pub outline_width: f32,
    pub outline_color: Color,
}

impl InteractableLabel {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            visible: false,
            outline_width: 0.0,
            outline_color: Color::BLACK,
        }
    }

    pub fn is_highlighted(&self) -> bool {
        self.outline_width > 0.0
    }

    fn outline(&mut self, highlight: bool, width: f32, color: Color) {
        if highlight {
            self.outline_width = width;
            self.outline_color = color;
        } else {
            self.outline_width = 0.0;
        }
    }
}

/// Box the forward probe can hit, centred on the entity's translation.
#[derive(Component, Debug, Clone, Copy)]
pub struct ProbeTarget {
    pub half_extents: Vec3,
}

/// Trigger volume that registers the interactable while the player overlaps it.
#[derive(Component, Debug, Clone, Copy)]
pub struct ProximityZone {
    pub half_extents: Vec3,
}

/// Present while the player's capsule overlaps the entity's `ProximityZone`.
#[derive(Component, Debug, Default)]
pub struct InProximity;

/// Result of running Enable on an interactable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnableOutcome {
    Ignored,
    Shown,
    /// The object wants to be interacted with right away.
    AutoInteract,
}

/// Effect requested by Interact; applied by the interaction systems.
#[derive(Debug, Clone)]
pub enum InteractOutcome {
    Nothing,
    StartDialogue {
        options: SessionOptions,
        disable_movement: bool,
    },
    PlaySound(String),
    LoadScene {
        scene: String,
        save_on_use: bool,
    },
}

impl Interactable {
    pub fn new(kind: InteractableKind) -> Self {
        Self { kind }
    }

    pub fn priority(&self) -> i32 {
        match &self.kind {
            InteractableKind::DialogueTrigger(DialogueTrigger { disabled, .. })
            | InteractableKind::SceneDoor(SceneDoor { disabled, .. })
            | InteractableKind::GatedDoor(GatedDoor { disabled, .. }) => {
                if *disabled {
                    INELIGIBLE_PRIORITY
                } else {
                    DEFAULT_PRIORITY
                }
            }
            InteractableKind::PassiveLabel(_) => LABEL_PRIORITY,
        }
    }

    /// Colour of the highlight outline. Labels never highlight.
    pub fn outline_color(&self) -> Option<Color> {
        match &self.kind {
            InteractableKind::DialogueTrigger(trigger) => Some(trigger.outline_color),
            InteractableKind::SceneDoor(_) | InteractableKind::GatedDoor(_) => Some(Color::BLACK),
            InteractableKind::PassiveLabel(_) => None,
        }
    }

    fn is_disabled(&self) -> bool {
        match &self.kind {
            InteractableKind::DialogueTrigger(DialogueTrigger { disabled, .. })
            | InteractableKind::SceneDoor(SceneDoor { disabled, .. })
            | InteractableKind::GatedDoor(GatedDoor { disabled, .. })
            | InteractableKind::PassiveLabel(PassiveLabel { disabled, .. }) => *disabled,
        }
    }

    pub fn enable(&mut self, label: &mut InteractableLabel) -> EnableOutcome {
        if self.is_disabled() {
            return EnableOutcome::Ignored;
        }
        if let InteractableKind::DialogueTrigger(trigger) = &mut self.kind {
            if trigger.auto_interact {
                trigger.auto_interact = false;
                return EnableOutcome::AutoInteract;
            }
        }
        label.visible = true;
        EnableOutcome::Shown
    }

    pub fn disable(&self, label: &mut InteractableLabel) {
        match &self.kind {
            InteractableKind::PassiveLabel(passive) if !passive.auto_hide => {}
            _ => label.visible = false,
        }
    }

    pub fn highlight(&self, label: &mut InteractableLabel, highlight: bool, outline_width: f32) {
        if self.is_disabled() {
            return;
        }
        if let Some(color) = self.outline_color() {
            label.outline(highlight, outline_width, color);
        }
    }

    /// Turns a label on or off at runtime. Other kinds ignore this.
    pub fn set_label_active(&mut self, label: &mut InteractableLabel, active: bool) {
        let InteractableKind::PassiveLabel(passive) = &mut self.kind else {
            return;
        };
        passive.disabled = !active;
        if active {
            self.enable(label);
        } else {
            self.disable(label);
        }
    }

    /// Marks a dialogue trigger or door as used up.
    pub fn mark_disabled(&mut self) {
        match &mut self.kind {
            InteractableKind::DialogueTrigger(DialogueTrigger { disabled, .. })
            | InteractableKind::SceneDoor(SceneDoor { disabled, .. })
            | InteractableKind::GatedDoor(GatedDoor { disabled, .. }) => *disabled = true,
            InteractableKind::PassiveLabel(_) => {}
        }
    }

    pub fn interact(&mut self, entity: Entity, progression: &ProgressionState) -> InteractOutcome {
        match &mut self.kind {
            InteractableKind::DialogueTrigger(trigger) => {
                if trigger.disabled {
                    return InteractOutcome::Nothing;
                }
                let mut completion = trigger.on_complete.clone();
                if trigger.disable_on_use {
                    completion.push(CompletionAction::DisableInteractable(entity));
                }
                if trigger.destroy_on_use {
                    completion.push(CompletionAction::DespawnInteractable(entity));
                }
                InteractOutcome::StartDialogue {
                    options: SessionOptions {
                        story: trigger.story.clone(),
                        skippable: trigger.skippable,
                        auto_play: trigger.auto_play,
                        auto_play_delay: trigger.auto_play_delay,
                        sound: trigger.sound.clone(),
                        font: trigger.font.clone(),
                        color: trigger.color,
                        source: Some(entity),
                        completion,
                    },
                    disable_movement: !trigger.auto_play,
                }
            }
            InteractableKind::SceneDoor(door) => InteractOutcome::LoadScene {
                scene: door.scene.clone(),
                save_on_use: door.save_on_use,
            },
            InteractableKind::GatedDoor(door) => {
                if door.disabled {
                    return InteractOutcome::Nothing;
                }
                if !progression.check_key(door.required_key) {
                    return InteractOutcome::StartDialogue {
                        options: SessionOptions {
                            story: door.blocked_story.clone(),
                            skippable: false,
                            source: Some(entity),
                            ..Default::default()
                        },
                        disable_movement: true,
                    };
                }
                if door.disable_on_use {
                    door.open = true;
                    door.disabled = true;
                    return InteractOutcome::PlaySound(door.open_sound.clone());
                }
                let sound = if door.open {
                    door.close_sound.clone()
                } else {
                    door.open_sound.clone()
                };
                door.open = !door.open;
                InteractOutcome::PlaySound(sound)
            }
            InteractableKind::PassiveLabel(_) => InteractOutcome::Nothing,
        }
    }
}
