// src/ui/labels/components.rs
//
// Screen-space label nodes that mirror each interactable's `InteractableLabel`.

use std::collections::HashMap;

use bevy::prelude::*;

/// UI node showing the label of one interactable.
#[derive(Component, Debug)]
pub struct FloatingLabel {
    /// The interactable this label tracks in 3D space.
    target: Entity,
}

impl FloatingLabel {
    pub fn new(target: Entity) -> Self {
        Self { target }
    }

    pub fn target(&self) -> Entity {
        self.target
    }
}

/// Text node of the interaction prompt.
#[derive(Component, Debug)]
pub struct InteractionPrompt;

/// Full-screen overlay the floating labels are parented to.
#[derive(Resource, Debug)]
pub struct LabelUiRoot(pub Entity);

/// Floating label entity per interactable.
#[derive(Resource, Debug, Default)]
pub struct LabelTracker {
    pub by_target: HashMap<Entity, Entity>,
}

#[derive(Resource, Debug)]
pub struct LabelSettings {
    /// Height above the interactable's origin (world units).
    pub vertical_offset: f32,

    /// Outline thickness in pixels per unit of `InteractableLabel::outline_width`.
    pub outline_scale: f32,

    pub font_size: f32,

    pub prompt_font_size: f32,
}

impl Default for LabelSettings {
    fn default() -> Self {
        Self {
            vertical_offset: 0.8,
            outline_scale: 10.0,
            font_size: 16.0,
            prompt_font_size: 18.0,
        }
    }
}
