// src/ui/subtitles/components.rs
//
// Subtitle surface state and the markers for its UI entities.

use bevy::prelude::*;

/// Root node of the subtitle surface.
#[derive(Component, Debug)]
pub struct SubtitleRoot;

/// Text node inside the subtitle surface.
#[derive(Component, Debug)]
pub struct SubtitleText;

/// Presentation surface for dialogue text.
///
/// Dialogue sessions write here; `sync_subtitle_surface` mirrors it into the
/// UI tree. Showing or hiding twice is a no-op.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct Subtitles {
    visible: bool,
    text: String,
    /// Font asset path; empty selects Bevy's built-in font.
    font: String,
    color: Color,
}

impl Default for Subtitles {
    fn default() -> Self {
        Self {
            visible: false,
            text: String::new(),
            font: String::new(),
            color: Color::WHITE,
        }
    }
}

impl Subtitles {
    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_text(&mut self, text: &str) {
        self.text.clear();
        self.text.push_str(text);
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_font(&mut self, font: impl Into<String>) {
        self.font = font.into();
    }

    pub fn font(&self) -> &str {
        &self.font
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn color(&self) -> Color {
        self.color
    }
}

/// Layout values for the subtitle surface.
#[derive(Resource, Debug)]
pub struct SubtitleLayout {
    /// Offset from bottom edge of screen (pixels).
    pub bottom_offset: f32,

    /// Width as a percentage of the screen.
    pub width_percent: f32,

    pub padding: f32,

    pub font_size: f32,
}

impl Default for SubtitleLayout {
    fn default() -> Self {
        Self {
            bottom_offset: 48.0,
            width_percent: 60.0,
            padding: 12.0,
            font_size: 24.0,
        }
    }
}
