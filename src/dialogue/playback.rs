//! Tick-driven reveal state machine for a single dialogue session.
//!
//! Every wait (per-character pause, end-of-segment wait, auto-advance timer)
//! is a phase of [`DialoguePlayback`] that consumes the delta handed to
//! [`DialoguePlayback::tick`]. Nothing here reads wall-clock time.
use std::time::Duration;

use crate::core::config::DialogueSettings;

use super::{
    session::Presentation,
    story::{Segment, StorySource},
    tags::{decode_tags, TagCommand},
};

/// Effects a playback session needs from the rest of the game.
pub trait DialogueHost {
    fn show_surface(&mut self, presentation: &Presentation);
    fn hide_surface(&mut self);
    fn set_text(&mut self, text: &str);
    fn play_cue(&mut self, cue: &str);
    fn apply_tag(&mut self, command: &TagCommand);

    /// Called after a segment's tags ran and before its first character.
    fn segment_started(&mut self, _segment: &Segment) {}
}

/// Externally observable playback state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Revealing,
    WaitingForAdvance,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Suspend,
}

#[derive(Debug, Default)]
enum Phase {
    /// Next step opens the next segment (or the final wait).
    #[default]
    Pending,
    Revealing(Reveal),
    WaitingForAdvance(AdvanceWait),
    Finished,
}

#[derive(Debug)]
struct Reveal {
    text: String,
    /// Byte offset of the revealed prefix.
    shown: usize,
    since_cue: u32,
    pause: Duration,
}

impl Reveal {
    fn new(text: String) -> Self {
        Self {
            text,
            shown: 0,
            since_cue: 0,
            pause: Duration::ZERO,
        }
    }

    fn next_char(&mut self) -> Option<char> {
        let character = self.text[self.shown..].chars().next()?;
        self.shown += character.len_utf8();
        Some(character)
    }

    fn revealed(&self) -> &str {
        &self.text[..self.shown]
    }
}

/// End-of-segment wait. The auto-advance timer lives here, so resolving the
/// wait by any path drops it.
#[derive(Debug)]
struct AdvanceWait {
    auto_advance: Option<Duration>,
    last: bool,
}

pub struct DialoguePlayback {
    story: Box<dyn StorySource>,
    settings: DialogueSettings,
    cue: String,
    auto_advance: Option<Duration>,
    scrolling: bool,
    phase: Phase,
}

impl DialoguePlayback {
    /// `auto_advance` is the delay after which a segment wait resolves by itself.
    pub fn new(
        story: Box<dyn StorySource>,
        settings: DialogueSettings,
        cue: impl Into<String>,
        auto_advance: Option<Duration>,
    ) -> Self {
        Self {
            story,
            settings,
            cue: cue.into(),
            auto_advance,
            scrolling: false,
            phase: Phase::Pending,
        }
    }

    pub fn state(&self) -> PlaybackState {
        match self.phase {
            Phase::Pending => PlaybackState::Idle,
            Phase::Revealing(_) => PlaybackState::Revealing,
            Phase::WaitingForAdvance(_) => PlaybackState::WaitingForAdvance,
            Phase::Finished => PlaybackState::Finished,
        }
    }

    pub fn is_scrolling(&self) -> bool {
        self.scrolling
    }

    /// Clears the scrolling flag: completes the current segment instantly
    /// while revealing, or resolves the end-of-segment wait.
    pub fn request_skip(&mut self) {
        self.scrolling = false;
    }

    /// Whether an auto-advance timer is currently armed.
    pub fn auto_advance_armed(&self) -> bool {
        matches!(
            self.phase,
            Phase::WaitingForAdvance(AdvanceWait {
                auto_advance: Some(_),
                ..
            })
        )
    }

    /// Runs the state machine until it suspends on a wait longer than the
    /// remaining delta, or finishes.
    pub fn tick(&mut self, delta: Duration, host: &mut impl DialogueHost) -> PlaybackState {
        let mut budget = delta;
        loop {
            let (phase, flow) = match std::mem::take(&mut self.phase) {
                Phase::Pending => (self.open_segment(host), Flow::Continue),
                Phase::Revealing(reveal) => self.step_reveal(reveal, &mut budget, host),
                Phase::WaitingForAdvance(wait) => self.step_wait(wait, &mut budget),
                Phase::Finished => (Phase::Finished, Flow::Suspend),
            };
            self.phase = phase;
            if flow == Flow::Suspend {
                break;
            }
        }
        self.state()
    }

    fn open_segment(&mut self, host: &mut impl DialogueHost) -> Phase {
        if !self.story.has_more() {
            return self.begin_wait(true);
        }
        let Some(segment) = self.story.advance() else {
            return self.begin_wait(true);
        };

        self.scrolling = true;
        for command in decode_tags(&segment.tags) {
            host.apply_tag(&command);
        }
        host.segment_started(&segment);
        Phase::Revealing(Reveal::new(segment.text))
    }

    fn step_reveal(
        &mut self,
        mut reveal: Reveal,
        budget: &mut Duration,
        host: &mut impl DialogueHost,
    ) -> (Phase, Flow) {
        loop {
            if !self.scrolling {
                host.set_text(&reveal.text);
                return (self.finish_segment(), Flow::Continue);
            }

            if reveal.pause > *budget {
                reveal.pause -= *budget;
                *budget = Duration::ZERO;
                return (Phase::Revealing(reveal), Flow::Suspend);
            }
            *budget -= reveal.pause;
            reveal.pause = Duration::ZERO;

            let Some(character) = reveal.next_char() else {
                return (self.finish_segment(), Flow::Continue);
            };

            let breath = self.settings.is_pause_character(character);
            reveal.since_cue += 1;
            if breath || reveal.since_cue >= self.settings.cue_frequency {
                host.play_cue(&self.cue);
                reveal.since_cue = 0;
            }

            host.set_text(reveal.revealed());
            reveal.pause = if breath {
                self.settings.punctuation_pause()
            } else {
                self.settings.text_speed
            };
        }
    }

    fn finish_segment(&mut self) -> Phase {
        let last = !self.story.has_more();
        self.begin_wait(last)
    }

    fn begin_wait(&mut self, last: bool) -> Phase {
        self.scrolling = true;
        Phase::WaitingForAdvance(AdvanceWait {
            auto_advance: self.auto_advance,
            last,
        })
    }

    fn step_wait(&mut self, mut wait: AdvanceWait, budget: &mut Duration) -> (Phase, Flow) {
        if self.scrolling {
            match wait.auto_advance {
                Some(remaining) if remaining <= *budget => {
                    *budget -= remaining;
                    self.scrolling = false;
                }
                Some(remaining) => {
                    wait.auto_advance = Some(remaining - *budget);
                    *budget = Duration::ZERO;
                    return (Phase::WaitingForAdvance(wait), Flow::Suspend);
                }
                None => {
                    *budget = Duration::ZERO;
                    return (Phase::WaitingForAdvance(wait), Flow::Suspend);
                }
            }
        }

        if wait.last {
            (Phase::Finished, Flow::Continue)
        } else {
            (Phase::Pending, Flow::Continue)
        }
    }
}
