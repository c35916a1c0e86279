//! Systems driving the active dialogue session and handing control back.
use bevy::{
    ecs::{
        message::{MessageReader, MessageWriter},
        system::SystemParam,
    },
    prelude::*,
};

use crate::{
    audio::events::AudioCommand,
    core::{config::NarrativeSettings, plugin::SimulationClock},
    interaction::{
        components::{Interactable, InteractableLabel},
        events::SceneLoadRequested,
        registry::InteractionRegistry,
    },
    player::{components::PlayerControl, events::MovementPressed},
    progression::state::ProgressionState,
    ui::subtitles::Subtitles,
};

use super::{
    errors::DialogueError,
    events::DialogueStartRequested,
    playback::DialogueHost,
    session::{ActiveDialogue, CompletionAction, EndedSession, Presentation},
    story::{Segment, StoryLibrary},
    tags::TagCommand,
    transcript::{DialogueTranscript, TranscriptEntry},
};

/// The game-side effects a session drives: subtitles, flags, audio and the
/// transcript.
#[derive(SystemParam)]
pub struct DialogueEffects<'w> {
    subtitles: ResMut<'w, Subtitles>,
    progression: ResMut<'w, ProgressionState>,
    transcript: ResMut<'w, DialogueTranscript>,
    audio: MessageWriter<'w, AudioCommand>,
    clock: Res<'w, SimulationClock>,
}

impl DialogueEffects<'_> {
    pub fn record(&mut self, entry: TranscriptEntry) {
        let at = self.clock.elapsed().as_secs_f64();
        self.transcript.push(at, entry);
    }

    pub fn progression(&self) -> &ProgressionState {
        &self.progression
    }
}

impl DialogueHost for DialogueEffects<'_> {
    fn show_surface(&mut self, presentation: &Presentation) {
        self.subtitles.set_font(presentation.font.clone());
        self.subtitles.set_color(presentation.color);
        self.subtitles.set_text("");
        self.subtitles.show();
    }

    fn hide_surface(&mut self) {
        if self.subtitles.is_visible() {
            self.subtitles.hide();
        }
    }

    fn set_text(&mut self, text: &str) {
        self.subtitles.set_text(text);
    }

    fn play_cue(&mut self, cue: &str) {
        self.audio.write(AudioCommand::PlayCue(cue.to_string()));
    }

    fn apply_tag(&mut self, command: &TagCommand) {
        match command {
            TagCommand::DefineKey(key) => {
                debug!(target: "tags", "Defined key {key}");
                self.progression.add_key(*key);
            }
            TagCommand::DefineArbitraryKey(name) => {
                debug!(target: "tags", "Defined arbitrary key {name}");
                self.progression.add_arbitrary_key(name.clone());
            }
            TagCommand::PlayMusic => {
                self.audio.write(AudioCommand::PlayZoneMusic);
            }
            TagCommand::StopMusic => {
                self.audio.write(AudioCommand::StopZoneMusic);
            }
            TagCommand::ChangeMusic(track) => {
                self.audio.write(AudioCommand::ChangeZoneMusic(track.clone()));
            }
        }
    }

    fn segment_started(&mut self, segment: &Segment) {
        self.record(TranscriptEntry::SegmentShown {
            text: segment.text.clone(),
            tags: segment.tags.clone(),
        });
    }
}

/// World state touched when a session ends naturally.
#[derive(SystemParam)]
pub struct SessionHandoff<'w, 's> {
    commands: Commands<'w, 's>,
    registry: ResMut<'w, InteractionRegistry>,
    control: ResMut<'w, PlayerControl>,
    interactables: Query<'w, 's, (&'static mut Interactable, &'static mut InteractableLabel)>,
    scenes: MessageWriter<'w, SceneLoadRequested>,
}

impl SessionHandoff<'_, '_> {
    /// Runs completion actions, then re-enables interaction and (unless the
    /// session auto-played) movement.
    fn finish(&mut self, ended: EndedSession, effects: &mut DialogueEffects) {
        info!(target: "dialogue", "Dialogue {} finished", ended.story);
        effects.record(TranscriptEntry::SessionEnded {
            story: ended.story,
        });

        for action in ended.completion {
            self.apply(action, effects);
        }

        self.registry.set_enabled(true);
        if !ended.auto_play {
            self.control.enable_movement();
        }
    }

    fn apply(&mut self, action: CompletionAction, effects: &mut DialogueEffects) {
        match action {
            CompletionAction::DisableInteractable(entity) => {
                if let Ok((mut interactable, _)) = self.interactables.get_mut(entity) {
                    interactable.mark_disabled();
                }
            }
            CompletionAction::DespawnInteractable(entity) => {
                if let Ok(mut target) = self.commands.get_entity(entity) {
                    target.despawn();
                }
            }
            CompletionAction::SetLabelActive { entity, active } => {
                if let Ok((mut interactable, mut label)) = self.interactables.get_mut(entity) {
                    interactable.set_label_active(&mut label, active);
                }
            }
            CompletionAction::DefineKey(key) => effects.progression.add_key(key),
            CompletionAction::DefineArbitraryKey(name) => {
                effects.progression.add_arbitrary_key(name)
            }
            CompletionAction::LoadScene(scene) => {
                self.scenes.write(SceneLoadRequested {
                    scene,
                    save_on_use: false,
                });
            }
        }
    }
}

/// Starts requested sessions, interrupting whichever one is active.
pub fn start_requested_dialogues(
    mut requests: MessageReader<DialogueStartRequested>,
    mut active: ResMut<ActiveDialogue>,
    mut library: ResMut<StoryLibrary>,
    settings: Res<NarrativeSettings>,
    mut effects: DialogueEffects,
    mut registry: ResMut<InteractionRegistry>,
    mut control: ResMut<PlayerControl>,
) {
    for DialogueStartRequested { options } in requests.read() {
        if let Some(story) = active.interrupt(&mut effects) {
            info!(target: "dialogue", "Dialogue {story} interrupted by {}", options.story);
            effects.record(TranscriptEntry::SessionInterrupted { story });
        }

        let document = match library.open(&options.story) {
            Ok(document) => document,
            Err(source) => {
                let err = DialogueError::story_unavailable(options.story.clone(), source);
                warn!(target: "dialogue", "{err}");
                registry.set_enabled(true);
                control.enable_movement();
                continue;
            }
        };

        effects.record(TranscriptEntry::SessionStarted {
            story: options.story.clone(),
        });
        if let Err(err) = active.init(
            Box::new(document),
            options.clone(),
            &settings.dialogue,
            &mut effects,
        ) {
            error!(target: "dialogue", "{err}");
            debug_assert!(false, "{err}");
            continue;
        }
        info!(target: "dialogue", "Dialogue {} started", options.story);
    }
}

/// A movement key pressed while frozen ends a skippable session, otherwise
/// skips the current reveal.
pub fn handle_movement_skip(
    mut pressed: MessageReader<MovementPressed>,
    mut active: ResMut<ActiveDialogue>,
    mut effects: DialogueEffects,
    mut handoff: SessionHandoff,
) {
    for _ in pressed.read() {
        if handoff.control.movement_enabled() {
            continue;
        }
        let Some(session) = active.session() else {
            continue;
        };

        if session.is_skippable() {
            if let Some(ended) = active.end(&mut effects) {
                handoff.finish(ended, &mut effects);
            }
        } else {
            active.request_skip();
        }
    }
}

pub fn advance_active_dialogue(
    mut active: ResMut<ActiveDialogue>,
    mut effects: DialogueEffects,
    mut handoff: SessionHandoff,
) {
    if active.take_started_this_frame() {
        return;
    }
    let delta = effects.clock.last_scaled_delta();
    if let Some(ended) = active.tick(delta, &mut effects) {
        handoff.finish(ended, &mut effects);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::{
        audio::music::{apply_audio_commands, ZoneMusic},
        dialogue::{
            session::SessionOptions,
            story::{Segment, StoryDocument},
        },
        interaction::components::{DialogueTrigger, InteractableKind},
        progression::state::SaveKey,
    };

    const STEP: Duration = Duration::from_millis(40);

    fn test_app() -> App {
        let mut settings = NarrativeSettings::default();
        settings.dialogue.text_speed = STEP;
        settings.transcript.log_path = std::env::temp_dir().join("hollowlight-test.jsonl");

        let mut app = App::new();
        app.insert_resource(settings)
            .insert_resource(SimulationClock::default())
            .insert_resource(ProgressionState::new_game(false))
            .init_resource::<Subtitles>()
            .init_resource::<DialogueTranscript>()
            .init_resource::<StoryLibrary>()
            .init_resource::<ActiveDialogue>()
            .init_resource::<InteractionRegistry>()
            .init_resource::<PlayerControl>()
            .add_message::<AudioCommand>()
            .add_message::<SceneLoadRequested>()
            .add_message::<DialogueStartRequested>()
            .add_message::<MovementPressed>()
            .add_systems(
                Update,
                (
                    start_requested_dialogues,
                    handle_movement_skip,
                    advance_active_dialogue,
                )
                    .chain(),
            );
        app
    }

    fn add_story(app: &mut App, name: &str, segments: Vec<Segment>) {
        app.world_mut()
            .resource_mut::<StoryLibrary>()
            .insert(name, StoryDocument::new(segments));
    }

    /// Mirrors what an interactable does before asking for dialogue.
    fn start(app: &mut App, options: SessionOptions) {
        app.world_mut()
            .resource_mut::<InteractionRegistry>()
            .set_enabled(false);
        if !options.auto_play {
            app.world_mut()
                .resource_mut::<PlayerControl>()
                .disable_movement();
        }
        app.world_mut()
            .write_message(DialogueStartRequested { options });
    }

    fn step(app: &mut App, delta: Duration) {
        app.world_mut()
            .resource_mut::<SimulationClock>()
            .tick(delta);
        app.update();
    }

    fn skip(app: &mut App) {
        app.world_mut().resource_mut::<ActiveDialogue>().request_skip();
    }

    fn subtitles(app: &App) -> &Subtitles {
        app.world().resource::<Subtitles>()
    }

    #[test]
    fn two_segment_story_runs_to_completion() {
        let mut app = test_app();
        add_story(
            &mut app,
            "porch",
            vec![
                Segment::new("The porch light hums."),
                Segment::new("Nobody answers."),
            ],
        );
        start(
            &mut app,
            SessionOptions {
                story: "porch".into(),
                skippable: true,
                ..Default::default()
            },
        );

        step(&mut app, Duration::ZERO);
        assert!(subtitles(&app).is_visible());
        assert_eq!(subtitles(&app).text(), "T");

        step(&mut app, STEP);
        assert_eq!(subtitles(&app).text(), "Th");

        skip(&mut app);
        step(&mut app, Duration::ZERO);
        assert_eq!(subtitles(&app).text(), "The porch light hums.");

        // Manual advance: nothing moves without input.
        step(&mut app, Duration::from_secs(30));
        assert_eq!(subtitles(&app).text(), "The porch light hums.");

        skip(&mut app);
        step(&mut app, Duration::ZERO);
        assert_eq!(subtitles(&app).text(), "N");

        step(&mut app, Duration::from_secs(30));
        assert_eq!(subtitles(&app).text(), "Nobody answers.");
        assert!(app.world().resource::<ActiveDialogue>().is_active());

        skip(&mut app);
        step(&mut app, Duration::ZERO);

        assert!(!app.world().resource::<ActiveDialogue>().is_active());
        assert!(!subtitles(&app).is_visible());
        assert!(app.world().resource::<InteractionRegistry>().is_enabled());
        assert!(app.world().resource::<PlayerControl>().movement_enabled());
    }

    #[test]
    fn slow_start_frame_shows_only_the_first_character() {
        let mut app = test_app();
        add_story(&mut app, "porch", vec![Segment::new("The porch light hums.")]);
        start(
            &mut app,
            SessionOptions {
                story: "porch".into(),
                ..Default::default()
            },
        );

        step(&mut app, Duration::from_millis(500));
        assert_eq!(subtitles(&app).text(), "T");

        step(&mut app, STEP);
        assert_eq!(subtitles(&app).text(), "Th");
    }

    #[test]
    fn arbitrary_key_is_set_before_text_appears() {
        let mut app = test_app();
        add_story(
            &mut app,
            "deal",
            vec![Segment::new("Midnight, then.").with_tags(["akey", "midnight_deal"])],
        );
        start(
            &mut app,
            SessionOptions {
                story: "deal".into(),
                ..Default::default()
            },
        );

        step(&mut app, Duration::ZERO);

        assert_eq!(subtitles(&app).text(), "M");
        assert!(app
            .world()
            .resource::<ProgressionState>()
            .check_arbitrary_key("midnight_deal"));
    }

    #[test]
    fn repeated_play_music_tags_start_music_twice() {
        let mut app = test_app();
        app.init_resource::<ZoneMusic>()
            .add_systems(Update, apply_audio_commands.after(advance_active_dialogue));
        add_story(
            &mut app,
            "radio",
            vec![Segment::new("Static.").with_tags(["play_music", "play_music"])],
        );
        start(
            &mut app,
            SessionOptions {
                story: "radio".into(),
                ..Default::default()
            },
        );

        step(&mut app, Duration::ZERO);

        let music = app.world().resource::<ZoneMusic>();
        assert_eq!(music.starts(), 2);
        assert!(music.is_playing());
        assert_eq!(subtitles(&app).text(), "S");
    }

    #[test]
    fn second_request_interrupts_without_completion() {
        let mut app = test_app();
        add_story(&mut app, "first", vec![Segment::new("First.")]);
        add_story(&mut app, "second", vec![Segment::new("Second.")]);
        start(
            &mut app,
            SessionOptions {
                story: "first".into(),
                completion: vec![CompletionAction::DefineKey(SaveKey::LanternLit)],
                ..Default::default()
            },
        );
        step(&mut app, Duration::ZERO);

        start(
            &mut app,
            SessionOptions {
                story: "second".into(),
                completion: vec![CompletionAction::DefineKey(SaveKey::MetCaretaker)],
                ..Default::default()
            },
        );
        step(&mut app, Duration::ZERO);

        let story = app
            .world()
            .resource::<ActiveDialogue>()
            .session()
            .map(|session| session.story().to_string());
        assert_eq!(story.as_deref(), Some("second"));

        skip(&mut app);
        step(&mut app, Duration::ZERO);
        skip(&mut app);
        step(&mut app, Duration::ZERO);

        let progression = app.world().resource::<ProgressionState>();
        assert!(!progression.check_key(SaveKey::LanternLit));
        assert!(progression.check_key(SaveKey::MetCaretaker));

        let interrupted = app
            .world()
            .resource::<DialogueTranscript>()
            .records()
            .filter(|record| matches!(record.entry, TranscriptEntry::SessionInterrupted { .. }))
            .count();
        assert_eq!(interrupted, 1);
    }

    #[test]
    fn movement_ends_skippable_sessions() {
        let mut app = test_app();
        add_story(&mut app, "sign", vec![Segment::new("Keep out."), Segment::new("Really.")]);
        start(
            &mut app,
            SessionOptions {
                story: "sign".into(),
                skippable: true,
                completion: vec![CompletionAction::DefineArbitraryKey("read_sign".into())],
                ..Default::default()
            },
        );
        step(&mut app, Duration::ZERO);

        app.world_mut().write_message(MovementPressed);
        step(&mut app, Duration::ZERO);

        assert!(!app.world().resource::<ActiveDialogue>().is_active());
        assert!(app
            .world()
            .resource::<ProgressionState>()
            .check_arbitrary_key("read_sign"));
        assert!(app.world().resource::<PlayerControl>().movement_enabled());
    }

    #[test]
    fn movement_only_skips_unskippable_sessions() {
        let mut app = test_app();
        add_story(&mut app, "locked", vec![Segment::new("It will not budge.")]);
        start(
            &mut app,
            SessionOptions {
                story: "locked".into(),
                skippable: false,
                ..Default::default()
            },
        );
        step(&mut app, Duration::ZERO);

        app.world_mut().write_message(MovementPressed);
        step(&mut app, Duration::ZERO);

        assert!(app.world().resource::<ActiveDialogue>().is_active());
        assert_eq!(subtitles(&app).text(), "It will not budge.");
    }

    #[test]
    fn auto_play_sessions_leave_movement_alone() {
        let mut app = test_app();
        add_story(&mut app, "radio", vec![Segment::new("Static.")]);
        start(
            &mut app,
            SessionOptions {
                story: "radio".into(),
                auto_play: true,
                auto_play_delay: Duration::from_secs(1),
                ..Default::default()
            },
        );
        app.world_mut()
            .resource_mut::<PlayerControl>()
            .disable_movement();

        step(&mut app, Duration::ZERO);
        step(&mut app, Duration::from_secs(5));

        assert!(!app.world().resource::<ActiveDialogue>().is_active());
        assert!(app.world().resource::<InteractionRegistry>().is_enabled());
        assert!(!app.world().resource::<PlayerControl>().movement_enabled());
    }

    #[test]
    fn completion_disables_and_despawns_sources() {
        let mut app = test_app();
        add_story(&mut app, "note", vec![Segment::new("Ok.")]);
        let used = app
            .world_mut()
            .spawn((
                Interactable::new(InteractableKind::DialogueTrigger(DialogueTrigger::new("note"))),
                InteractableLabel::new("Read"),
            ))
            .id();
        let gone = app
            .world_mut()
            .spawn((
                Interactable::new(InteractableKind::DialogueTrigger(DialogueTrigger::new("note"))),
                InteractableLabel::new("Read"),
            ))
            .id();
        start(
            &mut app,
            SessionOptions {
                story: "note".into(),
                completion: vec![
                    CompletionAction::DisableInteractable(used),
                    CompletionAction::DespawnInteractable(gone),
                ],
                ..Default::default()
            },
        );

        step(&mut app, Duration::ZERO);
        skip(&mut app);
        step(&mut app, Duration::ZERO);
        skip(&mut app);
        step(&mut app, Duration::ZERO);

        let priority = app
            .world()
            .get::<Interactable>(used)
            .map(Interactable::priority);
        assert_eq!(priority, Some(-1));
        assert!(app.world().get_entity(gone).is_err());
    }

    #[test]
    fn missing_story_restores_control() {
        let mut app = test_app();
        start(
            &mut app,
            SessionOptions {
                story: "does-not-exist.json".into(),
                ..Default::default()
            },
        );

        step(&mut app, Duration::ZERO);

        assert!(!app.world().resource::<ActiveDialogue>().is_active());
        assert!(app.world().resource::<InteractionRegistry>().is_enabled());
        assert!(app.world().resource::<PlayerControl>().movement_enabled());
    }
}
