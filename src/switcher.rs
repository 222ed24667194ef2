use tracing::debug;
use crate::effects::EffectKind;
use crate::engine::{BackgroundEngine, Runner};
use crate::scheduler::{CancelToken, FrameScheduler};
use crate::settings::BackgroundSettings;
use crate::surface::Canvas;

impl<C: Canvas, S: FrameScheduler> BackgroundEngine<C, S> {
    /// Switches to `kind`. The previous effect is always stopped first; by the
    /// time this returns its token is cancelled, so a frame of it that was
    /// already queued does nothing when it fires.
    pub fn activate(&mut self, kind: EffectKind) {
        self.stop();
        self.active_effect = Some(kind);

        let Some(canvas) = self.canvas.as_mut() else {
            debug!(effect = kind.name(), "no surface; effect not started");
            return;
        };
        let size = canvas.size();
        let mut rng = self.rng.fork();

        match kind.start(size, &self.settings, &mut rng) {
            Some(effect) => {
                self.generation += 1;
                debug!(
                    effect = kind.name(),
                    generation = self.generation,
                    "background effect started"
                );
                self.runner = Some(Runner {
                    effect,
                    token: CancelToken::new(),
                    generation: self.generation,
                    frames: 0,
                    epoch: None,
                });
                self.schedule_next();
            }
            None => {
                debug!(effect = kind.name(), "nothing to run");
                canvas.clear();
            }
        }
    }

    /// Activates by selection name; unknown names select `none`.
    pub fn activate_named(&mut self, name: &str) -> EffectKind {
        let kind = EffectKind::from_name(name);
        self.activate(kind);
        kind
    }

    /// Takes `settings` as the current page state, then activates `name`.
    /// Gates and accents are decided from these settings, not from the
    /// snapshot held since the engine was built.
    pub fn activate_named_with(&mut self, name: &str, settings: BackgroundSettings) -> EffectKind {
        self.update_settings(settings);
        self.activate_named(name)
    }

    /// Activates whatever the persisted settings ask for at page load.
    pub fn activate_startup_effect(&mut self) -> EffectKind {
        let kind = self.settings.startup_effect();
        self.activate(kind);
        kind
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use crate::effects::EffectKind;
    use crate::engine::BackgroundEngine;
    use crate::scheduler::ManualScheduler;
    use crate::settings::{BackgroundSettings, KEY_CUSTOM_BG_COLOR, NORTHERN_LIGHTS_MODE};
    use crate::surface::RecordingCanvas;
    use crate::types::{Paint, Rgba, Size};

    type TestEngine = BackgroundEngine<RecordingCanvas, ManualScheduler>;

    fn engine_with(settings: BackgroundSettings) -> TestEngine {
        BackgroundEngine::initialize(
            Some(RecordingCanvas::new(Size::new(0, 0))),
            ManualScheduler::new(),
            Size::new(256, 192),
            settings,
            99,
        )
    }

    #[test]
    fn activate_then_stop_clears_everything() {
        for kind in EffectKind::ALL {
            let mut engine = engine_with(BackgroundSettings::default());
            engine.activate(kind);
            engine.pump_frames(2, 0.0, 16.0);
            engine.stop();
            assert_eq!(engine.active_effect(), None, "{kind:?}");
            assert!(engine.canvas().unwrap().is_blank(), "{kind:?}");
            assert_eq!(engine.scheduler().pending(), 0, "{kind:?}");
        }
    }

    #[test]
    fn unknown_name_is_a_stable_none_state() {
        let mut engine = engine_with(BackgroundSettings::default());
        engine.activate_named("constellation");
        engine.pump(0.0);
        assert_eq!(engine.activate_named("sparkles"), EffectKind::Off);
        assert_eq!(engine.active_effect(), Some(EffectKind::Off));
        assert!(!engine.is_running());
        assert!(engine.canvas().unwrap().is_blank());
        assert_eq!(engine.pump(16.0), 0);
    }

    #[test]
    fn stray_frame_of_previous_effect_is_harmless() {
        let mut engine = engine_with(BackgroundSettings::default());
        engine.activate(EffectKind::Constellation);
        let old_token = engine.runner_token().unwrap();
        engine.activate(EffectKind::Orbs);
        engine.canvas_mut().unwrap().take_ops();

        engine.run_frame(&old_token, 16.0);
        assert!(engine.canvas().unwrap().is_blank());
        assert_eq!(engine.runner_frames(), Some(0));
        assert_eq!(engine.scheduler().pending(), 1);
    }

    #[test]
    fn switching_back_builds_a_fresh_instance() {
        let mut engine = engine_with(BackgroundSettings::default());
        engine.activate(EffectKind::Constellation);
        engine.pump_frames(10, 0.0, 16.0);
        let first = engine.runner_generation();
        engine.activate(EffectKind::NightSky);
        engine.activate(EffectKind::Constellation);
        assert_ne!(engine.runner_generation(), first);
        assert_eq!(engine.runner_frames(), Some(0));
    }

    #[test]
    fn northern_lights_without_sentinel_schedules_nothing() {
        let mut engine = engine_with(BackgroundSettings::default());
        engine.activate(EffectKind::NorthernLights);
        assert_eq!(engine.active_effect(), Some(EffectKind::NorthernLights));
        assert!(!engine.is_running());
        assert_eq!(engine.scheduler().pending(), 0);
        assert_eq!(engine.pump(0.0), 0);
    }

    #[test]
    fn northern_lights_retires_when_mode_changes() {
        let settings = BackgroundSettings {
            custom_bg_color: Some(NORTHERN_LIGHTS_MODE.into()),
            ..Default::default()
        };
        let mut engine = engine_with(settings);
        engine.activate(EffectKind::NorthernLights);
        engine.pump_frames(2, 0.0, 16.0);
        assert!(engine.is_running());

        engine.update_settings(BackgroundSettings {
            custom_bg_color: Some("#224466".into()),
            ..Default::default()
        });
        engine.pump(32.0);
        assert!(!engine.is_running());
        assert_eq!(engine.scheduler().pending(), 0);
        assert_eq!(engine.active_effect(), Some(EffectKind::NorthernLights));
    }

    #[test]
    fn activation_reads_settings_stored_after_load() {
        let mut store: HashMap<String, String> = HashMap::new();
        store.insert(KEY_CUSTOM_BG_COLOR.into(), "#112233".into());
        let mut engine = engine_with(BackgroundSettings::load(&store));

        store.insert(KEY_CUSTOM_BG_COLOR.into(), NORTHERN_LIGHTS_MODE.into());
        let kind = engine.activate_named_with("ntlights", BackgroundSettings::load(&store));
        assert_eq!(kind, EffectKind::NorthernLights);
        assert!(engine.is_running());
        assert_eq!(engine.scheduler().pending(), 1);
    }

    #[test]
    fn activation_picks_up_a_new_accent() {
        let mut engine = engine_with(BackgroundSettings::default());
        let settings =
            BackgroundSettings { accent_color: Some("#643200".into()), ..Default::default() };
        engine.activate_named_with("matrix", settings);
        engine.pump(0.0);
        let glyph = engine.canvas().unwrap().texts().next().unwrap().paint().clone();
        assert_eq!(glyph, Paint::solid(Rgba::new(140, 70, 0, 1.0)));
    }

    #[test]
    fn startup_effect_uses_theme_rules() {
        let settings = BackgroundSettings { theme: "matrix".into(), ..Default::default() };
        let mut engine = engine_with(settings);
        assert_eq!(engine.activate_startup_effect(), EffectKind::Matrix);
        assert!(engine.is_running());
    }
}
