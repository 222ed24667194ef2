use tracing::{debug, error, trace, warn};
use crate::effects::{Effect, EffectKind, FrameContext, FrameStatus};
use crate::rng::Rng;
use crate::scheduler::{CancelToken, FrameHandle, FrameScheduler};
use crate::settings::BackgroundSettings;
use crate::surface::Canvas;
use crate::types::Size;

pub(crate) struct Runner {
    pub(crate) effect: Box<dyn Effect>,
    pub(crate) token: CancelToken,
    pub(crate) generation: u64,
    pub(crate) frames: u64,
    /// Timestamp of the runner's first frame; effects see time relative to it.
    pub(crate) epoch: Option<f64>,
}

/// Owns the drawing surface, the pending frame and the one running effect.
pub struct BackgroundEngine<C: Canvas, S: FrameScheduler> {
    pub(crate) canvas: Option<C>,
    pub(crate) scheduler: S,
    pub(crate) settings: BackgroundSettings,
    pub(crate) active_effect: Option<EffectKind>,
    pub(crate) runner: Option<Runner>,
    pub(crate) frame: Option<FrameHandle>,
    pub(crate) rng: Rng,
    pub(crate) generation: u64,
}

impl<C: Canvas, S: FrameScheduler> BackgroundEngine<C, S> {
    /// A missing canvas leaves the engine inert: it logs once and every later
    /// call is a harmless no-op.
    pub fn initialize(
        canvas: Option<C>,
        scheduler: S,
        viewport: Size,
        settings: BackgroundSettings,
        seed: u64,
    ) -> Self {
        let canvas = match canvas {
            Some(mut canvas) => {
                canvas.resize(viewport);
                Some(canvas)
            }
            None => {
                error!("background drawing surface not found; effects disabled");
                None
            }
        };

        BackgroundEngine {
            canvas,
            scheduler,
            settings,
            active_effect: None,
            runner: None,
            frame: None,
            rng: Rng::new(seed),
            generation: 0,
        }
    }

    pub fn has_surface(&self) -> bool {
        self.canvas.is_some()
    }

    pub fn canvas(&self) -> Option<&C> {
        self.canvas.as_ref()
    }

    pub fn canvas_mut(&mut self) -> Option<&mut C> {
        self.canvas.as_mut()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn settings(&self) -> &BackgroundSettings {
        &self.settings
    }

    /// The selection tag: `None` after `stop`, `Some` after any activation.
    pub fn active_effect(&self) -> Option<EffectKind> {
        self.active_effect
    }

    pub fn is_running(&self) -> bool {
        self.runner.is_some()
    }

    /// Identity of the running instance; changes on every start.
    pub fn runner_generation(&self) -> Option<u64> {
        self.runner.as_ref().map(|r| r.generation)
    }

    /// Frames the running instance has drawn so far.
    pub fn runner_frames(&self) -> Option<u64> {
        self.runner.as_ref().map(|r| r.frames)
    }

    pub fn runner_token(&self) -> Option<CancelToken> {
        self.runner.as_ref().map(|r| r.token.clone())
    }

    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.frame
    }

    pub fn surface_size(&self) -> Option<Size> {
        self.canvas.as_ref().map(|c| c.size())
    }

    /// Tracks the viewport. The running effect keeps its state and reads the
    /// new size on its next frame.
    pub fn resize(&mut self, size: Size) {
        if let Some(canvas) = self.canvas.as_mut() {
            if canvas.size() != size {
                trace!(width = size.width, height = size.height, "surface resized");
                canvas.resize(size);
            }
        }
    }

    /// Cancels the pending frame, retires the runner, clears the tag and
    /// wipes the surface. Safe to call at any time.
    pub fn stop(&mut self) {
        if let Some(handle) = self.frame.take() {
            self.scheduler.cancel_frame(handle);
        }
        if let Some(runner) = self.runner.take() {
            runner.token.cancel();
            debug!(
                effect = runner.effect.kind().name(),
                frames = runner.frames,
                "background effect stopped"
            );
        }
        self.active_effect = None;
        if let Some(canvas) = self.canvas.as_mut() {
            canvas.clear();
        }
    }

    /// New settings take effect on the running effect's next frame.
    pub fn update_settings(&mut self, settings: BackgroundSettings) {
        self.settings = settings;
    }

    pub fn set_opacity(&mut self, percent: i64) {
        self.settings.effect_opacity = percent.clamp(0, 100);
    }

    /// Body of one scheduled frame. Frames whose token was cancelled, or that
    /// belong to a runner that is no longer active, do nothing.
    pub fn run_frame(&mut self, token: &CancelToken, time_ms: f64) {
        let Some(canvas) = self.canvas.as_mut() else { return };
        let Some(runner) = self.runner.as_mut() else {
            trace!("frame fired with no running effect");
            return;
        };
        if token.is_cancelled() || !runner.token.same_as(token) {
            trace!(effect = runner.effect.kind().name(), "dropping stale frame");
            return;
        }
        self.frame = None;

        let epoch = *runner.epoch.get_or_insert(time_ms);
        let frame = FrameContext {
            size: canvas.size(),
            time_ms: time_ms - epoch,
            alpha: self.settings.alpha(),
            settings: &self.settings,
        };
        let status = runner.effect.frame(canvas, &frame);
        runner.frames += 1;

        match status {
            FrameStatus::Continue => self.schedule_next(),
            FrameStatus::Finished => {
                if let Some(runner) = self.runner.take() {
                    runner.token.cancel();
                    let effect = runner.effect.kind().name();
                    debug!(effect, "background effect finished on its own");
                }
            }
        }
    }

    pub(crate) fn schedule_next(&mut self) {
        let Some(runner) = self.runner.as_ref() else { return };
        self.frame = self.scheduler.request_frame(runner.token.clone());
        if self.frame.is_none() {
            warn!(effect = runner.effect.kind().name(), "frame request refused; effect paused");
        }
    }
}
