pub mod types;
pub mod color;
pub mod rng;
pub mod noise;
pub mod surface;
pub mod scheduler;
pub mod settings;
pub mod effects;
pub mod engine;
pub mod switcher;
pub mod commands;
pub mod error;
pub mod logging;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use effects::{Effect, EffectKind, FrameContext, FrameStatus};
pub use engine::BackgroundEngine;
pub use error::BackgroundError;
pub use scheduler::{CancelToken, FrameHandle, FrameScheduler, ManualScheduler};
pub use settings::{BackgroundSettings, SettingsStore};
pub use surface::{Canvas, DrawOp, RecordingCanvas};
pub use types::*;
#[cfg(target_arch = "wasm32")]
pub use web::{init_canvas_background, CanvasBackground};
