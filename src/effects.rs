use serde::{Serialize, Deserialize};
use crate::rng::Rng;
use crate::settings::BackgroundSettings;
use crate::surface::Canvas;
use crate::types::Size;

pub mod constellation;
pub mod starfield;
pub mod orbs;
pub mod aurora;
pub mod northern_lights;
pub mod matrix;

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum EffectKind {
    Off,
    Constellation,
    Matrix,
    NightSky,
    Aurora,
    NorthernLights,
    Orbs,
}

impl EffectKind {
    pub const ALL: [EffectKind; 7] = [
        EffectKind::Off,
        EffectKind::Constellation,
        EffectKind::Matrix,
        EffectKind::NightSky,
        EffectKind::Aurora,
        EffectKind::NorthernLights,
        EffectKind::Orbs,
    ];

    /// Parses a selection name. Anything outside the known set is `Off`.
    pub fn from_name(name: &str) -> EffectKind {
        match name.trim() {
            "constellation" => EffectKind::Constellation,
            "matrix" => EffectKind::Matrix,
            "night sky" => EffectKind::NightSky,
            "aurora" => EffectKind::Aurora,
            "ntlights" => EffectKind::NorthernLights,
            "orbs" => EffectKind::Orbs,
            _ => EffectKind::Off,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            EffectKind::Off => "none",
            EffectKind::Constellation => "constellation",
            EffectKind::Matrix => "matrix",
            EffectKind::NightSky => "night sky",
            EffectKind::Aurora => "aurora",
            EffectKind::NorthernLights => "ntlights",
            EffectKind::Orbs => "orbs",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EffectKind::Off => "None",
            EffectKind::Constellation => "Constellation",
            EffectKind::Matrix => "Matrix Rain",
            EffectKind::NightSky => "Night Sky",
            EffectKind::Aurora => "Aurora",
            EffectKind::NorthernLights => "Northern Lights",
            EffectKind::Orbs => "Calm Orbs",
        }
    }

    /// Builds a fresh runner for this effect. `None` means nothing should be
    /// scheduled: the `Off` selection, or an effect whose gate is closed.
    pub fn start(
        self,
        size: Size,
        settings: &BackgroundSettings,
        rng: &mut Rng,
    ) -> Option<Box<dyn Effect>> {
        match self {
            EffectKind::Off => None,
            EffectKind::Constellation => {
                Some(Box::new(constellation::Constellation::new(size, rng)))
            }
            EffectKind::Matrix => Some(Box::new(matrix::Matrix::new(size, rng))),
            EffectKind::NightSky => Some(Box::new(starfield::Starfield::new(size, rng))),
            EffectKind::Aurora => Some(Box::new(aurora::Aurora::new(size, rng))),
            EffectKind::NorthernLights => {
                if !settings.northern_lights_enabled() {
                    return None;
                }
                Some(Box::new(northern_lights::NorthernLights::new(rng)))
            }
            EffectKind::Orbs => Some(Box::new(orbs::CalmOrbs::new(size, rng))),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct EffectMetadata {
    pub id: String,
    pub name: String,
}

pub fn effect_catalog() -> Vec<EffectMetadata> {
    EffectKind::ALL
        .iter()
        .map(|kind| EffectMetadata { id: kind.name().to_string(), name: kind.label().to_string() })
        .collect()
}

/// Everything a runner may read during one frame.
pub struct FrameContext<'a> {
    pub size: Size,
    pub time_ms: f64,
    pub alpha: f64,
    pub settings: &'a BackgroundSettings,
}

impl FrameContext<'_> {
    pub fn width(&self) -> f64 {
        self.size.w()
    }

    pub fn height(&self) -> f64 {
        self.size.h()
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FrameStatus {
    Continue,
    /// The runner retired itself; no further frame is wanted.
    Finished,
}

pub trait Effect {
    fn kind(&self) -> EffectKind;
    fn frame(&mut self, canvas: &mut dyn Canvas, frame: &FrameContext) -> FrameStatus;
}
