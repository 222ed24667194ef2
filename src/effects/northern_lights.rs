use super::*;
use kurbo::Rect;
use crate::color::channel;
use crate::noise::SimplexNoise;
use crate::types::{GradientStop, LinearGradient, Paint, Rgb};

pub const STRIP_WIDTH: f64 = 2.0;
const STOPS: usize = 10;
const X_FREQUENCY: f64 = 0.002;
const Y_FREQUENCY: f64 = 3.0;
const OFFSET_SPEED: f64 = 0.0002;
const SHIMMER_SPEED: f64 = 0.0003;

/// Colour of one gradient stop for noise sample `n`.
pub fn strip_color(tint: Option<Rgb>, n: f64) -> Rgb {
    match tint {
        Some(base) => Rgb::new(
            channel(base.r as f64 + n * 60.0),
            channel(base.g as f64 + n * 40.0),
            channel(base.b as f64 + n * 80.0),
        ),
        None => Rgb::new(0, channel(190.0 + n * 60.0), channel(120.0 + n * 60.0)),
    }
}

pub struct NorthernLights {
    noise: SimplexNoise,
}

impl NorthernLights {
    pub fn new(rng: &mut Rng) -> Self {
        NorthernLights { noise: SimplexNoise::from_rng(rng) }
    }

    fn strip(&self, x: f64, height: f64, time_ms: f64, tint: Option<Rgb>, alpha: f64) -> Paint {
        let offset = self.noise.noise3d(x * X_FREQUENCY, 0.0, time_ms * OFFSET_SPEED);
        let stops = (0..=STOPS)
            .map(|k| {
                let y = k as f64 / STOPS as f64;
                let shimmer = time_ms * SHIMMER_SPEED + offset;
                let n = self.noise.noise3d(x * X_FREQUENCY, y * Y_FREQUENCY, shimmer);
                let color = strip_color(tint, n).with_alpha((0.7 - y * 0.6) * alpha);
                GradientStop { offset: y, color }
            })
            .collect();
        Paint::Linear(LinearGradient {
            start: kurbo::Point::new(x, 0.0),
            end: kurbo::Point::new(x, height),
            stops,
        })
    }
}

impl Effect for NorthernLights {
    fn kind(&self) -> EffectKind {
        EffectKind::NorthernLights
    }

    fn frame(&mut self, canvas: &mut dyn Canvas, frame: &FrameContext) -> FrameStatus {
        if !frame.settings.northern_lights_enabled() {
            return FrameStatus::Finished;
        }
        canvas.fill_background(&Paint::solid(Rgb::new(0x00, 0x00, 0x10).with_alpha(1.0)));

        let tint = frame.settings.northern_lights_tint();
        let height = frame.height();
        let mut x = 0.0;
        while x < frame.width() {
            let paint = self.strip(x, height, frame.time_ms, tint, frame.alpha);
            canvas.fill_rect(Rect::new(x, 0.0, x + STRIP_WIDTH, height), &paint);
            x += STRIP_WIDTH;
        }

        FrameStatus::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::test_support::run_frames;
    use crate::settings::NORTHERN_LIGHTS_MODE;
    use crate::surface::RecordingCanvas;

    fn enabled() -> BackgroundSettings {
        BackgroundSettings {
            custom_bg_color: Some(NORTHERN_LIGHTS_MODE.into()),
            ..Default::default()
        }
    }

    #[test]
    fn default_palette_is_green_teal() {
        assert_eq!(strip_color(None, 0.0), Rgb::new(0, 190, 120));
        assert_eq!(strip_color(None, 1.0), Rgb::new(0, 250, 180));
        assert_eq!(strip_color(None, -1.0), Rgb::new(0, 130, 60));
    }

    #[test]
    fn tint_is_clamped_per_channel() {
        assert_eq!(strip_color(Some(Rgb::new(250, 10, 200)), 1.0), Rgb::new(255, 50, 255));
        assert_eq!(strip_color(Some(Rgb::new(20, 10, 200)), -1.0), Rgb::new(0, 0, 120));
    }

    #[test]
    fn one_strip_per_two_pixels() {
        let size = Size::new(40, 30);
        let mut effect = NorthernLights::new(&mut Rng::new(1));
        let mut canvas = RecordingCanvas::new(size);
        assert_eq!(run_frames(&mut effect, &mut canvas, &enabled(), 1), FrameStatus::Continue);
        assert_eq!(canvas.ops().len(), 1 + 20);
    }

    #[test]
    fn stops_fade_toward_the_bottom() {
        let effect = NorthernLights::new(&mut Rng::new(1));
        let Paint::Linear(grad) = effect.strip(10.0, 100.0, 500.0, None, 1.0) else {
            panic!("linear")
        };
        assert_eq!(grad.stops.len(), 11);
        assert!((grad.stops[0].color.a - 0.7).abs() < 1e-12);
        assert!((grad.stops[10].color.a - 0.1).abs() < 1e-12);
    }

    #[test]
    fn finishes_once_colour_mode_changes() {
        let size = Size::new(20, 20);
        let mut effect = NorthernLights::new(&mut Rng::new(1));
        let mut canvas = RecordingCanvas::new(size);
        run_frames(&mut effect, &mut canvas, &enabled(), 1);
        canvas.take_ops();
        let status = run_frames(&mut effect, &mut canvas, &BackgroundSettings::default(), 1);
        assert_eq!(status, FrameStatus::Finished);
        assert!(canvas.is_blank());
    }

    #[test]
    fn gate_refuses_to_start() {
        let mut rng = Rng::new(1);
        let size = Size::new(10, 10);
        let closed = BackgroundSettings::default();
        assert!(EffectKind::NorthernLights.start(size, &closed, &mut rng).is_none());
        assert!(EffectKind::NorthernLights.start(size, &enabled(), &mut rng).is_some());
    }
}
