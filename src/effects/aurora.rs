use super::*;
use kurbo::Point;
use crate::types::{Paint, Rgb, Rgba};

const SAMPLE_STEP: f64 = 10.0;
const BAND_SPACING: f64 = 80.0;
const GRADIENT_LEAD: f64 = 200.0;
const BANDS: [(Rgba, Rgba); 3] = [
    (Rgba::new(0, 255, 200, 0.15), Rgba::new(0, 180, 255, 0.05)),
    (Rgba::new(180, 0, 255, 0.15), Rgba::new(0, 100, 255, 0.05)),
    (Rgba::new(0, 255, 100, 0.15), Rgba::new(0, 150, 200, 0.05)),
];

#[derive(Clone, Debug, PartialEq)]
pub struct Wave {
    pub amplitude: f64,
    pub wavelength: f64,
    pub speed: f64,
    pub phase: f64,
    pub top: Rgba,
    pub bottom: Rgba,
    /// Resting height of the band, fixed when the effect starts.
    pub baseline: f64,
}

impl Wave {
    pub fn crest(&self, x: f64, time_ms: f64) -> f64 {
        let angle = x / self.wavelength + time_ms * self.speed + self.phase;
        self.baseline + angle.sin() * self.amplitude
    }

    /// Outline of the band: the crest sampled across the width, closed
    /// along the bottom edge.
    pub fn outline(&self, size: Size, time_ms: f64) -> Vec<Point> {
        let mut points = vec![Point::new(0.0, size.h())];
        let mut x = 0.0;
        while x <= size.w() {
            points.push(Point::new(x, self.crest(x, time_ms)));
            x += SAMPLE_STEP;
        }
        points.push(Point::new(size.w(), size.h()));
        points
    }
}

pub struct Aurora {
    waves: Vec<Wave>,
}

impl Aurora {
    pub fn new(size: Size, rng: &mut Rng) -> Self {
        let waves = BANDS
            .iter()
            .enumerate()
            .map(|(i, &(top, bottom))| Wave {
                amplitude: rng.range(50.0, 80.0),
                wavelength: rng.range(200.0, 350.0),
                speed: rng.range(0.002, 0.004),
                phase: rng.angle(),
                top,
                bottom,
                baseline: size.h() / 2.0 + (i as f64 - 1.0) * BAND_SPACING,
            })
            .collect();
        Aurora { waves }
    }

    pub fn waves(&self) -> &[Wave] {
        &self.waves
    }
}

impl Effect for Aurora {
    fn kind(&self) -> EffectKind {
        EffectKind::Aurora
    }

    fn frame(&mut self, canvas: &mut dyn Canvas, frame: &FrameContext) -> FrameStatus {
        canvas.fill_background(&Paint::solid(Rgb::new(0x00, 0x00, 0x10).with_alpha(1.0)));

        for wave in &self.waves {
            let outline = wave.outline(frame.size, frame.time_ms);
            let paint = Paint::vertical(0.0, wave.baseline - GRADIENT_LEAD, frame.height(), &[
                wave.top.fade(frame.alpha),
                wave.bottom.fade(frame.alpha),
            ]);
            canvas.fill_polygon(&outline, &paint);
        }

        FrameStatus::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::test_support::run_frames;
    use crate::surface::{DrawOp, RecordingCanvas};

    fn flat_wave() -> Wave {
        Wave {
            amplitude: 60.0,
            wavelength: 250.0,
            speed: 0.003,
            phase: 0.0,
            top: BANDS[0].0,
            bottom: BANDS[0].1,
            baseline: 300.0,
        }
    }

    #[test]
    fn crest_oscillates_around_baseline() {
        let wave = flat_wave();
        assert_eq!(wave.crest(0.0, 0.0), 300.0);
        for i in 0..100 {
            let y = wave.crest(i as f64 * 13.0, i as f64 * 40.0);
            assert!((240.0..=360.0).contains(&y));
        }
    }

    #[test]
    fn outline_is_closed_along_the_bottom() {
        let outline = flat_wave().outline(Size::new(100, 400), 0.0);
        // Two bottom corners plus samples at 0, 10, ..., 100.
        assert_eq!(outline.len(), 13);
        assert_eq!(outline[0], Point::new(0.0, 400.0));
        assert_eq!(*outline.last().unwrap(), Point::new(100.0, 400.0));
    }

    #[test]
    fn bands_are_stacked_around_the_middle() {
        let effect = Aurora::new(Size::new(800, 600), &mut Rng::new(3));
        let baselines: Vec<f64> = effect.waves().iter().map(|w| w.baseline).collect();
        assert_eq!(baselines, vec![220.0, 300.0, 380.0]);
    }

    #[test]
    fn band_colours_follow_global_alpha() {
        let size = Size::new(200, 200);
        let mut effect = Aurora::new(size, &mut Rng::new(3));
        let mut canvas = RecordingCanvas::new(size);
        let settings = BackgroundSettings { effect_opacity: 50, ..Default::default() };
        run_frames(&mut effect, &mut canvas, &settings, 1);
        let polygons: Vec<_> = canvas
            .ops()
            .iter()
            .filter(|op| matches!(op, DrawOp::FillPolygon { .. }))
            .collect();
        assert_eq!(polygons.len(), 3);
        for op in polygons {
            assert!((op.paint().max_alpha() - 0.075).abs() < 1e-12);
        }
    }
}
