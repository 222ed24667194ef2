use super::*;
use kurbo::Point;
use crate::color::{adjust_brightness, hex_to_rgb};
use crate::types::{Paint, Rgb, Rgba};

pub const FONT_PX: f64 = 16.0;
pub const GLYPHS: &str = "アカサタナハマヤラワ0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const DEFAULT_ACCENT: Rgb = Rgb::new(0x00, 0xff, 0x00);
pub const BRIGHTNESS: f64 = 1.4;
/// Chance per frame that a column past the bottom edge restarts at the top.
pub const RESET_CHANCE: f64 = 0.025;
const TRAIL_WASH: Rgba = Rgba::new(0, 0, 0, 0.05);

/// Glyph colour for an accent string, before the global alpha is applied.
pub fn glyph_color(accent: Option<&str>) -> Rgb {
    let base = accent.and_then(hex_to_rgb).unwrap_or(DEFAULT_ACCENT);
    adjust_brightness(base, BRIGHTNESS)
}

pub struct Matrix {
    drops: Vec<u32>,
    glyphs: Vec<char>,
    rng: Rng,
    pub(crate) reset_chance: f64,
}

impl Matrix {
    pub fn new(size: Size, rng: &mut Rng) -> Self {
        let columns = (size.w() / FONT_PX).floor() as usize;
        Matrix {
            drops: vec![0; columns],
            glyphs: GLYPHS.chars().collect(),
            rng: rng.fork(),
            reset_chance: RESET_CHANCE,
        }
    }

    pub fn drops(&self) -> &[u32] {
        &self.drops
    }
}

impl Effect for Matrix {
    fn kind(&self) -> EffectKind {
        EffectKind::Matrix
    }

    fn frame(&mut self, canvas: &mut dyn Canvas, frame: &FrameContext) -> FrameStatus {
        // Translucent wash instead of a clear leaves fading trails.
        canvas.fill_background(&Paint::solid(TRAIL_WASH));

        let paint = Paint::solid(glyph_color(frame.settings.accent()).with_alpha(frame.alpha));
        let mut buf = [0u8; 4];
        for (i, drop) in self.drops.iter_mut().enumerate() {
            let glyph = self.glyphs[self.rng.index(self.glyphs.len())];
            let origin = Point::new(i as f64 * FONT_PX, *drop as f64 * FONT_PX);
            canvas.fill_text(glyph.encode_utf8(&mut buf), origin, FONT_PX, &paint);

            if origin.y > frame.height() && self.rng.chance(self.reset_chance) {
                *drop = 0;
            }
            *drop += 1;
        }

        FrameStatus::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::test_support::run_frames;
    use crate::surface::{DrawOp, RecordingCanvas};

    #[test]
    fn column_count_follows_width() {
        let effect = Matrix::new(Size::new(100, 50), &mut Rng::new(1));
        assert_eq!(effect.drops().len(), 6);
    }

    #[test]
    fn accent_is_brightened_or_defaulted() {
        assert_eq!(glyph_color(None), Rgb::new(0, 255, 0));
        assert_eq!(glyph_color(Some("garbage")), Rgb::new(0, 255, 0));
        assert_eq!(glyph_color(Some("#643200")), Rgb::new(140, 70, 0));
    }

    #[test]
    fn zero_opacity_hides_every_glyph() {
        let size = Size::new(160, 64);
        let mut effect = Matrix::new(size, &mut Rng::new(9));
        let mut canvas = RecordingCanvas::new(size);
        let settings = BackgroundSettings { effect_opacity: 0, ..Default::default() };
        for _ in 0..40 {
            run_frames(&mut effect, &mut canvas, &settings, 1);
            let texts: Vec<_> = canvas.texts().collect();
            assert_eq!(texts.len(), 10);
            assert!(texts.iter().all(|op| op.paint().max_alpha() == 0.0));
            canvas.take_ops();
        }
    }

    #[test]
    fn glyphs_come_from_the_alphabet() {
        let size = Size::new(64, 64);
        let mut effect = Matrix::new(size, &mut Rng::new(9));
        let mut canvas = RecordingCanvas::new(size);
        run_frames(&mut effect, &mut canvas, &BackgroundSettings::default(), 5);
        for op in canvas.texts() {
            let DrawOp::FillText { text, font_px, .. } = op else { unreachable!() };
            assert_eq!(text.chars().count(), 1);
            assert!(GLYPHS.contains(text.as_str()));
            assert_eq!(*font_px, FONT_PX);
        }
    }

    #[test]
    fn columns_only_reset_past_the_bottom() {
        let size = Size::new(32, 64);
        let mut effect = Matrix::new(size, &mut Rng::new(9));
        effect.reset_chance = 1.0;
        let mut canvas = RecordingCanvas::new(size);
        // Rows 0..=4 are on screen; row 5 is the first past the edge.
        run_frames(&mut effect, &mut canvas, &BackgroundSettings::default(), 5);
        assert_eq!(effect.drops(), &[5, 5]);
        run_frames(&mut effect, &mut canvas, &BackgroundSettings::default(), 1);
        assert_eq!(effect.drops(), &[1, 1]);
    }

    #[test]
    fn new_runners_use_the_fixed_reset_chance() {
        let effect = Matrix::new(Size::new(64, 64), &mut Rng::new(3));
        assert_eq!(effect.reset_chance, RESET_CHANCE);
    }

    #[test]
    fn columns_never_reset_without_chance() {
        let size = Size::new(32, 64);
        let mut effect = Matrix::new(size, &mut Rng::new(9));
        effect.reset_chance = 0.0;
        let mut canvas = RecordingCanvas::new(size);
        run_frames(&mut effect, &mut canvas, &BackgroundSettings::default(), 50);
        assert_eq!(effect.drops(), &[50, 50]);
    }
}
