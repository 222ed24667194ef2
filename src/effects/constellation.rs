use super::*;
use kurbo::{Point, Rect, Vec2};
use crate::types::{GradientStop, Paint, Rgb, Rgba};

pub const DOT_COUNT: usize = 150;
/// Dots closer than this are joined by a line.
pub const LINK_DISTANCE: f64 = 160.0;

const GLOW_RADIUS: f64 = 10.0;
const TWINKLE_STEP: f64 = 0.03;
const DRIFT_STEP: f64 = 0.001;
const DRIFT_STRENGTH: f64 = 0.2;
const LINK_COLOR: Rgb = Rgb::new(200, 220, 255);
const COLORS: [Rgb; 4] = [
    Rgb::new(0xff, 0xff, 0xff),
    Rgb::new(0xaa, 0xdd, 0xff),
    Rgb::new(0xff, 0xd2, 0xa1),
    Rgb::new(0xb5, 0xff, 0xe1),
];

#[derive(Clone, Debug, PartialEq)]
pub struct Dot {
    pub pos: Point,
    pub vel: Vec2,
    pub radius: f64,
    pub color: Rgb,
    pub twinkle: f64,
}

impl Dot {
    fn random(size: Size, rng: &mut Rng) -> Dot {
        Dot {
            pos: Point::new(rng.next_f64() * size.w(), rng.next_f64() * size.h()),
            vel: Vec2::new(rng.centered(0.7), rng.centered(0.7)),
            radius: rng.range(1.0, 3.0),
            color: rng.pick(&COLORS),
            twinkle: rng.angle(),
        }
    }

    fn twinkle_alpha(&self) -> f64 {
        0.6 + self.twinkle.sin() * 0.4
    }

    /// Moves the dot and bounces it off the surface edges.
    pub fn advance(&mut self, drift: Vec2, size: Size) {
        self.pos += self.vel + drift * DRIFT_STRENGTH;
        if self.pos.x < 0.0 || self.pos.x > size.w() {
            self.vel.x = -self.vel.x;
        }
        if self.pos.y < 0.0 || self.pos.y > size.h() {
            self.vel.y = -self.vel.y;
        }
    }
}

/// Link opacity factor for two dots `distance` apart: 1 when touching,
/// 0 at `LINK_DISTANCE` and beyond.
pub fn link_fade(distance: f64) -> f64 {
    (1.0 - distance / LINK_DISTANCE).max(0.0)
}

pub struct Constellation {
    dots: Vec<Dot>,
    drift_angle: f64,
}

impl Constellation {
    pub fn new(size: Size, rng: &mut Rng) -> Self {
        Self::with_dots((0..DOT_COUNT).map(|_| Dot::random(size, rng)).collect())
    }

    pub fn with_dots(dots: Vec<Dot>) -> Self {
        Constellation { dots, drift_angle: 0.0 }
    }

    pub fn dots(&self) -> &[Dot] {
        &self.dots
    }
}

impl Effect for Constellation {
    fn kind(&self) -> EffectKind {
        EffectKind::Constellation
    }

    fn frame(&mut self, canvas: &mut dyn Canvas, frame: &FrameContext) -> FrameStatus {
        let alpha = frame.alpha;
        canvas.fill_background(&Paint::vertical(0.0, 0.0, frame.height(), &[
            Rgb::new(0x02, 0x01, 0x0a).with_alpha(1.0),
            Rgb::BLACK.with_alpha(1.0),
        ]));

        self.drift_angle += DRIFT_STEP;
        let drift = Vec2::new(self.drift_angle.sin(), self.drift_angle.cos()) * DRIFT_STRENGTH;

        for i in 0..self.dots.len() {
            let dot = &mut self.dots[i];
            dot.twinkle += TWINKLE_STEP;
            let twinkle = dot.twinkle_alpha();
            let (pos, radius, color) = (dot.pos, dot.radius, dot.color);

            let glow = Paint::radial(pos, GLOW_RADIUS, vec![
                GradientStop { offset: 0.0, color: Rgb::WHITE.with_alpha(0.25 * twinkle * alpha) },
                GradientStop { offset: 1.0, color: Rgba::new(255, 255, 255, 0.0) },
            ]);
            let glow_box = Rect::from_center_size(pos, (GLOW_RADIUS * 2.0, GLOW_RADIUS * 2.0));
            canvas.fill_rect(glow_box, &glow);
            canvas.fill_circle(pos, radius, &Paint::solid(color.with_alpha(twinkle * alpha)));

            for other in &self.dots[i + 1..] {
                let distance = pos.distance(other.pos);
                if distance < LINK_DISTANCE {
                    let fade = link_fade(distance);
                    let paint = Paint::solid(LINK_COLOR.with_alpha(fade * 0.5 * alpha));
                    canvas.stroke_line(pos, other.pos, fade * 1.5, &paint);
                }
            }

            self.dots[i].advance(drift, frame.size);
        }

        FrameStatus::Continue
    }
}
