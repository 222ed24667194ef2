use super::*;
use kurbo::{Point, Rect, Vec2};
use crate::types::{GradientStop, Paint, Rgb};

pub const STAR_COUNT: usize = 300;
pub const FIELD_OF_VIEW: f64 = 300.0;
pub const MAX_DEPTH: f64 = 1000.0;
const SPEED: f64 = 0.02;
/// Depth covered per frame.
pub const APPROACH: f64 = SPEED * MAX_DEPTH * 0.01;
const DRIFT_STEP: f64 = 0.001;
const COLORS: [Rgb; 4] = [
    Rgb::new(0xff, 0xff, 0xff),
    Rgb::new(0xff, 0xe9, 0xc4),
    Rgb::new(0xd4, 0xfb, 0xff),
    Rgb::new(0xff, 0xd2, 0xa1),
];

#[derive(Clone, Debug, PartialEq)]
pub struct Star {
    /// Offset from the surface centre before projection.
    pub offset: Point,
    pub depth: f64,
    pub color: Rgb,
    pub size: f64,
}

impl Star {
    fn spawn(size: Size, depth: f64, rng: &mut Rng) -> Star {
        Star {
            offset: Point::new(rng.centered(size.w()), rng.centered(size.h())),
            depth,
            color: rng.pick(&COLORS),
            size: rng.range(0.5, 2.5),
        }
    }

    /// Closeness in `[0, 1]`: 0 at the far plane, 1 at the camera.
    pub fn proximity(&self) -> f64 {
        (MAX_DEPTH - self.depth) / MAX_DEPTH
    }

    pub fn project(&self, drift: Vec2, size: Size) -> Point {
        let k = FIELD_OF_VIEW / self.depth;
        Point::new(
            (self.offset.x + drift.x * self.depth) * k + size.w() / 2.0,
            (self.offset.y + drift.y * self.depth) * k + size.h() / 2.0,
        )
    }
}

pub struct Starfield {
    stars: Vec<Star>,
    drift_angle: f64,
    rng: Rng,
}

impl Starfield {
    pub fn new(size: Size, rng: &mut Rng) -> Self {
        let stars = (0..STAR_COUNT)
            .map(|_| {
                let depth = rng.next_f64() * MAX_DEPTH;
                Star::spawn(size, depth, rng)
            })
            .collect();
        Starfield { stars, drift_angle: 0.0, rng: rng.fork() }
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    /// Moves one star toward the camera; a star that reaches it respawns
    /// at the far plane in the same step.
    pub fn advance_star(star: &mut Star, size: Size, rng: &mut Rng) {
        star.depth -= APPROACH;
        if star.depth <= 0.0 {
            *star = Star::spawn(size, MAX_DEPTH, rng);
        }
    }
}

impl Effect for Starfield {
    fn kind(&self) -> EffectKind {
        EffectKind::NightSky
    }

    fn frame(&mut self, canvas: &mut dyn Canvas, frame: &FrameContext) -> FrameStatus {
        let alpha = frame.alpha;
        canvas.fill_background(&Paint::vertical(0.0, 0.0, frame.height(), &[
            Rgb::new(0x00, 0x00, 0x10).with_alpha(1.0),
            Rgb::BLACK.with_alpha(1.0),
        ]));

        self.drift_angle += DRIFT_STEP;
        let drift = Vec2::new(self.drift_angle.sin() * 0.3, self.drift_angle.cos() * 0.2);

        for star in &mut self.stars {
            Self::advance_star(star, frame.size, &mut self.rng);

            let p = star.project(drift, frame.size);
            let twinkle = 0.8 + (frame.time_ms * 0.002 + star.depth).sin() * 0.2;
            let size = star.proximity() * star.size * twinkle;
            let a = star.proximity() * twinkle * alpha;

            let streak = Paint::solid(Rgb::WHITE.with_alpha(a * 0.5));
            canvas.stroke_line(p, p - drift * 8.0, size * 0.2, &streak);

            let glow_radius = size * 5.0;
            let glow = Paint::radial(p, glow_radius, vec![
                GradientStop { offset: 0.0, color: star.color.with_alpha(alpha) },
                GradientStop { offset: 1.0, color: star.color.with_alpha(0.0) },
            ]);
            let glow_box = Rect::from_center_size(p, (glow_radius * 2.0, glow_radius * 2.0));
            canvas.fill_rect(glow_box, &glow);

            canvas.fill_circle(p, size, &Paint::solid(Rgb::WHITE.with_alpha(a)));
        }

        FrameStatus::Continue
    }
}
