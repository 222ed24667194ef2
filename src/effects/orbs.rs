use super::*;
use kurbo::{Point, Rect, Vec2};
use crate::types::{GradientStop, Paint, Rgb};

pub const ORB_COUNT: usize = 25;
const PULSE_STEP: f64 = 0.004;
const COLORS: [Rgb; 4] = [
    Rgb::new(255, 255, 255),
    Rgb::new(150, 200, 255),
    Rgb::new(255, 200, 200),
    Rgb::new(200, 255, 220),
];

#[derive(Clone, Debug, PartialEq)]
pub struct Orb {
    pub pos: Point,
    pub radius: f64,
    pub vel: Vec2,
    pub color: Rgb,
    pub phase: f64,
}

impl Orb {
    /// Re-enters from the opposite edge once fully outside the surface.
    pub fn wrap(&mut self, size: Size) {
        let r = self.radius;
        if self.pos.x < -r {
            self.pos.x = size.w() + r;
        }
        if self.pos.x > size.w() + r {
            self.pos.x = -r;
        }
        if self.pos.y < -r {
            self.pos.y = size.h() + r;
        }
        if self.pos.y > size.h() + r {
            self.pos.y = -r;
        }
    }
}

pub struct CalmOrbs {
    orbs: Vec<Orb>,
}

impl CalmOrbs {
    pub fn new(size: Size, rng: &mut Rng) -> Self {
        let orbs = (0..ORB_COUNT)
            .map(|_| Orb {
                pos: Point::new(rng.next_f64() * size.w(), rng.next_f64() * size.h()),
                radius: rng.range(40.0, 90.0),
                vel: Vec2::new(rng.centered(0.15), rng.centered(0.15)),
                color: rng.pick(&COLORS),
                phase: rng.angle(),
            })
            .collect();
        CalmOrbs { orbs }
    }

    pub fn orbs(&self) -> &[Orb] {
        &self.orbs
    }
}

impl Effect for CalmOrbs {
    fn kind(&self) -> EffectKind {
        EffectKind::Orbs
    }

    fn frame(&mut self, canvas: &mut dyn Canvas, frame: &FrameContext) -> FrameStatus {
        let alpha = frame.alpha;
        canvas.fill_background(&Paint::vertical(0.0, 0.0, frame.height(), &[
            Rgb::new(0x00, 0x00, 0x10).with_alpha(1.0),
            Rgb::BLACK.with_alpha(1.0),
        ]));

        for orb in &mut self.orbs {
            orb.phase += PULSE_STEP;
            let pulse = 0.6 + orb.phase.sin() * 0.4;
            let glow = Paint::radial(orb.pos, orb.radius, vec![
                GradientStop { offset: 0.0, color: orb.color.with_alpha(0.25 * pulse * alpha) },
                GradientStop { offset: 0.6, color: orb.color.with_alpha(0.1 * pulse * alpha) },
                GradientStop { offset: 1.0, color: orb.color.with_alpha(0.0) },
            ]);
            let r = orb.radius;
            canvas.fill_rect(Rect::from_center_size(orb.pos, (r * 2.0, r * 2.0)), &glow);

            orb.pos += orb.vel;
            orb.wrap(frame.size);
        }

        FrameStatus::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::test_support::run_frames;
    use crate::surface::RecordingCanvas;

    fn orb(x: f64, y: f64) -> Orb {
        Orb { pos: Point::new(x, y), radius: 50.0, vel: Vec2::ZERO, color: Rgb::WHITE, phase: 0.0 }
    }

    #[test]
    fn leaving_right_edge_reenters_left() {
        let mut o = orb(400.0 + 50.0 + 0.01, 100.0);
        o.wrap(Size::new(400, 300));
        assert_eq!(o.pos.x, -50.0);
        assert_eq!(o.pos.y, 100.0);
    }

    #[test]
    fn leaving_top_edge_reenters_bottom() {
        let mut o = orb(10.0, -50.5);
        o.wrap(Size::new(400, 300));
        assert_eq!(o.pos.y, 350.0);
    }

    #[test]
    fn orb_on_the_margin_stays_put() {
        let mut o = orb(450.0, 350.0);
        o.wrap(Size::new(400, 300));
        assert_eq!(o.pos, Point::new(450.0, 350.0));
    }

    #[test]
    fn population_is_constant_while_drifting() {
        let size = Size::new(120, 90);
        let mut effect = CalmOrbs::new(size, &mut Rng::new(8));
        let mut canvas = RecordingCanvas::new(size);
        run_frames(&mut effect, &mut canvas, &BackgroundSettings::default(), 2000);
        assert_eq!(effect.orbs().len(), ORB_COUNT);
        for o in effect.orbs() {
            assert!(o.pos.x >= -o.radius && o.pos.x <= size.w() + o.radius);
            assert!(o.pos.y >= -o.radius && o.pos.y <= size.h() + o.radius);
        }
    }

    #[test]
    fn glow_never_exceeds_quarter_alpha() {
        let size = Size::new(300, 300);
        let mut effect = CalmOrbs::new(size, &mut Rng::new(8));
        let mut canvas = RecordingCanvas::new(size);
        run_frames(&mut effect, &mut canvas, &BackgroundSettings::default(), 1);
        assert_eq!(canvas.ops().len(), 1 + ORB_COUNT);
        assert!(canvas.ops().iter().skip(1).all(|op| op.paint().max_alpha() <= 0.25));
    }
}
