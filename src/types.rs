use kurbo::{Point, Rect};
use serde::{Serialize, Deserialize};

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Size { width, height }
    }

    pub fn w(&self) -> f64 {
        self.width as f64
    }

    pub fn h(&self) -> f64 {
        self.height as f64
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.w(), self.h())
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    pub fn with_alpha(self, a: f64) -> Rgba {
        Rgba { r: self.r, g: self.g, b: self.b, a }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0.0);

    pub const fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Rgba { r, g, b, a }
    }

    pub fn rgb(&self) -> Rgb {
        Rgb::new(self.r, self.g, self.b)
    }

    /// Same colour with its alpha multiplied by `factor`.
    pub fn fade(self, factor: f64) -> Rgba {
        Rgba { a: self.a * factor, ..self }
    }

    pub fn to_css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug)]
pub struct GradientStop {
    pub offset: f64, // 0.0 to 1.0
    pub color: Rgba,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct LinearGradient {
    pub start: Point,
    pub end: Point,
    pub stops: Vec<GradientStop>,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct RadialGradient {
    pub center: Point,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub stops: Vec<GradientStop>,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub enum Paint {
    Solid(Rgba),
    Linear(LinearGradient),
    Radial(RadialGradient),
}

impl Paint {
    pub fn solid(color: Rgba) -> Paint {
        Paint::Solid(color)
    }

    /// Top-to-bottom gradient between `top` and `bottom`, stops evenly spaced.
    pub fn vertical(x: f64, top: f64, bottom: f64, colors: &[Rgba]) -> Paint {
        Paint::Linear(LinearGradient {
            start: Point::new(x, top),
            end: Point::new(x, bottom),
            stops: even_stops(colors),
        })
    }

    pub fn radial(center: Point, radius: f64, stops: Vec<GradientStop>) -> Paint {
        Paint::Radial(RadialGradient { center, inner_radius: 0.0, outer_radius: radius, stops })
    }

    /// Largest alpha any part of this paint can produce.
    pub fn max_alpha(&self) -> f64 {
        match self {
            Paint::Solid(c) => c.a,
            Paint::Linear(g) => g.stops.iter().map(|s| s.color.a).fold(0.0, f64::max),
            Paint::Radial(g) => g.stops.iter().map(|s| s.color.a).fold(0.0, f64::max),
        }
    }
}

fn even_stops(colors: &[Rgba]) -> Vec<GradientStop> {
    let last = colors.len().saturating_sub(1).max(1) as f64;
    colors
        .iter()
        .enumerate()
        .map(|(i, &color)| GradientStop { offset: i as f64 / last, color })
        .collect()
}
