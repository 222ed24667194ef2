use kurbo::{Point, Rect};
use crate::types::{Paint, Size};

/// Drawing target for the effects. The browser backend is a Canvas2D
/// context; `RecordingCanvas` keeps the operations for inspection.
pub trait Canvas {
    fn size(&self) -> Size;
    fn resize(&mut self, size: Size);
    fn clear(&mut self);
    fn fill_rect(&mut self, rect: Rect, paint: &Paint);
    fn fill_circle(&mut self, center: Point, radius: f64, paint: &Paint);
    fn stroke_line(&mut self, from: Point, to: Point, width: f64, paint: &Paint);
    fn fill_polygon(&mut self, points: &[Point], paint: &Paint);
    fn fill_text(&mut self, text: &str, origin: Point, font_px: f64, paint: &Paint);

    fn fill_background(&mut self, paint: &Paint) {
        let bounds = self.size().bounds();
        self.fill_rect(bounds, paint);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    FillRect { rect: Rect, paint: Paint },
    FillCircle { center: Point, radius: f64, paint: Paint },
    StrokeLine { from: Point, to: Point, width: f64, paint: Paint },
    FillPolygon { points: Vec<Point>, paint: Paint },
    FillText { text: String, origin: Point, font_px: f64, paint: Paint },
}

impl DrawOp {
    pub fn paint(&self) -> &Paint {
        match self {
            DrawOp::FillRect { paint, .. }
            | DrawOp::FillCircle { paint, .. }
            | DrawOp::StrokeLine { paint, .. }
            | DrawOp::FillPolygon { paint, .. }
            | DrawOp::FillText { paint, .. } => paint,
        }
    }
}

/// Canvas that remembers what was drawn since the last clear.
#[derive(Clone, Debug, Default)]
pub struct RecordingCanvas {
    size: Size,
    ops: Vec<DrawOp>,
    clears: usize,
}

impl RecordingCanvas {
    pub fn new(size: Size) -> Self {
        RecordingCanvas { size, ops: Vec::new(), clears: 0 }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn take_ops(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }

    pub fn is_blank(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn clear_count(&self) -> usize {
        self.clears
    }

    pub fn lines(&self) -> impl Iterator<Item = &DrawOp> {
        self.ops.iter().filter(|op| matches!(op, DrawOp::StrokeLine { .. }))
    }

    pub fn texts(&self) -> impl Iterator<Item = &DrawOp> {
        self.ops.iter().filter(|op| matches!(op, DrawOp::FillText { .. }))
    }
}

impl Canvas for RecordingCanvas {
    fn size(&self) -> Size {
        self.size
    }

    fn resize(&mut self, size: Size) {
        // Resizing a real canvas wipes its backing store.
        self.size = size;
        self.ops.clear();
    }

    fn clear(&mut self) {
        self.ops.clear();
        self.clears += 1;
    }

    fn fill_rect(&mut self, rect: Rect, paint: &Paint) {
        self.ops.push(DrawOp::FillRect { rect, paint: paint.clone() });
    }

    fn fill_circle(&mut self, center: Point, radius: f64, paint: &Paint) {
        self.ops.push(DrawOp::FillCircle { center, radius, paint: paint.clone() });
    }

    fn stroke_line(&mut self, from: Point, to: Point, width: f64, paint: &Paint) {
        self.ops.push(DrawOp::StrokeLine { from, to, width, paint: paint.clone() });
    }

    fn fill_polygon(&mut self, points: &[Point], paint: &Paint) {
        self.ops.push(DrawOp::FillPolygon { points: points.to_vec(), paint: paint.clone() });
    }

    fn fill_text(&mut self, text: &str, origin: Point, font_px: f64, paint: &Paint) {
        self.ops.push(DrawOp::FillText {
            text: text.to_string(),
            origin,
            font_px,
            paint: paint.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rgba;

    #[test]
    fn clear_drops_recorded_ops() {
        let mut canvas = RecordingCanvas::new(Size::new(10, 10));
        canvas.fill_background(&Paint::solid(Rgba::new(0, 0, 16, 1.0)));
        assert_eq!(canvas.ops().len(), 1);
        canvas.clear();
        assert!(canvas.is_blank());
        assert_eq!(canvas.clear_count(), 1);
    }

    #[test]
    fn background_covers_the_surface() {
        let mut canvas = RecordingCanvas::new(Size::new(320, 200));
        canvas.fill_background(&Paint::solid(Rgba::TRANSPARENT));
        match &canvas.ops()[0] {
            DrawOp::FillRect { rect, .. } => assert_eq!(*rect, Rect::new(0.0, 0.0, 320.0, 200.0)),
            other => panic!("unexpected op {other:?}"),
        }
    }
}
