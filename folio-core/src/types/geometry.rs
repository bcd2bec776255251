//! Page-space geometry

use serde::{Deserialize, Serialize};

/// Tolerance used when comparing two placement rectangles
pub const RECT_EPSILON: f32 = 0.5;

/// Axis-aligned rectangle in page coordinates (y grows downward)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Rect {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl Rect {
    pub const fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Rectangle anchored at the origin
    pub const fn from_size(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    pub fn width(&self) -> f32 {
        (self.x1 - self.x0).max(0.0)
    }

    pub fn height(&self) -> f32 {
        (self.y1 - self.y0).max(0.0)
    }

    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// Whether both rectangles describe the same placement within [`RECT_EPSILON`]
    pub fn approx_eq(&self, other: &Rect) -> bool {
        (self.x0 - other.x0).abs() <= RECT_EPSILON
            && (self.y0 - other.y0).abs() <= RECT_EPSILON
            && (self.x1 - other.x1).abs() <= RECT_EPSILON
            && (self.y1 - other.y1).abs() <= RECT_EPSILON
    }
}

impl From<[f32; 4]> for Rect {
    fn from(r: [f32; 4]) -> Self {
        Rect::new(r[0], r[1], r[2], r[3])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions() {
        let r = Rect::new(10.0, 20.0, 110.0, 70.0);
        assert_eq!(r.width(), 100.0);
        assert_eq!(r.height(), 50.0);
        assert_eq!(r.area(), 5000.0);
    }

    #[test]
    fn test_inverted_rect_has_no_area() {
        let r = Rect::new(50.0, 50.0, 10.0, 10.0);
        assert_eq!(r.area(), 0.0);
    }

    #[test]
    fn test_approx_eq() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(a.approx_eq(&Rect::new(0.3, -0.2, 100.4, 99.9)));
        assert!(!a.approx_eq(&Rect::new(0.0, 2.0, 100.0, 100.0)));
    }
}
