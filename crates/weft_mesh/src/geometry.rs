//! 2D vector math and cubic Bézier evaluation

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

/// 2D vector with f32 components
///
/// Used both as a normalized (0..1) mesh-space position and as a relative
/// tangent-handle offset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn dot(self, other: Vec2) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// Unit vector in the same direction. Callers guard against zero length.
    pub fn normalized(self) -> Vec2 {
        let len = self.length();
        Vec2::new(self.x / len, self.y / len)
    }

    /// Component-wise multiply (e.g. normalized position × canvas size)
    pub fn scale(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x * other.x, self.y * other.y)
    }

    pub fn lerp(a: Vec2, b: Vec2, t: f32) -> Vec2 {
        Vec2::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

/// Linear interpolation between two scalars
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Evaluate a cubic Bézier curve at parameter `t`.
///
/// `B(t) = (1-t)³p0 + 3(1-t)²t·p1 + 3(1-t)t²·p2 + t³p3`
///
/// `t ∈ [0, 1]`; no clamping is performed — callers guarantee range.
#[inline]
pub fn cubic_bezier(p0: f32, p1: f32, p2: f32, p3: f32, t: f32) -> f32 {
    let mt = 1.0 - t;
    let mt2 = mt * mt;
    let t2 = t * t;
    mt2 * mt * p0 + 3.0 * mt2 * t * p1 + 3.0 * mt * t2 * p2 + t2 * t * p3
}

/// Evaluate a cubic Bézier curve over 2D control points, per axis
#[inline]
pub fn cubic_bezier_vec2(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, t: f32) -> Vec2 {
    Vec2::new(
        cubic_bezier(p0.x, p1.x, p2.x, p3.x, t),
        cubic_bezier(p0.y, p1.y, p2.y, p3.y, t),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bezier_hits_endpoints() {
        assert_eq!(cubic_bezier(2.0, 5.0, -1.0, 8.0, 0.0), 2.0);
        assert_eq!(cubic_bezier(2.0, 5.0, -1.0, 8.0, 1.0), 8.0);
    }

    #[test]
    fn bezier_straight_line_is_linear() {
        // Control points on the chord at 1/3 and 2/3 degenerate to a line
        let p0 = 0.0;
        let p3 = 3.0;
        let v = cubic_bezier(p0, 1.0, 2.0, p3, 0.25);
        assert!((v - 0.75).abs() < 1e-6);
    }

    #[test]
    fn bezier_vec2_evaluates_per_axis() {
        let a = Vec2::new(0.0, 10.0);
        let b = Vec2::new(1.0, 10.0);
        let c = Vec2::new(2.0, 10.0);
        let d = Vec2::new(3.0, 10.0);
        let p = cubic_bezier_vec2(a, b, c, d, 0.5);
        assert!((p.x - 1.5).abs() < 1e-6);
        assert!((p.y - 10.0).abs() < 1e-6);
    }

    #[test]
    fn normalized_has_unit_length() {
        let v = Vec2::new(3.0, 4.0).normalized();
        assert!((v.length() - 1.0).abs() < 1e-6);
        assert!((v.x - 0.6).abs() < 1e-6);
    }

    #[test]
    fn lerp_endpoints() {
        assert_eq!(lerp(2.0, 6.0, 0.0), 2.0);
        assert_eq!(lerp(2.0, 6.0, 1.0), 6.0);
        assert_eq!(lerp(2.0, 6.0, 0.5), 4.0);
    }
}
