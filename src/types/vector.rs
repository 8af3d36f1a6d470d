//! Planar vector type used for all coordinates

use nalgebra::{Point2, Rotation2};
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// 2D vector / point
///
/// Drawings handled by this crate are planar; every point is written as a
/// pair of group codes (`n`, `n + 10`).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

impl Vector2 {
    /// Create a new 2D vector
    pub const fn new(x: f64, y: f64) -> Self {
        Vector2 { x, y }
    }

    /// Zero vector
    pub const ZERO: Vector2 = Vector2::new(0.0, 0.0);

    /// Unit X vector
    pub const UNIT_X: Vector2 = Vector2::new(1.0, 0.0);

    /// Unit Y vector
    pub const UNIT_Y: Vector2 = Vector2::new(0.0, 1.0);

    /// Unit vector at `angle` radians from the X axis
    pub fn from_angle(angle: f64) -> Self {
        Vector2::new(angle.cos(), angle.sin())
    }

    /// Calculate the length (magnitude) of the vector
    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Normalize the vector (make it unit length)
    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0 {
            Vector2::new(self.x / len, self.y / len)
        } else {
            *self
        }
    }

    /// Dot product
    pub fn dot(&self, other: &Vector2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Distance to another point
    pub fn distance(&self, other: &Vector2) -> f64 {
        (*self - *other).length()
    }

    /// Angle of the vector from the X axis, in radians
    pub fn angle(&self) -> f64 {
        self.y.atan2(self.x)
    }

    /// Rotate about the origin by `angle` radians (counter-clockwise)
    pub fn rotate(&self, angle: f64) -> Self {
        let p = Rotation2::new(angle) * Point2::new(self.x, self.y);
        Vector2::new(p.x, p.y)
    }

    /// Rotate about `center` by `angle` radians (counter-clockwise)
    pub fn rotate_about(&self, center: Vector2, angle: f64) -> Self {
        (*self - center).rotate(angle) + center
    }

    /// Component-wise approximate equality
    pub fn approx_eq(&self, other: &Vector2, epsilon: f64) -> bool {
        (self.x - other.x).abs() <= epsilon && (self.y - other.y).abs() <= epsilon
    }
}

impl From<(f64, f64)> for Vector2 {
    fn from((x, y): (f64, f64)) -> Self {
        Vector2::new(x, y)
    }
}

impl Add for Vector2 {
    type Output = Vector2;
    fn add(self, other: Vector2) -> Vector2 {
        Vector2::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Vector2 {
    type Output = Vector2;
    fn sub(self, other: Vector2) -> Vector2 {
        Vector2::new(self.x - other.x, self.y - other.y)
    }
}

impl Mul<f64> for Vector2 {
    type Output = Vector2;
    fn mul(self, scalar: f64) -> Vector2 {
        Vector2::new(self.x * scalar, self.y * scalar)
    }
}

impl Div<f64> for Vector2 {
    type Output = Vector2;
    fn div(self, scalar: f64) -> Vector2 {
        Vector2::new(self.x / scalar, self.y / scalar)
    }
}

impl Neg for Vector2 {
    type Output = Vector2;
    fn neg(self) -> Vector2 {
        Vector2::new(-self.x, -self.y)
    }
}

impl fmt::Display for Vector2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Axis-aligned bounds of a point set: (center, width, height).
///
/// Returns `None` for an empty slice.
pub fn center_and_size(points: &[Vector2]) -> Option<(Vector2, f64, f64)> {
    let first = points.first()?;
    let (mut min, mut max) = (*first, *first);
    for p in &points[1..] {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    Some(((min + max) / 2.0, max.x - min.x, max.y - min.y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_vector_ops() {
        let a = Vector2::new(1.0, 2.0);
        let b = Vector2::new(3.0, 4.0);
        assert_eq!(a + b, Vector2::new(4.0, 6.0));
        assert_eq!(b - a, Vector2::new(2.0, 2.0));
        assert_eq!(a * 2.0, Vector2::new(2.0, 4.0));
        assert_eq!(-a, Vector2::new(-1.0, -2.0));
        assert_eq!(a.dot(&b), 11.0);
    }

    #[test]
    fn test_rotate_about() {
        let p = Vector2::new(2.0, 1.0);
        let r = p.rotate_about(Vector2::new(1.0, 1.0), FRAC_PI_2);
        assert!(r.approx_eq(&Vector2::new(1.0, 2.0), 1e-12));
    }

    #[test]
    fn test_angle() {
        assert!((Vector2::UNIT_Y.angle() - FRAC_PI_2).abs() < 1e-12);
        assert!(Vector2::from_angle(0.0).approx_eq(&Vector2::UNIT_X, 1e-12));
    }

    #[test]
    fn test_center_and_size() {
        let pts = [Vector2::new(0.0, 0.0), Vector2::new(4.0, 2.0), Vector2::new(1.0, -2.0)];
        let (c, w, h) = center_and_size(&pts).unwrap();
        assert_eq!(c, Vector2::new(2.0, 0.0));
        assert_eq!(w, 4.0);
        assert_eq!(h, 4.0);
        assert!(center_and_size(&[]).is_none());
    }
}
