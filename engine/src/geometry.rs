//! 2-D point arithmetic and affine transforms.
//!
//! This is the lowest layer of the engine: every other module builds on
//! [`Xy`] and [`Affine`]. Both are pure, total and infallible -- there is no
//! error path through this module.

use std::ops::{Add, Div, Mul, Sub};

/// A point or vector in 2-D space, always in device inches once it leaves
/// the SVG/G-code front-ends.
///
/// Equality is deliberately not derived: proximity tests throughout the
/// engine use `(a - b).norm() < 1e-6` rather than bitwise comparison, since
/// every value here is the result of floating point arithmetic.
#[derive(Debug, Default, Clone, Copy)]
pub struct Xy {
    pub x: f64,
    pub y: f64,
}

impl Xy {
    pub const ZERO: Xy = Xy { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn norm(self) -> f64 {
        self.squared_norm().sqrt()
    }

    pub fn squared_norm(self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    /// Rotate by `angle` radians about the origin.
    pub fn rotated(self, angle: f64) -> Xy {
        let (sin, cos) = angle.sin_cos();
        Xy::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    /// `true` if `self` and `other` are within `1e-6` of each other, the
    /// proximity tolerance used throughout the engine (spec §3).
    pub fn is_close(self, other: Xy) -> bool {
        (self - other).norm() < 1e-6
    }
}

impl Add for Xy {
    type Output = Xy;
    fn add(self, rhs: Xy) -> Xy {
        Xy::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Xy {
    type Output = Xy;
    fn sub(self, rhs: Xy) -> Xy {
        Xy::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Xy {
    type Output = Xy;
    fn mul(self, rhs: f64) -> Xy {
        Xy::new(self.x * rhs, self.y * rhs)
    }
}

impl Mul<Xy> for f64 {
    type Output = Xy;
    fn mul(self, rhs: Xy) -> Xy {
        rhs * self
    }
}

impl Div<f64> for Xy {
    type Output = Xy;
    fn div(self, rhs: f64) -> Xy {
        Xy::new(self.x / rhs, self.y / rhs)
    }
}

/// An affine transform `T(p) = L*p + t`, where `L` is the 2x2 linear part
/// `[[a, c], [b, d]]` and `t` is the translation `(e, f)`.
///
/// This mirrors the six-parameter form used by both SVG's `matrix()`
/// transform function and the original `set_transform(a, b, c, d, e, f)`
/// call (spec §4.4).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Affine {
    pub const IDENTITY: Affine = Affine {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    pub const fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub const fn translation(e: f64, f: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, e, f)
    }

    pub const fn scale(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Apply `L*p + t`.
    pub fn apply(&self, p: Xy) -> Xy {
        Xy::new(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }

    /// Compose so that `(self * other).apply(p) == self.apply(other.apply(p))`,
    /// i.e. `other` is applied first. Child transforms post-multiply the
    /// parent (spec §3: "composition must be right-multiplicative").
    pub fn then(&self, other: &Affine) -> Affine {
        Affine::new(
            other.a * self.a + other.b * self.c,
            other.a * self.b + other.b * self.d,
            other.c * self.a + other.d * self.c,
            other.c * self.b + other.d * self.d,
            other.e * self.a + other.f * self.c + self.e,
            other.e * self.b + other.f * self.d + self.f,
        )
    }
}

impl Mul for Affine {
    type Output = Affine;
    /// `self * rhs` applies `rhs` first, then `self` -- standard matrix
    /// composition order.
    fn mul(self, rhs: Affine) -> Affine {
        self.then(&rhs)
    }
}

impl Default for Affine {
    fn default() -> Self {
        Affine::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn xy_arithmetic() {
        let a = Xy::new(1.0, 2.0);
        let b = Xy::new(3.0, 4.0);
        assert_eq!((a + b).x, 4.0);
        assert_eq!((a - b).y, -2.0);
        assert_eq!((a * 2.0).x, 2.0);
        assert_eq!((2.0 * a).x, 2.0);
        assert_eq!((b / 2.0).y, 2.0);
        assert_eq!(a.squared_norm(), 5.0);
    }

    #[test]
    fn identity_is_noop() {
        let p = Xy::new(3.0, -4.0);
        assert!(Affine::IDENTITY.apply(p).is_close(p));
    }

    #[test]
    fn translation_then_scale_is_right_multiplicative() {
        // child (translation) should be applied first, then parent (scale)
        let parent = Affine::scale(2.0, 2.0);
        let child = Affine::translation(1.0, 1.0);
        let composed = parent.then(&child);
        let p = Xy::new(0.0, 0.0);
        // expect: scale(translate(p)) = scale((1,1)) = (2,2)
        assert!(composed.apply(p).is_close(Xy::new(2.0, 2.0)));
    }

    #[test]
    fn rotation_quarter_turn() {
        let p = Xy::new(1.0, 0.0);
        let rotated = p.rotated(std::f64::consts::FRAC_PI_2);
        assert!(rotated.is_close(Xy::new(0.0, 1.0)));
    }
}
