//! Types, aliases and helper operations for doing math with `ultraviolet`.
use std::f64::consts::PI;
pub use ultraviolet as uv;

pub type Vec2 = uv::DVec2;

/// An angle in either degrees or radians.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde-types", derive(serde::Deserialize, serde::Serialize))]
pub enum Angle {
    Rad(f64),
    Deg(f64),
}
impl Angle {
    /// Get the angle as degrees.
    #[inline]
    pub fn deg(&self) -> f64 {
        match self {
            Angle::Rad(rad) => rad * 180.0 / PI,
            Angle::Deg(deg) => *deg,
        }
    }

    /// Get the angle as radians.
    #[inline]
    pub fn rad(&self) -> f64 {
        match self {
            Angle::Rad(rad) => *rad,
            Angle::Deg(deg) => deg * PI / 180.0,
        }
    }
}
impl Default for Angle {
    fn default() -> Self {
        Angle::Rad(0.0)
    }
}

/// A wrapper type to indicate a vector should always be normalized.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Unit<T>(T);

impl Unit<Vec2> {
    pub fn new_normalize(v: Vec2) -> Self {
        Unit(v.normalized())
    }

    pub const fn new_unchecked(v: Vec2) -> Self {
        Unit(v)
    }

    pub fn unit_x() -> Self {
        Unit(Vec2::unit_x())
    }

    /// The normal of a plane tilted by `angle`.
    ///
    /// Coordinates are screen-like with y growing downwards,
    /// so an angle of zero gives a floor facing up, `(0, -1)`.
    pub fn from_plane_angle(angle: Angle) -> Self {
        let a = angle.rad();
        Unit(Vec2::new(-a.sin(), -a.cos()))
    }
}

impl<T> std::ops::Deref for Unit<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> std::ops::Neg for Unit<T>
where
    T: std::ops::Neg,
{
    type Output = Unit<<T as std::ops::Neg>::Output>;

    fn neg(self) -> Self::Output {
        Unit(-self.0)
    }
}

// Vec2 utils

#[inline]
pub fn left_normal(v: Vec2) -> Vec2 {
    Vec2::new(-v.y, v.x)
}

/// Mirror a vector about the line perpendicular to `n`.
/// Preserves magnitude, flips the component along `n`.
#[inline]
pub fn reflect(v: Vec2, n: Unit<Vec2>) -> Vec2 {
    v - 2.0 * v.dot(*n) * *n
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plane_angles() {
        let floor = Unit::from_plane_angle(Angle::Rad(0.0));
        assert!((floor.x - 0.0).abs() < 1e-12 && (floor.y + 1.0).abs() < 1e-12);

        let ceiling = Unit::from_plane_angle(Angle::Deg(180.0));
        assert!(ceiling.x.abs() < 1e-12 && (ceiling.y - 1.0).abs() < 1e-12);

        assert!((Angle::Rad(PI / 2.0).deg() - 90.0).abs() < 1e-12);
        let wall = Unit::from_plane_angle(Angle::Rad(PI / 2.0));
        assert!((wall.x + 1.0).abs() < 1e-12 && wall.y.abs() < 1e-12);
    }

    #[test]
    fn reflection_keeps_speed() {
        let n = Unit::new_normalize(Vec2::new(1.0, 2.0));
        let v = Vec2::new(-3.0, 0.5);
        let r = reflect(v, n);
        assert!((r.mag() - v.mag()).abs() < 1e-12);
        assert!((r.dot(*n) + v.dot(*n)).abs() < 1e-12);
        // tangential part untouched
        let t = left_normal(*n);
        assert!((r.dot(t) - v.dot(t)).abs() < 1e-12);
    }
}
