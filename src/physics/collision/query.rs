//! Stateless point queries against the obstacle shapes.
//!
//! These are the building blocks of the collider contact tests
//! and of dynamic contact resolution.

use crate::math::{self as m, Unit};

/// Squared distances below this are treated as coincident points
/// and get the fallback normal instead of a normalized direction.
pub const DEGENERATE_DIST_SQ: f64 = 1e-12;

/// Normal used whenever two points coincide and no direction can be computed.
#[inline]
pub fn fallback_normal() -> Unit<m::Vec2> {
    Unit::unit_x()
}

/// Result of projecting a point onto the infinite line of a plane.
#[derive(Clone, Copy, Debug)]
pub struct PlaneProjection {
    /// Signed distance from the line, positive on the side the normal faces.
    pub signed_dist: f64,
    /// Orthogonal projection of the point onto the line.
    pub foot: m::Vec2,
}

/// Project `point` onto the line through `origin` perpendicular to `normal`.
pub fn point_plane(point: m::Vec2, origin: m::Vec2, normal: Unit<m::Vec2>) -> PlaneProjection {
    let signed_dist = normal.dot(point - origin);
    PlaneProjection {
        signed_dist,
        foot: point - signed_dist * *normal,
    }
}

/// Distance from `center` to `point` and the unit direction pointing at `point`.
///
/// If the two coincide the direction is [`fallback_normal`].
pub fn point_circle(point: m::Vec2, center: m::Vec2) -> (f64, Unit<m::Vec2>) {
    let diff = point - center;
    let dist_sq = diff.mag_sq();
    if dist_sq < DEGENERATE_DIST_SQ {
        log::debug!("coincident points at {:?}, using fallback normal", point);
        return (dist_sq.sqrt(), fallback_normal());
    }
    let dist = dist_sq.sqrt();
    (dist, Unit::new_unchecked(diff / dist))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plane_signed_distance() {
        let floor = Unit::new_unchecked(m::Vec2::new(0.0, -1.0));
        let origin = m::Vec2::new(100.0, 190.0);

        let above = point_plane(m::Vec2::new(130.0, 185.0), origin, floor);
        assert_eq!(above.signed_dist, 5.0);
        assert_eq!(above.foot, m::Vec2::new(130.0, 190.0));

        let below = point_plane(m::Vec2::new(70.0, 193.0), origin, floor);
        assert_eq!(below.signed_dist, -3.0);
        assert_eq!(below.foot, m::Vec2::new(70.0, 190.0));

        let on_line = point_plane(m::Vec2::new(100.0, 190.0), origin, floor);
        assert_eq!(on_line.signed_dist, 0.0);
    }

    #[test]
    fn tilted_plane_foot_lies_on_line() {
        let n = Unit::new_normalize(m::Vec2::new(1.0, 1.0));
        let origin = m::Vec2::new(2.0, -1.0);
        let proj = point_plane(m::Vec2::new(5.0, 4.0), origin, n);
        assert!(n.dot(proj.foot - origin).abs() < 1e-12);
        assert!((proj.signed_dist - 8.0 / 2f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn circle_direction() {
        let (dist, n) = point_circle(m::Vec2::new(3.0, 4.0), m::Vec2::zero());
        assert_eq!(dist, 5.0);
        assert!((n.x - 0.6).abs() < 1e-12 && (n.y - 0.8).abs() < 1e-12);
    }

    #[test]
    fn coincident_points_use_fallback() {
        let p = m::Vec2::new(7.0, 7.0);
        let (dist, n) = point_circle(p, p);
        assert_eq!(dist, 0.0);
        assert_eq!(n, fallback_normal());
        assert!(!n.x.is_nan() && !n.y.is_nan());
    }
}
