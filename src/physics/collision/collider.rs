use super::query;
use crate::math::{self as m, Angle, Unit};
use crate::physics::{is_finite_vec, Particle, ParticleKey, PhysicsError, StaticConstraint};

use thunderdome as td;

/// Key type to look up a collider stored in a [`Context`][crate::physics::Context].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColliderKey(pub(crate) td::Index);

impl ColliderKey {
    /// Get the underlying [`thunderdome::Index`][thunderdome::Index] of this key.
    #[inline]
    pub fn index(&self) -> td::Index {
        self.0
    }
}

/// An immovable obstacle that particles bounce off.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Collider {
    /// A finite line segment through `origin`, perpendicular to `normal`,
    /// reaching `half_length` in both directions.
    ///
    /// Planes are one-sided: a contacting particle is always pushed
    /// to the side the normal faces.
    Plane {
        origin: m::Vec2,
        half_length: f64,
        normal: Unit<m::Vec2>,
    },
    Circle { origin: m::Vec2, r: f64 },
}

impl Collider {
    /// Create a plane segment tilted by `angle`.
    /// See [`Unit::from_plane_angle`] for the orientation convention.
    pub fn new_plane(origin: m::Vec2, half_length: f64, angle: Angle) -> Self {
        Collider::Plane {
            origin,
            half_length,
            normal: Unit::from_plane_angle(angle),
        }
    }

    pub fn new_circle(origin: m::Vec2, radius: f64) -> Self {
        Collider::Circle { origin, r: radius }
    }

    pub fn origin(&self) -> m::Vec2 {
        match self {
            Collider::Plane { origin, .. } | Collider::Circle { origin, .. } => *origin,
        }
    }

    /// The two ends of a plane segment, `None` for circles.
    pub fn segment_endpoints(&self) -> Option<[m::Vec2; 2]> {
        match self {
            Collider::Plane {
                origin,
                half_length,
                normal,
            } => {
                let along = m::left_normal(**normal) * *half_length;
                Some([*origin - along, *origin + along])
            }
            Collider::Circle { .. } => None,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), PhysicsError> {
        let normal = match self {
            Collider::Plane { normal, .. } => **normal,
            Collider::Circle { .. } => m::Vec2::unit_x(),
        };
        if !(is_finite_vec(self.origin()) && is_finite_vec(normal)) {
            return Err(PhysicsError::NonFiniteCollider {
                origin: self.origin(),
                normal,
            });
        }
        match *self {
            Collider::Plane { half_length, .. } if !(half_length > 0.0 && half_length.is_finite()) => {
                Err(PhysicsError::InvalidHalfLength(half_length))
            }
            Collider::Circle { r, .. } if !(r > 0.0 && r.is_finite()) => {
                Err(PhysicsError::InvalidColliderRadius(r))
            }
            _ => Ok(()),
        }
    }

    /// Test the particle's predicted position against this collider.
    pub fn check_contact(&self, key: ParticleKey, particle: &Particle) -> Option<StaticConstraint> {
        let pos = particle.predicted_position;
        match *self {
            Collider::Plane {
                origin,
                half_length,
                normal,
            } => {
                let proj = query::point_plane(pos, origin, normal);
                let along_segment = (proj.foot - origin).mag();
                if along_segment <= half_length && proj.signed_dist.abs() < particle.radius {
                    Some(StaticConstraint {
                        impact_point: proj.foot,
                        normal,
                        particle: key,
                    })
                } else {
                    None
                }
            }
            Collider::Circle { origin, r } => {
                let (dist, normal) = query::point_circle(pos, origin);
                if dist <= r + particle.radius {
                    Some(StaticConstraint {
                        impact_point: origin + r * *normal,
                        normal,
                        particle: key,
                    })
                } else {
                    None
                }
            }
        }
    }
}
