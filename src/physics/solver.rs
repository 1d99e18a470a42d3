//! Constraint projection: corrects predicted positions and velocities
//! so that detected contacts are satisfied.
//!
//! Particles are visited one at a time in insertion order, and each one
//! reads the already corrected state of the particles before it.
//! This is a single Gauss-Seidel-style pass, so results depend on order
//! and a third body can reintroduce overlap that was just resolved.

use super::{Bounds, ConstraintSet, DynamicConstraint, Particle, ParticleKey, StaticConstraint};
use crate::math::{self as m, Unit};

use super::collision::query;
use thunderdome as td;

pub(super) fn project(
    particles: &mut td::Arena<Particle>,
    constraints: &mut ConstraintSet,
    bounds: &Bounds,
) {
    let _span = tracy_span!("project constraints", "project");

    let keys: Vec<td::Index> = particles.iter().map(|(k, _)| k).collect();
    for idx in keys {
        let key = ParticleKey(idx);

        for constraint in constraints.statics_of(key) {
            if let Some(p) = particles.get_mut(idx) {
                enforce_static(constraint, p);
            }
        }

        for constraint in &mut constraints.dynamics {
            let side = match constraint.side_of(key) {
                Some(side) => side,
                None => continue,
            };
            let other_key = constraint.particles[1 - side];
            let (other_pos, other_radius) = match particles.get(other_key.0) {
                Some(other) => (other.predicted_position, other.radius),
                None => {
                    log::warn!("skipping contact with missing particle {:?}", other_key);
                    continue;
                }
            };
            if let Some(p) = particles.get_mut(idx) {
                enforce_dynamic(constraint, side, other_pos, other_radius, p);
            }
        }

        if let Some(p) = particles.get_mut(idx) {
            clamp_to_bounds(p, bounds);
        }
    }
}

/// Place the particle exactly one radius off the surface and bounce it elastically.
pub(super) fn enforce_static(constraint: &StaticConstraint, p: &mut Particle) {
    p.predicted_position = constraint.impact_point + *constraint.normal * p.radius;
    p.predicted_velocity = m::reflect(p.predicted_velocity, constraint.normal);
}

/// Resolve one side of a particle-particle contact.
///
/// The normal is recomputed from current predicted positions because
/// earlier corrections in the same pass may have moved either particle.
/// The first side resolved moves half the remaining overlap,
/// the second moves whatever overlap is left.
pub(super) fn enforce_dynamic(
    constraint: &mut DynamicConstraint,
    side: usize,
    other_pos: m::Vec2,
    other_radius: f64,
    p: &mut Particle,
) {
    let (first, second) = if side == 0 {
        (p.predicted_position, other_pos)
    } else {
        (other_pos, p.predicted_position)
    };
    let (dist, normal) = query::point_circle(second, first);

    // equal masses: swap the velocity components along the normal
    let other_vel = constraint.velocities[1 - side];
    let rel = (other_vel - p.predicted_velocity).dot(*normal);
    p.predicted_velocity += rel * *normal;

    let overlap = (p.radius + other_radius - dist).max(0.0);
    let share = if constraint.resolved[1 - side] {
        overlap
    } else {
        overlap / 2.0
    };
    let dir: Unit<m::Vec2> = if side == 0 { -normal } else { normal };
    p.predicted_position += *dir * share;

    constraint.resolved[side] = true;
}

/// Keep the particle inside the walls, reflecting the velocity axis that hit one.
pub(super) fn clamp_to_bounds(p: &mut Particle, bounds: &Bounds) {
    let (min, max) = bounds.interior(p.radius);

    if p.predicted_position.y > max.y {
        p.predicted_position.y = max.y;
        p.predicted_velocity.y = -p.predicted_velocity.y;
    }
    if p.predicted_position.y < min.y {
        p.predicted_position.y = min.y;
        p.predicted_velocity.y = -p.predicted_velocity.y;
    }
    if p.predicted_position.x > max.x {
        p.predicted_position.x = max.x;
        p.predicted_velocity.x = -p.predicted_velocity.x;
    }
    if p.predicted_position.x < min.x {
        p.predicted_position.x = min.x;
        p.predicted_velocity.x = -p.predicted_velocity.x;
    }
}
