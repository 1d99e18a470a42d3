//! Per-step contact records.
//!
//! Constraints are generated from the predicted positions of a step,
//! consumed once by the projection and then thrown away.

use super::ParticleKey;
use crate::math::{self as m, Unit};

/// Contact between a particle and an immovable collider.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StaticConstraint {
    /// Point on the collider surface closest to the particle.
    pub impact_point: m::Vec2,
    /// Surface normal at the impact point, facing the side the particle is pushed to.
    pub normal: Unit<m::Vec2>,
    pub particle: ParticleKey,
}

/// Contact between two particles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DynamicConstraint {
    /// Point on the surface of the first particle, towards the second.
    pub impact_point: m::Vec2,
    pub particles: [ParticleKey; 2],
    /// Predicted velocities of both participants when the contact was detected.
    /// Each side exchanges against the other's captured velocity,
    /// so the result doesn't depend on which side is resolved first.
    pub velocities: [m::Vec2; 2],
    /// Which sides have already been resolved in the current projection pass.
    pub(crate) resolved: [bool; 2],
}

impl DynamicConstraint {
    pub fn new(
        impact_point: m::Vec2,
        particles: [ParticleKey; 2],
        velocities: [m::Vec2; 2],
    ) -> Self {
        Self {
            impact_point,
            particles,
            velocities,
            resolved: [false, false],
        }
    }

    /// The index (0 or 1) of `key` in this constraint, if it takes part.
    #[inline]
    pub fn side_of(&self, key: ParticleKey) -> Option<usize> {
        self.particles.iter().position(|&p| p == key)
    }

    #[inline]
    pub fn is_resolved(&self, side: usize) -> bool {
        self.resolved[side]
    }
}

/// The constraints detected during one step.
#[derive(Clone, Debug, Default)]
pub struct ConstraintSet {
    pub(crate) statics: Vec<StaticConstraint>,
    pub(crate) dynamics: Vec<DynamicConstraint>,
}

impl ConstraintSet {
    #[inline]
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub fn statics(&self) -> &[StaticConstraint] {
        &self.statics
    }

    pub fn dynamics(&self) -> &[DynamicConstraint] {
        &self.dynamics
    }

    /// Static constraints attached to the given particle.
    pub fn statics_of(&self, key: ParticleKey) -> impl Iterator<Item = &StaticConstraint> + '_ {
        self.statics.iter().filter(move |c| c.particle == key)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.statics.is_empty() && self.dynamics.is_empty()
    }

    #[inline]
    pub(crate) fn clear(&mut self) {
        self.statics.clear();
        self.dynamics.clear();
    }
}
