use crate::math as m;

use thunderdome as td;

/// Key type to look up a particle stored in a [`Context`][super::Context].
///
/// Constraints refer to particles through this key,
/// so two particles with identical physical state are never confused.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParticleKey(pub(crate) td::Index);

impl ParticleKey {
    /// Get the underlying [`thunderdome::Index`][thunderdome::Index] of this key.
    #[inline]
    pub fn index(&self) -> td::Index {
        self.0
    }
}

/// A point-mass disk. Does not rotate.
///
/// The `predicted_*` fields are scratch state during a step
/// and only become authoritative at [`Context::commit`][super::Context::commit].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub position: m::Vec2,
    pub predicted_position: m::Vec2,
    pub velocity: m::Vec2,
    pub predicted_velocity: m::Vec2,
    pub radius: f64,
    /// Not used by contact resolution, which treats every particle as equal mass.
    pub mass: f64,
}

impl Particle {
    pub fn new(position: m::Vec2, velocity: m::Vec2, radius: f64, mass: f64) -> Self {
        Self {
            position,
            predicted_position: position,
            velocity,
            predicted_velocity: velocity,
            radius,
            mass,
        }
    }

    /// Integrate a constant acceleration into the predicted velocity.
    #[inline]
    pub(crate) fn apply_acceleration(&mut self, accel: m::Vec2, dt: f64) {
        self.predicted_velocity = self.velocity + accel * dt;
    }

    /// Explicit Euler estimate of where the particle ends up this step.
    #[inline]
    pub(crate) fn predict_position(&mut self, dt: f64) {
        self.predicted_position = self.position + self.predicted_velocity * dt;
    }

    /// Linear damping of the predicted velocity.
    #[inline]
    pub(crate) fn damp(&mut self, alpha: f64) {
        self.predicted_velocity -= alpha * self.predicted_velocity;
    }

    /// Make the predicted state authoritative.
    #[inline]
    pub(crate) fn commit(&mut self) {
        self.position = self.predicted_position;
        self.velocity = self.predicted_velocity;
    }
}
