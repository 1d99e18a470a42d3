use crate::math as m;

use itertools::Itertools;
use thunderdome as td;

//

pub mod collision;
pub use collision::{Collider, ColliderKey};

pub mod constraint;
pub use constraint::{ConstraintSet, DynamicConstraint, StaticConstraint};

pub mod particle;
pub use particle::{Particle, ParticleKey};

mod solver;

//

/// Errors from invalid parameters passed to the simulation.
#[derive(thiserror::Error, Clone, Copy, Debug, PartialEq)]
pub enum PhysicsError {
    #[error("Particle radius must be positive, got {0}")]
    InvalidRadius(f64),
    #[error("Particle mass must be positive, got {0}")]
    InvalidMass(f64),
    #[error("Plane half length must be positive, got {0}")]
    InvalidHalfLength(f64),
    #[error("Circle collider radius must be positive, got {0}")]
    InvalidColliderRadius(f64),
    #[error("Friction coefficient must be in [0, 1), got {0}")]
    InvalidFriction(f64),
    #[error("Timestep must be positive, got {0}")]
    InvalidTimestep(f64),
    #[error("Bounds must be positive and larger than twice the margin, got {width}x{height} with margin {margin}")]
    InvalidBounds { width: f64, height: f64, margin: f64 },
    #[error("Particle position must be finite, got {0:?}")]
    NonFinitePosition(m::Vec2),
    #[error("Particle velocity must be finite, got {0:?}")]
    NonFiniteVelocity(m::Vec2),
    #[error("Force field must be finite, got {0:?}")]
    NonFiniteField(m::Vec2),
    #[error("Collider geometry must be finite, got origin {origin:?} and normal {normal:?}")]
    NonFiniteCollider { origin: m::Vec2, normal: m::Vec2 },
}

#[inline]
fn is_positive(x: f64) -> bool {
    x > 0.0 && x.is_finite()
}

#[inline]
pub(crate) fn is_finite_vec(v: m::Vec2) -> bool {
    v.x.is_finite() && v.y.is_finite()
}

/// Rectangular domain whose edges act as implicit walls.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde-types", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde-types", serde(default))]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
    /// Thickness of the walls. A particle's center stays at least
    /// `margin + radius` away from every edge.
    pub margin: f64,
}

impl Bounds {
    pub const DEFAULT_MARGIN: f64 = 10.0;

    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            margin: Self::DEFAULT_MARGIN,
        }
    }

    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    /// Corners of the region the center of a particle with the given radius may occupy.
    #[inline]
    pub fn interior(&self, radius: f64) -> (m::Vec2, m::Vec2) {
        let inset = self.margin + radius;
        (
            m::Vec2::new(inset, inset),
            m::Vec2::new(self.width - inset, self.height - inset),
        )
    }

    fn validate(&self) -> Result<(), PhysicsError> {
        let margin_ok = self.margin >= 0.0 && self.margin.is_finite();
        if is_positive(self.width)
            && is_positive(self.height)
            && margin_ok
            && self.width > 2.0 * self.margin
            && self.height > 2.0 * self.margin
        {
            Ok(())
        } else {
            Err(PhysicsError::InvalidBounds {
                width: self.width,
                height: self.height,
                margin: self.margin,
            })
        }
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

/// Simulation-wide parameters.
///
/// ```
/// use discsim::{math::Vec2, physics::SimParams};
///
/// let params = SimParams::default()
///     .with_field(Vec2::new(0.0, 9.81))
///     .with_friction(0.01)
///     .with_bounds(1024.0, 768.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimParams {
    /// Constant acceleration applied to every particle.
    pub field: m::Vec2,
    /// Linear velocity damping per step, in `[0, 1)`.
    pub friction: f64,
    pub bounds: Bounds,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            field: m::Vec2::zero(),
            friction: 0.0,
            bounds: Bounds::default(),
        }
    }
}

impl SimParams {
    pub fn with_field(mut self, field: m::Vec2) -> Self {
        self.field = field;
        self
    }

    pub fn with_friction(mut self, friction: f64) -> Self {
        self.friction = friction;
        self
    }

    pub fn with_bounds(mut self, width: f64, height: f64) -> Self {
        self.bounds.width = width;
        self.bounds.height = height;
        self
    }

    pub fn with_margin(mut self, margin: f64) -> Self {
        self.bounds.margin = margin;
        self
    }

    fn validate(&self) -> Result<(), PhysicsError> {
        if !is_finite_vec(self.field) {
            return Err(PhysicsError::NonFiniteField(self.field));
        }
        if !(0.0..1.0).contains(&self.friction) {
            return Err(PhysicsError::InvalidFriction(self.friction));
        }
        self.bounds.validate()
    }
}

/// Owns the particles and obstacles and advances them in discrete steps.
///
/// A step runs a fixed pipeline:
/// external force, position prediction, static and dynamic contact detection,
/// projection (including the walls), constraint cleanup, friction, commit.
/// Each stage is also callable on its own.
pub struct Context {
    particles: td::Arena<Particle>,
    colliders: td::Arena<Collider>,
    constraints: ConstraintSet,
    params: SimParams,
}

impl Default for Context {
    fn default() -> Self {
        Self {
            particles: td::Arena::new(),
            colliders: td::Arena::new(),
            constraints: ConstraintSet::new(),
            params: SimParams::default(),
        }
    }
}

impl Context {
    /// Create an empty simulation with the given domain size and default parameters.
    pub fn new(width: f64, height: f64) -> Result<Self, PhysicsError> {
        Self::with_params(SimParams::default().with_bounds(width, height))
    }

    pub fn with_params(params: SimParams) -> Result<Self, PhysicsError> {
        params.validate()?;
        Ok(Self {
            params,
            ..Default::default()
        })
    }

    //
    // population
    //

    /// Add a particle. Must not be called in the middle of a manually driven step.
    pub fn add_particle(
        &mut self,
        position: m::Vec2,
        velocity: m::Vec2,
        radius: f64,
        mass: f64,
    ) -> Result<ParticleKey, PhysicsError> {
        if !is_positive(radius) {
            return Err(PhysicsError::InvalidRadius(radius));
        }
        if !is_positive(mass) {
            return Err(PhysicsError::InvalidMass(mass));
        }
        if !is_finite_vec(position) {
            return Err(PhysicsError::NonFinitePosition(position));
        }
        if !is_finite_vec(velocity) {
            return Err(PhysicsError::NonFiniteVelocity(velocity));
        }
        let key = ParticleKey(
            self.particles
                .insert(Particle::new(position, velocity, radius, mass)),
        );
        log::debug!("added particle {:?} at {:?}", key, position);
        Ok(key)
    }

    pub fn add_collider(&mut self, collider: Collider) -> Result<ColliderKey, PhysicsError> {
        collider.validate()?;
        let key = ColliderKey(self.colliders.insert(collider));
        log::debug!("added collider {:?}: {:?}", key, collider);
        Ok(key)
    }

    //
    // parameters
    //

    pub fn params(&self) -> &SimParams {
        &self.params
    }

    pub fn set_force_field(&mut self, field: m::Vec2) -> Result<(), PhysicsError> {
        if !is_finite_vec(field) {
            return Err(PhysicsError::NonFiniteField(field));
        }
        self.params.field = field;
        Ok(())
    }

    pub fn set_friction(&mut self, alpha: f64) -> Result<(), PhysicsError> {
        if !(0.0..1.0).contains(&alpha) {
            return Err(PhysicsError::InvalidFriction(alpha));
        }
        self.params.friction = alpha;
        Ok(())
    }

    /// Resize the domain, keeping the current wall margin.
    pub fn set_bounds(&mut self, width: f64, height: f64) -> Result<(), PhysicsError> {
        let bounds = Bounds {
            width,
            height,
            ..self.params.bounds
        };
        bounds.validate()?;
        self.params.bounds = bounds;
        Ok(())
    }

    //
    // read access
    //

    pub fn particles(&self) -> impl Iterator<Item = (ParticleKey, &Particle)> + '_ {
        self.particles.iter().map(|(k, p)| (ParticleKey(k), p))
    }

    pub fn particle(&self, key: ParticleKey) -> Option<&Particle> {
        self.particles.get(key.0)
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    pub fn colliders(&self) -> impl Iterator<Item = (ColliderKey, &Collider)> + '_ {
        self.colliders.iter().map(|(k, c)| (ColliderKey(k), c))
    }

    pub fn collider(&self, key: ColliderKey) -> Option<&Collider> {
        self.colliders.get(key.0)
    }

    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    /// Contacts detected in the step currently being driven.
    /// Always empty between calls to [`step`][Self::step].
    pub fn constraints(&self) -> &ConstraintSet {
        &self.constraints
    }

    //
    // stepping
    //

    /// Advance the simulation by `dt`.
    pub fn step(&mut self, dt: f64) -> Result<(), PhysicsError> {
        if !is_positive(dt) {
            return Err(PhysicsError::InvalidTimestep(dt));
        }
        let _span = tracy_span!("physics step", "step");

        self.apply_external_force(dt);
        self.update_expected_position(dt);
        self.add_static_contact_constraints();
        self.add_dynamic_contact_constraints();
        log::trace!(
            "step dt={}: {} particles, {} static contacts, {} dynamic contacts",
            dt,
            self.particles.len(),
            self.constraints.statics.len(),
            self.constraints.dynamics.len(),
        );
        self.project_constraints();
        self.delete_contact_constraints();
        self.apply_friction();
        self.commit();
        Ok(())
    }

    /// Integrate the force field into every particle's predicted velocity.
    pub fn apply_external_force(&mut self, dt: f64) {
        let _span = tracy_span!("external force", "apply_external_force");
        let field = self.params.field;

        #[cfg(feature = "parallel")]
        {
            use rayon::iter::{ParallelBridge, ParallelIterator};
            self.particles
                .iter_mut()
                .par_bridge()
                .for_each(|(_, p)| p.apply_acceleration(field, dt));
        }
        #[cfg(not(feature = "parallel"))]
        for (_, p) in self.particles.iter_mut() {
            p.apply_acceleration(field, dt);
        }
    }

    /// Move every predicted position along the predicted velocity.
    pub fn update_expected_position(&mut self, dt: f64) {
        let _span = tracy_span!("predict positions", "update_expected_position");

        #[cfg(feature = "parallel")]
        {
            use rayon::iter::{ParallelBridge, ParallelIterator};
            self.particles
                .iter_mut()
                .par_bridge()
                .for_each(|(_, p)| p.predict_position(dt));
        }
        #[cfg(not(feature = "parallel"))]
        for (_, p) in self.particles.iter_mut() {
            p.predict_position(dt);
        }
    }

    /// Test every particle against every collider.
    /// A particle touching several colliders gets one constraint per collider.
    pub fn add_static_contact_constraints(&mut self) {
        let _span = tracy_span!("static contacts", "add_static_contact_constraints");

        for (_, coll) in self.colliders.iter() {
            for (idx, p) in self.particles.iter() {
                if let Some(c) = coll.check_contact(ParticleKey(idx), p) {
                    self.constraints.statics.push(c);
                }
            }
        }
    }

    /// Test every unordered pair of particles once.
    pub fn add_dynamic_contact_constraints(&mut self) {
        let _span = tracy_span!("dynamic contacts", "add_dynamic_contact_constraints");

        let particles: Vec<(td::Index, &Particle)> = self.particles.iter().collect();
        for ((k1, p1), (k2, p2)) in particles.iter().copied().tuple_combinations() {
            let (dist, normal) =
                collision::query::point_circle(p2.predicted_position, p1.predicted_position);
            if dist < p1.radius + p2.radius {
                self.constraints.dynamics.push(DynamicConstraint::new(
                    p1.predicted_position + *normal * p1.radius,
                    [ParticleKey(k1), ParticleKey(k2)],
                    [p1.predicted_velocity, p2.predicted_velocity],
                ));
            }
        }
    }

    /// Resolve all detected contacts and the walls, one particle at a time.
    pub fn project_constraints(&mut self) {
        solver::project(
            &mut self.particles,
            &mut self.constraints,
            &self.params.bounds,
        );
    }

    pub fn delete_contact_constraints(&mut self) {
        let _span = tracy_span!("delete contacts", "delete_contact_constraints");
        self.constraints.clear();
    }

    pub fn apply_friction(&mut self) {
        let _span = tracy_span!("friction", "apply_friction");
        let alpha = self.params.friction;
        if alpha == 0.0 {
            return;
        }
        for (_, p) in self.particles.iter_mut() {
            p.damp(alpha);
        }
    }

    /// Make predicted positions and velocities the real ones.
    pub fn commit(&mut self) {
        let _span = tracy_span!("commit", "commit");
        for (_, p) in self.particles.iter_mut() {
            p.commit();
        }
    }
}
