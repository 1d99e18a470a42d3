//! Serializable description of a simulation setup.
//!
//! Reading the description from disk is up to the caller;
//! any serde format works, e.g. RON:
//!
//! ```text
//! (
//!     gravity: (0.0, 9.81),
//!     friction: 0.0,
//!     bounds: (width: 1000.0, height: 300.0),
//!     colliders: [
//!         Plane(origin: (700.0, 80.0), half_length: 200.0, angle: Rad(0.0)),
//!         Circle(origin: (200.0, 50.0), radius: 30.0),
//!     ],
//!     particles: [
//!         (position: (120.0, 40.0), velocity: (30.0, -40.0)),
//!     ],
//! )
//! ```

use crate::math::{self as m, Angle};
use crate::physics::{Bounds, Collider, Context, PhysicsError, SimParams};

#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct Scene {
    pub gravity: [f64; 2],
    pub friction: f64,
    pub bounds: Bounds,
    pub colliders: Vec<ColliderDesc>,
    pub particles: Vec<ParticleDesc>,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            gravity: [0.0, 0.0],
            friction: 0.0,
            bounds: Bounds::default(),
            colliders: vec![],
            particles: vec![],
        }
    }
}

#[derive(Clone, Copy, Debug, serde::Deserialize, serde::Serialize)]
pub enum ColliderDesc {
    Plane {
        origin: [f64; 2],
        half_length: f64,
        #[serde(default)]
        angle: Angle,
    },
    Circle {
        origin: [f64; 2],
        radius: f64,
    },
}

impl From<ColliderDesc> for Collider {
    fn from(desc: ColliderDesc) -> Self {
        match desc {
            ColliderDesc::Plane {
                origin,
                half_length,
                angle,
            } => Collider::new_plane(origin.into(), half_length, angle),
            ColliderDesc::Circle { origin, radius } => Collider::new_circle(origin.into(), radius),
        }
    }
}

#[derive(Clone, Copy, Debug, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct ParticleDesc {
    pub position: [f64; 2],
    pub velocity: [f64; 2],
    pub radius: f64,
    pub mass: f64,
}

impl Default for ParticleDesc {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0],
            velocity: [0.0, 0.0],
            radius: 10.0,
            mass: 2.0,
        }
    }
}

impl Scene {
    pub fn params(&self) -> SimParams {
        SimParams {
            field: self.gravity.into(),
            friction: self.friction,
            bounds: self.bounds,
        }
    }

    /// Build a simulation from this description, validating every entry.
    pub fn instantiate(&self) -> Result<Context, PhysicsError> {
        let mut ctx = Context::with_params(self.params())?;
        for desc in &self.colliders {
            ctx.add_collider(Collider::from(*desc))?;
        }
        for desc in &self.particles {
            ctx.add_particle(
                m::Vec2::from(desc.position),
                m::Vec2::from(desc.velocity),
                desc.radius,
                desc.mass,
            )?;
        }
        Ok(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // two narrow channels, a ramp and a few round obstacles
    const OBSTACLE_COURSE: &str = r#"(
        gravity: (0.0, 9.81),
        bounds: (width: 1000.0, height: 300.0),
        colliders: [
            Plane(origin: (700.0, 80.0), half_length: 200.0, angle: Rad(0.0)),
            Plane(origin: (700.0, 100.0), half_length: 200.0, angle: Rad(-3.141592653589793)),
            Plane(origin: (500.0, 90.0), half_length: 10.0, angle: Deg(90.0)),
            Plane(origin: (900.0, 90.0), half_length: 10.0, angle: Deg(-90.0)),
            Plane(origin: (700.0, 140.0), half_length: 200.0),
            Plane(origin: (700.0, 150.0), half_length: 200.0, angle: Deg(180.0)),
            Plane(origin: (500.0, 145.0), half_length: 5.0, angle: Deg(90.0)),
            Plane(origin: (900.0, 145.0), half_length: 5.0, angle: Deg(-90.0)),
            Plane(origin: (100.0, 150.0), half_length: 100.0, angle: Deg(-22.5)),
            Plane(origin: (100.0, 188.27), half_length: 92.39, angle: Deg(-180.0)),
            Circle(origin: (200.0, 50.0), radius: 30.0),
            Circle(origin: (350.0, 150.0), radius: 20.0),
            Circle(origin: (600.0, 200.0), radius: 10.0),
        ],
        particles: [
            (position: (60.0, 40.0), velocity: (30.0, -40.0)),
            (position: (210.0, 20.0), velocity: (30.0, -40.0)),
            (position: (340.0, 60.0), velocity: (30.0, -40.0)),
            (position: (345.0, 70.0), velocity: (-30.0, 10.0), radius: 6.0),
            (position: (620.0, 40.0)),
            (position: (640.0, 45.0)),
        ],
    )"#;

    fn load() -> Scene {
        ron::de::from_str(OBSTACLE_COURSE).expect("scene should parse")
    }

    #[test]
    fn parses_with_defaults() {
        let scene = load();
        assert_eq!(scene.colliders.len(), 13);
        assert_eq!(scene.particles.len(), 6);
        assert_eq!(scene.friction, 0.0);
        assert_eq!(scene.bounds.margin, Bounds::DEFAULT_MARGIN);
        assert_eq!(scene.particles[4].radius, 10.0);
        assert_eq!(scene.particles[4].mass, 2.0);
        assert_eq!(scene.particles[3].radius, 6.0);
        assert!(matches!(
            scene.colliders[4],
            ColliderDesc::Plane {
                angle: Angle::Rad(a),
                ..
            } if a == 0.0
        ));
    }

    #[test]
    fn instantiates_and_runs() {
        let mut ctx = load().instantiate().unwrap();
        assert_eq!(ctx.collider_count(), 13);
        assert_eq!(ctx.particle_count(), 6);
        assert_eq!(ctx.params().field, m::Vec2::new(0.0, 9.81));

        // 20 ms frames at a 1:10 time scale
        for _ in 0..500 {
            ctx.step(0.2).unwrap();
        }
        for (_, p) in ctx.particles() {
            let (min, max) = ctx.params().bounds.interior(p.radius);
            assert!(p.position.x.is_finite() && p.position.y.is_finite());
            assert!(p.velocity.x.is_finite() && p.velocity.y.is_finite());
            assert!(p.position.x >= min.x - 1e-9 && p.position.x <= max.x + 1e-9);
            assert!(p.position.y >= min.y - 1e-9 && p.position.y <= max.y + 1e-9);
        }
    }

    #[test]
    fn invalid_entries_are_rejected() {
        let mut scene = load();
        scene.particles.push(ParticleDesc {
            radius: 0.0,
            ..Default::default()
        });
        assert_eq!(
            scene.instantiate().err(),
            Some(PhysicsError::InvalidRadius(0.0))
        );

        let mut scene = load();
        scene.friction = 1.5;
        assert_eq!(
            scene.instantiate().err(),
            Some(PhysicsError::InvalidFriction(1.5))
        );
    }

    #[test]
    fn round_trips_through_ron() {
        let scene = load();
        let text = ron::ser::to_string(&scene).unwrap();
        let back: Scene = ron::de::from_str(&text).unwrap();
        assert_eq!(back.colliders.len(), scene.colliders.len());
        assert_eq!(back.bounds, scene.bounds);
    }
}
