use std::f32::consts::TAU;

use glam::Vec2;
use rapier2d::prelude::*;

use crate::core::rng::Rng;

// ---------------------------------------------------------------------------
// Conversion helpers (private): glam <-> nalgebra
// ---------------------------------------------------------------------------

fn vec2_to_na(v: Vec2) -> nalgebra::Vector2<f32> {
    nalgebra::Vector2::new(v.x, v.y)
}

fn na_to_vec2(v: &nalgebra::Vector2<f32>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

/// Wall thickness around the canvas, in pixels.
pub const WALL_THICKNESS: f32 = 20.0;
/// Radius of the bouncing ball, in pixels.
pub const BALL_RADIUS: f32 = 10.0;
/// Launch speed in pixels per frame at the reference 60 Hz.
pub const BALL_SPEED_PER_FRAME: f32 = 5.0;

const FRAME_DT: f32 = 1.0 / 60.0;

// ---------------------------------------------------------------------------
// Rapier state
// ---------------------------------------------------------------------------

/// Zero-gravity Rapier pipeline stepped at a fixed 60 Hz.
/// Every collider is elastic and frictionless.
struct Simulation {
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
}

impl Simulation {
    fn new() -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = FRAME_DT;
        Self {
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
        }
    }

    fn attach(&mut self, body: RigidBody, collider: ColliderBuilder) -> RigidBodyHandle {
        let handle = self.bodies.insert(body);
        let collider = collider.restitution(1.0).friction(0.0).build();
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);
        handle
    }

    /// Fixed box centered at `center`.
    fn add_wall(&mut self, center: Vec2, half_extents: Vec2) {
        let body = RigidBodyBuilder::fixed()
            .translation(vec2_to_na(center))
            .build();
        self.attach(body, ColliderBuilder::cuboid(half_extents.x, half_extents.y));
    }

    /// Dynamic ball with continuous collision detection, so it cannot
    /// tunnel through a wall in one step.
    fn add_ball(&mut self, center: Vec2, radius: f32, velocity: Vec2) -> RigidBodyHandle {
        let body = RigidBodyBuilder::dynamic()
            .translation(vec2_to_na(center))
            .linvel(vec2_to_na(velocity))
            .ccd_enabled(true)
            .angular_damping(0.0)
            .build();
        self.attach(body, ColliderBuilder::ball(radius))
    }

    fn step(&mut self) {
        self.physics_pipeline.step(
            &vector![0.0, 0.0],
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    fn position(&self, handle: RigidBodyHandle) -> Vec2 {
        self.bodies
            .get(handle)
            .map(|rb| na_to_vec2(&rb.position().translation.vector))
            .unwrap_or(Vec2::ZERO)
    }

    fn velocity(&self, handle: RigidBodyHandle) -> Vec2 {
        self.bodies
            .get(handle)
            .map(|rb| na_to_vec2(rb.linvel()))
            .unwrap_or(Vec2::ZERO)
    }
}

// ---------------------------------------------------------------------------
// BounceArena
// ---------------------------------------------------------------------------

/// Zero-gravity box with one elastic ball, sized to the canvas.
/// Stepped once per frame; knows nothing about landmarks.
pub struct BounceArena {
    sim: Simulation,
    ball: RigidBodyHandle,
    size: Vec2,
}

impl BounceArena {
    /// Ball at the canvas center, launched at a random angle.
    pub fn new(size: Vec2, rng: &mut Rng) -> Self {
        let angle = rng.next_f32() * TAU;
        Self::launched(size, angle)
    }

    /// Ball at the canvas center, launched along `angle` (radians).
    pub fn launched(size: Vec2, angle: f32) -> Self {
        let mut sim = Simulation::new();

        // Walls sit just outside the canvas and overlap at the corners.
        let half = WALL_THICKNESS / 2.0;
        let horizontal = Vec2::new(size.x / 2.0 + WALL_THICKNESS, half);
        let vertical = Vec2::new(half, size.y / 2.0 + WALL_THICKNESS);
        sim.add_wall(Vec2::new(size.x / 2.0, -half), horizontal);
        sim.add_wall(Vec2::new(size.x / 2.0, size.y + half), horizontal);
        sim.add_wall(Vec2::new(-half, size.y / 2.0), vertical);
        sim.add_wall(Vec2::new(size.x + half, size.y / 2.0), vertical);

        let speed = BALL_SPEED_PER_FRAME / FRAME_DT;
        let velocity = Vec2::new(angle.cos(), angle.sin()) * speed;
        let ball = sim.add_ball(size / 2.0, BALL_RADIUS, velocity);

        Self { sim, ball, size }
    }

    /// Advance one frame.
    pub fn step(&mut self) {
        self.sim.step();
    }

    pub fn ball_position(&self) -> Vec2 {
        self.sim.position(self.ball)
    }

    pub fn ball_velocity(&self) -> Vec2 {
        self.sim.velocity(self.ball)
    }

    pub fn ball_radius(&self) -> f32 {
        BALL_RADIUS
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arena_has_four_walls_and_a_ball() {
        let arena = BounceArena::launched(Vec2::new(400.0, 300.0), 0.0);
        assert_eq!(arena.sim.bodies.len(), 5);
        assert_eq!(arena.ball_position(), Vec2::new(200.0, 150.0));
    }

    #[test]
    fn ball_moves_five_pixels_per_frame() {
        let mut arena = BounceArena::launched(Vec2::new(400.0, 300.0), 0.0);
        arena.step();
        let moved = arena.ball_position().x - 200.0;
        assert!((moved - 5.0).abs() < 0.1, "moved {moved}");
    }

    #[test]
    fn ball_bounces_off_right_wall() {
        let mut arena = BounceArena::launched(Vec2::new(100.0, 100.0), 0.0);
        for _ in 0..15 {
            arena.step();
        }
        let v = arena.ball_velocity();
        assert!(v.x < 0.0, "ball should be heading left, velocity {v:?}");
        assert!((v.length() - 300.0).abs() < 5.0, "speed changed: {}", v.length());
    }

    #[test]
    fn ball_stays_inside_and_keeps_moving() {
        let size = Vec2::new(200.0, 120.0);
        let mut rng = Rng::new(5);
        let mut arena = BounceArena::new(size, &mut rng);
        for frame in 0..600 {
            arena.step();
            let p = arena.ball_position();
            assert!(
                p.x > -BALL_RADIUS && p.x < size.x + BALL_RADIUS,
                "escaped horizontally at frame {frame}: {p:?}"
            );
            assert!(
                p.y > -BALL_RADIUS && p.y < size.y + BALL_RADIUS,
                "escaped vertically at frame {frame}: {p:?}"
            );
        }
        let speed = arena.ball_velocity().length();
        assert!(speed > 150.0, "ball lost too much energy: {speed}");
    }
}
