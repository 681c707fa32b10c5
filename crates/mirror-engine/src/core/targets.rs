use std::f32::consts::TAU;

use glam::Vec2;
use log::debug;

use crate::api::config::SessionConfig;
use crate::api::types::TargetId;
use crate::core::geometry::circle_hit;
use crate::core::rng::Rng;
use crate::core::viewport::Viewport;
use crate::render::color::{target_color, Color};

/// Smallest and largest point values; spawns pick a multiple of 10 in between.
pub const MIN_POINTS: u32 = 10;
pub const MAX_POINTS: u32 = 100;

/// Particles in the catch burst.
pub const VANISH_PARTICLES: usize = 6;
/// How far burst particles travel over the whole animation, in pixels.
const PARTICLE_SPREAD: f32 = 40.0;
/// Upward drift of the burst over the whole animation, in pixels.
const PARTICLE_RISE: f32 = 15.0;

/// Target radius for a point value: 64 px at 10 points down to 10 px at 100.
#[inline]
pub fn radius_for_points(points: u32) -> f32 {
    (35.0 - (points as f32 / 10.0) * 3.0) * 2.0
}

/// Lifecycle of a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetState {
    Falling,
    /// Caught; `phase` counts animation frames starting at 1.
    Vanishing { phase: u32 },
    /// Off-screen or finished vanishing; removed on the next update pass.
    Dead,
}

/// A falling scorable circle.
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub id: TargetId,
    pub position: Vec2,
    pub radius: f32,
    pub fall_speed: f32,
    pub points: u32,
    pub color: Color,
    pub state: TargetState,
}

impl Target {
    /// A falling target; radius and color follow from `points`.
    pub fn new(id: TargetId, points: u32, position: Vec2, fall_speed: f32) -> Self {
        Self {
            id,
            position,
            radius: radius_for_points(points),
            fall_speed,
            points,
            color: target_color(points),
            state: TargetState::Falling,
        }
    }

    pub fn is_live(&self) -> bool {
        self.state != TargetState::Dead
    }

    pub fn is_falling(&self) -> bool {
        self.state == TargetState::Falling
    }

    /// Whether a tracked point with touch radius `tolerance` touches this target.
    pub fn is_hit_by(&self, point: Vec2, tolerance: f32) -> bool {
        circle_hit(self.position, self.radius, point, tolerance)
    }

    /// Shape of the catch animation at the current phase, if vanishing.
    pub fn vanish_visual(&self, vanish_frames: u32) -> Option<VanishVisual> {
        let TargetState::Vanishing { phase } = self.state else {
            return None;
        };
        let progress = (phase as f32 / vanish_frames.max(1) as f32).min(1.0);
        let fade = 1.0 - progress;

        let mut particles = [Vec2::ZERO; VANISH_PARTICLES];
        for (i, particle) in particles.iter_mut().enumerate() {
            let angle = i as f32 / VANISH_PARTICLES as f32 * TAU;
            let reach = PARTICLE_SPREAD * progress;
            *particle = self.position
                + Vec2::new(angle.cos() * reach, angle.sin() * reach - PARTICLE_RISE * progress);
        }

        Some(VanishVisual {
            center: self.position,
            radius: self.radius * fade,
            opacity: fade,
            particles,
            particle_radius: self.radius * 0.25 * fade,
            particle_opacity: fade * 0.5,
        })
    }
}

/// Geometry of one catch-animation frame: a shrinking, fading disc plus a
/// faint radial burst drifting upward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VanishVisual {
    pub center: Vec2,
    pub radius: f32,
    pub opacity: f32,
    pub particles: [Vec2; VANISH_PARTICLES],
    pub particle_radius: f32,
    pub particle_opacity: f32,
}

/// What one update pass did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateReport {
    /// Points earned this pass.
    pub scored: u32,
    /// Targets that started vanishing this pass.
    pub caught: Vec<TargetId>,
    /// Targets that fell past the bottom edge this pass.
    pub expired: usize,
    /// Dead targets dropped from storage at the start of the pass.
    pub removed: usize,
}

/// Owns the falling targets and their lifecycle.
pub struct TargetField {
    targets: Vec<Target>,
    next_id: u32,
    fall_speed: f32,
    hit_radius: f32,
    vanish_frames: u32,
}

impl TargetField {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            targets: Vec::with_capacity(32),
            next_id: 1,
            fall_speed: config.fall_speed_px,
            hit_radius: config.landmark_hit_radius_px,
            vanish_frames: config.vanish_frames,
        }
    }

    fn next_id(&mut self) -> TargetId {
        let id = TargetId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Spawn a target with a random point value just above the viewport.
    pub fn spawn(&mut self, rng: &mut Rng, viewport: &Viewport) -> TargetId {
        let steps = MAX_POINTS / MIN_POINTS;
        let points = (rng.next_int(steps) + 1) * MIN_POINTS;
        let radius = radius_for_points(points);
        let x = rng.range(radius, viewport.width - radius);
        self.spawn_at(points, x, viewport)
    }

    /// Spawn a target worth `points` at horizontal offset `x` within the viewport.
    pub fn spawn_at(&mut self, points: u32, x: f32, viewport: &Viewport) -> TargetId {
        let id = self.next_id();
        let radius = radius_for_points(points);
        let position = viewport.origin + Vec2::new(x, -radius);
        self.targets
            .push(Target::new(id, points, position, self.fall_speed));
        id
    }

    /// Advance every target by one frame.
    ///
    /// Dead targets from the previous pass are dropped first. Falling targets
    /// move down, then test against each subject in order; the first subject
    /// with any point inside the touch radius catches the target. With
    /// `scoring` off, targets still move and animate but nothing is caught.
    pub fn update(
        &mut self,
        subjects: &[&[Vec2]],
        viewport: &Viewport,
        scoring: bool,
    ) -> UpdateReport {
        let mut report = UpdateReport::default();

        for i in (0..self.targets.len()).rev() {
            if !self.targets[i].is_live() {
                self.targets.remove(i);
                report.removed += 1;
            }
        }

        let floor = viewport.origin.y + viewport.height;
        let hit_radius = self.hit_radius;
        let vanish_frames = self.vanish_frames;
        for target in self.targets.iter_mut() {
            match target.state {
                TargetState::Vanishing { phase } => {
                    let phase = phase + 1;
                    target.state = if phase > vanish_frames {
                        TargetState::Dead
                    } else {
                        TargetState::Vanishing { phase }
                    };
                }
                TargetState::Falling => {
                    target.position.y += target.fall_speed;

                    if scoring {
                        let caught = subjects.iter().any(|points| {
                            points.iter().any(|&p| target.is_hit_by(p, hit_radius))
                        });
                        if caught {
                            target.state = TargetState::Vanishing { phase: 1 };
                            report.scored += target.points;
                            report.caught.push(target.id);
                            debug!("target {:?} caught for {} points", target.id, target.points);
                            continue;
                        }
                    }

                    if target.position.y > floor + target.radius {
                        target.state = TargetState::Dead;
                        report.expired += 1;
                    }
                }
                TargetState::Dead => {}
            }
        }

        report
    }

    /// Drop every target, including ones mid-animation.
    pub fn clear(&mut self) {
        self.targets.clear();
    }

    /// Live targets (falling or vanishing) in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = &Target> {
        self.targets.iter().filter(|t| t.is_live())
    }

    pub fn get(&self, id: TargetId) -> Option<&Target> {
        self.iter().find(|t| t.id == id)
    }

    /// Number of live targets.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Targets held in storage, including dead ones awaiting removal.
    pub fn stored_len(&self) -> usize {
        self.targets.len()
    }

    pub fn vanish_frames(&self) -> u32 {
        self.vanish_frames
    }

    pub fn hit_radius(&self) -> f32 {
        self.hit_radius
    }
}
