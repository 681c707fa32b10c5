use glam::Vec2;
use log::info;

use crate::api::config::SessionConfig;
use crate::api::error::EngineError;
use crate::api::types::{DetectionResult, TargetId};
use crate::api::variant::{CollisionSubjects, PixelEffect, VariantProfile};
use crate::core::clock::{GameClock, GameState};
use crate::core::mapper::ScreenLandmarks;
#[cfg(feature = "physics")]
use crate::core::physics::BounceArena;
use crate::core::region::RegionMask;
use crate::core::rng::Rng;
use crate::core::targets::TargetField;
use crate::core::viewport::Layout;

/// What happened during one step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    /// 1-based processed-frame counter.
    pub frame: u64,
    pub spawned: Option<TargetId>,
    pub scored: u32,
    pub caught: Vec<TargetId>,
    /// True only on the frame the game ended.
    pub ended: bool,
}

/// All mutable state of one game session.
///
/// Nothing here is global: hosts create one per mounted game and feed it
/// one detection result per frame.
pub struct Session {
    profile: VariantProfile,
    config: SessionConfig,
    layout: Layout,
    clock: GameClock,
    targets: TargetField,
    rng: Rng,
    frame_count: u64,
    landmarks: ScreenLandmarks,
    region: Option<RegionMask>,
    #[cfg(feature = "physics")]
    arena: Option<BounceArena>,
}

impl Session {
    pub fn new(
        profile: VariantProfile,
        config: SessionConfig,
        layout: Layout,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        if layout.canvas.x <= 0.0 || layout.canvas.y <= 0.0 {
            return Err(EngineError::InvalidGeometry(format!(
                "canvas must have positive size, got {}x{}",
                layout.canvas.x, layout.canvas.y
            )));
        }

        let mut rng = Rng::new(config.seed);

        #[cfg(feature = "physics")]
        let arena = profile
            .physics_ball
            .then(|| BounceArena::new(layout.canvas, &mut rng));
        #[cfg(not(feature = "physics"))]
        if profile.physics_ball {
            log::warn!("variant `{}` wants a physics ball but physics is disabled", profile.name);
        }

        info!(
            "session `{}` started: canvas {}x{}, camera {}x{}",
            profile.name, layout.canvas.x, layout.canvas.y, layout.camera.width, layout.camera.height
        );

        Ok(Self {
            targets: TargetField::new(&config),
            clock: GameClock::new(config.game_duration_ms),
            profile,
            config,
            layout,
            rng,
            frame_count: 0,
            landmarks: ScreenLandmarks::default(),
            region: None,
            #[cfg(feature = "physics")]
            arena,
        })
    }

    /// Run one frame: clock, spawn, landmark mapping, target update,
    /// scoring and physics, in that order.
    pub fn step(&mut self, detection: &DetectionResult, now_ms: f64) -> FrameReport {
        let mut report = FrameReport::default();
        let runs_game = self.profile.targets;

        if runs_game {
            report.ended = self.clock.tick(now_ms);
        }
        self.frame_count += 1;
        report.frame = self.frame_count;

        let playing = self.clock.state().is_playing();
        let camera = self.layout.camera;

        if runs_game
            && playing
            && self.frame_count % self.config.spawn_interval_frames as u64 == 0
        {
            report.spawned = Some(self.targets.spawn(&mut self.rng, &camera));
        }

        self.landmarks = ScreenLandmarks::from_result(detection, &camera);
        self.region = match self.profile.pixel_effect {
            PixelEffect::None => None,
            _ => RegionMask::from_landmarks(&self.landmarks),
        };

        if runs_game {
            let subjects = collision_subjects(self.profile.collision, &self.landmarks);
            let update = self.targets.update(&subjects, &camera, playing);
            if update.scored > 0 && self.clock.add_score(update.scored) {
                report.scored = update.scored;
            }
            report.caught = update.caught;
        }

        #[cfg(feature = "physics")]
        if let Some(arena) = self.arena.as_mut() {
            arena.step();
        }

        report
    }

    /// Back to a fresh game. Safe at any point, including mid-animation.
    pub fn restart(&mut self, now_ms: f64) {
        self.clock.restart(now_ms);
        self.targets.clear();
        self.frame_count = 0;
        info!("session `{}` restarted", self.profile.name);
    }

    pub fn profile(&self) -> &VariantProfile {
        &self.profile
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn state(&self) -> &GameState {
        self.clock.state()
    }

    pub fn remaining_secs(&self) -> f64 {
        self.clock.remaining_secs()
    }

    pub fn targets(&self) -> &TargetField {
        &self.targets
    }

    pub fn targets_mut(&mut self) -> &mut TargetField {
        &mut self.targets
    }

    /// This frame's landmarks in canvas pixels.
    pub fn landmarks(&self) -> &ScreenLandmarks {
        &self.landmarks
    }

    /// This frame's two-hand region, if the variant uses one and it exists.
    pub fn region(&self) -> Option<&RegionMask> {
        self.region.as_ref()
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Center and radius of the physics ball, when the variant has one.
    pub fn ball(&self) -> Option<(Vec2, f32)> {
        #[cfg(feature = "physics")]
        {
            self.arena
                .as_ref()
                .map(|arena| (arena.ball_position(), arena.ball_radius()))
        }
        #[cfg(not(feature = "physics"))]
        {
            None
        }
    }
}

/// Point slices that may catch targets this frame.
fn collision_subjects(selector: CollisionSubjects, landmarks: &ScreenLandmarks) -> Vec<&[Vec2]> {
    match selector {
        CollisionSubjects::All => landmarks.subjects().iter().map(Vec::as_slice).collect(),
        CollisionSubjects::FirstSubject => landmarks.subject(0).into_iter().collect(),
        CollisionSubjects::None => Vec::new(),
    }
}
