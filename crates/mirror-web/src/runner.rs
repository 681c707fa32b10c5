use log::{debug, info, warn};

use mirror_engine::{
    ConfigOverrides, DetectorHandle, Detector, DrawList, EngineError, FrameCompositor, FrameLoop,
    FrameReport, FrameScheduler, Freshness, GamePhase, InputEvent, InputQueue, LoopState,
    NoStream, Session, StreamHandle, ThrottledDetector, VariantProfile,
};

/// What a frame callback did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameOutcome {
    /// False when the loop was not running and the callback was ignored.
    pub stepped: bool,
    /// The player asked to leave. The caller invokes its navigation
    /// callback once it no longer holds the runner.
    pub return_to_menu: bool,
}

/// Generic session runner that wires one session to the host's frame loop.
///
/// The page keeps a single runner in a `thread_local!` and drives it through
/// free `#[wasm_bindgen]` functions, because wasm-bindgen cannot export
/// generic structs directly.
pub struct SessionRunner<D: Detector, S: FrameScheduler> {
    session: Session,
    detector: ThrottledDetector<D>,
    frame_loop: FrameLoop<S>,
    stream: Box<dyn StreamHandle>,
    compositor: FrameCompositor,
    input: InputQueue,
    last_report: FrameReport,
}

impl<D: Detector, S: FrameScheduler> SessionRunner<D, S> {
    pub fn new(session: Session, detector: DetectorHandle<D>, scheduler: S) -> Self {
        let every = session.config().detect_every_n_frames;
        Self {
            session,
            detector: ThrottledDetector::new(detector, every),
            frame_loop: FrameLoop::new(scheduler),
            stream: Box::new(NoStream),
            compositor: FrameCompositor::new(),
            input: InputQueue::new(),
            last_report: FrameReport::default(),
        }
    }

    /// Build the named variant's session for a source of
    /// `source_width`×`source_height` shown in the given container.
    /// `seed` drives spawn randomness unless the overrides pin one.
    pub fn for_variant(
        variant: &str,
        overrides_json: &str,
        seed: u64,
        source: (f32, f32),
        container: (f32, f32),
        detector: DetectorHandle<D>,
        scheduler: S,
    ) -> Result<Self, EngineError> {
        let profile = VariantProfile::by_name(variant)?;
        let overrides = ConfigOverrides::from_json(overrides_json)?.with_default_seed(seed);
        let config = profile.config(&overrides)?;
        let layout = profile.layout(source.0, source.1, container.0, container.1, &config)?;
        let session = Session::new(profile, config, layout)?;
        Ok(Self::new(session, detector, scheduler))
    }

    /// Attach the live camera stream released on teardown.
    pub fn with_stream(mut self, stream: Box<dyn StreamHandle>) -> Self {
        self.stream = stream;
        self
    }

    pub fn set_stream(&mut self, stream: Box<dyn StreamHandle>) {
        self.stream = stream;
    }

    /// Arm the first frame.
    pub fn start(&mut self) {
        self.frame_loop.start();
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Run one frame to completion and re-arm the loop.
    ///
    /// `pixels` is the mirrored video frame read back from the canvas; the
    /// variant's pixel effect is applied to it in place. The runner never
    /// navigates itself; a return request is only reported.
    pub fn on_frame(
        &mut self,
        now_ms: f64,
        frame: &D::Frame,
        pixels: Option<(&mut [u8], u32, u32)>,
    ) -> FrameOutcome {
        if !self.frame_loop.should_step() {
            return FrameOutcome::default();
        }

        let return_to_menu = self.handle_input(now_ms);

        let (detection, freshness) = self.detector.step(frame, now_ms);
        if freshness == Freshness::Fresh {
            debug!("detected {} subject(s)", detection.subject_count());
        }
        self.last_report = self.session.step(detection, now_ms);

        let processed = match pixels {
            Some((bytes, width, height)) => {
                match self.compositor.process_pixels(&self.session, bytes, width, height) {
                    Ok(processed) => processed,
                    Err(e) => {
                        warn!("skipping pixel effect: {e}");
                        false
                    }
                }
            }
            None => false,
        };
        self.compositor.compose(&self.session, processed);

        self.frame_loop.rearm();
        FrameOutcome {
            stepped: true,
            return_to_menu,
        }
    }

    /// Apply queued events. Returns whether the player asked to leave.
    fn handle_input(&mut self, now_ms: f64) -> bool {
        let mut return_to_menu = false;
        for event in self.input.drain() {
            match event {
                InputEvent::PointerDown { client, displayed } => {
                    if self.session.state().phase != GamePhase::Ended {
                        continue;
                    }
                    let canvas = self.session.layout().canvas;
                    let hit = self
                        .compositor
                        .restart_control()
                        .is_some_and(|control| control.contains_client(client, &displayed, canvas));
                    if hit {
                        self.session.restart(now_ms);
                    }
                }
                InputEvent::Restart => self.session.restart(now_ms),
                InputEvent::ReturnToMenu => return_to_menu = true,
            }
        }
        return_to_menu
    }

    /// Stop scheduling, close the detector and release the stream.
    /// Safe to call more than once.
    pub fn teardown(&mut self) {
        if self.frame_loop.stop(self.stream.as_mut()) {
            self.detector.close();
            info!("session `{}` torn down", self.session.profile().name);
        }
    }

    // ---- Accessors ----

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn draw_list(&self) -> &DrawList {
        self.compositor.draw_list()
    }

    pub fn last_report(&self) -> &FrameReport {
        &self.last_report
    }

    pub fn loop_state(&self) -> LoopState {
        self.frame_loop.state()
    }

    /// Whether the next frame will call the detector.
    pub fn detection_due(&self) -> bool {
        self.detector.is_due()
    }

    pub fn detector_mut(&mut self) -> &mut D {
        self.detector.handle_mut().detector_mut()
    }

    pub fn scheduler(&self) -> &S {
        self.frame_loop.scheduler()
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        self.frame_loop.scheduler_mut()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use glam::Vec2;
    use mirror_engine::{DetectionResult, DisplayRect, Landmark, LandmarkSet};

    use super::*;
    use crate::host::{HostDetector, HostScheduler};

    type TestRunner = SessionRunner<HostDetector, HostScheduler>;

    fn runner(variant: &str, overrides: &str) -> TestRunner {
        let mut runner = SessionRunner::for_variant(
            variant,
            overrides,
            42,
            (640.0, 480.0),
            (640.0, 480.0),
            DetectorHandle::from_detector(HostDetector::new()),
            HostScheduler::new(),
        )
        .unwrap();
        runner.start();
        runner
    }

    struct FailingStream(Rc<Cell<u32>>);

    impl StreamHandle for FailingStream {
        fn stop(&mut self) -> Result<(), EngineError> {
            self.0.set(self.0.get() + 1);
            Err(EngineError::StreamTeardown("track already ended".into()))
        }
    }

    #[test]
    fn frame_rearms_loop() {
        let mut r = runner("hand-viewer", "");
        assert!(r.scheduler_mut().take_request());
        assert!(r.on_frame(0.0, &(), None).stepped);
        assert!(r.scheduler_mut().take_request());
        assert!(!r.draw_list().is_empty());
    }

    #[test]
    fn unknown_variant_fails() {
        let err = SessionRunner::<HostDetector, HostScheduler>::for_variant(
            "juggling",
            "",
            42,
            (640.0, 480.0),
            (640.0, 480.0),
            DetectorHandle::from_detector(HostDetector::new()),
            HostScheduler::new(),
        )
        .err()
        .unwrap();
        assert!(matches!(err, EngineError::UnknownVariant(_)), "got {err:?}");
    }

    #[test]
    fn pushed_landmarks_catch_target() {
        let mut r = runner("hand-catch", r#"{"detect_every_n_frames": 1}"#);
        let camera = r.session().layout().camera;
        let id = r.session_mut().targets_mut().spawn_at(40, 320.0, &camera);
        let center = r.session().targets().get(id).unwrap().position;

        // Mirrored: screen x = (1 - nx) * width.
        let nx = 1.0 - center.x / camera.width;
        let ny = (center.y + 3.0) / camera.height;
        r.detector_mut().push(DetectionResult::new(
            vec![LandmarkSet::new(vec![Landmark::new(nx, ny)])],
            0.0,
        ));
        r.on_frame(0.0, &(), None);

        assert_eq!(r.last_report().scored, 40);
        assert_eq!(r.session().state().total_score, 40);
    }

    #[test]
    fn pointer_on_restart_button_restarts_ended_game() {
        let mut r = runner("pose-catch", r#"{"game_duration_ms": 1000}"#);
        r.on_frame(0.0, &(), None);
        r.on_frame(1_000.0, &(), None);
        assert_eq!(r.session().state().phase, GamePhase::Ended);

        let displayed = DisplayRect::new(0.0, 0.0, 640.0, 480.0);
        // Miss first: nothing happens.
        r.push_input(InputEvent::PointerDown {
            client: Vec2::new(10.0, 10.0),
            displayed,
        });
        r.on_frame(1_016.0, &(), None);
        assert_eq!(r.session().state().phase, GamePhase::Ended);

        r.push_input(InputEvent::PointerDown {
            client: Vec2::new(320.0, 430.0),
            displayed,
        });
        r.on_frame(1_033.0, &(), None);
        assert_eq!(r.session().state().phase, GamePhase::Playing);
        assert_eq!(r.session().state().total_score, 0);
    }

    #[test]
    fn return_to_menu_is_reported_once() {
        let mut r = runner("hand-viewer", "");
        r.push_input(InputEvent::ReturnToMenu);
        let outcome = r.on_frame(0.0, &(), None);
        assert!(outcome.stepped);
        assert!(outcome.return_to_menu);
        assert!(!r.on_frame(16.0, &(), None).return_to_menu);
    }

    #[test]
    fn host_seed_applies_unless_pinned() {
        assert_eq!(runner("hand-catch", "").session().config().seed, 42);
        let pinned = runner("hand-catch", r#"{"seed": 9}"#);
        assert_eq!(pinned.session().config().seed, 9);
    }

    #[test]
    fn pixel_effect_runs_on_supplied_frame() {
        let mut r = runner("thermography", "");
        let mut bytes = vec![0u8; 4 * 4 * 4];
        for px in bytes.chunks_exact_mut(4) {
            px[3] = 255;
        }
        r.on_frame(0.0, &(), Some((&mut bytes, 4, 4)));
        // Black maps to violet when no hands cover it.
        assert_eq!(&bytes[0..4], &[255, 0, 255, 255]);
    }

    #[test]
    fn bad_pixel_buffer_is_skipped() {
        let mut r = runner("thermography", "");
        let mut bytes = vec![7u8; 5];
        assert!(r.on_frame(0.0, &(), Some((&mut bytes, 4, 4))).stepped);
        assert_eq!(bytes, vec![7u8; 5]);
    }

    #[test]
    fn teardown_is_idempotent_and_ignores_later_frames() {
        let stops = Rc::new(Cell::new(0));
        let mut r = runner("hand-catch", "").with_stream(Box::new(FailingStream(Rc::clone(&stops))));
        r.on_frame(0.0, &(), None);

        r.teardown();
        r.teardown();
        assert_eq!(stops.get(), 1);
        assert_eq!(r.loop_state(), LoopState::Stopped);
        assert!(!r.scheduler().is_requested());

        let frames = r.session().frame_count();
        assert!(!r.on_frame(16.0, &(), None).stepped);
        assert_eq!(r.session().frame_count(), frames);
    }

    #[test]
    fn throttled_detection_due_every_other_frame() {
        let mut r = runner("hand-catch", "");
        assert_eq!(r.session().config().detect_every_n_frames, 2);
        assert!(r.detection_due());
        r.on_frame(0.0, &(), None);
        assert!(!r.detection_due());
        r.on_frame(16.0, &(), None);
        assert!(r.detection_due());
    }
}
