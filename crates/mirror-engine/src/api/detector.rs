use log::{info, warn};

use crate::api::error::EngineError;
use crate::api::types::DetectionResult;

/// The external landmark model.
///
/// Implementations own whatever the model needs (a browser tracker, a
/// fixture, a replay file). The engine only sees normalized landmarks.
pub trait Detector {
    /// Whatever the model reads a frame from.
    type Frame: ?Sized;

    /// Detect landmarks in one frame. No subjects is an empty result, not an error.
    fn detect(
        &mut self,
        frame: &Self::Frame,
        timestamp_ms: f64,
    ) -> Result<DetectionResult, EngineError>;

    /// Release model resources. Called once on teardown.
    fn close(&mut self) {}
}

/// An initialized detector, ready for per-frame calls.
pub struct DetectorHandle<D: Detector> {
    detector: D,
    closed: bool,
}

impl<D: Detector> DetectorHandle<D> {
    /// One-time setup. Any failure is reported as [`EngineError::DetectorUnavailable`].
    pub fn initialize<F>(init: F) -> Result<Self, EngineError>
    where
        F: FnOnce() -> Result<D, EngineError>,
    {
        let detector = init().map_err(|e| match e {
            EngineError::DetectorUnavailable(_) => e,
            other => EngineError::DetectorUnavailable(other.to_string()),
        })?;
        info!("detector ready");
        Ok(Self::from_detector(detector))
    }

    pub fn from_detector(detector: D) -> Self {
        Self {
            detector,
            closed: false,
        }
    }

    /// Run the detector for one frame. Fails once the handle is closed.
    pub fn step(
        &mut self,
        frame: &D::Frame,
        timestamp_ms: f64,
    ) -> Result<DetectionResult, EngineError> {
        if self.closed {
            return Err(EngineError::DetectorUnavailable("detector closed".into()));
        }
        self.detector.detect(frame, timestamp_ms)
    }

    pub fn close(&mut self) {
        if !self.closed {
            self.detector.close();
            self.closed = true;
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn detector(&self) -> &D {
        &self.detector
    }

    pub fn detector_mut(&mut self) -> &mut D {
        &mut self.detector
    }
}

/// Where this frame's result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// The detector ran this frame.
    Fresh,
    /// Skipped by throttling; the previous result is reused.
    Stale,
    /// The detector failed; the result is empty.
    Failed,
}

/// Runs the detector every `every` frames and reuses the last result in between.
///
/// Collision fidelity degrades on skipped frames rather than the frame
/// loop blocking on the model.
pub struct ThrottledDetector<D: Detector> {
    handle: DetectorHandle<D>,
    every: u32,
    frame_index: u64,
    current: DetectionResult,
}

impl<D: Detector> ThrottledDetector<D> {
    pub fn new(handle: DetectorHandle<D>, every: u32) -> Self {
        Self {
            handle,
            every: every.max(1),
            frame_index: 0,
            current: DetectionResult::default(),
        }
    }

    /// The result for this frame. Never fails: a detector error yields an
    /// empty result and clears the cache so later skipped frames stay empty.
    pub fn step(&mut self, frame: &D::Frame, timestamp_ms: f64) -> (&DetectionResult, Freshness) {
        let run = self.frame_index % self.every as u64 == 0;
        self.frame_index += 1;

        if !run {
            return (&self.current, Freshness::Stale);
        }

        match self.handle.step(frame, timestamp_ms) {
            Ok(result) => {
                self.current = result;
                (&self.current, Freshness::Fresh)
            }
            Err(e) => {
                warn!("detection failed, treating frame as empty: {e}");
                self.current = DetectionResult::empty(timestamp_ms);
                (&self.current, Freshness::Failed)
            }
        }
    }

    /// Whether the next `step` will call the detector.
    pub fn is_due(&self) -> bool {
        self.frame_index % self.every as u64 == 0
    }

    /// Last result handed out.
    pub fn current(&self) -> &DetectionResult {
        &self.current
    }

    pub fn every(&self) -> u32 {
        self.every
    }

    pub fn close(&mut self) {
        self.handle.close();
    }

    pub fn handle(&self) -> &DetectorHandle<D> {
        &self.handle
    }

    pub fn handle_mut(&mut self) -> &mut DetectorHandle<D> {
        &mut self.handle
    }
}
