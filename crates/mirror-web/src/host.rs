//! Browser-side implementations of the engine's host seams.
//!
//! The landmark model runs in JavaScript; its output is pushed here before
//! each tick. Animation-frame requests are recorded as a flag the page
//! polls after every tick.

use js_sys::Function;
use log::warn;
use wasm_bindgen::JsValue;

use mirror_engine::{DetectionResult, Detector, EngineError, FrameScheduler, StreamHandle};

/// A detector fed by the page: each `detect` hands back the latest push.
#[derive(Default)]
pub struct HostDetector {
    latest: DetectionResult,
    failure: Option<String>,
}

impl HostDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the result the next detection returns.
    pub fn push(&mut self, result: DetectionResult) {
        self.latest = result;
        self.failure = None;
    }

    /// Report that the page's model call failed for this frame.
    pub fn fail(&mut self, reason: impl Into<String>) {
        self.failure = Some(reason.into());
    }
}

impl Detector for HostDetector {
    type Frame = ();

    fn detect(&mut self, _frame: &(), timestamp_ms: f64) -> Result<DetectionResult, EngineError> {
        if let Some(reason) = self.failure.take() {
            return Err(EngineError::DetectorUnavailable(reason));
        }
        let mut result = self.latest.clone();
        result.timestamp_ms = timestamp_ms;
        Ok(result)
    }

    fn close(&mut self) {
        self.latest = DetectionResult::default();
        self.failure = None;
    }
}

/// Records whether the page should request another animation frame.
#[derive(Debug, Default)]
pub struct HostScheduler {
    requested: bool,
}

impl HostScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the pending request, if any.
    pub fn take_request(&mut self) -> bool {
        std::mem::take(&mut self.requested)
    }

    pub fn is_requested(&self) -> bool {
        self.requested
    }
}

impl FrameScheduler for HostScheduler {
    fn request_frame(&mut self) {
        self.requested = true;
    }

    fn cancel(&mut self) {
        self.requested = false;
    }
}

/// Camera stream released through a page callback (typically stopping
/// every `MediaStreamTrack`).
pub struct JsStream {
    stop: Function,
}

impl JsStream {
    pub fn new(stop: Function) -> Self {
        Self { stop }
    }
}

impl StreamHandle for JsStream {
    fn stop(&mut self) -> Result<(), EngineError> {
        self.stop
            .call0(&JsValue::NULL)
            .map(|_| ())
            .map_err(|e| EngineError::StreamTeardown(format!("{e:?}")))
    }
}

/// Wrap a page callback so failures are logged instead of thrown.
pub fn js_callback(f: Function) -> impl FnMut() {
    move || {
        if let Err(e) = f.call0(&JsValue::NULL) {
            warn!("page callback failed: {e:?}");
        }
    }
}
