//! Cooperative frame loop contract.
//!
//! One step runs to completion, then the loop re-arms through the host's
//! display-refresh callback. Nothing is ever scheduled recursively.

use log::{info, warn};

use crate::api::error::EngineError;

/// Host timer that calls back once per display refresh.
pub trait FrameScheduler {
    /// Arm the next callback.
    fn request_frame(&mut self);
    /// Drop any pending callback.
    fn cancel(&mut self);
}

/// The live camera stream.
pub trait StreamHandle {
    fn stop(&mut self) -> Result<(), EngineError>;
}

/// A stream with nothing to release.
pub struct NoStream;

impl StreamHandle for NoStream {
    fn stop(&mut self) -> Result<(), EngineError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Running,
    Stopped,
}

/// Tracks whether steps should run and re-arms the scheduler after each one.
pub struct FrameLoop<S: FrameScheduler> {
    scheduler: S,
    state: LoopState,
}

impl<S: FrameScheduler> FrameLoop<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            state: LoopState::Idle,
        }
    }

    /// Arm the first frame.
    pub fn start(&mut self) {
        if self.state == LoopState::Idle {
            self.state = LoopState::Running;
            self.scheduler.request_frame();
        }
    }

    /// Whether a delivered callback should run a step.
    pub fn should_step(&self) -> bool {
        self.state == LoopState::Running
    }

    /// Call after a step completes.
    pub fn rearm(&mut self) {
        if self.state == LoopState::Running {
            self.scheduler.request_frame();
        }
    }

    /// Stop scheduling and release the stream. Stream errors are logged only.
    /// Returns false if the loop was already stopped.
    pub fn stop(&mut self, stream: &mut dyn StreamHandle) -> bool {
        if self.state == LoopState::Stopped {
            return false;
        }
        self.state = LoopState::Stopped;
        self.scheduler.cancel();
        if let Err(e) = stream.stop() {
            warn!("{e}");
        }
        info!("frame loop stopped");
        true
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counter {
        requested: u32,
        cancelled: u32,
    }

    impl FrameScheduler for Counter {
        fn request_frame(&mut self) {
            self.requested += 1;
        }
        fn cancel(&mut self) {
            self.cancelled += 1;
        }
    }

    struct FailingStream {
        stops: u32,
    }

    impl StreamHandle for FailingStream {
        fn stop(&mut self) -> Result<(), EngineError> {
            self.stops += 1;
            Err(EngineError::StreamTeardown("track already ended".into()))
        }
    }

    #[test]
    fn rearms_only_while_running() {
        let mut frame_loop = FrameLoop::new(Counter::default());
        frame_loop.rearm();
        assert_eq!(frame_loop.scheduler().requested, 0);

        frame_loop.start();
        assert!(frame_loop.should_step());
        frame_loop.rearm();
        assert_eq!(frame_loop.scheduler().requested, 2);
    }

    #[test]
    fn stop_swallows_stream_errors_and_is_idempotent() {
        let mut frame_loop = FrameLoop::new(Counter::default());
        let mut stream = FailingStream { stops: 0 };
        frame_loop.start();

        assert!(frame_loop.stop(&mut stream));
        assert!(!frame_loop.stop(&mut stream));
        assert_eq!(stream.stops, 1);
        assert_eq!(frame_loop.scheduler().cancelled, 1);
        assert!(!frame_loop.should_step());

        frame_loop.rearm();
        assert_eq!(frame_loop.scheduler().requested, 1);
    }

    #[test]
    fn stopped_loop_cannot_restart() {
        let mut frame_loop = FrameLoop::new(Counter::default());
        frame_loop.stop(&mut NoStream);
        frame_loop.start();
        assert_eq!(frame_loop.state(), LoopState::Stopped);
    }
}
