//! `#[wasm_bindgen]` surface for the browser page.
//!
//! Per animation frame the page:
//! 1. checks `session_detection_due()` and, if set, runs the landmark model
//!    and calls `session_push_landmarks` (or `session_detector_failed`);
//! 2. draws the mirrored video, reads the pixels back and calls
//!    `session_tick` with them (an empty buffer when the variant has no
//!    pixel effect);
//! 3. replays `session_draw_list()` onto the 2D context;
//! 4. requests another frame if `session_take_frame_request()` is true.

pub mod host;
pub mod runner;

pub use host::{HostDetector, HostScheduler, JsStream};
pub use runner::{FrameOutcome, SessionRunner};

use std::cell::RefCell;

use glam::Vec2;
use wasm_bindgen::prelude::*;

use mirror_engine::{DetectionResult, DetectorHandle, DisplayRect, EngineError, InputEvent};

type BrowserRunner = SessionRunner<HostDetector, HostScheduler>;

thread_local! {
    static RUNNER: RefCell<Option<BrowserRunner>> = RefCell::new(None);
    /// Kept outside the runner so the page may call back into any
    /// `session_*` export, teardown included, from inside it.
    static ON_RETURN: RefCell<Option<Box<dyn FnMut()>>> = RefCell::new(None);
}

fn with_runner<R>(f: impl FnOnce(&mut BrowserRunner) -> R) -> Option<R> {
    RUNNER.with(|cell| {
        let mut borrow = cell.borrow_mut();
        match borrow.as_mut() {
            Some(runner) => Some(f(runner)),
            None => {
                log::warn!("session not initialized, call session_init() first");
                None
            }
        }
    })
}

/// Invoke the page's return-to-menu callback with no runner borrow held.
fn return_to_menu() {
    let callback = ON_RETURN.with(|cell| cell.borrow_mut().take());
    let Some(mut callback) = callback else {
        log::warn!("return to menu requested but no callback is set");
        return;
    };
    callback();
    // Keep it unless the callback installed a replacement.
    ON_RETURN.with(|cell| {
        let mut slot = cell.borrow_mut();
        if slot.is_none() {
            *slot = Some(callback);
        }
    });
}

/// Spawn seed for sessions whose overrides do not pin one.
fn host_seed() -> u64 {
    (js_sys::Math::random() * (1u64 << 53) as f64) as u64
}

fn to_js(e: EngineError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Create the session for `variant`, replacing (and tearing down) any
/// previous one. `overrides_json` may be empty; without a `seed` in it the
/// spawn sequence is seeded from `Math.random()`.
#[wasm_bindgen]
pub fn session_init(
    variant: &str,
    overrides_json: &str,
    source_width: f32,
    source_height: f32,
    container_width: f32,
    container_height: f32,
) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let mut runner = SessionRunner::for_variant(
        variant,
        overrides_json,
        host_seed(),
        (source_width, source_height),
        (container_width, container_height),
        DetectorHandle::from_detector(HostDetector::new()),
        HostScheduler::new(),
    )
    .map_err(to_js)?;
    runner.start();

    let previous = RUNNER.with(|cell| cell.borrow_mut().replace(runner));
    if let Some(mut previous) = previous {
        previous.teardown();
    }
    log::info!("{}: initialized", variant);
    Ok(())
}

/// Hand over this frame's landmarks: `coords` is `[x0, y0, x1, y1, ...]`
/// normalized, split into subjects of `lengths[i]` points.
#[wasm_bindgen]
pub fn session_push_landmarks(coords: &[f32], lengths: &[u32], timestamp_ms: f64) {
    let result = DetectionResult::from_flat(coords, lengths, timestamp_ms);
    with_runner(|r| r.detector_mut().push(result));
}

#[wasm_bindgen]
pub fn session_detector_failed(reason: &str) {
    with_runner(|r| r.detector_mut().fail(reason));
}

#[wasm_bindgen]
pub fn session_detection_due() -> bool {
    with_runner(|r| r.detection_due()).unwrap_or(false)
}

/// Run one frame. `pixels` is modified in place by the variant's effect.
/// Returns false when the frame was ignored.
#[wasm_bindgen]
pub fn session_tick(now_ms: f64, pixels: &mut [u8], width: u32, height: u32) -> bool {
    let outcome = with_runner(|r| {
        let frame = (!pixels.is_empty()).then_some((pixels, width, height));
        r.on_frame(now_ms, &(), frame)
    })
    .unwrap_or_default();
    if outcome.return_to_menu {
        return_to_menu();
    }
    outcome.stepped
}

/// This frame's draw list as a JSON array of tagged commands.
#[wasm_bindgen]
pub fn session_draw_list() -> Result<String, JsValue> {
    with_runner(|r| r.draw_list().to_json())
        .unwrap_or_else(|| Ok("[]".to_string()))
        .map_err(|e| to_js(e.into()))
}

#[wasm_bindgen]
pub fn session_take_frame_request() -> bool {
    with_runner(|r| r.scheduler_mut().take_request()).unwrap_or(false)
}

// ---- Input ----

/// A click or touch at client coordinates, with the canvas's displayed rect.
#[wasm_bindgen]
pub fn session_pointer_down(
    client_x: f32,
    client_y: f32,
    left: f32,
    top: f32,
    width: f32,
    height: f32,
) {
    with_runner(|r| {
        r.push_input(InputEvent::PointerDown {
            client: Vec2::new(client_x, client_y),
            displayed: DisplayRect::new(left, top, width, height),
        })
    });
}

#[wasm_bindgen]
pub fn session_restart() {
    with_runner(|r| r.push_input(InputEvent::Restart));
}

#[wasm_bindgen]
pub fn session_return_to_menu() {
    with_runner(|r| r.push_input(InputEvent::ReturnToMenu));
}

/// The page's navigation callback. Runs after the frame that drained the
/// request, outside any runner borrow.
#[wasm_bindgen]
pub fn session_set_return_callback(callback: js_sys::Function) {
    let callback: Box<dyn FnMut()> = Box::new(host::js_callback(callback));
    ON_RETURN.with(|cell| *cell.borrow_mut() = Some(callback));
}

/// Page callback that stops the camera tracks on teardown.
#[wasm_bindgen]
pub fn session_set_stream_stop(stop: js_sys::Function) {
    with_runner(|r| r.set_stream(Box::new(JsStream::new(stop))));
}

#[wasm_bindgen]
pub fn session_teardown() {
    let runner = RUNNER.with(|cell| cell.borrow_mut().take());
    if let Some(mut runner) = runner {
        runner.teardown();
    }
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn get_score() -> u32 {
    with_runner(|r| r.session().state().total_score).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_remaining_secs() -> f64 {
    with_runner(|r| r.session().remaining_secs()).unwrap_or(0.0)
}

#[wasm_bindgen]
pub fn is_game_over() -> bool {
    with_runner(|r| !r.session().state().is_playing()).unwrap_or(false)
}

#[wasm_bindgen]
pub fn get_canvas_width() -> f32 {
    with_runner(|r| r.session().layout().canvas.x).unwrap_or(0.0)
}

#[wasm_bindgen]
pub fn get_canvas_height() -> f32 {
    with_runner(|r| r.session().layout().canvas.y).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    fn install(variant: &str) {
        let mut runner = SessionRunner::for_variant(
            variant,
            "",
            42,
            (640.0, 480.0),
            (640.0, 480.0),
            DetectorHandle::from_detector(HostDetector::new()),
            HostScheduler::new(),
        )
        .unwrap();
        runner.start();
        RUNNER.with(|cell| *cell.borrow_mut() = Some(runner));
    }

    #[test]
    fn return_callback_may_tear_down_session() {
        install("hand-viewer");
        let calls = Rc::new(Cell::new(0));
        let seen = Rc::clone(&calls);
        let callback: Box<dyn FnMut()> = Box::new(move || {
            session_teardown();
            seen.set(seen.get() + 1);
        });
        ON_RETURN.with(|cell| *cell.borrow_mut() = Some(callback));

        session_return_to_menu();
        assert!(session_tick(0.0, &mut [], 0, 0));
        assert_eq!(calls.get(), 1);
        assert!(RUNNER.with(|cell| cell.borrow().is_none()));
        assert!(!session_tick(16.0, &mut [], 0, 0));

        // The callback stays installed for the next session.
        assert!(ON_RETURN.with(|cell| cell.borrow().is_some()));
    }

    #[test]
    fn return_callback_may_read_session_state() {
        install("hand-catch");
        let score = Rc::new(Cell::new(None));
        let seen = Rc::clone(&score);
        let callback: Box<dyn FnMut()> = Box::new(move || seen.set(Some(get_score())));
        ON_RETURN.with(|cell| *cell.borrow_mut() = Some(callback));

        session_return_to_menu();
        session_tick(0.0, &mut [], 0, 0);
        assert_eq!(score.get(), Some(0));
        session_teardown();
    }
}
