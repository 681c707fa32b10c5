use thiserror::Error;

/// Errors surfaced by the engine.
///
/// Only session construction is fatal. Inside the frame step, detector
/// failures degrade to an empty result and teardown failures are logged.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Degenerate aspect ratio or a zero-sized viewport/container.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// The landmark detector failed to initialize or a detection call failed.
    #[error("detector unavailable: {0}")]
    DetectorUnavailable(String),

    /// Configuration JSON could not be parsed.
    #[error("invalid config: {0}")]
    InvalidConfig(#[from] serde_json::Error),

    /// A configuration value is out of range.
    #[error("invalid config value `{field}`: {reason}")]
    ConfigValue { field: &'static str, reason: String },

    /// A pixel buffer does not match the declared frame dimensions.
    #[error("pixel buffer of {len} bytes does not hold a {width}x{height} RGBA frame")]
    InvalidPixelBuffer { len: usize, width: u32, height: u32 },

    /// Stopping the camera stream failed during teardown.
    #[error("stream teardown failed: {0}")]
    StreamTeardown(String),

    /// The variant name does not match any built-in profile.
    #[error("unknown variant `{0}`")]
    UnknownVariant(String),
}
