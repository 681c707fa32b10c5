pub mod clock;
pub mod geometry;
pub mod mapper;
#[cfg(feature = "physics")]
pub mod physics;
pub mod region;
pub mod rng;
pub mod session;
pub mod skeleton;
pub mod targets;
pub mod viewport;
