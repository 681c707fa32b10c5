pub mod config;
pub mod detector;
pub mod error;
pub mod lifecycle;
pub mod types;
pub mod variant;
