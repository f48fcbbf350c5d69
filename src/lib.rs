//! Depth-gated contour tracking for camera drawing games.
//!
//! Each captured frame runs through one call: the live color frame is
//! differenced against a stored background (optionally gated by a
//! near-camera depth band), the most plausible foreground contour is
//! selected, its centroid extends the current stroke while the press flag
//! is held, and the stroke plus the live contour are composited into the
//! output frame. A small word game rides along to give the player
//! something to draw.

pub mod camera;
pub mod compositor;
pub mod config;
pub mod contour;
pub mod draw;
pub mod error;
pub mod game;
pub mod processor;
pub mod tracker;
pub mod types;
pub mod vision;

pub use crate::config::PipelineConfig;
pub use crate::error::Error;
pub use crate::game::{FileWordSource, WordGame, WordSource};
pub use crate::processor::{FrameProcessor, FrameResult};
pub use crate::types::{DepthBuffer, ForegroundMask, FrameBuffer, Point};

/// Version identifier of this crate. Pure and stateless.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_version_is_nonempty() {
        assert!(!super::version().is_empty());
    }
}
