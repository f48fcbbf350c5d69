// Tunable thresholds for the frame pipeline.
// All of these depend on the camera, the lighting, and the scene, so they
// live in a config file instead of call sites.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::Error;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Euclidean RGB distance a pixel must move from the background
    /// before it counts as foreground (0..=441).
    pub color_threshold: f32,

    /// Near-camera depth band in meters, inclusive. Readings outside the
    /// band are background plane or lens-occluding junk.
    pub depth_min: f32,
    pub depth_max: f32,

    /// Contours with fewer filled pixels than this are sensor noise.
    pub min_area: u32,

    /// Contours whose bounding box comes within this many pixels of the
    /// frame edge are partial objects. 0 disables the filter.
    pub border_margin: u32,

    /// A released stroke shorter than this is not reported as a finished
    /// gesture. 0.0 accepts every release.
    pub min_stroke_length: f32,

    /// Frames to record when building the stored background.
    pub background_frames: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            color_threshold: 48.0,
            depth_min: 0.15,
            depth_max: 0.55,
            min_area: 64,
            border_margin: 0,
            min_stroke_length: 0.0,
            background_frames: 35, // ~1-2 seconds of frames at 30 FPS
        }
    }
}

impl PipelineConfig {
    /// Parse a TOML document; missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, Error> {
        toml::from_str(text).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load from a TOML file on disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }
}
