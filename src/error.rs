// Crate-wide error type. Per-frame failures (dimensions, missing output)
// abort that call only; game-state failures leave prior state untouched.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Input buffers for one call disagree on width/height. Skip the frame.
    #[error("dimension mismatch: expected {expected_w}x{expected_h}, got {actual_w}x{actual_h}")]
    DimensionMismatch {
        expected_w: usize,
        expected_h: usize,
        actual_w: usize,
        actual_h: usize,
    },

    /// The caller asked for a composited frame without supplying a target.
    #[error("no output buffer supplied")]
    MissingOutputBuffer,

    /// The word source produced zero usable entries.
    #[error("word source yielded no entries")]
    EmptyWordList,

    /// A game operation ran before any word list was loaded.
    #[error("no words loaded")]
    NoWordsLoaded,

    /// Reading or parsing the word data source failed.
    #[error("word source: {0}")]
    WordSource(String),

    /// Reading or parsing the pipeline configuration failed.
    #[error("config: {0}")]
    Config(String),

    /// Creating the window failed.
    #[error("window init: {0}")]
    WindowInit(String),

    /// Updating the window buffer failed.
    #[error("window update: {0}")]
    WindowUpdate(String),

    /// Opening/starting the camera failed.
    #[error("camera init: {0}")]
    CameraInit(String),

    /// Grabbing or decoding a camera frame failed.
    #[error("camera frame: {0}")]
    CameraFrame(String),

    /// Writing a finished sketch to disk failed.
    #[error("snapshot: {0}")]
    Snapshot(String),
}

impl Error {
    /// Shorthand used anywhere two buffers must agree on size.
    pub fn dimension_mismatch(
        expected: (usize, usize),
        actual: (usize, usize),
    ) -> Self {
        Error::DimensionMismatch {
            expected_w: expected.0,
            expected_h: expected.1,
            actual_w: actual.0,
            actual_h: actual.1,
        }
    }
}
