// Per-frame entry point. One call runs the whole pipeline:
// differencing -> contour selection -> stroke tracking -> compositing,
// and reports the outcome alongside the current target word.

use log::debug;

use crate::compositor::compose;
use crate::config::PipelineConfig;
use crate::contour::{extract_contours, select_contour};
use crate::error::Error;
use crate::game::WordGame;
use crate::tracker::Tracker;
use crate::types::{DepthBuffer, FrameBuffer, Point};
use crate::vision::foreground_mask;

/// Everything one frame produced. Immutable once returned.
#[derive(Debug, Clone)]
pub struct FrameResult {
    /// The running stroke length after this frame. The caller carries this
    /// value between calls and resets it when it starts a new stroke.
    pub stroke_length: f32,
    /// A qualifying contour was found this frame.
    pub detected: bool,
    /// The press was released and the stroke qualified as a finished gesture.
    pub completed: bool,
    /// The tracked point (contour centroid) of this frame, if any.
    pub point: Option<Point>,
    /// The word the player is currently drawing, when a list is loaded.
    pub current_word: Option<String>,
}

/// The drawing session. Holds the only state that lives across frames: the
/// stroke path, the last tracked point, and the word game.
///
/// One caller at a time: the processor is driven once per captured frame
/// and is not safe for concurrent frame submission. Input buffers are
/// borrowed for the duration of a call only; nothing is retained.
pub struct FrameProcessor {
    config: PipelineConfig,
    tracker: Tracker,
    game: WordGame,
    previous_point: Option<Point>,
}

impl FrameProcessor {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            tracker: Tracker::new(),
            game: WordGame::new(),
            previous_point: None,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// The word game is loaded and advanced by the caller; the per-frame
    /// pipeline only reads it.
    pub fn game(&self) -> &WordGame {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut WordGame {
        &mut self.game
    }

    /// Process one captured frame.
    ///
    /// `color` and `background` must share dimensions (`depth` too, when
    /// supplied); `output` receives the composited stroke and contour and
    /// must be present. A frame-local failure leaves the stroke path and
    /// the word state exactly as they were.
    pub fn process_frame(
        &mut self,
        color: &FrameBuffer,
        background: &FrameBuffer,
        depth: Option<&DepthBuffer>,
        output: Option<&mut FrameBuffer>,
        pressed: bool,
        stroke_length: f32,
    ) -> Result<FrameResult, Error> {
        let output = output.ok_or(Error::MissingOutputBuffer)?;
        if !output.same_size(color) {
            return Err(Error::dimension_mismatch(
                (color.width, color.height),
                (output.width, output.height),
            ));
        }

        let mask = foreground_mask(color, background, depth, &self.config)?;
        let contours = extract_contours(&mask);
        let selected = select_contour(
            contours,
            &self.config,
            self.previous_point,
            mask.width,
            mask.height,
        );

        let point = selected.as_ref().map(|c| c.centroid_point());
        if let Some(p) = point {
            self.previous_point = Some(p);
        }

        let step = self.tracker.step(point, pressed, stroke_length);

        // A completed gesture is still drawn this frame; afterwards the
        // tracker is empty and the next press starts fresh.
        let path = step.finished.as_deref().unwrap_or_else(|| self.tracker.path());
        compose(output, path, selected.as_ref());

        let completed = step.completed && step.length >= self.config.min_stroke_length;
        if step.completed && !completed {
            debug!(
                "stroke below minimum length ({:.1} < {:.1}), not a gesture",
                step.length, self.config.min_stroke_length
            );
        }

        Ok(FrameResult {
            stroke_length: step.length,
            detected: point.is_some(),
            completed,
            point,
            current_word: self.game.current_word().map(String::from),
        })
    }
}
