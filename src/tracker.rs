// Stroke accumulation.
// The tracker turns per-frame detections into one continuous stroke: points
// append only while the press flag is held, and releasing the press hands
// the finished path back to the caller.

use log::debug;

use crate::types::Point;

/// What one frame did to the stroke.
#[derive(Debug)]
pub struct StrokeStep {
    /// The caller's running stroke length after this frame. The caller owns
    /// this value between frames; the tracker only adds to what it was given.
    pub length: f32,
    /// The press was released this frame and the gesture ended.
    pub completed: bool,
    /// The full path of a completed gesture, taken out of the tracker.
    pub finished: Option<Vec<Point>>,
}

/// Press-gated path accumulator. One instance per drawing session; a single
/// caller drives it once per frame.
#[derive(Default)]
pub struct Tracker {
    path: Vec<Point>,
    drawing: bool,
}

impl Tracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stroke accumulated so far. Read-only: the compositor renders from
    /// this, it never mutates it.
    pub fn path(&self) -> &[Point] {
        &self.path
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    /// Drop any in-progress stroke without reporting it.
    pub fn reset(&mut self) {
        self.path.clear();
        self.drawing = false;
    }

    /// Advance by one frame.
    ///
    /// Pressed with a detection: append the point and grow the length by the
    /// Euclidean distance from the prior point (or by 1.0 for the first
    /// point of a stroke). Pressed without a detection: hold the path as-is,
    /// so one missed frame does not end the gesture. Released mid-stroke:
    /// report the finished path; the tracker is empty again afterwards.
    pub fn step(&mut self, detection: Option<Point>, pressed: bool, length: f32) -> StrokeStep {
        if pressed {
            self.drawing = true;
            if let Some(p) = detection {
                let length = match self.path.last() {
                    Some(prev) => length + prev.distance(p),
                    None => length + 1.0,
                };
                self.path.push(p);
                return StrokeStep { length, completed: false, finished: None };
            }
            // Detection dropped out for a frame; keep waiting.
            return StrokeStep { length, completed: false, finished: None };
        }

        if self.drawing {
            self.drawing = false;
            let finished = std::mem::take(&mut self.path);
            debug!("stroke finished: {} points, length {length:.1}", finished.len());
            return StrokeStep { length, completed: true, finished: Some(finished) };
        }

        StrokeStep { length, completed: false, finished: None }
    }
}
