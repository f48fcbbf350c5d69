// Renders the pipeline's state into the output frame.
// Visual expectation: the accumulated stroke appears as a thick amber line,
// and the live contour flickers as a thin green outline on top of it.

use crate::contour::Contour;
use crate::draw::{put_pixel, stamp_disc};
use crate::types::{FrameBuffer, Point};

/// Stroke ink, drawn first.
const INK_COLOR: u32 = 0x00FF_CC33;
const INK_RADIUS: i32 = 3;
/// Live contour outline, drawn last so the indicator stays visible.
const OUTLINE_COLOR: u32 = 0x0044_FF88;

/// Ink one stroke segment by stamping the round brush every couple of
/// pixels along it. Gives a connected line with soft-looking joints.
fn ink_segment(output: &mut FrameBuffer, a: Point, b: Point) {
    let dx = (b.x - a.x) as f32;
    let dy = (b.y - a.y) as f32;
    let dist = (dx * dx + dy * dy).sqrt().max(1.0);
    let steps = (dist / 2.0).ceil() as i32; // stamp every ~2 px
    for i in 0..=steps {
        let t = i as f32 / steps as f32;
        let x = a.x as f32 + dx * t;
        let y = a.y as f32 + dy * t;
        stamp_disc(output, x.round() as i32, y.round() as i32, INK_RADIUS, INK_COLOR);
    }
}

/// Draw the stroke path and then the live contour onto the output buffer,
/// in place. All coordinates clip at the buffer edge; the path itself is
/// never mutated.
pub fn compose(output: &mut FrameBuffer, path: &[Point], contour: Option<&Contour>) {
    match path {
        [] => {}
        [only] => stamp_disc(output, only.x, only.y, INK_RADIUS, INK_COLOR),
        _ => {
            for pair in path.windows(2) {
                ink_segment(output, pair[0], pair[1]);
            }
        }
    }

    if let Some(c) = contour {
        // Traced boundary pixels are adjacent, so plotting them directly
        // gives a closed outline.
        for p in &c.points {
            put_pixel(output, p.x, p.y, OUTLINE_COLOR);
        }
    }
}
