// Contour extraction over the foreground mask.
// A contour is the ordered closed boundary of one 8-connected foreground
// region, plus the filled-region stats the selection step filters on.

use std::collections::{HashSet, VecDeque};

use log::debug;

use crate::config::PipelineConfig;
use crate::types::{ForegroundMask, Point};

/// Moore neighborhood, clockwise in screen coordinates (y grows downward),
/// starting at west.
const MOORE: [(i32, i32); 8] = [
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
];

fn dir_index(dx: i32, dy: i32) -> usize {
    MOORE.iter().position(|&d| d == (dx, dy)).unwrap_or(0)
}

/// One traced foreground region.
#[derive(Debug, Clone)]
pub struct Contour {
    /// Ordered closed boundary, clockwise, starting at the topmost-leftmost
    /// pixel of the region.
    pub points: Vec<Point>,
    /// Filled pixel count of the region (not just the boundary).
    pub area: u32,
    /// Bounding box corners, inclusive.
    pub min: Point,
    pub max: Point,
    /// Mean of the filled pixels.
    pub centroid: (f32, f32),
}

impl Contour {
    /// The centroid rounded to the nearest pixel; this is the tracked point.
    pub fn centroid_point(&self) -> Point {
        Point::new(self.centroid.0.round() as i32, self.centroid.1.round() as i32)
    }

    fn centroid_distance(&self, p: Point) -> f32 {
        let dx = self.centroid.0 - p.x as f32;
        let dy = self.centroid.1 - p.y as f32;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Walk the outer boundary of the region containing `start`, clockwise.
/// `start` must be the region's topmost-leftmost pixel so its west and
/// north neighbors are guaranteed background.
fn trace_boundary(mask: &ForegroundMask, start: Point) -> Vec<Point> {
    let start_back = Point::new(start.x - 1, start.y);
    let mut points = vec![start];
    let mut cur = start;
    let mut back = start_back;

    // The walk is deterministic in (pixel, backtrack); the first repeated
    // state means the boundary is closed. This also terminates on 1-pixel
    // strips, where the start pixel is re-entered from a different side.
    let mut seen: HashSet<(Point, Point)> = HashSet::new();
    seen.insert((cur, back));

    loop {
        let from = dir_index(back.x - cur.x, back.y - cur.y);
        let mut prev_bg = back;
        let mut next: Option<(Point, Point)> = None;
        for step in 1..=8 {
            let (dx, dy) = MOORE[(from + step) % 8];
            let cand = Point::new(cur.x + dx, cur.y + dy);
            if mask.get(cand.x, cand.y) {
                next = Some((cand, prev_bg));
                break;
            }
            prev_bg = cand;
        }

        let Some((p, q)) = next else {
            break; // single-pixel region
        };
        if !seen.insert((p, q)) {
            break;
        }
        points.push(p);
        cur = p;
        back = q;
    }

    points
}

/// Find every 8-connected foreground region and trace its boundary.
/// Regions come back in scan order (topmost first, then leftmost).
pub fn extract_contours(mask: &ForegroundMask) -> Vec<Contour> {
    let w = mask.width;
    let h = mask.height;
    let mut visited = vec![false; w * h];
    let mut contours = Vec::new();
    let mut queue = VecDeque::new();

    for idx in 0..(w * h) {
        if !mask.data[idx] || visited[idx] {
            continue;
        }

        // New region; flood it to collect area, bbox, centroid.
        visited[idx] = true;
        queue.push_back(idx);
        let mut area = 0u32;
        let (mut min_x, mut min_y) = (i32::MAX, i32::MAX);
        let (mut max_x, mut max_y) = (i32::MIN, i32::MIN);
        let (mut sum_x, mut sum_y) = (0f64, 0f64);

        while let Some(i) = queue.pop_front() {
            let x = (i % w) as i32;
            let y = (i / w) as i32;
            area += 1;
            sum_x += x as f64;
            sum_y += y as f64;
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);

            for (dx, dy) in MOORE {
                let nx = x + dx;
                let ny = y + dy;
                if nx < 0 || ny < 0 || nx >= w as i32 || ny >= h as i32 {
                    continue;
                }
                let ni = ny as usize * w + nx as usize;
                if mask.data[ni] && !visited[ni] {
                    visited[ni] = true;
                    queue.push_back(ni);
                }
            }
        }

        // The scan finds each region at its topmost-leftmost pixel, which is
        // exactly the anchor the boundary walk needs.
        let seed = Point::new((idx % w) as i32, (idx / w) as i32);
        let points = trace_boundary(mask, seed);

        contours.push(Contour {
            points,
            area,
            min: Point::new(min_x, min_y),
            max: Point::new(max_x, max_y),
            centroid: (
                (sum_x / f64::from(area)) as f32,
                (sum_y / f64::from(area)) as f32,
            ),
        });
    }

    contours
}

fn touches_border(c: &Contour, margin: u32, width: usize, height: usize) -> bool {
    let m = margin as i32;
    c.min.x < m || c.min.y < m || c.max.x > width as i32 - 1 - m || c.max.y > height as i32 - 1 - m
}

/// Pick at most one contour as the tracked object.
/// Filters: minimum filled area, then the border-margin test. Among the
/// survivors the largest area wins; an exact area tie goes to the contour
/// whose centroid is closest to the previous frame's tracked point, or to
/// the earlier one in scan order when there is no previous point.
pub fn select_contour(
    contours: Vec<Contour>,
    config: &PipelineConfig,
    previous: Option<Point>,
    frame_width: usize,
    frame_height: usize,
) -> Option<Contour> {
    let total = contours.len();
    let mut best: Option<Contour> = None;

    for c in contours {
        if c.area < config.min_area {
            continue;
        }
        if config.border_margin > 0
            && touches_border(&c, config.border_margin, frame_width, frame_height)
        {
            continue;
        }
        match &best {
            None => best = Some(c),
            Some(b) => {
                if c.area > b.area {
                    best = Some(c);
                } else if c.area == b.area {
                    if let Some(p) = previous {
                        if c.centroid_distance(p) < b.centroid_distance(p) {
                            best = Some(c);
                        }
                    }
                    // no previous point: earlier scan order keeps the slot
                }
            }
        }
    }

    match &best {
        Some(c) => debug!("selected contour: area {} of {total} candidates", c.area),
        None => debug!("no qualifying contour ({total} candidates)"),
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn mask_with_rects(width: usize, height: usize, rects: &[(usize, usize, usize, usize)]) -> ForegroundMask {
        let mut mask = ForegroundMask::new(width, height);
        for &(x0, y0, w, h) in rects {
            for y in y0..y0 + h {
                for x in x0..x0 + w {
                    mask.set(x, y, true);
                }
            }
        }
        mask
    }

    #[test]
    fn test_single_square_traced_and_measured() {
        let mask = mask_with_rects(32, 32, &[(10, 10, 5, 5)]);
        let contours = extract_contours(&mask);
        assert_eq!(contours.len(), 1);
        let c = &contours[0];
        assert_eq!(c.area, 25);
        assert_eq!(c.min, Point::new(10, 10));
        assert_eq!(c.max, Point::new(14, 14));
        assert_relative_eq!(c.centroid.0, 12.0);
        assert_relative_eq!(c.centroid.1, 12.0);
        // boundary of a 5x5 block is its 16 outer pixels, walked once each
        assert_eq!(c.points.len(), 16);
        assert_eq!(c.points[0], Point::new(10, 10));
        for p in &c.points {
            assert!(p.x == 10 || p.x == 14 || p.y == 10 || p.y == 14);
        }
    }

    #[test]
    fn test_single_pixel_region() {
        let mask = mask_with_rects(8, 8, &[(3, 4, 1, 1)]);
        let contours = extract_contours(&mask);
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].area, 1);
        assert_eq!(contours[0].points, vec![Point::new(3, 4)]);
    }

    #[test]
    fn test_regions_come_back_in_scan_order() {
        let mask = mask_with_rects(32, 32, &[(20, 2, 3, 3), (2, 10, 3, 3)]);
        let contours = extract_contours(&mask);
        assert_eq!(contours.len(), 2);
        assert_eq!(contours[0].min, Point::new(20, 2)); // topmost row first
        assert_eq!(contours[1].min, Point::new(2, 10));
    }

    #[test]
    fn test_largest_area_wins_selection() {
        let cfg = PipelineConfig { min_area: 4, ..Default::default() };
        let mask = mask_with_rects(40, 40, &[(2, 2, 3, 3), (20, 20, 6, 6)]);
        let contours = extract_contours(&mask);
        let selected = select_contour(contours, &cfg, None, 40, 40).unwrap();
        assert_eq!(selected.area, 36);
    }

    #[test]
    fn test_min_area_suppresses_noise() {
        let cfg = PipelineConfig { min_area: 10, ..Default::default() };
        let mask = mask_with_rects(40, 40, &[(5, 5, 2, 2)]);
        let contours = extract_contours(&mask);
        assert_eq!(contours.len(), 1);
        assert!(select_contour(contours, &cfg, None, 40, 40).is_none());
    }

    #[test]
    fn test_border_margin_rejects_edge_regions() {
        let strict = PipelineConfig { min_area: 4, border_margin: 1, ..Default::default() };
        let tolerant = PipelineConfig { min_area: 4, border_margin: 0, ..Default::default() };
        let mask = mask_with_rects(40, 40, &[(0, 0, 4, 4)]);
        assert!(select_contour(extract_contours(&mask), &strict, None, 40, 40).is_none());
        assert!(select_contour(extract_contours(&mask), &tolerant, None, 40, 40).is_some());
    }

    #[test]
    fn test_exact_area_tie_goes_to_previous_point() {
        let cfg = PipelineConfig { min_area: 4, ..Default::default() };
        let mask = mask_with_rects(40, 40, &[(2, 2, 3, 3), (20, 2, 3, 3)]);

        // tracked point sat near the second square last frame
        let near_second = Some(Point::new(21, 3));
        let selected =
            select_contour(extract_contours(&mask), &cfg, near_second, 40, 40).unwrap();
        assert_eq!(selected.min, Point::new(20, 2));

        // with no history, scan order decides
        let selected = select_contour(extract_contours(&mask), &cfg, None, 40, 40).unwrap();
        assert_eq!(selected.min, Point::new(2, 2));
    }

    #[test]
    fn test_empty_mask_yields_no_contours() {
        let mask = ForegroundMask::new(16, 16);
        let contours = extract_contours(&mask);
        assert!(contours.is_empty());
        assert!(select_contour(contours, &PipelineConfig::default(), None, 16, 16).is_none());
    }

    #[test]
    fn test_centroid_point_rounds_to_pixel() {
        let mask = mask_with_rects(16, 16, &[(2, 2, 2, 1)]); // pixels (2,2) and (3,2)
        let contours = extract_contours(&mask);
        assert_eq!(contours.len(), 1);
        let p = contours[0].centroid_point();
        assert_eq!(p.y, 2);
        assert!(p.x == 2 || p.x == 3); // 2.5 rounds to a neighboring pixel
    }
}
