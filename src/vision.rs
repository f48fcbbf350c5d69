// Foreground/background separation.
// Visual expectation: with a stored background and a hand held inside the
// depth band, the mask lights up on the hand and nowhere else.

use log::debug;

use crate::config::PipelineConfig;
use crate::error::Error;
use crate::types::{DepthBuffer, ForegroundMask, FrameBuffer};

#[inline]
fn unpack(px: u32) -> (i32, i32, i32) {
    (
        ((px >> 16) & 0xFF) as i32,
        ((px >> 8) & 0xFF) as i32,
        (px & 0xFF) as i32,
    )
}

/// Mark every pixel whose color moved far enough from the stored background,
/// gated by the near-camera depth band when a depth buffer is supplied.
/// Pure function: reads the buffers, writes nothing but the returned mask.
pub fn foreground_mask(
    color: &FrameBuffer,
    background: &FrameBuffer,
    depth: Option<&DepthBuffer>,
    config: &PipelineConfig,
) -> Result<ForegroundMask, Error> {
    if !color.same_size(background) {
        return Err(Error::dimension_mismatch(
            (color.width, color.height),
            (background.width, background.height),
        ));
    }
    if let Some(d) = depth {
        if d.width != color.width || d.height != color.height {
            return Err(Error::dimension_mismatch(
                (color.width, color.height),
                (d.width, d.height),
            ));
        }
    }

    // Compare squared distances; saves a sqrt per pixel.
    let thr2 = config.color_threshold * config.color_threshold;

    let mut mask = ForegroundMask::new(color.width, color.height);
    let mut marked = 0usize;
    for idx in 0..color.pixels.len() {
        let (cr, cg, cb) = unpack(color.pixels[idx]);
        let (br, bg, bb) = unpack(background.pixels[idx]);
        let (dr, dg, db) = (cr - br, cg - bg, cb - bb);
        let dist2 = (dr * dr + dg * dg + db * db) as f32;

        let mut fg = dist2 > thr2;
        if fg {
            if let Some(d) = depth {
                // 0.0/NaN are "no reading" and never pass the gate.
                let z = d.depths[idx];
                fg = z.is_finite() && z > 0.0 && z >= config.depth_min && z <= config.depth_max;
            }
        }
        if fg {
            mask.data[idx] = true;
            marked += 1;
        }
    }

    debug!("foreground mask: {marked}/{} pixels", mask.data.len());
    Ok(mask)
}

/// Compute the per-pixel median across a burst of frames.
/// Visual expectation: a clean image of the empty scene, moving subjects
/// (hands, people walking through) removed. This is the stored background
/// the differencer compares against.
pub fn median_background(frames: &[FrameBuffer]) -> Result<FrameBuffer, Error> {
    if frames.is_empty() {
        return Err(Error::CameraFrame("median_background: empty burst".into()));
    }

    let w = frames[0].width;
    let h = frames[0].height;
    for f in frames.iter() {
        if f.width != w || f.height != h {
            return Err(Error::dimension_mismatch((w, h), (f.width, f.height)));
        }
    }

    // Median per pixel, channel by channel. The burst is short (~35 frames),
    // so a sort per channel is fine; the buffers are reused across pixels
    // to avoid a heap alloc per pixel.
    let k = frames.len();
    let mut rbuf = vec![0u8; k];
    let mut gbuf = vec![0u8; k];
    let mut bbuf = vec![0u8; k];

    let mut out = Vec::with_capacity(w * h);
    for idx in 0..(w * h) {
        for (i, f) in frames.iter().enumerate() {
            let px = f.pixels[idx];
            rbuf[i] = ((px >> 16) & 0xFF) as u8;
            gbuf[i] = ((px >> 8) & 0xFF) as u8;
            bbuf[i] = (px & 0xFF) as u8;
        }
        rbuf.sort_unstable();
        gbuf.sort_unstable();
        bbuf.sort_unstable();
        let mid = k / 2;
        let r = rbuf[mid] as u32;
        let g = gbuf[mid] as u32;
        let b = bbuf[mid] as u32;
        out.push((r << 16) | (g << 8) | b);
    }

    Ok(FrameBuffer { width: w, height: h, pixels: out })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: usize, height: usize, px: u32) -> FrameBuffer {
        FrameBuffer { width, height, pixels: vec![px; width * height] }
    }

    #[test]
    fn test_identical_frames_yield_empty_mask() {
        let cfg = PipelineConfig::default();
        let frame = solid(8, 6, 0x00AA_BB_CC);
        let mask = foreground_mask(&frame, &frame, None, &cfg).unwrap();
        assert!(mask.is_empty());
    }

    #[test]
    fn test_changed_pixel_above_threshold_is_foreground() {
        let cfg = PipelineConfig::default();
        let background = solid(8, 6, 0x0010_10_10);
        let mut color = background.clone();
        color.pixels[3 * 8 + 5] = 0x00FF_FF_FF; // far from the background color
        let mask = foreground_mask(&color, &background, None, &cfg).unwrap();
        assert!(mask.get(5, 3));
        assert_eq!(mask.data.iter().filter(|&&v| v).count(), 1);
    }

    #[test]
    fn test_small_color_drift_stays_background() {
        let cfg = PipelineConfig::default();
        let background = solid(4, 4, 0x0080_80_80);
        let mut color = background.clone();
        color.pixels[0] = 0x0085_82_7E; // a few counts of sensor noise
        let mask = foreground_mask(&color, &background, None, &cfg).unwrap();
        assert!(mask.is_empty());
    }

    #[test]
    fn test_dimension_mismatch_is_rejected() {
        let cfg = PipelineConfig::default();
        let color = solid(8, 6, 0);
        let background = solid(8, 5, 0);
        let err = foreground_mask(&color, &background, None, &cfg).unwrap_err();
        assert!(matches!(err, Error::DimensionMismatch { .. }));
    }

    #[test]
    fn test_depth_gate_excludes_out_of_band_pixels() {
        let cfg = PipelineConfig::default();
        let background = solid(4, 1, 0x0000_00_00);
        let color = solid(4, 1, 0x00FF_FF_FF);
        // all four pixels differ in color; only one sits inside the band
        let depth = DepthBuffer {
            width: 4,
            height: 1,
            depths: vec![0.0, cfg.depth_max + 0.5, (cfg.depth_min + cfg.depth_max) / 2.0, f32::NAN],
        };
        let mask = foreground_mask(&color, &background, Some(&depth), &cfg).unwrap();
        assert!(!mask.get(0, 0)); // no reading
        assert!(!mask.get(1, 0)); // beyond the band
        assert!(mask.get(2, 0)); // inside the band
        assert!(!mask.get(3, 0)); // NaN reading
    }

    #[test]
    fn test_depth_buffer_dimension_mismatch_is_rejected() {
        let cfg = PipelineConfig::default();
        let frame = solid(4, 4, 0);
        let depth = DepthBuffer { width: 2, height: 2, depths: vec![0.3; 4] };
        let err = foreground_mask(&frame, &frame, Some(&depth), &cfg).unwrap_err();
        assert!(matches!(err, Error::DimensionMismatch { .. }));
    }

    #[test]
    fn test_median_background_removes_transients() {
        // 5 frames of a gray scene; a "hand" crosses pixel 0 in two of them.
        let mut frames = vec![solid(2, 1, 0x0060_60_60); 5];
        frames[1].pixels[0] = 0x00FF_00_00;
        frames[3].pixels[0] = 0x00FF_00_00;
        let bg = median_background(&frames).unwrap();
        assert_eq!(bg.pixels[0], 0x0060_60_60);
        assert_eq!(bg.pixels[1], 0x0060_60_60);
    }

    #[test]
    fn test_median_background_rejects_empty_burst() {
        assert!(median_background(&[]).is_err());
    }

    #[test]
    fn test_median_background_rejects_mixed_sizes() {
        let frames = vec![solid(2, 2, 0), solid(3, 2, 0)];
        let err = median_background(&frames).unwrap_err();
        assert!(matches!(err, Error::DimensionMismatch { .. }));
    }
}
