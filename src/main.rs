// What you SEE:
// • Live camera is always the base image.
// • Hold SPACE: the tracked fingertip inks a stroke into the frame.
// • Release SPACE: the stroke counts as your drawing; the word advances
//   and the frame is saved as a PNG.
// • R rebuilds the stored background (step out of frame first). N skips
//   to the next word. ESC quits.

use std::path::Path;

use log::{info, warn};

use depthsketch::camera::CameraCapture;
use depthsketch::draw::{Drawer, draw_text_5x7};
use depthsketch::game::FileWordSource;
use depthsketch::vision::median_background;
use depthsketch::{Error, FrameBuffer, FrameProcessor, PipelineConfig};

const CONFIG_PATH: &str = "depthsketch.toml";
const WORDS_PATH: &str = "words.txt";

/// Write the composited frame to sketch-NNN.png.
fn save_sketch(frame: &FrameBuffer, index: u32) -> Result<(), Error> {
    let mut bytes = Vec::with_capacity(frame.pixels.len() * 3);
    for &px in &frame.pixels {
        bytes.push(((px >> 16) & 0xFF) as u8);
        bytes.push(((px >> 8) & 0xFF) as u8);
        bytes.push((px & 0xFF) as u8);
    }
    let path = format!("sketch-{index:03}.png");
    image::save_buffer(
        &path,
        &bytes,
        frame.width as u32,
        frame.height as u32,
        image::ExtendedColorType::Rgb8,
    )
    .map_err(|e| Error::Snapshot(format!("{path}: {e}")))?;
    info!("saved {path}");
    Ok(())
}

fn main() -> Result<(), Error> {
    env_logger::init();
    info!("depthsketch {}", depthsketch::version());

    let config = if Path::new(CONFIG_PATH).exists() {
        PipelineConfig::load(CONFIG_PATH)?
    } else {
        PipelineConfig::default()
    };

    /* --- Camera + window setup --- */
    let mut cam = CameraCapture::new(0, 640, 480)?;
    let (w, h) = cam.resolution();
    let mut drawer = Drawer::new("Depthsketch — draw the word", w as usize, h as usize)?;

    let mut processor = FrameProcessor::new(config.clone());
    match processor.game_mut().load_data(&FileWordSource::new(WORDS_PATH)) {
        Ok(()) => processor.game_mut().shuffle(0xC0FFEE),
        Err(e) => warn!("word game disabled: {e}"),
    }

    /* --- Stored background ---
       The differencer compares every live frame against this. */
    info!("capturing background, keep the scene empty...");
    let mut background = median_background(&cam.capture_burst(config.background_frames)?)?;

    let mut screen = FrameBuffer::new(w as usize, h as usize);
    let mut stroke_length = 0.0f32;
    let mut sketches_saved = 0u32;

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        if drawer.r_pressed_once() {
            info!("rebuilding background...");
            background = median_background(&cam.capture_burst(config.background_frames)?)?;
        }
        if drawer.n_pressed_once() {
            if let Err(e) = processor.game_mut().new_word() {
                warn!("{e}");
            }
        }

        let live = cam.next_frame()?;
        if !live.same_size(&screen) {
            // camera hiccup; skip this frame
            continue;
        }
        screen.pixels.copy_from_slice(&live.pixels);

        let pressed = drawer.space_down();
        let result = match processor.process_frame(
            &live,
            &background,
            None, // plain webcams carry no depth channel
            Some(&mut screen),
            pressed,
            stroke_length,
        ) {
            Ok(r) => r,
            Err(e) => {
                warn!("frame skipped: {e}");
                drawer.present(&screen)?;
                continue;
            }
        };
        stroke_length = result.stroke_length;

        if result.completed {
            info!("gesture complete: length {:.1}", result.stroke_length);
            if let Err(e) = save_sketch(&screen, sketches_saved) {
                warn!("{e}");
            }
            sketches_saved += 1;
            if let Err(e) = processor.game_mut().new_word() {
                warn!("{e}");
            }
            stroke_length = 0.0;
        }

        let status = if pressed { "DRAW" } else { "IDLE" };
        let word = result.current_word.as_deref().unwrap_or("-");
        let hud = format!(
            "{status} | WORD: {word} | LEN: {stroke_length:.0} | SPACE: DRAW  R: BG  N: SKIP"
        );
        draw_text_5x7(&mut screen, 8, 8, &hud, 0x00FF_FF_FF);

        drawer.present(&screen)?;
    }

    Ok(())
}
