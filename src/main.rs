// What you SEE:
// • "Select Points" shows the input picture. Click the page corners in order
//   TL → TR → BR → BL; each click leaves a red dot.
// • After the 4th click two more windows open: the flattened page
//   ("Perspective Transform") and its black-and-white scan
//   ("Adaptive Threshold Output").
// • Any key, in any window, quits. Closing "Select Points" quits too.

mod config;
mod draw;
mod error;
mod geometry;
mod loader;
mod logger;
mod pipeline;
mod session;
mod threshold;
mod types;

use config::ScanConfig;
use draw::Drawer;
use error::Error;
use session::{ClickOutcome, Session};
use tracing::{error, info};
use types::{FrameBuffer, Point};

const SELECT_TITLE: &str = "Select Points";
const WARPED_TITLE: &str = "Perspective Transform";
const BINARY_TITLE: &str = "Adaptive Threshold Output";

/// The two result windows plus the buffers they show (results never change).
struct ResultWindows {
    warped: (Drawer, FrameBuffer),
    binary: (Drawer, FrameBuffer),
}

impl ResultWindows {
    fn open(session: &Session) -> Result<Option<Self>, Error> {
        let Some(result) = session.result() else { return Ok(None) };
        let (w, h) = (result.warped.width() as usize, result.warped.height() as usize);

        let mut warped = Drawer::new(WARPED_TITLE, w, h)?;
        let mut binary = Drawer::new(BINARY_TITLE, w, h)?;
        // Side by side, so they don't stack on top of each other.
        warped.set_position(40, 40);
        binary.set_position(60 + w as isize, 40);

        Ok(Some(Self {
            warped: (warped, FrameBuffer::from_rgb(&result.warped)),
            binary: (binary, FrameBuffer::from_gray(&result.binary)),
        }))
    }

    /// Redraw both; true if a key was pressed in either.
    fn present(&mut self) -> Result<bool, Error> {
        let mut quit = false;
        for (drawer, fb) in [&mut self.warped, &mut self.binary] {
            if drawer.is_open() {
                drawer.present(fb)?;
                quit |= drawer.any_key_pressed();
            }
        }
        Ok(quit)
    }
}

/// Print the corners collected so far, e.g. `[[100, 50], [500, 60]]`.
fn echo_points(session: &Session) {
    println!("{}", format_points(session.points()));
}

fn format_points(points: &[Point]) -> String {
    let pts: Vec<[i32; 2]> = points.iter().map(|p| [p.x, p.y]).collect();
    format!("{pts:?}")
}

fn main() -> Result<(), Error> {
    logger::init();

    /* --- Config + image ---
       Visual: nothing yet; a bad path ends the program here. */
    let config = ScanConfig::from_args(std::env::args().skip(1))?;
    let image = loader::load(&config)?;
    let (w, h) = image.dimensions();
    let mut session = Session::new(config, image);

    /* --- Selection window ---
       Visual: the picture appears, ready for clicks. */
    let mut select = Drawer::new(SELECT_TITLE, w as usize, h as usize)?;
    let mut screen = FrameBuffer::from_rgb(session.display());
    let mut results: Option<ResultWindows> = None;

    println!("Click 4 points in order: TL -> TR -> BR -> BL");
    info!(width = w, height = h, "Waiting for corner clicks");

    /* ------------------------------ Main loop ------------------------------ */
    while select.is_open() {
        // 1) Present first so this frame's input is fresh.
        select.present(&screen)?;
        if select.any_key_pressed() {
            break;
        }

        // 2) Clicks → session (the 4th one runs the scan synchronously).
        if let Some((x, y)) = select.left_click() {
            match session.click(x, y) {
                Ok(ClickOutcome::Ignored) => {}
                Ok(outcome) => {
                    echo_points(&session);
                    screen = FrameBuffer::from_rgb(session.display()); // visual: new red dot
                    if outcome == ClickOutcome::Completed {
                        results = ResultWindows::open(&session)?; // visual: two result windows
                    }
                }
                // Visual: the dots stay, no result windows; close or press a key to quit.
                Err(e) => {
                    echo_points(&session);
                    screen = FrameBuffer::from_rgb(session.display());
                    error!("Could not flatten the selected region: {e}");
                }
            }
        }

        // 3) Keep result windows alive until the user quits.
        if let Some(r) = results.as_mut() {
            if r.present()? {
                break;
            }
        }
    }

    session.finish();
    info!(phase = ?session.phase(), runs = session.pipeline_runs(), "Session closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, RgbImage};

    #[test]
    fn failed_fourth_click_still_has_all_points_to_echo() {
        let config = ScanConfig { display_width: 64, display_height: 64, ..ScanConfig::default() };
        let loaded = loader::from_image(&config, DynamicImage::ImageRgb8(RgbImage::new(64, 64)));
        let mut session = Session::new(config, loaded);
        for (x, y) in [(1, 1), (10, 10), (20, 20)] {
            session.click(x, y).unwrap();
        }
        assert!(session.click(1, 40).is_err());

        assert_eq!(format_points(session.points()), "[[1, 1], [10, 10], [20, 20], [1, 40]]");
    }
}
