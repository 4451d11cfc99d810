// Window + marker drawing.
// Visual effects provided here:
// 1) Windows that show a pixel buffer (selection image, results).
// 2) Filled dots where the user clicked.

use crate::error::Error;
use crate::types::{FrameBuffer, Point};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_filled_circle_mut;
use minifb::{KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

pub struct Drawer {
    window: Window,    // the on-screen window you see
    left_was_down: bool,
}

impl Drawer {
    /// Create a window of exactly `width x height` image pixels.
    /// Visual: a new empty window appears with your chosen title.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self, Error> {
        let mut window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| Error::WindowInit(format!("{title}: {e}")))?;
        window.set_target_fps(60);
        Ok(Self { window, left_was_down: false })
    }

    /// Push the pixels to the screen (also pumps this window's events).
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<(), Error> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    /// Returns false when the user closes the window.
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// Any key pressed since the last update (the "press any key to quit" check).
    pub fn any_key_pressed(&self) -> bool {
        !self.window.get_keys_pressed(KeyRepeat::No).is_empty()
    }

    /// One event per left-button press (not per frame while held), with the
    /// pointer position in window pixels. Presses outside the window are dropped.
    pub fn left_click(&mut self) -> Option<(i32, i32)> {
        let down = self.window.get_mouse_down(MouseButton::Left);
        let pressed = down && !self.left_was_down;
        self.left_was_down = down;
        if !pressed {
            return None;
        }
        self.window
            .get_mouse_pos(MouseMode::Discard)
            .map(|(x, y)| (x.floor() as i32, y.floor() as i32))
    }

    pub fn set_position(&mut self, x: isize, y: isize) {
        self.window.set_position(x, y);
    }
}

/// Filled disc of `radius` at `p`, clipped to the image.
/// Visual: the red dot that marks a chosen corner.
pub fn draw_marker(img: &mut RgbImage, p: Point, radius: i32, color: [u8; 3]) {
    draw_filled_circle_mut(img, (p.x, p.y), radius, Rgb(color));
}
