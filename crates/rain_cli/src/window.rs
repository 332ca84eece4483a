use anyhow::{Context, Result};
use minifb::{Key, Window, WindowOptions};
use rain_render::FrameBuffer;

use crate::host::Display;

/// Native window showing the frames; closing it or pressing Escape quits.
pub struct WindowDisplay {
    window: Window,
}

impl WindowDisplay {
    pub fn open(title: &str, width: u32, height: u32) -> Result<Self> {
        let window = Window::new(title, width as usize, height as usize, WindowOptions::default())
            .with_context(|| format!("failed to open a {width}x{height} window"))?;
        Ok(Self { window })
    }
}

impl Display for WindowDisplay {
    fn present(&mut self, frame: &FrameBuffer) -> Result<()> {
        self.window
            .update_with_buffer(frame.pixels(), frame.width() as usize, frame.height() as usize)
            .context("failed to present frame")
    }

    fn should_close(&self) -> bool {
        !self.window.is_open() || self.window.is_key_down(Key::Escape)
    }
}
