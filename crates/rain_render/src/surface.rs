use image::{Rgb, RgbImage};

use crate::glyphs::cache::Sprite;

/// Pixel target the animator draws onto.
pub trait Surface {
    fn dimensions(&self) -> (u32, u32);

    /// Fills the whole surface with `rgb` (`0x00RRGGBB`).
    fn clear(&mut self, rgb: u32);

    /// Composites `sprite` with its top-left corner at `x`, `y`.
    fn blit(&mut self, sprite: &Sprite, x: u32, y: u32);
}

/// CPU surface of `0x00RRGGBB` pixels.
#[derive(Clone, Debug)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl FrameBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, pixels: vec![0; (width * height) as usize] }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> u32 {
        self.pixels[(y * self.width + x) as usize]
    }

    pub fn to_rgb_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width, self.height, |x, y| {
            let [_, r, g, b] = self.pixel(x, y).to_be_bytes();
            Rgb([r, g, b])
        })
    }
}

impl Surface for FrameBuffer {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self, rgb: u32) {
        self.pixels.fill(rgb & 0x00ff_ffff);
    }

    fn blit(&mut self, sprite: &Sprite, x: u32, y: u32) {
        let visible_width = sprite.width.min(self.width.saturating_sub(x));
        let visible_height = sprite.height.min(self.height.saturating_sub(y));

        for sy in 0..visible_height {
            let src_row = (sy * sprite.width) as usize;
            let dst_row = ((y + sy) * self.width + x) as usize;
            for sx in 0..visible_width as usize {
                let src = sprite.pixels[src_row + sx];
                let dst = &mut self.pixels[dst_row + sx];
                *dst = blend(src, *dst);
            }
        }
    }
}

/// Source-over blend of an ARGB pixel onto an opaque RGB pixel.
fn blend(src: u32, dst: u32) -> u32 {
    let alpha = src >> 24;
    match alpha {
        0 => dst,
        255 => src & 0x00ff_ffff,
        _ => {
            let inverse = 255 - alpha;
            let channel = |shift: u32| {
                let s = (src >> shift) & 0xff;
                let d = (dst >> shift) & 0xff;
                ((s * alpha + d * inverse + 127) / 255) << shift
            };
            channel(16) | channel(8) | channel(0)
        },
    }
}
