use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use log::{debug, info};
use rain_render::{FrameBuffer, RainAnimator, Surface};
use rand::Rng;

/// Colour the surface is cleared to before every frame.
pub const BACKGROUND: u32 = 0x0000_0000;

/// Where finished frames go, and where the quit request comes from.
pub trait Display {
    fn present(&mut self, frame: &FrameBuffer) -> Result<()>;

    /// Polled once per iteration, after presenting.
    fn should_close(&self) -> bool;
}

/// Tick source and frame pacing.
pub trait FrameClock {
    /// Monotonic tick count for the frame about to be built.
    fn ticks(&self) -> u64;

    /// Blocks for whatever remains of the current frame's budget.
    fn wait(&mut self);
}

/// Milliseconds since start, paced to a target frame rate.
#[cfg_attr(not(feature = "window"), allow(dead_code))]
pub struct WallClock {
    start: Instant,
    frame_start: Instant,
    interval: Duration,
}

#[cfg_attr(not(feature = "window"), allow(dead_code))]
impl WallClock {
    pub fn new(fps: u32) -> Self {
        let now = Instant::now();
        Self { start: now, frame_start: now, interval: frame_interval(fps) }
    }
}

impl FrameClock for WallClock {
    fn ticks(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    fn wait(&mut self) {
        let elapsed = self.frame_start.elapsed();
        if let Some(remaining) = self.interval.checked_sub(elapsed) {
            thread::sleep(remaining);
        }
        self.frame_start = Instant::now();
    }
}

/// Synthetic milliseconds advancing by one frame interval per frame.
pub struct FixedStepClock {
    frame: u64,
    step_ms: u64,
}

impl FixedStepClock {
    pub fn new(fps: u32) -> Self {
        Self { frame: 0, step_ms: frame_interval(fps).as_millis() as u64 }
    }
}

impl FrameClock for FixedStepClock {
    fn ticks(&self) -> u64 {
        self.frame * self.step_ms
    }

    fn wait(&mut self) {
        self.frame += 1;
    }
}

fn frame_interval(fps: u32) -> Duration {
    Duration::from_secs(1) / fps.max(1)
}

/// Owns the surface and drives the rain at a fixed rate.
pub struct HostApplication<R, D, C> {
    animator: RainAnimator<R>,
    surface: FrameBuffer,
    display: D,
    clock: C,
}

impl<R: Rng, D: Display, C: FrameClock> HostApplication<R, D, C> {
    pub fn new(animator: RainAnimator<R>, width: u32, height: u32, display: D, clock: C) -> Self {
        debug!("host surface {width}x{height}");
        Self { animator, surface: FrameBuffer::new(width, height), display, clock }
    }

    /// Runs frames until the display asks to close. Returns the frame count.
    pub fn run(&mut self) -> Result<u64> {
        let mut frames = 0;
        loop {
            self.surface.clear(BACKGROUND);
            let tick = self.clock.ticks();
            self.animator.advance(tick);
            self.animator.draw(&mut self.surface);
            self.display.present(&self.surface)?;
            frames += 1;

            if self.display.should_close() {
                info!("quit requested after {frames} frames");
                return Ok(frames);
            }

            self.clock.wait();
        }
    }

    pub fn into_display(self) -> D {
        self.display
    }
}

#[cfg(test)]
mod tests {
    use image::{DynamicImage, Rgb, RgbImage};
    use rain_render::{PatternRasterizer, RainOptions, StaticImage};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    /// Keeps copies of presented frames and closes after `limit` of them.
    struct CapturingDisplay {
        limit: usize,
        frames: Vec<FrameBuffer>,
    }

    impl Display for CapturingDisplay {
        fn present(&mut self, frame: &FrameBuffer) -> Result<()> {
            self.frames.push(frame.clone());
            Ok(())
        }

        fn should_close(&self) -> bool {
            self.frames.len() >= self.limit
        }
    }

    /// Fixed-step clock that remembers every tick it handed out.
    struct TickLog {
        inner: FixedStepClock,
        seen: std::cell::RefCell<Vec<u64>>,
    }

    impl FrameClock for TickLog {
        fn ticks(&self) -> u64 {
            let ticks = self.inner.ticks();
            self.seen.borrow_mut().push(ticks);
            ticks
        }

        fn wait(&mut self) {
            self.inner.wait();
        }
    }

    fn animator(value: u8) -> RainAnimator<StdRng> {
        let options = RainOptions { width: 48, height: 36, cell_size: 6, ..RainOptions::default() };
        let image =
            DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 6, Rgb([value, value, value])));
        RainAnimator::new(
            &options,
            &StaticImage::new(image),
            &PatternRasterizer,
            StdRng::seed_from_u64(8),
        )
        .unwrap()
    }

    #[test]
    fn runs_until_display_closes() {
        let display = CapturingDisplay { limit: 5, frames: Vec::new() };
        let mut host = HostApplication::new(animator(255), 48, 36, display, FixedStepClock::new(30));

        assert_eq!(host.run().unwrap(), 5);
        let display = host.into_display();
        assert_eq!(display.frames.len(), 5);
        assert!(display.frames.iter().all(|frame| frame.width() == 48 && frame.height() == 36));
        assert!(display.frames.iter().any(|frame| frame.pixels().iter().any(|&p| p != BACKGROUND)));
    }

    #[test]
    fn dark_mask_presents_background_only() {
        let display = CapturingDisplay { limit: 10, frames: Vec::new() };
        let mut host = HostApplication::new(animator(0), 48, 36, display, FixedStepClock::new(30));

        host.run().unwrap();
        let display = host.into_display();
        for frame in &display.frames {
            assert!(frame.pixels().iter().all(|&pixel| pixel == BACKGROUND));
        }
    }

    #[test]
    fn fixed_step_ticks_follow_frame_interval() {
        let clock = TickLog { inner: FixedStepClock::new(30), seen: Default::default() };
        let display = CapturingDisplay { limit: 4, frames: Vec::new() };
        let mut host = HostApplication::new(animator(255), 48, 36, display, clock);

        host.run().unwrap();
        let seen = host.clock.seen.borrow().clone();
        assert_eq!(&seen[..4], &[0, 33, 66, 99]);
    }

    #[test]
    fn wall_clock_sleeps_out_the_frame_budget() {
        let mut clock = WallClock::new(50);
        let start = Instant::now();
        clock.wait();
        clock.wait();
        assert!(start.elapsed() >= Duration::from_millis(35));
        assert!(clock.ticks() >= 35);
    }
}
