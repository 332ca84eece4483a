use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rain_render::FrameBuffer;

use crate::host::Display;

/// Writes every presented frame as a numbered PNG, closing after `limit`.
pub struct RecordingDisplay {
    out_dir: PathBuf,
    limit: u64,
    written: u64,
    progress: ProgressBar,
}

impl RecordingDisplay {
    pub fn new(out_dir: PathBuf, limit: u64) -> Result<Self> {
        fs::create_dir_all(&out_dir)
            .with_context(|| format!("failed to create output directory {:?}", out_dir))?;

        let progress = ProgressBar::new(limit);
        progress.set_style(
            ProgressStyle::with_template(
                "{spinner} [{elapsed_precise}] [{bar:40.green/black}] {pos}/{len} frames",
            )
            .context("invalid progress template")?
            .progress_chars("=> "),
        );

        Ok(Self { out_dir, limit: limit.max(1), written: 0, progress })
    }

    pub fn hidden(out_dir: PathBuf, limit: u64) -> Result<Self> {
        let display = Self::new(out_dir, limit)?;
        display.progress.set_draw_target(indicatif::ProgressDrawTarget::hidden());
        Ok(display)
    }

    pub fn finish(&self) {
        self.progress.finish_with_message(format!(
            "{} frames written to {:?}",
            self.written, self.out_dir
        ));
    }
}

impl Display for RecordingDisplay {
    fn present(&mut self, frame: &FrameBuffer) -> Result<()> {
        let frame_path = self.out_dir.join(format!("frame_{:04}.png", self.written));
        frame
            .to_rgb_image()
            .save(&frame_path)
            .with_context(|| format!("failed to write {:?}", frame_path))?;
        self.written += 1;
        self.progress.inc(1);
        Ok(())
    }

    fn should_close(&self) -> bool {
        self.written >= self.limit
    }
}
