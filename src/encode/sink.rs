use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{ScopeError, ScopeResult};
use crate::render::raster::FrameRGBA;

/// Configuration provided to a [`FrameSink`] at the start of a run render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Output frames-per-second.
    pub fps: Fps,
}

/// Sink contract for consuming rendered frames in run order.
///
/// Ordering contract: `push_frame` is called in strictly increasing `FrameIndex` order.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> ScopeResult<()>;
    /// Push one frame in strictly increasing order.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> ScopeResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> ScopeResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, FrameRGBA)>,
    ended: bool,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Borrow the captured frames.
    pub fn frames(&self) -> &[(FrameIndex, FrameRGBA)] {
        &self.frames
    }

    /// `true` once `end` was called.
    pub fn ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> ScopeResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> ScopeResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> ScopeResult<()> {
        self.ended = true;
        Ok(())
    }
}

/// Writes every frame as `frame_00000.png`, `frame_00001.png`, ... into one directory.
#[derive(Debug)]
pub struct PngSequenceSink {
    dir: PathBuf,
    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
    written: Vec<PathBuf>,
}

impl PngSequenceSink {
    /// Sink writing into `dir` (created on `begin`).
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cfg: None,
            last_idx: None,
            written: Vec::new(),
        }
    }

    /// Output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Files written so far, in frame order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    /// File name used for frame `idx`.
    pub fn file_name(idx: FrameIndex) -> String {
        format!("frame_{:05}.png", idx.0)
    }
}

impl FrameSink for PngSequenceSink {
    fn begin(&mut self, cfg: SinkConfig) -> ScopeResult<()> {
        if cfg.width == 0 || cfg.height == 0 {
            return Err(ScopeError::validation(
                "png sequence width/height must be non-zero",
            ));
        }
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create frame directory '{}'", self.dir.display()))?;
        self.cfg = Some(cfg);
        self.last_idx = None;
        self.written.clear();
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> ScopeResult<()> {
        let cfg = self
            .cfg
            .ok_or_else(|| ScopeError::render("png sequence sink not started"))?;
        if let Some(last) = self.last_idx
            && idx.0 <= last.0
        {
            return Err(ScopeError::render(format!(
                "frames must be pushed in increasing order (got {} after {})",
                idx.0, last.0
            )));
        }
        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(ScopeError::render(format!(
                "frame is {}x{}, sink expects {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }

        let path = self.dir.join(Self::file_name(idx));
        let png = frame.to_png()?;
        std::fs::write(&path, png).with_context(|| format!("write '{}'", path.display()))?;
        self.last_idx = Some(idx);
        self.written.push(path);
        Ok(())
    }

    fn end(&mut self) -> ScopeResult<()> {
        tracing::debug!(
            frames = self.written.len(),
            dir = %self.dir.display(),
            "png sequence finished"
        );
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
