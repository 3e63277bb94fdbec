use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    foundation::core::{Fps, FrameIndex},
    foundation::error::{PodiumError, PodiumResult},
    render::{
        raster::{Rasterizer, unpremultiply},
        svg::SvgDocument,
    },
};

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Output frames per second.
    pub fps: Fps,
}

/// Sink contract for consuming frames in playback order.
///
/// `push_frame` is called in strictly increasing `FrameIndex` order.
pub trait FrameSink {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> PodiumResult<()>;
    /// Push one frame in strictly increasing order.
    fn push_frame(&mut self, idx: FrameIndex, frame: &SvgDocument) -> PodiumResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> PodiumResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, SvgDocument)>,
    ended: bool,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// The configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    pub fn frames(&self) -> &[(FrameIndex, SvgDocument)] {
        &self.frames
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> PodiumResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &SvgDocument) -> PodiumResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> PodiumResult<()> {
        self.ended = true;
        Ok(())
    }
}

/// Writes every frame as `frame_<index>.svg` into a directory.
#[derive(Debug)]
pub struct SvgSequenceSink {
    dir: PathBuf,
    written: u64,
}

impl SvgSequenceSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: 0,
        }
    }

    pub fn written(&self) -> u64 {
        self.written
    }
}

impl FrameSink for SvgSequenceSink {
    fn begin(&mut self, _cfg: SinkConfig) -> PodiumResult<()> {
        ensure_dir(&self.dir)?;
        self.written = 0;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &SvgDocument) -> PodiumResult<()> {
        let path = frame_path(&self.dir, idx, "svg");
        std::fs::write(&path, frame.as_str())
            .with_context(|| format!("write svg frame '{}'", path.display()))?;
        self.written += 1;
        Ok(())
    }

    fn end(&mut self) -> PodiumResult<()> {
        tracing::debug!(frames = self.written, dir = %self.dir.display(), "svg sequence written");
        Ok(())
    }
}

/// Rasterizes every frame and writes it as `frame_<index>.png` into a directory.
#[derive(Debug)]
pub struct PngSequenceSink {
    dir: PathBuf,
    rasterizer: Rasterizer,
    written: u64,
}

impl PngSequenceSink {
    pub fn new(dir: impl Into<PathBuf>, rasterizer: Rasterizer) -> Self {
        Self {
            dir: dir.into(),
            rasterizer,
            written: 0,
        }
    }

    pub fn written(&self) -> u64 {
        self.written
    }
}

impl FrameSink for PngSequenceSink {
    fn begin(&mut self, _cfg: SinkConfig) -> PodiumResult<()> {
        ensure_dir(&self.dir)?;
        self.written = 0;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &SvgDocument) -> PodiumResult<()> {
        let path = frame_path(&self.dir, idx, "png");
        write_png(&self.rasterizer, frame, &path)?;
        self.written += 1;
        Ok(())
    }

    fn end(&mut self) -> PodiumResult<()> {
        tracing::debug!(frames = self.written, dir = %self.dir.display(), "png sequence written");
        Ok(())
    }
}

/// Rasterize one document and save it as a PNG file.
pub fn write_png(rasterizer: &Rasterizer, doc: &SvgDocument, path: &Path) -> PodiumResult<()> {
    let mut frame = rasterizer.rasterize(doc)?;
    if frame.premultiplied {
        unpremultiply(&mut frame.data);
    }
    let img = image::RgbaImage::from_raw(frame.width, frame.height, frame.data)
        .ok_or_else(|| PodiumError::render("frame buffer does not match its size"))?;
    img.save(path)
        .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

/// `<dir>/frame_<index>.<ext>` with the index zero-padded to five digits.
pub fn frame_path(dir: &Path, idx: FrameIndex, ext: &str) -> PathBuf {
    dir.join(format!("frame_{:05}.{ext}", idx.0))
}

fn ensure_dir(dir: &Path) -> PodiumResult<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory '{}'", dir.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
