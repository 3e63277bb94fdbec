use std::{
    io::{Read, Write},
    path::{Path, PathBuf},
    process::{Child, ChildStdin, Command, ExitStatus, Stdio},
    thread::JoinHandle,
};

use anyhow::Context as _;

use crate::{
    encode::sink::{FrameSink, SinkConfig},
    foundation::core::{FrameIndex, Rgb8},
    foundation::error::{PodiumError, PodiumResult},
    render::{raster::Rasterizer, svg::SvgDocument},
};

/// Where and how [`FfmpegSink`] writes its MP4.
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    pub out_path: PathBuf,
    /// Replace an existing file instead of failing.
    pub overwrite: bool,
    /// Color under transparent pixels; H.264 has no alpha.
    pub background: Rgb8,
}

impl FfmpegSinkOpts {
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
            background: Rgb8::new(0, 0, 0),
        }
    }
}

/// A running `ffmpeg` process fed raw RGBA frames on stdin.
struct Encoder {
    child: Child,
    stdin: Option<ChildStdin>,
    stderr: Option<JoinHandle<std::io::Result<Vec<u8>>>>,
}

impl Encoder {
    fn spawn(args: &[String]) -> PodiumResult<Self> {
        let mut child = Command::new("ffmpeg")
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| PodiumError::render(format!("cannot start ffmpeg: {e}")))?;

        let Some(stdin) = child.stdin.take() else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(PodiumError::render("ffmpeg stdin is not piped"));
        };
        let stderr = child.stderr.take().map(|mut pipe| {
            std::thread::spawn(move || {
                let mut buf = Vec::new();
                pipe.read_to_end(&mut buf)?;
                Ok(buf)
            })
        });
        Ok(Self {
            child,
            stdin: Some(stdin),
            stderr,
        })
    }

    fn write(&mut self, rgba: &[u8]) -> PodiumResult<()> {
        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| PodiumError::render("ffmpeg input already closed"))?;
        stdin
            .write_all(rgba)
            .map_err(|e| PodiumError::render(format!("ffmpeg rejected a frame: {e}")))
    }

    /// Close stdin, wait for ffmpeg to exit and collect what it printed.
    fn close(&mut self) -> PodiumResult<(ExitStatus, String)> {
        drop(self.stdin.take());
        let status = self
            .child
            .wait()
            .map_err(|e| PodiumError::render(format!("waiting for ffmpeg: {e}")))?;
        let log = match self.stderr.take() {
            Some(handle) => match handle.join() {
                Ok(Ok(bytes)) => String::from_utf8_lossy(&bytes).trim().to_string(),
                Ok(Err(e)) => format!("<stderr unreadable: {e}>"),
                Err(_) => "<stderr reader panicked>".to_string(),
            },
            None => String::new(),
        };
        Ok((status, log))
    }
}

/// Encodes frames to MP4 by piping them through the system `ffmpeg`.
///
/// Each SVG frame is rasterized and flattened onto the background first. If the
/// sink is dropped before [`FrameSink::end`], the process is still reaped.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,
    rasterizer: Rasterizer,
    encoder: Option<Encoder>,
    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
    opaque: Vec<u8>,
}

impl FfmpegSink {
    pub fn new(opts: FfmpegSinkOpts, rasterizer: Rasterizer) -> Self {
        Self {
            opts,
            rasterizer,
            encoder: None,
            cfg: None,
            last_idx: None,
            opaque: Vec::new(),
        }
    }

    /// Command line for one encode, without the program name.
    fn encoder_args(&self, cfg: SinkConfig) -> Vec<String> {
        let mut args: Vec<String> = vec![
            if self.opts.overwrite { "-y" } else { "-n" }.into(),
            "-loglevel".into(),
            "error".into(),
            "-f".into(),
            "rawvideo".into(),
            "-pix_fmt".into(),
            "rgba".into(),
            "-s".into(),
            format!("{}x{}", cfg.width, cfg.height),
            // Input rate goes before `-i`, kept rational.
            "-r".into(),
            format!("{}/{}", cfg.fps.num, cfg.fps.den),
            "-i".into(),
            "pipe:0".into(),
            "-an".into(),
            "-c:v".into(),
            "libx264".into(),
            "-pix_fmt".into(),
            "yuv420p".into(),
            "-movflags".into(),
            "+faststart".into(),
        ];
        args.push(self.opts.out_path.to_string_lossy().into_owned());
        args
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> PodiumResult<()> {
        cfg.fps.validate()?;
        if cfg.width == 0 || cfg.height == 0 {
            return Err(PodiumError::validation("mp4 frames cannot be empty"));
        }
        if !cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2) {
            return Err(PodiumError::validation(format!(
                "mp4 output needs an even chart size, got {}x{}",
                cfg.width, cfg.height
            )));
        }
        if self.encoder.is_some() {
            return Err(PodiumError::render("mp4 encode already in progress"));
        }

        ensure_parent_dir(&self.opts.out_path)?;
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(PodiumError::validation(format!(
                "'{}' exists and overwrite is off",
                self.opts.out_path.display()
            )));
        }
        if !is_ffmpeg_on_path() {
            return Err(PodiumError::render(
                "mp4 output needs `ffmpeg` on PATH; render svg or png frames instead",
            ));
        }

        self.encoder = Some(Encoder::spawn(&self.encoder_args(cfg))?);
        self.opaque = vec![0u8; (cfg.width as usize) * (cfg.height as usize) * 4];
        self.cfg = Some(cfg);
        self.last_idx = None;
        tracing::debug!(out = %self.opts.out_path.display(), width = cfg.width, height = cfg.height, "mp4 encode started");
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &SvgDocument) -> PodiumResult<()> {
        let (Some(cfg), Some(encoder)) = (self.cfg, self.encoder.as_mut()) else {
            return Err(PodiumError::render("mp4 sink has not begun"));
        };
        if self.last_idx.is_some_and(|last| idx.0 <= last.0) {
            return Err(PodiumError::render(format!(
                "frame {} arrived after frame {}",
                idx.0,
                self.last_idx.map_or(0, |l| l.0)
            )));
        }
        if (frame.width, frame.height) != (cfg.width, cfg.height) {
            return Err(PodiumError::validation(format!(
                "frame is {}x{} but the video is {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }

        let pixels = self.rasterizer.rasterize(frame)?;
        flatten_onto(&mut self.opaque, &pixels.data, self.opts.background)?;
        encoder.write(&self.opaque)?;
        self.last_idx = Some(idx);
        Ok(())
    }

    fn end(&mut self) -> PodiumResult<()> {
        let mut encoder = self
            .encoder
            .take()
            .ok_or_else(|| PodiumError::render("mp4 sink has not begun"))?;
        self.cfg = None;

        let (status, log) = encoder.close()?;
        if !status.success() {
            return Err(PodiumError::render(format!("ffmpeg failed ({status}): {log}")));
        }
        tracing::debug!(out = %self.opts.out_path.display(), frames = self.last_idx.map_or(0, |l| l.0 + 1), "mp4 written");
        Ok(())
    }
}

impl Drop for FfmpegSink {
    fn drop(&mut self) {
        if let Some(mut encoder) = self.encoder.take() {
            match encoder.close() {
                Ok((status, _)) => {
                    tracing::warn!(out = %self.opts.out_path.display(), %status, "mp4 sink dropped before end; video may be truncated");
                }
                Err(err) => tracing::warn!(%err, "mp4 sink dropped before end"),
            }
        }
    }
}

/// Composite premultiplied RGBA over an opaque background.
fn flatten_onto(dst: &mut [u8], premul: &[u8], bg: Rgb8) -> PodiumResult<()> {
    if dst.len() != premul.len() || !dst.len().is_multiple_of(4) {
        return Err(PodiumError::render(format!(
            "rasterized frame has {} bytes, expected {}",
            premul.len(),
            dst.len()
        )));
    }

    let bg = [u16::from(bg.r), u16::from(bg.g), u16::from(bg.b)];
    for (d, s) in dst.chunks_exact_mut(4).zip(premul.chunks_exact(4)) {
        let a = u16::from(s[3]);
        if a == 255 {
            d.copy_from_slice(s);
            continue;
        }
        let inv = 255 - a;
        for ((dc, sc), bc) in d[..3].iter_mut().zip(&s[..3]).zip(bg) {
            *dc = (u16::from(*sc) + mul_div255(bc, inv)).min(255) as u8;
        }
        d[3] = 255;
    }
    Ok(())
}

/// `x * y / 255`, rounded.
fn mul_div255(x: u16, y: u16) -> u16 {
    let t = u32::from(x) * u32::from(y) + 128;
    ((t + (t >> 8)) >> 8) as u16
}

pub fn ensure_parent_dir(path: &Path) -> PodiumResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|s| s.success())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
