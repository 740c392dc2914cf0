use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

use crate::encode::sink::{FrameSink, SinkConfig, check_frame_geometry};
use crate::foundation::core::{Fps, FrameIndex, FrameRgb8};
use crate::foundation::error::{FrameshiftError, FrameshiftResult};

/// Options for [`FfmpegSink`] MP4 output.
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// Output file path.
    pub out_path: PathBuf,
    /// Overwrite output file if it already exists.
    pub overwrite: bool,
    /// x264 constant rate factor; `None` keeps ffmpeg's default.
    pub crf: Option<u8>,
}

impl FfmpegSinkOpts {
    /// Create options for outputting an MP4 to `out_path`.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
            crf: None,
        }
    }
}

/// Sink that spawns the system `ffmpeg` and streams raw `rgb24` frames to its stdin.
///
/// Output is a single H.264 video stream with no audio, at exactly the declared size.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,

    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,

    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
    frames_written: u64,
}

impl FfmpegSink {
    /// Create a new sink that streams into `ffmpeg`.
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            child: None,
            stdin: None,
            stderr_drain: None,
            cfg: None,
            last_idx: None,
            frames_written: 0,
        }
    }

    /// Frames accepted so far.
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    /// Output path.
    pub fn out_path(&self) -> &Path {
        &self.opts.out_path
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> FrameshiftResult<()> {
        if self.child.is_some() {
            return Err(FrameshiftError::create("ffmpeg sink already started"));
        }
        if cfg.fps.num == 0 || cfg.fps.den == 0 {
            return Err(FrameshiftError::validation("fps must be non-zero"));
        }
        if cfg.width == 0 || cfg.height == 0 {
            return Err(FrameshiftError::validation(
                "ffmpeg sink width/height must be non-zero",
            ));
        }

        ensure_parent_dir(&self.opts.out_path)?;
        // Claim the output up front so an unwritable path is reported before any decoding work.
        let mut open = std::fs::OpenOptions::new();
        open.write(true);
        if self.opts.overwrite {
            open.create(true).truncate(true);
        } else {
            open.create_new(true);
        }
        open.open(&self.opts.out_path).map_err(|e| {
            FrameshiftError::create(format!(
                "cannot create output file '{}': {e}",
                self.opts.out_path.display()
            ))
        })?;

        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        cmd.args([
            "-y",
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgb24",
            "-s",
            &format!("{}x{}", cfg.width, cfg.height),
        ]);
        push_input_fps(&mut cmd, cfg.fps);
        cmd.args(["-i", "pipe:0"]);

        // Output: h264, video only. Source geometry is kept as is.
        cmd.args([
            "-an",
            "-c:v",
            "libx264",
            "-pix_fmt",
            output_pix_fmt(cfg.width, cfg.height),
        ]);
        if let Some(crf) = self.opts.crf {
            cmd.args(["-crf", &crf.to_string()]);
        }
        cmd.args(["-movflags", "+faststart"]);
        cmd.arg(&self.opts.out_path);

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                let _ = std::fs::remove_file(&self.opts.out_path);
                return Err(FrameshiftError::create(format!(
                    "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
                )));
            }
        };

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| FrameshiftError::create("failed to open ffmpeg stdin (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| FrameshiftError::create("failed to open ffmpeg stderr (unexpected)"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stderr_drain = Some(stderr_drain);
        self.cfg = Some(cfg);
        self.last_idx = None;
        self.frames_written = 0;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRgb8) -> FrameshiftResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| FrameshiftError::encode("ffmpeg sink not started"))?;
        if let Some(last) = self.last_idx
            && idx.0 <= last.0
        {
            return Err(FrameshiftError::encode(
                "ffmpeg sink received out-of-order frame index",
            ));
        }
        check_frame_geometry(cfg, frame)?;
        self.last_idx = Some(idx);

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(FrameshiftError::encode("ffmpeg sink is already finalized"));
        };

        use std::io::Write as _;
        stdin.write_all(&frame.data).map_err(|e| {
            FrameshiftError::encode(format!("failed to write frame to ffmpeg stdin: {e}"))
        })?;
        self.frames_written += 1;
        Ok(())
    }

    fn end(&mut self) -> FrameshiftResult<()> {
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| FrameshiftError::encode("ffmpeg sink not started"))?;

        let status = child.wait().map_err(|e| {
            FrameshiftError::encode(format!("failed to wait for ffmpeg to finish: {e}"))
        })?;
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| FrameshiftError::encode("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| {
                    FrameshiftError::encode(format!("ffmpeg stderr read failed: {e}"))
                })?,
            None => Vec::new(),
        };

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(FrameshiftError::encode(format!(
                "ffmpeg exited with status {}: {}",
                status,
                stderr.trim()
            )));
        }

        self.cfg = None;
        Ok(())
    }
}

impl Drop for FfmpegSink {
    fn drop(&mut self) {
        // Abandoned mid-stream: close stdin so ffmpeg finalizes what it has, leaving the partial
        // file in place.
        if self.child.is_some() {
            let _ = self.end();
        }
    }
}

/// Chroma layout for the encoded stream.
///
/// 4:2:0 needs even dimensions; odd sizes are encoded as 4:4:4 instead of being padded or
/// cropped.
pub(crate) fn output_pix_fmt(width: u32, height: u32) -> &'static str {
    if width.is_multiple_of(2) && height.is_multiple_of(2) {
        "yuv420p"
    } else {
        "yuv444p"
    }
}

fn push_input_fps(cmd: &mut Command, fps: Fps) {
    // For rawvideo input, `-r` before `-i` sets the input framerate as a rational.
    cmd.args(["-r", &fps.to_string()]);
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> FrameshiftResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            FrameshiftError::create(format!(
                "failed to create output directory '{}': {e}",
                parent.display()
            ))
        })?;
    }
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
