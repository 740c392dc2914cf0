use std::collections::VecDeque;
use std::ffi::OsString;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Stdio};

use crate::foundation::core::{FrameRgb8, VideoMetadata, rgb8_len};
use crate::foundation::error::{FrameshiftError, FrameshiftResult};
use crate::media::probe::probe_video;

/// Lazy, finite, non-restartable sequence of decoded frames in temporal order.
pub trait FrameSource {
    /// Metadata read when the source was opened.
    fn metadata(&self) -> &VideoMetadata;
    /// Next frame, or `None` at end of stream.
    fn next_frame(&mut self) -> FrameshiftResult<Option<FrameRgb8>>;
    /// Release decoder resources. Safe to call more than once.
    fn close(&mut self) -> FrameshiftResult<()>;
}

/// Frame source backed by a system `ffmpeg` child writing raw `rgb24` to stdout.
///
/// Only one decoded frame is held in memory at a time.
pub struct FfmpegFrameSource {
    path: PathBuf,
    meta: VideoMetadata,
    child: Option<Child>,
    stdout: Option<BufReader<ChildStdout>>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,
    frame_len: usize,
    pending: Option<FrameRgb8>,
    ended: bool,
}

impl FfmpegFrameSource {
    /// Probe and open `path`, failing with [`FrameshiftError::Open`] when the container is
    /// unreadable or holds no decodable frames.
    pub fn open(path: impl AsRef<Path>) -> FrameshiftResult<Self> {
        let path = path.as_ref();
        let meta = probe_video(path)?;
        let frame_len = rgb8_len(meta.width, meta.height)?;

        let mut child = Command::new("ffmpeg")
            .args(decoder_args(path))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                FrameshiftError::open(format!(
                    "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
                ))
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| FrameshiftError::open("failed to open ffmpeg stdout (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| FrameshiftError::open("failed to open ffmpeg stderr (unexpected)"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        let mut source = Self {
            path: path.to_path_buf(),
            meta,
            child: Some(child),
            stdout: Some(BufReader::with_capacity(frame_len.min(1 << 22), stdout)),
            stderr_drain: Some(stderr_drain),
            frame_len,
            pending: None,
            ended: false,
        };

        // Decode one frame up front so an empty or undecodable stream fails at open.
        match source.read_frame() {
            Ok(Some(first)) => source.pending = Some(first),
            Ok(None) => {
                let detail = source.finish_child().err().map(|e| format!(": {e}"));
                return Err(FrameshiftError::open(format!(
                    "'{}' contains no decodable frames{}",
                    path.display(),
                    detail.unwrap_or_default()
                )));
            }
            Err(e) => {
                let _ = source.close();
                return Err(FrameshiftError::open(e.to_string()));
            }
        }

        tracing::debug!(
            path = %source.path.display(),
            width = meta.width,
            height = meta.height,
            fps = %meta.fps,
            frames = meta.frame_count,
            "opened frame source"
        );
        Ok(source)
    }

    fn read_frame(&mut self) -> FrameshiftResult<Option<FrameRgb8>> {
        if self.ended {
            return Ok(None);
        }
        let Some(stdout) = self.stdout.as_mut() else {
            return Ok(None);
        };

        let mut buf = vec![0u8; self.frame_len];
        let mut filled = 0usize;
        while filled < buf.len() {
            match stdout.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    return Err(FrameshiftError::open(format!(
                        "failed to read decoded frame from ffmpeg: {e}"
                    )));
                }
            }
        }

        if filled == 0 {
            self.ended = true;
            return Ok(None);
        }
        if filled < buf.len() {
            self.ended = true;
            return Err(FrameshiftError::open(format!(
                "truncated frame from ffmpeg: got {filled} bytes, expected {}",
                buf.len()
            )));
        }
        FrameRgb8::new(self.meta.width, self.meta.height, buf).map(Some)
    }

    /// Wait for the decoder after end of stream and surface its exit status.
    fn finish_child(&mut self) -> FrameshiftResult<()> {
        drop(self.stdout.take());
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };
        if !self.ended {
            // Closed early: the decoder may still be blocked writing.
            let _ = child.kill();
        }
        let status = child.wait().map_err(|e| {
            FrameshiftError::open(format!("failed to wait for ffmpeg decoder: {e}"))
        })?;
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| FrameshiftError::open("ffmpeg stderr drain thread panicked"))?
                .unwrap_or_default(),
            None => Vec::new(),
        };
        if self.ended && !status.success() {
            return Err(FrameshiftError::open(format!(
                "ffmpeg decoder exited with status {status}: {}",
                String::from_utf8_lossy(&stderr_bytes).trim()
            )));
        }
        Ok(())
    }
}

impl FrameSource for FfmpegFrameSource {
    fn metadata(&self) -> &VideoMetadata {
        &self.meta
    }

    fn next_frame(&mut self) -> FrameshiftResult<Option<FrameRgb8>> {
        if let Some(frame) = self.pending.take() {
            return Ok(Some(frame));
        }
        self.read_frame()
    }

    fn close(&mut self) -> FrameshiftResult<()> {
        self.pending = None;
        self.finish_child()
    }
}

impl Drop for FfmpegFrameSource {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

/// Arguments for the decoding child.
///
/// Frames leave the decoder exactly as stored: no rate conversion (so variable frame rate input
/// is neither padded nor thinned) and no display rotation (so the frame size matches the coded
/// size reported by ffprobe).
pub(crate) fn decoder_args(path: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = ["-v", "error", "-nostdin", "-noautorotate", "-i"]
        .into_iter()
        .map(OsString::from)
        .collect();
    args.push(path.as_os_str().to_os_string());
    args.extend(
        [
            "-map",
            "0:v:0",
            "-an",
            "-fps_mode",
            "passthrough",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgb24",
            "pipe:1",
        ]
        .into_iter()
        .map(OsString::from),
    );
    args
}

/// In-memory source for tests and callers that already hold decoded frames.
#[derive(Debug)]
pub struct InMemorySource {
    meta: VideoMetadata,
    frames: VecDeque<FrameRgb8>,
    closed: bool,
}

impl InMemorySource {
    /// Create a source yielding `frames` in order. The declared frame count is `frames.len()`.
    pub fn new(mut meta: VideoMetadata, frames: Vec<FrameRgb8>) -> FrameshiftResult<Self> {
        if frames.is_empty() {
            return Err(FrameshiftError::open("source contains no decodable frames"));
        }
        if let Some(f) = frames
            .iter()
            .find(|f| f.width != meta.width || f.height != meta.height)
        {
            return Err(FrameshiftError::validation(format!(
                "frame size {}x{} does not match source {}x{}",
                f.width, f.height, meta.width, meta.height
            )));
        }
        meta.frame_count = frames.len() as u64;
        Ok(Self {
            meta,
            frames: frames.into(),
            closed: false,
        })
    }

    /// `true` once [`FrameSource::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl FrameSource for InMemorySource {
    fn metadata(&self) -> &VideoMetadata {
        &self.meta
    }

    fn next_frame(&mut self) -> FrameshiftResult<Option<FrameRgb8>> {
        if self.closed {
            return Ok(None);
        }
        Ok(self.frames.pop_front())
    }

    fn close(&mut self) -> FrameshiftResult<()> {
        self.closed = true;
        self.frames.clear();
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/media/source.rs"]
mod tests;
