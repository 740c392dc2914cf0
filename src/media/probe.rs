use std::path::Path;
use std::process::{Command, Stdio};

use crate::foundation::core::{Fps, VideoMetadata};
use crate::foundation::error::{FrameshiftError, FrameshiftResult};

#[derive(serde::Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
    avg_frame_rate: Option<String>,
    nb_frames: Option<String>,
}

#[derive(serde::Deserialize)]
struct ProbeOut {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

/// Read width, height, frame rate and declared frame count of the first video stream.
pub fn probe_video(path: &Path) -> FrameshiftResult<VideoMetadata> {
    if !path.is_file() {
        return Err(FrameshiftError::open(format!(
            "input video '{}' does not exist",
            path.display()
        )));
    }

    let out = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-print_format",
            "json",
            "-show_streams",
        ])
        .arg(path)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| FrameshiftError::open(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(FrameshiftError::open(format!(
            "ffprobe failed for '{}': {}",
            path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    parse_probe_json(&out.stdout)
        .map_err(|e| FrameshiftError::open(format!("'{}': {e}", path.display())))
}

pub(crate) fn parse_probe_json(bytes: &[u8]) -> Result<VideoMetadata, String> {
    let parsed: ProbeOut =
        serde_json::from_slice(bytes).map_err(|e| format!("ffprobe json parse failed: {e}"))?;
    let stream = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| "no video stream found".to_string())?;

    let width = stream.width.filter(|&w| w > 0).ok_or("missing video width")?;
    let height = stream
        .height
        .filter(|&h| h > 0)
        .ok_or("missing video height")?;

    // r_frame_rate is the container's base rate; fall back to the average when it is 0/0.
    let fps = stream
        .r_frame_rate
        .as_deref()
        .and_then(Fps::parse_ratio)
        .or_else(|| stream.avg_frame_rate.as_deref().and_then(Fps::parse_ratio))
        .ok_or("invalid video frame rate")?;

    let frame_count = stream
        .nb_frames
        .as_deref()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0);

    Ok(VideoMetadata {
        fps,
        width,
        height,
        frame_count,
    })
}

/// Return `true` when both `ffmpeg` and `ffprobe` can be invoked from `PATH`.
pub fn ffmpeg_tools_available() -> bool {
    ["ffmpeg", "ffprobe"].iter().all(|tool| {
        Command::new(tool)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    })
}

#[cfg(test)]
#[path = "../../tests/unit/media/probe.rs"]
mod tests;
