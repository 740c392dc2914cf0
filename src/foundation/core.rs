use crate::foundation::error::{FrameshiftError, FrameshiftResult};

/// Absolute 0-based frame index in source temporal order.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32, // must be > 0
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> FrameshiftResult<Self> {
        if den == 0 {
            return Err(FrameshiftError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(FrameshiftError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Parse an ffmpeg-style ratio such as `30000/1001` or a bare integer rate.
    pub fn parse_ratio(s: &str) -> Option<Self> {
        let s = s.trim();
        let (num, den) = match s.split_once('/') {
            Some((a, b)) => (a.trim().parse::<u32>().ok()?, b.trim().parse::<u32>().ok()?),
            None => (s.parse::<u32>().ok()?, 1),
        };
        Self::new(num, den).ok()
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Duration of one frame in seconds.
    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }
}

impl std::fmt::Display for Fps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

/// Source stream properties, read once when the source is opened.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VideoMetadata {
    /// Declared frame rate.
    pub fps: Fps,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Total frame count, `0` when the container does not declare one.
    pub frame_count: u64,
}

/// Tightly packed, row-major RGB8 frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRgb8 {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// `width * height * 3` bytes.
    pub data: Vec<u8>,
}

impl FrameRgb8 {
    /// Wrap a raw buffer, checking that it matches `width * height * 3`.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> FrameshiftResult<Self> {
        if width == 0 || height == 0 {
            return Err(FrameshiftError::validation(
                "frame width/height must be non-zero",
            ));
        }
        let expected = rgb8_len(width, height)?;
        if data.len() != expected {
            return Err(FrameshiftError::validation(format!(
                "frame buffer has {} bytes, expected {expected} for {width}x{height} rgb8",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Frame filled with a single color.
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let n = width as usize * height as usize;
        Self {
            width,
            height,
            data: rgb.repeat(n),
        }
    }

    /// Read one pixel. Panics when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let i = (y as usize * self.width as usize + x as usize) * 3;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    /// `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Move the buffer into an `image` crate buffer without copying.
    pub fn into_image(self) -> FrameshiftResult<image::RgbImage> {
        image::RgbImage::from_raw(self.width, self.height, self.data)
            .ok_or_else(|| FrameshiftError::validation("frame buffer does not match dimensions"))
    }

    /// Take ownership of an `image` crate buffer without copying.
    pub fn from_image(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            data: img.into_raw(),
        }
    }
}

/// Byte length of an RGB8 buffer, guarding against overflow.
pub fn rgb8_len(width: u32, height: u32) -> FrameshiftResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(3))
        .ok_or_else(|| FrameshiftError::validation("frame buffer size overflow"))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
