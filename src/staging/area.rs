use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::core::{FrameIndex, FrameRgb8};
use crate::foundation::error::{FrameshiftError, FrameshiftResult};

/// Zero-padded width of staged frame file names.
pub const INDEX_WIDTH: usize = 8;

/// Image format used for staged frames.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StagedFormat {
    /// Lossless PNG.
    #[default]
    Png,
    /// JPEG (smaller, lossy).
    Jpg,
}

impl StagedFormat {
    /// File extension, also passed to the external tool as its output format.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpg => "jpg",
        }
    }

    fn image_format(self) -> image::ImageFormat {
        match self {
            Self::Png => image::ImageFormat::Png,
            Self::Jpg => image::ImageFormat::Jpeg,
        }
    }
}

/// Pair of numbered-frame directories owned by one pipeline run.
///
/// Input frames are staged with contiguous indices starting at 0. Every staged index must have a
/// matching output file before restitching; [`StagingArea::verify_outputs`] checks that in one
/// place. Both directories live under a single root which is removed on [`cleanup`] and, as a
/// last resort, on drop.
///
/// [`cleanup`]: StagingArea::cleanup
#[derive(Debug)]
pub struct StagingArea {
    root: PathBuf,
    input_dir: PathBuf,
    output_dir: PathBuf,
    format: StagedFormat,
    staged: u64,
    frame_size: Option<(u32, u32)>,
    removed: bool,
}

impl StagingArea {
    /// Plan a staging root next to `video`. Nothing is created until `create_*_dir` is called.
    ///
    /// The directory name carries the process id and a timestamp so concurrent runs on the same
    /// input never share a path.
    pub fn for_video(video: &Path, format: StagedFormat) -> Self {
        let parent = video
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let stem = video
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "video".to_string());
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        let root = parent.join(format!(
            ".frameshift_{stem}_{}_{nanos}",
            std::process::id()
        ));
        Self::at(root, format)
    }

    /// Use an explicit root directory.
    pub fn at(root: impl Into<PathBuf>, format: StagedFormat) -> Self {
        let root = root.into();
        Self {
            input_dir: root.join("in"),
            output_dir: root.join("out"),
            root,
            format,
            staged: 0,
            frame_size: None,
            removed: false,
        }
    }

    /// Root directory holding both staging directories.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory of staged input frames.
    pub fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    /// Directory the upscalers write into.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Staged image format.
    pub fn format(&self) -> StagedFormat {
        self.format
    }

    /// Number of frames staged so far; indices `0..staged_count()` exist.
    pub fn staged_count(&self) -> u64 {
        self.staged
    }

    /// Size shared by every staged input frame, once one has been staged.
    pub fn frame_size(&self) -> Option<(u32, u32)> {
        self.frame_size
    }

    /// Iterate staged indices in order.
    pub fn indices(&self) -> impl Iterator<Item = FrameIndex> + use<> {
        (0..self.staged).map(FrameIndex)
    }

    /// Create the input directory.
    pub fn create_input_dir(&mut self) -> FrameshiftResult<()> {
        create_dir(&self.input_dir)?;
        self.removed = false;
        Ok(())
    }

    /// Create the output directory.
    pub fn create_output_dir(&mut self) -> FrameshiftResult<()> {
        create_dir(&self.output_dir)?;
        self.removed = false;
        Ok(())
    }

    /// Deterministic file name for an index, e.g. `00000042.png`.
    pub fn file_name(&self, idx: FrameIndex) -> String {
        format!("{:0width$}.{}", idx.0, self.format.extension(), width = INDEX_WIDTH)
    }

    /// Path of a staged input frame.
    pub fn input_path(&self, idx: FrameIndex) -> PathBuf {
        self.input_dir.join(self.file_name(idx))
    }

    /// Path of an upscaled output frame.
    pub fn output_path(&self, idx: FrameIndex) -> PathBuf {
        self.output_dir.join(self.file_name(idx))
    }

    /// Write the next input frame. Indices must arrive contiguously from 0 and every frame must
    /// have the same size.
    pub fn stage_frame(&mut self, idx: FrameIndex, frame: &FrameRgb8) -> FrameshiftResult<()> {
        if idx.0 != self.staged {
            return Err(FrameshiftError::validation(format!(
                "staged frames must be contiguous: expected index {}, got {}",
                self.staged, idx.0
            )));
        }
        if let Some((w, h)) = self.frame_size
            && frame.dimensions() != (w, h)
        {
            return Err(FrameshiftError::validation(format!(
                "staged frame {} is {}x{}, expected {w}x{h}",
                idx.0, frame.width, frame.height
            )));
        }
        write_frame(&self.input_path(idx), frame, self.format)?;
        self.frame_size = Some(frame.dimensions());
        self.staged += 1;
        Ok(())
    }

    /// Write an output frame for an already-staged index.
    pub fn write_output(&self, idx: FrameIndex, frame: &FrameRgb8) -> FrameshiftResult<()> {
        if idx.0 >= self.staged {
            return Err(FrameshiftError::validation(format!(
                "output index {} has no staged input (staged {})",
                idx.0, self.staged
            )));
        }
        write_frame(&self.output_path(idx), frame, self.format)
    }

    /// Read a staged input frame back.
    pub fn read_staged_input(&self, idx: FrameIndex) -> FrameshiftResult<FrameRgb8> {
        read_frame(&self.input_path(idx), idx)
    }

    /// Read an upscaled output frame. Absent files are [`FrameshiftError::MissingFrame`].
    pub fn read_staged_output(&self, idx: FrameIndex) -> FrameshiftResult<FrameRgb8> {
        read_frame(&self.output_path(idx), idx)
    }

    /// Decode one output frame and check it is the staged size times `scale`.
    ///
    /// Absent files are [`FrameshiftError::MissingFrame`], undecodable ones
    /// [`FrameshiftError::StagingIo`], wrong sizes [`FrameshiftError::Validation`].
    pub fn check_output(&self, idx: FrameIndex, scale: u32) -> FrameshiftResult<()> {
        let (w, h) = self
            .frame_size
            .ok_or_else(|| FrameshiftError::validation("no frames have been staged"))?;
        let frame = self.read_staged_output(idx)?;
        let expected = (w.saturating_mul(scale), h.saturating_mul(scale));
        if frame.dimensions() != expected {
            return Err(FrameshiftError::validation(format!(
                "output frame {} is {}x{}, expected {}x{}",
                idx.0, frame.width, frame.height, expected.0, expected.1
            )));
        }
        Ok(())
    }

    /// First staged index without an output file, if any.
    pub fn first_missing_output(&self) -> Option<FrameIndex> {
        self.indices().find(|&idx| !self.output_path(idx).is_file())
    }

    /// Check that every staged input index has an output file.
    pub fn verify_outputs(&self) -> FrameshiftResult<()> {
        match self.first_missing_output() {
            Some(idx) => Err(FrameshiftError::MissingFrame { index: idx.0 }),
            None => Ok(()),
        }
    }

    /// Remove both directories recursively. Safe to call more than once.
    pub fn cleanup(&mut self) -> FrameshiftResult<()> {
        if self.removed {
            return Ok(());
        }
        if self.root.exists() {
            std::fs::remove_dir_all(&self.root)
                .with_context(|| format!("remove staging dir '{}'", self.root.display()))?;
        }
        self.removed = true;
        tracing::debug!(root = %self.root.display(), "staging cleaned up");
        Ok(())
    }
}

impl Drop for StagingArea {
    fn drop(&mut self) {
        if !self.removed {
            let _ = std::fs::remove_dir_all(&self.root);
        }
    }
}

fn create_dir(path: &Path) -> FrameshiftResult<()> {
    std::fs::create_dir_all(path).map_err(|e| {
        FrameshiftError::staging_io(format!("create staging dir '{}': {e}", path.display()))
    })
}

fn write_frame(path: &Path, frame: &FrameRgb8, format: StagedFormat) -> FrameshiftResult<()> {
    image::save_buffer_with_format(
        path,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgb8,
        format.image_format(),
    )
    .map_err(|e| FrameshiftError::staging_io(format!("write '{}': {e}", path.display())))
}

fn read_frame(path: &Path, idx: FrameIndex) -> FrameshiftResult<FrameRgb8> {
    if !path.is_file() {
        return Err(FrameshiftError::MissingFrame { index: idx.0 });
    }
    let img = image::open(path)
        .map_err(|e| FrameshiftError::staging_io(format!("read '{}': {e}", path.display())))?;
    Ok(FrameRgb8::from_image(img.to_rgb8()))
}

#[cfg(test)]
#[path = "../../tests/unit/staging/area.rs"]
mod tests;
