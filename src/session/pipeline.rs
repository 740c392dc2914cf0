use std::path::{Path, PathBuf};

use crate::effects::transform::FrameTransform;
use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{FrameshiftError, FrameshiftResult};
use crate::media::source::{FfmpegFrameSource, FrameSource};
use crate::session::config::PipelineConfig;
use crate::session::mode::{ModeRequest, Route, TransformMode, route};
use crate::staging::area::StagingArea;
use crate::upscale::external::ExternalUpscaler;
use crate::upscale::{
    ModelSelection, UpscaleFailure, UpscaleObserver, UpscalePath, UpscaleReport, UpscaleSelector,
};

/// Orchestrator lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineState {
    /// Not started.
    Idle,
    /// Opening the input and reading its metadata.
    Decoding,
    /// Streaming frames through an in-process transform.
    Transforming,
    /// Writing every decoded frame to the staging area.
    Staging,
    /// Running the primary upscaler over the staged set.
    ExternalUpscale,
    /// Reprocessing the staged set on the CPU.
    Fallback,
    /// Reading upscaled frames back in index order.
    Restitching,
    /// Finalizing the output container.
    Encoding,
    /// Finished successfully.
    Done,
    /// Aborted; see [`PipelineStatus::Failure`].
    Failed,
}

/// Final status of a run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PipelineStatus {
    /// Output written and staging removed.
    Success,
    /// The run aborted.
    Failure {
        /// Error kind, e.g. `"OpenError"`.
        kind: &'static str,
        /// Human-readable reason.
        reason: String,
    },
}

/// Outcome of [`Pipeline::run`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipelineResult {
    /// Frames delivered to the sink (partial on failure).
    pub frames_processed: u64,
    /// Requested output location.
    pub output_path: PathBuf,
    /// Success or failure reason.
    pub status: PipelineStatus,
    /// Mode that ran, when routing got that far.
    pub mode: Option<TransformMode>,
    /// Which upscaler produced the frames, for staged runs.
    pub upscale_path: Option<UpscalePath>,
}

impl PipelineResult {
    /// `true` when the run finished.
    pub fn is_success(&self) -> bool {
        self.status == PipelineStatus::Success
    }
}

/// Progress milestone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Progress {
    /// Phase the count refers to.
    pub phase: PipelineState,
    /// Frames finished in this phase.
    pub frames_done: u64,
    /// Expected total; 0 when the container does not report one.
    pub frames_total: u64,
}

/// Receives progress milestones and state changes.
pub trait ProgressObserver {
    /// Called every `progress_every` frames within a phase.
    fn on_progress(&mut self, progress: Progress);
    /// Called on every state transition.
    fn on_state(&mut self, _state: PipelineState) {}
}

/// Frame-sequential video transformation run.
///
/// One pipeline owns its staging area exclusively; distinct runs must use distinct inputs or
/// staging roots.
pub struct Pipeline {
    cfg: PipelineConfig,
    observer: Option<Box<dyn ProgressObserver>>,
    state: PipelineState,
    frames_done: u64,
}

impl Pipeline {
    /// Validate `cfg` and build an idle pipeline.
    pub fn new(cfg: PipelineConfig) -> FrameshiftResult<Self> {
        cfg.validate()?;
        Ok(Self {
            cfg,
            observer: None,
            state: PipelineState::Idle,
            frames_done: 0,
        })
    }

    /// Attach a progress observer.
    pub fn with_observer(mut self, observer: Box<dyn ProgressObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Current lifecycle state.
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Active configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.cfg
    }

    /// Transform `input` into `output` under `mode`.
    ///
    /// Never panics on I/O failure; every error is folded into [`PipelineStatus::Failure`].
    #[tracing::instrument(skip(self, input, output), fields(input = %input.display(), output = %output.display()))]
    pub fn run(&mut self, input: &Path, output: &Path, mode: &str) -> PipelineResult {
        self.frames_done = 0;
        let route = route(&ModeRequest::parse(mode), &self.cfg);
        tracing::info!(mode = ?route.mode(), "starting run");

        let result = self.execute(input, output, route);
        let (status, upscale_path) = match result {
            Ok(report) => {
                self.transition(PipelineState::Done);
                tracing::info!(
                    frames = self.frames_done,
                    output = %output.display(),
                    "run finished"
                );
                (PipelineStatus::Success, report.map(|r| r.path))
            }
            Err(err) => {
                self.transition(PipelineState::Failed);
                tracing::error!(kind = err.kind(), error = %err, "run failed");
                (
                    PipelineStatus::Failure {
                        kind: err.kind(),
                        reason: err.to_string(),
                    },
                    None,
                )
            }
        };

        PipelineResult {
            frames_processed: self.frames_done,
            output_path: output.to_path_buf(),
            status,
            mode: Some(route.mode()),
            upscale_path,
        }
    }

    fn execute(
        &mut self,
        input: &Path,
        output: &Path,
        route: Route,
    ) -> FrameshiftResult<Option<UpscaleReport>> {
        self.transition(PipelineState::Decoding);
        // Opened before the sink so an unreadable input never creates an output file.
        let mut source = FfmpegFrameSource::open(input)?;
        let mut sink = FfmpegSink::new(FfmpegSinkOpts {
            out_path: output.to_path_buf(),
            overwrite: self.cfg.overwrite,
            crf: self.cfg.crf,
        });

        match route {
            Route::InProcess { transform, .. } => {
                self.stream_in_process(&mut source, transform, &mut sink)?;
                Ok(None)
            }
            Route::Staged { selection, .. } => {
                let selector = UpscaleSelector::external_then_fallback(ExternalUpscaler::new(
                    &self.cfg.upscaler_bin,
                ));
                let mut staging = StagingArea::for_video(input, self.cfg.staged_image_format);
                let report = self.stage_and_upscale(
                    &mut source,
                    &mut staging,
                    &selector,
                    selection,
                    &mut sink,
                )?;
                Ok(Some(report))
            }
        }
    }

    /// Decode, transform and encode one frame at a time.
    ///
    /// Returns the number of frames delivered to `sink`.
    pub fn stream_in_process(
        &mut self,
        source: &mut dyn FrameSource,
        transform: FrameTransform,
        sink: &mut dyn FrameSink,
    ) -> FrameshiftResult<u64> {
        let result = self.stream_in_process_inner(source, transform, sink);
        if result.is_err() {
            let _ = source.close();
        }
        result
    }

    fn stream_in_process_inner(
        &mut self,
        source: &mut dyn FrameSource,
        transform: FrameTransform,
        sink: &mut dyn FrameSink,
    ) -> FrameshiftResult<u64> {
        let meta = *source.metadata();
        let (width, height) = transform.output_size(meta.width, meta.height);

        self.transition(PipelineState::Transforming);
        sink.begin(SinkConfig {
            width,
            height,
            fps: meta.fps,
        })?;

        let mut idx = 0u64;
        while let Some(frame) = source.next_frame()? {
            let out = transform.apply(frame)?;
            sink.push_frame(FrameIndex(idx), &out)?;
            idx += 1;
            self.frames_done = idx;
            self.report(PipelineState::Transforming, idx, meta.frame_count);
        }
        source.close()?;

        self.transition(PipelineState::Encoding);
        sink.end()?;
        Ok(idx)
    }

    /// Stage every frame, upscale the staged set, then encode the outputs in index order.
    ///
    /// `staging` is cleaned up whether or not the run succeeds.
    pub fn stage_and_upscale(
        &mut self,
        source: &mut dyn FrameSource,
        staging: &mut StagingArea,
        selector: &UpscaleSelector,
        selection: ModelSelection,
        sink: &mut dyn FrameSink,
    ) -> FrameshiftResult<UpscaleReport> {
        let result = self.stage_and_upscale_inner(source, staging, selector, selection, sink);
        if result.is_err() {
            let _ = source.close();
        }

        let cleanup = staging.cleanup();
        tracing::debug!(root = %staging.root().display(), ok = cleanup.is_ok(), "staging cleanup");
        let report = result?;
        cleanup?;
        Ok(report)
    }

    fn stage_and_upscale_inner(
        &mut self,
        source: &mut dyn FrameSource,
        staging: &mut StagingArea,
        selector: &UpscaleSelector,
        selection: ModelSelection,
        sink: &mut dyn FrameSink,
    ) -> FrameshiftResult<UpscaleReport> {
        let meta = *source.metadata();

        self.transition(PipelineState::Staging);
        staging.create_input_dir()?;
        staging.create_output_dir()?;
        let mut staged = 0u64;
        while let Some(frame) = source.next_frame()? {
            staging.stage_frame(FrameIndex(staged), &frame)?;
            staged += 1;
            self.report(PipelineState::Staging, staged, meta.frame_count);
        }
        source.close()?;
        if staged == 0 {
            return Err(FrameshiftError::open("input produced no frames"));
        }

        self.transition(PipelineState::ExternalUpscale);
        let report = selector.run(
            staging,
            selection,
            &mut StagedProgress {
                pipeline: &mut *self,
                total: staged,
            },
        )?;

        self.transition(PipelineState::Restitching);
        let width = scaled(meta.width, selection.scale)?;
        let height = scaled(meta.height, selection.scale)?;
        sink.begin(SinkConfig {
            width,
            height,
            fps: meta.fps,
        })?;
        for idx in staging.indices() {
            let frame = staging.read_staged_output(idx)?;
            sink.push_frame(idx, &frame)?;
            self.frames_done = idx.0 + 1;
            self.report(PipelineState::Restitching, idx.0 + 1, staged);
        }

        self.transition(PipelineState::Encoding);
        sink.end()?;
        Ok(report)
    }

    fn transition(&mut self, next: PipelineState) {
        tracing::debug!(from = ?self.state, to = ?next, "pipeline state");
        self.state = next;
        if let Some(observer) = self.observer.as_mut() {
            observer.on_state(next);
        }
    }

    fn report(&mut self, phase: PipelineState, frames_done: u64, frames_total: u64) {
        if !frames_done.is_multiple_of(self.cfg.progress_every) {
            return;
        }
        tracing::info!(?phase, frames_done, frames_total, "progress");
        if let Some(observer) = self.observer.as_mut() {
            observer.on_progress(Progress {
                phase,
                frames_done,
                frames_total,
            });
        }
    }
}

/// Forwards upscaler progress into the pipeline's state and milestones.
struct StagedProgress<'a> {
    pipeline: &'a mut Pipeline,
    total: u64,
}

impl UpscaleObserver for StagedProgress<'_> {
    fn on_fallback(&mut self, _failure: &UpscaleFailure) {
        self.pipeline.transition(PipelineState::Fallback);
    }

    fn on_frames(&mut self, path: UpscalePath, frames_done: u64) {
        let phase = match path {
            UpscalePath::External => PipelineState::ExternalUpscale,
            UpscalePath::Fallback => PipelineState::Fallback,
        };
        self.pipeline.report(phase, frames_done, self.total);
    }
}

fn scaled(dim: u32, scale: u32) -> FrameshiftResult<u32> {
    dim.checked_mul(scale)
        .ok_or_else(|| FrameshiftError::validation(format!("{dim}x{scale} overflows u32")))
}

#[cfg(test)]
#[path = "../../tests/unit/session/pipeline.rs"]
mod tests;
