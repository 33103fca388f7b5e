//! End-to-end composition: probe, plan, build, render, optimize.
//!
//! Every value here is request-scoped. Concurrent requests are independent as long as their
//! artifacts land on distinct paths, which [`artifact_file_name`] arranges for distinct
//! narration files.

use std::path::{Path, PathBuf};

use sha2::Digest as _;

use crate::config::ComposeConfig;
use crate::encode::process::{RunOpts, discard_partial};
use crate::foundation::cancel::CancelToken;
use crate::foundation::error::{ReelError, ReelResult};
use crate::graph::builder::build_graph;
use crate::graph::ir::CompositionGraph;
use crate::media::probe::probe_duration;
use crate::plan::captions::{CaptionSchedule, extract_captions};
use crate::plan::effects::{MotionEffect, assign_effects};
use crate::plan::timing::TimingPlan;
use crate::render::optimize::optimize;
use crate::render::orchestrator::{Artifact, render};

/// Ordered images plus the narration they are timed against.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaAsset {
    /// Still images in display order.
    pub images: Vec<PathBuf>,
    /// Narration audio track.
    pub audio: PathBuf,
}

impl MediaAsset {
    /// Reject asset sets the pipeline cannot compose.
    ///
    /// Requires at least `min_images` images and every referenced file to exist.
    pub fn validate(&self, min_images: usize) -> ReelResult<()> {
        if self.images.len() < min_images {
            return Err(ReelError::validation(format!(
                "need at least {min_images} images, got {}",
                self.images.len()
            )));
        }
        for path in self.images.iter().chain(std::iter::once(&self.audio)) {
            if !path.is_file() {
                return Err(ReelError::validation(format!(
                    "input '{}' does not exist or is not a file",
                    path.display()
                )));
            }
        }
        Ok(())
    }
}

/// One composition request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComposeRequest {
    /// Human title, used for the artifact file name.
    pub title: String,
    /// Narration script; captions are extracted from it.
    pub script: String,
    /// Images and narration.
    pub media: MediaAsset,
}

/// Everything decided before the engine runs.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderPlan {
    /// Per-image windows and transition offsets.
    pub timing: TimingPlan,
    /// Motion effect per image.
    pub effects: Vec<MotionEffect>,
    /// Caption overlays, windowed over the narration length.
    pub captions: CaptionSchedule,
    /// Graph handed to the renderer.
    pub graph: CompositionGraph,
}

/// Plan a render for `req` given an already probed narration length.
///
/// Pure: no files are read and no processes are spawned.
pub fn plan_render(
    req: &ComposeRequest,
    narration_sec: f64,
    cfg: &ComposeConfig,
) -> ReelResult<RenderPlan> {
    let count = req.media.images.len();
    let timing = TimingPlan::plan(narration_sec, count, &cfg.timing)?;
    let effects = assign_effects(count);
    let phrases = extract_captions(&req.script, &cfg.captions);
    let captions = CaptionSchedule::build(phrases, narration_sec)?;
    let graph = build_graph(count, &timing, &effects, &captions, cfg)?;
    Ok(RenderPlan {
        timing,
        effects,
        captions,
        graph,
    })
}

/// Compose `req` into a finished video in the scratch directory.
///
/// Fails fast on every stage except the optimizer. When `cancel` fires, the in-flight tool is
/// killed, every file this request wrote is removed, and [`ReelError::Cancelled`] is returned.
#[tracing::instrument(skip_all, fields(title = %req.title, images = req.media.images.len()))]
pub fn compose_video(
    req: &ComposeRequest,
    cfg: &ComposeConfig,
    cancel: &CancelToken,
) -> ReelResult<Artifact> {
    cfg.validate()?;
    req.media.validate(cfg.timing.min_images)?;
    let run = RunOpts::new(cancel.clone(), cfg.tools.timeout_sec)?;

    let narration_sec = probe_duration(&req.media.audio, &cfg.tools, &run)?;
    let plan = plan_render(req, narration_sec, cfg)?;
    tracing::info!(
        per_image_sec = plan.timing.per_image_duration(),
        captions = plan.captions.len(),
        "planned composition"
    );

    let out = cfg
        .ensure_scratch_dir()?
        .join(artifact_file_name(&req.title, &req.media.audio));
    let rendered = render(
        &plan.graph,
        &req.media.images,
        &req.media.audio,
        &out,
        cfg,
        &run,
    )?;
    abort_if_cancelled(cancel, &[&rendered.path])?;

    if !cfg.optimize.enabled {
        return Ok(rendered);
    }
    let delivered = optimize(&rendered, &cfg.tools.ffmpeg, &cfg.optimize, &run);
    abort_if_cancelled(cancel, &[&rendered.path, &delivered.path])?;
    if delivered.path != rendered.path {
        cleanup_artifact(&rendered.path);
    }
    tracing::info!(path = %delivered.path.display(), bytes = delivered.size_bytes, "video ready");
    Ok(delivered)
}

fn abort_if_cancelled(cancel: &CancelToken, written: &[&Path]) -> ReelResult<()> {
    if !cancel.is_cancelled() {
        return Ok(());
    }
    for path in written {
        discard_partial(path);
    }
    Err(ReelError::cancelled("composition request was cancelled"))
}

/// File name for a request's artifact: `video_<safe title>_<tag>.mp4`.
///
/// The title keeps alphanumerics, spaces, `-` and `_`, loses trailing whitespace, and has its
/// spaces turned into underscores. `tag` is a stable four-digit hash of the narration path, so
/// the same inputs always map to the same name.
pub fn artifact_file_name(title: &str, audio: &Path) -> String {
    let kept: String = title
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect();
    let mut safe = kept.trim_end().replace(' ', "_");
    if safe.is_empty() {
        safe.push_str("untitled");
    }

    let digest = sha2::Sha256::digest(audio.to_string_lossy().as_bytes());
    let tag = u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]) % 10_000;
    format!("video_{safe}_{tag:04}.mp4")
}

/// Remove a delivered artifact once downstream collaborators are done with it.
///
/// Failures are logged, never returned.
pub fn cleanup_artifact(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => tracing::info!(path = %path.display(), "cleaned up video"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(path = %path.display(), "failed to clean up video: {e}"),
    }
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
