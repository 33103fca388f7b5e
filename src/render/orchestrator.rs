use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::config::ComposeConfig;
use crate::encode::process::{RunOpts, ToolOutput, discard_partial, ensure_parent_dir, run_tool};
use crate::foundation::error::{ReelError, ReelResult};
use crate::graph::ir::{CompositionGraph, Pad};
use crate::graph::serialize::{map_spec, secs, to_filter_complex};
use crate::media::probe::probe_media;

/// A rendered media file that exists and is non-empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifact {
    /// Location of the file.
    pub path: PathBuf,
    /// Size on disk when it was checked.
    pub size_bytes: u64,
}

impl Artifact {
    /// Check that `path` holds a non-empty file left behind by a tool that exited zero.
    ///
    /// An empty file is removed before the error is returned.
    pub fn from_output(path: &Path, diagnostics: &str) -> ReelResult<Self> {
        let meta = match std::fs::metadata(path) {
            Ok(meta) if meta.is_file() => meta,
            _ => {
                return Err(ReelError::render(format!(
                    "ffmpeg exited 0 but did not create '{}'{}",
                    path.display(),
                    suffix(diagnostics)
                )));
            }
        };
        if meta.len() == 0 {
            discard_partial(path);
            return Err(ReelError::render(format!(
                "ffmpeg exited 0 but '{}' is empty{}",
                path.display(),
                suffix(diagnostics)
            )));
        }
        Ok(Self {
            path: path.to_path_buf(),
            size_bytes: meta.len(),
        })
    }
}

fn suffix(diagnostics: &str) -> String {
    if diagnostics.is_empty() {
        String::new()
    } else {
        format!(": {diagnostics}")
    }
}

/// Captured stderr followed by stdout, exactly as the tool printed them.
pub(crate) fn diagnostics(out: &ToolOutput) -> String {
    let stderr = out.stderr_text();
    let stdout = out.stdout_text();
    match (stderr.is_empty(), stdout.is_empty()) {
        (_, true) => stderr,
        (true, false) => stdout,
        (false, false) => format!("{stderr}\n{stdout}"),
    }
}

fn push<S: Into<OsString>>(args: &mut Vec<OsString>, items: impl IntoIterator<Item = S>) {
    args.extend(items.into_iter().map(Into::into));
}

/// Full `ffmpeg` argument vector for rendering `graph` to `out`.
///
/// Inputs `0..n` are the images, each looped at the output frame rate and limited to the
/// graph's source clip length; input `n` is the narration. Encoding parameters come from `cfg.encode` and `cfg.video`.
pub fn render_args(
    graph: &CompositionGraph,
    images: &[PathBuf],
    audio: &Path,
    out: &Path,
    cfg: &ComposeConfig,
) -> ReelResult<Vec<OsString>> {
    if images.len() != graph.image_inputs() {
        return Err(ReelError::validation(format!(
            "graph expects {} images but {} were supplied",
            graph.image_inputs(),
            images.len()
        )));
    }
    let rate = cfg.fps()?.to_ffmpeg_rate();
    let clip = secs(graph.source_clip_duration());

    let mut args: Vec<OsString> = Vec::new();
    push(&mut args, ["-y", "-loglevel", "warning"]);
    for image in images {
        push(
            &mut args,
            ["-loop", "1", "-framerate", rate.as_str(), "-t", clip.as_str(), "-i"],
        );
        args.push(image.as_os_str().to_owned());
    }
    args.push("-i".into());
    args.push(audio.as_os_str().to_owned());

    let enc = &cfg.encode;
    push(
        &mut args,
        [
            "-filter_complex".to_string(),
            to_filter_complex(graph),
            "-map".to_string(),
            map_spec(&Pad::link(graph.video_output())),
            "-map".to_string(),
            map_spec(graph.audio_output()),
            "-c:v".to_string(),
            enc.video_codec.clone(),
            "-c:a".to_string(),
            enc.audio_codec.clone(),
            "-b:v".to_string(),
            enc.video_bitrate.clone(),
            "-b:a".to_string(),
            enc.audio_bitrate.clone(),
            "-r".to_string(),
            rate.clone(),
            "-pix_fmt".to_string(),
            enc.pixel_format.clone(),
            "-movflags".to_string(),
            "+faststart".to_string(),
            "-shortest".to_string(),
        ],
    );
    args.push(out.as_os_str().to_owned());
    Ok(args)
}

/// Render `graph` with one `ffmpeg` invocation.
///
/// No retry. Any failure (spawn, non-zero exit, cancellation, deadline, missing or empty
/// output) removes whatever was written to `out`. Engine diagnostics are carried verbatim in
/// the returned [`ReelError::Render`].
#[tracing::instrument(skip_all, fields(out = %out.display(), images = images.len()))]
pub fn render(
    graph: &CompositionGraph,
    images: &[PathBuf],
    audio: &Path,
    out: &Path,
    cfg: &ComposeConfig,
    run: &RunOpts,
) -> ReelResult<Artifact> {
    let args = render_args(graph, images, audio, out, cfg)?;
    ensure_parent_dir(out)?;

    tracing::info!(stages = graph.stages().len(), "rendering");
    let output = match run_tool(&cfg.tools.ffmpeg, &args, run) {
        Ok(output) => output,
        Err(failure) => {
            discard_partial(out);
            return Err(failure.into_reel(ReelError::render));
        }
    };

    let diag = diagnostics(&output);
    if !output.status.success() {
        discard_partial(out);
        return Err(ReelError::render(format!(
            "ffmpeg exited with {}{}",
            output.status,
            suffix(&diag)
        )));
    }
    if !diag.is_empty() {
        tracing::warn!(diagnostics = %diag, "ffmpeg reported warnings");
    }

    let artifact = Artifact::from_output(out, &diag)?;
    verify_artifact(&artifact, cfg, run);
    tracing::info!(bytes = artifact.size_bytes, "render complete");
    Ok(artifact)
}

/// Probe the rendered file and log what it contains. Never fails the render.
fn verify_artifact(artifact: &Artifact, cfg: &ComposeConfig, run: &RunOpts) {
    match probe_media(&artifact.path, &cfg.tools, run) {
        Ok(info) => {
            if !info.has_video {
                tracing::warn!(
                    path = %artifact.path.display(),
                    "rendered file has no video stream"
                );
            }
            tracing::debug!(
                duration_sec = ?info.duration_sec,
                has_audio = info.has_audio,
                "verified rendered file"
            );
        }
        Err(e) => tracing::warn!("could not verify rendered file: {e}"),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/orchestrator.rs"]
mod tests;
