use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::config::OptimizeSettings;
use crate::encode::process::{RunOpts, discard_partial, run_tool};
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::orchestrator::{Artifact, diagnostics};

/// Where the optimized copy of `input` is written: `optimized_<name>` next to it.
pub fn optimized_path(input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output.mp4".to_string());
    input.with_file_name(format!("optimized_{name}"))
}

/// `ffmpeg` arguments for the delivery re-encode of `input` into `out`.
pub fn optimize_args(input: &Path, out: &Path, s: &OptimizeSettings) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["-y".into(), "-i".into(), input.as_os_str().to_owned()];
    args.extend(
        [
            "-c:v".to_string(),
            "libx264".to_string(),
            "-preset".to_string(),
            s.preset.clone(),
            "-crf".to_string(),
            s.crf.to_string(),
            "-maxrate".to_string(),
            s.max_rate.clone(),
            "-bufsize".to_string(),
            s.buf_size.clone(),
            "-c:a".to_string(),
            "aac".to_string(),
            "-b:a".to_string(),
            "128k".to_string(),
            "-ar".to_string(),
            s.audio_sample_rate.to_string(),
            "-ac".to_string(),
            s.audio_channels.to_string(),
            "-movflags".to_string(),
            "+faststart".to_string(),
            "-f".to_string(),
            "mp4".to_string(),
        ]
        .map(OsString::from),
    );
    args.push(out.as_os_str().to_owned());
    args
}

/// Re-encode `input` to the delivery bitrate ceiling and audio layout.
///
/// Best-effort: any failure, cancellation included, is logged and the unoptimized `input` is
/// returned. A partially written optimized file never survives.
#[tracing::instrument(skip_all, fields(input = %input.path.display()))]
pub fn optimize(
    input: &Artifact,
    ffmpeg: &Path,
    settings: &OptimizeSettings,
    run: &RunOpts,
) -> Artifact {
    let out = optimized_path(&input.path);
    match try_optimize(input, &out, ffmpeg, settings, run) {
        Ok(artifact) => {
            tracing::info!(
                before = input.size_bytes,
                after = artifact.size_bytes,
                "optimized artifact"
            );
            artifact
        }
        Err(e) => {
            tracing::warn!("optimization failed, keeping unoptimized render: {e}");
            input.clone()
        }
    }
}

fn try_optimize(
    input: &Artifact,
    out: &Path,
    ffmpeg: &Path,
    settings: &OptimizeSettings,
    run: &RunOpts,
) -> ReelResult<Artifact> {
    let args = optimize_args(&input.path, out, settings);
    let output = match run_tool(ffmpeg, &args, run) {
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
            "optimizer exited with {}: {diag}",
            output.status
        )));
    }
    Artifact::from_output(out, &diag)
}

#[cfg(test)]
#[path = "../../tests/unit/render/optimize.rs"]
mod tests;
