use std::ffi::OsString;
use std::path::Path;

use crate::config::ToolPaths;
use crate::encode::process::{RunOpts, run_tool};
use crate::foundation::error::{ReelError, ReelResult};

#[derive(Clone, Debug, PartialEq)]
/// Metadata reported by `ffprobe` for one media file.
pub struct MediaInfo {
    /// Container duration in seconds, when the file declares one.
    pub duration_sec: Option<f64>,
    /// Whether at least one video stream is present.
    pub has_video: bool,
    /// Whether at least one audio stream is present.
    pub has_audio: bool,
}

#[derive(serde::Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
}

#[derive(serde::Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

#[derive(serde::Deserialize)]
struct ProbeOut {
    #[serde(default)]
    streams: Vec<ProbeStream>,
    format: Option<ProbeFormat>,
}

/// Parse `ffprobe -print_format json -show_format -show_streams` output.
pub fn parse_probe_json(bytes: &[u8]) -> ReelResult<MediaInfo> {
    let parsed: ProbeOut = serde_json::from_slice(bytes)
        .map_err(|e| ReelError::probe(format!("ffprobe json parse failed: {e}")))?;

    let duration_sec = parsed
        .format
        .as_ref()
        .and_then(|f| f.duration.as_deref())
        .and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|d| d.is_finite());
    let has_stream = |kind: &str| {
        parsed
            .streams
            .iter()
            .any(|s| s.codec_type.as_deref() == Some(kind))
    };

    Ok(MediaInfo {
        duration_sec,
        has_video: has_stream("video"),
        has_audio: has_stream("audio"),
    })
}

/// Probe a media file's container and stream metadata.
///
/// Spawns one short-lived `ffprobe`. No retry: a failure means the input is missing or corrupt.
pub fn probe_media(path: &Path, tools: &ToolPaths, run: &RunOpts) -> ReelResult<MediaInfo> {
    if !path.is_file() {
        return Err(ReelError::probe(format!(
            "'{}' does not exist or is not a file",
            path.display()
        )));
    }

    let mut args: Vec<OsString> = [
        "-v",
        "error",
        "-print_format",
        "json",
        "-show_format",
        "-show_streams",
    ]
    .into_iter()
    .map(OsString::from)
    .collect();
    args.push(path.as_os_str().to_owned());

    let out = run_tool(&tools.ffprobe, &args, run)
        .map_err(|e| e.into_reel(|m| ReelError::probe(format!("failed to run ffprobe: {m}"))))?;
    if !out.status.success() {
        return Err(ReelError::probe(format!(
            "ffprobe failed for '{}' ({}): {}",
            path.display(),
            out.status,
            out.stderr_text()
        )));
    }
    parse_probe_json(&out.stdout)
}

/// Exact playable duration of `path` in seconds.
///
/// Fails with [`ReelError::Probe`] when the file is unreadable, declares no duration, or the
/// duration is not strictly positive.
#[tracing::instrument(skip(tools, run), fields(path = %path.display()))]
pub fn probe_duration(path: &Path, tools: &ToolPaths, run: &RunOpts) -> ReelResult<f64> {
    let info = probe_media(path, tools, run)?;
    let duration = require_duration(&info, path)?;
    tracing::info!(duration_sec = duration, "probed duration");
    Ok(duration)
}

fn require_duration(info: &MediaInfo, path: &Path) -> ReelResult<f64> {
    match info.duration_sec {
        Some(d) if d > 0.0 => Ok(d),
        Some(d) => Err(ReelError::probe(format!(
            "'{}' reports non-positive duration {d}",
            path.display()
        ))),
        None => Err(ReelError::probe(format!(
            "'{}' has no duration metadata",
            path.display()
        ))),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/media/probe.rs"]
mod tests;
