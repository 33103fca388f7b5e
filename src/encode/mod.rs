//! External tool invocation.

/// Cancellable subprocess runner used for every `ffmpeg`/`ffprobe` call.
pub mod process;
