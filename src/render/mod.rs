//! Rendering through the system `ffmpeg`.

/// Best-effort delivery re-encode.
pub mod optimize;
/// Main render invocation and output checks.
pub mod orchestrator;
