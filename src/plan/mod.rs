//! Pure planning steps run before any graph is built.
//!
//! Nothing here touches the filesystem or spawns processes.

/// Caption extraction and scheduling.
pub mod captions;
/// Motion effect assignment.
pub mod effects;
/// Per-image timing windows and transition offsets.
pub mod timing;
