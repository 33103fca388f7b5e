//! Typed composition graph.
//!
//! [`builder`] assembles stages from a plan, [`ir`] holds the structure, and [`serialize`]
//! lowers it to `ffmpeg` filter syntax at the render boundary.

/// Graph assembly from timing, effects and captions.
pub mod builder;
/// Stage, pad and filter types.
pub mod ir;
/// `-filter_complex` text generation.
pub mod serialize;
