//! lorereel assembles short vertical videos from still images and a narration track.
//!
//! A request flows through one sequential pipeline:
//!
//! - Probe the narration length with `ffprobe`
//! - Plan per-image windows, assign motion effects, schedule captions
//! - Build a typed [`CompositionGraph`] and lower it to `ffmpeg` filter syntax
//! - Render with a single `ffmpeg` process, then optionally re-encode for delivery
//!
//! [`compose_video`] runs all of it; the stages are public for dry runs and tests.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Composition configuration and TOML loading.
pub mod config;
/// External tool invocation.
pub mod encode;
/// Composition graph construction and serialization.
pub mod graph;
/// Media probing.
pub mod media;
/// End-to-end composition.
pub mod pipeline;
/// Timing, effect and caption planning.
pub mod plan;
/// Rendering and delivery optimization.
pub mod render;

pub use crate::foundation::cancel::CancelToken;
pub use crate::foundation::core::{Canvas, Fps, TimeWindow};
pub use crate::foundation::error::{ErrorKind, ReelError, ReelResult};

pub use crate::config::ComposeConfig;
pub use crate::graph::builder::build_graph;
pub use crate::graph::ir::CompositionGraph;
pub use crate::graph::serialize::to_filter_complex;
pub use crate::media::probe::{MediaInfo, probe_duration, probe_media};
pub use crate::pipeline::{
    ComposeRequest, MediaAsset, RenderPlan, artifact_file_name, cleanup_artifact, compose_video,
    plan_render,
};
pub use crate::plan::captions::{CaptionSchedule, extract_captions};
pub use crate::plan::effects::{MotionEffect, assign_effects};
pub use crate::plan::timing::TimingPlan;
pub use crate::render::optimize::optimize;
pub use crate::render::orchestrator::{Artifact, render, render_args};
