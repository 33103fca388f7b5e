use crate::config::ComposeConfig;
use crate::foundation::error::{ReelError, ReelResult};
use crate::graph::ir::{
    CompositionGraph, FadeDirection, Filter, Pad, Stage, StageKind, TextStyle, TransitionStyle,
    VIDEO_OUT,
};
use crate::plan::captions::CaptionSchedule;
use crate::plan::effects::MotionEffect;
use crate::plan::timing::TimingPlan;

/// Build the composition graph for one request.
///
/// Stages, in order: one motion stage per image; either a single boundary-fade stage (one
/// image) or `n - 1` cross-fade stages; one color grade; one overlay per caption. The last
/// stage is relabeled [`VIDEO_OUT`]. Audio is the raw input after the images.
///
/// Re-validates the timing invariants and fails with [`ReelError::Graph`] instead of emitting
/// a malformed graph.
#[tracing::instrument(skip_all, fields(images = image_count, captions = captions.len()))]
pub fn build_graph(
    image_count: usize,
    plan: &TimingPlan,
    effects: &[MotionEffect],
    captions: &CaptionSchedule,
    cfg: &ComposeConfig,
) -> ReelResult<CompositionGraph> {
    if image_count == 0 {
        return Err(ReelError::graph("composition graph needs at least one image"));
    }
    if plan.image_count() != image_count {
        return Err(ReelError::graph(format!(
            "timing plan covers {} images but {image_count} were supplied",
            plan.image_count()
        )));
    }
    if effects.len() != image_count {
        return Err(ReelError::graph(format!(
            "{} effect assignments for {image_count} images",
            effects.len()
        )));
    }

    let canvas = cfg.canvas()?;
    let fps = cfg.fps()?;
    let per_image = plan.per_image_duration();
    let motion_frames = fps.secs_to_frames_floor(per_image);

    let mut stages = Vec::with_capacity(image_count * 2 + captions.len() + 1);

    for (i, effect) in effects.iter().enumerate() {
        stages.push(Stage {
            kind: StageKind::ImageMotion { image: i },
            inputs: vec![Pad::video(i)],
            filters: vec![
                Filter::ScaleCover {
                    size: canvas.scaled(effect.overscan()),
                },
                Filter::CenterCrop {
                    size: effect.crop(canvas),
                },
                Filter::ZoomPan {
                    motion: effect.motion(motion_frames),
                    size: canvas,
                    fps,
                },
                Filter::ResetTimestamps,
            ],
            output: image_label(i),
        });
    }

    let mut current = image_label(0);
    if image_count == 1 {
        let fade = cfg.timing.single_fade_sec;
        let fade_out_start = per_image - fade;
        if fade_out_start < 0.0 {
            return Err(ReelError::graph(format!(
                "fade-out would start at {fade_out_start:.3}s for a {per_image:.3}s clip"
            )));
        }
        stages.push(Stage {
            kind: StageKind::BoundaryFade,
            inputs: vec![Pad::link(&current)],
            filters: vec![
                Filter::Fade {
                    direction: FadeDirection::In,
                    start: 0.0,
                    duration: fade,
                },
                Filter::Fade {
                    direction: FadeDirection::Out,
                    start: fade_out_start,
                    duration: fade,
                },
            ],
            output: "faded".to_string(),
        });
        current = "faded".to_string();
    } else {
        let mut prev_offset = 0.0;
        for i in 1..image_count {
            let offset = plan.transition_offset(i);
            if offset.is_nan() || offset <= prev_offset {
                return Err(ReelError::graph(format!(
                    "transition {i} offset {offset:.3}s is not after {prev_offset:.3}s; \
                     timing feasibility check was bypassed"
                )));
            }
            prev_offset = offset;

            let output = format!("xf{i}");
            stages.push(Stage {
                kind: StageKind::Transition { index: i },
                inputs: vec![Pad::link(&current), Pad::link(image_label(i))],
                filters: vec![Filter::CrossFade {
                    style: TransitionStyle::for_index(i),
                    duration: plan.transition_duration(),
                    offset,
                }],
                output: output.clone(),
            });
            current = output;
        }
    }

    stages.push(Stage {
        kind: StageKind::ColorGrade,
        inputs: vec![Pad::link(&current)],
        filters: vec![Filter::ColorGrade {
            contrast: cfg.grade.contrast,
            brightness: cfg.grade.brightness,
            saturation: cfg.grade.saturation,
        }],
        output: "graded".to_string(),
    });
    current = "graded".to_string();

    let style = TextStyle::from(&cfg.captions);
    for (k, caption) in captions.captions().iter().enumerate() {
        let output = format!("cap{k}");
        stages.push(Stage {
            kind: StageKind::Caption { index: k },
            inputs: vec![Pad::link(&current)],
            filters: vec![Filter::Caption {
                text: caption.text.clone(),
                window: caption.window,
                style: style.clone(),
            }],
            output: output.clone(),
        });
        current = output;
    }

    if let Some(last) = stages.last_mut() {
        last.output = VIDEO_OUT.to_string();
    }

    tracing::debug!(stages = stages.len(), "built composition graph");
    Ok(CompositionGraph {
        stages,
        audio: Pad::audio(image_count),
        image_inputs: image_count,
        source_clip_sec: plan.source_clip_duration(),
    })
}

fn image_label(i: usize) -> String {
    format!("img{i}")
}

#[cfg(test)]
#[path = "../../tests/unit/graph/builder.rs"]
mod tests;
