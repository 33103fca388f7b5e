use super::*;
use crate::foundation::core::Canvas;
use crate::plan::effects::{Motion, assign_effects};

fn cfg() -> ComposeConfig {
    ComposeConfig::default()
}

fn graph_for(total: f64, n: usize, captions: &CaptionSchedule) -> CompositionGraph {
    let cfg = cfg();
    let plan = TimingPlan::plan(total, n, &cfg.timing).unwrap();
    build_graph(n, &plan, &assign_effects(n), captions, &cfg).unwrap()
}

fn crossfades(graph: &CompositionGraph) -> Vec<(TransitionStyle, f64, f64)> {
    graph
        .stages()
        .iter()
        .flat_map(|s| s.filters.iter())
        .filter_map(|f| match f {
            Filter::CrossFade {
                style,
                duration,
                offset,
            } => Some((*style, *duration, *offset)),
            _ => None,
        })
        .collect()
}

#[test]
fn four_images_chain_three_crossfades_at_expected_offsets() {
    let graph = graph_for(48.0, 4, &CaptionSchedule::default());
    assert_eq!(graph.transition_count(), 3);
    assert_eq!(graph.image_inputs(), 4);
    assert_eq!(graph.audio_output(), &Pad::audio(4));

    let fades = crossfades(&graph);
    let offsets: Vec<f64> = fades.iter().map(|f| f.2).collect();
    for (got, want) in offsets.iter().zip([11.2, 23.2, 35.2]) {
        assert!((got - want).abs() < 1e-9, "got {got}, want {want}");
    }
    assert!(fades.iter().all(|f| (f.1 - 0.8).abs() < 1e-12));
    assert_eq!(
        fades.iter().map(|f| f.0).collect::<Vec<_>>(),
        vec![
            TransitionStyle::FadeBlack,
            TransitionStyle::WipeRight,
            TransitionStyle::FadeBlack
        ]
    );
}

#[test]
fn transitions_chain_running_composite_with_next_image() {
    let graph = graph_for(30.0, 3, &CaptionSchedule::default());
    let transitions: Vec<&Stage> = graph
        .stages()
        .iter()
        .filter(|s| matches!(s.kind, StageKind::Transition { .. }))
        .collect();
    assert_eq!(
        transitions[0].inputs,
        vec![Pad::link("img0"), Pad::link("img1")]
    );
    assert_eq!(
        transitions[1].inputs,
        vec![Pad::link("xf1"), Pad::link("img2")]
    );
}

#[test]
fn n_images_emit_n_minus_one_transitions() {
    for n in 2..=9 {
        let graph = graph_for(60.0, n, &CaptionSchedule::default());
        assert_eq!(graph.transition_count(), n - 1);
        assert_eq!(
            graph.count_stages(|k| matches!(k, StageKind::ImageMotion { .. })),
            n
        );
        assert_eq!(graph.count_stages(|k| *k == StageKind::BoundaryFade), 0);
    }
}

#[test]
fn single_image_fades_instead_of_transitioning() {
    let graph = graph_for(10.0, 1, &CaptionSchedule::default());
    assert_eq!(graph.transition_count(), 0);

    let fade = graph
        .stages()
        .iter()
        .find(|s| s.kind == StageKind::BoundaryFade)
        .expect("single image must get a boundary fade stage");
    assert_eq!(
        fade.filters,
        vec![
            Filter::Fade {
                direction: FadeDirection::In,
                start: 0.0,
                duration: 0.5
            },
            Filter::Fade {
                direction: FadeDirection::Out,
                start: 9.5,
                duration: 0.5
            },
        ]
    );
}

#[test]
fn image_stage_overscans_crops_moves_and_resets_clock() {
    let graph = graph_for(48.0, 4, &CaptionSchedule::default());
    let first = &graph.stages()[0];
    assert_eq!(first.inputs, vec![Pad::video(0)]);
    assert_eq!(first.output, "img0");

    let canvas = Canvas {
        width: 1080,
        height: 1920,
    };
    assert_eq!(
        first.filters[0],
        Filter::ScaleCover {
            size: Canvas {
                width: 2160,
                height: 3840
            }
        }
    );
    assert_eq!(first.filters[1], Filter::CenterCrop { size: canvas });
    match &first.filters[2] {
        Filter::ZoomPan { motion, size, .. } => {
            assert_eq!(*size, canvas);
            assert_eq!(
                *motion,
                Motion::Zoom {
                    from: 1.0,
                    to: 1.5,
                    frames: 360
                }
            );
        }
        other => panic!("expected zoompan, got {other:?}"),
    }
    assert_eq!(first.filters[3], Filter::ResetTimestamps);

    let second = &graph.stages()[1];
    let overscanned = Canvas {
        width: 1296,
        height: 2304,
    };
    assert_eq!(second.filters[1], Filter::CenterCrop { size: overscanned });
    match &second.filters[2] {
        Filter::ZoomPan {
            motion: Motion::Pan { zoom, .. },
            size,
            ..
        } => {
            assert_eq!(*size, canvas);
            assert!(f64::from(overscanned.width) / zoom <= f64::from(canvas.width) + 1e-9);
            assert!(f64::from(overscanned.width) - f64::from(canvas.width) > 0.0);
        }
        other => panic!("expected pan, got {other:?}"),
    }
}

#[test]
fn captions_stack_after_grade_and_last_stage_is_video_out() {
    let schedule = CaptionSchedule::build(
        vec!["FIRST LINE".to_string(), "SECOND LINE".to_string()],
        48.0,
    )
    .unwrap();
    let graph = graph_for(48.0, 4, &schedule);
    assert_eq!(graph.caption_count(), 2);

    let stages = graph.stages();
    let n = stages.len();
    assert_eq!(stages[n - 3].kind, StageKind::ColorGrade);
    assert_eq!(stages[n - 2].inputs, vec![Pad::link("graded")]);
    assert_eq!(stages[n - 1].inputs, vec![Pad::link("cap0")]);
    assert_eq!(stages[n - 1].output, VIDEO_OUT);
    assert_eq!(graph.video_output(), VIDEO_OUT);

    match &stages[n - 1].filters[0] {
        Filter::Caption { text, window, .. } => {
            assert_eq!(text, "SECOND LINE");
            assert_eq!(window.start, 24.0);
            assert_eq!(window.end, 48.0);
        }
        other => panic!("expected caption, got {other:?}"),
    }
}

#[test]
fn without_captions_grade_is_final_stage() {
    let graph = graph_for(48.0, 4, &CaptionSchedule::default());
    assert_eq!(graph.caption_count(), 0);
    let last = graph.stages().last().unwrap();
    assert_eq!(last.kind, StageKind::ColorGrade);
    assert_eq!(last.output, VIDEO_OUT);
}

#[test]
fn bypassed_feasibility_check_is_a_graph_error() {
    let plan = TimingPlan::unchecked(1.0, 2, 0.8);
    let err = build_graph(
        2,
        &plan,
        &assign_effects(2),
        &CaptionSchedule::default(),
        &cfg(),
    )
    .unwrap_err();
    assert!(matches!(err, ReelError::Graph(_)));
}

#[test]
fn mismatched_inputs_are_graph_errors() {
    let cfg = cfg();
    let plan = TimingPlan::plan(30.0, 3, &cfg.timing).unwrap();
    let captions = CaptionSchedule::default();

    assert!(matches!(
        build_graph(4, &plan, &assign_effects(4), &captions, &cfg),
        Err(ReelError::Graph(_))
    ));
    assert!(matches!(
        build_graph(3, &plan, &assign_effects(2), &captions, &cfg),
        Err(ReelError::Graph(_))
    ));
    assert!(matches!(
        build_graph(0, &plan, &[], &captions, &cfg),
        Err(ReelError::Graph(_))
    ));
}
