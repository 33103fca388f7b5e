use std::path::PathBuf;

use crate::config::CaptionSettings;
use crate::foundation::core::{Canvas, Fps, TimeWindow};
use crate::plan::effects::Motion;

/// Label carried by the graph's final video stage.
pub const VIDEO_OUT: &str = "vout";

/// Stream selector on a raw engine input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StreamKind {
    /// First video stream.
    Video,
    /// First audio stream.
    Audio,
}

/// Where a stage reads from.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Pad {
    /// A raw input, by position on the engine command line.
    Input {
        /// 0-based input position.
        index: usize,
        /// Which stream of the input.
        stream: StreamKind,
    },
    /// Output of an earlier stage.
    Link(String),
}

impl Pad {
    /// Video stream of input `index`.
    pub fn video(index: usize) -> Self {
        Self::Input {
            index,
            stream: StreamKind::Video,
        }
    }

    /// Audio stream of input `index`.
    pub fn audio(index: usize) -> Self {
        Self::Input {
            index,
            stream: StreamKind::Audio,
        }
    }

    /// Named link to a prior stage's output.
    pub fn link(label: impl Into<String>) -> Self {
        Self::Link(label.into())
    }
}

/// Direction of a boundary fade.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FadeDirection {
    /// Fade up from black.
    In,
    /// Fade down to black.
    Out,
}

/// Visual style of a cross-fade. Purely cosmetic; timing is identical.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionStyle {
    /// Dip through black.
    FadeBlack,
    /// Wipe left to right.
    WipeRight,
}

impl TransitionStyle {
    /// Style for transition `index`: odd indices dip to black, even ones wipe.
    pub fn for_index(index: usize) -> Self {
        if index.is_multiple_of(2) {
            Self::WipeRight
        } else {
            Self::FadeBlack
        }
    }
}

/// Constant styling shared by every caption overlay.
#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    /// Font file path.
    pub font_file: PathBuf,
    /// Font size in pixels.
    pub font_size: u32,
    /// Distance from the bottom edge.
    pub bottom_margin_px: u32,
    /// Outline width.
    pub border_px: u32,
    /// Background box padding.
    pub box_border_px: u32,
    /// Background box opacity.
    pub box_opacity: f64,
}

impl From<&CaptionSettings> for TextStyle {
    fn from(c: &CaptionSettings) -> Self {
        Self {
            font_file: c.font_file.clone(),
            font_size: c.font_size,
            bottom_margin_px: c.bottom_margin_px,
            border_px: c.border_px,
            box_border_px: c.box_border_px,
            box_opacity: c.box_opacity,
        }
    }
}

/// One typed processing step inside a stage.
#[derive(Clone, Debug, PartialEq)]
pub enum Filter {
    /// Scale so the frame covers `size`, keeping aspect ratio.
    ScaleCover {
        /// Minimum covered size.
        size: Canvas,
    },
    /// Center crop to `size`.
    CenterCrop {
        /// Cropped size.
        size: Canvas,
    },
    /// Programmatic zoom/pan of a still.
    ZoomPan {
        /// Parameterized motion.
        motion: Motion,
        /// Output size.
        size: Canvas,
        /// Output frame rate.
        fps: Fps,
    },
    /// Restart the presentation clock at zero.
    ResetTimestamps,
    /// Boundary fade.
    Fade {
        /// In or out.
        direction: FadeDirection,
        /// Start time in seconds.
        start: f64,
        /// Fade length in seconds.
        duration: f64,
    },
    /// Two-input cross-fade.
    CrossFade {
        /// Cosmetic style.
        style: TransitionStyle,
        /// Overlap in seconds.
        duration: f64,
        /// Point in the first input's timeline where the fade begins.
        offset: f64,
    },
    /// Global contrast/brightness/saturation adjustment.
    ColorGrade {
        /// Contrast multiplier.
        contrast: f64,
        /// Brightness offset.
        brightness: f64,
        /// Saturation multiplier.
        saturation: f64,
    },
    /// Burned-in caption visible only during `window`.
    Caption {
        /// Text as displayed.
        text: String,
        /// Half-open visibility window.
        window: TimeWindow,
        /// Shared styling.
        style: TextStyle,
    },
}

/// Role of a stage in the composition, for inspection and tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StageKind {
    /// Per-image overscan, crop, motion and clock reset.
    ImageMotion {
        /// Image position.
        image: usize,
    },
    /// Fade in/out used when there is a single image.
    BoundaryFade,
    /// Cross-fade joining the running composite with the next image.
    Transition {
        /// 1-based transition number (equals the incoming image index).
        index: usize,
    },
    /// Global color grade.
    ColorGrade,
    /// One caption overlay.
    Caption {
        /// Caption position.
        index: usize,
    },
}

/// A labeled processing stage: named inputs, a filter chain, one named output.
#[derive(Clone, Debug, PartialEq)]
pub struct Stage {
    /// Role in the composition.
    pub kind: StageKind,
    /// Inputs consumed, in order.
    pub inputs: Vec<Pad>,
    /// Filters applied in sequence.
    pub filters: Vec<Filter>,
    /// Output label.
    pub output: String,
}

/// Fully built composition, ready to be serialized for the engine.
///
/// Built fresh per request. The two declared outputs are the final stage's video and the raw
/// narration audio input.
#[derive(Clone, Debug, PartialEq)]
pub struct CompositionGraph {
    pub(crate) stages: Vec<Stage>,
    pub(crate) audio: Pad,
    pub(crate) image_inputs: usize,
    pub(crate) source_clip_sec: f64,
}

impl CompositionGraph {
    /// Stages in execution order.
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Label of the final video output.
    pub fn video_output(&self) -> &str {
        self.stages.last().map_or(VIDEO_OUT, |s| s.output.as_str())
    }

    /// Raw audio input mapped straight to the output container.
    pub fn audio_output(&self) -> &Pad {
        &self.audio
    }

    /// Number of looped image inputs the graph expects, in positions `0..n`.
    pub fn image_inputs(&self) -> usize {
        self.image_inputs
    }

    /// Length each looped image input must be limited to, in seconds.
    pub fn source_clip_duration(&self) -> f64 {
        self.source_clip_sec
    }

    /// Number of stages whose role matches `pred`.
    pub fn count_stages(&self, pred: impl Fn(&StageKind) -> bool) -> usize {
        self.stages.iter().filter(|s| pred(&s.kind)).count()
    }

    /// Number of cross-fade transition stages.
    pub fn transition_count(&self) -> usize {
        self.count_stages(|k| matches!(k, StageKind::Transition { .. }))
    }

    /// Number of caption overlay stages.
    pub fn caption_count(&self) -> usize {
        self.count_stages(|k| matches!(k, StageKind::Caption { .. }))
    }
}
