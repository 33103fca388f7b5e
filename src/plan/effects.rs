use crate::foundation::core::Canvas;

/// Motion applied to a still image for the length of its display window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionEffect {
    /// Zoom from 1.0x up to [`ZOOM_PEAK`].
    ZoomIn,
    /// Hold a canvas-sized window over the overscanned frame and slide it rightwards.
    PanRight,
    /// Zoom from [`ZOOM_PEAK`] back down to 1.0x.
    ZoomOut,
}

/// Maximum virtual zoom reached by zoom effects.
pub const ZOOM_PEAK: f64 = 1.5;
/// Horizontal pixels travelled per output frame by [`MotionEffect::PanRight`].
pub const PAN_PX_PER_FRAME: f64 = 2.0;

/// Parameterized camera motion, in output frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Motion {
    /// Linear zoom ramp from `from` to `to` over `frames`, centered.
    Zoom {
        /// Zoom factor on the first frame.
        from: f64,
        /// Zoom factor reached on the last frame and held afterwards.
        to: f64,
        /// Frames the ramp spans.
        frames: u64,
    },
    /// Constant zoom with a rightward pan.
    Pan {
        /// Fixed zoom factor relative to the cropped frame.
        zoom: f64,
        /// Pixels moved per frame.
        dx_per_frame: f64,
        /// Frames the pan spans.
        frames: u64,
    },
}

impl Motion {
    /// Frames the motion spans.
    pub fn frames(self) -> u64 {
        match self {
            Self::Zoom { frames, .. } | Self::Pan { frames, .. } => frames,
        }
    }
}

impl MotionEffect {
    const ROTATION: [Self; 3] = [Self::ZoomIn, Self::PanRight, Self::ZoomOut];

    /// Factor the source is scaled by before the center crop.
    pub fn overscan(self) -> f64 {
        match self {
            Self::ZoomIn => 2.0,
            Self::PanRight => 1.2,
            Self::ZoomOut => 1.5,
        }
    }

    /// Size of the center crop the motion runs over.
    ///
    /// Zooms crop to the canvas. The pan keeps the overscanned size so its canvas-sized
    /// window has `overscan - 1` of the width to travel.
    pub fn crop(self, canvas: Canvas) -> Canvas {
        match self {
            Self::ZoomIn | Self::ZoomOut => canvas,
            Self::PanRight => canvas.scaled(self.overscan()),
        }
    }

    /// Motion spanning `frames` output frames.
    pub fn motion(self, frames: u64) -> Motion {
        let frames = frames.max(1);
        match self {
            Self::ZoomIn => Motion::Zoom {
                from: 1.0,
                to: ZOOM_PEAK,
                frames,
            },
            // Zooming by the overscan factor shows exactly one canvas of source pixels.
            Self::PanRight => Motion::Pan {
                zoom: self.overscan(),
                dx_per_frame: PAN_PX_PER_FRAME,
                frames,
            },
            Self::ZoomOut => Motion::Zoom {
                from: ZOOM_PEAK,
                to: 1.0,
                frames,
            },
        }
    }
}

/// Effect for the image at `index`, rotating every three images.
pub fn effect_for(index: usize) -> MotionEffect {
    MotionEffect::ROTATION[index % MotionEffect::ROTATION.len()]
}

/// Effect assignment for `count` images, in image order.
pub fn assign_effects(count: usize) -> Vec<MotionEffect> {
    (0..count).map(effect_for).collect()
}

#[cfg(test)]
#[path = "../../tests/unit/plan/effects.rs"]
mod tests;
