use crate::config::TimingSettings;
use crate::foundation::core::TimeWindow;
use crate::foundation::error::{ReelError, ReelResult};

/// Per-image display schedule derived from narration length and image count.
///
/// Invariant: `per_image_duration > transition_duration`. Construction fails otherwise.
#[derive(Clone, Debug, PartialEq)]
pub struct TimingPlan {
    total_duration: f64,
    per_image_duration: f64,
    transition_duration: f64,
    tail_padding: f64,
    windows: Vec<TimeWindow>,
}

impl TimingPlan {
    /// Plan `image_count` images over `total_duration` seconds of narration.
    ///
    /// Never clamps: too many images for too little audio is an [`ReelError::Infeasible`].
    pub fn plan(
        total_duration: f64,
        image_count: usize,
        settings: &TimingSettings,
    ) -> ReelResult<Self> {
        if image_count == 0 {
            return Err(ReelError::infeasible("cannot plan a video with zero images"));
        }
        if !(total_duration.is_finite() && total_duration > 0.0) {
            return Err(ReelError::infeasible(format!(
                "narration duration must be positive, got {total_duration}"
            )));
        }

        let transition = settings.transition_sec;
        // Each clip must outlast its display slot by the overlap, or the composite ends
        // before the narration does.
        if settings.tail_padding_sec < transition {
            return Err(ReelError::config(format!(
                "tail padding {:.3}s is shorter than the {transition:.3}s transition",
                settings.tail_padding_sec
            )));
        }
        let per_image = total_duration / image_count as f64;
        if per_image <= transition {
            return Err(ReelError::infeasible(format!(
                "{image_count} images over {total_duration:.3}s gives {per_image:.3}s per image, \
                 which does not exceed the {transition:.3}s transition; drop images or use longer audio"
            )));
        }

        // Image i enters when the fade from i-1 begins, so consecutive windows overlap by
        // exactly `transition`.
        let windows = (0..image_count)
            .map(|i| {
                let start = if i == 0 {
                    0.0
                } else {
                    i as f64 * per_image - transition
                };
                TimeWindow {
                    start,
                    end: (i + 1) as f64 * per_image,
                }
            })
            .collect();

        Ok(Self {
            total_duration,
            per_image_duration: per_image,
            transition_duration: transition,
            tail_padding: settings.tail_padding_sec,
            windows,
        })
    }

    /// Build a plan without the feasibility check, for exercising downstream validation.
    #[cfg(test)]
    pub(crate) fn unchecked(total_duration: f64, image_count: usize, transition: f64) -> Self {
        let per_image = total_duration / image_count as f64;
        Self {
            total_duration,
            per_image_duration: per_image,
            transition_duration: transition,
            tail_padding: 1.0,
            windows: (0..image_count)
                .map(|i| TimeWindow {
                    start: i as f64 * per_image,
                    end: (i + 1) as f64 * per_image,
                })
                .collect(),
        }
    }

    /// Narration length the plan was built from.
    pub fn total_duration(&self) -> f64 {
        self.total_duration
    }

    /// Number of images in the plan.
    pub fn image_count(&self) -> usize {
        self.windows.len()
    }

    /// `total_duration / image_count`.
    pub fn per_image_duration(&self) -> f64 {
        self.per_image_duration
    }

    /// Cross-fade overlap.
    pub fn transition_duration(&self) -> f64 {
        self.transition_duration
    }

    /// Display windows in image order.
    pub fn windows(&self) -> &[TimeWindow] {
        &self.windows
    }

    /// Raw, non-overlapping playback slot `[i*P, (i+1)*P]` of image `index`.
    pub fn raw_window(&self, index: usize) -> TimeWindow {
        TimeWindow {
            start: index as f64 * self.per_image_duration,
            end: (index + 1) as f64 * self.per_image_duration,
        }
    }

    /// Source clip length requested for every looped image input.
    ///
    /// Padded past the display duration so the effect still has frames during the overlap.
    pub fn source_clip_duration(&self) -> f64 {
        self.per_image_duration + self.tail_padding
    }

    /// Offset in the running composite where transition `index` (1-based) starts.
    pub fn transition_offset(&self, index: usize) -> f64 {
        index as f64 * self.per_image_duration - self.transition_duration
    }
}

#[cfg(test)]
#[path = "../../tests/unit/plan/timing.rs"]
mod tests;
