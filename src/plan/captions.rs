use crate::config::CaptionSettings;
use crate::foundation::core::TimeWindow;
use crate::foundation::error::{ReelError, ReelResult};

/// Pick the on-screen caption phrases from a narration script.
///
/// Sentences are split on `.`, `!` and `?`. A sentence qualifies when it is longer than
/// `min_chars` and either contains a hook keyword or is shorter than `max_impact_chars`.
/// Qualifying sentences keep script order, are capped at `max_phrases` and upper-cased.
/// An empty result is not an error; captions are simply omitted.
pub fn extract_captions(script: &str, rules: &CaptionSettings) -> Vec<String> {
    let hooks: Vec<String> = rules
        .hook_keywords
        .iter()
        .map(|k| k.to_lowercase())
        .collect();

    script
        .split(['.', '!', '?'])
        .map(str::trim)
        .filter(|sentence| {
            let len = sentence.chars().count();
            if len <= rules.min_chars {
                return false;
            }
            let lower = sentence.to_lowercase();
            hooks.iter().any(|h| lower.contains(h.as_str())) || len < rules.max_impact_chars
        })
        .take(rules.max_phrases)
        .map(str::to_uppercase)
        .collect()
}

/// One caption phrase and the time it is shown.
#[derive(Clone, Debug, PartialEq)]
pub struct Caption {
    /// Upper-cased phrase text.
    pub text: String,
    /// Visibility window, half-open.
    pub window: TimeWindow,
}

/// Captions with contiguous, non-overlapping windows covering `[0, total_duration)`.
///
/// `total_duration` is always the pre-render narration duration, fixed before any rendering
/// begins, so later re-encoding can never shift caption timing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CaptionSchedule {
    captions: Vec<Caption>,
}

impl CaptionSchedule {
    /// Evenly divide `total_duration` among `phrases`.
    pub fn build(phrases: Vec<String>, total_duration: f64) -> ReelResult<Self> {
        if phrases.is_empty() {
            return Ok(Self::default());
        }
        if !(total_duration.is_finite() && total_duration > 0.0) {
            return Err(ReelError::validation(format!(
                "caption schedule needs a positive duration, got {total_duration}"
            )));
        }

        let n = phrases.len();
        let slot = total_duration / n as f64;
        let captions = phrases
            .into_iter()
            .enumerate()
            .map(|(i, text)| {
                let end = if i + 1 == n {
                    total_duration
                } else {
                    (i + 1) as f64 * slot
                };
                Caption {
                    text,
                    window: TimeWindow {
                        start: i as f64 * slot,
                        end,
                    },
                }
            })
            .collect();
        Ok(Self { captions })
    }

    /// Return `true` when there are no captions.
    pub fn is_empty(&self) -> bool {
        self.captions.is_empty()
    }

    /// Number of captions.
    pub fn len(&self) -> usize {
        self.captions.len()
    }

    /// Captions in display order.
    pub fn captions(&self) -> &[Caption] {
        &self.captions
    }
}

#[cfg(test)]
#[path = "../../tests/unit/plan/captions.rs"]
mod tests;
