use crate::foundation::error::{ReelError, ReelResult};

/// Output frame dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Create a validated canvas.
    ///
    /// Both dimensions must be non-zero and even (yuv420p output).
    pub fn new(width: u32, height: u32) -> ReelResult<Self> {
        if width == 0 || height == 0 {
            return Err(ReelError::validation("canvas width/height must be non-zero"));
        }
        if !width.is_multiple_of(2) || !height.is_multiple_of(2) {
            return Err(ReelError::validation(
                "canvas width/height must be even (required for yuv420p output)",
            ));
        }
        Ok(Self { width, height })
    }

    /// Canvas scaled by `factor`, rounded to the nearest even pixel count.
    pub fn scaled(self, factor: f64) -> Self {
        fn even(v: f64) -> u32 {
            let px = (v / 2.0).round() * 2.0;
            px.max(2.0) as u32
        }
        Self {
            width: even(f64::from(self.width) * factor),
            height: even(f64::from(self.height) * factor),
        }
    }
}

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32,
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> ReelResult<Self> {
        if den == 0 {
            return Err(ReelError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(ReelError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Convert seconds to frame count using floor semantics.
    pub fn secs_to_frames_floor(self, secs: f64) -> u64 {
        (secs * self.as_f64()).floor().max(0.0) as u64
    }

    /// Render as ffmpeg's `num/den` rate syntax (`30` when `den == 1`).
    pub fn to_ffmpeg_rate(self) -> String {
        if self.den == 1 {
            self.num.to_string()
        } else {
            format!("{}/{}", self.num, self.den)
        }
    }
}

/// Half-open time window `[start, end)` in seconds.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimeWindow {
    /// Inclusive start in seconds.
    pub start: f64,
    /// Exclusive end in seconds.
    pub end: f64,
}

impl TimeWindow {
    /// Window length in seconds.
    pub fn duration(self) -> f64 {
        self.end - self.start
    }

    /// Return `true` when `t` is inside `[start, end)`.
    pub fn contains(self, t: f64) -> bool {
        self.start <= t && t < self.end
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
