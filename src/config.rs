//! Composition configuration.
//!
//! [`ComposeConfig`] is an explicit value handed to each pipeline component. Every section maps to a
//! TOML table and every field has a default, so an empty file (or no file at all) yields the stock
//! 1080x1920 @ 30 fps vertical-video setup.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{ReelError, ReelResult};

/// Root configuration for one composition request.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposeConfig {
    /// Output frame geometry and rate.
    pub video: VideoSettings,
    /// Timing planner constants.
    pub timing: TimingSettings,
    /// Caption extraction and styling.
    pub captions: CaptionSettings,
    /// Global color grade applied after transitions.
    pub grade: GradeSettings,
    /// Fixed encoder parameters for the main render.
    pub encode: EncodeSettings,
    /// Best-effort delivery re-encode.
    pub optimize: OptimizeSettings,
    /// External tool locations and deadline.
    pub tools: ToolPaths,
    /// Working directories.
    pub paths: PathSettings,
    /// Logging defaults for the CLI.
    pub logging: LoggingSettings,
}

/// Output frame geometry and rate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoSettings {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Output frames per second.
    pub fps: u32,
}

impl Default for VideoSettings {
    fn default() -> Self {
        Self {
            width: 1080,
            height: 1920,
            fps: 30,
        }
    }
}

/// Timing planner constants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingSettings {
    /// Cross-fade overlap between consecutive images, in seconds.
    pub transition_sec: f64,
    /// Extra source time requested per looped image input.
    pub tail_padding_sec: f64,
    /// Fade-in / fade-out length used when there is a single image.
    pub single_fade_sec: f64,
    /// Minimum number of images a request must carry.
    pub min_images: usize,
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            transition_sec: 0.8,
            tail_padding_sec: 1.0,
            single_fade_sec: 0.5,
            min_images: 3,
        }
    }
}

/// Caption extraction rules and overlay styling.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptionSettings {
    /// Sentences must be strictly longer than this (in chars) to qualify.
    pub min_chars: usize,
    /// Sentences strictly shorter than this qualify without a hook keyword.
    pub max_impact_chars: usize,
    /// Maximum number of phrases kept.
    pub max_phrases: usize,
    /// Case-insensitive hook keywords.
    pub hook_keywords: Vec<String>,
    /// Font used by the overlay.
    pub font_file: PathBuf,
    /// Font size in pixels.
    pub font_size: u32,
    /// Distance of the text baseline box from the bottom edge.
    pub bottom_margin_px: u32,
    /// Text outline width.
    pub border_px: u32,
    /// Padding of the background box.
    pub box_border_px: u32,
    /// Background box opacity in `[0, 1]`.
    pub box_opacity: f64,
}

impl Default for CaptionSettings {
    fn default() -> Self {
        Self {
            min_chars: 10,
            max_impact_chars: 50,
            max_phrases: 4,
            hook_keywords: ["what if", "secret", "truth", "hidden", "never", "revealed"]
                .into_iter()
                .map(String::from)
                .collect(),
            font_file: PathBuf::from("/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf"),
            font_size: 48,
            bottom_margin_px: 150,
            border_px: 3,
            box_border_px: 10,
            box_opacity: 0.7,
        }
    }
}

/// Global `eq` color grade.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradeSettings {
    /// Contrast multiplier.
    pub contrast: f64,
    /// Brightness offset.
    pub brightness: f64,
    /// Saturation multiplier.
    pub saturation: f64,
}

impl Default for GradeSettings {
    fn default() -> Self {
        Self {
            contrast: 1.1,
            brightness: 0.05,
            saturation: 1.2,
        }
    }
}

/// Encoder parameters for the main render. Not configurable per request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodeSettings {
    /// Video codec passed to `-c:v`.
    pub video_codec: String,
    /// Audio codec passed to `-c:a`.
    pub audio_codec: String,
    /// Target video bitrate (`-b:v`).
    pub video_bitrate: String,
    /// Target audio bitrate (`-b:a`).
    pub audio_bitrate: String,
    /// Output pixel format.
    pub pixel_format: String,
}

impl Default for EncodeSettings {
    fn default() -> Self {
        Self {
            video_codec: "libx264".to_string(),
            audio_codec: "aac".to_string(),
            video_bitrate: "2M".to_string(),
            audio_bitrate: "128k".to_string(),
            pixel_format: "yuv420p".to_string(),
        }
    }
}

/// Delivery re-encode parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizeSettings {
    /// Run the optimizer pass after rendering.
    pub enabled: bool,
    /// x264 preset.
    pub preset: String,
    /// Constant rate factor.
    pub crf: u32,
    /// Bitrate ceiling (`-maxrate`).
    pub max_rate: String,
    /// Rate-control buffer (`-bufsize`).
    pub buf_size: String,
    /// Audio resample rate in Hz.
    pub audio_sample_rate: u32,
    /// Audio channel count.
    pub audio_channels: u16,
}

impl Default for OptimizeSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            preset: "fast".to_string(),
            crf: 23,
            max_rate: "2.5M".to_string(),
            buf_size: "5M".to_string(),
            audio_sample_rate: 44_100,
            audio_channels: 2,
        }
    }
}

/// Locations of the external media tools.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolPaths {
    /// `ffmpeg` executable.
    pub ffmpeg: PathBuf,
    /// `ffprobe` executable.
    pub ffprobe: PathBuf,
    /// Optional deadline for a single subprocess, in seconds.
    pub timeout_sec: Option<f64>,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            ffmpeg: PathBuf::from("ffmpeg"),
            ffprobe: PathBuf::from("ffprobe"),
            timeout_sec: None,
        }
    }
}

/// Working directories.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathSettings {
    /// Scratch directory for rendered artifacts.
    pub scratch_dir: PathBuf,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            scratch_dir: PathBuf::from("temp"),
        }
    }
}

/// Logging defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl ComposeConfig {
    /// Parse a configuration from TOML text and validate it.
    pub fn from_toml_str(text: &str) -> ReelResult<Self> {
        let cfg: Self = toml::from_str(text).map_err(|e| ReelError::config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load a configuration file.
    pub fn load(path: &Path) -> ReelResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config '{}'", path.display()))?;
        Self::from_toml_str(&text)
    }

    /// Reject values the pipeline cannot work with.
    pub fn validate(&self) -> ReelResult<()> {
        Canvas::new(self.video.width, self.video.height)
            .map_err(|e| ReelError::config(format!("video: {e}")))?;
        Fps::new(self.video.fps, 1).map_err(|e| ReelError::config(format!("video: {e}")))?;

        let t = &self.timing;
        if !(t.transition_sec.is_finite() && t.transition_sec > 0.0) {
            return Err(ReelError::config("timing.transition_sec must be > 0"));
        }
        if !(t.tail_padding_sec.is_finite() && t.tail_padding_sec >= 0.0) {
            return Err(ReelError::config("timing.tail_padding_sec must be >= 0"));
        }
        if t.tail_padding_sec < t.transition_sec {
            return Err(ReelError::config(
                "timing.tail_padding_sec must be >= timing.transition_sec",
            ));
        }
        if !(t.single_fade_sec.is_finite() && t.single_fade_sec >= 0.0) {
            return Err(ReelError::config("timing.single_fade_sec must be >= 0"));
        }
        if t.min_images == 0 {
            return Err(ReelError::config("timing.min_images must be >= 1"));
        }

        let c = &self.captions;
        if c.max_phrases == 0 {
            return Err(ReelError::config("captions.max_phrases must be >= 1"));
        }
        if c.font_size == 0 {
            return Err(ReelError::config("captions.font_size must be > 0"));
        }
        if !(0.0..=1.0).contains(&c.box_opacity) {
            return Err(ReelError::config("captions.box_opacity must be in [0, 1]"));
        }

        if let Some(timeout) = self.tools.timeout_sec
            && !(timeout.is_finite() && timeout > 0.0)
        {
            return Err(ReelError::config("tools.timeout_sec must be > 0 when set"));
        }
        if self.optimize.audio_sample_rate == 0 || self.optimize.audio_channels == 0 {
            return Err(ReelError::config(
                "optimize audio sample rate/channels must be non-zero",
            ));
        }
        Ok(())
    }

    /// Output canvas described by the `video` section.
    pub fn canvas(&self) -> ReelResult<Canvas> {
        Canvas::new(self.video.width, self.video.height)
    }

    /// Output frame rate described by the `video` section.
    pub fn fps(&self) -> ReelResult<Fps> {
        Fps::new(self.video.fps, 1)
    }

    /// Create the scratch directory if it does not exist yet.
    pub fn ensure_scratch_dir(&self) -> ReelResult<&Path> {
        let dir = self.paths.scratch_dir.as_path();
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create scratch directory '{}'", dir.display()))?;
        Ok(dir)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
