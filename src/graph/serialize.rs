//! Compile a [`CompositionGraph`] to ffmpeg's `-filter_complex` text.
//!
//! This is the only place that knows ffmpeg filter syntax. Values pass through up to three
//! escaping levels: drawtext text expansion, filter option values (`\ ' :`), and the graph
//! parser, which strips one level of single quotes.

use std::fmt::Write as _;

use crate::graph::ir::{
    CompositionGraph, FadeDirection, Filter, Pad, Stage, StreamKind, TextStyle, TransitionStyle,
};
use crate::plan::effects::Motion;

/// Full `-filter_complex` argument for `graph`.
pub fn to_filter_complex(graph: &CompositionGraph) -> String {
    graph
        .stages()
        .iter()
        .map(stage_to_string)
        .collect::<Vec<_>>()
        .join(";")
}

/// `-map` argument selecting `pad`.
pub fn map_spec(pad: &Pad) -> String {
    match pad {
        Pad::Input { index, stream } => format!("{index}:{}", stream_letter(*stream)),
        Pad::Link(label) => format!("[{label}]"),
    }
}

fn stream_letter(stream: StreamKind) -> char {
    match stream {
        StreamKind::Video => 'v',
        StreamKind::Audio => 'a',
    }
}

fn pad_to_string(pad: &Pad) -> String {
    match pad {
        Pad::Input { index, stream } => format!("[{index}:{}]", stream_letter(*stream)),
        Pad::Link(label) => format!("[{label}]"),
    }
}

fn stage_to_string(stage: &Stage) -> String {
    let mut out = String::new();
    for pad in &stage.inputs {
        out.push_str(&pad_to_string(pad));
    }
    let chain = stage
        .filters
        .iter()
        .map(filter_to_string)
        .collect::<Vec<_>>()
        .join(",");
    out.push_str(&chain);
    let _ = write!(out, "[{}]", stage.output);
    out
}

fn filter_to_string(filter: &Filter) -> String {
    match filter {
        Filter::ScaleCover { size } => format!(
            "scale={}:{}:force_original_aspect_ratio=increase",
            size.width, size.height
        ),
        Filter::CenterCrop { size } => format!("crop={}:{}", size.width, size.height),
        Filter::ZoomPan { motion, size, fps } => {
            let (z, x, y) = motion_exprs(*motion);
            format!(
                "zoompan=z={}:x={}:y={}:d=1:s={}x{}:fps={}",
                quote(&z),
                quote(&x),
                quote(&y),
                size.width,
                size.height,
                fps.to_ffmpeg_rate()
            )
        }
        Filter::ResetTimestamps => "setpts=PTS-STARTPTS".to_string(),
        Filter::Fade {
            direction,
            start,
            duration,
        } => {
            let t = match direction {
                FadeDirection::In => "in",
                FadeDirection::Out => "out",
            };
            format!("fade=t={t}:st={}:d={}", secs(*start), secs(*duration))
        }
        Filter::CrossFade {
            style,
            duration,
            offset,
        } => {
            let name = match style {
                TransitionStyle::FadeBlack => "fadeblack",
                TransitionStyle::WipeRight => "wiperight",
            };
            format!(
                "xfade=transition={name}:duration={}:offset={}",
                secs(*duration),
                secs(*offset)
            )
        }
        Filter::ColorGrade {
            contrast,
            brightness,
            saturation,
        } => format!(
            "eq=contrast={}:brightness={}:saturation={}",
            num(*contrast),
            num(*brightness),
            num(*saturation)
        ),
        Filter::Caption {
            text,
            window,
            style,
        } => drawtext(text, window.start, window.end, style),
    }
}

fn drawtext(text: &str, start: f64, end: f64, style: &TextStyle) -> String {
    let font = style.font_file.to_string_lossy();
    let enable = format!("gte(t,{})*lt(t,{})", secs(start), secs(end));
    format!(
        "drawtext=fontfile={}:text={}:fontsize={}:fontcolor=white:borderw={}:bordercolor=black:\
         box=1:boxcolor=black@{}:boxborderw={}:x=(w-text_w)/2:y=h-{}:enable={}",
        quote(&escape_option(&font)),
        quote(&escape_option(&escape_text_expansion(text))),
        style.font_size,
        style.border_px,
        num(style.box_opacity),
        style.box_border_px,
        style.bottom_margin_px,
        quote(&enable),
    )
}

/// Stateless `z`, `x`, `y` expressions keyed on the output frame counter `on`.
///
/// Each looped input frame yields exactly one output frame (`d=1`), so `on` counts frames from
/// the start of the image's clip.
fn motion_exprs(motion: Motion) -> (String, String, String) {
    const CENTER_X: &str = "iw/2-(iw/zoom/2)";
    const CENTER_Y: &str = "ih/2-(ih/zoom/2)";
    match motion {
        Motion::Zoom { from, to, frames } => {
            let step = num((to - from).abs() / frames as f64);
            let z = if to >= from {
                format!("min({}+{step}*on,{})", num(from), num(to))
            } else {
                format!("max({}-{step}*on,{})", num(from), num(to))
            };
            (z, CENTER_X.to_string(), CENTER_Y.to_string())
        }
        Motion::Pan {
            zoom, dx_per_frame, ..
        } => (
            num(zoom),
            format!("{}*on", num(dx_per_frame)),
            CENTER_Y.to_string(),
        ),
    }
}

/// Seconds with millisecond precision, trailing zeros trimmed.
pub(crate) fn secs(v: f64) -> String {
    trim_fixed(format!("{v:.3}"))
}

/// General numeric parameter, micro precision, trailing zeros trimmed.
fn num(v: f64) -> String {
    trim_fixed(format!("{v:.6}"))
}

fn trim_fixed(s: String) -> String {
    if !s.contains('.') {
        return s;
    }
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Escape drawtext's own `%{...}` expansion.
fn escape_text_expansion(text: &str) -> String {
    text.replace('\\', r"\\").replace('%', r"\%")
}

/// Escape a filter option value (`\`, `'` and `:` are special).
fn escape_option(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '\'' | ':') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Single-quote a value for the graph parser; embedded quotes are closed, escaped, reopened.
fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

#[cfg(test)]
#[path = "../../tests/unit/graph/serialize.rs"]
mod tests;
