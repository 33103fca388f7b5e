/// `ffprobe`-based duration and stream probing.
pub mod probe;
