use super::*;
use std::path::PathBuf;

#[test]
fn parses_duration_and_stream_kinds() {
    let json = br#"{
        "streams": [
            { "index": 0, "codec_type": "video", "width": 1080, "height": 1920 },
            { "index": 1, "codec_type": "audio" }
        ],
        "format": { "filename": "out.mp4", "duration": "48.032000" }
    }"#;
    let info = parse_probe_json(json).unwrap();
    assert!(info.has_video);
    assert!(info.has_audio);
    assert!((info.duration_sec.unwrap() - 48.032).abs() < 1e-9);
}

#[test]
fn audio_only_file_without_duration() {
    let json = br#"{ "streams": [ { "codec_type": "audio" } ], "format": {} }"#;
    let info = parse_probe_json(json).unwrap();
    assert!(!info.has_video);
    assert_eq!(info.duration_sec, None);
    assert!(matches!(
        require_duration(&info, Path::new("a.mp3")),
        Err(ReelError::Probe(_))
    ));
}

#[test]
fn unparseable_duration_is_treated_as_missing() {
    let json = br#"{ "format": { "duration": "N/A" } }"#;
    let info = parse_probe_json(json).unwrap();
    assert_eq!(info.duration_sec, None);
}

#[test]
fn zero_duration_is_rejected() {
    let info = MediaInfo {
        duration_sec: Some(0.0),
        has_video: false,
        has_audio: true,
    };
    assert!(require_duration(&info, Path::new("a.mp3")).is_err());
}

#[test]
fn malformed_json_is_a_probe_error() {
    assert!(matches!(
        parse_probe_json(b"not json"),
        Err(ReelError::Probe(_))
    ));
}

#[test]
fn missing_file_fails_before_spawning() {
    let err = probe_duration(
        Path::new("target/lorereel-unit/missing.mp3"),
        &ToolPaths::default(),
        &RunOpts::default(),
    )
    .unwrap_err();
    assert!(matches!(err, ReelError::Probe(_)));
}

#[cfg(unix)]
#[test]
fn non_zero_ffprobe_exit_is_a_probe_error() {
    let dir = PathBuf::from("target").join("lorereel-unit").join("probe_fail");
    std::fs::create_dir_all(&dir).unwrap();
    let audio = dir.join("narration.mp3");
    std::fs::write(&audio, b"not really audio").unwrap();

    let tools = ToolPaths {
        ffprobe: PathBuf::from("false"),
        ..ToolPaths::default()
    };
    let err = probe_duration(&audio, &tools, &RunOpts::default()).unwrap_err();
    assert!(matches!(err, ReelError::Probe(_)));
}
