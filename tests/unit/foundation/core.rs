use super::*;

#[test]
fn canvas_rejects_zero_and_odd_dimensions() {
    assert!(Canvas::new(0, 1920).is_err());
    assert!(Canvas::new(1081, 1920).is_err());
    assert!(Canvas::new(1080, 1920).is_ok());
}

#[test]
fn canvas_scaled_stays_even() {
    let c = Canvas::new(1080, 1920).unwrap();
    assert_eq!(
        c.scaled(2.0),
        Canvas {
            width: 2160,
            height: 3840
        }
    );
    assert_eq!(
        c.scaled(1.2),
        Canvas {
            width: 1296,
            height: 2304
        }
    );
    let odd = Canvas::new(1082, 1922).unwrap().scaled(1.5);
    assert_eq!(odd.width % 2, 0);
    assert_eq!(odd.height % 2, 0);
}

#[test]
fn fps_validation_and_conversion() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());

    let fps = Fps::new(30, 1).unwrap();
    assert_eq!(fps.secs_to_frames_floor(12.0), 360);
    assert_eq!(fps.secs_to_frames_floor(-1.0), 0);
    assert_eq!(fps.to_ffmpeg_rate(), "30");
    assert_eq!(Fps::new(30000, 1001).unwrap().to_ffmpeg_rate(), "30000/1001");
}

#[test]
fn time_window_is_half_open() {
    let w = TimeWindow {
        start: 1.0,
        end: 2.5,
    };
    assert!(w.contains(1.0));
    assert!(w.contains(2.4));
    assert!(!w.contains(2.5));
    assert!((w.duration() - 1.5).abs() < 1e-12);
}
