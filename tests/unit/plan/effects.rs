use super::*;

#[test]
fn rotation_repeats_every_three() {
    for i in 0..30 {
        assert_eq!(effect_for(i), effect_for(i + 3));
    }
    assert_eq!(
        assign_effects(4),
        vec![
            MotionEffect::ZoomIn,
            MotionEffect::PanRight,
            MotionEffect::ZoomOut,
            MotionEffect::ZoomIn
        ]
    );
}

#[test]
fn overscan_factors_are_fixed_per_kind() {
    assert_eq!(MotionEffect::ZoomIn.overscan(), 2.0);
    assert_eq!(MotionEffect::PanRight.overscan(), 1.2);
    assert_eq!(MotionEffect::ZoomOut.overscan(), 1.5);
}

#[test]
fn zoom_directions() {
    let Motion::Zoom { from, to, frames } = MotionEffect::ZoomIn.motion(360) else {
        panic!("zoom in must be a zoom ramp");
    };
    assert!(from < to);
    assert_eq!((from, to, frames), (1.0, 1.5, 360));

    let Motion::Zoom { from, to, .. } = MotionEffect::ZoomOut.motion(360) else {
        panic!("zoom out must be a zoom ramp");
    };
    assert!(from > to);
    assert_eq!(to, 1.0);
}

#[test]
fn zooms_crop_to_canvas_and_pan_keeps_room_to_travel() {
    let canvas = Canvas {
        width: 1080,
        height: 1920,
    };
    assert_eq!(MotionEffect::ZoomIn.crop(canvas), canvas);
    assert_eq!(MotionEffect::ZoomOut.crop(canvas), canvas);

    let crop = MotionEffect::PanRight.crop(canvas);
    assert_eq!(
        crop,
        Canvas {
            width: 1296,
            height: 2304
        }
    );

    let Motion::Pan {
        zoom, dx_per_frame, ..
    } = MotionEffect::PanRight.motion(360)
    else {
        panic!("pan right must be a pan");
    };
    // Visible window matches the canvas one to one, leaving slack on the right.
    let window = f64::from(crop.width) / zoom;
    assert!((window - 1080.0).abs() < 1e-9);
    assert!(f64::from(crop.width) - window >= 200.0);
    assert_eq!(dx_per_frame, 2.0);
}

#[test]
fn zero_frames_is_clamped_to_one() {
    assert_eq!(MotionEffect::PanRight.motion(0).frames(), 1);
}
