use super::*;

#[test]
fn frame_range_contains_boundaries() {
    let r = FrameRange::frames(2, 5).unwrap();
    assert!(!r.contains(1.0));
    assert!(r.contains(2.0));
    assert!(r.contains(4.0));
    assert!(r.contains(4.999));
    assert!(!r.contains(5.0));
}

#[test]
fn frame_range_rejects_empty_and_inverted() {
    assert!(FrameRange::frames(3, 3).is_err());
    assert!(FrameRange::frames(4, 3).is_err());
}

#[test]
fn frame_range_deserialize_validates() {
    let ok: FrameRange = serde_json::from_str(r#"{"start":0,"end":10}"#).unwrap();
    assert_eq!(ok.len_frames(), 10);
    assert!(serde_json::from_str::<FrameRange>(r#"{"start":10,"end":10}"#).is_err());
}

#[test]
fn progress_is_linear_and_unclamped() {
    let r = FrameRange::frames(10, 20).unwrap();
    assert_eq!(r.progress(10.0), 0.0);
    assert_eq!(r.progress(15.0), 0.5);
    assert_eq!(r.progress(9.0), -0.1);
    assert_eq!(r.frame_at(0.5), 15.0);
}

#[test]
fn fps_frames_to_ms() {
    let fps = Fps::new(60, 1).unwrap();
    assert!((fps.frames_to_ms(60.0) - 1000.0).abs() < 1e-9);
    assert!((fps.secs_to_frames(0.5) - 30.0).abs() < 1e-9);
    let ntsc = Fps::new(30_000, 1001).unwrap();
    assert!((ntsc.frame_duration_secs() - 1001.0 / 30_000.0).abs() < 1e-12);
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
}

#[test]
fn premultiply_rounds() {
    let c = Rgba8Premul::from_straight_rgba(255, 128, 0, 128);
    assert_eq!(c.to_array(), [128, 64, 0, 128]);
}
