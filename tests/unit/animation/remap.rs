use super::*;

#[test]
fn identity_pair_is_a_no_op() {
    let r = TimeRemapper::new(&[(0.0, 0.0), (1.0, 1.0)]).unwrap();
    for i in 0..=100 {
        let t = f64::from(i) / 100.0;
        assert!((r.remap(t) - t).abs() < 1e-12, "t={t}");
    }
    assert_eq!(TimeRemapper::identity(), r);
}

#[test]
fn endpoints_are_always_defined() {
    let r = TimeRemapper::new(&[(0.25, 0.1), (0.75, 0.9)]).unwrap();
    assert_eq!(r.remap(0.0), 0.1);
    assert_eq!(r.remap(1.0), 0.9);
    assert_eq!(r.remap(-0.5), 0.1);
}

#[test]
fn slow_in_fast_out_curve() {
    let r = TimeRemapper::new(&[(0.0, 0.0), (0.5, 0.2), (1.0, 1.0)]).unwrap();
    assert!((r.remap(0.5) - 0.2).abs() < 1e-12);
    assert!((r.remap(0.75) - 0.6).abs() < 1e-12);
}

#[test]
fn eased_remap_keeps_endpoints() {
    let r = TimeRemapper::eased(Ease::InOutCubic);
    assert_eq!(r.remap(0.0), 0.0);
    assert_eq!(r.remap(1.0), 1.0);
    assert!(r.remap(0.25) < 0.25);
}

#[test]
fn rejects_out_of_range_and_unsorted() {
    assert!(TimeRemapper::new(&[(0.0, 0.0), (1.0, 1.5)]).is_err());
    assert!(TimeRemapper::new(&[(-0.1, 0.0)]).is_err());
    assert!(TimeRemapper::new(&[(0.8, 0.0), (0.2, 1.0)]).is_err());
    assert!(TimeRemapper::new(&[]).is_err());
}

#[test]
fn looped_remap_repeats_the_keyed_span() {
    let r = TimeRemapper::new(&[(0.0, 0.0), (0.5, 1.0)]).unwrap().looped();
    assert!((r.remap(0.25) - 0.5).abs() < 1e-12);
    assert!((r.remap(0.75) - 0.5).abs() < 1e-12);
    assert!(r.remap(0.5).abs() < 1e-12);
    // Negative progress on an event's first frame wraps as well.
    assert!((r.remap(-0.25) - 0.5).abs() < 1e-12);
}

#[test]
fn additive_sine_rides_on_the_curve() {
    let w = Waveform::new(WaveShape::Sine, 0.1, 1.0);
    let r = TimeRemapper::identity().with_waveform(w).unwrap();
    assert!((r.remap(0.25) - 0.35).abs() < 1e-12);
    assert!((r.remap(0.5) - 0.5).abs() < 1e-12);
    assert!((r.remap(0.75) - 0.65).abs() < 1e-12);
}

#[test]
fn multiplicative_wave_scales_and_result_is_clamped() {
    let w = Waveform::new(WaveShape::Square, 0.5, 1.0).multiplicative();
    let r = TimeRemapper::new(&[(0.0, 0.8), (1.0, 0.8)])
        .unwrap()
        .with_waveform(w)
        .unwrap();
    // First half: 0.8 * 1.5 clamps to 1, second half: 0.8 * 0.5.
    assert_eq!(r.remap(0.1), 1.0);
    assert!((r.remap(0.6) - 0.4).abs() < 1e-12);
}

#[test]
fn wave_shapes_start_on_their_expected_phase() {
    let at = |shape| Waveform::new(shape, 1.0, 1.0).value(0.0);
    assert_eq!(at(WaveShape::Sine), 0.0);
    assert_eq!(at(WaveShape::Square), 1.0);
    assert_eq!(at(WaveShape::Triangle), 0.0);
    assert_eq!(at(WaveShape::Sawtooth), -1.0);
    assert_eq!(Waveform::new(WaveShape::Triangle, 1.0, 1.0).value(0.25), 1.0);
}

#[test]
fn noise_wave_is_seeded() {
    let a = Waveform::new(WaveShape::Noise, 1.0, 4.0).with_seed(5);
    let b = Waveform::new(WaveShape::Noise, 1.0, 4.0).with_seed(6);
    assert_eq!(a.value(0.3), a.value(0.3));
    assert_ne!(a.value(0.3), b.value(0.3));
    assert!((-1.0..=1.0).contains(&a.value(0.3)));
}

#[test]
fn rejects_invalid_waveform() {
    let bad = Waveform::new(WaveShape::Sine, 1.0, -1.0);
    assert!(TimeRemapper::identity().with_waveform(bad).is_err());
    let nan = Waveform::new(WaveShape::Sine, f64::NAN, 1.0);
    assert!(TimeRemapper::identity().with_waveform(nan).is_err());
}

#[test]
fn both_json_forms_deserialize() {
    let plain: TimeRemapper =
        serde_json::from_str(r#"[{ "at": 0.0, "value": 0.0 }, { "at": 1.0, "value": 1.0 }]"#)
            .unwrap();
    assert_eq!(plain, TimeRemapper::identity());
    assert!(serde_json::to_string(&plain).unwrap().starts_with('['));

    let spline: TimeRemapper = serde_json::from_str(
        r#"{
            "keys": [{ "at": 0.0, "value": 0.0 }, { "at": 0.5, "value": 1.0 }],
            "loop": true,
            "waveform": { "shape": "triangle", "amplitude": 0.2, "frequency": 2.0 }
        }"#,
    )
    .unwrap();
    assert!(spline.is_looped());
    assert_eq!(spline.waveform().map(|w| w.shape), Some(WaveShape::Triangle));
    let back: TimeRemapper =
        serde_json::from_str(&serde_json::to_string(&spline).unwrap()).unwrap();
    assert_eq!(back, spline);

    let bad = r#"{
        "keys": [{ "at": 0.0, "value": 0.0 }],
        "waveform": { "amplitude": 1.0, "frequency": -2.0 }
    }"#;
    assert!(serde_json::from_str::<TimeRemapper>(bad).is_err());
}
