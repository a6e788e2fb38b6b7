use super::*;
use crate::material::ShaderTable;

const DEMO: &str = r#"{
    "fps": { "num": 60, "den": 1 },
    "canvas": { "width": 16, "height": 9 },
    "targets": [
        { "width": 8, "height": 8, "format": "rgba32_float" }
    ],
    "events": [
        {
            "name": "shake",
            "kind": "camera_shake",
            "range": { "start": 0, "end": 100 },
            "frequency": 10.0,
            "eye_intensity": [ { "at": 0.0, "value": 1.0 } ]
        },
        {
            "name": "grade",
            "kind": "fullscreen_effect",
            "range": { "start": 0, "end": 200 },
            "remap": [ { "at": 0.0, "value": 0.0 }, { "at": 1.0, "value": 1.0, "ease": "smooth_step" } ],
            "target": 0,
            "passes": [ { "shader": "fill", "inputs": [0], "blend": "additive" } ]
        },
        { "name": "end", "kind": "terminate", "range": { "start": 199, "end": 200 } }
    ]
}"#;

#[test]
fn parses_tagged_events() {
    let def = TimelineDef::from_json_str(DEMO).unwrap();
    assert_eq!(def.events.len(), 3);
    assert!(matches!(
        def.events[0].kind,
        EventKindDef::CameraShake { seed: None, .. }
    ));
    assert!(def.events[1].remap.is_some());
    assert!(matches!(def.events[2].kind, EventKindDef::Terminate));
    assert_eq!(def.clear, Rgba8Premul::opaque_black());
    def.validate().unwrap();
}

#[test]
fn inverted_range_is_a_serde_error() {
    let json = r#"{
        "fps": { "num": 60, "den": 1 },
        "canvas": { "width": 4, "height": 4 },
        "events": [ { "name": "x", "kind": "terminate", "range": { "start": 5, "end": 5 } } ]
    }"#;
    let err = TimelineDef::from_json_str(json).unwrap_err();
    assert!(matches!(err, SeqError::Serde(_)));
}

#[test]
fn unknown_kind_is_rejected() {
    let json = r#"{
        "fps": { "num": 60, "den": 1 },
        "canvas": { "width": 4, "height": 4 },
        "events": [ { "name": "x", "kind": "env_map_flip", "range": { "start": 0, "end": 5 } } ]
    }"#;
    assert!(TimelineDef::from_json_str(json).is_err());
}

#[test]
fn validate_reports_undeclared_target() {
    let mut def = TimelineDef::from_json_str(DEMO).unwrap();
    def.targets.clear();
    let err = def.validate().unwrap_err();
    assert!(err.to_string().contains("references render target 0"));
}

#[test]
fn validate_rejects_zero_frequency() {
    let mut def = TimelineDef::from_json_str(DEMO).unwrap();
    if let EventKindDef::CameraShake { frequency, .. } = &mut def.events[0].kind {
        *frequency = 0.0;
    }
    assert!(def.validate().is_err());
}

#[test]
fn json_round_trip_keeps_events() {
    let def = TimelineDef::from_json_str(DEMO).unwrap();
    let again = TimelineDef::from_json_str(&def.to_json_string().unwrap()).unwrap();
    assert_eq!(again.events.len(), def.events.len());
    assert_eq!(again.targets, def.targets);
}

#[test]
fn builds_and_evaluates() {
    let def = TimelineDef::from_json_str(DEMO).unwrap();
    let materials = ShaderTable::new().with("fill", |_, _, _| [0.25, 0.0, 0.0, 1.0]);
    let mut tl = def.build(SceneRegistry::new(), Box::new(materials)).unwrap();
    assert_eq!(tl.duration_frames(), 200);

    tl.evaluate(10.0);
    let stats = tl.last_stats();
    assert_eq!(stats.active_events, 2);
    assert_eq!(stats.failed_events, 0);
    assert_eq!(stats.aliasing_resolutions, 1);
    assert_eq!(stats.last_written, Some(TargetId(0)));
    assert_ne!(tl.context().shake_eye, glam::Vec3::ZERO);

    tl.evaluate(199.0);
    assert!(tl.is_finished());
}
