use super::*;
use crate::fixtures::{abc_config, gesture_config};
use crate::input::progress::{DiscreteConfig, GestureConfig};

#[test]
fn json_round_trip_preserves_config() {
    let cfg = gesture_config().media(MediaCue::new([1])).safe_state(SafeState::End);
    let json = cfg.to_json_pretty().unwrap();
    let back = SequenceConfig::from_json_str(&json).unwrap();
    assert_eq!(back, cfg);
}

#[test]
fn optional_fields_default() {
    let json = r#"{
        "name": "tiny",
        "keyframes": [
            { "name": "a", "params": { "o": { "Scalar": 0.0 } } },
            { "name": "b", "params": { "o": { "Scalar": 1.0 } } }
        ],
        "segments": [
            { "name": "fade", "start": 0.0, "end": 1.0, "from": "a", "to": "b" }
        ]
    }"#;
    let cfg = SequenceConfig::from_json_str(json).unwrap();
    assert_eq!(cfg.input, InputMode::default());
    assert_eq!(cfg.safe_state, SafeState::Start);
    assert_eq!(cfg.segments[0].ease, Ease::Linear);
    assert_eq!(cfg.segments[0].switch, SwitchPoint::Entry);
    assert!(!cfg.reduced_motion);
    assert!(cfg.compile().is_ok());
}

#[test]
fn malformed_json_is_a_serde_error() {
    let err = SequenceConfig::from_json_str("{ not json").unwrap_err();
    assert!(matches!(err, ScrollPhaseError::Serde(_)));
}

#[test]
fn intercept_defaults_follow_input_mode() {
    assert_eq!(
        gesture_config().intercept_mode(),
        InterceptMode::WholeLifetime
    );
    assert_eq!(
        abc_config(InputMode::default()).intercept_mode(),
        InterceptMode::MidTransition
    );
    assert_eq!(
        abc_config(InputMode::Discrete(DiscreteConfig::default())).intercept_mode(),
        InterceptMode::Never
    );
    assert_eq!(
        gesture_config()
            .intercept(InterceptMode::Never)
            .intercept_mode(),
        InterceptMode::Never
    );
}

#[test]
fn compile_validates_input_mode() {
    let cfg = abc_config(InputMode::Gesture(GestureConfig {
        wheel_sensitivity: 0.0,
        ..GestureConfig::default()
    }));
    assert!(matches!(cfg.compile(), Err(ScrollPhaseError::Config(_))));
}

#[test]
fn compile_validates_media_cue() {
    let cfg = gesture_config().media(MediaCue::new([2]));
    assert!(matches!(cfg.compile(), Err(ScrollPhaseError::Config(_))));
    let cfg = gesture_config().media(MediaCue::new([1]));
    assert!(cfg.compile().is_ok());
}

#[test]
fn safe_keyframe_picks_sequence_ends() {
    let cfg = gesture_config();
    assert_eq!(cfg.safe_keyframe().map(|k| k.name.as_str()), Some("A"));
    let cfg = cfg.safe_state(SafeState::End);
    assert_eq!(cfg.safe_keyframe().map(|k| k.name.as_str()), Some("C"));

    let mut broken = gesture_config();
    broken.segments.clear();
    assert_eq!(broken.safe_keyframe().map(|k| k.name.as_str()), Some("A"));
    broken.keyframes.clear();
    assert!(broken.safe_keyframe().is_none());
}
