use super::*;
use crate::media::coordinator::MediaHandle;
use crate::runtime::frame::FrameScheduler;

#[test]
fn probe_clones_share_geometry() {
    let probe = HeadlessProbe::new(800.0, 600.0, Rect::new(0.0, 0.0, 800.0, 600.0));
    let other = probe.clone();
    probe.set_viewport(400.0, 300.0);
    assert_eq!(other.viewport_size(), (400.0, 300.0));
    probe.set_bounds(None);
    assert!(other.element_bounds().is_none());
    assert!(other.supports_size_observation());
    assert!(!probe.without_size_observation().supports_size_observation());
}

#[test]
fn locked_port_blocks_native_scroll_only() {
    let mut port = MemoryScrollPort::new(10.0);
    assert_eq!(port.scroll_by(-30.0), Some(0.0));
    port.lock();
    assert_eq!(port.scroll_by(50.0), None);
    port.set_position(120.0);
    assert_eq!(port.position(), 120.0);
    assert_eq!(port.programmatic_moves(), 1);
    port.unlock();
    assert_eq!(port.scroll_by(5.0), Some(125.0));
}

#[test]
fn frames_track_requests_and_cancellations() {
    let mut frames = ManualFrames::new();
    let a = frames.request_frame();
    let b = frames.request_frame();
    assert_ne!(a, b);
    frames.cancel_frame(a);
    frames.cancel_frame(a);
    assert_eq!(frames.pending(), vec![b]);
    assert_eq!((frames.requested(), frames.cancelled()), (2, 1));
    assert_eq!(frames.take(), vec![b]);
    assert!(!frames.has_pending());
}

#[test]
fn blocked_media_rejects_until_unblocked() {
    let media = RecordingMedia::blocked();
    let mut handle = media.clone();
    assert!(handle.play().is_err());
    assert!(!media.is_playing());
    media.set_blocked(false);
    assert!(handle.play().is_ok());
    assert!(media.is_playing());
    handle.pause();
    assert_eq!((media.play_attempts(), media.pauses()), (2, 1));
}

#[test]
fn script_steps_parse_from_json() {
    let steps: Vec<ScriptStep> = serde_json::from_str(
        r#"[
            { "kind": "wheel", "delta_y": 120.0, "at": 16 },
            { "kind": "activate", "phase": 2, "at": 40 },
            { "kind": "frames", "until": 500, "step_ms": 16 }
        ]"#,
    )
    .unwrap();
    assert_eq!(
        steps[0],
        ScriptStep::Wheel {
            delta_y: 120.0,
            at: 16
        }
    );
    assert_eq!(steps[1], ScriptStep::Activate { phase: 2, at: 40 });
    assert_eq!(steps.len(), 3);
}
