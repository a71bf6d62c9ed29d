use super::*;
use crate::fixtures::{abc_config, gesture_config};
use crate::foundation::core::Rect;
use crate::headless::HeadlessPage;
use crate::input::progress::ScrollLinkedConfig;
use crate::media::coordinator::MediaCue;
use std::cell::Cell;

fn page() -> HeadlessPage {
    HeadlessPage::new(1000.0, 800.0, Rect::new(0.0, 0.0, 1000.0, 800.0))
}

fn counter(host: &mut SequenceHost) -> Rc<Cell<usize>> {
    let count = Rc::new(Cell::new(0));
    let c = Rc::clone(&count);
    host.subscribe(move |_| c.set(c.get() + 1));
    count
}

fn wheel(delta_y: f64) -> InputEvent {
    InputEvent::Wheel {
        delta_y,
        at: Timestamp(0),
    }
}

#[test]
fn mount_renders_start_state() {
    let page = page();
    let host = SequenceHost::mount(gesture_config(), page.ports());
    assert_eq!(host.status(), &HostStatus::Animating);
    assert_eq!(host.progress(), Some(Progress::START));
    assert_eq!(host.pin_state(), PinState::Released);
    let state = host.visual_state().unwrap();
    assert_eq!(state.scalar("x"), Some(0.0));
    assert_eq!(state.layer("z"), Some(10));
}

#[test]
fn one_shot_gesture_completes_then_rolls_back_to_rest() {
    let page = page();
    let mut host = SequenceHost::mount(gesture_config(), page.ports());

    assert_eq!(page.wheel(&mut host, 500.0, 10), InputDisposition::Consumed);
    assert!(page.scroll.is_locked());
    assert_eq!(host.pin_state(), PinState::Locked);
    assert_eq!(page.wheel(&mut host, 1000.0, 20), InputDisposition::Consumed);
    assert_eq!(host.progress(), Some(Progress::END));

    // same direction once complete: released, page scrolls natively
    assert_eq!(page.wheel(&mut host, 100.0, 30), InputDisposition::PassThrough);
    assert_eq!(host.progress(), Some(Progress::END));
    assert_eq!(host.pin_state(), PinState::Released);
    assert!(!page.scroll.is_locked());
    assert_eq!(page.scroll.position(), 100.0);

    // reverse away from the anchor does not re-enter
    assert_eq!(page.wheel(&mut host, -40.0, 40), InputDisposition::PassThrough);
    assert_eq!(host.progress(), Some(Progress::END));
    page.scroll_to(&mut host, 0.0, 50);

    // reverse at the anchor rolls back to the rest value, not to 0
    assert_eq!(page.wheel(&mut host, -40.0, 60), InputDisposition::Consumed);
    assert_eq!(host.progress(), Some(Progress::new(0.9)));
    assert_eq!(host.pin_state(), PinState::Locked);
}

#[test]
fn locked_gesture_snaps_native_scroll_back_to_anchor() {
    let page = page();
    let mut host = SequenceHost::mount(gesture_config(), page.ports());
    page.wheel(&mut host, 100.0, 0);
    // programmatic scroll while locked, e.g. a scrollbar drag
    let disposition = host.handle_input(&InputEvent::Scroll {
        offset: 240.0,
        at: Timestamp(5),
    });
    assert_eq!(disposition, InputDisposition::Consumed);
    assert_eq!(page.scroll.position(), 0.0);
}

#[test]
fn reverse_at_start_passes_through() {
    let page = page();
    let mut host = SequenceHost::mount(gesture_config(), page.ports());
    assert_eq!(host.handle_input(&wheel(-50.0)), InputDisposition::PassThrough);
    assert_eq!(host.pin_state(), PinState::Released);
}

#[test]
fn batch_recomputes_once() {
    let page = page();
    let mut host = SequenceHost::mount(gesture_config(), page.ports());
    let renders = counter(&mut host);
    let dispositions = host.dispatch(&[wheel(100.0), wheel(100.0), wheel(100.0)]);
    assert_eq!(dispositions, vec![InputDisposition::Consumed; 3]);
    assert_eq!(renders.get(), 1);
    assert!((host.progress().unwrap().get() - 0.27).abs() < 1e-9);
}

#[test]
fn resize_in_the_same_batch_recomputes_once() {
    let page = HeadlessPage::new(1000.0, 800.0, Rect::new(0.0, 1000.0, 1000.0, 1800.0));
    let mut host = SequenceHost::mount(abc_config(InputMode::default()), page.ports());
    let renders = counter(&mut host);

    page.probe.set_viewport(1000.0, 400.0);
    host.dispatch(&[
        InputEvent::Scroll {
            offset: 1400.0,
            at: Timestamp(10),
        },
        InputEvent::Resize { at: Timestamp(10) },
    ]);
    assert_eq!(renders.get(), 1);
    // the range shrank to one 400px viewport, so 1400 is the end
    assert_eq!(host.progress(), Some(Progress::END));
    let lift = host.visual_state().unwrap().scalar("lift").unwrap();
    assert!((lift - 400.0).abs() < 1e-9);
}

#[test]
fn scroll_after_resize_in_one_batch_uses_new_range() {
    let page = HeadlessPage::new(1000.0, 800.0, Rect::new(0.0, 1000.0, 1000.0, 1800.0));
    let mut host = SequenceHost::mount(abc_config(InputMode::default()), page.ports());
    let renders = counter(&mut host);

    page.probe.set_viewport(1000.0, 400.0);
    host.dispatch(&[
        InputEvent::Resize { at: Timestamp(10) },
        InputEvent::Scroll {
            offset: 1200.0,
            at: Timestamp(10),
        },
    ]);
    assert_eq!(renders.get(), 1);
    assert_eq!(host.progress(), Some(Progress::new(0.5)));
}

#[test]
fn resize_recomputes_without_progress_change() {
    let page = page();
    let mut host = SequenceHost::mount(gesture_config(), page.ports());
    page.wheel(&mut host, 500.0, 0);
    let before = host.visual_state().unwrap().scalar("lift").unwrap();
    assert!((before - 360.0).abs() < 1e-6);

    let renders = counter(&mut host);
    page.resize(&mut host, 1000.0, 400.0);
    let after = host.visual_state().unwrap().scalar("lift").unwrap();
    assert!((after - 180.0).abs() < 1e-6);
    assert_eq!(renders.get(), 1);
    assert!((host.progress().unwrap().get() - 0.45).abs() < 1e-9);
}

#[test]
fn unmeasured_viewport_keeps_last_state() {
    let page = page();
    page.probe.set_bounds(None);
    let mut host = SequenceHost::mount(gesture_config(), page.ports());
    assert!(host.visual_state().is_none());

    page.probe.set_bounds(Some(Rect::new(0.0, 0.0, 1000.0, 800.0)));
    host.handle_resize();
    assert!(host.visual_state().is_some());

    page.wheel(&mut host, 500.0, 0);
    let last = host.visual_state().cloned();
    page.probe.set_bounds(None);
    host.handle_resize();
    page.wheel(&mut host, 100.0, 10);
    assert_eq!(host.visual_state().cloned(), last);
}

#[test]
fn config_error_degrades_to_safe_keyframe() {
    let mut cfg = gesture_config();
    cfg.segments[1].start = 0.6;
    let page = page();
    let mut host = SequenceHost::mount(cfg, page.ports());
    assert!(matches!(host.status(), HostStatus::Degraded(msg) if msg.contains("gap")));
    let state = host.visual_state().unwrap();
    assert_eq!(state.scalar("x"), Some(0.0));
    assert_eq!(state.progress, Progress::START);
    assert_eq!(host.handle_input(&wheel(300.0)), InputDisposition::PassThrough);
    assert!(!page.scroll.is_locked());
    assert!(!host.activate_phase(1, Timestamp(0)).unwrap());

    let mut cfg = gesture_config().safe_state(SafeState::End);
    cfg.segments[0].to = "missing".into();
    let host = SequenceHost::mount(cfg, page.ports());
    assert_eq!(host.visual_state().unwrap().scalar("x"), Some(30.0));
}

#[test]
fn reduced_motion_renders_safe_state_statically() {
    let mut cfg = gesture_config().safe_state(SafeState::End);
    cfg.reduced_motion = true;
    let page = page();
    let mut host = SequenceHost::mount(cfg, page.ports());
    assert_eq!(host.status(), &HostStatus::Static);
    assert_eq!(host.progress(), Some(Progress::END));
    assert_eq!(page.wheel(&mut host, 300.0, 0), InputDisposition::PassThrough);
    assert!(!page.scroll.is_locked());
    assert_eq!(host.progress(), Some(Progress::END));
}

#[test]
fn scroll_linked_pins_visually_inside_range() {
    let page = HeadlessPage::new(1000.0, 800.0, Rect::new(0.0, 1000.0, 1000.0, 1800.0));
    let mut host = SequenceHost::mount(abc_config(InputMode::default()), page.ports());
    assert_eq!(host.progress(), Some(Progress::START));

    assert_eq!(page.scroll_to(&mut host, 1400.0, 0), InputDisposition::PassThrough);
    assert_eq!(host.progress(), Some(Progress::new(0.5)));
    assert_eq!(host.pin_state(), PinState::Locked);
    assert!(!page.scroll.is_locked());

    page.scroll_to(&mut host, 2400.0, 10);
    assert_eq!(host.progress(), Some(Progress::END));
    assert_eq!(host.pin_state(), PinState::Released);

    // wheel input scrolls the page, which moves progress through the scroll event
    page.wheel(&mut host, -1000.0, 20);
    assert_eq!(page.scroll.position(), 1400.0);
    assert_eq!(host.progress(), Some(Progress::new(0.5)));
}

#[test]
fn scrubbed_progress_catches_up_over_frames() {
    let page = HeadlessPage::new(1000.0, 800.0, Rect::new(0.0, 1000.0, 1000.0, 1800.0));
    let cfg = abc_config(InputMode::ScrollLinked(ScrollLinkedConfig {
        scrub_ms: Some(100),
        ..ScrollLinkedConfig::default()
    }));
    let mut host = SequenceHost::mount(cfg, page.ports());

    page.scroll_to(&mut host, 1400.0, 0);
    assert_eq!(host.progress(), Some(Progress::START));
    assert!(host.has_pending_frame());

    // a newer scroll supersedes the outstanding request
    page.scroll_to(&mut host, 1800.0, 5);
    assert_eq!(page.frames.cancelled(), 1);
    assert_eq!(page.frames.pending().len(), 1);

    page.run_frames(&mut host, 400, 16);
    assert_eq!(host.progress(), Some(Progress::END));
    assert!(!host.has_pending_frame());
}

#[test]
fn resize_mid_scrub_retargets_the_animation() {
    let page = HeadlessPage::new(1000.0, 800.0, Rect::new(0.0, 1000.0, 1000.0, 1800.0));
    let cfg = abc_config(InputMode::ScrollLinked(ScrollLinkedConfig {
        scrub_ms: Some(100),
        ..ScrollLinkedConfig::default()
    }));
    let mut host = SequenceHost::mount(cfg, page.ports());

    page.scroll_to(&mut host, 1400.0, 0);
    page.run_frames(&mut host, 48, 16);
    let mid = host.progress().unwrap().get();
    assert!(mid > 0.0 && mid < 0.5);

    // 1400 now lies at the end of a 400px range
    page.resize(&mut host, 1000.0, 400.0);
    assert!(host.has_pending_frame());
    assert!(host.progress().unwrap().get() < 1.0);

    page.run_frames(&mut host, 400, 16);
    assert_eq!(host.progress(), Some(Progress::END));
    assert!(!host.has_pending_frame());
}

#[test]
fn tap_lock_suppresses_observer_activations() {
    let page = page();
    let mut host = SequenceHost::mount(
        abc_config(InputMode::Discrete(DiscreteConfig::default())),
        page.ports(),
    );
    assert!(host.activate_phase(1, Timestamp(0)).unwrap());
    assert!(!host.observe_phase(2, Timestamp(300)).unwrap());
    page.run_frames(&mut host, 1000, 16);
    assert_eq!(host.progress(), Some(Progress::new(0.5)));
    assert_eq!(host.phase(), Some(1));

    assert!(host.observe_phase(2, Timestamp(1000)).unwrap());
    assert!(host.activate_phase(5, Timestamp(1001)).is_err());
    assert!(host.hover(0).unwrap());
    page.run_frames(&mut host, 2000, 16);
    assert_eq!(host.progress(), Some(Progress::START));
    // already there
    assert!(!host.hover(0).unwrap());
}

#[test]
fn discrete_input_never_pins() {
    let page = page();
    let mut host = SequenceHost::mount(
        abc_config(InputMode::Discrete(DiscreteConfig::default())),
        page.ports(),
    );
    assert_eq!(page.wheel(&mut host, 300.0, 0), InputDisposition::PassThrough);
    assert_eq!(host.pin_state(), PinState::Released);
    assert_eq!(host.progress(), Some(Progress::START));
}

#[test]
fn nested_hosts_share_one_lock() {
    let page = page();
    let mut outer = SequenceHost::mount(gesture_config(), page.ports());
    let mut inner = SequenceHost::mount(gesture_config(), page.ports());

    assert_eq!(outer.handle_input(&wheel(100.0)), InputDisposition::Consumed);
    assert_eq!(inner.handle_input(&wheel(100.0)), InputDisposition::Consumed);
    assert_eq!(page.scope.depth(), 2);

    // outer is pinned but no longer innermost
    let outer_progress = outer.progress();
    assert_eq!(outer.handle_input(&wheel(100.0)), InputDisposition::PassThrough);
    assert_eq!(outer.progress(), outer_progress);

    inner.handle_input(&wheel(5000.0));
    assert_eq!(inner.progress(), Some(Progress::END));
    assert_eq!(inner.handle_input(&wheel(100.0)), InputDisposition::PassThrough);
    assert_eq!(page.scope.depth(), 1);
    assert!(page.scroll.is_locked());

    assert_eq!(outer.handle_input(&wheel(100.0)), InputDisposition::Consumed);
    outer.unmount();
    assert!(!page.scroll.is_locked());
}

#[test]
fn media_follows_phases_and_unlocks_on_tap() {
    let page = page();
    page.media.set_blocked(true);
    let cfg = gesture_config().media(MediaCue::new([1]));
    let mut host = SequenceHost::mount(cfg, page.ports());
    assert_eq!(host.media_state(), PlaybackState::Idle);

    page.wheel(&mut host, 700.0, 0);
    assert_eq!(host.phase(), Some(1));
    assert_eq!(host.media_state(), PlaybackState::Blocked);
    assert!(!page.media.is_playing());

    page.media.set_blocked(false);
    page.tap(&mut host, 10);
    assert!(page.media.is_playing());

    page.wheel(&mut host, -300.0, 20);
    assert_eq!(host.phase(), Some(0));
    assert!(!page.media.is_playing());
}

#[test]
fn unmount_releases_everything() {
    let page = page();
    let mut host = SequenceHost::mount(
        abc_config(InputMode::Discrete(DiscreteConfig::default())),
        page.ports(),
    );
    let renders = counter(&mut host);
    host.activate_phase(2, Timestamp(0)).unwrap();
    assert!(page.frames.has_pending());

    host.unmount();
    assert_eq!(host.status(), &HostStatus::Unmounted);
    assert!(!page.frames.has_pending());
    assert_eq!(page.frames.cancelled(), 1);

    // a late frame or event must not reach subscribers
    host.on_frame(Timestamp(16));
    host.handle_resize();
    assert_eq!(host.handle_input(&wheel(10.0)), InputDisposition::PassThrough);
    assert_eq!(renders.get(), 0);
    assert!(host.visual_state().is_none());
    host.unmount();
}

#[test]
fn drop_unlocks_the_page() {
    let page = page();
    {
        let mut host = SequenceHost::mount(gesture_config(), page.ports());
        page.wheel(&mut host, 100.0, 0);
        assert!(page.scroll.is_locked());
    }
    assert!(!page.scroll.is_locked());
    assert_eq!(page.scope.depth(), 0);
}

#[test]
fn reset_returns_to_start() {
    let page = page();
    let mut host = SequenceHost::mount(gesture_config(), page.ports());
    page.wheel(&mut host, 5000.0, 0);
    page.wheel(&mut host, 200.0, 10);
    assert_eq!(page.scroll.position(), 200.0);

    host.reset();
    assert_eq!(host.progress(), Some(Progress::START));
    assert_eq!(host.pin_state(), PinState::Released);
    assert_eq!(page.scroll.position(), 0.0);
    assert_eq!(host.visual_state().unwrap().scalar("x"), Some(0.0));
}
