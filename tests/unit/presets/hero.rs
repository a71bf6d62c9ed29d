use super::*;
use crate::foundation::core::{Progress, Rect};
use crate::phase::mapper::PhaseMapper;
use crate::pin::controller::InterceptMode;
use crate::sequence::visual::VisualState;
use crate::viewport::metrics::ViewportSnapshot;

fn hero_at(p: f64, width: f64) -> VisualState {
    let tl = expand_hero().compile().unwrap();
    let snap = ViewportSnapshot::new(width, 800.0, Rect::new(0.0, 0.0, width, 800.0));
    PhaseMapper::compute_visual_state(Progress::new(p), &tl, &snap).unwrap()
}

fn crossfade_at(p: f64) -> VisualState {
    let tl = crossfade_hero().compile().unwrap();
    let snap = ViewportSnapshot::new(1280.0, 800.0, Rect::new(0.0, 0.0, 1280.0, 800.0));
    PhaseMapper::compute_visual_state(Progress::new(p), &tl, &snap).unwrap()
}

fn close(a: Option<f64>, b: f64) -> bool {
    a.is_some_and(|a| (a - b).abs() < 1e-9)
}

#[test]
fn expand_hero_pins_for_its_whole_lifetime() {
    let config = expand_hero();
    assert!(matches!(config.input, InputMode::Gesture(_)));
    assert_eq!(config.intercept_mode(), InterceptMode::WholeLifetime);
    assert_eq!(config.media, Some(MediaCue::new([1])));
}

#[test]
fn media_grows_to_the_layout_size() {
    let start = hero_at(0.0, 1280.0);
    assert!(close(start.scalar("media_width"), 300.0));
    assert!(close(start.scalar("media_height"), 400.0));

    let desktop = hero_at(1.0, 1280.0);
    assert!(close(desktop.scalar("media_width"), 1550.0));
    assert!(close(desktop.scalar("media_height"), 800.0));
    assert!(close(desktop.scalar("title_shift"), 1.5 * 1280.0));

    let mobile = hero_at(1.0, 375.0);
    assert!(close(mobile.scalar("media_width"), 950.0));
    assert!(close(mobile.scalar("media_height"), 600.0));
    assert!(close(mobile.scalar("title_shift"), 1.8 * 375.0));
}

#[test]
fn growth_is_linear_across_the_reveal_split() {
    let s = hero_at(0.5, 1280.0);
    assert!(close(s.scalar("media_width"), 925.0));
    assert!(close(s.scalar("background_opacity"), 0.5));
    assert!(close(s.scalar("overlay_opacity"), 0.35));
}

#[test]
fn content_fades_in_over_the_last_quarter() {
    assert!(close(hero_at(0.75, 1280.0).scalar("content_opacity"), 0.0));
    let mid = hero_at(0.875, 1280.0);
    assert!(close(mid.scalar("content_opacity"), 0.5));
    assert_eq!(mid.flag("content_visible"), Some(false));
    assert_eq!(hero_at(1.0, 1280.0).flag("content_visible"), Some(true));
}

#[test]
fn content_stays_visible_at_the_rollback_rest_value() {
    let rest = GestureConfig::default().rest_progress;
    let at_rest = hero_at(rest, 1280.0);
    assert_eq!(at_rest.flag("content_visible"), Some(true));
    assert!(close(at_rest.scalar("content_opacity"), 0.6));
    assert_eq!(hero_at(rest - 0.01, 1280.0).flag("content_visible"), Some(false));
}

#[test]
fn crossfade_pins_for_120_percent() {
    let config = crossfade_hero();
    let snap = ViewportSnapshot::new(1280.0, 800.0, Rect::new(0.0, 200.0, 1280.0, 1000.0));
    match &config.input {
        InputMode::ScrollLinked(cfg) => {
            assert_eq!(cfg.scrub_ms, None);
            let (start, end) = cfg.range.resolve(&snap);
            assert!((start - 200.0).abs() < 1e-9);
            assert!((end - 1160.0).abs() < 1e-9);
        }
        other => panic!("unexpected input {other:?}"),
    }
    let cue = config.media.unwrap();
    assert!(cue.pause_at_boundaries);
    assert!(cue.plays_in(0) && cue.plays_in(1));
}

#[test]
fn still_image_holds_until_the_fade() {
    let s = crossfade_at(0.2);
    assert_eq!(s.scalar("image_opacity"), Some(1.0));
    assert_eq!(s.scalar("video_opacity"), Some(0.0));
    assert_eq!(s.flag("video_visible"), Some(false));
}

#[test]
fn crossfade_meets_in_the_middle() {
    let fade_start = 0.1 / 0.35;
    let s = crossfade_at((fade_start + 1.0) / 2.0);
    assert!(close(s.scalar("image_opacity"), 0.5));
    assert!(close(s.scalar("video_opacity"), 0.5));
    assert_eq!(s.flag("video_visible"), Some(true));
    assert_eq!(s.flag("image_visible"), Some(true));

    let end = crossfade_at(1.0);
    assert_eq!(end.flag("image_visible"), Some(false));
    assert_eq!(end.scalar("video_opacity"), Some(1.0));
}
