use crate::input::progress::{GestureConfig, InputMode, ScrollLinkedConfig, ScrollRange};
use crate::media::coordinator::MediaCue;
use crate::sequence::config::{SegmentSpec, SequenceConfig};
use crate::sequence::keyframe::{Basis, KeyframeSpec, Length, ParamValue, SwitchPoint};
use crate::viewport::metrics::MOBILE_BREAKPOINT;

/// Progress at which the hero's follow-up content starts fading in.
const REVEAL_AT: f64 = 0.75;

fn px_by_layout(mobile: f64, desktop: f64) -> Length {
    Length::responsive(MOBILE_BREAKPOINT, Length::px(mobile), Length::px(desktop))
}

fn vw_by_layout(mobile: f64, desktop: f64) -> Length {
    Length::responsive(
        MOBILE_BREAKPOINT,
        Length::relative(Basis::ViewportWidth, mobile),
        Length::relative(Basis::ViewportWidth, desktop),
    )
}

fn hero_frame(name: &str, p: f64) -> KeyframeSpec {
    KeyframeSpec::new(name)
        .with(
            "media_width",
            ParamValue::Length(px_by_layout(300.0 + 650.0 * p, 300.0 + 1250.0 * p)),
        )
        .with(
            "media_height",
            ParamValue::Length(px_by_layout(400.0 + 200.0 * p, 400.0 + 400.0 * p)),
        )
        .with(
            "title_shift",
            ParamValue::Length(vw_by_layout(1.8 * p, 1.5 * p)),
        )
        .with("background_opacity", ParamValue::Scalar(1.0 - p))
        .with("overlay_opacity", ParamValue::Scalar(0.5 - 0.3 * p))
}

/// "Scroll to expand" hero: wheel and touch grow a framed video to near full-screen while
/// the title halves slide apart. The page stays pinned until the media is fully expanded.
///
/// The follow-up content becomes visible once progress reaches the gesture's rest value, so
/// the rollback a reverse gesture performs from the end keeps it on screen. Visibility is a
/// function of progress alone: content also hides as soon as progress drops below the rest
/// value, not at the start of the fade.
pub fn expand_hero() -> SequenceConfig {
    let gesture = GestureConfig::default();
    // Local t inside `reveal` at which progress equals the rest value.
    let show_at = (gesture.rest_progress - REVEAL_AT) / (1.0 - REVEAL_AT);

    let collapsed = hero_frame("collapsed", 0.0)
        .with("content_opacity", ParamValue::Scalar(0.0))
        .with("content_visible", ParamValue::Flag(false));
    let revealing = hero_frame("revealing", REVEAL_AT)
        .with("content_opacity", ParamValue::Scalar(0.0))
        .with("content_visible", ParamValue::Flag(false));
    let expanded = hero_frame("expanded", 1.0)
        .with("content_opacity", ParamValue::Scalar(1.0))
        .with("content_visible", ParamValue::Flag(true));

    SequenceConfig::new("expand-hero", InputMode::Gesture(gesture))
        .keyframe(collapsed)
        .keyframe(revealing)
        .keyframe(expanded)
        .segment(SegmentSpec::new("expand", 0.0, REVEAL_AT, "collapsed", "revealing"))
        .segment(
            SegmentSpec::new("reveal", REVEAL_AT, 1.0, "revealing", "expanded")
                .switch(SwitchPoint::At(show_at)),
        )
        .media(MediaCue::new([1]))
}

/// Pinned hero that cross-fades a still image into a looping video.
///
/// The cross-fade covers 0.1 to 0.35 of a 0.35-long timeline, so the first
/// `0.1 / 0.35` of the pinned range shows the still.
pub fn crossfade_hero() -> SequenceConfig {
    const FADE_START: f64 = 0.1 / 0.35;

    let input = InputMode::ScrollLinked(ScrollLinkedConfig {
        range: ScrollRange::pinned(Length::relative(Basis::ViewportHeight, 1.2)),
        ..ScrollLinkedConfig::default()
    });
    let still = KeyframeSpec::new("still")
        .with("image_opacity", ParamValue::Scalar(1.0))
        .with("video_opacity", ParamValue::Scalar(0.0))
        .with("image_visible", ParamValue::Flag(true))
        .with("video_visible", ParamValue::Flag(false));
    let video = KeyframeSpec::new("video")
        .with("image_opacity", ParamValue::Scalar(0.0))
        .with("video_opacity", ParamValue::Scalar(1.0))
        .with("image_visible", ParamValue::Flag(false))
        .with("video_visible", ParamValue::Flag(true));

    // Visibility follows opacity: the video shows as soon as it starts fading in, the
    // image hides only once it has faded out.
    let fade_in = still.derive(
        "fading",
        [("video_visible".to_owned(), ParamValue::Flag(true))],
    );

    SequenceConfig::new("crossfade-hero", input)
        .keyframe(still)
        .keyframe(fade_in)
        .keyframe(video)
        .segment(SegmentSpec::new("still", 0.0, FADE_START, "still", "still"))
        .segment(
            SegmentSpec::new("crossfade", FADE_START, 1.0, "fading", "video")
                .switch(SwitchPoint::Exit),
        )
        .media(MediaCue::new([0, 1]).pause_at_boundaries(true))
}

#[cfg(test)]
#[path = "../../tests/unit/presets/hero.rs"]
mod tests;
