use crate::input::progress::{InputMode, ScrollLinkedConfig, ScrollRange};
use crate::pin::controller::InterceptMode;
use crate::sequence::config::{SegmentSpec, SequenceConfig};
use crate::sequence::keyframe::{KeyframeSpec, ParamValue};

/// Vertical offsets, in pixels, of each card as the section enters the viewport.
const CARD_DRIFT: [f64; 3] = [100.0, 50.0, 150.0];

/// Three cards drifting upward at different rates while the section crosses the viewport.
/// Never pins.
pub fn showcase_parallax() -> SequenceConfig {
    let input = InputMode::ScrollLinked(ScrollLinkedConfig {
        range: ScrollRange::through_viewport(),
        ..ScrollLinkedConfig::default()
    });
    let (enter, exit) = CARD_DRIFT.iter().enumerate().fold(
        (KeyframeSpec::new("enter"), KeyframeSpec::new("exit")),
        |(enter, exit), (i, y)| {
            let name = format!("card_{i}_y");
            (
                enter.with(name.clone(), ParamValue::Scalar(*y)),
                exit.with(name, ParamValue::Scalar(-y)),
            )
        },
    );
    SequenceConfig::new("showcase-parallax", input)
        .keyframe(enter)
        .keyframe(exit)
        .segment(SegmentSpec::new("drift", 0.0, 1.0, "enter", "exit"))
        .intercept(InterceptMode::Never)
}

#[cfg(test)]
#[path = "../../tests/unit/presets/showcase.rs"]
mod tests;
