use crate::animation::ease::Ease;
use crate::foundation::core::Point;
use crate::input::progress::{InputMode, ScrollLinkedConfig, ScrollRange};
use crate::sequence::config::{SegmentSpec, SequenceConfig};
use crate::sequence::keyframe::{Basis, KeyframeSpec, Length, ParamValue, SwitchPoint};

/// Length, in seconds, of the choreography the segments are cut from.
const TOTAL_SECS: f64 = 6.3;

const SCRUB_MS: u64 = 1500;

/// Flap triangle tucked over the pocket.
pub const FLAP_CLOSED: [Point; 3] = [
    Point::new(30.0, 100.0),
    Point::new(480.0, 380.0),
    Point::new(930.0, 100.0),
];
/// Flap flung past its resting height.
pub const FLAP_OVERSHOOT: [Point; 3] = [
    Point::new(30.0, 100.0),
    Point::new(480.0, -220.0),
    Point::new(930.0, 100.0),
];
/// Flap at rest while open.
pub const FLAP_SETTLED: [Point; 3] = [
    Point::new(30.0, 100.0),
    Point::new(480.0, -180.0),
    Point::new(930.0, 100.0),
];

struct Pose {
    flap: [Point; 3],
    tilt_x: f64,
    shadow: f64,
    card_y: f64,
    card_scale: f64,
    card_z: i32,
    flap_z: i32,
}

impl Pose {
    fn keyframe(&self, name: &str) -> KeyframeSpec {
        KeyframeSpec::new(name)
            .with("flap", ParamValue::Points(self.flap.to_vec()))
            .with("seam", ParamValue::Points(self.flap.to_vec()))
            .with("flap_shadow", ParamValue::Scalar(self.shadow))
            .with("tilt_x", ParamValue::Scalar(self.tilt_x))
            .with("card_y", ParamValue::Scalar(self.card_y))
            .with("card_scale", ParamValue::Scalar(self.card_scale))
            .with("card_z", ParamValue::Layer(self.card_z))
            .with("flap_z", ParamValue::Layer(self.flap_z))
    }
}

const SEALED: Pose = Pose {
    flap: FLAP_CLOSED,
    tilt_x: 10.0,
    shadow: 0.0,
    card_y: 100.0,
    card_scale: 0.95,
    card_z: 10,
    flap_z: 30,
};

fn segment(name: &str, from_s: f64, to_s: f64, from: &str, to: &str) -> SegmentSpec {
    SegmentSpec::new(name, from_s / TOTAL_SECS, to_s / TOTAL_SECS, from, to)
}

/// Envelope opens, the invitation card rises out, presents, and is tucked back in.
///
/// Scroll-linked and pinned from the container top for three viewport heights (two on
/// mobile). Card and flap swap stacking order while the card clears the pocket.
pub fn envelope_reveal(mobile: bool) -> SequenceConfig {
    let distance = if mobile { 2.0 } else { 3.0 };
    let input = InputMode::ScrollLinked(ScrollLinkedConfig {
        range: ScrollRange::pinned(Length::relative(Basis::ViewportHeight, distance)),
        scrub_ms: Some(SCRUB_MS),
        scrub_ease: Ease::OutQuad,
    });

    let opened = Pose {
        flap: FLAP_OVERSHOOT,
        tilt_x: 15.0,
        shadow: 0.12,
        flap_z: 0,
        ..SEALED
    };
    let peak = Pose {
        flap: FLAP_SETTLED,
        shadow: 0.14,
        card_y: -350.0,
        card_z: 40,
        ..opened
    };
    let presented = Pose {
        tilt_x: 0.0,
        card_y: 100.0,
        card_scale: 1.0,
        ..peak
    };
    let withdrawn = Pose {
        card_y: -350.0,
        card_scale: 0.95,
        card_z: 10,
        ..presented
    };
    let tucked = Pose {
        card_y: 100.0,
        flap_z: 30,
        ..withdrawn
    };

    SequenceConfig::new("envelope-reveal", input)
        .keyframe(SEALED.keyframe("sealed"))
        .keyframe(opened.keyframe("opened"))
        .keyframe(peak.keyframe("peak"))
        .keyframe(presented.keyframe("presented"))
        .keyframe(withdrawn.keyframe("withdrawn"))
        .keyframe(tucked.keyframe("tucked"))
        // Flap drops behind the card late in the lift.
        .segment(
            segment("open", 0.0, 1.0, "sealed", "opened")
                .ease(Ease::InOutQuad)
                .switch(SwitchPoint::At(0.9)),
        )
        // Card comes in front once it clears the pocket.
        .segment(
            segment("rise", 1.0, 1.8, "opened", "peak")
                .ease(Ease::OutQuad)
                .switch(SwitchPoint::Exit),
        )
        .segment(segment("present", 1.8, 3.0, "peak", "presented").ease(Ease::OutQuad))
        .segment(segment("hold", 3.0, 3.5, "presented", "presented"))
        .segment(
            segment("withdraw", 3.5, 4.7, "presented", "withdrawn")
                .ease(Ease::InQuad)
                .switch(SwitchPoint::At(0.84)),
        )
        .segment(
            segment("tuck", 4.7, 5.2, "withdrawn", "tucked")
                .ease(Ease::OutCubic)
                .switch(SwitchPoint::At(0.93)),
        )
        .segment(segment("close", 5.2, TOTAL_SECS, "tucked", "sealed").ease(Ease::InOutQuad))
}

#[cfg(test)]
#[path = "../../tests/unit/presets/envelope.rs"]
mod tests;
