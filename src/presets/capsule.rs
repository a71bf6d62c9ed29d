use crate::input::progress::{DiscreteConfig, InputMode};
use crate::sequence::config::{SegmentSpec, SequenceConfig};
use crate::sequence::keyframe::{Basis, KeyframeSpec, Length, ParamValue, SwitchPoint};

const MIN_COLLAPSED: f64 = 52.0;
const DEFAULT_STEP: usize = 2;

/// Sizing constants for one layout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CapsuleLayout {
    /// Space between cards.
    pub gap: f64,
    /// Smallest height of the active card.
    pub min_expanded: f64,
    /// Preferred share of the usable height given to the active card.
    pub expanded_ratio: f64,
}

impl CapsuleLayout {
    /// Wide layouts.
    pub const DESKTOP: Self = Self {
        gap: 10.0,
        min_expanded: 180.0,
        expanded_ratio: 0.36,
    };
    /// Mobile gets a tighter gap and a larger active card so its full copy fits.
    pub const MOBILE: Self = Self {
        gap: 8.0,
        min_expanded: 240.0,
        expanded_ratio: 0.54,
    };

    /// Container height left after the gaps, never negative.
    fn usable(&self, count: usize) -> Length {
        let gaps = self.gap * (count - 1) as f64;
        Length::Max(vec![
            Length::px(0.0),
            Length::relative(Basis::ContainerHeight, 1.0) + Length::px(-gaps),
        ])
    }

    /// Height of every inactive card.
    pub fn collapsed_height(&self, count: usize) -> Length {
        let others = (count - 1) as f64;
        let usable = self.usable(count);
        let max_expanded = usable.clone() + Length::px(-others * MIN_COLLAPSED);
        let preferred = Length::clamp(
            Length::scale(self.expanded_ratio, usable.clone()),
            Length::px(self.min_expanded),
            Length::Max(vec![Length::px(self.min_expanded), max_expanded]),
        );
        let share = Length::scale(1.0 / others, usable + Length::scale(-1.0, preferred));
        Length::Max(vec![Length::px(MIN_COLLAPSED), share])
    }

    /// Height of the active card: whatever the collapsed cards leave over.
    pub fn expanded_height(&self, count: usize) -> Length {
        let others = (count - 1) as f64;
        Length::Max(vec![
            Length::px(self.min_expanded),
            self.usable(count) + Length::scale(-others, self.collapsed_height(count)),
        ])
    }
}

/// Vertical carousel of `count` capsule cards where exactly one is expanded at a time.
///
/// Step `i` is phase `i`; activating it jumps to the start of that phase and the last step
/// is the sequence end. Hover activates steps on desktop, taps on mobile. Needs at least two
/// steps to compile.
pub fn capsule_steps(count: usize, desktop: bool) -> SequenceConfig {
    let layout = if desktop {
        CapsuleLayout::DESKTOP
    } else {
        CapsuleLayout::MOBILE
    };
    let input = InputMode::Discrete(DiscreteConfig {
        hover_activates: desktop,
        initial_phase: Some(DEFAULT_STEP.min(count.saturating_sub(1))),
        ..DiscreteConfig::default()
    });
    let mut config = SequenceConfig::new("capsule-steps", input);
    if count < 2 {
        return config;
    }

    let expanded = layout.expanded_height(count);
    let collapsed = layout.collapsed_height(count);
    for active in 0..count {
        let mut keyframe = KeyframeSpec::new(format!("step_{active}"));
        for card in 0..count {
            let is_active = card == active;
            let height = if is_active { &expanded } else { &collapsed };
            keyframe = keyframe
                .with(
                    format!("card_{card}_height"),
                    ParamValue::Length(height.clone()),
                )
                .with(format!("card_{card}_active"), ParamValue::Flag(is_active))
                .with(
                    format!("card_{card}_overlay"),
                    ParamValue::Scalar(if is_active { 0.4 } else { 0.7 }),
                );
        }
        config = config.keyframe(keyframe);
    }

    let span = (count - 1) as f64;
    for i in 0..count - 1 {
        config = config.segment(
            SegmentSpec::new(
                format!("step_{i}_to_{}", i + 1),
                i as f64 / span,
                (i + 1) as f64 / span,
                format!("step_{i}"),
                format!("step_{}", i + 1),
            )
            .switch(SwitchPoint::At(0.5)),
        );
    }
    config
}

#[cfg(test)]
#[path = "../../tests/unit/presets/capsule.rs"]
mod tests;
