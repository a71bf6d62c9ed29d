//! Ready-made sequence configurations.
//!
//! Each preset is plain data: a [`SequenceConfig`](crate::SequenceConfig) that can be mounted
//! as-is, serialized for inspection, or tweaked before mounting.

/// Step carousel of capsule cards.
pub mod capsule;
/// Envelope that opens and presents an invitation card.
pub mod envelope;
/// Full-bleed hero sections.
pub mod hero;
/// Parallax card showcase.
pub mod showcase;

pub use capsule::capsule_steps;
pub use envelope::envelope_reveal;
pub use hero::{crossfade_hero, expand_hero};
pub use showcase::showcase_parallax;

use crate::sequence::config::SequenceConfig;

/// Names accepted by [`by_name`].
pub const NAMES: &[&str] = &[
    "envelope",
    "expand-hero",
    "capsule",
    "showcase",
    "crossfade-hero",
];

/// Look up a preset by CLI name. `mobile` selects the small-screen variant where one exists.
pub fn by_name(name: &str, mobile: bool) -> Option<SequenceConfig> {
    let config = match name {
        "envelope" => envelope_reveal(mobile),
        "expand-hero" => expand_hero(),
        "capsule" => capsule_steps(6, !mobile),
        "showcase" => showcase_parallax(),
        "crossfade-hero" => crossfade_hero(),
        _ => return None,
    };
    Some(config)
}

#[cfg(test)]
#[path = "../tests/unit/presets/catalog.rs"]
mod tests;
