//! In-memory implementations of every runtime port.
//!
//! Used by the test-suite and the `scrollphase replay` harness. Each type is a cheap
//! `Rc` handle: clones share state, so a test can keep one clone to inspect or steer what
//! the host sees through another.

pub(crate) mod frames;
pub(crate) mod media;
pub(crate) mod page;

pub use frames::ManualFrames;
pub use media::RecordingMedia;
pub use page::{HeadlessPage, HeadlessProbe, MemoryScrollPort, ScriptStep};
