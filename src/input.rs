pub(crate) mod event;
pub(crate) mod progress;
