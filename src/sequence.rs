pub(crate) mod config;
pub(crate) mod keyframe;
pub(crate) mod timeline;
pub(crate) mod visual;
