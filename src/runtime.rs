pub(crate) mod commands;
pub(crate) mod frame;
pub(crate) mod host;
