pub(crate) mod clock;
pub(crate) mod ease;
pub(crate) mod engine;
pub(crate) mod sampling;
pub(crate) mod timeline;
