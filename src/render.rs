pub(crate) mod pipeline;
pub(crate) mod raster;
pub(crate) mod svg;
pub(crate) mod view;
