pub(crate) mod payload;
pub(crate) mod stroke;
pub(crate) mod surface;
