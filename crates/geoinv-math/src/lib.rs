//! Mathematical primitives for GeoInv.

pub mod linalg;
