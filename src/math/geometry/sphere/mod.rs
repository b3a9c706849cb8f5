// src/math/geometry/sphere/mod.rs
pub mod geodetic;
pub mod projection;

pub use geodetic::*;
pub use projection::*;
