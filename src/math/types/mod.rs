// src/math/types/mod.rs
pub mod bounds;
pub mod point;

pub use bounds::*;
pub use point::*;

// Re-export häufig verwendete externe Typen
pub use geo::{Coord, LineString, Polygon};
pub use nalgebra::DMatrix;
