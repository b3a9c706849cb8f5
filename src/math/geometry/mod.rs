// src/math/geometry/mod.rs
pub mod mesh;
pub mod polygon;
pub mod sphere;

pub use mesh::{Mesh, get_mesh_boundary};
pub use polygon::{Dilate, convex_hull_geo, polygon_lons_lats};
