// src/lib.rs
pub mod config;
pub mod math;
pub mod plot;
pub mod source;

pub use config::{FaultPlotFile, PlotConfig};
pub use math::geometry::{Mesh, get_mesh_boundary};
pub use math::{FaultPlotError, FaultPlotResult};
pub use plot::{Figure, get_fault_plot, get_fault_plot_with, get_map_projection};
pub use source::{FaultSource, Rupture, SimpleFaultSource};
