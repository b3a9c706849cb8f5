// src/plot/mod.rs
pub mod basemap;
pub mod fault_plot;
pub mod figure;
pub mod grouping;

pub use basemap::{BaseMap, BaseMapLayers};
pub use fault_plot::{
    MapProjection, RuptureFootprints, collect_footprints, get_fault_plot, get_fault_plot_with,
    get_map_projection, get_map_projection_with,
};
pub use figure::{Figure, FigureCanvas};
pub use grouping::{MagnitudeGroup, group_by_magnitude};
