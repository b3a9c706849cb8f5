// src/source/mod.rs

// Seismische Quellmodelle: Quellen liefern Brüche mit Magnitude und Bruchfläche
pub mod mfd;
pub mod scaling;
pub mod simple_fault;

pub use mfd::Mfd;
pub use scaling::MagnitudeScaling;
pub use simple_fault::SimpleFaultSource;

use crate::math::{FaultPlotResult, Line, Polygon, geometry::Mesh};

/// Bruchfläche, approximiert durch ein reguläres Mesh
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    pub mesh: Mesh,
}

impl Surface {
    pub fn new(mesh: Mesh) -> Self {
        Self { mesh }
    }
}

/// Ein möglicher Bruch einer Störung
#[derive(Debug, Clone, PartialEq)]
pub struct Rupture {
    pub mag: f64,
    pub rake: f64,
    /// Jährliche Auftretensrate dieses einzelnen Bruchs
    pub occurrence_rate: f64,
    pub surface: Surface,
}

/// Eine Störungsquelle, wie sie der Plot erwartet.
///
/// `iter_ruptures` muss bei jedem Aufruf von vorne beginnen.
pub trait FaultSource {
    /// Polygon (Länge/Breite), das alle Brüche umschließt
    fn polygon(&self) -> FaultPlotResult<Polygon<f64>>;

    fn iter_ruptures(&self) -> impl Iterator<Item = Rupture> + '_;

    fn fault_trace(&self) -> &Line;

    fn source_id(&self) -> &str {
        "source"
    }
}
