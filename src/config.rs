// src/config.rs

use crate::math::error::{FaultPlotError, FaultPlotResult};
use crate::plot::basemap::BaseMapLayers;
use crate::source::simple_fault::SimpleFaultParams;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Darstellungsparameter für die Bruch-Plots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    /// Puffer um das Quellpolygon für den Kartenausschnitt (km)
    pub buffer_km: f64,
    /// Abstand der Breiten- und Längenkreise (Grad)
    pub grid_step_deg: f64,
    /// Figurgröße in Zoll
    pub fig_width_in: f64,
    pub fig_height_in: f64,
    pub dpi: f64,
    /// Füllfarbe der Bruchflächen
    pub fill_color: String,
    pub trace_color: String,
    /// Linienbreite der Störungsspur in Punkt
    pub trace_width: f64,
    pub title_prefix: String,
    /// Titelschriftgröße in Punkt
    pub title_font_size: f64,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            buffer_km: 10.0,
            grid_step_deg: 0.2,
            fig_width_in: 9.0,
            fig_height_in: 9.0,
            dpi: 160.0,
            fill_color: "palegreen".to_string(),
            trace_color: "black".to_string(),
            trace_width: 2.0,
            title_prefix: "Simple Fault Source Ruptures".to_string(),
            title_font_size: 20.0,
        }
    }
}

impl PlotConfig {
    pub fn with_buffer_km(mut self, buffer_km: f64) -> Self {
        self.buffer_km = buffer_km;
        self
    }

    pub fn with_grid_step(mut self, step_deg: f64) -> Self {
        self.grid_step_deg = step_deg;
        self
    }

    /// Titel einer Figur, z.B. `Simple Fault Source Ruptures, M=5.0`
    pub fn title_for(&self, magnitude: f64) -> String {
        format!("{}, M={:?}", self.title_prefix, magnitude)
    }

    pub fn validate(&self) -> FaultPlotResult<()> {
        if !self.buffer_km.is_finite() || self.buffer_km < 0.0 {
            return Err(invalid(format!(
                "buffer_km must be non-negative, got {}",
                self.buffer_km
            )));
        }
        if !(self.grid_step_deg > 0.0) {
            return Err(invalid(format!(
                "grid_step_deg must be positive, got {}",
                self.grid_step_deg
            )));
        }
        if !(self.fig_width_in > 0.0 && self.fig_height_in > 0.0 && self.dpi > 0.0) {
            return Err(invalid("figure size and dpi must be positive".to_string()));
        }
        if self.fill_color.trim().is_empty() || self.trace_color.trim().is_empty() {
            return Err(invalid("colors must not be empty".to_string()));
        }
        if self.trace_width < 0.0 || self.title_font_size <= 0.0 {
            return Err(invalid("line width and font size must be positive".to_string()));
        }
        Ok(())
    }
}

/// Inhalt einer Quelldatei: Störungsquelle, optional Plot- und Kartenebenen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaultPlotFile {
    pub source: SimpleFaultParams,
    #[serde(default)]
    pub plot: PlotConfig,
    #[serde(default)]
    pub basemap: BaseMapLayers,
}

impl FaultPlotFile {
    pub fn from_toml_str(content: &str) -> FaultPlotResult<Self> {
        let file: Self = toml::from_str(content)?;
        file.source.validate()?;
        file.plot.validate()?;
        Ok(file)
    }

    pub fn load(path: impl AsRef<Path>) -> FaultPlotResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let file = Self::from_toml_str(&content)?;
        info!(path = %path.display(), source_id = %file.source.source_id, "source file loaded");
        Ok(file)
    }
}

fn invalid(message: String) -> FaultPlotError {
    FaultPlotError::InvalidConfiguration { message }
}
