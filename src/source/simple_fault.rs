// src/source/simple_fault.rs

use super::{FaultSource, Mfd, MagnitudeScaling, Rupture, Surface};
use crate::math::{
    error::*,
    geometry::{Mesh, convex_hull_geo, sphere::*},
    types::*,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Parameter einer einfachen Störungsquelle (so wie sie in der Konfiguration stehen)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleFaultParams {
    pub source_id: String,
    #[serde(default)]
    pub name: String,
    pub fault_trace: Line,
    pub upper_seismogenic_depth: f64,
    pub lower_seismogenic_depth: f64,
    pub dip: f64,
    #[serde(default)]
    pub rake: f64,
    pub rupture_mesh_spacing: f64,
    #[serde(default = "default_aspect_ratio")]
    pub rupture_aspect_ratio: f64,
    #[serde(default)]
    pub magnitude_scaling: MagnitudeScaling,
    pub mfd: Mfd,
}

fn default_aspect_ratio() -> f64 {
    1.0
}

impl SimpleFaultParams {
    pub fn validate(&self) -> FaultPlotResult<()> {
        if self.fault_trace.len() < 2 {
            return Err(FaultPlotError::InsufficientPoints {
                expected: 2,
                actual: self.fault_trace.len(),
            });
        }
        if !(self.dip > 0.0 && self.dip <= 90.0) {
            return Err(invalid(format!("dip must be in (0, 90], got {}", self.dip)));
        }
        if self.upper_seismogenic_depth < 0.0 {
            return Err(invalid("upper seismogenic depth must be non-negative".to_string()));
        }
        if self.lower_seismogenic_depth <= self.upper_seismogenic_depth {
            return Err(invalid(format!(
                "lower seismogenic depth {} must be below upper depth {}",
                self.lower_seismogenic_depth, self.upper_seismogenic_depth
            )));
        }
        if self.rupture_mesh_spacing <= 0.0 {
            return Err(invalid("rupture mesh spacing must be positive".to_string()));
        }
        if self.rupture_aspect_ratio <= 0.0 {
            return Err(invalid("rupture aspect ratio must be positive".to_string()));
        }
        self.mfd.validate()
    }
}

/// Einfache Störungsquelle: ebene Störungsfläche unter einer Spur, konstante
/// Neigung zwischen oberer und unterer seismogener Tiefe, frei schwimmende
/// Brüche je Magnitude.
#[derive(Debug, Clone)]
pub struct SimpleFaultSource {
    params: SimpleFaultParams,
    mesh: Mesh,
    polygon: Polygon<f64>,
}

impl SimpleFaultSource {
    pub fn new(params: SimpleFaultParams) -> FaultPlotResult<Self> {
        params.validate()?;
        let mesh = build_fault_mesh(&params)?;
        let polygon = convex_hull_geo(&mesh.coords())?;
        debug!(
            source_id = %params.source_id,
            shape = ?mesh.shape(),
            "fault surface mesh built"
        );
        Ok(Self {
            params,
            mesh,
            polygon,
        })
    }

    /// Mesh der gesamten Störungsfläche
    pub fn surface_mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Bruchabmessungen in Mesh-Punkten (Spalten, Zeilen)
    fn rupture_dimensions(&self, mag: f64) -> (usize, usize) {
        let spacing = self.params.rupture_mesh_spacing;
        let (rows, cols) = self.mesh.shape();
        let fault_length = (cols - 1) as f64 * spacing;
        let fault_width = (rows - 1) as f64 * spacing;

        let area = self
            .params
            .magnitude_scaling
            .median_area(mag, self.params.rake);
        let mut rup_length = (area * self.params.rupture_aspect_ratio).sqrt();
        let mut rup_width = area / rup_length;
        if rup_width > fault_width {
            rup_width = fault_width;
            rup_length = area / rup_width;
        }
        rup_length = rup_length.min(fault_length);

        let rup_cols = (rup_length / spacing).round() as usize + 1;
        let rup_rows = (rup_width / spacing).round() as usize + 1;
        (rup_cols.min(cols), rup_rows.min(rows))
    }
}

impl FaultSource for SimpleFaultSource {
    fn polygon(&self) -> FaultPlotResult<Polygon<f64>> {
        Ok(self.polygon.clone())
    }

    fn iter_ruptures(&self) -> impl Iterator<Item = Rupture> + '_ {
        let (mesh_rows, mesh_cols) = self.mesh.shape();
        self.params
            .mfd
            .annual_occurrence_rates()
            .into_iter()
            .flat_map(move |(mag, mag_rate)| {
                let (rup_cols, rup_rows) = self.rupture_dimensions(mag);
                let along_length = mesh_cols - rup_cols + 1;
                let along_width = mesh_rows - rup_rows + 1;
                let rate = mag_rate / (along_length * along_width) as f64;

                (0..along_width)
                    .flat_map(move |row| (0..along_length).map(move |col| (row, col)))
                    .filter_map(move |(row, col)| {
                        let mesh = self.mesh.submesh(row, col, rup_rows, rup_cols).ok()?;
                        Some(Rupture {
                            mag,
                            rake: self.params.rake,
                            occurrence_rate: rate,
                            surface: Surface::new(mesh),
                        })
                    })
            })
    }

    fn fault_trace(&self) -> &Line {
        &self.params.fault_trace
    }

    fn source_id(&self) -> &str {
        &self.params.source_id
    }
}

/// Baut das Flächen-Mesh: Spur neu abtasten, dann Zeilen im Abstand
/// `rupture_mesh_spacing` entlang des Fallens nach unten legen.
fn build_fault_mesh(params: &SimpleFaultParams) -> FaultPlotResult<Mesh> {
    let spacing = params.rupture_mesh_spacing;
    let dip = params.dip.to_radians();
    let usd = params.upper_seismogenic_depth;
    let lsd = params.lower_seismogenic_depth;

    let strike = average_azimuth(&params.fault_trace)?;
    let dip_direction = (strike + 90.0) % 360.0;

    let trace = resample_line(&params.fault_trace, spacing)?;
    if trace.len() < 2 {
        return Err(invalid(format!(
            "mesh spacing {spacing} km too large for fault trace of {:.2} km",
            line_length(&params.fault_trace)
        )));
    }

    // Oberkante: Spur entlang der Fallrichtung auf die obere Tiefe verschoben
    let top_offset = if params.dip < 90.0 { usd / dip.tan() } else { 0.0 };
    let top_edge: Vec<GeoPoint> = trace
        .points
        .iter()
        .map(|p| {
            let mut q = point_at(p, dip_direction, top_offset);
            q.depth = usd;
            q
        })
        .collect();

    let down_dip_width = (lsd - usd) / dip.sin();
    let num_rows = (down_dip_width / spacing + 1e-9).floor() as usize + 1;
    if num_rows < 2 {
        return Err(invalid(format!(
            "mesh spacing {spacing} km too large for down-dip width of {down_dip_width:.2} km"
        )));
    }

    let rows: Vec<Vec<GeoPoint>> = (0..num_rows)
        .map(|k| {
            let along_dip = k as f64 * spacing;
            let horizontal = along_dip * dip.cos();
            let vertical = along_dip * dip.sin();
            top_edge
                .iter()
                .map(|p| {
                    let mut q = point_at(p, dip_direction, horizontal);
                    q.depth = usd + vertical;
                    q
                })
                .collect()
        })
        .collect();

    Mesh::from_points(&rows)
}

fn invalid(message: String) -> FaultPlotError {
    FaultPlotError::InvalidConfiguration { message }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geo::Area;

    fn params(mfd: Mfd) -> SimpleFaultParams {
        let start = GeoPoint::new(10.0, 45.0);
        let end = point_at(&start, 90.0, 20.0);
        SimpleFaultParams {
            source_id: "sfs".to_string(),
            name: "test fault".to_string(),
            fault_trace: Line::new(vec![start, end]),
            upper_seismogenic_depth: 0.0,
            lower_seismogenic_depth: 10.0,
            dip: 90.0,
            rake: 0.0,
            rupture_mesh_spacing: 2.0,
            rupture_aspect_ratio: 1.0,
            magnitude_scaling: MagnitudeScaling::Peer,
            mfd,
        }
    }

    fn incremental(min_mag: f64, bin_width: f64, rates: &[f64]) -> Mfd {
        Mfd::Incremental {
            min_mag,
            bin_width,
            occurrence_rates: rates.to_vec(),
        }
    }

    #[test]
    fn test_vertical_fault_mesh_shape() {
        let source = SimpleFaultSource::new(params(incremental(5.0, 0.5, &[1.0]))).unwrap();
        // 20 km / 2 km -> 11 Spalten, 10 km / 2 km -> 6 Zeilen
        assert_eq!(source.surface_mesh().shape(), (6, 11));
        let bottom = source.surface_mesh().point(5, 0);
        assert_relative_eq!(bottom.depth, 10.0, epsilon = 1e-9);
        // senkrechte Störung: Unterkante liegt unter der Spur
        assert_relative_eq!(bottom.longitude, 10.0, epsilon = 1e-9);
        assert_relative_eq!(bottom.latitude, 45.0, epsilon = 1e-9);
    }

    #[test]
    fn test_dipping_fault_moves_down_dip() {
        let mut p = params(incremental(5.0, 0.5, &[1.0]));
        p.dip = 45.0;
        let source = SimpleFaultSource::new(p).unwrap();
        let (rows, _) = source.surface_mesh().shape();
        let top = source.surface_mesh().point(0, 0);
        let bottom = source.surface_mesh().point(rows - 1, 0);
        // Streichen Ost -> Fallrichtung Süd
        assert!(bottom.latitude < top.latitude);
        assert!(bottom.depth > top.depth);
    }

    #[test]
    fn test_floating_rupture_count_and_rates() {
        // Peer: M5 -> 10 km², Seitenlänge ~3.16 km -> 3x3 Mesh-Punkte
        let source = SimpleFaultSource::new(params(incremental(5.0, 1.0, &[0.9]))).unwrap();
        let ruptures: Vec<Rupture> = source.iter_ruptures().collect();
        // (11 - 3 + 1) * (6 - 3 + 1)
        assert_eq!(ruptures.len(), 36);
        assert!(ruptures.iter().all(|r| r.surface.mesh.shape() == (3, 3)));
        let total: f64 = ruptures.iter().map(|r| r.occurrence_rate).sum();
        assert_relative_eq!(total, 0.9, epsilon = 1e-12);
    }

    #[test]
    fn test_large_rupture_clamped_to_fault() {
        // M7 -> 1000 km², größer als die Störung (20 x 10 km)
        let source = SimpleFaultSource::new(params(incremental(7.0, 1.0, &[0.1]))).unwrap();
        let ruptures: Vec<Rupture> = source.iter_ruptures().collect();
        assert_eq!(ruptures.len(), 1);
        assert_eq!(ruptures[0].surface.mesh.shape(), (6, 11));
    }

    #[test]
    fn test_iter_ruptures_restartable() {
        let source =
            SimpleFaultSource::new(params(incremental(5.0, 1.0, &[0.1, 0.01]))).unwrap();
        let first = source.iter_ruptures().count();
        let second = source.iter_ruptures().count();
        assert_eq!(first, second);
        assert!(first > 0);
    }

    #[test]
    fn test_polygon_encloses_mesh() {
        let mut p = params(incremental(5.0, 1.0, &[1.0]));
        p.dip = 30.0;
        let source = SimpleFaultSource::new(p).unwrap();
        let polygon = source.polygon().unwrap();
        let (lons, lats) = crate::math::geometry::polygon_lons_lats(&polygon);
        let hull = GeoBounds::from_lons_lats(&lons, &lats).unwrap();
        let mesh = source.surface_mesh();
        let mesh_bounds =
            GeoBounds::from_lons_lats(mesh.lons().as_slice(), mesh.lats().as_slice()).unwrap();
        assert_relative_eq!(hull.min_lat, mesh_bounds.min_lat, epsilon = 1e-9);
        assert_relative_eq!(hull.max_lon, mesh_bounds.max_lon, epsilon = 1e-9);
    }

    #[test]
    fn test_vertical_north_south_fault_is_plottable() {
        // senkrechte Störung mit gerader Nord-Süd-Spur: alle Mesh-Punkte kollinear
        let mut p = params(incremental(5.0, 1.0, &[1.0]));
        let start = GeoPoint::new(10.0, 45.0);
        p.fault_trace = Line::new(vec![start, point_at(&start, 0.0, 20.0)]);
        let source = SimpleFaultSource::new(p).unwrap();

        let polygon = source.polygon().unwrap();
        assert!(polygon.unsigned_area() > 0.0);

        let map = crate::plot::get_map_projection(&source).unwrap();
        assert!(map.bounds.min_lon < 10.0 && map.bounds.max_lon > 10.0);
        let figures = crate::plot::get_fault_plot(&source).unwrap();
        assert_eq!(figures.len(), 1);
    }

    #[test]
    fn test_invalid_params_rejected() {
        let mut p = params(incremental(5.0, 1.0, &[1.0]));
        p.dip = 0.0;
        assert!(SimpleFaultSource::new(p).is_err());

        let mut p = params(incremental(5.0, 1.0, &[1.0]));
        p.lower_seismogenic_depth = 0.0;
        assert!(SimpleFaultSource::new(p).is_err());

        let mut p = params(incremental(5.0, 1.0, &[1.0]));
        p.rupture_mesh_spacing = 50.0;
        assert!(SimpleFaultSource::new(p).is_err());
    }
}
