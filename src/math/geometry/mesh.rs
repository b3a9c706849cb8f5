// src/math/geometry/mesh.rs

use crate::math::{error::*, types::*};
use nalgebra::DMatrix;

/// Reguläres Gitter abgetasteter Flächenpunkte.
///
/// `lons`, `lats` (und optional `depths`) haben dieselbe Form; Zeile 0 ist die
/// obere Kante (entlang des Streichens), Spalte 0 die linke Kante.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    lons: DMatrix<f64>,
    lats: DMatrix<f64>,
    depths: Option<DMatrix<f64>>,
}

impl Mesh {
    pub fn new(
        lons: DMatrix<f64>,
        lats: DMatrix<f64>,
        depths: Option<DMatrix<f64>>,
    ) -> FaultPlotResult<Self> {
        if lons.shape() != lats.shape() {
            return Err(FaultPlotError::InvalidMesh {
                message: format!(
                    "lons {:?} and lats {:?} differ in shape",
                    lons.shape(),
                    lats.shape()
                ),
            });
        }
        if let Some(d) = &depths {
            if d.shape() != lons.shape() {
                return Err(FaultPlotError::InvalidMesh {
                    message: format!("depths {:?} differ from lons {:?}", d.shape(), lons.shape()),
                });
            }
        }
        if lons.nrows() == 0 || lons.ncols() == 0 {
            return Err(FaultPlotError::InvalidMesh {
                message: "mesh must contain at least one point".to_string(),
            });
        }
        Ok(Self { lons, lats, depths })
    }

    /// Baut ein Mesh aus Zeilen von Punkten
    pub fn from_points(rows: &[Vec<GeoPoint>]) -> FaultPlotResult<Self> {
        let nrows = rows.len();
        let ncols = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|r| r.len() != ncols) {
            return Err(FaultPlotError::InvalidMesh {
                message: "ragged rows".to_string(),
            });
        }
        let lons = DMatrix::from_fn(nrows, ncols, |i, j| rows[i][j].longitude);
        let lats = DMatrix::from_fn(nrows, ncols, |i, j| rows[i][j].latitude);
        let depths = DMatrix::from_fn(nrows, ncols, |i, j| rows[i][j].depth);
        Self::new(lons, lats, Some(depths))
    }

    pub fn lons(&self) -> &DMatrix<f64> {
        &self.lons
    }

    pub fn lats(&self) -> &DMatrix<f64> {
        &self.lats
    }

    /// (Zeilen, Spalten)
    pub fn shape(&self) -> (usize, usize) {
        self.lons.shape()
    }

    pub fn point(&self, row: usize, col: usize) -> GeoPoint {
        GeoPoint::with_depth(
            self.lons[(row, col)],
            self.lats[(row, col)],
            self.depths.as_ref().map_or(0.0, |d| d[(row, col)]),
        )
    }

    /// Alle Punkte als Koordinaten (Länge, Breite), zeilenweise
    pub fn coords(&self) -> Vec<Coord<f64>> {
        let (rows, cols) = self.shape();
        (0..rows)
            .flat_map(|i| (0..cols).map(move |j| (i, j)))
            .map(|(i, j)| Coord {
                x: self.lons[(i, j)],
                y: self.lats[(i, j)],
            })
            .collect()
    }

    /// Rechteckiger Ausschnitt ab (`row`, `col`) mit `nrows` × `ncols` Punkten
    pub fn submesh(
        &self,
        row: usize,
        col: usize,
        nrows: usize,
        ncols: usize,
    ) -> FaultPlotResult<Self> {
        let (rows, cols) = self.shape();
        if nrows == 0 || ncols == 0 || row + nrows > rows || col + ncols > cols {
            return Err(FaultPlotError::InvalidMesh {
                message: format!(
                    "submesh ({row}, {col}) + ({nrows}, {ncols}) outside mesh ({rows}, {cols})"
                ),
            });
        }
        let start = (row, col);
        let shape = (nrows, ncols);
        Ok(Self {
            lons: self.lons.view(start, shape).into_owned(),
            lats: self.lats.view(start, shape).into_owned(),
            depths: self.depths.as_ref().map(|d| d.view(start, shape).into_owned()),
        })
    }
}

/// Randring eines Meshes: obere Zeile links→rechts, rechte Spalte ohne die
/// obere Ecke, untere Zeile ohne die rechte Ecke rückwärts, linke Spalte ohne
/// erste und letzte Zeile von unten nach oben. Kein doppelter Schlusspunkt.
///
/// Entartete Gitter folgen denselben Ausschnittsregeln: 1×1 ergibt einen
/// Punkt, 1×M hin und zurück (2M − 1 Punkte), N×1 hinunter und bis unterhalb
/// der oberen Ecke zurück (2N − 2 Punkte).
pub fn get_mesh_boundary(mesh: &Mesh) -> (Vec<f64>, Vec<f64>) {
    (
        boundary_ring(mesh.lons()),
        boundary_ring(mesh.lats()),
    )
}

fn boundary_ring(grid: &DMatrix<f64>) -> Vec<f64> {
    let (rows, cols) = grid.shape();
    let last_row = rows - 1;
    let last_col = cols - 1;

    let top = (0..cols).map(|j| grid[(0, j)]);
    let right = (1..rows).map(|i| grid[(i, last_col)]);
    let bottom = (0..last_col).rev().map(|j| grid[(last_row, j)]);
    let left = (1..last_row).rev().map(|i| grid[(i, 0)]);

    top.chain(right).chain(bottom).chain(left).collect()
}
