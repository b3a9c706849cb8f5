// src/math/geometry/polygon.rs

use crate::math::{error::*, geometry::sphere::*, types::*};
use geo::{Area, Buffer, ConvexHull, MultiPoint, MultiPolygon};

// Hüllen ohne Fläche (Punkt, gerade Linie) werden um diesen Betrag verbreitert
const DEGENERATE_HULL_WIDTH_KM: f64 = 0.005;
// Flächenschwelle in km² für "ohne Fläche"
const ZERO_AREA_KM2: f64 = 1e-9;

/// Vergrößert ein geografisches Polygon (Länge/Breite) um einen Abstand in km.
pub trait Dilate {
    fn dilate(&self, distance_km: f64) -> FaultPlotResult<Polygon<f64>>;
}

impl Dilate for Polygon<f64> {
    fn dilate(&self, distance_km: f64) -> FaultPlotResult<Polygon<f64>> {
        if !distance_km.is_finite() || distance_km < 0.0 {
            return Err(FaultPlotError::InvalidConfiguration {
                message: format!(
                    "Dilation distance must be a non-negative number, got {distance_km}"
                ),
            });
        }
        if self.exterior().0.len() < 3 {
            return Err(FaultPlotError::InsufficientPoints {
                expected: 3,
                actual: self.exterior().0.len(),
            });
        }
        if distance_km == 0.0 {
            return Ok(self.clone());
        }

        // Puffer in einer lokalen km-Ebene, danach zurück nach Länge/Breite
        let proj = OrthographicProjection::from_coords(self.exterior().coords())?;
        let local = Polygon::new(
            LineString::from(
                proj.project_coords(self.exterior().coords().copied())
                    .into_iter()
                    .map(Coord::from)
                    .collect::<Vec<_>>(),
            ),
            vec![],
        );

        let largest = largest_polygon(buffer_local(&local, distance_km), distance_km)?;
        Ok(unproject_ring(&proj, &largest))
    }
}

/// Puffer in der lokalen km-Ebene; flächenlose Polygone werden als Linie
/// bzw. Punkt gepuffert, weil der Polygonpuffer dort leer bleibt.
fn buffer_local(polygon: &Polygon<f64>, distance_km: f64) -> MultiPolygon<f64> {
    if polygon.unsigned_area() > ZERO_AREA_KM2 {
        return polygon.buffer(distance_km);
    }
    let ring = polygon.exterior();
    match ring.0.first() {
        Some(first) if ring.0.iter().all(|c| c == first) => {
            geo::Point::from(*first).buffer(distance_km)
        }
        _ => ring.buffer(distance_km),
    }
}

fn largest_polygon(
    buffered: MultiPolygon<f64>,
    distance_km: f64,
) -> FaultPlotResult<Polygon<f64>> {
    buffered
        .0
        .into_iter()
        .max_by(|a, b| a.unsigned_area().total_cmp(&b.unsigned_area()))
        .ok_or_else(|| FaultPlotError::GeometricFailure {
            operation: format!("buffer of {distance_km} km produced no polygon"),
        })
}

fn unproject_ring(proj: &OrthographicProjection, polygon: &Polygon<f64>) -> Polygon<f64> {
    let ring: Vec<Coord<f64>> = polygon
        .exterior()
        .coords()
        .map(|c| proj.unproject(Point2D::from(*c)).to_coord())
        .collect();
    Polygon::new(LineString::from(ring), vec![])
}

/// Längen und Breiten der Außenringpunkte (ohne den schließenden Punkt)
pub fn polygon_lons_lats(polygon: &Polygon<f64>) -> (Vec<f64>, Vec<f64>) {
    let coords = &polygon.exterior().0;
    let open = match (coords.first(), coords.last()) {
        (Some(first), Some(last)) if coords.len() > 1 && first == last => {
            &coords[..coords.len() - 1]
        }
        _ => &coords[..],
    };
    open.iter().map(|c| (c.x, c.y)).unzip()
}

/// Konvexe Hülle geografischer Punkte, berechnet in einer lokalen km-Ebene.
///
/// Liegen alle Punkte auf einer Linie (z.B. senkrechte Störung mit gerader
/// Spur), wird die Hülle um `DEGENERATE_HULL_WIDTH_KM` verbreitert.
pub fn convex_hull_geo(coords: &[Coord<f64>]) -> FaultPlotResult<Polygon<f64>> {
    if coords.is_empty() {
        return Err(FaultPlotError::InsufficientPoints {
            expected: 1,
            actual: 0,
        });
    }
    let proj = OrthographicProjection::from_coords(coords)?;
    let local: MultiPoint<f64> = proj
        .project_coords(coords.iter().copied())
        .into_iter()
        .map(|p| geo::Point::new(p.x, p.y))
        .collect();
    let mut hull = local.convex_hull();
    if hull.unsigned_area() <= ZERO_AREA_KM2 {
        hull = largest_polygon(
            buffer_local(&hull, DEGENERATE_HULL_WIDTH_KM),
            DEGENERATE_HULL_WIDTH_KM,
        )?;
    }
    Ok(unproject_ring(&proj, &hull))
}
