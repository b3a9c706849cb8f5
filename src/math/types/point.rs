// src/math/types/point.rs
use geo::Coord;
use serde::{Deserialize, Serialize};

/// Punkt in Kartenkoordinaten (Meter bzw. Pixel, je nach Kontext)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point2D {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<Coord<f64>> for Point2D {
    fn from(c: Coord<f64>) -> Self {
        Self { x: c.x, y: c.y }
    }
}

impl From<Point2D> for Coord<f64> {
    fn from(p: Point2D) -> Self {
        Coord { x: p.x, y: p.y }
    }
}

/// Geografischer Punkt: Länge/Breite in Grad, Tiefe in km (positiv nach unten)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "GeoPointRepr", into = "GeoPointRepr")]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
    pub depth: f64,
}

impl GeoPoint {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
            depth: 0.0,
        }
    }

    pub fn with_depth(longitude: f64, latitude: f64, depth: f64) -> Self {
        Self {
            longitude,
            latitude,
            depth,
        }
    }

    pub fn to_coord(&self) -> Coord<f64> {
        Coord {
            x: self.longitude,
            y: self.latitude,
        }
    }
}

impl From<Coord<f64>> for GeoPoint {
    fn from(c: Coord<f64>) -> Self {
        Self::new(c.x, c.y)
    }
}

// In Konfigurationsdateien als `[lon, lat]` oder `[lon, lat, depth]`
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum GeoPointRepr {
    WithDepth([f64; 3]),
    Surface([f64; 2]),
}

impl From<GeoPointRepr> for GeoPoint {
    fn from(repr: GeoPointRepr) -> Self {
        match repr {
            GeoPointRepr::Surface([lon, lat]) => GeoPoint::new(lon, lat),
            GeoPointRepr::WithDepth([lon, lat, depth]) => GeoPoint::with_depth(lon, lat, depth),
        }
    }
}

impl From<GeoPoint> for GeoPointRepr {
    fn from(p: GeoPoint) -> Self {
        if p.depth == 0.0 {
            GeoPointRepr::Surface([p.longitude, p.latitude])
        } else {
            GeoPointRepr::WithDepth([p.longitude, p.latitude, p.depth])
        }
    }
}

/// Geordnete Punktfolge, z.B. eine Störungsspur
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Line {
    pub points: Vec<GeoPoint>,
}

impl Line {
    pub fn new(points: Vec<GeoPoint>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn lons(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.longitude).collect()
    }

    pub fn lats(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.latitude).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[derive(Deserialize)]
    struct TraceFile {
        trace: Line,
    }

    #[test]
    fn test_parse_points_with_and_without_depth() {
        let file: TraceFile =
            toml::from_str("trace = [[10.0, 45.0], [10.1, 45.05, 7.5]]").unwrap();
        assert_eq!(file.trace.len(), 2);
        assert_eq!(file.trace.points[0], GeoPoint::new(10.0, 45.0));
        assert_relative_eq!(file.trace.points[1].longitude, 10.1);
        assert_relative_eq!(file.trace.points[1].latitude, 45.05);
        assert_relative_eq!(file.trace.points[1].depth, 7.5);
    }

    #[test]
    fn test_point_with_wrong_arity_rejected() {
        assert!(toml::from_str::<TraceFile>("trace = [[10.0]]").is_err());
    }
}
