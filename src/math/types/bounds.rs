// src/math/types/bounds.rs

use crate::math::{error::*, types::*};
use std::fmt;

/// 2D Bounding Box (Axis-Aligned Bounding Box) in Kartenkoordinaten
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds2D {
    pub min: Point2D,
    pub max: Point2D,
}

impl Bounds2D {
    /// Breite der Bounding Box
    pub fn width(&self) -> f64 {
        (self.max.x - self.min.x).max(0.0)
    }

    /// Höhe der Bounding Box
    pub fn height(&self) -> f64 {
        (self.max.y - self.min.y).max(0.0)
    }
}

impl fmt::Display for Bounds2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bounds2D({:?} to {:?})", self.min, self.max)
    }
}

/// Geografische Bounding Box in Grad
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    pub min_lon: f64,
    pub max_lon: f64,
    pub min_lat: f64,
    pub max_lat: f64,
}

impl GeoBounds {
    pub fn new(min_lon: f64, max_lon: f64, min_lat: f64, max_lat: f64) -> FaultPlotResult<Self> {
        if min_lon > max_lon || min_lat > max_lat {
            return Err(FaultPlotError::InvalidConfiguration {
                message: format!(
                    "Invalid bounds: lon [{min_lon}, {max_lon}], lat [{min_lat}, {max_lat}]"
                ),
            });
        }
        if !(-90.0..=90.0).contains(&min_lat) || !(-90.0..=90.0).contains(&max_lat) {
            return Err(FaultPlotError::InvalidConfiguration {
                message: format!("Latitude out of range: [{min_lat}, {max_lat}]"),
            });
        }
        Ok(Self {
            min_lon,
            max_lon,
            min_lat,
            max_lat,
        })
    }

    /// Min/Max über alle Längen- und Breitengrade
    pub fn from_lons_lats(lons: &[f64], lats: &[f64]) -> FaultPlotResult<Self> {
        if lons.is_empty() || lats.is_empty() {
            return Err(FaultPlotError::InsufficientPoints {
                expected: 1,
                actual: 0,
            });
        }
        let fold = |values: &[f64]| {
            values
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                    (lo.min(v), hi.max(v))
                })
        };
        let (min_lon, max_lon) = fold(lons);
        let (min_lat, max_lat) = fold(lats);
        Self::new(min_lon, max_lon, min_lat, max_lat)
    }

    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.min_lon + self.max_lon) * 0.5,
            (self.min_lat + self.max_lat) * 0.5,
        )
    }

    /// (min_lon, max_lon, min_lat, max_lat)
    pub fn as_tuple(&self) -> (f64, f64, f64, f64) {
        (self.min_lon, self.max_lon, self.min_lat, self.max_lat)
    }
}

impl fmt::Display for GeoBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "lon [{:.4}, {:.4}] lat [{:.4}, {:.4}]",
            self.min_lon, self.max_lon, self.min_lat, self.max_lat
        )
    }
}
