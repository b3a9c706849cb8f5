// src/math/geometry/sphere/projection.rs

use crate::math::{
    error::*,
    types::*,
    utils::constants::{EARTH_RADIUS_KM, MAP_SPHERE_RADIUS_M},
};

/// Gemeinsame Schnittstelle der Kartenprojektionen
pub trait GeoProjection {
    /// Projiziert einen einzelnen Punkt (Länge, Breite in Grad)
    fn project(&self, lon: f64, lat: f64) -> Point2D;

    /// Inverse Projektion zurück in Länge/Breite
    fn unproject(&self, point: Point2D) -> GeoPoint;

    /// Projiziert parallele Längen-/Breitenfolgen, Ergebnis ebenfalls parallel
    fn project_many(&self, lons: &[f64], lats: &[f64]) -> (Vec<f64>, Vec<f64>) {
        lons.iter()
            .zip(lats)
            .map(|(&lon, &lat)| {
                let p = self.project(lon, lat);
                (p.x, p.y)
            })
            .unzip()
    }

    fn project_coords(&self, coords: impl IntoIterator<Item = Coord<f64>>) -> Vec<Point2D>
    where
        Self: Sized,
    {
        coords
            .into_iter()
            .map(|c| self.project(c.x, c.y))
            .collect()
    }
}

/// Sphärische Mercator-Projektion.
///
/// Die linke untere Ecke der Bounding Box liegt bei (0, 0), Einheit Meter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MercatorProjection {
    bounds: GeoBounds,
    radius: f64,
    y_offset: f64,
    x_max: f64,
    y_max: f64,
}

impl MercatorProjection {
    pub fn new(bounds: GeoBounds) -> FaultPlotResult<Self> {
        Self::with_radius(bounds, MAP_SPHERE_RADIUS_M)
    }

    pub fn with_radius(bounds: GeoBounds, radius: f64) -> FaultPlotResult<Self> {
        // Mercator divergiert an den Polen
        if bounds.min_lat.abs() >= 90.0 || bounds.max_lat.abs() >= 90.0 {
            return Err(FaultPlotError::GeometricFailure {
                operation: format!("Mercator projection undefined at poles ({bounds})"),
            });
        }
        if radius <= 0.0 {
            return Err(FaultPlotError::InvalidConfiguration {
                message: format!("Projection radius must be positive, got {radius}"),
            });
        }

        let y_offset = Self::mercator_y(radius, bounds.min_lat);
        let mut projection = Self {
            bounds,
            radius,
            y_offset,
            x_max: 0.0,
            y_max: 0.0,
        };
        let upper_right = projection.project(bounds.max_lon, bounds.max_lat);
        projection.x_max = upper_right.x;
        projection.y_max = upper_right.y;
        Ok(projection)
    }

    fn mercator_y(radius: f64, lat: f64) -> f64 {
        radius * (std::f64::consts::FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln()
    }

    pub fn bounds(&self) -> GeoBounds {
        self.bounds
    }

    /// Ausdehnung der Karte in Projektionskoordinaten
    pub fn map_extent(&self) -> Bounds2D {
        Bounds2D {
            min: Point2D::new(0.0, 0.0),
            max: Point2D::new(self.x_max, self.y_max),
        }
    }
}

impl GeoProjection for MercatorProjection {
    fn project(&self, lon: f64, lat: f64) -> Point2D {
        let x = self.radius * (lon - self.bounds.min_lon).to_radians();
        let y = Self::mercator_y(self.radius, lat) - self.y_offset;
        Point2D::new(x, y)
    }

    fn unproject(&self, point: Point2D) -> GeoPoint {
        let lon = self.bounds.min_lon + (point.x / self.radius).to_degrees();
        let y = (point.y + self.y_offset) / self.radius;
        let lat = (2.0 * y.exp().atan() - std::f64::consts::FRAC_PI_2).to_degrees();
        GeoPoint::new(lon, lat)
    }
}

/// Orthographische Projektion auf eine Tangentialebene (Einheit km).
///
/// Wird für Operationen benötigt, die in Kilometern rechnen (Puffer, Hüllen).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrthographicProjection {
    lon0: f64,
    lat0: f64,
}

impl OrthographicProjection {
    pub fn new(center: GeoPoint) -> Self {
        Self {
            lon0: center.longitude,
            lat0: center.latitude,
        }
    }

    /// Zentriert auf die Mitte der Bounding Box der Punkte
    pub fn from_coords<'a>(
        coords: impl IntoIterator<Item = &'a Coord<f64>>,
    ) -> FaultPlotResult<Self> {
        let (lons, lats): (Vec<f64>, Vec<f64>) =
            coords.into_iter().map(|c| (c.x, c.y)).unzip();
        let bounds = GeoBounds::from_lons_lats(&lons, &lats)?;
        Ok(Self::new(bounds.center()))
    }
}

impl GeoProjection for OrthographicProjection {
    fn project(&self, lon: f64, lat: f64) -> Point2D {
        let (phi, phi0) = (lat.to_radians(), self.lat0.to_radians());
        let dlambda = (lon - self.lon0).to_radians();
        let x = EARTH_RADIUS_KM * phi.cos() * dlambda.sin();
        let y = EARTH_RADIUS_KM
            * (phi0.cos() * phi.sin() - phi0.sin() * phi.cos() * dlambda.cos());
        Point2D::new(x, y)
    }

    fn unproject(&self, point: Point2D) -> GeoPoint {
        let rho = (point.x * point.x + point.y * point.y).sqrt();
        if rho < 1e-12 {
            return GeoPoint::new(self.lon0, self.lat0);
        }
        let phi0 = self.lat0.to_radians();
        let c = (rho / EARTH_RADIUS_KM).min(1.0).asin();
        let (sin_c, cos_c) = c.sin_cos();
        let phi = (cos_c * phi0.sin() + point.y * sin_c * phi0.cos() / rho).asin();
        let lambda =
            (point.x * sin_c).atan2(rho * cos_c * phi0.cos() - point.y * sin_c * phi0.sin());
        GeoPoint::new(self.lon0 + lambda.to_degrees(), phi.to_degrees())
    }
}
