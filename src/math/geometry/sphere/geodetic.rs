// src/math/geometry/sphere/geodetic.rs

use crate::math::{
    error::*,
    types::*,
    utils::{angles, constants::EARTH_RADIUS_KM},
};

/// Großkreisdistanz (Haversine) in km
pub fn geodetic_distance(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let (lon1, lat1) = (a.longitude.to_radians(), a.latitude.to_radians());
    let (lon2, lat2) = (b.longitude.to_radians(), b.latitude.to_radians());
    let h = ((lat2 - lat1) / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * ((lon2 - lon1) / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

/// Azimut von `a` nach `b` in Grad, im Uhrzeigersinn ab Nord, [0, 360)
pub fn azimuth(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let (lon1, lat1) = (a.longitude.to_radians(), a.latitude.to_radians());
    let (lon2, lat2) = (b.longitude.to_radians(), b.latitude.to_radians());
    let dlon = lon2 - lon1;
    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();
    angles::normalize_degrees(y.atan2(x).to_degrees())
}

/// Zielpunkt nach `distance_km` entlang des Großkreises mit Startazimut `azimuth_deg`.
/// Die Tiefe wird vom Ausgangspunkt übernommen.
pub fn point_at(origin: &GeoPoint, azimuth_deg: f64, distance_km: f64) -> GeoPoint {
    let lat1 = origin.latitude.to_radians();
    let lon1 = origin.longitude.to_radians();
    let az = azimuth_deg.to_radians();
    let delta = distance_km / EARTH_RADIUS_KM;

    let lat2 = (lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * az.cos()).asin();
    let lon2 = lon1
        + (az.sin() * delta.sin() * lat1.cos()).atan2(delta.cos() - lat1.sin() * lat2.sin());

    let mut lon_deg = lon2.to_degrees();
    if lon_deg > 180.0 {
        lon_deg -= 360.0;
    } else if lon_deg < -180.0 {
        lon_deg += 360.0;
    }
    GeoPoint::with_depth(lon_deg, lat2.to_degrees(), origin.depth)
}

/// Gesamtlänge einer Linie in km
pub fn line_length(line: &Line) -> f64 {
    line.points
        .windows(2)
        .map(|w| geodetic_distance(&w[0], &w[1]))
        .sum()
}

/// Mittleres Streichen einer Linie, gewichtet mit den Segmentlängen
pub fn average_azimuth(line: &Line) -> FaultPlotResult<f64> {
    if line.len() < 2 {
        return Err(FaultPlotError::InsufficientPoints {
            expected: 2,
            actual: line.len(),
        });
    }
    let (azimuths, lengths): (Vec<f64>, Vec<f64>) = line
        .points
        .windows(2)
        .map(|w| (azimuth(&w[0], &w[1]), geodetic_distance(&w[0], &w[1])))
        .unzip();
    Ok(angles::mean_azimuth(&azimuths, &lengths))
}

/// Tastet eine Linie in gleichen Abständen von `section_length` km neu ab.
///
/// Der erste Punkt bleibt erhalten; der Rest der Linie, der kürzer als
/// `section_length` ist, wird verworfen.
pub fn resample_line(line: &Line, section_length: f64) -> FaultPlotResult<Line> {
    if line.len() < 2 {
        return Err(FaultPlotError::InsufficientPoints {
            expected: 2,
            actual: line.len(),
        });
    }
    if section_length <= 0.0 {
        return Err(FaultPlotError::InvalidConfiguration {
            message: format!("Resampling distance must be positive, got {section_length}"),
        });
    }

    let mut resampled = vec![line.points[0]];
    let mut carried = 0.0;

    for segment in line.points.windows(2) {
        let (start, end) = (&segment[0], &segment[1]);
        let seg_length = geodetic_distance(start, end);
        if seg_length <= 0.0 {
            continue;
        }
        let seg_azimuth = azimuth(start, end);
        let mut offset = section_length - carried;
        while offset <= seg_length + 1e-9 {
            let t = offset / seg_length;
            let mut p = point_at(start, seg_azimuth, offset);
            p.depth = start.depth + (end.depth - start.depth) * t;
            resampled.push(p);
            offset += section_length;
        }
        carried = seg_length - (offset - section_length);
    }

    Ok(Line::new(resampled))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_one_degree_of_latitude() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 1.0);
        assert_relative_eq!(geodetic_distance(&a, &b), 111.19, epsilon = 0.01);
        assert_relative_eq!(azimuth(&a, &b), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_point_at_round_trip() {
        let origin = GeoPoint::new(10.0, 45.0);
        let target = point_at(&origin, 60.0, 25.0);
        assert_relative_eq!(geodetic_distance(&origin, &target), 25.0, epsilon = 1e-6);
        assert_relative_eq!(azimuth(&origin, &target), 60.0, epsilon = 1e-6);
    }

    #[test]
    fn test_resample_line_spacing() {
        let origin = GeoPoint::new(0.0, 0.0);
        let end = point_at(&origin, 90.0, 10.5);
        let line = Line::new(vec![origin, end]);
        let resampled = resample_line(&line, 2.0).unwrap();
        // 0, 2, 4, 6, 8, 10 km
        assert_eq!(resampled.len(), 6);
        for w in resampled.points.windows(2) {
            assert_relative_eq!(geodetic_distance(&w[0], &w[1]), 2.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_average_azimuth_of_straight_line() {
        let origin = GeoPoint::new(0.0, 0.0);
        let mid = point_at(&origin, 90.0, 5.0);
        let end = point_at(&mid, 90.0, 5.0);
        let strike = average_azimuth(&Line::new(vec![origin, mid, end])).unwrap();
        assert_relative_eq!(strike, 90.0, epsilon = 1e-3);
    }
}
