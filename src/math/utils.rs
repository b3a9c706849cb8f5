// src/math/utils.rs

/// Mathematische und geodätische Konstanten
pub mod constants {
    /// Mittlerer Erdradius in km (geodätische Hilfsfunktionen, lokale Projektion)
    pub const EARTH_RADIUS_KM: f64 = 6371.0;
    /// Kugelradius der Kartenprojektion in Metern
    pub const MAP_SPHERE_RADIUS_M: f64 = 6_370_997.0;
}

/// Winkel-Hilfsfunktionen
pub mod angles {
    /// Normalisiert einen Winkel in Grad auf [0, 360)
    pub fn normalize_degrees(angle: f64) -> f64 {
        let result = angle % 360.0;
        if result < 0.0 { result + 360.0 } else { result }
    }

    /// Mittelt Azimute über Einheitsvektoren, optional gewichtet
    pub fn mean_azimuth(azimuths: &[f64], weights: &[f64]) -> f64 {
        let (mut sx, mut sy) = (0.0, 0.0);
        for (i, az) in azimuths.iter().enumerate() {
            let w = weights.get(i).copied().unwrap_or(1.0);
            let rad = az.to_radians();
            sx += w * rad.sin();
            sy += w * rad.cos();
        }
        normalize_degrees(sx.atan2(sy).to_degrees())
    }
}

/// Zahlenformatierung wie `%g` (sechs signifikante Stellen, ohne Nullen am Ende)
pub mod format {
    pub fn general(value: f64) -> String {
        if value == 0.0 {
            return "0".to_string();
        }
        let exponent = value.abs().log10().floor() as i32;
        if !(-5..6).contains(&exponent) {
            let s = format!("{:.5e}", value);
            return match s.split_once('e') {
                Some((mantissa, exp)) => {
                    let mantissa = trim_zeros(mantissa);
                    let exp: i32 = exp.parse().unwrap_or(0);
                    let sign = if exp < 0 { '-' } else { '+' };
                    format!("{mantissa}e{sign}{:02}", exp.abs())
                }
                None => s,
            };
        }
        let decimals = (5 - exponent).max(0) as usize;
        trim_zeros(&format!("{:.*}", decimals, value)).to_string()
    }

    fn trim_zeros(s: &str) -> &str {
        if s.contains('.') {
            s.trim_end_matches('0').trim_end_matches('.')
        } else {
            s
        }
    }
}
