// src/source/mfd.rs

use crate::math::error::*;
use serde::{Deserialize, Serialize};

/// Magnituden-Häufigkeitsverteilung einer Quelle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Mfd {
    /// Diskrete Magnituden `min_mag + i * bin_width` mit vorgegebenen Raten
    Incremental {
        min_mag: f64,
        bin_width: f64,
        occurrence_rates: Vec<f64>,
    },
    /// Gutenberg-Richter, abgeschnitten auf [min_mag, max_mag]
    TruncatedGr {
        min_mag: f64,
        max_mag: f64,
        bin_width: f64,
        a_val: f64,
        b_val: f64,
    },
}

impl Mfd {
    pub fn validate(&self) -> FaultPlotResult<()> {
        match self {
            Mfd::Incremental {
                bin_width,
                occurrence_rates,
                ..
            } => {
                if *bin_width <= 0.0 {
                    return Err(invalid("bin_width must be positive"));
                }
                if occurrence_rates.is_empty() {
                    return Err(invalid("incremental MFD needs at least one rate"));
                }
                if occurrence_rates.iter().any(|r| *r < 0.0 || !r.is_finite()) {
                    return Err(invalid("occurrence rates must be finite and non-negative"));
                }
            }
            Mfd::TruncatedGr {
                min_mag,
                max_mag,
                bin_width,
                b_val,
                ..
            } => {
                if *bin_width <= 0.0 {
                    return Err(invalid("bin_width must be positive"));
                }
                if min_mag > max_mag {
                    return Err(invalid("min_mag must not exceed max_mag"));
                }
                if *b_val <= 0.0 {
                    return Err(invalid("b_val must be positive"));
                }
            }
        }
        Ok(())
    }

    /// (Magnitude, jährliche Rate) je Bin, aufsteigend nach Magnitude
    pub fn annual_occurrence_rates(&self) -> Vec<(f64, f64)> {
        match self {
            Mfd::Incremental {
                min_mag,
                bin_width,
                occurrence_rates,
            } => occurrence_rates
                .iter()
                .enumerate()
                .map(|(i, &rate)| (round_mag(min_mag + i as f64 * bin_width), rate))
                .collect(),
            Mfd::TruncatedGr {
                min_mag,
                max_mag,
                bin_width,
                a_val,
                b_val,
            } => {
                let (first, num_bins) = gr_bins(*min_mag, *max_mag, *bin_width);
                (0..num_bins)
                    .map(|i| {
                        let mag = first + i as f64 * bin_width;
                        let lower = 10f64.powf(a_val - b_val * (mag - bin_width / 2.0));
                        let upper = 10f64.powf(a_val - b_val * (mag + bin_width / 2.0));
                        (round_mag(mag), lower - upper)
                    })
                    .collect()
            }
        }
    }
}

/// Erste Bin-Mitte und Anzahl Bins; Grenzen werden auf die Bin-Breite gerundet
fn gr_bins(min_mag: f64, max_mag: f64, bin_width: f64) -> (f64, usize) {
    let mut min_mag = (min_mag / bin_width).round() * bin_width;
    let mut max_mag = (max_mag / bin_width).round() * bin_width;
    if min_mag != max_mag {
        min_mag += bin_width / 2.0;
        max_mag -= bin_width / 2.0;
    }
    let num_bins = ((max_mag - min_mag) / bin_width).round() as usize + 1;
    (min_mag, num_bins)
}

// Gleitkommarauschen aus der Bin-Arithmetik entfernen
fn round_mag(mag: f64) -> f64 {
    (mag * 1e6).round() / 1e6
}

fn invalid(message: &str) -> FaultPlotError {
    FaultPlotError::InvalidConfiguration {
        message: format!("MFD: {message}"),
    }
}
