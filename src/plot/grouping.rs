// src/plot/grouping.rs

use crate::math::error::*;

/// Indizes aller Brüche mit exakt derselben Magnitude
#[derive(Debug, Clone, PartialEq)]
pub struct MagnitudeGroup {
    pub magnitude: f64,
    pub indices: Vec<usize>,
}

/// Gruppiert nach exakter Gleichheit der Magnitude, aufsteigend sortiert.
///
/// Keine Toleranz: 5.0 und 5.0000001 landen in verschiedenen Gruppen.
pub fn group_by_magnitude(mags: &[f64]) -> FaultPlotResult<Vec<MagnitudeGroup>> {
    if let Some((index, &value)) = mags.iter().enumerate().find(|(_, m)| m.is_nan()) {
        return Err(FaultPlotError::InvalidMagnitude { index, value });
    }

    let mut unique: Vec<f64> = mags.to_vec();
    unique.sort_by(f64::total_cmp);
    unique.dedup_by(|a, b| a == b);

    Ok(unique
        .into_iter()
        .map(|magnitude| MagnitudeGroup {
            magnitude,
            indices: mags
                .iter()
                .enumerate()
                .filter(|&(_, &m)| m == magnitude)
                .map(|(i, _)| i)
                .collect(),
        })
        .collect())
}
