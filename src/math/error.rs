// src/math/error.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FaultPlotError {
    #[error("Insufficient points for operation: expected at least {expected}, got {actual}")]
    InsufficientPoints { expected: usize, actual: usize },

    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("Invalid mesh shape: {message}")]
    InvalidMesh { message: String },

    #[error("Geometric calculation failed: {operation}")]
    GeometricFailure { operation: String },

    #[error("Invalid magnitude value {value} at rupture index {index}")]
    InvalidMagnitude { index: usize, value: f64 },

    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type FaultPlotResult<T> = Result<T, FaultPlotError>;
