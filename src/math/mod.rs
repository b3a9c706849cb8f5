pub mod error;
pub mod geometry;
pub mod types;
pub mod utils;

// Re-exports für einfache Verwendung
pub use error::{FaultPlotError, FaultPlotResult};
pub use types::*;
