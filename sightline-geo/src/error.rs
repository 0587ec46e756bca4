//! Error and result types for geospatial operations.

use thiserror::Error;

/// Errors that can occur in coordinate transforms and geometry handling
#[derive(Debug, Error)]
pub enum GeoError {
    #[error("Unsupported coordinate system: {0}")]
    UnsupportedCrs(String),

    #[error("Projection error: {0}")]
    Projection(String),

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("WKT parse error: {0}")]
    WktParse(String),

    #[error("GeoJSON error: {0}")]
    GeoJson(String),
}

/// Result type for geospatial operations
pub type GeoResult<T> = Result<T, GeoError>;
