use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the confinement crate.
#[derive(Debug, Error)]
pub enum ConfineError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Parameter(#[from] ParameterError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while preparing polygon geometry.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("polygon needs at least 2 vertices, got {count}")]
    TooFewVertices { count: usize },

    #[error("edge {index} is degenerate (length {length})")]
    DegenerateEdge { index: usize, length: f64 },

    #[error("point lies on the edge, its normal direction is unknown")]
    PointOnEdge,
}

/// Errors raised while validating a confinement space.
#[derive(Debug, Error)]
pub enum ParameterError {
    #[error("polygon is not usable in {0}D")]
    UnsupportedDimension(usize),

    #[error("polygon: file `{}' not found", path.display())]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("polygon: too few points specified in {origin} ({count})")]
    TooFewPoints { origin: String, count: usize },

    #[error("unfit polygon: consecutive points may overlap ({0})")]
    UnfitPolygon(#[source] GeometryError),

    #[error("invalid polygon height {0}")]
    InvalidHeight(f64),

    #[error("radius must be non-negative, got {0}")]
    InvalidRadius(f64),

    #[error("invalid polygon declaration: {0}")]
    Declaration(String),
}

/// Convenience type alias for results using [`ConfineError`].
pub type Result<T> = std::result::Result<T, ConfineError>;
