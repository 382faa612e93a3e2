//! Error types for geosplat

use thiserror::Error;

/// Broad classification of an [`Error`].
///
/// Every kind is fatal to the conversion that raised it; there is no
/// partial-result or retry path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input parameters: resolution, attribute name, bounding box
    Configuration,
    /// The sample data cannot support the requested operation
    Data,
    /// Reading or writing files failed
    Io,
}

/// Main error type for geosplat operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid raster dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Degenerate bounding box: west={west}, south={south}, east={east}, north={north}")]
    DegenerateExtent {
        west: f64,
        south: f64,
        east: f64,
        north: f64,
    },

    #[error("Index out of bounds: ({row}, {col}) in raster of size ({rows}, {cols})")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Unknown attribute '{name}' (available: {})", available.join(", "))]
    UnknownAttribute { name: String, available: Vec<String> },

    #[error("Attribute '{name}' has non-numeric value {value}")]
    InvalidAttributeValue { name: String, value: String },

    #[error("Unsupported geometry: {0}")]
    UnsupportedGeometry(String),

    #[error("Not enough sample points: {found} given, at least {required} required")]
    InsufficientPoints { required: usize, found: usize },

    #[error("Cannot scale values: minimum and maximum are both {value}")]
    ValueRangeCollapsed { value: f64 },

    #[error("Point file error: {0}")]
    Source(String),

    #[error("Raster sink error: {0}")]
    Sink(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidDimensions { .. }
            | Error::DegenerateExtent { .. }
            | Error::InvalidParameter { .. }
            | Error::UnknownAttribute { .. } => ErrorKind::Configuration,
            Error::InvalidAttributeValue { .. }
            | Error::UnsupportedGeometry(_)
            | Error::InsufficientPoints { .. }
            | Error::ValueRangeCollapsed { .. }
            | Error::IndexOutOfBounds { .. }
            | Error::Other(_) => ErrorKind::Data,
            Error::Io(_) | Error::Source(_) | Error::Sink(_) => ErrorKind::Io,
        }
    }
}

impl From<shapefile::Error> for Error {
    fn from(e: shapefile::Error) -> Self {
        Error::Source(e.to_string())
    }
}

/// Result type alias for geosplat operations
pub type Result<T> = std::result::Result<T, Error>;
