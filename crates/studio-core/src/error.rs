use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PathError {
    #[error("camera path needs at least 2 control points, got {0}")]
    TooFewPoints(usize),
    #[error("camera path has zero length")]
    ZeroLength,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f64 },
    #[error("{field} must be zero or greater, got {value}")]
    Negative { field: &'static str, value: f64 },
    #[error("{field} must be within (0, 1], got {value}")]
    OutOfUnitRange { field: &'static str, value: f64 },
}

/// Failure to turn one catalog entry into a renderable model.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LoadError {
    #[error("fetching {path} failed: {reason}")]
    Fetch { path: String, reason: String },
    #[error("could not parse {path}: {reason}")]
    Parse { path: String, reason: String },
    #[error("{path} contains no renderable geometry")]
    Empty { path: String },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("model index {index} is out of range for a catalog of {len}")]
    OutOfRange { index: usize, len: usize },
    #[error("invalid selection value {0}")]
    Invalid(i64),
    #[error("model catalog is empty")]
    EmptyCatalog,
    #[error("viewer session has been disposed")]
    Disposed,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("expected a colour of the form #rrggbb, got {0:?}")]
    Malformed(String),
}
