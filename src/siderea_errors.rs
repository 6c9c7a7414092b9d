use thiserror::Error;

/// Crate-wide error type.
///
/// Every fallible operation in the engine reports one of these variants, so
/// that batch callers (e.g. scanning many dates) can continue past individual
/// failures without ever reading numeric fields from a failed computation.
#[derive(Error, Debug, Clone)]
pub enum SidereaError {
    #[error("Date or time outside the supported epoch range: {0}")]
    OutOfRange(String),

    #[error("Unknown body selector: {0}")]
    UnknownBody(i32),

    #[error("Unknown house system code: {0}")]
    UnknownHouseSystem(char),

    #[error("Unsupported flag combination: {0}")]
    InvalidFlags(String),

    #[error("Star not found in catalog: {0}")]
    StarNotFound(String),

    #[error("Star catalog file error: {0}")]
    CatalogFile(String),

    #[error("Computation failed: {0}")]
    ComputationError(String),

    #[error("Object never rises above the horizon in the search window")]
    ObjectNeverRises,

    #[error("Object stays below the visibility limit in the search window")]
    BelowVisibilityLimit,

    #[error("Heliacal search budget exhausted after {0} steps without a definite event")]
    SearchExhausted(usize),

    #[error("Unable to perform file operation: {0}")]
    IoError(String),
}

impl From<std::io::Error> for SidereaError {
    fn from(err: std::io::Error) -> Self {
        SidereaError::IoError(err.to_string())
    }
}

impl From<csv::Error> for SidereaError {
    fn from(err: csv::Error) -> Self {
        SidereaError::CatalogFile(err.to_string())
    }
}

impl PartialEq for SidereaError {
    fn eq(&self, other: &Self) -> bool {
        use SidereaError::*;
        match (self, other) {
            (OutOfRange(a), OutOfRange(b)) => a == b,
            (UnknownBody(a), UnknownBody(b)) => a == b,
            (UnknownHouseSystem(a), UnknownHouseSystem(b)) => a == b,
            (InvalidFlags(a), InvalidFlags(b)) => a == b,
            (StarNotFound(a), StarNotFound(b)) => a == b,
            (CatalogFile(a), CatalogFile(b)) => a == b,
            (ComputationError(a), ComputationError(b)) => a == b,
            (SearchExhausted(a), SearchExhausted(b)) => a == b,

            // Unit variants
            (ObjectNeverRises, ObjectNeverRises) => true,
            (BelowVisibilityLimit, BelowVisibilityLimit) => true,

            // Wrapped I/O errors compare by message
            (IoError(a), IoError(b)) => a == b,

            _ => false,
        }
    }
}
