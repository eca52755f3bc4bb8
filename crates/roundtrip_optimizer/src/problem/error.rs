use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidStopReason {
    #[error("missing id")]
    MissingId,
    #[error("missing location")]
    MissingLocation,
    #[error("coordinates are not valid WGS84 degrees")]
    InvalidCoordinates,
    #[error("time window starts after it ends")]
    WindowStartAfterEnd,
    #[error("time window starts before the shift")]
    NegativeWindow,
    #[error("service duration is negative")]
    NegativeServiceDuration,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProblemError {
    #[error("Invalid stop '{stop_id}': {reason}")]
    InvalidStop {
        stop_id: String,
        reason: InvalidStopReason,
    },

    #[error("Problem has no depot")]
    MissingDepot,

    #[error("Problem has no travel matrix")]
    MissingMatrix,

    #[error("Problem has no shift")]
    MissingShift,

    #[error("Problem has no route limits")]
    MissingLimits,

    #[error("Duplicate stop id '{0}'")]
    DuplicateStopId(String),

    #[error("Travel matrix has {actual} locations, expected {expected}")]
    MatrixSizeMismatch { expected: usize, actual: usize },

    #[error("{0} must be positive")]
    NonPositiveCap(&'static str),

    #[error("Shift ends before it starts")]
    InvalidShift,
}
