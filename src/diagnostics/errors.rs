//! diagnostics::errors — error types for bootstrap envelopes and scoring.
//!
//! Purpose
//! -------
//! Collect configuration failures of the diagnostic routines (invalid
//! significance levels, replicate and lag counts, tolerances) and wrap the
//! model-side [`CountError`] raised while simulating or evaluating the
//! fitted model.
//!
//! Conventions
//! -----------
//! - Option violations are reported before any simulation or summation runs.
//! - [`DiagError::kind`] reuses the crate-wide [`ErrorKind`] taxonomy so
//!   callers can classify failures uniformly.
use crate::counts::errors::{CountError, ErrorKind};

pub type DiagResult<T> = Result<T, DiagError>;

/// Failures of the diagnostic subsystem.
#[derive(Debug, Clone, PartialEq)]
pub enum DiagError {
    // ---- Options ----
    InvalidAlpha { alpha: f64 },
    InvalidReplicates { replicates: usize },
    InvalidLags { lags: usize, len: usize },
    InvalidTolerance { value: f64 },

    // ---- Data ----
    /// The observed series has zero variance, so its ACF is undefined.
    ConstantSeries,
    /// No time points remain after conditioning on the model order.
    NothingToScore { len: usize, order: usize },

    // ---- Model ----
    Model(CountError),
}

impl DiagError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DiagError::InvalidAlpha { .. }
            | DiagError::InvalidReplicates { .. }
            | DiagError::InvalidLags { .. }
            | DiagError::InvalidTolerance { .. } => ErrorKind::Configuration,
            DiagError::ConstantSeries | DiagError::NothingToScore { .. } => ErrorKind::Domain,
            DiagError::Model(err) => err.kind(),
        }
    }
}

impl std::error::Error for DiagError {}

impl std::fmt::Display for DiagError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiagError::InvalidAlpha { alpha } => {
                write!(f, "Invalid significance level {alpha}: must lie in (0, 1).")
            }
            DiagError::InvalidReplicates { replicates } => {
                write!(f, "Invalid replicate count {replicates}: must be positive.")
            }
            DiagError::InvalidLags { lags, len } => {
                write!(f, "Invalid lag count {lags}: must satisfy 1 ≤ lags < {len}.")
            }
            DiagError::InvalidTolerance { value } => {
                write!(f, "Invalid truncation tolerance {value}: must lie in (0, 1).")
            }
            DiagError::ConstantSeries => {
                write!(f, "Observed series is constant; its autocorrelation is undefined.")
            }
            DiagError::NothingToScore { len, order } => {
                write!(f, "Series of length {len} leaves nothing to score at order {order}.")
            }
            DiagError::Model(err) => write!(f, "{err}"),
        }
    }
}

impl From<CountError> for DiagError {
    fn from(err: CountError) -> Self {
        DiagError::Model(err)
    }
}
