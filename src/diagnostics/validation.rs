//! diagnostics::validation — option guards for bootstrap and scoring.
//!
//! Purpose
//! -------
//! Check tuning options before any simulation or truncated summation runs,
//! so that configuration mistakes surface as [`DiagError`] values with the
//! offending input and never as partial results.
//!
//! Invariants & assumptions
//! ------------------------
//! - Significance levels and tolerances lie strictly inside `(0, 1)`.
//! - Replicate counts are positive.
//! - Lag counts satisfy `1 ≤ lags < n` for a series of length `n`.
use crate::diagnostics::errors::{DiagError, DiagResult};

pub fn validate_alpha(alpha: f64) -> DiagResult<f64> {
    if !(alpha.is_finite() && alpha > 0.0 && alpha < 1.0) {
        return Err(DiagError::InvalidAlpha { alpha });
    }
    Ok(alpha)
}

pub fn validate_replicates(replicates: usize) -> DiagResult<usize> {
    if replicates == 0 {
        return Err(DiagError::InvalidReplicates { replicates });
    }
    Ok(replicates)
}

pub fn validate_lags(lags: usize, len: usize) -> DiagResult<usize> {
    if lags == 0 || lags >= len {
        return Err(DiagError::InvalidLags { lags, len });
    }
    Ok(lags)
}

pub fn validate_tolerance(value: f64) -> DiagResult<f64> {
    if !(value.is_finite() && value > 0.0 && value < 1.0) {
        return Err(DiagError::InvalidTolerance { value });
    }
    Ok(value)
}
