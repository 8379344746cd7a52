//! Count data containers.
//!
//! Purpose
//! -------
//! Hold a validated count series together with an optional covariate matrix
//! aligned row for row with it. Every downstream module (likelihood,
//! simulation, diagnostics) relies on these invariants instead of
//! re-validating.
//!
//! Invariants & assumptions
//! ------------------------
//! - The series is non-empty and every entry is a non-negative integer.
//! - When present, covariates have exactly one finite row per observation.
//!
//! Conventions
//! -----------
//! - Indexing is 0-based. The history of observation `t` for a model of
//!   order `p` is `counts[t − p .. t]`, oldest first.
use crate::counts::{
    core::validation::{validate_covariates, validate_series},
    errors::{CountError, CountResult},
};
use ndarray::{Array1, Array2, ArrayView1};

/// `CountData` — validated count series plus optional covariates.
///
/// Fields
/// ------
/// - `counts`: `Vec<u64>`
///   Observed counts.
/// - `covariates`: `Option<Array2<f64>>`
///   `T × p` regressors; row `t` drives the innovation rate at time `t`.
#[derive(Debug, Clone, PartialEq)]
pub struct CountData {
    counts: Vec<u64>,
    covariates: Option<Array2<f64>>,
}

impl CountData {
    /// Validate a numeric series (and optional covariates) into counts.
    ///
    /// # Errors
    /// - [`CountError::EmptySeries`], [`CountError::NonFiniteData`],
    ///   [`CountError::NegativeCount`], [`CountError::NonIntegerCount`].
    /// - [`CountError::CovariateRowMismatch`] or
    ///   [`CountError::NonFiniteCovariate`].
    pub fn new(series: Array1<f64>, covariates: Option<Array2<f64>>) -> CountResult<Self> {
        let counts = validate_series(series.view())?;
        Self::from_counts(counts, covariates)
    }

    /// Build from counts that are already integral.
    pub fn from_counts(counts: Vec<u64>, covariates: Option<Array2<f64>>) -> CountResult<Self> {
        if counts.is_empty() {
            return Err(CountError::EmptySeries);
        }
        if let Some(x) = &covariates {
            validate_covariates(x, counts.len())?;
        }
        Ok(CountData { counts, covariates })
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn covariates(&self) -> Option<&Array2<f64>> {
        self.covariates.as_ref()
    }

    /// Covariate row `t`, if covariates are present.
    pub fn covariate_row(&self, t: usize) -> Option<ArrayView1<'_, f64>> {
        self.covariates.as_ref().map(|x| x.row(t))
    }

    /// Conditioning history of observation `t` for `lags` lags (oldest first).
    ///
    /// Requires `t >= lags`.
    pub fn history(&self, t: usize, lags: usize) -> &[u64] {
        &self.counts[t - lags..t]
    }

    /// Series as floating point, for moment computations.
    pub fn as_f64(&self) -> Array1<f64> {
        self.counts.iter().map(|&c| c as f64).collect()
    }
}
