//! Validation helpers for count series, covariates, parameters and options.
//!
//! Every check runs at the boundary of the operation that owns the input and
//! fails before any partial computation. Nothing here clamps or coerces.
use crate::counts::errors::{CountError, CountResult, ParamError, ParamResult};
use ndarray::{Array2, ArrayView1};

/// Convert a numeric series into validated counts.
///
/// # Errors
/// - [`CountError::EmptySeries`] for an empty series.
/// - [`CountError::NonFiniteData`], [`CountError::NegativeCount`] or
///   [`CountError::NonIntegerCount`] for the first offending entry.
pub fn validate_series(series: ArrayView1<f64>) -> CountResult<Vec<u64>> {
    if series.is_empty() {
        return Err(CountError::EmptySeries);
    }
    series
        .iter()
        .enumerate()
        .map(|(index, &value)| {
            if !value.is_finite() {
                return Err(CountError::NonFiniteData { index, value });
            }
            if value < 0.0 {
                return Err(CountError::NegativeCount { index, value });
            }
            if value.fract() != 0.0 {
                return Err(CountError::NonIntegerCount { index, value });
            }
            Ok(value as u64)
        })
        .collect()
}

/// Covariates must have one finite row per observation.
pub fn validate_covariates(covariates: &Array2<f64>, len: usize) -> CountResult<()> {
    if covariates.nrows() != len {
        return Err(CountError::CovariateRowMismatch { rows: covariates.nrows(), len });
    }
    match covariates.indexed_iter().find(|(_, v)| !v.is_finite()) {
        Some(((row, col), &value)) => Err(CountError::NonFiniteCovariate { row, col, value }),
        None => Ok(()),
    }
}

/// History passed to the transition law holds exactly `order` counts.
pub fn validate_history(history: &[u64], order: usize) -> CountResult<()> {
    if history.len() != order {
        return Err(CountError::HistoryLengthMismatch { expected: order, actual: history.len() });
    }
    Ok(())
}

/// Truncation tolerance must lie in (0, 1).
pub fn validate_tolerance(tolerance: f64) -> CountResult<f64> {
    if !(tolerance > 0.0 && tolerance < 1.0) {
        return Err(CountError::InvalidTolerance { value: tolerance });
    }
    Ok(tolerance)
}

pub fn validate_rate(rate: f64) -> ParamResult<f64> {
    if !rate.is_finite() || rate <= 0.0 {
        return Err(ParamError::InvalidRate { value: rate });
    }
    Ok(rate)
}

/// Each probability in (0, 1) and their sum below one.
pub fn validate_thinning(thinning: &[f64]) -> ParamResult<()> {
    for (index, &value) in thinning.iter().enumerate() {
        if !value.is_finite() || value <= 0.0 || value >= 1.0 {
            return Err(ParamError::InvalidThinning { index, value });
        }
    }
    let coeff_sum: f64 = thinning.iter().sum();
    if coeff_sum >= 1.0 {
        return Err(ParamError::StationarityViolated { coeff_sum });
    }
    Ok(())
}

pub fn validate_dispersion(dispersion: f64) -> ParamResult<f64> {
    if !dispersion.is_finite() || !(0.0..1.0).contains(&dispersion) {
        return Err(ParamError::InvalidDispersion { value: dispersion });
    }
    Ok(dispersion)
}

pub fn validate_coefficients(coefficients: ArrayView1<f64>) -> ParamResult<()> {
    match coefficients.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        Some((index, &value)) => Err(ParamError::NonFiniteCoefficient { index, value }),
        None => Ok(()),
    }
}

/// θ has the layout length and finite entries.
pub fn validate_theta(theta: ArrayView1<f64>, expected: usize) -> ParamResult<()> {
    if theta.len() != expected {
        return Err(ParamError::ThetaLengthMismatch { expected, actual: theta.len() });
    }
    match theta.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        Some((index, &value)) => Err(ParamError::InvalidThetaInput { index, value }),
        None => Ok(()),
    }
}
