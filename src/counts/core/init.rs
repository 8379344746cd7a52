//! Starting values for count-model estimation.
//!
//! Purpose
//! -------
//! Give the optimizer an admissible, data-informed starting point so that
//! L-BFGS begins inside the stationarity region and near the likelihood
//! mode.
//!
//! Key behaviors
//! -------------
//! - [`Init::Moments`] derives thinning probabilities from sample
//!   autocorrelations (Yule–Walker for order 2), the innovation mean from the
//!   sample mean, and the generalized-Poisson dispersion from the index of
//!   dispersion. Regression coefficients come from least squares of the
//!   linked per-time innovation level on the covariates.
//! - [`Init::Fixed`] takes a full model-space parameter vector and validates
//!   it against the layout. A thinning block inside `Σa < 1` but within
//!   [`STATIONARITY_MARGIN`] of the boundary is scaled back inside the
//!   margin so that it still maps to a finite θ.
//!
//! Invariants & assumptions
//! ------------------------
//! - Moment-based thinning totals are clamped into `[0.05, 0.9]`, rates are
//!   floored at `0.1` and dispersions clamped into `[0.01, 0.5]`, so the
//!   result always maps to a finite θ.
//! - The caller has already checked that the series is long enough for the
//!   model order.
use crate::{
    counts::{
        core::{
            data::CountData,
            params::CountParams,
            spec::{Family, Link, ModelSpec, Order},
        },
        errors::{CountError, CountResult},
    },
    diagnostics::acf::sample_acf,
    optimization::numerical_stability::transformations::STATIONARITY_MARGIN,
};
use nalgebra::{DMatrix, DVector};
use ndarray::{s, Array1, Array2};

const MIN_THINNING_TOTAL: f64 = 0.05;
const MAX_THINNING_TOTAL: f64 = 0.9;
const MIN_RATE: f64 = 0.1;
const MIN_DISPERSION: f64 = 0.01;
const MAX_DISPERSION: f64 = 0.5;

/// Starting-value policy for [`CountModel::fit`](crate::counts::models::CountModel::fit).
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Init {
    /// Method-of-moments starting values.
    #[default]
    Moments,
    /// Explicit model-space parameter vector in the layout order.
    Fixed(Array1<f64>),
}

/// Resolve an [`Init`] policy into validated starting parameters.
///
/// # Errors
/// - Parameter validation errors for an inadmissible `Init::Fixed` vector.
/// - [`CountError::InitFailed`] when the covariate least-squares problem
///   cannot be solved.
pub fn initial_params(spec: ModelSpec, data: &CountData, init: &Init) -> CountResult<CountParams> {
    match init {
        Init::Fixed(values) => inside_margin(CountParams::new(spec, values.clone())?),
        Init::Moments => moment_params(spec, data),
    }
}

/// Shrink a thinning block whose sum lies in `[1 − margin, 1)` to
/// `(1 − margin)²`, keeping the ratios between probabilities.
fn inside_margin(params: CountParams) -> CountResult<CountParams> {
    let block = params.spec().layout().thinning;
    let total: f64 = params.values().slice(s![block.clone()]).sum();
    let cap = (1.0 - STATIONARITY_MARGIN) * (1.0 - STATIONARITY_MARGIN);
    if total <= cap {
        return Ok(params);
    }
    let mut values = params.values().clone();
    values.slice_mut(s![block]).mapv_inplace(|a| a * cap / total);
    Ok(CountParams::new(*params.spec(), values)?)
}

fn moment_params(spec: ModelSpec, data: &CountData) -> CountResult<CountParams> {
    let series = data.as_f64();
    let n = series.len() as f64;
    let mean = series.mean().unwrap_or(0.0);
    let var = if n > 1.0 { series.var(1.0) } else { 0.0 };
    let acf = sample_acf(series.view(), spec.lags());

    let thinning = moment_thinning(spec.order, &acf);
    let total: f64 = thinning.iter().sum();
    let dispersion = match spec.family {
        Family::Poisson => 0.0,
        Family::GeneralizedPoisson => {
            let index = if mean > 0.0 { var / mean } else { 1.0 };
            (1.0 - 1.0 / index.max(1.0).sqrt()).clamp(MIN_DISPERSION, MAX_DISPERSION)
        }
    };

    let layout = spec.layout();
    let mut values = Array1::<f64>::zeros(layout.len);
    if let Some(i) = layout.rate {
        values[i] = (mean * (1.0 - total) * (1.0 - dispersion)).max(MIN_RATE);
    }
    for (i, a) in layout.thinning.clone().zip(thinning) {
        values[i] = a;
    }
    if let Some(i) = layout.dispersion {
        values[i] = dispersion;
    }
    if let Some(x) = data.covariates() {
        let scale = (1.0 - total) * (1.0 - dispersion);
        let beta = least_squares_coefficients(spec.link, x, data.counts(), scale)?;
        for (i, b) in layout.coefficients.clone().zip(beta) {
            values[i] = b;
        }
    }
    Ok(CountParams::new(spec, values)?)
}

fn moment_thinning(order: Order, acf: &Array1<f64>) -> Vec<f64> {
    match order {
        Order::One => {
            let r1 = acf.get(0).copied().unwrap_or(0.0);
            vec![r1.clamp(MIN_THINNING_TOTAL, MAX_THINNING_TOTAL)]
        }
        Order::Two => {
            let r1 = acf.get(0).copied().unwrap_or(0.0);
            let r2 = acf.get(1).copied().unwrap_or(0.0);
            let denom = (1.0 - r1 * r1).max(1e-6);
            let phi1 = r1 * (1.0 - r2) / denom;
            let phi2 = (r2 - r1 * r1) / denom;
            let total = (phi1 + phi2).clamp(MIN_THINNING_TOTAL, MAX_THINNING_TOTAL);
            let (w1, w2) = (phi1.max(0.01), phi2.max(0.01));
            let split = 0.9 * total / (w1 + w2);
            vec![w1 * split, w2 * split, 0.1 * total]
        }
    }
}

/// Least squares of `link((y_t + 0.5)·scale)` on the covariate rows.
fn least_squares_coefficients(
    link: Link, x: &Array2<f64>, counts: &[u64], scale: f64,
) -> CountResult<Vec<f64>> {
    let (rows, cols) = x.dim();
    let design = DMatrix::from_fn(rows, cols, |r, c| x[[r, c]]);
    let target =
        DVector::from_iterator(rows, counts.iter().map(|&y| link.apply((y as f64 + 0.5) * scale)));
    let beta = design
        .svd(true, true)
        .solve(&target, 1e-12)
        .map_err(|reason| CountError::InitFailed { reason: reason.to_string() })?;
    if beta.iter().any(|b| !b.is_finite()) {
        return Err(CountError::InitFailed {
            reason: "least-squares coefficients are not finite".to_string(),
        });
    }
    Ok(beta.iter().copied().collect())
}
