//! diagnostics::bootstrap — parametric bootstrap envelopes for the ACF.
//!
//! Purpose
//! -------
//! Judge whether the observed autocorrelation structure is consistent with a
//! fitted count model. The fitted process is simulated `B` times at the
//! observed length, the sample ACF of each replicate is collected into a
//! `B × L` matrix, and per-lag empirical `(α/2, 1 − α/2)` quantiles give the
//! acceptance envelope.
//!
//! Key behaviors
//! -------------
//! - Options are validated before any simulation runs.
//! - Replicates run in parallel on the rayon pool. Replicate `b` owns
//!   `StdRng::seed_from_u64(seed + b)`, so results do not depend on thread
//!   scheduling.
//! - Constant-rate models discard a burn-in (10 steps by default);
//!   regression models follow the observed covariate rows without burn-in.
//! - Quantiles interpolate linearly between order statistics (type 7), so
//!   bands are monotone in `α` for a fixed replicate set.
//!
//! Conventions
//! -----------
//! - Lags are reported 1-based; `lower[k − 1]` is the band at lag `k`.
//! - The replicate matrix is kept so that [`BootstrapResult::bands`] can
//!   recompute envelopes at other levels without re-simulating.
use crate::{
    counts::{core::simulate::simulate_with_rng, errors::CountResult, models::FittedModel},
    diagnostics::{
        acf::{has_variance, sample_acf},
        errors::{DiagError, DiagResult},
        validation::{validate_alpha, validate_lags, validate_replicates},
    },
};
use ndarray::{Array1, Array2};
use rand::{rngs::StdRng, SeedableRng};
use rayon::prelude::*;
use std::time::{Duration, Instant};

/// Bootstrap configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BootstrapOptions {
    /// Number of simulated replicates `B`.
    pub replicates: usize,
    /// Number of ACF lags `L`; must be below the series length.
    pub lags: usize,
    /// Two-sided significance level of the envelope.
    pub alpha: f64,
    /// Simulated steps discarded per replicate (constant-rate models only).
    pub burn_in: usize,
    /// Base seed; replicate `b` uses `seed + b`.
    pub seed: u64,
}

impl BootstrapOptions {
    pub fn new(replicates: usize, lags: usize, alpha: f64) -> BootstrapOptions {
        BootstrapOptions { replicates, lags, alpha, ..BootstrapOptions::default() }
    }

    pub fn with_seed(self, seed: u64) -> BootstrapOptions {
        BootstrapOptions { seed, ..self }
    }
}

impl Default for BootstrapOptions {
    fn default() -> Self {
        BootstrapOptions { replicates: 500, lags: 10, alpha: 0.05, burn_in: 10, seed: 42 }
    }
}

/// One row of the envelope table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AcfRow {
    pub lag: usize,
    pub observed_acf: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Bootstrap envelope for the sample ACF.
#[derive(Debug, Clone, PartialEq)]
pub struct BootstrapResult {
    pub observed: Array1<f64>,
    pub lower: Array1<f64>,
    pub upper: Array1<f64>,
    /// `B × L` replicate autocorrelations.
    pub replicates: Array2<f64>,
    pub alpha: f64,
    pub n_replicates: usize,
    /// Wall-clock time spent simulating and summarizing.
    pub duration: Duration,
}

impl BootstrapResult {
    pub fn n_lags(&self) -> usize {
        self.observed.len()
    }

    /// Envelope at another significance level from the same replicates.
    ///
    /// # Errors
    /// [`DiagError::InvalidAlpha`] unless `alpha ∈ (0, 1)`.
    pub fn bands(&self, alpha: f64) -> DiagResult<(Array1<f64>, Array1<f64>)> {
        let alpha = validate_alpha(alpha)?;
        Ok(envelope(&self.replicates, alpha))
    }

    /// `(lag, observed_acf, lower, upper)` rows, lag 1 first.
    pub fn table(&self) -> Vec<AcfRow> {
        (0..self.n_lags())
            .map(|k| AcfRow {
                lag: k + 1,
                observed_acf: self.observed[k],
                lower: self.lower[k],
                upper: self.upper[k],
            })
            .collect()
    }
}

/// Parametric bootstrap envelope for the ACF of `fitted`'s series.
///
/// # Errors
/// - Option violations ([`DiagError::InvalidAlpha`],
///   [`DiagError::InvalidReplicates`], [`DiagError::InvalidLags`]).
/// - [`DiagError::ConstantSeries`] when the observed ACF is undefined.
/// - Simulation failures wrapped in [`DiagError::Model`].
pub fn bootstrap_acf(fitted: &FittedModel, opts: &BootstrapOptions) -> DiagResult<BootstrapResult> {
    let data = fitted.data();
    let n = data.len();
    let alpha = validate_alpha(opts.alpha)?;
    let n_rep = validate_replicates(opts.replicates)?;
    let lags = validate_lags(opts.lags, n)?;
    let series = data.as_f64();
    if !has_variance(series.view()) {
        return Err(DiagError::ConstantSeries);
    }

    let start = Instant::now();
    let observed = sample_acf(series.view(), lags);
    let density = fitted.spec().density();
    let covariates = data.covariates();
    let burn_in = if covariates.is_some() { 0 } else { opts.burn_in };
    let rows = (0..n_rep)
        .into_par_iter()
        .map(|b| -> CountResult<Array1<f64>> {
            let mut rng = StdRng::seed_from_u64(opts.seed.wrapping_add(b as u64));
            let path = simulate_with_rng(
                density.as_ref(),
                fitted.params(),
                n,
                covariates,
                burn_in,
                &mut rng,
            )?;
            let path: Array1<f64> = path.iter().map(|&c| c as f64).collect();
            Ok(sample_acf(path.view(), lags))
        })
        .collect::<CountResult<Vec<_>>>()?;
    let replicates = Array2::from_shape_fn((n_rep, lags), |(b, k)| rows[b][k]);
    let (lower, upper) = envelope(&replicates, alpha);

    Ok(BootstrapResult {
        observed,
        lower,
        upper,
        replicates,
        alpha,
        n_replicates: n_rep,
        duration: start.elapsed(),
    })
}

fn envelope(replicates: &Array2<f64>, alpha: f64) -> (Array1<f64>, Array1<f64>) {
    let lags = replicates.ncols();
    let mut lower = Array1::<f64>::zeros(lags);
    let mut upper = Array1::<f64>::zeros(lags);
    for (k, column) in replicates.columns().into_iter().enumerate() {
        let mut sorted = column.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        lower[k] = quantile_sorted(&sorted, alpha / 2.0);
        upper[k] = quantile_sorted(&sorted, 1.0 - alpha / 2.0);
    }
    (lower, upper)
}

/// Type-7 quantile of an ascending, non-empty slice.
fn quantile_sorted(sorted: &[f64], p: f64) -> f64 {
    let h = (sorted.len() - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counts::core::{
        data::CountData,
        options::SimOptions,
        params::CountParams,
        simulate::simulate,
        spec::{Family, Link, ModelSpec, Order},
    };
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array2};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Type-7 quantiles.
    // - Option validation before simulation.
    // - Determinism, shapes and α-monotonicity of the envelope.
    // - The covariate path: no burn-in, rates following the observed rows.
    // -------------------------------------------------------------------------

    fn fitted_ar1() -> FittedModel {
        let spec = ModelSpec::new(Family::Poisson, Order::One);
        let params = CountParams::new(spec, array![2.0, 0.5]).expect("valid");
        let path = simulate(spec, &params, 200, None, &SimOptions::new(Some(1), 50)).expect("sim");
        let data = CountData::from_counts(path, None).expect("ok");
        FittedModel::from_parts(params, data).expect("fitted")
    }

    fn fitted_gp2_regression() -> FittedModel {
        let n = 300;
        let spec =
            ModelSpec::with_covariates(Family::GeneralizedPoisson, Order::Two, 2, Link::Log);
        let params =
            CountParams::new(spec, array![0.3, 0.15, 0.1, 0.2, 0.3, 0.5]).expect("valid");
        let x = Array2::from_shape_fn((n, 2), |(t, j)| {
            if j == 0 {
                1.0
            } else {
                (t as f64 / 20.0).sin()
            }
        });
        let opts = SimOptions::new(Some(4), 0);
        let path = simulate(spec, &params, n, Some(&x), &opts).expect("sim");
        let data = CountData::from_counts(path, Some(x)).expect("ok");
        FittedModel::from_parts(params, data).expect("fitted")
    }

    #[test]
    // Purpose
    // -------
    // Type-7 quantiles interpolate between order statistics.
    //
    // Given
    // -----
    // - sorted = (1, 2, 3, 4, 5).
    //
    // Expect
    // ------
    // - q(0) = 1, q(0.5) = 3, q(0.1) = 1.4, q(1) = 5.
    fn quantile_type7() {
        let v = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_abs_diff_eq!(quantile_sorted(&v, 0.0), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(quantile_sorted(&v, 0.5), 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(quantile_sorted(&v, 0.1), 1.4, epsilon = 1e-12);
        assert_abs_diff_eq!(quantile_sorted(&v, 1.0), 5.0, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Invalid options and a constant series fail before simulation.
    //
    // Given
    // -----
    // - alpha = 1, replicates = 0, lags = T, and a constant series.
    //
    // Expect
    // ------
    // - The matching `DiagError` variants.
    fn invalid_configurations_are_rejected() {
        // Arrange
        let fitted = fitted_ar1();
        let spec = ModelSpec::new(Family::Poisson, Order::One);
        let params = CountParams::new(spec, array![2.0, 0.5]).expect("valid");
        let flat = CountData::from_counts(vec![2; 30], None).expect("ok");
        let flat_fit = FittedModel::from_parts(params, flat).expect("fitted");

        // Act / Assert
        assert_eq!(
            bootstrap_acf(&fitted, &BootstrapOptions::new(10, 5, 1.0)),
            Err(DiagError::InvalidAlpha { alpha: 1.0 })
        );
        assert_eq!(
            bootstrap_acf(&fitted, &BootstrapOptions::new(0, 5, 0.05)),
            Err(DiagError::InvalidReplicates { replicates: 0 })
        );
        assert_eq!(
            bootstrap_acf(&fitted, &BootstrapOptions::new(10, 200, 0.05)),
            Err(DiagError::InvalidLags { lags: 200, len: 200 })
        );
        assert_eq!(
            bootstrap_acf(&flat_fit, &BootstrapOptions::new(10, 5, 0.05)),
            Err(DiagError::ConstantSeries)
        );
    }

    #[test]
    // Purpose
    // -------
    // Equal seeds give identical envelopes regardless of scheduling.
    //
    // Given
    // -----
    // - 200 replicates, 5 lags, alpha 0.05, seed 7, twice.
    //
    // Expect
    // ------
    // - Identical replicate matrices, shape 200 × 5, lower ≤ upper.
    fn envelope_is_deterministic() {
        // Arrange
        let fitted = fitted_ar1();
        let opts = BootstrapOptions::new(200, 5, 0.05).with_seed(7);

        // Act
        let a = bootstrap_acf(&fitted, &opts).expect("boot");
        let b = bootstrap_acf(&fitted, &opts).expect("boot");

        // Assert
        assert_eq!(a.replicates, b.replicates);
        assert_eq!(a.replicates.dim(), (200, 5));
        assert_eq!(a.n_replicates, 200);
        assert!(a.lower.iter().zip(a.upper.iter()).all(|(l, u)| l <= u));
        let table = a.table();
        assert_eq!(table.len(), 5);
        assert_eq!(table[0].lag, 1);
    }

    #[test]
    // Purpose
    // -------
    // A smaller alpha never yields a narrower band.
    //
    // Given
    // -----
    // - One replicate set evaluated at alpha 0.2, 0.1 and 0.01.
    //
    // Expect
    // ------
    // - Nested bands at every lag.
    fn bands_are_monotone_in_alpha() {
        // Arrange
        let fitted = fitted_ar1();
        let result = bootstrap_acf(&fitted, &BootstrapOptions::new(100, 4, 0.2)).expect("boot");

        // Act
        let (l20, u20) = result.bands(0.2).expect("bands");
        let (l10, u10) = result.bands(0.1).expect("bands");
        let (l01, u01) = result.bands(0.01).expect("bands");

        // Assert
        for k in 0..4 {
            assert!(l01[k] <= l10[k] && l10[k] <= l20[k]);
            assert!(u20[k] <= u10[k] && u10[k] <= u01[k]);
        }
        assert_eq!(l20, result.lower);
    }

    #[test]
    // Purpose
    // -------
    // Regression models simulate along the observed covariate rows with no
    // burn-in, whatever the option says, and stay reproducible.
    //
    // Given
    // -----
    // - Generalized-Poisson order 2 with a log-link regression, T = 300,
    //   40 replicates, 6 lags, seed 13, burn-in 0 and 25.
    //
    // Expect
    // ------
    // - Identical replicate matrices for both burn-ins and across runs.
    // - Replicate 0 equals the ACF of a direct zero-burn-in simulation
    //   seeded with 13.
    fn covariate_path_ignores_burn_in() {
        // Arrange
        let fitted = fitted_gp2_regression();
        let base = BootstrapOptions::new(40, 6, 0.1).with_seed(13);
        let burned = BootstrapOptions { burn_in: 25, ..base };
        let density = fitted.spec().density();
        let mut rng = StdRng::seed_from_u64(13);
        let direct = simulate_with_rng(
            density.as_ref(),
            fitted.params(),
            300,
            fitted.data().covariates(),
            0,
            &mut rng,
        )
        .expect("sim");
        let direct: Array1<f64> = direct.iter().map(|&c| c as f64).collect();

        // Act
        let a = bootstrap_acf(&fitted, &base).expect("boot");
        let b = bootstrap_acf(&fitted, &burned).expect("boot");
        let again = bootstrap_acf(&fitted, &base).expect("boot");

        // Assert
        assert_eq!(a.replicates.dim(), (40, 6));
        assert_eq!(a.replicates, b.replicates);
        assert_eq!(a.replicates, again.replicates);
        assert_eq!(a.lower, again.lower);
        assert_eq!(a.upper, again.upper);
        assert_eq!(a.replicates.row(0), sample_acf(direct.view(), 6));
        assert_eq!(a.table().len(), 6);
    }
}
