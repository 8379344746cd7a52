//! Count-model options — configuration for fitting and simulation.
//!
//! Purpose
//! -------
//! Collect the knobs for estimation ([`FitOptions`]) and simulation
//! ([`SimOptions`]) in plain data carriers, so call sites pass explicit
//! options instead of ad-hoc flags.
//!
//! Invariants & assumptions
//! ------------------------
//! - [`FitOptions`] assumes its components were validated by their own
//!   builders (`MLEOptions::new`, `Tolerances::new`); an `Init::Fixed`
//!   vector is validated against the model layout at fit time.
//! - [`SimOptions`] describes intent only; the simulator enforces length and
//!   covariate constraints.
use crate::{counts::core::init::Init, optimization::loglik_optimizer::MLEOptions};

/// Estimation configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct FitOptions {
    pub init: Init,
    pub mle_opts: MLEOptions,
    /// Compute the observed-information covariance after fitting.
    pub std_errors: bool,
}

impl FitOptions {
    pub fn new(init: Init, mle_opts: MLEOptions, std_errors: bool) -> FitOptions {
        FitOptions { init, mle_opts, std_errors }
    }
}

impl Default for FitOptions {
    fn default() -> Self {
        FitOptions { init: Init::Moments, mle_opts: MLEOptions::default(), std_errors: true }
    }
}

/// Simulation configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimOptions {
    /// `None` seeds from system entropy.
    pub seed: Option<u64>,
    /// Steps simulated and discarded before the returned path; ignored when
    /// covariates drive the rate.
    pub burn_in: usize,
}

impl SimOptions {
    pub fn new(seed: Option<u64>, burn_in: usize) -> SimOptions {
        SimOptions { seed, burn_in }
    }
}

impl Default for SimOptions {
    fn default() -> Self {
        SimOptions { seed: Some(42), burn_in: 0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::loglik_optimizer::{LineSearcher, Tolerances};
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - That constructors preserve their inputs and defaults are as documented.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // `FitOptions::new` keeps its components unchanged.
    //
    // Given
    // -----
    // - A fixed initial vector and explicit optimizer options.
    //
    // Expect
    // ------
    // - Field-by-field equality.
    fn fit_options_new_preserves_fields() {
        // Arrange
        let init = Init::Fixed(array![1.0, 0.3]);
        let tols = Tolerances::new(Some(1e-6), None, Some(100)).expect("valid tolerances");
        let mle_opts =
            MLEOptions::new(tols, LineSearcher::HagerZhang, false, Some(5)).expect("valid");

        // Act
        let opts = FitOptions::new(init.clone(), mle_opts.clone(), false);

        // Assert
        assert_eq!(opts.init, init);
        assert_eq!(opts.mle_opts, mle_opts);
        assert!(!opts.std_errors);
    }

    #[test]
    // Purpose
    // -------
    // Defaults: moment initialization with standard errors; seed 42, no burn-in.
    //
    // Given
    // -----
    // - `Default` impls.
    //
    // Expect
    // ------
    // - The documented values.
    fn defaults_are_documented_values() {
        let fit = FitOptions::default();
        let sim = SimOptions::default();
        assert_eq!(fit.init, Init::Moments);
        assert!(fit.std_errors);
        assert_eq!(sim, SimOptions::new(Some(42), 0));
    }
}
