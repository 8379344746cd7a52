//! Innovation laws for convolution-closed count models.
//!
//! This module defines [`Innovation`], the law of the exogenous count added at
//! each time step. Both supported families are parameterized by a rate
//! `λ > 0`; the generalized Poisson adds a dispersion `η ∈ [0, 1)` and reduces
//! to the Poisson at `η = 0`.
//!
//! ## Supported distributions
//! - [`Innovation::Poisson`]: `g(k) = λᵏ e^{−λ} / k!`.
//! - [`Innovation::GeneralizedPoisson`]:
//!   `g(k) = λ (λ + ηk)^{k−1} e^{−λ−ηk} / k!`.
//!
//! ## Numerics
//! - Point masses are evaluated in the log domain with `ln k!` from statrs,
//!   so large rates and counts neither overflow nor underflow prematurely.
//! - The Poisson cdf uses the regularized upper incomplete gamma function;
//!   the generalized Poisson cdf is a finite running sum.
//! - Sampling uses `rand_distr::Poisson` or inversion for the generalized
//!   Poisson.
use crate::counts::{
    core::{
        truncation::MAX_SUPPORT_TERMS,
        validation::{validate_dispersion, validate_rate},
    },
    errors::{CountError, CountResult},
};
use rand::Rng;
use rand_distr::{Distribution, Poisson as PoissonSampler};
use statrs::function::{factorial::ln_factorial, gamma::gamma_ur};

/// Innovation law of a count model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Innovation {
    /// Poisson innovations with rate λ > 0.
    Poisson { rate: f64 },
    /// Generalized Poisson innovations with rate λ > 0 and dispersion η ∈ [0, 1).
    GeneralizedPoisson { rate: f64, dispersion: f64 },
}

impl Innovation {
    /// Poisson innovations.
    ///
    /// # Errors
    /// [`ParamError::InvalidRate`](crate::counts::errors::ParamError::InvalidRate)
    /// unless `rate` is finite and > 0.
    pub fn poisson(rate: f64) -> CountResult<Self> {
        let rate = validate_rate(rate)?;
        Ok(Innovation::Poisson { rate })
    }

    /// Generalized Poisson innovations.
    ///
    /// # Errors
    /// Invalid rate, or dispersion outside `[0, 1)`.
    pub fn generalized_poisson(rate: f64, dispersion: f64) -> CountResult<Self> {
        let rate = validate_rate(rate)?;
        let dispersion = validate_dispersion(dispersion)?;
        Ok(Innovation::GeneralizedPoisson { rate, dispersion })
    }

    pub fn rate(&self) -> f64 {
        match *self {
            Innovation::Poisson { rate } | Innovation::GeneralizedPoisson { rate, .. } => rate,
        }
    }

    /// Dispersion η; zero for Poisson innovations.
    pub fn dispersion(&self) -> f64 {
        match *self {
            Innovation::Poisson { .. } => 0.0,
            Innovation::GeneralizedPoisson { dispersion, .. } => dispersion,
        }
    }

    /// `ln g(k)`.
    pub fn ln_pmf(&self, k: u64) -> f64 {
        let kf = k as f64;
        match *self {
            Innovation::Poisson { rate } => kf * rate.ln() - rate - ln_factorial(k),
            Innovation::GeneralizedPoisson { rate, dispersion } => {
                let spread = rate + dispersion * kf;
                rate.ln() + (kf - 1.0) * spread.ln() - spread - ln_factorial(k)
            }
        }
    }

    /// `g(k)`, zero for negative `k`.
    pub fn pmf(&self, k: i64) -> f64 {
        if k < 0 {
            return 0.0;
        }
        self.ln_pmf(k as u64).exp()
    }

    /// `P(ε ≤ k)`, zero for negative `k`.
    pub fn cdf(&self, k: i64) -> f64 {
        if k < 0 {
            return 0.0;
        }
        match *self {
            Innovation::Poisson { rate } => gamma_ur(k as f64 + 1.0, rate),
            Innovation::GeneralizedPoisson { .. } => {
                (0..=k as u64).map(|i| self.ln_pmf(i).exp()).sum::<f64>().min(1.0)
            }
        }
    }

    /// `(∂ ln g(k)/∂λ, ∂ ln g(k)/∂η)`.
    pub fn ln_pmf_grad(&self, k: u64) -> (f64, f64) {
        let kf = k as f64;
        match *self {
            Innovation::Poisson { rate } => (kf / rate - 1.0, 0.0),
            Innovation::GeneralizedPoisson { rate, dispersion } => {
                let spread = rate + dispersion * kf;
                let d_rate = 1.0 / rate + (kf - 1.0) / spread - 1.0;
                let d_disp = kf * (kf - 1.0) / spread - kf;
                (d_rate, d_disp)
            }
        }
    }

    /// `E[ε] = λ / (1 − η)`.
    pub fn mean(&self) -> f64 {
        self.rate() / (1.0 - self.dispersion())
    }

    /// `Var[ε] = λ / (1 − η)³`.
    pub fn variance(&self) -> f64 {
        self.rate() / (1.0 - self.dispersion()).powi(3)
    }

    /// Draw one innovation.
    ///
    /// # Errors
    /// - Sampler construction failure for the Poisson branch.
    /// - [`CountError::TruncationNotReached`] if inversion exhausts its budget.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> CountResult<u64> {
        match *self {
            Innovation::Poisson { rate } => {
                let draw: f64 = PoissonSampler::new(rate)?.sample(rng);
                Ok(draw as u64)
            }
            Innovation::GeneralizedPoisson { .. } => {
                let u: f64 = rng.gen();
                let mut cum = 0.0;
                for k in 0..MAX_SUPPORT_TERMS as u64 {
                    cum += self.ln_pmf(k).exp();
                    if cum >= u {
                        return Ok(k);
                    }
                }
                Err(CountError::TruncationNotReached { terms: MAX_SUPPORT_TERMS, mass: cum })
            }
        }
    }
}
