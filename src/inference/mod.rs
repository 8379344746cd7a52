//! inference — post-estimation uncertainty for fitted count models.
//!
//! Purpose
//! -------
//! Compute the covariance of the unconstrained estimate `θ̂` from the
//! observed information. Mapping that covariance into model parameters
//! (rate, thinning, dispersion, coefficients) is the model layer's job and
//! uses [`delta_method`](crate::optimization::numerical_stability::delta_method).
//!
//! Key behaviors
//! -------------
//! - [`calc_covariance`]: `J(θ̂)⁺` from a gradient map.
//! - [`calc_standard_errors`]: square roots of its diagonal.
//! - [`pseudo_inverse`]: eigen-truncated inverse of a symmetric matrix.
//!
//! Invariants & assumptions
//! ------------------------
//! - Gradient maps are of the summed negative log-likelihood.
//! - Failures surface as
//!   [`OptError`](crate::optimization::errors::OptError); nothing here panics.

pub mod hessian;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::hessian::{calc_covariance, calc_standard_errors, pseudo_inverse};

pub mod prelude {
    pub use super::hessian::{calc_covariance, calc_standard_errors};
}
