//! numerical_stability — guarded transforms for constrained count-model parameters.
//!
//! Purpose
//! -------
//! Keep the optimizer in an unconstrained space while the likelihood only
//! ever sees admissible parameters: positive rates, thinning probabilities
//! on the open stationarity simplex, and dispersions in `[0, 1)`.
//!
//! Key behaviors
//! -------------
//! - Softplus for rates, scaled logistic for dispersion, softmax with an
//!   implicit slack for the thinning block (order 1 and order 2 alike).
//! - Vector–Jacobian products and dense Jacobians of those maps, used for
//!   analytic gradients and for the delta method.
//! - Shared tolerances: [`STATIONARITY_MARGIN`], [`LOGIT_EPS`],
//!   [`EIGEN_EPS`], [`PMF_FLOOR`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Every map is finite for finite input; no transform panics.
//! - Inverse maps clamp boundary probabilities by [`LOGIT_EPS`] so that a
//!   starting value of exactly zero dispersion still has a finite logit.
//!
//! Testing notes
//! -------------
//! - Unit tests check agreement with naïve formulas, round trips, simplex
//!   mass and finite-difference Jacobians.

pub mod transformations;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::transformations::{
    delta_method, safe_logistic, safe_logit, safe_softmax, safe_softmax_deriv, safe_softmax_inv,
    safe_softplus, safe_softplus_inv, softmax_jacobian, EIGEN_EPS, LOGIT_EPS, PMF_FLOOR,
    STATIONARITY_MARGIN,
};

pub mod prelude {
    pub use super::transformations::{
        delta_method, safe_logistic, safe_logit, safe_softmax, safe_softplus, safe_softplus_inv,
        STATIONARITY_MARGIN,
    };
}
