//! loglik_optimizer — argmin-powered maximization of conditional log-likelihoods.
//!
//! Purpose
//! -------
//! Give the count models one small entry point, [`maximize`], that runs
//! L-BFGS on a user log-likelihood `ℓ(θ)` and returns an [`OptimOutcome`]
//! describing the best parameters, the attained log-likelihood and whether
//! the solver actually met its tolerance.
//!
//! Key behaviors
//! -------------
//! - [`adapter::ArgMinAdapter`] presents `c(θ) = -ℓ(θ)` and its gradient to
//!   argmin, falling back to finite differences when the model has no
//!   analytic gradient.
//! - [`builders`] assembles L-BFGS with a More–Thuente or Hager–Zhang line
//!   search and applies the configured tolerances.
//! - [`run::run_lbfgs`] executes the solver and normalizes the final state.
//! - [`finite_diff`] provides Hessians for observed-information standard
//!   errors.
//!
//! Invariants & assumptions
//! ------------------------
//! - Implementors of [`LogLikelihood`] return `ℓ(θ)` and `∇ℓ(θ)`, never the
//!   cost; the adapter owns all sign flips.
//! - θ is unconstrained; the model layer maps it into its parameter domain.
//! - `OptimOutcome::converged` is true only when argmin terminated because
//!   the solver converged (or reached a target cost); running out of
//!   iterations is not convergence.
//!
//! Conventions
//! -----------
//! - Canonical numeric aliases live in [`types`].
//! - All fallible calls return [`OptResult`](crate::optimization::errors::OptResult).
//!
//! Testing notes
//! -------------
//! - Unit tests cover option validation, solver construction, adapter sign
//!   conventions, finite-difference helpers and a quadratic toy maximization.
//! - The count-model integration tests drive [`maximize`] end to end.

pub mod adapter;
pub mod api;
pub mod builders;
pub mod finite_diff;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::maximize;
pub use self::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances};
pub use self::types::{Cost, FnEvalMap, Grad, Theta, DEFAULT_LBFGS_MEM};

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::api::maximize;
    pub use super::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances};
    pub use super::types::{Cost, Grad, Theta};
}
