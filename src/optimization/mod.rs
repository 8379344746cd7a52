//! optimization — MLE stack, parameter transforms, and the optimizer error surface.
//!
//! Purpose
//! -------
//! Host the machinery the count models use to turn a conditional
//! log-likelihood into maximum-likelihood estimates: an argmin-backed
//! L-BFGS driver, the transforms between unconstrained optimizer
//! coordinates and constrained model parameters, and one error enum for
//! everything that can go wrong inside a solver run.
//!
//! Key behaviors
//! -------------
//! - `loglik_optimizer` maximizes `ℓ(θ)` by minimizing `c(θ) = -ℓ(θ)` with
//!   L-BFGS, using an analytic gradient when the model provides one and
//!   finite differences otherwise.
//! - `numerical_stability` maps θ onto positive rates, thinning simplices
//!   and dispersion intervals, and pushes θ-space covariances into model
//!   space with the delta method.
//! - `errors::OptError` collects configuration, numerical and backend
//!   failures behind `OptResult<T>`.
//!
//! Invariants & assumptions
//! ------------------------
//! - θ is unconstrained; every model-space constraint is enforced by the
//!   transforms, so the solver never needs bounds.
//! - Model evaluation failures inside the solver loop are recoverable
//!   `OptError` values and never panics.
//!
//! Conventions
//! -----------
//! - Outcomes report the log-likelihood `ℓ`, not the internal cost.
//! - Nothing here performs I/O; optimizer progress printing only exists
//!   behind the `obs_slog` feature.

pub mod errors;
pub mod loglik_optimizer;
pub mod numerical_stability;

// ---- Optional convenience prelude for downstream crates -------------------
//
//     use rust_countseries::optimization::prelude::*;

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::loglik_optimizer::prelude::*;
    pub use super::numerical_stability::prelude::*;
}
