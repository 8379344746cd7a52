//! models — maximum-likelihood fitting and fitted-model summaries.
//!
//! Purpose
//! -------
//! Sit on top of `counts::core`, wiring transition densities, starting
//! values and the generic log-likelihood optimizer into a user-facing
//! fitting API.
//!
//! Key behaviors
//! -------------
//! - [`CountModel`] implements
//!   [`LogLikelihood`](crate::optimization::loglik_optimizer::LogLikelihood)
//!   with an analytic gradient and provides `fit`.
//! - [`FittedModel`] carries estimates, standard errors, log-likelihood,
//!   AIC, BIC and optimizer diagnostics, plus one-step predictive laws.
//! - [`conditional_loglik`] evaluates the exact log-likelihood at any
//!   admissible parameter vector.
//!
//! Testing notes
//! -------------
//! - Gradient checks against finite differences, seeded recovery fits and
//!   non-convergence reporting live in [`count_model`]; information criteria
//!   and predictive laws in [`fitted`].

pub mod count_model;
pub mod fitted;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::count_model::{conditional_loglik, CountModel};
pub use self::fitted::{Estimate, FittedModel};

pub mod prelude {
    pub use super::count_model::CountModel;
    pub use super::fitted::{Estimate, FittedModel};
}
