//! diagnostics — goodness-of-fit checks for fitted count models.
//!
//! Purpose
//! -------
//! Evaluate a [`FittedModel`](crate::counts::FittedModel) after estimation:
//! compare its observed autocorrelations with a parametric bootstrap
//! envelope, and score its one-step predictive laws with proper scoring
//! rules.
//!
//! Key behaviors
//! -------------
//! - [`bootstrap_acf`] simulates the fitted process in parallel and returns
//!   per-lag quantile bands alongside the observed ACF.
//! - [`score`] averages logarithmic, quadratic and ranked probability scores
//!   and reports them with AIC and BIC under fixed map keys.
//!
//! Invariants & assumptions
//! ------------------------
//! - Options are validated before any work starts; violations are
//!   [`DiagError`] values of kind `Configuration`.
//! - Model-side failures are wrapped, not re-classified.

pub mod acf;
pub mod bootstrap;
pub mod errors;
pub mod scoring;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::acf::sample_acf;
pub use self::bootstrap::{bootstrap_acf, AcfRow, BootstrapOptions, BootstrapResult};
pub use self::errors::{DiagError, DiagResult};
pub use self::scoring::{score, ScoreContribution, ScoreOptions, ScoreResult};

pub mod prelude {
    pub use super::{
        bootstrap_acf, score, BootstrapOptions, BootstrapResult, DiagError, DiagResult,
        ScoreOptions, ScoreResult,
    };
}
