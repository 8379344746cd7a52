//! counts — INAR(1)/INAR(2) count models: core numerics, models and errors.
//!
//! Purpose
//! -------
//! Bundle the count-model stack under one namespace: data and parameter
//! types, transition densities and simulation in [`core`], maximum-likelihood
//! fitting in [`models`], and the shared error surface in [`errors`].
//!
//! Downstream usage
//! ----------------
//! 1. Build [`CountData`] from a series (and optional covariate matrix).
//! 2. Pick a [`ModelSpec`] and construct a [`CountModel`].
//! 3. Call `fit(&data)` to obtain a [`FittedModel`] with estimates, standard
//!    errors, log-likelihood, AIC and BIC.
//! 4. Hand the fitted model to [`crate::diagnostics`] for bootstrap ACF bands
//!    and predictive scoring.

pub mod core;
pub mod errors;
pub mod models;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::core::{
    simulate, CountData, CountParams, Family, FitOptions, Init, Link, ModelSpec, Order,
    SimOptions, TransitionEngine,
};
pub use self::errors::{CountError, CountResult, ErrorKind, ParamError, ParamResult};
pub use self::models::{CountModel, Estimate, FittedModel};

pub mod prelude {
    pub use super::{
        simulate, CountData, CountError, CountModel, CountParams, CountResult, ErrorKind,
        Estimate, Family, FitOptions, FittedModel, Init, Link, ModelSpec, Order, ParamError,
        SimOptions, TransitionEngine,
    };
}
