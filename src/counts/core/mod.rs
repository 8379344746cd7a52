//! core — count data, parameters, transition densities and simulation.
//!
//! Purpose
//! -------
//! Collect the building blocks of convolution-closed INAR(1)/INAR(2) count
//! models: validated data containers, model specifications and parameter
//! layouts, innovation laws, binomial thinning, the transition density
//! engine with its truncated-sum utility, starting values, and seeded
//! simulation. Fitting and diagnostics build on top of these primitives.
//!
//! Key behaviors
//! -------------
//! - Describe a model by a [`ModelSpec`] (innovation [`Family`], [`Order`],
//!   optional covariates with a [`Link`]) and hold parameters in
//!   [`CountParams`], with an unconstrained θ-mapping for the optimizer.
//! - Evaluate `P(X_t = x | history)` through [`TransitionDensity`]
//!   implementations selected once per spec, and expose them to callers via
//!   [`TransitionEngine`].
//! - Sum countable supports to a target mass with [`sum_until_converged`].
//! - Simulate paths with [`simulate`] using seeded `StdRng` generators.
//!
//! Invariants & assumptions
//! ------------------------
//! - Counts are non-negative integers; [`CountData`] rejects anything else.
//! - Successfully constructed [`CountParams`] satisfy `λ > 0`, `a_i ∈ (0, 1)`,
//!   `Σ a < 1`, `η ∈ [0, 1)` and finite coefficients.
//! - Histories are passed oldest first and have exactly `order` entries.
//!
//! Conventions
//! -----------
//! - Parameter vectors follow [`ParamLayout`]: rate (constant-rate models
//!   only), thinning block, dispersion (generalized Poisson only), then
//!   regression coefficients.
//! - Errors are reported as [`CountResult`](crate::counts::errors::CountResult)
//!   or [`ParamResult`](crate::counts::errors::ParamResult); nothing here
//!   panics on bad data or parameters.
//!
//! Testing notes
//! -------------
//! - Unit tests in each submodule cover validation, pmf/cdf mass and
//!   moments, finite-difference gradient checks and seeded simulation.

pub mod data;
pub mod density;
pub mod init;
pub mod innovations;
pub mod options;
pub mod params;
pub mod simulate;
pub mod spec;
pub mod thinning;
pub mod truncation;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::data::CountData;
pub use self::density::{
    Ar1Density, Ar2Density, ConditionalLaw, ConditionalPmf, GenPoissonFamily, InnovationFamily,
    LawGrad, PoissonFamily, TransitionDensity, TransitionEngine,
};
pub use self::init::{initial_params, Init};
pub use self::innovations::Innovation;
pub use self::options::{FitOptions, SimOptions};
pub use self::params::CountParams;
pub use self::simulate::{simulate, simulate_with_rng};
pub use self::spec::{Family, Link, ModelSpec, Order, ParamLayout};
pub use self::thinning::Retained;
pub use self::truncation::{
    sum_until_converged, SupportTerm, TruncatedSum, DEFAULT_TOLERANCE, MAX_SUPPORT_TERMS,
};

// ---- Optional convenience prelude for downstream crates -------------------
//
//     use rust_countseries::counts::core::prelude::*;

pub mod prelude {
    pub use super::data::CountData;
    pub use super::density::{TransitionDensity, TransitionEngine};
    pub use super::init::Init;
    pub use super::options::{FitOptions, SimOptions};
    pub use super::params::CountParams;
    pub use super::simulate::simulate;
    pub use super::spec::{Family, Link, ModelSpec, Order};
}
