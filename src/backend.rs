//! backend — execution strategy for likelihood, fitting and diagnostics.
//!
//! Purpose
//! -------
//! Let callers route the heavy entry points (log-likelihood evaluation,
//! maximum-likelihood fitting, bootstrap envelopes, predictive scoring)
//! through a [`ComputeBackend`] chosen once at configuration time, instead
//! of branching inside each algorithm.
//!
//! Key behaviors
//! -------------
//! - [`NativeBackend`] delegates to the in-crate engine and is the default.
//! - Alternative backends take and return the same shapes (spec, parameter
//!   vectors, series, fitted models) and are expected to agree with the
//!   native engine within numerical tolerance.
use crate::{
    counts::{
        core::{CountData, CountParams, FitOptions, ModelSpec},
        errors::CountResult,
        models::{conditional_loglik, CountModel, FittedModel},
    },
    diagnostics::{
        bootstrap::{bootstrap_acf, BootstrapOptions, BootstrapResult},
        errors::DiagResult,
        scoring::{score, ScoreOptions, ScoreResult},
    },
};

/// Strategy interface over the compute-heavy entry points.
pub trait ComputeBackend: Send + Sync {
    /// Backend name, e.g. `"native"`.
    fn name(&self) -> &str;

    /// Exact conditional log-likelihood of `data` at `params`.
    fn loglik(&self, params: &CountParams, data: &CountData) -> CountResult<f64>;

    /// Maximum-likelihood fit of `spec` to `data`.
    fn fit(
        &self, spec: ModelSpec, data: &CountData, options: &FitOptions,
    ) -> CountResult<FittedModel>;

    /// Parametric bootstrap ACF envelope of a fitted model.
    fn bootstrap(
        &self, fitted: &FittedModel, opts: &BootstrapOptions,
    ) -> DiagResult<BootstrapResult>;

    /// Averaged predictive scores of a fitted model.
    fn score(&self, fitted: &FittedModel, opts: &ScoreOptions) -> DiagResult<ScoreResult>;
}

/// The in-crate engine.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NativeBackend;

impl ComputeBackend for NativeBackend {
    fn name(&self) -> &str {
        "native"
    }

    fn loglik(&self, params: &CountParams, data: &CountData) -> CountResult<f64> {
        conditional_loglik(params, data)
    }

    fn fit(
        &self, spec: ModelSpec, data: &CountData, options: &FitOptions,
    ) -> CountResult<FittedModel> {
        CountModel::new(spec, options.clone()).fit(data)
    }

    fn bootstrap(
        &self, fitted: &FittedModel, opts: &BootstrapOptions,
    ) -> DiagResult<BootstrapResult> {
        bootstrap_acf(fitted, opts)
    }

    fn score(&self, fitted: &FittedModel, opts: &ScoreOptions) -> DiagResult<ScoreResult> {
        score(fitted, opts)
    }
}
