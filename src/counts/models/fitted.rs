//! Fitted count models: estimates, information criteria and predictive laws.
use crate::{
    counts::{
        core::{data::CountData, params::CountParams, spec::ModelSpec},
        errors::CountResult,
        models::count_model::{check_data_for, conditional_loglik},
    },
    optimization::loglik_optimizer::OptimOutcome,
};
use ndarray::{Array1, Array2, ArrayView1};

/// One named parameter estimate.
#[derive(Debug, Clone, PartialEq)]
pub struct Estimate {
    pub name: String,
    pub value: f64,
    /// `None` when no covariance was computed.
    pub std_error: Option<f64>,
}

/// A count model evaluated at a parameter vector on a data set.
///
/// Built by [`CountModel::fit`](super::CountModel::fit), or directly from
/// user parameters with [`FittedModel::from_parts`]. Read-only after
/// construction; diagnostics consume it by reference.
///
/// - `loglik` is the conditional log-likelihood over `t ≥ order`.
/// - `aic = 2k − 2ℓ` and `bic = k ln(T) − 2ℓ` with `k` the parameter count
///   and `T` the series length.
/// - `covariance` is in model space, present only when requested at fit time.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedModel {
    params: CountParams,
    data: CountData,
    loglik: f64,
    aic: f64,
    bic: f64,
    covariance: Option<Array2<f64>>,
    outcome: Option<OptimOutcome>,
}

impl FittedModel {
    /// Assemble a fitted model from estimation output.
    ///
    /// # Errors
    /// Data incompatible with the parameters' spec.
    pub fn new(
        params: CountParams, data: CountData, loglik: f64, covariance: Option<Array2<f64>>,
        outcome: Option<OptimOutcome>,
    ) -> CountResult<Self> {
        check_data_for(params.spec(), &data)?;
        let k = params.len() as f64;
        let n = data.len() as f64;
        let aic = 2.0 * k - 2.0 * loglik;
        let bic = k * n.ln() - 2.0 * loglik;
        Ok(FittedModel { params, data, loglik, aic, bic, covariance, outcome })
    }

    /// Evaluate user-supplied parameters on `data` without optimizing.
    ///
    /// # Errors
    /// Data incompatible with the spec, or a per-time law failure.
    pub fn from_parts(params: CountParams, data: CountData) -> CountResult<Self> {
        let loglik = conditional_loglik(&params, &data)?;
        Self::new(params, data, loglik, None, None)
    }

    pub fn spec(&self) -> &ModelSpec {
        self.params.spec()
    }

    pub fn params(&self) -> &CountParams {
        &self.params
    }

    pub fn data(&self) -> &CountData {
        &self.data
    }

    pub fn loglik(&self) -> f64 {
        self.loglik
    }

    pub fn aic(&self) -> f64 {
        self.aic
    }

    pub fn bic(&self) -> f64 {
        self.bic
    }

    pub fn n_params(&self) -> usize {
        self.params.len()
    }

    pub fn covariance(&self) -> Option<&Array2<f64>> {
        self.covariance.as_ref()
    }

    /// Square roots of the covariance diagonal (negative entries clamp to 0).
    pub fn std_errors(&self) -> Option<Array1<f64>> {
        self.covariance.as_ref().map(|cov| cov.diag().mapv(|v| v.max(0.0).sqrt()))
    }

    /// Optimizer diagnostics; `None` for [`from_parts`](Self::from_parts).
    pub fn outcome(&self) -> Option<&OptimOutcome> {
        self.outcome.as_ref()
    }

    pub fn converged(&self) -> bool {
        self.outcome.as_ref().is_some_and(|o| o.converged)
    }

    /// Named estimates in layout order.
    pub fn estimates(&self) -> Vec<Estimate> {
        let se = self.std_errors();
        self.spec()
            .param_names()
            .into_iter()
            .zip(self.params.values().iter())
            .enumerate()
            .map(|(i, (name, &value))| Estimate {
                name,
                value,
                std_error: se.as_ref().map(|s| s[i]),
            })
            .collect()
    }

    /// One-step predictive pmf over `0..=max` given `history` (oldest first).
    ///
    /// # Errors
    /// History length or covariate-row errors.
    pub fn predictive_pmf(
        &self, history: &[u64], covariate_row: Option<ArrayView1<f64>>, max: u64,
    ) -> CountResult<Vec<f64>> {
        let law = self.params.law_at(covariate_row)?;
        let mut cond = self.spec().density().conditional(history, &law)?;
        Ok((0..=max).map(|x| cond.pmf(x as i64)).collect())
    }

    /// `E[X_{t} | history]`.
    ///
    /// # Errors
    /// As [`predictive_pmf`](Self::predictive_pmf).
    pub fn conditional_mean(
        &self, history: &[u64], covariate_row: Option<ArrayView1<f64>>,
    ) -> CountResult<f64> {
        let law = self.params.law_at(covariate_row)?;
        Ok(self.spec().density().conditional(history, &law)?.mean())
    }
}
