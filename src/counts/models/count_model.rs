//! count_model — maximum-likelihood fitting of INAR(1)/INAR(2) count models.
//!
//! Purpose
//! -------
//! Wire the transition density engine into the generic log-likelihood
//! optimizer. [`CountModel`] implements [`LogLikelihood`] over [`CountData`]
//! with an analytic gradient in unconstrained θ-space, and [`CountModel::fit`]
//! turns an optimizer run into a [`FittedModel`] with standard errors and
//! information criteria.
//!
//! Key behaviors
//! -------------
//! - `ℓ(θ) = Σ_{t ≥ order} ln P(x_t | x_{t−order..t})`; the first `order`
//!   counts only condition.
//! - The gradient chains `∂ pmf/∂(rate, thinning, dispersion)` from the
//!   density engine through the link (for regression models) and then
//!   through the θ-transforms via [`CountParams::jacobian`].
//! - Fitting refuses to return estimates from a run that did not converge;
//!   [`CountError::ConvergenceFailed`] carries the best parameters instead.
//!
//! Invariants & assumptions
//! ------------------------
//! - Data compatibility (length, covariate presence and width) is checked
//!   before any optimizer work happens.
//! - Inside the optimizer loop point masses are floored at [`PMF_FLOOR`]
//!   before taking logs; a floored term contributes no gradient.
//!
//! Conventions
//! -----------
//! - Covariances are computed in θ-space from the observed information and
//!   mapped to model space with the delta method.
use crate::{
    counts::{
        core::{
            data::CountData,
            density::TransitionDensity,
            init::initial_params,
            options::FitOptions,
            params::CountParams,
            spec::ModelSpec,
            validation::validate_theta,
        },
        errors::{CountError, CountResult},
        models::fitted::FittedModel,
    },
    inference::hessian::calc_covariance,
    optimization::{
        errors::OptResult,
        loglik_optimizer::{maximize, Grad, LogLikelihood, OptimOutcome, Theta},
        numerical_stability::transformations::{delta_method, PMF_FLOOR},
    },
};
use ndarray::Array1;

/// INAR(1)/INAR(2) count model with analytic log-likelihood and gradient.
///
/// The transition density is selected once from `spec` at construction.
/// After a successful or failed fit, `results` holds the last optimizer
/// outcome.
#[derive(Debug)]
pub struct CountModel {
    /// Family, order and covariate layout.
    pub spec: ModelSpec,
    /// Starting values, optimizer options and standard-error switch.
    pub options: FitOptions,
    /// Optimizer outcome of the last `fit`.
    pub results: Option<OptimOutcome>,
    density: Box<dyn TransitionDensity>,
}

impl CountModel {
    pub fn new(spec: ModelSpec, options: FitOptions) -> CountModel {
        CountModel { spec, options, results: None, density: spec.density() }
    }

    pub fn density(&self) -> &dyn TransitionDensity {
        self.density.as_ref()
    }

    /// Fit by maximum likelihood.
    ///
    /// ## Steps
    /// 1. Check that `data` fits the spec (length and covariates).
    /// 2. Resolve starting values from `options.init` and map them to θ.
    /// 3. Run L-BFGS per `options.mle_opts` and store the outcome in
    ///    `self.results`.
    /// 4. Reject non-converged runs with [`CountError::ConvergenceFailed`].
    /// 5. Optionally compute the observed-information covariance and map it
    ///    to model space.
    ///
    /// ## Errors
    /// - Domain errors for incompatible data or an inadmissible fixed start.
    /// - [`CountError::ConvergenceFailed`] when the optimizer stops without
    ///   meeting its tolerances.
    /// - Optimizer and Hessian failures mapped from
    ///   [`OptError`](crate::optimization::errors::OptError).
    pub fn fit(&mut self, data: &CountData) -> CountResult<FittedModel> {
        self.check_data(data)?;
        let start = initial_params(self.spec, data, &self.options.init)?;
        let theta0 = start.to_theta()?;
        let outcome = maximize(&*self, theta0, data, &self.options.mle_opts)?;
        self.results = Some(outcome.clone());

        let params = CountParams::from_theta(self.spec, outcome.theta_hat.view())?;
        if !outcome.converged {
            return Err(CountError::ConvergenceFailed {
                status: outcome.status,
                best_params: params.values().to_vec(),
                loglik: outcome.value,
            });
        }

        let covariance = if self.options.std_errors {
            let n = outcome.theta_hat.len();
            let neg_grad = |theta: &Array1<f64>| match self.grad(theta, data) {
                Ok(g) => -g,
                Err(_) => Array1::from_elem(n, f64::NAN),
            };
            let cov_theta = calc_covariance(&neg_grad, &outcome.theta_hat)?;
            Some(delta_method(&params.jacobian(), &cov_theta))
        } else {
            None
        };
        FittedModel::new(params, data.clone(), outcome.value, covariance, Some(outcome))
    }

    /// Reject data the spec cannot condition on.
    ///
    /// # Errors
    /// [`CountError::SeriesTooShort`], [`CountError::MissingCovariates`],
    /// [`CountError::UnexpectedCovariates`] or
    /// [`CountError::CovariateColumnMismatch`].
    pub fn check_data(&self, data: &CountData) -> CountResult<()> {
        check_data_for(&self.spec, data)
    }

    fn params_from(&self, theta: &Theta) -> CountResult<CountParams> {
        Ok(CountParams::from_theta(self.spec, theta.view())?)
    }
}

impl LogLikelihood for CountModel {
    type Data = CountData;

    /// `ℓ(θ)` with point masses floored at [`PMF_FLOOR`].
    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<f64> {
        let params = self.params_from(theta)?;
        Ok(floored_loglik(self.density(), &params, data)?)
    }

    /// Validate θ (length, finiteness) and the data against the spec.
    fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()> {
        validate_theta(theta.view(), self.spec.n_params())?;
        self.check_data(data)?;
        Ok(())
    }

    /// Analytic `∇ℓ(θ)`.
    ///
    /// # Steps
    /// 1. Map θ to model parameters.
    /// 2. Accumulate `∂ ln pmf/∂(model parameters)` over the sample; rate
    ///    sensitivities are pushed onto β through `link⁻¹′(xᵀβ)·x` for
    ///    regression models.
    /// 3. Pull back to θ with the transpose of the transform Jacobian.
    fn grad(&self, theta: &Theta, data: &Self::Data) -> OptResult<Grad> {
        let params = self.params_from(theta)?;
        let layout = self.spec.layout();
        let lags = self.spec.lags();
        let counts = data.counts();
        let mut score = Array1::<f64>::zeros(layout.len);
        for t in lags..counts.len() {
            let row = data.covariate_row(t);
            let law = params.law_at(row)?;
            let (pmf, law_grad) = self.density.pmf_grad(counts[t], &counts[t - lags..t], &law)?;
            if pmf < PMF_FLOOR {
                continue;
            }
            let d_rate = law_grad.rate / pmf;
            match layout.rate {
                Some(i) => score[i] += d_rate,
                None => {
                    if let Some(x) = row {
                        let eta = params.linear_predictor(Some(x))?;
                        let scale = d_rate * self.spec.link.inverse_deriv(eta);
                        for (slot, &xj) in layout.coefficients.clone().zip(x.iter()) {
                            score[slot] += scale * xj;
                        }
                    }
                }
            }
            for (slot, d) in layout.thinning.clone().zip(law_grad.thinning) {
                score[slot] += d / pmf;
            }
            if let Some(i) = layout.dispersion {
                score[i] += law_grad.dispersion / pmf;
            }
        }
        Ok(params.jacobian().t().dot(&score))
    }
}

/// Exact conditional log-likelihood `Σ_{t ≥ order} ln P(x_t | history)`.
///
/// Unlike the optimizer objective no floor is applied, so an impossible
/// observation yields `-∞`.
///
/// # Errors
/// Spec/data incompatibilities and per-time law failures.
pub fn conditional_loglik(params: &CountParams, data: &CountData) -> CountResult<f64> {
    let spec = *params.spec();
    check_data_for(&spec, data)?;
    let density = spec.density();
    let lags = spec.lags();
    let counts = data.counts();
    let mut total = 0.0;
    for t in lags..counts.len() {
        let law = params.law_at(data.covariate_row(t))?;
        let mut cond = density.conditional(&counts[t - lags..t], &law)?;
        total += cond.pmf(counts[t] as i64).ln();
    }
    Ok(total)
}

fn floored_loglik(
    density: &dyn TransitionDensity, params: &CountParams, data: &CountData,
) -> CountResult<f64> {
    let lags = params.spec().lags();
    let counts = data.counts();
    let mut total = 0.0;
    for t in lags..counts.len() {
        let law = params.law_at(data.covariate_row(t))?;
        let mut cond = density.conditional(&counts[t - lags..t], &law)?;
        total += cond.pmf(counts[t] as i64).max(PMF_FLOOR).ln();
    }
    Ok(total)
}

pub(crate) fn check_data_for(spec: &ModelSpec, data: &CountData) -> CountResult<()> {
    let order = spec.lags();
    if data.len() <= order {
        return Err(CountError::SeriesTooShort { len: data.len(), order });
    }
    match (spec.has_covariates(), data.covariates()) {
        (false, None) => Ok(()),
        (false, Some(_)) => Err(CountError::UnexpectedCovariates),
        (true, None) => Err(CountError::MissingCovariates),
        (true, Some(x)) if x.ncols() != spec.n_covariates => {
            Err(CountError::CovariateColumnMismatch {
                expected: spec.n_covariates,
                actual: x.ncols(),
            })
        }
        (true, Some(_)) => Ok(()),
    }
}
