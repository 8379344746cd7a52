//! Public configuration and result types for log-likelihood maximization.
//!
//! - [`LogLikelihood`]: the trait a model implements.
//! - [`Tolerances`] and [`MLEOptions`]: validated solver configuration.
//! - [`LineSearcher`]: line search used inside L-BFGS.
//! - [`OptimOutcome`]: normalized result of [`maximize`](super::maximize).
//!
//! Convention: the model maximizes `ℓ(θ)`; the solver minimizes `c(θ) = -ℓ(θ)`.
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{
        validation::{validate_theta_hat, validate_value, verify_tol_cost, verify_tol_grad},
        Cost, FnEvalMap, Grad, Theta,
    },
};
use argmin::core::{TerminationReason, TerminationStatus};
use argmin_math::ArgminL2Norm;
use std::str::FromStr;

/// Log-likelihood interface consumed by the optimizer.
///
/// - `value` returns `ℓ(θ)` for the model's data payload.
/// - `check` rejects an initial guess before any solver work happens.
/// - `grad` optionally returns `∇ℓ(θ)`; the default signals
///   [`OptError::GradientNotImplemented`] and the adapter then uses finite
///   differences of the cost.
pub trait LogLikelihood {
    type Data: 'static;

    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<Cost>;
    fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()>;

    fn grad(&self, _theta: &Theta, _data: &Self::Data) -> OptResult<Grad> {
        Err(OptError::GradientNotImplemented)
    }
}

/// Line search used inside L-BFGS.
///
/// Parses case-insensitively from `"MoreThuente"` or `"HagerZhang"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineSearcher {
    MoreThuente,
    HagerZhang,
}

impl FromStr for LineSearcher {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "morethuente" => Ok(LineSearcher::MoreThuente),
            "hagerzhang" => Ok(LineSearcher::HagerZhang),
            _ => Err(OptError::InvalidLineSearch {
                name: s.to_string(),
                reason: "Valid options are case insensitive 'MoreThuente' or 'HagerZhang'.",
            }),
        }
    }
}

/// Optimizer configuration.
///
/// Default
/// -------
/// - `tols`: `tol_grad = 1e-6`, `tol_cost = 1e-9`, `max_iter = 500`
/// - `line_searcher`: `MoreThuente`
/// - `verbose`: `false` (only meaningful with the `obs_slog` feature)
/// - `lbfgs_mem`: `None`, i.e. [`DEFAULT_LBFGS_MEM`](super::DEFAULT_LBFGS_MEM)
#[derive(Debug, Clone, PartialEq)]
pub struct MLEOptions {
    pub tols: Tolerances,
    pub line_searcher: LineSearcher,
    pub verbose: bool,
    pub lbfgs_mem: Option<usize>,
}

impl MLEOptions {
    /// Build options, rejecting a zero L-BFGS memory.
    pub fn new(
        tols: Tolerances, line_searcher: LineSearcher, verbose: bool, lbfgs_mem: Option<usize>,
    ) -> OptResult<Self> {
        if let Some(m) = lbfgs_mem {
            if m == 0 {
                return Err(OptError::InvalidLBFGSMem {
                    mem: m,
                    reason: "L-BFGS memory must be greater than zero.",
                });
            }
        }
        Ok(Self { tols, line_searcher, verbose, lbfgs_mem })
    }
}

impl Default for MLEOptions {
    fn default() -> Self {
        Self {
            tols: Tolerances { tol_grad: Some(1e-6), tol_cost: Some(1e-9), max_iter: Some(500) },
            line_searcher: LineSearcher::MoreThuente,
            verbose: false,
            lbfgs_mem: None,
        }
    }
}

/// Stopping rules for the solver.
///
/// At least one field must be set; tolerances must be finite and positive and
/// `max_iter` must be non-zero (see [`Tolerances::new`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub tol_grad: Option<f64>,
    pub tol_cost: Option<f64>,
    pub max_iter: Option<usize>,
}

impl Tolerances {
    /// Construct validated tolerances.
    ///
    /// # Errors
    /// - [`OptError::NoTolerancesProvided`] if all three are `None`.
    /// - [`OptError::InvalidTolGrad`] / [`OptError::InvalidTolCost`] for
    ///   non-finite or non-positive tolerances.
    /// - [`OptError::InvalidMaxIter`] if `max_iter == 0`.
    pub fn new(
        tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    ) -> OptResult<Self> {
        if tol_grad.is_none() && tol_cost.is_none() && max_iter.is_none() {
            return Err(OptError::NoTolerancesProvided);
        }
        verify_tol_cost(tol_cost)?;
        verify_tol_grad(tol_grad)?;
        if let Some(max_iter) = max_iter {
            if max_iter == 0 {
                return Err(OptError::InvalidMaxIter {
                    max_iter,
                    reason: "Maximum iterations must be greater than zero.",
                });
            }
        }
        Ok(Self { tol_grad, tol_cost, max_iter })
    }
}

/// Normalized result of a solver run.
///
/// - `theta_hat`: best θ found (unconstrained coordinates).
/// - `value`: log-likelihood `ℓ(θ̂)`, not the cost.
/// - `converged`: `true` only for `SolverConverged` or `TargetCostReached`.
/// - `status`: argmin termination status rendered as text.
/// - `iterations`, `fn_evals`: argmin's counters.
/// - `grad_norm`: norm of the last cost gradient, when argmin kept one.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimOutcome {
    pub theta_hat: Theta,
    pub value: f64,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    pub fn_evals: FnEvalMap,
    pub grad_norm: Option<f64>,
}

impl OptimOutcome {
    /// Build a validated outcome from raw solver state.
    ///
    /// # Errors
    /// - [`OptError::MissingThetaHat`] / [`OptError::InvalidThetaHat`] when the
    ///   best parameter is absent or non-finite.
    /// - [`OptError::NonFiniteCost`] when the best value is not finite.
    pub fn new(
        theta_hat_opt: Option<Theta>, value: f64, termination: TerminationStatus, iterations: u64,
        fn_evals: FnEvalMap, grad: Option<Grad>,
    ) -> OptResult<Self> {
        let theta_hat = validate_theta_hat(theta_hat_opt)?;
        validate_value(value)?;
        let (converged, status) = match &termination {
            TerminationStatus::NotTerminated => (false, "Not terminated".to_string()),
            TerminationStatus::Terminated(reason) => (
                matches!(
                    reason,
                    TerminationReason::SolverConverged | TerminationReason::TargetCostReached
                ),
                format!("{reason:?}"),
            ),
        };
        let grad_norm = grad.map(|g| g.l2_norm());
        Ok(Self {
            theta_hat,
            value,
            converged,
            status,
            iterations: iterations as usize,
            fn_evals,
            grad_norm,
        })
    }
}
