//! diagnostics::scoring — proper scoring rules for fitted count models.
//!
//! Purpose
//! -------
//! Assess the one-step predictive laws of a fitted model against the
//! realized series. For every `t ≥ order`, with `p(·)` and `P(·)` the
//! conditional pmf and cdf at the fitted parameters:
//!
//! - logarithmic score `−ln p(x_t)`;
//! - quadratic score `−2 p(x_t) + Σ_j p(j)²`;
//! - ranked probability score `Σ_j (P(j) − 𝟙[j ≥ x_t])²`.
//!
//! Each is averaged over the scored time points and reported together with
//! the fitted model's AIC and BIC. Lower is better for all five.
//!
//! Invariants & assumptions
//! ------------------------
//! - Infinite sums run through
//!   [`sum_until_converged`](crate::counts::core::truncation::sum_until_converged)
//!   at the configured tolerance. The ranked probability loop also runs at
//!   least to `x_t`, so far-tail observations keep their full penalty.
//! - The tolerance is validated before any summation.
use crate::{
    counts::{
        core::truncation::{sum_until_converged, SupportTerm, DEFAULT_TOLERANCE},
        models::FittedModel,
    },
    diagnostics::{
        errors::{DiagError, DiagResult},
        validation::validate_tolerance,
    },
};
use std::collections::BTreeMap;

pub const LOG_SCORE: &str = "log.score";
pub const QUAD_SCORE: &str = "quad.score";
pub const RPS_SCORE: &str = "rps.score";
pub const AIC: &str = "aic";
pub const BIC: &str = "bic";

/// Scoring configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreOptions {
    /// Truncation tolerance `ε` of the support sums.
    pub tolerance: f64,
}

impl ScoreOptions {
    pub fn new(tolerance: f64) -> ScoreOptions {
        ScoreOptions { tolerance }
    }
}

impl Default for ScoreOptions {
    fn default() -> Self {
        ScoreOptions { tolerance: DEFAULT_TOLERANCE }
    }
}

/// Scores at one time point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreContribution {
    /// 0-based index of the scored observation.
    pub t: usize,
    pub log: f64,
    pub quad: f64,
    pub rps: f64,
}

/// Averaged scores plus information criteria.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreResult {
    pub log_score: f64,
    pub quad_score: f64,
    pub rps_score: f64,
    pub aic: f64,
    pub bic: f64,
    pub n_scored: usize,
    pub contributions: Vec<ScoreContribution>,
}

impl ScoreResult {
    /// Keys `log.score`, `quad.score`, `rps.score`, `aic`, `bic`.
    pub fn to_map(&self) -> BTreeMap<&'static str, f64> {
        BTreeMap::from([
            (LOG_SCORE, self.log_score),
            (QUAD_SCORE, self.quad_score),
            (RPS_SCORE, self.rps_score),
            (AIC, self.aic),
            (BIC, self.bic),
        ])
    }
}

/// Score `fitted` against its own series.
///
/// # Errors
/// - [`DiagError::InvalidTolerance`] unless the tolerance lies in `(0, 1)`.
/// - [`DiagError::NothingToScore`] when no time point follows the
///   conditioning lags.
/// - Law or truncation failures wrapped in [`DiagError::Model`].
pub fn score(fitted: &FittedModel, opts: &ScoreOptions) -> DiagResult<ScoreResult> {
    let tolerance = validate_tolerance(opts.tolerance)?;
    let data = fitted.data();
    let lags = fitted.spec().lags();
    let counts = data.counts();
    if counts.len() <= lags {
        return Err(DiagError::NothingToScore { len: counts.len(), order: lags });
    }
    let density = fitted.spec().density();

    let mut contributions = Vec::with_capacity(counts.len() - lags);
    for t in lags..counts.len() {
        let obs = counts[t];
        let law = fitted.params().law_at(data.covariate_row(t))?;
        let mut cond = density.conditional(&counts[t - lags..t], &law)?;
        let p_obs = cond.pmf(obs as i64);

        let sq = sum_until_converged(tolerance, 0, |j| {
            let mass = cond.pmf(j as i64);
            Ok(SupportTerm { mass, value: mass * mass })
        })?;
        let rps = sum_until_converged(tolerance, obs, |j| {
            let mass = cond.pmf(j as i64);
            let step = if j >= obs { 1.0 } else { 0.0 };
            let gap = cond.cdf(j as i64) - step;
            Ok(SupportTerm { mass, value: gap * gap })
        })?;

        contributions.push(ScoreContribution {
            t,
            log: -p_obs.ln(),
            quad: -2.0 * p_obs + sq.value,
            rps: rps.value,
        });
    }

    let n_scored = contributions.len();
    let mean = |f: fn(&ScoreContribution) -> f64| {
        contributions.iter().map(f).sum::<f64>() / n_scored as f64
    };
    let (log_score, quad_score, rps_score) = (mean(|c| c.log), mean(|c| c.quad), mean(|c| c.rps));
    Ok(ScoreResult {
        log_score,
        quad_score,
        rps_score,
        aic: fitted.aic(),
        bic: fitted.bic(),
        n_scored,
        contributions,
    })
}
