//! Parameter vectors for count models and their unconstrained mapping.
//!
//! [`CountParams`] pairs a [`ModelSpec`] with a validated parameter vector in
//! the spec's layout (see [`ParamLayout`](super::spec::ParamLayout)). The
//! optimizer works in an unconstrained space `θ` of the same length:
//!
//! - rate `λ = softplus(θ_λ)`;
//! - thinning block `a = (1 − margin)·softmax(θ_a)` with an implicit slack
//!   (the scaled logistic for order 1), so `a_i > 0` and `Σ a < 1`;
//! - dispersion `η = (1 − margin)·logistic(θ_η)`;
//! - regression coefficients are unconstrained.
//!
//! [`CountParams::jacobian`] is the analytic `∂(model)/∂θ`, used both to pull
//! likelihood gradients back into θ-space and to push the θ-covariance
//! forward with the delta method.
use crate::{
    counts::{
        core::{
            density::ConditionalLaw,
            spec::ModelSpec,
            validation::{
                validate_coefficients, validate_dispersion, validate_rate, validate_theta,
                validate_thinning,
            },
        },
        errors::{CountError, CountResult, ParamError, ParamResult},
    },
    optimization::numerical_stability::transformations::{
        safe_logistic, safe_logit, safe_softmax, safe_softmax_inv, safe_softplus,
        safe_softplus_inv, softmax_jacobian, STATIONARITY_MARGIN,
    },
};
use ndarray::{s, Array1, Array2, ArrayView1};

/// Validated parameter vector tied to its model specification.
#[derive(Debug, Clone, PartialEq)]
pub struct CountParams {
    spec: ModelSpec,
    values: Array1<f64>,
}

impl CountParams {
    /// Validate `values` against the layout of `spec`.
    ///
    /// # Errors
    /// - [`ParamError::ParamLengthMismatch`] for a wrong length.
    /// - [`ParamError::InvalidRate`], [`ParamError::InvalidThinning`],
    ///   [`ParamError::StationarityViolated`], [`ParamError::InvalidDispersion`]
    ///   or [`ParamError::NonFiniteCoefficient`] for out-of-range entries.
    pub fn new(spec: ModelSpec, values: Array1<f64>) -> ParamResult<Self> {
        let layout = spec.layout();
        if values.len() != layout.len {
            return Err(ParamError::ParamLengthMismatch {
                expected: layout.len,
                actual: values.len(),
            });
        }
        if let Some(i) = layout.rate {
            validate_rate(values[i])?;
        }
        let thinning = values.slice(s![layout.thinning.clone()]).to_vec();
        validate_thinning(&thinning)?;
        if let Some(i) = layout.dispersion {
            validate_dispersion(values[i])?;
        }
        validate_coefficients(values.slice(s![layout.coefficients.clone()]))?;
        Ok(CountParams { spec, values })
    }

    /// Map an unconstrained θ into model parameters.
    ///
    /// # Errors
    /// θ length or finiteness violations, or a transformed value that
    /// underflowed out of its domain.
    pub fn from_theta(spec: ModelSpec, theta: ArrayView1<f64>) -> ParamResult<Self> {
        let layout = spec.layout();
        validate_theta(theta, layout.len)?;
        let mut values = Array1::<f64>::zeros(layout.len);
        if let Some(i) = layout.rate {
            values[i] = safe_softplus(theta[i]);
        }
        safe_softmax(
            &mut values.slice_mut(s![layout.thinning.clone()]),
            theta.slice(s![layout.thinning.clone()]),
        );
        if let Some(i) = layout.dispersion {
            values[i] = (1.0 - STATIONARITY_MARGIN) * safe_logistic(theta[i]);
        }
        values
            .slice_mut(s![layout.coefficients.clone()])
            .assign(&theta.slice(s![layout.coefficients.clone()]));
        Self::new(spec, values)
    }

    /// Inverse of [`from_theta`](Self::from_theta).
    ///
    /// # Errors
    /// [`ParamError::StationarityViolated`] when the thinning block leaves no
    /// room for the stationarity margin.
    pub fn to_theta(&self) -> ParamResult<Array1<f64>> {
        let layout = self.spec.layout();
        let mut theta = Array1::<f64>::zeros(layout.len);
        if let Some(i) = layout.rate {
            theta[i] = safe_softplus_inv(self.values[i]);
        }
        let thinning = self.values.slice(s![layout.thinning.clone()]);
        let logits = safe_softmax_inv(thinning)
            .ok_or(ParamError::StationarityViolated { coeff_sum: thinning.sum() })?;
        theta.slice_mut(s![layout.thinning.clone()]).assign(&logits);
        if let Some(i) = layout.dispersion {
            theta[i] = safe_logit(self.values[i] / (1.0 - STATIONARITY_MARGIN));
        }
        theta
            .slice_mut(s![layout.coefficients.clone()])
            .assign(&self.values.slice(s![layout.coefficients.clone()]));
        Ok(theta)
    }

    /// `∂(model parameters)/∂θ`, block diagonal.
    pub fn jacobian(&self) -> Array2<f64> {
        let layout = self.spec.layout();
        let mut jac = Array2::<f64>::zeros((layout.len, layout.len));
        if let Some(i) = layout.rate {
            jac[[i, i]] = -(-self.values[i]).exp_m1();
        }
        let block = softmax_jacobian(self.values.slice(s![layout.thinning.clone()]));
        jac.slice_mut(s![layout.thinning.clone(), layout.thinning.clone()]).assign(&block);
        if let Some(i) = layout.dispersion {
            let d = self.values[i];
            jac[[i, i]] = d * (1.0 - d / (1.0 - STATIONARITY_MARGIN));
        }
        for i in layout.coefficients {
            jac[[i, i]] = 1.0;
        }
        jac
    }

    pub fn spec(&self) -> &ModelSpec {
        &self.spec
    }

    pub fn values(&self) -> &Array1<f64> {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Constant rate; `None` for regression models.
    pub fn rate(&self) -> Option<f64> {
        self.spec.layout().rate.map(|i| self.values[i])
    }

    /// Thinning probabilities padded with zeros to three entries.
    pub fn thinning(&self) -> [f64; 3] {
        let mut out = [0.0; 3];
        for (o, &v) in out.iter_mut().zip(self.values.slice(s![self.spec.layout().thinning])) {
            *o = v;
        }
        out
    }

    /// Dispersion; zero for Poisson models.
    pub fn dispersion(&self) -> f64 {
        self.spec.layout().dispersion.map_or(0.0, |i| self.values[i])
    }

    pub fn coefficients(&self) -> ArrayView1<'_, f64> {
        self.values.slice(s![self.spec.layout().coefficients])
    }

    /// Linear predictor `xᵀβ` for a covariate row.
    ///
    /// # Errors
    /// [`CountError::MissingCovariates`] or
    /// [`CountError::CovariateColumnMismatch`].
    pub fn linear_predictor(&self, row: Option<ArrayView1<f64>>) -> CountResult<f64> {
        let row = row.ok_or(CountError::MissingCovariates)?;
        let beta = self.coefficients();
        if row.len() != beta.len() {
            return Err(CountError::CovariateColumnMismatch {
                expected: beta.len(),
                actual: row.len(),
            });
        }
        Ok(row.dot(&beta))
    }

    /// Transition-law parameters at one time point.
    ///
    /// For regression models the rate is `link⁻¹(xᵀβ)` and must be positive.
    ///
    /// # Errors
    /// - [`CountError::UnexpectedCovariates`] when a row is passed to a
    ///   constant-rate model.
    /// - [`CountError::NonPositiveRate`] for an inadmissible linked rate.
    pub fn law_at(&self, row: Option<ArrayView1<f64>>) -> CountResult<ConditionalLaw> {
        let rate = match self.rate() {
            Some(rate) => {
                if row.is_some() {
                    return Err(CountError::UnexpectedCovariates);
                }
                rate
            }
            None => {
                let rate = self.spec.link.inverse(self.linear_predictor(row)?);
                if !(rate.is_finite() && rate > 0.0) {
                    return Err(CountError::NonPositiveRate { value: rate });
                }
                rate
            }
        };
        Ok(ConditionalLaw { rate, thinning: self.thinning(), dispersion: self.dispersion() })
    }
}
