//! Stable transforms between unconstrained θ and constrained model parameters.
//!
//! - [`safe_softplus`] / [`safe_softplus_inv`]: ℝ ↔ (0, ∞) for rates.
//! - [`safe_logistic`] / [`safe_logit`]: ℝ ↔ (0, 1) for dispersion.
//! - [`safe_softmax`]: ℝᵏ → open simplex `{a : a_i > 0, Σ a < 1 − margin}`
//!   for thinning probabilities, with an implicit slack coordinate whose
//!   logit is pinned at zero. For `k = 1` this is the scaled logistic.
//! - [`safe_softmax_inv`], [`safe_softmax_deriv`], [`softmax_jacobian`]:
//!   inverse map, vector–Jacobian product and dense Jacobian of the same.
//! - [`delta_method`]: push a θ-space covariance through a Jacobian.
use ndarray::{Array1, Array2, ArrayView1, ArrayViewMut1};

/// Margin keeping the thinning sum strictly below one.
pub const STATIONARITY_MARGIN: f64 = 1e-6;

/// Clamp used before taking logits of probabilities at the boundary.
pub const LOGIT_EPS: f64 = 1e-10;

/// Eigenvalues at or below this are dropped from pseudo-inverses.
pub const EIGEN_EPS: f64 = 1e-10;

/// Smallest probability admitted into `ln` inside the optimizer loop.
pub const PMF_FLOOR: f64 = 1e-300;

/// `ln(1 + eˣ)` without overflow.
pub fn safe_softplus(x: f64) -> f64 {
    if x > 20.0 {
        x
    } else {
        x.exp().ln_1p()
    }
}

/// Inverse of softplus on `(0, ∞)`: `ln(eˣ − 1)`.
pub fn safe_softplus_inv(x: f64) -> f64 {
    if x > 20.0 {
        x
    } else {
        x.exp_m1().ln()
    }
}

/// `1 / (1 + e⁻ˣ)`, evaluated on the branch that cannot overflow.
///
/// This is also the derivative of [`safe_softplus`].
pub fn safe_logistic(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// `ln(p / (1 − p))` after clamping `p` into `[LOGIT_EPS, 1 − LOGIT_EPS]`.
pub fn safe_logit(p: f64) -> f64 {
    let p = p.clamp(LOGIT_EPS, 1.0 - LOGIT_EPS);
    p.ln() - (-p).ln_1p()
}

/// Scaled softmax with an implicit zero-logit slack.
///
/// Writes `a_i = (1 − STATIONARITY_MARGIN) · e^{θ_i} / (1 + Σ_j e^{θ_j})`
/// into `out`. The max-shift keeps every exponent non-positive.
pub fn safe_softmax(out: &mut ArrayViewMut1<f64>, logits: ArrayView1<f64>) {
    let shift = logits.iter().fold(0.0_f64, |m, &v| m.max(v));
    let slack = (-shift).exp();
    let denom = logits.iter().fold(slack, |acc, &v| acc + (v - shift).exp());
    let scale = 1.0 - STATIONARITY_MARGIN;
    for (o, &v) in out.iter_mut().zip(logits.iter()) {
        *o = scale * (v - shift).exp() / denom;
    }
}

/// Inverse of [`safe_softmax`]: `θ_i = ln(π_i) − ln(π_slack)` with
/// `π = a / (1 − margin)`.
///
/// Returns `None` when the probabilities leave no positive slack, which the
/// caller reports as a stationarity violation.
pub fn safe_softmax_inv(probs: ArrayView1<f64>) -> Option<Array1<f64>> {
    let scale = 1.0 - STATIONARITY_MARGIN;
    let slack = 1.0 - probs.sum() / scale;
    if !(slack > 0.0) {
        return None;
    }
    let log_slack = slack.max(LOGIT_EPS).ln();
    Some(probs.mapv(|a| (a / scale).max(LOGIT_EPS).ln() - log_slack))
}

/// In-place vector–Jacobian product for [`safe_softmax`].
///
/// On entry `grad` holds `∂ℓ/∂a`; on exit it holds `∂ℓ/∂θ`, using
/// `∂a_i/∂θ_j = s · π_i (δ_ij − π_j)` with `s = 1 − margin`, `π = a / s`.
pub fn safe_softmax_deriv(probs: ArrayView1<f64>, grad: &mut ArrayViewMut1<f64>) {
    let scale = 1.0 - STATIONARITY_MARGIN;
    let weighted: f64 = probs.iter().zip(grad.iter()).map(|(&a, &g)| a / scale * g).sum();
    for (g, &a) in grad.iter_mut().zip(probs.iter()) {
        *g = a * (*g - weighted);
    }
}

/// Dense Jacobian `∂a/∂θ` of [`safe_softmax`] evaluated at `probs`.
pub fn softmax_jacobian(probs: ArrayView1<f64>) -> Array2<f64> {
    let scale = 1.0 - STATIONARITY_MARGIN;
    let k = probs.len();
    Array2::from_shape_fn((k, k), |(i, j)| {
        let delta = if i == j { 1.0 } else { 0.0 };
        probs[i] * (delta - probs[j] / scale)
    })
}

/// Delta method: `Σ_model = J Σ_θ Jᵀ`.
pub fn delta_method(jacobian: &Array2<f64>, cov_theta: &Array2<f64>) -> Array2<f64> {
    jacobian.dot(cov_theta).dot(&jacobian.t())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Agreement of stable transforms with naïve formulas and their inverses.
    // - Simplex mass and the softmax vector–Jacobian product versus finite
    //   differences.
    // - The delta method with an identity covariance.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Softplus and logistic match naïve formulas and invert cleanly.
    //
    // Given
    // -----
    // - A grid of moderate inputs.
    //
    // Expect
    // ------
    // - softplus_inv(softplus(x)) ≈ x, logit(logistic(x)) ≈ x.
    fn softplus_and_logistic_invert() {
        for &x in &[-8.0, -1.5, 0.0, 0.7, 5.0] {
            // Act
            let sp = safe_softplus(x);
            let lg = safe_logistic(x);

            // Assert
            assert_abs_diff_eq!(safe_softplus_inv(sp), x, epsilon = 1e-8);
            assert_abs_diff_eq!(safe_logit(lg), x, epsilon = 1e-6);
            assert_abs_diff_eq!(sp, (1.0 + f64::exp(x)).ln(), epsilon = 1e-12);
        }
        assert_eq!(safe_softplus(25.0), 25.0);
    }

    #[test]
    // Purpose
    // -------
    // Softmax output is positive, leaves slack, and inverts.
    //
    // Given
    // -----
    // - Logits (0.4, -1.2, 2.0), including a large one.
    //
    // Expect
    // ------
    // - All a_i > 0, Σa < 1 − margin, inverse recovers the logits.
    fn softmax_stays_inside_simplex_and_inverts() {
        // Arrange
        let logits = array![0.4, -1.2, 2.0];
        let mut probs = Array1::<f64>::zeros(3);

        // Act
        safe_softmax(&mut probs.view_mut(), logits.view());
        let back = safe_softmax_inv(probs.view()).expect("positive slack");

        // Assert
        assert!(probs.iter().all(|&a| a > 0.0));
        assert!(probs.sum() < 1.0 - STATIONARITY_MARGIN);
        for i in 0..3 {
            assert_abs_diff_eq!(back[i], logits[i], epsilon = 1e-9);
        }
    }

    #[test]
    // Purpose
    // -------
    // Probabilities that exhaust the simplex have no inverse.
    //
    // Given
    // -----
    // - a = (0.6, 0.5).
    //
    // Expect
    // ------
    // - `None`.
    fn softmax_inverse_rejects_full_simplex() {
        assert!(safe_softmax_inv(array![0.6, 0.5].view()).is_none());
    }

    #[test]
    // Purpose
    // -------
    // The analytic vector–Jacobian product matches finite differences and
    // the dense Jacobian.
    //
    // Given
    // -----
    // - ℓ(a) = 3a₀ − a₁ + 0.5a₂ and logits (0.1, 0.3, −0.5).
    //
    // Expect
    // ------
    // - ∂ℓ/∂θ agrees with central differences to 1e-6.
    fn softmax_deriv_matches_finite_differences() {
        // Arrange
        let logits = array![0.1, 0.3, -0.5];
        let weights = array![3.0, -1.0, 0.5];
        let ell = |t: &Array1<f64>| {
            let mut a = Array1::<f64>::zeros(3);
            safe_softmax(&mut a.view_mut(), t.view());
            a.dot(&weights)
        };
        let mut probs = Array1::<f64>::zeros(3);
        safe_softmax(&mut probs.view_mut(), logits.view());

        // Act
        let mut grad = weights.clone();
        safe_softmax_deriv(probs.view(), &mut grad.view_mut());
        let dense = softmax_jacobian(probs.view()).t().dot(&weights);

        // Assert
        let h = 1e-6;
        for j in 0..3 {
            let mut up = logits.clone();
            let mut down = logits.clone();
            up[j] += h;
            down[j] -= h;
            let fd = (ell(&up) - ell(&down)) / (2.0 * h);
            assert_abs_diff_eq!(grad[j], fd, epsilon = 1e-6);
            assert_abs_diff_eq!(dense[j], grad[j], epsilon = 1e-12);
        }
    }

    #[test]
    // Purpose
    // -------
    // With identity θ-covariance the delta method returns J Jᵀ.
    //
    // Given
    // -----
    // - J = [[1, 2], [0, 3]].
    //
    // Expect
    // ------
    // - [[5, 6], [6, 9]].
    fn delta_method_identity_covariance() {
        // Arrange
        let jac = array![[1.0, 2.0], [0.0, 3.0]];
        let cov = Array2::<f64>::eye(2);

        // Act
        let out = delta_method(&jac, &cov);

        // Assert
        assert_eq!(out, array![[5.0, 6.0], [6.0, 9.0]]);
    }
}
