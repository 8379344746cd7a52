//! inference::hessian — observed-information covariance and standard errors.
//!
//! Purpose
//! -------
//! Turn a gradient map of the negative log-likelihood into a covariance
//! matrix for the unconstrained parameters `θ̂`. The observed information
//! `J(θ̂)` is the finite-difference Hessian of that map; the covariance is
//! its Moore–Penrose pseudoinverse built from a symmetric eigendecomposition.
//!
//! Key behaviors
//! -------------
//! - [`calc_covariance`] computes `J(θ̂)` with [`compute_hessian`] and
//!   returns `J⁺`.
//! - [`calc_standard_errors`] is the square root of the diagonal of the same.
//! - [`pseudo_inverse`] is exposed so callers holding an analytic
//!   information matrix can reuse the truncation rule.
//!
//! Invariants & assumptions
//! ------------------------
//! - The gradient map is of the **summed** negative log-likelihood, so the
//!   covariance needs no further scaling by the sample size.
//! - Eigenvalues at or below [`EIGEN_EPS`] are dropped; weakly identified
//!   directions therefore contribute zero variance rather than blowing up.
//! - No explicit inverse is ever formed.
//!
//! Conventions
//! -----------
//! - Matrices cross the `ndarray`/`nalgebra` boundary only inside
//!   [`pseudo_inverse`].
//! - Errors are reported via [`OptResult<T>`].
use crate::optimization::{
    errors::OptResult, loglik_optimizer::finite_diff::compute_hessian,
    numerical_stability::transformations::EIGEN_EPS,
};
use nalgebra::DMatrix;
use ndarray::{Array1, Array2};

/// calc_covariance — `θ`-space covariance from observed information.
///
/// Parameters
/// ----------
/// - `f`: `&F`
///   Gradient of the summed negative log-likelihood, `θ ↦ ∇c(θ)`. Must be
///   finite in a neighborhood of `theta_hat`.
/// - `theta_hat`: `&Array1<f64>`
///   Point at which the information is evaluated.
///
/// Returns
/// -------
/// `OptResult<Array2<f64>>`
///   Symmetric `n×n` matrix `J(θ̂)⁺` with `n = θ̂.len()`.
///
/// Errors
/// ------
/// - Whatever [`compute_hessian`] reports, typically
///   `OptError::InvalidHessian` when the gradient is non-finite nearby.
pub fn calc_covariance<F: Fn(&Array1<f64>) -> Array1<f64>>(
    f: &F, theta_hat: &Array1<f64>,
) -> OptResult<Array2<f64>> {
    let obs_info = compute_hessian(f, theta_hat)?;
    Ok(pseudo_inverse(&obs_info))
}

/// Square roots of the diagonal of [`calc_covariance`].
pub fn calc_standard_errors<F: Fn(&Array1<f64>) -> Array1<f64>>(
    f: &F, theta_hat: &Array1<f64>,
) -> OptResult<Array1<f64>> {
    let cov = calc_covariance(f, theta_hat)?;
    Ok(cov.diag().mapv(|v| v.max(0.0).sqrt()))
}

/// Moore–Penrose pseudoinverse of a symmetric matrix.
///
/// Uses `A = Q Λ Qᵀ` and keeps only `λ_k > EIGEN_EPS`:
/// `A⁺[i, j] = Σ_k Q[i,k] Q[j,k] / λ_k`.
pub fn pseudo_inverse(sym: &Array2<f64>) -> Array2<f64> {
    let n = sym.nrows();
    let nalg = DMatrix::<f64>::from_fn(n, n, |i, j| sym[[i, j]]);
    let eigen = nalg.symmetric_eigen();
    let q = eigen.eigenvectors;
    let kept: Vec<(usize, f64)> =
        eigen.eigenvalues.iter().copied().enumerate().filter(|(_, l)| *l > EIGEN_EPS).collect();
    Array2::from_shape_fn((n, n), |(i, j)| {
        kept.iter().map(|&(k, lambda)| q[(i, k)] * q[(j, k)] / lambda).sum()
    })
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
    // - Covariance and standard errors for quadratic objectives with known
    //   information matrices.
    // - Truncation of singular directions in the pseudoinverse.
    //
    // They intentionally DO NOT cover:
    // - Count-model information matrices (see `counts::models`).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // A linear gradient map `g(θ) = Aθ` has covariance `A⁻¹`.
    //
    // Given
    // -----
    // - A = [[4, 1], [1, 2]], positive definite.
    //
    // Expect
    // ------
    // - Covariance ≈ A⁻¹ = (1/7)[[2, -1], [-1, 4]].
    fn calc_covariance_inverts_positive_definite_information() {
        // Arrange
        let a = array![[4.0, 1.0], [1.0, 2.0]];
        let f = |theta: &Array1<f64>| a.dot(theta);
        let theta_hat = array![0.2, -0.4];

        // Act
        let cov = calc_covariance(&f, &theta_hat).expect("finite Hessian");

        // Assert
        let expected = array![[2.0, -1.0], [-1.0, 4.0]] / 7.0;
        for i in 0..2 {
            for j in 0..2 {
                assert_abs_diff_eq!(cov[[i, j]], expected[[i, j]], epsilon = 1e-6);
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // Standard errors for a diagonal information matrix.
    //
    // Given
    // -----
    // - A = diag(4, 1).
    //
    // Expect
    // ------
    // - SEs ≈ (0.5, 1.0).
    fn calc_standard_errors_diagonal_quadratic() {
        // Arrange
        let a = array![[4.0, 0.0], [0.0, 1.0]];
        let f = |theta: &Array1<f64>| a.dot(theta);

        // Act
        let se = calc_standard_errors(&f, &array![1.0, -1.0]).expect("finite Hessian");

        // Assert
        assert_abs_diff_eq!(se[0], 0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(se[1], 1.0, epsilon = 1e-6);
    }

    #[test]
    // Purpose
    // -------
    // A singular direction contributes nothing to the pseudoinverse.
    //
    // Given
    // -----
    // - diag(2, 0).
    //
    // Expect
    // ------
    // - diag(0.5, 0).
    fn pseudo_inverse_drops_null_directions() {
        // Arrange
        let sym = array![[2.0, 0.0], [0.0, 0.0]];

        // Act
        let inv = pseudo_inverse(&sym);

        // Assert
        assert_abs_diff_eq!(inv[[0, 0]], 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(inv[[1, 1]], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(inv[[0, 1]], 0.0, epsilon = 1e-12);
    }
}
