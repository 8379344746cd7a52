//! High-level entry point for maximizing a [`LogLikelihood`].
//!
//! Selects L-BFGS with the configured line search, wraps the model in an
//! [`ArgMinAdapter`] (which minimizes `-ℓ(θ)`), and hands off to
//! [`run_lbfgs`].
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        adapter::ArgMinAdapter,
        builders::{build_optimizer_hager_zhang, build_optimizer_more_thuente},
        run::run_lbfgs,
        traits::{LineSearcher, LogLikelihood, MLEOptions},
        OptimOutcome, Theta,
    },
};

/// Maximize `ℓ(θ)` from `theta0` with L-BFGS.
///
/// Parameters
/// ----------
/// - `f`: the model.
/// - `theta0`: starting point in unconstrained coordinates (consumed).
/// - `data`: payload forwarded to `value`/`grad`/`check`.
/// - `opts`: tolerances, line search, verbosity, L-BFGS memory.
///
/// Errors
/// ------
/// - Anything `f.check` rejects.
/// - Solver construction failures and argmin runtime errors, including
///   model errors raised from inside the cost or gradient callbacks.
///
/// Notes
/// -----
/// - A run that stops on its iteration budget still returns `Ok`; the
///   returned [`OptimOutcome::converged`] flag is `false` in that case and
///   callers decide whether that is an error.
pub fn maximize<F: LogLikelihood>(
    f: &F, theta0: Theta, data: &F::Data, opts: &MLEOptions,
) -> OptResult<OptimOutcome> {
    f.check(&theta0, data)?;
    let problem = ArgMinAdapter::new(f, data);
    match opts.line_searcher {
        LineSearcher::MoreThuente => {
            let solver = build_optimizer_more_thuente(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
        LineSearcher::HagerZhang => {
            let solver = build_optimizer_hager_zhang(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::{
        errors::OptError,
        loglik_optimizer::{Cost, Grad, Tolerances},
    };
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array1};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - End-to-end maximization of a concave toy log-likelihood with both
    //   line searches, with and without an analytic gradient.
    // -------------------------------------------------------------------------

    /// ℓ(θ) = -Σ (θ_i - c_i)², maximized at θ = c.
    struct Quadratic {
        center: Array1<f64>,
        analytic: bool,
    }

    impl LogLikelihood for Quadratic {
        type Data = ();

        fn value(&self, theta: &Theta, _data: &()) -> OptResult<Cost> {
            let diff = theta - &self.center;
            Ok(-diff.dot(&diff))
        }

        fn check(&self, _theta: &Theta, _data: &()) -> OptResult<()> {
            Ok(())
        }

        fn grad(&self, theta: &Theta, _data: &()) -> OptResult<Grad> {
            if !self.analytic {
                return Err(OptError::GradientNotImplemented);
            }
            Ok((theta - &self.center) * -2.0)
        }
    }

    #[test]
    // Purpose
    // -------
    // Both line searches find the maximizer of a concave quadratic.
    //
    // Given
    // -----
    // - ℓ(θ) = -‖θ - (1, -2)‖² with an analytic gradient, θ₀ = 0.
    //
    // Expect
    // ------
    // - θ̂ ≈ (1, -2), ℓ(θ̂) ≈ 0 and `converged == true`.
    fn maximize_recovers_quadratic_center() {
        for searcher in [LineSearcher::MoreThuente, LineSearcher::HagerZhang] {
            // Arrange
            let model = Quadratic { center: array![1.0, -2.0], analytic: true };
            let tols = Tolerances::new(Some(1e-8), None, Some(200)).expect("valid tolerances");
            let opts = MLEOptions::new(tols, searcher, false, None).expect("valid options");

            // Act
            let out = maximize(&model, array![0.0, 0.0], &(), &opts).expect("run succeeds");

            // Assert
            assert!(out.converged, "status: {}", out.status);
            assert_abs_diff_eq!(out.theta_hat[0], 1.0, epsilon = 1e-5);
            assert_abs_diff_eq!(out.theta_hat[1], -2.0, epsilon = 1e-5);
            assert_abs_diff_eq!(out.value, 0.0, epsilon = 1e-8);
        }
    }

    #[test]
    // Purpose
    // -------
    // The finite-difference fallback is good enough to reach the optimum.
    //
    // Given
    // -----
    // - The same quadratic without an analytic gradient.
    //
    // Expect
    // ------
    // - θ̂ within 1e-4 of the center.
    fn maximize_uses_finite_differences_without_gradient() {
        // Arrange
        let model = Quadratic { center: array![0.5, 3.0], analytic: false };
        let tols = Tolerances::new(Some(1e-6), Some(1e-12), Some(200)).expect("valid tolerances");
        let opts =
            MLEOptions::new(tols, LineSearcher::MoreThuente, false, None).expect("valid options");

        // Act
        let out = maximize(&model, array![0.0, 0.0], &(), &opts).expect("run succeeds");

        // Assert
        assert_abs_diff_eq!(out.theta_hat[0], 0.5, epsilon = 1e-4);
        assert_abs_diff_eq!(out.theta_hat[1], 3.0, epsilon = 1e-4);
    }
}
