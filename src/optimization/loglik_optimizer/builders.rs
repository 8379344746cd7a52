//! L-BFGS construction helpers.
//!
//! Each builder pairs L-BFGS with one line search, sizes the history from
//! `opts.lbfgs_mem` (or [`DEFAULT_LBFGS_MEM`]) and applies the gradient and
//! cost-change tolerances. Initial parameters and the iteration budget are
//! executor concerns handled by [`run_lbfgs`](super::run::run_lbfgs).
use argmin::solver::quasinewton::LBFGS;

use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        traits::MLEOptions,
        types::{
            Cost, Grad, HagerZhangLS, LbfgsHagerZhang, LbfgsMoreThuente, MoreThuenteLS, Theta,
            DEFAULT_LBFGS_MEM,
        },
    },
};

/// L-BFGS with a Hager–Zhang line search.
///
/// # Errors
/// Propagates argmin's rejection of a tolerance as an `OptError`.
pub fn build_optimizer_hager_zhang(opts: &MLEOptions) -> OptResult<LbfgsHagerZhang> {
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    configure_lbfgs(LbfgsHagerZhang::new(HagerZhangLS::new(), mem), opts)
}

/// L-BFGS with a More–Thuente line search.
///
/// # Errors
/// Propagates argmin's rejection of a tolerance as an `OptError`.
pub fn build_optimizer_more_thuente(opts: &MLEOptions) -> OptResult<LbfgsMoreThuente> {
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    configure_lbfgs(LbfgsMoreThuente::new(MoreThuenteLS::new(), mem), opts)
}

/// Apply the optional gradient and cost tolerances to any L-BFGS variant.
pub fn configure_lbfgs<L>(
    mut solver: LBFGS<L, Theta, Grad, Cost>, opts: &MLEOptions,
) -> OptResult<LBFGS<L, Theta, Grad, Cost>> {
    if let Some(g) = opts.tols.tol_grad {
        solver = solver.with_tolerance_grad(g)?;
    }
    if let Some(c) = opts.tols.tol_cost {
        solver = solver.with_tolerance_cost(c)?;
    }
    Ok(solver)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::loglik_optimizer::traits::{LineSearcher, Tolerances};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Construction of both L-BFGS variants with default and explicit memory.
    //
    // They intentionally DO NOT cover:
    // - Executor behavior, which `api` tests exercise end to end.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Both builders succeed with the default history size.
    //
    // Given
    // -----
    // - Valid gradient and cost tolerances, `lbfgs_mem = None`.
    //
    // Expect
    // ------
    // - `Ok(_)` from both builders.
    fn builders_accept_default_memory() {
        // Arrange
        let tols = Tolerances::new(Some(1e-6), Some(1e-8), Some(50)).expect("valid tolerances");
        let hz = MLEOptions::new(tols, LineSearcher::HagerZhang, false, None).expect("valid");
        let mt = MLEOptions::new(tols, LineSearcher::MoreThuente, false, None).expect("valid");

        // Act / Assert
        assert!(build_optimizer_hager_zhang(&hz).is_ok());
        assert!(build_optimizer_more_thuente(&mt).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // An explicit history size and a gradient-only stopping rule are accepted.
    //
    // Given
    // -----
    // - `tol_grad` only, `lbfgs_mem = Some(11)`.
    //
    // Expect
    // ------
    // - `Ok(_)` from both builders.
    fn builders_accept_explicit_memory() {
        // Arrange
        let tols = Tolerances::new(Some(1e-6), None, Some(25)).expect("valid tolerances");
        let opts = MLEOptions::new(tols, LineSearcher::HagerZhang, false, Some(11)).expect("valid");

        // Act / Assert
        assert!(build_optimizer_hager_zhang(&opts).is_ok());
        assert!(build_optimizer_more_thuente(&opts).is_ok());
    }
}
