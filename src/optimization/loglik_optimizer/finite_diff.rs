//! Finite-difference helpers: a forward-difference gradient with error
//! capture, and Hessians of a gradient map for observed-information
//! standard errors.
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        types::Hessian,
        validation::{validate_grad, validate_hessian},
        Grad, Theta,
    },
};
use argmin::core::Error;
use finitediff::FiniteDiff;
use std::cell::RefCell;

/// Forward-difference gradient of `func` at `theta`.
///
/// `func` reports failures by storing an error in `closure_err` and returning
/// `NaN`. The slot is cleared first; a captured error is returned as-is,
/// otherwise the gradient is validated.
///
/// # Errors
/// The captured evaluation error, or a gradient validation error.
pub fn run_fd_diff<G: Fn(&Theta) -> f64>(
    theta: &Theta, func: &G, closure_err: &RefCell<Option<Error>>,
) -> OptResult<Grad> {
    closure_err.replace(None);
    let fd_grad = theta.forward_diff(func);
    if let Some(err) = closure_err.take() {
        return Err(err.into());
    }
    validate_grad(&fd_grad, theta.len())?;
    Ok(fd_grad)
}

/// Hessian of a scalar function given its gradient map `f`.
///
/// Central differences of `f` first; if that produces non-finite entries
/// (for example because a perturbed point left the model domain) forward
/// differences are tried. The accepted matrix is symmetrized.
///
/// # Errors
/// [`OptError::InvalidHessian`](crate::optimization::errors::OptError::InvalidHessian)
/// when neither scheme yields a finite matrix.
pub fn compute_hessian<F: Fn(&Theta) -> Grad>(f: &F, theta: &Theta) -> OptResult<Hessian> {
    let dim = theta.len();
    let mut hess = theta.central_hessian(f);
    if validate_hessian(&hess, dim).is_err() {
        hess = theta.forward_hessian(f);
        validate_hessian(&hess, dim)?;
    }
    symmetrize_hess(&mut hess);
    Ok(hess)
}

fn symmetrize_hess(hess: &mut Hessian) {
    for i in 0..hess.nrows() {
        for j in 0..i {
            let avg = 0.5 * (hess[[i, j]] + hess[[j, i]]);
            hess[[i, j]] = avg;
            hess[[j, i]] = avg;
        }
    }
}
