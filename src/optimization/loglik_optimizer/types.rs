//! Numeric aliases and solver wiring for the log-likelihood optimizer.
//!
//! Everything downstream refers to these aliases instead of raw `ndarray`
//! containers or argmin generics, so the solver backend can change in one
//! place.
use argmin::solver::{
    linesearch::{HagerZhangLineSearch, MoreThuenteLineSearch},
    quasinewton::LBFGS,
};
use ndarray::{Array1, Array2};
use std::collections::HashMap;

/// Unconstrained parameter vector `θ`.
pub type Theta = Array1<f64>;

/// Gradient vector, same shape as [`Theta`].
pub type Grad = Array1<f64>;

/// Dense `n × n` Hessian for `n = θ.len()`.
pub type Hessian = Array2<f64>;

/// Scalar solver objective, the cost `c(θ) = -ℓ(θ)`.
pub type Cost = f64;

/// Function-evaluation counters reported by argmin (`"cost_count"`, ...).
pub type FnEvalMap = HashMap<String, u64>;

/// Default L-BFGS history size.
pub const DEFAULT_LBFGS_MEM: usize = 7;

pub type HagerZhangLS = HagerZhangLineSearch<Theta, Grad, Cost>;

pub type MoreThuenteLS = MoreThuenteLineSearch<Theta, Grad, Cost>;

pub type LbfgsHagerZhang = LBFGS<HagerZhangLS, Theta, Grad, Cost>;

pub type LbfgsMoreThuente = LBFGS<MoreThuenteLS, Theta, Grad, Cost>;
