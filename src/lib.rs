//! rust_countseries — convolution-closed INAR count time-series models.
//!
//! Purpose
//! -------
//! Serve as the crate root for integer-valued autoregressive models of order
//! one and two with Poisson or generalized-Poisson innovations, optional
//! covariates through a link function, and the tools around them:
//! simulation, maximum-likelihood fitting, and goodness-of-fit diagnostics.
//!
//! Key behaviors
//! -------------
//! - [`counts`]: data containers, model specifications, transition
//!   densities, simulation and the MLE model.
//! - [`diagnostics`]: parametric bootstrap ACF envelopes and proper scoring
//!   rules (logarithmic, quadratic, ranked probability).
//! - [`optimization`] and [`inference`]: the argmin-backed L-BFGS driver,
//!   parameter transforms, and observed-information covariances.
//! - [`backend`]: the [`ComputeBackend`](backend::ComputeBackend) seam that
//!   routes fitting and diagnostics through a chosen implementation.
//!
//! Invariants & assumptions
//! ------------------------
//! - Counts are non-negative integers and parameters satisfy their model
//!   constraints once constructed; violations are typed errors, not panics.
//! - Stochastic routines take explicit seeds and are reproducible.
//!
//! Conventions
//! -----------
//! - Histories are ordered oldest first.
//! - Errors carry an [`ErrorKind`](counts::errors::ErrorKind) so callers can
//!   tell domain, configuration, convergence and numerical failures apart.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to the code they cover; `tests/` runs the public
//!   pipeline from simulation through fitting to diagnostics.

pub mod backend;
pub mod counts;
pub mod diagnostics;
pub mod inference;
pub mod optimization;
