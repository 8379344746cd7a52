//! Truncated sums over an unbounded count support.
//!
//! [`sum_until_converged`] is the one place that walks `j = 0, 1, 2, …`
//! accumulating probability mass until the running cdf exceeds `1 − ε`.
//! Quadratic and ranked-probability scores and total-mass checks all go
//! through it.
//!
//! Termination: the closure reports the point mass at each `j`; as long as
//! those masses form a proper distribution the running cdf reaches `1 − ε`
//! in finitely many steps. [`MAX_SUPPORT_TERMS`] turns a defective
//! distribution into [`CountError::TruncationNotReached`] instead of a hang.
use crate::counts::{
    core::validation::validate_tolerance,
    errors::{CountError, CountResult},
};

/// Default truncation tolerance `ε`.
pub const DEFAULT_TOLERANCE: f64 = 1e-10;

/// Hard cap on the number of support points visited.
pub const MAX_SUPPORT_TERMS: usize = 1_000_000;

/// One support point: its probability mass and the summand it contributes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SupportTerm {
    pub mass: f64,
    pub value: f64,
}

/// Result of a truncated sum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TruncatedSum {
    /// Sum of the `value` fields.
    pub value: f64,
    /// Probability mass covered, `> 1 − ε`.
    pub mass: f64,
    /// Number of support points visited.
    pub terms: usize,
}

/// Sum `term(j).value` for `j = 0, 1, …` until the accumulated
/// `term(j).mass` exceeds `1 − tolerance` and `j >= min_index`.
///
/// # Errors
/// - [`CountError::InvalidTolerance`] unless `0 < tolerance < 1`.
/// - [`CountError::TruncationNotReached`] after [`MAX_SUPPORT_TERMS`] terms.
/// - Whatever `term` returns.
pub fn sum_until_converged<F>(
    tolerance: f64, min_index: u64, mut term: F,
) -> CountResult<TruncatedSum>
where
    F: FnMut(u64) -> CountResult<SupportTerm>,
{
    let tolerance = validate_tolerance(tolerance)?;
    let target = 1.0 - tolerance;
    let mut mass = 0.0;
    let mut value = 0.0;
    for j in 0..MAX_SUPPORT_TERMS as u64 {
        let step = term(j)?;
        mass += step.mass;
        value += step.value;
        if mass > target && j >= min_index {
            return Ok(TruncatedSum { value, mass, terms: j as usize + 1 });
        }
    }
    Err(CountError::TruncationNotReached { terms: MAX_SUPPORT_TERMS, mass })
}
