//! Error surface for the optimization layer.
//!
//! [`OptError`] gathers everything that can fail while configuring or running
//! a maximum-likelihood solve: tolerance/option validation, gradient and
//! Hessian checks, errors raised by argmin, and model errors surfaced from
//! inside the cost/gradient callbacks. Model errors keep their original
//! [`CountError`] so the fitting layer can recover the domain/configuration
//! classification after the solver returns.
use argmin::core::{ArgminError, Error};

use crate::counts::errors::{CountError, ParamError};

/// Result alias for optimizer operations.
pub type OptResult<T> = Result<T, OptError>;

/// Unified error type for the optimizer stack.
#[derive(Debug, Clone, PartialEq)]
pub enum OptError {
    // ---- Gradient ----
    /// The model has no analytic gradient; the adapter falls back to finite differences.
    GradientNotImplemented,

    GradientDimMismatch {
        expected: usize,
        found: usize,
    },

    InvalidGradient {
        index: usize,
        value: f64,
        reason: &'static str,
    },

    // ---- MLEOptions ----
    InvalidTolGrad {
        tol: f64,
        reason: &'static str,
    },
    InvalidTolCost {
        tol: f64,
        reason: &'static str,
    },
    InvalidMaxIter {
        max_iter: usize,
        reason: &'static str,
    },
    NoTolerancesProvided,

    InvalidLineSearch {
        name: String,
        reason: &'static str,
    },

    InvalidLBFGSMem {
        mem: usize,
        reason: &'static str,
    },

    // ---- Cost function ----
    NonFiniteCost {
        value: f64,
    },

    // ---- Optimizer outcome ----
    InvalidThetaHat {
        index: usize,
        value: f64,
        reason: &'static str,
    },

    MissingThetaHat,

    // ---- Argmin ---
    InvalidParameter {
        text: String,
    },
    NotImplemented {
        text: String,
    },
    NotInitialized {
        text: String,
    },
    ConditionViolated {
        text: String,
    },
    CheckPointNotFound {
        text: String,
    },
    PotentialBug {
        text: String,
    },
    ImpossibleError {
        text: String,
    },
    BackendError {
        text: String,
    },

    // ---- Finite Diffs ----
    HessianDimMismatch {
        expected: usize,
        found: (usize, usize),
    },

    InvalidHessian {
        row: usize,
        col: usize,
        value: f64,
    },

    // ---- Param Errors ----
    StationarityViolated {
        coeff_sum: f64,
    },

    ThetaLengthMismatch {
        expected: usize,
        actual: usize,
    },

    InvalidThetaInput {
        index: usize,
        value: f64,
    },

    InvalidTransformedParam {
        name: &'static str,
        value: f64,
    },

    // ---- Count model ----
    /// A count-model error raised while evaluating the likelihood.
    ModelFailure {
        source: CountError,
    },

    // ---- Fallback ----
    UnknownError,
}

impl std::error::Error for OptError {}

impl std::fmt::Display for OptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Gradient ----
            OptError::GradientNotImplemented => {
                write!(f, "Analytic gradient not implemented")
            }
            OptError::GradientDimMismatch { expected, found } => {
                write!(f, "Gradient dimension mismatch: expected {expected}, found {found}")
            }
            OptError::InvalidGradient { index, value, reason } => {
                write!(f, "Invalid gradient at index {index}: {value}: {reason}")
            }

            // ---- MLEOptions ----
            OptError::InvalidTolGrad { tol, reason } => {
                write!(f, "Invalid gradient tolerance {tol}: {reason}")
            }
            OptError::InvalidTolCost { tol, reason } => {
                write!(f, "Invalid cost change tolerance {tol}: {reason}")
            }
            OptError::InvalidMaxIter { max_iter, reason } => {
                write!(f, "Invalid maximum iterations {max_iter}: {reason}")
            }
            OptError::NoTolerancesProvided => {
                write!(f, "No tolerances provided")
            }
            OptError::InvalidLineSearch { name, reason } => {
                write!(f, "Invalid line searcher '{name}': {reason}")
            }
            OptError::InvalidLBFGSMem { mem, reason } => {
                write!(f, "Invalid L-BFGS memory {mem}: {reason}")
            }

            // ---- Cost function ----
            OptError::NonFiniteCost { value } => {
                write!(f, "Non-finite cost value: {value}")
            }

            // ---- Optimizer outcome ----
            OptError::InvalidThetaHat { index, value, reason } => {
                write!(f, "Invalid estimated parameter at index {index}: {value}: {reason}")
            }
            OptError::MissingThetaHat => {
                write!(f, "Solver returned no best parameter vector")
            }

            // ---- Argmin ----
            OptError::InvalidParameter { text } => write!(f, "Invalid parameter: {text}"),
            OptError::NotImplemented { text } => write!(f, "Not implemented: {text}"),
            OptError::NotInitialized { text } => write!(f, "Not initialized: {text}"),
            OptError::ConditionViolated { text } => write!(f, "Condition violated: {text}"),
            OptError::CheckPointNotFound { text } => write!(f, "Checkpoint not found: {text}"),
            OptError::PotentialBug { text } => write!(f, "Potential bug: {text}"),
            OptError::ImpossibleError { text } => write!(f, "Impossible error: {text}"),
            OptError::BackendError { text } => write!(f, "Backend error: {text}"),

            // ---- Finite Diffs ----
            OptError::HessianDimMismatch { expected, found } => {
                write!(
                    f,
                    "Hessian dimension mismatch: expected ({expected}, {expected}), found {found:?}"
                )
            }
            OptError::InvalidHessian { row, col, value } => {
                write!(f, "Invalid Hessian at ({row}, {col}): {value}, must be finite")
            }

            // ---- Param Errors ----
            OptError::StationarityViolated { coeff_sum } => {
                write!(f, "Thinning probabilities sum to {coeff_sum}, which is >= 1")
            }
            OptError::ThetaLengthMismatch { expected, actual } => {
                write!(f, "Theta length mismatch: expected {expected}, actual {actual}")
            }
            OptError::InvalidThetaInput { index, value } => {
                write!(f, "Invalid theta input at index {index}: {value}, must be finite")
            }
            OptError::InvalidTransformedParam { name, value } => {
                write!(f, "Transformed parameter '{name}' left its domain: {value}")
            }

            // ---- Count model ----
            OptError::ModelFailure { source } => {
                write!(f, "Model evaluation failed: {source}")
            }

            // ---- Fallback ----
            OptError::UnknownError => {
                write!(f, "Unknown error")
            }
        }
    }
}

impl From<Error> for OptError {
    /// Recover an [`OptError`] from an argmin error.
    ///
    /// Errors that started life as `OptError` (raised from the adapter's
    /// cost/gradient callbacks) are unwrapped unchanged; argmin's own errors
    /// are mapped variant by variant; anything else becomes `BackendError`.
    fn from(original_err: Error) -> Self {
        let original_err = match original_err.downcast::<OptError>() {
            Ok(opt_err) => return opt_err,
            Err(other) => other,
        };
        match original_err.downcast() {
            Ok(argmin_err) => match argmin_err {
                ArgminError::InvalidParameter { text } => OptError::InvalidParameter { text },
                ArgminError::NotImplemented { text } => OptError::NotImplemented { text },
                ArgminError::NotInitialized { text } => OptError::NotInitialized { text },
                ArgminError::ConditionViolated { text } => OptError::ConditionViolated { text },
                ArgminError::CheckpointNotFound { text } => OptError::CheckPointNotFound { text },
                ArgminError::PotentialBug { text } => OptError::PotentialBug { text },
                ArgminError::ImpossibleError { text } => OptError::ImpossibleError { text },
                _ => OptError::UnknownError,
            },
            Err(err) => OptError::BackendError { text: err.to_string() },
        }
    }
}

impl From<ParamError> for OptError {
    fn from(err: ParamError) -> Self {
        match err {
            ParamError::StationarityViolated { coeff_sum } => {
                OptError::StationarityViolated { coeff_sum }
            }
            ParamError::ThetaLengthMismatch { expected, actual } => {
                OptError::ThetaLengthMismatch { expected, actual }
            }
            ParamError::InvalidThetaInput { index, value } => {
                OptError::InvalidThetaInput { index, value }
            }
            ParamError::InvalidRate { value } => {
                OptError::InvalidTransformedParam { name: "rate", value }
            }
            ParamError::InvalidThinning { value, .. } => {
                OptError::InvalidTransformedParam { name: "thinning", value }
            }
            ParamError::InvalidDispersion { value } => {
                OptError::InvalidTransformedParam { name: "dispersion", value }
            }
            other => OptError::ModelFailure { source: CountError::Param(other) },
        }
    }
}

impl From<CountError> for OptError {
    fn from(err: CountError) -> Self {
        match err {
            CountError::Param(param_err) => param_err.into(),
            other => OptError::ModelFailure { source: other },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Round-tripping an `OptError` through argmin's boxed error type.
    // - Mapping argmin's own error variants.
    // - Conversions from count-model errors.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // An `OptError` raised inside a cost callback must come back unchanged
    // after argmin wraps it.
    //
    // Given
    // -----
    // - `OptError::NonFiniteCost` converted into `argmin::core::Error`.
    //
    // Expect
    // ------
    // - Converting back yields the identical variant and payload.
    fn opt_error_survives_argmin_round_trip() {
        // Arrange
        let original = OptError::NonFiniteCost { value: f64::INFINITY };
        let boxed: Error = original.clone().into();

        // Act
        let recovered = OptError::from(boxed);

        // Assert
        assert_eq!(recovered, original);
    }

    #[test]
    // Purpose
    // -------
    // Argmin's own error variants map to their named counterparts.
    //
    // Given
    // -----
    // - `ArgminError::ConditionViolated` boxed as an argmin error.
    //
    // Expect
    // ------
    // - `OptError::ConditionViolated` with the same text.
    fn argmin_error_maps_variant_by_variant() {
        // Arrange
        let boxed: Error = ArgminError::ConditionViolated { text: "ls".to_string() }.into();

        // Act
        let mapped = OptError::from(boxed);

        // Assert
        assert_eq!(mapped, OptError::ConditionViolated { text: "ls".to_string() });
    }

    #[test]
    // Purpose
    // -------
    // Parameter errors keep their structure, other count errors are wrapped.
    //
    // Given
    // -----
    // - A stationarity violation wrapped in `CountError::Param`.
    // - A plain `CountError::EmptySeries`.
    //
    // Expect
    // ------
    // - The first maps to `StationarityViolated`, the second to `ModelFailure`.
    fn count_errors_convert_into_opt_errors() {
        // Arrange
        let stationarity = CountError::Param(ParamError::StationarityViolated { coeff_sum: 1.2 });
        let empty = CountError::EmptySeries;

        // Act
        let a = OptError::from(stationarity);
        let b = OptError::from(empty);

        // Assert
        assert_eq!(a, OptError::StationarityViolated { coeff_sum: 1.2 });
        assert_eq!(b, OptError::ModelFailure { source: CountError::EmptySeries });
    }
}
