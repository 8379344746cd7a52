//! Errors for convolution-closed count models (data validation, parameter
//! layout and range checks, truncation budgets, and optimizer failures).
//!
//! This module defines the model error type, [`CountError`], and a parameter
//! error type, [`ParamError`]. Every [`CountError`] reports an [`ErrorKind`]
//! so callers can branch on the broad taxonomy without matching variants:
//!
//! - [`ErrorKind::Domain`]: malformed inputs (negative or non-integer counts,
//!   covariate misalignment, parameters outside their declared range).
//! - [`ErrorKind::Configuration`]: invalid tuning options (tolerances,
//!   simulation lengths, truncation budgets, unknown model names).
//! - [`ErrorKind::Convergence`]: the optimizer stopped without meeting its
//!   tolerance; the best parameter vector found is carried along.
//! - [`ErrorKind::Numerical`]: optimizer or linear-algebra failures that are
//!   none of the above.
//!
//! ## Conventions
//! - **Indices are 0-based**.
//! - Counts must be finite, non-negative and integral.
//! - Optimizer errors are mapped back through [`From<OptError>`]; model
//!   errors raised inside the optimizer loop keep their original variant.
use crate::optimization::errors::OptError;

/// Crate-wide result alias for count-model operations.
pub type CountResult<T> = Result<T, CountError>;

/// Result alias for parameter construction and validation.
pub type ParamResult<T> = Result<T, ParamError>;

/// Broad classification of a [`CountError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Domain,
    Configuration,
    Convergence,
    Numerical,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorKind::Domain => "DomainError",
            ErrorKind::Configuration => "ConfigurationError",
            ErrorKind::Convergence => "ConvergenceError",
            ErrorKind::Numerical => "NumericalError",
        };
        write!(f, "{name}")
    }
}

/// Unified error type for count modeling.
#[derive(Debug, Clone, PartialEq)]
pub enum CountError {
    // ---- Input/data validation ----
    /// Series is empty.
    EmptySeries,

    /// A data point is NaN/±inf.
    NonFiniteData { index: usize, value: f64 },

    /// A data point is negative.
    NegativeCount { index: usize, value: f64 },

    /// A data point has a fractional part.
    NonIntegerCount { index: usize, value: f64 },

    /// The series has no observation after the conditioning lags.
    SeriesTooShort { len: usize, order: usize },

    /// Covariate matrix rows must align with the series.
    CovariateRowMismatch { rows: usize, len: usize },

    /// Covariate matrix columns must match the model's coefficient count.
    CovariateColumnMismatch { expected: usize, actual: usize },

    /// A covariate entry is NaN/±inf.
    NonFiniteCovariate { row: usize, col: usize, value: f64 },

    /// The model has regression coefficients but no covariates were given.
    MissingCovariates,

    /// Covariates were given to a model without regression coefficients.
    UnexpectedCovariates,

    /// History passed to the transition law has the wrong length.
    HistoryLengthMismatch { expected: usize, actual: usize },

    /// A linked rate is non-positive or non-finite.
    NonPositiveRate { value: f64 },

    // ---- Parameters ----
    /// Parameter vector layout or range violation.
    Param(ParamError),

    // ---- Configuration ----
    /// Truncation tolerance must lie in (0, 1).
    InvalidTolerance { value: f64 },

    /// A truncated sum did not reach `1 − ε` within the term budget.
    TruncationNotReached { terms: usize, mass: f64 },

    /// Simulation length must be positive.
    InvalidSimLength { n: usize },

    /// Unknown family, order or link name.
    UnknownModelName { kind: &'static str, name: String },

    // ---- Estimation / optimizer ----
    /// Optimizer stopped without meeting its tolerance.
    ConvergenceFailed { status: String, best_params: Vec<f64>, loglik: f64 },

    /// Optimizer or backend failure.
    OptimizationFailed { status: String },

    /// Moment-based initialization could not solve its least-squares step.
    InitFailed { reason: String },

    /// Wrapper for `rand_distr` constructor rejections.
    InvalidSampler { reason: String },
}

impl CountError {
    /// Taxonomy bucket of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CountError::EmptySeries
            | CountError::NonFiniteData { .. }
            | CountError::NegativeCount { .. }
            | CountError::NonIntegerCount { .. }
            | CountError::SeriesTooShort { .. }
            | CountError::CovariateRowMismatch { .. }
            | CountError::CovariateColumnMismatch { .. }
            | CountError::NonFiniteCovariate { .. }
            | CountError::MissingCovariates
            | CountError::UnexpectedCovariates
            | CountError::HistoryLengthMismatch { .. }
            | CountError::NonPositiveRate { .. }
            | CountError::Param(_) => ErrorKind::Domain,
            CountError::InvalidTolerance { .. }
            | CountError::TruncationNotReached { .. }
            | CountError::InvalidSimLength { .. }
            | CountError::UnknownModelName { .. } => ErrorKind::Configuration,
            CountError::ConvergenceFailed { .. } => ErrorKind::Convergence,
            CountError::OptimizationFailed { .. }
            | CountError::InitFailed { .. }
            | CountError::InvalidSampler { .. } => ErrorKind::Numerical,
        }
    }
}

impl std::error::Error for CountError {}

impl std::fmt::Display for CountError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Input/data validation ----
            CountError::EmptySeries => write!(f, "Input series is empty."),
            CountError::NonFiniteData { index, value } => {
                write!(f, "Data point at index {index} is non-finite: {value}")
            }
            CountError::NegativeCount { index, value } => {
                write!(f, "Data point at index {index} is negative: {value}")
            }
            CountError::NonIntegerCount { index, value } => {
                write!(f, "Data point at index {index} is not an integer: {value}")
            }
            CountError::SeriesTooShort { len, order } => {
                write!(f, "Series of length {len} leaves no observations after {order} lag(s).")
            }
            CountError::CovariateRowMismatch { rows, len } => {
                write!(f, "Covariate matrix has {rows} rows but the series has length {len}.")
            }
            CountError::CovariateColumnMismatch { expected, actual } => {
                write!(f, "Covariate matrix has {actual} columns; the model expects {expected}.")
            }
            CountError::NonFiniteCovariate { row, col, value } => {
                write!(f, "Covariate at ({row}, {col}) is non-finite: {value}")
            }
            CountError::MissingCovariates => {
                write!(f, "Model has regression coefficients but no covariates were supplied.")
            }
            CountError::UnexpectedCovariates => {
                write!(f, "Covariates were supplied to a model without regression coefficients.")
            }
            CountError::HistoryLengthMismatch { expected, actual } => {
                write!(f, "History must hold {expected} lagged count(s); got {actual}.")
            }
            CountError::NonPositiveRate { value } => {
                write!(f, "Linked innovation rate must be finite and > 0; got: {value}")
            }
            // ---- Parameters ----
            CountError::Param(err) => write!(f, "{err}"),
            // ---- Configuration ----
            CountError::InvalidTolerance { value } => {
                write!(f, "Truncation tolerance must lie in (0, 1); got: {value}")
            }
            CountError::TruncationNotReached { terms, mass } => {
                write!(f, "Truncated sum reached mass {mass} after {terms} terms; not converged.")
            }
            CountError::InvalidSimLength { n } => {
                write!(f, "Simulation length must be positive; got: {n}")
            }
            CountError::UnknownModelName { kind, name } => {
                write!(f, "Unknown {kind} '{name}'.")
            }
            // ---- Estimation / optimizer ----
            CountError::ConvergenceFailed { status, best_params, loglik } => {
                write!(
                    f,
                    "Optimizer did not converge ({status}); best ℓ = {loglik} at {best_params:?}"
                )
            }
            CountError::OptimizationFailed { status } => {
                write!(f, "Optimization failed: {status}")
            }
            CountError::InitFailed { reason } => {
                write!(f, "Moment-based initialization failed: {reason}")
            }
            CountError::InvalidSampler { reason } => {
                write!(f, "Sampler construction failed: {reason}")
            }
        }
    }
}

/// Parameter-vector layout and range violations.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamError {
    /// Parameter vector length does not match the model layout.
    ParamLengthMismatch { expected: usize, actual: usize },

    /// Parameters were built for a different model specification.
    SpecMismatch,

    /// Rate must be finite and > 0.
    InvalidRate { value: f64 },

    /// Thinning probabilities must be finite and in (0, 1).
    InvalidThinning { index: usize, value: f64 },

    /// Thinning probabilities must sum to < 1.
    StationarityViolated { coeff_sum: f64 },

    /// Dispersion must be finite and in [0, 1).
    InvalidDispersion { value: f64 },

    /// Regression coefficients must be finite.
    NonFiniteCoefficient { index: usize, value: f64 },

    /// θ length does not match the model layout.
    ThetaLengthMismatch { expected: usize, actual: usize },

    /// θ entries must be finite.
    InvalidThetaInput { index: usize, value: f64 },
}

impl std::error::Error for ParamError {}

impl std::fmt::Display for ParamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamError::ParamLengthMismatch { expected, actual } => {
                write!(f, "Parameter vector must have length {expected}; got {actual}")
            }
            ParamError::SpecMismatch => {
                write!(f, "Parameters belong to a different model specification.")
            }
            ParamError::InvalidRate { value } => {
                write!(f, "Rate must be finite and > 0; got: {value}")
            }
            ParamError::InvalidThinning { index, value } => {
                write!(f, "Thinning probability {index} must lie in (0, 1); got: {value}")
            }
            ParamError::StationarityViolated { coeff_sum } => {
                write!(f, "Thinning probabilities sum to {coeff_sum}; stationarity needs < 1")
            }
            ParamError::InvalidDispersion { value } => {
                write!(f, "Dispersion must lie in [0, 1); got: {value}")
            }
            ParamError::NonFiniteCoefficient { index, value } => {
                write!(f, "Coefficient {index} must be finite; got: {value}")
            }
            ParamError::ThetaLengthMismatch { expected, actual } => {
                write!(f, "Theta must have length {expected}; got {actual}")
            }
            ParamError::InvalidThetaInput { index, value } => {
                write!(f, "Theta entry {index} must be finite; got: {value}")
            }
        }
    }
}

impl From<ParamError> for CountError {
    fn from(err: ParamError) -> Self {
        CountError::Param(err)
    }
}

impl From<OptError> for CountError {
    /// Map optimizer errors back into the model taxonomy.
    ///
    /// Model errors raised inside the cost or gradient callbacks come back
    /// unchanged; parameter-transform failures become [`ParamError`]s; the
    /// rest are numerical failures carrying the optimizer's message.
    fn from(err: OptError) -> Self {
        match err {
            OptError::ModelFailure { source } => source,
            OptError::StationarityViolated { coeff_sum } => {
                ParamError::StationarityViolated { coeff_sum }.into()
            }
            OptError::ThetaLengthMismatch { expected, actual } => {
                ParamError::ThetaLengthMismatch { expected, actual }.into()
            }
            OptError::InvalidThetaInput { index, value } => {
                ParamError::InvalidThetaInput { index, value }.into()
            }
            OptError::InvalidTransformedParam { name, value } => match name {
                "rate" => ParamError::InvalidRate { value }.into(),
                "thinning" => ParamError::InvalidThinning { index: 0, value }.into(),
                "dispersion" => ParamError::InvalidDispersion { value }.into(),
                _ => CountError::OptimizationFailed { status: format!("{name} = {value}") },
            },
            other => CountError::OptimizationFailed { status: other.to_string() },
        }
    }
}

impl From<rand_distr::BinomialError> for CountError {
    fn from(err: rand_distr::BinomialError) -> Self {
        CountError::InvalidSampler { reason: err.to_string() }
    }
}

impl From<rand_distr::PoissonError> for CountError {
    fn from(err: rand_distr::PoissonError) -> Self {
        CountError::InvalidSampler { reason: err.to_string() }
    }
}
