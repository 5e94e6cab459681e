use std::fmt;

use thiserror::Error;

use crate::expr::ParseError;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The formula text could not be parsed
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Use this when a formula depends on more than one free variable
    #[error("the formula must depend on a single variable, found {}", .variables.join(", "))]
    TooManyVariables { variables: Vec<String> },

    /// Use this when a formula has no free variable at all
    #[error("the formula must depend on a single variable, found none")]
    NoVariable,

    /// The derivative is written in terms of a different variable than the function
    #[error("the derivative must depend on `{expected}` only, found {}", .found.join(", "))]
    DerivativeVariable { expected: String, found: Vec<String> },

    #[error("the function must have opposite signs at a and b: f({a}) = {fa}, f({b}) = {fb}")]
    NoSignChange { a: f64, b: f64, fa: f64, fb: f64 },

    #[error("tolerance must be positive and finite, got {0}")]
    InvalidTolerance(f64),

    #[error("bracket bounds must be finite, got [{a}, {b}]")]
    NonFiniteBound { a: f64, b: f64 },

    /// Newton's update divides by the derivative, which vanished at `x`
    #[error("division by zero: the derivative vanishes at x = {x}")]
    ZeroDerivative { x: f64 },

    #[error("the function evaluated to {value} at x = {x}")]
    NonFiniteValue { x: f64, value: f64 },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// The top-level error type for this crate.
#[derive(Debug, Error)]
pub struct Error {
    #[source]
    source: ErrorKind,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.source.fmt(f)
    }
}

impl From<ErrorKind> for Error {
    fn from(source: ErrorKind) -> Self {
        Self { source }
    }
}

impl From<ParseError> for Error {
    fn from(value: ParseError) -> Self {
        ErrorKind::Parse(value).into()
    }
}

impl From<anyhow::Error> for Error {
    fn from(value: anyhow::Error) -> Self {
        ErrorKind::Other(value).into()
    }
}

impl Error {
    #[must_use]
    pub const fn kind(&self) -> &ErrorKind {
        &self.source
    }

    /// Whether the input was rejected before any iteration took place.
    ///
    /// These are the errors caused by malformed formulas, brackets without a
    /// sign change and nonsensical tolerances. Arithmetic failures during the
    /// iteration itself are not validation errors.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self.source,
            ErrorKind::Parse(_)
                | ErrorKind::TooManyVariables { .. }
                | ErrorKind::NoVariable
                | ErrorKind::DerivativeVariable { .. }
                | ErrorKind::NoSignChange { .. }
                | ErrorKind::InvalidTolerance(_)
                | ErrorKind::NonFiniteBound { .. }
        )
    }

    pub(crate) fn too_many_variables(variables: Vec<String>) -> Self {
        ErrorKind::TooManyVariables { variables }.into()
    }

    pub(crate) fn no_variable() -> Self {
        ErrorKind::NoVariable.into()
    }

    pub(crate) fn derivative_variable(expected: &str, found: Vec<String>) -> Self {
        ErrorKind::DerivativeVariable {
            expected: expected.to_owned(),
            found,
        }
        .into()
    }

    pub(crate) fn no_sign_change(a: f64, b: f64, fa: f64, fb: f64) -> Self {
        ErrorKind::NoSignChange { a, b, fa, fb }.into()
    }

    pub(crate) fn invalid_tolerance(tol: f64) -> Self {
        ErrorKind::InvalidTolerance(tol).into()
    }

    pub(crate) fn non_finite_bound(a: f64, b: f64) -> Self {
        ErrorKind::NonFiniteBound { a, b }.into()
    }

    pub(crate) fn zero_derivative(x: f64) -> Self {
        ErrorKind::ZeroDerivative { x }.into()
    }

    pub(crate) fn non_finite_value(x: f64, value: f64) -> Self {
        ErrorKind::NonFiniteValue { x, value }.into()
    }
}

pub type Result<T> = std::result::Result<T, Error>;
