//! Root finders for real functions of one variable.
//!
//! Each method comes in two flavours: one taking formula text, e.g.
//! [`bisect`], and one taking native closures, e.g. [`bisection`]. Both return
//! a [`Solution`] carrying the full iteration history, which is what the
//! [`crate::report`] module turns into tables.

use std::fmt;

use crate::{Error, Result};

mod bisection;
pub use bisection::{bisect, bisection, required_iterations, BisectionStep};
mod newton;
pub use newton::{newton, newton_raphson, NewtonStep};

/// How a root finder terminated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    /// The tolerance was met.
    Converged,

    /// The function evaluated to exactly zero at the estimate.
    ExactRoot,

    /// The iteration budget ran out before the tolerance was met.
    Exhausted,
}

/// Non-fatal conditions noticed while solving.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Warning {
    /// Bisection was given fewer iterations than it needs to reach the
    /// tolerance from the initial bracket.
    InsufficientBudget { required: usize, given: usize },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientBudget { required, given } => write!(
                f,
                "at least {required} iterations are required, but max_iter = {given}"
            ),
        }
    }
}

/// Outcome of a root finder.
#[derive(Clone, Debug, PartialEq)]
pub struct Solution<S> {
    /// The last estimate, whether or not it converged.
    pub root: f64,
    pub status: Status,
    /// One record per reported iteration.
    pub history: Vec<S>,
    pub warnings: Vec<Warning>,
}

impl<S> Solution<S> {
    /// Whether the root satisfies the requested tolerance.
    #[must_use]
    pub const fn is_converged(&self) -> bool {
        matches!(self.status, Status::Converged | Status::ExactRoot)
    }
}

/// Strict sign comparison. Zero and `NaN` have no sign.
///
/// Comparing signs instead of testing `fa * fb < 0` is immune to the product
/// underflowing to zero.
fn opposite_signs(fa: f64, fb: f64) -> bool {
    (fa < 0.0 && fb > 0.0) || (fa > 0.0 && fb < 0.0)
}

fn check_tolerance(tol: f64) -> Result<()> {
    if tol > 0.0 && tol.is_finite() {
        Ok(())
    } else {
        Err(Error::invalid_tolerance(tol))
    }
}

#[cfg(test)]
mod test {
    use super::{check_tolerance, opposite_signs, Warning};

    #[test]
    fn signs() {
        assert!(opposite_signs(-1.0, 1.0));
        assert!(opposite_signs(4.0, -0.5));
        assert!(!opposite_signs(1.0, 4.0));
        assert!(!opposite_signs(0.0, 1.0));
        assert!(!opposite_signs(-0.0, 1.0));
        assert!(!opposite_signs(f64::NAN, 1.0));
        // a naive product underflows to zero here
        assert!(opposite_signs(1e-200, -1e-200));
    }

    #[test]
    fn tolerances() {
        assert!(check_tolerance(1e-5).is_ok());
        assert!(check_tolerance(0.0).is_err());
        assert!(check_tolerance(-1e-5).is_err());
        assert!(check_tolerance(f64::NAN).is_err());
        assert!(check_tolerance(f64::INFINITY).is_err());
    }

    #[test]
    fn warning_message() {
        let w = Warning::InsufficientBudget {
            required: 24,
            given: 10,
        };
        assert_eq!(
            w.to_string(),
            "at least 24 iterations are required, but max_iter = 10"
        );
    }
}
