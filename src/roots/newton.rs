use super::{check_tolerance, Solution, Status};
use crate::{expr::parse, Error, Formula, Result};

/// One reported row of a Newton-Raphson run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NewtonStep {
    /// 0-based iteration counter
    pub iter: usize,
    /// The new estimate
    pub x: f64,
    pub fx: f64,
    pub dfx: f64,
    /// Relative change from the previous estimate
    pub error: f64,
}

/// `|x - x_old| / |x|`, falling back to the absolute change when `x` is zero.
#[allow(clippy::float_cmp)]
fn relative_error(x: f64, x_old: f64) -> f64 {
    let delta = (x - x_old).abs();
    if x == 0.0 {
        delta
    } else {
        delta / x.abs()
    }
}

/// Root finding using Newton-Raphson. `f` and `df` are the function and its
/// first derivative, `x0` is the initial guess.
///
/// Makes at most `max_iter` steps `x = x0 - f(x0) / df(x0)` and stops as soon
/// as the relative change `|x - x0| / |x|` drops below `tol`. The last
/// estimate is returned even if the budget runs out first, check
/// [`Solution::status`] to tell the two cases apart. With `max_iter == 0` the
/// initial guess is returned and the history is empty.
///
/// # Errors
/// - `InvalidTolerance` if `tol` is not positive and finite
/// - `ZeroDerivative` if `df` vanishes at an estimate, since the update would
///   divide by zero
/// - `NonFiniteValue` if `f`, `df` or the update is not finite
///
/// # Examples
///
/// ```
/// use logistic_roots::roots::{newton_raphson, Status};
///
/// let f = |x: f64| x * x - 4.0;
/// let df = |x: f64| 2.0 * x;
/// let solution = newton_raphson(&f, &df, 3.0, 1e-5, 30).unwrap();
/// assert_eq!(solution.status, Status::Converged);
/// assert!((solution.root - 2.0).abs() < 1e-9);
/// ```
#[allow(clippy::float_cmp)]
pub fn newton_raphson<F1, F2>(
    f: &F1,
    df: &F2,
    x0: f64,
    tol: f64,
    max_iter: usize,
) -> Result<Solution<NewtonStep>>
where
    F1: Fn(f64) -> f64,
    F2: Fn(f64) -> f64,
{
    log::trace!("starting with arguments: {{x0: {x0}, tol: {tol}, max_iter: {max_iter}}}");
    check_tolerance(tol)?;

    let mut x_old = x0;
    let mut x = x0;
    let mut status = Status::Exhausted;
    let mut history = vec![];

    for i in 0..max_iter {
        let fx_old = f(x_old);
        if !fx_old.is_finite() {
            return Err(Error::non_finite_value(x_old, fx_old));
        }
        let dfx_old = df(x_old);
        if !dfx_old.is_finite() {
            return Err(Error::non_finite_value(x_old, dfx_old));
        }
        if dfx_old == 0.0 {
            return Err(Error::zero_derivative(x_old));
        }

        x = x_old - fx_old / dfx_old;
        if !x.is_finite() {
            return Err(Error::non_finite_value(x_old, x));
        }

        let error = relative_error(x, x_old);
        let step = NewtonStep {
            iter: i,
            x,
            fx: f(x),
            dfx: df(x),
            error,
        };
        log::trace!("{step:?}");
        history.push(step);

        if error < tol {
            status = Status::Converged;
            break;
        }
        x_old = x;
    }

    match status {
        Status::Converged => log::debug!("{{root: {x}, iterations: {}}}", history.len()),
        _ => log::debug!("did not converge within {max_iter} iterations {{last_x: {x}}}"),
    }

    Ok(Solution {
        root: x,
        status,
        history,
        warnings: vec![],
    })
}

/// Newton-Raphson on formula text, e.g. `newton(3.0, "x**2 - 4", "2*x", ..)`.
///
/// The variable is taken from `f`. `df` must either be constant or use that
/// same variable. Both formulas are checked before iterating.
///
/// # Errors
/// - `Parse` if either text is not a valid formula
/// - `TooManyVariables` or `NoVariable` if `f` does not have exactly one variable
/// - `DerivativeVariable` if `df` uses a variable other than that of `f`
/// - any error of [`newton_raphson`]
pub fn newton(
    x0: f64,
    f: &str,
    df: &str,
    tol: f64,
    max_iter: usize,
) -> Result<Solution<NewtonStep>> {
    let f: Formula = f.parse()?;
    let df = Formula::with_variable(parse(df)?, f.variable())?;
    newton_raphson(&|x| f.eval(x), &|x| df.eval(x), x0, tol, max_iter)
}

#[cfg(test)]
mod test {
    use super::{newton, newton_raphson, relative_error};
    use crate::{roots::Status, ErrorKind};

    #[test]
    fn parabola() {
        let solution = newton(3.0, "x**2 - 4", "2*x", 1e-5, 30).unwrap();
        assert_eq!(solution.status, Status::Converged);
        assert!((solution.root - 2.0).abs() < 1e-9);
        assert!(solution.history.len() <= 5);
        assert_eq!(solution.history[0].iter, 0);
        assert!((solution.history[0].x - 13.0 / 6.0).abs() < 1e-15);
        let last = solution.history.last().unwrap();
        assert!(last.error < 1e-5);
        assert_eq!(last.x, solution.root);
    }

    #[test]
    fn wikipedia() {
        let solution = newton(0.5, "cos(x) - x**3", "-sin(x) - 3*x**2", 1e-12, 100).unwrap();
        assert!((solution.root - 0.865_474_033_102).abs() < 1e-9);
    }

    #[test]
    fn constant_derivative() {
        let solution = newton(10.0, "2*x - 1", "2", 1e-5, 10).unwrap();
        assert!((solution.root - 0.5).abs() < 1e-12);
    }

    #[test]
    fn exhausted() {
        let solution = newton(3.0, "x**2 - 4", "2*x", 1e-15, 2).unwrap();
        assert_eq!(solution.status, Status::Exhausted);
        assert_eq!(solution.history.len(), 2);
        assert_eq!(solution.root, solution.history[1].x);
    }

    #[test]
    fn zero_budget() {
        let solution = newton(3.0, "x**2 - 4", "2*x", 1e-5, 0).unwrap();
        assert_eq!(solution.status, Status::Exhausted);
        assert!(solution.history.is_empty());
        assert_eq!(solution.root, 3.0);
    }

    #[test]
    fn zero_derivative() {
        let e = newton(0.0, "x**2 + 1", "2*x", 1e-5, 10).unwrap_err();
        assert!(!e.is_validation());
        assert!(matches!(e.kind(), ErrorKind::ZeroDerivative { x } if *x == 0.0));
    }

    #[test]
    fn root_at_zero() {
        // the relative error is undefined at x = 0
        let solution = newton_raphson(&|x| x, &|_| 1.0, 1.0, 1e-5, 10).unwrap();
        assert_eq!(solution.status, Status::Converged);
        assert_eq!(solution.root, 0.0);
        assert!(relative_error(0.0, 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn two_variables() {
        let e = newton(1.0, "x*y - 1", "y", 1e-5, 10).unwrap_err();
        assert!(e.is_validation());
        assert!(matches!(e.kind(), ErrorKind::TooManyVariables { .. }));
    }

    #[test]
    fn derivative_checked_up_front() {
        let e = newton(1.0, "x**2 - 4", "2*t", 1e-5, 10).unwrap_err();
        assert!(matches!(e.kind(), ErrorKind::DerivativeVariable { .. }));
        let e = newton(1.0, "x**2 - 4", "2*", 1e-5, 10).unwrap_err();
        assert!(e.is_validation());
        assert!(matches!(e.kind(), ErrorKind::Parse(_)));
    }

    #[test]
    fn non_finite() {
        let e = newton(-1.0, "log(x)", "1/x", 1e-5, 10).unwrap_err();
        assert!(matches!(e.kind(), ErrorKind::NonFiniteValue { .. }));
    }
}
