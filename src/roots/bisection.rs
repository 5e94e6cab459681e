use super::{check_tolerance, opposite_signs, Solution, Status, Warning};
use crate::{Error, Formula, Result};

/// One reported row of a bisection run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BisectionStep {
    /// 1-based iteration counter
    pub iter: usize,
    pub midpoint: f64,
    pub f_midpoint: f64,
    pub a: f64,
    pub b: f64,
    pub f_a: f64,
    pub f_b: f64,
    /// Absolute width of the bracket `[a, b]`
    pub width: f64,
}

/// Smallest number of halvings that shrinks `[a, b]` below `tol`.
///
/// This is `ceil(log2(|b - a| / tol))`, or zero if the bracket is already
/// narrow enough.
///
/// # Examples
///
/// ```
/// use logistic_roots::roots::required_iterations;
///
/// assert_eq!(required_iterations(200.0, 300.0, 1e-5), 24);
/// assert_eq!(required_iterations(0.0, 1.0, 2.0), 0);
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_sign_loss)]
pub fn required_iterations(a: f64, b: f64, tol: f64) -> usize {
    let n = ((b - a).abs() / tol).log2().ceil();
    if n.is_finite() && n > 0.0 {
        n as usize
    } else {
        0
    }
}

/// Find a root of `f` in `[a, b]` by repeatedly halving the bracket.
///
/// `f(a)` and `f(b)` must have strictly opposite signs. The bracket is halved
/// while it is wider than `tol`, no midpoint has hit an exact zero and fewer
/// than `max_iter` halvings have been made. The returned root is the last
/// midpoint.
///
/// The history holds one step per halving plus one final step describing the
/// state after the loop, so it is never empty. In particular, with
/// `max_iter == 0` it holds a single step and the root is `(a + b) / 2`.
///
/// If `max_iter` is smaller than [`required_iterations`], a warning is logged
/// and attached to the solution, but the solver still runs.
///
/// # Errors
/// - `InvalidTolerance` if `tol` is not positive and finite
/// - `NonFiniteBound` if `a` or `b` is not finite
/// - `NoSignChange` if `f(a)` and `f(b)` do not have opposite signs
/// - `NonFiniteValue` if `f` is not finite at some midpoint
///
/// # Examples
///
/// ```
/// use logistic_roots::roots::{bisection, Status};
///
/// let solution = bisection(&|x: f64| x * x - 4.0, 0.0, 3.0, 1e-5, 50).unwrap();
/// assert_eq!(solution.status, Status::Converged);
/// assert!((solution.root - 2.0).abs() < 1e-5);
/// ```
pub fn bisection<F>(
    f: &F,
    mut a: f64,
    mut b: f64,
    tol: f64,
    max_iter: usize,
) -> Result<Solution<BisectionStep>>
where
    F: Fn(f64) -> f64,
{
    log::trace!("starting with arguments: {{a: {a}, b: {b}, tol: {tol}, max_iter: {max_iter}}}");
    check_tolerance(tol)?;
    if !a.is_finite() || !b.is_finite() {
        return Err(Error::non_finite_bound(a, b));
    }

    let mut fa = f(a);
    let mut fb = f(b);
    if !opposite_signs(fa, fb) {
        return Err(Error::no_sign_change(a, b, fa, fb));
    }

    let mut warnings = vec![];
    let required = required_iterations(a, b, tol);
    if max_iter < required {
        let warning = Warning::InsufficientBudget {
            required,
            given: max_iter,
        };
        log::warn!("{warning}");
        warnings.push(warning);
    }

    let mut history = vec![];
    let mut xm = (a + b) / 2.0;
    let mut exact = false;
    let mut budget = max_iter;
    let mut i = 1;

    while (a - b).abs() > tol && !exact && budget != 0 {
        let fxm = f(xm);
        if !fxm.is_finite() {
            return Err(Error::non_finite_value(xm, fxm));
        }
        let step = BisectionStep {
            iter: i,
            midpoint: xm,
            f_midpoint: fxm,
            a,
            b,
            f_a: fa,
            f_b: fb,
            width: (a - b).abs(),
        };
        log::trace!("{step:?}");
        history.push(step);

        if opposite_signs(fa, fxm) {
            // root is left of the midpoint
            b = xm;
            fb = fxm;
            xm = (a + b) / 2.0;
        } else if opposite_signs(fxm, fb) {
            // root is right of the midpoint
            a = xm;
            fa = fxm;
            xm = (a + b) / 2.0;
        } else {
            // neither half changes sign, so f(xm) is exactly zero
            exact = true;
        }

        budget -= 1;
        i += 1;
    }

    // the state after the loop is always reported, even if it never ran
    let f_xm = f(xm);
    history.push(BisectionStep {
        iter: i,
        midpoint: xm,
        f_midpoint: f_xm,
        a,
        b,
        f_a: fa,
        f_b: fb,
        width: (a - b).abs(),
    });

    let status = if exact {
        Status::ExactRoot
    } else if (a - b).abs() > tol {
        Status::Exhausted
    } else {
        Status::Converged
    };
    log::debug!("{{root: {xm}, status: {status:?}, iterations: {}}}", i - 1);

    Ok(Solution {
        root: xm,
        status,
        history,
        warnings,
    })
}

/// Bisection on formula text such as `"x**2 - 4"`.
///
/// The formula must reference exactly one variable, whatever its name. See
/// [`bisection`] for the iteration itself.
///
/// # Errors
/// - `Parse` if the text is not a valid formula
/// - `TooManyVariables` or `NoVariable` if it does not have exactly one variable
/// - any error of [`bisection`]
pub fn bisect(
    f: &str,
    a: f64,
    b: f64,
    tol: f64,
    max_iter: usize,
) -> Result<Solution<BisectionStep>> {
    let f: Formula = f.parse()?;
    bisection(&|x| f.eval(x), a, b, tol, max_iter)
}
