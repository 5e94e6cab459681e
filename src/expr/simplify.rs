use super::Expr;

#[allow(clippy::float_cmp)]
fn is_num(e: &Expr, value: f64) -> bool {
    matches!(e, Expr::Num(v) if *v == value)
}

/// Folds `f(a, b)` when both sides are numbers and the result is finite.
///
/// Non-finite results are left unevaluated so that printed formulas stay
/// parseable.
fn fold(lhs: &Expr, rhs: &Expr, f: impl Fn(f64, f64) -> f64) -> Option<Expr> {
    match (lhs, rhs) {
        (Expr::Num(a), Expr::Num(b)) => {
            let v = f(*a, *b);
            v.is_finite().then_some(Expr::Num(v))
        }
        _ => None,
    }
}

fn negate(e: Expr) -> Expr {
    match e {
        Expr::Num(v) => Expr::Num(-v),
        Expr::Neg(inner) => *inner,
        Expr::Mul(l, r) if matches!(*l, Expr::Num(_)) => Expr::mul(negate(*l), *r),
        Expr::Div(l, r) => Expr::div(negate(*l), *r),
        other => Expr::neg(other),
    }
}

fn add(lhs: Expr, rhs: Expr) -> Expr {
    if let Some(v) = fold(&lhs, &rhs, |a, b| a + b) {
        return v;
    }
    if is_num(&lhs, 0.0) {
        return rhs;
    }
    if is_num(&rhs, 0.0) {
        return lhs;
    }
    Expr::add(lhs, rhs)
}

fn sub(lhs: Expr, rhs: Expr) -> Expr {
    if let Some(v) = fold(&lhs, &rhs, |a, b| a - b) {
        return v;
    }
    if is_num(&rhs, 0.0) {
        return lhs;
    }
    if is_num(&lhs, 0.0) {
        return negate(rhs);
    }
    Expr::sub(lhs, rhs)
}

fn mul(lhs: Expr, rhs: Expr) -> Expr {
    if let Some(v) = fold(&lhs, &rhs, |a, b| a * b) {
        return v;
    }
    if matches!((&lhs, &rhs), (Expr::Num(_), Expr::Num(_))) {
        // the product overflowed
        return Expr::mul(lhs, rhs);
    }
    if is_num(&lhs, 0.0) || is_num(&rhs, 0.0) {
        return Expr::Num(0.0);
    }
    if is_num(&lhs, 1.0) {
        return rhs;
    }
    if is_num(&rhs, 1.0) {
        return lhs;
    }
    if is_num(&lhs, -1.0) {
        return negate(rhs);
    }
    if is_num(&rhs, -1.0) {
        return negate(lhs);
    }
    match (lhs, rhs) {
        // constants go in front
        (lhs, Expr::Num(c)) => mul(Expr::Num(c), lhs),
        // and are collected there
        (Expr::Num(a), Expr::Mul(l, r)) if matches!(*l, Expr::Num(b) if (a * b).is_finite()) => {
            let Expr::Num(b) = *l else { unreachable!() };
            mul(Expr::Num(a * b), *r)
        }
        (Expr::Num(a), Expr::Neg(e)) => mul(Expr::Num(-a), *e),
        (lhs, rhs) => Expr::mul(lhs, rhs),
    }
}

fn div(lhs: Expr, rhs: Expr) -> Expr {
    if let Some(v) = fold(&lhs, &rhs, |a, b| a / b) {
        return v;
    }
    if is_num(&rhs, 1.0) {
        return lhs;
    }
    if is_num(&lhs, 0.0) {
        return Expr::Num(0.0);
    }
    Expr::div(lhs, rhs)
}

fn pow(base: Expr, exponent: Expr) -> Expr {
    if let Some(v) = fold(&base, &exponent, super::powf) {
        return v;
    }
    if is_num(&exponent, 1.0) {
        return base;
    }
    if is_num(&exponent, 0.0) || is_num(&base, 1.0) {
        return Expr::Num(1.0);
    }
    Expr::pow(base, exponent)
}

impl Expr {
    /// Folds constant sub-expressions and drops neutral elements.
    ///
    /// The result evaluates to the same values as `self` for finite inputs.
    /// Rules such as `0*x = 0` do not hold for infinite or `NaN` values of
    /// `x`.
    ///
    /// # Examples
    ///
    /// ```
    /// use logistic_roots::expr::parse;
    ///
    /// let e = parse("(1000000 - 1000)/1000*x + 0").unwrap();
    /// assert_eq!(e.simplify().to_string(), "999*x");
    /// ```
    #[must_use]
    pub fn simplify(&self) -> Self {
        match self {
            Self::Num(_) | Self::Var(_) => self.clone(),
            Self::Neg(e) => negate(e.simplify()),
            Self::Add(l, r) => add(l.simplify(), r.simplify()),
            Self::Sub(l, r) => sub(l.simplify(), r.simplify()),
            Self::Mul(l, r) => mul(l.simplify(), r.simplify()),
            Self::Div(l, r) => div(l.simplify(), r.simplify()),
            Self::Pow(l, r) => pow(l.simplify(), r.simplify()),
            Self::Call(func, e) => match e.simplify() {
                Self::Num(v) if func.apply(v).is_finite() => Self::Num(func.apply(v)),
                arg => Self::call(*func, arg),
            },
        }
    }
}

#[cfg(test)]
mod test {
    use crate::expr::{parse, Expr};

    fn simplified(text: &str) -> String {
        parse(text).unwrap().simplify().to_string()
    }

    #[test]
    fn folds_constants() {
        assert_eq!(simplified("2 + 3*4"), "14");
        assert_eq!(simplified("-(0.01)*t"), "-0.01*t");
        assert_eq!(simplified("exp(0)*x"), "x");
        assert_eq!(simplified("2**10"), "1024");
    }

    #[test]
    fn neutral_elements() {
        assert_eq!(simplified("x + 0"), "x");
        assert_eq!(simplified("0 - x"), "-x");
        assert_eq!(simplified("1*x*1"), "x");
        assert_eq!(simplified("0*sin(x)"), "0");
        assert_eq!(simplified("x/1"), "x");
        assert_eq!(simplified("x**1"), "x");
        assert_eq!(simplified("x**0"), "1");
        assert_eq!(simplified("--x"), "x");
    }

    #[test]
    fn collects_coefficients() {
        assert_eq!(simplified("x*3"), "3*x");
        assert_eq!(simplified("2*(3*x)"), "6*x");
        assert_eq!(simplified("2*-x"), "-2*x");
    }

    #[test]
    fn keeps_non_finite() {
        // would fold to NaN, which does not print back into a formula
        assert_eq!(simplified("log(-1)"), "log(-1)");
        assert_eq!(simplified("1/0"), "1/0");
        assert!(matches!(parse("1/0").unwrap().simplify(), Expr::Div(..)));
        assert_eq!(simplified("1e200*1e200"), "1e200*1e200");
        assert_eq!(simplified("1e200*1e200*x"), "1e200*1e200*x");
    }

    #[test]
    fn overflowing_coefficients_stay_apart() {
        let e = parse("2*(1e308*x)").unwrap().simplify();
        assert!(e.eval(&|_| 1.0).is_infinite());
        let back = parse(&e.to_string()).unwrap();
        let vars: Vec<_> = back.variables().into_iter().collect();
        assert_eq!(vars, ["x"]);
        assert_eq!(back.eval(&|_| -1.0), f64::NEG_INFINITY);
    }
}
