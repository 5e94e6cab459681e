use super::{Expr, Func};

impl Func {
    /// Derivative of the function itself, evaluated at `u`.
    fn outer_derivative(self, u: &Expr) -> Expr {
        let u = u.clone();
        let one = || Expr::Num(1.0);
        let square = |e: Expr| Expr::pow(e, Expr::Num(2.0));
        match self {
            Self::Sin => Expr::call(Self::Cos, u),
            Self::Cos => Expr::neg(Expr::call(Self::Sin, u)),
            Self::Tan => Expr::div(one(), square(Expr::call(Self::Cos, u))),
            Self::Sinh => Expr::call(Self::Cosh, u),
            Self::Cosh => Expr::call(Self::Sinh, u),
            Self::Tanh => Expr::sub(one(), square(Expr::call(Self::Tanh, u))),
            Self::Exp => Expr::call(Self::Exp, u),
            Self::Log => Expr::div(one(), u),
            Self::Log10 => Expr::div(
                one(),
                Expr::mul(u, Expr::call(Self::Log, Expr::Num(10.0))),
            ),
            Self::Sqrt => Expr::div(one(), Expr::mul(Expr::Num(2.0), Expr::call(Self::Sqrt, u))),
            Self::Arcsin => Expr::div(
                one(),
                Expr::call(Self::Sqrt, Expr::sub(one(), square(u))),
            ),
            Self::Arccos => Expr::neg(Expr::div(
                one(),
                Expr::call(Self::Sqrt, Expr::sub(one(), square(u))),
            )),
            Self::Arctan => Expr::div(one(), Expr::add(one(), square(u))),
            Self::Arcsinh => Expr::div(
                one(),
                Expr::call(Self::Sqrt, Expr::add(square(u), one())),
            ),
            Self::Arccosh => Expr::div(
                one(),
                Expr::call(Self::Sqrt, Expr::sub(square(u), one())),
            ),
            Self::Arctanh => Expr::div(one(), Expr::sub(one(), square(u))),
        }
    }
}

impl Expr {
    fn depends_on(&self, var: &str) -> bool {
        match self {
            Self::Num(_) => false,
            Self::Var(name) => name == var,
            Self::Neg(e) | Self::Call(_, e) => e.depends_on(var),
            Self::Add(l, r) | Self::Sub(l, r) | Self::Mul(l, r) | Self::Div(l, r) | Self::Pow(l, r) => {
                l.depends_on(var) || r.depends_on(var)
            }
        }
    }

    /// Symbolic derivative with respect to `var`, simplified.
    ///
    /// # Examples
    ///
    /// ```
    /// use logistic_roots::expr::parse;
    ///
    /// let df = parse("x**2 - 4").unwrap().diff("x");
    /// assert_eq!(df.to_string(), "2*x");
    /// ```
    #[must_use]
    pub fn diff(&self, var: &str) -> Self {
        self.derivative(var).simplify()
    }

    fn derivative(&self, var: &str) -> Self {
        if !self.depends_on(var) {
            return Self::Num(0.0);
        }
        match self {
            // constants were handled above
            Self::Num(_) => Self::Num(0.0),
            Self::Var(_) => Self::Num(1.0),
            Self::Neg(e) => Self::neg(e.derivative(var)),
            Self::Add(l, r) => Self::add(l.derivative(var), r.derivative(var)),
            Self::Sub(l, r) => Self::sub(l.derivative(var), r.derivative(var)),
            Self::Mul(l, r) => Self::add(
                Self::mul(l.derivative(var), r.as_ref().clone()),
                Self::mul(l.as_ref().clone(), r.derivative(var)),
            ),
            Self::Div(l, r) => {
                let denominator = Self::pow(r.as_ref().clone(), Self::Num(2.0));
                if l.depends_on(var) {
                    Self::div(
                        Self::sub(
                            Self::mul(l.derivative(var), r.as_ref().clone()),
                            Self::mul(l.as_ref().clone(), r.derivative(var)),
                        ),
                        denominator,
                    )
                } else {
                    // quotient rule with a constant numerator
                    Self::neg(Self::div(
                        Self::mul(l.as_ref().clone(), r.derivative(var)),
                        denominator,
                    ))
                }
            }
            Self::Pow(base, exponent) => {
                if !exponent.depends_on(var) {
                    // power rule
                    Self::mul(
                        Self::mul(
                            exponent.as_ref().clone(),
                            Self::pow(
                                base.as_ref().clone(),
                                Self::sub(exponent.as_ref().clone(), Self::Num(1.0)),
                            ),
                        ),
                        base.derivative(var),
                    )
                } else if !base.depends_on(var) {
                    Self::mul(
                        Self::mul(self.clone(), Self::call(Func::Log, base.as_ref().clone())),
                        exponent.derivative(var),
                    )
                } else {
                    // d(u^v) = u^v * (v' ln u + v u' / u)
                    Self::mul(
                        self.clone(),
                        Self::add(
                            Self::mul(
                                exponent.derivative(var),
                                Self::call(Func::Log, base.as_ref().clone()),
                            ),
                            Self::div(
                                Self::mul(exponent.as_ref().clone(), base.derivative(var)),
                                base.as_ref().clone(),
                            ),
                        ),
                    )
                }
            }
            Self::Call(func, u) => Self::mul(func.outer_derivative(u), u.derivative(var)),
        }
    }
}
