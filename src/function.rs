//! Compiled one-variable functions.

use std::{fmt, str::FromStr};

use itertools::Itertools;

use crate::{
    expr::{parse, Expr},
    Error, Result,
};

/// A formula of exactly one free variable, ready to be evaluated.
///
/// This is what the solvers iterate on when they are handed formula text.
///
/// # Examples
///
/// ```
/// use logistic_roots::Formula;
///
/// let f: Formula = "x**2 - 4".parse().unwrap();
/// assert_eq!(f.variable(), "x");
/// assert_eq!(f.eval(3.0), 5.0);
/// assert_eq!(f.eval_many(&[0.0, 2.0]), vec![-4.0, 0.0]);
///
/// // more than one variable is rejected
/// assert!("x*y - 1".parse::<Formula>().unwrap_err().is_validation());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Formula {
    expr: Expr,
    var: String,
}

impl Formula {
    /// Wraps an expression, checking that it depends on a single variable.
    ///
    /// # Errors
    /// - `TooManyVariables` if it references more than one variable
    /// - `NoVariable` if it is a constant
    pub fn new(expr: Expr) -> Result<Self> {
        let mut vars = expr.variables().into_iter();
        match (vars.next(), vars.next()) {
            (Some(var), None) => Ok(Self { expr, var }),
            (None, _) => Err(Error::no_variable()),
            (Some(first), Some(second)) => Err(Error::too_many_variables(
                [first, second].into_iter().chain(vars).collect(),
            )),
        }
    }

    /// Wraps an expression that must be written in terms of `var`, if it uses
    /// any variable at all.
    ///
    /// Used for derivatives, which may well be constant.
    ///
    /// # Errors
    /// `DerivativeVariable` if the expression references any other variable.
    pub fn with_variable(expr: Expr, var: &str) -> Result<Self> {
        let vars = expr.variables();
        if vars.iter().any(|v| v != var) {
            return Err(Error::derivative_variable(
                var,
                vars.into_iter().collect_vec(),
            ));
        }
        Ok(Self {
            expr,
            var: var.to_owned(),
        })
    }

    #[must_use]
    pub fn variable(&self) -> &str {
        &self.var
    }

    #[must_use]
    pub const fn expr(&self) -> &Expr {
        &self.expr
    }

    #[must_use]
    pub fn eval(&self, x: f64) -> f64 {
        // `new` and `with_variable` guarantee no other variable appears
        self.expr.eval(&|_| x)
    }

    /// Evaluates the formula at every point of `xs`.
    #[must_use]
    pub fn eval_many(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.eval(x)).collect()
    }

    /// The symbolic derivative with respect to this formula's variable.
    #[must_use]
    pub fn derivative(&self) -> Self {
        Self {
            expr: self.expr.diff(&self.var),
            var: self.var.clone(),
        }
    }
}

impl FromStr for Formula {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(parse(s)?)
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.expr.fmt(f)
    }
}
