//! Expression trees for one-line formulas such as `x**2*cos(x) - 1`.
//!
//! Formulas are parsed into an [`Expr`] and evaluated by walking the tree, so
//! no text is ever turned into executable code. The same tree can be
//! differentiated symbolically and printed back into parseable text.

use std::{collections::BTreeSet, fmt};

mod diff;
mod parse;
mod simplify;

pub use parse::{parse, ParseError};

/// Elementary functions that may be called from a formula.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Func {
    Sin,
    Sinh,
    Cos,
    Cosh,
    Tan,
    Tanh,
    Exp,
    /// Natural logarithm
    Log,
    Log10,
    Sqrt,
    Arcsin,
    Arccos,
    Arctan,
    Arcsinh,
    Arccosh,
    Arctanh,
}

impl Func {
    pub const ALL: [Self; 16] = [
        Self::Sin,
        Self::Sinh,
        Self::Cos,
        Self::Cosh,
        Self::Tan,
        Self::Tanh,
        Self::Exp,
        Self::Log,
        Self::Log10,
        Self::Sqrt,
        Self::Arcsin,
        Self::Arccos,
        Self::Arctan,
        Self::Arcsinh,
        Self::Arccosh,
        Self::Arctanh,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sin => "sin",
            Self::Sinh => "sinh",
            Self::Cos => "cos",
            Self::Cosh => "cosh",
            Self::Tan => "tan",
            Self::Tanh => "tanh",
            Self::Exp => "exp",
            Self::Log => "log",
            Self::Log10 => "log10",
            Self::Sqrt => "sqrt",
            Self::Arcsin => "arcsin",
            Self::Arccos => "arccos",
            Self::Arctan => "arctan",
            Self::Arcsinh => "arcsinh",
            Self::Arccosh => "arccosh",
            Self::Arctanh => "arctanh",
        }
    }

    /// Looks up a function by name.
    ///
    /// Accepts the numpy spelling (`arcsin`), the short spelling (`asin`), `ln`
    /// for the natural logarithm and an optional `np.`, `numpy.` or `math.`
    /// module prefix.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let name = ["np.", "numpy.", "math."]
            .iter()
            .find_map(|prefix| name.strip_prefix(prefix))
            .unwrap_or(name);
        let func = match name {
            "asin" => Self::Arcsin,
            "acos" => Self::Arccos,
            "atan" => Self::Arctan,
            "asinh" => Self::Arcsinh,
            "acosh" => Self::Arccosh,
            "atanh" => Self::Arctanh,
            "ln" => Self::Log,
            _ => return Self::ALL.into_iter().find(|f| f.name() == name),
        };
        Some(func)
    }

    #[must_use]
    pub fn apply(self, x: f64) -> f64 {
        match self {
            Self::Sin => x.sin(),
            Self::Sinh => x.sinh(),
            Self::Cos => x.cos(),
            Self::Cosh => x.cosh(),
            Self::Tan => x.tan(),
            Self::Tanh => x.tanh(),
            Self::Exp => x.exp(),
            Self::Log => x.ln(),
            Self::Log10 => x.log10(),
            Self::Sqrt => x.sqrt(),
            Self::Arcsin => x.asin(),
            Self::Arccos => x.acos(),
            Self::Arctan => x.atan(),
            Self::Arcsinh => x.asinh(),
            Self::Arccosh => x.acosh(),
            Self::Arctanh => x.atanh(),
        }
    }
}

impl fmt::Display for Func {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A formula as a tree of operations.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Num(f64),
    Var(String),
    Neg(Box<Expr>),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    Pow(Box<Expr>, Box<Expr>),
    Call(Func, Box<Expr>),
}

// constructors, mostly to keep `Box::new` out of the differentiation rules
impl Expr {
    pub fn var(name: impl Into<String>) -> Self {
        Self::Var(name.into())
    }

    #[must_use]
    pub fn neg(e: Self) -> Self {
        Self::Neg(Box::new(e))
    }

    #[must_use]
    pub fn add(lhs: Self, rhs: Self) -> Self {
        Self::Add(Box::new(lhs), Box::new(rhs))
    }

    #[must_use]
    pub fn sub(lhs: Self, rhs: Self) -> Self {
        Self::Sub(Box::new(lhs), Box::new(rhs))
    }

    #[must_use]
    pub fn mul(lhs: Self, rhs: Self) -> Self {
        Self::Mul(Box::new(lhs), Box::new(rhs))
    }

    #[must_use]
    pub fn div(lhs: Self, rhs: Self) -> Self {
        Self::Div(Box::new(lhs), Box::new(rhs))
    }

    #[must_use]
    pub fn pow(base: Self, exponent: Self) -> Self {
        Self::Pow(Box::new(base), Box::new(exponent))
    }

    #[must_use]
    pub fn call(func: Func, arg: Self) -> Self {
        Self::Call(func, Box::new(arg))
    }
}

impl Expr {
    /// Names of the free variables, sorted and without duplicates.
    #[must_use]
    pub fn variables(&self) -> BTreeSet<String> {
        let mut vars = BTreeSet::new();
        self.collect_variables(&mut vars);
        vars
    }

    fn collect_variables(&self, vars: &mut BTreeSet<String>) {
        match self {
            Self::Num(_) => {}
            Self::Var(name) => {
                vars.insert(name.clone());
            }
            Self::Neg(e) | Self::Call(_, e) => e.collect_variables(vars),
            Self::Add(l, r) | Self::Sub(l, r) | Self::Mul(l, r) | Self::Div(l, r) | Self::Pow(l, r) => {
                l.collect_variables(vars);
                r.collect_variables(vars);
            }
        }
    }

    /// Whether the expression contains no variables at all.
    #[must_use]
    pub fn is_constant(&self) -> bool {
        match self {
            Self::Num(_) => true,
            Self::Var(_) => false,
            Self::Neg(e) | Self::Call(_, e) => e.is_constant(),
            Self::Add(l, r) | Self::Sub(l, r) | Self::Mul(l, r) | Self::Div(l, r) | Self::Pow(l, r) => {
                l.is_constant() && r.is_constant()
            }
        }
    }

    /// Evaluates the expression, resolving variables through `lookup`.
    ///
    /// Follows plain `f64` arithmetic: domain errors such as `log(-1)` or a
    /// division by zero produce `NaN` or infinities rather than failing.
    pub fn eval<F>(&self, lookup: &F) -> f64
    where
        F: Fn(&str) -> f64,
    {
        match self {
            Self::Num(v) => *v,
            Self::Var(name) => lookup(name),
            Self::Neg(e) => -e.eval(lookup),
            Self::Add(l, r) => l.eval(lookup) + r.eval(lookup),
            Self::Sub(l, r) => l.eval(lookup) - r.eval(lookup),
            Self::Mul(l, r) => l.eval(lookup) * r.eval(lookup),
            Self::Div(l, r) => l.eval(lookup) / r.eval(lookup),
            Self::Pow(l, r) => powf(l.eval(lookup), r.eval(lookup)),
            Self::Call(func, e) => func.apply(e.eval(lookup)),
        }
    }

    /// Replaces every variable for which `value` returns `Some` with that number.
    #[must_use]
    pub fn substitute<F>(&self, value: &F) -> Self
    where
        F: Fn(&str) -> Option<f64>,
    {
        match self {
            Self::Num(_) => self.clone(),
            Self::Var(name) => value(name).map_or_else(|| self.clone(), Self::Num),
            Self::Neg(e) => Self::neg(e.substitute(value)),
            Self::Add(l, r) => Self::add(l.substitute(value), r.substitute(value)),
            Self::Sub(l, r) => Self::sub(l.substitute(value), r.substitute(value)),
            Self::Mul(l, r) => Self::mul(l.substitute(value), r.substitute(value)),
            Self::Div(l, r) => Self::div(l.substitute(value), r.substitute(value)),
            Self::Pow(l, r) => Self::pow(l.substitute(value), r.substitute(value)),
            Self::Call(func, e) => Self::call(*func, e.substitute(value)),
        }
    }

    /// Binding strength when printed, higher binds tighter.
    fn precedence(&self) -> u8 {
        match self {
            Self::Add(..) | Self::Sub(..) => 1,
            Self::Mul(..) | Self::Div(..) => 2,
            Self::Neg(_) => 3,
            Self::Num(v) if v.is_sign_negative() && !v.is_nan() => 3,
            Self::Pow(..) => 4,
            Self::Num(_) | Self::Var(_) | Self::Call(..) => 5,
        }
    }
}

/// Integer exponents go through `powi`, which is exact for small powers.
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::float_cmp)]
fn powf(base: f64, exponent: f64) -> f64 {
    if exponent.fract() == 0.0 && exponent.abs() <= f64::from(i32::MAX) {
        base.powi(exponent as i32)
    } else {
        base.powf(exponent)
    }
}

struct Operand<'a> {
    expr: &'a Expr,
    min_precedence: u8,
}

impl fmt::Display for Operand<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.expr.precedence() < self.min_precedence {
            write!(f, "({})", self.expr)
        } else {
            write!(f, "{}", self.expr)
        }
    }
}

const fn operand(expr: &Expr, min_precedence: u8) -> Operand<'_> {
    Operand {
        expr,
        min_precedence,
    }
}

/// Writes a number so that it parses back to the same value.
///
/// Very large and very small magnitudes use exponent notation, and values
/// that have no literal are written as expressions that evaluate to them.
#[allow(clippy::float_cmp)]
fn write_number(f: &mut fmt::Formatter<'_>, v: f64) -> fmt::Result {
    if v.is_nan() {
        f.write_str("(0/0)")
    } else if v.is_infinite() {
        // overflows back to infinity when parsed
        f.write_str(if v > 0.0 { "1e400" } else { "-1e400" })
    } else if v != 0.0 && !(1e-5..1e16).contains(&v.abs()) {
        write!(f, "{v:e}")
    } else {
        write!(f, "{v}")
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Num(v) => write_number(f, *v),
            Self::Var(name) => f.write_str(name),
            Self::Neg(e) => write!(f, "-{}", operand(e, 4)),
            // `a + -b` reads better as `a - b` and evaluates identically
            Self::Add(l, r) => match r.as_ref() {
                Self::Num(v) if v.is_sign_negative() && !v.is_nan() => {
                    write!(f, "{} - ", operand(l, 1))?;
                    write_number(f, -v)
                }
                Self::Neg(inner) => write!(f, "{} - {}", operand(l, 1), operand(inner, 2)),
                _ => write!(f, "{} + {}", operand(l, 1), operand(r, 2)),
            },
            Self::Sub(l, r) => write!(f, "{} - {}", operand(l, 1), operand(r, 2)),
            Self::Mul(l, r) => write!(f, "{}*{}", operand(l, 2), operand(r, 3)),
            Self::Div(l, r) => write!(f, "{}/{}", operand(l, 2), operand(r, 3)),
            Self::Pow(l, r) => write!(f, "{}**{}", operand(l, 5), operand(r, 4)),
            Self::Call(func, e) => write!(f, "{func}({e})"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::{parse, Expr, Func};

    fn eval_at(text: &str, x: f64) -> f64 {
        parse(text).unwrap().eval(&|_| x)
    }

    #[test]
    fn func_names() {
        for func in Func::ALL {
            assert_eq!(Func::from_name(func.name()), Some(func));
        }
        assert_eq!(Func::from_name("np.exp"), Some(Func::Exp));
        assert_eq!(Func::from_name("asinh"), Some(Func::Arcsinh));
        assert_eq!(Func::from_name("ln"), Some(Func::Log));
        assert_eq!(Func::from_name("gamma"), None);
    }

    #[test]
    fn variables_sorted_unique() {
        let e = parse("y*x + x**2 - sin(z)").unwrap();
        let vars: Vec<_> = e.variables().into_iter().collect();
        assert_eq!(vars, ["x", "y", "z"]);
        assert!(parse("2*exp(1)").unwrap().is_constant());
    }

    #[test]
    fn evaluates() {
        assert!((eval_at("x**2 - 4", 3.0) - 5.0).abs() < 1e-15);
        assert!((eval_at("-x**2", 3.0) + 9.0).abs() < 1e-15);
        assert!((eval_at("2**-1", 0.0) - 0.5).abs() < 1e-15);
        assert!((eval_at("x**2*cos(x)", 0.0)).abs() < 1e-15);
        assert!((eval_at("log10(x)", 1000.0) - 3.0).abs() < 1e-12);
        assert!(eval_at("log(x)", -1.0).is_nan());
    }

    #[test]
    fn substitute_leaves_unknowns() {
        let e = parse("k*t + r").unwrap();
        let e = e.substitute(&|name| (name == "k").then_some(2.0));
        let vars: Vec<_> = e.variables().into_iter().collect();
        assert_eq!(vars, ["r", "t"]);
    }

    #[test]
    fn display_parenthesizes() {
        let cases = [
            "1000000/(1 + 999*exp(-0.01*t)) - 10000",
            "(x + 1)*(x - 1)",
            "x - (y - z)",
            "(-2)**x",
            "x**(-2)",
            "-(x + 1)",
            "a/(b*c)",
            "(x**2)**3",
        ];
        for case in cases {
            let e = parse(case).unwrap();
            assert_eq!(e.to_string(), case);
        }
    }

    #[test]
    fn display_numbers() {
        assert_eq!(Expr::Num(1e200).to_string(), "1e200");
        assert_eq!(Expr::Num(-2.5e-9).to_string(), "-2.5e-9");
        assert_eq!(Expr::Num(0.01).to_string(), "0.01");
        assert_eq!(Expr::Num(1_000_000.0).to_string(), "1000000");
        assert_eq!(Expr::Num(f64::INFINITY).to_string(), "1e400");
        assert_eq!(
            Expr::add(Expr::var("x"), Expr::Num(f64::NEG_INFINITY)).to_string(),
            "x - 1e400"
        );
        for v in [f64::INFINITY, f64::NEG_INFINITY, 1e-300, 123.456e20] {
            let back = parse(&Expr::mul(Expr::Num(v), Expr::var("x")).to_string()).unwrap();
            assert_eq!(back.eval(&|_| 1.0), v);
        }
        let nan = parse(&Expr::Num(f64::NAN).to_string()).unwrap();
        assert!(nan.eval(&|_| 0.0).is_nan());
        assert!(nan.is_constant());
    }

    #[test]
    fn display_reparses_equal() {
        let e = Expr::add(Expr::var("x"), Expr::Num(-3.5));
        assert_eq!(e.to_string(), "x - 3.5");
        let e = Expr::sub(Expr::var("x"), Expr::neg(Expr::var("y")));
        let back = parse(&e.to_string()).unwrap();
        assert_eq!(back.eval(&|_| 2.0), e.eval(&|_| 2.0));
    }
}
