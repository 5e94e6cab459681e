//! The logistic population model.
//!
//! A population starting at `p0` that grows at intrinsic rate `r` towards the
//! carrying capacity `k` follows
//!
//! ```text
//! p(t) = k / (1 + ((k - p0) / p0) * exp(-r*t))
//! ```
//!
//! The time at which it reaches a target population `pt` is the root of
//! `f(t) = p(t) - pt`.

use crate::{expr::parse, Formula, Result};

/// The model in terms of its parameters `k`, `p0`, `r`, `pt` and the time `t`.
const GENERAL_EQUATION: &str = "k/(1 + ((k - p0)/p0)*exp(-r*t)) - pt";

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LogisticModel {
    /// Carrying capacity `k`
    pub capacity: f64,
    /// Population `p0` at `t = 0`
    pub initial_population: f64,
    /// Intrinsic growth rate `r`
    pub rate: f64,
    /// Target population `pt`
    pub target: f64,
}

impl Default for LogisticModel {
    fn default() -> Self {
        Self {
            capacity: 1_000_000.0,
            initial_population: 1000.0,
            rate: 0.01,
            target: 10_000.0,
        }
    }
}

impl LogisticModel {
    #[must_use]
    pub const fn new(capacity: f64, initial_population: f64, rate: f64, target: f64) -> Self {
        Self {
            capacity,
            initial_population,
            rate,
            target,
        }
    }

    /// The particular equation `f(t) = p(t) - pt` with all parameters filled
    /// in and constants folded.
    ///
    /// # Errors
    /// `NoVariable` if the parameters leave `t` out of the equation, e.g. a
    /// zero rate.
    ///
    /// # Examples
    ///
    /// ```
    /// use logistic_roots::model::LogisticModel;
    ///
    /// let f = LogisticModel::default().equation().unwrap();
    /// assert_eq!(f.to_string(), "1000000/(1 + 999*exp(-0.01*t)) - 10000");
    /// ```
    pub fn equation(&self) -> Result<Formula> {
        let general = parse(GENERAL_EQUATION)?;
        let particular = general
            .substitute(&|name| match name {
                "k" => Some(self.capacity),
                "p0" => Some(self.initial_population),
                "r" => Some(self.rate),
                "pt" => Some(self.target),
                _ => None,
            })
            .simplify();
        Formula::new(particular)
    }

    /// The symbolic derivative `f'(t)` of [`Self::equation`].
    ///
    /// # Errors
    /// Same as [`Self::equation`].
    pub fn derivative(&self) -> Result<Formula> {
        Ok(self.equation()?.derivative())
    }

    /// Population at time `t`, evaluated directly.
    #[must_use]
    pub fn population(&self, t: f64) -> f64 {
        let ratio = (self.capacity - self.initial_population) / self.initial_population;
        self.capacity / ratio.mul_add((-self.rate * t).exp(), 1.0)
    }

    /// Closed-form time at which the population reaches the target, if it ever
    /// does.
    ///
    /// `t = ln(((k - p0) / p0) * pt / (k - pt)) / r`
    #[must_use]
    pub fn target_time(&self) -> Option<f64> {
        let Self {
            capacity: k,
            initial_population: p0,
            rate: r,
            target: pt,
        } = *self;
        let t = (((k - p0) / p0) * pt / (k - pt)).ln() / r;
        t.is_finite().then_some(t)
    }
}

/// `n` evenly spaced points from `start` to `end`, both included.
///
/// # Examples
///
/// ```
/// use logistic_roots::model::linspace;
///
/// assert_eq!(linspace(0.0, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
/// assert_eq!(linspace(3.0, 7.0, 1), vec![3.0]);
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => vec![],
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { (i as f64).mul_add(step, start) })
                .collect()
        }
    }
}
