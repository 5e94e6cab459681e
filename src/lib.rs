#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
//! Root finding on real functions of one variable, applied to the time a
//! logistically growing population needs to reach a target size.
//!
//! Functions are given either as formula text in a small Python-like syntax,
//! e.g. `"x**2*cos(x) - 1"`, or as native closures. Formula text is parsed into
//! an expression tree, never executed.
//!
//! # Examples
//!
//! ```
//! use logistic_roots::{model::LogisticModel, roots::{bisect, newton}};
//!
//! let f = LogisticModel::default().equation().unwrap();
//! let df = f.derivative();
//!
//! let by_bisection = bisect(&f.to_string(), 200.0, 300.0, 1e-5, 25).unwrap();
//! let by_newton = newton(200.0, &f.to_string(), &df.to_string(), 1e-5, 30).unwrap();
//! assert!((by_bisection.root - by_newton.root).abs() < 1e-4);
//! ```

mod error;
pub use error::{Error, ErrorKind, Result};

pub mod expr;

mod function;
pub use function::Formula;

pub mod roots;

pub mod config;
pub mod model;
pub mod plot;
pub mod report;
pub mod study;
