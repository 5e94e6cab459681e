//! The full population study: equation, plot and both root finders.

use std::io::Write;

use anyhow::Context;

use crate::{
    config::Config,
    plot::PopulationPlot,
    report::{newton_summary, Table},
    roots::{bisect, newton, BisectionStep, NewtonStep, Solution},
    Result,
};

/// Results of a [`run`].
#[derive(Clone, Debug, PartialEq)]
pub struct Study {
    /// The particular equation `f(t)`
    pub equation: String,
    /// Its derivative `f'(t)`
    pub derivative: String,
    pub bisection: Solution<BisectionStep>,
    pub newton: Solution<NewtonStep>,
}

/// Runs the study described by `config`, printing the equation and the
/// convergence tables to `out`.
///
/// The equation is handed to the solvers as text, exactly as printed.
///
/// # Errors
/// Any solver error, a failure to save the plot, or a failure to write to
/// `out`.
pub fn run<W: Write>(config: &Config, out: &mut W) -> Result<Study> {
    let f = config.model.equation()?;
    let df = f.derivative();
    let (equation, derivative) = (f.to_string(), df.to_string());
    log::debug!("{{equation: {equation}, derivative: {derivative}}}");

    print(out, &format!("particular equation: f(t) = {equation}"))?;

    if let Some(plot) = &config.plot {
        PopulationPlot::new(&f, &plot.times()).save(&plot.path)?;
    }

    let c = config.bisection;
    print(out, "solution using the bisection method:")?;
    let bisection = bisect(&equation, c.a, c.b, c.tol, c.max_iter)?;
    for warning in &bisection.warnings {
        print(out, &format!("! {warning}\n"))?;
    }
    print(out, &Table::from_rows(&bisection.history).to_string())?;

    let c = config.newton;
    print(out, &format!("initial estimate: x0 = {:.6}\n", c.x0))?;
    let newton = newton(c.x0, &equation, &derivative, c.tol, c.max_iter)?;
    print(out, "solution obtained with the Newton-Raphson method:")?;
    print(out, &Table::from_rows(&newton.history).to_string())?;
    print(out, &newton_summary(&newton, c.max_iter))?;

    Ok(Study {
        equation,
        derivative,
        bisection,
        newton,
    })
}

fn print<W: Write>(out: &mut W, line: &str) -> Result<()> {
    writeln!(out, "{line}").context("could not write report")?;
    Ok(())
}
