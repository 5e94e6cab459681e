//! Console tables for iteration histories.

use std::fmt;

use itertools::Itertools;

use crate::roots::{BisectionStep, NewtonStep, Solution, Status};

/// Rounds to a fixed number of decimals, for display only.
fn round(x: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    let scaled = (x * scale).round() / scale;
    if scaled.is_finite() {
        scaled
    } else {
        x
    }
}

/// A row of a convergence table.
pub trait Row {
    const HEADER: &'static [&'static str];

    fn cells(&self) -> Vec<String>;
}

impl Row for BisectionStep {
    const HEADER: &'static [&'static str] = &["i", "xm", "f(xm)", "a", "b", "f(a)", "f(b)", "EA"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.iter.to_string(),
            round(self.midpoint, 8).to_string(),
            round(self.f_midpoint, 8).to_string(),
            round(self.a, 4).to_string(),
            round(self.b, 4).to_string(),
            round(self.f_a, 4).to_string(),
            round(self.f_b, 4).to_string(),
            format!("{:.6e}", self.width),
        ]
    }
}

impl Row for NewtonStep {
    const HEADER: &'static [&'static str] = &["i", "x", "f(x)", "f'(x)", "ER"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.iter.to_string(),
            round(self.x, 8).to_string(),
            round(self.fx, 8).to_string(),
            round(self.dfx, 4).to_string(),
            format!("{:.6e}", self.error),
        ]
    }
}

/// A boxed ASCII table with centred cells.
///
/// ```text
/// +---+-----+
/// | i |  x  |
/// +---+-----+
/// | 0 | 2.5 |
/// +---+-----+
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Table {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    #[must_use]
    pub fn new<S: ToString>(header: &[S]) -> Self {
        Self {
            header: header.iter().map(ToString::to_string).collect(),
            rows: vec![],
        }
    }

    /// Builds a table with one line per row.
    #[must_use]
    pub fn from_rows<R: Row>(rows: &[R]) -> Self {
        let mut table = Self::new(R::HEADER);
        for row in rows {
            table.push(row.cells());
        }
        table
    }

    /// Appends a row, padding or truncating it to the number of columns.
    pub fn push(&mut self, mut cells: Vec<String>) {
        cells.resize(self.header.len(), String::new());
        self.rows.push(cells);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn widths(&self) -> Vec<usize> {
        (0..self.header.len())
            .map(|col| {
                std::iter::once(&self.header[col])
                    .chain(self.rows.iter().map(|row| &row[col]))
                    .map(|cell| cell.chars().count())
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths = self.widths();
        let rule = format!(
            "+{}+",
            widths.iter().map(|w| "-".repeat(w + 2)).join("+")
        );
        let line = |cells: &[String]| {
            format!(
                "| {} |",
                cells
                    .iter()
                    .zip(&widths)
                    .map(|(cell, &w)| format!("{cell:^w$}"))
                    .join(" | ")
            )
        };

        writeln!(f, "{rule}")?;
        writeln!(f, "{}", line(&self.header))?;
        writeln!(f, "{rule}")?;
        for row in &self.rows {
            writeln!(f, "{}", line(row))?;
        }
        write!(f, "{rule}")
    }
}

/// Summary line of a Newton-Raphson run.
#[must_use]
pub fn newton_summary(solution: &Solution<NewtonStep>, max_iter: usize) -> String {
    match solution.status {
        Status::Exhausted => format!("no solution obtained in {max_iter} iterations"),
        Status::Converged | Status::ExactRoot => {
            format!("solution obtained: x = {:.6}", solution.root)
        }
    }
}

#[cfg(test)]
mod test {
    use super::{newton_summary, round, Row, Table};
    use crate::roots::{bisect, newton, BisectionStep};

    #[test]
    fn rounding() {
        assert_eq!(round(1.234_567_891, 4), 1.2346);
        assert_eq!(round(-0.000_04, 4), -0.0);
        assert_eq!(round(1e305, 8), 1e305);
    }

    #[test]
    fn renders_boxed() {
        let mut table = Table::new(&["i", "x"]);
        table.push(vec!["0".into(), "2.5".into()]);
        table.push(vec!["10".into()]);
        let expected = "\
+----+-----+
| i  |  x  |
+----+-----+
| 0  | 2.5 |
| 10 |     |
+----+-----+";
        assert_eq!(table.to_string(), expected);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn bisection_cells() {
        let step = BisectionStep {
            iter: 3,
            midpoint: 231.163_505_554_2,
            f_midpoint: -0.000_123_456_789,
            a: 231.0,
            b: 231.25,
            f_a: -16.123_456,
            f_b: 8.0,
            width: 0.25,
        };
        assert_eq!(
            step.cells(),
            [
                "3",
                "231.16350555",
                "-0.00012346",
                "231",
                "231.25",
                "-16.1235",
                "8",
                "2.500000e-1"
            ]
        );
    }

    #[test]
    fn one_line_per_step() {
        let solution = bisect("x**2 - 4", 0.0, 3.0, 1e-2, 100).unwrap();
        let table = Table::from_rows(&solution.history);
        assert_eq!(table.len(), solution.history.len());
        // border, header, border, rows, border
        assert_eq!(table.to_string().lines().count(), solution.history.len() + 4);
    }

    #[test]
    fn summaries() {
        let solution = newton(3.0, "x**2 - 4", "2*x", 1e-5, 30).unwrap();
        assert_eq!(newton_summary(&solution, 30), "solution obtained: x = 2.000000");
        let solution = newton(3.0, "x**2 - 4", "2*x", 1e-15, 2).unwrap();
        assert_eq!(newton_summary(&solution, 2), "no solution obtained in 2 iterations");
    }
}
