//! Run parameters of the population study.

use crate::model::{linspace, LogisticModel};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BisectionConfig {
    pub a: f64,
    pub b: f64,
    pub tol: f64,
    pub max_iter: usize,
}

impl Default for BisectionConfig {
    fn default() -> Self {
        Self {
            a: 200.0,
            b: 300.0,
            tol: 1e-5,
            max_iter: 25,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NewtonConfig {
    pub x0: f64,
    pub tol: f64,
    pub max_iter: usize,
}

impl Default for NewtonConfig {
    fn default() -> Self {
        Self {
            x0: 200.0,
            tol: 1e-5,
            max_iter: 30,
        }
    }
}

/// Time grid and destination of the population plot.
#[derive(Clone, Debug, PartialEq)]
pub struct PlotConfig {
    pub path: String,
    pub t_start: f64,
    pub t_end: f64,
    pub samples: usize,
}

impl PlotConfig {
    #[must_use]
    pub fn times(&self) -> Vec<f64> {
        linspace(self.t_start, self.t_end, self.samples)
    }
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            path: "crescimento_populacional_plot.html".to_owned(),
            t_start: 1.0,
            t_end: 500.0,
            samples: 50,
        }
    }
}

/// Everything a run needs. The defaults reproduce the reference study of a
/// colony of 1000 growing towards 10000 under a carrying capacity of one
/// million.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Config {
    pub model: LogisticModel,
    pub bisection: BisectionConfig,
    pub newton: NewtonConfig,
    /// `None` skips plotting
    pub plot: Option<PlotConfig>,
}

impl Config {
    #[must_use]
    pub fn with_plot(mut self, plot: PlotConfig) -> Self {
        self.plot = Some(plot);
        self
    }
}

#[cfg(test)]
mod test {
    use super::{Config, PlotConfig};

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.model.capacity, 1_000_000.0);
        assert_eq!(config.bisection.max_iter, 25);
        assert_eq!(config.newton.x0, 200.0);
        assert!(config.plot.is_none());

        let config = config.with_plot(PlotConfig::default());
        let ts = config.plot.unwrap().times();
        assert_eq!(ts.len(), 50);
        assert_eq!((ts[0], ts[49]), (1.0, 500.0));
    }
}
