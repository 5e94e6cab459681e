//! Population growth study
//!
//! Finds when a logistically growing population reaches a target, by bisection
//! and by Newton-Raphson, and plots its growth.

use clap::Parser;
use log::LevelFilter;
use logistic_roots::{
    config::{BisectionConfig, Config, NewtonConfig, PlotConfig},
    model::LogisticModel,
    study,
};

/// Time for a logistic population to reach a target size
#[derive(Parser, Debug)]
#[command(name = "logistic-roots")]
#[command(version, about, long_about = None)]
struct Args {
    /// Carrying capacity k
    #[arg(long, default_value_t = 1_000_000.0)]
    capacity: f64,

    /// Initial population p0
    #[arg(long, default_value_t = 1000.0)]
    initial_population: f64,

    /// Intrinsic growth rate r
    #[arg(long, default_value_t = 0.01)]
    rate: f64,

    /// Target population pt
    #[arg(long, default_value_t = 10_000.0)]
    target: f64,

    /// Lower end of the bisection bracket
    #[arg(long, default_value_t = 200.0, allow_negative_numbers = true)]
    a: f64,

    /// Upper end of the bisection bracket
    #[arg(long, default_value_t = 300.0, allow_negative_numbers = true)]
    b: f64,

    /// Bisection tolerance on the bracket width
    #[arg(long, default_value_t = 1e-5)]
    bisection_tol: f64,

    /// Bisection iteration budget
    #[arg(long, default_value_t = 25)]
    bisection_max_iter: usize,

    /// Newton-Raphson initial estimate
    #[arg(long, default_value_t = 200.0, allow_negative_numbers = true)]
    x0: f64,

    /// Newton-Raphson tolerance on the relative step
    #[arg(long, default_value_t = 1e-5)]
    newton_tol: f64,

    /// Newton-Raphson iteration budget
    #[arg(long, default_value_t = 30)]
    newton_max_iter: usize,

    /// Where to write the population plot
    #[arg(long, value_name = "FILE", default_value = "crescimento_populacional_plot.html")]
    plot: String,

    /// Skip the plot
    #[arg(long)]
    no_plot: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value_t = LevelFilter::Error)]
    log_level: LevelFilter,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        let plot = (!args.no_plot).then(|| PlotConfig {
            path: args.plot,
            ..PlotConfig::default()
        });
        Self {
            model: LogisticModel::new(
                args.capacity,
                args.initial_population,
                args.rate,
                args.target,
            ),
            bisection: BisectionConfig {
                a: args.a,
                b: args.b,
                tol: args.bisection_tol,
                max_iter: args.bisection_max_iter,
            },
            newton: NewtonConfig {
                x0: args.x0,
                tol: args.newton_tol,
                max_iter: args.newton_max_iter,
            },
            plot,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if let Some(level) = args.log_level.to_level() {
        simple_logger::init_with_level(level)?;
    }

    let config = Config::from(args);
    log::debug!("{config:?}");

    study::run(&config, &mut std::io::stdout().lock())?;
    Ok(())
}
