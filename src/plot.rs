//! Population plots using Plotly.

use std::path::Path;

use plotly::{
    common::{Mode, Title},
    layout::Axis,
    Layout, Plot, Scatter,
};

use crate::{Formula, Result};

/// Plot of `f(t)` over a time grid, together with the zero line whose
/// crossing marks the target population.
pub struct PopulationPlot {
    plot: Plot,
}

impl PopulationPlot {
    /// Samples `f` at every point of `ts`.
    #[must_use]
    pub fn new(f: &Formula, ts: &[f64]) -> Self {
        let mut plot = Plot::new();

        let trace = Scatter::new(ts.to_owned(), f.eval_many(ts))
            .mode(Mode::Lines)
            .name(&format!("f(t) = {f}"));
        plot.add_trace(trace);

        let trace = Scatter::new(ts.to_owned(), vec![0.0; ts.len()])
            .mode(Mode::Lines)
            .name("0");
        plot.add_trace(trace);

        let layout = Layout::new()
            .x_axis(Axis::new().title(Title::with_text("Time (t)")))
            .y_axis(Axis::new().title(Title::with_text("Population (p)")));
        plot.set_layout(layout);

        Self { plot }
    }

    /// Standalone HTML page with the plot.
    #[must_use]
    pub fn to_html(&self) -> String {
        self.plot.to_html()
    }

    /// Writes the plot to `path`, as an HTML page.
    ///
    /// # Errors
    /// If the file cannot be written.
    #[cfg(not(feature = "kaleido"))]
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        use anyhow::Context;

        let path = path.as_ref();
        std::fs::write(path, self.to_html())
            .with_context(|| format!("could not write plot to {}", path.display()))?;
        log::debug!("plot written to {}", path.display());
        Ok(())
    }

    /// Writes the plot to `path` as a PNG image, replacing any extension.
    ///
    /// # Errors
    /// Never, rendering failures are reported by `kaleido` itself.
    #[cfg(feature = "kaleido")]
    #[allow(clippy::unnecessary_wraps)]
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref().with_extension("png");
        self.plot
            .write_image(&path, plotly::ImageFormat::PNG, 800, 600, 1.0);
        log::debug!("plot written to {}", path.display());
        Ok(())
    }
}
