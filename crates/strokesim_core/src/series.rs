//! Plot series handed to a plotting collaborator
//!
//! The core never renders anything. It prepares named `(x, y)` sequences and
//! binned samples and pushes them into a [`PlotSink`] supplied by the caller.

use serde::{Deserialize, Serialize};

/// Named sequence of `(x, y)` points (sample path, NMB line, CE plane cloud)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotSeries {
    pub name: String,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<(f64, f64)>,
}

impl PlotSeries {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        x_label: impl Into<String>,
        y_label: impl Into<String>,
        points: Vec<(f64, f64)>,
    ) -> Self {
        Self {
            name: name.into(),
            x_label: x_label.into(),
            y_label: y_label.into(),
            points,
        }
    }
}

/// Upper bound on the number of bins; narrower widths are widened to fit
pub const MAX_HISTOGRAM_BINS: usize = 10_000;

/// One histogram bin covering `[lower, lower + bin_width)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub count: usize,
}

/// Fixed-width histogram of a raw sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub name: String,
    pub x_label: String,
    pub bin_width: f64,
    pub bins: Vec<HistogramBin>,
}

impl Histogram {
    /// Bin `data` into bins of `bin_width` aligned to multiples of the width.
    ///
    /// Non-finite values are skipped. A non-positive or non-finite width
    /// yields no bins. If the sample's range would need more than
    /// [`MAX_HISTOGRAM_BINS`] bins, the width is widened to
    /// `range / MAX_HISTOGRAM_BINS` and stored in `bin_width`.
    #[must_use]
    pub fn from_sample(
        name: impl Into<String>,
        x_label: impl Into<String>,
        data: &[f64],
        bin_width: f64,
    ) -> Self {
        let finite: Vec<f64> = data.iter().copied().filter(|v| v.is_finite()).collect();
        let mut bins = Vec::new();
        let mut bin_width = bin_width;

        if bin_width > 0.0 && bin_width.is_finite() && !finite.is_empty() {
            let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
            let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let range = max - min;
            if range / bin_width > MAX_HISTOGRAM_BINS as f64 {
                bin_width = range / MAX_HISTOGRAM_BINS as f64;
            }
            let start = (min / bin_width).floor() * bin_width;
            let num_bins = ((max - start) / bin_width).floor() as usize + 1;

            let mut counts = vec![0usize; num_bins];
            for v in &finite {
                let i = (((v - start) / bin_width).floor() as usize).min(num_bins - 1);
                counts[i] += 1;
            }
            bins = counts
                .into_iter()
                .enumerate()
                .map(|(i, count)| HistogramBin {
                    lower: start + i as f64 * bin_width,
                    count,
                })
                .collect();
        }

        Self {
            name: name.into(),
            x_label: x_label.into(),
            bin_width,
            bins,
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }
}

/// Receiver of plot data (file exporter, chart renderer, ...)
pub trait PlotSink {
    type Error;

    /// A line or step series
    fn sample_path(&mut self, series: &PlotSeries) -> Result<(), Self::Error>;

    /// A binned sample
    fn histogram(&mut self, histogram: &Histogram) -> Result<(), Self::Error>;

    /// Unconnected points, such as a cost-effectiveness cloud
    fn scatter(&mut self, series: &PlotSeries) -> Result<(), Self::Error> {
        self.sample_path(series)
    }
}
