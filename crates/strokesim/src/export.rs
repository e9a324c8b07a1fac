//! JSON export of plot series
//!
//! Each series or histogram becomes one pretty-printed JSON file named after
//! a slug of its title, written atomically into the export directory.

use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::eyre::WrapErr;
use serde::Serialize;
use strokesim_core::series::{Histogram, PlotSeries, PlotSink};

use crate::util::io::atomic_write;

/// Lowercase alphanumeric slug with single underscores
fn slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('_') {
            slug.push('_');
        }
    }
    while slug.ends_with('_') {
        slug.pop();
    }
    if slug.is_empty() {
        slug.push_str("series");
    }
    slug
}

/// Plot sink writing JSON files into a directory
#[derive(Debug)]
pub struct JsonPlotSink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl JsonPlotSink {
    /// Create the export directory if needed
    pub fn new(dir: impl Into<PathBuf>) -> color_eyre::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .wrap_err_with(|| format!("Failed to create export directory {}", dir.display()))?;
        Ok(Self {
            dir,
            written: Vec::new(),
        })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Files written so far, in order
    #[must_use]
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn write_json<T: Serialize>(&mut self, kind: &str, name: &str, value: &T) -> color_eyre::Result<()> {
        let path = self.dir.join(format!("{kind}_{}.json", slug(name)));
        let json = serde_json::to_string_pretty(value)
            .wrap_err_with(|| format!("Failed to serialize {name}"))?;
        atomic_write(&path, &json)
            .wrap_err_with(|| format!("Failed to write {}", path.display()))?;

        tracing::debug!(path = %path.display(), "Exported plot data");
        self.written.push(path);
        Ok(())
    }
}

impl PlotSink for JsonPlotSink {
    type Error = color_eyre::Report;

    fn sample_path(&mut self, series: &PlotSeries) -> Result<(), Self::Error> {
        self.write_json("path", &series.name, series)
    }

    fn histogram(&mut self, histogram: &Histogram) -> Result<(), Self::Error> {
        self.write_json("histogram", &histogram.name, histogram)
    }

    fn scatter(&mut self, series: &PlotSeries) -> Result<(), Self::Error> {
        self.write_json("scatter", &series.name, series)
    }
}
