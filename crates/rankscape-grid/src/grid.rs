//! Dense score grids.

use std::io::Write;

use chrono::{DateTime, Utc};
use rankscape_core::scoring::{date_score_at_offset, top_score, validate_distance};
use rankscape_core::{Error, Result, SortOption};
use serde::{Deserialize, Serialize};

use crate::MAX_RESOLUTION;
use crate::sampling::linspace;
use crate::scale::{AxisRange, Scale};

/// Scores of one sort option sampled over one scale.
///
/// `values` is row-major with one row per y sample; row 0 is the smallest y
/// (the bottom of a plot whose origin is the lower-left corner).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreGrid {
    /// Sort option the grid was computed for.
    pub scenario: SortOption,
    /// Scale label.
    pub label: String,
    /// X axis label.
    pub x_label: String,
    /// Y axis label.
    pub y_label: String,
    /// Distance samples.
    pub xs: Vec<f64>,
    /// Y samples: bookmark counts, or Unix timestamps for date scales.
    pub ys: Vec<f64>,
    /// Scores, `ys.len()` rows of `xs.len()` columns.
    pub values: Vec<f64>,
    /// `[x_min, x_max, y_min, y_max]` in the units of `xs` and `ys`.
    pub extent: [f64; 4],
    /// Smallest score in the grid.
    pub min: f64,
    /// Largest score in the grid.
    pub max: f64,
}

impl ScoreGrid {
    /// Sample `sort` over `scale` with `resolution` points per axis.
    ///
    /// Date scales are anchored at `reference`; bookmark scales ignore it.
    pub fn compute(
        sort: SortOption,
        scale: &Scale,
        resolution: usize,
        reference: DateTime<Utc>,
    ) -> Result<Self> {
        check_resolution(resolution)?;
        scale.validate()?;
        if scale.range.family() != sort.family() {
            return Err(Error::ScaleMismatch {
                sort: sort.to_string(),
                scale: scale.label.clone(),
            });
        }

        let (d0, d1) = scale.distance;
        validate_distance(d0)?;
        validate_distance(d1)?;
        let xs = linspace(d0, d1, resolution);
        let (y0, y1) = scale.range.bounds();
        let offsets = linspace(y0, y1, resolution);
        let direction = sort.direction();

        let mut values = Vec::with_capacity(resolution * resolution);
        for &y in &offsets {
            for &x in &xs {
                let score = match scale.range {
                    AxisRange::Bookmarks { .. } => top_score(x, y, direction),
                    AxisRange::DateOffset { .. } => date_score_at_offset(x, y, direction),
                };
                values.push(score);
            }
        }

        let (ys, extent) = match scale.range {
            AxisRange::Bookmarks { .. } => (offsets, [d0, d1, y0, y1]),
            AxisRange::DateOffset { .. } => {
                let anchor = unix_seconds(reference);
                let ys = offsets.iter().map(|o| anchor + o).collect();
                (ys, [d0, d1, anchor + y0, anchor + y1])
            }
        };

        let (min, max) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });

        log::debug!(
            "Computed {sort} grid '{}' ({resolution}x{resolution}, scores {min:.4} .. {max:.4})",
            scale.label
        );

        Ok(Self {
            scenario: sort,
            label: scale.label.clone(),
            x_label: "Distance".to_string(),
            y_label: scale.range.axis_label().to_string(),
            xs,
            ys,
            values,
            extent,
            min,
            max,
        })
    }

    /// Number of y samples.
    pub fn rows(&self) -> usize {
        self.ys.len()
    }

    /// Number of x samples.
    pub fn cols(&self) -> usize {
        self.xs.len()
    }

    /// Score at `(row, col)`, or `None` out of bounds.
    pub fn value(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.rows() || col >= self.cols() {
            return None;
        }
        self.values.get(row * self.cols() + col).copied()
    }

    /// Write the grid as CSV.
    ///
    /// The header is the literal `y` followed by every x sample; each following line is
    /// one y sample and its row of scores.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv = csv::Writer::from_writer(writer);
        let csv_err = |e: csv::Error| Error::operation(format!("Failed to write CSV: {e}"));

        let mut header = Vec::with_capacity(self.cols() + 1);
        header.push("y".to_string());
        header.extend(self.xs.iter().map(|x| x.to_string()));
        csv.write_record(&header).map_err(csv_err)?;

        for (row, y) in self.ys.iter().enumerate() {
            let start = row * self.cols();
            let mut record = Vec::with_capacity(self.cols() + 1);
            record.push(y.to_string());
            record.extend(self.values[start..start + self.cols()].iter().map(|v| v.to_string()));
            csv.write_record(&record).map_err(csv_err)?;
        }

        csv.flush()?;
        Ok(())
    }
}

/// Reject resolutions outside `2..=MAX_RESOLUTION`.
pub fn check_resolution(resolution: usize) -> Result<()> {
    if resolution < 2 {
        return Err(Error::validation_field(
            "resolution",
            format!("must be at least 2 (got {resolution})"),
        ));
    }
    if resolution > MAX_RESOLUTION {
        return Err(Error::validation_field(
            "resolution",
            format!("must be at most {MAX_RESOLUTION} (got {resolution})"),
        ));
    }
    Ok(())
}

fn unix_seconds(at: DateTime<Utc>) -> f64 {
    at.timestamp() as f64 + f64::from(at.timestamp_subsec_nanos()) / 1_000_000_000.0
}
