//! Panel domains.
//!
//! A [`Scale`] fixes the ranges sampled for one panel of a plot. Bookmark
//! sorts are sampled over bookmark counts; date sorts over offsets from the
//! reference date, symmetric around it so that both older and newer items
//! are visible.

use rankscape_core::{Error, Result, ScoreFamily};
use serde::{Deserialize, Serialize};

const MINUTE: f64 = 60.0;
const HOUR: f64 = 60.0 * MINUTE;
const DAY: f64 = 24.0 * HOUR;
const WEEK: f64 = 7.0 * DAY;

/// Range of the y axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AxisRange {
    /// Bookmark counts.
    Bookmarks {
        /// Smallest count sampled.
        min: f64,
        /// Largest count sampled.
        max: f64,
    },
    /// Offsets from the reference date, in seconds.
    DateOffset {
        /// Earliest offset sampled (usually negative).
        min_seconds: f64,
        /// Latest offset sampled.
        max_seconds: f64,
    },
}

impl AxisRange {
    /// Sort family this range serves.
    pub fn family(&self) -> ScoreFamily {
        match self {
            AxisRange::Bookmarks { .. } => ScoreFamily::Bookmarks,
            AxisRange::DateOffset { .. } => ScoreFamily::Date,
        }
    }

    /// `(start, end)` of the range in its native unit.
    pub fn bounds(&self) -> (f64, f64) {
        match *self {
            AxisRange::Bookmarks { min, max } => (min, max),
            AxisRange::DateOffset {
                min_seconds,
                max_seconds,
            } => (min_seconds, max_seconds),
        }
    }

    /// Axis label shown for this range.
    pub fn axis_label(&self) -> &'static str {
        match self {
            AxisRange::Bookmarks { .. } => "Bookmarks",
            AxisRange::DateOffset { .. } => "Date",
        }
    }
}

fn unit_distance() -> (f64, f64) {
    (0.0, 1.0)
}

/// Domain of one plot panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scale {
    /// Panel title, e.g. `"XS Range"`.
    pub label: String,

    /// Distance range on the x axis.
    #[serde(default = "unit_distance")]
    pub distance: (f64, f64),

    /// Range on the y axis.
    pub range: AxisRange,
}

impl Scale {
    /// Bookmark scale from 0 to `max` over the unit distance range.
    pub fn bookmarks(label: impl Into<String>, max: f64) -> Self {
        Self {
            label: label.into(),
            distance: unit_distance(),
            range: AxisRange::Bookmarks { min: 0.0, max },
        }
    }

    /// Date scale spanning `±span_seconds` around the reference date.
    pub fn date_span(label: impl Into<String>, span_seconds: f64) -> Self {
        Self {
            label: label.into(),
            distance: unit_distance(),
            range: AxisRange::DateOffset {
                min_seconds: -span_seconds,
                max_seconds: span_seconds,
            },
        }
    }

    /// Check the ranges are finite, increasing, and non-negative where
    /// the formulas require it.
    pub fn validate(&self) -> Result<()> {
        let (d0, d1) = self.distance;
        check_increasing(&self.label, "distance", d0, d1)?;
        if d0 < 0.0 {
            return Err(Error::validation_field(
                "distance",
                format!("scale '{}' starts below zero ({d0})", self.label),
            ));
        }

        let (y0, y1) = self.range.bounds();
        check_increasing(&self.label, self.range.axis_label(), y0, y1)?;
        if matches!(self.range, AxisRange::Bookmarks { .. }) && y0 < 0.0 {
            return Err(Error::validation_field(
                "bookmarks",
                format!("scale '{}' starts below zero ({y0})", self.label),
            ));
        }
        Ok(())
    }
}

fn check_increasing(label: &str, axis: &str, start: f64, end: f64) -> Result<()> {
    if !start.is_finite() || !end.is_finite() {
        return Err(Error::validation_field(
            axis.to_lowercase(),
            format!("scale '{label}' has a non-finite bound"),
        ));
    }
    if start >= end {
        return Err(Error::validation_field(
            axis.to_lowercase(),
            format!("scale '{label}' range is empty or inverted ({start} .. {end})"),
        ));
    }
    Ok(())
}

/// Bookmark scales, from a handful of bookmarks to a million.
pub fn bookmark_scales() -> Vec<Scale> {
    vec![
        Scale::bookmarks("XS Range", 10.0),
        Scale::bookmarks("S Range", 100.0),
        Scale::bookmarks("L Range", 10_000.0),
        Scale::bookmarks("XL Range", 1_000_000.0),
    ]
}

/// Date scales, from seconds to a year either side of the reference date.
pub fn date_scales() -> Vec<Scale> {
    vec![
        Scale::date_span("Seconds Range", 1.0),
        Scale::date_span("Hours Range", HOUR),
        Scale::date_span("Days Range", DAY),
        Scale::date_span("Weeks Range", WEEK),
        Scale::date_span("Months Range", 4.0 * WEEK),
        Scale::date_span("Years Range", 52.0 * WEEK),
    ]
}

/// Built-in scales for a sort family.
pub fn default_scales(family: ScoreFamily) -> Vec<Scale> {
    match family {
        ScoreFamily::Bookmarks => bookmark_scales(),
        ScoreFamily::Date => date_scales(),
    }
}
