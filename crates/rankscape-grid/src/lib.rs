//! Score grid sampling for Rankscape.
//!
//! A [`ScoreGrid`] is a dense sample of one sort option's score over a
//! two-dimensional domain: embedding distance on the x axis and the sort's
//! secondary signal (bookmark count or date offset) on the y axis. The
//! domain of each grid comes from a [`Scale`].
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                rankscape-grid                │
//! ├──────────────────────────────────────────────┤
//! │  Scale / AxisRange (panel domains)           │
//! │  bookmark_scales() / date_scales()           │
//! ├──────────────────────────────────────────────┤
//! │  linspace (inclusive sampling)               │
//! │  ScoreGrid::compute (row = y, col = x)       │
//! │  ScoreGrid::write_csv                        │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use chrono::Utc;
//! use rankscape_core::SortOption;
//! use rankscape_grid::{ScoreGrid, bookmark_scales};
//!
//! let scales = bookmark_scales();
//! let scale = &scales[0];
//! let grid = ScoreGrid::compute(SortOption::EmbedTopDesc, scale, 16, Utc::now()).unwrap();
//! assert_eq!(grid.rows(), 16);
//! assert!(grid.max >= grid.min);
//! ```

pub mod grid;
pub mod sampling;
pub mod scale;

pub use grid::{ScoreGrid, check_resolution};
pub use sampling::linspace;
pub use scale::{AxisRange, Scale, bookmark_scales, date_scales, default_scales};

/// Default number of samples along each axis.
pub const DEFAULT_RESOLUTION: usize = 100;

/// Largest accepted number of samples along each axis.
pub const MAX_RESOLUTION: usize = 4096;
