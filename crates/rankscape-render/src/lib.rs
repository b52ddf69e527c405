//! Heat-map rendering for Rankscape.
//!
//! Turns [`ScoreGrid`](rankscape_grid::ScoreGrid)s into a combined PNG figure
//! per scenario, one panel per scale, stacked vertically. Colours use a
//! symmetric-log normalisation so that the huge scores near distance zero do
//! not wash out the rest of the panel.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │               rankscape-render               │
//! ├──────────────────────────────────────────────┤
//! │  Colormap (plasma, viridis, ...)             │
//! │  SymLogNorm (matplotlib-compatible)          │
//! ├──────────────────────────────────────────────┤
//! │  FigureLayout / render_figure → RgbImage     │
//! │  PlotManifest (JSON sidecar with labels)     │
//! ├──────────────────────────────────────────────┤
//! │  generate_plots (grids → PNG + JSON + CSV)   │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! The PNG carries no text; panel titles, axis labels, extents, and colour
//! bar ticks are written to the manifest next to it.

pub mod colormap;
pub mod error;
pub mod figure;
pub mod manifest;
pub mod norm;
pub mod plot;

pub use colormap::Colormap;
pub use error::{Error, Result};
pub use figure::{FigureLayout, PixelRect, render_figure};
pub use manifest::{PanelManifest, PlotManifest};
pub use norm::{NormParams, SymLogNorm};
pub use plot::{PlotOptions, PlotOutput, generate_plots};
