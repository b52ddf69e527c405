//! JSON sidecar describing a rendered figure.
//!
//! The PNG itself carries no text, so everything a reader needs to interpret
//! it (titles, axis labels, extents, colour bar ticks) lives here.

use std::path::Path;

use chrono::{DateTime, Utc};
use rankscape_core::SortOption;
use rankscape_grid::ScoreGrid;
use serde::{Deserialize, Serialize};

use crate::colormap::Colormap;
use crate::error::{Error, Result};
use crate::figure::{FigureLayout, PixelRect};
use crate::norm::NormParams;

/// Number of colour bar ticks recorded per panel.
pub const COLORBAR_TICKS: usize = 5;

/// Description of one panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelManifest {
    /// Panel title (the scale label).
    pub label: String,
    /// X axis label.
    pub x_label: String,
    /// Y axis label.
    pub y_label: String,
    /// `[x_min, x_max, y_min, y_max]` in data units.
    pub extent: [f64; 4],
    /// Smallest score in the panel (bottom of the colour bar).
    pub vmin: f64,
    /// Largest score in the panel (top of the colour bar).
    pub vmax: f64,
    /// Scores at evenly spaced colour bar positions, bottom to top.
    pub colorbar_ticks: Vec<f64>,
    /// Heat map position in the image.
    pub heatmap: PixelRect,
    /// Colour bar position in the image.
    pub colorbar: PixelRect,
}

/// Description of one rendered figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotManifest {
    /// Figure title.
    pub title: String,
    /// Scenario plotted.
    pub scenario: SortOption,
    /// Reference date used by date scales.
    pub reference_date: DateTime<Utc>,
    /// Image file name, relative to the manifest.
    pub image: String,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Colour map used.
    pub colormap: Colormap,
    /// Normalisation shape.
    pub norm: NormParams,
    /// Panels, top to bottom.
    pub panels: Vec<PanelManifest>,
}

impl PlotManifest {
    /// Describe a figure rendered from `grids` with `layout`.
    pub fn describe(
        scenario: SortOption,
        image: impl Into<String>,
        grids: &[ScoreGrid],
        layout: &FigureLayout,
        colormap: Colormap,
        norm: NormParams,
        reference_date: DateTime<Utc>,
    ) -> Result<Self> {
        let mut panels = Vec::with_capacity(grids.len());
        for (index, grid) in (0u32..).zip(grids) {
            let symlog = norm.for_range(grid.min, grid.max)?;
            panels.push(PanelManifest {
                label: grid.label.clone(),
                x_label: grid.x_label.clone(),
                y_label: grid.y_label.clone(),
                extent: grid.extent,
                vmin: grid.min,
                vmax: grid.max,
                colorbar_ticks: symlog.ticks(COLORBAR_TICKS),
                heatmap: layout.heatmap_rect(index),
                colorbar: layout.colorbar_rect(index),
            });
        }

        let panel_count = u32::try_from(panels.len())
            .map_err(|_| Error::render(format!("too many panels ({})", panels.len())))?;

        Ok(Self {
            title: format!("Scenario: {scenario}"),
            scenario,
            reference_date,
            image: image.into(),
            width: layout.figure_width(),
            height: layout.figure_height(panel_count),
            colormap,
            norm,
            panels,
        })
    }

    /// Write the manifest as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| Error::io_with_path(e, path))?;
        Ok(())
    }

    /// Read a manifest back.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
        Ok(serde_json::from_str(&content)?)
    }
}
