//! Figure layout and rasterisation.
//!
//! A figure stacks one panel per grid from top to bottom. Each panel is a
//! heat map with its origin in the lower-left corner and a vertical colour
//! bar to its right:
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │ margin                               │
//! │   ┌──────────────┐ gap ┌──┐          │
//! │   │   heat map   │     │cb│          │
//! │   └──────────────┘     └──┘          │
//! │ margin                               │
//! │   ┌──────────────┐     ┌──┐          │
//! │   │     ...      │     │  │          │
//! └──────────────────────────────────────┘
//! ```

use image::{Rgb, RgbImage};
use rankscape_grid::ScoreGrid;
use serde::{Deserialize, Serialize};

use crate::colormap::Colormap;
use crate::error::{Error, Result};
use crate::norm::{NormParams, SymLogNorm};

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const FRAME: Rgb<u8> = Rgb([0, 0, 0]);

/// Largest accepted heat map width or height.
pub const MAX_PANEL_SIZE: u32 = 8192;

/// Largest accepted margin, colour bar width or colour bar gap.
pub const MAX_SPACING: u32 = 1024;

/// Largest figure, in pixels, that will be allocated.
pub const MAX_FIGURE_PIXELS: u64 = 1 << 28;

fn default_panel_width() -> u32 {
    800
}

fn default_panel_height() -> u32 {
    800
}

fn default_margin() -> u32 {
    40
}

fn default_colorbar_width() -> u32 {
    30
}

fn default_colorbar_gap() -> u32 {
    20
}

/// Pixel dimensions of a figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FigureLayout {
    /// Heat map width.
    #[serde(default = "default_panel_width")]
    pub panel_width: u32,

    /// Heat map height.
    #[serde(default = "default_panel_height")]
    pub panel_height: u32,

    /// Space around and between panels.
    #[serde(default = "default_margin")]
    pub margin: u32,

    /// Colour bar width.
    #[serde(default = "default_colorbar_width")]
    pub colorbar_width: u32,

    /// Space between a heat map and its colour bar.
    #[serde(default = "default_colorbar_gap")]
    pub colorbar_gap: u32,
}

impl Default for FigureLayout {
    fn default() -> Self {
        Self {
            panel_width: default_panel_width(),
            panel_height: default_panel_height(),
            margin: default_margin(),
            colorbar_width: default_colorbar_width(),
            colorbar_gap: default_colorbar_gap(),
        }
    }
}

/// A rectangle in image coordinates (origin top-left).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width.
    pub width: u32,
    /// Height.
    pub height: u32,
}

impl FigureLayout {
    /// Reject layouts that cannot hold a panel or exceed the size limits.
    pub fn validate(&self) -> Result<()> {
        if self.panel_width < 2 || self.panel_height < 2 || self.colorbar_width < 1 {
            return Err(Error::render(format!(
                "figure layout too small: panel {}x{}, colorbar {}",
                self.panel_width, self.panel_height, self.colorbar_width
            )));
        }
        if self.panel_width > MAX_PANEL_SIZE || self.panel_height > MAX_PANEL_SIZE {
            return Err(Error::render(format!(
                "figure layout too large: panel {}x{} exceeds {MAX_PANEL_SIZE}",
                self.panel_width, self.panel_height
            )));
        }
        let spacing = self.margin.max(self.colorbar_width).max(self.colorbar_gap);
        if spacing > MAX_SPACING {
            return Err(Error::render(format!(
                "figure layout too large: margin, colorbar width and gap must not exceed \
                 {MAX_SPACING} (got {spacing})"
            )));
        }
        Ok(())
    }

    /// Total width of a figure. Saturates instead of overflowing.
    pub fn figure_width(&self) -> u32 {
        self.margin
            .saturating_mul(2)
            .saturating_add(self.panel_width)
            .saturating_add(self.colorbar_gap)
            .saturating_add(self.colorbar_width)
    }

    /// Total height of a figure with `panels` panels. Saturates instead of
    /// overflowing.
    pub fn figure_height(&self, panels: u32) -> u32 {
        panels
            .saturating_mul(self.panel_height.saturating_add(self.margin))
            .saturating_add(self.margin)
    }

    /// Validated `(width, height)` of a figure with `panels` panels.
    pub fn figure_size(&self, panels: u32) -> Result<(u32, u32)> {
        self.validate()?;
        let too_large = || Error::render(format!("figure with {panels} panels is too large"));
        let height = self
            .panel_height
            .checked_add(self.margin)
            .and_then(|step| step.checked_mul(panels))
            .and_then(|h| h.checked_add(self.margin))
            .ok_or_else(too_large)?;
        let width = self.figure_width();
        if u64::from(width) * u64::from(height) > MAX_FIGURE_PIXELS {
            return Err(too_large());
        }
        Ok((width, height))
    }

    /// Heat map rectangle of panel `index` (0 is the top panel).
    pub fn heatmap_rect(&self, index: u32) -> PixelRect {
        PixelRect {
            x: self.margin,
            y: index
                .saturating_mul(self.panel_height.saturating_add(self.margin))
                .saturating_add(self.margin),
            width: self.panel_width,
            height: self.panel_height,
        }
    }

    /// Colour bar rectangle of panel `index`.
    pub fn colorbar_rect(&self, index: u32) -> PixelRect {
        let heatmap = self.heatmap_rect(index);
        PixelRect {
            x: heatmap
                .x
                .saturating_add(heatmap.width)
                .saturating_add(self.colorbar_gap),
            y: heatmap.y,
            width: self.colorbar_width,
            height: heatmap.height,
        }
    }
}

/// Render `grids` as one stacked figure.
///
/// Every panel is normalised over its own score range.
pub fn render_figure(
    grids: &[ScoreGrid],
    colormap: Colormap,
    layout: &FigureLayout,
    params: NormParams,
) -> Result<RgbImage> {
    if grids.is_empty() {
        return Err(Error::render("cannot render a figure without panels"));
    }
    let panels = u32::try_from(grids.len())
        .map_err(|_| Error::render(format!("too many panels ({})", grids.len())))?;
    let (width, height) = layout.figure_size(panels)?;
    let mut image = RgbImage::from_pixel(width, height, BACKGROUND);

    for (index, grid) in (0..panels).zip(grids) {
        if grid.rows() == 0 || grid.cols() == 0 {
            return Err(Error::render(format!("grid '{}' is empty", grid.label)));
        }
        let norm = params.for_range(grid.min, grid.max)?;
        draw_heatmap(&mut image, layout.heatmap_rect(index), grid, &norm, colormap);
        draw_colorbar(&mut image, layout.colorbar_rect(index), colormap);
    }

    log::debug!(
        "Rendered {} panels into {}x{} figure",
        grids.len(),
        image.width(),
        image.height()
    );
    Ok(image)
}

fn draw_heatmap(
    image: &mut RgbImage,
    rect: PixelRect,
    grid: &ScoreGrid,
    norm: &SymLogNorm,
    colormap: Colormap,
) {
    let rows = grid.rows();
    let cols = grid.cols();
    for py in 0..rect.height {
        // Flip vertically: the bottom pixel row shows grid row 0.
        let from_bottom = (rect.height - 1 - py) as usize;
        let row = (from_bottom * rows / rect.height as usize).min(rows - 1);
        for px in 0..rect.width {
            let col = (px as usize * cols / rect.width as usize).min(cols - 1);
            let value = grid.value(row, col).unwrap_or(grid.min);
            let rgb = colormap.sample(norm.normalize(value));
            image.put_pixel(rect.x + px, rect.y + py, Rgb(rgb));
        }
    }
    draw_frame(image, rect);
}

fn draw_colorbar(image: &mut RgbImage, rect: PixelRect, colormap: Colormap) {
    let denom = f64::from(rect.height.saturating_sub(1).max(1));
    for py in 0..rect.height {
        let t = 1.0 - f64::from(py) / denom;
        let rgb = Rgb(colormap.sample(t));
        for px in 0..rect.width {
            image.put_pixel(rect.x + px, rect.y + py, rgb);
        }
    }
    draw_frame(image, rect);
}

fn draw_frame(image: &mut RgbImage, rect: PixelRect) {
    let right = rect.x + rect.width - 1;
    let bottom = rect.y + rect.height - 1;
    for x in rect.x..=right {
        image.put_pixel(x, rect.y, FRAME);
        image.put_pixel(x, bottom, FRAME);
    }
    for y in rect.y..=bottom {
        image.put_pixel(rect.x, y, FRAME);
        image.put_pixel(right, y, FRAME);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rankscape_core::SortOption;
    use rankscape_grid::bookmark_scales;

    fn small_layout() -> FigureLayout {
        FigureLayout {
            panel_width: 40,
            panel_height: 30,
            margin: 5,
            colorbar_width: 6,
            colorbar_gap: 4,
        }
    }

    fn grids(n: usize) -> Vec<ScoreGrid> {
        let reference = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        bookmark_scales()
            .iter()
            .take(n)
            .map(|s| ScoreGrid::compute(SortOption::EmbedTopAsc, s, 20, reference).unwrap())
            .collect()
    }

    #[test]
    fn test_layout_dimensions() {
        let layout = small_layout();
        assert_eq!(layout.figure_width(), 5 + 40 + 4 + 6 + 5);
        assert_eq!(layout.figure_height(2), 5 + 2 * (30 + 5));
        assert_eq!(layout.heatmap_rect(1).y, 5 + 35);
        assert_eq!(layout.colorbar_rect(0).x, 5 + 40 + 4);
    }

    #[test]
    fn test_default_layout() {
        let layout = FigureLayout::default();
        assert_eq!(layout.panel_width, 800);
        assert_eq!(layout.figure_height(4), 40 + 4 * 840);
    }

    #[test]
    fn test_render_dimensions() {
        let layout = small_layout();
        let image = render_figure(&grids(3), Colormap::Plasma, &layout, NormParams::default())
            .unwrap();
        assert_eq!(image.width(), layout.figure_width());
        assert_eq!(image.height(), layout.figure_height(3));
        // Background outside any panel.
        assert_eq!(*image.get_pixel(0, 0), BACKGROUND);
    }

    #[test]
    fn test_heatmap_origin_is_lower_left() {
        let layout = small_layout();
        let image = render_figure(&grids(1), Colormap::Plasma, &layout, NormParams::default())
            .unwrap();
        let rect = layout.heatmap_rect(0);
        // EmbedTopAsc peaks at distance 0, bookmarks 0: the bottom-left corner.
        let bottom_left = image.get_pixel(rect.x + 1, rect.y + rect.height - 2);
        let top_right = image.get_pixel(rect.x + rect.width - 2, rect.y + 1);
        assert_eq!(bottom_left.0, Colormap::Plasma.sample(1.0));
        assert_ne!(top_right.0, bottom_left.0);
    }

    #[test]
    fn test_colorbar_runs_low_to_high_upwards() {
        let layout = small_layout();
        let image = render_figure(&grids(1), Colormap::Viridis, &layout, NormParams::default())
            .unwrap();
        let rect = layout.colorbar_rect(0);
        let top = image.get_pixel(rect.x + 2, rect.y + 1);
        let bottom = image.get_pixel(rect.x + 2, rect.y + rect.height - 2);
        // Frame pixels excluded; near-top is close to the high end.
        assert_eq!(*image.get_pixel(rect.x, rect.y), FRAME);
        assert!(top.0[1] > bottom.0[1]);
    }

    #[test]
    fn test_render_without_grids_fails() {
        let err = render_figure(&[], Colormap::Plasma, &small_layout(), NormParams::default())
            .unwrap_err();
        assert!(err.to_string().contains("without panels"));
    }

    #[test]
    fn test_render_rejects_tiny_layout() {
        let layout = FigureLayout {
            panel_width: 1,
            ..small_layout()
        };
        let result = render_figure(&grids(1), Colormap::Plasma, &layout, NormParams::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_oversized_layout_rejected() {
        let layout = FigureLayout {
            panel_height: 2_000_000_000,
            ..small_layout()
        };
        assert!(layout.validate().is_err());
        assert!(layout.figure_size(4).is_err());
        assert_eq!(layout.figure_height(4), u32::MAX);

        let wide = FigureLayout {
            margin: u32::MAX,
            ..small_layout()
        };
        assert!(wide.validate().is_err());
        assert_eq!(wide.figure_width(), u32::MAX);
    }

    #[test]
    fn test_figure_size_limits_total_pixels() {
        let layout = FigureLayout {
            panel_width: MAX_PANEL_SIZE,
            panel_height: MAX_PANEL_SIZE,
            ..small_layout()
        };
        assert!(layout.validate().is_ok());
        assert!(layout.figure_size(1).is_ok());
        let err = layout.figure_size(6).unwrap_err();
        assert!(err.to_string().contains("too large"));
        assert_eq!(
            small_layout().figure_size(2).unwrap(),
            (small_layout().figure_width(), small_layout().figure_height(2))
        );
    }
}
