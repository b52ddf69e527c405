//! Plot generation: grids → PNG figure, JSON manifest, optional CSV.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use image::ImageFormat;
use rankscape_core::SortOption;
use rankscape_core::util::scale_file_name;
use rankscape_grid::{DEFAULT_RESOLUTION, Scale, ScoreGrid};
use serde::Serialize;

use crate::colormap::Colormap;
use crate::error::{Error, Result};
use crate::figure::{FigureLayout, render_figure};
use crate::manifest::PlotManifest;
use crate::norm::NormParams;

/// Settings shared by every scenario of a plotting run.
#[derive(Debug, Clone)]
pub struct PlotOptions {
    /// Samples per axis.
    pub resolution: usize,
    /// Colour map.
    pub colormap: Colormap,
    /// Figure layout.
    pub layout: FigureLayout,
    /// Normalisation shape.
    pub norm: NormParams,
    /// Also write one CSV per scale.
    pub export_csv: bool,
    /// Anchor for date scales.
    pub reference: DateTime<Utc>,
}

impl PlotOptions {
    /// Default options anchored at `reference`.
    pub fn new(reference: DateTime<Utc>) -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION,
            colormap: Colormap::default(),
            layout: FigureLayout::default(),
            norm: NormParams::default(),
            export_csv: false,
            reference,
        }
    }
}

/// Files written for one scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlotOutput {
    /// Scenario plotted.
    pub scenario: SortOption,
    /// Combined PNG figure.
    pub image_path: PathBuf,
    /// JSON manifest.
    pub manifest_path: PathBuf,
    /// Per-scale CSV files (empty unless requested).
    pub csv_paths: Vec<PathBuf>,
}

/// Plot `scenario` over `scales` into `output_dir`.
///
/// Writes `<scenario>_combined.png` and `<scenario>_combined.json`, plus
/// `<scenario>_<scale>.csv` per scale when CSV export is enabled. The output
/// directory is created if needed.
pub fn generate_plots(
    scenario: SortOption,
    scales: &[Scale],
    options: &PlotOptions,
    output_dir: &Path,
) -> Result<PlotOutput> {
    if scales.is_empty() {
        return Err(Error::render(format!("no scales to plot for {scenario}")));
    }
    std::fs::create_dir_all(output_dir).map_err(|e| Error::io_with_path(e, output_dir))?;

    let grids = scales
        .iter()
        .map(|scale| ScoreGrid::compute(scenario, scale, options.resolution, options.reference))
        .collect::<rankscape_core::Result<Vec<_>>>()?;

    let image = render_figure(&grids, options.colormap, &options.layout, options.norm)?;
    let image_name = format!("{scenario}_combined.png");
    let image_path = output_dir.join(&image_name);
    image.save_with_format(&image_path, ImageFormat::Png)?;

    let manifest = PlotManifest::describe(
        scenario,
        image_name,
        &grids,
        &options.layout,
        options.colormap,
        options.norm,
        options.reference,
    )?;
    let manifest_path = output_dir.join(format!("{scenario}_combined.json"));
    manifest.save(&manifest_path)?;

    let mut csv_paths = Vec::new();
    if options.export_csv {
        for grid in &grids {
            let path = output_dir.join(scale_file_name(scenario.name(), &grid.label, "csv"));
            let file = File::create(&path).map_err(|e| Error::io_with_path(e, &path))?;
            grid.write_csv(BufWriter::new(file))?;
            csv_paths.push(path);
        }
    }

    log::info!(
        "Wrote {} ({} panels) to {}",
        image_path.display(),
        grids.len(),
        output_dir.display()
    );

    Ok(PlotOutput {
        scenario,
        image_path,
        manifest_path,
        csv_paths,
    })
}
