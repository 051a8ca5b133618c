//! Heat-map rendering
//!
//! Draws a `PlotField` as a colored-cell heat map with a labeled color scale
//! bar. The drawing extents honor the physical grid spacing, so non-square
//! cells render with their true aspect ratio. The chart's cartesian y axis
//! grows upward, which places array row 0 at the bottom edge: the grid
//! origin is bottom-left, matching the solver's physical coordinates rather
//! than image conventions.

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::debug;

use crate::colormap::Colormap;
use crate::compare::PlotField;
use crate::error::{CompareError, Result};
use crate::snapshot::Spacing;

/// Pixels reserved for the color scale bar and its labels
const COLORBAR_WIDTH: u32 = 100;
/// Vertical resolution of the color scale gradient
const COLORBAR_STEPS: usize = 128;

/// Options controlling heat-map appearance
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Chart title
    pub title: String,
    /// Label next to the color scale bar
    pub value_label: String,
    /// Colormap for the cells and the scale bar
    pub colormap: Colormap,
}

impl RenderOptions {
    /// Options with the default colormap
    #[must_use]
    pub fn new(title: impl Into<String>, value_label: impl Into<String>) -> Self {
        RenderOptions {
            title: title.into(),
            value_label: value_label.into(),
            colormap: Colormap::default(),
        }
    }

    /// Replace the colormap
    #[must_use]
    pub fn with_colormap(mut self, colormap: Colormap) -> Self {
        self.colormap = colormap;
        self
    }
}

/// Per-axis extent scale factors derived from the grid spacing
///
/// If `dx > dy` the horizontal extent is stretched by `dx / dy`; otherwise
/// (the equal case included) the vertical extent is stretched by `dy / dx`.
#[must_use]
pub fn scale_factors(spacing: Spacing) -> (f64, f64) {
    let (dx, dy) = (spacing.x, spacing.y);
    if dx > dy {
        (dx / dy, 1.0)
    } else {
        (1.0, dy / dx)
    }
}

/// Physical drawing extents for a field of shape `(rows, cols)`
///
/// The horizontal extent spans the column axis, the vertical extent the row
/// axis.
#[must_use]
pub fn extents(shape: (usize, usize), spacing: Spacing) -> (f64, f64) {
    let (sx, sy) = scale_factors(spacing);
    let (rows, cols) = shape;
    (cols as f64 * sx, rows as f64 * sy)
}

/// Draw a heat map with a color scale bar onto a drawing area
///
/// # Errors
///
/// Returns [`CompareError::RenderFailed`] if the drawing backend reports an
/// error.
pub fn render_heatmap<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    plot: &PlotField,
    options: &RenderOptions,
) -> Result<()> {
    area.fill(&WHITE)
        .map_err(|e| CompareError::render(e.to_string()))?;

    let (rows, cols) = plot.field.shape();
    let (sx, sy) = scale_factors(plot.spacing);
    let (width_extent, height_extent) = extents(plot.field.shape(), plot.spacing);
    let (lo, hi) = plot.field.min_max();
    // Keep a nonzero value span so constant fields still chart
    let span = if (hi - lo).abs() < f64::EPSILON {
        1.0
    } else {
        hi - lo
    };

    let (total_width, _) = area.dim_in_pixel();
    let (map_area, bar_area) =
        area.split_horizontally(total_width.saturating_sub(COLORBAR_WIDTH) as i32);

    let mut chart = ChartBuilder::on(&map_area)
        .margin(10)
        .caption(options.title.as_str(), ("sans-serif", 22))
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0.0..width_extent, 0.0..height_extent)
        .map_err(|e| CompareError::render(e.to_string()))?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_desc("x direction")
        .axis_desc_style(("sans-serif", 15))
        .draw()
        .map_err(|e| CompareError::render(e.to_string()))?;

    let field = &plot.field;
    let cmap = options.colormap;
    chart
        .draw_series(
            (0..rows)
                .flat_map(|row| (0..cols).map(move |col| (row, col)))
                .map(|(row, col)| {
                    let t = (field.get(row, col) - lo) / span;
                    Rectangle::new(
                        [
                            (col as f64 * sx, row as f64 * sy),
                            ((col + 1) as f64 * sx, (row + 1) as f64 * sy),
                        ],
                        cmap.sample(t).filled(),
                    )
                }),
        )
        .map_err(|e| CompareError::render(e.to_string()))?;

    let mut bar = ChartBuilder::on(&bar_area)
        .margin(10)
        .set_label_area_size(LabelAreaPosition::Right, 55)
        .build_cartesian_2d(0.0..1.0, lo..(lo + span))
        .map_err(|e| CompareError::render(e.to_string()))?;
    bar.configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_labels(0)
        .y_labels(5)
        .y_desc(options.value_label.as_str())
        .axis_desc_style(("sans-serif", 15))
        .draw()
        .map_err(|e| CompareError::render(e.to_string()))?;
    bar.draw_series((0..COLORBAR_STEPS).map(|step| {
        let t0 = step as f64 / COLORBAR_STEPS as f64;
        let t1 = (step + 1) as f64 / COLORBAR_STEPS as f64;
        Rectangle::new(
            [(0.0, lo + t0 * span), (1.0, lo + t1 * span)],
            cmap.sample((t0 + t1) / 2.0).filled(),
        )
    }))
    .map_err(|e| CompareError::render(e.to_string()))?;

    area.present()
        .map_err(|e| CompareError::render(e.to_string()))?;
    Ok(())
}

/// Render a heat map to a PNG file
///
/// The image height follows the physical extents so the pixel aspect ratio
/// tracks the grid's aspect ratio; `width` is the total image width in
/// pixels including the color scale bar.
///
/// # Errors
///
/// Returns [`CompareError::RenderFailed`] if the image cannot be drawn or
/// written.
pub fn render_png(
    path: &Path,
    plot: &PlotField,
    options: &RenderOptions,
    width: u32,
) -> Result<()> {
    let (width_extent, height_extent) = extents(plot.field.shape(), plot.spacing);
    let total_width = width.max(320);
    let map_width = f64::from(total_width - COLORBAR_WIDTH);
    let height = ((map_width * height_extent / width_extent).round() as u32 + 80)
        .clamp(160, 4096);

    let area = BitMapBackend::new(path, (total_width, height)).into_drawing_area();
    render_heatmap(&area, plot, options)?;
    debug!(
        path = %path.display(),
        width = total_width,
        height,
        "wrote heat map"
    );
    Ok(())
}
