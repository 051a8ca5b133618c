//! Structured-grid snapshot comparison
//!
//! Compares two time-series outputs of a structured-grid flow solver for
//! regression and convergence checking: locate the most recent snapshot in a
//! reference and a current output directory, load the velocity and pressure
//! fields from each, difference a selected field pointwise, and render the
//! difference as an aspect-ratio-correct heat map.
//!
//! The pipeline is linear and every error is fatal to the run:
//!
//! 1. [`locate_latest`] picks the snapshot with the largest filename-embedded
//!    sequence number in each directory
//! 2. [`FieldSet::read`] decodes each snapshot into shape-consistent arrays
//!    (`u`, `v`, `p`, and the derived `abs_vel`)
//! 3. [`difference`] produces the pointwise absolute difference of one field
//! 4. [`render_png`] draws it as a heat map with a color scale bar

pub mod colormap;
pub mod compare;
pub mod derived;
pub mod error;
pub mod field;
pub mod locate;
pub mod pipeline;
pub mod render;
pub mod snapshot;
pub mod vti;

// Re-export the pipeline surface
pub use colormap::Colormap;
pub use compare::{difference, PlotField};
pub use derived::velocity_magnitude;
pub use error::{CompareError, Result};
pub use field::ScalarField;
pub use locate::{locate_latest, sequence_number};
pub use pipeline::{compare_latest, view_latest, CompareConfig};
pub use render::{extents, render_heatmap, render_png, scale_factors, RenderOptions};
pub use snapshot::{FieldName, FieldSet, Spacing};
