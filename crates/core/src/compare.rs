//! Pointwise field comparison
//!
//! The comparison step produces a `PlotField`: a single scalar array paired
//! with the grid spacing the renderer needs. Both the two-snapshot absolute
//! difference and the single-snapshot projection produce this shape, so the
//! renderer does not care which one it is drawing.

use rayon::prelude::*;

use crate::error::{CompareError, Result};
use crate::field::ScalarField;
use crate::snapshot::{FieldName, FieldSet, Spacing};

/// A scalar field ready for rendering, with the spacing used for extents
#[derive(Debug, Clone)]
pub struct PlotField {
    /// The values to draw
    pub field: ScalarField,
    /// Grid spacing (dx, dy) governing the physical aspect ratio
    pub spacing: Spacing,
}

impl PlotField {
    /// Project a single snapshot's named field, keeping its own spacing
    #[must_use]
    pub fn from_set(set: &FieldSet, name: FieldName) -> Self {
        PlotField {
            field: set.field(name).clone(),
            spacing: set.spacing,
        }
    }
}

/// Pointwise absolute difference of a named field between two snapshots
///
/// The two snapshots must come from runs on identical grids; the result is
/// `abs(reference - current)` elementwise, paired with the *current*
/// snapshot's spacing. Differences are never broadcast or truncated.
///
/// # Errors
///
/// Returns [`CompareError::ShapeMismatch`] if the named field has different
/// shapes in the two sets.
pub fn difference(reference: &FieldSet, current: &FieldSet, name: FieldName) -> Result<PlotField> {
    let a = reference.field(name);
    let b = current.field(name);
    if a.shape() != b.shape() {
        return Err(CompareError::shape_mismatch(a.shape(), b.shape()));
    }
    let data: Vec<f64> = a
        .as_slice()
        .par_iter()
        .zip(b.as_slice().par_iter())
        .map(|(&x, &y)| (x - y).abs())
        .collect();
    let (rows, cols) = a.shape();
    Ok(PlotField {
        field: ScalarField::from_vec(rows, cols, data),
        spacing: current.spacing,
    })
}
