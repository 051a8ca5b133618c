//! Derived field computation
//!
//! Fields computed from other fields rather than read from a snapshot.
//! Currently the only derived quantity is the velocity magnitude, computed
//! eagerly when a snapshot is loaded.

use rayon::prelude::*;

use crate::error::{CompareError, Result};
use crate::field::ScalarField;

/// Elementwise Euclidean norm of two velocity components
///
/// Returns a field of the same shape where every element is
/// `sqrt(u[i][j]^2 + v[i][j]^2)`. Uses `f64::hypot` per element, which stays
/// accurate when one component dwarfs the other.
///
/// # Errors
///
/// Returns [`CompareError::ShapeMismatch`] if `u` and `v` have different
/// shapes.
pub fn velocity_magnitude(u: &ScalarField, v: &ScalarField) -> Result<ScalarField> {
    if u.shape() != v.shape() {
        return Err(CompareError::shape_mismatch(u.shape(), v.shape()));
    }
    let data: Vec<f64> = u
        .as_slice()
        .par_iter()
        .zip(v.as_slice().par_iter())
        .map(|(&a, &b)| a.hypot(b))
        .collect();
    let (rows, cols) = u.shape();
    Ok(ScalarField::from_vec(rows, cols, data))
}
