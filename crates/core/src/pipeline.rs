//! Comparison pipeline and configuration
//!
//! The pipeline is a single linear pass: locate the latest snapshot in each
//! directory, load both, difference the selected field. Any failure aborts
//! the run before an image is produced.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::compare::{difference, PlotField};
use crate::error::Result;
use crate::locate::locate_latest;
use crate::snapshot::{FieldName, FieldSet};

/// Configuration for one comparison run
///
/// Passed explicitly into the pipeline entry point; also loadable from a
/// JSON file by the command-line frontend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompareConfig {
    /// Directory holding the reference solution's snapshots
    pub reference_dir: PathBuf,
    /// Directory holding the current solution's snapshots
    pub current_dir: PathBuf,
    /// Field to compare
    pub field: FieldName,
}

/// Compare the latest snapshots of the reference and current directories
///
/// # Errors
///
/// Propagates the first failure of any stage: locating a snapshot in either
/// directory, loading either file, or differencing the selected field.
pub fn compare_latest(config: &CompareConfig) -> Result<PlotField> {
    let (reference_path, reference_number) = locate_latest(&config.reference_dir)?;
    let (current_path, current_number) = locate_latest(&config.current_dir)?;
    info!(
        reference = %reference_path.display(),
        current = %current_path.display(),
        field = %config.field,
        "comparing snapshot {reference_number} against {current_number}"
    );
    let reference = FieldSet::read(&reference_path)?;
    let current = FieldSet::read(&current_path)?;
    difference(&reference, &current, config.field)
}

/// Render-ready projection of the latest snapshot in a single directory
///
/// # Errors
///
/// Propagates failures from locating or loading the snapshot.
pub fn view_latest(dir: &Path, field: FieldName) -> Result<PlotField> {
    let (path, number) = locate_latest(dir)?;
    info!(snapshot = %path.display(), field = %field, "viewing snapshot {number}");
    let set = FieldSet::read(&path)?;
    Ok(PlotField::from_set(&set, field))
}
