//! Latest-snapshot selection
//!
//! Solver output directories hold one snapshot file per timestep, with the
//! timestep number embedded in the filename (`output_0042.vti`). The latest
//! snapshot is the file with the largest embedded number; ties are broken by
//! the lexicographically greatest filename so the result does not depend on
//! directory enumeration order.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{CompareError, Result};

/// Extract the sequence number embedded in a snapshot filename
///
/// Concatenates every decimal digit of the name in left-to-right order and
/// parses the concatenation as an integer: `"output_0007.vti"` yields `7`,
/// `"frame12b34.ext"` yields `1234`.
///
/// # Errors
///
/// Returns [`CompareError::MalformedFilename`] if the name contains no digit
/// at all (the empty concatenation is an error, not zero), or if the digits
/// overflow a `u64`.
pub fn sequence_number(filename: &str) -> Result<u64> {
    let digits: String = filename.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return Err(CompareError::malformed_filename(
            filename,
            "filename contains no digits",
        ));
    }
    digits.parse::<u64>().map_err(|_| {
        CompareError::malformed_filename(filename, "digit sequence overflows a 64-bit integer")
    })
}

/// Find the snapshot file with the maximal sequence number in a directory
///
/// Only regular files are considered; subdirectories are skipped. Returns
/// the full path of the selected file together with its sequence number.
/// Equal sequence numbers are resolved in favor of the lexicographically
/// greatest filename.
///
/// # Errors
///
/// Returns [`CompareError::NoSnapshotFound`] if the directory cannot be read
/// or contains no regular files, and [`CompareError::MalformedFilename`] if
/// any candidate filename contains no digits.
pub fn locate_latest(dir: &Path) -> Result<(PathBuf, u64)> {
    let entries = fs::read_dir(dir).map_err(|_| CompareError::NoSnapshotFound {
        dir: dir.to_path_buf(),
    })?;

    let mut best: Option<(u64, String)> = None;
    for entry in entries.flatten() {
        let is_file = entry.file_type().is_ok_and(|t| t.is_file());
        if !is_file {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        let number = sequence_number(&name)?;
        debug!(file = %name, number, "snapshot candidate");
        let candidate = (number, name);
        if best.as_ref().is_none_or(|b| candidate > *b) {
            best = Some(candidate);
        }
    }

    match best {
        Some((number, name)) => Ok((dir.join(name), number)),
        None => Err(CompareError::NoSnapshotFound {
            dir: dir.to_path_buf(),
        }),
    }
}
