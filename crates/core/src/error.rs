//! Error types for the snapshot comparison pipeline
//!
//! Every failure in the pipeline is fatal: the run is a single linear pass
//! (locate, read, compare, render) and any error aborts it before an image is
//! produced. Each variant carries enough context to identify the failing
//! stage and its input.

use std::fmt;
use std::path::PathBuf;

/// Result type alias for comparison operations
pub type Result<T> = std::result::Result<T, CompareError>;

/// Errors that can occur while locating, loading, comparing, or rendering
/// snapshots
#[derive(Debug, Clone, PartialEq)]
pub enum CompareError {
    /// Snapshot directory is empty, unreadable, or contains no regular files
    NoSnapshotFound {
        /// Directory that was scanned
        dir: PathBuf,
    },
    /// A snapshot filename contains no digits, so no sequence number can be
    /// extracted from it
    MalformedFilename {
        /// Offending filename
        name: String,
        /// Why extraction failed
        reason: String,
    },
    /// Snapshot file is missing, unparseable, or structurally inconsistent
    UnreadableSnapshot {
        /// Path of the snapshot file
        path: PathBuf,
        /// What went wrong while decoding it
        reason: String,
    },
    /// Two fields that must share a grid have different shapes
    ShapeMismatch {
        /// Shape of the first operand (rows, cols)
        expected: (usize, usize),
        /// Shape of the second operand (rows, cols)
        actual: (usize, usize),
    },
    /// Field selector is not one of the known field names
    UnknownField {
        /// The selector that failed to parse
        name: String,
    },
    /// The drawing backend failed while producing the heat map
    RenderFailed {
        /// Backend error description
        reason: String,
    },
}

impl CompareError {
    /// Error for a snapshot file that cannot be read or decoded.
    pub fn unreadable(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        CompareError::UnreadableSnapshot {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Error for a filename that yields no sequence number.
    pub fn malformed_filename(name: impl Into<String>, reason: impl Into<String>) -> Self {
        CompareError::MalformedFilename {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Error for two grids or fields whose shapes differ.
    pub fn shape_mismatch(expected: (usize, usize), actual: (usize, usize)) -> Self {
        CompareError::ShapeMismatch { expected, actual }
    }

    /// Error for a failure in the drawing backend.
    pub fn render(reason: impl Into<String>) -> Self {
        CompareError::RenderFailed {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for CompareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompareError::NoSnapshotFound { dir } => {
                write!(f, "no snapshot files found in '{}'", dir.display())
            }
            CompareError::MalformedFilename { name, reason } => {
                write!(f, "cannot extract a sequence number from '{name}': {reason}")
            }
            CompareError::UnreadableSnapshot { path, reason } => {
                write!(f, "cannot read snapshot '{}': {reason}", path.display())
            }
            CompareError::ShapeMismatch { expected, actual } => {
                write!(
                    f,
                    "field shapes do not match: ({}, {}) vs ({}, {})",
                    expected.0, expected.1, actual.0, actual.1
                )
            }
            CompareError::UnknownField { name } => {
                write!(f, "unknown field '{name}' (expected one of: u, v, p, abs_vel)")
            }
            CompareError::RenderFailed { reason } => {
                write!(f, "failed to render heat map: {reason}")
            }
        }
    }
}

impl std::error::Error for CompareError {}
