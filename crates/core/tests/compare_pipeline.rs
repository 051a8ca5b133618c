//! End-to-end pipeline tests over generated snapshot directories
//!
//! Builds two temporary output directories of ascii .vti snapshots the way
//! the solver writes them, then drives the public locate/read/difference
//! pipeline.

use std::fs;
use std::path::{Path, PathBuf};

use approx::assert_relative_eq;
use gridviz_core::{
    compare_latest, difference, locate_latest, view_latest, CompareConfig, CompareError,
    FieldName, FieldSet,
};

/// Write one ascii .vti snapshot; the packed tuple of each point is
/// generated from the point coordinates.
fn write_vti(
    dir: &Path,
    name: &str,
    nx: usize,
    ny: usize,
    spacing: (f64, f64),
    tuple: impl Fn(usize, usize) -> (f64, f64, f64),
) -> PathBuf {
    let mut body = String::new();
    for iy in 0..ny {
        for ix in 0..nx {
            let (u, v, p) = tuple(ix, iy);
            body.push_str(&format!("{u} {v} {p} "));
        }
    }
    let contents = format!(
        r#"<?xml version="1.0"?>
<VTKFile type="ImageData" version="0.1" byte_order="LittleEndian">
  <ImageData WholeExtent="0 {} 0 {} 0 0" Origin="0 0 0" Spacing="{} {} 1">
    <Piece Extent="0 {} 0 {} 0 0">
      <PointData>
        <DataArray type="Float64" Name="velocity" NumberOfComponents="3" format="ascii">
          {body}
        </DataArray>
      </PointData>
    </Piece>
  </ImageData>
</VTKFile>
"#,
        nx - 1,
        ny - 1,
        spacing.0,
        spacing.1,
        nx - 1,
        ny - 1
    );
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

/// Fill a directory with snapshots numbered 1..=count whose field values
/// depend on the snapshot number, so selecting the wrong file is visible.
fn write_series(dir: &Path, count: u64, nx: usize, ny: usize) {
    for n in 1..=count {
        let step = n as f64;
        write_vti(
            dir,
            &format!("output_{n:04}.vti"),
            nx,
            ny,
            (0.1, 0.1),
            move |ix, iy| {
                (
                    step + ix as f64,
                    2.0 * step + iy as f64,
                    step * 10.0 + (ix * iy) as f64,
                )
            },
        );
    }
}

#[test]
fn test_end_to_end_difference_of_latest_snapshots() {
    let reference = tempfile::tempdir().unwrap();
    let current = tempfile::tempdir().unwrap();
    write_series(reference.path(), 3, 10, 10);
    write_series(current.path(), 5, 10, 10);

    let config = CompareConfig {
        reference_dir: reference.path().to_path_buf(),
        current_dir: current.path().to_path_buf(),
        field: FieldName::V,
    };
    let plot = compare_latest(&config).unwrap();

    // Latest snapshots are 3 and 5; v differs by 2 * (5 - 3) at every point
    assert_eq!(plot.field.shape(), (10, 10));
    for &value in plot.field.as_slice() {
        assert!(value >= 0.0);
        assert_relative_eq!(value, 4.0);
    }

    // The pipeline result matches differencing the two latest files by hand
    let (reference_path, reference_number) = locate_latest(reference.path()).unwrap();
    let (current_path, current_number) = locate_latest(current.path()).unwrap();
    assert_eq!(reference_number, 3);
    assert_eq!(current_number, 5);
    let by_hand = difference(
        &FieldSet::read(&reference_path).unwrap(),
        &FieldSet::read(&current_path).unwrap(),
        FieldName::V,
    )
    .unwrap();
    assert_eq!(by_hand.field, plot.field);
}

#[test]
fn test_end_to_end_mismatched_grids_abort() {
    let reference = tempfile::tempdir().unwrap();
    let current = tempfile::tempdir().unwrap();
    write_series(reference.path(), 2, 10, 10);
    write_series(current.path(), 2, 8, 8);

    let config = CompareConfig {
        reference_dir: reference.path().to_path_buf(),
        current_dir: current.path().to_path_buf(),
        field: FieldName::P,
    };
    let err = compare_latest(&config).unwrap_err();
    assert_eq!(err, CompareError::shape_mismatch((10, 10), (8, 8)));
}

#[test]
fn test_end_to_end_empty_current_directory_aborts() {
    let reference = tempfile::tempdir().unwrap();
    let current = tempfile::tempdir().unwrap();
    write_series(reference.path(), 2, 4, 4);

    let config = CompareConfig {
        reference_dir: reference.path().to_path_buf(),
        current_dir: current.path().to_path_buf(),
        field: FieldName::U,
    };
    let err = compare_latest(&config).unwrap_err();
    match err {
        CompareError::NoSnapshotFound { dir } => assert_eq!(dir, current.path()),
        other => panic!("expected NoSnapshotFound, got {other}"),
    }
}

#[test]
fn test_view_latest_projects_the_newest_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    write_series(dir.path(), 4, 6, 3);

    let plot = view_latest(dir.path(), FieldName::U).unwrap();
    assert_eq!(plot.field.shape(), (3, 6));
    assert_relative_eq!(plot.spacing.x, 0.1);
    // u = step + ix with latest step 4: bottom-left point reads 4
    assert_relative_eq!(plot.field.get(0, 0), 4.0);
    assert_relative_eq!(plot.field.get(0, 5), 9.0);
}
