//! Snapshot field model
//!
//! A `FieldSet` is the typed, shape-consistent in-memory form of one solver
//! snapshot: the grid header (point counts and spacing) plus the velocity
//! components, pressure, and the derived velocity magnitude, each as a 2D
//! array of shape `(ny, nx)`. A set is built once per load and never mutated
//! afterwards.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::derived::velocity_magnitude;
use crate::error::{CompareError, Result};
use crate::field::ScalarField;
use crate::vti;

/// Physical spacing between adjacent grid points along (x, y)
pub type Spacing = Vector2<f64>;

/// Selector for the comparable fields of a snapshot
///
/// The selector set is closed: `u`, `v`, `p`, and the derived `abs_vel`.
/// Anything else fails to parse, so an invalid field name is caught before
/// any snapshot is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldName {
    /// Velocity x-component
    U,
    /// Velocity y-component
    V,
    /// Pressure
    P,
    /// Velocity magnitude, derived at load time
    AbsVel,
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldName::U => "u",
            FieldName::V => "v",
            FieldName::P => "p",
            FieldName::AbsVel => "abs_vel",
        };
        write!(f, "{name}")
    }
}

impl FromStr for FieldName {
    type Err = CompareError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "u" => Ok(FieldName::U),
            "v" => Ok(FieldName::V),
            "p" => Ok(FieldName::P),
            "abs_vel" => Ok(FieldName::AbsVel),
            _ => Err(CompareError::UnknownField {
                name: s.to_string(),
            }),
        }
    }
}

/// Parsed, shape-consistent fields of one snapshot
///
/// All four arrays share the shape `(ny, nx)`: the row index is the second
/// grid axis because the snapshot's point list is ordered x-fastest.
#[derive(Debug, Clone)]
pub struct FieldSet {
    /// Grid point counts (nx, ny), both at least 1
    pub dimensions: (usize, usize),
    /// Grid spacing (dx, dy), both positive
    pub spacing: Spacing,
    u: ScalarField,
    v: ScalarField,
    p: ScalarField,
    abs_vel: ScalarField,
}

impl FieldSet {
    /// Load a snapshot file into a field set
    ///
    /// The first point-data array with at least 3 components is taken as the
    /// solver's packed vector: channel 0 is velocity-x, channel 1 is
    /// velocity-y, channel 2 is pressure. This channel layout is the
    /// upstream solver's output convention and must be preserved exactly.
    /// Any other arrays in the file (scalar pressure, obstacle masks) are
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CompareError::UnreadableSnapshot`] if the file cannot be
    /// decoded or its contents are structurally inconsistent with the
    /// header.
    pub fn read(path: &Path) -> Result<Self> {
        let raw = vti::read_raw(path)?;
        Self::from_raw(path, raw)
    }

    fn from_raw(path: &Path, mut raw: vti::RawSnapshot) -> Result<Self> {
        let [nx, ny, nz] = raw.dimensions;
        if nx < 1 || ny < 1 {
            return Err(CompareError::unreadable(
                path,
                format!("grid has no points ({nx} x {ny})"),
            ));
        }
        if nz != 1 {
            return Err(CompareError::unreadable(
                path,
                format!("expected a single x-y plane, found {nz} planes"),
            ));
        }
        let (dx, dy) = (raw.spacing[0], raw.spacing[1]);
        let spacing_positive = dx > 0.0 && dy > 0.0;
        if !spacing_positive {
            return Err(CompareError::unreadable(
                path,
                format!("non-positive grid spacing ({dx}, {dy})"),
            ));
        }

        let index = raw
            .point_arrays
            .iter()
            .position(|a| a.components >= 3)
            .ok_or_else(|| {
                CompareError::unreadable(
                    path,
                    "no point-data array with at least 3 components",
                )
            })?;
        let array = raw.point_arrays.swap_remove(index);

        let npoints = nx * ny;
        let expected = npoints * array.components;
        if array.data.len() != expected {
            return Err(CompareError::unreadable(
                path,
                format!(
                    "point-data array '{}' holds {} values, grid needs {expected}",
                    array.name,
                    array.data.len()
                ),
            ));
        }
        debug!(
            array = %array.name,
            nx, ny, dx, dy,
            "decoded snapshot point data"
        );

        // De-interleave the packed tuples; x-fastest point order makes the
        // flat channel buffers row-major for shape (ny, nx) directly.
        let comps = array.components;
        let mut u = Vec::with_capacity(npoints);
        let mut v = Vec::with_capacity(npoints);
        let mut p = Vec::with_capacity(npoints);
        for i in 0..npoints {
            let base = i * comps;
            u.push(array.data[base]);
            v.push(array.data[base + 1]);
            p.push(array.data[base + 2]);
        }
        let u = ScalarField::from_vec(ny, nx, u);
        let v = ScalarField::from_vec(ny, nx, v);
        let p = ScalarField::from_vec(ny, nx, p);
        let abs_vel = velocity_magnitude(&u, &v)?;

        Ok(FieldSet {
            dimensions: (nx, ny),
            spacing: Spacing::new(dx, dy),
            u,
            v,
            p,
            abs_vel,
        })
    }

    /// Access a field by name; total over the closed selector set
    #[must_use]
    pub fn field(&self, name: FieldName) -> &ScalarField {
        match name {
            FieldName::U => &self.u,
            FieldName::V => &self.v,
            FieldName::P => &self.p,
            FieldName::AbsVel => &self.abs_vel,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::fs;
    use std::path::PathBuf;

    fn field_names() -> [FieldName; 4] {
        [FieldName::U, FieldName::V, FieldName::P, FieldName::AbsVel]
    }

    /// Write an ascii .vti snapshot whose packed tuples are generated per
    /// point from `(ix, iy)`.
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
        <DataArray type="Float64" Name="mask" format="ascii">
          {}
        </DataArray>
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
            ny - 1,
            vec!["1"; nx * ny].join(" ")
        );
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_field_name_round_trip() {
        for name in field_names() {
            assert_eq!(name.to_string().parse::<FieldName>().unwrap(), name);
        }
    }

    #[test]
    fn test_field_name_rejects_unknown() {
        let err = "vorticity".parse::<FieldName>().unwrap_err();
        assert_eq!(
            err,
            CompareError::UnknownField {
                name: "vorticity".to_string()
            }
        );
    }

    #[test]
    fn test_read_reshapes_transposed() {
        let dir = tempfile::tempdir().unwrap();
        // u encodes the point coordinates so the reshape is observable
        let path = write_vti(dir.path(), "output_0001.vti", 3, 2, (0.5, 0.25), |ix, iy| {
            (ix as f64 * 10.0 + iy as f64, 0.0, 1.0)
        });
        let set = FieldSet::read(&path).unwrap();

        assert_eq!(set.dimensions, (3, 2));
        assert_relative_eq!(set.spacing.x, 0.5);
        assert_relative_eq!(set.spacing.y, 0.25);
        for name in field_names() {
            assert_eq!(set.field(name).shape(), (2, 3));
        }
        // Row index is the second grid axis: value at (row=iy, col=ix)
        assert_relative_eq!(set.field(FieldName::U).get(0, 2), 20.0);
        assert_relative_eq!(set.field(FieldName::U).get(1, 1), 11.0);
    }

    #[test]
    fn test_read_skips_scalar_arrays_for_vector_contract() {
        let dir = tempfile::tempdir().unwrap();
        // The 1-component "mask" array comes first in the file; the packed
        // 3-component array must still be the one that is split.
        let path = write_vti(dir.path(), "output_0001.vti", 2, 2, (1.0, 1.0), |_, _| {
            (3.0, 4.0, 7.0)
        });
        let set = FieldSet::read(&path).unwrap();
        assert_relative_eq!(set.field(FieldName::U).get(0, 0), 3.0);
        assert_relative_eq!(set.field(FieldName::V).get(0, 0), 4.0);
        assert_relative_eq!(set.field(FieldName::P).get(0, 0), 7.0);
        assert_relative_eq!(set.field(FieldName::AbsVel).get(1, 1), 5.0);
    }

    #[test]
    fn test_read_rejects_missing_vector_array() {
        let dir = tempfile::tempdir().unwrap();
        let contents = r#"<?xml version="1.0"?>
<VTKFile type="ImageData" byte_order="LittleEndian">
  <ImageData WholeExtent="0 1 0 1 0 0" Spacing="1 1 1">
    <Piece Extent="0 1 0 1 0 0">
      <PointData>
        <DataArray type="Float64" Name="pressure" format="ascii">1 2 3 4</DataArray>
      </PointData>
    </Piece>
  </ImageData>
</VTKFile>
"#;
        let path = dir.path().join("output_0001.vti");
        fs::write(&path, contents).unwrap();
        let err = FieldSet::read(&path).unwrap_err();
        assert!(matches!(err, CompareError::UnreadableSnapshot { .. }));
        assert!(err.to_string().contains("at least 3 components"));
    }

    #[test]
    fn test_read_rejects_short_point_data() {
        let dir = tempfile::tempdir().unwrap();
        let contents = r#"<?xml version="1.0"?>
<VTKFile type="ImageData" byte_order="LittleEndian">
  <ImageData WholeExtent="0 2 0 1 0 0" Spacing="1 1 1">
    <Piece Extent="0 2 0 1 0 0">
      <PointData>
        <DataArray type="Float64" Name="velocity" NumberOfComponents="3" format="ascii">
          1 0 0  2 0 0
        </DataArray>
      </PointData>
    </Piece>
  </ImageData>
</VTKFile>
"#;
        let path = dir.path().join("output_0001.vti");
        fs::write(&path, contents).unwrap();
        let err = FieldSet::read(&path).unwrap_err();
        assert!(err.to_string().contains("grid needs 18"));
    }

    #[test]
    fn test_read_rejects_non_positive_spacing() {
        let dir = tempfile::tempdir().unwrap();
        let contents = r#"<?xml version="1.0"?>
<VTKFile type="ImageData" byte_order="LittleEndian">
  <ImageData WholeExtent="0 1 0 1 0 0" Spacing="0 1 1">
    <Piece Extent="0 1 0 1 0 0">
      <PointData>
        <DataArray type="Float64" Name="velocity" NumberOfComponents="3" format="ascii">
          1 0 0  2 0 0  3 0 0  4 0 0
        </DataArray>
      </PointData>
    </Piece>
  </ImageData>
</VTKFile>
"#;
        let path = dir.path().join("output_0001.vti");
        fs::write(&path, contents).unwrap();
        let err = FieldSet::read(&path).unwrap_err();
        assert!(err.to_string().contains("spacing"));
    }

    #[test]
    fn test_read_rejects_multiple_planes() {
        let dir = tempfile::tempdir().unwrap();
        let contents = r#"<?xml version="1.0"?>
<VTKFile type="ImageData" byte_order="LittleEndian">
  <ImageData WholeExtent="0 1 0 1 0 1" Spacing="1 1 1">
    <Piece Extent="0 1 0 1 0 1">
      <PointData>
        <DataArray type="Float64" Name="velocity" NumberOfComponents="3" format="ascii">
          1 0 0  2 0 0  3 0 0  4 0 0  5 0 0  6 0 0  7 0 0  8 0 0
        </DataArray>
      </PointData>
    </Piece>
  </ImageData>
</VTKFile>
"#;
        let path = dir.path().join("output_0001.vti");
        fs::write(&path, contents).unwrap();
        let err = FieldSet::read(&path).unwrap_err();
        assert!(err.to_string().contains("plane"));
    }
}
