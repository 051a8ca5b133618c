//! VTK XML ImageData (.vti) decoding
//!
//! Decodes the snapshot files written by the upstream solver into raw header
//! metadata and flat point-data arrays. Two data modes are handled, matching
//! what the solver's writer emits:
//!
//! - `format="ascii"`: whitespace-separated literals inside the DataArray
//!   element
//! - `format="binary"`: inline base64 of a little-endian byte-count header
//!   (UInt32 by default, UInt64 when the file declares
//!   `header_type="UInt64"`) followed by the raw little-endian values
//!
//! Appended data blocks, compressed arrays, and big-endian files are
//! rejected with a diagnostic rather than mis-read.

use std::fs;
use std::path::Path;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use crate::error::{CompareError, Result};

/// One named point-data array, in file order
#[derive(Debug, Clone)]
pub struct PointArray {
    /// Array name from the `Name` attribute (empty if absent)
    pub name: String,
    /// Components per point tuple
    pub components: usize,
    /// Flat values, point-major: the tuple of point `i` occupies
    /// `data[i * components .. (i + 1) * components]`
    pub data: Vec<f64>,
}

/// Raw decoded contents of one ImageData snapshot file
#[derive(Debug, Clone)]
pub struct RawSnapshot {
    /// Point counts along the three grid axes
    pub dimensions: [usize; 3],
    /// Physical spacing along the three grid axes
    pub spacing: [f64; 3],
    /// Point-data arrays in the order they appear in the file
    pub point_arrays: Vec<PointArray>,
}

/// Decode a .vti snapshot file
///
/// # Errors
///
/// Returns [`CompareError::UnreadableSnapshot`] if the file is missing, is
/// not valid VTK XML ImageData, or uses an unsupported encoding.
pub fn read_raw(path: &Path) -> Result<RawSnapshot> {
    let text =
        fs::read_to_string(path).map_err(|e| CompareError::unreadable(path, e.to_string()))?;
    parse(&text).map_err(|reason| CompareError::unreadable(path, reason))
}

fn parse(text: &str) -> std::result::Result<RawSnapshot, String> {
    let doc = roxmltree::Document::parse(text).map_err(|e| format!("invalid XML: {e}"))?;
    let root = doc.root_element();
    if !root.has_tag_name("VTKFile") {
        return Err("not a VTKFile document".to_string());
    }
    match root.attribute("type") {
        Some("ImageData") => {}
        Some(other) => return Err(format!("expected ImageData, found '{other}'")),
        None => return Err("VTKFile element has no type attribute".to_string()),
    }
    if let Some(order) = root.attribute("byte_order") {
        if order != "LittleEndian" {
            return Err(format!("unsupported byte order '{order}'"));
        }
    }
    if root.attribute("compressor").is_some() {
        return Err("compressed data arrays are not supported".to_string());
    }
    let header_wide = match root.attribute("header_type") {
        None | Some("UInt32") => false,
        Some("UInt64") => true,
        Some(other) => return Err(format!("unsupported header type '{other}'")),
    };

    let image = root
        .children()
        .find(|n| n.has_tag_name("ImageData"))
        .ok_or("missing <ImageData> element")?;
    let dimensions = parse_whole_extent(
        image
            .attribute("WholeExtent")
            .ok_or("missing WholeExtent attribute")?,
    )?;
    let spacing = parse_spacing(image.attribute("Spacing").ok_or("missing Spacing attribute")?)?;

    let piece = image
        .children()
        .find(|n| n.has_tag_name("Piece"))
        .ok_or("missing <Piece> element")?;
    let point_data = piece
        .children()
        .find(|n| n.has_tag_name("PointData"))
        .ok_or("missing <PointData> element")?;

    let mut point_arrays = Vec::new();
    for node in point_data
        .children()
        .filter(|n| n.has_tag_name("DataArray"))
    {
        point_arrays.push(parse_data_array(&node, header_wide)?);
    }

    Ok(RawSnapshot {
        dimensions,
        spacing,
        point_arrays,
    })
}

/// Point counts from a `WholeExtent="x0 x1 y0 y1 z0 z1"` attribute.
fn parse_whole_extent(attr: &str) -> std::result::Result<[usize; 3], String> {
    let bounds: Vec<i64> = attr
        .split_whitespace()
        .map(|tok| {
            tok.parse::<i64>()
                .map_err(|_| format!("invalid extent bound '{tok}'"))
        })
        .collect::<std::result::Result<_, _>>()?;
    if bounds.len() != 6 {
        return Err(format!(
            "WholeExtent must have 6 bounds, found {}",
            bounds.len()
        ));
    }
    let mut dims = [0usize; 3];
    for axis in 0..3 {
        let (lo, hi) = (bounds[2 * axis], bounds[2 * axis + 1]);
        if hi < lo {
            return Err(format!("WholeExtent axis {axis} is empty ({lo}..{hi})"));
        }
        dims[axis] = usize::try_from(hi - lo + 1).map_err(|_| "extent out of range".to_string())?;
    }
    Ok(dims)
}

fn parse_spacing(attr: &str) -> std::result::Result<[f64; 3], String> {
    let values: Vec<f64> = attr
        .split_whitespace()
        .map(|tok| {
            tok.parse::<f64>()
                .map_err(|_| format!("invalid spacing value '{tok}'"))
        })
        .collect::<std::result::Result<_, _>>()?;
    if values.len() != 3 {
        return Err(format!(
            "Spacing must have 3 components, found {}",
            values.len()
        ));
    }
    Ok([values[0], values[1], values[2]])
}

fn parse_data_array(
    node: &roxmltree::Node<'_, '_>,
    header_wide: bool,
) -> std::result::Result<PointArray, String> {
    let name = node.attribute("Name").unwrap_or("").to_string();
    let components = match node.attribute("NumberOfComponents") {
        None => 1,
        Some(s) => s
            .parse::<usize>()
            .map_err(|_| format!("invalid NumberOfComponents '{s}' on array '{name}'"))?,
    };
    if components == 0 {
        return Err(format!("array '{name}' declares zero components"));
    }
    let elem_type = node
        .attribute("type")
        .ok_or_else(|| format!("array '{name}' has no element type"))?;
    let format = node.attribute("format").unwrap_or("ascii");
    let body = node.text().unwrap_or("");

    let data = match format {
        "ascii" => parse_ascii_values(body)
            .map_err(|e| format!("array '{name}': {e}"))?,
        "binary" => parse_binary_values(body, elem_type, header_wide)
            .map_err(|e| format!("array '{name}': {e}"))?,
        other => {
            return Err(format!(
                "unsupported data format '{other}' on array '{name}' \
                 (only ascii and inline binary are handled)"
            ))
        }
    };

    Ok(PointArray {
        name,
        components,
        data,
    })
}

fn parse_ascii_values(body: &str) -> std::result::Result<Vec<f64>, String> {
    body.split_whitespace()
        .map(|tok| {
            tok.parse::<f64>()
                .map_err(|_| format!("invalid ascii value '{tok}'"))
        })
        .collect()
}

/// Bytes per element for the supported VTK element types.
fn element_size(elem_type: &str) -> Option<usize> {
    match elem_type {
        "Float64" => Some(8),
        "Float32" | "Int32" => Some(4),
        _ => None,
    }
}

fn parse_binary_values(
    body: &str,
    elem_type: &str,
    header_wide: bool,
) -> std::result::Result<Vec<f64>, String> {
    let size =
        element_size(elem_type).ok_or_else(|| format!("unsupported element type '{elem_type}'"))?;

    let cleaned: String = body.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = BASE64
        .decode(cleaned.as_bytes())
        .map_err(|e| format!("invalid base64 payload: {e}"))?;

    let header_len = if header_wide { 8 } else { 4 };
    if bytes.len() < header_len {
        return Err("binary payload shorter than its length header".to_string());
    }
    let declared = if header_wide {
        let mut b = [0u8; 8];
        b.copy_from_slice(&bytes[..8]);
        usize::try_from(u64::from_le_bytes(b)).map_err(|_| "length header out of range".to_string())?
    } else {
        let mut b = [0u8; 4];
        b.copy_from_slice(&bytes[..4]);
        u32::from_le_bytes(b) as usize
    };
    let payload = &bytes[header_len..];
    if payload.len() < declared {
        return Err(format!(
            "binary payload truncated: header declares {declared} bytes, found {}",
            payload.len()
        ));
    }
    if declared % size != 0 {
        return Err(format!(
            "binary payload length {declared} is not a multiple of the element size {size}"
        ));
    }
    let payload = &payload[..declared];

    let mut values = Vec::with_capacity(declared / size);
    match elem_type {
        "Float64" => {
            for chunk in payload.chunks_exact(8) {
                let mut b = [0u8; 8];
                b.copy_from_slice(chunk);
                values.push(f64::from_le_bytes(b));
            }
        }
        "Float32" => {
            for chunk in payload.chunks_exact(4) {
                let mut b = [0u8; 4];
                b.copy_from_slice(chunk);
                values.push(f64::from(f32::from_le_bytes(b)));
            }
        }
        "Int32" => {
            for chunk in payload.chunks_exact(4) {
                let mut b = [0u8; 4];
                b.copy_from_slice(chunk);
                values.push(f64::from(i32::from_le_bytes(b)));
            }
        }
        _ => unreachable!("element type checked above"),
    }
    Ok(values)
}
