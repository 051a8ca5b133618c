//! Colormaps for heat-map rendering
//!
//! Maps a normalized value in [0, 1] to an RGB color. Viridis (the solver
//! community's default) is sampled from its standard control points with
//! linear interpolation; grayscale is the identity ramp.

use std::fmt;
use std::str::FromStr;

use plotters::style::RGBColor;

/// Named colormap selectable by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Colormap {
    /// Perceptually uniform blue-green-yellow map
    #[default]
    Viridis,
    /// Linear black-to-white ramp
    Grayscale,
}

/// Evenly spaced viridis control points from t = 0 to t = 1.
const VIRIDIS: [(u8, u8, u8); 9] = [
    (68, 1, 84),
    (70, 50, 126),
    (59, 82, 139),
    (44, 114, 142),
    (33, 145, 140),
    (39, 173, 129),
    (94, 201, 98),
    (170, 220, 50),
    (253, 231, 37),
];

fn lerp_channel(a: u8, b: u8, frac: f64) -> u8 {
    (f64::from(a) + frac * (f64::from(b) - f64::from(a))).round() as u8
}

impl Colormap {
    /// Color for a normalized value; `t` is clamped to [0, 1]
    #[must_use]
    pub fn sample(self, t: f64) -> RGBColor {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        match self {
            Colormap::Viridis => {
                let pos = t * (VIRIDIS.len() - 1) as f64;
                let i = pos.floor() as usize;
                if i + 1 >= VIRIDIS.len() {
                    let (r, g, b) = VIRIDIS[VIRIDIS.len() - 1];
                    return RGBColor(r, g, b);
                }
                let frac = pos - pos.floor();
                let lo = VIRIDIS[i];
                let hi = VIRIDIS[i + 1];
                RGBColor(
                    lerp_channel(lo.0, hi.0, frac),
                    lerp_channel(lo.1, hi.1, frac),
                    lerp_channel(lo.2, hi.2, frac),
                )
            }
            Colormap::Grayscale => {
                let level = (t * 255.0).round() as u8;
                RGBColor(level, level, level)
            }
        }
    }
}

impl fmt::Display for Colormap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Colormap::Viridis => "viridis",
            Colormap::Grayscale => "grayscale",
        };
        write!(f, "{name}")
    }
}

impl FromStr for Colormap {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "viridis" => Ok(Colormap::Viridis),
            "grayscale" => Ok(Colormap::Grayscale),
            other => Err(format!(
                "unknown colormap '{other}' (expected viridis or grayscale)"
            )),
        }
    }
}
