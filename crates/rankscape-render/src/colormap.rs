//! Sequential colour maps.
//!
//! Each map is a table of nine evenly spaced stops sampled from the
//! matplotlib map of the same name; values in between are linearly
//! interpolated.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

type Stops = [[u8; 3]; 9];

const PLASMA: Stops = [
    [13, 8, 135],
    [75, 3, 161],
    [125, 3, 168],
    [168, 34, 150],
    [203, 70, 121],
    [229, 107, 93],
    [248, 148, 65],
    [253, 195, 40],
    [240, 249, 33],
];

const VIRIDIS: Stops = [
    [68, 1, 84],
    [71, 44, 122],
    [59, 81, 139],
    [44, 113, 142],
    [33, 145, 140],
    [39, 173, 129],
    [92, 200, 99],
    [170, 220, 50],
    [253, 231, 37],
];

const INFERNO: Stops = [
    [0, 0, 4],
    [31, 12, 72],
    [85, 15, 109],
    [136, 34, 106],
    [186, 54, 85],
    [227, 89, 51],
    [249, 140, 10],
    [249, 201, 50],
    [252, 255, 164],
];

const MAGMA: Stops = [
    [0, 0, 4],
    [28, 16, 68],
    [79, 18, 123],
    [129, 37, 129],
    [181, 54, 122],
    [229, 80, 100],
    [251, 135, 97],
    [254, 194, 135],
    [252, 253, 191],
];

const GREYS: Stops = [
    [255, 255, 255],
    [223, 223, 223],
    [191, 191, 191],
    [159, 159, 159],
    [128, 128, 128],
    [96, 96, 96],
    [64, 64, 64],
    [32, 32, 32],
    [0, 0, 0],
];

/// A sequential colour map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Colormap {
    /// Blue → magenta → yellow.
    #[default]
    Plasma,
    /// Purple → teal → yellow.
    Viridis,
    /// Black → red → pale yellow.
    Inferno,
    /// Black → pink → pale cream.
    Magma,
    /// White → black.
    Greys,
}

impl Colormap {
    /// All maps.
    pub fn all() -> &'static [Colormap] {
        &[
            Colormap::Plasma,
            Colormap::Viridis,
            Colormap::Inferno,
            Colormap::Magma,
            Colormap::Greys,
        ]
    }

    /// Lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Colormap::Plasma => "plasma",
            Colormap::Viridis => "viridis",
            Colormap::Inferno => "inferno",
            Colormap::Magma => "magma",
            Colormap::Greys => "greys",
        }
    }

    fn stops(self) -> &'static Stops {
        match self {
            Colormap::Plasma => &PLASMA,
            Colormap::Viridis => &VIRIDIS,
            Colormap::Inferno => &INFERNO,
            Colormap::Magma => &MAGMA,
            Colormap::Greys => &GREYS,
        }
    }

    /// RGB colour at `t`; `t` is clamped to `[0, 1]` and NaN maps to 0.
    pub fn sample(self, t: f64) -> [u8; 3] {
        let stops = self.stops();
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let scaled = t * (stops.len() - 1) as f64;
        let lo = (scaled.floor() as usize).min(stops.len() - 2);
        let frac = scaled - lo as f64;
        let (a, b) = (stops[lo], stops[lo + 1]);
        let mut rgb = [0u8; 3];
        for (i, channel) in rgb.iter_mut().enumerate() {
            let v = f64::from(a[i]) + (f64::from(b[i]) - f64::from(a[i])) * frac;
            *channel = v.round().clamp(0.0, 255.0) as u8;
        }
        rgb
    }
}

impl fmt::Display for Colormap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Colormap {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Colormap::all()
            .iter()
            .copied()
            .find(|c| c.name() == wanted || (wanted == "grays" && *c == Colormap::Greys))
            .ok_or_else(|| Error::render(format!("unknown colormap '{s}'")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_endpoints_match_stops() {
        assert_eq!(Colormap::Plasma.sample(0.0), [13, 8, 135]);
        assert_eq!(Colormap::Plasma.sample(1.0), [240, 249, 33]);
        assert_eq!(Colormap::Viridis.sample(0.5), [33, 145, 140]);
    }

    #[test]
    fn test_sample_interpolates() {
        // Halfway between the first two grey stops.
        assert_eq!(Colormap::Greys.sample(1.0 / 16.0), [239, 239, 239]);
    }

    #[test]
    fn test_greys_runs_white_to_black() {
        assert_eq!(Colormap::Greys.sample(0.0), [255, 255, 255]);
        assert_eq!(Colormap::Greys.sample(1.0), [0, 0, 0]);
    }

    #[test]
    fn test_sample_clamps() {
        assert_eq!(Colormap::Magma.sample(-3.0), Colormap::Magma.sample(0.0));
        assert_eq!(Colormap::Magma.sample(7.0), Colormap::Magma.sample(1.0));
        assert_eq!(Colormap::Magma.sample(f64::NAN), Colormap::Magma.sample(0.0));
    }

    #[test]
    fn test_parse() {
        assert_eq!("plasma".parse::<Colormap>().unwrap(), Colormap::Plasma);
        assert_eq!(" Viridis ".parse::<Colormap>().unwrap(), Colormap::Viridis);
        assert_eq!("grays".parse::<Colormap>().unwrap(), Colormap::Greys);
        assert!("jet".parse::<Colormap>().is_err());
    }

    #[test]
    fn test_default_is_plasma() {
        assert_eq!(Colormap::default(), Colormap::Plasma);
        assert_eq!(Colormap::default().to_string(), "plasma");
    }
}
