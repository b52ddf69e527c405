//! Symmetric-log normalisation.
//!
//! Values within `±linthresh` are mapped linearly; beyond that the mapping is
//! logarithmic in `base`. This matches matplotlib's `SymLogNorm`, so figures
//! are comparable with ones produced by the usual Python tooling.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

fn default_linthresh() -> f64 {
    0.01
}

fn default_linscale() -> f64 {
    1.0
}

fn default_base() -> f64 {
    10.0
}

/// Shape parameters of a [`SymLogNorm`], independent of the data range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormParams {
    /// Half-width of the linear region around zero.
    #[serde(default = "default_linthresh")]
    pub linthresh: f64,

    /// Number of decades the linear region spans.
    #[serde(default = "default_linscale")]
    pub linscale: f64,

    /// Logarithm base.
    #[serde(default = "default_base")]
    pub base: f64,
}

impl Default for NormParams {
    fn default() -> Self {
        Self {
            linthresh: default_linthresh(),
            linscale: default_linscale(),
            base: default_base(),
        }
    }
}

impl NormParams {
    /// Build a norm for data spanning `[vmin, vmax]`.
    pub fn for_range(self, vmin: f64, vmax: f64) -> Result<SymLogNorm> {
        SymLogNorm::new(self, vmin, vmax)
    }
}

/// Maps data values to `[0, 1]` on a symmetric-log scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SymLogNorm {
    params: NormParams,
    linscale_adj: f64,
    vmin: f64,
    t_min: f64,
    t_max: f64,
}

impl SymLogNorm {
    /// Create a norm over `[vmin, vmax]`.
    pub fn new(params: NormParams, vmin: f64, vmax: f64) -> Result<Self> {
        if !params.linthresh.is_finite() || params.linthresh <= 0.0 {
            return Err(Error::render(format!(
                "linthresh must be positive (got {})",
                params.linthresh
            )));
        }
        if !params.linscale.is_finite() || params.linscale <= 0.0 {
            return Err(Error::render(format!(
                "linscale must be positive (got {})",
                params.linscale
            )));
        }
        if !params.base.is_finite() || params.base <= 1.0 {
            return Err(Error::render(format!(
                "base must be greater than 1 (got {})",
                params.base
            )));
        }
        if !vmin.is_finite() || !vmax.is_finite() || vmin > vmax {
            return Err(Error::render(format!(
                "invalid data range {vmin} .. {vmax}"
            )));
        }

        let linscale_adj = params.linscale / (1.0 - params.base.recip());
        let mut norm = Self {
            params,
            linscale_adj,
            vmin,
            t_min: 0.0,
            t_max: 0.0,
        };
        norm.t_min = norm.transform(vmin);
        norm.t_max = norm.transform(vmax);
        Ok(norm)
    }

    fn transform(&self, v: f64) -> f64 {
        let NormParams {
            linthresh, base, ..
        } = self.params;
        let magnitude = v.abs();
        if magnitude <= linthresh {
            v * self.linscale_adj
        } else {
            v.signum() * linthresh * (self.linscale_adj + (magnitude / linthresh).log(base))
        }
    }

    fn inverse_transform(&self, t: f64) -> f64 {
        let NormParams {
            linthresh, base, ..
        } = self.params;
        let magnitude = t.abs();
        if magnitude <= linthresh * self.linscale_adj {
            t / self.linscale_adj
        } else {
            t.signum() * linthresh * base.powf(magnitude / linthresh - self.linscale_adj)
        }
    }

    /// Map `v` to `[0, 1]`. Values outside the data range are clamped.
    ///
    /// A degenerate range (`vmin == vmax`) maps everything to `0`.
    pub fn normalize(&self, v: f64) -> f64 {
        let span = self.t_max - self.t_min;
        if span == 0.0 {
            return 0.0;
        }
        ((self.transform(v) - self.t_min) / span).clamp(0.0, 1.0)
    }

    /// Data value whose normalised position is `t`.
    pub fn denormalize(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        self.inverse_transform(self.t_min + t * (self.t_max - self.t_min))
    }

    /// Data values at `n` evenly spaced colour bar positions, bottom to top.
    pub fn ticks(&self, n: usize) -> Vec<f64> {
        match n {
            0 => Vec::new(),
            1 => vec![self.vmin],
            _ => (0..n)
                .map(|i| self.denormalize(i as f64 / (n - 1) as f64))
                .collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
    }

    fn norm(vmin: f64, vmax: f64) -> SymLogNorm {
        NormParams::default().for_range(vmin, vmax).unwrap()
    }

    #[test]
    fn test_endpoints() {
        let n = norm(1.0, 10_000.0);
        assert!(approx(n.normalize(1.0), 0.0));
        assert!(approx(n.normalize(10_000.0), 1.0));
    }

    #[test]
    fn test_log_region_is_logarithmic() {
        // With vmin/vmax well above linthresh, decades are evenly spaced.
        let n = norm(1.0, 10_000.0);
        let a = n.normalize(10.0);
        let b = n.normalize(100.0);
        let c = n.normalize(1000.0);
        assert!(approx(b - a, c - b));
    }

    #[test]
    fn test_matches_matplotlib_reference() {
        // matplotlib: SymLogNorm(0.01, linscale=1, base=10, vmin=-1, vmax=1)(0.5)
        // transform(0.5) = 0.01 * (10/9 + log10(50)); symmetric about zero.
        let n = norm(-1.0, 1.0);
        assert!(approx(n.normalize(0.0), 0.5));
        let t = |v: f64| 0.01 * (10.0 / 9.0 + (v / 0.01f64).log10());
        let expected = (t(0.5) + t(1.0)) / (2.0 * t(1.0));
        assert!(approx(n.normalize(0.5), expected));
    }

    #[test]
    fn test_linear_region() {
        let n = norm(-0.01, 0.01);
        assert!(approx(n.normalize(0.005), 0.75));
    }

    #[test]
    fn test_clamps_outside_range() {
        let n = norm(5.0, 50.0);
        assert_eq!(n.normalize(1.0), 0.0);
        assert_eq!(n.normalize(500.0), 1.0);
    }

    #[test]
    fn test_degenerate_range() {
        let n = norm(3.0, 3.0);
        assert_eq!(n.normalize(3.0), 0.0);
    }

    #[test]
    fn test_denormalize_inverts() {
        let n = norm(0.5, 12_345.0);
        for v in [0.5, 1.0, 17.0, 999.0, 12_345.0] {
            assert!(approx(n.denormalize(n.normalize(v)), v));
        }
        let negative = norm(-100.0, 100.0);
        assert!(approx(negative.denormalize(negative.normalize(-0.004)), -0.004));
    }

    #[test]
    fn test_ticks() {
        let n = norm(1.0, 1000.0);
        let ticks = n.ticks(4);
        assert_eq!(ticks.len(), 4);
        assert!(approx(ticks[0], 1.0));
        assert!(approx(ticks[3], 1000.0));
        assert!(approx(ticks[1], 10.0));
    }

    #[test]
    fn test_invalid_params() {
        let bad_thresh = NormParams {
            linthresh: 0.0,
            ..NormParams::default()
        };
        assert!(bad_thresh.for_range(0.0, 1.0).is_err());
        let bad_base = NormParams {
            base: 1.0,
            ..NormParams::default()
        };
        assert!(bad_base.for_range(0.0, 1.0).is_err());
        assert!(NormParams::default().for_range(2.0, 1.0).is_err());
        assert!(NormParams::default().for_range(f64::NAN, 1.0).is_err());
    }

    mod props {
        use crate::norm::NormParams;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn normalize_is_monotonic(
                vmin in 0.0f64..1e3,
                span in 1e-3f64..1e6,
                a in 0.0f64..1.0,
                b in 0.0f64..1.0,
            ) {
                let vmax = vmin + span;
                let n = NormParams::default().for_range(vmin, vmax).unwrap();
                let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
                let x = n.normalize(vmin + lo * span);
                let y = n.normalize(vmin + hi * span);
                prop_assert!((0.0..=1.0).contains(&x));
                prop_assert!(x <= y + 1e-12);
            }
        }
    }
}
