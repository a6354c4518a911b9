// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scales consumed by marks.
//!
//! Marks never build scales: the orchestrator infers domains from every mark's declared
//! channels, instantiates one scale per [`ScaleRole`], and passes them to `render` as
//! [`Scales`]. Marks only map values through them.

extern crate alloc;

use alloc::sync::Arc;
use alloc::vec::Vec;

use peniko::Color;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

use crate::channel::ScaleRole;
use crate::error::Error;
use crate::value::{Value, ascending, defined};

/// A positional (or radius) scale instance.
#[derive(Clone, Debug, PartialEq)]
pub enum Scale {
    /// Continuous linear scale.
    Linear(ScaleLinear),
    /// Continuous square-root scale (used for radii).
    Sqrt(ScaleSqrt),
    /// Discrete band scale.
    Band(ScaleBand),
    /// Discrete point scale.
    Point(ScalePoint),
}

impl Scale {
    /// Maps a value into range space; `NaN` if the value cannot be mapped.
    pub fn map(&self, v: &Value) -> f64 {
        match self {
            Self::Linear(s) => s.map(v.as_f64()),
            Self::Sqrt(s) => s.map(v.as_f64()),
            Self::Band(s) => s.map(v),
            Self::Point(s) => s.map(v),
        }
    }

    /// Returns the band width for band scales.
    pub fn bandwidth(&self) -> Option<f64> {
        match self {
            Self::Band(s) => Some(s.bandwidth()),
            _ => None,
        }
    }

    /// Returns the ordered keys of a discrete scale.
    pub fn domain(&self) -> Option<&[Value]> {
        match self {
            Self::Band(s) => Some(&s.domain),
            Self::Point(s) => Some(&s.domain),
            Self::Linear(_) | Self::Sqrt(_) => None,
        }
    }

    /// Returns the output range.
    pub fn range(&self) -> (f64, f64) {
        match self {
            Self::Linear(s) => s.range,
            Self::Sqrt(s) => s.inner.range,
            Self::Band(s) => s.range,
            Self::Point(s) => s.range,
        }
    }

    /// Returns a copy of this scale with a new output range.
    pub fn with_range(&self, range: (f64, f64)) -> Self {
        match self {
            Self::Linear(s) => Self::Linear(ScaleLinear { range, ..*s }),
            Self::Sqrt(s) => Self::Sqrt(ScaleSqrt {
                inner: ScaleLinear {
                    range,
                    ..s.inner
                },
            }),
            Self::Band(s) => Self::Band(ScaleBand {
                range,
                ..s.clone()
            }),
            Self::Point(s) => Self::Point(ScalePoint {
                range,
                ..s.clone()
            }),
        }
    }
}

/// A linear mapping from a continuous domain to a continuous range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleLinear {
    domain: (f64, f64),
    range: (f64, f64),
}

impl ScaleLinear {
    /// Creates a new scale mapping `domain` values to `range` values.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Maps a value from domain space into range space.
    pub fn map(&self, x: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let denom = d1 - d0;
        if denom == 0.0 {
            return r0;
        }
        let t = (x - d0) / denom;
        r0 + t * (r1 - r0)
    }

    /// Returns the configured domain.
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }
}

/// A square-root scale: linear in `sqrt(x)`, sign-preserving.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleSqrt {
    inner: ScaleLinear,
}

impl ScaleSqrt {
    /// Creates a new square-root scale.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            inner: ScaleLinear::new((signed_sqrt(domain.0), signed_sqrt(domain.1)), range),
        }
    }

    /// Maps a value from domain space into range space.
    pub fn map(&self, x: f64) -> f64 {
        self.inner.map(signed_sqrt(x))
    }
}

fn signed_sqrt(x: f64) -> f64 {
    if x < 0.0 { -(-x).sqrt() } else { x.sqrt() }
}

/// A discrete band scale over ordered keys.
///
/// Each key maps to the start of its band.
#[derive(Clone, Debug, PartialEq)]
pub struct ScaleBand {
    domain: Arc<[Value]>,
    range: (f64, f64),
    padding_inner: f64,
    padding_outer: f64,
}

impl ScaleBand {
    /// Creates a new band scale with `0.1` inner and outer padding.
    pub fn new(domain: impl Into<Arc<[Value]>>, range: (f64, f64)) -> Self {
        Self {
            domain: domain.into(),
            range,
            padding_inner: 0.1,
            padding_outer: 0.1,
        }
    }

    /// Sets inner and outer padding in band units.
    pub fn with_padding(mut self, inner: f64, outer: f64) -> Self {
        self.padding_inner = inner.max(0.0);
        self.padding_outer = outer.max(0.0);
        self
    }

    /// Returns the computed band width.
    pub fn bandwidth(&self) -> f64 {
        let (r0, r1) = self.range;
        let n = self.domain.len() as f64;
        if n <= 0.0 {
            return 0.0;
        }
        let span = (r1 - r0).abs();
        let denom = n + self.padding_inner * (n - 1.0) + 2.0 * self.padding_outer;
        if denom == 0.0 { 0.0 } else { span / denom }
    }

    /// Returns the start of the band at `index`.
    pub fn position(&self, index: usize) -> f64 {
        let (r0, r1) = self.range;
        let bw = self.bandwidth();
        let step = bw * (1.0 + self.padding_inner);
        let start = r0.min(r1);
        start + bw * self.padding_outer + step * index as f64
    }

    /// Maps a key to the start of its band; `NaN` for keys outside the domain.
    pub fn map(&self, key: &Value) -> f64 {
        key_position(&self.domain, key).map_or(f64::NAN, |i| self.position(i))
    }

    /// Returns the ordered keys.
    pub fn domain(&self) -> &[Value] {
        &self.domain
    }
}

/// A discrete point scale over ordered keys (a band scale without width).
#[derive(Clone, Debug, PartialEq)]
pub struct ScalePoint {
    domain: Arc<[Value]>,
    range: (f64, f64),
    padding: f64,
}

impl ScalePoint {
    /// Creates a new point scale with `0.5` outer padding.
    pub fn new(domain: impl Into<Arc<[Value]>>, range: (f64, f64)) -> Self {
        Self {
            domain: domain.into(),
            range,
            padding: 0.5,
        }
    }

    /// Sets the outer padding in point steps.
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding.max(0.0);
        self
    }

    fn step(&self) -> f64 {
        let (r0, r1) = self.range;
        let n = self.domain.len() as f64;
        if n <= 1.0 {
            return 0.0;
        }
        let span = (r1 - r0).abs();
        let denom = (n - 1.0) + 2.0 * self.padding;
        if denom == 0.0 { 0.0 } else { span / denom }
    }

    /// Maps a key to its point; `NaN` for keys outside the domain.
    pub fn map(&self, key: &Value) -> f64 {
        let Some(index) = key_position(&self.domain, key) else {
            return f64::NAN;
        };
        let (r0, r1) = self.range;
        let step = self.step();
        r0.min(r1) + self.padding * step + step * index as f64
    }
}

fn key_position(domain: &[Value], key: &Value) -> Option<usize> {
    let key = key.key();
    domain.iter().position(|k| k.key() == key)
}

/// A scale mapping values to colors.
#[derive(Clone, Debug, PartialEq)]
pub enum ColorScale {
    /// Categorical colors, cycling through `range` in domain order.
    Ordinal {
        /// Ordered keys.
        domain: Arc<[Value]>,
        /// Colors assigned to keys.
        range: Arc<[Color]>,
    },
    /// Numeric values interpolated between two colors (clamped).
    Sequential {
        /// Numeric extent.
        domain: (f64, f64),
        /// Colors at the low and high ends of the domain.
        range: (Color, Color),
    },
}

impl ColorScale {
    /// Maps a value to a color; `None` if the value is outside an ordinal domain or not a number.
    pub fn map(&self, v: &Value) -> Option<Color> {
        match self {
            Self::Ordinal { domain, range } => {
                if range.is_empty() {
                    return None;
                }
                key_position(domain, v).map(|i| range[i % range.len()])
            }
            Self::Sequential {
                domain: (d0, d1),
                range: (c0, c1),
            } => {
                let x = v.as_f64();
                if x.is_nan() {
                    return None;
                }
                let denom = d1 - d0;
                let t = if denom == 0.0 { 0.0 } else { (x - d0) / denom };
                #[allow(clippy::cast_possible_truncation, reason = "t is clamped to [0, 1]")]
                let t = t.clamp(0.0, 1.0) as f32;
                let a = c0.components;
                let b = c1.components;
                Some(Color::new([
                    a[0] + (b[0] - a[0]) * t,
                    a[1] + (b[1] - a[1]) * t,
                    a[2] + (b[2] - a[2]) * t,
                    a[3] + (b[3] - a[3]) * t,
                ]))
            }
        }
    }
}

/// The scales a render pass maps channel values through.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scales {
    /// Horizontal position.
    pub x: Option<Scale>,
    /// Vertical position (a band scale of facet keys when faceting).
    pub y: Option<Scale>,
    /// Vertical position inside facet panels.
    pub fy: Option<Scale>,
    /// Radius.
    pub r: Option<Scale>,
    /// Colors.
    pub color: Option<ColorScale>,
}

impl Scales {
    /// Sets the x scale.
    pub fn with_x(mut self, scale: Scale) -> Self {
        self.x = Some(scale);
        self
    }

    /// Sets the y scale.
    pub fn with_y(mut self, scale: Scale) -> Self {
        self.y = Some(scale);
        self
    }

    /// Sets the facet-panel y scale.
    pub fn with_fy(mut self, scale: Scale) -> Self {
        self.fy = Some(scale);
        self
    }

    /// Sets the radius scale.
    pub fn with_r(mut self, scale: Scale) -> Self {
        self.r = Some(scale);
        self
    }

    /// Sets the color scale.
    pub fn with_color(mut self, scale: ColorScale) -> Self {
        self.color = Some(scale);
        self
    }

    /// Returns the positional scale for `role` (`None` for [`ScaleRole::Color`]).
    pub fn get(&self, role: ScaleRole) -> Option<&Scale> {
        match role {
            ScaleRole::X => self.x.as_ref(),
            ScaleRole::Y => self.y.as_ref(),
            ScaleRole::Fy => self.fy.as_ref(),
            ScaleRole::R => self.r.as_ref(),
            ScaleRole::Color => None,
        }
    }

    /// Returns the positional scale for `role`, or an error naming `mark`.
    pub fn require(&self, mark: &'static str, role: ScaleRole) -> Result<&Scale, Error> {
        self.get(role)
            .ok_or(Error::MissingScale { mark, scale: role })
    }

    /// Returns the color scale, or an error naming `mark`.
    pub fn require_color(&self, mark: &'static str) -> Result<&ColorScale, Error> {
        self.color.as_ref().ok_or(Error::MissingScale {
            mark,
            scale: ScaleRole::Color,
        })
    }
}

/// Figure size and margins in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dimensions {
    /// Total width.
    pub width: f64,
    /// Total height.
    pub height: f64,
    /// Top margin.
    pub margin_top: f64,
    /// Right margin.
    pub margin_right: f64,
    /// Bottom margin.
    pub margin_bottom: f64,
    /// Left margin.
    pub margin_left: f64,
}

impl Default for Dimensions {
    fn default() -> Self {
        Self {
            width: 640.0,
            height: 400.0,
            margin_top: 20.0,
            margin_right: 20.0,
            margin_bottom: 30.0,
            margin_left: 40.0,
        }
    }
}

impl Dimensions {
    /// Creates dimensions of the given size with default margins.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Sets all four margins.
    pub fn with_margins(mut self, top: f64, right: f64, bottom: f64, left: f64) -> Self {
        self.margin_top = top;
        self.margin_right = right;
        self.margin_bottom = bottom;
        self.margin_left = left;
        self
    }
}

/// Returns a copy of `scale` whose range spans the plot area of `dimensions` for `role`.
///
/// Horizontal scales run left to right, vertical scales bottom to top. Radius and color scales
/// are returned unchanged.
pub fn auto_scale_range(scale: &Scale, role: ScaleRole, dimensions: &Dimensions) -> Scale {
    match role {
        ScaleRole::X => scale.with_range((
            dimensions.margin_left,
            dimensions.width - dimensions.margin_right,
        )),
        ScaleRole::Y | ScaleRole::Fy => scale.with_range((
            dimensions.height - dimensions.margin_bottom,
            dimensions.margin_top,
        )),
        ScaleRole::R | ScaleRole::Color => scale.clone(),
    }
}

/// Infers a `(min, max)` extent from the finite numeric values.
///
/// Returns `None` if no finite number is present.
pub fn infer_extent<'a>(values: impl IntoIterator<Item = &'a Value>) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values {
        if !v.is_numeric() {
            continue;
        }
        let x = v.as_f64();
        if !x.is_finite() {
            continue;
        }
        min = min.min(x);
        max = max.max(x);
    }
    (min.is_finite() && max.is_finite()).then_some((min, max))
}

/// Infers an ordinal domain: the distinct defined values, sorted ascending.
pub fn infer_ordinal_domain<'a>(values: impl IntoIterator<Item = &'a Value>) -> Vec<Value> {
    let mut out: Vec<Value> = Vec::new();
    let mut seen = hashbrown::HashSet::new();
    for v in values {
        if defined(v) && seen.insert(v.key()) {
            out.push(v.clone());
        }
    }
    out.sort_by(ascending);
    out
}
