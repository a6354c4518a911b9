// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Constant presentation properties and how they are applied to render nodes.
//!
//! Properties that do not depend on data are resolved once at construction into a [`Style`].
//! A mark applies the *indirect* part of its style once to its container node and the *direct*
//! part (`mix-blend-mode`) to every element it emits.

use kurbo::{Cap, Join, Vec2};
use peniko::color::{Srgb, parse_color};
use peniko::{Color, Mix};
use smallvec::SmallVec;

use crate::scale::Scale;

/// A fill or stroke paint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Paint {
    /// No paint (`"none"`).
    None,
    /// Inherit the current text color (`"currentColor"`).
    CurrentColor,
    /// A concrete color.
    Color(Color),
}

impl Paint {
    /// Parses `"none"`, `"currentColor"` or a CSS color string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "none" => Some(Self::None),
            "currentColor" => Some(Self::CurrentColor),
            _ => parse_color(s)
                .ok()
                .map(|c| Self::Color(c.to_alpha_color::<Srgb>())),
        }
    }
}

impl From<Color> for Paint {
    fn from(value: Color) -> Self {
        Self::Color(value)
    }
}

/// Presentation properties; unset properties are never emitted.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Style {
    /// Fill paint.
    pub fill: Option<Paint>,
    /// Fill opacity in `[0, 1]`.
    pub fill_opacity: Option<f64>,
    /// Stroke paint.
    pub stroke: Option<Paint>,
    /// Stroke width.
    pub stroke_width: Option<f64>,
    /// Stroke opacity in `[0, 1]`.
    pub stroke_opacity: Option<f64>,
    /// Stroke line join.
    pub stroke_linejoin: Option<Join>,
    /// Stroke line cap.
    pub stroke_linecap: Option<Cap>,
    /// Stroke miter limit.
    pub stroke_miterlimit: Option<f64>,
    /// Stroke dash pattern.
    pub stroke_dasharray: Option<SmallVec<[f64; 4]>>,
    /// Blend mode applied per element.
    pub mix_blend_mode: Option<Mix>,
}

impl Style {
    /// Returns `true` if no property is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Sets the fill paint.
    pub fn with_fill(mut self, fill: impl Into<Paint>) -> Self {
        self.fill = Some(fill.into());
        self
    }

    /// Sets the fill opacity.
    pub fn with_fill_opacity(mut self, opacity: f64) -> Self {
        self.fill_opacity = Some(opacity);
        self
    }

    /// Sets the stroke paint.
    pub fn with_stroke(mut self, stroke: impl Into<Paint>) -> Self {
        self.stroke = Some(stroke.into());
        self
    }

    /// Sets the stroke width.
    pub fn with_stroke_width(mut self, width: f64) -> Self {
        self.stroke_width = Some(width);
        self
    }

    /// Sets the stroke opacity.
    pub fn with_stroke_opacity(mut self, opacity: f64) -> Self {
        self.stroke_opacity = Some(opacity);
        self
    }

    /// Sets the stroke line join.
    pub fn with_stroke_linejoin(mut self, join: Join) -> Self {
        self.stroke_linejoin = Some(join);
        self
    }

    /// Sets the stroke line cap.
    pub fn with_stroke_linecap(mut self, cap: Cap) -> Self {
        self.stroke_linecap = Some(cap);
        self
    }

    /// Sets the stroke miter limit.
    pub fn with_stroke_miterlimit(mut self, limit: f64) -> Self {
        self.stroke_miterlimit = Some(limit);
        self
    }

    /// Sets the stroke dash pattern.
    pub fn with_stroke_dasharray(mut self, dashes: impl IntoIterator<Item = f64>) -> Self {
        self.stroke_dasharray = Some(dashes.into_iter().collect());
        self
    }

    /// Sets the blend mode.
    pub fn with_mix_blend_mode(mut self, mode: Mix) -> Self {
        self.mix_blend_mode = Some(mode);
        self
    }

    /// Fills every unset property from `defaults`; properties set on `self` win.
    pub fn with_defaults(self, defaults: &Self) -> Self {
        Self {
            fill: self.fill.or(defaults.fill),
            fill_opacity: self.fill_opacity.or(defaults.fill_opacity),
            stroke: self.stroke.or(defaults.stroke),
            stroke_width: self.stroke_width.or(defaults.stroke_width),
            stroke_opacity: self.stroke_opacity.or(defaults.stroke_opacity),
            stroke_linejoin: self.stroke_linejoin.or(defaults.stroke_linejoin),
            stroke_linecap: self.stroke_linecap.or(defaults.stroke_linecap),
            stroke_miterlimit: self.stroke_miterlimit.or(defaults.stroke_miterlimit),
            stroke_dasharray: self
                .stroke_dasharray
                .or_else(|| defaults.stroke_dasharray.clone()),
            mix_blend_mode: self.mix_blend_mode.or(defaults.mix_blend_mode),
        }
    }

    /// The properties applied once to a mark's container.
    pub fn indirect(&self) -> Self {
        Self {
            mix_blend_mode: None,
            ..self.clone()
        }
    }

    /// The properties applied to every element of a mark.
    pub fn direct(&self) -> Self {
        Self {
            mix_blend_mode: self.mix_blend_mode,
            ..Self::default()
        }
    }
}

/// Container offset for marks positioned on band scales.
///
/// Band scales map a key to the start of its band; shifting by half a bandwidth centers the
/// mark in the band. `tx`/`ty` add a fixed pixel offset. Returns `None` when there is no offset.
pub fn translate(x: Option<&Scale>, y: Option<&Scale>, tx: f64, ty: f64) -> Option<Vec2> {
    let tx = tx + x.and_then(Scale::bandwidth).map_or(0.0, |bw| bw / 2.0);
    let ty = ty + y.and_then(Scale::bandwidth).map_or(0.0, |bw| bw / 2.0);
    (tx != 0.0 || ty != 0.0).then_some(Vec2::new(tx, ty))
}
