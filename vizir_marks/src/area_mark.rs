// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

extern crate alloc;

use alloc::vec;
use alloc::vec::Vec;

use kurbo::Point;

use crate::channel::{
    ChannelSpec, ChannelValue, MaybeChannel, ResolvedChannels, ScaleRole, maybe_color,
};
use crate::curve::{Curve, area_path};
use crate::error::Error;
use crate::mark::{Mark, MarkCore, color_at};
use crate::node::{Node, Shape};
use crate::scale::{Dimensions, Scales};
use crate::style::{Style, translate};
use crate::value::{Data, defined, group_index, value_at};

/// Options for [`AreaMark`].
///
/// `x`/`y` are shorthands interpreted by [`area_x`] and [`area_y`]; [`area`] uses them as
/// fallbacks for `x1`/`y1`.
#[derive(Clone, Debug, Default)]
pub struct AreaOptions {
    /// Shorthand horizontal value.
    pub x: Option<ChannelValue>,
    /// Shorthand vertical value.
    pub y: Option<ChannelValue>,
    /// Baseline x.
    pub x1: Option<ChannelValue>,
    /// Baseline y.
    pub y1: Option<ChannelValue>,
    /// Topline x (defaults to `x1`).
    pub x2: Option<ChannelValue>,
    /// Topline y (defaults to `y1`).
    pub y2: Option<ChannelValue>,
    /// Series key; defaults to the fill channel.
    pub z: Option<ChannelValue>,
    /// Fill: a constant paint or a color channel.
    pub fill: Option<ChannelValue>,
    /// Interpolator.
    pub curve: Curve,
    /// Constant presentation properties.
    pub style: Style,
}

impl AreaOptions {
    /// Sets the shorthand horizontal value.
    pub fn with_x(mut self, x: impl Into<ChannelValue>) -> Self {
        self.x = Some(x.into());
        self
    }

    /// Sets the shorthand vertical value.
    pub fn with_y(mut self, y: impl Into<ChannelValue>) -> Self {
        self.y = Some(y.into());
        self
    }

    /// Sets the baseline x.
    pub fn with_x1(mut self, x1: impl Into<ChannelValue>) -> Self {
        self.x1 = Some(x1.into());
        self
    }

    /// Sets the baseline y.
    pub fn with_y1(mut self, y1: impl Into<ChannelValue>) -> Self {
        self.y1 = Some(y1.into());
        self
    }

    /// Sets the topline x.
    pub fn with_x2(mut self, x2: impl Into<ChannelValue>) -> Self {
        self.x2 = Some(x2.into());
        self
    }

    /// Sets the topline y.
    pub fn with_y2(mut self, y2: impl Into<ChannelValue>) -> Self {
        self.y2 = Some(y2.into());
        self
    }

    /// Sets the series key.
    pub fn with_z(mut self, z: impl Into<ChannelValue>) -> Self {
        self.z = Some(z.into());
        self
    }

    /// Sets the fill.
    pub fn with_fill(mut self, fill: impl Into<ChannelValue>) -> Self {
        self.fill = Some(fill.into());
        self
    }

    /// Sets the interpolator.
    pub fn with_curve(mut self, curve: Curve) -> Self {
        self.curve = curve;
        self
    }

    /// Sets the constant presentation properties.
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

/// A filled region between a baseline (`x1`, `y1`) and a topline (`x2`, `y2`).
///
/// One path is emitted per `z` series; undefined points split a series into separate bands.
#[derive(Clone, Debug)]
pub struct AreaMark {
    core: MarkCore,
    curve: Curve,
    style: Style,
}

impl AreaMark {
    /// Creates an area mark.
    pub fn new(data: Data, options: AreaOptions) -> Result<Self, Error> {
        let (fill, fill_constant) = MaybeChannel::split(maybe_color(options.fill, None));
        let z = options.z.or_else(|| fill.clone());
        let core = MarkCore::new(
            "area",
            Some(data),
            vec![
                ChannelSpec::new("x1", options.x1.or(options.x)).with_scale(ScaleRole::X),
                ChannelSpec::new("y1", options.y1.or(options.y)).with_scale(ScaleRole::Y),
                ChannelSpec::new("x2", options.x2)
                    .with_scale(ScaleRole::X)
                    .optional(),
                ChannelSpec::new("y2", options.y2)
                    .with_scale(ScaleRole::Y)
                    .optional(),
                ChannelSpec::new("z", z).optional(),
                ChannelSpec::new("fill", fill)
                    .with_scale(ScaleRole::Color)
                    .optional(),
            ],
        )?;
        let defaults = Style {
            fill: fill_constant,
            ..Style::default()
        };
        Ok(Self {
            core,
            curve: options.curve,
            style: options.style.with_defaults(&defaults),
        })
    }

    /// The resolved constant style.
    pub fn style(&self) -> &Style {
        &self.style
    }
}

impl Mark for AreaMark {
    fn kind(&self) -> &'static str {
        self.core.kind()
    }

    fn data(&self) -> Option<&Data> {
        self.core.data()
    }

    fn channels(&self) -> &[ChannelSpec] {
        self.core.channels()
    }

    fn initialize(&self) -> Result<ResolvedChannels, Error> {
        self.core.initialize()
    }

    fn render(
        &self,
        index: Option<&[usize]>,
        scales: &Scales,
        channels: &ResolvedChannels,
        _dimensions: &Dimensions,
    ) -> Result<Option<Node>, Error> {
        let kind = self.kind();
        self.core.check_scales(scales)?;
        let x = scales.require(kind, ScaleRole::X)?;
        let y = scales.require(kind, ScaleRole::Y)?;
        let x1 = channels.require(kind, "x1")?;
        let y1 = channels.require(kind, "y1")?;
        let x2 = channels.get("x2").unwrap_or(x1);
        let y2 = channels.get("y2").unwrap_or(y1);
        let fill = channels.get("fill");

        let index = self.core.index(index, channels);
        let series: Vec<Vec<usize>> = match channels.get("z") {
            Some(z) => group_index(&index, z).into_iter().map(|(_, g)| g).collect(),
            None => vec![index],
        };

        let mut paths = Vec::with_capacity(series.len());
        for group in series {
            let points: Vec<Option<(Point, Point)>> = group
                .iter()
                .map(|&i| {
                    let vals = [x1, y1, x2, y2].map(|c| value_at(c, i));
                    vals.iter().all(|v| defined(v)).then(|| {
                        (
                            Point::new(x.map(vals[0]), y.map(vals[1])),
                            Point::new(x.map(vals[2]), y.map(vals[3])),
                        )
                    })
                })
                .collect();
            if points.iter().all(Option::is_none) {
                continue;
            }
            let mut style = self.style.direct();
            if let Some(&first) = group.first()
                && let Some(paint) = color_at(kind, scales, fill, first)?
            {
                style.fill = Some(paint);
            }
            paths.push(
                Node::builder(Shape::Path(area_path(&points, self.curve)))
                    .style(style)
                    .build(),
            );
        }

        Ok(Some(
            Node::group()
                .style(self.style.indirect())
                .transform(translate(Some(x), Some(y), 0.0, 0.0))
                .children(paths)
                .build(),
        ))
    }
}

/// Creates an area mark.
pub fn area(data: Data, options: AreaOptions) -> Result<AreaMark, Error> {
    AreaMark::new(data, options)
}

/// Creates a horizontal area: `x1`/`x2` from the baseline shorthand, `y` defaults to the index.
///
/// | given          | `x1`           | `x2`                |
/// |----------------|----------------|---------------------|
/// | `{}`, `{x}`    | zero           | `x`, else identity  |
/// | `{x2}`, `{x, x2}` | `x`, else zero | `x2`             |
/// | `{x1}`, `{x, x1}` | `x1`         | `x`, else zero      |
pub fn area_x(data: Data, mut options: AreaOptions) -> Result<AreaMark, Error> {
    let (x1, x2) = baseline(options.x.take(), options.x1.take(), options.x2.take());
    options.x1 = Some(x1);
    options.x2 = Some(x2);
    options.y1 = Some(options.y.take().unwrap_or(ChannelValue::Index));
    options.y2 = None;
    AreaMark::new(data, options)
}

/// Creates a vertical area: `y1`/`y2` from the baseline shorthand, `x` defaults to the index.
pub fn area_y(data: Data, mut options: AreaOptions) -> Result<AreaMark, Error> {
    let (y1, y2) = baseline(options.y.take(), options.y1.take(), options.y2.take());
    options.y1 = Some(y1);
    options.y2 = Some(y2);
    options.x1 = Some(options.x.take().unwrap_or(ChannelValue::Index));
    options.x2 = None;
    AreaMark::new(data, options)
}

fn baseline(
    v: Option<ChannelValue>,
    v1: Option<ChannelValue>,
    v2: Option<ChannelValue>,
) -> (ChannelValue, ChannelValue) {
    match (v1, v2) {
        (None, None) => (ChannelValue::Zero, v.unwrap_or(ChannelValue::Identity)),
        (None, Some(v2)) => (v.unwrap_or(ChannelValue::Zero), v2),
        (Some(v1), None) => (v1, v.unwrap_or(ChannelValue::Zero)),
        (Some(v1), Some(v2)) => (v1, v2),
    }
}
