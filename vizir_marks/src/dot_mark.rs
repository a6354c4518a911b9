// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

extern crate alloc;

use alloc::string::ToString;
use alloc::vec;
use alloc::vec::Vec;

use kurbo::{Circle, Point};

use crate::channel::{
    ChannelSpec, ChannelValue, MaybeChannel, ResolvedChannels, ScaleRole, maybe_color,
    maybe_number,
};
use crate::error::Error;
use crate::mark::{Mark, MarkCore, color_at, position_at, sort_by_z};
use crate::node::{Node, Shape};
use crate::scale::{Dimensions, Scales};
use crate::style::{Paint, Style, translate};
use crate::value::{Data, defined, positive, value_at};

/// Default dot radius in pixels.
pub const DEFAULT_RADIUS: f64 = 3.0;

/// Options for [`DotMark`].
#[derive(Clone, Debug, Default)]
pub struct DotOptions {
    /// Horizontal center; the plot's horizontal middle when unset.
    pub x: Option<ChannelValue>,
    /// Vertical center; the plot's vertical middle when unset.
    pub y: Option<ChannelValue>,
    /// Stacking order key.
    pub z: Option<ChannelValue>,
    /// Radius: a constant in pixels or a channel fed to the `r` scale.
    pub r: Option<ChannelValue>,
    /// Tooltip text.
    pub title: Option<ChannelValue>,
    /// Fill: a constant paint or a color channel. Defaults to `none`.
    pub fill: Option<ChannelValue>,
    /// Stroke: a constant paint or a color channel. Defaults to `currentColor` for unfilled dots.
    pub stroke: Option<ChannelValue>,
    /// Constant presentation properties.
    pub style: Style,
}

impl DotOptions {
    /// Sets the horizontal center.
    pub fn with_x(mut self, x: impl Into<ChannelValue>) -> Self {
        self.x = Some(x.into());
        self
    }

    /// Sets the vertical center.
    pub fn with_y(mut self, y: impl Into<ChannelValue>) -> Self {
        self.y = Some(y.into());
        self
    }

    /// Sets the stacking order key.
    pub fn with_z(mut self, z: impl Into<ChannelValue>) -> Self {
        self.z = Some(z.into());
        self
    }

    /// Sets the radius.
    pub fn with_r(mut self, r: impl Into<ChannelValue>) -> Self {
        self.r = Some(r.into());
        self
    }

    /// Sets the tooltip text.
    pub fn with_title(mut self, title: impl Into<ChannelValue>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the fill.
    pub fn with_fill(mut self, fill: impl Into<ChannelValue>) -> Self {
        self.fill = Some(fill.into());
        self
    }

    /// Sets the stroke.
    pub fn with_stroke(mut self, stroke: impl Into<ChannelValue>) -> Self {
        self.stroke = Some(stroke.into());
        self
    }

    /// Sets the constant presentation properties.
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

/// A circle per datum.
#[derive(Clone, Debug)]
pub struct DotMark {
    core: MarkCore,
    radius: f64,
    style: Style,
}

impl DotMark {
    /// Creates a dot mark.
    pub fn new(data: Data, options: DotOptions) -> Result<Self, Error> {
        let (r, radius) = MaybeChannel::split(maybe_number(options.r, Some(DEFAULT_RADIUS)));
        let (fill, fill_constant) =
            MaybeChannel::split(maybe_color(options.fill, Some(Paint::None)));
        let stroke_default = if fill_constant == Some(Paint::None) {
            Paint::CurrentColor
        } else {
            Paint::None
        };
        let (stroke, stroke_constant) =
            MaybeChannel::split(maybe_color(options.stroke, Some(stroke_default)));
        let core = MarkCore::new(
            "dot",
            Some(data),
            vec![
                ChannelSpec::new("x", options.x)
                    .with_scale(ScaleRole::X)
                    .optional(),
                ChannelSpec::new("y", options.y)
                    .with_scale(ScaleRole::Y)
                    .optional(),
                ChannelSpec::new("z", options.z).optional(),
                ChannelSpec::new("r", r).with_scale(ScaleRole::R).optional(),
                ChannelSpec::new("title", options.title).optional(),
                ChannelSpec::new("fill", fill)
                    .with_scale(ScaleRole::Color)
                    .optional(),
                ChannelSpec::new("stroke", stroke)
                    .with_scale(ScaleRole::Color)
                    .optional(),
            ],
        )?;
        let defaults = Style {
            fill: fill_constant,
            stroke: stroke_constant,
            stroke_width: (stroke_constant != Some(Paint::None)).then_some(1.5),
            ..Style::default()
        };
        Ok(Self {
            core,
            radius: radius.unwrap_or(DEFAULT_RADIUS),
            style: options.style.with_defaults(&defaults),
        })
    }

    /// The constant radius used when no `r` channel is set.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// The resolved constant style.
    pub fn style(&self) -> &Style {
        &self.style
    }
}

impl Mark for DotMark {
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
        dimensions: &Dimensions,
    ) -> Result<Option<Node>, Error> {
        let kind = self.kind();
        self.core.check_scales(scales)?;
        let xs = channels.get("x");
        let ys = channels.get("y");
        let rs = channels.get("r");
        let titles = channels.get("title");
        let fill = channels.get("fill");
        let stroke = channels.get("stroke");

        let index = self.core.index(index, channels);
        let mut index = self.core.filter_defined(index, &[xs, ys, fill, stroke]);
        if let Some(rs) = rs {
            index = self.core.filter(index, |i| positive(value_at(rs, i)));
        }
        sort_by_z(&mut index, channels.get("z"));

        let cx = (dimensions.margin_left + dimensions.width - dimensions.margin_right) / 2.0;
        let cy = (dimensions.margin_top + dimensions.height - dimensions.margin_bottom) / 2.0;

        let mut dots = Vec::with_capacity(index.len());
        for i in index {
            let center = Point::new(
                position_at(kind, scales, xs, ScaleRole::X, i, cx)?,
                position_at(kind, scales, ys, ScaleRole::Y, i, cy)?,
            );
            let radius = position_at(kind, scales, rs, ScaleRole::R, i, self.radius)?;
            let mut style = self.style.direct();
            style.fill = color_at(kind, scales, fill, i)?;
            style.stroke = color_at(kind, scales, stroke, i)?;
            let title = titles
                .map(|t| value_at(t, i))
                .filter(|v| defined(v))
                .map(ToString::to_string);
            dots.push(
                Node::builder(Shape::Circle(Circle::new(center, radius)))
                    .style(style)
                    .title(title)
                    .build(),
            );
        }

        Ok(Some(
            Node::group()
                .style(self.style.indirect())
                .transform(translate(scales.x.as_ref(), scales.y.as_ref(), 0.5, 0.5))
                .children(dots)
                .build(),
        ))
    }
}

/// Creates a dot mark over `[x, y]` tuples by default.
pub fn dot(data: Data, mut options: DotOptions) -> Result<DotMark, Error> {
    options.x.get_or_insert(ChannelValue::First);
    options.y.get_or_insert(ChannelValue::Second);
    DotMark::new(data, options)
}

/// Creates a dot mark whose `x` defaults to the datum itself.
pub fn dot_x(data: Data, mut options: DotOptions) -> Result<DotMark, Error> {
    options.x.get_or_insert(ChannelValue::Identity);
    DotMark::new(data, options)
}

/// Creates a dot mark whose `y` defaults to the datum itself.
pub fn dot_y(data: Data, mut options: DotOptions) -> Result<DotMark, Error> {
    options.y.get_or_insert(ChannelValue::Identity);
    DotMark::new(data, options)
}
