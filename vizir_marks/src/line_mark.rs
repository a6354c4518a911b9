// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

extern crate alloc;

use alloc::vec;
use alloc::vec::Vec;

use kurbo::Point;

use crate::channel::{ChannelSpec, ChannelValue, ResolvedChannels, ScaleRole};
use crate::curve::{Curve, line_path};
use crate::error::Error;
use crate::mark::{Mark, MarkCore};
use crate::node::{Node, NodeBuilder, Shape};
use crate::scale::{Dimensions, Scale, Scales};
use crate::style::{Paint, Style};
use crate::value::{Data, Value, defined, group_index, value_at};

/// Options for [`LineMark`].
#[derive(Clone, Debug, Default)]
pub struct LineOptions {
    /// Horizontal position.
    pub x: Option<ChannelValue>,
    /// Vertical position.
    pub y: Option<ChannelValue>,
    /// Series key; one path is drawn per distinct value.
    pub z: Option<ChannelValue>,
    /// Interpolator.
    pub curve: Curve,
    /// Constant presentation properties.
    pub style: Style,
}

impl LineOptions {
    /// Sets the horizontal position.
    pub fn with_x(mut self, x: impl Into<ChannelValue>) -> Self {
        self.x = Some(x.into());
        self
    }

    /// Sets the vertical position.
    pub fn with_y(mut self, y: impl Into<ChannelValue>) -> Self {
        self.y = Some(y.into());
        self
    }

    /// Sets the series key.
    pub fn with_z(mut self, z: impl Into<ChannelValue>) -> Self {
        self.z = Some(z.into());
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

/// A polyline through the data in index order.
///
/// Lines break at undefined points rather than interpolating across them.
#[derive(Clone, Debug)]
pub struct LineMark {
    core: MarkCore,
    curve: Curve,
    style: Style,
}

impl LineMark {
    /// Creates a line mark.
    pub fn new(data: Data, options: LineOptions) -> Result<Self, Error> {
        let defaults = Style {
            fill: Some(Paint::None),
            stroke: Some(Paint::CurrentColor),
            stroke_width: Some(if options.z.is_some() { 1.0 } else { 1.5 }),
            stroke_miterlimit: Some(1.0),
            ..Style::default()
        };
        let core = MarkCore::new(
            "line",
            Some(data),
            vec![
                ChannelSpec::new("x", options.x).with_scale(ScaleRole::X),
                ChannelSpec::new("y", options.y).with_scale(ScaleRole::Y),
                ChannelSpec::new("z", options.z).optional(),
            ],
        )?;
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

    fn path(
        &self,
        index: &[usize],
        (x, y): (&Scale, &Scale),
        (xs, ys): (&[Value], &[Value]),
    ) -> NodeBuilder {
        let points: Vec<Option<Point>> = index
            .iter()
            .map(|&i| {
                let (vx, vy) = (value_at(xs, i), value_at(ys, i));
                (defined(vx) && defined(vy)).then(|| Point::new(x.map(vx), y.map(vy)))
            })
            .collect();
        Node::builder(Shape::Path(line_path(&points, self.curve)))
    }
}

impl Mark for LineMark {
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
        channels.check_lengths(kind, &["x", "y", "z"])?;
        self.core.check_scales(scales)?;
        let x = scales.require(kind, ScaleRole::X)?;
        let y = scales.require(kind, ScaleRole::Y)?;
        let xs = channels.require(kind, "x")?;
        let ys = channels.require(kind, "y")?;
        let index = self.core.index(index, channels);

        let Some(z) = channels.get("z") else {
            return Ok(Some(
                self.path(&index, (x, y), (xs, ys))
                    .style(self.style.clone())
                    .build(),
            ));
        };
        let drawable = |i: usize| defined(value_at(xs, i)) && defined(value_at(ys, i));
        let paths = group_index(&index, z)
            .into_iter()
            .filter(|(_, series)| series.iter().any(|&i| drawable(i)))
            .map(|(_, series)| {
                self.path(&series, (x, y), (xs, ys))
                    .style(self.style.direct())
                    .build()
            });
        Ok(Some(
            Node::group()
                .style(self.style.indirect())
                .children(paths)
                .build(),
        ))
    }
}

/// Creates a line mark over `[x, y]` tuples by default.
pub fn line(data: Data, mut options: LineOptions) -> Result<LineMark, Error> {
    options.x.get_or_insert(ChannelValue::First);
    options.y.get_or_insert(ChannelValue::Second);
    LineMark::new(data, options)
}

/// Creates a horizontal line: `x` defaults to the datum, `y` to its index.
pub fn line_x(data: Data, mut options: LineOptions) -> Result<LineMark, Error> {
    options.x.get_or_insert(ChannelValue::Identity);
    options.y.get_or_insert(ChannelValue::Index);
    LineMark::new(data, options)
}

/// Creates a vertical line: `x` defaults to the index, `y` to the datum.
pub fn line_y(data: Data, mut options: LineOptions) -> Result<LineMark, Error> {
    options.x.get_or_insert(ChannelValue::Index);
    options.y.get_or_insert(ChannelValue::Identity);
    LineMark::new(data, options)
}
