// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

extern crate alloc;

use alloc::vec;
use alloc::vec::Vec;

use kurbo::Line;

use crate::channel::{
    ChannelSpec, ChannelValue, MaybeChannel, ResolvedChannels, ScaleRole, maybe_color,
};
use crate::error::Error;
use crate::mark::{Mark, MarkCore, color_at, sort_by_z};
use crate::node::{Node, Shape};
use crate::scale::{Dimensions, Scales};
use crate::style::{Paint, Style};
use crate::value::{Data, value_at};

/// Options for [`LinkMark`].
#[derive(Clone, Debug, Default)]
pub struct LinkOptions {
    /// Start x.
    pub x1: Option<ChannelValue>,
    /// Start y.
    pub y1: Option<ChannelValue>,
    /// End x.
    pub x2: Option<ChannelValue>,
    /// End y.
    pub y2: Option<ChannelValue>,
    /// Stacking order key.
    pub z: Option<ChannelValue>,
    /// Stroke: a constant paint or a color channel. Defaults to `currentColor`.
    pub stroke: Option<ChannelValue>,
    /// Constant presentation properties.
    pub style: Style,
}

impl LinkOptions {
    /// Sets the start x.
    pub fn with_x1(mut self, x1: impl Into<ChannelValue>) -> Self {
        self.x1 = Some(x1.into());
        self
    }

    /// Sets the start y.
    pub fn with_y1(mut self, y1: impl Into<ChannelValue>) -> Self {
        self.y1 = Some(y1.into());
        self
    }

    /// Sets the end x.
    pub fn with_x2(mut self, x2: impl Into<ChannelValue>) -> Self {
        self.x2 = Some(x2.into());
        self
    }

    /// Sets the end y.
    pub fn with_y2(mut self, y2: impl Into<ChannelValue>) -> Self {
        self.y2 = Some(y2.into());
        self
    }

    /// Sets the stacking order key.
    pub fn with_z(mut self, z: impl Into<ChannelValue>) -> Self {
        self.z = Some(z.into());
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

/// A straight segment per datum from (`x1`, `y1`) to (`x2`, `y2`).
#[derive(Clone, Debug)]
pub struct LinkMark {
    core: MarkCore,
    style: Style,
}

impl LinkMark {
    /// Creates a link mark.
    pub fn new(data: Data, options: LinkOptions) -> Result<Self, Error> {
        let (stroke, stroke_constant) = MaybeChannel::split(maybe_color(options.stroke, None));
        let stroke_constant = match (&stroke, stroke_constant) {
            (None, None) => Some(Paint::CurrentColor),
            (_, constant) => constant,
        };
        let core = MarkCore::new(
            "link",
            Some(data),
            vec![
                ChannelSpec::new("x1", options.x1).with_scale(ScaleRole::X),
                ChannelSpec::new("y1", options.y1).with_scale(ScaleRole::Y),
                ChannelSpec::new("x2", options.x2).with_scale(ScaleRole::X),
                ChannelSpec::new("y2", options.y2).with_scale(ScaleRole::Y),
                ChannelSpec::new("z", options.z).optional(),
                ChannelSpec::new("stroke", stroke)
                    .with_scale(ScaleRole::Color)
                    .optional(),
            ],
        )?;
        let defaults = Style {
            stroke: stroke_constant,
            ..Style::default()
        };
        Ok(Self {
            core,
            style: options.style.with_defaults(&defaults),
        })
    }

    /// The resolved constant style.
    pub fn style(&self) -> &Style {
        &self.style
    }
}

impl Mark for LinkMark {
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
        let x2 = channels.require(kind, "x2")?;
        let y2 = channels.require(kind, "y2")?;
        let stroke = channels.get("stroke");

        let index = self.core.index(index, channels);
        let mut index = self
            .core
            .filter_defined(index, &[Some(x1), Some(y1), Some(x2), Some(y2), stroke]);
        sort_by_z(&mut index, channels.get("z"));

        let mut links = Vec::with_capacity(index.len());
        for i in index {
            let segment = Line::new(
                (x.map(value_at(x1, i)), y.map(value_at(y1, i))),
                (x.map(value_at(x2, i)), y.map(value_at(y2, i))),
            );
            let mut style = self.style.direct();
            style.stroke = color_at(kind, scales, stroke, i)?;
            links.push(Node::builder(Shape::Line(segment)).style(style).build());
        }

        Ok(Some(
            Node::group()
                .style(self.style.indirect())
                .children(links)
                .build(),
        ))
    }
}

/// Creates a link mark.
pub fn link(data: Data, options: LinkOptions) -> Result<LinkMark, Error> {
    LinkMark::new(data, options)
}

#[cfg(test)]
mod tests {
    extern crate std;

    use kurbo::Point;
    use peniko::color::palette::css;
    use serde_json::json;

    use super::*;
    use crate::scale::{ColorScale, Scale, ScaleLinear};
    use crate::value::data;

    fn scales() -> Scales {
        Scales::default()
            .with_x(Scale::Linear(ScaleLinear::new((0.0, 4.0), (0.0, 100.0))))
            .with_y(Scale::Linear(ScaleLinear::new((0.0, 4.0), (100.0, 0.0))))
            .with_color(ColorScale::Sequential {
                domain: (0.0, 1.0),
                range: (css::BLACK, css::WHITE),
            })
    }

    fn options() -> LinkOptions {
        LinkOptions::default()
            .with_x1("a")
            .with_y1("lo")
            .with_x2("a")
            .with_y2("hi")
    }

    #[test]
    fn stroke_defaults_to_current_color() {
        let mark = link(data([json!({})]), options()).unwrap();
        assert_eq!(mark.style().stroke, Some(Paint::CurrentColor));

        let mark = link(data([json!({})]), options().with_stroke("red")).unwrap();
        assert!(matches!(
            mark.style().stroke,
            Some(Paint::Color(c)) if c.to_rgba8() == css::RED.to_rgba8()
        ));

        let mark = link(data([json!({})]), options().with_stroke("delta")).unwrap();
        assert_eq!(mark.style().stroke, None);
    }

    #[test]
    fn undefined_endpoints_and_strokes_are_dropped() {
        let mark = link(
            data([
                json!({"a": 1, "lo": 0, "hi": 2, "delta": 0}),
                json!({"a": 2, "lo": 1, "delta": 1}),
                json!({"a": 3, "lo": 1, "hi": 3}),
                json!({"a": 4, "lo": 2, "hi": 4, "delta": 1}),
            ]),
            options().with_stroke("delta"),
        )
        .unwrap();
        let channels = mark.initialize().unwrap();
        let node = mark
            .render(None, &scales(), &channels, &Dimensions::default())
            .unwrap()
            .unwrap();
        assert_eq!(node.children.len(), 2);
        assert_eq!(
            node.children[0].shape,
            Shape::Line(Line::new(Point::new(25.0, 100.0), Point::new(25.0, 50.0)))
        );
        assert_eq!(node.children[1].style.stroke, Some(Paint::Color(css::WHITE)));
    }

    #[test]
    fn all_endpoints_are_required() {
        let err = link(data([json!({})]), LinkOptions::default().with_x1("a")).unwrap_err();
        assert_eq!(
            err,
            Error::MissingChannel {
                mark: "link",
                channel: "y1"
            }
        );
    }
}
