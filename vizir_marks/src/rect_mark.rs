// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

extern crate alloc;

use alloc::vec;
use alloc::vec::Vec;

use kurbo::Rect;

use crate::channel::{ChannelSpec, ChannelValue, ResolvedChannels, ScaleRole};
use crate::error::Error;
use crate::mark::{Mark, MarkCore, color_at, sort_by_z};
use crate::node::{Node, Shape};
use crate::scale::{Dimensions, Scales};
use crate::style::Style;
use crate::value::{Data, value_at};

/// Options for [`RectMark`].
///
/// Unlike the other marks, `fill` and `stroke` are always color channels; constant paints go in
/// `style`.
#[derive(Clone, Debug, Default)]
pub struct RectOptions {
    /// Shorthand horizontal value (`x2` when `x2` is unset).
    pub x: Option<ChannelValue>,
    /// Shorthand vertical value (`y2` when `y2` is unset).
    pub y: Option<ChannelValue>,
    /// First horizontal edge.
    pub x1: Option<ChannelValue>,
    /// First vertical edge.
    pub y1: Option<ChannelValue>,
    /// Second horizontal edge.
    pub x2: Option<ChannelValue>,
    /// Second vertical edge.
    pub y2: Option<ChannelValue>,
    /// Stacking order key.
    pub z: Option<ChannelValue>,
    /// Fill color channel.
    pub fill: Option<ChannelValue>,
    /// Stroke color channel.
    pub stroke: Option<ChannelValue>,
    /// Pixels removed from the top edge.
    pub inset_top: f64,
    /// Pixels removed from the right edge.
    pub inset_right: f64,
    /// Pixels removed from the bottom edge.
    pub inset_bottom: f64,
    /// Pixels removed from the left edge.
    pub inset_left: f64,
    /// Constant presentation properties.
    pub style: Style,
}

impl RectOptions {
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

    /// Sets the first horizontal edge.
    pub fn with_x1(mut self, x1: impl Into<ChannelValue>) -> Self {
        self.x1 = Some(x1.into());
        self
    }

    /// Sets the first vertical edge.
    pub fn with_y1(mut self, y1: impl Into<ChannelValue>) -> Self {
        self.y1 = Some(y1.into());
        self
    }

    /// Sets the second horizontal edge.
    pub fn with_x2(mut self, x2: impl Into<ChannelValue>) -> Self {
        self.x2 = Some(x2.into());
        self
    }

    /// Sets the second vertical edge.
    pub fn with_y2(mut self, y2: impl Into<ChannelValue>) -> Self {
        self.y2 = Some(y2.into());
        self
    }

    /// Sets the stacking order key.
    pub fn with_z(mut self, z: impl Into<ChannelValue>) -> Self {
        self.z = Some(z.into());
        self
    }

    /// Sets the fill color channel.
    pub fn with_fill(mut self, fill: impl Into<ChannelValue>) -> Self {
        self.fill = Some(fill.into());
        self
    }

    /// Sets the stroke color channel.
    pub fn with_stroke(mut self, stroke: impl Into<ChannelValue>) -> Self {
        self.stroke = Some(stroke.into());
        self
    }

    /// Sets all four insets.
    pub fn with_insets(mut self, top: f64, right: f64, bottom: f64, left: f64) -> Self {
        self.inset_top = top;
        self.inset_right = right;
        self.inset_bottom = bottom;
        self.inset_left = left;
        self
    }

    /// Sets the constant presentation properties.
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

/// An axis-aligned rectangle per datum spanning two corners.
///
/// Corner order does not matter: swapped edges yield the same rectangle, and insets never
/// produce a negative size.
#[derive(Clone, Debug)]
pub struct RectMark {
    core: MarkCore,
    insets: [f64; 4],
    style: Style,
}

impl RectMark {
    /// Creates a rect mark.
    pub fn new(data: Data, options: RectOptions) -> Result<Self, Error> {
        let core = MarkCore::new(
            "rect",
            Some(data),
            vec![
                ChannelSpec::new("x1", options.x1).with_scale(ScaleRole::X),
                ChannelSpec::new("y1", options.y1).with_scale(ScaleRole::Y),
                ChannelSpec::new("x2", options.x2.or(options.x)).with_scale(ScaleRole::X),
                ChannelSpec::new("y2", options.y2.or(options.y)).with_scale(ScaleRole::Y),
                ChannelSpec::new("z", options.z).optional(),
                ChannelSpec::new("fill", options.fill)
                    .with_scale(ScaleRole::Color)
                    .optional(),
                ChannelSpec::new("stroke", options.stroke)
                    .with_scale(ScaleRole::Color)
                    .optional(),
            ],
        )?;
        Ok(Self {
            core,
            insets: [
                options.inset_top,
                options.inset_right,
                options.inset_bottom,
                options.inset_left,
            ],
            style: options.style,
        })
    }

    /// The constant style.
    pub fn style(&self) -> &Style {
        &self.style
    }
}

impl Mark for RectMark {
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
        let fill = channels.get("fill");
        let stroke = channels.get("stroke");
        let [top, right, bottom, left] = self.insets;

        let index = self.core.index(index, channels);
        let mut index = self
            .core
            .filter_defined(index, &[Some(x1), Some(y1), Some(x2), Some(y2)]);
        sort_by_z(&mut index, channels.get("z"));

        let mut rects = Vec::with_capacity(index.len());
        for i in index {
            let (ax, bx) = (x.map(value_at(x1, i)), x.map(value_at(x2, i)));
            let (ay, by) = (y.map(value_at(y1, i)), y.map(value_at(y2, i)));
            let x0 = ax.min(bx) + left;
            let y0 = ay.min(by) + top;
            let width = ((bx - ax).abs() - left - right).max(0.0);
            let height = ((by - ay).abs() - top - bottom).max(0.0);
            let mut style = self.style.direct();
            style.fill = color_at(kind, scales, fill, i)?;
            style.stroke = color_at(kind, scales, stroke, i)?;
            rects.push(
                Node::builder(Shape::Rect(Rect::new(x0, y0, x0 + width, y0 + height)))
                    .style(style)
                    .build(),
            );
        }

        Ok(Some(
            Node::group()
                .style(self.style.indirect())
                .children(rects)
                .build(),
        ))
    }
}

/// Creates a rect mark.
pub fn rect(data: Data, options: RectOptions) -> Result<RectMark, Error> {
    RectMark::new(data, options)
}

/// Creates a horizontal bar from zero: `x1 = 0`, `x2 = x`.
pub fn rect_x(data: Data, mut options: RectOptions) -> Result<RectMark, Error> {
    options.x1 = Some(ChannelValue::Zero);
    options.x2 = options.x.take().or(options.x2);
    RectMark::new(data, options)
}

/// Creates a vertical bar from zero: `y1 = 0`, `y2 = y`.
pub fn rect_y(data: Data, mut options: RectOptions) -> Result<RectMark, Error> {
    options.y1 = Some(ChannelValue::Zero);
    options.y2 = options.y.take().or(options.y2);
    RectMark::new(data, options)
}

#[cfg(test)]
mod tests {
    extern crate std;

    use serde_json::json;

    use super::*;
    use crate::scale::{Scale, ScaleLinear};
    use crate::value::data;

    fn scales() -> Scales {
        Scales::default()
            .with_x(Scale::Linear(ScaleLinear::new((0.0, 8.0), (0.0, 8.0))))
            .with_y(Scale::Linear(ScaleLinear::new((0.0, 8.0), (8.0, 0.0))))
    }

    fn rects(mark: &RectMark) -> Vec<Rect> {
        let channels = mark.initialize().unwrap();
        let node = mark
            .render(None, &scales(), &channels, &Dimensions::default())
            .unwrap()
            .unwrap();
        node.children
            .iter()
            .filter_map(|n| match n.shape {
                Shape::Rect(r) => Some(r),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn crossed_corners_are_normalized() {
        let options = |x1: f64, x2: f64| {
            RectOptions::default()
                .with_x1(x1)
                .with_x2(x2)
                .with_y1(0.0)
                .with_y2(4.0)
        };
        let swapped = rects(&rect(data([json!({})]), options(5.0, 2.0)).unwrap());
        assert_eq!(swapped, [Rect::new(2.0, 4.0, 5.0, 8.0)]);
        assert_eq!(swapped[0].width(), 3.0);
        let ordered = rects(&rect(data([json!({})]), options(2.0, 5.0)).unwrap());
        assert_eq!(swapped, ordered);

        let flipped = rects(
            &rect(
                data([json!({})]),
                options(2.0, 5.0).with_y1(4.0).with_y2(0.0),
            )
            .unwrap(),
        );
        assert_eq!(flipped, ordered, "swapping y1 and y2 gives the same rectangle");
    }

    #[test]
    fn insets_shrink_and_clamp() {
        let mark = rect_y(
            data([json!({"k": 1, "v": 4}), json!({"k": 2, "v": 0.25})]),
            RectOptions::default()
                .with_x1("k")
                .with_x2(ChannelValue::accessor(|d, _| {
                    crate::value::Value::Number(d["k"].as_f64().unwrap_or(f64::NAN) + 2.0)
                }))
                .with_y("v")
                .with_insets(0.5, 0.5, 0.0, 0.5),
        )
        .unwrap();
        let rects = rects(&mark);
        assert_eq!(rects[0], Rect::new(1.5, 4.5, 2.5, 8.0));
        assert_eq!(rects[1].height(), 0.0, "inset larger than the bar clamps to zero");
        assert!(rects.iter().all(|r| r.width() >= 0.0 && r.height() >= 0.0));
    }

    #[test]
    fn undefined_corners_are_skipped_and_z_orders() {
        let mark = rect_x(
            data([
                json!({"v": 3, "b": "z"}),
                json!({"v": null, "b": "a"}),
                json!({"v": 1, "b": "a"}),
            ]),
            RectOptions::default()
                .with_x("v")
                .with_y1(0.0)
                .with_y2(1.0)
                .with_z("b"),
        )
        .unwrap();
        let rects = rects(&mark);
        assert_eq!(rects.len(), 2);
        assert_eq!(rects[0].width(), 1.0);
        assert_eq!(rects[1].width(), 3.0);
    }

    #[test]
    fn fill_is_always_a_channel() {
        let mark = rect_y(
            data([json!({"v": 1})]),
            RectOptions::default()
                .with_x1(0.0)
                .with_x2(1.0)
                .with_y("v")
                .with_fill("red"),
        )
        .unwrap();
        let channels = mark.initialize().unwrap();
        assert!(channels.get("fill").is_some());
        assert_eq!(mark.style().fill, None);
    }
}
