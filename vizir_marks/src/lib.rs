// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A declarative mark layer: data plus visual encodings in, detached render nodes out.
//!
//! Each mark binds a dataset to named channels (`x`, `y`, `fill`, ...). A render pass has
//! three strictly ordered steps:
//! - **Initialize**: every mark resolves its channels to one [`Value`] per datum
//!   ([`Mark::initialize`]).
//! - **Scale**: an orchestrator (not part of this crate) builds shared [`Scales`] from every
//!   mark's resolved channels.
//! - **Render**: every mark maps its values through the scales and returns a [`Node`] tree
//!   ([`Mark::render`]).
//!
//! Constant properties (`fill: "steelblue"`, `r: 4`) are separated from data-driven ones once,
//! at construction; see [`maybe_color`] and [`maybe_number`].
//!
//! [`FacetY`] composes marks into vertically stacked panels, re-running the render step of
//! every child per panel.

#![no_std]

extern crate alloc;

mod area_mark;
mod channel;
mod curve;
mod dot_mark;
mod error;
mod facet_mark;
#[cfg(test)]
mod facet_tests;
#[cfg(not(feature = "std"))]
mod float;
mod line_mark;
mod link_mark;
mod mark;
mod node;
mod rect_mark;
mod scale;
mod style;
mod value;

#[cfg(feature = "std")]
extern crate std;

pub use area_mark::{AreaMark, AreaOptions, area, area_x, area_y};
pub use channel::{
    Channel, ChannelSpec, ChannelValue, MaybeChannel, ResolvedChannels, ScaleRole, maybe_color,
    maybe_number,
};
pub use curve::{Curve, area_path, line_path};
pub use dot_mark::{DEFAULT_RADIUS, DotMark, DotOptions, dot, dot_x, dot_y};
pub use error::Error;
pub use facet_mark::{FacetY, FacetYOptions, facet_y};
pub use line_mark::{LineMark, LineOptions, line, line_x, line_y};
pub use link_mark::{LinkMark, LinkOptions, link};
pub use mark::{Mark, MarkCore, color_at, position_at, sort_by_z};
pub use node::{Node, NodeBuilder, Shape};
pub use rect_mark::{RectMark, RectOptions, rect, rect_x, rect_y};
pub use scale::{
    ColorScale, Dimensions, Scale, ScaleBand, ScaleLinear, ScalePoint, ScaleSqrt, Scales,
    auto_scale_range, infer_extent, infer_ordinal_domain,
};
pub use style::{Paint, Style, translate};
pub use value::{
    Data, Datum, GroupKey, Value, ascending, data, defined, group_index, positive, same_data,
    value_at,
};
