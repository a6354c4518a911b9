// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A tiny plot driver: initialize every mark, infer shared scales, render.

use peniko::Color;
use peniko::color::palette::css;
use vizir_marks::{
    ColorScale, Dimensions, Error, Mark, Node, ResolvedChannels, Scale, ScaleBand, ScaleLinear,
    ScalePoint, ScaleRole, ScaleSqrt, Scales, Value, auto_scale_range, infer_extent,
    infer_ordinal_domain,
};

const CATEGORICAL: [Color; 6] = [
    css::STEEL_BLUE,
    css::DARK_ORANGE,
    css::SEA_GREEN,
    css::CRIMSON,
    css::MEDIUM_PURPLE,
    css::SADDLE_BROWN,
];

/// Color range for numeric color channels, low to high.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Ramp(pub(crate) Color, pub(crate) Color);

impl Default for Ramp {
    fn default() -> Self {
        Self(css::STEEL_BLUE, css::FIREBRICK)
    }
}

/// Renders `marks` into one root group, sharing scales inferred from all of them.
pub(crate) fn plot(
    marks: &[Box<dyn Mark>],
    dimensions: &Dimensions,
    ramp: Ramp,
) -> Result<Node, Error> {
    let channels = marks
        .iter()
        .map(|mark| mark.initialize())
        .collect::<Result<Vec<_>, _>>()?;
    let scales = infer_scales(&channels, dimensions, ramp);

    let mut children = Vec::with_capacity(marks.len());
    for (mark, channels) in marks.iter().zip(&channels) {
        if let Some(node) = mark.render(None, &scales, channels, dimensions)? {
            children.push(node);
        }
    }
    log::info!(
        "rendered {} marks into {} nodes",
        marks.len(),
        children.iter().map(|n| n.descendants().count()).sum::<usize>()
    );
    Ok(Node::group().children(children).build())
}

fn infer_scales(channels: &[ResolvedChannels], dimensions: &Dimensions, ramp: Ramp) -> Scales {
    let mut scales = Scales::default();
    for role in [ScaleRole::X, ScaleRole::Y, ScaleRole::Fy] {
        let Some(scale) = position_scale(channels, role) else {
            continue;
        };
        let scale = match scale {
            // Discrete keys read top to bottom.
            Scale::Band(_) | Scale::Point(_) if role != ScaleRole::X => scale.with_range((
                dimensions.margin_top,
                dimensions.height - dimensions.margin_bottom,
            )),
            _ => auto_scale_range(&scale, role, dimensions),
        };
        log::debug!("{role} scale: {scale:?}");
        match role {
            ScaleRole::X => scales.x = Some(scale),
            ScaleRole::Y => scales.y = Some(scale),
            _ => scales.fy = Some(scale),
        }
    }

    let radii = values(channels, ScaleRole::R);
    if let Some((_, max)) = infer_extent(radii.iter().copied()) {
        scales.r = Some(Scale::Sqrt(ScaleSqrt::new((0.0, max), (0.0, 8.0))));
    }

    let colors = values(channels, ScaleRole::Color);
    if !colors.is_empty() {
        scales.color = Some(match infer_extent(colors.iter().copied()) {
            Some(domain) if colors.iter().all(|v| v.is_numeric()) => ColorScale::Sequential {
                domain,
                range: (ramp.0, ramp.1),
            },
            _ => ColorScale::Ordinal {
                domain: infer_ordinal_domain(colors.iter().copied()).into(),
                range: CATEGORICAL.into(),
            },
        });
    }
    scales
}

fn values(channels: &[ResolvedChannels], role: ScaleRole) -> Vec<&Value> {
    channels
        .iter()
        .flat_map(ResolvedChannels::all_channels)
        .filter(|c| c.scale == Some(role))
        .flat_map(|c| c.values.iter())
        .filter(|v| !matches!(v, Value::Undefined))
        .collect()
}

fn position_scale(channels: &[ResolvedChannels], role: ScaleRole) -> Option<Scale> {
    let band = channels
        .iter()
        .flat_map(ResolvedChannels::all_channels)
        .any(|c| c.scale == Some(role) && c.band);
    let values = values(channels, role);
    if values.is_empty() {
        return None;
    }
    if band {
        let keys = infer_ordinal_domain(values.iter().copied());
        return Some(Scale::Band(ScaleBand::new(keys, (0.0, 1.0))));
    }
    match infer_extent(values.iter().copied()) {
        Some(extent) if values.iter().all(|v| v.is_numeric()) => {
            Some(Scale::Linear(ScaleLinear::new(extent, (0.0, 1.0))))
        }
        _ => Some(Scale::Point(ScalePoint::new(
            infer_ordinal_domain(values.iter().copied()),
            (0.0, 1.0),
        ))),
    }
}
