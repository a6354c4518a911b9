// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

extern crate std;

use alloc::boxed::Box;
use alloc::string::ToString;
use alloc::vec;
use alloc::vec::Vec;

use kurbo::{Circle, Line, Point, Vec2};
use serde_json::json;

use crate::{
    ChannelSpec, Data, Dimensions, DotOptions, Error, FacetYOptions, LinkOptions, Mark, Node,
    ResolvedChannels, Scale, ScaleBand, ScaleLinear, ScaleRole, Scales, Shape, Value, data,
    dot_x, facet_y, link,
};

/// A mark without data that reports the index it was handed in its title.
#[derive(Debug)]
struct IndexProbe;

impl Mark for IndexProbe {
    fn kind(&self) -> &'static str {
        "probe"
    }

    fn data(&self) -> Option<&Data> {
        None
    }

    fn channels(&self) -> &[ChannelSpec] {
        &[]
    }

    fn initialize(&self) -> Result<ResolvedChannels, Error> {
        Ok(ResolvedChannels::default())
    }

    fn render(
        &self,
        index: Option<&[usize]>,
        _scales: &Scales,
        _channels: &ResolvedChannels,
        _dimensions: &Dimensions,
    ) -> Result<Option<Node>, Error> {
        let title = index.map_or_else(|| "none".to_string(), |i| i.len().to_string());
        Ok(Some(Node::group().title(Some(title)).build()))
    }
}

fn penguins() -> Data {
    data([
        json!({"sex": "MALE", "mass": 1}),
        json!({"sex": "FEMALE", "mass": 3}),
        json!({"sex": "MALE", "mass": 2}),
    ])
}

fn band(keys: &[&str]) -> Scale {
    let keys: Vec<Value> = keys.iter().map(|&k| Value::from(k)).collect();
    Scale::Band(ScaleBand::new(keys, (0.0, 200.0)).with_padding(0.0, 0.0))
}

fn scales(keys: &[&str]) -> Scales {
    Scales::default()
        .with_x(Scale::Linear(ScaleLinear::new((0.0, 4.0), (0.0, 100.0))))
        .with_y(band(keys))
        .with_fy(Scale::Linear(ScaleLinear::new((0.0, 1.0), (0.0, 1.0))))
}

fn facet(penguins: &Data) -> Box<dyn Mark> {
    let dots = dot_x(penguins.clone(), DotOptions::default().with_x("mass")).unwrap();
    let rule = link(
        data([json!({"at": 0})]),
        LinkOptions::default()
            .with_x1("at")
            .with_x2("at")
            .with_y1(0.0)
            .with_y2(1.0),
    )
    .unwrap();
    let marks: Vec<Box<dyn Mark>> = vec![Box::new(dots), Box::new(rule), Box::new(IndexProbe)];
    Box::new(facet_y(penguins.clone(), FacetYOptions::default().with_y("sex"), marks).unwrap())
}

fn render(mark: &dyn Mark, scales: &Scales) -> Result<Option<Node>, Error> {
    let channels = mark.initialize()?;
    mark.render(None, scales, &channels, &Dimensions::default())
}

fn circles(node: &Node) -> Vec<Circle> {
    node.descendants()
        .filter_map(|n| match n.shape {
            Shape::Circle(c) => Some(c),
            _ => None,
        })
        .collect()
}

#[test]
fn child_y_channels_move_to_the_facet_scale() {
    let facet = facet(&penguins());
    let channels = facet.initialize().unwrap();
    let own = channels.channel("y").unwrap();
    assert_eq!(own.scale, Some(ScaleRole::Y));
    assert!(own.band);
    assert_eq!(channels.children.len(), 3);
    assert_eq!(
        channels.children[0].channel("x").unwrap().scale,
        Some(ScaleRole::X)
    );
    assert_eq!(
        channels.children[1].channel("y1").unwrap().scale,
        Some(ScaleRole::Fy)
    );
    assert!(
        channels
            .all_channels()
            .all(|c| c.name == "y" || c.scale != Some(ScaleRole::Y)),
        "only the facet key feeds the outer y scale"
    );
}

#[test]
fn panels_follow_the_scale_domain_not_discovery_order() {
    let node = render(&*facet(&penguins()), &scales(&["FEMALE", "MALE"]))
        .unwrap()
        .unwrap();
    assert_eq!(node.children.len(), 2);
    assert_eq!(node.children[0].transform, Some(Vec2::new(0.0, 0.0)));
    assert_eq!(node.children[1].transform, Some(Vec2::new(0.0, 100.0)));

    let female: Vec<f64> = circles(&node.children[0]).iter().map(|c| c.center.x).collect();
    let male: Vec<f64> = circles(&node.children[1]).iter().map(|c| c.center.x).collect();
    assert_eq!(female, [75.0]);
    assert_eq!(male, [25.0, 50.0]);
}

#[test]
fn panels_use_band_height_without_vertical_margins() {
    let node = render(&*facet(&penguins()), &scales(&["FEMALE", "MALE"]))
        .unwrap()
        .unwrap();
    let dots = circles(&node.children[0]);
    assert_eq!(dots[0].center, Point::new(75.0, 50.0));

    let Shape::Line(rule) = node.children[0].children[1].children[0].shape else {
        panic!("expected the rule in the second child slot");
    };
    assert_eq!(rule, Line::new((0.0, 100.0), (0.0, 0.0)));
}

#[test]
fn marks_with_other_data_repeat_in_every_panel() {
    let node = render(&*facet(&penguins()), &scales(&["FEMALE", "MALE"]))
        .unwrap()
        .unwrap();
    assert_eq!(
        node.children[0].children[1], node.children[1].children[1],
        "the rule is identical in both panels"
    );
}

#[test]
fn marks_without_data_get_no_index() {
    let node = render(&*facet(&penguins()), &scales(&["FEMALE", "MALE"]))
        .unwrap()
        .unwrap();
    for panel in &node.children {
        assert_eq!(panel.children[2].title.as_deref(), Some("none"));
    }
}

#[test]
fn keys_without_rows_render_empty_panels() {
    let node = render(&*facet(&penguins()), &scales(&["FEMALE", "MALE", "UNKNOWN"]))
        .unwrap()
        .unwrap();
    assert_eq!(node.children.len(), 3);
    assert!(circles(&node.children[2]).is_empty());
    assert_eq!(
        node.children[2].children[1], node.children[0].children[1],
        "marks with other data still render"
    );
}

#[test]
fn facet_key_needs_a_band_scale() {
    let scales = Scales {
        y: Some(Scale::Linear(ScaleLinear::new((0.0, 1.0), (0.0, 1.0)))),
        ..scales(&["FEMALE", "MALE"])
    };
    assert_eq!(
        render(&*facet(&penguins()), &scales),
        Err(Error::NotBandScale {
            mark: "facetY",
            scale: ScaleRole::Y
        })
    );
}

#[test]
fn facet_rendering_is_idempotent() {
    let facet = facet(&penguins());
    let scales = scales(&["FEMALE", "MALE"]);
    let channels = facet.initialize().unwrap();
    let a = facet.render(None, &scales, &channels, &Dimensions::default());
    let b = facet.render(None, &scales, &channels, &Dimensions::default());
    assert_eq!(a, b);
}

#[test]
fn children_without_y_need_no_facet_scale() {
    let penguins = penguins();
    let dots: Box<dyn Mark> =
        Box::new(dot_x(penguins.clone(), DotOptions::default().with_x("mass")).unwrap());
    let facet = facet_y(penguins, FacetYOptions::default().with_y("sex"), vec![dots]).unwrap();
    let scales = Scales {
        fy: None,
        ..scales(&["FEMALE", "MALE"])
    };
    let node = render(&facet, &scales).unwrap().unwrap();
    let centers: Vec<Point> = circles(&node).iter().map(|c| c.center).collect();
    assert_eq!(
        centers,
        [
            Point::new(75.0, 50.0),
            Point::new(25.0, 50.0),
            Point::new(50.0, 50.0)
        ],
        "dots sit mid-panel"
    );
}
