// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Plot demos for `vizir_marks`, written out as SVG files.
mod plot;
mod svg;

use env_logger::Env;
use kurbo::Join;
use peniko::color::palette::css;
use serde_json::json;
use vizir_marks::{
    AreaOptions, Curve, Data, Dimensions, DotOptions, FacetYOptions, LineOptions, LinkOptions,
    Mark, RectOptions, Style, area_y, data, dot, facet_y, line, link, rect_y,
};

use crate::plot::{Ramp, plot};

const PENGUINS: [(&str, Option<&str>, f64); 24] = [
    ("Adelie", Some("MALE"), 3750.0),
    ("Adelie", Some("FEMALE"), 3800.0),
    ("Adelie", Some("FEMALE"), 3250.0),
    ("Adelie", None, 3475.0),
    ("Adelie", Some("MALE"), 4675.0),
    ("Adelie", Some("FEMALE"), 3200.0),
    ("Adelie", Some("MALE"), 3900.0),
    ("Adelie", Some("FEMALE"), 3450.0),
    ("Chinstrap", Some("FEMALE"), 3500.0),
    ("Chinstrap", Some("MALE"), 3900.0),
    ("Chinstrap", Some("MALE"), 3650.0),
    ("Chinstrap", Some("FEMALE"), 3525.0),
    ("Chinstrap", Some("MALE"), 4050.0),
    ("Chinstrap", Some("FEMALE"), 2700.0),
    ("Chinstrap", Some("MALE"), 4150.0),
    ("Chinstrap", Some("FEMALE"), 3400.0),
    ("Gentoo", Some("FEMALE"), 4500.0),
    ("Gentoo", Some("MALE"), 5700.0),
    ("Gentoo", Some("FEMALE"), 4450.0),
    ("Gentoo", Some("MALE"), 5700.0),
    ("Gentoo", None, 4100.0),
    ("Gentoo", Some("MALE"), 6300.0),
    ("Gentoo", Some("FEMALE"), 4800.0),
    ("Gentoo", Some("MALE"), 5550.0),
];

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let demos: [(&str, fn() -> Vec<Box<dyn Mark>>, Ramp); 3] = [
        (
            "seattle-temperature-band.svg",
            temperature_band_demo,
            Ramp(css::STEEL_BLUE, css::FIREBRICK),
        ),
        ("penguin-mass-sex.svg", penguin_facet_demo, Ramp::default()),
        (
            "penguin-mass-histogram.svg",
            penguin_histogram_demo,
            Ramp::default(),
        ),
    ];

    let dimensions = Dimensions::default();
    for (file, build, ramp) in demos {
        let marks = build();
        let root = match plot(&marks, &dimensions, ramp) {
            Ok(root) => root,
            Err(err) => {
                log::error!("{file}: {err}");
                continue;
            }
        };
        std::fs::write(file, svg::to_svg_string(&root, &dimensions)).expect("write svg");
        println!("wrote {file}");
    }
}

fn seattle_weather() -> Data {
    data((0..120).map(|day| {
        let t = f64::from(day) / 120.0 * std::f64::consts::TAU;
        let mean = 11.0 - 6.0 * t.cos();
        let spread = 3.5 + f64::from((day * 37) % 11) / 4.0;
        // A sensor gap: the band and the mean line break here.
        if (40..43).contains(&day) {
            json!({"date": day, "temp_min": null, "temp_max": null})
        } else {
            json!({
                "date": day,
                "temp_min": mean - spread,
                "temp_max": mean + spread,
                "temp_mean": mean,
            })
        }
    }))
}

fn temperature_band_demo() -> Vec<Box<dyn Mark>> {
    let weather = seattle_weather();
    let band = area_y(
        weather.clone(),
        AreaOptions::default()
            .with_x("date")
            .with_y1("temp_min")
            .with_y2("temp_max")
            .with_fill("#d8dce8")
            .with_curve(Curve::MonotoneX),
    );
    let rules = link(
        weather.clone(),
        LinkOptions::default()
            .with_x1("date")
            .with_x2("date")
            .with_y1("temp_min")
            .with_y2("temp_max")
            .with_stroke("temp_min"),
    );
    let mean = line(
        weather,
        LineOptions::default()
            .with_x("date")
            .with_y("temp_mean")
            .with_curve(Curve::MonotoneX)
            .with_style(Style::default().with_stroke_linejoin(Join::Round)),
    );
    collect_marks([
        band.map(|m| Box::new(m) as Box<dyn Mark>),
        rules.map(|m| Box::new(m) as Box<dyn Mark>),
        mean.map(|m| Box::new(m) as Box<dyn Mark>),
    ])
}

fn penguins() -> Data {
    data(PENGUINS.iter().enumerate().map(|(i, (species, sex, mass))| {
        json!({
            "name": format!("{species} #{i}"),
            "species": species,
            "sex": sex,
            "body_mass_g": mass,
        })
    }))
}

fn penguin_facet_demo() -> Vec<Box<dyn Mark>> {
    let penguins = penguins();

    // One reference rule per species, spanning its mass range; repeated in every panel.
    let mut ranges: Vec<(&str, f64, f64)> = Vec::new();
    for (species, _, mass) in PENGUINS {
        match ranges.iter_mut().find(|(s, ..)| *s == species) {
            Some((_, lo, hi)) => {
                *lo = lo.min(mass);
                *hi = hi.max(mass);
            }
            None => ranges.push((species, mass, mass)),
        }
    }
    let ranges = data(
        ranges
            .into_iter()
            .map(|(species, lo, hi)| json!({"species": species, "lo": lo, "hi": hi})),
    );

    let children = collect_marks([
        link(
            ranges,
            LinkOptions::default()
                .with_x1("lo")
                .with_x2("hi")
                .with_y1("species")
                .with_y2("species")
                .with_style(Style::default().with_stroke_opacity(0.3)),
        )
        .map(|m| Box::new(m) as Box<dyn Mark>),
        dot(
            penguins.clone(),
            DotOptions::default()
                .with_x("body_mass_g")
                .with_y("species")
                .with_fill("species")
                .with_title("name"),
        )
        .map(|m| Box::new(m) as Box<dyn Mark>),
    ]);
    collect_marks([
        facet_y(penguins, FacetYOptions::default().with_y("sex"), children)
            .map(|m| Box::new(m) as Box<dyn Mark>),
    ])
}

fn penguin_histogram_demo() -> Vec<Box<dyn Mark>> {
    const WIDTH: f64 = 500.0;
    let mut bins: Vec<(f64, u32)> = Vec::new();
    for (_, _, mass) in PENGUINS {
        let lo = (mass / WIDTH).floor() * WIDTH;
        match bins.iter_mut().find(|(l, _)| *l == lo) {
            Some((_, count)) => *count += 1,
            None => bins.push((lo, 1)),
        }
    }
    let bins = data(
        bins.into_iter()
            .map(|(lo, count)| json!({"lo": lo, "hi": lo + WIDTH, "count": count})),
    );
    collect_marks([rect_y(
        bins,
        RectOptions::default()
            .with_x1("lo")
            .with_x2("hi")
            .with_y("count")
            .with_insets(0.0, 0.5, 0.0, 0.5)
            .with_style(Style::default().with_fill(css::STEEL_BLUE)),
    )
    .map(|m| Box::new(m) as Box<dyn Mark>)])
}

/// Keeps the marks that were built, logging the ones that were rejected.
fn collect_marks<const N: usize>(
    marks: [Result<Box<dyn Mark>, vizir_marks::Error>; N],
) -> Vec<Box<dyn Mark>> {
    marks
        .into_iter()
        .filter_map(|mark| mark.map_err(|err| log::warn!("skipping mark: {err}")).ok())
        .collect()
}
