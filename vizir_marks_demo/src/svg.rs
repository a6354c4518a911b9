// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimal SVG serialization of rendered node trees.

use kurbo::{Cap, Join};
use peniko::Mix;
use vizir_marks::{Dimensions, Node, Paint, Shape, Style};

/// Serializes a rendered plot as a standalone SVG document.
pub(crate) fn to_svg_string(root: &Node, dimensions: &Dimensions) -> String {
    let mut out = String::new();
    out.push_str(r#"<svg xmlns="http://www.w3.org/2000/svg" "#);
    out.push_str(&format!(
        r#"viewBox="0 0 {w} {h}" width="{w}" height="{h}" fill="currentColor" font-family="system-ui, sans-serif">"#,
        w = dimensions.width,
        h = dimensions.height,
    ));
    out.push('\n');
    write_node(&mut out, root, 1);
    out.push_str("</svg>\n");
    out
}

fn write_node(out: &mut String, node: &Node, depth: usize) {
    let indent = "  ".repeat(depth);
    out.push_str(&indent);
    let tag = match &node.shape {
        Shape::Group => {
            out.push_str("<g");
            "g"
        }
        Shape::Path(path) => {
            out.push_str(&format!(r#"<path d="{}""#, path.to_svg()));
            "path"
        }
        Shape::Circle(c) => {
            out.push_str(&format!(
                r#"<circle cx="{}" cy="{}" r="{}""#,
                c.center.x, c.center.y, c.radius
            ));
            "circle"
        }
        Shape::Line(l) => {
            out.push_str(&format!(
                r#"<line x1="{}" y1="{}" x2="{}" y2="{}""#,
                l.p0.x, l.p0.y, l.p1.x, l.p1.y
            ));
            "line"
        }
        Shape::Rect(r) => {
            out.push_str(&format!(
                r#"<rect x="{}" y="{}" width="{}" height="{}""#,
                r.x0,
                r.y0,
                r.width(),
                r.height()
            ));
            "rect"
        }
    };
    if let Some(t) = node.transform {
        out.push_str(&format!(r#" transform="translate({},{})""#, t.x, t.y));
    }
    write_style(out, &node.style);

    if node.children.is_empty() && node.title.is_none() {
        out.push_str("/>\n");
        return;
    }
    out.push('>');
    if let Some(title) = &node.title {
        out.push_str(&format!("<title>{}</title>", escape_xml(title)));
    }
    if !node.children.is_empty() {
        out.push('\n');
        for child in &node.children {
            write_node(out, child, depth + 1);
        }
        out.push_str(&indent);
    }
    out.push_str(&format!("</{tag}>\n"));
}

fn write_style(out: &mut String, style: &Style) {
    if let Some(paint) = &style.fill {
        write_paint_attr(out, "fill", paint);
    }
    if let Some(o) = style.fill_opacity {
        out.push_str(&format!(r#" fill-opacity="{o}""#));
    }
    if let Some(paint) = &style.stroke {
        write_paint_attr(out, "stroke", paint);
    }
    if let Some(w) = style.stroke_width {
        out.push_str(&format!(r#" stroke-width="{w}""#));
    }
    if let Some(o) = style.stroke_opacity {
        out.push_str(&format!(r#" stroke-opacity="{o}""#));
    }
    if let Some(join) = style.stroke_linejoin {
        let join = match join {
            Join::Bevel => "bevel",
            Join::Miter => "miter",
            Join::Round => "round",
        };
        out.push_str(&format!(r#" stroke-linejoin="{join}""#));
    }
    if let Some(cap) = style.stroke_linecap {
        let cap = match cap {
            Cap::Butt => "butt",
            Cap::Square => "square",
            Cap::Round => "round",
        };
        out.push_str(&format!(r#" stroke-linecap="{cap}""#));
    }
    if let Some(m) = style.stroke_miterlimit {
        out.push_str(&format!(r#" stroke-miterlimit="{m}""#));
    }
    if let Some(dashes) = &style.stroke_dasharray {
        let dashes: Vec<String> = dashes.iter().map(f64::to_string).collect();
        out.push_str(&format!(r#" stroke-dasharray="{}""#, dashes.join(",")));
    }
    if let Some(mode) = style.mix_blend_mode {
        out.push_str(&format!(
            r#" style="mix-blend-mode:{}""#,
            blend_mode_name(mode)
        ));
    }
}

fn blend_mode_name(mode: Mix) -> &'static str {
    match mode {
        Mix::Multiply => "multiply",
        Mix::Screen => "screen",
        Mix::Overlay => "overlay",
        Mix::Darken => "darken",
        Mix::Lighten => "lighten",
        Mix::ColorDodge => "color-dodge",
        Mix::ColorBurn => "color-burn",
        Mix::HardLight => "hard-light",
        Mix::SoftLight => "soft-light",
        Mix::Difference => "difference",
        Mix::Exclusion => "exclusion",
        Mix::Hue => "hue",
        Mix::Saturation => "saturation",
        Mix::Color => "color",
        Mix::Luminosity => "luminosity",
        _ => "normal",
    }
}

fn svg_paint(paint: &Paint) -> (String, Option<f64>) {
    match paint {
        Paint::Color(color) => {
            let rgba = color.to_rgba8();
            let value = format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b);
            let opacity = if rgba.a == 255 {
                None
            } else {
                Some(f64::from(rgba.a) / 255.0)
            };
            (value, opacity)
        }
        Paint::CurrentColor => ("currentColor".to_string(), None),
        Paint::None => ("none".to_string(), None),
    }
}

fn write_paint_attr(out: &mut String, name: &str, paint: &Paint) {
    let (value, opacity) = svg_paint(paint);
    out.push_str(&format!(r#" {name}="{value}""#));
    if let Some(o) = opacity {
        out.push_str(&format!(r#" {name}-opacity="{o}""#));
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use kurbo::{Circle, Vec2};
    use peniko::color::palette::css;

    use super::*;

    #[test]
    fn groups_carry_transform_and_style() {
        let root = Node::group()
            .style(Style::default().with_stroke(Paint::CurrentColor))
            .transform(Some(Vec2::new(0.0, 12.5)))
            .child(
                Node::builder(Shape::Circle(Circle::new((1.0, 2.0), 3.0)))
                    .style(Style::default().with_fill(css::RED))
                    .title(Some("a < b".to_string()))
                    .build(),
            )
            .build();
        let svg = to_svg_string(&root, &Dimensions::new(100.0, 50.0));
        assert!(
            svg.contains(r#"<g transform="translate(0,12.5)" stroke="currentColor">"#),
            "{svg}"
        );
        assert!(
            svg.contains(r##"<circle cx="1" cy="2" r="3" fill="#ff0000"><title>a &lt; b</title></circle>"##),
            "{svg}"
        );
    }
}
