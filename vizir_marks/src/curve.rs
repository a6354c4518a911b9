// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Named curve interpolators for lines and areas.
//!
//! Points are given as `Option<Point>`; `None` marks an undefined datum. Each run of
//! consecutive defined points is traced as its own subpath, so a line breaks at missing
//! values instead of interpolating across them.

extern crate alloc;

use alloc::string::ToString;
use alloc::vec::Vec;
use core::str::FromStr;

use kurbo::{BezPath, Point};

use crate::error::Error;

/// A curve interpolator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Curve {
    /// Straight segments.
    #[default]
    Linear,
    /// Straight segments, each run closed back to its start.
    LinearClosed,
    /// Steps halfway between points.
    Step,
    /// Steps at the start of each interval.
    StepBefore,
    /// Steps at the end of each interval.
    StepAfter,
    /// Monotone cubic interpolation in `x`.
    MonotoneX,
}

impl Curve {
    /// Looks up a curve by name.
    pub fn from_name(name: &str) -> Result<Self, Error> {
        Ok(match name {
            "linear" => Self::Linear,
            "linear-closed" => Self::LinearClosed,
            "step" => Self::Step,
            "step-before" => Self::StepBefore,
            "step-after" => Self::StepAfter,
            "monotone-x" => Self::MonotoneX,
            _ => return Err(Error::UnknownCurve(name.to_string())),
        })
    }

    fn step_t(self) -> Option<f64> {
        match self {
            Self::Step => Some(0.5),
            Self::StepBefore => Some(0.0),
            Self::StepAfter => Some(1.0),
            Self::Linear | Self::LinearClosed | Self::MonotoneX => None,
        }
    }

    /// The curve used to trace an area's baseline backwards.
    fn reversed(self) -> Self {
        match self {
            Self::StepBefore => Self::StepAfter,
            Self::StepAfter => Self::StepBefore,
            other => other,
        }
    }
}

impl FromStr for Curve {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

/// Traces a line through `points`.
pub fn line_path(points: &[Option<Point>], curve: Curve) -> BezPath {
    let mut path = BezPath::new();
    for run in runs(points) {
        let run: Vec<Point> = run.iter().flatten().copied().collect();
        let count = trace(&mut path, &run, curve, false);
        if curve == Curve::LinearClosed || count == 1 {
            path.close_path();
        }
    }
    path
}

/// Traces an area through `(baseline, topline)` point pairs.
///
/// For each run, the topline is traced forward and the baseline backward, then the shape is
/// closed.
pub fn area_path(points: &[Option<(Point, Point)>], curve: Curve) -> BezPath {
    let mut path = BezPath::new();
    for run in runs(points) {
        let top: Vec<Point> = run.iter().flatten().map(|&(_, top)| top).collect();
        let base: Vec<Point> = run.iter().flatten().rev().map(|&(base, _)| base).collect();
        if curve == Curve::LinearClosed {
            trace(&mut path, &top, curve, false);
            path.close_path();
            trace(&mut path, &base, curve, false);
        } else {
            trace(&mut path, &top, curve, false);
            trace(&mut path, &base, curve.reversed(), true);
        }
        path.close_path();
    }
    path
}

/// Splits `points` into maximal runs of `Some`.
fn runs<T>(points: &[Option<T>]) -> impl Iterator<Item = &[Option<T>]> + '_ {
    points
        .split(Option::is_none)
        .filter(|run| !run.is_empty())
}

/// Appends one run to `path`; `connect` joins it to the current subpath instead of starting a
/// new one. Returns the number of points the interpolator accepted (capped at 3).
fn trace(path: &mut BezPath, points: &[Point], curve: Curve, connect: bool) -> usize {
    if let Some(t) = curve.step_t() {
        return step(path, points, t, connect);
    }
    match curve {
        Curve::MonotoneX => monotone_x(path, points, connect),
        _ => {
            for (i, &p) in points.iter().enumerate() {
                start_or_line(path, p, i == 0 && !connect);
            }
            points.len().min(3)
        }
    }
}

fn start_or_line(path: &mut BezPath, p: Point, start: bool) {
    if start {
        path.move_to(p);
    } else {
        path.line_to(p);
    }
}

fn step(path: &mut BezPath, points: &[Point], t: f64, connect: bool) -> usize {
    let mut prev: Option<Point> = None;
    for &p in points {
        match prev {
            None => start_or_line(path, p, !connect),
            Some(q) if t <= 0.0 => {
                path.line_to((q.x, p.y));
                path.line_to(p);
            }
            Some(q) => {
                let x = q.x * (1.0 - t) + p.x * t;
                path.line_to((x, q.y));
                path.line_to((x, p.y));
            }
        }
        prev = Some(p);
    }
    if let Some(last) = prev
        && 0.0 < t
        && t < 1.0
        && points.len() >= 2
    {
        path.line_to(last);
    }
    points.len().min(3)
}

fn sign(x: f64) -> f64 {
    if x < 0.0 { -1.0 } else { 1.0 }
}

/// Nonzero divisor, signed like the neighboring interval when the interval is empty.
fn interval(h: f64, other: f64) -> f64 {
    if h != 0.0 {
        h
    } else if other < 0.0 {
        -0.0
    } else {
        0.0
    }
}

/// Tangent at `p1` from both neighbors (Steffen 1990).
fn slope3(p0: Point, p1: Point, p2: Point) -> f64 {
    let h0 = p1.x - p0.x;
    let h1 = p2.x - p1.x;
    let s0 = (p1.y - p0.y) / interval(h0, h1);
    let s1 = (p2.y - p1.y) / interval(h1, h0);
    let p = (s0 * h1 + s1 * h0) / (h0 + h1);
    let t = (sign(s0) + sign(s1)) * s0.abs().min(s1.abs()).min(0.5 * p.abs());
    if t.is_nan() { 0.0 } else { t }
}

/// One-sided tangent at an end point, given the tangent `t` at the other end.
fn slope2(p0: Point, p1: Point, t: f64) -> f64 {
    let h = p1.x - p0.x;
    if h != 0.0 {
        (3.0 * (p1.y - p0.y) / h - t) / 2.0
    } else {
        t
    }
}

fn hermite(path: &mut BezPath, p0: Point, p1: Point, t0: f64, t1: f64) {
    let dx = (p1.x - p0.x) / 3.0;
    path.curve_to(
        Point::new(p0.x + dx, p0.y + dx * t0),
        Point::new(p1.x - dx, p1.y - dx * t1),
        p1,
    );
}

fn monotone_x(path: &mut BezPath, points: &[Point], connect: bool) -> usize {
    let nan = Point::new(f64::NAN, f64::NAN);
    let (mut p0, mut p1) = (nan, nan);
    let mut t0 = f64::NAN;
    let mut state = 0;
    for &p in points {
        if p == p1 {
            continue;
        }
        let mut t1 = f64::NAN;
        match state {
            0 => {
                state = 1;
                start_or_line(path, p, !connect);
            }
            1 => state = 2,
            2 => {
                state = 3;
                t1 = slope3(p0, p1, p);
                hermite(path, p0, p1, slope2(p0, p1, t1), t1);
            }
            _ => {
                t1 = slope3(p0, p1, p);
                hermite(path, p0, p1, t0, t1);
            }
        }
        p0 = p1;
        p1 = p;
        t0 = t1;
    }
    match state {
        2 => path.line_to(p1),
        3 => hermite(path, p0, p1, t0, slope2(p0, p1, t0)),
        _ => {}
    }
    state
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use kurbo::PathEl;

    use super::*;

    fn pt(x: f64, y: f64) -> Option<Point> {
        Some(Point::new(x, y))
    }

    #[test]
    fn names_resolve_and_unknown_names_fail() {
        assert_eq!(Curve::from_name("step-after"), Ok(Curve::StepAfter));
        assert_eq!("monotone-x".parse::<Curve>(), Ok(Curve::MonotoneX));
        assert_eq!(
            Curve::from_name("basis"),
            Err(Error::UnknownCurve("basis".into()))
        );
    }

    #[test]
    fn undefined_points_break_the_line() {
        let points = [pt(0.0, 0.0), pt(1.0, 1.0), None, pt(2.0, 2.0), pt(3.0, 3.0)];
        let path = line_path(&points, Curve::Linear);
        let moves = path
            .elements()
            .iter()
            .filter(|el| matches!(el, PathEl::MoveTo(_)))
            .count();
        assert_eq!(moves, 2);
    }

    #[test]
    fn single_point_runs_are_closed() {
        let path = line_path(&[pt(1.0, 2.0)], Curve::Linear);
        assert_eq!(
            path.elements(),
            &[PathEl::MoveTo(Point::new(1.0, 2.0)), PathEl::ClosePath]
        );
    }

    #[test]
    fn step_turns_halfway() {
        let path = line_path(&[pt(0.0, 0.0), pt(2.0, 4.0)], Curve::Step);
        assert_eq!(
            path.elements(),
            &[
                PathEl::MoveTo(Point::new(0.0, 0.0)),
                PathEl::LineTo(Point::new(1.0, 0.0)),
                PathEl::LineTo(Point::new(1.0, 4.0)),
                PathEl::LineTo(Point::new(2.0, 4.0)),
            ]
        );
    }

    #[test]
    fn step_after_holds_the_previous_value() {
        let path = line_path(&[pt(0.0, 0.0), pt(2.0, 4.0)], Curve::StepAfter);
        assert_eq!(
            path.elements(),
            &[
                PathEl::MoveTo(Point::new(0.0, 0.0)),
                PathEl::LineTo(Point::new(2.0, 0.0)),
                PathEl::LineTo(Point::new(2.0, 4.0)),
            ]
        );
    }

    #[test]
    fn monotone_passes_through_every_point() {
        let points = vec![pt(0.0, 0.0), pt(1.0, 2.0), pt(2.0, 1.0), pt(3.0, 3.0)];
        let path = line_path(&points, Curve::MonotoneX);
        let ends: Vec<Point> = path
            .elements()
            .iter()
            .filter_map(|el| el.end_point())
            .collect();
        let expected: Vec<Point> = points.iter().flatten().copied().collect();
        assert_eq!(ends, expected);
    }

    #[test]
    fn area_traces_topline_then_baseline_backwards() {
        let pairs = [
            Some((Point::new(0.0, 10.0), Point::new(0.0, 5.0))),
            Some((Point::new(1.0, 10.0), Point::new(1.0, 3.0))),
        ];
        let path = area_path(&pairs, Curve::Linear);
        assert_eq!(
            path.elements(),
            &[
                PathEl::MoveTo(Point::new(0.0, 5.0)),
                PathEl::LineTo(Point::new(1.0, 3.0)),
                PathEl::LineTo(Point::new(1.0, 10.0)),
                PathEl::LineTo(Point::new(0.0, 10.0)),
                PathEl::ClosePath,
            ]
        );
    }
}
