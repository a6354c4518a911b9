// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Channel declaration and resolution.
//!
//! A channel binds a named visual role (`x`, `fill`, ...) to a [`ChannelValue`] and, optionally,
//! to the shared scale its values feed. Marks declare [`ChannelSpec`]s at construction; the
//! orchestrator calls `initialize()` to materialize them into [`Channel`]s with one [`Value`]
//! per datum.

extern crate alloc;

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use crate::error::Error;
use crate::style::Paint;
use crate::value::{Datum, Value};

type AccessorFn = dyn Fn(&Datum, usize) -> Value + Send + Sync;

/// A user-supplied channel value.
#[derive(Clone)]
pub enum ChannelValue {
    /// The same value for every datum.
    Constant(Value),
    /// Reads a named field from object records.
    Field(Arc<str>),
    /// Precomputed values addressed by datum index.
    Values(Arc<[Value]>),
    /// Computes a value from `(datum, index)`.
    Accessor(Arc<AccessorFn>),
    /// The datum itself.
    Identity,
    /// The datum's index.
    Index,
    /// The number `0`.
    Zero,
    /// Element `0` of a tuple record.
    First,
    /// Element `1` of a tuple record.
    Second,
}

impl ChannelValue {
    /// Wraps a closure as an accessor channel.
    pub fn accessor(f: impl Fn(&Datum, usize) -> Value + Send + Sync + 'static) -> Self {
        Self::Accessor(Arc::new(f))
    }

    /// Resolves one value per datum.
    ///
    /// [`ChannelValue::Values`] is used verbatim, so its length may differ from `data`.
    pub fn resolve(&self, data: &[Datum]) -> Arc<[Value]> {
        match self {
            Self::Constant(v) => data.iter().map(|_| v.clone()).collect(),
            Self::Field(name) => data
                .iter()
                .map(|d| d.get(&**name).map_or(Value::Undefined, Value::from_json))
                .collect(),
            Self::Values(values) => values.clone(),
            Self::Accessor(f) => data.iter().enumerate().map(|(i, d)| f(d, i)).collect(),
            Self::Identity => data.iter().map(Value::from_json).collect(),
            Self::Index => (0..data.len()).map(|i| Value::Number(i as f64)).collect(),
            Self::Zero => data.iter().map(|_| Value::Number(0.0)).collect(),
            Self::First => data.iter().map(|d| nth(d, 0)).collect(),
            Self::Second => data.iter().map(|d| nth(d, 1)).collect(),
        }
    }

    /// The label a guide would show for this channel.
    pub fn label(&self) -> Option<Arc<str>> {
        match self {
            Self::Field(name) => Some(name.clone()),
            _ => None,
        }
    }
}

fn nth(d: &Datum, i: usize) -> Value {
    d.get(i).map_or(Value::Undefined, Value::from_json)
}

impl fmt::Debug for ChannelValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(v) => f.debug_tuple("Constant").field(v).finish(),
            Self::Field(name) => f.debug_tuple("Field").field(name).finish(),
            Self::Values(values) => f.debug_tuple("Values").field(&values.len()).finish(),
            Self::Accessor(_) => f.write_str("Accessor(<fn>)"),
            Self::Identity => f.write_str("Identity"),
            Self::Index => f.write_str("Index"),
            Self::Zero => f.write_str("Zero"),
            Self::First => f.write_str("First"),
            Self::Second => f.write_str("Second"),
        }
    }
}

impl From<&str> for ChannelValue {
    fn from(value: &str) -> Self {
        Self::Field(Arc::from(value))
    }
}

impl From<String> for ChannelValue {
    fn from(value: String) -> Self {
        Self::Field(Arc::from(value))
    }
}

impl From<f64> for ChannelValue {
    fn from(value: f64) -> Self {
        Self::Constant(Value::Number(value))
    }
}

impl From<bool> for ChannelValue {
    fn from(value: bool) -> Self {
        Self::Constant(Value::Bool(value))
    }
}

impl From<Value> for ChannelValue {
    fn from(value: Value) -> Self {
        Self::Constant(value)
    }
}

impl From<Vec<Value>> for ChannelValue {
    fn from(values: Vec<Value>) -> Self {
        Self::Values(values.into())
    }
}

/// The shared scale a channel's values feed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScaleRole {
    /// Horizontal position.
    X,
    /// Vertical position.
    Y,
    /// Vertical position inside a facet panel.
    Fy,
    /// Radius.
    R,
    /// Fill or stroke color.
    Color,
}

impl fmt::Display for ScaleRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Fy => "fy",
            Self::R => "r",
            Self::Color => "color",
        })
    }
}

/// A channel declared by a mark.
#[derive(Clone, Debug)]
pub struct ChannelSpec {
    /// Channel name.
    pub name: &'static str,
    /// Bound value, if any.
    pub value: Option<ChannelValue>,
    /// Scale fed by this channel (`None` for raw channels such as `z` or `title`).
    pub scale: Option<ScaleRole>,
    /// Whether the channel may be left unset.
    pub optional: bool,
    /// Hint that the scale should be a band scale.
    pub band: bool,
}

impl ChannelSpec {
    /// Declares a required, unscaled channel.
    pub fn new(name: &'static str, value: Option<ChannelValue>) -> Self {
        Self {
            name,
            value,
            scale: None,
            optional: false,
            band: false,
        }
    }

    /// Binds the channel to a scale.
    pub fn with_scale(mut self, scale: ScaleRole) -> Self {
        self.scale = Some(scale);
        self
    }

    /// Marks the channel as optional.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Hints that the channel's scale is a band scale.
    pub fn band(mut self) -> Self {
        self.band = true;
        self
    }
}

/// A channel materialized against a mark's data.
#[derive(Clone, Debug, PartialEq)]
pub struct Channel {
    /// Channel name.
    pub name: &'static str,
    /// Scale fed by this channel.
    pub scale: Option<ScaleRole>,
    /// Band scale hint.
    pub band: bool,
    /// Label for guides (the field name for field channels).
    pub label: Option<Arc<str>>,
    /// One value per datum.
    pub values: Arc<[Value]>,
}

/// The channels a mark resolved in `initialize()`.
///
/// Composite marks (facets) carry their children's resolved channels in `children`, in child
/// order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResolvedChannels {
    /// Number of data records the channels were resolved against.
    pub len: usize,
    /// The mark's own channels.
    pub channels: Vec<Channel>,
    /// Resolved channels of child marks.
    pub children: Vec<ResolvedChannels>,
}

impl ResolvedChannels {
    /// Returns the values of a channel, if it was declared and set.
    pub fn get(&self, name: &str) -> Option<&[Value]> {
        self.channel(name).map(|c| &*c.values)
    }

    /// Returns a channel by name.
    pub fn channel(&self, name: &str) -> Option<&Channel> {
        self.channels.iter().find(|c| c.name == name)
    }

    /// Returns the values of a channel the mark cannot render without.
    pub fn require(&self, mark: &'static str, name: &'static str) -> Result<&[Value], Error> {
        self.get(name).ok_or(Error::MissingValues {
            mark,
            channel: name,
        })
    }

    /// Iterates over this mark's channels and, recursively, its children's.
    pub fn all_channels(&self) -> impl Iterator<Item = &Channel> + '_ {
        let mut out: Vec<&Channel> = self.channels.iter().collect();
        for child in &self.children {
            out.extend(child.all_channels());
        }
        out.into_iter()
    }

    /// Moves every channel bound to `from` onto `to`, recursively.
    pub fn remap_scale(mut self, from: ScaleRole, to: ScaleRole) -> Self {
        for channel in &mut self.channels {
            if channel.scale == Some(from) {
                channel.scale = Some(to);
            }
        }
        self.children = self
            .children
            .into_iter()
            .map(|c| c.remap_scale(from, to))
            .collect();
        self
    }

    /// Checks that the named channels, where present, all have the same length.
    pub fn check_lengths(&self, mark: &'static str, names: &[&'static str]) -> Result<(), Error> {
        let mut first: Option<(&'static str, usize)> = None;
        for &name in names {
            let Some(values) = self.get(name) else {
                continue;
            };
            match first {
                None => first = Some((name, values.len())),
                Some((a, a_len)) if a_len != values.len() => {
                    return Err(Error::LengthMismatch {
                        mark,
                        a,
                        a_len,
                        b: name,
                        b_len: values.len(),
                    });
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}

/// Either a constant resolved at construction, or a channel resolved per datum.
#[derive(Clone, Debug)]
pub enum MaybeChannel<T> {
    /// A constant style property.
    Constant(T),
    /// A scaled channel.
    Channel(ChannelValue),
}

impl<T> MaybeChannel<T> {
    /// Splits an optional classification into `(channel, constant)`; at most one is set.
    pub fn split(this: Option<Self>) -> (Option<ChannelValue>, Option<T>) {
        match this {
            None => (None, None),
            Some(Self::Constant(c)) => (None, Some(c)),
            Some(Self::Channel(v)) => (Some(v), None),
        }
    }
}

/// Classifies a fill/stroke value as a constant paint or a color channel.
///
/// Strings (fields or text constants) that are `"none"`, `"currentColor"` or a CSS color are
/// constants; everything else is a channel. An unset value falls back to `default`. To read a
/// field whose name happens to be a color, use an accessor.
pub fn maybe_color(
    value: Option<ChannelValue>,
    default: Option<Paint>,
) -> Option<MaybeChannel<Paint>> {
    let Some(value) = value else {
        return default.map(MaybeChannel::Constant);
    };
    let text = match &value {
        ChannelValue::Field(name) => Some(&**name),
        ChannelValue::Constant(Value::Text(s)) => Some(&**s),
        _ => None,
    };
    match text.and_then(Paint::parse) {
        Some(paint) => Some(MaybeChannel::Constant(paint)),
        None => Some(MaybeChannel::Channel(value)),
    }
}

/// Classifies a value as a constant number or a channel.
///
/// Only numeric constants are constants; an unset value falls back to `default`.
pub fn maybe_number(value: Option<ChannelValue>, default: Option<f64>) -> Option<MaybeChannel<f64>> {
    match value {
        None => default.map(MaybeChannel::Constant),
        Some(ChannelValue::Constant(Value::Number(n))) => Some(MaybeChannel::Constant(n)),
        Some(value) => Some(MaybeChannel::Channel(value)),
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use peniko::color::palette::css;
    use serde_json::json;

    use super::*;

    fn records() -> Vec<Datum> {
        vec![
            json!({"x": 1, "name": "a"}),
            json!({"x": 2}),
            json!({"x": null, "name": "c"}),
        ]
    }

    #[test]
    fn fields_read_per_datum_and_missing_fields_are_undefined() {
        let values = ChannelValue::from("name").resolve(&records());
        assert_eq!(
            &*values,
            &[Value::from("a"), Value::Undefined, Value::from("c")]
        );
    }

    #[test]
    fn constants_broadcast_and_helpers_resolve() {
        let data = records();
        assert_eq!(
            &*ChannelValue::from(7.0).resolve(&data),
            vec![Value::Number(7.0); 3].as_slice()
        );
        assert_eq!(
            &*ChannelValue::Index.resolve(&data),
            &[Value::Number(0.0), Value::Number(1.0), Value::Number(2.0)]
        );
        assert_eq!(
            &*ChannelValue::Zero.resolve(&data),
            vec![Value::Number(0.0); 3].as_slice()
        );
    }

    #[test]
    fn tuples_destructure_positionally() {
        let data = vec![json!([1, "a"]), json!([2])];
        assert_eq!(
            &*ChannelValue::First.resolve(&data),
            &[Value::Number(1.0), Value::Number(2.0)]
        );
        assert_eq!(
            &*ChannelValue::Second.resolve(&data),
            &[Value::from("a"), Value::Undefined]
        );
    }

    #[test]
    fn accessors_see_datum_and_index() {
        let data = vec![json!(10), json!(20)];
        let values = ChannelValue::accessor(|d, i| {
            Value::Number(d.as_f64().unwrap_or(f64::NAN) + i as f64)
        })
        .resolve(&data);
        assert_eq!(&*values, &[Value::Number(10.0), Value::Number(21.0)]);
    }

    #[test]
    fn precomputed_values_are_used_verbatim() {
        let values = ChannelValue::from(vec![Value::Number(1.0)]).resolve(&records());
        assert_eq!(values.len(), 1);
    }

    fn rgba(paint: Option<Paint>) -> Option<(u8, u8, u8, u8)> {
        match paint {
            Some(Paint::Color(c)) => {
                let c = c.to_rgba8();
                Some((c.r, c.g, c.b, c.a))
            }
            _ => None,
        }
    }

    #[test]
    fn color_strings_become_constants() {
        let (channel, constant) = MaybeChannel::split(maybe_color(Some("red".into()), None));
        assert!(channel.is_none());
        assert_eq!(rgba(constant), rgba(Some(Paint::Color(css::RED))));

        let (_, constant) = MaybeChannel::split(maybe_color(Some("#00f".into()), None));
        assert_eq!(rgba(constant), Some((0, 0, 255, 255)));

        let (_, constant) = MaybeChannel::split(maybe_color(Some("currentColor".into()), None));
        assert_eq!(constant, Some(Paint::CurrentColor));
    }

    #[test]
    fn non_color_strings_become_channels() {
        let (channel, constant) = MaybeChannel::split(maybe_color(Some("species".into()), None));
        assert!(matches!(channel, Some(ChannelValue::Field(_))));
        assert!(constant.is_none());
    }

    #[test]
    fn unset_color_uses_default() {
        let (channel, constant) = MaybeChannel::split(maybe_color(None, Some(Paint::None)));
        assert!(channel.is_none());
        assert_eq!(constant, Some(Paint::None));
        assert!(maybe_color(None, None).is_none());
    }

    #[test]
    fn numbers_are_constants_and_fields_are_channels() {
        let (_, constant) = MaybeChannel::split(maybe_number(Some(4.0.into()), Some(3.0)));
        assert_eq!(constant, Some(4.0));
        let (_, constant) = MaybeChannel::split(maybe_number(None, Some(3.0)));
        assert_eq!(constant, Some(3.0));
        let (channel, constant) = MaybeChannel::split(maybe_number(Some("size".into()), Some(3.0)));
        assert!(channel.is_some());
        assert!(constant.is_none());
    }

    #[test]
    fn length_check_reports_the_mismatched_pair() {
        let resolved = ResolvedChannels {
            len: 2,
            channels: vec![
                Channel {
                    name: "x",
                    scale: Some(ScaleRole::X),
                    band: false,
                    label: None,
                    values: vec![Value::Number(0.0); 2].into(),
                },
                Channel {
                    name: "y",
                    scale: Some(ScaleRole::Y),
                    band: false,
                    label: None,
                    values: vec![Value::Number(0.0); 3].into(),
                },
            ],
            children: Vec::new(),
        };
        assert_eq!(
            resolved.check_lengths("line", &["x", "y", "z"]),
            Err(Error::LengthMismatch {
                mark: "line",
                a: "x",
                a_len: 2,
                b: "y",
                b_len: 3,
            })
        );
    }
}
