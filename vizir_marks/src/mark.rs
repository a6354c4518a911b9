// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The mark contract and the channel plumbing shared by every mark.

extern crate alloc;

use alloc::vec::Vec;
use core::fmt;

use hashbrown::HashMap;

use crate::channel::{Channel, ChannelSpec, ResolvedChannels, ScaleRole};
use crate::error::Error;
use crate::node::Node;
use crate::scale::{Dimensions, Scales};
use crate::style::Paint;
use crate::value::{Data, Datum, Value, ascending, defined, value_at};

/// A visual encoding of a dataset.
///
/// The orchestrator drives a mark in three steps:
/// 1. [`Mark::initialize`] materializes the declared channels against the bound data.
/// 2. Scales are built from every mark's resolved channels (outside this crate).
/// 3. [`Mark::render`] emits a detached [`Node`] for the requested index, possibly several
///    times with different indices and the same resolved channels.
pub trait Mark: fmt::Debug {
    /// A short name for errors and logs (`"dot"`, `"line"`, ...).
    fn kind(&self) -> &'static str;

    /// The mark's bound data, if it has any of its own.
    fn data(&self) -> Option<&Data>;

    /// The channels declared at construction.
    fn channels(&self) -> &[ChannelSpec];

    /// Resolves every declared channel against the bound data.
    fn initialize(&self) -> Result<ResolvedChannels, Error>;

    /// Renders the datums at `index` (`None` renders the whole dataset).
    ///
    /// `channels` must be the value returned by [`Mark::initialize`]. Returns `Ok(None)` when
    /// the mark has nothing to draw.
    fn render(
        &self,
        index: Option<&[usize]>,
        scales: &Scales,
        channels: &ResolvedChannels,
        dimensions: &Dimensions,
    ) -> Result<Option<Node>, Error>;
}

/// Channel declarations and bound data shared by the concrete marks.
#[derive(Clone, Debug)]
pub struct MarkCore {
    kind: &'static str,
    data: Option<Data>,
    channels: Vec<ChannelSpec>,
}

impl MarkCore {
    /// Declares a mark; fails if a required channel has no value.
    pub fn new(
        kind: &'static str,
        data: Option<Data>,
        channels: Vec<ChannelSpec>,
    ) -> Result<Self, Error> {
        if let Some(missing) = channels.iter().find(|c| !c.optional && c.value.is_none()) {
            return Err(Error::MissingChannel {
                mark: kind,
                channel: missing.name,
            });
        }
        Ok(Self {
            kind,
            data,
            channels,
        })
    }

    /// Mark kind.
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Bound data.
    pub fn data(&self) -> Option<&Data> {
        self.data.as_ref()
    }

    /// Declared channels.
    pub fn channels(&self) -> &[ChannelSpec] {
        &self.channels
    }

    /// Returns `true` if the named channel was given a value.
    pub fn has(&self, name: &str) -> bool {
        self.channels
            .iter()
            .any(|c| c.name == name && c.value.is_some())
    }

    /// Resolves the channels that have a value; channels sharing a scale must agree in length.
    pub fn initialize(&self) -> Result<ResolvedChannels, Error> {
        let data: &[Datum] = self.data.as_deref().unwrap_or(&[]);
        let channels: Vec<Channel> = self
            .channels
            .iter()
            .filter_map(|spec| {
                let value = spec.value.as_ref()?;
                Some(Channel {
                    name: spec.name,
                    scale: spec.scale,
                    band: spec.band,
                    label: value.label(),
                    values: value.resolve(data),
                })
            })
            .collect();

        let mut first_by_role: HashMap<ScaleRole, (&'static str, usize)> = HashMap::new();
        for channel in &channels {
            let Some(role) = channel.scale else {
                continue;
            };
            let len = channel.values.len();
            let (a, a_len) = *first_by_role.entry(role).or_insert((channel.name, len));
            if a_len != len {
                return Err(Error::LengthMismatch {
                    mark: self.kind,
                    a,
                    a_len,
                    b: channel.name,
                    b_len: len,
                });
            }
        }

        Ok(ResolvedChannels {
            len: data.len(),
            channels,
            children: Vec::new(),
        })
    }

    /// Checks that `scales` supplies every scale a set channel feeds.
    pub fn check_scales(&self, scales: &Scales) -> Result<(), Error> {
        for spec in self.channels.iter().filter(|c| c.value.is_some()) {
            match spec.scale {
                Some(ScaleRole::Color) => {
                    scales.require_color(self.kind)?;
                }
                Some(role) => {
                    scales.require(self.kind, role)?;
                }
                None => {}
            }
        }
        Ok(())
    }

    /// The index to render: the given one, or every datum.
    pub fn index(&self, index: Option<&[usize]>, channels: &ResolvedChannels) -> Vec<usize> {
        match index {
            Some(index) => index.to_vec(),
            None => (0..channels.len).collect(),
        }
    }

    /// Keeps the positions for which every given channel is defined.
    ///
    /// Absent channels (`None`) do not filter.
    pub fn filter_defined(&self, index: Vec<usize>, channels: &[Option<&[Value]>]) -> Vec<usize> {
        self.filter(index, |i| {
            channels
                .iter()
                .flatten()
                .all(|values| defined(value_at(values, i)))
        })
    }

    /// Keeps the positions satisfying `keep`.
    pub fn filter(&self, mut index: Vec<usize>, keep: impl Fn(usize) -> bool) -> Vec<usize> {
        let before = index.len();
        index.retain(|&i| keep(i));
        if index.len() != before {
            log::trace!(
                "{} mark: skipped {} of {} datums",
                self.kind,
                before - index.len(),
                before
            );
        }
        index
    }
}

/// Stable-sorts `index` by the `z` channel, if present.
pub fn sort_by_z(index: &mut [usize], z: Option<&[Value]>) {
    if let Some(z) = z {
        index.sort_by(|&a, &b| ascending(value_at(z, a), value_at(z, b)));
    }
}

/// Maps a positional channel value through the scale for `role`.
///
/// Returns `fallback` if the channel is absent.
pub fn position_at(
    kind: &'static str,
    scales: &Scales,
    values: Option<&[Value]>,
    role: ScaleRole,
    i: usize,
    fallback: f64,
) -> Result<f64, Error> {
    match values {
        Some(values) => Ok(scales.require(kind, role)?.map(value_at(values, i))),
        None => Ok(fallback),
    }
}

/// Maps a color channel value through the color scale.
///
/// Returns `None` if the channel is absent or the value does not map to a color.
pub fn color_at(
    kind: &'static str,
    scales: &Scales,
    values: Option<&[Value]>,
    i: usize,
) -> Result<Option<Paint>, Error> {
    let Some(values) = values else {
        return Ok(None);
    };
    let scale = scales.require_color(kind)?;
    Ok(scale.map(value_at(values, i)).map(Paint::Color))
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use serde_json::json;

    use super::*;
    use crate::channel::ChannelValue;
    use crate::value::data;

    fn test_mark(channels: Vec<ChannelSpec>) -> Result<MarkCore, Error> {
        MarkCore::new(
            "test",
            Some(data([json!({"a": 1, "b": null}), json!({"a": 2, "b": 3})])),
            channels,
        )
    }

    #[test]
    fn required_channels_are_validated_at_construction() {
        let err = test_mark(vec![
            ChannelSpec::new("x", None).with_scale(ScaleRole::X),
            ChannelSpec::new("z", None).optional(),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            Error::MissingChannel {
                mark: "test",
                channel: "x"
            }
        );
    }

    #[test]
    fn unset_optional_channels_are_not_resolved() {
        let mark = test_mark(vec![
            ChannelSpec::new("x", Some("a".into())).with_scale(ScaleRole::X),
            ChannelSpec::new("z", None).optional(),
        ])
        .unwrap();
        let resolved = mark.initialize().unwrap();
        assert_eq!(resolved.len, 2);
        assert_eq!(resolved.channels.len(), 1);
        assert_eq!(resolved.channel("x").unwrap().label.as_deref(), Some("a"));
        assert!(resolved.get("z").is_none());
    }

    #[test]
    fn channels_sharing_a_scale_must_have_equal_lengths() {
        let mark = test_mark(vec![
            ChannelSpec::new("x1", Some("a".into())).with_scale(ScaleRole::X),
            ChannelSpec::new("x2", Some(vec![Value::Number(1.0)].into())).with_scale(ScaleRole::X),
            ChannelSpec::new("z", Some(vec![Value::Number(1.0)].into())),
        ])
        .unwrap();
        assert_eq!(
            mark.initialize(),
            Err(Error::LengthMismatch {
                mark: "test",
                a: "x1",
                a_len: 2,
                b: "x2",
                b_len: 1
            })
        );
    }

    #[test]
    fn filter_defined_preserves_order() {
        let mark = test_mark(vec![
            ChannelSpec::new("x", Some(ChannelValue::from("a"))),
            ChannelSpec::new("y", Some(ChannelValue::from("b"))),
        ])
        .unwrap();
        let resolved = mark.initialize().unwrap();
        let index = mark.index(None, &resolved);
        assert_eq!(index, [0, 1]);
        let kept = mark.filter_defined(index, &[resolved.get("x"), resolved.get("y"), None]);
        assert_eq!(kept, [1]);
    }

    #[test]
    fn z_sort_is_stable() {
        let z = vec![Value::from("b"), Value::from("a"), Value::from("b"), Value::from("a")];
        let mut index = vec![0, 1, 2, 3];
        sort_by_z(&mut index, Some(&z));
        assert_eq!(index, [1, 3, 0, 2]);
    }

    #[test]
    fn missing_color_scale_is_an_error() {
        let values = vec![Value::from("a")];
        assert_eq!(
            color_at("test", &Scales::default(), Some(&values), 0),
            Err(Error::MissingScale {
                mark: "test",
                scale: ScaleRole::Color
            })
        );
        assert_eq!(color_at("test", &Scales::default(), None, 0), Ok(None));
    }
}
