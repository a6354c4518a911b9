// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vertical faceting.
//!
//! [`FacetY`] partitions its data by a key, stacks one panel per key along a band scale, and
//! renders every child mark inside every panel. Child marks are not facet-aware: the facet moves
//! their `y` channels onto the `fy` scale at initialization, and at render time hands them a
//! `y` scale that is the `fy` scale re-ranged to one panel's height.

extern crate alloc;

use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;

use hashbrown::HashMap;
use kurbo::Vec2;

use crate::channel::{ChannelSpec, ChannelValue, ResolvedChannels, ScaleRole};
use crate::error::Error;
use crate::mark::{Mark, MarkCore};
use crate::node::Node;
use crate::scale::{Dimensions, Scale, Scales, auto_scale_range};
use crate::value::{Data, GroupKey, group_index, same_data};

/// Options for [`FacetY`].
#[derive(Clone, Debug, Default)]
pub struct FacetYOptions {
    /// Facet key; feeds the band `y` scale.
    pub y: Option<ChannelValue>,
}

impl FacetYOptions {
    /// Sets the facet key.
    pub fn with_y(mut self, y: impl Into<ChannelValue>) -> Self {
        self.y = Some(y.into());
        self
    }
}

/// A composite mark drawing its children once per facet key, stacked vertically.
#[derive(Debug)]
pub struct FacetY {
    core: MarkCore,
    marks: Vec<Box<dyn Mark>>,
}

impl FacetY {
    /// Creates a facet over `data`, keyed by `options.y`.
    pub fn new(
        data: Data,
        options: FacetYOptions,
        marks: Vec<Box<dyn Mark>>,
    ) -> Result<Self, Error> {
        let core = MarkCore::new(
            "facetY",
            Some(data),
            vec![
                ChannelSpec::new("y", options.y)
                    .with_scale(ScaleRole::Y)
                    .band(),
            ],
        )?;
        Ok(Self { core, marks })
    }

    /// The child marks, in paint order.
    pub fn marks(&self) -> &[Box<dyn Mark>] {
        &self.marks
    }
}

impl Mark for FacetY {
    fn kind(&self) -> &'static str {
        self.core.kind()
    }

    fn data(&self) -> Option<&Data> {
        self.core.data()
    }

    fn channels(&self) -> &[ChannelSpec] {
        self.core.channels()
    }

    /// Resolves the facet key, then every child's channels with `y` moved onto `fy`.
    fn initialize(&self) -> Result<ResolvedChannels, Error> {
        let mut resolved = self.core.initialize()?;
        for mark in &self.marks {
            let child = mark.initialize()?;
            resolved
                .children
                .push(child.remap_scale(ScaleRole::Y, ScaleRole::Fy));
        }
        Ok(resolved)
    }

    fn render(
        &self,
        index: Option<&[usize]>,
        scales: &Scales,
        channels: &ResolvedChannels,
        dimensions: &Dimensions,
    ) -> Result<Option<Node>, Error> {
        let kind = self.kind();
        let Scale::Band(band) = scales.require(kind, ScaleRole::Y)? else {
            return Err(Error::NotBandScale {
                mark: kind,
                scale: ScaleRole::Y,
            });
        };
        let keys = channels.require(kind, "y")?;

        let index = self.core.index(index, channels);
        let groups: HashMap<GroupKey, Vec<usize>> = group_index(&index, keys)
            .into_iter()
            .map(|(key, group)| (key.key(), group))
            .collect();

        let subdimensions = Dimensions {
            margin_top: 0.0,
            margin_bottom: 0.0,
            height: band.bandwidth(),
            ..*dimensions
        };
        let subscales = Scales {
            y: scales
                .fy
                .as_ref()
                .map(|fy| auto_scale_range(fy, ScaleRole::Fy, &subdimensions)),
            fy: None,
            ..scales.clone()
        };
        log::debug!(
            "{kind} mark: {} panels, {} child marks",
            band.domain().len(),
            self.marks.len()
        );

        let own = self.core.data();
        let mut panels = Vec::with_capacity(band.domain().len());
        for key in band.domain() {
            let subindex: &[usize] = match groups.get(&key.key()) {
                Some(group) => group,
                None => {
                    log::warn!("{kind} mark: no rows for facet key {key}");
                    &[]
                }
            };
            let mut children = Vec::with_capacity(self.marks.len());
            for (k, mark) in self.marks.iter().enumerate() {
                let child_channels = channels
                    .children
                    .get(k)
                    .ok_or(Error::MissingChildChannels {
                        mark: kind,
                        child: k,
                    })?;
                let whole: Vec<usize>;
                let child_index = match (mark.data(), own) {
                    (Some(data), Some(own)) if same_data(data, own) => Some(subindex),
                    (Some(data), _) => {
                        whole = (0..data.len()).collect();
                        Some(whole.as_slice())
                    }
                    (None, _) => None,
                };
                if let Some(node) =
                    mark.render(child_index, &subscales, child_channels, &subdimensions)?
                {
                    children.push(node);
                }
            }
            panels.push(
                Node::group()
                    .transform(Some(Vec2::new(0.0, band.map(key))))
                    .children(children)
                    .build(),
            );
        }

        Ok(Some(Node::group().children(panels).build()))
    }
}

/// Creates a vertical facet.
pub fn facet_y(
    data: Data,
    options: FacetYOptions,
    marks: Vec<Box<dyn Mark>>,
) -> Result<FacetY, Error> {
    FacetY::new(data, options, marks)
}
