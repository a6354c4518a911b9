// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Detached render nodes.
//!
//! `render()` returns a small scene graph: groups carry the mark-level (indirect) style and an
//! optional translation, leaves carry one shape plus any per-datum (direct) properties. Nodes
//! hold no references into marks, data or scales.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{BezPath, Circle, Line, Rect, Vec2};

use crate::style::Style;

/// The geometry of a render node.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    /// A container for child nodes.
    Group,
    /// A path (lines and areas).
    Path(BezPath),
    /// A circle (dots).
    Circle(Circle),
    /// A straight segment (links).
    Line(Line),
    /// An axis-aligned rectangle.
    Rect(Rect),
}

/// A node of the rendered scene graph.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    /// Geometry.
    pub shape: Shape,
    /// Presentation properties set on this node.
    pub style: Style,
    /// Translation applied to this node and its children.
    pub transform: Option<Vec2>,
    /// Tooltip text.
    pub title: Option<String>,
    /// Child nodes, in paint order.
    pub children: Vec<Self>,
}

impl Node {
    /// Starts building a node.
    pub fn builder(shape: Shape) -> NodeBuilder {
        NodeBuilder {
            node: Self {
                shape,
                style: Style::default(),
                transform: None,
                title: None,
                children: Vec::new(),
            },
        }
    }

    /// Starts building a group.
    pub fn group() -> NodeBuilder {
        Self::builder(Shape::Group)
    }

    /// Returns `true` for group nodes.
    pub fn is_group(&self) -> bool {
        matches!(self.shape, Shape::Group)
    }

    /// Iterates over this node and all its descendants, depth first.
    pub fn descendants(&self) -> impl Iterator<Item = &Self> + '_ {
        let mut stack = alloc::vec![self];
        core::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }
}

/// Builder for [`Node`].
#[derive(Clone, Debug)]
pub struct NodeBuilder {
    node: Node,
}

impl NodeBuilder {
    /// Sets the style.
    pub fn style(mut self, style: Style) -> Self {
        self.node.style = style;
        self
    }

    /// Sets the translation.
    pub fn transform(mut self, offset: Option<Vec2>) -> Self {
        self.node.transform = offset;
        self
    }

    /// Sets the tooltip text.
    pub fn title(mut self, title: Option<String>) -> Self {
        self.node.title = title;
        self
    }

    /// Appends a child.
    pub fn child(mut self, child: Node) -> Self {
        self.node.children.push(child);
        self
    }

    /// Appends children.
    pub fn children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.node.children.extend(children);
        self
    }

    /// Finishes the node.
    pub fn build(self) -> Node {
        self.node
    }
}
