// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors raised while building or rendering marks.

extern crate alloc;

use alloc::string::String;

use crate::channel::ScaleRole;

/// Errors returned by mark construction, channel initialization and rendering.
///
/// Undefined datums are never errors; they are skipped during rendering.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A required channel was not given a value at construction.
    #[error("{mark} mark requires the `{channel}` channel")]
    MissingChannel {
        /// Mark kind.
        mark: &'static str,
        /// Channel name.
        channel: &'static str,
    },
    /// Two channels that must pair up resolved to different lengths.
    #[error("{mark} mark channels `{a}` ({a_len}) and `{b}` ({b_len}) have different lengths")]
    LengthMismatch {
        /// Mark kind.
        mark: &'static str,
        /// First channel name.
        a: &'static str,
        /// Length of the first channel.
        a_len: usize,
        /// Second channel name.
        b: &'static str,
        /// Length of the second channel.
        b_len: usize,
    },
    /// The channel values passed to `render` lack a required channel.
    #[error("{mark} mark was rendered without values for the `{channel}` channel")]
    MissingValues {
        /// Mark kind.
        mark: &'static str,
        /// Channel name.
        channel: &'static str,
    },
    /// A scale needed by a declared channel was not supplied.
    #[error("{mark} mark requires a `{scale}` scale")]
    MissingScale {
        /// Mark kind.
        mark: &'static str,
        /// Scale role.
        scale: ScaleRole,
    },
    /// A scale was supplied but is not a band scale.
    #[error("{mark} mark requires `{scale}` to be a band scale")]
    NotBandScale {
        /// Mark kind.
        mark: &'static str,
        /// Scale role.
        scale: ScaleRole,
    },
    /// A composite mark was rendered without resolved channels for one of its children.
    #[error("{mark} mark was rendered without resolved channels for child {child}")]
    MissingChildChannels {
        /// Mark kind.
        mark: &'static str,
        /// Position of the child mark.
        child: usize,
    },
    /// A curve name did not match any known interpolator.
    #[error("unknown curve: {0}")]
    UnknownCurve(String),
}
