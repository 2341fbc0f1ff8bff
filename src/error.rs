// SPDX-License-Identifier: AGPL-3.0-only

//! Error taxonomy for the piecewise-linear approximation core.
//!
//! Every fallible path in this crate surfaces one of these variants; none
//! is retried internally, and no variant carries a partial segment array —
//! on `Err` the caller gets nothing, never a half-built `Vec<Segment>`.

use thiserror::Error as ThisError;

/// Errors produced while approximating an activation function with a PWL.
#[derive(Debug, ThisError, Clone, PartialEq)]
pub enum Error {
    /// `lower > upper`, a non-finite bound, a non-positive error budget, or
    /// a fractional power exponent whose domain would cross the base's zero.
    #[error("invalid domain: {reason}")]
    InvalidDomain { reason: String },

    /// An evaluation of `f` or `f′` produced a non-finite value.
    #[error("evaluation produced a non-finite value at x = {x}")]
    DomainError { x: f64 },

    /// The power exponent constant was not a single scalar of an accepted type.
    #[error("unsupported exponent constant: {reason}")]
    UnsupportedType { reason: String },

    /// PivotSearch hit `max_iterations`, or SegmentSearch hit `max_segments`,
    /// without meeting its completion test.
    #[error("search did not converge (last epsilon = {last_epsilon})")]
    NotConverged { last_epsilon: f64 },
}
