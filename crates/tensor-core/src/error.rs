// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for tensor operations.

use crate::{DType, Shape};

/// Errors that can occur during tensor operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TensorError {
    /// The provided value buffer does not match the element count of the shape.
    #[error("buffer size mismatch: expected {expected} elements, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    /// Two tensors have incompatible shapes for the requested operation.
    #[error("incompatible shapes for {op}: {lhs} vs {rhs}")]
    ShapeMismatch {
        op: &'static str,
        lhs: Shape,
        rhs: Shape,
    },

    /// The requested data type is not supported for this operation.
    #[error("unsupported dtype {dtype} for operation {op}")]
    UnsupportedDType { op: &'static str, dtype: DType },

    /// An axis argument lies outside `[-rank, rank)`.
    #[error("{op}: dimension {axis} out of range for tensor of rank {rank}")]
    AxisOutOfRange {
        op: &'static str,
        axis: i64,
        rank: usize,
    },

    /// The same axis was named twice in a dimension list.
    #[error("{op}: dimension {axis} appears more than once")]
    DuplicateAxis { op: &'static str, axis: usize },

    /// An integer index lies outside `[-size, size)` along an axis.
    #[error("index {index} out of range for axis {axis} of size {size}")]
    IndexOutOfRange { axis: usize, index: i64, size: usize },

    /// Too many index entries for the tensor's rank.
    #[error("too many indices: {given} for tensor of rank {rank}")]
    TooManyIndices { given: usize, rank: usize },

    /// A slice with an unsupported step.
    #[error("invalid slice: {detail}")]
    InvalidSlice { detail: String },

    /// The operation needs at least one input tensor.
    #[error("{op} expects a non-empty list of tensors")]
    EmptyInput { op: &'static str },

    /// A single value was requested from a tensor holding more than one.
    #[error("tensor of shape {shape} cannot be converted to a scalar")]
    NotScalar { shape: Shape },
}
