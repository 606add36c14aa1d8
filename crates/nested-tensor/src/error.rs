// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for nested tensor construction, traversal and operations.

use tensor_core::TensorError;

/// Errors that can occur when building or operating on nested tensors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NestedError {
    /// Trees combined by a multi-tree traversal differ in structure.
    #[error("shape mismatch in {op}: expected degree {expected}, got {actual}")]
    ShapeMismatch {
        op: &'static str,
        expected: usize,
        actual: usize,
    },

    /// An operation was asked to work across a nested (ragged) dimension.
    #[error("{op} over nested dimension {dim} is not implemented (nested_dim = {nested_dim})")]
    UnsupportedDimension {
        op: &'static str,
        dim: usize,
        nested_dim: usize,
    },

    /// A dimension index lies outside `[-ndim, ndim)`.
    #[error("dimension {dim} out of range (expected to be in range of [-{ndim}, {ndim}))")]
    DimOutOfRange { dim: i64, ndim: usize },

    /// An entry index lies outside `[-len, len)`.
    #[error("index {index} out of range for {len} entries")]
    IndexOutOfRange { index: i64, len: usize },

    /// An index key of a kind the resolver does not accept in that position.
    #[error("index key of kind '{kind}' is not accepted here")]
    InvalidIndexKey { kind: &'static str },

    /// The children of an internal node do not all have the same height.
    #[error("child {index} has height {actual}, expected {expected}")]
    HeightMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },

    /// Leaves of one nested tensor disagree on rank or dtype.
    #[error("inconsistent leaves: {0}")]
    InconsistentLeaves(String),

    /// A conversion to a dense tensor met an irregular dimension.
    #[error("nested tensor is ragged along dimension {dim}")]
    Ragged { dim: usize },

    /// A nested tensor needs at least one level of nesting.
    #[error("a nested tensor needs an internal root node, got a leaf")]
    NotNested,

    /// The gradient engine rejected a backward call.
    #[error("gradient error: {0}")]
    Gradient(String),

    /// Malformed external input (JSON documents, empty argument lists).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A leaf-level tensor operation failed.
    #[error(transparent)]
    Tensor(#[from] TensorError),
}
