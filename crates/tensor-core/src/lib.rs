// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # tensor-core
//!
//! Dense tensor primitive used as the leaf payload of nested tensors.
//!
//! This crate provides:
//! - [`Tensor`]: an n-dimensional tensor handle backed by `ndarray`.
//! - [`Shape`]: shape descriptors, axis wrapping and broadcasting.
//! - [`DType`]: supported element data types (f32, f64, i8, i32, i64).
//! - [`ops`]: reductions, cumulative sum, stacking, basic indexing,
//!   element-wise arithmetic and activations.
//!
//! # Design Goals
//! - Cheap handle clones; storage is shared and mutations are visible
//!   through every handle.
//! - Operations never mutate their inputs.
//! - Clean error types via `thiserror`.

mod dtype;
mod error;
pub mod ops;
mod shape;
mod tensor;

pub use dtype::DType;
pub use error::TensorError;
pub use ops::{Slice, TensorIndex};
pub use shape::Shape;
pub use tensor::Tensor;
