// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # nested-tensor
//!
//! Ragged, tree-shaped collections of tensors exposed as one tensor with some
//! "nested" dimensions.
//!
//! This crate provides:
//! - [`NestedNode`]: the generic tree, with traversal primitives
//!   (`map`, `zip_map`, [`map_all`], `flatten`, `unbind`, `fold`).
//! - [`NestedTensor`]: a tree of [`tensor_core::Tensor`] leaves with size
//!   and stride queries, dense conversion and JSON import/export.
//! - The dimension model ([`wrap_dim`], [`split_dim`], [`SizeTree`]).
//! - Lifted operations: `cumsum`, `softmax`, `sum_dims`, `mean_dims`, full
//!   `sum`/`mean`/`prod`, `gelu`, `add`, `mul`.
//! - Recursive indexing with [`IndexKey`].
//! - Text rendering ([`DisplayOptions`]) and gradient routing
//!   ([`GradientEngine`]).
//!
//! # Example
//! ```
//! use nested_tensor::{IndexKey, NestedTensor};
//! use tensor_core::{Shape, Tensor};
//!
//! let nt = NestedTensor::from_tensors(vec![
//!     Tensor::from_f32(Shape::vector(3), &[1.0, 2.0, 3.0]).unwrap(),
//!     Tensor::from_f32(Shape::vector(1), &[4.0]).unwrap(),
//! ])
//! .unwrap();
//!
//! assert_eq!(nt.sum(None).unwrap().item().unwrap(), 10.0);
//! let running = nt.cumsum(-1, None).unwrap();
//! assert_eq!(running.tensors()[0].to_vec(), vec![1.0, 3.0, 6.0]);
//!
//! let second = nt.get(IndexKey::Int(1)).unwrap();
//! assert_eq!(second.as_dense().unwrap().to_vec(), vec![4.0]);
//! ```

mod autograd;
mod dim;
mod display;
mod error;
mod index;
mod json;
mod lift;
mod nested;
mod node;
mod traverse;

pub use autograd::{AccumulateGrad, GradientEngine};
pub use dim::{
    nested_size, nested_stride, regular_sizes, size_at, split_dim, wrap_dim, DimKind, SizeNode,
    SizeTree,
};
pub use display::{render, DisplayOptions};
pub use error::NestedError;
pub use index::{get_item, IndexKey};
pub use json::tensor_to_json;
pub use nested::{AnyTensor, NestedTensor};
pub use node::NestedNode;
pub use traverse::map_all;
