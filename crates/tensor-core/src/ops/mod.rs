// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Tensor operations.
//!
//! Every operation takes its inputs by reference and returns a tensor with
//! fresh storage; inputs are never mutated.

mod arith_op;
mod cumsum_op;
mod gelu_op;
mod index_op;
mod reduce_op;
mod softmax_op;
mod stack_op;

pub use arith_op::{add, mul};
pub use cumsum_op::cumsum;
pub use gelu_op::gelu;
pub use index_op::{index, select, slice, Slice, TensorIndex};
pub use reduce_op::{mean, mean_dims, prod, prod_dims, sum, sum_dims};
pub use softmax_op::softmax;
pub use stack_op::{cat, stack};
