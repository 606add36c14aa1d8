// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Broadcasting element-wise binary arithmetic.

use crate::{Tensor, TensorError};
use ndarray::{IxDyn, Zip};

fn binary(
    op: &'static str,
    lhs: &Tensor,
    rhs: &Tensor,
    f: impl Fn(f64, f64) -> f64,
) -> Result<Tensor, TensorError> {
    let (lshape, rshape) = (lhs.shape(), rhs.shape());
    let out_shape = lshape
        .broadcast_with(&rshape)
        .ok_or_else(|| TensorError::ShapeMismatch {
            op,
            lhs: lshape.clone(),
            rhs: rshape.clone(),
        })?;
    let dtype = lhs.dtype().promote(rhs.dtype());

    let (a, b) = (lhs.to_array(), rhs.to_array());
    let mismatch = || TensorError::ShapeMismatch {
        op,
        lhs: lshape.clone(),
        rhs: rshape.clone(),
    };
    let av = a.broadcast(IxDyn(out_shape.dims())).ok_or_else(mismatch)?;
    let bv = b.broadcast(IxDyn(out_shape.dims())).ok_or_else(mismatch)?;
    let data = Zip::from(&av).and(&bv).map_collect(|&x, &y| f(x, y));
    Ok(Tensor::from_array(data, dtype))
}

/// Element-wise `lhs + rhs` with broadcasting.
pub fn add(lhs: &Tensor, rhs: &Tensor) -> Result<Tensor, TensorError> {
    binary("add", lhs, rhs, |x, y| x + y)
}

/// Element-wise `lhs * rhs` with broadcasting.
pub fn mul(lhs: &Tensor, rhs: &Tensor) -> Result<Tensor, TensorError> {
    binary("mul", lhs, rhs, |x, y| x * y)
}
