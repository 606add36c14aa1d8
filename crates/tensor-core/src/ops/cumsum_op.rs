// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Cumulative sum along one axis.

use crate::{DType, Tensor, TensorError};
use ndarray::Axis;

/// Computes the running sum along `dim`. The output has the input's shape.
///
/// Without an explicit `dtype`, integer inputs widen to `i64`.
///
/// # Errors
/// Returns [`TensorError::AxisOutOfRange`] if `dim` is not a valid axis.
pub fn cumsum(input: &Tensor, dim: i64, dtype: Option<DType>) -> Result<Tensor, TensorError> {
    let shape = input.shape();
    let axis = shape.axis("cumsum", dim)?;
    let out_dtype = dtype.unwrap_or_else(|| input.dtype().accumulate());

    let mut data = input.with_array(|a| a.mapv(|v| out_dtype.cast(v)));
    if axis < shape.rank() {
        data.accumulate_axis_inplace(Axis(axis), |prev, curr| *curr += *prev);
    }
    Ok(Tensor::from_array(data, out_dtype))
}
