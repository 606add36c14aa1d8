// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Softmax along one axis.

use crate::{Tensor, TensorError};
use ndarray::Axis;

/// Computes softmax along `dim`: `out[i] = exp(x[i] - max) / sum(exp(x - max))`.
///
/// Uses the numerically stable variant that subtracts the maximum value
/// before exponentiation to prevent overflow.
///
/// # Errors
/// Returns [`TensorError::UnsupportedDType`] for integer tensors and
/// [`TensorError::AxisOutOfRange`] for an invalid `dim`.
pub fn softmax(input: &Tensor, dim: i64) -> Result<Tensor, TensorError> {
    let dtype = input.dtype();
    if !dtype.is_floating() {
        return Err(TensorError::UnsupportedDType {
            op: "softmax",
            dtype,
        });
    }
    let shape = input.shape();
    let axis = shape.axis("softmax", dim)?;

    let mut data = input.to_array();
    if shape.rank() == 0 {
        // Softmax of a single value is 1.
        data.mapv_inplace(|_| 1.0);
        return Ok(Tensor::from_array(data, dtype));
    }

    for mut lane in data.lanes_mut(Axis(axis)) {
        let max_val = lane.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mut sum = 0.0;
        for v in lane.iter_mut() {
            *v = (*v - max_val).exp();
            sum += *v;
        }
        if sum > 0.0 {
            let inv_sum = 1.0 / sum;
            lane.mapv_inplace(|v| v * inv_sum);
        }
    }
    Ok(Tensor::from_array(data, dtype))
}
