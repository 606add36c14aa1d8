// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Gaussian Error Linear Unit (GELU) activation.

use crate::{Tensor, TensorError};

/// Coefficient `sqrt(2/π)`.
const SQRT_2_OVER_PI: f64 = 0.797_884_560_802_865_4;

/// Cubic coefficient in the tanh approximation.
const GELU_COEFF: f64 = 0.044715;

/// Applies the GELU activation element-wise using the tanh approximation:
///
/// `GELU(x) ≈ 0.5 * x * (1 + tanh(sqrt(2/π) * (x + 0.044715 * x³)))`
///
/// # Errors
/// Returns [`TensorError::UnsupportedDType`] for integer tensors.
pub fn gelu(input: &Tensor) -> Result<Tensor, TensorError> {
    let dtype = input.dtype();
    if !dtype.is_floating() {
        return Err(TensorError::UnsupportedDType { op: "gelu", dtype });
    }
    let data = input.with_array(|a| a.mapv(gelu_scalar));
    Ok(Tensor::from_array(data, dtype))
}

/// Computes GELU for a single value.
#[inline(always)]
fn gelu_scalar(x: f64) -> f64 {
    let inner = SQRT_2_OVER_PI * (x + GELU_COEFF * x * x * x);
    0.5 * x * (1.0 + inner.tanh())
}
