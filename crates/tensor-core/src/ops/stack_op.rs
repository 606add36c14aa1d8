// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Joining tensors: `stack` (new axis) and `cat` (existing axis).

use crate::{DType, Shape, Tensor, TensorError};
use ndarray::{ArrayD, ArrayViewD, Axis};

fn common_dtype(tensors: &[Tensor]) -> DType {
    tensors
        .iter()
        .map(Tensor::dtype)
        .reduce(DType::promote)
        .unwrap_or_default()
}

/// Stacks same-shape tensors along a new axis `dim`.
///
/// `dim` may be negative and ranges over `[-(rank + 1), rank]`. The result
/// dtype is the promotion of all input dtypes.
///
/// # Errors
/// Returns [`TensorError::EmptyInput`] for an empty list and
/// [`TensorError::ShapeMismatch`] when shapes differ.
pub fn stack(tensors: &[Tensor], dim: i64) -> Result<Tensor, TensorError> {
    let first = tensors.first().ok_or(TensorError::EmptyInput { op: "stack" })?;
    let shape = first.shape();
    for t in &tensors[1..] {
        let other = t.shape();
        if other != shape {
            return Err(TensorError::ShapeMismatch {
                op: "stack",
                lhs: shape,
                rhs: other,
            });
        }
    }
    let out_rank = Shape::new(vec![0; shape.rank() + 1]);
    let axis = out_rank.axis("stack", dim)?;
    tracing::trace!(count = tensors.len(), axis, "stacking tensors of shape {shape}");

    let arrays: Vec<ArrayD<f64>> = tensors.iter().map(Tensor::to_array).collect();
    let views: Vec<ArrayViewD<'_, f64>> = arrays.iter().map(|a| a.view()).collect();
    let data = ndarray::stack(Axis(axis), &views).map_err(|_| TensorError::ShapeMismatch {
        op: "stack",
        lhs: shape.clone(),
        rhs: shape.clone(),
    })?;
    Ok(Tensor::from_array(data, common_dtype(tensors)))
}

/// Concatenates tensors along the existing axis `dim`.
///
/// # Errors
/// Returns [`TensorError::EmptyInput`] for an empty list and
/// [`TensorError::ShapeMismatch`] when ranks differ or any axis other than
/// `dim` differs.
pub fn cat(tensors: &[Tensor], dim: i64) -> Result<Tensor, TensorError> {
    let first = tensors.first().ok_or(TensorError::EmptyInput { op: "cat" })?;
    let shape = first.shape();
    if shape.rank() == 0 {
        return Err(TensorError::AxisOutOfRange {
            op: "cat",
            axis: dim,
            rank: 0,
        });
    }
    let axis = shape.axis("cat", dim)?;
    tracing::trace!(count = tensors.len(), axis, "concatenating tensors");
    for t in &tensors[1..] {
        let other = t.shape();
        let compatible = other.rank() == shape.rank()
            && (0..shape.rank()).all(|i| i == axis || other.dim(i) == shape.dim(i));
        if !compatible {
            return Err(TensorError::ShapeMismatch {
                op: "cat",
                lhs: shape,
                rhs: other,
            });
        }
    }

    let arrays: Vec<ArrayD<f64>> = tensors.iter().map(Tensor::to_array).collect();
    let views: Vec<ArrayViewD<'_, f64>> = arrays.iter().map(|a| a.view()).collect();
    let data = ndarray::concatenate(Axis(axis), &views).map_err(|_| {
        TensorError::ShapeMismatch {
            op: "cat",
            lhs: shape.clone(),
            rhs: shape.clone(),
        }
    })?;
    Ok(Tensor::from_array(data, common_dtype(tensors)))
}
