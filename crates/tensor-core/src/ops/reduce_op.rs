// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Sum, mean and product reductions.
//!
//! The input is first converted to the output dtype, then reduced. Without an
//! explicit dtype, `sum` and `prod` widen integer inputs to `i64` and `mean`
//! keeps the input dtype (which must be floating point).

use crate::{DType, Shape, Tensor, TensorError};
use ndarray::{ArrayD, Axis};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reduction {
    Sum,
    Mean,
    Prod,
}

impl Reduction {
    fn name(self) -> &'static str {
        match self {
            Reduction::Sum => "sum",
            Reduction::Mean => "mean",
            Reduction::Prod => "prod",
        }
    }

    fn output_dtype(self, input: DType, requested: Option<DType>) -> Result<DType, TensorError> {
        let dtype = match (self, requested) {
            (_, Some(dtype)) => dtype,
            (Reduction::Mean, None) => input,
            (_, None) => input.accumulate(),
        };
        if self == Reduction::Mean && !dtype.is_floating() {
            return Err(TensorError::UnsupportedDType {
                op: self.name(),
                dtype,
            });
        }
        Ok(dtype)
    }

    fn reduce_axis(self, data: ArrayD<f64>, axis: usize) -> ArrayD<f64> {
        let axis = Axis(axis);
        match self {
            Reduction::Sum => data.sum_axis(axis),
            Reduction::Mean => {
                let n = data.len_of(axis) as f64;
                data.sum_axis(axis).mapv(|v| v / n)
            }
            Reduction::Prod => data.fold_axis(axis, 1.0, |acc, &v| acc * v),
        }
    }
}

/// Resolves a list of possibly negative axes into distinct, descending axes.
///
/// An empty list selects every axis.
fn resolve_axes(op: &'static str, shape: &Shape, dims: &[i64]) -> Result<Vec<usize>, TensorError> {
    if dims.is_empty() {
        return Ok((0..shape.rank()).rev().collect());
    }
    let mut seen = vec![false; shape.rank().max(1)];
    let mut axes = Vec::with_capacity(dims.len());
    for &dim in dims {
        let axis = shape.axis(op, dim)?;
        if seen[axis] {
            return Err(TensorError::DuplicateAxis { op, axis });
        }
        seen[axis] = true;
        if axis < shape.rank() {
            axes.push(axis);
        }
    }
    axes.sort_unstable_by(|a, b| b.cmp(a));
    Ok(axes)
}

fn reduce(
    kind: Reduction,
    input: &Tensor,
    dims: &[i64],
    keepdim: bool,
    dtype: Option<DType>,
) -> Result<Tensor, TensorError> {
    let out_dtype = kind.output_dtype(input.dtype(), dtype)?;
    let axes = resolve_axes(kind.name(), &input.shape(), dims)?;

    let mut data = input.with_array(|a| a.mapv(|v| out_dtype.cast(v)));
    for &axis in &axes {
        data = kind.reduce_axis(data, axis);
    }
    if keepdim {
        for &axis in axes.iter().rev() {
            data = data.insert_axis(Axis(axis));
        }
    }
    Ok(Tensor::from_array(data, out_dtype))
}

/// Sums every element into a rank-0 tensor.
pub fn sum(input: &Tensor, dtype: Option<DType>) -> Result<Tensor, TensorError> {
    reduce(Reduction::Sum, input, &[], false, dtype)
}

/// Averages every element into a rank-0 tensor.
///
/// # Errors
/// Returns [`TensorError::UnsupportedDType`] for integer output dtypes.
pub fn mean(input: &Tensor, dtype: Option<DType>) -> Result<Tensor, TensorError> {
    reduce(Reduction::Mean, input, &[], false, dtype)
}

/// Multiplies every element into a rank-0 tensor.
pub fn prod(input: &Tensor, dtype: Option<DType>) -> Result<Tensor, TensorError> {
    reduce(Reduction::Prod, input, &[], false, dtype)
}

/// Sums over `dims`. With `keepdim` every reduced axis is kept with length 1.
///
/// # Errors
/// Returns [`TensorError::AxisOutOfRange`] or [`TensorError::DuplicateAxis`]
/// for invalid dimension lists.
pub fn sum_dims(
    input: &Tensor,
    dims: &[i64],
    keepdim: bool,
    dtype: Option<DType>,
) -> Result<Tensor, TensorError> {
    reduce(Reduction::Sum, input, dims, keepdim, dtype)
}

/// Averages over `dims`. With `keepdim` every reduced axis is kept with length 1.
pub fn mean_dims(
    input: &Tensor,
    dims: &[i64],
    keepdim: bool,
    dtype: Option<DType>,
) -> Result<Tensor, TensorError> {
    reduce(Reduction::Mean, input, dims, keepdim, dtype)
}

/// Multiplies over `dims`. With `keepdim` every reduced axis is kept with length 1.
pub fn prod_dims(
    input: &Tensor,
    dims: &[i64],
    keepdim: bool,
    dtype: Option<DType>,
) -> Result<Tensor, TensorError> {
    reduce(Reduction::Prod, input, dims, keepdim, dtype)
}
