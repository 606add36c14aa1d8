// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Reductions and scans over nested tensors.

use super::{leaf_dim, leaf_dims};
use crate::{NestedError, NestedTensor};
use tensor_core::{ops, DType, Shape, Tensor, TensorError};

type FullReduction = fn(&Tensor, Option<DType>) -> Result<Tensor, TensorError>;

impl NestedTensor {
    /// Running sum along global dimension `dim`, which must be a leaf
    /// dimension. The result has the same nested size as `self`.
    ///
    /// # Errors
    /// Returns [`NestedError::UnsupportedDimension`] when `dim` is a tree level.
    pub fn cumsum(&self, dim: i64, dtype: Option<DType>) -> Result<NestedTensor, NestedError> {
        let axis = leaf_dim("cumsum", self, dim)?;
        let structure = self.structure().try_map(|t| ops::cumsum(t, axis, dtype))?;
        let out_dtype = dtype.unwrap_or_else(|| self.dtype().accumulate());
        Ok(Self::from_parts(structure, self.tensor_dim(), out_dtype))
    }

    /// Sums every leaf over the global dimensions `dims`.
    ///
    /// With `keepdim` every reduced axis stays with length 1, otherwise it is
    /// removed from every leaf.
    ///
    /// # Errors
    /// - [`NestedError::UnsupportedDimension`] when any dim is a tree level.
    /// - [`NestedError::InvalidInput`] for an empty `dims`.
    pub fn sum_dims(
        &self,
        dims: &[i64],
        keepdim: bool,
        dtype: Option<DType>,
    ) -> Result<NestedTensor, NestedError> {
        let out_dtype = dtype.unwrap_or_else(|| self.dtype().accumulate());
        self.reduce_dims("sum", dims, keepdim, out_dtype, |t, axes| {
            ops::sum_dims(t, axes, keepdim, dtype)
        })
    }

    /// Averages every leaf over the global dimensions `dims`.
    ///
    /// # Errors
    /// As [`sum_dims`](Self::sum_dims); additionally the leaf dtype (or the
    /// requested one) must be floating point.
    pub fn mean_dims(
        &self,
        dims: &[i64],
        keepdim: bool,
        dtype: Option<DType>,
    ) -> Result<NestedTensor, NestedError> {
        let out_dtype = dtype.unwrap_or_else(|| self.dtype());
        self.reduce_dims("mean", dims, keepdim, out_dtype, |t, axes| {
            ops::mean_dims(t, axes, keepdim, dtype)
        })
    }

    fn reduce_dims(
        &self,
        op: &'static str,
        dims: &[i64],
        keepdim: bool,
        out_dtype: DType,
        f: impl Fn(&Tensor, &[i64]) -> Result<Tensor, TensorError>,
    ) -> Result<NestedTensor, NestedError> {
        if dims.is_empty() {
            return Err(NestedError::InvalidInput(format!(
                "{op} over dimensions needs at least one dimension"
            )));
        }
        let axes = leaf_dims(op, self, dims)?;
        let structure = self.structure().try_map(|t| {
            tracing::trace!(op, shape = %t.shape(), "reducing leaf");
            f(t, &axes)
        })?;
        let tensor_dim = if keepdim {
            self.tensor_dim()
        } else {
            self.tensor_dim().saturating_sub(axes.len())
        };
        Ok(Self::from_parts(structure, tensor_dim, out_dtype))
    }

    /// Sums every element into a rank-0 tensor.
    ///
    /// Each leaf is summed, the partial results are stacked and summed again.
    /// Without leaves the result is `ones([0])`.
    pub fn sum(&self, dtype: Option<DType>) -> Result<Tensor, NestedError> {
        self.full_reduce("sum", ops::sum, 0, dtype)
    }

    /// The mean of the per-leaf means. Without leaves the result is
    /// `ones([0])`.
    pub fn mean(&self, dtype: Option<DType>) -> Result<Tensor, NestedError> {
        self.full_reduce("mean", ops::mean, 0, dtype)
    }

    /// Multiplies every element into a rank-0 tensor. Without leaves the
    /// result is `ones([1])`.
    pub fn prod(&self, dtype: Option<DType>) -> Result<Tensor, NestedError> {
        self.full_reduce("prod", ops::prod, 1, dtype)
    }

    fn full_reduce(
        &self,
        op: &'static str,
        reduce: FullReduction,
        empty_len: usize,
        dtype: Option<DType>,
    ) -> Result<Tensor, NestedError> {
        let leaves = self.tensors();
        if leaves.is_empty() {
            tracing::debug!(op, empty_len, "reducing nested tensor without leaves");
            return Ok(Tensor::ones(
                Shape::vector(empty_len),
                dtype.unwrap_or_default(),
            ));
        }
        let partials = leaves
            .iter()
            .map(|t| reduce(t, dtype))
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(op, partials = partials.len(), "reducing stacked partial results");
        let stacked = ops::stack(&partials, 0)?;
        Ok(reduce(&stacked, dtype)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vector(values: &[f32]) -> Tensor {
        Tensor::from_f32(Shape::vector(values.len()), values).unwrap()
    }

    fn matrix(rows: usize, cols: usize, start: f32) -> Tensor {
        let values: Vec<f32> = (0..rows * cols).map(|i| start + i as f32).collect();
        Tensor::from_f32(Shape::matrix(rows, cols), &values).unwrap()
    }

    /// Two leaves of shape `[2, 3]` and `[1, 3]`.
    fn ragged() -> NestedTensor {
        NestedTensor::from_tensors(vec![matrix(2, 3, 0.0), matrix(1, 3, 10.0)]).unwrap()
    }

    #[test]
    fn test_cumsum_leaf_dim() {
        let nt = NestedTensor::from_tensors(vec![vector(&[1.0, 2.0, 3.0]), vector(&[4.0])]).unwrap();
        let c = nt.cumsum(1, None).unwrap();
        assert_eq!(c.tensors()[0].to_vec(), vec![1.0, 3.0, 6.0]);
        assert_eq!(c.tensors()[1].to_vec(), vec![4.0]);
        assert!(c.structure().shape_matches(nt.structure()));
    }

    #[test]
    fn test_cumsum_rejects_tree_dim() {
        let err = ragged().cumsum(0, None).unwrap_err();
        assert_eq!(
            err,
            NestedError::UnsupportedDimension {
                op: "cumsum",
                dim: 0,
                nested_dim: 1
            }
        );
    }

    #[test]
    fn test_sum_dims_keepdim() {
        let nt = ragged();
        let s = nt.sum_dims(&[2], true, None).unwrap();
        assert_eq!(s.dim(), 3);
        assert_eq!(s.nested_size().flatten(), vec![vec![2, 1], vec![1, 1]]);
        assert_eq!(s.tensors()[0].to_vec(), vec![3.0, 12.0]);
        assert_eq!(s.tensors()[1].to_vec(), vec![33.0]);
    }

    #[test]
    fn test_sum_dims_drops_axis() {
        let s = ragged().sum_dims(&[-1], false, None).unwrap();
        assert_eq!(s.dim(), 2);
        assert_eq!(s.tensor_dim(), 1);
        assert_eq!(s.nested_size().flatten(), vec![vec![2], vec![1]]);
    }

    #[test]
    fn test_sum_dims_multiple_axes() {
        let s = ragged().sum_dims(&[1, 2], false, Some(DType::F64)).unwrap();
        assert_eq!(s.tensor_dim(), 0);
        assert_eq!(s.dtype(), DType::F64);
        assert_eq!(s.tensors()[0].item().unwrap(), 15.0);
        assert_eq!(s.tensors()[1].item().unwrap(), 33.0);
    }

    #[test]
    fn test_reduce_dims_errors() {
        let nt = ragged();
        assert!(matches!(
            nt.sum_dims(&[0], false, None),
            Err(NestedError::UnsupportedDimension { op: "sum", .. })
        ));
        assert!(matches!(
            nt.mean_dims(&[1, 0], true, None),
            Err(NestedError::UnsupportedDimension { op: "mean", .. })
        ));
        assert!(matches!(
            nt.sum_dims(&[], false, None),
            Err(NestedError::InvalidInput(_))
        ));
        assert!(matches!(
            nt.sum_dims(&[1, -2], false, None),
            Err(NestedError::Tensor(TensorError::DuplicateAxis { .. }))
        ));
    }

    #[test]
    fn test_mean_dims() {
        let m = ragged().mean_dims(&[1], false, None).unwrap();
        assert_eq!(m.tensors()[0].to_vec(), vec![1.5, 2.5, 3.5]);
        assert_eq!(m.tensors()[1].to_vec(), vec![10.0, 11.0, 12.0]);
    }

    #[test]
    fn test_full_reductions() {
        let nt = NestedTensor::from_tensors(vec![vector(&[1.0, 2.0, 3.0]), vector(&[4.0])]).unwrap();
        assert_eq!(nt.sum(None).unwrap().item().unwrap(), 10.0);
        assert_eq!(nt.prod(None).unwrap().item().unwrap(), 24.0);
        // mean of per-leaf means: (2 + 4) / 2
        assert_eq!(nt.mean(None).unwrap().item().unwrap(), 3.0);
        assert_eq!(nt.sum(None).unwrap().shape(), Shape::scalar());
    }

    #[test]
    fn test_full_reduction_integer_widening() {
        let a = Tensor::from_i64(Shape::vector(2), &[1, 2]).unwrap();
        let b = Tensor::from_i64(Shape::vector(1), &[3]).unwrap();
        let nt = NestedTensor::from_tensors(vec![a, b]).unwrap();
        let s = nt.sum(None).unwrap();
        assert_eq!(s.dtype(), DType::I64);
        assert_eq!(s.item().unwrap(), 6.0);
        assert!(nt.mean(None).is_err());
        assert_eq!(nt.mean(Some(DType::F64)).unwrap().item().unwrap(), 2.25);
    }

    #[test]
    fn test_full_reductions_without_leaves() {
        let nt = NestedTensor::from_tensors(vec![]).unwrap();
        let s = nt.sum(None).unwrap();
        assert_eq!(s.shape(), Shape::vector(0));
        assert_eq!(s.dtype(), DType::F32);
        assert_eq!(nt.mean(None).unwrap().shape(), Shape::vector(0));

        let p = nt.prod(Some(DType::I64)).unwrap();
        assert_eq!(p.shape(), Shape::vector(1));
        assert_eq!(p.dtype(), DType::I64);
        assert_eq!(p.to_vec(), vec![1.0]);
    }
}
