// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Shape-preserving leaf-wise operations.

use super::leaf_dim;
use crate::{NestedError, NestedTensor};
use tensor_core::{ops, Tensor, TensorError};

impl NestedTensor {
    /// Applies a dense operation to every leaf.
    ///
    /// `f` must return tensors of one common rank and dtype.
    pub fn apply(
        &self,
        f: impl FnMut(&Tensor) -> Result<Tensor, TensorError>,
    ) -> Result<NestedTensor, NestedError> {
        let structure = self.structure().try_map(f)?;
        NestedTensor::new(structure)
    }

    /// GELU activation on every element.
    pub fn gelu(&self) -> Result<NestedTensor, NestedError> {
        let structure = self.structure().try_map(ops::gelu)?;
        Ok(Self::from_parts(structure, self.tensor_dim(), self.dtype()))
    }

    /// Softmax along global dimension `dim`, which must be a leaf dimension.
    pub fn softmax(&self, dim: i64) -> Result<NestedTensor, NestedError> {
        let axis = leaf_dim("softmax", self, dim)?;
        let structure = self.structure().try_map(|t| ops::softmax(t, axis))?;
        Ok(Self::from_parts(structure, self.tensor_dim(), self.dtype()))
    }

    /// Leaf-wise `self + other`, broadcasting within each pair of leaves.
    ///
    /// # Errors
    /// Returns [`NestedError::ShapeMismatch`] when the trees differ.
    pub fn add(&self, other: &NestedTensor) -> Result<NestedTensor, NestedError> {
        self.binary(other, ops::add)
    }

    /// Leaf-wise `self * other`, broadcasting within each pair of leaves.
    pub fn mul(&self, other: &NestedTensor) -> Result<NestedTensor, NestedError> {
        self.binary(other, ops::mul)
    }

    fn binary(
        &self,
        other: &NestedTensor,
        f: fn(&Tensor, &Tensor) -> Result<Tensor, TensorError>,
    ) -> Result<NestedTensor, NestedError> {
        let structure = self
            .structure()
            .try_zip_map(other.structure(), |a, b| -> Result<Tensor, NestedError> {
                Ok(f(a, b)?)
            })?;
        Ok(Self::from_parts(
            structure,
            self.tensor_dim().max(other.tensor_dim()),
            self.dtype().promote(other.dtype()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tensor_core::{DType, Shape};

    fn vector(values: &[f32]) -> Tensor {
        Tensor::from_f32(Shape::vector(values.len()), values).unwrap()
    }

    fn ragged() -> NestedTensor {
        NestedTensor::from_tensors(vec![vector(&[1.0, 2.0]), vector(&[3.0])]).unwrap()
    }

    #[test]
    fn test_apply() {
        let nt = ragged();
        let scaled = nt
            .apply(|t| ops::mul(t, &Tensor::scalar(2.0, DType::F32)))
            .unwrap();
        assert_eq!(scaled.tensors()[0].to_vec(), vec![2.0, 4.0]);
        assert_eq!(scaled.tensors()[1].to_vec(), vec![6.0]);
        // inputs untouched
        assert_eq!(nt.tensors()[0].to_vec(), vec![1.0, 2.0]);
    }

    #[test]
    fn test_apply_inconsistent_results() {
        let nt = ragged();
        let mut first = true;
        let result = nt.apply(|t| {
            if std::mem::take(&mut first) {
                ops::sum(t, None)
            } else {
                Ok(t.clone())
            }
        });
        assert!(matches!(result, Err(NestedError::InconsistentLeaves(_))));
    }

    #[test]
    fn test_gelu() {
        let g = ragged().gelu().unwrap();
        let first = g.tensors()[0].to_vec();
        assert!((first[0] - 0.8412).abs() < 1e-3);
        assert_eq!(g.nested_size().flatten(), vec![vec![2], vec![1]]);
    }

    #[test]
    fn test_softmax() {
        let s = ragged().softmax(-1).unwrap();
        let leaves = s.tensors();
        let total: f64 = leaves[0].to_vec().iter().sum();
        assert!((total - 1.0).abs() < 1e-6);
        assert_eq!(leaves[1].to_vec(), vec![1.0]);
        assert!(matches!(
            ragged().softmax(0),
            Err(NestedError::UnsupportedDimension { op: "softmax", .. })
        ));
    }

    #[test]
    fn test_add_and_mul() {
        let a = ragged();
        let b = ragged();
        assert_eq!(a.add(&b).unwrap().tensors()[0].to_vec(), vec![2.0, 4.0]);
        assert_eq!(a.mul(&b).unwrap().tensors()[1].to_vec(), vec![9.0]);

        let other = NestedTensor::from_tensors(vec![vector(&[1.0])]).unwrap();
        assert!(matches!(
            a.add(&other),
            Err(NestedError::ShapeMismatch { expected: 2, actual: 1, .. })
        ));
    }
}
