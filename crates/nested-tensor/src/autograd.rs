// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Gradient plumbing. Differentiation itself belongs to a [`GradientEngine`];
//! this module only routes per-leaf seeds to it and collects gradients.

use crate::{NestedError, NestedTensor};
use tensor_core::Tensor;

/// Propagates a seed gradient from an output tensor to whatever produced it.
pub trait GradientEngine {
    /// Runs backward from `output` with the seed `gradient`.
    fn backward(
        &self,
        output: &Tensor,
        gradient: &Tensor,
        retain_graph: bool,
        create_graph: bool,
    ) -> Result<(), NestedError>;
}

/// Engine for tensors with no recorded history: the seed is accumulated into
/// the output's own gradient.
#[derive(Debug, Default, Clone, Copy)]
pub struct AccumulateGrad;

impl GradientEngine for AccumulateGrad {
    fn backward(
        &self,
        output: &Tensor,
        gradient: &Tensor,
        _retain_graph: bool,
        _create_graph: bool,
    ) -> Result<(), NestedError> {
        if !output.requires_grad() {
            return Err(NestedError::Gradient(
                "tensor does not require grad".to_string(),
            ));
        }
        output.accumulate_grad(gradient)?;
        Ok(())
    }
}

impl NestedTensor {
    /// `true` when every leaf requires grad (and there is at least one).
    pub fn requires_grad(&self) -> bool {
        let leaves = self.structure().leaves();
        !leaves.is_empty() && leaves.iter().all(|t| t.requires_grad())
    }

    /// Sets gradient tracking on every leaf in place. Handles sharing these
    /// leaves see the change.
    pub fn set_requires_grad(&self, requires_grad: bool) -> &Self {
        for leaf in self.structure().leaves() {
            leaf.set_requires_grad(requires_grad);
        }
        self
    }

    /// Gradient of every leaf, zeros where none has been accumulated yet.
    pub fn grad(&self) -> NestedTensor {
        let structure = self.structure().map(|t| {
            t.grad()
                .unwrap_or_else(|| Tensor::zeros(t.shape(), t.dtype()))
        });
        Self::from_parts(structure, self.tensor_dim(), self.dtype())
    }

    /// Runs `engine` on every leaf with the matching leaf of `gradient` as
    /// seed.
    ///
    /// The trees are paired before any seed is routed, so a structural
    /// mismatch leaves every gradient untouched.
    ///
    /// # Errors
    /// Returns [`NestedError::ShapeMismatch`] when the two trees differ and
    /// the first engine error otherwise.
    pub fn backward(
        &self,
        engine: &dyn GradientEngine,
        gradient: &NestedTensor,
        retain_graph: bool,
        create_graph: bool,
    ) -> Result<(), NestedError> {
        tracing::debug!(
            leaves = self.leaf_count(),
            retain_graph,
            create_graph,
            "running backward"
        );
        let pairs = self
            .structure()
            .zip_map(gradient.structure(), |output, seed| (output.clone(), seed.clone()))?;
        for (output, seed) in pairs.leaves() {
            engine.backward(output, seed, retain_graph, create_graph)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tensor_core::{DType, Shape};

    fn ragged() -> NestedTensor {
        NestedTensor::from_tensors(vec![
            Tensor::zeros(Shape::vector(2), DType::F32),
            Tensor::zeros(Shape::vector(1), DType::F32),
        ])
        .unwrap()
    }

    fn seed(nt: &NestedTensor, value: f64) -> NestedTensor {
        nt.apply(|t| Ok(Tensor::full(t.shape(), value, t.dtype())))
            .unwrap()
    }

    #[test]
    fn test_requires_grad() {
        let nt = ragged();
        assert!(!nt.requires_grad());
        nt.set_requires_grad(true);
        assert!(nt.requires_grad());
        assert!(nt.tensors().iter().all(Tensor::requires_grad));

        let empty = NestedTensor::from_tensors(vec![]).unwrap();
        assert!(!empty.requires_grad());
    }

    #[test]
    fn test_grad_defaults_to_zeros() {
        let nt = ragged();
        let g = nt.grad();
        assert_eq!(g.nested_size().flatten(), vec![vec![2], vec![1]]);
        assert!(g.tensors().iter().all(|t| t.to_vec().iter().all(|&v| v == 0.0)));
    }

    #[test]
    fn test_backward_accumulates() {
        let nt = ragged();
        nt.set_requires_grad(true);
        let ones = seed(&nt, 1.0);
        nt.backward(&AccumulateGrad, &ones, false, false).unwrap();
        nt.backward(&AccumulateGrad, &ones, false, false).unwrap();
        let g = nt.grad();
        assert_eq!(g.tensors()[0].to_vec(), vec![2.0, 2.0]);
        assert_eq!(g.tensors()[1].to_vec(), vec![2.0]);
    }

    #[test]
    fn test_backward_requires_grad() {
        let nt = ragged();
        let ones = seed(&nt, 1.0);
        assert!(matches!(
            nt.backward(&AccumulateGrad, &ones, false, false),
            Err(NestedError::Gradient(_))
        ));
    }

    #[test]
    fn test_backward_shape_mismatch() {
        let nt = ragged();
        nt.set_requires_grad(true);
        let other =
            NestedTensor::from_tensors(vec![Tensor::zeros(Shape::vector(2), DType::F32)]).unwrap();
        assert!(matches!(
            nt.backward(&AccumulateGrad, &other, false, false),
            Err(NestedError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_mismatched_backward_leaves_grads_untouched() {
        let nt = NestedTensor::from_nested(vec![
            NestedTensor::from_tensors(vec![Tensor::zeros(Shape::vector(2), DType::F32)]).unwrap(),
            NestedTensor::from_tensors(vec![Tensor::zeros(Shape::vector(1), DType::F32)]).unwrap(),
        ])
        .unwrap();
        nt.set_requires_grad(true);
        let ones = |len| Tensor::full(Shape::vector(len), 1.0, DType::F32);
        let wrong = NestedTensor::from_nested(vec![
            NestedTensor::from_tensors(vec![ones(2)]).unwrap(),
            NestedTensor::from_tensors(vec![ones(1), ones(1)]).unwrap(),
        ])
        .unwrap();

        assert!(matches!(
            nt.backward(&AccumulateGrad, &wrong, false, false),
            Err(NestedError::ShapeMismatch { .. })
        ));
        assert!(nt.tensors().iter().all(|t| t.grad().is_none()));
    }

    #[test]
    fn test_backward_leaf_shape_mismatch() {
        let nt = ragged();
        nt.set_requires_grad(true);
        let wrong = NestedTensor::from_tensors(vec![
            Tensor::zeros(Shape::vector(3), DType::F32),
            Tensor::zeros(Shape::vector(1), DType::F32),
        ])
        .unwrap();
        assert!(matches!(
            nt.backward(&AccumulateGrad, &wrong, false, false),
            Err(NestedError::Tensor(_))
        ));
    }
}
