// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Operation lifters: dense tensor operations applied across a nested tensor.
//!
//! Dimension arguments are global. Each one is wrapped against
//! [`NestedTensor::dim`], rejected when it names a tree level, and translated
//! to a leaf axis before the dense operation is mapped over every leaf.
//!
//! | Operation | Kind | Result |
//! |-----------|------|--------|
//! | `cumsum`, `softmax` | single leaf dim | nested, same shape |
//! | `sum_dims`, `mean_dims` | list of leaf dims | nested, reduced leaves |
//! | `sum`, `mean`, `prod` | every dim | dense |
//! | `gelu`, `apply` | unary | nested, same shape |
//! | `add`, `mul` | binary, leaf-wise broadcast | nested |

mod pointwise;
mod reduce;

use crate::dim::{split_dim, DimKind};
use crate::{wrap_dim, NestedError, NestedTensor};

/// Translates global dimensions into leaf axes.
///
/// # Errors
/// - [`NestedError::DimOutOfRange`] for a dimension outside `[-dim, dim)`.
/// - [`NestedError::UnsupportedDimension`] for a tree dimension.
pub(crate) fn leaf_dims(
    op: &'static str,
    nt: &NestedTensor,
    dims: &[i64],
) -> Result<Vec<i64>, NestedError> {
    let nested_dim = nt.nested_dim();
    dims.iter()
        .map(|&dim| {
            let wrapped = wrap_dim(dim, nt.dim())?;
            match split_dim(wrapped, nested_dim) {
                DimKind::Nested { .. } => Err(NestedError::UnsupportedDimension {
                    op,
                    dim: wrapped,
                    nested_dim,
                }),
                DimKind::Tensor { leaf_dim } => {
                    tracing::debug!(op, dim, leaf_dim, nested_dim, "lifting to leaf dimension");
                    Ok(leaf_dim as i64)
                }
            }
        })
        .collect()
}

pub(crate) fn leaf_dim(op: &'static str, nt: &NestedTensor, dim: i64) -> Result<i64, NestedError> {
    Ok(leaf_dims(op, nt, &[dim])?[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use tensor_core::{DType, Shape, Tensor};

    fn nested() -> NestedTensor {
        let leaf = || Tensor::zeros(Shape::matrix(2, 3), DType::F32);
        let inner = || NestedTensor::from_tensors(vec![leaf(), leaf()]).unwrap();
        NestedTensor::from_nested(vec![inner(), inner()]).unwrap()
    }

    #[test]
    fn test_leaf_dims_translation() {
        let nt = nested();
        assert_eq!(leaf_dims("t", &nt, &[2, 3]).unwrap(), vec![0, 1]);
        assert_eq!(leaf_dims("t", &nt, &[-1]).unwrap(), vec![1]);
        assert_eq!(leaf_dim("t", &nt, -2).unwrap(), 0);
    }

    #[test]
    fn test_leaf_dims_rejects_tree_dims() {
        let nt = nested();
        for dim in [0, 1, -4, -3] {
            assert!(matches!(
                leaf_dims("t", &nt, &[dim]),
                Err(NestedError::UnsupportedDimension { op: "t", nested_dim: 2, .. })
            ));
        }
        assert_eq!(
            leaf_dims("t", &nt, &[4]).unwrap_err(),
            NestedError::DimOutOfRange { dim: 4, ndim: 4 }
        );
    }
}
