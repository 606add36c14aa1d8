// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Dimension model: which global dimensions belong to the tree and which to
//! the leaves, and the size/stride trees that describe a nested tensor.
//!
//! A nested tensor with `nested_dim = 2` over rank-1 leaves has `dim = 3`:
//!
//! ```text
//! global dim   0          1            2
//!              tree lvl 0 tree lvl 1   leaf axis 0
//! ```

use crate::{NestedError, NestedNode};
use serde::Serialize;
use std::fmt;
use tensor_core::Tensor;

/// Per-leaf size or stride tuples, mirroring the shape of a nested tensor.
pub type SizeNode = NestedNode<Vec<usize>>;

/// Maps a possibly negative dimension into `[0, ndim)`.
///
/// # Errors
/// Returns [`NestedError::DimOutOfRange`] when `dim` is outside
/// `[-ndim, ndim)`.
///
/// # Examples
/// ```
/// use nested_tensor::wrap_dim;
/// assert_eq!(wrap_dim(-1, 4).unwrap(), 3);
/// assert!(wrap_dim(4, 4).is_err());
/// ```
pub fn wrap_dim(dim: i64, ndim: usize) -> Result<usize, NestedError> {
    let wrapped = if dim < 0 { dim + ndim as i64 } else { dim };
    if wrapped < 0 || wrapped >= ndim as i64 {
        return Err(NestedError::DimOutOfRange { dim, ndim });
    }
    Ok(wrapped as usize)
}

/// Classification of a wrapped global dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimKind {
    /// A tree level; ragged in general.
    Nested { level: usize },
    /// An axis of every leaf tensor.
    Tensor { leaf_dim: usize },
}

impl DimKind {
    pub fn is_nested(self) -> bool {
        matches!(self, DimKind::Nested { .. })
    }
}

/// Splits a wrapped global dimension at the tree/leaf boundary.
pub fn split_dim(dim: usize, nested_dim: usize) -> DimKind {
    if dim < nested_dim {
        DimKind::Nested { level: dim }
    } else {
        DimKind::Tensor {
            leaf_dim: dim - nested_dim,
        }
    }
}

/// Size tuple of every leaf.
pub fn nested_size(node: &NestedNode<Tensor>) -> SizeNode {
    node.map(|t| t.shape().dims().to_vec())
}

/// Row-major stride tuple of every leaf.
pub fn nested_stride(node: &NestedNode<Tensor>) -> SizeNode {
    node.map(Tensor::strides)
}

/// Sizes along one global dimension, grouped the way the tree groups them.
///
/// Displays like a python tuple: `(2, (3, 1))`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SizeTree {
    Size(usize),
    Group(Vec<SizeTree>),
}

impl fmt::Display for SizeTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeTree::Size(n) => write!(f, "{n}"),
            SizeTree::Group(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                if items.len() == 1 {
                    write!(f, ",")?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Resolves one wrapped global dimension against a size (or stride) tree.
///
/// Dimension 0 of an internal node is its degree. Deeper dimensions recurse
/// into every child with `dim - 1`, so a tree level yields the degree of each
/// node at that depth and a leaf dimension yields each leaf's entry, grouped
/// by parent.
///
/// # Errors
/// Returns [`NestedError::DimOutOfRange`] if `dim` runs past a leaf's tuple.
pub fn size_at(node: &SizeNode, dim: usize) -> Result<SizeTree, NestedError> {
    if let Some(sizes) = node.payload() {
        return sizes
            .get(dim)
            .map(|&n| SizeTree::Size(n))
            .ok_or(NestedError::DimOutOfRange {
                dim: dim as i64,
                ndim: sizes.len(),
            });
    }
    if dim == 0 {
        return Ok(SizeTree::Size(node.degree()));
    }
    node.children()
        .iter()
        .map(|child| size_at(child, dim - 1))
        .collect::<Result<Vec<_>, _>>()
        .map(SizeTree::Group)
}

/// Per-dimension size when every node (tree levels) or every leaf (leaf
/// axes) agrees on it, `None` where the dimension is ragged. The result has
/// `ndim` entries.
pub fn regular_sizes(node: &SizeNode, ndim: usize) -> Vec<Option<usize>> {
    let mut sizes = node.fold(
        |leaf, _| leaf.iter().map(|&n| Some(n)).collect::<Vec<_>>(),
        |children, _| {
            let degree = children.len();
            let merged = children.into_iter().reduce(merge_sizes).unwrap_or_default();
            std::iter::once(Some(degree)).chain(merged).collect()
        },
    );
    sizes.resize(ndim, None);
    sizes
}

fn merge_sizes(a: Vec<Option<usize>>, b: Vec<Option<usize>>) -> Vec<Option<usize>> {
    let len = a.len().max(b.len());
    (0..len)
        .map(|i| match (a.get(i).copied(), b.get(i).copied()) {
            (Some(x), Some(y)) if x == y => x,
            (Some(_), Some(_)) => None,
            (Some(x), None) | (None, Some(x)) => x,
            (None, None) => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tensor_core::{DType, Shape};

    fn sizes(children: Vec<SizeNode>) -> SizeNode {
        NestedNode::internal(children).unwrap()
    }

    /// `[[[2, 3], [1, 3]], [[4, 3]]]`
    fn sample() -> SizeNode {
        sizes(vec![
            sizes(vec![NestedNode::leaf(vec![2, 3]), NestedNode::leaf(vec![1, 3])]),
            sizes(vec![NestedNode::leaf(vec![4, 3])]),
        ])
    }

    #[test]
    fn test_wrap_dim() {
        assert_eq!(wrap_dim(-1, 4).unwrap(), 3);
        assert_eq!(wrap_dim(0, 4).unwrap(), 0);
        assert_eq!(wrap_dim(-4, 4).unwrap(), 0);
        assert_eq!(
            wrap_dim(4, 4).unwrap_err(),
            NestedError::DimOutOfRange { dim: 4, ndim: 4 }
        );
        assert!(wrap_dim(-5, 4).is_err());
        assert!(wrap_dim(0, 0).is_err());
    }

    #[test]
    fn test_split_dim() {
        assert_eq!(split_dim(0, 2), DimKind::Nested { level: 0 });
        assert_eq!(split_dim(1, 2), DimKind::Nested { level: 1 });
        assert_eq!(split_dim(2, 2), DimKind::Tensor { leaf_dim: 0 });
        assert_eq!(split_dim(3, 2), DimKind::Tensor { leaf_dim: 1 });
        assert!(split_dim(1, 2).is_nested());
    }

    #[test]
    fn test_nested_size_and_stride() {
        let a = Tensor::zeros(Shape::matrix(2, 3), DType::F32);
        let b = Tensor::zeros(Shape::matrix(1, 3), DType::F32);
        let node = NestedNode::internal(vec![NestedNode::leaf(a), NestedNode::leaf(b)]).unwrap();
        assert_eq!(nested_size(&node).flatten(), vec![vec![2, 3], vec![1, 3]]);
        assert_eq!(nested_stride(&node).flatten(), vec![vec![3, 1], vec![3, 1]]);
    }

    #[test]
    fn test_size_at_levels() {
        let tree = sample();
        assert_eq!(size_at(&tree, 0).unwrap(), SizeTree::Size(2));
        assert_eq!(size_at(&tree, 1).unwrap().to_string(), "(2, 1)");
        assert_eq!(size_at(&tree, 2).unwrap().to_string(), "((2, 1), (4,))");
        assert_eq!(size_at(&tree, 3).unwrap().to_string(), "((3, 3), (3,))");
        assert!(size_at(&tree, 4).is_err());
    }

    #[test]
    fn test_size_tree_json() {
        let tree = size_at(&sample(), 2).unwrap();
        assert_eq!(serde_json::to_string(&tree).unwrap(), "[[2,1],[4]]");
    }

    #[test]
    fn test_regular_sizes() {
        assert_eq!(
            regular_sizes(&sample(), 4),
            vec![Some(2), None, None, Some(3)]
        );

        let regular = sizes(vec![NestedNode::leaf(vec![3]), NestedNode::leaf(vec![3])]);
        assert_eq!(regular_sizes(&regular, 2), vec![Some(2), Some(3)]);
    }

    #[test]
    fn test_regular_sizes_with_empty_groups() {
        let tree = sizes(vec![NestedNode::empty(1), NestedNode::empty(1)]);
        assert_eq!(regular_sizes(&tree, 2), vec![Some(2), Some(0)]);

        let empty: SizeNode = NestedNode::empty(1);
        assert_eq!(regular_sizes(&empty, 1), vec![Some(0)]);
    }
}
