// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The nested tensor type and its conversions to and from dense tensors.

use crate::dim::{self, SizeNode, SizeTree};
use crate::{wrap_dim, NestedError, NestedNode};
use tensor_core::{ops, DType, Shape, Tensor};

/// A ragged, tree-shaped collection of tensors presented as one tensor.
///
/// The first [`nested_dim`](Self::nested_dim) dimensions are tree levels and
/// the remaining [`tensor_dim`](Self::tensor_dim) dimensions are the axes of
/// the leaf tensors. All leaves share rank and dtype; their sizes may differ.
///
/// # Aliasing
/// The tree shape is immutable, but leaves are [`Tensor`] handles. Cloning a
/// nested tensor, [`unbind`](Self::unbind) and integer indexing all hand out
/// handles to the same leaf storage, so in-place updates through any of them
/// are visible through the original.
#[derive(Debug, Clone)]
pub struct NestedTensor {
    structure: NestedNode<Tensor>,
    tensor_dim: usize,
    dtype: DType,
}

impl NestedTensor {
    /// Wraps a tree of tensors.
    ///
    /// A tree without leaves gets `tensor_dim = 0` and the default dtype.
    ///
    /// # Errors
    /// - [`NestedError::NotNested`] if the root is a leaf.
    /// - [`NestedError::InconsistentLeaves`] if leaves differ in rank or dtype.
    pub fn new(structure: NestedNode<Tensor>) -> Result<Self, NestedError> {
        if structure.is_leaf() {
            return Err(NestedError::NotNested);
        }
        let leaves = structure.leaves();
        let (tensor_dim, dtype) = match leaves.first() {
            Some(first) => (first.rank(), first.dtype()),
            None => (0, DType::default()),
        };
        for (i, leaf) in leaves.iter().enumerate().skip(1) {
            if leaf.rank() != tensor_dim {
                return Err(NestedError::InconsistentLeaves(format!(
                    "leaf {i} has rank {}, expected {tensor_dim}",
                    leaf.rank()
                )));
            }
            if leaf.dtype() != dtype {
                return Err(NestedError::InconsistentLeaves(format!(
                    "leaf {i} has dtype {}, expected {dtype}",
                    leaf.dtype()
                )));
            }
        }
        tracing::trace!(
            nested_dim = structure.height(),
            tensor_dim,
            leaves = leaves.len(),
            "built nested tensor"
        );
        Ok(Self {
            structure,
            tensor_dim,
            dtype,
        })
    }

    /// Wraps a tree produced by a leaf-wise operation on a valid nested
    /// tensor. `tensor_dim` and `dtype` only matter when the tree has no
    /// leaves; otherwise they are read off the first leaf.
    pub(crate) fn from_parts(structure: NestedNode<Tensor>, tensor_dim: usize, dtype: DType) -> Self {
        let (tensor_dim, dtype) = match structure.leaves().first() {
            Some(first) => (first.rank(), first.dtype()),
            None => (tensor_dim, dtype),
        };
        Self {
            structure,
            tensor_dim,
            dtype,
        }
    }

    /// A nested tensor with one level of nesting over `tensors`.
    ///
    /// The tensors are taken as handles, not copied.
    ///
    /// # Examples
    /// ```
    /// use nested_tensor::NestedTensor;
    /// use tensor_core::{Shape, Tensor};
    ///
    /// let a = Tensor::from_f32(Shape::vector(2), &[1.0, 2.0]).unwrap();
    /// let b = Tensor::from_f32(Shape::vector(3), &[3.0, 4.0, 5.0]).unwrap();
    /// let nt = NestedTensor::from_tensors(vec![a, b]).unwrap();
    /// assert_eq!(nt.nested_dim(), 1);
    /// assert_eq!(nt.dim(), 2);
    /// assert_eq!(nt.len(), 2);
    /// ```
    pub fn from_tensors(tensors: Vec<Tensor>) -> Result<Self, NestedError> {
        let leaves = tensors.into_iter().map(NestedNode::leaf).collect();
        Self::new(NestedNode::internal(leaves)?)
    }

    /// A nested tensor one level deeper than each of `children`.
    ///
    /// When no child has leaves the result keeps the first child's
    /// `tensor_dim` and dtype.
    ///
    /// # Errors
    /// Returns [`NestedError::HeightMismatch`] if the children differ in
    /// nested dimension.
    pub fn from_nested(children: Vec<NestedTensor>) -> Result<Self, NestedError> {
        let (tensor_dim, dtype) = children
            .first()
            .map_or((0, DType::default()), |c| (c.tensor_dim, c.dtype));
        let nodes = children.into_iter().map(|c| c.structure).collect();
        Self::with_fallback(NestedNode::internal(nodes)?, tensor_dim, dtype)
    }

    /// Validates a rebuilt tree like [`new`](Self::new), but a tree without
    /// leaves takes `tensor_dim` and `dtype` from the caller.
    pub(crate) fn with_fallback(
        structure: NestedNode<Tensor>,
        tensor_dim: usize,
        dtype: DType,
    ) -> Result<Self, NestedError> {
        if structure.leaf_count() == 0 && !structure.is_leaf() {
            return Ok(Self::from_parts(structure, tensor_dim, dtype));
        }
        Self::new(structure)
    }

    /// Number of tree levels above the leaves.
    pub fn nested_dim(&self) -> usize {
        self.structure.height()
    }

    /// Rank of every leaf tensor.
    pub fn tensor_dim(&self) -> usize {
        self.tensor_dim
    }

    /// Total dimensionality, `nested_dim + tensor_dim`.
    pub fn dim(&self) -> usize {
        self.nested_dim() + self.tensor_dim
    }

    pub fn dtype(&self) -> DType {
        self.dtype
    }

    /// Number of entries along dimension 0.
    pub fn len(&self) -> usize {
        self.structure.degree()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn leaf_count(&self) -> usize {
        self.structure.leaf_count()
    }

    pub fn structure(&self) -> &NestedNode<Tensor> {
        &self.structure
    }

    pub fn into_structure(self) -> NestedNode<Tensor> {
        self.structure
    }

    /// Leaf tensor handles, depth-first.
    pub fn tensors(&self) -> Vec<Tensor> {
        self.structure.flatten()
    }

    /// Splits dimension 0 into its entries.
    ///
    /// With `nested_dim == 1` the entries are the leaf tensors themselves;
    /// otherwise they are nested tensors one level shallower. Either way the
    /// entries share leaf storage with `self`.
    pub fn unbind(&self) -> Vec<AnyTensor> {
        self.structure
            .unbind()
            .into_iter()
            .map(|child| self.wrap_child(child))
            .collect()
    }

    pub(crate) fn wrap_child(&self, child: NestedNode<Tensor>) -> AnyTensor {
        match child.into_payload() {
            Ok(tensor) => AnyTensor::Dense(tensor),
            Err(node) => AnyTensor::Nested(Self::from_parts(node, self.tensor_dim, self.dtype)),
        }
    }

    /// Size tuple of every leaf, in the shape of the tree.
    pub fn nested_size(&self) -> SizeNode {
        dim::nested_size(&self.structure)
    }

    /// Stride tuple of every leaf, in the shape of the tree.
    pub fn nested_stride(&self) -> SizeNode {
        dim::nested_stride(&self.structure)
    }

    /// Sizes along one global dimension, grouped by parent.
    ///
    /// # Examples
    /// ```
    /// use nested_tensor::NestedTensor;
    /// use tensor_core::{DType, Shape, Tensor};
    ///
    /// let nt = NestedTensor::from_tensors(vec![
    ///     Tensor::zeros(Shape::matrix(2, 4), DType::F32),
    ///     Tensor::zeros(Shape::matrix(3, 4), DType::F32),
    /// ])
    /// .unwrap();
    /// assert_eq!(nt.nested_size_at(0).unwrap().to_string(), "2");
    /// assert_eq!(nt.nested_size_at(1).unwrap().to_string(), "(2, 3)");
    /// assert_eq!(nt.nested_size_at(-1).unwrap().to_string(), "(4, 4)");
    /// ```
    pub fn nested_size_at(&self, dim: i64) -> Result<SizeTree, NestedError> {
        let dim = wrap_dim(dim, self.dim())?;
        dim::size_at(&self.nested_size(), dim)
    }

    /// Strides along one global dimension, grouped by parent. Tree levels
    /// report their degree.
    pub fn nested_stride_at(&self, dim: i64) -> Result<SizeTree, NestedError> {
        let dim = wrap_dim(dim, self.dim())?;
        dim::size_at(&self.nested_stride(), dim)
    }

    /// Per-dimension sizes; `None` marks a ragged dimension.
    pub fn sizes(&self) -> Vec<Option<usize>> {
        dim::regular_sizes(&self.nested_size(), self.dim())
    }

    /// Stacks a regular nested tensor into one dense tensor of rank `dim()`.
    ///
    /// # Errors
    /// Returns [`NestedError::Ragged`] naming the first irregular dimension.
    pub fn to_tensor(&self) -> Result<Tensor, NestedError> {
        let sizes = self.sizes();
        if self.leaf_count() == 0 {
            let dims = sizes.iter().map(|s| s.unwrap_or(0)).collect();
            return Ok(Tensor::zeros(Shape::new(dims), self.dtype));
        }
        if let Some(dim) = sizes.iter().position(Option::is_none) {
            return Err(NestedError::Ragged { dim });
        }
        self.structure.try_fold(
            |leaf, _| Ok(leaf.clone()),
            |children, _| Ok(ops::stack(&children, 0)?),
        )
    }

    /// Turns leading leaf axes into tree levels, up to and including global
    /// dimension `dim` (default: every dimension, leaving scalar leaves).
    ///
    /// When `dim` is already a tree level the tensor is returned unchanged.
    /// New leaves are copies selected out of the old ones and do not share
    /// their storage.
    pub fn to_nested_tensor(&self, dim: Option<i64>) -> Result<NestedTensor, NestedError> {
        let total = self.dim();
        let dim = match dim {
            Some(d) => wrap_dim(d, total)?,
            None => total.saturating_sub(1),
        };
        if dim < self.nested_dim() {
            return Ok(self.clone());
        }
        let levels = dim - self.nested_dim() + 1;
        tracing::debug!(dim, levels, "unbinding leaf axes into tree levels");
        let structure = self
            .structure
            .try_graft(levels, |leaf| unbind_levels(leaf, levels))?;
        Ok(Self::from_parts(
            structure,
            self.tensor_dim - levels,
            self.dtype,
        ))
    }
}

fn unbind_levels(tensor: &Tensor, levels: usize) -> Result<NestedNode<Tensor>, NestedError> {
    if levels == 0 {
        return Ok(NestedNode::leaf(tensor.clone()));
    }
    let len = tensor.shape().dim(0).unwrap_or(0);
    if len == 0 {
        return Ok(NestedNode::empty(levels));
    }
    let children = (0..len as i64)
        .map(|i| unbind_levels(&ops::select(tensor, 0, i)?, levels - 1))
        .collect::<Result<Vec<_>, _>>()?;
    NestedNode::internal(children)
}

/// Either a dense tensor or a nested tensor.
///
/// Indexing and unbinding can produce either, depending on how many tree
/// levels remain.
#[derive(Debug, Clone)]
pub enum AnyTensor {
    Dense(Tensor),
    Nested(NestedTensor),
}

impl AnyTensor {
    pub fn is_nested(&self) -> bool {
        matches!(self, AnyTensor::Nested(_))
    }

    pub fn dim(&self) -> usize {
        match self {
            AnyTensor::Dense(t) => t.rank(),
            AnyTensor::Nested(nt) => nt.dim(),
        }
    }

    pub fn as_dense(&self) -> Option<&Tensor> {
        match self {
            AnyTensor::Dense(t) => Some(t),
            AnyTensor::Nested(_) => None,
        }
    }

    pub fn as_nested(&self) -> Option<&NestedTensor> {
        match self {
            AnyTensor::Dense(_) => None,
            AnyTensor::Nested(nt) => Some(nt),
        }
    }

    /// The tree form: a leaf for a dense tensor, the structure otherwise.
    pub fn into_node(self) -> NestedNode<Tensor> {
        match self {
            AnyTensor::Dense(t) => NestedNode::leaf(t),
            AnyTensor::Nested(nt) => nt.structure,
        }
    }
}

impl From<Tensor> for AnyTensor {
    fn from(t: Tensor) -> Self {
        AnyTensor::Dense(t)
    }
}

impl From<NestedTensor> for AnyTensor {
    fn from(nt: NestedTensor) -> Self {
        AnyTensor::Nested(nt)
    }
}
