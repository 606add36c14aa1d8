// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The structural node: a recursive tree holding payloads at its leaves.
//!
//! ```text
//!            Internal (height 2, degree 2)
//!            /                       \
//!   Internal (h 1, d 2)        Internal (h 1, d 1)
//!     /          \                    |
//!  Leaf(a)     Leaf(b)             Leaf(c)
//! ```
//!
//! All leaves sit at the same depth; the constructor rejects children of
//! unequal height, so `height()` is the nesting depth of every leaf. Height is
//! cached at construction and `degree()` is the length of the child list, so
//! both are O(1).
//!
//! Nodes are immutable once built. Every transformation in
//! [`crate::traverse`] returns a new tree.

use crate::NestedError;

#[derive(Debug, Clone, PartialEq)]
enum NodeKind<T> {
    Leaf(T),
    Internal(Vec<NestedNode<T>>),
}

/// A tree whose leaves carry a payload `T`.
///
/// Instantiated with [`tensor_core::Tensor`] for nested tensors and with
/// `Vec<usize>` for their size and stride trees.
#[derive(Debug, Clone, PartialEq)]
pub struct NestedNode<T> {
    kind: NodeKind<T>,
    height: usize,
}

impl<T> NestedNode<T> {
    /// Creates a leaf (height 0).
    pub fn leaf(value: T) -> Self {
        Self {
            kind: NodeKind::Leaf(value),
            height: 0,
        }
    }

    /// Creates an internal node owning `children`.
    ///
    /// With no children the node has height 1.
    ///
    /// # Errors
    /// Returns [`NestedError::HeightMismatch`] if the children do not all have
    /// the same height.
    pub fn internal(children: Vec<NestedNode<T>>) -> Result<Self, NestedError> {
        let expected = children.first().map_or(0, NestedNode::height);
        if let Some((index, child)) = children
            .iter()
            .enumerate()
            .find(|(_, c)| c.height() != expected)
        {
            return Err(NestedError::HeightMismatch {
                index,
                expected,
                actual: child.height(),
            });
        }
        Ok(Self {
            kind: NodeKind::Internal(children),
            height: expected + 1,
        })
    }

    /// Creates an internal node with no children and an explicit height.
    ///
    /// Used where an empty group sits next to populated siblings, e.g. a
    /// zero-length axis that was unbound into tree levels.
    pub fn empty(height: usize) -> Self {
        Self {
            kind: NodeKind::Internal(Vec::new()),
            height: height.max(1),
        }
    }

    /// Builds an internal node whose height is already known to be consistent.
    pub(crate) fn from_children_unchecked(children: Vec<NestedNode<T>>, height: usize) -> Self {
        Self {
            kind: NodeKind::Internal(children),
            height,
        }
    }

    /// Returns `true` for a leaf.
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(_))
    }

    /// Number of direct children (0 for a leaf).
    pub fn degree(&self) -> usize {
        match &self.kind {
            NodeKind::Leaf(_) => 0,
            NodeKind::Internal(children) => children.len(),
        }
    }

    /// Depth of the subtree (0 for a leaf).
    pub fn height(&self) -> usize {
        self.height
    }

    /// The leaf payload, or `None` for an internal node.
    pub fn payload(&self) -> Option<&T> {
        match &self.kind {
            NodeKind::Leaf(value) => Some(value),
            NodeKind::Internal(_) => None,
        }
    }

    /// Consumes a leaf and returns its payload; an internal node is handed
    /// back unchanged.
    pub fn into_payload(self) -> Result<T, Self> {
        match self.kind {
            NodeKind::Leaf(value) => Ok(value),
            kind @ NodeKind::Internal(_) => Err(Self {
                kind,
                height: self.height,
            }),
        }
    }

    /// Direct children (empty for a leaf).
    pub fn children(&self) -> &[NestedNode<T>] {
        match &self.kind {
            NodeKind::Leaf(_) => &[],
            NodeKind::Internal(children) => children,
        }
    }

    /// Consumes an internal node and returns its children; a leaf returns
    /// itself as the only element.
    pub fn into_children(self) -> Vec<NestedNode<T>> {
        match self.kind {
            kind @ NodeKind::Leaf(_) => vec![Self { kind, height: 0 }],
            NodeKind::Internal(children) => children,
        }
    }
}
