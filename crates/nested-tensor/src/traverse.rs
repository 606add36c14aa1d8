// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Traversal primitives over [`NestedNode`].
//!
//! These are the only functions in the crate that recurse over a tree by hand;
//! the dimension model, the lifters, indexing and display are all written in
//! terms of `map`, `zip_map`, `flatten`, `unbind` and `fold`.
//!
//! Every traversal visits leaves depth-first, left to right. Mapped trees keep
//! the height of the input, including the height of empty internal nodes.

use crate::{NestedError, NestedNode};

impl<T> NestedNode<T> {
    /// Returns an isomorphic tree with every leaf replaced by `f(leaf)`.
    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> NestedNode<U> {
        self.map_with(&mut f)
    }

    fn map_with<U, F: FnMut(&T) -> U>(&self, f: &mut F) -> NestedNode<U> {
        match self.payload() {
            Some(value) => NestedNode::leaf(f(value)),
            None => {
                let children = self.children().iter().map(|c| c.map_with(f)).collect();
                NestedNode::from_children_unchecked(children, self.height())
            }
        }
    }

    /// Like [`map`](Self::map) for a fallible closure; stops at the first
    /// error.
    pub fn try_map<U, E>(
        &self,
        mut f: impl FnMut(&T) -> Result<U, E>,
    ) -> Result<NestedNode<U>, E> {
        self.try_map_with(&mut f)
    }

    fn try_map_with<U, E, F>(&self, f: &mut F) -> Result<NestedNode<U>, E>
    where
        F: FnMut(&T) -> Result<U, E>,
    {
        match self.payload() {
            Some(value) => Ok(NestedNode::leaf(f(value)?)),
            None => {
                let children = self
                    .children()
                    .iter()
                    .map(|c| c.try_map_with(f))
                    .collect::<Result<Vec<_>, E>>()?;
                Ok(NestedNode::from_children_unchecked(children, self.height()))
            }
        }
    }

    /// Maps two structurally matching trees leaf by leaf.
    ///
    /// # Errors
    /// Returns [`NestedError::ShapeMismatch`] when the trees differ in degree
    /// at some corresponding node, or a leaf meets an internal node.
    pub fn zip_map<U, V>(
        &self,
        other: &NestedNode<U>,
        mut f: impl FnMut(&T, &U) -> V,
    ) -> Result<NestedNode<V>, NestedError> {
        self.try_zip_map(other, |a, b| Ok::<_, NestedError>(f(a, b)))
    }

    /// Fallible [`zip_map`](Self::zip_map). Structural mismatches are
    /// reported through `E: From<NestedError>`.
    pub fn try_zip_map<U, V, E>(
        &self,
        other: &NestedNode<U>,
        mut f: impl FnMut(&T, &U) -> Result<V, E>,
    ) -> Result<NestedNode<V>, E>
    where
        E: From<NestedError>,
    {
        self.try_zip_with(other, &mut f)
    }

    fn try_zip_with<U, V, E, F>(&self, other: &NestedNode<U>, f: &mut F) -> Result<NestedNode<V>, E>
    where
        E: From<NestedError>,
        F: FnMut(&T, &U) -> Result<V, E>,
    {
        check_same_kind("zip_map", self, other)?;
        match (self.payload(), other.payload()) {
            (Some(a), Some(b)) => Ok(NestedNode::leaf(f(a, b)?)),
            _ => {
                let children = self
                    .children()
                    .iter()
                    .zip(other.children())
                    .map(|(a, b)| a.try_zip_with(b, f))
                    .collect::<Result<Vec<_>, E>>()?;
                Ok(NestedNode::from_children_unchecked(children, self.height()))
            }
        }
    }

    /// Returns every leaf value, depth-first and left to right.
    pub fn flatten(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.leaves().into_iter().cloned().collect()
    }

    /// Borrows every leaf value, depth-first and left to right.
    pub fn leaves(&self) -> Vec<&T> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a T>) {
        match self.payload() {
            Some(value) => out.push(value),
            None => self.children().iter().for_each(|c| c.collect_leaves(out)),
        }
    }

    /// Number of leaves in the tree.
    pub fn leaf_count(&self) -> usize {
        match self.payload() {
            Some(_) => 1,
            None => self.children().iter().map(NestedNode::leaf_count).sum(),
        }
    }

    /// Returns the direct children of an internal node.
    ///
    /// On a leaf this is a no-op returning the leaf itself. Cloning a child
    /// clones its payloads; for [`tensor_core::Tensor`] payloads that is a
    /// handle copy, so the returned children alias the parent's leaf storage.
    pub fn unbind(&self) -> Vec<NestedNode<T>>
    where
        T: Clone,
    {
        if self.is_leaf() {
            return vec![self.clone()];
        }
        self.children().to_vec()
    }

    /// Bottom-up fold. `leaf` sees each payload with its depth from the root;
    /// `internal` sees the folded children of each internal node with its
    /// depth.
    pub fn fold<R>(
        &self,
        mut leaf: impl FnMut(&T, usize) -> R,
        mut internal: impl FnMut(Vec<R>, usize) -> R,
    ) -> R {
        self.fold_with(0, &mut leaf, &mut internal)
    }

    fn fold_with<R, L, I>(&self, depth: usize, leaf: &mut L, internal: &mut I) -> R
    where
        L: FnMut(&T, usize) -> R,
        I: FnMut(Vec<R>, usize) -> R,
    {
        match self.payload() {
            Some(value) => leaf(value, depth),
            None => {
                let folded = self
                    .children()
                    .iter()
                    .map(|c| c.fold_with(depth + 1, leaf, internal))
                    .collect();
                internal(folded, depth)
            }
        }
    }

    /// Fallible [`fold`](Self::fold).
    pub fn try_fold<R, E>(
        &self,
        mut leaf: impl FnMut(&T, usize) -> Result<R, E>,
        mut internal: impl FnMut(Vec<R>, usize) -> Result<R, E>,
    ) -> Result<R, E> {
        self.try_fold_with(0, &mut leaf, &mut internal)
    }

    fn try_fold_with<R, E, L, I>(&self, depth: usize, leaf: &mut L, internal: &mut I) -> Result<R, E>
    where
        L: FnMut(&T, usize) -> Result<R, E>,
        I: FnMut(Vec<R>, usize) -> Result<R, E>,
    {
        match self.payload() {
            Some(value) => leaf(value, depth),
            None => {
                let folded = self
                    .children()
                    .iter()
                    .map(|c| c.try_fold_with(depth + 1, leaf, internal))
                    .collect::<Result<Vec<_>, E>>()?;
                internal(folded, depth)
            }
        }
    }

    /// Replaces every leaf with the subtree `f(leaf)`, which must be
    /// `added_height` levels deep. Empty internal nodes grow by the same
    /// amount.
    pub fn try_graft<U, E>(
        &self,
        added_height: usize,
        mut f: impl FnMut(&T) -> Result<NestedNode<U>, E>,
    ) -> Result<NestedNode<U>, E>
    where
        E: From<NestedError>,
    {
        self.try_graft_with(added_height, &mut f)
    }

    fn try_graft_with<U, E, F>(&self, added_height: usize, f: &mut F) -> Result<NestedNode<U>, E>
    where
        E: From<NestedError>,
        F: FnMut(&T) -> Result<NestedNode<U>, E>,
    {
        match self.payload() {
            Some(value) => f(value),
            None if self.degree() == 0 => Ok(NestedNode::empty(self.height() + added_height)),
            None => {
                let children = self
                    .children()
                    .iter()
                    .map(|c| c.try_graft_with(added_height, f))
                    .collect::<Result<Vec<_>, E>>()?;
                Ok(NestedNode::internal(children)?)
            }
        }
    }

    /// Returns `true` when both trees have the same degree at every
    /// corresponding node and leaves in the same places.
    pub fn shape_matches<U>(&self, other: &NestedNode<U>) -> bool {
        check_same_kind("shape_matches", self, other).is_ok()
            && self
                .children()
                .iter()
                .zip(other.children())
                .all(|(a, b)| a.shape_matches(b))
    }
}

fn check_same_kind<T, U>(
    op: &'static str,
    lhs: &NestedNode<T>,
    rhs: &NestedNode<U>,
) -> Result<(), NestedError> {
    if lhs.is_leaf() != rhs.is_leaf() || lhs.degree() != rhs.degree() {
        return Err(NestedError::ShapeMismatch {
            op,
            expected: lhs.degree(),
            actual: rhs.degree(),
        });
    }
    Ok(())
}

/// Maps any number of structurally matching trees leaf by leaf.
///
/// `f` receives the corresponding leaves of every tree, in argument order.
///
/// # Errors
/// Returns [`NestedError::InvalidInput`] for an empty list and
/// [`NestedError::ShapeMismatch`] when any tree differs from the first.
pub fn map_all<T, U>(
    nodes: &[&NestedNode<T>],
    mut f: impl FnMut(&[&T]) -> U,
) -> Result<NestedNode<U>, NestedError> {
    let first = nodes
        .first()
        .ok_or_else(|| NestedError::InvalidInput("map_all needs at least one tree".into()))?;
    for node in &nodes[1..] {
        check_same_kind("map_all", *first, *node)?;
    }
    map_all_with(nodes, &mut f)
}

fn map_all_with<T, U, F>(nodes: &[&NestedNode<T>], f: &mut F) -> Result<NestedNode<U>, NestedError>
where
    F: FnMut(&[&T]) -> U,
{
    let first = nodes[0];
    if first.is_leaf() {
        let payloads: Vec<&T> = nodes.iter().filter_map(|n| n.payload()).collect();
        return Ok(NestedNode::leaf(f(&payloads)));
    }
    let mut children = Vec::with_capacity(first.degree());
    for i in 0..first.degree() {
        let column: Vec<&NestedNode<T>> = nodes.iter().map(|n| &n.children()[i]).collect();
        for node in &column[1..] {
            check_same_kind("map_all", column[0], *node)?;
        }
        children.push(map_all_with(&column, f)?);
    }
    Ok(NestedNode::from_children_unchecked(children, first.height()))
}
