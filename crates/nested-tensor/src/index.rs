// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Recursive indexing of nested and dense tensors.
//!
//! Keys at the tree level are limited to `None` (wrap one level deeper) and
//! integers (select one entry). Slices are only accepted once indexing has
//! reached a dense tensor.
//!
//! A tuple is resolved one key at a time. After an integer key the remaining
//! keys continue on the selected entry, so `t[(1, 0)]` is `t[1][0]`. After a
//! `None` key the remaining keys are applied to every entry of the wrapped
//! tensor and the results are reassembled into a new tree.

use crate::{AnyTensor, NestedError, NestedNode, NestedTensor};
use std::fmt;
use tensor_core::{ops, Slice, Tensor, TensorIndex};

/// One index key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexKey {
    /// Insert a new leading level (or axis).
    None,
    /// Select one entry; negative values count from the end.
    Int(i64),
    /// Select a range of a dense axis.
    Slice(Slice),
    /// Apply several keys positionally.
    Tuple(Vec<IndexKey>),
}

impl IndexKey {
    /// Name of the key kind, as reported by [`NestedError::InvalidIndexKey`].
    pub fn kind(&self) -> &'static str {
        match self {
            IndexKey::None => "None",
            IndexKey::Int(_) => "int",
            IndexKey::Slice(_) => "slice",
            IndexKey::Tuple(_) => "tuple",
        }
    }

    fn to_tensor_index(&self) -> Result<TensorIndex, NestedError> {
        match self {
            IndexKey::None => Ok(TensorIndex::NewAxis),
            IndexKey::Int(i) => Ok(TensorIndex::Select(*i)),
            IndexKey::Slice(s) => Ok(TensorIndex::Slice(*s)),
            IndexKey::Tuple(_) => Err(NestedError::InvalidIndexKey { kind: self.kind() }),
        }
    }
}

impl fmt::Display for IndexKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexKey::None => write!(f, "None"),
            IndexKey::Int(i) => write!(f, "{i}"),
            IndexKey::Slice(s) => write!(f, "{s}"),
            IndexKey::Tuple(keys) => {
                write!(f, "(")?;
                for (i, key) in keys.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}")?;
                }
                if keys.len() == 1 {
                    write!(f, ",")?;
                }
                write!(f, ")")
            }
        }
    }
}

impl From<i64> for IndexKey {
    fn from(i: i64) -> Self {
        IndexKey::Int(i)
    }
}

impl From<Slice> for IndexKey {
    fn from(s: Slice) -> Self {
        IndexKey::Slice(s)
    }
}

impl From<Vec<IndexKey>> for IndexKey {
    fn from(keys: Vec<IndexKey>) -> Self {
        IndexKey::Tuple(keys)
    }
}

/// Resolves `key` against `target`.
///
/// Integer keys on a nested tensor return the entry itself, sharing leaf
/// storage with `target`. Results of dense indexing own fresh storage.
///
/// # Errors
/// - [`NestedError::IndexOutOfRange`] for an integer outside `[-len, len)`.
/// - [`NestedError::UnsupportedDimension`] for a slice at the tree level.
/// - [`NestedError::InvalidIndexKey`] for a tuple nested inside a tuple.
pub fn get_item(target: &AnyTensor, key: &IndexKey) -> Result<AnyTensor, NestedError> {
    match key {
        IndexKey::Tuple(keys) => get_tuple(target, keys),
        single => get_single(target, single),
    }
}

fn get_single(target: &AnyTensor, key: &IndexKey) -> Result<AnyTensor, NestedError> {
    match (target, key) {
        (_, IndexKey::Tuple(_)) => Err(NestedError::InvalidIndexKey { kind: key.kind() }),
        (AnyTensor::Dense(t), key) => Ok(index_dense(t, std::slice::from_ref(key))?.into()),
        (AnyTensor::Nested(nt), IndexKey::None) => {
            Ok(NestedTensor::from_nested(vec![nt.clone()])?.into())
        }
        (AnyTensor::Nested(nt), IndexKey::Int(i)) => select_entry(nt, *i),
        (AnyTensor::Nested(nt), IndexKey::Slice(_)) => Err(NestedError::UnsupportedDimension {
            op: "slice",
            dim: 0,
            nested_dim: nt.nested_dim(),
        }),
    }
}

fn select_entry(nt: &NestedTensor, index: i64) -> Result<AnyTensor, NestedError> {
    let len = nt.len();
    let wrapped = if index < 0 { index + len as i64 } else { index };
    if wrapped < 0 || wrapped >= len as i64 {
        return Err(NestedError::IndexOutOfRange { index, len });
    }
    let child = nt.structure().children()[wrapped as usize].clone();
    Ok(nt.wrap_child(child))
}

fn index_dense(t: &Tensor, keys: &[IndexKey]) -> Result<Tensor, NestedError> {
    let indices = keys
        .iter()
        .map(IndexKey::to_tensor_index)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ops::index(t, &indices)?)
}

fn get_tuple(target: &AnyTensor, keys: &[IndexKey]) -> Result<AnyTensor, NestedError> {
    let Some((first, rest)) = keys.split_first() else {
        return Ok(target.clone());
    };
    if let IndexKey::Tuple(_) = first {
        return Err(NestedError::InvalidIndexKey { kind: first.kind() });
    }
    if let AnyTensor::Dense(t) = target {
        return Ok(index_dense(t, keys)?.into());
    }

    let resolved = get_single(target, first)?;
    if rest.is_empty() {
        return Ok(resolved);
    }
    match (&resolved, first) {
        (AnyTensor::Dense(_), _) | (AnyTensor::Nested(_), IndexKey::Int(_)) => {
            get_tuple(&resolved, rest)
        }
        (AnyTensor::Nested(nt), _) => {
            tracing::debug!(
                entries = nt.len(),
                remaining = rest.len(),
                "applying remaining keys to every entry"
            );
            let entries = nt
                .unbind()
                .iter()
                .map(|child| get_tuple(child, rest))
                .collect::<Result<Vec<_>, _>>()?;
            let (tensor_dim, dtype) = match entries.first() {
                Some(AnyTensor::Nested(entry)) => (entry.tensor_dim(), entry.dtype()),
                _ => (nt.tensor_dim(), nt.dtype()),
            };
            let children = entries.into_iter().map(AnyTensor::into_node).collect();
            let structure = NestedNode::internal(children)?;
            Ok(NestedTensor::with_fallback(structure, tensor_dim, dtype)?.into())
        }
    }
}

impl NestedTensor {
    /// Indexes this tensor; see [`get_item`].
    pub fn get(&self, key: impl Into<IndexKey>) -> Result<AnyTensor, NestedError> {
        get_item(&AnyTensor::Nested(self.clone()), &key.into())
    }
}

impl AnyTensor {
    /// Indexes this tensor; see [`get_item`].
    pub fn get(&self, key: impl Into<IndexKey>) -> Result<AnyTensor, NestedError> {
        get_item(self, &key.into())
    }
}
