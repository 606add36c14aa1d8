// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Basic (non-advanced) indexing: integer selection, slicing, new axes.
//!
//! Results always own fresh storage.

use crate::{Tensor, TensorError};
use ndarray::{ArrayD, Axis};
use std::fmt;

/// A `start:stop:step` range with python-style bounds.
///
/// Missing bounds default to the ends of the axis, negative bounds count from
/// the end and out-of-range bounds are clamped. Only positive steps are
/// supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slice {
    pub start: Option<i64>,
    pub stop: Option<i64>,
    pub step: i64,
}

impl Slice {
    pub fn new(start: Option<i64>, stop: Option<i64>, step: i64) -> Self {
        Self { start, stop, step }
    }

    /// `:`, the whole axis.
    pub fn full() -> Self {
        Self::new(None, None, 1)
    }

    /// `start:stop`.
    pub fn range(start: i64, stop: i64) -> Self {
        Self::new(Some(start), Some(stop), 1)
    }

    /// Resolves the slice against an axis of length `len`, returning
    /// `(start, stop, step)` with `start <= stop <= len`.
    ///
    /// # Errors
    /// Returns [`TensorError::InvalidSlice`] for a step that is not positive.
    pub fn indices(&self, len: usize) -> Result<(usize, usize, usize), TensorError> {
        if self.step <= 0 {
            return Err(TensorError::InvalidSlice {
                detail: format!("step must be positive, got {}", self.step),
            });
        }
        let len = len as i64;
        let clamp = |bound: Option<i64>, default: i64| match bound {
            None => default,
            Some(b) if b < 0 => (b + len).max(0),
            Some(b) => b.min(len),
        };
        let start = clamp(self.start, 0);
        let stop = clamp(self.stop, len).max(start);
        Ok((start as usize, stop as usize, self.step as usize))
    }
}

impl fmt::Display for Slice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(start) = self.start {
            write!(f, "{start}")?;
        }
        write!(f, ":")?;
        if let Some(stop) = self.stop {
            write!(f, "{stop}")?;
        }
        if self.step != 1 {
            write!(f, ":{}", self.step)?;
        }
        Ok(())
    }
}

/// One entry of a multi-axis index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TensorIndex {
    /// Select one position; the axis is removed.
    Select(i64),
    /// Keep a range of positions along the axis.
    Slice(Slice),
    /// Insert a new axis of length 1.
    NewAxis,
}

fn wrap_index(axis: usize, index: i64, size: usize) -> Result<usize, TensorError> {
    let wrapped = if index < 0 { index + size as i64 } else { index };
    if wrapped < 0 || wrapped >= size as i64 {
        return Err(TensorError::IndexOutOfRange { axis, index, size });
    }
    Ok(wrapped as usize)
}

fn slice_array(data: ArrayD<f64>, axis: usize, slice: &Slice) -> Result<ArrayD<f64>, TensorError> {
    let (start, stop, step) = slice.indices(data.len_of(Axis(axis)))?;
    let range = ndarray::Slice::new(start as isize, Some(stop as isize), step as isize);
    Ok(data.slice_axis(Axis(axis), range).to_owned())
}

/// Selects position `index` along `dim`, removing that axis.
///
/// # Errors
/// Returns [`TensorError::IndexOutOfRange`] when `index` is outside
/// `[-size, size)`.
pub fn select(input: &Tensor, dim: i64, index: i64) -> Result<Tensor, TensorError> {
    let shape = input.shape();
    if shape.rank() == 0 {
        return Err(TensorError::TooManyIndices { given: 1, rank: 0 });
    }
    let axis = shape.axis("select", dim)?;
    let size = shape.dims()[axis];
    let position = wrap_index(axis, index, size)?;
    let data = input.with_array(|a| a.index_axis(Axis(axis), position).to_owned());
    Ok(Tensor::from_array(data, input.dtype()))
}

/// Slices `dim` with python semantics; the axis is kept.
pub fn slice(input: &Tensor, dim: i64, range: &Slice) -> Result<Tensor, TensorError> {
    let shape = input.shape();
    if shape.rank() == 0 {
        return Err(TensorError::TooManyIndices { given: 1, rank: 0 });
    }
    let axis = shape.axis("slice", dim)?;
    let data = slice_array(input.to_array(), axis, range)?;
    Ok(Tensor::from_array(data, input.dtype()))
}

/// Applies `indices` positionally, left to right, starting at axis 0.
///
/// Trailing axes that are not indexed are kept whole.
///
/// # Errors
/// Returns [`TensorError::TooManyIndices`] when more axes are consumed than
/// the tensor has, or the errors of [`select`] and [`slice`].
pub fn index(input: &Tensor, indices: &[TensorIndex]) -> Result<Tensor, TensorError> {
    let rank = input.rank();
    let consumed = indices
        .iter()
        .filter(|k| !matches!(k, TensorIndex::NewAxis))
        .count();
    if consumed > rank {
        return Err(TensorError::TooManyIndices {
            given: consumed,
            rank,
        });
    }

    let mut data = input.to_array();
    let mut axis = 0;
    // Axis of the *input* each key refers to, for error reporting.
    let mut source_axis = 0;
    for key in indices {
        match key {
            TensorIndex::Select(i) => {
                let size = data.len_of(Axis(axis));
                let position = wrap_index(source_axis, *i, size)?;
                data = data.index_axis_move(Axis(axis), position);
                source_axis += 1;
            }
            TensorIndex::Slice(s) => {
                data = slice_array(data, axis, s)?;
                axis += 1;
                source_axis += 1;
            }
            TensorIndex::NewAxis => {
                data = data.insert_axis(Axis(axis));
                axis += 1;
            }
        }
    }
    Ok(Tensor::from_array(data, input.dtype()))
}
