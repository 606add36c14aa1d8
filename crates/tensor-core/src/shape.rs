// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Shapes: per-axis lengths of a dense tensor.

use crate::TensorError;
use std::fmt;

/// Axis lengths of a [`crate::Tensor`], outermost first.
///
/// A rank-0 shape describes a scalar and holds one element. Any zero length
/// makes the shape empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Shape {
    dims: Vec<usize>,
}

impl Shape {
    /// # Examples
    /// ```
    /// use tensor_core::Shape;
    /// let s = Shape::new(vec![2, 0, 4]);
    /// assert_eq!(s.rank(), 3);
    /// assert_eq!(s.num_elements(), 0);
    /// ```
    pub fn new(dims: Vec<usize>) -> Self {
        Self { dims }
    }

    pub fn scalar() -> Self {
        Self::new(Vec::new())
    }

    pub fn vector(len: usize) -> Self {
        Self::new(vec![len])
    }

    pub fn matrix(rows: usize, cols: usize) -> Self {
        Self::new(vec![rows, cols])
    }

    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// Product of all lengths (1 for a scalar).
    pub fn num_elements(&self) -> usize {
        self.dims.iter().product()
    }

    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Length of axis `index`, if the shape has that many axes.
    pub fn dim(&self, index: usize) -> Option<usize> {
        self.dims.get(index).copied()
    }

    /// Row-major strides in elements; the last axis has stride 1.
    pub fn strides(&self) -> Vec<usize> {
        let mut strides: Vec<usize> = self
            .dims
            .iter()
            .rev()
            .scan(1, |step, &len| {
                let stride = *step;
                *step *= len;
                Some(stride)
            })
            .collect();
        strides.reverse();
        strides
    }

    /// Maps a possibly negative axis into `[0, rank)`.
    ///
    /// A scalar accepts `0` and `-1`, both naming the scalar itself.
    pub fn axis(&self, op: &'static str, axis: i64) -> Result<usize, TensorError> {
        let rank = self.rank().max(1) as i64;
        let wrapped = if axis < 0 { axis + rank } else { axis };
        if !(0..rank).contains(&wrapped) {
            return Err(TensorError::AxisOutOfRange {
                op,
                axis,
                rank: self.rank(),
            });
        }
        Ok(wrapped as usize)
    }

    /// Shape two operands broadcast to, or `None` when some pair of
    /// right-aligned lengths differs with neither equal to 1.
    pub fn broadcast_with(&self, other: &Shape) -> Option<Shape> {
        let rank = self.rank().max(other.rank());
        let padded = |s: &Shape| {
            std::iter::repeat(1)
                .take(rank - s.rank())
                .chain(s.dims.iter().copied())
                .collect::<Vec<_>>()
        };
        let dims = padded(self)
            .into_iter()
            .zip(padded(other))
            .map(|(a, b)| match (a, b) {
                _ if a == b => Some(a),
                (1, n) | (n, 1) => Some(n),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()?;
        Some(Shape::new(dims))
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dims: Vec<String> = self.dims.iter().map(usize::to_string).collect();
        write!(f, "[{}]", dims.join(", "))
    }
}

impl From<&[usize]> for Shape {
    fn from(dims: &[usize]) -> Self {
        Self::new(dims.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar() {
        let s = Shape::scalar();
        assert_eq!(s.rank(), 0);
        assert_eq!(s.num_elements(), 1);
        assert!(s.strides().is_empty());
    }

    #[test]
    fn test_zero_length_axis() {
        assert_eq!(Shape::matrix(3, 0).num_elements(), 0);
        assert_eq!(Shape::matrix(3, 0).strides(), vec![0, 1]);
    }

    #[test]
    fn test_strides() {
        assert_eq!(Shape::matrix(3, 4).strides(), vec![4, 1]);
        assert_eq!(Shape::new(vec![2, 3, 4]).strides(), vec![12, 4, 1]);
        assert_eq!(Shape::vector(7).strides(), vec![1]);
    }

    #[test]
    fn test_axis_wrapping() {
        let s = Shape::new(vec![2, 3, 4]);
        assert_eq!(s.axis("t", -1).unwrap(), 2);
        assert_eq!(s.axis("t", 0).unwrap(), 0);
        assert!(matches!(
            s.axis("t", 3),
            Err(TensorError::AxisOutOfRange { axis: 3, rank: 3, .. })
        ));
        assert!(s.axis("t", -4).is_err());
        assert_eq!(Shape::scalar().axis("t", -1).unwrap(), 0);
    }

    #[test]
    fn test_broadcast_with() {
        let a = Shape::new(vec![3, 1]);
        let b = Shape::vector(4);
        assert_eq!(a.broadcast_with(&b), Some(Shape::matrix(3, 4)));
        assert_eq!(b.broadcast_with(&a), Some(Shape::matrix(3, 4)));
        assert_eq!(Shape::scalar().broadcast_with(&b), Some(b.clone()));
        assert_eq!(Shape::vector(2).broadcast_with(&b), None);
        assert_eq!(
            Shape::matrix(1, 3).broadcast_with(&Shape::matrix(4, 2)),
            None
        );
    }

    #[test]
    fn test_display_and_from_slice() {
        let s = Shape::from(&[2usize, 3, 4][..]);
        assert_eq!(s.to_string(), "[2, 3, 4]");
        assert_eq!(Shape::scalar().to_string(), "[]");
    }
}
