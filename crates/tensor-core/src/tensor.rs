// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Core tensor type.

use crate::{DType, Shape, TensorError};
use ndarray::{ArrayD, IxDyn};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Storage shared by every handle to the same tensor.
struct Storage {
    data: ArrayD<f64>,
    dtype: DType,
    requires_grad: bool,
    grad: Option<ArrayD<f64>>,
}

/// An n-dimensional tensor backed by an `ndarray::ArrayD<f64>`.
///
/// # Aliasing
/// `Tensor` is a *handle*. `clone()` is cheap and returns another handle to
/// the same storage, so in-place updates ([`fill`](Tensor::fill),
/// [`map_inplace`](Tensor::map_inplace), gradient accumulation) made through
/// one handle are visible through all of them. Operations in [`crate::ops`]
/// never mutate their inputs; they return tensors with fresh storage. Use
/// [`deep_clone`](Tensor::deep_clone) to detach a copy.
///
/// # Element Type
/// Values are stored as `f64` and rounded to [`DType`] on construction, so an
/// `i64` tensor only ever holds integral values.
#[derive(Clone)]
pub struct Tensor {
    inner: Arc<RwLock<Storage>>,
}

impl Tensor {
    /// Wraps an `ndarray` array, rounding every element to `dtype`.
    pub fn from_array(data: ArrayD<f64>, dtype: DType) -> Self {
        let data = if dtype == DType::F64 {
            data.as_standard_layout().into_owned()
        } else {
            data.mapv(|v| dtype.cast(v))
        };
        Self {
            inner: Arc::new(RwLock::new(Storage {
                data,
                dtype,
                requires_grad: false,
                grad: None,
            })),
        }
    }

    /// Creates a tensor from row-major values.
    ///
    /// # Examples
    /// ```
    /// use tensor_core::{DType, Shape, Tensor};
    /// let t = Tensor::from_vec(Shape::matrix(2, 2), vec![1.0, 2.0, 3.0, 4.0], DType::F64).unwrap();
    /// assert_eq!(t.to_vec(), vec![1.0, 2.0, 3.0, 4.0]);
    /// ```
    pub fn from_vec(shape: Shape, values: Vec<f64>, dtype: DType) -> Result<Self, TensorError> {
        let expected = shape.num_elements();
        if values.len() != expected {
            return Err(TensorError::BufferSizeMismatch {
                expected,
                actual: values.len(),
            });
        }
        let data = ArrayD::from_shape_vec(IxDyn(shape.dims()), values).map_err(|_| {
            TensorError::BufferSizeMismatch {
                expected,
                actual: expected,
            }
        })?;
        Ok(Self::from_array(data, dtype))
    }

    /// Creates an `F32` tensor from a slice of `f32` values.
    ///
    /// # Examples
    /// ```
    /// use tensor_core::{Tensor, Shape};
    /// let t = Tensor::from_f32(Shape::vector(3), &[1.0, 2.0, 3.0]).unwrap();
    /// assert_eq!(t.to_vec(), vec![1.0, 2.0, 3.0]);
    /// ```
    pub fn from_f32(shape: Shape, values: &[f32]) -> Result<Self, TensorError> {
        let values = values.iter().map(|&v| v as f64).collect();
        Self::from_vec(shape, values, DType::F32)
    }

    /// Creates an `I64` tensor from a slice of `i64` values.
    pub fn from_i64(shape: Shape, values: &[i64]) -> Result<Self, TensorError> {
        let values = values.iter().map(|&v| v as f64).collect();
        Self::from_vec(shape, values, DType::I64)
    }

    /// Creates a tensor filled with `value`.
    pub fn full(shape: Shape, value: f64, dtype: DType) -> Self {
        Self::from_array(ArrayD::from_elem(IxDyn(shape.dims()), value), dtype)
    }

    /// Creates a new tensor filled with zeros.
    ///
    /// # Examples
    /// ```
    /// use tensor_core::{Tensor, Shape, DType};
    /// let t = Tensor::zeros(Shape::matrix(2, 3), DType::F32);
    /// assert_eq!(t.size_bytes(), 24); // 2 * 3 * 4 bytes
    /// ```
    pub fn zeros(shape: Shape, dtype: DType) -> Self {
        Self::full(shape, 0.0, dtype)
    }

    /// Creates a new tensor filled with ones.
    pub fn ones(shape: Shape, dtype: DType) -> Self {
        Self::full(shape, 1.0, dtype)
    }

    /// Creates a rank-0 tensor.
    pub fn scalar(value: f64, dtype: DType) -> Self {
        Self::full(Shape::scalar(), value, dtype)
    }

    fn storage(&self) -> RwLockReadGuard<'_, Storage> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn storage_mut(&self) -> RwLockWriteGuard<'_, Storage> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the tensor's shape.
    pub fn shape(&self) -> Shape {
        Shape::from(self.storage().data.shape())
    }

    /// Returns the number of dimensions.
    pub fn rank(&self) -> usize {
        self.storage().data.ndim()
    }

    /// Returns the row-major strides of the tensor, in elements.
    pub fn strides(&self) -> Vec<usize> {
        self.shape().strides()
    }

    /// Returns the tensor's data type.
    pub fn dtype(&self) -> DType {
        self.storage().dtype
    }

    /// Returns the total number of elements.
    pub fn num_elements(&self) -> usize {
        self.storage().data.len()
    }

    /// Returns the logical memory footprint of this tensor in bytes.
    pub fn size_bytes(&self) -> usize {
        self.num_elements() * self.dtype().size_bytes()
    }

    /// Runs `f` with shared access to the underlying array.
    pub fn with_array<R>(&self, f: impl FnOnce(&ArrayD<f64>) -> R) -> R {
        f(&self.storage().data)
    }

    /// Returns an owned copy of the underlying array.
    pub fn to_array(&self) -> ArrayD<f64> {
        self.storage().data.clone()
    }

    /// Returns the elements in row-major order.
    pub fn to_vec(&self) -> Vec<f64> {
        self.storage().data.iter().copied().collect()
    }

    /// Returns the single value held by a one-element tensor.
    pub fn item(&self) -> Result<f64, TensorError> {
        let storage = self.storage();
        if storage.data.len() != 1 {
            return Err(TensorError::NotScalar {
                shape: Shape::from(storage.data.shape()),
            });
        }
        Ok(storage.data.iter().copied().next().unwrap_or_default())
    }

    /// Returns a copy converted to `dtype`, with fresh storage.
    pub fn to_dtype(&self, dtype: DType) -> Tensor {
        Tensor::from_array(self.to_array(), dtype)
    }

    /// Returns a copy with fresh storage and the same dtype.
    ///
    /// Gradient state is not carried over.
    pub fn deep_clone(&self) -> Tensor {
        self.to_dtype(self.dtype())
    }

    /// Returns `true` if both handles point at the same storage.
    pub fn ptr_eq(&self, other: &Tensor) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Returns `true` if shapes match and all elements differ by at most `tol`.
    pub fn allclose(&self, other: &Tensor, tol: f64) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        let a = self.storage();
        let b = other.storage();
        a.data.shape() == b.data.shape()
            && a.data.iter().zip(b.data.iter()).all(|(x, y)| {
                (x.is_nan() && y.is_nan()) || x == y || (x - y).abs() <= tol
            })
    }

    /// Fills the tensor in place with a constant value (rounded to the dtype).
    pub fn fill(&self, value: f64) {
        let mut storage = self.storage_mut();
        let value = storage.dtype.cast(value);
        storage.data.mapv_inplace(|_| value);
    }

    /// Applies `f` to every element in place, rounding results to the dtype.
    pub fn map_inplace(&self, f: impl Fn(f64) -> f64) {
        let mut storage = self.storage_mut();
        let dtype = storage.dtype;
        storage.data.mapv_inplace(|v| dtype.cast(f(v)));
    }

    /// Returns whether gradients are tracked for this tensor.
    pub fn requires_grad(&self) -> bool {
        self.storage().requires_grad
    }

    /// Enables or disables gradient tracking in place.
    pub fn set_requires_grad(&self, requires_grad: bool) -> &Self {
        self.storage_mut().requires_grad = requires_grad;
        self
    }

    /// Returns the accumulated gradient, if any, as a new tensor.
    pub fn grad(&self) -> Option<Tensor> {
        let storage = self.storage();
        storage
            .grad
            .as_ref()
            .map(|g| Tensor::from_array(g.clone(), storage.dtype))
    }

    /// Adds `gradient` into this tensor's accumulated gradient.
    ///
    /// # Errors
    /// Returns [`TensorError::ShapeMismatch`] if the shapes differ.
    pub fn accumulate_grad(&self, gradient: &Tensor) -> Result<(), TensorError> {
        let incoming = gradient.to_array();
        let mut guard = self.storage_mut();
        let storage = &mut *guard;
        if incoming.shape() != storage.data.shape() {
            return Err(TensorError::ShapeMismatch {
                op: "accumulate_grad",
                lhs: Shape::from(storage.data.shape()),
                rhs: Shape::from(incoming.shape()),
            });
        }
        if let Some(existing) = storage.grad.as_mut() {
            *existing += &incoming;
        } else {
            storage.grad = Some(incoming);
        }
        Ok(())
    }
}

impl fmt::Debug for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let storage = self.storage();
        f.debug_struct("Tensor")
            .field("shape", &storage.data.shape())
            .field("dtype", &storage.dtype)
            .field("requires_grad", &storage.requires_grad)
            .finish()
    }
}

/// Renders as `tensor([...])`, continuation lines aligned under the first
/// bracket. Non-default dtypes are appended, integer tensors print without a
/// fractional part.
impl fmt::Display for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const PREFIX: &str = "tensor(";
        let storage = self.storage();
        let body = match storage.dtype {
            DType::F32 => format!("{}", storage.data.mapv(|v| v as f32)),
            DType::F64 => format!("{}", storage.data),
            DType::I8 | DType::I32 | DType::I64 => {
                format!("{}", storage.data.mapv(|v| v as i64))
            }
        };
        let pad = " ".repeat(PREFIX.len());
        write!(f, "{PREFIX}")?;
        for (i, line) in body.lines().enumerate() {
            if i > 0 {
                write!(f, "\n{pad}")?;
            }
            write!(f, "{line}")?;
        }
        match storage.dtype {
            DType::F32 | DType::I64 => write!(f, ")"),
            other => write!(f, ", dtype={other})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeros() {
        let t = Tensor::zeros(Shape::matrix(2, 3), DType::F32);
        assert_eq!(t.size_bytes(), 24);
        assert_eq!(t.shape(), Shape::matrix(2, 3));
        assert_eq!(t.dtype(), DType::F32);
        assert!(t.to_vec().iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_from_f32() {
        let data = vec![1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0];
        let t = Tensor::from_f32(Shape::matrix(2, 3), &data).unwrap();
        assert_eq!(t.to_vec(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(t.strides(), vec![3, 1]);
    }

    #[test]
    fn test_from_vec_size_mismatch() {
        let result = Tensor::from_vec(Shape::matrix(2, 3), vec![0.0; 5], DType::F32);
        assert!(matches!(
            result,
            Err(TensorError::BufferSizeMismatch { expected: 6, actual: 5 })
        ));
    }

    #[test]
    fn test_integer_rounding() {
        let t = Tensor::from_vec(Shape::vector(2), vec![1.7, -2.2], DType::I64).unwrap();
        assert_eq!(t.to_vec(), vec![1.0, -2.0]);
    }

    #[test]
    fn test_clone_aliases_storage() {
        let a = Tensor::zeros(Shape::vector(3), DType::F32);
        let b = a.clone();
        b.fill(3.0);
        assert!(a.ptr_eq(&b));
        assert_eq!(a.to_vec(), vec![3.0, 3.0, 3.0]);

        let c = a.deep_clone();
        c.fill(1.0);
        assert!(!a.ptr_eq(&c));
        assert_eq!(a.to_vec(), vec![3.0, 3.0, 3.0]);
    }

    #[test]
    fn test_map_inplace() {
        let t = Tensor::from_i64(Shape::vector(3), &[1, 2, 3]).unwrap();
        t.map_inplace(|v| v * 1.5);
        assert_eq!(t.to_vec(), vec![1.0, 3.0, 4.0]);
    }

    #[test]
    fn test_item() {
        assert_eq!(Tensor::scalar(2.5, DType::F64).item().unwrap(), 2.5);
        assert!(Tensor::zeros(Shape::vector(2), DType::F32).item().is_err());
    }

    #[test]
    fn test_grad_accumulation() {
        let t = Tensor::zeros(Shape::vector(2), DType::F32);
        t.set_requires_grad(true);
        assert!(t.requires_grad());
        assert!(t.grad().is_none());

        let seed = Tensor::ones(Shape::vector(2), DType::F32);
        t.accumulate_grad(&seed).unwrap();
        t.accumulate_grad(&seed).unwrap();
        assert_eq!(t.grad().unwrap().to_vec(), vec![2.0, 2.0]);

        let wrong = Tensor::ones(Shape::vector(3), DType::F32);
        assert!(t.accumulate_grad(&wrong).is_err());
        assert_eq!(t.grad().unwrap().to_vec(), vec![2.0, 2.0]);
    }

    #[test]
    fn test_display() {
        let t = Tensor::from_i64(Shape::matrix(2, 2), &[1, 2, 3, 4]).unwrap();
        assert_eq!(format!("{t}"), "tensor([[1, 2],\n        [3, 4]])");

        let f = Tensor::from_vec(Shape::vector(2), vec![0.5, 1.0], DType::F64).unwrap();
        assert_eq!(format!("{f}"), "tensor([0.5, 1], dtype=f64)");
    }

    #[test]
    fn test_allclose() {
        let a = Tensor::from_f32(Shape::vector(2), &[1.0, 2.0]).unwrap();
        let b = Tensor::from_f32(Shape::vector(2), &[1.0, 2.0000001]).unwrap();
        let c = Tensor::from_f32(Shape::vector(3), &[1.0, 2.0, 3.0]).unwrap();
        assert!(a.allclose(&b, 1e-5));
        assert!(!a.allclose(&c, 1e-5));
    }
}
