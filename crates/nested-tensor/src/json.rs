// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! JSON import and export.
//!
//! A nested tensor is written as nested arrays. The outer `nested_dim`
//! levels are tree levels and may be ragged; everything below is one dense
//! tensor per leaf and must be rectangular. `NaN` is written as `null` and
//! `null` reads back as `NaN` for floating dtypes; integer dtypes reject it.

use crate::{NestedError, NestedNode, NestedTensor};
use serde::{Serialize, Serializer};
use serde_json::{Number, Value};
use tensor_core::{DType, Shape, Tensor};

impl NestedTensor {
    /// Parses nested arrays, treating the outer `nested_dim` levels as tree
    /// levels.
    ///
    /// # Examples
    /// ```
    /// use nested_tensor::NestedTensor;
    /// use tensor_core::DType;
    ///
    /// let value = serde_json::json!([[1, 2, 3], [4]]);
    /// let nt = NestedTensor::from_json(&value, 1, DType::F32).unwrap();
    /// assert_eq!(nt.len(), 2);
    /// assert_eq!(nt.dim(), 2);
    /// ```
    ///
    /// # Errors
    /// Returns [`NestedError::InvalidInput`] for a non-array where a tree level
    /// is expected, a non-numeric entry, or a non-rectangular leaf.
    pub fn from_json(value: &Value, nested_dim: usize, dtype: DType) -> Result<Self, NestedError> {
        if nested_dim == 0 {
            return Err(NestedError::InvalidInput(
                "nested_dim must be at least 1".to_string(),
            ));
        }
        let structure = parse_level(value, nested_dim, dtype)?;
        NestedTensor::new(structure)
    }

    /// Writes nested arrays. Integer dtypes produce JSON integers.
    pub fn to_json(&self) -> Value {
        self.structure()
            .fold(|leaf, _| tensor_to_json(leaf), |children, _| Value::Array(children))
    }
}

impl Serialize for NestedTensor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

fn parse_level(value: &Value, levels: usize, dtype: DType) -> Result<NestedNode<Tensor>, NestedError> {
    if levels == 0 {
        return parse_dense(value, dtype).map(NestedNode::leaf);
    }
    let items = value.as_array().ok_or_else(|| {
        NestedError::InvalidInput(format!("expected an array at a tree level, got {value}"))
    })?;
    if items.is_empty() {
        return Ok(NestedNode::empty(levels));
    }
    let children = items
        .iter()
        .map(|item| parse_level(item, levels - 1, dtype))
        .collect::<Result<Vec<_>, _>>()?;
    NestedNode::internal(children)
}

fn parse_dense(value: &Value, dtype: DType) -> Result<Tensor, NestedError> {
    let mut values = Vec::new();
    let dims = collect_dense(value, dtype, &mut values)?;
    Ok(Tensor::from_vec(Shape::new(dims), values, dtype)?)
}

/// Appends the elements of `value` in row-major order and returns its shape.
fn collect_dense(
    value: &Value,
    dtype: DType,
    out: &mut Vec<f64>,
) -> Result<Vec<usize>, NestedError> {
    match value {
        Value::Number(n) => {
            let v = n.as_f64().ok_or_else(|| {
                NestedError::InvalidInput(format!("number {n} is not representable"))
            })?;
            out.push(v);
            Ok(Vec::new())
        }
        Value::Null if !dtype.is_floating() => {
            Err(NestedError::InvalidInput(format!("null has no {dtype} value")))
        }
        Value::Null => {
            out.push(f64::NAN);
            Ok(Vec::new())
        }
        Value::Array(items) => {
            let mut inner: Option<Vec<usize>> = None;
            for item in items {
                let dims = collect_dense(item, dtype, out)?;
                if let Some(expected) = &inner {
                    if *expected != dims {
                        return Err(NestedError::InvalidInput(format!(
                            "leaf is not rectangular: {dims:?} next to {expected:?}"
                        )));
                    }
                } else {
                    inner = Some(dims);
                }
            }
            let mut dims = vec![items.len()];
            dims.extend(inner.unwrap_or_default());
            Ok(dims)
        }
        other => Err(NestedError::InvalidInput(format!(
            "expected a number or an array, got {other}"
        ))),
    }
}

/// Writes one dense tensor as nested arrays following its shape. A scalar
/// becomes a bare number.
pub fn tensor_to_json(tensor: &Tensor) -> Value {
    let integral = !tensor.dtype().is_floating();
    build_json(&tensor.to_vec(), tensor.shape().dims(), integral)
}

fn build_json(values: &[f64], dims: &[usize], integral: bool) -> Value {
    let Some((&len, rest)) = dims.split_first() else {
        return number_to_json(values[0], integral);
    };
    let inner: usize = rest.iter().product();
    Value::Array(
        (0..len)
            .map(|i| build_json(&values[i * inner..(i + 1) * inner], rest, integral))
            .collect(),
    )
}

fn number_to_json(v: f64, integral: bool) -> Value {
    if integral {
        Value::from(v as i64)
    } else {
        Number::from_f64(v).map_or(Value::Null, Value::Number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_one_level() {
        let nt = NestedTensor::from_json(&json!([[1, 2, 3], [4]]), 1, DType::I64).unwrap();
        assert_eq!(nt.nested_dim(), 1);
        assert_eq!(nt.tensor_dim(), 1);
        assert_eq!(nt.dtype(), DType::I64);
        assert_eq!(nt.tensors()[0].to_vec(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_from_json_matrix_leaves() {
        let value = json!([[[1.5, 2.0], [3.0, 4.0]], [[5.0, 6.0]]]);
        let nt = NestedTensor::from_json(&value, 1, DType::F64).unwrap();
        assert_eq!(nt.tensor_dim(), 2);
        assert_eq!(nt.nested_size().flatten(), vec![vec![2, 2], vec![1, 2]]);
    }

    #[test]
    fn test_from_json_two_levels_with_empty_group() {
        let value = json!([[[1.0], [2.0, 3.0]], []]);
        let nt = NestedTensor::from_json(&value, 2, DType::F32).unwrap();
        assert_eq!(nt.nested_dim(), 2);
        assert_eq!(nt.leaf_count(), 2);
        assert_eq!(nt.nested_size_at(1).unwrap().to_string(), "(2, 0)");
    }

    #[test]
    fn test_from_json_errors() {
        assert!(NestedTensor::from_json(&json!([1, 2]), 0, DType::F32).is_err());
        assert!(matches!(
            NestedTensor::from_json(&json!(3), 1, DType::F32),
            Err(NestedError::InvalidInput(_))
        ));
        assert!(matches!(
            NestedTensor::from_json(&json!([[[1, 2], [3]]]), 1, DType::F32),
            Err(NestedError::InvalidInput(_))
        ));
        assert!(matches!(
            NestedTensor::from_json(&json!([["a"]]), 1, DType::F32),
            Err(NestedError::InvalidInput(_))
        ));
        assert!(matches!(
            NestedTensor::from_json(&json!([[1, 2], 3]), 1, DType::F32),
            Err(NestedError::InconsistentLeaves(_))
        ));
    }

    #[test]
    fn test_to_json() {
        let value = json!([[1, 2, 3], [4]]);
        let nt = NestedTensor::from_json(&value, 1, DType::I64).unwrap();
        assert_eq!(nt.to_json(), value);

        let floats = NestedTensor::from_json(&json!([[0.5], [null]]), 1, DType::F64).unwrap();
        assert_eq!(floats.to_json(), json!([[0.5], [null]]));
        assert_eq!(serde_json::to_string(&floats).unwrap(), "[[0.5],[null]]");
    }

    #[test]
    fn test_null_rejected_for_integer_dtypes() {
        let value = json!([[1, null]]);
        assert!(matches!(
            NestedTensor::from_json(&value, 1, DType::I64),
            Err(NestedError::InvalidInput(_))
        ));
        assert!(NestedTensor::from_json(&value, 1, DType::I8).is_err());
        let floats = NestedTensor::from_json(&value, 1, DType::F32).unwrap();
        assert!(floats.tensors()[0].to_vec()[1].is_nan());
    }

    #[test]
    fn test_tensor_to_json_keeps_shape() {
        assert_eq!(tensor_to_json(&Tensor::scalar(10.0, DType::F32)), json!(10.0));
        assert_eq!(tensor_to_json(&Tensor::ones(Shape::vector(1), DType::F32)), json!([1.0]));
        let m = Tensor::from_i64(Shape::matrix(2, 2), &[1, 2, 3, 4]).unwrap();
        assert_eq!(tensor_to_json(&m), json!([[1, 2], [3, 4]]));
    }

    #[test]
    fn test_to_json_zero_sized_leaf() {
        let nt = NestedTensor::from_tensors(vec![Tensor::zeros(Shape::matrix(2, 0), DType::F32)])
            .unwrap();
        assert_eq!(nt.to_json(), json!([[[], []]]));
    }
}
