// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Supported tensor element data types.

use std::fmt;
use std::str::FromStr;

/// Enumerates the numeric types a [`crate::Tensor`] can hold.
///
/// Storage is always `f64`; the dtype decides how values are rounded when a
/// tensor is built or converted, how reductions promote, and how elements are
/// rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DType {
    /// 32-bit IEEE 754 floating point.
    F32,
    /// 64-bit IEEE 754 floating point.
    F64,
    /// 8-bit signed integer.
    I8,
    /// 32-bit signed integer.
    I32,
    /// 64-bit signed integer.
    I64,
}

impl DType {
    /// Default dtype for tensors created without an explicit one.
    pub const DEFAULT: DType = DType::F32;

    /// Returns the size of a single element in bytes.
    pub fn size_bytes(self) -> usize {
        match self {
            DType::F32 => 4,
            DType::F64 => 8,
            DType::I8 => 1,
            DType::I32 => 4,
            DType::I64 => 8,
        }
    }

    /// Returns a human-readable label for this data type.
    pub fn as_str(self) -> &'static str {
        match self {
            DType::F32 => "f32",
            DType::F64 => "f64",
            DType::I8 => "i8",
            DType::I32 => "i32",
            DType::I64 => "i64",
        }
    }

    /// Returns `true` for the floating point dtypes.
    pub fn is_floating(self) -> bool {
        matches!(self, DType::F32 | DType::F64)
    }

    /// Rounds `value` to what this dtype can represent.
    ///
    /// Integer dtypes truncate toward zero and saturate at their bounds
    /// (`NaN` becomes 0).
    #[inline]
    pub fn cast(self, value: f64) -> f64 {
        match self {
            DType::F32 => value as f32 as f64,
            DType::F64 => value,
            DType::I8 => value as i8 as f64,
            DType::I32 => value as i32 as f64,
            DType::I64 => value as i64 as f64,
        }
    }

    /// Dtype produced by accumulating reductions (`sum`, `prod`, `cumsum`)
    /// when no output dtype is requested: integers widen to `i64`.
    pub fn accumulate(self) -> DType {
        if self.is_floating() {
            self
        } else {
            DType::I64
        }
    }

    /// Returns the common dtype two operands are promoted to.
    ///
    /// Floating point wins over integer; otherwise the wider type wins.
    pub fn promote(self, other: DType) -> DType {
        match (self.is_floating(), other.is_floating()) {
            (true, false) => self,
            (false, true) => other,
            _ if self.size_bytes() >= other.size_bytes() => self,
            _ => other,
        }
    }
}

impl Default for DType {
    fn default() -> Self {
        DType::DEFAULT
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "f32" | "float32" | "float" => Ok(DType::F32),
            "f64" | "float64" | "double" => Ok(DType::F64),
            "i8" | "int8" => Ok(DType::I8),
            "i32" | "int32" | "int" => Ok(DType::I32),
            "i64" | "int64" | "long" => Ok(DType::I64),
            other => Err(format!(
                "unknown dtype '{other}'; expected one of f32, f64, i8, i32, i64"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cast_rounding() {
        assert_eq!(DType::I64.cast(2.9), 2.0);
        assert_eq!(DType::I64.cast(-2.9), -2.0);
        assert_eq!(DType::I8.cast(300.0), 127.0);
        assert_eq!(DType::I32.cast(f64::NAN), 0.0);
        assert_eq!(DType::F64.cast(0.1), 0.1);
        assert_eq!(DType::F32.cast(0.1), 0.1f32 as f64);
    }

    #[test]
    fn test_promote() {
        assert_eq!(DType::I64.promote(DType::F32), DType::F32);
        assert_eq!(DType::F32.promote(DType::F64), DType::F64);
        assert_eq!(DType::I8.promote(DType::I32), DType::I32);
        assert_eq!(DType::F32.promote(DType::F32), DType::F32);
    }

    #[test]
    fn test_accumulate() {
        assert_eq!(DType::I8.accumulate(), DType::I64);
        assert_eq!(DType::F32.accumulate(), DType::F32);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("f64".parse::<DType>().unwrap(), DType::F64);
        assert_eq!("Int64".parse::<DType>().unwrap(), DType::I64);
        assert!("bf16".parse::<DType>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&DType::I32).unwrap();
        assert_eq!(json, "\"i32\"");
        let back: DType = serde_json::from_str("\"f64\"").unwrap();
        assert_eq!(back, DType::F64);
    }
}
