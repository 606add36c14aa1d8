// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! CLI configuration loaded from a TOML file.
//!
//! # TOML Format
//! ```toml
//! nested_dim = 2
//! dtype = "f64"
//!
//! [display]
//! indent = "    "
//! edge_lines = 2
//! ```
//!
//! Flags given on the command line take precedence over the file.

use anyhow::Context;
use nested_tensor::DisplayOptions;
use std::path::Path;
use tensor_core::DType;

/// Settings shared by every subcommand.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Number of outer JSON array levels read as tree levels.
    pub nested_dim: usize,
    /// Element dtype of the parsed leaves.
    pub dtype: DType,
    /// Text rendering options.
    pub display: DisplayOptions,
}

impl CliConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config '{}'", path.display()))?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(toml_str).context("TOML parse error")?;
        if config.nested_dim == 0 {
            anyhow::bail!("nested_dim must be at least 1");
        }
        Ok(config)
    }

    /// Serialises configuration to TOML.
    pub fn to_toml(&self) -> anyhow::Result<String> {
        toml::to_string_pretty(self).context("TOML serialise error")
    }

    /// Loads `path` when given, otherwise the defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Applies command-line overrides.
    pub fn with_overrides(mut self, nested_dim: Option<usize>, dtype: Option<DType>) -> Self {
        if let Some(n) = nested_dim {
            self.nested_dim = n;
        }
        if let Some(d) = dtype {
            self.dtype = d;
        }
        self
    }
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            nested_dim: 1,
            dtype: DType::DEFAULT,
            display: DisplayOptions::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let c = CliConfig::default();
        assert_eq!(c.nested_dim, 1);
        assert_eq!(c.dtype, DType::F32);
        assert_eq!(c.display.edge_lines, 3);
    }

    #[test]
    fn test_from_toml() {
        let toml = r#"
nested_dim = 2
dtype = "i64"

[display]
edge_lines = 1
"#;
        let c = CliConfig::from_toml(toml).unwrap();
        assert_eq!(c.nested_dim, 2);
        assert_eq!(c.dtype, DType::I64);
        assert_eq!(c.display.edge_lines, 1);
        assert_eq!(c.display.indent, "  ");
    }

    #[test]
    fn test_from_toml_rejects_zero_levels() {
        assert!(CliConfig::from_toml("nested_dim = 0").is_err());
        assert!(CliConfig::from_toml("dtype = \"u8\"").is_err());
    }

    #[test]
    fn test_to_toml_roundtrip() {
        let c = CliConfig {
            nested_dim: 3,
            ..Default::default()
        };
        let back = CliConfig::from_toml(&c.to_toml().unwrap()).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn test_overrides() {
        let c = CliConfig::default().with_overrides(Some(2), None);
        assert_eq!(c.nested_dim, 2);
        assert_eq!(c.dtype, DType::F32);
        let c = c.with_overrides(None, Some(DType::F64));
        assert_eq!(c.dtype, DType::F64);
    }

    #[test]
    fn test_load_without_path() {
        assert_eq!(CliConfig::load(None).unwrap(), CliConfig::default());
    }
}
