// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Text rendering of nested tensors.
//!
//! ```text
//! nested_tensor([
//!   [
//!     tensor([1, 2]),
//!     tensor([3])
//!   ],
//!   [
//!     tensor([4, 5, 6])
//!   ]
//! ])
//! ```
//!
//! Long leaves are cut down to their first and last few lines.

use crate::{AnyTensor, NestedTensor};
use serde::{Deserialize, Serialize};
use std::fmt;
use tensor_core::Tensor;

/// Rendering options, loadable from the `[display]` table of a config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayOptions {
    /// Indentation added per nesting level.
    pub indent: String,
    /// Data lines kept at each end of a long leaf.
    pub edge_lines: usize,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            indent: "  ".to_string(),
            edge_lines: 3,
        }
    }
}

/// Renders `nt` with the given options.
pub fn render(nt: &NestedTensor, options: &DisplayOptions) -> String {
    nt.structure().fold(
        |leaf, depth| render_leaf(leaf, &options.indent.repeat(depth), options.edge_lines),
        |children, depth| {
            let body = children.join(",");
            if depth == 0 {
                format!("nested_tensor([{body}\n])")
            } else {
                let pad = options.indent.repeat(depth);
                format!("\n{pad}[{body}\n{pad}]")
            }
        },
    )
}

fn render_leaf(tensor: &Tensor, pad: &str, edge_lines: usize) -> String {
    let text = tensor.to_string();
    truncate_lines(&text, edge_lines)
        .into_iter()
        .map(|line| format!("\n{pad}{line}"))
        .collect()
}

/// All lines but the last are data lines. With more than `2 * edge` data
/// lines only the first and last `edge` are kept, separated by `...`; the
/// last line is always kept.
fn truncate_lines(text: &str, edge: usize) -> Vec<&str> {
    let tokens: Vec<&str> = text.split('\n').collect();
    let data_lines = tokens.len() - 1;
    if data_lines <= 2 * edge {
        return tokens;
    }
    let mut kept = Vec::with_capacity(2 * edge + 2);
    kept.extend_from_slice(&tokens[..edge]);
    kept.push("...");
    kept.extend_from_slice(&tokens[data_lines - edge..]);
    kept
}

impl fmt::Display for NestedTensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(self, &DisplayOptions::default()))
    }
}

impl fmt::Display for AnyTensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnyTensor::Dense(t) => write!(f, "{t}"),
            AnyTensor::Nested(nt) => write!(f, "{nt}"),
        }
    }
}
