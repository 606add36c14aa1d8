// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `nt inspect` command: print the shape of a nested tensor.
//!
//! Shows the dimension split, the regular sizes, the per-dimension nested
//! sizes and the rendered tensor itself.

use crate::config::CliConfig;
use std::path::PathBuf;

pub async fn execute(input: PathBuf, config: CliConfig) -> anyhow::Result<()> {
    super::banner("nt · Nested Tensor Inspector");

    let nt = super::load_input(&input, &config).await?;

    // ── Summary ────────────────────────────────────────────────
    println!("  Input:       {}", input.display());
    println!("  Dtype:       {}", nt.dtype());
    println!(
        "  Dimensions:  {} ({} nested + {} tensor)",
        nt.dim(),
        nt.nested_dim(),
        nt.tensor_dim(),
    );
    println!("  Leaves:      {}", nt.leaf_count());
    println!("  Sizes:       {}", format_sizes(&nt.sizes()));
    println!();

    // ── Per-Dimension Sizes ────────────────────────────────────
    println!("  {:<5} {:<8} {}", "Dim", "Kind", "Size");
    println!("  {}", "-".repeat(40));
    for dim in 0..nt.dim() {
        let kind = if dim < nt.nested_dim() { "nested" } else { "tensor" };
        let size = nt.nested_size_at(dim as i64)?;
        println!("  {:<5} {:<8} {}", dim, kind, size);
    }
    println!();

    // ── Contents ───────────────────────────────────────────────
    println!("{}", nested_tensor::render(&nt, &config.display));
    println!();
    Ok(())
}

/// Formats regular sizes, writing ragged dimensions as `*`.
fn format_sizes(sizes: &[Option<usize>]) -> String {
    let parts: Vec<String> = sizes
        .iter()
        .map(|s| s.map_or_else(|| "*".to_string(), |n| n.to_string()))
        .collect();
    format!("[{}]", parts.join(", "))
}
