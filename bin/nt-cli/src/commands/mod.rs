// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Subcommand implementations and shared helpers.

pub mod index;
pub mod inspect;
pub mod reduce;

use crate::config::CliConfig;
use anyhow::Context;
use nested_tensor::NestedTensor;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. `RUST_LOG` wins over `-v` when set.
pub fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Reads a JSON document and parses it as a nested tensor.
pub async fn load_input(path: &Path, config: &CliConfig) -> anyhow::Result<NestedTensor> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("cannot read input '{}'", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("'{}' is not valid JSON", path.display()))?;
    let nt = NestedTensor::from_json(&value, config.nested_dim, config.dtype)
        .with_context(|| format!("cannot build a nested tensor from '{}'", path.display()))?;
    tracing::info!(
        path = %path.display(),
        nested_dim = nt.nested_dim(),
        leaves = nt.leaf_count(),
        "loaded input"
    );
    Ok(nt)
}

/// Prints the boxed command banner.
pub fn banner(title: &str) {
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║{:^54}║", title);
    println!("╚══════════════════════════════════════════════════════╝");
    println!();
}
