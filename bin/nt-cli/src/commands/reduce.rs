// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `nt reduce` command: apply a lifted reduction or scan.
//!
//! Full reductions print a dense tensor. Reductions over tensor dimensions,
//! `cumsum` and `softmax` keep the tree and print a nested tensor, or JSON
//! with `--json`.

use crate::config::CliConfig;
use nested_tensor::NestedTensor;
use std::path::PathBuf;
use std::str::FromStr;
use tensor_core::{DType, Tensor};

/// Operations exposed by the command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReduceOp {
    Sum,
    Mean,
    Prod,
    Cumsum,
    Softmax,
}

impl FromStr for ReduceOp {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sum" => Ok(ReduceOp::Sum),
            "mean" => Ok(ReduceOp::Mean),
            "prod" => Ok(ReduceOp::Prod),
            "cumsum" => Ok(ReduceOp::Cumsum),
            "softmax" => Ok(ReduceOp::Softmax),
            other => anyhow::bail!(
                "unknown op '{other}'; expected 'sum', 'mean', 'prod', 'cumsum', or 'softmax'"
            ),
        }
    }
}

/// What a reduction produced.
#[derive(Debug)]
pub enum Reduced {
    Dense(Tensor),
    Nested(NestedTensor),
}

impl Reduced {
    /// JSON form: nested arrays shaped like the result, a bare number for a
    /// scalar.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Reduced::Dense(t) => nested_tensor::tensor_to_json(t),
            Reduced::Nested(nt) => nt.to_json(),
        }
    }
}

/// Runs `op` over `nt`. `dims` selects the reduced or scanned dimensions.
pub fn apply(
    nt: &NestedTensor,
    op: ReduceOp,
    dims: &[i64],
    keepdim: bool,
    dtype: Option<DType>,
) -> anyhow::Result<Reduced> {
    let single_dim = || match dims {
        [dim] => Ok(*dim),
        _ => Err(anyhow::anyhow!(
            "{op:?} needs exactly one dimension, got {}",
            dims.len()
        )),
    };
    let reduced = match (op, dims.is_empty()) {
        (ReduceOp::Sum, true) => Reduced::Dense(nt.sum(dtype)?),
        (ReduceOp::Mean, true) => Reduced::Dense(nt.mean(dtype)?),
        (ReduceOp::Prod, true) => Reduced::Dense(nt.prod(dtype)?),
        (ReduceOp::Sum, false) => Reduced::Nested(nt.sum_dims(dims, keepdim, dtype)?),
        (ReduceOp::Mean, false) => Reduced::Nested(nt.mean_dims(dims, keepdim, dtype)?),
        (ReduceOp::Prod, false) => {
            anyhow::bail!("prod only supports a full reduction; drop --dims")
        }
        (ReduceOp::Cumsum, _) => Reduced::Nested(nt.cumsum(single_dim()?, dtype)?),
        (ReduceOp::Softmax, _) => Reduced::Nested(nt.softmax(single_dim()?)?),
    };
    Ok(reduced)
}

pub async fn execute(
    input: PathBuf,
    op: String,
    dims: Vec<i64>,
    keepdim: bool,
    out_dtype: Option<DType>,
    json: bool,
    config: CliConfig,
) -> anyhow::Result<()> {
    let op: ReduceOp = op.parse()?;
    let nt = super::load_input(&input, &config).await?;
    tracing::debug!(?op, ?dims, keepdim, "reducing");

    match apply(&nt, op, &dims, keepdim, out_dtype)? {
        r if json => println!("{}", serde_json::to_string(&r.to_json())?),
        Reduced::Dense(t) => println!("{t}"),
        Reduced::Nested(r) => println!("{}", nested_tensor::render(&r, &config.display)),
    }
    Ok(())
}
