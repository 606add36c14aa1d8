// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Example: Pool a ragged batch of sequences without padding.
//!
//! Each sequence keeps its own length; the pooled features come out regular
//! and can be stacked into one dense tensor.
//!
//! ```bash
//! cargo run -p nested-tensor --example ragged_batch
//! ```

use nested_tensor::{IndexKey, NestedTensor};
use tensor_core::{DType, Shape, Tensor};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialise tracing.
    tracing_subscriber::fmt()
        .with_env_filter("debug")
        .init();

    // Three sequences of 4-dimensional token features.
    let lengths = [3usize, 1, 5];
    let sequences = lengths
        .iter()
        .enumerate()
        .map(|(i, &len)| {
            let values = (0..len * 4).map(|v| (i * 100 + v) as f64 * 0.1).collect();
            Tensor::from_vec(Shape::matrix(len, 4), values, DType::F32)
        })
        .collect::<Result<Vec<_>, _>>()?;
    let batch = NestedTensor::from_tensors(sequences)?;

    println!("Batch:\n{batch}\n");
    println!("Token counts: {}", batch.nested_size_at(1)?);
    println!("Sizes: {:?}\n", batch.sizes());

    // Mean-pool over the token axis, then stack.
    let pooled = batch.mean_dims(&[1], false, None)?;
    let dense = pooled.to_tensor()?;
    println!("Pooled features {}:\n{dense}\n", dense.shape());

    // Attention-style weights per sequence.
    let weights = batch.sum_dims(&[-1], false, None)?.softmax(-1)?;
    println!("Token weights:\n{weights}\n");

    // Tree dimensions cannot be reduced.
    if let Err(e) = batch.sum_dims(&[0], false, None) {
        println!("Reducing dim 0: {e}");
    }

    let last_token = batch.get(IndexKey::Tuple(vec![IndexKey::Int(2), IndexKey::Int(-1)]))?;
    println!("Last token of sequence 2: {last_token}");

    Ok(())
}
