// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Benchmarks for lifted operations and indexing on a ragged batch.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use nested_tensor::{IndexKey, NestedTensor};
use tensor_core::{DType, Shape, Tensor};

/// 32 sequences of 8..72 tokens with 64 features each, grouped in fours.
fn ragged_batch() -> NestedTensor {
    let groups = (0..8)
        .map(|g| {
            let leaves = (0..4)
                .map(|i| {
                    let rows = 8 + 8 * ((g + i) % 8);
                    Tensor::full(Shape::matrix(rows, 64), 0.5, DType::F32)
                })
                .collect();
            NestedTensor::from_tensors(leaves).unwrap()
        })
        .collect();
    NestedTensor::from_nested(groups).unwrap()
}

fn bench_sum_dims(c: &mut Criterion) {
    let nt = ragged_batch();
    c.bench_function("sum_dims last axis, 32 leaves", |b| {
        b.iter(|| black_box(&nt).sum_dims(&[-1], false, None).unwrap())
    });
}

fn bench_full_sum(c: &mut Criterion) {
    let nt = ragged_batch();
    c.bench_function("full sum, 32 leaves", |b| {
        b.iter(|| black_box(&nt).sum(None).unwrap())
    });
}

fn bench_tuple_index(c: &mut Criterion) {
    let nt = ragged_batch();
    let key = IndexKey::Tuple(vec![IndexKey::Int(3), IndexKey::Int(-1), IndexKey::Int(0)]);
    c.bench_function("tuple index to a leaf row", |b| {
        b.iter(|| black_box(&nt).get(key.clone()).unwrap())
    });
}

criterion_group!(benches, bench_sum_dims, bench_full_sum, bench_tuple_index);
criterion_main!(benches);
