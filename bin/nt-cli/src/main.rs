// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # nt
//!
//! Command-line interface for nested tensors stored as JSON arrays.
//!
//! ## Usage
//! ```bash
//! # Show sizes and contents
//! nt inspect --input batch.json --nested-dim 2
//!
//! # Reduce over the last dimension, or everything
//! nt reduce --input batch.json --op sum --dims -1
//! nt reduce --input batch.json --op prod --dtype f64
//!
//! # Index with subscript syntax
//! nt index --input batch.json --key "1,None,0:2"
//! ```

mod commands;
mod config;

use clap::{Parser, Subcommand};
use config::CliConfig;
use std::path::PathBuf;
use tensor_core::DType;

#[derive(Parser)]
#[command(
    name = "nt",
    about = "Inspect, reduce and index ragged nested tensors",
    version,
    author
)]
struct Cli {
    /// Path to a TOML configuration file (CLI arguments override it).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging (repeat for more: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Number of outer JSON levels read as tree levels.
    #[arg(short, long, global = true)]
    nested_dim: Option<usize>,

    /// Element dtype of the parsed leaves (f32, f64, i8, i32, i64).
    #[arg(long, global = true)]
    input_dtype: Option<DType>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the dimension split, sizes and contents of a nested tensor.
    Inspect {
        /// Path to the JSON input.
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Apply a reduction or scan to every leaf.
    Reduce {
        /// Path to the JSON input.
        #[arg(short, long)]
        input: PathBuf,

        /// Operation: sum, mean, prod, cumsum, softmax.
        #[arg(short, long, default_value = "sum")]
        op: String,

        /// Dimensions to reduce (comma-separated); omit for a full reduction.
        #[arg(short, long, value_delimiter = ',', allow_negative_numbers = true)]
        dims: Vec<i64>,

        /// Keep reduced dimensions with size 1.
        #[arg(short, long)]
        keepdim: bool,

        /// Output dtype.
        #[arg(long)]
        dtype: Option<DType>,

        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Resolve an index key, e.g. "1", "-1,0" or "None,0:2".
    Index {
        /// Path to the JSON input.
        #[arg(short, long)]
        input: PathBuf,

        /// Index key in subscript syntax.
        #[arg(long, allow_hyphen_values = true)]
        key: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing/logging based on verbosity.
    commands::init_tracing(cli.verbose);

    let config = CliConfig::load(cli.config.as_deref())?
        .with_overrides(cli.nested_dim, cli.input_dtype);
    tracing::debug!(?config, "resolved configuration");

    match cli.command {
        Commands::Inspect { input } => commands::inspect::execute(input, config).await,
        Commands::Reduce {
            input,
            op,
            dims,
            keepdim,
            dtype,
            json,
        } => commands::reduce::execute(input, op, dims, keepdim, dtype, json, config).await,
        Commands::Index { input, key } => commands::index::execute(input, key, config).await,
    }
}
