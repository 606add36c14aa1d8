// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `nt index` command: resolve an index key against a nested tensor.
//!
//! Keys use subscript syntax without the brackets:
//! ```text
//! 1            one entry
//! -1,0         a tuple, applied positionally
//! None,0:2     insert a level, then slice the next dimension
//! ::2          every other element
//! 1,           a one-element tuple
//! ```

use crate::config::CliConfig;
use nested_tensor::IndexKey;
use std::path::PathBuf;
use tensor_core::Slice;

/// Parses subscript syntax into an [`IndexKey`].
pub fn parse_key(text: &str) -> anyhow::Result<IndexKey> {
    let text = text.trim();
    if !text.contains(',') {
        return parse_single(text);
    }
    let mut parts: Vec<&str> = text.split(',').collect();
    if parts.last().is_some_and(|p| p.trim().is_empty()) {
        parts.pop();
    }
    let keys = parts
        .into_iter()
        .map(parse_single)
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(IndexKey::Tuple(keys))
}

fn parse_single(text: &str) -> anyhow::Result<IndexKey> {
    let text = text.trim();
    if text.is_empty() {
        anyhow::bail!("empty index key");
    }
    if text == "None" {
        return Ok(IndexKey::None);
    }
    if text.contains(':') {
        return parse_slice(text).map(IndexKey::Slice);
    }
    let i = text
        .parse::<i64>()
        .map_err(|_| anyhow::anyhow!("invalid index key '{text}'"))?;
    Ok(IndexKey::Int(i))
}

fn parse_slice(text: &str) -> anyhow::Result<Slice> {
    let parts: Vec<&str> = text.split(':').collect();
    if parts.len() > 3 {
        anyhow::bail!("invalid slice '{text}'");
    }
    let bound = |part: &str| -> anyhow::Result<Option<i64>> {
        let part = part.trim();
        if part.is_empty() {
            return Ok(None);
        }
        part.parse::<i64>()
            .map(Some)
            .map_err(|_| anyhow::anyhow!("invalid slice bound '{part}' in '{text}'"))
    };
    let start = bound(parts[0])?;
    let stop = bound(parts[1])?;
    let step = match parts.get(2) {
        Some(part) => bound(part)?.unwrap_or(1),
        None => 1,
    };
    Ok(Slice::new(start, stop, step))
}

pub async fn execute(input: PathBuf, key: String, config: CliConfig) -> anyhow::Result<()> {
    let key = parse_key(&key)?;
    let nt = super::load_input(&input, &config).await?;
    tracing::debug!(%key, "indexing");

    let result = nt.get(key)?;
    match result.as_nested() {
        Some(nested) => println!("{}", nested_tensor::render(nested, &config.display)),
        None => println!("{result}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_keys() {
        assert_eq!(parse_key("1").unwrap(), IndexKey::Int(1));
        assert_eq!(parse_key(" -2 ").unwrap(), IndexKey::Int(-2));
        assert_eq!(parse_key("None").unwrap(), IndexKey::None);
        assert_eq!(
            parse_key("0:2").unwrap(),
            IndexKey::Slice(Slice::range(0, 2))
        );
        assert_eq!(
            parse_key("::2").unwrap(),
            IndexKey::Slice(Slice::new(None, None, 2))
        );
        assert_eq!(parse_key(":").unwrap(), IndexKey::Slice(Slice::full()));
    }

    #[test]
    fn test_parse_tuple_keys() {
        assert_eq!(
            parse_key("1,None,0:2").unwrap(),
            IndexKey::Tuple(vec![
                IndexKey::Int(1),
                IndexKey::None,
                IndexKey::Slice(Slice::range(0, 2)),
            ])
        );
        assert_eq!(
            parse_key("1,").unwrap(),
            IndexKey::Tuple(vec![IndexKey::Int(1)])
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_key("").is_err());
        assert!(parse_key("x").is_err());
        assert!(parse_key("1,,2").is_err());
        assert!(parse_key("1:2:3:4").is_err());
        assert!(parse_key("a:2").is_err());
    }

    #[test]
    fn test_display_matches_syntax() {
        assert_eq!(parse_key("1,").unwrap().to_string(), "(1,)");
        assert_eq!(parse_key("-1").unwrap().to_string(), "-1");
    }
}
