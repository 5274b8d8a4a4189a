//! Decode command implementation

use anyhow::{Context, Result};
use coursecatalog::{
    Key,
    specific::{BinaryMessageDecoder, DecodeOptions, UnionTagPolicy, read_datum},
};

use crate::utils;

pub fn run(hex: &str, single_object: bool, strict: bool) -> Result<()> {
    let bytes = utils::from_hex(hex)?;
    let options = DecodeOptions::new().with_union_tags(if strict {
        UnionTagPolicy::Strict
    } else {
        UnionTagPolicy::Permissive
    });

    let key = if single_object {
        BinaryMessageDecoder::<Key>::new()
            .with_options(options)
            .decode(&bytes)
    } else {
        read_datum::<Key, _>(&bytes[..], options)
    }
    .context("Failed to decode key")?;

    println!(
        "{}",
        serde_json::to_string(&key).context("Failed to serialize key")?
    );
    Ok(())
}
