//! Encode command implementation

use anyhow::{Context, Result};
use coursecatalog::Key;

use crate::utils;

pub fn run(id: Option<i32>, single_object: bool) -> Result<()> {
    let key = Key::new_builder()
        .set_id(id)
        .context("Invalid id")?
        .build()
        .context("Failed to build key")?;
    log::debug!("encoding {key:?}");

    let bytes = if single_object {
        key.to_byte_buffer()
    } else {
        let mut body = Vec::new();
        key.write_to(&mut body).map(|()| body)
    }
    .context("Failed to encode key")?;

    println!("{}", utils::to_hex(&bytes));
    Ok(())
}
