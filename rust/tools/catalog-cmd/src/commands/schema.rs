//! Schema command implementation

use anyhow::{Context, Result};
use coursecatalog::{
    Key,
    specific::{SpecificRecord, fingerprint64},
};

pub fn run(canonical: bool, fingerprint: bool) -> Result<()> {
    let schema = Key::class_schema();
    if fingerprint {
        println!("{:#018x}", fingerprint64(schema));
    } else if canonical {
        println!("{}", schema.canonical_form());
    } else {
        println!(
            "{}",
            serde_json::to_string_pretty(schema).context("Failed to serialize schema")?
        );
    }
    Ok(())
}
