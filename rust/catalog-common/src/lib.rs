//! Core definitions (error type, result alias and macros), relied upon by all catalog-* crates.

pub mod error;
pub mod macros;
pub mod result;

pub use result::Result;
