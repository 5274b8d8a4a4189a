//! Command implementations for catalog-cmd

pub mod decode;
pub mod encode;
pub mod schema;
